//! Configuration settings management
//!
//! This module handles loading configuration from multiple sources,
//! validation, and the derived values (like the subnet ARM ID) the
//! provisioning sequence needs.

use crate::error::{AnfError, Result};
use crate::netapp::models::{ServiceLevel, MIN_POOL_SIZE_BYTES, MIN_VOLUME_SIZE_BYTES};
use crate::utils::validate::{
    is_valid_account_name, is_valid_child_resource_name, is_valid_smb_server_prefix,
    validate_dns_list, validate_pool_size, validate_subscription_id, validate_volume_size,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// SMB/Active Directory settings for the domain join of the volume's
/// SMB server. The domain-join password is prompted at runtime and is
/// deliberately absent here.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SmbConfig {
    pub domain_join_username: String,
    /// Comma-separated DNS server list
    pub dns_list: String,
    /// Fully qualified Active Directory domain name
    pub ad_fqdn: String,
    /// SMB server name prefix, max 10 characters
    pub smb_server_name_prefix: String,
}

impl Default for SmbConfig {
    fn default() -> Self {
        Self {
            domain_join_username: "testadmin".to_string(),
            dns_list: "10.0.2.4,10.0.2.5".to_string(),
            ad_fqdn: "testdomain.local".to_string(),
            smb_server_name_prefix: "testsmb".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub debug: bool,
    pub subscription_id: String,
    pub tenant_id: String,
    pub location: String,
    pub resource_group: String,
    pub vnet_name: String,
    pub subnet_name: String,
    pub account_name: String,
    pub pool_name: String,
    pub pool_service_level: String,
    pub pool_size: u64,
    pub volume_name: String,
    pub volume_size: u64,
    pub no_color: bool,
    pub smb: SmbConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            debug: false,
            subscription_id: String::new(),
            tenant_id: String::new(),
            location: "eastus".to_string(),
            resource_group: String::new(),
            vnet_name: String::new(),
            subnet_name: String::new(),
            account_name: "anf-rust-example-account".to_string(),
            pool_name: "anf-rust-example-pool".to_string(),
            pool_service_level: "Standard".to_string(),
            pool_size: MIN_POOL_SIZE_BYTES,
            volume_name: "anf-rust-example-volume".to_string(),
            volume_size: MIN_VOLUME_SIZE_BYTES,
            no_color: false,
            smb: SmbConfig::default(),
        }
    }
}

impl Config {
    /// Default configuration file location
    pub fn get_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| AnfError::config("Unable to determine config directory"))?;
        Ok(config_dir.join("anfcli").join("config.toml"))
    }

    /// Parsed service level for the pool and volume
    pub fn service_level(&self) -> Result<ServiceLevel> {
        self.pool_service_level.parse()
    }

    /// ARM resource ID of the delegated subnet the volume mounts into
    pub fn subnet_id(&self) -> String {
        format!(
            "/subscriptions/{}/resourceGroups/{}/providers/Microsoft.Network/virtualNetworks/{}/subnets/{}",
            self.subscription_id, self.resource_group, self.vnet_name, self.subnet_name
        )
    }

    /// Validate the configuration before any management call is made
    pub fn validate(&self) -> Result<()> {
        validate_subscription_id(&self.subscription_id)?;

        if self.resource_group.trim().is_empty() {
            return Err(AnfError::config("resource_group is required"));
        }
        if self.vnet_name.trim().is_empty() {
            return Err(AnfError::config("vnet_name is required"));
        }
        if self.subnet_name.trim().is_empty() {
            return Err(AnfError::config("subnet_name is required"));
        }
        if self.location.trim().is_empty() {
            return Err(AnfError::config("location is required"));
        }

        if !is_valid_account_name(&self.account_name) {
            return Err(AnfError::invalid_resource_name(&self.account_name));
        }
        if !is_valid_child_resource_name(&self.pool_name) {
            return Err(AnfError::invalid_resource_name(&self.pool_name));
        }
        if !is_valid_child_resource_name(&self.volume_name) {
            return Err(AnfError::invalid_resource_name(&self.volume_name));
        }

        self.service_level()?;
        validate_pool_size(self.pool_size)?;
        validate_volume_size(self.volume_size)?;

        if self.smb.domain_join_username.trim().is_empty() {
            return Err(AnfError::config("smb.domain_join_username is required"));
        }
        if self.smb.ad_fqdn.trim().is_empty() {
            return Err(AnfError::config("smb.ad_fqdn is required"));
        }
        validate_dns_list(&self.smb.dns_list)?;
        if !is_valid_smb_server_prefix(&self.smb.smb_server_name_prefix) {
            return Err(AnfError::config(format!(
                "smb.smb_server_name_prefix '{}' is invalid (max 10 alphanumeric/hyphen characters)",
                self.smb.smb_server_name_prefix
            )));
        }

        Ok(())
    }
}

/// Load configuration from file (explicit path or the default location),
/// apply environment-variable overrides, and validate.
pub async fn load_config(path: Option<&Path>) -> Result<Config> {
    let mut config = Config::default();

    let config_path = match path {
        Some(p) => p.to_path_buf(),
        None => Config::get_config_path()?,
    };

    if config_path.exists() {
        config = load_from_file(&config_path).await?;
    } else if path.is_some() {
        return Err(AnfError::config(format!(
            "Configuration file not found: {}",
            config_path.display()
        )));
    }

    load_from_env(&mut config);
    config.validate()?;

    Ok(config)
}

async fn load_from_file(path: &Path) -> Result<Config> {
    let contents = tokio::fs::read_to_string(path).await?;

    let config = toml::from_str::<Config>(&contents)
        .map_err(|e| AnfError::config(format!("Invalid configuration file: {}", e)))?;
    Ok(config)
}

fn load_from_env(config: &mut Config) {
    if let Ok(value) = std::env::var("DEBUG") {
        config.debug = value.to_lowercase() == "true" || value == "1";
    }

    if let Ok(value) = std::env::var("AZURE_SUBSCRIPTION_ID") {
        config.subscription_id = value;
    }

    if let Ok(value) = std::env::var("AZURE_TENANT_ID") {
        config.tenant_id = value;
    }

    if let Ok(value) = std::env::var("ANF_RESOURCE_GROUP") {
        config.resource_group = value;
    }

    if let Ok(value) = std::env::var("ANF_LOCATION") {
        config.location = value;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_config() -> Config {
        Config {
            subscription_id: "12345678-1234-1234-1234-123456789abc".to_string(),
            resource_group: "anf-rg".to_string(),
            vnet_name: "anf-vnet".to_string(),
            subnet_name: "anf-subnet".to_string(),
            ..Config::default()
        }
    }

    #[test]
    fn test_default_config_fails_validation() {
        // No subscription id by default
        assert!(Config::default().validate().is_err());
    }

    #[test]
    fn test_valid_config_passes_validation() {
        assert!(valid_config().validate().is_ok());
    }

    #[test]
    fn test_subnet_id_shape() {
        let config = valid_config();
        let subnet_id = config.subnet_id();
        assert!(subnet_id.starts_with("/subscriptions/12345678-1234-1234-1234-123456789abc"));
        assert!(subnet_id.contains("/virtualNetworks/anf-vnet/subnets/anf-subnet"));
    }

    #[test]
    fn test_invalid_service_level_rejected() {
        let mut config = valid_config();
        config.pool_service_level = "Basic".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_undersized_pool_rejected() {
        let mut config = valid_config();
        config.pool_size = 1024;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_toml_parses_with_defaults() {
        let toml_str = r#"
            subscription_id = "12345678-1234-1234-1234-123456789abc"
            resource_group = "anf-rg"
            vnet_name = "anf-vnet"
            subnet_name = "anf-subnet"

            [smb]
            ad_fqdn = "corp.example.com"
        "#;

        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.smb.ad_fqdn, "corp.example.com");
        // Unspecified fields fall back to defaults
        assert_eq!(config.pool_service_level, "Standard");
        assert_eq!(config.pool_size, MIN_POOL_SIZE_BYTES);
        assert!(config.validate().is_ok());
    }
}
