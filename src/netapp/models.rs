//! NetApp Files data models and types
//!
//! This module defines the data structures used for Azure NetApp Files
//! management including accounts, capacity pools, volumes, and the
//! Active Directory settings an SMB volume requires.

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tabled::Tabled;

use crate::error::{AnfError, Result};

/// Minimum capacity pool size: 4 TiB
pub const MIN_POOL_SIZE_BYTES: u64 = 4_398_046_511_104;

/// Minimum volume size: 100 GiB
pub const MIN_VOLUME_SIZE_BYTES: u64 = 107_374_182_400;

/// Maximum length of the SMB server name prefix. The domain join process
/// appends a random suffix, so ARM rejects anything longer.
pub const MAX_SMB_SERVER_PREFIX_LEN: usize = 10;

/// Display function for Option<String> in tables
fn display_option(opt: &Option<String>) -> String {
    match opt {
        Some(value) => value.clone(),
        None => "-".to_string(),
    }
}

/// ANF service level for pools and volumes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ServiceLevel {
    Standard,
    Premium,
    Ultra,
}

impl ServiceLevel {
    /// ARM wire representation
    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceLevel::Standard => "Standard",
            ServiceLevel::Premium => "Premium",
            ServiceLevel::Ultra => "Ultra",
        }
    }
}

impl FromStr for ServiceLevel {
    type Err = AnfError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "standard" => Ok(ServiceLevel::Standard),
            "premium" => Ok(ServiceLevel::Premium),
            "ultra" => Ok(ServiceLevel::Ultra),
            _ => Err(AnfError::invalid_argument(format!(
                "Invalid service level '{}': expected Standard, Premium, or Ultra",
                s
            ))),
        }
    }
}

impl std::fmt::Display for ServiceLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// ARM provisioning state of a NetApp resource
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProvisioningState {
    Creating,
    Updating,
    Deleting,
    Moving,
    Succeeded,
    Failed,
    Unknown(String),
}

impl ProvisioningState {
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "creating" => ProvisioningState::Creating,
            "updating" => ProvisioningState::Updating,
            "deleting" => ProvisioningState::Deleting,
            "moving" => ProvisioningState::Moving,
            "succeeded" => ProvisioningState::Succeeded,
            "failed" => ProvisioningState::Failed,
            _ => ProvisioningState::Unknown(s.to_string()),
        }
    }

    /// Terminal states stop the provisioning-state poll
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            ProvisioningState::Succeeded | ProvisioningState::Failed
        )
    }
}

impl std::fmt::Display for ProvisioningState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProvisioningState::Creating => write!(f, "Creating"),
            ProvisioningState::Updating => write!(f, "Updating"),
            ProvisioningState::Deleting => write!(f, "Deleting"),
            ProvisioningState::Moving => write!(f, "Moving"),
            ProvisioningState::Succeeded => write!(f, "Succeeded"),
            ProvisioningState::Failed => write!(f, "Failed"),
            ProvisioningState::Unknown(s) => write!(f, "{}", s),
        }
    }
}

/// Active Directory settings attached to a NetApp account.
///
/// These drive the domain join of the SMB server that fronts the volume.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveDirectory {
    pub username: String,
    pub password: String,
    /// Comma-separated list of DNS server addresses
    pub dns: String,
    /// Fully qualified Active Directory domain name
    pub domain: String,
    /// SMB server name prefix (max 10 characters)
    pub smb_server_name: String,
}

/// Azure NetApp Files account
#[derive(Debug, Clone, Serialize, Deserialize, Tabled)]
pub struct NetAppAccount {
    #[tabled(rename = "ID")]
    pub id: String,
    #[tabled(rename = "Name")]
    pub name: String,
    #[tabled(rename = "Location")]
    pub location: String,
    #[tabled(rename = "State")]
    pub provisioning_state: ProvisioningState,
    #[tabled(skip)]
    pub active_directories: Vec<ActiveDirectory>,
}

/// Capacity pool under a NetApp account
#[derive(Debug, Clone, Serialize, Deserialize, Tabled)]
pub struct CapacityPool {
    #[tabled(rename = "ID")]
    pub id: String,
    #[tabled(rename = "Name")]
    pub name: String,
    #[tabled(rename = "Location")]
    pub location: String,
    #[tabled(rename = "Service Level")]
    pub service_level: ServiceLevel,
    #[tabled(rename = "Size (bytes)")]
    pub size: u64,
    #[tabled(rename = "State")]
    pub provisioning_state: ProvisioningState,
}

/// Mount target exposed by a volume
#[derive(Debug, Clone, Serialize, Deserialize, Tabled)]
pub struct MountTarget {
    #[tabled(rename = "IP Address", display_with = "display_option")]
    pub ip_address: Option<String>,
    #[tabled(rename = "SMB Server FQDN", display_with = "display_option")]
    pub smb_server_fqdn: Option<String>,
}

/// Volume under a capacity pool
#[derive(Debug, Clone, Serialize, Deserialize, Tabled)]
pub struct Volume {
    #[tabled(rename = "ID")]
    pub id: String,
    #[tabled(rename = "Name")]
    pub name: String,
    #[tabled(rename = "Location")]
    pub location: String,
    #[tabled(rename = "Service Level")]
    pub service_level: ServiceLevel,
    #[tabled(skip)]
    pub creation_token: String,
    #[tabled(skip)]
    pub subnet_id: String,
    #[tabled(rename = "Quota (bytes)")]
    pub usage_threshold: u64,
    #[tabled(skip)]
    pub protocol_types: Vec<String>,
    #[tabled(rename = "State")]
    pub provisioning_state: ProvisioningState,
    #[tabled(skip)]
    pub mount_targets: Vec<MountTarget>,
}

impl Volume {
    /// FQDN of the first mount target's SMB server, once the domain join
    /// has completed
    pub fn smb_server_fqdn(&self) -> Option<&str> {
        self.mount_targets
            .iter()
            .find_map(|mt| mt.smb_server_fqdn.as_deref())
    }
}

/// Account creation parameters
#[derive(Debug, Clone)]
pub struct AccountCreateRequest {
    pub location: String,
    pub active_directory: Option<ActiveDirectory>,
}

/// Capacity pool creation parameters
#[derive(Debug, Clone)]
pub struct PoolCreateRequest {
    pub location: String,
    pub service_level: ServiceLevel,
    pub size: u64,
}

/// Volume creation parameters
#[derive(Debug, Clone)]
pub struct VolumeCreateRequest {
    pub location: String,
    pub service_level: ServiceLevel,
    pub creation_token: String,
    pub subnet_id: String,
    pub usage_threshold: u64,
    pub protocol_types: Vec<String>,
}

impl VolumeCreateRequest {
    /// Build an SMB/CIFS volume request. The creation token (mount path
    /// component) mirrors the volume name.
    pub fn smb(
        location: String,
        service_level: ServiceLevel,
        volume_name: &str,
        subnet_id: String,
        usage_threshold: u64,
    ) -> Self {
        Self {
            location,
            service_level,
            creation_token: volume_name.to_string(),
            subnet_id,
            usage_threshold,
            protocol_types: vec!["CIFS".to_string()],
        }
    }
}

/// Resource summary row for the `show` command
#[derive(Debug, Clone, Serialize, Deserialize, Tabled)]
pub struct ResourceSummary {
    #[tabled(rename = "Resource")]
    pub kind: String,
    #[tabled(rename = "Name")]
    pub name: String,
    #[tabled(rename = "State")]
    pub state: String,
    #[tabled(rename = "Details")]
    pub details: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_level_parse() {
        assert_eq!(
            "Standard".parse::<ServiceLevel>().unwrap(),
            ServiceLevel::Standard
        );
        assert_eq!(
            "premium".parse::<ServiceLevel>().unwrap(),
            ServiceLevel::Premium
        );
        assert_eq!("ULTRA".parse::<ServiceLevel>().unwrap(), ServiceLevel::Ultra);
        assert!("basic".parse::<ServiceLevel>().is_err());
        assert!("".parse::<ServiceLevel>().is_err());
    }

    #[test]
    fn test_provisioning_state_terminal() {
        assert!(ProvisioningState::parse("Succeeded").is_terminal());
        assert!(ProvisioningState::parse("Failed").is_terminal());
        assert!(!ProvisioningState::parse("Creating").is_terminal());
        assert!(!ProvisioningState::parse("Deleting").is_terminal());
        assert!(!ProvisioningState::parse("Patching").is_terminal());
    }

    #[test]
    fn test_smb_volume_request_defaults() {
        let request = VolumeCreateRequest::smb(
            "eastus".to_string(),
            ServiceLevel::Standard,
            "anf-vol1",
            "/subscriptions/s/resourceGroups/rg/providers/Microsoft.Network/virtualNetworks/vnet/subnets/default".to_string(),
            MIN_VOLUME_SIZE_BYTES,
        );

        assert_eq!(request.creation_token, "anf-vol1");
        assert_eq!(request.protocol_types, vec!["CIFS".to_string()]);
        assert_eq!(request.usage_threshold, MIN_VOLUME_SIZE_BYTES);
    }

    #[test]
    fn test_smb_server_fqdn_lookup() {
        let volume = Volume {
            id: "/id".to_string(),
            name: "vol".to_string(),
            location: "eastus".to_string(),
            service_level: ServiceLevel::Standard,
            creation_token: "vol".to_string(),
            subnet_id: "/subnet".to_string(),
            usage_threshold: MIN_VOLUME_SIZE_BYTES,
            protocol_types: vec!["CIFS".to_string()],
            provisioning_state: ProvisioningState::Succeeded,
            mount_targets: vec![
                MountTarget {
                    ip_address: Some("10.0.2.10".to_string()),
                    smb_server_fqdn: None,
                },
                MountTarget {
                    ip_address: Some("10.0.2.11".to_string()),
                    smb_server_fqdn: Some("testsmb-abcd.testdomain.local".to_string()),
                },
            ],
        };

        assert_eq!(
            volume.smb_server_fqdn(),
            Some("testsmb-abcd.testdomain.local")
        );
    }
}
