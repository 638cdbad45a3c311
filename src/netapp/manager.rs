//! Provisioning facade for the ANF resource chain
//!
//! This module drives the three-step provisioning sequence (account,
//! capacity pool, SMB volume) and the reverse-order teardown, combining
//! the ARM operations with console reporting.

use std::sync::Arc;

use super::models::{
    AccountCreateRequest, ActiveDirectory, PoolCreateRequest, ResourceSummary, VolumeCreateRequest,
};
use super::operations::{AzureNetAppOperations, NetAppOperations};
use crate::auth::provider::AzureAuthProvider;
use crate::config::Config;
use crate::error::Result;
use crate::utils::format::{DisplayUtils, TableFormatter};
use crate::utils::interactive::ProgressIndicator;

/// High-level provisioning manager
pub struct ProvisioningManager {
    netapp_ops: Arc<dyn NetAppOperations>,
    config: Config,
    display_utils: DisplayUtils,
    no_color: bool,
}

impl ProvisioningManager {
    /// Create a new provisioning manager
    pub fn new(auth_provider: Arc<dyn AzureAuthProvider>, config: Config) -> Result<Self> {
        let netapp_ops = Arc::new(AzureNetAppOperations::new(
            auth_provider,
            config.subscription_id.clone(),
        )?);

        Ok(Self::with_operations(netapp_ops, config))
    }

    /// Create a provisioning manager over an existing operations implementation
    pub fn with_operations(netapp_ops: Arc<dyn NetAppOperations>, config: Config) -> Self {
        let no_color = config.no_color;
        let display_utils = DisplayUtils::new(no_color);

        Self {
            netapp_ops,
            config,
            display_utils,
            no_color,
        }
    }

    /// Provision the account, capacity pool, and SMB volume in order,
    /// skipping any resource that already exists.
    pub async fn provision_all(&self, domain_join_password: &str) -> Result<()> {
        self.display_utils
            .print_header("Creating Azure NetApp Files resources")?;

        self.ensure_account(domain_join_password).await?;
        self.ensure_pool().await?;
        self.ensure_volume().await?;

        Ok(())
    }

    /// Delete the volume, capacity pool, and account in that order.
    /// Each deletion waits until ARM no longer reports the resource before
    /// the parent is touched. Missing resources are skipped.
    pub async fn teardown_all(&self) -> Result<()> {
        self.display_utils
            .print_header("Cleaning up Azure NetApp Files resources")?;

        let rg = &self.config.resource_group;
        let account = &self.config.account_name;
        let pool = &self.config.pool_name;
        let volume = &self.config.volume_name;

        self.display_utils
            .print_info(&format!("Deleting volume '{volume}'..."))?;
        let spinner = ProgressIndicator::new("Waiting for volume deletion...");
        match self.netapp_ops.delete_volume(rg, account, pool, volume).await {
            Ok(()) => {
                spinner.finish_clear();
                self.display_utils
                    .print_success(&format!("Volume '{volume}' successfully deleted"))?;
            }
            Err(e) if e.is_not_found() => {
                spinner.finish_clear();
                self.display_utils
                    .print_warning(&format!("Volume '{volume}' not found, skipping"))?;
            }
            Err(e) => {
                spinner.finish_error("Volume deletion failed");
                self.display_utils
                    .print_error(&format!("An error occurred while deleting volume: {e}"))?;
                return Err(e);
            }
        }

        self.display_utils
            .print_info(&format!("Deleting capacity pool '{pool}'..."))?;
        let spinner = ProgressIndicator::new("Waiting for capacity pool deletion...");
        match self.netapp_ops.delete_pool(rg, account, pool).await {
            Ok(()) => {
                spinner.finish_clear();
                self.display_utils
                    .print_success(&format!("Capacity pool '{pool}' successfully deleted"))?;
            }
            Err(e) if e.is_not_found() => {
                spinner.finish_clear();
                self.display_utils
                    .print_warning(&format!("Capacity pool '{pool}' not found, skipping"))?;
            }
            Err(e) => {
                spinner.finish_error("Capacity pool deletion failed");
                self.display_utils
                    .print_error(&format!("An error occurred while deleting capacity pool: {e}"))?;
                return Err(e);
            }
        }

        self.display_utils
            .print_info(&format!("Deleting NetApp account '{account}'..."))?;
        let spinner = ProgressIndicator::new("Waiting for account deletion...");
        match self.netapp_ops.delete_account(rg, account).await {
            Ok(()) => {
                spinner.finish_clear();
                self.display_utils
                    .print_success(&format!("NetApp account '{account}' successfully deleted"))?;
            }
            Err(e) if e.is_not_found() => {
                spinner.finish_clear();
                self.display_utils
                    .print_warning(&format!("NetApp account '{account}' not found, skipping"))?;
            }
            Err(e) => {
                spinner.finish_error("Account deletion failed");
                self.display_utils
                    .print_error(&format!("An error occurred while deleting account: {e}"))?;
                return Err(e);
            }
        }

        Ok(())
    }

    /// Display the current state of the three resources
    pub async fn show(&self) -> Result<Vec<ResourceSummary>> {
        let rg = &self.config.resource_group;
        let account = &self.config.account_name;
        let pool = &self.config.pool_name;
        let volume = &self.config.volume_name;

        let mut rows = Vec::new();

        match self.netapp_ops.get_account(rg, account).await {
            Ok(a) => rows.push(ResourceSummary {
                kind: "Account".to_string(),
                name: a.name.clone(),
                state: a.provisioning_state.to_string(),
                details: a.id.clone(),
            }),
            Err(e) if e.is_not_found() => rows.push(not_found_row("Account", account)),
            Err(e) => return Err(e),
        }

        match self.netapp_ops.get_pool(rg, account, pool).await {
            Ok(p) => rows.push(ResourceSummary {
                kind: "Capacity Pool".to_string(),
                name: p.name.clone(),
                state: p.provisioning_state.to_string(),
                details: format!("{} / {} bytes", p.service_level, p.size),
            }),
            Err(e) if e.is_not_found() => rows.push(not_found_row("Capacity Pool", pool)),
            Err(e) => return Err(e),
        }

        match self.netapp_ops.get_volume(rg, account, pool, volume).await {
            Ok(v) => {
                let details = match v.smb_server_fqdn() {
                    Some(fqdn) => format!("SMB server: {fqdn}"),
                    None => "SMB server FQDN not yet available".to_string(),
                };
                rows.push(ResourceSummary {
                    kind: "Volume".to_string(),
                    name: v.name.clone(),
                    state: v.provisioning_state.to_string(),
                    details,
                });
            }
            Err(e) if e.is_not_found() => rows.push(not_found_row("Volume", volume)),
            Err(e) => return Err(e),
        }

        let formatter = TableFormatter::new(self.no_color);
        let table_output = formatter.format_table(&rows)?;
        println!("{table_output}");

        Ok(rows)
    }

    async fn ensure_account(&self, domain_join_password: &str) -> Result<()> {
        let rg = &self.config.resource_group;
        let account = &self.config.account_name;

        self.display_utils
            .print_info(&format!("Creating NetApp account '{account}'..."))?;

        match self.netapp_ops.get_account(rg, account).await {
            Ok(_) => {
                self.display_utils.print_info("Account already exists")?;
                return Ok(());
            }
            Err(e) if e.is_not_found() => {}
            Err(e) => return Err(e),
        }

        let active_directory = ActiveDirectory {
            username: self.config.smb.domain_join_username.clone(),
            password: domain_join_password.to_string(),
            dns: self.config.smb.dns_list.clone(),
            domain: self.config.smb.ad_fqdn.clone(),
            smb_server_name: self.config.smb.smb_server_name_prefix.clone(),
        };

        let request = AccountCreateRequest {
            location: self.config.location.clone(),
            active_directory: Some(active_directory),
        };

        let spinner = ProgressIndicator::new("Waiting for account provisioning...");
        match self.netapp_ops.create_account(rg, account, &request).await {
            Ok(created) => {
                spinner.finish_clear();
                self.display_utils.print_success(&format!(
                    "Account successfully created, resource id: {}",
                    created.id
                ))?;
                Ok(())
            }
            Err(e) => {
                spinner.finish_error("Account provisioning failed");
                self.display_utils
                    .print_error(&format!("An error occurred while creating account: {e}"))?;
                Err(e)
            }
        }
    }

    async fn ensure_pool(&self) -> Result<()> {
        let rg = &self.config.resource_group;
        let account = &self.config.account_name;
        let pool = &self.config.pool_name;

        self.display_utils
            .print_info(&format!("Creating capacity pool '{pool}'..."))?;

        match self.netapp_ops.get_pool(rg, account, pool).await {
            Ok(_) => {
                self.display_utils.print_info("Capacity pool already exists")?;
                return Ok(());
            }
            Err(e) if e.is_not_found() => {}
            Err(e) => return Err(e),
        }

        let request = PoolCreateRequest {
            location: self.config.location.clone(),
            service_level: self.config.service_level()?,
            size: self.config.pool_size,
        };

        let spinner = ProgressIndicator::new("Waiting for capacity pool provisioning...");
        match self.netapp_ops.create_pool(rg, account, pool, &request).await {
            Ok(created) => {
                spinner.finish_clear();
                self.display_utils.print_success(&format!(
                    "Capacity pool successfully created, resource id: {}",
                    created.id
                ))?;
                Ok(())
            }
            Err(e) => {
                spinner.finish_error("Capacity pool provisioning failed");
                self.display_utils.print_error(&format!(
                    "An error occurred while creating capacity pool: {e}"
                ))?;
                Err(e)
            }
        }
    }

    async fn ensure_volume(&self) -> Result<()> {
        let rg = &self.config.resource_group;
        let account = &self.config.account_name;
        let pool = &self.config.pool_name;
        let volume = &self.config.volume_name;

        self.display_utils
            .print_info(&format!("Creating SMB volume '{volume}'..."))?;

        match self.netapp_ops.get_volume(rg, account, pool, volume).await {
            Ok(_) => {
                self.display_utils.print_info("Volume already exists")?;
                return Ok(());
            }
            Err(e) if e.is_not_found() => {}
            Err(e) => return Err(e),
        }

        let request = VolumeCreateRequest::smb(
            self.config.location.clone(),
            self.config.service_level()?,
            volume,
            self.config.subnet_id(),
            self.config.volume_size,
        );

        let spinner = ProgressIndicator::new("Waiting for volume provisioning...");
        match self
            .netapp_ops
            .create_volume(rg, account, pool, volume, &request)
            .await
        {
            Ok(created) => {
                spinner.finish_clear();
                self.display_utils.print_success(&format!(
                    "Volume successfully created, resource id: {}",
                    created.id
                ))?;
                match created.smb_server_fqdn() {
                    Some(fqdn) => self
                        .display_utils
                        .print_info(&format!("SMB server FQDN: {fqdn}"))?,
                    None => self
                        .display_utils
                        .print_warning("SMB server FQDN not reported yet")?,
                }
                Ok(())
            }
            Err(e) => {
                spinner.finish_error("Volume provisioning failed");
                self.display_utils
                    .print_error(&format!("An error occurred while creating volume: {e}"))?;
                Err(e)
            }
        }
    }
}

fn not_found_row(kind: &str, name: &str) -> ResourceSummary {
    ResourceSummary {
        kind: kind.to_string(),
        name: name.to_string(),
        state: "Not found".to_string(),
        details: "-".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AnfError;
    use crate::netapp::models::{
        CapacityPool, NetAppAccount, ProvisioningState, ServiceLevel, Volume,
        MIN_POOL_SIZE_BYTES, MIN_VOLUME_SIZE_BYTES,
    };
    use async_trait::async_trait;
    use std::collections::HashSet;
    use std::sync::Mutex;

    /// Scripted operations double: records call order and answers existence
    /// checks from a mutable set of present resources.
    #[derive(Default)]
    struct ScriptedNetAppOps {
        calls: Mutex<Vec<&'static str>>,
        existing: Mutex<HashSet<&'static str>>,
        fail_pool_create: bool,
    }

    impl ScriptedNetAppOps {
        fn with_existing(kinds: &[&'static str]) -> Self {
            Self {
                existing: Mutex::new(kinds.iter().copied().collect()),
                ..Self::default()
            }
        }

        fn record(&self, call: &'static str) {
            self.calls.lock().unwrap().push(call);
        }

        fn exists(&self, kind: &'static str) -> bool {
            self.existing.lock().unwrap().contains(kind)
        }

        fn insert(&self, kind: &'static str) {
            self.existing.lock().unwrap().insert(kind);
        }

        fn remove(&self, kind: &'static str) -> bool {
            self.existing.lock().unwrap().remove(kind)
        }

        fn calls(&self) -> Vec<&'static str> {
            self.calls.lock().unwrap().clone()
        }
    }

    fn sample_account() -> NetAppAccount {
        NetAppAccount {
            id: "/subscriptions/s/resourceGroups/rg/providers/Microsoft.NetApp/netAppAccounts/acc"
                .to_string(),
            name: "acc".to_string(),
            location: "eastus".to_string(),
            provisioning_state: ProvisioningState::Succeeded,
            active_directories: Vec::new(),
        }
    }

    fn sample_pool() -> CapacityPool {
        CapacityPool {
            id: "/subscriptions/s/resourceGroups/rg/providers/Microsoft.NetApp/netAppAccounts/acc/capacityPools/pool"
                .to_string(),
            name: "pool".to_string(),
            location: "eastus".to_string(),
            service_level: ServiceLevel::Standard,
            size: MIN_POOL_SIZE_BYTES,
            provisioning_state: ProvisioningState::Succeeded,
        }
    }

    fn sample_volume() -> Volume {
        Volume {
            id: "/subscriptions/s/resourceGroups/rg/providers/Microsoft.NetApp/netAppAccounts/acc/capacityPools/pool/volumes/vol"
                .to_string(),
            name: "vol".to_string(),
            location: "eastus".to_string(),
            service_level: ServiceLevel::Standard,
            creation_token: "vol".to_string(),
            subnet_id: "/subnet".to_string(),
            usage_threshold: MIN_VOLUME_SIZE_BYTES,
            protocol_types: vec!["CIFS".to_string()],
            provisioning_state: ProvisioningState::Succeeded,
            mount_targets: Vec::new(),
        }
    }

    #[async_trait]
    impl NetAppOperations for ScriptedNetAppOps {
        async fn get_account(&self, _rg: &str, account: &str) -> Result<NetAppAccount> {
            self.record("get_account");
            if self.exists("account") {
                Ok(sample_account())
            } else {
                Err(AnfError::account_not_found(account))
            }
        }

        async fn create_account(
            &self,
            _rg: &str,
            _account: &str,
            _request: &AccountCreateRequest,
        ) -> Result<NetAppAccount> {
            self.record("create_account");
            self.insert("account");
            Ok(sample_account())
        }

        async fn delete_account(&self, _rg: &str, account: &str) -> Result<()> {
            self.record("delete_account");
            if self.remove("account") {
                Ok(())
            } else {
                Err(AnfError::account_not_found(account))
            }
        }

        async fn get_pool(&self, _rg: &str, _account: &str, pool: &str) -> Result<CapacityPool> {
            self.record("get_pool");
            if self.exists("pool") {
                Ok(sample_pool())
            } else {
                Err(AnfError::pool_not_found(pool))
            }
        }

        async fn create_pool(
            &self,
            _rg: &str,
            _account: &str,
            _pool: &str,
            _request: &PoolCreateRequest,
        ) -> Result<CapacityPool> {
            self.record("create_pool");
            if self.fail_pool_create {
                return Err(AnfError::azure_api("HTTP 500: pool creation failed"));
            }
            self.insert("pool");
            Ok(sample_pool())
        }

        async fn delete_pool(&self, _rg: &str, _account: &str, pool: &str) -> Result<()> {
            self.record("delete_pool");
            if self.remove("pool") {
                Ok(())
            } else {
                Err(AnfError::pool_not_found(pool))
            }
        }

        async fn get_volume(
            &self,
            _rg: &str,
            _account: &str,
            _pool: &str,
            volume: &str,
        ) -> Result<Volume> {
            self.record("get_volume");
            if self.exists("volume") {
                Ok(sample_volume())
            } else {
                Err(AnfError::volume_not_found(volume))
            }
        }

        async fn create_volume(
            &self,
            _rg: &str,
            _account: &str,
            _pool: &str,
            _volume: &str,
            _request: &VolumeCreateRequest,
        ) -> Result<Volume> {
            self.record("create_volume");
            self.insert("volume");
            Ok(sample_volume())
        }

        async fn delete_volume(
            &self,
            _rg: &str,
            _account: &str,
            _pool: &str,
            volume: &str,
        ) -> Result<()> {
            self.record("delete_volume");
            if self.remove("volume") {
                Ok(())
            } else {
                Err(AnfError::volume_not_found(volume))
            }
        }
    }

    fn test_config() -> Config {
        Config {
            subscription_id: "12345678-1234-1234-1234-123456789abc".to_string(),
            resource_group: "anf-rg".to_string(),
            vnet_name: "anf-vnet".to_string(),
            subnet_name: "anf-subnet".to_string(),
            no_color: true,
            ..Config::default()
        }
    }

    fn manager_over(ops: Arc<ScriptedNetAppOps>) -> ProvisioningManager {
        ProvisioningManager::with_operations(ops, test_config())
    }

    #[tokio::test]
    async fn test_provision_creates_in_dependency_order() {
        let ops = Arc::new(ScriptedNetAppOps::default());
        let manager = manager_over(ops.clone());

        manager.provision_all("ad-password").await.unwrap();

        assert_eq!(
            ops.calls(),
            vec![
                "get_account",
                "create_account",
                "get_pool",
                "create_pool",
                "get_volume",
                "create_volume",
            ]
        );
    }

    #[tokio::test]
    async fn test_provision_skips_existing_resources() {
        let ops = Arc::new(ScriptedNetAppOps::with_existing(&["account", "pool"]));
        let manager = manager_over(ops.clone());

        manager.provision_all("ad-password").await.unwrap();

        // Existing account and pool are only existence-checked; the volume
        // is still created.
        assert_eq!(
            ops.calls(),
            vec!["get_account", "get_pool", "get_volume", "create_volume"]
        );
    }

    #[tokio::test]
    async fn test_provision_stops_after_failed_step() {
        let ops = Arc::new(ScriptedNetAppOps {
            fail_pool_create: true,
            ..ScriptedNetAppOps::default()
        });
        let manager = manager_over(ops.clone());

        let result = manager.provision_all("ad-password").await;

        assert!(matches!(result, Err(AnfError::AzureApiError(_))));
        // The volume step is never reached after the pool failure.
        assert_eq!(
            ops.calls(),
            vec!["get_account", "create_account", "get_pool", "create_pool"]
        );
    }

    #[tokio::test]
    async fn test_teardown_deletes_in_reverse_order() {
        let ops = Arc::new(ScriptedNetAppOps::with_existing(&[
            "account", "pool", "volume",
        ]));
        let manager = manager_over(ops.clone());

        manager.teardown_all().await.unwrap();

        assert_eq!(
            ops.calls(),
            vec!["delete_volume", "delete_pool", "delete_account"]
        );
    }

    #[tokio::test]
    async fn test_teardown_skips_missing_resources() {
        let ops = Arc::new(ScriptedNetAppOps::default());
        let manager = manager_over(ops.clone());

        // Nothing exists; every deletion reports not-found and is skipped
        // without aborting the sequence.
        manager.teardown_all().await.unwrap();

        assert_eq!(
            ops.calls(),
            vec!["delete_volume", "delete_pool", "delete_account"]
        );
    }

    #[test]
    fn test_not_found_row() {
        let row = not_found_row("Volume", "anf-vol");
        assert_eq!(row.kind, "Volume");
        assert_eq!(row.state, "Not found");
    }

    #[test]
    fn test_not_found_detection_covers_all_kinds() {
        assert!(AnfError::account_not_found("a").is_not_found());
        assert!(AnfError::pool_not_found("p").is_not_found());
        assert!(AnfError::volume_not_found("v").is_not_found());
        assert!(!AnfError::azure_api("HTTP 500").is_not_found());
    }
}
