//! NetApp Files operations implementation
//!
//! This module provides the Azure Resource Manager operations for NetApp
//! accounts, capacity pools, and volumes, including long-running-operation
//! polling and the deletion-confirmation poll ARM requires before a parent
//! resource can be removed.

use async_trait::async_trait;
use reqwest::{header::HeaderMap, Client};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use super::models::{
    AccountCreateRequest, CapacityPool, MountTarget, NetAppAccount, PoolCreateRequest,
    ProvisioningState, ServiceLevel, Volume, VolumeCreateRequest,
};
use crate::auth::provider::{AzureAuthProvider, MANAGEMENT_SCOPE};
use crate::error::{AnfError, Result};
use crate::utils::network::{classify_network_error, create_http_client, NetworkConfig};
use crate::utils::retry::{retry_with_backoff, RetryOptions};

/// ARM api-version for Microsoft.NetApp resources
const API_VERSION: &str = "2023-05-01";

/// Fixed interval between polls of a long-running operation
const POLL_INTERVAL: Duration = Duration::from_secs(10);

/// Maximum number of polls before giving up on an operation
const MAX_POLL_ATTEMPTS: usize = 60;

/// Trait for NetApp Files operations
#[async_trait]
pub trait NetAppOperations: Send + Sync {
    /// Get a NetApp account
    async fn get_account(&self, resource_group: &str, account: &str) -> Result<NetAppAccount>;

    /// Create a NetApp account and wait for provisioning to complete
    async fn create_account(
        &self,
        resource_group: &str,
        account: &str,
        request: &AccountCreateRequest,
    ) -> Result<NetAppAccount>;

    /// Delete a NetApp account and wait until ARM no longer reports it
    async fn delete_account(&self, resource_group: &str, account: &str) -> Result<()>;

    /// Get a capacity pool
    async fn get_pool(
        &self,
        resource_group: &str,
        account: &str,
        pool: &str,
    ) -> Result<CapacityPool>;

    /// Create a capacity pool and wait for provisioning to complete
    async fn create_pool(
        &self,
        resource_group: &str,
        account: &str,
        pool: &str,
        request: &PoolCreateRequest,
    ) -> Result<CapacityPool>;

    /// Delete a capacity pool and wait until ARM no longer reports it
    async fn delete_pool(&self, resource_group: &str, account: &str, pool: &str) -> Result<()>;

    /// Get a volume
    async fn get_volume(
        &self,
        resource_group: &str,
        account: &str,
        pool: &str,
        volume: &str,
    ) -> Result<Volume>;

    /// Create a volume and wait for provisioning to complete
    async fn create_volume(
        &self,
        resource_group: &str,
        account: &str,
        pool: &str,
        volume: &str,
        request: &VolumeCreateRequest,
    ) -> Result<Volume>;

    /// Delete a volume and wait until ARM no longer reports it
    async fn delete_volume(
        &self,
        resource_group: &str,
        account: &str,
        pool: &str,
        volume: &str,
    ) -> Result<()>;
}

/// Azure NetApp Files operations implementation over the ARM REST API
pub struct AzureNetAppOperations {
    auth_provider: Arc<dyn AzureAuthProvider>,
    http_client: Client,
    subscription_id: String,
}

impl AzureNetAppOperations {
    /// Create a new Azure NetApp operations instance
    pub fn new(auth_provider: Arc<dyn AzureAuthProvider>, subscription_id: String) -> Result<Self> {
        let network_config = NetworkConfig::default();
        let http_client = create_http_client(&network_config)?;

        Ok(Self {
            auth_provider,
            http_client,
            subscription_id,
        })
    }

    /// Get access token for Azure Resource Manager
    async fn get_management_token(&self) -> Result<String> {
        let token = self.auth_provider.get_token(&[MANAGEMENT_SCOPE]).await?;
        Ok(token.token.secret().to_string())
    }

    /// Create authorized headers for Azure REST API
    async fn create_headers(&self) -> Result<HeaderMap> {
        let token = self.get_management_token().await?;
        let mut headers = HeaderMap::new();
        headers.insert(
            "Authorization",
            format!("Bearer {}", token)
                .parse()
                .map_err(|e| AnfError::authentication(format!("Invalid token format: {}", e)))?,
        );
        headers.insert("Content-Type", "application/json".parse().unwrap());
        Ok(headers)
    }

    /// Build Azure Resource Manager URL
    fn build_arm_url(&self, path: &str) -> String {
        format!(
            "https://management.azure.com{}?api-version={}",
            path, API_VERSION
        )
    }

    /// Account ARM resource ID
    pub fn account_resource_id(&self, resource_group: &str, account: &str) -> String {
        format!(
            "/subscriptions/{}/resourceGroups/{}/providers/Microsoft.NetApp/netAppAccounts/{}",
            self.subscription_id, resource_group, account
        )
    }

    /// Capacity pool ARM resource ID
    pub fn pool_resource_id(&self, resource_group: &str, account: &str, pool: &str) -> String {
        format!(
            "{}/capacityPools/{}",
            self.account_resource_id(resource_group, account),
            pool
        )
    }

    /// Volume ARM resource ID
    pub fn volume_resource_id(
        &self,
        resource_group: &str,
        account: &str,
        pool: &str,
        volume: &str,
    ) -> String {
        format!(
            "{}/volumes/{}",
            self.pool_resource_id(resource_group, account, pool),
            volume
        )
    }

    /// Parse Azure error response
    fn parse_azure_error(&self, status: u16, body: &str) -> AnfError {
        if let Ok(error_json) = serde_json::from_str::<Value>(body) {
            if let Some(error) = error_json.get("error") {
                if let Some(message) = error.get("message").and_then(|m| m.as_str()) {
                    return AnfError::azure_api(format!("HTTP {}: {}", status, message));
                }
            }
        }
        AnfError::azure_api(format!("HTTP {}: {}", status, body))
    }

    /// Retry wrapper for transient ARM failures. Individual GET/PUT/DELETE
    /// calls are retried; the long-running-operation polls are not.
    async fn execute_with_retry<F, Fut, T>(&self, operation: F) -> Result<T>
    where
        F: Fn() -> Fut,
        Fut: std::future::Future<Output = Result<T>>,
    {
        let retry_options = RetryOptions {
            max_retries: 3,
            initial_interval: Duration::from_millis(1000),
            max_interval: Duration::from_millis(10000),
            multiplier: 2.0,
        };
        retry_with_backoff(operation, retry_options).await
    }

    /// GET a resource body; Ok(None) means ARM returned 404
    async fn get_resource_raw(&self, resource_path: &str) -> Result<Option<Value>> {
        let headers = self.create_headers().await?;
        let url = self.build_arm_url(resource_path);

        let response = self
            .http_client
            .get(&url)
            .headers(headers)
            .send()
            .await
            .map_err(|e| classify_network_error(&e, &url))?;

        if response.status().as_u16() == 404 {
            return Ok(None);
        }

        if !response.status().is_success() {
            let status_code = response.status().as_u16();
            let error_body = response.text().await.unwrap_or_default();
            return Err(self.parse_azure_error(status_code, &error_body));
        }

        let body: Value = response.json().await.map_err(|e| {
            AnfError::serialization(format!("Failed to parse resource response: {}", e))
        })?;

        Ok(Some(body))
    }

    /// PUT a resource body, accepting the 200/201/202 responses ARM uses
    /// for long-running creates
    async fn put_resource_raw(&self, resource_path: &str, body: &Value) -> Result<()> {
        let headers = self.create_headers().await?;
        let url = self.build_arm_url(resource_path);

        let response = self
            .http_client
            .put(&url)
            .headers(headers)
            .json(body)
            .send()
            .await
            .map_err(|e| classify_network_error(&e, &url))?;

        if !response.status().is_success() {
            let status_code = response.status().as_u16();
            let error_body = response.text().await.unwrap_or_default();
            return Err(self.parse_azure_error(status_code, &error_body));
        }

        Ok(())
    }

    /// DELETE a resource; 404 is surfaced as Ok(false)
    async fn delete_resource_raw(&self, resource_path: &str) -> Result<bool> {
        let headers = self.create_headers().await?;
        let url = self.build_arm_url(resource_path);

        let response = self
            .http_client
            .delete(&url)
            .headers(headers)
            .send()
            .await
            .map_err(|e| classify_network_error(&e, &url))?;

        if response.status().as_u16() == 404 {
            return Ok(false);
        }

        if !response.status().is_success() {
            let status_code = response.status().as_u16();
            let error_body = response.text().await.unwrap_or_default();
            return Err(self.parse_azure_error(status_code, &error_body));
        }

        Ok(true)
    }

    /// Poll a resource until its provisioning state is terminal.
    ///
    /// A transient 404 right after the PUT is tolerated and counted as one
    /// poll attempt.
    async fn wait_for_provisioning(&self, resource_path: &str) -> Result<()> {
        for attempt in 0..MAX_POLL_ATTEMPTS {
            if attempt > 0 {
                tokio::time::sleep(POLL_INTERVAL).await;
            }

            let body = match self.get_resource_raw(resource_path).await? {
                Some(body) => body,
                None => {
                    debug!(
                        "Resource {} not visible yet (attempt {})",
                        resource_path, attempt
                    );
                    continue;
                }
            };

            let state = provisioning_state(&body);
            debug!("Resource {} provisioning state: {}", resource_path, state);

            if state.is_terminal() {
                if state == ProvisioningState::Succeeded {
                    return Ok(());
                }
                return Err(AnfError::provisioning_failed(format!(
                    "Provisioning of {} ended in {} state",
                    resource_path, state
                )));
            }
        }

        Err(AnfError::Timeout)
    }

    /// Poll a resource until ARM stops reporting it. Deleting a parent
    /// before this observes a 404 fails with a conflict, even after the
    /// delete operation itself reports completion.
    async fn wait_until_gone(&self, resource_path: &str) -> Result<()> {
        for attempt in 0..MAX_POLL_ATTEMPTS {
            if attempt > 0 {
                tokio::time::sleep(POLL_INTERVAL).await;
            }

            if self.get_resource_raw(resource_path).await?.is_none() {
                return Ok(());
            }

            debug!(
                "Resource {} still present after deletion (attempt {})",
                resource_path, attempt
            );
        }

        Err(AnfError::Timeout)
    }
}

#[async_trait]
impl NetAppOperations for AzureNetAppOperations {
    async fn get_account(&self, resource_group: &str, account: &str) -> Result<NetAppAccount> {
        let path = self.account_resource_id(resource_group, account);
        let operation = || async {
            match self.get_resource_raw(&path).await? {
                Some(body) => parse_account(&body),
                None => Err(AnfError::account_not_found(account)),
            }
        };

        self.execute_with_retry(operation).await
    }

    async fn create_account(
        &self,
        resource_group: &str,
        account: &str,
        request: &AccountCreateRequest,
    ) -> Result<NetAppAccount> {
        let path = self.account_resource_id(resource_group, account);

        let mut properties = json!({});
        if let Some(ad) = &request.active_directory {
            properties = json!({ "activeDirectories": [ad] });
        }
        let body = json!({
            "location": request.location,
            "properties": properties,
        });

        let put = || async { self.put_resource_raw(&path, &body).await };
        self.execute_with_retry(put).await?;

        self.wait_for_provisioning(&path).await?;
        self.get_account(resource_group, account).await
    }

    async fn delete_account(&self, resource_group: &str, account: &str) -> Result<()> {
        let path = self.account_resource_id(resource_group, account);

        let delete = || async { self.delete_resource_raw(&path).await };
        if !self.execute_with_retry(delete).await? {
            return Err(AnfError::account_not_found(account));
        }

        self.wait_until_gone(&path).await
    }

    async fn get_pool(
        &self,
        resource_group: &str,
        account: &str,
        pool: &str,
    ) -> Result<CapacityPool> {
        let path = self.pool_resource_id(resource_group, account, pool);
        let operation = || async {
            match self.get_resource_raw(&path).await? {
                Some(body) => parse_pool(&body),
                None => Err(AnfError::pool_not_found(pool)),
            }
        };

        self.execute_with_retry(operation).await
    }

    async fn create_pool(
        &self,
        resource_group: &str,
        account: &str,
        pool: &str,
        request: &PoolCreateRequest,
    ) -> Result<CapacityPool> {
        let path = self.pool_resource_id(resource_group, account, pool);

        let body = json!({
            "location": request.location,
            "properties": {
                "serviceLevel": request.service_level.as_str(),
                "size": request.size,
            },
        });

        let put = || async { self.put_resource_raw(&path, &body).await };
        self.execute_with_retry(put).await?;

        self.wait_for_provisioning(&path).await?;
        self.get_pool(resource_group, account, pool).await
    }

    async fn delete_pool(&self, resource_group: &str, account: &str, pool: &str) -> Result<()> {
        let path = self.pool_resource_id(resource_group, account, pool);

        let delete = || async { self.delete_resource_raw(&path).await };
        if !self.execute_with_retry(delete).await? {
            return Err(AnfError::pool_not_found(pool));
        }

        self.wait_until_gone(&path).await
    }

    async fn get_volume(
        &self,
        resource_group: &str,
        account: &str,
        pool: &str,
        volume: &str,
    ) -> Result<Volume> {
        let path = self.volume_resource_id(resource_group, account, pool, volume);
        let operation = || async {
            match self.get_resource_raw(&path).await? {
                Some(body) => parse_volume(&body),
                None => Err(AnfError::volume_not_found(volume)),
            }
        };

        self.execute_with_retry(operation).await
    }

    async fn create_volume(
        &self,
        resource_group: &str,
        account: &str,
        pool: &str,
        volume: &str,
        request: &VolumeCreateRequest,
    ) -> Result<Volume> {
        let path = self.volume_resource_id(resource_group, account, pool, volume);

        let body = json!({
            "location": request.location,
            "properties": {
                "serviceLevel": request.service_level.as_str(),
                "creationToken": request.creation_token,
                "subnetId": request.subnet_id,
                "usageThreshold": request.usage_threshold,
                "protocolTypes": request.protocol_types,
            },
        });

        let put = || async { self.put_resource_raw(&path, &body).await };
        self.execute_with_retry(put).await?;

        self.wait_for_provisioning(&path).await?;
        self.get_volume(resource_group, account, pool, volume).await
    }

    async fn delete_volume(
        &self,
        resource_group: &str,
        account: &str,
        pool: &str,
        volume: &str,
    ) -> Result<()> {
        let path = self.volume_resource_id(resource_group, account, pool, volume);

        let delete = || async { self.delete_resource_raw(&path).await };
        if !self.execute_with_retry(delete).await? {
            return Err(AnfError::volume_not_found(volume));
        }

        self.wait_until_gone(&path).await
    }
}

/// Extract the provisioning state from an ARM resource body
fn provisioning_state(body: &Value) -> ProvisioningState {
    body.get("properties")
        .and_then(|p| p.get("provisioningState"))
        .and_then(|s| s.as_str())
        .map(ProvisioningState::parse)
        .unwrap_or(ProvisioningState::Unknown(String::new()))
}

/// ARM returns child resource names as "parent/child"; keep the last segment
fn leaf_name(body: &Value) -> String {
    body.get("name")
        .and_then(|n| n.as_str())
        .map(|n| n.rsplit('/').next().unwrap_or(n).to_string())
        .unwrap_or_default()
}

fn string_field(body: &Value, field: &str) -> String {
    body.get(field)
        .and_then(|v| v.as_str())
        .unwrap_or_default()
        .to_string()
}

fn service_level_field(properties: &Value) -> Result<ServiceLevel> {
    properties
        .get("serviceLevel")
        .and_then(|v| v.as_str())
        .ok_or_else(|| AnfError::serialization("Missing serviceLevel in resource response"))?
        .parse()
}

/// Parse an ARM NetApp account response
pub fn parse_account(body: &Value) -> Result<NetAppAccount> {
    let properties = body
        .get("properties")
        .ok_or_else(|| AnfError::serialization("Missing properties in account response"))?;

    let mut active_directories = Vec::new();
    if let Some(ad_array) = properties.get("activeDirectories").and_then(|v| v.as_array()) {
        for ad_value in ad_array {
            active_directories.push(super::models::ActiveDirectory {
                username: string_field(ad_value, "username"),
                // ARM never echoes the password back
                password: String::new(),
                dns: string_field(ad_value, "dns"),
                domain: string_field(ad_value, "domain"),
                smb_server_name: string_field(ad_value, "smbServerName"),
            });
        }
    }

    Ok(NetAppAccount {
        id: string_field(body, "id"),
        name: leaf_name(body),
        location: string_field(body, "location"),
        provisioning_state: provisioning_state(body),
        active_directories,
    })
}

/// Parse an ARM capacity pool response
pub fn parse_pool(body: &Value) -> Result<CapacityPool> {
    let properties = body
        .get("properties")
        .ok_or_else(|| AnfError::serialization("Missing properties in pool response"))?;

    Ok(CapacityPool {
        id: string_field(body, "id"),
        name: leaf_name(body),
        location: string_field(body, "location"),
        service_level: service_level_field(properties)?,
        size: properties.get("size").and_then(|v| v.as_u64()).unwrap_or(0),
        provisioning_state: provisioning_state(body),
    })
}

/// Parse an ARM volume response
pub fn parse_volume(body: &Value) -> Result<Volume> {
    let properties = body
        .get("properties")
        .ok_or_else(|| AnfError::serialization("Missing properties in volume response"))?;

    let mut mount_targets = Vec::new();
    if let Some(mt_array) = properties.get("mountTargets").and_then(|v| v.as_array()) {
        for mt_value in mt_array {
            mount_targets.push(MountTarget {
                ip_address: mt_value
                    .get("ipAddress")
                    .and_then(|v| v.as_str())
                    .map(|s| s.to_string()),
                smb_server_fqdn: mt_value
                    .get("smbServerFqdn")
                    .and_then(|v| v.as_str())
                    .map(|s| s.to_string()),
            });
        }
    }

    let protocol_types = properties
        .get("protocolTypes")
        .and_then(|v| v.as_array())
        .map(|arr| {
            arr.iter()
                .filter_map(|v| v.as_str().map(|s| s.to_string()))
                .collect()
        })
        .unwrap_or_default();

    Ok(Volume {
        id: string_field(body, "id"),
        name: leaf_name(body),
        location: string_field(body, "location"),
        service_level: service_level_field(properties)?,
        creation_token: properties
            .get("creationToken")
            .and_then(|v| v.as_str())
            .unwrap_or_default()
            .to_string(),
        subnet_id: properties
            .get("subnetId")
            .and_then(|v| v.as_str())
            .unwrap_or_default()
            .to_string(),
        usage_threshold: properties
            .get("usageThreshold")
            .and_then(|v| v.as_u64())
            .unwrap_or(0),
        protocol_types,
        provisioning_state: provisioning_state(body),
        mount_targets,
    })
}
