//! Authentication provider trait and implementations
//!
//! This module defines the authentication provider trait and provides
//! implementations for various Azure authentication methods.

use crate::error::{AnfError, Result};
use async_trait::async_trait;
use azure_core::auth::{AccessToken, TokenCredential};
use azure_identity::{ClientSecretCredential, DefaultAzureCredential, TokenCredentialOptions};
use serde::Deserialize;
use std::path::Path;
use std::sync::Arc;

/// Scope for Azure Resource Manager tokens
pub const MANAGEMENT_SCOPE: &str = "https://management.azure.com/.default";

/// Trait for Azure authentication providers
#[async_trait]
pub trait AzureAuthProvider: Send + Sync {
    /// Get an access token for the specified scopes
    async fn get_token(&self, scopes: &[&str]) -> Result<AccessToken>;

    /// Get the tenant ID, if the provider knows it
    fn tenant_id(&self) -> Option<&str>;

    /// Get the underlying token credential for Azure SDK usage
    fn get_token_credential(&self) -> Arc<dyn TokenCredential>;
}

/// Default Azure Credential Provider using DefaultAzureCredential
pub struct DefaultAzureCredentialProvider {
    credential: Arc<DefaultAzureCredential>,
    tenant_id: Option<String>,
}

impl DefaultAzureCredentialProvider {
    /// Create a new DefaultAzureCredentialProvider
    pub fn new() -> Result<Self> {
        let credential = Arc::new(
            DefaultAzureCredential::create(TokenCredentialOptions::default()).map_err(|e| {
                AnfError::authentication(format!("Failed to create DefaultAzureCredential: {}", e))
            })?,
        );

        Ok(Self {
            credential,
            tenant_id: None,
        })
    }

    /// Create a new DefaultAzureCredentialProvider pinned to a tenant
    pub fn with_tenant(tenant_id: String) -> Result<Self> {
        let credential = Arc::new(
            DefaultAzureCredential::create(TokenCredentialOptions::default()).map_err(|e| {
                AnfError::authentication(format!("Failed to create DefaultAzureCredential: {}", e))
            })?,
        );

        Ok(Self {
            credential,
            tenant_id: Some(tenant_id),
        })
    }
}

#[async_trait]
impl AzureAuthProvider for DefaultAzureCredentialProvider {
    async fn get_token(&self, scopes: &[&str]) -> Result<AccessToken> {
        let token_response = self
            .credential
            .get_token(scopes)
            .await
            .map_err(|e| AnfError::authentication(format!("Failed to get token: {}", e)))?;

        Ok(token_response)
    }

    fn tenant_id(&self) -> Option<&str> {
        self.tenant_id.as_deref()
    }

    fn get_token_credential(&self) -> Arc<dyn TokenCredential> {
        self.credential.clone()
    }
}

/// Service-principal auth file contents, the format written by
/// `az ad sp create-for-rbac --sdk-auth` and pointed to by AZURE_AUTH_LOCATION.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthFile {
    pub client_id: String,
    pub client_secret: String,
    pub tenant_id: String,
    #[serde(default)]
    pub subscription_id: Option<String>,
    #[serde(default)]
    pub active_directory_endpoint_url: Option<String>,
}

impl AuthFile {
    /// Load an auth file from disk
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            AnfError::config(format!("Failed to read auth file {}: {}", path.display(), e))
        })?;
        let auth_file: AuthFile = serde_json::from_str(&contents)
            .map_err(|e| AnfError::config(format!("Invalid auth file format: {}", e)))?;
        Ok(auth_file)
    }

    /// Load the auth file pointed to by the AZURE_AUTH_LOCATION environment variable
    pub fn from_env() -> Result<Self> {
        let location = std::env::var("AZURE_AUTH_LOCATION").map_err(|_| {
            AnfError::config("AZURE_AUTH_LOCATION is not set; cannot locate auth file")
        })?;
        Self::load(Path::new(&location))
    }
}

/// Client Secret Authentication Provider
pub struct ClientSecretProvider {
    credential: Arc<ClientSecretCredential>,
    tenant_id: String,
}

impl ClientSecretProvider {
    /// Create a new ClientSecretProvider
    pub fn new(tenant_id: String, client_id: String, client_secret: String) -> Result<Self> {
        let authority = format!("https://login.microsoftonline.com/{}", tenant_id);
        let authority_url = url::Url::parse(&authority)
            .map_err(|e| AnfError::config(format!("Invalid authority URL: {}", e)))?;

        let http_client_arc = Arc::new(reqwest::Client::new());
        let credential = Arc::new(ClientSecretCredential::new(
            http_client_arc,
            authority_url,
            client_secret,
            tenant_id.clone(),
            client_id,
        ));

        Ok(Self {
            credential,
            tenant_id,
        })
    }

    /// Create a provider from a service-principal auth file
    pub fn from_auth_file(auth_file: &AuthFile) -> Result<Self> {
        Self::new(
            auth_file.tenant_id.clone(),
            auth_file.client_id.clone(),
            auth_file.client_secret.clone(),
        )
    }
}

#[async_trait]
impl AzureAuthProvider for ClientSecretProvider {
    async fn get_token(&self, scopes: &[&str]) -> Result<AccessToken> {
        let token_response = self
            .credential
            .get_token(scopes)
            .await
            .map_err(|e| AnfError::authentication(format!("Failed to get token: {}", e)))?;

        Ok(token_response)
    }

    fn tenant_id(&self) -> Option<&str> {
        Some(&self.tenant_id)
    }

    fn get_token_credential(&self) -> Arc<dyn TokenCredential> {
        self.credential.clone()
    }
}

/// Authentication provider factory
pub struct AuthProviderFactory;

impl AuthProviderFactory {
    /// Create an authentication provider based on the requested type.
    ///
    /// `auth-file` reads service-principal credentials from the file pointed
    /// to by AZURE_AUTH_LOCATION; everything else falls back to
    /// DefaultAzureCredential.
    pub fn create_provider(
        provider_type: &str,
        tenant_id: Option<&str>,
    ) -> Result<Arc<dyn AzureAuthProvider>> {
        match provider_type.to_lowercase().as_str() {
            "default" | "defaultazurecredential" => {
                if let Some(tenant_id) = tenant_id {
                    Ok(Arc::new(DefaultAzureCredentialProvider::with_tenant(
                        tenant_id.to_string(),
                    )?))
                } else {
                    Ok(Arc::new(DefaultAzureCredentialProvider::new()?))
                }
            }
            "auth-file" | "authfile" => {
                let auth_file = AuthFile::from_env()?;
                Ok(Arc::new(ClientSecretProvider::from_auth_file(&auth_file)?))
            }
            _ => Err(AnfError::config(format!(
                "Unsupported authentication provider: {}",
                provider_type
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_auth_file_parsing() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{
                "clientId": "11111111-1111-1111-1111-111111111111",
                "clientSecret": "secret-value",
                "tenantId": "22222222-2222-2222-2222-222222222222",
                "subscriptionId": "33333333-3333-3333-3333-333333333333"
            }}"#
        )
        .unwrap();

        let auth_file = AuthFile::load(file.path()).unwrap();
        assert_eq!(auth_file.client_id, "11111111-1111-1111-1111-111111111111");
        assert_eq!(auth_file.tenant_id, "22222222-2222-2222-2222-222222222222");
        assert_eq!(
            auth_file.subscription_id.as_deref(),
            Some("33333333-3333-3333-3333-333333333333")
        );
    }

    #[test]
    fn test_auth_file_missing_fields() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"clientId": "only-a-client-id"}}"#).unwrap();

        assert!(AuthFile::load(file.path()).is_err());
    }
}
