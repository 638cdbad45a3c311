use thiserror::Error;

/// Main error type for anfcli operations
#[derive(Debug, Error)]
pub enum AnfError {
    #[error("Authentication failed: {0}")]
    AuthenticationError(String),

    #[error("Azure API error: {0}")]
    AzureApiError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("NetApp account not found: {name}")]
    AccountNotFound { name: String },

    #[error("Capacity pool not found: {name}")]
    PoolNotFound { name: String },

    #[error("Volume not found: {name}")]
    VolumeNotFound { name: String },

    #[error("Invalid resource name: {name}")]
    InvalidResourceName { name: String },

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Connection timed out: {0}")]
    ConnectionTimeout(String),

    #[error("Connection refused: {0}")]
    ConnectionRefused(String),

    #[error("SSL/TLS error: {0}")]
    SslError(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Provisioning failed: {0}")]
    ProvisioningFailed(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("HTTP request error: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Regex error: {0}")]
    RegexError(#[from] regex::Error),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Operation timeout")]
    Timeout,

    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl AnfError {
    pub fn authentication<S: Into<String>>(msg: S) -> Self {
        Self::AuthenticationError(msg.into())
    }

    pub fn azure_api<S: Into<String>>(msg: S) -> Self {
        Self::AzureApiError(msg.into())
    }

    pub fn config<S: Into<String>>(msg: S) -> Self {
        Self::ConfigError(msg.into())
    }

    pub fn account_not_found<S: Into<String>>(name: S) -> Self {
        Self::AccountNotFound { name: name.into() }
    }

    pub fn pool_not_found<S: Into<String>>(name: S) -> Self {
        Self::PoolNotFound { name: name.into() }
    }

    pub fn volume_not_found<S: Into<String>>(name: S) -> Self {
        Self::VolumeNotFound { name: name.into() }
    }

    pub fn invalid_resource_name<S: Into<String>>(name: S) -> Self {
        Self::InvalidResourceName { name: name.into() }
    }

    pub fn network<S: Into<String>>(msg: S) -> Self {
        Self::NetworkError(msg.into())
    }

    pub fn connection_timeout<S: Into<String>>(msg: S) -> Self {
        Self::ConnectionTimeout(msg.into())
    }

    pub fn connection_refused<S: Into<String>>(msg: S) -> Self {
        Self::ConnectionRefused(msg.into())
    }

    pub fn ssl_error<S: Into<String>>(msg: S) -> Self {
        Self::SslError(msg.into())
    }

    pub fn invalid_url<S: Into<String>>(msg: S) -> Self {
        Self::InvalidUrl(msg.into())
    }

    pub fn provisioning_failed<S: Into<String>>(msg: S) -> Self {
        Self::ProvisioningFailed(msg.into())
    }

    pub fn serialization<S: Into<String>>(msg: S) -> Self {
        Self::SerializationError(msg.into())
    }

    pub fn invalid_argument<S: Into<String>>(msg: S) -> Self {
        Self::InvalidArgument(msg.into())
    }

    pub fn unknown<S: Into<String>>(msg: S) -> Self {
        Self::Unknown(msg.into())
    }

    /// True for the typed not-found variants, regardless of resource kind.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::AccountNotFound { .. } | Self::PoolNotFound { .. } | Self::VolumeNotFound { .. }
        )
    }
}

/// Result type alias for anfcli operations
pub type Result<T> = std::result::Result<T, AnfError>;

/// Convert Azure Core errors to AnfError
impl From<azure_core::Error> for AnfError {
    fn from(error: azure_core::Error) -> Self {
        Self::AzureApiError(error.to_string())
    }
}
