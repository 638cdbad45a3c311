//! Input validation helpers
//!
//! Validation for resource names, sizes, and the SMB/Active Directory
//! parameters before any call leaves for the management API.

use crate::error::{AnfError, Result};
use crate::netapp::models::{MAX_SMB_SERVER_PREFIX_LEN, MIN_POOL_SIZE_BYTES, MIN_VOLUME_SIZE_BYTES};

/// NetApp account names: start with a letter or digit, then letters,
/// digits, hyphens, or underscores, up to 128 characters.
pub fn is_valid_account_name(name: &str) -> bool {
    if name.is_empty() || name.len() > 128 {
        return false;
    }

    let mut chars = name.chars();
    let first = chars.next().unwrap();
    if !first.is_ascii_alphanumeric() {
        return false;
    }

    chars.all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

/// Capacity pool and volume names: start with a letter, then letters,
/// digits, hyphens, or underscores, up to 64 characters.
pub fn is_valid_child_resource_name(name: &str) -> bool {
    if name.is_empty() || name.len() > 64 {
        return false;
    }

    let mut chars = name.chars();
    let first = chars.next().unwrap();
    if !first.is_ascii_alphabetic() {
        return false;
    }

    chars.all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

/// SMB server name prefixes are limited to 10 characters because the
/// domain join appends a random suffix.
pub fn is_valid_smb_server_prefix(prefix: &str) -> bool {
    if prefix.is_empty() || prefix.len() > MAX_SMB_SERVER_PREFIX_LEN {
        return false;
    }

    prefix.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
}

/// Validate Azure subscription ID format (GUID)
pub fn validate_subscription_id(subscription_id: &str) -> Result<()> {
    if subscription_id.trim().is_empty() {
        return Err(AnfError::config("Subscription ID cannot be empty"));
    }

    let guid_pattern = regex::Regex::new(
        r"^[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}$",
    )?;

    if !guid_pattern.is_match(subscription_id.trim()) {
        return Err(AnfError::config(
            "Subscription ID must be a valid GUID format",
        ));
    }

    Ok(())
}

/// Validate the capacity pool size against the service minimum (4 TiB)
pub fn validate_pool_size(size: u64) -> Result<()> {
    if size < MIN_POOL_SIZE_BYTES {
        return Err(AnfError::invalid_argument(format!(
            "Capacity pool size {} is below the 4 TiB minimum ({} bytes)",
            size, MIN_POOL_SIZE_BYTES
        )));
    }
    Ok(())
}

/// Validate the volume size against the service minimum (100 GiB)
pub fn validate_volume_size(size: u64) -> Result<()> {
    if size < MIN_VOLUME_SIZE_BYTES {
        return Err(AnfError::invalid_argument(format!(
            "Volume size {} is below the 100 GiB minimum ({} bytes)",
            size, MIN_VOLUME_SIZE_BYTES
        )));
    }
    Ok(())
}

/// Validate a comma-separated DNS server list; every entry must be an
/// IPv4 address.
pub fn validate_dns_list(dns_list: &str) -> Result<()> {
    if dns_list.trim().is_empty() {
        return Err(AnfError::config("DNS server list cannot be empty"));
    }

    for entry in dns_list.split(',') {
        let entry = entry.trim();
        if entry.parse::<std::net::Ipv4Addr>().is_err() {
            return Err(AnfError::config(format!(
                "Invalid DNS server address '{}' in list '{}'",
                entry, dns_list
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_account_name_validation() {
        assert!(is_valid_account_name("anf-example-account"));
        assert!(is_valid_account_name("0account"));
        assert!(is_valid_account_name("a"));
        assert!(!is_valid_account_name(""));
        assert!(!is_valid_account_name("-starts-with-hyphen"));
        assert!(!is_valid_account_name("has space"));
        assert!(!is_valid_account_name(&"a".repeat(129)));
    }

    #[test]
    fn test_child_resource_name_validation() {
        assert!(is_valid_child_resource_name("anf-example-pool"));
        assert!(is_valid_child_resource_name("vol_1"));
        assert!(!is_valid_child_resource_name("1pool"));
        assert!(!is_valid_child_resource_name(""));
        assert!(!is_valid_child_resource_name(&"a".repeat(65)));
    }

    #[test]
    fn test_smb_prefix_validation() {
        assert!(is_valid_smb_server_prefix("testsmb"));
        assert!(is_valid_smb_server_prefix("a1-b2"));
        assert!(!is_valid_smb_server_prefix(""));
        assert!(!is_valid_smb_server_prefix("elevenchars"));
        assert!(!is_valid_smb_server_prefix("bad_char"));
    }

    #[test]
    fn test_subscription_id_validation() {
        assert!(validate_subscription_id("12345678-1234-1234-1234-123456789abc").is_ok());
        assert!(validate_subscription_id("").is_err());
        assert!(validate_subscription_id("not-a-guid").is_err());
    }

    #[test]
    fn test_size_validation() {
        assert!(validate_pool_size(MIN_POOL_SIZE_BYTES).is_ok());
        assert!(validate_pool_size(MIN_POOL_SIZE_BYTES - 1).is_err());
        assert!(validate_volume_size(MIN_VOLUME_SIZE_BYTES).is_ok());
        assert!(validate_volume_size(0).is_err());
    }

    #[test]
    fn test_dns_list_validation() {
        assert!(validate_dns_list("10.0.2.4,10.0.2.5").is_ok());
        assert!(validate_dns_list("10.0.2.4, 10.0.2.5").is_ok());
        assert!(validate_dns_list("10.0.2.4").is_ok());
        assert!(validate_dns_list("").is_err());
        assert!(validate_dns_list("10.0.2.4,not-an-ip").is_err());
    }
}
