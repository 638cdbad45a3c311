//! anfcli - Azure NetApp Files Provisioning Tool
//!
//! A command-line tool for provisioning Azure NetApp Files resources
//! (account, capacity pool, SMB volume) and tearing them down again.

pub mod auth;
pub mod cli;
pub mod config;
pub mod error;
pub mod netapp;
pub mod utils;

// Re-export commonly used types
pub use error::{AnfError, Result};
