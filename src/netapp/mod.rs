//! Azure NetApp Files management module
//!
//! This module provides functionality for managing Azure NetApp Files
//! resources: accounts, capacity pools, and SMB volumes.

pub mod manager;
pub mod models;
pub mod operations;

pub use manager::*;
pub use models::*;
pub use operations::*;
