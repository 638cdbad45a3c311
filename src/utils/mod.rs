//! Utility functions module
//!
//! This module contains various utility functions including table
//! formatting, network error classification, retry logic, and input
//! validation helpers.

pub mod format;
pub mod interactive;
pub mod network;
pub mod retry;
pub mod validate;

pub use format::*;
pub use interactive::*;
pub use network::*;
pub use retry::*;
pub use validate::*;
