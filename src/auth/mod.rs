//! Authentication module for Azure services
//!
//! This module provides authentication capabilities for the Azure Resource
//! Manager using various authentication methods including
//! DefaultAzureCredential and service-principal client secrets.

pub mod provider;

pub use provider::*;
