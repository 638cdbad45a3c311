//! Configuration management module
//!
//! This module handles configuration loading and validation from
//! configuration files, environment variables, and default values.

pub mod settings;

pub use settings::*;
