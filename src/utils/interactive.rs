//! Interactive input utilities for user prompts
//!
//! This module provides utilities for interactive command-line
//! experiences: confirmations, secret prompts, and progress indicators
//! for long-running operations.

use crate::error::{AnfError, Result};
use dialoguer::{theme::ColorfulTheme, Confirm};
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;
use zeroize::Zeroizing;

/// Prompt for yes/no confirmation with a default value
pub fn confirm(message: &str, default: bool) -> Result<bool> {
    let result = Confirm::with_theme(&ColorfulTheme::default())
        .with_prompt(message)
        .default(default)
        .interact()
        .map_err(|e| AnfError::config(format!("Failed to get user input: {e}")))?;
    Ok(result)
}

/// Prompt for the Active Directory domain-join password.
///
/// The password never touches the configuration file; it lives only in a
/// zeroizing buffer for the duration of the run.
pub fn prompt_domain_join_password(username: &str) -> Result<Zeroizing<String>> {
    let password = rpassword::prompt_password(format!(
        "Enter Active Directory password for domain-join user '{username}': "
    ))?;
    Ok(Zeroizing::new(password))
}

/// Progress indicator for long-running operations
pub struct ProgressIndicator {
    bar: ProgressBar,
}

impl ProgressIndicator {
    /// Create a new progress indicator
    pub fn new(message: &str) -> Self {
        let bar = ProgressBar::new_spinner();
        bar.set_style(
            ProgressStyle::default_spinner()
                .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ ")
                .template("{spinner:.blue} {msg}")
                .expect("Progress bar template should be valid"),
        );
        bar.set_message(message.to_string());
        bar.enable_steady_tick(Duration::from_millis(100));

        Self { bar }
    }

    /// Finish with error message
    pub fn finish_error(&self, message: &str) {
        self.bar.finish_with_message(format!("✗ {message}"));
    }

    /// Finish and clear the progress indicator
    pub fn finish_clear(&self) {
        self.bar.finish_and_clear();
    }
}
