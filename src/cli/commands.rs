//! CLI commands and argument parsing
//!
//! This module defines the command-line interface structure using clap,
//! including all commands, subcommands, and their arguments.

use crate::auth::provider::AuthProviderFactory;
use crate::config::Config;
use crate::error::Result;
use crate::netapp::ProvisioningManager;
use crate::utils::format::DisplayUtils;
use crate::utils::interactive;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "anf")]
#[command(about = "Provision Azure NetApp Files SMB volumes")]
#[command(version, author)]
pub struct Cli {
    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Path to the configuration file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Azure credential type to use (default, auth-file)
    #[arg(
        long,
        global = true,
        value_name = "TYPE",
        env = "AZURE_CREDENTIAL_TYPE",
        default_value = "default"
    )]
    pub credential_type: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create the NetApp account, capacity pool, and SMB volume
    Provision {
        /// Tear down all created resources after provisioning completes
        #[arg(long)]
        cleanup: bool,
    },
    /// Delete the volume, capacity pool, and account in reverse order
    Teardown {
        /// Skip the confirmation prompt
        #[arg(short, long)]
        force: bool,
    },
    /// Show the current state of the configured resources
    Show,
}

impl Cli {
    /// Execute the parsed command
    pub async fn execute(self, mut config: Config) -> Result<()> {
        if self.no_color {
            config.no_color = true;
        }
        if self.debug {
            config.debug = true;
        }

        let tenant_id = if config.tenant_id.is_empty() {
            None
        } else {
            Some(config.tenant_id.as_str())
        };
        let auth_provider = AuthProviderFactory::create_provider(&self.credential_type, tenant_id)?;

        let display = DisplayUtils::new(config.no_color);
        let manager = ProvisioningManager::new(auth_provider, config.clone())?;

        match self.command {
            Commands::Provision { cleanup } => {
                let password = interactive::prompt_domain_join_password(
                    &config.smb.domain_join_username,
                )?;

                manager.provision_all(&password).await?;

                if cleanup {
                    manager.teardown_all().await?;
                }

                display.print_success("Provisioning run completed")?;
                Ok(())
            }
            Commands::Teardown { force } => {
                if !force {
                    let proceed = interactive::confirm(
                        &format!(
                            "This will delete volume '{}', capacity pool '{}', and account '{}'. Continue?",
                            config.volume_name, config.pool_name, config.account_name
                        ),
                        false,
                    )?;
                    if !proceed {
                        display.print_info("Teardown cancelled")?;
                        return Ok(());
                    }
                }

                manager.teardown_all().await?;
                display.print_success("Teardown completed")?;
                Ok(())
            }
            Commands::Show => {
                manager.show().await?;
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_structure() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_provision_cleanup_flag() {
        let cli = Cli::parse_from(["anf", "provision", "--cleanup"]);
        match cli.command {
            Commands::Provision { cleanup } => assert!(cleanup),
            _ => panic!("expected provision command"),
        }
    }

    #[test]
    fn test_teardown_force_flag() {
        let cli = Cli::parse_from(["anf", "--no-color", "teardown", "--force"]);
        assert!(cli.no_color);
        match cli.command {
            Commands::Teardown { force } => assert!(force),
            _ => panic!("expected teardown command"),
        }
    }
}
