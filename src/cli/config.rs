use anyhow::Result;
use clap::{Args, Subcommand};
use simplelog::info;

use crate::config::{self as app_config, Config as AppConfig};

#[derive(Args, Debug, PartialEq)]
pub struct CliConfig {
    #[command(subcommand)]
    config_cmds: ConfigCmds,
}

#[derive(Debug, PartialEq, Subcommand)]
enum ConfigCmds {
    /// Create the config file. Runs the setup wizard when no API key is given.
    Create(CreateArgs),
    /// Print the current configuration
    Read,
    /// Change individual settings
    Update(UpdateArgs),
}

#[derive(Args, Debug, PartialEq)]
struct CreateArgs {
    #[arg(long)]
    tmdb_api_key: Option<String>,
    #[arg(long)]
    tmdb_base_url: Option<String>,
    #[arg(long)]
    data_directory: Option<String>,
}

#[derive(Args, Debug, PartialEq)]
struct UpdateArgs {
    #[arg(long)]
    tmdb_api_key: Option<String>,
    #[arg(long)]
    tmdb_base_url: Option<String>,
    #[arg(long)]
    data_directory: Option<String>,
}

pub async fn run_config_cmd(cfg: CliConfig, config_directory: Option<&str>) -> Result<()> {
    match cfg.config_cmds {
        ConfigCmds::Create(cmd) => {
            let new_config = match cmd.tmdb_api_key {
                Some(api_key) => {
                    let mut config = AppConfig::default().tmdb_api_key(api_key);
                    if let Some(base_url) = cmd.tmdb_base_url {
                        config = config.tmdb_base_url(base_url);
                    }
                    config.data_directory(cmd.data_directory).validate()?
                }
                None => app_config::build_config_wizard().await?,
            };

            new_config.save_config(config_directory).await?;
            println!("{new_config}");
        }
        ConfigCmds::Read => {
            let config = AppConfig::load_config(config_directory).await?;
            println!("{config}");
        }
        ConfigCmds::Update(args) => {
            let mut config = AppConfig::load_config(config_directory).await?;

            if let Some(api_key) = args.tmdb_api_key {
                config = config.tmdb_api_key(api_key);
            }
            if let Some(base_url) = args.tmdb_base_url {
                config = config.tmdb_base_url(base_url);
            }
            if args.data_directory.is_some() {
                config = config.data_directory(args.data_directory);
            }

            let config = config.validate()?;
            config.save_config(config_directory).await?;
            info!("Configuration updated");
            println!("{config}");
        }
    }

    Ok(())
}
