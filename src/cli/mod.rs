use anyhow::Result;
use clap::{Parser, Subcommand};
use simplelog::info;

use crate::cli::browse::BrowseArgs;
use crate::cli::config::CliConfig;
use crate::cli::details::DetailsArgs;
use crate::cli::favorites::CliFavorites;
use crate::cli::genres::GenresArgs;
use crate::config::{self as app_config, Config};
use crate::state::AppState;

mod browse;
mod config;
mod details;
mod favorites;
mod genres;

#[derive(PartialEq, Parser)]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Directory holding `config.json`
    #[arg(long, global = true, env = "MARQUEE_CONFIG_DIR")]
    pub config_directory: Option<String>,

    #[command(subcommand)]
    pub commands: Commands,
}

#[derive(PartialEq, Subcommand)]
pub enum Commands {
    /// Browse movies or TV shows by genre
    Browse(BrowseArgs),
    /// Show details for a single movie or TV show
    Details(DetailsArgs),
    /// Manage favorites
    Favorites(CliFavorites),
    /// List the built-in genres
    Genres(GenresArgs),
    /// Manage the configuration file
    Config(CliConfig),
}

pub async fn run_cli_command(cli: Cli) -> Result<()> {
    let config_directory = cli.config_directory.as_deref();

    match cli.commands {
        Commands::Config(cfg) => config::run_config_cmd(cfg, config_directory).await?,
        Commands::Genres(args) => genres::run_genres_cmd(args),
        Commands::Browse(args) => {
            let app_state = initialize_state(config_directory).await?;
            browse::run_browse_cmd(args, &app_state).await?
        }
        Commands::Details(args) => {
            let app_state = initialize_state(config_directory).await?;
            details::run_details_cmd(args, &app_state).await?
        }
        Commands::Favorites(favorites) => {
            let app_state = initialize_state(config_directory).await?;
            favorites::run_favorites_cmd(favorites, &app_state).await?
        }
    }

    Ok(())
}

/// Loads the config, running the setup wizard first when there is none
async fn initialize_state(config_directory: Option<&str>) -> Result<AppState> {
    let config = if app_config::have_config(config_directory)
        || std::env::var("TMDB_API_KEY").is_ok()
    {
        Config::load_config(config_directory).await?
    } else {
        let config = app_config::build_config_wizard().await?;
        config.save_config(config_directory).await?;
        info!("Configuration created");
        config
    };

    AppState::initialize(&config).await
}

#[cfg(test)]
mod cli_tests {
    use clap::CommandFactory;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::catalog::sort::SortOption;
    use crate::catalog::MediaType;

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_browse() {
        let cli = Cli::try_parse_from([
            "marquee",
            "browse",
            "--media-type",
            "tv",
            "--genre",
            "18",
            "--sort",
            "release_date",
        ])
        .unwrap();

        match cli.commands {
            Commands::Browse(args) => {
                assert_eq!(Some(MediaType::Tv), args.media_type);
                assert_eq!(Some(18), args.genre);
                assert_eq!(Some(SortOption::ReleaseDate), args.sort);
            }
            _ => panic!("expected the browse command"),
        }
    }

    #[test]
    fn test_parse_rejects_unknown_media_type() {
        let result = Cli::try_parse_from(["marquee", "details", "550", "--media-type", "person"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_rejects_zero_genre() {
        let result = Cli::try_parse_from(["marquee", "browse", "--genre", "0"]);
        assert!(result.is_err());
    }
}
