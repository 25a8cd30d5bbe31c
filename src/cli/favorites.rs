use anyhow::{anyhow, Result};
use clap::{Args, Subcommand};
use itertools::Itertools;
use simplelog::info;

use crate::catalog::MediaType;
use crate::cli::details::{load_details, toggle_favorite};
use crate::favorites::FavoriteEntry;
use crate::state::AppState;

#[derive(Args, Debug, PartialEq)]
pub struct CliFavorites {
    #[command(subcommand)]
    pub favorites_cmds: FavoritesAction,
}

#[derive(Debug, PartialEq, Subcommand)]
pub enum FavoritesAction {
    /// List favorites in the order they were added
    List,
    /// Add a movie or show to favorites
    Add(FavoriteArgs),
    /// Remove a movie or show from favorites
    Remove(FavoriteArgs),
    /// Add or remove depending on whether it is already a favorite
    Toggle(FavoriteArgs),
}

#[derive(Args, Debug, PartialEq)]
pub struct FavoriteArgs {
    pub id: u64,
    #[arg(short, long, default_value_t = MediaType::Movie)]
    pub media_type: MediaType,
}

pub async fn run_favorites_cmd(favorites: CliFavorites, app_state: &AppState) -> Result<()> {
    match favorites.favorites_cmds {
        FavoritesAction::List => list_favorites(app_state),
        FavoritesAction::Add(args) => {
            if app_state.get_favorites().contains(args.id, args.media_type) {
                info!("`{}/{}` is already a favorite", args.media_type, args.id);
                return Ok(());
            }

            let entry = build_entry(app_state, &args).await?;
            let title = entry.get_title().to_owned();
            if app_state.get_favorites().add(entry).await {
                info!("Added `{title}` to favorites");
            }
        }
        FavoritesAction::Remove(args) => {
            if app_state
                .get_favorites()
                .remove(args.id, args.media_type)
                .await
            {
                info!("Removed `{}/{}` from favorites", args.media_type, args.id);
            } else {
                info!("`{}/{}` is not a favorite", args.media_type, args.id);
            }
        }
        FavoritesAction::Toggle(args) => {
            let details = match load_details(app_state, args.id, args.media_type).await {
                Some(details) => details,
                None => return Err(anyhow!("Unable to load `{}/{}`", args.media_type, args.id)),
            };
            toggle_favorite(app_state, &details).await;
        }
    }

    Ok(())
}

async fn build_entry(app_state: &AppState, args: &FavoriteArgs) -> Result<FavoriteEntry> {
    load_details(app_state, args.id, args.media_type)
        .await
        .map(|details| details.to_favorite())
        .ok_or_else(|| anyhow!("Unable to load `{}/{}`", args.media_type, args.id))
}

fn list_favorites(app_state: &AppState) {
    let favorites = app_state.get_favorites().snapshot();

    if favorites.is_empty() {
        println!("No favorites yet.");
        return;
    }

    let lines = favorites
        .entries()
        .iter()
        .enumerate()
        .map(|(i, entry)| format!("{:>3}. {entry}", i + 1))
        .join("\n");

    println!("{lines}");
}
