use anyhow::Result;
use clap::Args;
use simplelog::{error, info, warn};

use crate::catalog::details::ItemDetails;
use crate::catalog::MediaType;
use crate::state::AppState;

#[derive(Args, Debug, PartialEq)]
pub struct DetailsArgs {
    /// TMDB id of the movie or show
    pub id: u64,
    /// `movie` or `tv`
    #[arg(short, long, default_value_t = MediaType::Movie)]
    pub media_type: MediaType,
    /// Add the item to favorites, or remove it if it is one already
    #[arg(long, default_value_t = false)]
    pub toggle: bool,
}

pub async fn run_details_cmd(args: DetailsArgs, app_state: &AppState) -> Result<()> {
    let Some(details) = show_details(app_state, args.id, args.media_type).await? else {
        return Ok(());
    };

    if args.toggle {
        toggle_favorite(app_state, &details).await;
    }

    Ok(())
}

/// Fetches full details from TMDB.
///
/// When TMDB cannot be reached, a stored favorite still yields reduced details.
pub async fn load_details(
    app_state: &AppState,
    id: u64,
    media_type: MediaType,
) -> Option<ItemDetails> {
    match app_state.get_tmdb().fetch_details(id, media_type).await {
        Ok(details) => Some(ItemDetails::from_tmdb(details, media_type)),
        Err(err) => match app_state.get_favorites().get(id, media_type) {
            Some(entry) => {
                warn!("Unable to fetch details, showing the stored favorite: {err:#}");
                Some(ItemDetails::from_favorite(&entry))
            }
            None => {
                error!(
                    "An error occurred while fetching details for `{media_type}/{id}`: {err:#}"
                );
                None
            }
        },
    }
}

/// Prints the details view. Returns the details that were shown.
pub async fn show_details(
    app_state: &AppState,
    id: u64,
    media_type: MediaType,
) -> Result<Option<ItemDetails>> {
    let Some(details) = load_details(app_state, id, media_type).await else {
        return Ok(None);
    };

    println!("\n{details}");
    if app_state.get_favorites().contains(id, media_type) {
        println!("♥ In your favorites");
    }
    println!();

    Ok(Some(details))
}

pub async fn toggle_favorite(app_state: &AppState, details: &ItemDetails) {
    let now_favorite = app_state
        .get_favorites()
        .toggle(details.to_favorite())
        .await;

    if now_favorite {
        info!("Added `{}` to favorites", details.get_title());
    } else {
        info!("Removed `{}` from favorites", details.get_title());
    }
}
