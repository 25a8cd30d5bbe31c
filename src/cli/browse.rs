use anyhow::{anyhow, Result};
use clap::Args;
use dialoguer::theme::ColorfulTheme;
use dialoguer::{Confirm, Select};
use itertools::Itertools;
use simplelog::{info, warn};
use strum::VariantArray;

use crate::catalog::genres::{genres_for, GenreId};
use crate::catalog::sort::SortOption;
use crate::catalog::details::ItemDetails;
use crate::catalog::{CatalogItem, MediaType, Selection};
use crate::cli::details::{show_details, toggle_favorite};
use crate::state::AppState;
use crate::utils;

const MAX_TITLE_CHARS: usize = 48;

#[derive(Args, Debug, PartialEq)]
pub struct BrowseArgs {
    /// `movie` or `tv`
    #[arg(short, long)]
    pub media_type: Option<MediaType>,
    /// TMDB genre id, see `marquee genres`
    #[arg(
        short,
        long,
        value_parser = clap::value_parser!(u32).range(1..),
        conflicts_with = "trending"
    )]
    pub genre: Option<u32>,
    /// Show the weekly trending list instead of a genre
    #[arg(long, default_value_t = false)]
    pub trending: bool,
    #[arg(short, long)]
    pub sort: Option<SortOption>,
    /// Print the listing and exit without prompting
    #[arg(long, default_value_t = false)]
    pub no_interactive: bool,
}

pub async fn run_browse_cmd(args: BrowseArgs, app_state: &AppState) -> Result<()> {
    let selection = build_selection(&args)?;
    let query = app_state.new_catalog_query();

    info!(
        "Loading {} ({}), sorted by {}...",
        selection.media_type.label(),
        describe_genre(&selection),
        selection.sort.label()
    );

    let Some(items) = query.load(&selection).await else {
        warn!("A newer listing replaced this one");
        return Ok(());
    };

    if items.is_empty() {
        println!("No {} found.", selection.media_type.label().to_lowercase());
        return Ok(());
    }

    print_listing(&items, app_state);

    if args.no_interactive {
        return Ok(());
    }

    browse_items(&items, app_state).await
}

/// Fills in anything missing from the command line by prompting
fn build_selection(args: &BrowseArgs) -> Result<Selection> {
    let media_type = match args.media_type {
        Some(media_type) => media_type,
        None if args.no_interactive => MediaType::default(),
        None => select_media_type()?,
    };

    let genre = match args.genre {
        Some(id) => Some(
            GenreId::try_new(id).map_err(|err| anyhow!("Invalid genre id `{id}`: {err}"))?,
        ),
        None if args.trending || args.no_interactive => None,
        None => select_genre(media_type)?,
    };

    let sort = match args.sort {
        Some(sort) => sort,
        None if args.no_interactive => SortOption::default(),
        None => select_sort()?,
    };

    Ok(Selection {
        media_type,
        genre,
        sort,
    })
}

fn select_media_type() -> Result<MediaType> {
    let choices = [MediaType::Movie, MediaType::Tv];
    let labels = choices.iter().map(|m| m.label()).collect::<Vec<_>>();

    let selection = Select::with_theme(&ColorfulTheme::default())
        .with_prompt("What would you like to browse?")
        .items(&labels)
        .default(0)
        .interact()?;

    Ok(choices[selection])
}

/// `None` means the trending list
fn select_genre(media_type: MediaType) -> Result<Option<GenreId>> {
    let genres = genres_for(media_type);
    let mut labels = vec!["Trending this week".to_string()];
    labels.extend(genres.iter().map(|g| g.get_name().to_string()));

    let selection = Select::with_theme(&ColorfulTheme::default())
        .with_prompt("Select a genre:")
        .items(&labels)
        .default(0)
        .interact()?;

    Ok(match selection {
        0 => None,
        i => Some(genres[i - 1].id()),
    })
}

fn select_sort() -> Result<SortOption> {
    let choices = <SortOption as VariantArray>::VARIANTS;
    let labels = choices.iter().map(|s| s.label()).collect::<Vec<_>>();
    let default = choices
        .iter()
        .position(|s| *s == SortOption::default())
        .unwrap_or(0);

    let selection = Select::with_theme(&ColorfulTheme::default())
        .with_prompt("Sort by:")
        .items(&labels)
        .default(default)
        .interact()?;

    Ok(choices[selection])
}

fn describe_genre(selection: &Selection) -> String {
    match selection.genre {
        Some(id) => crate::catalog::genres::genre_name(selection.media_type, id)
            .map(str::to_owned)
            .unwrap_or_else(|| format!("genre {id}")),
        None => "trending".to_string(),
    }
}

fn print_listing(items: &[CatalogItem], app_state: &AppState) {
    let favorites = app_state.get_favorites();

    let lines = items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            let marker = if favorites.contains(item.id(), item.get_media_type()) {
                "♥"
            } else {
                " "
            };
            format!("{:>3}. {marker} {}", i + 1, listing_line(item))
        })
        .join("\n");

    println!("{lines}");
}

fn listing_line(item: &CatalogItem) -> String {
    let title = utils::truncate_string(item.get_title(), MAX_TITLE_CHARS);
    let year = item
        .get_year()
        .map(|y| y.to_string())
        .unwrap_or_else(|| "----".to_string());

    format!("{title:<51} {year}  ★ {:.1}", item.get_rating())
}

/// Lets the user open items from the listing until they choose to exit
async fn browse_items(items: &[CatalogItem], app_state: &AppState) -> Result<()> {
    let mut labels = items.iter().map(listing_line).collect::<Vec<_>>();
    labels.push("Exit".to_string());

    loop {
        let selection = Select::with_theme(&ColorfulTheme::default())
            .with_prompt("Select an item to view its details:")
            .items(&labels)
            .default(0)
            .max_length(15)
            .interact()?;

        let Some(item) = items.get(selection) else {
            return Ok(());
        };

        let details = match show_details(app_state, item.id(), item.get_media_type()).await? {
            Some(details) => details,
            None => {
                // Fall back to what the listing returned
                let details = ItemDetails::from_catalog_item(item);
                println!("\n{details}\n");
                details
            }
        };

        let prompt = if app_state
            .get_favorites()
            .contains(item.id(), item.get_media_type())
        {
            "Remove from favorites?"
        } else {
            "Add to favorites?"
        };

        let toggle = Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt(prompt)
            .default(false)
            .interact()?;

        if toggle {
            toggle_favorite(app_state, &details).await;
        }
    }
}

#[cfg(test)]
mod browse_tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::catalog::CatalogItemBuilder;

    #[test]
    fn test_non_interactive_selection_uses_defaults() {
        let args = BrowseArgs {
            media_type: None,
            genre: None,
            trending: false,
            sort: None,
            no_interactive: true,
        };

        assert_eq!(Selection::default(), build_selection(&args).unwrap());
    }

    #[test]
    fn test_selection_from_flags() {
        let args = BrowseArgs {
            media_type: Some(MediaType::Tv),
            genre: Some(9648),
            trending: false,
            sort: Some(SortOption::Alphabetical),
            no_interactive: false,
        };

        let selection = build_selection(&args).unwrap();
        assert_eq!(MediaType::Tv, selection.media_type);
        assert_eq!(Some(9648), selection.genre.map(|g| g.into_inner()));
        assert_eq!(SortOption::Alphabetical, selection.sort);
        assert_eq!("Mystery", describe_genre(&selection));
    }

    #[test]
    fn test_listing_line() {
        let item = CatalogItemBuilder::default()
            .id(550_u64)
            .title("Fight Club")
            .release_date("1999-10-15")
            .vote_average(8.4)
            .build()
            .unwrap();

        let line = listing_line(&item);
        assert!(line.starts_with("Fight Club "));
        assert!(line.ends_with("1999  ★ 8.4"));
    }
}
