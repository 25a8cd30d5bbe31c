/*!
`marquee` is a CLI application that browses movie and TV listings from [TMDB](https://www.themoviedb.org)
and keeps a local list of favorites.
 */

pub mod catalog;
pub mod cli;
pub mod config;
pub mod favorites;
pub mod http_client;
pub mod logger;
pub mod state;
pub mod storage;
pub mod tmdb;
pub mod utils;
