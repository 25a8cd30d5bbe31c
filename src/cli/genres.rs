use clap::Args;

use crate::catalog::genres::genres_for;
use crate::catalog::MediaType;

#[derive(Args, Debug, PartialEq)]
pub struct GenresArgs {
    /// Only list genres for `movie` or `tv`
    #[arg(short, long)]
    pub media_type: Option<MediaType>,
}

pub fn run_genres_cmd(args: GenresArgs) {
    let media_types = match args.media_type {
        Some(media_type) => vec![media_type],
        None => vec![MediaType::Movie, MediaType::Tv],
    };

    for media_type in media_types {
        println!("{}", media_type.label());
        for genre in genres_for(media_type) {
            println!("  {:>6}  {}", genre.id().into_inner(), genre.get_name());
        }
    }
}
