use std::env;
use std::str::FromStr;

use anyhow::Result;
use log::LevelFilter;
use simplelog::*;

pub fn initialize_logger() -> Result<()> {
    let logger_config = ConfigBuilder::new()
        .set_time_level(LevelFilter::Off)
        .set_target_level(LevelFilter::Off)
        .build();

    let level_filter = get_log_level();

    TermLogger::init(
        level_filter,
        logger_config,
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )?;

    Ok(())
}

fn get_log_level() -> LevelFilter {
    parse_log_level(env::var("LOG_LEVEL").ok().as_deref())
}

fn parse_log_level(value: Option<&str>) -> LevelFilter {
    value
        .and_then(|level| LevelFilter::from_str(level).ok())
        .unwrap_or(LevelFilter::Info)
}
