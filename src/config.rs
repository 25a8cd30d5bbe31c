//! Configuration for `marquee`

use std::env;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use derive_builder::Builder;
use dialoguer::theme::ColorfulTheme;
use dialoguer::Input;
use serde::{Deserialize, Serialize};
use simplelog::{debug, error, info};

use crate::tmdb::types::{ApiKey, TmdbUrl};
use crate::tmdb::TmdbClient;

const APP_NAME: &str = "marquee";
const CONFIG_FILE_NAME: &str = "config.json";

/// Represents the configuration file
#[derive(Builder, Clone, Debug, Deserialize, Serialize, PartialEq)]
#[builder(setter(into))]
pub struct Config {
    tmdb_api_key: String,
    #[builder(default = "TmdbUrl::default().into_inner()")]
    #[serde(default = "default_base_url")]
    tmdb_base_url: String,
    /// Where favorites are stored. Defaults to the platform data directory.
    #[builder(default)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    data_directory: Option<String>,
}

fn default_base_url() -> String {
    TmdbUrl::default().into_inner()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tmdb_api_key: "TMDB_API_KEY".to_string(),
            tmdb_base_url: default_base_url(),
            data_directory: None,
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_tmdb_api_key(&self) -> &str {
        &self.tmdb_api_key
    }

    pub fn get_tmdb_base_url(&self) -> &str {
        &self.tmdb_base_url
    }

    /// The configured data directory, or `<platform data dir>/marquee`
    pub fn get_data_directory(&self) -> PathBuf {
        match &self.data_directory {
            Some(dir) => PathBuf::from(dir),
            None => dirs::data_dir()
                .map(|dir| dir.join(APP_NAME))
                .unwrap_or_else(|| PathBuf::from("./data")),
        }
    }

    pub fn tmdb_api_key(mut self, api_key: String) -> Self {
        self.tmdb_api_key = api_key;
        self
    }

    pub fn tmdb_base_url(mut self, base_url: String) -> Self {
        self.tmdb_base_url = base_url;
        self
    }

    pub fn data_directory(mut self, data_directory: Option<String>) -> Self {
        self.data_directory = data_directory;
        self
    }

    /// Checks the API key and base URL, normalizing both
    pub fn validate(self) -> Result<Self> {
        let api_key = ApiKey::try_new(self.tmdb_api_key)
            .map_err(|err| anyhow!("Invalid TMDB API key: {err}"))?;
        let base_url = TmdbUrl::try_new(self.tmdb_base_url)
            .map_err(|err| anyhow!("Invalid TMDB base URL: {err}"))?;

        Ok(Self {
            tmdb_api_key: api_key.into_inner(),
            tmdb_base_url: base_url.into_inner(),
            data_directory: self.data_directory,
        })
    }

    /// Environment variables take precedence over the file
    fn apply_env_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(api_key) = lookup("TMDB_API_KEY") {
            self.tmdb_api_key = api_key;
        }
        if let Some(base_url) = lookup("TMDB_BASE_URL") {
            self.tmdb_base_url = base_url;
        }
        if let Some(data_directory) = lookup("MARQUEE_DATA_DIR") {
            self.data_directory = Some(data_directory);
        }
        self
    }

    /// Reads the config file, applying environment overrides.
    ///
    /// With no file, the environment alone must provide an API key.
    pub async fn load_config(config_directory: Option<&str>) -> Result<Self> {
        let path = get_config_path(config_directory);
        debug!("Loading config from `{}`...", path.display());

        let config = match tokio::fs::read_to_string(&path).await {
            Ok(contents) => serde_json::from_str::<Config>(&contents)
                .with_context(|| format!("Unable to parse config file `{}`", path.display()))?,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                if env::var("TMDB_API_KEY").is_err() {
                    return Err(anyhow!(
                        "Config file `{}` not found. Run `marquee config create` or set `TMDB_API_KEY`.",
                        path.display()
                    ));
                }
                Config::default()
            }
            Err(err) => {
                return Err(err)
                    .with_context(|| format!("Unable to read config file `{}`", path.display()))
            }
        };

        config.apply_env_overrides(|key| env::var(key).ok()).validate()
    }

    pub async fn save_config(&self, config_directory: Option<&str>) -> Result<()> {
        let path = get_config_path(config_directory);
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let json = serde_json::to_string_pretty(self)?;
        tokio::fs::write(&path, json)
            .await
            .with_context(|| format!("Unable to write config file `{}`", path.display()))?;

        info!("Config saved to `{}`", path.display());
        Ok(())
    }
}

pub fn have_config(config_directory: Option<&str>) -> bool {
    get_config_path(config_directory).exists()
}

fn get_config_path(config_directory: Option<&str>) -> PathBuf {
    let directory = match config_directory {
        Some(dir) => PathBuf::from(dir),
        None => default_config_directory(),
    };
    directory.join(CONFIG_FILE_NAME)
}

fn default_config_directory() -> PathBuf {
    if let Ok(dir) = env::var("MARQUEE_CONFIG_DIR") {
        return PathBuf::from(dir);
    }

    dirs::config_dir()
        .map(|dir| dir.join(APP_NAME))
        .unwrap_or_else(|| Path::new(".").join(APP_NAME))
}

/// Wizard used by user to create an initial configuration file
pub async fn build_config_wizard() -> Result<Config> {
    info!("Config file not found. Checking for environment variables...");

    let base_url = env::var("TMDB_BASE_URL").unwrap_or_else(|_| default_base_url());

    let api_key = loop {
        let api_key = if let Ok(api_key) = env::var("TMDB_API_KEY") {
            api_key
        } else {
            Input::<String>::with_theme(&ColorfulTheme::default())
                .with_prompt("Enter your TMDB API key:")
                .interact_text()?
        };

        let api_key = match ApiKey::try_new(api_key) {
            Ok(api_key) => api_key,
            Err(err) => {
                error!("Invalid TMDB API key: {err}");
                if env::var("TMDB_API_KEY").is_ok() {
                    return Err(anyhow!("`TMDB_API_KEY` does not hold a valid API key"));
                }
                continue;
            }
        };

        info!("Testing connection to TMDB. Please wait...");
        let client = TmdbClient::new(&base_url, &api_key)?;
        match client.test_connection().await {
            Ok(()) => {
                info!("Success!");
                break api_key;
            }
            Err(err) => {
                error!("Could not connect to TMDB: {err}");
                if env::var("TMDB_API_KEY").is_ok() {
                    return Err(err);
                }
            }
        }
    };

    let data_directory = env::var("MARQUEE_DATA_DIR").ok();

    let config = ConfigBuilder::default()
        .tmdb_api_key(api_key.into_inner())
        .tmdb_base_url(base_url)
        .data_directory(data_directory)
        .build()?;

    Ok(config)
}

impl Display for Config {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let mut output = String::default();
        output += &format!("TMDB API key:   {}\n", mask_api_key(&self.tmdb_api_key));
        output += &format!("TMDB base URL:  {}\n", self.tmdb_base_url);
        output += &format!("Data directory: {}", self.get_data_directory().display());

        write!(f, "{}", output)
    }
}

fn mask_api_key(api_key: &str) -> String {
    let visible = api_key.chars().rev().take(4).collect::<Vec<_>>();
    let visible = visible.into_iter().rev().collect::<String>();
    format!("{}{visible}", "*".repeat(api_key.chars().count().saturating_sub(4)))
}
