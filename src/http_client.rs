//! A custom [`Client`](reqwest::Client) used by the application for making requests
//! to the TMDB API
//!
//! The original source for this code is from: https://github.com/seanmonstar/reqwest/issues/988#issuecomment-1475364352

use std::collections::HashMap;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use reqwest::{header, Url};
use serde::Deserialize;
use simplelog::debug;

use crate::tmdb::models::TmdbStatus;
use crate::utils;

/// Requests that take longer than this are treated as network failures
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// A custom [`Client`](reqwest::Client), with a base url and headers set during creation.
#[derive(Clone, Default, Debug)]
pub struct HttpClient {
    /// The TMDB API URL, always ending with `/`
    base_url: String,
    /// Default headers to use with the custom client
    headers: header::HeaderMap,
    /// The user's TMDB API key
    api_key: String,
    /// The resulting custom client
    client: reqwest::Client,
}

/// Shorthand for query parameters
pub type Params = Option<HashMap<String, String>>;

impl HttpClient {
    /// Creates a new custom ['Client'](reqwest::Client)
    ///
    /// Custom headers and a base url are set during creation
    pub fn new(base_url: &str, api_key: &str) -> Result<Self> {
        debug!("Creating HTTP client...");

        let mut headers = header::HeaderMap::new();
        headers.append(
            header::ACCEPT,
            header::HeaderValue::from_static("application/json"),
        );

        let client = reqwest::Client::builder()
            .gzip(true)
            .brotli(true)
            .zstd(true)
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        // `Url::join` drops the last path segment unless the base ends in a slash
        let base_url = if base_url.ends_with('/') {
            base_url.to_owned()
        } else {
            format!("{base_url}/")
        };

        Ok(Self {
            base_url,
            api_key: api_key.to_owned(),
            headers,
            client,
        })
    }

    /// Perform a `GET` request with the custom ['Client'](reqwest::Client)
    ///
    /// Non-success statuses are returned as errors carrying TMDB's status message.
    pub async fn get<T>(&self, path: &str, params: Params) -> Result<T>
    where
        T: for<'de> Deserialize<'de> + Default,
    {
        let url = self.build_final_url(path, params)?;

        let resp = match self
            .client
            .get(url)
            .headers(self.headers.clone())
            .send()
            .await
        {
            Ok(resp) => resp,
            Err(err) => {
                return Err(anyhow!(
                    "An error occurred while attempting to GET `{path}`: {err}"
                ))
            }
        };

        let status = resp.status();
        let contents = resp.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<TmdbStatus>(&contents)
                .map(|s| s.status_message)
                .unwrap_or_else(|_| utils::truncate_string(&contents, 200));
            return Err(anyhow!("TMDB returned {status} for `{path}`: {message}"));
        }

        if contents.is_empty() {
            return Ok(T::default());
        }

        serde_json::from_str(&contents).with_context(|| {
            format!(
                "Unable to deserialise response. Body was: \"{}\"",
                utils::truncate_string(&contents, 2000)
            )
        })
    }

    /// Constructs the final URL passed to the respective request
    ///
    /// Merges the base url, the path, the API key, and any parameters together
    fn build_final_url(&self, path: &str, params: Params) -> Result<Url> {
        let mut url = Url::parse(&self.base_url)?.join(path.trim_start_matches('/'))?;

        if let Some(params) = params {
            for (k, v) in params {
                url.query_pairs_mut().append_pair(&k, &v);
            }
        }

        // Logged before the key is attached
        debug!("FINAL URL: {url}");

        url.query_pairs_mut().append_pair("api_key", &self.api_key);

        Ok(url)
    }
}
