use reqwest::{Client, RequestBuilder};
use tracing::{debug, warn};

use crate::{
    config::Credentials,
    error::{Error, Result},
    model::WeatherResponse,
};

/// OpenWeather One Call 3.0 endpoint.
pub const ONE_CALL_URL: &str = "https://api.openweathermap.org/data/3.0/onecall";

const UNITS: &str = "imperial";
const EXCLUDE: &str = "minutely,hourly,alerts";

/// Issues the single One Call request for a location.
///
/// No timeout, retry or backoff is configured.
#[derive(Debug, Clone)]
pub struct WeatherClient {
    http: Client,
    base_url: String,
}

impl Default for WeatherClient {
    fn default() -> Self {
        Self::new()
    }
}

impl WeatherClient {
    pub fn new() -> Self {
        Self::with_base_url(ONE_CALL_URL)
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self::with_http(Client::new(), base_url)
    }

    pub fn with_http(http: Client, base_url: impl Into<String>) -> Self {
        Self { http, base_url: base_url.into() }
    }

    fn request(&self, credentials: &Credentials) -> RequestBuilder {
        self.http.get(&self.base_url).query(&[
            ("lat", credentials.latitude.as_str()),
            ("lon", credentials.longitude.as_str()),
            ("units", UNITS),
            ("exclude", EXCLUDE),
            ("appid", credentials.api_key.as_str()),
        ])
    }

    /// Send the request and return the body text, whatever the status code.
    pub async fn fetch_raw(&self, credentials: &Credentials) -> Result<String> {
        debug!(endpoint = %self.base_url, "requesting weather");

        let res = self.request(credentials).send().await.map_err(Error::Request)?;

        let status = res.status();
        let body = res.text().await.map_err(Error::Body)?;

        debug!(%status, bytes = body.len(), "weather response received");
        if !status.is_success() {
            warn!(%status, body = %truncate_body(&body), "weather provider returned an error status");
        }

        Ok(body)
    }

    /// Fetch and decode the forecast for the stored location.
    pub async fn fetch(&self, credentials: &Credentials) -> Result<WeatherResponse> {
        let body = self.fetch_raw(credentials).await?;
        WeatherResponse::from_json(&body)
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
