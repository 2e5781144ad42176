use std::time::Duration;

use reqwest::Client;

use crate::error::{Result, WeatherError};

const REQUEST_TIMEOUT_SECS: u64 = 10;

pub(crate) fn build_client(user_agent: &str) -> Result<Client> {
    Client::builder()
        .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
        .user_agent(user_agent)
        .build()
        .map_err(|e| WeatherError::Config(format!("Failed to create HTTP client: {e}")))
}

pub(crate) fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.chars().count() > MAX {
        format!("{}...", body.chars().take(MAX).collect::<String>())
    } else {
        body.to_string()
    }
}
