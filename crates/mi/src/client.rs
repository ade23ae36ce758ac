//! HTTP transport for MI commands using [`reqwest`].

use std::error::Error as StdError;
use std::time::Duration;

use async_trait::async_trait;

use crate::envelope::{MiError, MiRequest, MiResponse};
use crate::MiExecutor;

/// Default bound on a single MI round trip.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// MI client for a single switch.
pub struct MiClient {
    client: reqwest::Client,
    url: String,
}

impl MiClient {
    /// Create a client that posts to `http://{host}:{port}/mi`.
    pub fn new(host: &str, port: u16, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(client, format!("http://{host}:{port}/mi")))
    }

    /// Create a client reusing an existing [`reqwest::Client`].
    pub fn with_client(client: reqwest::Client, url: String) -> Self {
        Self { client, url }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl MiExecutor for MiClient {
    /// Send `command` once and classify the outcome. Never retries.
    async fn execute(&self, command: &str) -> MiResponse {
        let request = MiRequest::new(command);

        let response = match self.client.post(&self.url).json(&request).send().await {
            Ok(response) => response,
            Err(e) => {
                let cause = describe(&e);
                tracing::error!(command, url = %self.url, error = %cause, "Error calling OpenSIPS MI");
                return MiResponse::failure(MiError::network(cause));
            }
        };

        let status = response.status();
        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                let cause = describe(&e);
                tracing::error!(command, error = %cause, "Failed reading OpenSIPS MI response");
                return MiResponse::failure(MiError::network(cause));
            }
        };

        if !status.is_success() {
            tracing::error!(
                command,
                status = status.as_u16(),
                body = %body,
                "OpenSIPS MI returned bad status",
            );
            return MiResponse::failure(MiError::http(status.as_u16(), body));
        }

        match serde_json::from_str::<MiResponse>(&body) {
            Ok(parsed) => {
                tracing::info!(command, response = ?parsed, "OpenSIPS MI response");
                parsed
            }
            Err(e) => {
                tracing::warn!(command, error = %e, body = %body, "OpenSIPS MI non-JSON response");
                MiResponse::failure(MiError::parse(body))
            }
        }
    }
}

/// Render an error with its source chain; reqwest hides the root cause
/// (e.g. "Connection refused") behind a generic top-level message.
fn describe(err: &(dyn StdError + 'static)) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
