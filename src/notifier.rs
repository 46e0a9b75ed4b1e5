//! Outbound alert delivery.
//!
//! [`Notifier`] owns one reusable HTTP client and the destination URL. Each
//! [`Notifier::send`] performs exactly one POST bounded by the configured
//! timeout. Every outcome is logged; no failure propagates to the caller.

use std::time::Duration;

use reqwest::{Client, StatusCode, Url};
use tracing::Instrument;

use crate::models::AlertMessage;

/// Default bound on a single alert request.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("invalid request url {url:?}: {reason}")]
    InvalidUrl { url: String, reason: String },
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
    #[error("request timed out: {0}")]
    Timeout(#[source] reqwest::Error),
    #[error("transport error: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("server responded with status {status}")]
    Status { status: StatusCode },
    #[error("unexpected error: {0}")]
    Other(#[source] reqwest::Error),
}

impl NotifyError {
    fn from_reqwest(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout(err)
        } else if let Some(status) = err.status() {
            Self::Status { status }
        } else if err.is_connect() || err.is_request() {
            Self::Transport(err)
        } else {
            Self::Other(err)
        }
    }
}

pub struct Notifier {
    client: Client,
    url: Url,
    timeout: Duration,
    span: tracing::Span,
}

impl Notifier {
    pub fn new(url: &str, timeout: Duration) -> Result<Self, NotifyError> {
        let parsed = Url::parse(url).map_err(|e| NotifyError::InvalidUrl {
            url: url.to_string(),
            reason: e.to_string(),
        })?;
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(NotifyError::Client)?;
        let span = tracing::info_span!("notifier", url = %parsed);
        Ok(Self {
            client,
            url: parsed,
            timeout,
            span,
        })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    /// POST one alert for `usage_percent` and return the 2xx status, or the
    /// classified failure.
    pub async fn try_send(&self, usage_percent: f64) -> Result<StatusCode, NotifyError> {
        self.post(&AlertMessage::new(usage_percent)).await
    }

    /// POST one alert and log the outcome. Returns the status code only on 2xx.
    pub async fn send(&self, usage_percent: f64) -> Option<u16> {
        let alert = AlertMessage::new(usage_percent);
        async {
            match self.post(&alert).await {
                Ok(status) => {
                    tracing::info!(
                        status_code = status.as_u16(),
                        memory_usage = %alert.memory_usage,
                        message = %alert.message,
                        "Alert sent successfully"
                    );
                    Some(status.as_u16())
                }
                Err(NotifyError::Timeout(e)) => {
                    tracing::error!(
                        error = %e,
                        timeout_secs = self.timeout.as_secs_f64(),
                        "Alert request timed out"
                    );
                    None
                }
                Err(NotifyError::Transport(e)) => {
                    tracing::error!(error = %e, "Alert request transport error");
                    None
                }
                Err(NotifyError::Status { status }) => {
                    tracing::error!(
                        status_code = status.as_u16(),
                        "Alert request HTTP error: status code {}",
                        status.as_u16()
                    );
                    None
                }
                Err(e) => {
                    tracing::error!(error = %e, "Alert request failed unexpectedly");
                    None
                }
            }
        }
        .instrument(self.span.clone())
        .await
    }

    async fn post(&self, alert: &AlertMessage) -> Result<StatusCode, NotifyError> {
        let response = self
            .client
            .post(self.url.clone())
            .json(alert)
            .send()
            .await
            .map_err(NotifyError::from_reqwest)?;
        let status = response.status();
        if !status.is_success() {
            return Err(NotifyError::Status { status });
        }
        Ok(status)
    }
}
