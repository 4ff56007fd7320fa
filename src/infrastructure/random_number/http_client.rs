//! HTTP client for the external random number service

use std::num::NonZeroU32;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use crate::application::cancellation::CancelToken;
use crate::application::ports::outbound::{RandomNumberError, RandomNumberPort};

/// One `GET {base_url}/random` per call, no retries
pub struct HttpRandomNumberClient {
    client: Client,
    base_url: String,
}

impl HttpRandomNumberClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Fetch a single number from the service
    pub async fn fetch(&self) -> Result<NonZeroU32, RandomNumberError> {
        debug!("Requesting random number from {}", self.base_url);

        let response = self
            .client
            .get(format!("{}/random", self.base_url))
            .send()
            .await
            .map_err(classify)?;

        let status = response.status();
        if !status.is_success() {
            return Err(RandomNumberError::Status(status.as_u16()));
        }

        let body = response.text().await.map_err(classify)?;
        let number = parse_random_body(&body)?;
        debug!("Received random number {}", number);
        Ok(number)
    }
}

fn classify(err: reqwest::Error) -> RandomNumberError {
    if err.is_timeout() {
        RandomNumberError::Timeout
    } else {
        RandomNumberError::Connection(err.to_string())
    }
}

/// Accept a bare positive integer or `{"random_number": n}`
pub fn parse_random_body(body: &str) -> Result<NonZeroU32, RandomNumberError> {
    let malformed = || {
        let mut shown: String = body.chars().take(64).collect();
        if body.chars().count() > 64 {
            shown.push('…');
        }
        RandomNumberError::MalformedBody(shown)
    };

    let value: serde_json::Value = serde_json::from_str(body.trim()).map_err(|_| malformed())?;
    let number = match &value {
        serde_json::Value::Number(n) => n.as_u64(),
        serde_json::Value::Object(map) => map.get("random_number").and_then(|n| n.as_u64()),
        _ => None,
    };

    number
        .and_then(|n| u32::try_from(n).ok())
        .and_then(NonZeroU32::new)
        .ok_or_else(malformed)
}

#[async_trait]
impl RandomNumberPort for HttpRandomNumberClient {
    async fn random_number(&self, cancel: &CancelToken) -> Result<NonZeroU32, RandomNumberError> {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(RandomNumberError::Cancelled),
            result = HttpRandomNumberClient::fetch(self) => result,
        }
    }
}
