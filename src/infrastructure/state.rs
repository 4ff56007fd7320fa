//! Shared application state

use std::sync::Arc;

use anyhow::{Context, Result};

use crate::application::cancellation::CancelHandle;
use crate::application::services::GameServiceImpl;
use crate::domain::services::OutcomeEngine;
use crate::infrastructure::config::AppConfig;
use crate::infrastructure::persistence::InMemoryGameSessionRepository;
use crate::infrastructure::random_number::{
    FallbackRange, HttpRandomNumberClient, ResilientRandomSource,
};
use crate::infrastructure::resilience::{CircuitBreaker, RetryPolicy};

/// Shared application state
pub struct AppState {
    /// Random number source with retry, breaker and fallback applied
    pub random_source: Arc<ResilientRandomSource>,
    pub game_service: GameServiceImpl,
    /// Cancelled on shutdown to abort rounds still waiting on the random source
    pub shutdown: CancelHandle,
}

impl AppState {
    pub async fn new(config: &AppConfig) -> Result<Self> {
        let engine = Arc::new(OutcomeEngine::rpsls().context("invalid rule table")?);

        // Initialize random number client
        let random = &config.random_source;
        let http_client = HttpRandomNumberClient::new(&random.base_url, random.timeout)
            .context("failed to build random number HTTP client")?;

        // One breaker for the whole process
        let breaker = Arc::new(CircuitBreaker::new(
            random.breaker_failure_threshold,
            random.breaker_open_duration,
        ));
        let fallback = random
            .fallback_enabled
            .then(|| FallbackRange::new(random.fallback_min, random.fallback_max));
        let random_source = Arc::new(ResilientRandomSource::new(
            Arc::new(http_client),
            RetryPolicy::new(random.retry_count),
            breaker,
            fallback,
        ));

        let sessions = Arc::new(InMemoryGameSessionRepository::new());
        let game_service = GameServiceImpl::new(engine, random_source.clone(), sessions);

        Ok(Self {
            random_source,
            game_service,
            shutdown: CancelHandle::new(),
        })
    }
}
