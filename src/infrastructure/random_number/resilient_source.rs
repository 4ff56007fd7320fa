//! Resilient random number source
//!
//! Decorates an upstream `RandomNumberPort` with:
//! - retry with exponential backoff on transient failures
//! - a shared circuit breaker consulted before every network attempt
//! - a local pseudo-random fallback once the upstream is given up on
//!
//! Cancellation is checked before each attempt and raced against the
//! in-flight call and every backoff wait. It is reported as
//! `RandomNumberError::Cancelled` and never replaced by a fallback number.

use std::num::NonZeroU32;
use std::sync::Arc;

use async_trait::async_trait;
use rand::Rng;
use tracing::{debug, info, warn};

use crate::application::cancellation::CancelToken;
use crate::application::ports::outbound::{RandomNumberError, RandomNumberPort};
use crate::infrastructure::resilience::{CircuitBreaker, CircuitState, RetryPolicy};

/// Inclusive range for locally generated numbers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FallbackRange {
    min: u32,
    max: u32,
}

impl FallbackRange {
    /// `min` is raised to 1 and `max` to `min` so sampling cannot fail
    pub fn new(min: u32, max: u32) -> Self {
        let min = min.max(1);
        Self {
            min,
            max: max.max(min),
        }
    }

    pub fn sample(&self) -> NonZeroU32 {
        let n = rand::thread_rng().gen_range(self.min..=self.max);
        NonZeroU32::new(n).unwrap_or(NonZeroU32::MIN)
    }
}

impl Default for FallbackRange {
    fn default() -> Self {
        Self::new(1, 100)
    }
}

pub struct ResilientRandomSource {
    upstream: Arc<dyn RandomNumberPort>,
    retry: RetryPolicy,
    breaker: Arc<CircuitBreaker>,
    fallback: Option<FallbackRange>,
}

impl ResilientRandomSource {
    /// `fallback: None` disables local generation
    pub fn new(
        upstream: Arc<dyn RandomNumberPort>,
        retry: RetryPolicy,
        breaker: Arc<CircuitBreaker>,
        fallback: Option<FallbackRange>,
    ) -> Self {
        Self {
            upstream,
            retry,
            breaker,
            fallback,
        }
    }

    pub fn circuit_state(&self) -> CircuitState {
        self.breaker.state()
    }

    async fn call_upstream(&self, cancel: &CancelToken) -> Result<NonZeroU32, RandomNumberError> {
        let mut attempt = 0;
        loop {
            if cancel.is_cancelled() {
                return Err(RandomNumberError::Cancelled);
            }

            let permit = match self.breaker.try_acquire() {
                Ok(permit) => permit,
                Err(open) => {
                    debug!("Circuit open, skipping random number service for {:?}", open.retry_after);
                    return Err(RandomNumberError::CircuitOpen);
                }
            };
            if permit.is_trial() {
                debug!("Trial call to random number service");
            }

            let result = tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(RandomNumberError::Cancelled),
                result = self.upstream.random_number(cancel) => result,
            };

            let err = match result {
                Ok(number) => {
                    permit.record_success();
                    return Ok(number);
                }
                Err(RandomNumberError::Cancelled) => return Err(RandomNumberError::Cancelled),
                Err(err) if !err.is_transient() => {
                    // the service answered; not a fault the breaker tracks
                    permit.record_success();
                    return Err(err);
                }
                Err(err) => {
                    permit.record_failure();
                    err
                }
            };

            if attempt >= self.retry.max_retries() {
                warn!(attempts = attempt + 1, "Random number service failed: {}", err);
                return Err(err);
            }
            if self.breaker.state() == CircuitState::Open {
                warn!("Random number service failed and circuit opened: {}", err);
                return Err(err);
            }

            attempt += 1;
            let delay = self.retry.backoff(attempt);
            warn!(
                consecutive_failures = self.breaker.consecutive_failures(),
                "Retry {} after {:?} delay due to: {}",
                attempt, delay, err
            );
            tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(RandomNumberError::Cancelled),
                _ = tokio::time::sleep(delay) => {}
            }
        }
    }
}

#[async_trait]
impl RandomNumberPort for ResilientRandomSource {
    async fn random_number(&self, cancel: &CancelToken) -> Result<NonZeroU32, RandomNumberError> {
        match self.call_upstream(cancel).await {
            Ok(number) => Ok(number),
            Err(RandomNumberError::Cancelled) => Err(RandomNumberError::Cancelled),
            Err(err) => match self.fallback {
                Some(range) => {
                    let number = range.sample();
                    info!("Using fallback random number {} ({})", number, err);
                    Ok(number)
                }
                None => {
                    warn!("Random number service unavailable and fallback disabled: {}", err);
                    Err(RandomNumberError::Unavailable)
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use tokio::time::Instant;

    use crate::application::cancellation::CancelHandle;
    use crate::application::ports::outbound::testing::{HangingRandomPort, ScriptedRandomPort};

    fn source(
        upstream: Arc<ScriptedRandomPort>,
        breaker: Arc<CircuitBreaker>,
        fallback: Option<FallbackRange>,
    ) -> ResilientRandomSource {
        ResilientRandomSource::new(upstream, RetryPolicy::new(3), breaker, fallback)
    }

    fn lenient_breaker() -> Arc<CircuitBreaker> {
        Arc::new(CircuitBreaker::new(100, Duration::from_secs(30)))
    }

    fn standard_breaker() -> Arc<CircuitBreaker> {
        Arc::new(CircuitBreaker::new(3, Duration::from_secs(30)))
    }

    #[test]
    fn test_fallback_range_is_sane() {
        assert_eq!(FallbackRange::new(0, 0), FallbackRange::new(1, 1));
        for _ in 0..1_000 {
            let n = FallbackRange::default().sample().get();
            assert!((1..=100).contains(&n));
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_first_attempt_success() {
        let upstream = Arc::new(ScriptedRandomPort::new(vec![Ok(42)]));
        let source = source(upstream.clone(), lenient_breaker(), None);

        let n = source.random_number(&CancelToken::never()).await.unwrap();

        assert_eq!(n.get(), 42);
        assert_eq!(upstream.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_retries_with_exponential_backoff() {
        let upstream = Arc::new(ScriptedRandomPort::new(vec![
            Err(RandomNumberError::Timeout),
            Err(RandomNumberError::Status(503)),
            Ok(17),
        ]));
        let source = source(upstream.clone(), lenient_breaker(), None);
        let started = Instant::now();

        let n = source.random_number(&CancelToken::never()).await.unwrap();

        assert_eq!(n.get(), 17);
        assert_eq!(upstream.calls(), 3);
        assert_eq!(started.elapsed(), Duration::from_secs(2 + 4));
    }

    #[tokio::test(start_paused = true)]
    async fn test_malformed_body_is_retried() {
        let upstream = Arc::new(ScriptedRandomPort::new(vec![
            Err(RandomNumberError::MalformedBody("oops".into())),
            Ok(5),
        ]));
        let source = source(upstream.clone(), lenient_breaker(), None);

        assert_eq!(source.random_number(&CancelToken::never()).await.unwrap().get(), 5);
        assert_eq!(upstream.calls(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_exhausted_retries_without_fallback_is_unavailable() {
        let upstream = Arc::new(ScriptedRandomPort::always_timing_out());
        let source = source(upstream.clone(), lenient_breaker(), None);
        let started = Instant::now();

        let err = source.random_number(&CancelToken::never()).await.unwrap_err();

        assert!(matches!(err, RandomNumberError::Unavailable));
        assert_eq!(upstream.calls(), 4);
        assert_eq!(started.elapsed(), Duration::from_secs(2 + 4 + 8));
    }

    #[tokio::test(start_paused = true)]
    async fn test_exhausted_retries_fall_back() {
        let upstream = Arc::new(ScriptedRandomPort::always_timing_out());
        let source = source(upstream.clone(), lenient_breaker(), Some(FallbackRange::default()));

        let n = source.random_number(&CancelToken::never()).await.unwrap();

        assert!((1..=100).contains(&n.get()));
        assert_eq!(upstream.calls(), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn test_non_transient_status_is_not_retried() {
        let upstream = Arc::new(ScriptedRandomPort::new(vec![Err(RandomNumberError::Status(404))]));
        let breaker = lenient_breaker();
        let source = source(upstream.clone(), breaker.clone(), None);

        let err = source.random_number(&CancelToken::never()).await.unwrap_err();

        assert!(matches!(err, RandomNumberError::Unavailable));
        assert_eq!(upstream.calls(), 1);
        assert_eq!(breaker.consecutive_failures(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_open_circuit_short_circuits_until_cool_down() {
        let upstream = Arc::new(ScriptedRandomPort::new(vec![
            Err(RandomNumberError::Timeout),
            Err(RandomNumberError::Connection("refused".into())),
            Err(RandomNumberError::Status(500)),
            Ok(77),
        ]));
        let source = source(upstream.clone(), standard_breaker(), Some(FallbackRange::default()));
        let cancel = CancelToken::never();

        // third consecutive failure opens the circuit and ends the retry loop
        let started = Instant::now();
        source.random_number(&cancel).await.unwrap();
        assert_eq!(upstream.calls(), 3);
        assert_eq!(source.circuit_state(), CircuitState::Open);
        assert_eq!(started.elapsed(), Duration::from_secs(2 + 4));

        // open: no network attempt at all, fallback answers immediately
        let started = Instant::now();
        source.random_number(&cancel).await.unwrap();
        assert_eq!(upstream.calls(), 3);
        assert_eq!(started.elapsed(), Duration::ZERO);

        tokio::time::advance(Duration::from_secs(30)).await;

        // half-open trial succeeds and closes the circuit
        assert_eq!(source.random_number(&cancel).await.unwrap().get(), 77);
        assert_eq!(upstream.calls(), 4);
        assert_eq!(source.circuit_state(), CircuitState::Closed);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_trial_reopens_without_retrying() {
        let upstream = Arc::new(ScriptedRandomPort::always_timing_out());
        let breaker = standard_breaker();
        let source = source(upstream.clone(), breaker.clone(), None);
        let cancel = CancelToken::never();

        assert!(source.random_number(&cancel).await.is_err());
        assert_eq!(upstream.calls(), 3);

        tokio::time::advance(Duration::from_secs(30)).await;
        assert!(source.random_number(&cancel).await.is_err());
        assert_eq!(upstream.calls(), 4);
        assert_eq!(breaker.state(), CircuitState::Open);
    }

    #[tokio::test(start_paused = true)]
    async fn test_breaker_is_shared_between_sources() {
        let breaker = standard_breaker();
        let failing = Arc::new(ScriptedRandomPort::always_timing_out());
        let healthy = Arc::new(ScriptedRandomPort::new(vec![Ok(9)]));
        let first = source(failing, breaker.clone(), None);
        let second = source(healthy.clone(), breaker.clone(), None);

        assert!(first.random_number(&CancelToken::never()).await.is_err());

        let err = second.random_number(&CancelToken::never()).await.unwrap_err();
        assert!(matches!(err, RandomNumberError::Unavailable));
        assert_eq!(healthy.calls(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancelled_before_start() {
        let upstream = Arc::new(ScriptedRandomPort::new(vec![Ok(1)]));
        let source = source(upstream.clone(), lenient_breaker(), Some(FallbackRange::default()));
        let handle = CancelHandle::new();
        handle.cancel();

        let err = source.random_number(&handle.token()).await.unwrap_err();

        assert!(matches!(err, RandomNumberError::Cancelled));
        assert_eq!(upstream.calls(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_during_backoff_skips_fallback() {
        let upstream = Arc::new(ScriptedRandomPort::always_timing_out());
        let source = Arc::new(source(
            upstream.clone(),
            lenient_breaker(),
            Some(FallbackRange::default()),
        ));
        let handle = CancelHandle::new();
        let token = handle.token();

        let task = tokio::spawn({
            let source = source.clone();
            async move { source.random_number(&token).await }
        });
        // first attempt fails at once, then the 2s backoff begins
        tokio::time::sleep(Duration::from_secs(1)).await;
        handle.cancel();

        let err = task.await.unwrap().unwrap_err();
        assert!(matches!(err, RandomNumberError::Cancelled));
        assert_eq!(upstream.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_during_call_skips_fallback() {
        let upstream = Arc::new(HangingRandomPort::new());
        let breaker = standard_breaker();
        let source = Arc::new(ResilientRandomSource::new(
            upstream.clone(),
            RetryPolicy::new(3),
            breaker.clone(),
            Some(FallbackRange::default()),
        ));
        let handle = CancelHandle::new();
        let token = handle.token();

        let task = tokio::spawn({
            let source = source.clone();
            async move { source.random_number(&token).await }
        });
        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(upstream.calls(), 1);
        handle.cancel();

        let result = task.await.unwrap();
        assert!(matches!(result, Err(RandomNumberError::Cancelled)));
        assert_eq!(upstream.calls(), 1);
        assert_eq!(breaker.consecutive_failures(), 0);
        assert_eq!(breaker.state(), CircuitState::Closed);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancelled_trial_frees_the_slot() {
        let upstream = Arc::new(HangingRandomPort::new());
        let breaker = standard_breaker();
        for _ in 0..3 {
            breaker.try_acquire().unwrap().record_failure();
        }
        tokio::time::advance(Duration::from_secs(30)).await;

        let source = Arc::new(ResilientRandomSource::new(
            upstream.clone(),
            RetryPolicy::new(3),
            breaker.clone(),
            Some(FallbackRange::default()),
        ));
        let handle = CancelHandle::new();
        let token = handle.token();

        let task = tokio::spawn({
            let source = source.clone();
            async move { source.random_number(&token).await }
        });
        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(upstream.calls(), 1);
        // the trial is in flight, nobody else gets through
        assert!(breaker.try_acquire().is_err());
        handle.cancel();

        let result = task.await.unwrap();
        assert!(matches!(result, Err(RandomNumberError::Cancelled)));
        assert_eq!(breaker.state(), CircuitState::HalfOpen);
        assert!(breaker.try_acquire().unwrap().is_trial());
    }
}
