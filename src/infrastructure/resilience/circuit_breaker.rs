//! Circuit breaker for an unreliable dependency
//!
//! Closed: calls pass and consecutive failures are counted. Once the count
//! reaches the threshold the breaker opens and rejects every call for the
//! open duration. After that the next caller gets a single trial permit
//! (half-open); its success closes the breaker, its failure reopens it.
//!
//! State is process-wide and shared by concurrent callers. The mutex guards
//! only short synchronous transitions and is never held across an await.

use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::time::Instant;
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CircuitState {
    Closed,
    Open,
    HalfOpen,
}

impl CircuitState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Closed => "closed",
            Self::Open => "open",
            Self::HalfOpen => "half_open",
        }
    }
}

/// The breaker refused a call
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("circuit open, retry after {retry_after:?}")]
pub struct CircuitOpen {
    pub retry_after: Duration,
}

#[derive(Debug)]
struct BreakerState {
    state: CircuitState,
    consecutive_failures: u32,
    opened_at: Instant,
    trial_in_flight: bool,
}

#[derive(Debug)]
pub struct CircuitBreaker {
    failure_threshold: u32,
    open_duration: Duration,
    inner: Mutex<BreakerState>,
}

impl CircuitBreaker {
    pub fn new(failure_threshold: u32, open_duration: Duration) -> Self {
        Self {
            failure_threshold: failure_threshold.max(1),
            open_duration,
            inner: Mutex::new(BreakerState {
                state: CircuitState::Closed,
                consecutive_failures: 0,
                opened_at: Instant::now(),
                trial_in_flight: false,
            }),
        }
    }

    /// Effective state; an open breaker whose cool-down has elapsed reports
    /// half-open even before the next caller takes the trial permit
    pub fn state(&self) -> CircuitState {
        let inner = self.lock();
        match inner.state {
            CircuitState::Open if inner.opened_at.elapsed() >= self.open_duration => {
                CircuitState::HalfOpen
            }
            state => state,
        }
    }

    pub fn consecutive_failures(&self) -> u32 {
        self.lock().consecutive_failures
    }

    /// Ask to make one call; the permit must be settled with the call's result
    pub fn try_acquire(&self) -> Result<BreakerPermit<'_>, CircuitOpen> {
        let mut inner = self.lock();
        match inner.state {
            CircuitState::Closed => Ok(BreakerPermit::new(self, false)),
            CircuitState::Open => {
                let elapsed = inner.opened_at.elapsed();
                if elapsed >= self.open_duration {
                    info!("Circuit half-open, allowing a trial call");
                    inner.state = CircuitState::HalfOpen;
                    inner.trial_in_flight = true;
                    Ok(BreakerPermit::new(self, true))
                } else {
                    Err(CircuitOpen {
                        retry_after: self.open_duration - elapsed,
                    })
                }
            }
            CircuitState::HalfOpen if !inner.trial_in_flight => {
                inner.trial_in_flight = true;
                Ok(BreakerPermit::new(self, true))
            }
            CircuitState::HalfOpen => Err(CircuitOpen {
                retry_after: Duration::ZERO,
            }),
        }
    }

    fn on_success(&self, trial: bool) {
        let mut inner = self.lock();
        match (inner.state, trial) {
            (CircuitState::HalfOpen, true) => {
                info!("Trial call succeeded, circuit closed");
                inner.state = CircuitState::Closed;
                inner.consecutive_failures = 0;
                inner.trial_in_flight = false;
            }
            (CircuitState::Closed, _) => inner.consecutive_failures = 0,
            // late result of a call admitted before the breaker opened
            _ => {}
        }
    }

    fn on_failure(&self, trial: bool) {
        let mut inner = self.lock();
        match (inner.state, trial) {
            (CircuitState::HalfOpen, true) => {
                warn!(
                    "Trial call failed, circuit open for {:?}",
                    self.open_duration
                );
                inner.state = CircuitState::Open;
                inner.opened_at = Instant::now();
                inner.trial_in_flight = false;
            }
            (CircuitState::Closed, _) => {
                inner.consecutive_failures += 1;
                if inner.consecutive_failures >= self.failure_threshold {
                    warn!(
                        failures = inner.consecutive_failures,
                        "Circuit open for {:?}", self.open_duration
                    );
                    inner.state = CircuitState::Open;
                    inner.opened_at = Instant::now();
                }
            }
            _ => {}
        }
    }

    fn on_abandoned(&self, trial: bool) {
        let mut inner = self.lock();
        if trial && inner.state == CircuitState::HalfOpen {
            inner.trial_in_flight = false;
        }
    }

    fn lock(&self) -> MutexGuard<'_, BreakerState> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Admission for one call through the breaker
///
/// Dropping a permit without settling it (the caller was cancelled) frees a
/// half-open trial slot without counting a success or a failure.
#[derive(Debug)]
pub struct BreakerPermit<'a> {
    breaker: &'a CircuitBreaker,
    trial: bool,
    settled: bool,
}

impl<'a> BreakerPermit<'a> {
    fn new(breaker: &'a CircuitBreaker, trial: bool) -> Self {
        Self {
            breaker,
            trial,
            settled: false,
        }
    }

    pub fn is_trial(&self) -> bool {
        self.trial
    }

    pub fn record_success(mut self) {
        self.settled = true;
        self.breaker.on_success(self.trial);
    }

    pub fn record_failure(mut self) {
        self.settled = true;
        self.breaker.on_failure(self.trial);
    }
}

impl Drop for BreakerPermit<'_> {
    fn drop(&mut self) {
        if !self.settled {
            self.breaker.on_abandoned(self.trial);
        }
    }
}
