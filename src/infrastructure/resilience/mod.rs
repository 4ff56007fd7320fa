//! Resilience primitives for calls to external services

mod circuit_breaker;
mod retry;

pub use circuit_breaker::{CircuitBreaker, CircuitState};
pub use retry::RetryPolicy;
