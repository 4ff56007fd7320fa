//! Infrastructure layer - External adapters and implementations
//!
//! This layer contains:
//! - Random number: HTTP client for the external service plus its resilient wrapper
//! - Resilience: retry policy and circuit breaker
//! - Persistence: in-memory game session store
//! - HTTP: REST API routes
//! - Config: Application configuration
//! - State: Shared application state

pub mod config;
pub mod http;
pub mod persistence;
pub mod random_number;
pub mod resilience;
pub mod state;
