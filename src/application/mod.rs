//! Application layer - Use cases and the ports they depend on
//!
//! This layer contains:
//! - Services: the play-round workflow and scoreboard queries
//! - Ports: interfaces to the random number source and the session store
//! - DTOs: request/response shapes for the REST API
//! - Cancellation: caller-driven abort of in-flight work

pub mod cancellation;
pub mod dto;
pub mod ports;
pub mod services;
