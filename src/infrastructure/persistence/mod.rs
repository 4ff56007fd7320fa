//! Persistence adapters
//!
//! Session state lives in process memory only.

mod session_repository;

pub use session_repository::InMemoryGameSessionRepository;
