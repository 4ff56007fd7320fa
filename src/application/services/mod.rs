//! Application services - Use case implementations
//!
//! Services accept their port dependencies at construction and return
//! domain values; mapping to wire shapes happens in the DTO layer.

pub mod game_service;

pub use game_service::{GameError, GameHistory, GameService, GameServiceImpl};
