//! Domain layer - Core game rules with no external dependencies
//!
//! This layer contains:
//! - Entities: GameRound, GameSession
//! - Value Objects: Choice, Outcome, GameResult, identifiers
//! - Domain Services: outcome engine and random-number normalization

pub mod entities;
pub mod services;
pub mod value_objects;
