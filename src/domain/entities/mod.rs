//! Domain entities - Core business objects with identity

mod game_round;
mod game_session;

pub use game_round::GameRound;
pub use game_session::{GameSession, SessionStats};
