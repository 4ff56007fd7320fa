//! Value objects - Immutable objects defined by their attributes

mod choice;
mod game_result;
mod ids;
mod outcome;

pub use choice::{Choice, ChoiceError};
pub use game_result::GameResult;
pub use ids::*;
pub use outcome::Outcome;
