//! Outbound ports - Interfaces that the application requires from external systems

mod game_session_port;
mod random_number_port;

pub use game_session_port::GameSessionRepositoryPort;
pub use random_number_port::{RandomNumberError, RandomNumberPort};

#[cfg(test)]
pub mod testing;
