//! Game session port - Interface to the process-wide session store
//!
//! Each method is one critical section on the store. Implementations must
//! never hold their lock across I/O, and a caller reading the session sees
//! every round either fully recorded or not at all.

use async_trait::async_trait;

use crate::domain::entities::{GameRound, GameSession};
use crate::domain::services::Verdict;
use crate::domain::value_objects::{Choice, SessionId};

#[async_trait]
pub trait GameSessionRepositoryPort: Send + Sync {
    /// Snapshot of the current session, creating it on first access
    async fn current_session(&self) -> GameSession;

    /// Append one decided round to the current session
    async fn record_round(
        &self,
        player_choice: Choice,
        computer_choice: Choice,
        verdict: Verdict,
    ) -> GameRound;

    /// Clear the current session's rounds, returning its identifier
    async fn reset(&self) -> SessionId;
}
