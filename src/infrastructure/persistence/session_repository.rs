//! In-memory game session store
//!
//! Holds the single process-wide session. It is created lazily on first
//! access and never recreated; reset only empties it. Nothing survives a
//! restart.

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use crate::application::ports::outbound::GameSessionRepositoryPort;
use crate::domain::entities::{GameRound, GameSession};
use crate::domain::services::Verdict;
use crate::domain::value_objects::{Choice, SessionId};

#[derive(Debug, Default)]
pub struct InMemoryGameSessionRepository {
    current: RwLock<Option<GameSession>>,
}

impl InMemoryGameSessionRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn create_session() -> GameSession {
        let session = GameSession::new();
        debug!("Created new game session with ID: {}", session.id());
        session
    }
}

#[async_trait]
impl GameSessionRepositoryPort for InMemoryGameSessionRepository {
    async fn current_session(&self) -> GameSession {
        if let Some(session) = self.current.read().await.as_ref() {
            return session.clone();
        }

        let mut current = self.current.write().await;
        current.get_or_insert_with(Self::create_session).clone()
    }

    async fn record_round(
        &self,
        player_choice: Choice,
        computer_choice: Choice,
        verdict: Verdict,
    ) -> GameRound {
        let mut current = self.current.write().await;
        let session = current.get_or_insert_with(Self::create_session);
        let round = session.record_round(player_choice, computer_choice, verdict);
        debug!(
            "Saved round {} to session {}, total rounds: {}",
            round.id(),
            session.id(),
            session.total_rounds()
        );
        round
    }

    async fn reset(&self) -> SessionId {
        let mut current = self.current.write().await;
        let session = current.get_or_insert_with(Self::create_session);
        session.reset();
        session.id()
    }
}
