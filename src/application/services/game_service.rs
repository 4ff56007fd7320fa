//! Game Service - Application service for playing rounds
//!
//! Runs one round end to end: validate the player's choice, obtain the
//! computer's choice from the random source, decide the outcome and record
//! the round in the session. A round that fails before the last step leaves
//! the session untouched.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::{debug, info, instrument, warn};

use crate::application::cancellation::CancelToken;
use crate::application::ports::outbound::{
    GameSessionRepositoryPort, RandomNumberError, RandomNumberPort,
};
use crate::domain::entities::{GameRound, SessionStats};
use crate::domain::services::{choice_generation, OutcomeEngine};
use crate::domain::value_objects::{Choice, ChoiceError, GameResult, SessionId};

#[derive(Debug, thiserror::Error)]
pub enum GameError {
    #[error(transparent)]
    InvalidChoice(#[from] ChoiceError),
    #[error("random number source unavailable")]
    SourceUnavailable,
    #[error("request cancelled")]
    Cancelled,
}

impl From<RandomNumberError> for GameError {
    fn from(err: RandomNumberError) -> Self {
        match err {
            RandomNumberError::Cancelled => Self::Cancelled,
            _ => Self::SourceUnavailable,
        }
    }
}

/// Session history, most recent round first
#[derive(Debug, Clone)]
pub struct GameHistory {
    pub session_id: SessionId,
    pub created_at: DateTime<Utc>,
    pub last_played_at: Option<DateTime<Utc>>,
    pub results: Vec<GameResult>,
    pub stats: SessionStats,
}

/// Game service trait defining the application use cases
#[async_trait]
pub trait GameService: Send + Sync {
    /// All choices, ascending by identifier
    fn list_choices(&self) -> Vec<Choice>;

    /// A computer choice drawn from the random source, without playing
    async fn random_choice(&self, cancel: &CancelToken) -> Result<Choice, GameError>;

    /// Play one round for the given player choice identifier
    async fn play(&self, player_choice_id: i64, cancel: &CancelToken)
        -> Result<GameResult, GameError>;

    async fn history(&self) -> GameHistory;

    async fn reset(&self);
}

pub struct GameServiceImpl {
    engine: Arc<OutcomeEngine>,
    random_source: Arc<dyn RandomNumberPort>,
    sessions: Arc<dyn GameSessionRepositoryPort>,
}

impl GameServiceImpl {
    pub fn new(
        engine: Arc<OutcomeEngine>,
        random_source: Arc<dyn RandomNumberPort>,
        sessions: Arc<dyn GameSessionRepositoryPort>,
    ) -> Self {
        Self {
            engine,
            random_source,
            sessions,
        }
    }

    async fn computer_choice(&self, cancel: &CancelToken) -> Result<Choice, GameError> {
        let raw = self.random_source.random_number(cancel).await.map_err(|e| {
            match e {
                RandomNumberError::Cancelled => debug!("Random number request cancelled"),
                ref other => warn!("No computer choice available: {}", other),
            }
            GameError::from(e)
        })?;
        let choice = choice_generation::computer_choice(&self.engine, raw);
        debug!("Random number {} maps to {}", raw, choice);
        Ok(choice)
    }

}

fn to_result(round: &GameRound) -> GameResult {
    GameResult {
        player_choice: round.player_choice(),
        computer_choice: round.computer_choice(),
        outcome: round.outcome(),
        message: round.message().to_string(),
        played_at: round.played_at(),
    }
}

#[async_trait]
impl GameService for GameServiceImpl {
    fn list_choices(&self) -> Vec<Choice> {
        self.engine.all_choices().to_vec()
    }

    #[instrument(skip(self, cancel))]
    async fn random_choice(&self, cancel: &CancelToken) -> Result<Choice, GameError> {
        self.computer_choice(cancel).await
    }

    #[instrument(skip(self, cancel))]
    async fn play(
        &self,
        player_choice_id: i64,
        cancel: &CancelToken,
    ) -> Result<GameResult, GameError> {
        let player = self.engine.choice(player_choice_id).inspect_err(|e| {
            debug!("Rejected player choice: {}", e);
        })?;

        let computer = self.computer_choice(cancel).await?;
        let verdict = self.engine.determine(&player, &computer)?;
        let round = self.sessions.record_round(player, computer, verdict).await;

        info!(
            round_id = %round.id(),
            outcome = round.outcome().as_str(),
            "{}",
            round.message()
        );

        Ok(to_result(&round))
    }

    #[instrument(skip(self))]
    async fn history(&self) -> GameHistory {
        let session = self.sessions.current_session().await;
        let results = session
            .rounds()
            .iter()
            .rev()
            .map(to_result)
            .collect();

        let history = GameHistory {
            session_id: session.id(),
            created_at: session.created_at(),
            last_played_at: session.last_played_at(),
            results,
            stats: session.stats(),
        };
        debug!(
            session_id = %history.session_id,
            created_at = %history.created_at,
            last_played_at = ?history.last_played_at,
            "Loaded {} rounds",
            history.results.len()
        );
        history
    }

    #[instrument(skip(self))]
    async fn reset(&self) {
        let session_id = self.sessions.reset().await;
        info!("Scoreboard reset for session {}", session_id);
    }
}
