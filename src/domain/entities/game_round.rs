//! Game round entity

use chrono::{DateTime, Utc};

use crate::domain::services::Verdict;
use crate::domain::value_objects::{Choice, Outcome, RoundId};

/// One played round, immutable once recorded
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameRound {
    id: RoundId,
    player_choice: Choice,
    computer_choice: Choice,
    outcome: Outcome,
    message: String,
    played_at: DateTime<Utc>,
}

impl GameRound {
    pub fn new(player_choice: Choice, computer_choice: Choice, verdict: Verdict) -> Self {
        Self {
            id: RoundId::new(),
            player_choice,
            computer_choice,
            outcome: verdict.outcome,
            message: verdict.message,
            played_at: Utc::now(),
        }
    }

    pub fn id(&self) -> RoundId {
        self.id
    }

    pub fn player_choice(&self) -> Choice {
        self.player_choice
    }

    pub fn computer_choice(&self) -> Choice {
        self.computer_choice
    }

    pub fn outcome(&self) -> Outcome {
        self.outcome
    }

    /// Narration fixed when the round was decided
    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn played_at(&self) -> DateTime<Utc> {
        self.played_at
    }
}
