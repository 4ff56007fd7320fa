//! Game session aggregate
//!
//! Holds the append-only log of rounds since the last reset. Scoreboard
//! numbers are always derived from the log so they cannot drift from it.

use chrono::{DateTime, Utc};

use super::GameRound;
use crate::domain::services::Verdict;
use crate::domain::value_objects::{Choice, Outcome, SessionId};

/// Win/lose/tie counts derived from a round log
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionStats {
    pub total_rounds: usize,
    pub player_wins: usize,
    pub computer_wins: usize,
    pub ties: usize,
}

#[derive(Debug, Clone)]
pub struct GameSession {
    id: SessionId,
    rounds: Vec<GameRound>,
    created_at: DateTime<Utc>,
    last_played_at: Option<DateTime<Utc>>,
}

impl GameSession {
    pub fn new() -> Self {
        Self {
            id: SessionId::new(),
            rounds: Vec::new(),
            created_at: Utc::now(),
            last_played_at: None,
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn last_played_at(&self) -> Option<DateTime<Utc>> {
        self.last_played_at
    }

    /// Rounds in play order, oldest first
    pub fn rounds(&self) -> &[GameRound] {
        &self.rounds
    }

    /// Append a fully decided round and return it
    pub fn record_round(
        &mut self,
        player_choice: Choice,
        computer_choice: Choice,
        verdict: Verdict,
    ) -> GameRound {
        let round = GameRound::new(player_choice, computer_choice, verdict);
        self.last_played_at = Some(round.played_at());
        self.rounds.push(round.clone());
        round
    }

    pub fn total_rounds(&self) -> usize {
        self.rounds.len()
    }

    pub fn player_wins(&self) -> usize {
        self.count(Outcome::Win)
    }

    pub fn computer_wins(&self) -> usize {
        self.count(Outcome::Lose)
    }

    pub fn ties(&self) -> usize {
        self.count(Outcome::Tie)
    }

    pub fn stats(&self) -> SessionStats {
        SessionStats {
            total_rounds: self.total_rounds(),
            player_wins: self.player_wins(),
            computer_wins: self.computer_wins(),
            ties: self.ties(),
        }
    }

    /// Empty the log; identity and creation time are kept
    pub fn reset(&mut self) {
        self.rounds.clear();
        self.last_played_at = None;
    }

    fn count(&self, outcome: Outcome) -> usize {
        self.rounds.iter().filter(|r| r.outcome() == outcome).count()
    }
}

impl Default for GameSession {
    fn default() -> Self {
        Self::new()
    }
}
