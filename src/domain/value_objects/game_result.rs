//! Game result - the per-round view handed back to callers

use chrono::{DateTime, Utc};

use super::{Choice, Outcome};

/// Outcome of a single round together with its narration
///
/// Never stored; built fresh from a recorded round whenever one is reported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameResult {
    pub player_choice: Choice,
    pub computer_choice: Choice,
    pub outcome: Outcome,
    pub message: String,
    pub played_at: DateTime<Utc>,
}
