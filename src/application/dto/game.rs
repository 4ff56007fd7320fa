//! Game DTOs - wire shapes of the REST API

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::application::services::GameHistory;
use crate::domain::value_objects::{Choice, GameResult};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChoiceDto {
    pub id: u8,
    pub name: String,
}

impl From<Choice> for ChoiceDto {
    fn from(choice: Choice) -> Self {
        Self {
            id: choice.id(),
            name: choice.name().to_string(),
        }
    }
}

/// Body of a play request; `player` is the choice identifier (1-5)
#[derive(Debug, Clone, Deserialize)]
pub struct PlayGameRequest {
    pub player: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameResultResponse {
    /// "win", "lose" or "tie"
    pub results: String,
    pub player: u8,
    pub computer: u8,
    pub player_choice: String,
    pub computer_choice: String,
    pub message: String,
    pub played_at: DateTime<Utc>,
}

impl From<GameResult> for GameResultResponse {
    fn from(result: GameResult) -> Self {
        Self {
            results: result.outcome.as_str().to_string(),
            player: result.player_choice.id(),
            computer: result.computer_choice.id(),
            player_choice: result.player_choice.name().to_string(),
            computer_choice: result.computer_choice.name().to_string(),
            message: result.message,
            played_at: result.played_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameHistoryResponse {
    pub history: Vec<GameResultResponse>,
    pub total_games: usize,
    pub player_wins: usize,
    pub computer_wins: usize,
    pub ties: usize,
}

impl From<GameHistory> for GameHistoryResponse {
    fn from(history: GameHistory) -> Self {
        Self {
            history: history.results.into_iter().map(Into::into).collect(),
            total_games: history.stats.total_rounds,
            player_wins: history.stats.player_wins,
            computer_wins: history.stats.computer_wins,
            ties: history.stats.ties,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::Outcome;

    #[test]
    fn test_result_response_wire_shape() {
        let result = GameResult {
            player_choice: Choice::ROCK,
            computer_choice: Choice::SCISSORS,
            outcome: Outcome::Win,
            message: "Rock crushes Scissors. You win!".to_string(),
            played_at: Utc::now(),
        };

        let json = serde_json::to_value(GameResultResponse::from(result)).unwrap();

        assert_eq!(json["results"], "win");
        assert_eq!(json["player"], 1);
        assert_eq!(json["computer"], 3);
        assert_eq!(json["playerChoice"], "Rock");
        assert_eq!(json["computerChoice"], "Scissors");
        assert_eq!(json["message"], "Rock crushes Scissors. You win!");
        assert!(json.get("playedAt").is_some());
    }

    #[test]
    fn test_play_request_parses_player() {
        let request: PlayGameRequest = serde_json::from_str(r#"{"player": 4}"#).unwrap();
        assert_eq!(request.player, 4);
    }
}
