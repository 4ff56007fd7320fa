//! Outcome engine - decides who wins a round
//!
//! Choices sit on a cycle of odd length N. Each choice beats the `(N - 1) / 2`
//! choices that follow it on the cycle and loses to the `(N - 1) / 2` that
//! precede it. Every winning pair carries its own narrative verb
//! ("Rock crushes Scissors"); the table is checked once when the engine is
//! built, so a choice of this engine always finds its verb.

use std::collections::HashMap;

use crate::domain::value_objects::{Choice, ChoiceError, Outcome};

/// Winner, loser and verb for every winning pair of Rock, Paper, Scissors, Lizard, Spock
const RPSLS_VERBS: [(Choice, Choice, &str); 10] = [
    (Choice::ROCK, Choice::SCISSORS, "crushes"),
    (Choice::ROCK, Choice::LIZARD, "crushes"),
    (Choice::PAPER, Choice::ROCK, "covers"),
    (Choice::PAPER, Choice::SPOCK, "disproves"),
    (Choice::SCISSORS, Choice::PAPER, "cuts"),
    (Choice::SCISSORS, Choice::LIZARD, "decapitates"),
    (Choice::LIZARD, Choice::SPOCK, "poisons"),
    (Choice::LIZARD, Choice::PAPER, "eats"),
    (Choice::SPOCK, Choice::SCISSORS, "smashes"),
    (Choice::SPOCK, Choice::ROCK, "vaporizes"),
];

/// Outcome of comparing two choices
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verdict {
    pub outcome: Outcome,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RuleTableError {
    #[error("a choice cycle needs an odd number of at least 3 choices, got {0}")]
    InvalidChoiceCount(usize),
    #[error("choice identifiers must be exactly 1..={0}")]
    InvalidIdentifiers(usize),
    #[error("choice ordinals must be a permutation of 0..{0}")]
    InvalidOrdinals(usize),
    #[error("verb table mentions unknown choice {0}")]
    UnknownChoice(String),
    #[error("{winner} does not beat {loser} but has a verb for it")]
    VerbOnLosingPair { winner: String, loser: String },
    #[error("{winner} over {loser} has more than one verb")]
    DuplicateVerb { winner: String, loser: String },
    #[error("no verb for {winner} over {loser}")]
    MissingVerb { winner: String, loser: String },
}

/// Pure, immutable rule table; safe to share between any number of callers
#[derive(Debug, Clone)]
pub struct OutcomeEngine {
    choices: Vec<Choice>,
    verbs: HashMap<(u8, u8), &'static str>,
}

impl OutcomeEngine {
    /// The standard five-choice game
    pub fn rpsls() -> Result<Self, RuleTableError> {
        Self::new(Choice::ALL.to_vec(), &RPSLS_VERBS)
    }

    /// Build and validate an engine over an arbitrary odd cycle
    pub fn new(
        mut choices: Vec<Choice>,
        verbs: &[(Choice, Choice, &'static str)],
    ) -> Result<Self, RuleTableError> {
        let n = choices.len();
        if n < 3 || n % 2 == 0 || n > usize::from(u8::MAX) {
            return Err(RuleTableError::InvalidChoiceCount(n));
        }

        choices.sort_by_key(Choice::id);
        if !choices
            .iter()
            .enumerate()
            .all(|(i, c)| usize::from(c.id()) == i + 1)
        {
            return Err(RuleTableError::InvalidIdentifiers(n));
        }

        let mut ordinals: Vec<usize> = choices.iter().map(|c| usize::from(c.ordinal())).collect();
        ordinals.sort_unstable();
        if ordinals.iter().enumerate().any(|(i, o)| *o != i) {
            return Err(RuleTableError::InvalidOrdinals(n));
        }

        let mut table = HashMap::with_capacity(verbs.len());
        for (winner, loser, verb) in verbs {
            for choice in [winner, loser] {
                if !choices.contains(choice) {
                    return Err(RuleTableError::UnknownChoice(choice.name().to_string()));
                }
            }
            if !cycle_beats(n, winner, loser) {
                return Err(RuleTableError::VerbOnLosingPair {
                    winner: winner.name().to_string(),
                    loser: loser.name().to_string(),
                });
            }
            if table.insert((winner.id(), loser.id()), *verb).is_some() {
                return Err(RuleTableError::DuplicateVerb {
                    winner: winner.name().to_string(),
                    loser: loser.name().to_string(),
                });
            }
        }

        for winner in &choices {
            for loser in &choices {
                if cycle_beats(n, winner, loser) && !table.contains_key(&(winner.id(), loser.id())) {
                    return Err(RuleTableError::MissingVerb {
                        winner: winner.name().to_string(),
                        loser: loser.name().to_string(),
                    });
                }
            }
        }

        Ok(Self {
            choices,
            verbs: table,
        })
    }

    /// All choices, ascending by identifier
    pub fn all_choices(&self) -> &[Choice] {
        &self.choices
    }

    pub fn choice_count(&self) -> u8 {
        // bounded by u8::MAX in `new`
        self.choices.len() as u8
    }

    /// Look up one of this engine's choices by its public identifier
    ///
    /// Anything outside `1..=N` is rejected; there is no default choice.
    pub fn choice(&self, id: i64) -> Result<Choice, ChoiceError> {
        self.choices
            .iter()
            .find(|c| i64::from(c.id()) == id)
            .copied()
            .ok_or(ChoiceError::InvalidChoice(id))
    }

    /// Whether `a` beats `b`
    pub fn beats(&self, a: &Choice, b: &Choice) -> bool {
        cycle_beats(self.choices.len(), a, b)
    }

    /// Decide the round for `player` against `computer`
    ///
    /// Both choices must belong to this engine.
    pub fn determine(&self, player: &Choice, computer: &Choice) -> Result<Verdict, ChoiceError> {
        for choice in [player, computer] {
            if !self.choices.contains(choice) {
                return Err(ChoiceError::InvalidChoice(i64::from(choice.id())));
            }
        }

        let verdict = if player == computer {
            Verdict {
                outcome: Outcome::Tie,
                message: format!("Both players chose {}. It's a tie!", player.name()),
            }
        } else if self.beats(player, computer) {
            Verdict {
                outcome: Outcome::Win,
                message: format!(
                    "{} {} {}. You win!",
                    player.name(),
                    self.verb(player, computer)?,
                    computer.name()
                ),
            }
        } else {
            Verdict {
                outcome: Outcome::Lose,
                message: format!(
                    "{} {} {}. You lose!",
                    computer.name(),
                    self.verb(computer, player)?,
                    player.name()
                ),
            }
        };
        Ok(verdict)
    }

    fn verb(&self, winner: &Choice, loser: &Choice) -> Result<&'static str, ChoiceError> {
        self.verbs
            .get(&(winner.id(), loser.id()))
            .copied()
            .ok_or(ChoiceError::InvalidChoice(i64::from(loser.id())))
    }
}

/// `a` beats `b` when `b` is 1..=(n-1)/2 steps ahead of `a` on the cycle
fn cycle_beats(n: usize, a: &Choice, b: &Choice) -> bool {
    let a = usize::from(a.ordinal()) % n;
    let b = usize::from(b.ordinal()) % n;
    let distance = (b + n - a) % n;
    distance >= 1 && distance <= (n - 1) / 2
}
