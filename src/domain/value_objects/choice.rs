//! Choice value object - one of the selectable hand shapes

use std::fmt;

/// Number of choices in Rock, Paper, Scissors, Lizard, Spock
pub const CHOICE_COUNT: u8 = 5;

/// A selectable option in the game
///
/// `id` is the public identifier (1-based, what callers submit). `ordinal` is
/// the position in the domination cycle: a choice beats the `(N - 1) / 2`
/// choices that follow it in that cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Choice {
    id: u8,
    name: &'static str,
    ordinal: u8,
}

impl Choice {
    pub const ROCK: Choice = Choice::new(1, "Rock", 0);
    pub const PAPER: Choice = Choice::new(2, "Paper", 3);
    pub const SCISSORS: Choice = Choice::new(3, "Scissors", 1);
    pub const LIZARD: Choice = Choice::new(4, "Lizard", 2);
    pub const SPOCK: Choice = Choice::new(5, "Spock", 4);

    /// Every choice of the game, ascending by identifier
    pub const ALL: [Choice; CHOICE_COUNT as usize] = [
        Self::ROCK,
        Self::PAPER,
        Self::SCISSORS,
        Self::LIZARD,
        Self::SPOCK,
    ];

    pub(crate) const fn new(id: u8, name: &'static str, ordinal: u8) -> Self {
        Self { id, name, ordinal }
    }

    pub fn id(&self) -> u8 {
        self.id
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn ordinal(&self) -> u8 {
        self.ordinal
    }
}

impl fmt::Display for Choice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ChoiceError {
    #[error("Invalid choice ID: {0}. Valid IDs are 1-5 (1=Rock, 2=Paper, 3=Scissors, 4=Lizard, 5=Spock)")]
    InvalidChoice(i64),
}
