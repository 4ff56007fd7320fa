//! Mapping from a raw random number to a computer choice

use std::num::NonZeroU32;

use super::OutcomeEngine;
use crate::domain::value_objects::Choice;

/// Fold any positive number onto `1..=choice_count` as `((raw - 1) mod N) + 1`
pub fn normalize(raw: NonZeroU32, choice_count: u8) -> u8 {
    let n = u32::from(choice_count.max(1));
    // result is at most n, which came from a u8
    (((raw.get() - 1) % n) + 1) as u8
}

/// Pick the computer's choice for a raw random number
pub fn computer_choice(engine: &OutcomeEngine, raw: NonZeroU32) -> Choice {
    let id = normalize(raw, engine.choice_count());
    // choices are sorted with identifiers exactly 1..=N
    engine.all_choices()[usize::from(id) - 1]
}
