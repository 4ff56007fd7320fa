//! Domain services - Pure game rules with no I/O

pub mod choice_generation;
mod outcome_engine;

pub use outcome_engine::{OutcomeEngine, Verdict};
