//! Relay turn pipeline.
//!
//! Sequences router classification, the dispatched specialized responder,
//! and the per-user memory write for every conversation turn.

pub mod pipeline;
pub mod prompts;
pub mod state;

pub use pipeline::TurnPipeline;
pub use state::{TurnOutcome, TurnState};
