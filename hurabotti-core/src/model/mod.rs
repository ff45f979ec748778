//! Word models and Markov text generation.
//!
//! - Persisted word corpora (`WordModel`)
//! - Order-1 transition tables (`TransitionTable`) and their states
//! - Bounded text generation (`generator`)
//! - A registry of loaded models for generation front-ends

/// Bounded text generation from a word model.
pub mod generator;

/// Named word corpus and its on-disk record.
pub mod word_model;

/// Order-1 transition table over words and sentinels.
pub mod chain;

/// A single token of the chain and its weighted successors.
///
/// Not exposed publicly.
mod state;

/// Loaded models addressed by index, with model directory helpers.
pub mod registry;
