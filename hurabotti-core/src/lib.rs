//! Chat-export corpus builder and Markov text generator.
//!
//! This crate provides:
//! - Concurrent discovery of channel descriptors in a chat-history export
//! - Assembly of those descriptors into guilds and channels
//! - Ingestion and sanitization of message tables into a word corpus
//! - Persistence of word models
//! - Order-1 Markov generation of bounded text from a model
//!
//! File and path helpers are kept internal.

/// Export scanning, guild assembly and message ingestion.
pub mod archive;

/// Tokenizing and filtering message text.
pub mod sanitizer;

/// Ingestion followed by sanitization, producing a word model.
pub mod corpus;

/// Word models, transition tables and generation.
pub mod model;

/// JSON configuration file.
pub mod config;

pub mod error;

/// I/O utilities (path helpers, directory listing).
///
/// Not exposed
pub(crate) mod io;

pub use config::Config;
pub use error::{Error, ErrorKind, Result};
pub use io::MODEL_EXTENSION;
pub use model::word_model::WordModel;
