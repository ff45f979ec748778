use std::path::Path;

use tracing::info;

use crate::archive::guild::Guild;
use crate::archive::messages;
use crate::error::{Error, Result};
use crate::model::word_model::WordModel;
use crate::sanitizer;

/// Builds a word model from the enabled channels of an export.
///
/// Messages are ingested guild by guild and channel by channel, then
/// sanitized into a single word sequence. Nothing is written to disk; the
/// caller saves the returned model once it is complete.
///
/// # Errors
/// Any ingestion error, or `EmptyCorpus` if every token was discarded.
pub fn build_corpus<P: AsRef<Path>>(root: P, guilds: &[Guild], name: &str) -> Result<WordModel> {
	let records = messages::ingest(root, guilds)?;

	info!("sanitizing messages and splitting words");
	let words = sanitizer::sanitize(&records);
	if words.is_empty() {
		return Err(Error::EmptyCorpus);
	}

	info!(words = words.len(), "corpus built");
	Ok(WordModel::new(name, words))
}
