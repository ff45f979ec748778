//! Reading a chat-history export.
//!
//! An export is a directory holding an `index.json`, one `channel.json`
//! descriptor per channel (at any depth) and a `c<id>/messages.csv` table
//! per channel.

use std::path::Path;

use crate::error::{Error, Result};

/// Concurrent discovery of channel descriptor files.
pub mod scanner;

/// Guild/channel hierarchy built from descriptors, plus channel selection.
pub mod guild;

/// Per-channel message tables and the ingestion loop.
pub mod messages;

/// Name of the export index listing every conversation.
pub const INDEX_FILE_NAME: &str = "index.json";

/// Scans an export and assembles its guilds, all channels disabled.
///
/// # Errors
/// Any structural problem in the export, or an export with no guilds.
pub fn load_guilds<P: AsRef<Path>>(root: P) -> Result<Vec<guild::Guild>> {
	let root = root.as_ref();

	let descriptor_paths = scanner::scan(root)?;
	let descriptors = guild::load_descriptors(&descriptor_paths)?;
	let direct_messages = guild::load_direct_messages(root.join(INDEX_FILE_NAME))?;

	let guilds = guild::assemble(&descriptors, direct_messages)?;
	if guilds.is_empty() {
		return Err(Error::NoGuilds(root.to_path_buf()));
	}
	Ok(guilds)
}
