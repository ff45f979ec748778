use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::error::{Error, Result};

/// Reserved id of the synthetic guild holding direct messages.
pub const DIRECT_MESSAGES_GUILD_ID: u64 = 0;

/// Reserved id of the synthetic guild holding group conversations.
pub const GROUPS_GUILD_ID: u64 = 1;

/// Channel `type` value used by group conversations.
pub const GROUP_CHANNEL_KIND: i64 = 3;

/// Display-name prefix marking direct message entries in `index.json`.
pub const DIRECT_MESSAGE_PREFIX: &str = "Direct Message with";

/// Contents of a `channel.json` file.
///
/// Field names are matched in lower case (the export format) and in the
/// capitalized form some tools write.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct ChannelDescriptor {
	#[serde(alias = "ID")]
	pub id: String,
	#[serde(rename = "type", alias = "Type", default)]
	pub kind: i64,
	#[serde(alias = "Name", default)]
	pub name: Option<String>,
	#[serde(alias = "Guild", default)]
	pub guild: Option<GuildRef>,
	/// File the descriptor was read from, for error reporting.
	#[serde(skip)]
	pub source: PathBuf,
}

/// Guild reference nested inside a channel descriptor.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct GuildRef {
	#[serde(alias = "ID")]
	pub id: String,
	#[serde(alias = "Name", default)]
	pub name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Guild {
	pub id: u64,
	pub name: String,
	pub channels: Vec<Channel>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Channel {
	pub id: u64,
	pub name: String,
	/// Whether the channel is included in corpus construction.
	pub enabled: bool,
}

impl Guild {
	pub fn new(id: u64, name: &str) -> Self {
		Self { id, name: name.to_owned(), channels: Vec::new() }
	}

	/// Enables or disables every channel of the guild.
	pub fn set_enabled(&mut self, enabled: bool) {
		for channel in &mut self.channels {
			channel.enabled = enabled;
		}
	}

	pub fn enabled_channels(&self) -> impl Iterator<Item = &Channel> {
		self.channels.iter().filter(|channel| channel.enabled)
	}
}

impl Channel {
	/// Builds a disabled channel from a descriptor, parsing its numeric id.
	fn from_descriptor(descriptor: &ChannelDescriptor) -> Result<Self> {
		Ok(Self {
			id: parse_id("channel", &descriptor.id, &descriptor.source)?,
			name: descriptor.name.clone().unwrap_or_default(),
			enabled: false,
		})
	}
}

fn parse_id(what: &'static str, value: &str, path: &Path) -> Result<u64> {
	value.parse::<u64>().map_err(|source| Error::InvalidId {
		what,
		value: value.to_owned(),
		path: path.to_path_buf(),
		source,
	})
}

/// Reads and decodes descriptor files.
///
/// # Errors
/// Malformed JSON is fatal. Unreadable files are logged and skipped, and so
/// are descriptors without a name (1:1 conversations carry none).
pub fn load_descriptors(paths: &[PathBuf]) -> Result<Vec<ChannelDescriptor>> {
	let mut descriptors = Vec::with_capacity(paths.len());

	for path in paths {
		let contents = match fs::read_to_string(path) {
			Ok(contents) => contents,
			Err(e) => {
				warn!(path = %path.display(), error = %e, "failed to read descriptor, skipping");
				continue;
			}
		};

		let mut descriptor: ChannelDescriptor = serde_json::from_str(&contents)
			.map_err(|source| Error::Json { path: path.clone(), source })?;
		descriptor.source = path.clone();

		if descriptor.name.as_deref().is_none_or(str::is_empty) {
			debug!(path = %path.display(), "descriptor has no name, skipping");
			continue;
		}
		descriptors.push(descriptor);
	}

	Ok(descriptors)
}

/// Builds the "Direct Messages" guild from an export's `index.json`.
///
/// Only entries whose display name starts with [`DIRECT_MESSAGE_PREFIX`]
/// become channels, in ascending key order.
pub fn load_direct_messages<P: AsRef<Path>>(index_path: P) -> Result<Guild> {
	let index_path = index_path.as_ref();
	let contents = fs::read_to_string(index_path).map_err(|e| Error::io(index_path, e))?;
	let index: BTreeMap<String, String> = serde_json::from_str(&contents)
		.map_err(|source| Error::Json { path: index_path.to_path_buf(), source })?;

	// Keyed by numeric id: snowflakes vary in digit count.
	let mut entries = BTreeMap::new();
	for (key, name) in index {
		if name.starts_with(DIRECT_MESSAGE_PREFIX) {
			entries.insert(parse_id("channel", &key, index_path)?, name);
		}
	}

	let mut guild = Guild::new(DIRECT_MESSAGES_GUILD_ID, "Direct Messages");
	guild.channels = entries
		.into_iter()
		.map(|(id, name)| Channel { id, name, enabled: false })
		.collect();

	debug!(count = guild.channels.len(), "loaded direct messages");
	Ok(guild)
}

/// Organizes descriptors into guilds.
///
/// Real guilds come first, in first-seen order, each holding every channel
/// that names it. They are followed by a synthetic "Groups" guild for group
/// conversations and by `direct_messages`. Synthetic guilds with no channels
/// are left out.
///
/// # Errors
/// Any guild or channel id that is not an unsigned integer aborts assembly.
pub fn assemble(descriptors: &[ChannelDescriptor], direct_messages: Guild) -> Result<Vec<Guild>> {
	let mut guilds = Vec::new();
	let mut seen = HashSet::new();

	for descriptor in descriptors {
		let Some(guild_ref) = &descriptor.guild else { continue };
		if guild_ref.id.is_empty() || !seen.insert(guild_ref.id.as_str()) {
			continue;
		}

		let mut guild = Guild::new(parse_id("guild", &guild_ref.id, &descriptor.source)?, &guild_ref.name);
		for member in descriptors {
			if member.guild.as_ref().is_some_and(|g| g.id == guild_ref.id) {
				guild.channels.push(Channel::from_descriptor(member)?);
			}
		}
		guilds.push(guild);
	}

	let mut groups = Guild::new(GROUPS_GUILD_ID, "Groups");
	for descriptor in descriptors.iter().filter(|d| d.kind == GROUP_CHANNEL_KIND) {
		groups.channels.push(Channel::from_descriptor(descriptor)?);
	}

	for synthetic in [groups, direct_messages] {
		if !synthetic.channels.is_empty() {
			guilds.push(synthetic);
		}
	}

	info!(guilds = guilds.len(), "assembled guilds");
	Ok(guilds)
}

/// Enables the channels with the given ids. Returns how many were enabled.
pub fn enable_channels(guilds: &mut [Guild], channel_ids: &[u64]) -> usize {
	let mut enabled = 0;
	for channel in guilds.iter_mut().flat_map(|g| g.channels.iter_mut()) {
		if channel_ids.contains(&channel.id) {
			channel.enabled = true;
			enabled += 1;
		}
	}
	enabled
}

/// Enables every channel of the guilds with the given ids.
pub fn enable_guilds(guilds: &mut [Guild], guild_ids: &[u64]) -> usize {
	let mut enabled = 0;
	for guild in guilds.iter_mut().filter(|g| guild_ids.contains(&g.id)) {
		guild.set_enabled(true);
		enabled += guild.channels.len();
	}
	enabled
}

pub fn enable_all(guilds: &mut [Guild]) {
	for guild in guilds {
		guild.set_enabled(true);
	}
}
