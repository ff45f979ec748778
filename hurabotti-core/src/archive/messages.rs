use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use tracing::info;

use super::guild::Guild;
use crate::error::{Error, Result};

/// Name of the per-channel message table inside an export.
pub const MESSAGE_TABLE_FILE_NAME: &str = "messages.csv";

/// First field of the header row (`ID,Timestamp,Contents,Attachments`).
const HEADER_FIRST_FIELD: &str = "ID";

const FIELDS_PER_ROW: usize = 4;

/// One row of a channel's message table.
#[derive(Debug, Clone, PartialEq)]
pub struct RawMessage {
	pub id: u64,
	pub timestamp: String,
	pub contents: String,
	pub attachments: String,
}

/// Location of a channel's message table: `<root>/c<id>/messages.csv`.
pub fn message_table_path<P: AsRef<Path>>(root: P, channel_id: u64) -> PathBuf {
	root.as_ref().join(format!("c{channel_id}")).join(MESSAGE_TABLE_FILE_NAME)
}

/// Parses a message table, keeping file row order.
///
/// Rows whose first field is `ID` are headers and are skipped. `source` is
/// only used in error messages.
///
/// # Errors
/// - A row without exactly 4 fields, or with a non-numeric id.
/// - No data rows at all.
pub fn parse_message_table<R: Read>(reader: R, source: &Path) -> Result<Vec<RawMessage>> {
	let mut reader = csv::ReaderBuilder::new()
		.has_headers(false)
		.flexible(true)
		.from_reader(reader);

	let mut messages = Vec::new();
	for record in reader.records() {
		let record = record.map_err(|source_error| Error::Csv { path: source.to_path_buf(), source: source_error })?;
		let line = record.position().map_or(0, |position| position.line());

		if record.len() != FIELDS_PER_ROW {
			return Err(Error::MalformedRow {
				path: source.to_path_buf(),
				line,
				reason: format!("expected {FIELDS_PER_ROW} fields, found {}", record.len()),
			});
		}

		if &record[0] == HEADER_FIRST_FIELD {
			continue;
		}

		let id = record[0].parse::<u64>().map_err(|parse_error| Error::InvalidId {
			what: "message",
			value: record[0].to_owned(),
			path: source.to_path_buf(),
			source: parse_error,
		})?;

		messages.push(RawMessage {
			id,
			timestamp: record[1].to_owned(),
			contents: record[2].to_owned(),
			attachments: record[3].to_owned(),
		});
	}

	if messages.is_empty() {
		return Err(Error::NoMessages(source.to_path_buf()));
	}
	Ok(messages)
}

/// Opens and parses a message table file.
pub fn read_message_table<P: AsRef<Path>>(path: P) -> Result<Vec<RawMessage>> {
	let path = path.as_ref();
	let file = File::open(path).map_err(|e| Error::io(path, e))?;
	parse_message_table(BufReader::new(file), path)
}

/// Reads the messages of every enabled channel, guild by guild.
///
/// Records are concatenated in guild order, then channel order, then row
/// order. The first channel that fails aborts the whole ingestion.
pub fn ingest<P: AsRef<Path>>(root: P, guilds: &[Guild]) -> Result<Vec<RawMessage>> {
	let root = root.as_ref();
	let mut messages = Vec::new();

	for guild in guilds {
		for channel in guild.enabled_channels() {
			info!(channel = %channel.name, guild = %guild.name, "processing channel");
			messages.extend(read_message_table(message_table_path(root, channel.id))?);
		}
	}

	if messages.is_empty() {
		return Err(Error::NoMessages(root.to_path_buf()));
	}

	info!(count = messages.len(), "parsed messages");
	Ok(messages)
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::archive::guild::Channel;
	use std::fs;
	use tempfile::TempDir;

	const TABLE: &str = "ID,Timestamp,Contents,Attachments
000000000000000001,2000-01-01 12:00:00.000000+00:00,Test message #1,
000000000000000002,2000-01-01 12:00:00.000000+00:00,Test message #2,
000000000000000003,2000-01-01 12:00:00.000000+00:00,Attachment message,https://test.attachment.test/
000000000000000004,2000-01-01 12:00:00.000000+00:00,https://test.attachment.test/,
000000000000000005,2000-01-01 12:00:00.000000+00:00,Wow animated emoji <a:123456789>,
000000000000000006,2000-01-01 12:00:00.000000+00:00,Hey <@123456789> this is a mention!,
000000000000000007,2000-01-01 12:00:00.000000+00:00,<#123456789> is a pretty cool channel,
";

	fn parse(table: &str) -> Result<Vec<RawMessage>> {
		parse_message_table(table.as_bytes(), Path::new("messages.csv"))
	}

	#[test]
	fn test_parse_keeps_row_order() {
		let messages = parse(TABLE).unwrap();
		assert_eq!(messages.len(), 7);
		assert_eq!(messages.iter().map(|m| m.id).collect::<Vec<_>>(), (1..=7).collect::<Vec<_>>());
		assert_eq!(messages[2].attachments, "https://test.attachment.test/");
		assert_eq!(messages[0].timestamp, "2000-01-01 12:00:00.000000+00:00");
	}

	#[test]
	fn test_parse_quoted_contents() {
		let messages = parse("ID,Timestamp,Contents,Attachments\n1,t,\"Hello, \"\"world\"\"\nsecond line\",\n").unwrap();
		assert_eq!(messages.len(), 1);
		assert_eq!(messages[0].contents, "Hello, \"world\"\nsecond line");
	}

	#[test]
	fn test_parse_rejects_wrong_field_count() {
		let err = parse("ID,Timestamp,Contents,Attachments\n1,t,hello,\n2,t,too,many,fields\n").unwrap_err();
		match err {
			Error::MalformedRow { line, .. } => assert_eq!(line, 3),
			other => panic!("unexpected error: {other}"),
		}
	}

	#[test]
	fn test_parse_rejects_bad_id() {
		let err = parse("ID,Timestamp,Contents,Attachments\nabc,t,hello,\n").unwrap_err();
		assert!(matches!(err, Error::InvalidId { what: "message", .. }));
	}

	#[test]
	fn test_parse_header_only_is_empty() {
		let err = parse("ID,Timestamp,Contents,Attachments\n").unwrap_err();
		assert!(matches!(err, Error::NoMessages(_)));
	}

	#[test]
	fn test_ingest_follows_guild_and_channel_order() {
		let dir = TempDir::new().unwrap();
		for (id, body) in [(1u64, "first"), (2, "second"), (3, "third")] {
			let path = message_table_path(dir.path(), id);
			fs::create_dir_all(path.parent().unwrap()).unwrap();
			fs::write(&path, format!("ID,Timestamp,Contents,Attachments\n{id},t,{body},\n")).unwrap();
		}

		let channel = |id: u64, enabled: bool| Channel { id, name: format!("c{id}"), enabled };
		let guilds = vec![
			Guild { id: 10, name: "a".into(), channels: vec![channel(3, true), channel(2, false)] },
			Guild { id: 20, name: "b".into(), channels: vec![channel(1, true)] },
		];

		let messages = ingest(dir.path(), &guilds).unwrap();
		let contents: Vec<&str> = messages.iter().map(|m| m.contents.as_str()).collect();
		assert_eq!(contents, vec!["third", "first"]);
	}

	#[test]
	fn test_ingest_missing_table_aborts() {
		let dir = TempDir::new().unwrap();
		let guilds = vec![Guild {
			id: 10,
			name: "a".into(),
			channels: vec![Channel { id: 42, name: "gone".into(), enabled: true }],
		}];

		assert!(matches!(ingest(dir.path(), &guilds).unwrap_err(), Error::Io { .. }));
	}

	#[test]
	fn test_ingest_nothing_enabled() {
		let dir = TempDir::new().unwrap();
		let guilds = vec![Guild::new(10, "a")];
		assert!(matches!(ingest(dir.path(), &guilds).unwrap_err(), Error::NoMessages(_)));
	}
}
