use std::io;
use std::num::ParseIntError;
use std::path::PathBuf;

use thiserror::Error;

/// Convenience alias used across the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Broad failure categories, used by callers to decide how to report an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
	/// Missing or unreadable inputs, malformed JSON or table rows, bad ids.
	Structural,
	/// A pipeline stage produced nothing (no guilds, messages or words).
	EmptyResult,
	/// The target model file exists and overwriting was not authorized.
	PersistenceConflict,
	/// Model file bytes do not match the model record.
	Decode,
	/// The caller broke an entry point contract.
	Usage,
}

#[derive(Error, Debug)]
pub enum Error {
	/// A file or directory could not be read or written.
	#[error("I/O error on {path}: {source}")]
	Io {
		path: PathBuf,
		#[source]
		source: io::Error,
	},

	/// Directory traversal failed while scanning an export.
	#[error("failed to walk {path}: {source}")]
	Traversal {
		path: PathBuf,
		#[source]
		source: walkdir::Error,
	},

	#[error("malformed JSON in {path}: {source}")]
	Json {
		path: PathBuf,
		#[source]
		source: serde_json::Error,
	},

	#[error("failed to read table {path}: {source}")]
	Csv {
		path: PathBuf,
		#[source]
		source: csv::Error,
	},

	/// A message table row did not match the 4-field schema.
	#[error("malformed row at line {line} in {path}: {reason}")]
	MalformedRow {
		path: PathBuf,
		line: u64,
		reason: String,
	},

	#[error("invalid {what} id {value:?} in {path}: {source}")]
	InvalidId {
		what: &'static str,
		value: String,
		path: PathBuf,
		#[source]
		source: ParseIntError,
	},

	/// The scanner lost a worker thread.
	#[error("scan worker panicked while walking {0}")]
	WorkerPanicked(PathBuf),

	#[error("no guilds found in export {0}")]
	NoGuilds(PathBuf),

	#[error("no messages in {0}")]
	NoMessages(PathBuf),

	#[error("sanitized corpus is empty")]
	EmptyCorpus,

	#[error("no word models were loaded")]
	NoModels,

	#[error("model {0} already exists and overwrite was declined")]
	OverwriteDeclined(PathBuf),

	#[error("failed to decode model {path}: {reason}")]
	Decode { path: PathBuf, reason: String },

	#[error("failed to encode model: {0}")]
	Encode(#[source] postcard::Error),

	#[error("model {0:?} has no words")]
	EmptyModel(String),

	#[error("word count must be at least 1")]
	InvalidWordCount,

	#[error("no model at index {0}")]
	UnknownModel(usize),

	#[error("invalid model name {0:?}")]
	InvalidModelName(String),
}

impl Error {
	pub fn kind(&self) -> ErrorKind {
		match self {
			Error::Io { .. }
			| Error::Traversal { .. }
			| Error::Json { .. }
			| Error::Csv { .. }
			| Error::MalformedRow { .. }
			| Error::InvalidId { .. }
			| Error::WorkerPanicked(_)
			| Error::Encode(_) => ErrorKind::Structural,
			Error::NoGuilds(_) | Error::NoMessages(_) | Error::EmptyCorpus | Error::NoModels => {
				ErrorKind::EmptyResult
			}
			Error::OverwriteDeclined(_) => ErrorKind::PersistenceConflict,
			Error::Decode { .. } => ErrorKind::Decode,
			Error::EmptyModel(_)
			| Error::InvalidWordCount
			| Error::UnknownModel(_)
			| Error::InvalidModelName(_) => ErrorKind::Usage,
		}
	}

	pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
		Error::Io { path: path.into(), source }
	}
}
