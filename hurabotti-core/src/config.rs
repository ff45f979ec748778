use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{Error, Result};

/// Default location of the configuration file.
pub const DEFAULT_CONFIG_PATH: &str = "config.json";

/// Settings shared by the model tooling and the generation front-ends.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
	/// Directory models are saved to and loaded from.
	pub model_directory: PathBuf,
	/// Model files to load. Empty means every model in `model_directory`.
	pub models_to_use: Vec<String>,
	/// Upper bound on the number of words per generation request.
	pub max_words: usize,
	/// Default log filter, used when `RUST_LOG` is not set.
	pub log_level: String,
}

impl Default for Config {
	fn default() -> Self {
		Self {
			model_directory: PathBuf::from("models"),
			models_to_use: Vec::new(),
			max_words: 50,
			log_level: "info".to_owned(),
		}
	}
}

impl Config {
	/// Loads the configuration from `path`.
	///
	/// A missing or empty file is replaced by the default configuration,
	/// which is written back to `path`. Missing fields take their defaults.
	///
	/// # Errors
	/// I/O errors and malformed JSON.
	pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
		let path = path.as_ref();

		let contents = if path.exists() {
			fs::read_to_string(path).map_err(|e| Error::io(path, e))?
		} else {
			String::new()
		};

		if contents.trim().is_empty() {
			let config = Self::default();
			config.save(path)?;
			info!(path = %path.display(), "wrote a new config");
			return Ok(config);
		}

		serde_json::from_str(&contents).map_err(|source| Error::Json { path: path.to_path_buf(), source })
	}

	/// Writes the configuration as pretty-printed JSON.
	pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
		let path = path.as_ref();
		let json = serde_json::to_string_pretty(self)
			.map_err(|source| Error::Json { path: path.to_path_buf(), source })?;

		if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
			fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
		}
		fs::write(path, json).map_err(|e| Error::io(path, e))
	}
}
