use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{Error, Result};
use crate::io::{staging_path, with_model_extension};

/// A named, ordered word corpus.
///
/// Word order is meaningful: adjacent words are the transitions of the chain
/// built at generation time.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct WordModel {
	pub name: String,
	pub words: Vec<String>,
}

impl WordModel {
	pub fn new(name: &str, words: Vec<String>) -> Self {
		Self { name: name.to_owned(), words }
	}

	/// Saves the model as `directory/<file_name>.bin`.
	///
	/// The extension is appended when `file_name` lacks it and `directory` is
	/// created when missing. If the target already exists, `confirm_overwrite`
	/// decides whether it is replaced.
	///
	/// The record is written to a hidden sibling file first and renamed into
	/// place, so the target is never left half-written.
	///
	/// # Errors
	/// - `EmptyCorpus` if the model has no words (nothing touches the disk)
	/// - `OverwriteDeclined` if the file exists and the callback refused
	/// - I/O and encoding errors
	pub fn save<P, F>(&self, directory: P, file_name: &str, confirm_overwrite: F) -> Result<PathBuf>
	where
		P: AsRef<Path>,
		F: FnOnce(&Path) -> bool,
	{
		if self.words.is_empty() {
			return Err(Error::EmptyCorpus);
		}

		let directory = directory.as_ref();
		let path = directory.join(with_model_extension(file_name));
		if path.file_name().is_none() || path.parent() != Some(directory) {
			return Err(Error::InvalidModelName(file_name.to_owned()));
		}

		fs::create_dir_all(directory).map_err(|e| Error::io(directory, e))?;

		if path.exists() && !confirm_overwrite(&path) {
			return Err(Error::OverwriteDeclined(path));
		}

		let bytes = postcard::to_stdvec(self).map_err(Error::Encode)?;
		let staged = staging_path(&path).map_err(|e| Error::io(&path, e))?;
		let written = fs::write(&staged, bytes)
			.map_err(|e| Error::io(&staged, e))
			.and_then(|()| fs::rename(&staged, &path).map_err(|e| Error::io(&path, e)));
		if let Err(e) = written {
			let _ = fs::remove_file(&staged);
			return Err(e);
		}

		info!(model = %self.name, words = self.words.len(), path = %path.display(), "saved model");
		Ok(path)
	}

	/// Loads a model from a file written by [`WordModel::save`].
	///
	/// An empty word list is accepted; generation rejects it later.
	///
	/// # Errors
	/// `Decode` if the bytes are not exactly one model record.
	pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
		let path = path.as_ref();
		let bytes = fs::read(path).map_err(|e| Error::io(path, e))?;
		Self::from_bytes(&bytes).map_err(|reason| Error::Decode { path: path.to_path_buf(), reason })
	}

	fn from_bytes(bytes: &[u8]) -> std::result::Result<Self, String> {
		let (model, rest) = postcard::take_from_bytes::<Self>(bytes).map_err(|e| e.to_string())?;
		if !rest.is_empty() {
			return Err(format!("{} trailing bytes after model record", rest.len()));
		}
		Ok(model)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use tempfile::TempDir;

	fn model() -> WordModel {
		WordModel::new("general", vec!["hello".into(), "wörld".into(), "".into(), "hello".into()])
	}

	#[test]
	fn test_save_then_load_round_trips() {
		let dir = TempDir::new().unwrap();
		let path = model().save(dir.path().join("models"), "general", |_| false).unwrap();

		assert_eq!(path, dir.path().join("models/general.bin"));
		assert_eq!(WordModel::load(&path).unwrap(), model());
	}

	#[test]
	fn test_save_keeps_existing_extension() {
		let dir = TempDir::new().unwrap();
		let path = model().save(dir.path(), "general.bin", |_| false).unwrap();
		assert_eq!(path, dir.path().join("general.bin"));
	}

	#[test]
	fn test_save_refuses_empty_corpus() {
		let dir = TempDir::new().unwrap();
		let models = dir.path().join("models");
		let err = WordModel::new("empty", Vec::new()).save(&models, "empty", |_| true).unwrap_err();

		assert!(matches!(err, Error::EmptyCorpus));
		assert!(!models.exists());
	}

	#[test]
	fn test_save_declined_overwrite_keeps_file() {
		let dir = TempDir::new().unwrap();
		let path = model().save(dir.path(), "general", |_| false).unwrap();
		let before = fs::read(&path).unwrap();

		let other = WordModel::new("other", vec!["x".into()]);
		let err = other.save(dir.path(), "general", |asked| {
			assert_eq!(asked, path.as_path());
			false
		});

		assert!(matches!(err.unwrap_err(), Error::OverwriteDeclined(_)));
		assert_eq!(fs::read(&path).unwrap(), before);
	}

	#[test]
	fn test_save_confirmed_overwrite_replaces_file() {
		let dir = TempDir::new().unwrap();
		model().save(dir.path(), "general", |_| false).unwrap();

		let other = WordModel::new("other", vec!["x".into()]);
		let path = other.save(dir.path(), "general", |_| true).unwrap();

		assert_eq!(WordModel::load(&path).unwrap(), other);
		assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
	}

	#[test]
	fn test_failed_save_leaves_no_staged_file() {
		let dir = TempDir::new().unwrap();
		// A non-empty directory at the target makes the final rename fail.
		let target = dir.path().join("general.bin");
		fs::create_dir(&target).unwrap();
		fs::write(target.join("keep"), b"x").unwrap();

		let err = model().save(dir.path(), "general", |_| true).unwrap_err();
		assert!(matches!(err, Error::Io { .. }));

		let left: Vec<_> = fs::read_dir(dir.path()).unwrap().map(|e| e.unwrap().file_name()).collect();
		assert_eq!(left, vec![std::ffi::OsString::from("general.bin")]);
	}

	#[test]
	fn test_save_rejects_nested_names() {
		let dir = TempDir::new().unwrap();
		let err = model().save(dir.path(), "../escape", |_| true).unwrap_err();
		assert!(matches!(err, Error::InvalidModelName(_)));
	}

	#[test]
	fn test_load_rejects_garbage() {
		let dir = TempDir::new().unwrap();
		let path = dir.path().join("broken.bin");
		fs::write(&path, [0xff, 0xff, 0xff]).unwrap();

		assert!(matches!(WordModel::load(&path).unwrap_err(), Error::Decode { .. }));
	}

	#[test]
	fn test_load_rejects_trailing_bytes() {
		let dir = TempDir::new().unwrap();
		let path = dir.path().join("long.bin");
		let mut bytes = postcard::to_stdvec(&model()).unwrap();
		bytes.push(0);
		fs::write(&path, bytes).unwrap();

		assert!(matches!(WordModel::load(&path).unwrap_err(), Error::Decode { .. }));
	}

	#[test]
	fn test_load_accepts_empty_words() {
		let dir = TempDir::new().unwrap();
		let path = dir.path().join("empty.bin");
		fs::write(&path, postcard::to_stdvec(&WordModel::new("empty", Vec::new())).unwrap()).unwrap();

		assert!(WordModel::load(&path).unwrap().words.is_empty());
	}
}
