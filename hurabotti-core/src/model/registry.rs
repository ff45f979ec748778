use std::fs;
use std::path::{Path, PathBuf};

use rand::Rng;
use tracing::{info, warn};

use super::generator;
use super::word_model::WordModel;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::io::{self, MODEL_EXTENSION};

/// Set of loaded word models, addressed by index.
///
/// # Responsibilities
/// - Load the models named by the configuration, or a whole directory
/// - Clamp generation requests to the configured word limit
/// - Generate text without ever mutating a stored model
#[derive(Debug)]
pub struct ModelRegistry {
	models: Vec<WordModel>,
	max_words: usize,
}

impl ModelRegistry {
	/// Creates a registry from already loaded models.
	///
	/// A `max_words` of 0 disables the limit.
	pub fn new(models: Vec<WordModel>, max_words: usize) -> Self {
		Self { models, max_words }
	}

	/// Loads the models described by `config`.
	///
	/// # Behavior
	/// - With `models_to_use` set, each entry is opened as given, then
	///   relative to `model_directory`. Entries that fail are logged and
	///   skipped.
	/// - Otherwise every `.bin` file of `model_directory` is loaded, in file
	///   name order, and any failure is fatal.
	///
	/// # Errors
	/// `NoModels` if nothing was loaded.
	pub fn from_config(config: &Config) -> Result<Self> {
		let directory = io::normalize_folder(&config.model_directory);

		let models = if config.models_to_use.is_empty() {
			Self::load_directory(&directory)?
		} else {
			config
				.models_to_use
				.iter()
				.filter_map(|entry| match Self::load_entry(&directory, entry) {
					Ok(model) => Some(model),
					Err(e) => {
						warn!(model = %entry, error = %e, "failed to load model, skipping");
						None
					}
				})
				.collect()
		};

		if models.is_empty() {
			return Err(Error::NoModels);
		}

		info!(count = models.len(), "models loaded");
		Ok(Self::new(models, config.max_words))
	}

	fn load_entry(directory: &Path, entry: &str) -> Result<WordModel> {
		let direct = Path::new(entry);
		if direct.is_file() {
			return WordModel::load(direct);
		}
		WordModel::load(directory.join(entry))
	}

	fn load_directory(directory: &Path) -> Result<Vec<WordModel>> {
		let files = io::list_files(directory, MODEL_EXTENSION).map_err(|e| Error::io(directory, e))?;

		let mut models = Vec::with_capacity(files.len());
		for file in files {
			let model = WordModel::load(directory.join(&file))?;
			info!(model = %model.name, words = model.words.len(), "loaded model");
			models.push(model);
		}
		Ok(models)
	}

	/// Names of the loaded models, in index order.
	pub fn names(&self) -> Vec<&str> {
		self.models.iter().map(|model| model.name.as_str()).collect()
	}

	pub fn get(&self, index: usize) -> Option<&WordModel> {
		self.models.get(index)
	}

	pub fn len(&self) -> usize {
		self.models.len()
	}

	pub fn is_empty(&self) -> bool {
		self.models.is_empty()
	}

	pub fn max_words(&self) -> usize {
		self.max_words
	}

	/// Generates text from the model at `index`.
	///
	/// `word_count` is clamped to the registry's word limit.
	pub fn generate(&self, index: usize, word_count: usize) -> Result<String> {
		self.generate_with_rng(index, word_count, &mut rand::rng())
	}

	pub fn generate_with_rng<R: Rng + ?Sized>(&self, index: usize, word_count: usize, rng: &mut R) -> Result<String> {
		let model = self.get(index).ok_or(Error::UnknownModel(index))?;
		let word_count = if self.max_words > 0 { word_count.min(self.max_words) } else { word_count };
		generator::generate_with_rng(model, word_count, rng)
	}
}

/// Lists the model files of a directory, without their extension.
pub fn list_models<P: AsRef<Path>>(directory: P) -> Result<Vec<String>> {
	let directory = directory.as_ref();
	let files = io::list_files(directory, MODEL_EXTENSION).map_err(|e| Error::io(directory, e))?;

	Ok(files
		.into_iter()
		.map(|file| file.strip_suffix(&format!(".{MODEL_EXTENSION}")).unwrap_or(&file).to_owned())
		.collect())
}

/// Deletes a model file from a directory. Returns the removed path.
pub fn remove_model<P: AsRef<Path>>(directory: P, file_name: &str) -> Result<PathBuf> {
	let directory = directory.as_ref();
	let path = directory.join(io::with_model_extension(file_name));
	if path.parent() != Some(directory) {
		return Err(Error::InvalidModelName(file_name.to_owned()));
	}

	fs::remove_file(&path).map_err(|e| Error::io(&path, e))?;
	info!(path = %path.display(), "removed model");
	Ok(path)
}

#[cfg(test)]
mod tests {
	use super::*;
	use rand::SeedableRng;
	use rand::rngs::StdRng;
	use tempfile::TempDir;

	fn save(directory: &Path, name: &str, words: &[&str]) -> PathBuf {
		WordModel::new(name, words.iter().map(|w| (*w).to_owned()).collect())
			.save(directory, name, |_| false)
			.unwrap()
	}

	fn config(directory: &Path, models_to_use: Vec<String>, max_words: usize) -> Config {
		Config {
			model_directory: directory.to_path_buf(),
			models_to_use,
			max_words,
			..Config::default()
		}
	}

	#[test]
	fn test_loads_whole_directory_in_name_order() {
		let dir = TempDir::new().unwrap();
		save(dir.path(), "zeta", &["z"]);
		save(dir.path(), "alpha", &["a"]);

		let registry = ModelRegistry::from_config(&config(dir.path(), Vec::new(), 50)).unwrap();
		assert_eq!(registry.names(), vec!["alpha", "zeta"]);
	}

	#[test]
	fn test_loads_listed_models_and_skips_failures() {
		let dir = TempDir::new().unwrap();
		let absolute = save(dir.path(), "first", &["a"]);
		save(dir.path(), "second", &["b"]);

		let listed = vec![
			absolute.to_string_lossy().to_string(),
			"second.bin".to_owned(),
			"missing.bin".to_owned(),
		];
		let registry = ModelRegistry::from_config(&config(dir.path(), listed, 50)).unwrap();
		assert_eq!(registry.names(), vec!["first", "second"]);
	}

	#[test]
	fn test_no_models_is_an_error() {
		let dir = TempDir::new().unwrap();
		let err = ModelRegistry::from_config(&config(dir.path(), Vec::new(), 50)).unwrap_err();
		assert!(matches!(err, Error::NoModels));
	}

	#[test]
	fn test_corrupt_model_in_directory_is_fatal() {
		let dir = TempDir::new().unwrap();
		save(dir.path(), "good", &["a"]);
		fs::write(dir.path().join("bad.bin"), [0xff]).unwrap();

		let err = ModelRegistry::from_config(&config(dir.path(), Vec::new(), 50)).unwrap_err();
		assert!(matches!(err, Error::Decode { .. }));
	}

	#[test]
	fn test_generate_clamps_to_max_words() {
		let words: Vec<String> = (0..100).map(|i| format!("w{i}")).collect();
		let registry = ModelRegistry::new(vec![WordModel::new("seq", words)], 3);
		let mut rng = StdRng::seed_from_u64(4);

		for _ in 0..50 {
			let text = registry.generate_with_rng(0, 1_000, &mut rng).unwrap();
			assert!(text.split(' ').count() <= 3, "{text:?}");
		}
	}

	#[test]
	fn test_generate_unknown_index() {
		let registry = ModelRegistry::new(vec![WordModel::new("m", vec!["a".into()])], 0);
		assert!(matches!(registry.generate(1, 5), Err(Error::UnknownModel(1))));
		assert_eq!(registry.generate(0, 5).unwrap(), "a");
	}

	#[test]
	fn test_list_and_remove_models() {
		let dir = TempDir::new().unwrap();
		save(dir.path(), "general", &["a"]);
		save(dir.path(), "memes", &["b"]);
		fs::write(dir.path().join("readme.txt"), "").unwrap();

		assert_eq!(list_models(dir.path()).unwrap(), vec!["general", "memes"]);

		remove_model(dir.path(), "general").unwrap();
		assert_eq!(list_models(dir.path()).unwrap(), vec!["memes"]);
		assert!(matches!(remove_model(dir.path(), "general").unwrap_err(), Error::Io { .. }));
	}
}
