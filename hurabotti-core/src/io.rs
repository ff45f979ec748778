use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::{env, fs, io};

/// Extension given to every persisted word model.
pub const MODEL_EXTENSION: &str = "bin";

/// Appends the model extension to a file name unless it already carries it.
///
/// Examples:
/// - `"general"` → `"general.bin"`
/// - `"general.bin"` → `"general.bin"`
/// - `"v1.2"` → `"v1.2.bin"`
pub(crate) fn with_model_extension(file_name: &str) -> String {
	if Path::new(file_name).extension() == Some(OsStr::new(MODEL_EXTENSION)) {
		file_name.to_owned()
	} else {
		format!("{file_name}.{MODEL_EXTENSION}")
	}
}

/// Builds a sibling path used to stage a write before renaming it into place.
///
/// `models/general.bin` → `models/.general.bin.tmp`
pub(crate) fn staging_path<P: AsRef<Path>>(target: P) -> io::Result<PathBuf> {
	let target = target.as_ref();

	let parent = target.parent().unwrap_or_else(|| Path::new("."));
	let file_name = target
		.file_name()
		.ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "Target path has no filename"))?;

	Ok(parent.join(format!(".{}.tmp", file_name.to_string_lossy())))
}

/// Normalize a folder path.
///
/// - `""`, `"."` or `"./"` resolves to the current working directory
/// - Other paths are returned as-is (not canonicalized)
pub(crate) fn normalize_folder(input: &Path) -> PathBuf {
	let as_str = input.to_string_lossy();
	if as_str.is_empty() || as_str == "." || as_str == "./" {
		env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
	} else {
		input.to_path_buf()
	}
}

/// Lists all files with a given extension in a directory, sorted by name.
///
/// Returns file names only (no paths). Subdirectories are ignored.
pub(crate) fn list_files<P: AsRef<Path>>(dir: P, extension: &str) -> io::Result<Vec<String>> {
	let mut files = Vec::new();

	for entry in fs::read_dir(dir)? {
		let path = entry?.path();

		if path.is_file() && path.extension() == Some(OsStr::new(extension)) {
			if let Some(name) = path.file_name() {
				files.push(name.to_string_lossy().to_string());
			}
		}
	}

	files.sort();
	Ok(files)
}
