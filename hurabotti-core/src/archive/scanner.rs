use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};
use std::thread;

use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::error::{Error, Result};

/// Name of the per-channel descriptor file inside an export.
pub const DESCRIPTOR_FILE_NAME: &str = "channel.json";

/// Finds every channel descriptor below `root`, at any depth.
///
/// The subdirectories of `root` are split between a pool of worker threads
/// (one per CPU at most). Workers push matches into a single shared list
/// behind a mutex; the list is sorted by path string once all workers are
/// done, so the result is identical across runs whatever order the workers
/// finished in.
///
/// # Errors
/// - Any directory that cannot be listed aborts the whole scan.
/// - A descriptor that cannot be stat'ed is logged and skipped.
pub fn scan<P: AsRef<Path>>(root: P) -> Result<Vec<PathBuf>> {
	let root = root.as_ref();
	let found = Mutex::new(Vec::new());

	let mut directories = Vec::new();
	for entry in WalkDir::new(root).follow_links(false).min_depth(1).max_depth(1).sort_by_file_name() {
		let entry = entry.map_err(|e| traversal(root, e))?;
		if entry.file_type().is_dir() {
			directories.push(entry.into_path());
		} else {
			visit_file(entry.into_path(), &found);
		}
	}

	let workers = num_cpus::get().clamp(1, directories.len().max(1));
	let mut buckets: Vec<Vec<PathBuf>> = vec![Vec::new(); workers];
	for (i, directory) in directories.into_iter().enumerate() {
		buckets[i % workers].push(directory);
	}

	debug!(workers, root = %root.display(), "scanning export");

	thread::scope(|scope| -> Result<()> {
		let found = &found;
		let handles: Vec<_> = buckets
			.iter()
			.map(|bucket| scope.spawn(move || walk(bucket, found)))
			.collect();

		// Join every worker; a panicked one becomes an error.
		let mut outcome = Ok(());
		for handle in handles {
			let result = handle
				.join()
				.unwrap_or_else(|_| Err(Error::WorkerPanicked(root.to_path_buf())));
			if outcome.is_ok() {
				outcome = result;
			}
		}
		outcome
	})?;

	let mut found = found.into_inner().unwrap_or_else(PoisonError::into_inner);
	found.sort_by(|a, b| a.as_os_str().cmp(b.as_os_str()));

	info!(count = found.len(), "found channel descriptors");
	Ok(found)
}

/// Walks a set of directories, recording descriptor files. Symlinks are not
/// followed.
fn walk(directories: &[PathBuf], found: &Mutex<Vec<PathBuf>>) -> Result<()> {
	for directory in directories {
		for entry in WalkDir::new(directory).follow_links(false) {
			let entry = entry.map_err(|e| traversal(directory, e))?;
			if !entry.file_type().is_dir() {
				visit_file(entry.into_path(), found);
			}
		}
	}

	Ok(())
}

fn traversal(fallback: &Path, source: walkdir::Error) -> Error {
	let path = source.path().unwrap_or(fallback).to_path_buf();
	Error::Traversal { path, source }
}

fn visit_file(path: PathBuf, found: &Mutex<Vec<PathBuf>>) {
	if path.file_name() != Some(OsStr::new(DESCRIPTOR_FILE_NAME)) {
		return;
	}

	match fs::metadata(&path) {
		Ok(metadata) if metadata.is_file() => {
			found.lock().unwrap_or_else(PoisonError::into_inner).push(path);
		}
		Ok(_) => debug!(path = %path.display(), "descriptor is not a regular file, skipping"),
		Err(e) => warn!(path = %path.display(), error = %e, "failed reading file, skipping"),
	}
}
