//! Utility functions for error handling
//!
//! File-system checks that map failures onto the pipeline's error taxonomy.

use std::fs;
use std::io;
use std::path::Path;
use std::time::SystemTime;

use crate::error::{MortalityError, Result};

/// Check that an input file exists and is a regular file
///
/// # Arguments
/// * `path` - The path to the input file
/// * `purpose` - Which input this is (for error context)
pub fn ensure_input_file(path: &Path, purpose: &str) -> Result<()> {
    if !path.exists() {
        return Err(MortalityError::MissingInput {
            path: path.to_path_buf(),
            purpose: purpose.to_string(),
        });
    }

    if !path.is_file() {
        return Err(MortalityError::unreadable(
            path,
            format!("expected a file for {purpose}, found a directory"),
        ));
    }

    Ok(())
}

/// Create the parent directory of `path` if it does not exist yet
pub fn ensure_parent_dir(path: &Path) -> Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => match fs::create_dir_all(parent) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::PermissionDenied => Err(MortalityError::Io(
                io::Error::new(
                    e.kind(),
                    format!("permission denied creating {}", parent.display()),
                ),
            )),
            Err(e) => Err(e.into()),
        },
        _ => Ok(()),
    }
}

/// Latest modification time among the paths that exist
///
/// Missing paths are ignored; `None` when none of them exist.
#[must_use]
pub fn latest_modification<'a, I>(paths: I) -> Option<SystemTime>
where
    I: IntoIterator<Item = &'a Path>,
{
    paths
        .into_iter()
        .filter_map(|p| fs::metadata(p).and_then(|m| m.modified()).ok())
        .max()
}
