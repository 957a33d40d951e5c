//! Filesystem utilities.

use std::fs;
use std::io;
use std::path::Path;

use crate::error::BuildError;

/// Recursively copy a directory. Returns the number of files copied.
pub fn copy_dir_all(src: &Path, dst: &Path) -> Result<usize, BuildError> {
    ensure_dir(dst)?;

    let mut copied = 0;
    let entries = fs::read_dir(src)
        .map_err(|e| BuildError::io(format!("failed to read directory: {}", src.display()), e))?;

    for entry in entries {
        let entry = entry
            .map_err(|e| BuildError::io(format!("failed to read directory: {}", src.display()), e))?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());
        let file_type = entry
            .file_type()
            .map_err(|e| BuildError::io(format!("failed to stat {}", src_path.display()), e))?;

        if file_type.is_symlink() && src_path.is_dir() {
            tracing::warn!("skipping directory symlink {}", src_path.display());
        } else if file_type.is_dir() {
            copied += copy_dir_all(&src_path, &dst_path)?;
        } else {
            copy_file(&src_path, &dst_path)?;
            copied += 1;
        }
    }
    Ok(copied)
}

/// Copy a single file, overwriting the destination.
pub fn copy_file(src: &Path, dst: &Path) -> Result<(), BuildError> {
    fs::copy(src, dst).map_err(|e| {
        BuildError::io(
            format!("failed to copy {} to {}", src.display(), dst.display()),
            e,
        )
    })?;
    Ok(())
}

/// Remove a directory and all its contents, if it exists.
///
/// Returns `true` if something was removed.
pub fn remove_dir_all_if_exists(path: &Path) -> Result<bool, BuildError> {
    match fs::remove_dir_all(path) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(BuildError::io(
            format!("failed to remove directory: {}", path.display()),
            e,
        )),
    }
}

/// Ensure a directory exists, creating it and its parents if necessary.
pub fn ensure_dir(path: &Path) -> Result<(), BuildError> {
    fs::create_dir_all(path).map_err(|source| BuildError::DirectoryCreateError {
        path: path.to_path_buf(),
        source,
    })
}

/// Read a required input file to string.
pub fn read_to_string(path: &Path) -> Result<String, BuildError> {
    fs::read_to_string(path).map_err(|e| {
        if e.kind() == io::ErrorKind::NotFound {
            BuildError::MissingInputFile {
                path: path.to_path_buf(),
            }
        } else {
            BuildError::io(format!("failed to read file: {}", path.display()), e)
        }
    })
}

/// Read the first line of a required input file, trimmed of surrounding whitespace.
pub fn read_first_line(path: &Path) -> Result<String, BuildError> {
    let contents = read_to_string(path)?;
    Ok(contents.lines().next().unwrap_or_default().trim().to_string())
}
