//! Secure file writing utilities for bundle output.
//!
//! - **Path Validation**: every output name must stay inside the output directory
//! - **Atomic Writes**: each file is written to `<name>.tmp` and renamed into place
//! - **Rollback**: if any write fails, temp files written so far are deleted
//! - **Directory Creation**: parent directories are created as needed

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use path_clean::PathClean;

use crate::barrier::WrittenFiles;
use crate::manifest::Bundle;
use crate::{Error, Result};

/// Writes a bundle to disk with security checks and atomic guarantees.
///
/// Returns the absolute paths written, in bundle order.
///
/// # Errors
///
/// - Path validation fails (directory traversal attempt)
/// - File already exists and `overwrite` is `false`
/// - Any I/O operation fails
///
/// # Examples
///
/// ```no_run
/// use litpack_bundler::{Bundle, output::write_bundle_to};
/// use std::path::Path;
///
/// # fn example(bundle: &Bundle) -> litpack_bundler::Result<()> {
/// let written = write_bundle_to(bundle, Path::new("dist"), true)?;
/// println!("{} files", written.files.len());
/// # Ok(())
/// # }
/// ```
pub fn write_bundle_to(bundle: &Bundle, dir: &Path, overwrite: bool) -> Result<WrittenFiles> {
    let dir = validate_and_normalize_dir(dir)?;

    fs::create_dir_all(&dir).map_err(|e| {
        Error::WriteFailure(format!(
            "Failed to create output directory '{}': {}",
            dir.display(),
            e
        ))
    })?;

    let mut operations = Vec::with_capacity(bundle.files.len());
    for file in &bundle.files {
        let target_path = validate_output_path(&dir, &file.file_name)?;

        if !overwrite && target_path.exists() {
            return Err(Error::OutputExists(format!(
                "File already exists: '{}'. Use overwrite=true to replace.",
                target_path.display()
            )));
        }

        operations.push((target_path, file.contents.as_slice()));
    }

    write_files_atomic(&operations)?;

    Ok(WrittenFiles {
        output_dir: dir,
        files: operations.into_iter().map(|(path, _)| path).collect(),
    })
}

/// Write one file through a sibling temp file and a rename.
pub fn write_atomic(path: &Path, contents: &[u8]) -> Result<()> {
    write_files_atomic(&[(path.to_path_buf(), contents)])
}

/// `<path>.tmp`, keeping the full original file name (`main.js` -> `main.js.tmp`).
pub fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(OsString::from)
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

/// Validates and normalizes a directory path.
pub(crate) fn validate_and_normalize_dir(dir: &Path) -> Result<PathBuf> {
    let cleaned = dir.clean();

    let absolute = if cleaned.is_absolute() {
        cleaned
    } else {
        std::env::current_dir()
            .map_err(|e| {
                Error::InvalidOutputPath(format!("Failed to get current directory: {}", e))
            })?
            .join(&cleaned)
            .clean()
    };

    Ok(absolute)
}

/// Validates an output path to prevent directory traversal attacks.
///
/// Both the base directory and the file name are cleaned, joined, and cleaned
/// again; the result must still be under `base_dir`.
pub(crate) fn validate_output_path(base_dir: &Path, filename: &str) -> Result<PathBuf> {
    if filename.contains('\0') {
        return Err(Error::InvalidOutputPath(
            "Filename contains null byte".to_string(),
        ));
    }

    let filename_path = Path::new(filename).clean();
    let full_path = base_dir.join(&filename_path).clean();

    if !full_path.starts_with(base_dir) || full_path == base_dir {
        return Err(Error::InvalidOutputPath(format!(
            "Path '{}' escapes output directory '{}' (resolved to '{}')",
            filename,
            base_dir.display(),
            full_path.display()
        )));
    }

    Ok(full_path)
}

/// Writes multiple files atomically with automatic rollback on failure.
///
/// 1. Write all content to temporary files (`.tmp` suffix)
/// 2. If all writes succeed, rename temp files to final names
/// 3. If any operation fails, delete all temp files
fn write_files_atomic(operations: &[(PathBuf, &[u8])]) -> Result<()> {
    let mut temp_files = Vec::new();

    // Phase 1: Write to temporary files
    for (target_path, content) in operations {
        if let Some(parent) = target_path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                cleanup_temp_files(&temp_files);
                Error::WriteFailure(format!(
                    "Failed to create directory '{}': {}",
                    parent.display(),
                    e
                ))
            })?;
        }

        let temp_path = temp_path_for(target_path);
        fs::write(&temp_path, content).map_err(|e| {
            cleanup_temp_files(&temp_files);
            let _ = fs::remove_file(&temp_path);
            Error::WriteFailure(format!(
                "Failed to write temporary file '{}': {}",
                temp_path.display(),
                e
            ))
        })?;

        temp_files.push((temp_path, target_path.clone()));
    }

    // Phase 2: Rename temp files to final names
    for (temp_path, target_path) in &temp_files {
        fs::rename(temp_path, target_path).map_err(|e| {
            cleanup_temp_files(&temp_files);
            Error::WriteFailure(format!(
                "Failed to rename '{}' to '{}': {}",
                temp_path.display(),
                target_path.display(),
                e
            ))
        })?;
    }

    Ok(())
}

/// Best-effort cleanup; failures are logged since we're already in an error state.
fn cleanup_temp_files(temp_files: &[(PathBuf, PathBuf)]) {
    for (temp_path, _) in temp_files {
        if temp_path.exists() {
            if let Err(e) = fs::remove_file(temp_path) {
                tracing::warn!(
                    "Failed to clean up temporary file '{}': {}",
                    temp_path.display(),
                    e
                );
            }
        }
    }
}
