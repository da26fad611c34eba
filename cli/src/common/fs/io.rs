//! # ejbpack Filesystem I/O Operations
//!
//! File: cli/src/common/fs/io.rs
//!
//! ## Overview
//!
//! This module centralizes fundamental filesystem input/output operations
//! required by ejbpack. It provides wrappers around `std::fs` functions that
//! attach context to failures.
//!
//! ## Architecture
//!
//! - **`ensure_dir_exists`**: Creates a directory (and parents) when missing, and
//!   fails if the path exists but is not a directory. Used for the output directory
//!   before an archive is written and for a missing source directory.
//! - **`read_file_bytes`**: Reads a whole file as bytes (archive entries, descriptors).
//! - **`write_bytes_to_file`** / **`write_string_to_file`**: Write content, creating the
//!   parent directory first. Used by descriptor filtering and the artifact report.
//!
use crate::core::error::{EjbError, Result};
use anyhow::Context;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

/// Ensures that a directory exists at the specified path.
///
/// If the path does not exist, this function creates it, including any
/// necessary parent directories (similar to `mkdir -p`). If the path already
/// exists but is not a directory, an `EjbError::FileSystem` is returned.
pub fn ensure_dir_exists(path: &Path) -> Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)
            .with_context(|| format!("Failed to create directory {:?}", path))?;
        info!("Created directory: {:?}", path);
    } else if !path.is_dir() {
        anyhow::bail!(EjbError::FileSystem(format!(
            "Path exists but is not a directory: {:?}",
            path
        )));
    } else {
        debug!("Directory already exists: {:?}", path);
    }
    Ok(())
}

/// Reads the entire content of a file into memory.
pub fn read_file_bytes(path: &Path) -> Result<Vec<u8>> {
    fs::read(path).with_context(|| format!("Failed to read file {:?}", path))
}

/// Writes bytes to a file, overwriting it, after making sure its parent directory exists.
pub fn write_bytes_to_file(path: &Path, content: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        ensure_dir_exists(parent)?;
    }
    fs::write(path, content).with_context(|| format!("Failed to write to file {:?}", path))?;
    debug!("Wrote {} bytes to file: {:?}", content.len(), path);
    Ok(())
}

/// Writes string content to a specified file path, overwriting if it exists.
pub fn write_string_to_file(path: &Path, content: &str) -> Result<()> {
    write_bytes_to_file(path, content.as_bytes())
}
