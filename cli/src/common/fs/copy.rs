//! # ejbpack Filesystem Copy Operations
//!
//! File: cli/src/common/fs/copy.rs
//!
//! ## Overview
//!
//! File copy and removal used around descriptor filtering: the descriptor is
//! copied to a sibling temporary file, filtered back over the original, and the
//! temporary copy is removed afterwards.
//!
//! The copy goes through `fs_extra`, which overwrites an existing target when
//! asked to and reports failures with the file names involved.
//!
use crate::core::error::Result;
use anyhow::Context;
use std::fs;
use std::path::Path;
use tracing::debug;

/// Copies `source` to `target`, replacing `target` if it exists.
pub fn copy_file(source: &Path, target: &Path) -> Result<()> {
    let mut options = fs_extra::file::CopyOptions::new();
    options.overwrite = true;

    fs_extra::file::copy(source, target, &options).map_err(|e| {
        anyhow::anyhow!(e).context(format!("Failed to copy file {:?} to {:?}", source, target))
    })?;
    debug!("Copied {:?} to {:?}", source, target);
    Ok(())
}

/// Deletes a file; a file that is already gone is an error.
pub fn force_delete(path: &Path) -> Result<()> {
    fs::remove_file(path).with_context(|| format!("Failed to delete file {:?}", path))?;
    debug!("Deleted {:?}", path);
    Ok(())
}
