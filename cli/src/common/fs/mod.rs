//! # ejbpack Filesystem Utilities (`common::fs`)
//!
//! File: cli/src/common/fs/mod.rs
//!
//! ## Overview
//!
//! This module groups the filesystem utilities used while packaging: reading and
//! writing files, copying the deployment descriptor around filtering, walking the
//! classes directory under include/exclude patterns, and converting descriptor
//! text between byte encodings.
//!
//! ## Architecture
//!
//! - **`copy`**: File copy and forced deletion (`fs_extra`), used by descriptor filtering.
//! - **`encoding`**: `Charset` decode/encode for UTF-8, US-ASCII, ISO-8859-1 and UTF-16.
//! - **`io`**: `ensure_dir_exists`, whole-file reads and writes with error context.
//! - **`scan`**: Pattern normalisation, the compiled `PathMatcher`, and `scan_directory`.
//!
//! Functions are imported from their submodule, e.g.
//! `use crate::common::fs::io::ensure_dir_exists;`.
//!

/// File copy and deletion (e.g., `copy_file`, `force_delete`).
pub mod copy;
/// Charset conversion for descriptor filtering.
pub mod encoding;
/// Basic file I/O operations (e.g., `ensure_dir_exists`, `read_file_bytes`).
pub mod io;
/// Include/exclude directory walking (e.g., `scan_directory`).
pub mod scan;
