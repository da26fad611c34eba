//! # ejbpack Common Utilities (`common`)
//!
//! File: cli/src/common/mod.rs
//!
//! ## Overview
//!
//! Shared utilities used by the command handlers: writing JAR archives and the
//! filesystem operations underneath them. Nothing here knows about EJB rules;
//! those live in `core::`.
//!
//! ## Architecture
//!
//! - **`archive`**: JAR writing, manifest generation and reproducible timestamps.
//! - **`fs`**: File I/O, copying, directory scanning under include/exclude
//!   patterns, and charset conversion.
//!

/// JAR archive writing (entries, manifest, timestamps).
pub mod archive;
/// Filesystem operations (I/O, copy, scanning, encodings).
pub mod fs;
