//! # ejbpack Command Modules
//!
//! File: cli/src/commands/mod.rs
//!
//! ## Overview
//!
//! This module aggregates the top-level commands of the ejbpack CLI and makes
//! them available to the entry point (`main.rs`).
//!
//! ## Commands
//!
//! - `build`: Packages the EJB archive (and optionally the client archive) and
//!   attaches the results.
//! - `files`: Lists the entries an archive would contain without writing it.
//!
//! Each command defines its own arguments structure and a handler function.
//!

/// `ejbpack build`: archive assembly, descriptor filtering, and artifact attachment.
pub mod build;
/// `ejbpack files`: dry-run listing of archive entries.
pub mod files;
