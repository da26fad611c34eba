//! # ejbpack Archive Utilities Module (`common::archive`)
//!
//! File: cli/src/common/archive/mod.rs
//!
//! ## Overview
//!
//! This module groups everything needed to write a JAR: the archive writer
//! itself, the generated manifest, and the reproducible-timestamp handling that
//! makes repeated builds byte-identical.
//!
//! ## Architecture
//!
//! - **`jar`**: `JarArchiver` collects entries from directory walks and explicit
//!   files, then writes the ZIP with the manifest first.
//! - **`manifest`**: The `META-INF/MANIFEST.MF` model and its line-wrapped serialization.
//! - **`timestamp`**: Parsing of the output timestamp and conversion to ZIP DOS times.
//!
//! ## Usage
//!
//! ```rust
//! use crate::common::archive::{jar::JarArchiver, manifest::Manifest, timestamp};
//!
//! let ts = timestamp::parse_output_timestamp(Some("1700000000"))?;
//! let mut jar = JarArchiver::new("target/orders-1.0.jar", Manifest::new(), ts);
//! jar.add_directory(Path::new("target/classes"), &patterns)?;
//! jar.create_archive()?;
//! ```
//!

pub mod jar;
pub mod manifest;
pub mod timestamp;
