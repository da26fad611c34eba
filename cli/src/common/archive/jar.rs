//! # JAR Archive Writer (`common::archive::jar`)
//!
//! File: cli/src/common/archive/jar.rs
//!
//! ## Overview
//!
//! This module writes JAR files: ZIP archives whose first entries are
//! `META-INF/` and the generated `META-INF/MANIFEST.MF`. Entries are collected
//! first (from directory walks and explicit files) and written in one pass when
//! `create_archive` is called, so a file added later at an existing entry name
//! replaces the earlier one and every name appears exactly once.
//!
//! ## Architecture
//!
//! The module leverages the `zip` crate for the archive structure with Deflate
//! compression.
//!
//! - Directory entries are emitted for every parent of a file entry.
//! - Entries after the manifest are written in name order.
//! - With a reproducible timestamp every entry carries that time, files get mode
//!   0644 and directories 0755, so identical input produces identical bytes.
//!   Without one, files carry their modification time and generated entries the
//!   current time.
//! - File contents are read when the archive is written, not when they are added.
//!
//! ## Usage
//!
//! ```rust
//! let mut jar = JarArchiver::new(out_dir.join("orders-1.0.jar"), Manifest::new(), None);
//! jar.add_directory(classes_dir, &patterns)?;
//! jar.add_file(&classes_dir.join("META-INF/ejb-jar.xml"), "META-INF/ejb-jar.xml");
//! let summary = jar.create_archive()?;
//! println!("wrote {} entries", summary.entries);
//! ```
//!
use crate::common::archive::manifest::{Manifest, MANIFEST_PATH};
use crate::common::archive::timestamp;
use crate::common::fs::{io, scan};
use crate::core::error::Result;
use crate::core::selector::PatternSet;
use anyhow::Context;
use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, BTreeSet};
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use zip::write::{FileOptions, ZipWriter};
use zip::CompressionMethod;

const META_INF_DIR: &str = "META-INF/";

/// Result of a written archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveSummary {
    pub path: PathBuf,
    /// All entries, directories and manifest included.
    pub entries: usize,
}

/// Collects entries for one JAR and writes it.
#[derive(Debug)]
pub struct JarArchiver {
    output: PathBuf,
    manifest: Manifest,
    timestamp: Option<DateTime<Utc>>,
    files: BTreeMap<String, PathBuf>,
    skipped: BTreeSet<String>,
}

impl JarArchiver {
    pub fn new(
        output: impl Into<PathBuf>,
        manifest: Manifest,
        timestamp: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            output: output.into(),
            manifest,
            timestamp,
            files: BTreeMap::new(),
            skipped: BTreeSet::new(),
        }
    }

    pub fn output(&self) -> &Path {
        &self.output
    }

    /// Keeps `name` out of every later directory walk, whatever the patterns
    /// select. Files added with `add_file` are not affected.
    pub fn skip_entry(&mut self, name: &str) {
        self.skipped.insert(scan::normalize_entry_name(name));
    }

    /// Adds every file under `root` selected by `patterns`. Returns how many were added.
    pub fn add_directory(&mut self, root: &Path, patterns: &PatternSet) -> Result<usize> {
        let selected = scan::scan_directory(root, patterns)?;
        let mut added = 0;
        for file in selected {
            if file.name == MANIFEST_PATH {
                warn!(
                    "Ignoring {} found in {}; the manifest is generated.",
                    MANIFEST_PATH,
                    root.display()
                );
                continue;
            }
            if self.skipped.contains(&file.name) {
                debug!("Skipping {}", file.name);
                continue;
            }
            self.files.insert(file.name, file.path);
            added += 1;
        }
        debug!("Added {} files from {}", added, root.display());
        Ok(added)
    }

    /// Adds one file at `target`, replacing whatever was added there before.
    pub fn add_file(&mut self, source: &Path, target: &str) {
        let name = scan::normalize_entry_name(target);
        if self.files.insert(name.clone(), source.to_path_buf()).is_some() {
            debug!("Replaced entry {} with {}", name, source.display());
        } else {
            debug!("Added entry {} from {}", name, source.display());
        }
    }

    /// Every entry name the archive will contain, in write order.
    pub fn entry_names(&self) -> Vec<String> {
        let mut names = vec![META_INF_DIR.to_string(), MANIFEST_PATH.to_string()];
        names.extend(
            self.body_entries()
                .into_iter()
                .filter(|e| e.name() != META_INF_DIR)
                .map(|e| e.name().to_string()),
        );
        names
    }

    /// Directory and file entries after the manifest, sorted by name.
    fn body_entries(&self) -> Vec<Entry<'_>> {
        let mut dirs = BTreeSet::new();
        for name in self.files.keys() {
            let mut end = 0;
            while let Some(pos) = name[end..].find('/') {
                end += pos + 1;
                dirs.insert(name[..end].to_string());
            }
        }
        let mut entries: Vec<Entry<'_>> = dirs.into_iter().map(Entry::Dir).collect();
        entries.extend(
            self.files
                .iter()
                .map(|(name, path)| Entry::File(name.as_str(), path.as_path())),
        );
        entries.sort_by(|a, b| a.name().cmp(b.name()));
        entries
    }

    /// Writes the archive to the output path, creating its directory if needed.
    pub fn create_archive(self) -> Result<ArchiveSummary> {
        if let Some(parent) = self.output.parent() {
            io::ensure_dir_exists(parent)?;
        }
        let file = File::create(&self.output)
            .with_context(|| format!("Failed to create archive {:?}", self.output))?;
        let mut zip = ZipWriter::new(file);

        let generated_time = match &self.timestamp {
            Some(ts) => timestamp::to_zip_datetime(ts),
            None => timestamp::zip_datetime_now(),
        };
        let dir_options: FileOptions<'_, ()> = FileOptions::default()
            .compression_method(CompressionMethod::Stored)
            .unix_permissions(0o755)
            .last_modified_time(generated_time);
        let file_options: FileOptions<'_, ()> = FileOptions::default()
            .compression_method(CompressionMethod::Deflated)
            .unix_permissions(0o644);

        zip.add_directory(META_INF_DIR, dir_options)
            .context("Failed to add META-INF/ directory entry")?;
        zip.start_file(MANIFEST_PATH, file_options.last_modified_time(generated_time))
            .context("Failed to start manifest entry")?;
        zip.write_all(&self.manifest.to_bytes())
            .context("Failed to write manifest")?;
        let mut written = 2;

        for entry in self.body_entries() {
            match entry {
                Entry::Dir(name) if name == META_INF_DIR => continue,
                Entry::Dir(name) => {
                    zip.add_directory(name.as_str(), dir_options)
                        .with_context(|| format!("Failed to add directory entry {}", name))?;
                }
                Entry::File(name, path) => {
                    let data = io::read_file_bytes(path)?;
                    let modified = match &self.timestamp {
                        Some(ts) => timestamp::to_zip_datetime(ts),
                        None => std::fs::metadata(path)
                            .and_then(|m| m.modified())
                            .map(timestamp::zip_datetime_from_system)
                            .unwrap_or(generated_time),
                    };
                    zip.start_file(name, file_options.last_modified_time(modified))
                        .with_context(|| format!("Failed to start entry {}", name))?;
                    zip.write_all(&data)
                        .with_context(|| format!("Failed to write entry {}", name))?;
                }
            }
            written += 1;
        }

        zip.finish().context("Failed to finalize archive")?;
        info!(
            path = %self.output.display(),
            entries = written,
            reproducible = self.timestamp.is_some(),
            "Archive written"
        );
        Ok(ArchiveSummary {
            path: self.output,
            entries: written,
        })
    }
}

enum Entry<'a> {
    Dir(String),
    File(&'a str, &'a Path),
}

impl Entry<'_> {
    fn name(&self) -> &str {
        match self {
            Entry::Dir(name) => name,
            Entry::File(name, _) => name,
        }
    }
}
