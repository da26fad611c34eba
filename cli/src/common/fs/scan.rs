//! # Pattern-Driven Directory Scan (`common::fs::scan`)
//!
//! File: cli/src/common/fs/scan.rs
//!
//! ## Overview
//!
//! Walks a source root and returns the files selected by a `PatternSet`.
//! Paths are matched relative to the root, `/`-separated, case-sensitively.
//! `*` matches within one path segment; `**` spans segments (`**/` also
//! matches zero segments, so `**/package.html` matches a root-level file).
//!
//! Version-control and editor droppings (`SCM_DEFAULT_EXCLUDES`) are never
//! selected, whatever the pattern set says.
//!
use crate::core::error::{EjbError, Result};
use crate::core::selector::PatternSet;
use anyhow::{anyhow, Context};
use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

pub const SCM_DEFAULT_EXCLUDES: &[&str] = &[
    "**/.git/**",
    "**/.gitignore",
    "**/.svn/**",
    "**/CVS/**",
    "**/.cvsignore",
    "**/.hg/**",
    "**/.bzr/**",
    "**/.DS_Store",
    "**/*~",
    "**/#*#",
    "**/.#*",
];

/// A file chosen for the archive: its entry name and where it lives on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    pub name: String,
    pub path: PathBuf,
}

/// Compiled include/exclude matcher for one pattern set.
#[derive(Debug)]
pub struct PathMatcher {
    includes: GlobSet,
    excludes: GlobSet,
}

impl PathMatcher {
    pub fn new(patterns: &PatternSet) -> Result<Self> {
        let excludes = patterns
            .excludes()
            .iter()
            .map(String::as_str)
            .chain(SCM_DEFAULT_EXCLUDES.iter().copied());
        Ok(Self {
            includes: build_globset(patterns.includes().iter().map(String::as_str))?,
            excludes: build_globset(excludes)?,
        })
    }

    pub fn is_selected(&self, name: &str) -> bool {
        self.includes.is_match(name) && !self.excludes.is_match(name)
    }
}

fn build_globset<'a>(patterns: impl Iterator<Item = &'a str>) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let normalized = normalize_pattern(pattern);
        let glob = GlobBuilder::new(&normalized)
            .literal_separator(true)
            .build()
            .map_err(|e| {
                anyhow!(EjbError::Config(format!(
                    "Invalid pattern '{}': {}",
                    pattern, e
                )))
            })?;
        builder.add(glob);
    }
    builder
        .build()
        .map_err(|e| anyhow!(EjbError::Config(format!("Invalid pattern set: {}", e))))
}

/// Brings a user pattern into the form the matcher expects: `/` separators, no
/// leading slash, a trailing slash meaning "everything below", and no redundant
/// `**/**` runs.
pub fn normalize_pattern(pattern: &str) -> String {
    let mut p = pattern.trim().replace('\\', "/");
    while let Some(stripped) = p.strip_prefix('/') {
        p = stripped.to_string();
    }
    if p.ends_with('/') {
        p.push_str("**");
    }
    while p.contains("**/**") {
        p = p.replace("**/**", "**");
    }
    p
}

/// Entry name for a path below `root`, or `None` when it is not below it.
pub fn entry_name(root: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(root).ok()?;
    let parts: Vec<String> = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    if parts.is_empty() {
        None
    } else {
        Some(parts.join("/"))
    }
}

/// Normalises a configured relative file path (e.g. the descriptor location) to
/// an entry name.
pub fn normalize_entry_name(raw: &str) -> String {
    raw.replace('\\', "/").trim_start_matches('/').to_string()
}

/// Collects every regular file under `root` selected by `patterns`, sorted by name.
pub fn scan_directory(root: &Path, patterns: &PatternSet) -> Result<Vec<SelectedFile>> {
    let matcher = PathMatcher::new(patterns)?;
    let mut selected = Vec::new();

    for entry_result in WalkDir::new(root).follow_links(true).sort_by_file_name() {
        let entry = entry_result
            .with_context(|| format!("Failed to read directory '{}'", root.display()))?;
        if !entry.file_type().is_file() {
            continue;
        }
        let Some(name) = entry_name(root, entry.path()) else {
            continue;
        };
        if matcher.is_selected(&name) {
            debug!("Selected {}", name);
            selected.push(SelectedFile {
                name,
                path: entry.into_path(),
            });
        }
    }
    selected.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(selected)
}
