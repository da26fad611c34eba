//! # Include/Exclude Selection
//!
//! File: cli/src/core/selector.rs
//!
//! ## Overview
//!
//! Decides which include and exclude patterns are applied when a directory tree
//! is added to an archive. Each axis is an all-or-nothing override: a non-empty
//! user list replaces the default list for that axis completely, it is never
//! merged with it. The two axes are decided independently, so a user include
//! list with no user excludes still gets the default excludes.
//!
//! Absent and empty user lists mean the same thing; `is_effectively_unset` is the
//! single place that decision is made.
//!
//! ## Examples
//!
//! ```rust
//! let defaults_in = vec!["**/**".to_string()];
//! let defaults_ex = vec!["**/package.html".to_string()];
//! let user_ex = vec!["**/*Impl.class".to_string()];
//!
//! let set = selector::resolve(None, Some(&user_ex), &defaults_in, &defaults_ex);
//! assert_eq!(set.includes(), ["**/**"]);
//! assert_eq!(set.excludes(), ["**/*Impl.class"]); // package.html is no longer excluded
//! ```
//!

/// The include and exclude patterns actually applied to a directory walk.
///
/// Patterns are glob-style and matched against `/`-separated paths relative
/// to the source root. Immutable once resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternSet {
    includes: Vec<String>,
    excludes: Vec<String>,
}

impl PatternSet {
    pub fn new(includes: Vec<String>, excludes: Vec<String>) -> Self {
        Self { includes, excludes }
    }

    pub fn includes(&self) -> &[String] {
        &self.includes
    }

    pub fn excludes(&self) -> &[String] {
        &self.excludes
    }
}

/// The inputs to a selection: optional user overrides plus the built-in defaults.
///
/// `default_includes` is never empty, so there is always a fallback.
#[derive(Debug, Clone, Copy)]
pub struct SelectionPolicy<'a> {
    pub user_includes: Option<&'a [String]>,
    pub user_excludes: Option<&'a [String]>,
    pub default_includes: &'a [String],
    pub default_excludes: &'a [String],
}

impl SelectionPolicy<'_> {
    pub fn resolve(&self) -> PatternSet {
        resolve(
            self.user_includes,
            self.user_excludes,
            self.default_includes,
            self.default_excludes,
        )
    }
}

/// True when a user list carries no patterns, whether it was never given or given empty.
pub fn is_effectively_unset(list: Option<&[String]>) -> bool {
    list.map_or(true, <[String]>::is_empty)
}

/// Resolves the final pattern set. User lists override defaults per axis.
pub fn resolve(
    user_includes: Option<&[String]>,
    user_excludes: Option<&[String]>,
    default_includes: &[String],
    default_excludes: &[String],
) -> PatternSet {
    PatternSet::new(
        pick(user_includes, default_includes),
        pick(user_excludes, default_excludes),
    )
}

fn pick(user: Option<&[String]>, defaults: &[String]) -> Vec<String> {
    match user {
        Some(list) if !is_effectively_unset(Some(list)) => list.to_vec(),
        _ => defaults.to_vec(),
    }
}
