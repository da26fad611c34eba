//! # Archive Profiles
//!
//! File: cli/src/core/profile.rs
//!
//! The main EJB archive and the client archive are assembled by the same code,
//! driven by an `ArchiveProfile`. The profile carries the default pattern tables,
//! whether the deployment descriptor is handled, and how failures and attached
//! artifacts are labelled.
//!
//! | Profile  | User includes | User excludes | Default excludes                                        | Descriptor |
//! |----------|---------------|---------------|---------------------------------------------------------|------------|
//! | `Main`   | no            | yes           | the descriptor path, `**/package.html`                  | yes        |
//! | `Client` | yes           | yes           | `**/*Bean.class`, `**/*CMP.class`, `**/*Session.class`, `**/package.html` | no |
//!
//! The client archive never carries the descriptor, even when its patterns select it.
//!
use crate::core::config::PackageSettings;
use crate::core::selector::{PatternSet, SelectionPolicy};

/// Included when the user gives no include patterns.
pub const DEFAULT_INCLUDES: &[&str] = &["**/**"];

/// Excluded from the client archive by default: implementation classes and docs.
pub const DEFAULT_CLIENT_EXCLUDES: &[&str] = &[
    "**/*Bean.class",
    "**/*CMP.class",
    "**/*Session.class",
    "**/package.html",
];

pub const EJB_TYPE: &str = "ejb";
pub const EJB_CLIENT_TYPE: &str = "ejb-client";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveProfile {
    Main,
    Client,
}

impl ArchiveProfile {
    /// Used in log lines and in the archive error prefix.
    pub fn label(self) -> &'static str {
        match self {
            ArchiveProfile::Main => "EJB",
            ArchiveProfile::Client => "EJB client",
        }
    }

    /// Artifact type tag handed to the attachment sink.
    pub fn artifact_type(self) -> &'static str {
        match self {
            ArchiveProfile::Main => EJB_TYPE,
            ArchiveProfile::Client => EJB_CLIENT_TYPE,
        }
    }

    /// Whether the deployment descriptor is gated, filtered, and force-added.
    pub fn handles_descriptor(self) -> bool {
        matches!(self, ArchiveProfile::Main)
    }

    pub fn default_includes(self) -> Vec<String> {
        DEFAULT_INCLUDES.iter().map(|s| s.to_string()).collect()
    }

    /// The main table depends on where the descriptor lives.
    pub fn default_excludes(self, descriptor: &str) -> Vec<String> {
        match self {
            ArchiveProfile::Main => vec![descriptor.to_string(), "**/package.html".to_string()],
            ArchiveProfile::Client => DEFAULT_CLIENT_EXCLUDES
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }

    /// Classifier the archive is written and attached under.
    pub fn classifier(self, settings: &PackageSettings) -> Option<&str> {
        match self {
            ArchiveProfile::Main => settings.classifier.as_deref(),
            ArchiveProfile::Client => Some(settings.client_classifier.as_str()),
        }
    }

    /// Resolves the pattern set for this profile. The main archive exposes no
    /// include override, so its user include list is always unset.
    pub fn selection(self, settings: &PackageSettings) -> PatternSet {
        let default_includes = self.default_includes();
        let default_excludes = self.default_excludes(&settings.ejb_jar);
        let (user_includes, user_excludes) = match self {
            ArchiveProfile::Main => (None, settings.excludes.as_deref()),
            ArchiveProfile::Client => (
                settings.client_includes.as_deref(),
                settings.client_excludes.as_deref(),
            ),
        };
        SelectionPolicy {
            user_includes,
            user_excludes,
            default_includes: &default_includes,
            default_excludes: &default_excludes,
        }
        .resolve()
    }
}
