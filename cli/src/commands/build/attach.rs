//! # Artifact Attachment
//!
//! File: cli/src/commands/build/attach.rs
//!
//! ## Overview
//!
//! Records the archives produced by a build against the project: the primary
//! artifact file, and supplemental artifacts attached under a type and
//! classifier. `ArtifactSink` is the seam the build driver writes to;
//! `ProjectArtifacts` is the in-memory record behind the CLI, which can be
//! written out as a TOML report.
//!
//! ```toml
//! primary = "target/orders-1.0.jar"
//!
//! [[attached]]
//! type = "ejb-client"
//! classifier = "client"
//! file = "target/orders-1.0-client.jar"
//! ```
//!
use crate::common::fs::io;
use crate::core::error::Result;
use anyhow::Context;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Receives the archives a build produces.
pub trait ArtifactSink {
    /// Records a supplemental artifact.
    fn attach(&mut self, artifact_type: &str, classifier: &str, file: &Path);
    /// Makes `file` the project's primary artifact.
    fn set_primary(&mut self, file: &Path);
    /// True when a primary artifact is set and is an existing regular file.
    fn has_primary_file(&self) -> bool;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttachedArtifact {
    #[serde(rename = "type")]
    pub artifact_type: String,
    pub classifier: String,
    pub file: PathBuf,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ProjectArtifacts {
    #[serde(skip_serializing_if = "Option::is_none")]
    primary: Option<PathBuf>,
    attached: Vec<AttachedArtifact>,
}

impl ProjectArtifacts {
    /// Starts from an optional, already existing primary artifact.
    pub fn new(primary: Option<PathBuf>) -> Self {
        Self {
            primary,
            attached: Vec::new(),
        }
    }

    pub fn primary(&self) -> Option<&Path> {
        self.primary.as_deref()
    }

    pub fn attached(&self) -> &[AttachedArtifact] {
        &self.attached
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string(self).context("Failed to serialize artifact report")
    }

    pub fn write_report(&self, path: &Path) -> Result<()> {
        io::write_string_to_file(path, &self.to_toml()?)?;
        info!("Artifact report written to {:?}", path);
        Ok(())
    }
}

impl ArtifactSink for ProjectArtifacts {
    fn attach(&mut self, artifact_type: &str, classifier: &str, file: &Path) {
        debug!(
            artifact_type,
            classifier,
            file = %file.display(),
            "Attaching artifact"
        );
        self.attached.push(AttachedArtifact {
            artifact_type: artifact_type.to_string(),
            classifier: classifier.to_string(),
            file: file.to_path_buf(),
        });
    }

    fn set_primary(&mut self, file: &Path) {
        debug!("Setting primary artifact to {:?}", file);
        self.primary = Some(file.to_path_buf());
    }

    fn has_primary_file(&self) -> bool {
        self.primary.as_deref().is_some_and(Path::is_file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_primary_file_must_exist() -> Result<()> {
        let dir = tempdir()?;
        let jar = dir.path().join("a.jar");
        let mut artifacts = ProjectArtifacts::new(Some(jar.clone()));
        assert!(!artifacts.has_primary_file());
        fs::write(&jar, "x")?;
        assert!(artifacts.has_primary_file());

        artifacts.set_primary(dir.path());
        assert!(!artifacts.has_primary_file());
        Ok(())
    }

    #[test]
    fn test_report_toml() -> Result<()> {
        let mut artifacts = ProjectArtifacts::default();
        artifacts.set_primary(Path::new("target/orders-1.0.jar"));
        artifacts.attach("ejb-client", "client", Path::new("target/orders-1.0-client.jar"));

        let dir = tempdir()?;
        let report = dir.path().join("out/artifacts.toml");
        artifacts.write_report(&report)?;

        let parsed: toml::Value = toml::from_str(&fs::read_to_string(&report)?)?;
        assert_eq!(parsed["primary"].as_str(), Some("target/orders-1.0.jar"));
        let attached = parsed["attached"].as_array().unwrap();
        assert_eq!(attached.len(), 1);
        assert_eq!(attached[0]["type"].as_str(), Some("ejb-client"));
        assert_eq!(attached[0]["classifier"].as_str(), Some("client"));
        Ok(())
    }
}
