//! # EJB Archive Assembler
//!
//! File: cli/src/commands/build/assembler.rs
//!
//! ## Overview
//!
//! One assembler drives both archives; the `ArchiveProfile` decides the
//! default pattern tables and whether the deployment descriptor is handled.
//!
//! ## Architecture
//!
//! For one profile, `assemble` runs these steps in order and stops at the first failure:
//!
//! 1. Resolve the output path `<output>/<name>[-<classifier>].jar`.
//! 2. Parse the reproducible output timestamp.
//! 3. Main only: check the EJB version, and for 2.x that the descriptor exists.
//! 4. Main only, when the descriptor exists and filtering is on: filter it in place.
//! 5. Build the manifest and add the source tree under the resolved patterns.
//!    The descriptor's `.unfiltered` sibling is never walked, and for the
//!    client archive neither is the descriptor.
//! 6. Main only, when the descriptor exists: add it at its configured path,
//!    replacing any copy from step 5.
//! 7. Write the archive.
//!
//! Interpolation, charset and filter-file failures in step 4 surface as
//! `EjbError::Filtering`. Any other failure in steps 4 to 7 surfaces as
//! `EjbError::Archive` carrying the profile label. Configuration errors from
//! steps 2 and 3 pass through unchanged.
//!
use super::descriptor;
use crate::common::archive::jar::{ArchiveSummary, JarArchiver};
use crate::common::archive::manifest::Manifest;
use crate::common::archive::timestamp;
use crate::core::config::PackageSettings;
use crate::core::error::{EjbError, Result};
use crate::core::profile::ArchiveProfile;
use crate::core::validation;
use anyhow::anyhow;
use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Identity stamped into `Created-By`.
const TOOL_NAME: &str = "ejbpack";
const TOOL_GROUP_ID: &str = "rs.ejbpack";
const TOOL_ARTIFACT_ID: &str = env!("CARGO_PKG_NAME");
const TOOL_VERSION: &str = env!("CARGO_PKG_VERSION");

/// `<dir>/<name>.jar`, or `<dir>/<name>-<classifier>.jar` for a non-blank classifier.
pub fn jar_file(directory: &Path, name: &str, classifier: Option<&str>) -> PathBuf {
    match classifier {
        Some(c) if validation::has_classifier(Some(c)) => {
            directory.join(format!("{}-{}.jar", name, c))
        }
        _ => directory.join(format!("{}.jar", name)),
    }
}

pub struct Assembler<'a> {
    settings: &'a PackageSettings,
}

impl<'a> Assembler<'a> {
    pub fn new(settings: &'a PackageSettings) -> Self {
        Self { settings }
    }

    pub fn output_path(&self, profile: ArchiveProfile) -> PathBuf {
        jar_file(
            &self.settings.output_directory,
            &self.settings.jar_name,
            profile.classifier(self.settings),
        )
    }

    pub fn assemble(&self, profile: ArchiveProfile) -> Result<ArchiveSummary> {
        let settings = self.settings;
        let output = self.output_path(profile);
        match profile {
            ArchiveProfile::Main => info!(
                "Building EJB {} with EJB version {}",
                settings.jar_name, settings.ejb_version
            ),
            ArchiveProfile::Client => info!("Building EJB client {}", output.display()),
        }

        let timestamp = timestamp::parse_output_timestamp(settings.output_timestamp.as_deref())?;
        let descriptor = settings.descriptor_path();
        if profile.handles_descriptor() {
            validation::check_version_compliance(
                &settings.ejb_version,
                &descriptor,
                &settings.ejb_jar,
            )?;
        }

        let packs_descriptor = profile.handles_descriptor() && descriptor.exists();
        if packs_descriptor && settings.filtering.enabled {
            descriptor::filter_descriptor(
                &descriptor,
                &settings.filtering,
                settings.base_properties(),
            )
            .map_err(|e| filtering_or_archive_error(profile, e))?;
        }

        let mut jar = self
            .prepare(profile, output, timestamp)
            .map_err(|e| archive_error(profile, e))?;
        if packs_descriptor {
            jar.add_file(&descriptor, &settings.ejb_jar);
        }

        jar.create_archive().map_err(|e| archive_error(profile, e))
    }

    /// Entry names `assemble` would write, without the version gate or filtering.
    pub fn preview(&self, profile: ArchiveProfile) -> Result<Vec<String>> {
        let mut jar = self
            .prepare(profile, self.output_path(profile), None)
            .map_err(|e| archive_error(profile, e))?;
        let descriptor = self.settings.descriptor_path();
        if profile.handles_descriptor() && descriptor.exists() {
            jar.add_file(&descriptor, &self.settings.ejb_jar);
        }
        Ok(jar.entry_names())
    }

    fn prepare(
        &self,
        profile: ArchiveProfile,
        output: PathBuf,
        timestamp: Option<DateTime<Utc>>,
    ) -> Result<JarArchiver> {
        let patterns = profile.selection(self.settings);
        debug!(
            includes = ?patterns.includes(),
            excludes = ?patterns.excludes(),
            "Resolved {} selection",
            profile.label()
        );
        let mut jar = JarArchiver::new(output, self.manifest()?, timestamp);
        let ejb_jar = &self.settings.ejb_jar;
        jar.skip_entry(&format!("{}{}", ejb_jar, descriptor::UNFILTERED_SUFFIX));
        if !profile.handles_descriptor() {
            jar.skip_entry(ejb_jar);
        }
        jar.add_directory(&self.settings.source_directory, &patterns)?;
        Ok(jar)
    }

    fn manifest(&self) -> Result<Manifest> {
        let mut manifest = Manifest::new();
        manifest.set_created_by(TOOL_NAME, TOOL_GROUP_ID, TOOL_ARTIFACT_ID, TOOL_VERSION)?;

        let project = &self.settings.project;
        if self.settings.manifest.add_default_implementation_entries {
            let title = project.name.as_ref().or(project.artifact_id.as_ref());
            let entries = [
                ("Implementation-Title", title),
                ("Implementation-Version", project.version.as_ref()),
                ("Implementation-Vendor-Id", project.group_id.as_ref()),
            ];
            for (name, value) in entries {
                if let Some(value) = value {
                    manifest.insert(name, value)?;
                }
            }
        }
        for (name, value) in &self.settings.manifest.entries {
            manifest.insert(name, value)?;
        }
        Ok(manifest)
    }
}

fn archive_error(profile: ArchiveProfile, err: anyhow::Error) -> anyhow::Error {
    anyhow!(EjbError::Archive {
        label: profile.label(),
        reason: format!("{:#}", err),
    })
}

fn filtering_or_archive_error(profile: ArchiveProfile, err: anyhow::Error) -> anyhow::Error {
    match err.downcast_ref::<EjbError>() {
        Some(EjbError::Filtering(_)) => err,
        _ => archive_error(profile, err),
    }
}
