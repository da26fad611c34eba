//! # ejbpack Build Command
//!
//! File: cli/src/commands/build/mod.rs
//!
//! ## Overview
//!
//! Implements `ejbpack build`: packages the compiled classes into the EJB
//! archive and, when client generation is on, the reduced client archive, then
//! attaches both to the project's artifact record.
//!
//! ## Architecture
//!
//! - `handle_build`: loads configuration, runs `package`, prints the result and
//!   optionally writes the artifact report.
//! - `package`: the driver. It validates the classifier, builds the main
//!   archive, attaches it (under its classifier, or as the primary artifact),
//!   then validates the client classifier, builds the client archive and
//!   attaches it as `ejb-client`. The first failure ends the run; an archive
//!   already written stays on disk.
//! - `assembler`: one `Assembler` for both archives, driven by `ArchiveProfile`.
//! - `descriptor`: in-place filtering of the deployment descriptor.
//! - `attach`: the `ArtifactSink` trait and the `ProjectArtifacts` record.
//!
//! ## Examples
//!
//! ```bash
//! # Package target/classes into target/<final name>.jar
//! ejbpack build
//!
//! # Also build the client jar, with a custom exclude list
//! ejbpack build --generate-client --client-exclude '**/impl/**'
//!
//! # Reproducible output with a filtered descriptor
//! ejbpack build --filter-descriptor --filter prod.properties --output-timestamp 2024-01-01T00:00:00Z
//! ```
//!
pub mod assembler;
pub mod attach;
pub mod descriptor;

use crate::common::archive::jar::ArchiveSummary;
use crate::common::fs::io;
use crate::core::config::{self, PackageArgs, PackageSettings};
use crate::core::error::{EjbError, Result};
use crate::core::profile::{ArchiveProfile, EJB_CLIENT_TYPE, EJB_TYPE};
use crate::core::validation::{self, ClassifierRule};
use assembler::Assembler;
use attach::{ArtifactSink, ProjectArtifacts};
use clap::Args;
use std::path::PathBuf;
use tracing::{error, warn};

/// Arguments for `ejbpack build`.
#[derive(Args, Debug)]
pub struct BuildArgs {
    #[command(flatten)]
    pub package: PackageArgs,

    /// Write the attached artifacts to this file as TOML.
    #[arg(long)]
    pub artifacts_report: Option<PathBuf>,
}

/// The archives written by one `package` run.
#[derive(Debug)]
pub struct BuildOutcome {
    pub main: ArchiveSummary,
    pub client: Option<ArchiveSummary>,
}

pub fn handle_build(args: BuildArgs) -> Result<()> {
    let loaded = config::load_config(args.package.config.as_deref())?;
    let settings = PackageSettings::resolve(loaded, &args.package)?;
    let mut artifacts = ProjectArtifacts::new(settings.artifact_file.clone());

    let outcome = package(&settings, &mut artifacts, validation::default_classifier_rule)?;

    println!(
        "Built {} ({} entries)",
        outcome.main.path.display(),
        outcome.main.entries
    );
    if let Some(client) = &outcome.client {
        println!("Built {} ({} entries)", client.path.display(), client.entries);
    }
    if let Some(primary) = artifacts.primary() {
        println!("Primary artifact: {}", primary.display());
    }
    for attached in artifacts.attached() {
        println!(
            "Attached {} ({}): {}",
            attached.artifact_type,
            attached.classifier,
            attached.file.display()
        );
    }

    if let Some(report) = &args.artifacts_report {
        artifacts.write_report(report)?;
    }
    Ok(())
}

/// Builds and attaches the main archive, then the client archive if enabled.
pub fn package(
    settings: &PackageSettings,
    sink: &mut dyn ArtifactSink,
    rule: ClassifierRule,
) -> Result<BuildOutcome> {
    if !settings.source_directory.exists() {
        warn!(
            "The created EJB jar will be empty cause the {} did not exist.",
            settings.source_directory.display()
        );
        io::ensure_dir_exists(&settings.source_directory)?;
    }

    let classifier = settings.classifier.as_deref();
    let attach_classified = validation::has_classifier(classifier);
    if attach_classified {
        if !validation::is_classifier_valid(classifier, rule) {
            let err = EjbError::InvalidClassifier {
                classifier: classifier.unwrap_or_default().to_string(),
            };
            error!("{}", err);
            return Err(err.into());
        }
    } else if sink.has_primary_file() {
        return Err(EjbError::PrimaryArtifactAlreadySet.into());
    }

    let assembler = Assembler::new(settings);
    let main = assembler.assemble(ArchiveProfile::Main)?;
    match classifier {
        Some(c) if attach_classified => sink.attach(EJB_TYPE, c, &main.path),
        _ => sink.set_primary(&main.path),
    }

    if !settings.generate_client {
        return Ok(BuildOutcome { main, client: None });
    }

    let client_classifier = settings.client_classifier.as_str();
    if validation::has_classifier(Some(client_classifier))
        && !validation::is_classifier_valid(Some(client_classifier), rule)
    {
        let err = EjbError::InvalidClientClassifier {
            classifier: client_classifier.to_string(),
        };
        error!("{}", err);
        return Err(err.into());
    }
    let client_path = assembler.output_path(ArchiveProfile::Client);
    if client_path == main.path {
        warn!(
            "The EJB client archive {} overwrites the EJB archive; set a client classifier.",
            client_path.display()
        );
    }
    let client = assembler.assemble(ArchiveProfile::Client)?;
    // A blank client classifier is attached as given.
    sink.attach(EJB_CLIENT_TYPE, client_classifier, &client.path);

    Ok(BuildOutcome {
        main,
        client: Some(client),
    })
}
