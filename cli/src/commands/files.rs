//! # ejbpack Files Command
//!
//! File: cli/src/commands/files.rs
//!
//! ## Overview
//!
//! Implements `ejbpack files`, a dry run of the archive selection. It loads the
//! same configuration as `ejbpack build`, resolves the include/exclude patterns
//! for the main archive (or the client archive with `--client`), and prints the
//! entry names in the order they would be written.
//!
//! Nothing is written: the descriptor is not filtered, the EJB version is not
//! checked, and a missing source directory is an error rather than being created.
//!
//! ```bash
//! ejbpack files
//! ejbpack files --client --client-exclude '**/*Impl.class'
//! ```
//!
use crate::commands::build::assembler::Assembler;
use crate::core::config::{self, PackageArgs, PackageSettings};
use crate::core::error::Result;
use crate::core::profile::ArchiveProfile;
use clap::Args;
use tracing::info;

/// Arguments for `ejbpack files`.
#[derive(Args, Debug)]
pub struct FilesArgs {
    /// List the client archive instead of the main archive.
    #[arg(long)]
    pub client: bool,

    #[command(flatten)]
    pub package: PackageArgs,
}

pub fn handle_files(args: FilesArgs) -> Result<()> {
    let loaded = config::load_config(args.package.config.as_deref())?;
    let settings = PackageSettings::resolve(loaded, &args.package)?;
    let profile = if args.client {
        ArchiveProfile::Client
    } else {
        ArchiveProfile::Main
    };

    let assembler = Assembler::new(&settings);
    let entries = assembler.preview(profile)?;
    info!(
        "{} archive {} would hold {} entries",
        profile.label(),
        assembler.output_path(profile).display(),
        entries.len()
    );
    for entry in entries {
        println!("{}", entry);
    }
    Ok(())
}
