//! # ejbpack Error Types
//!
//! File: cli/src/core/error.rs
//!
//! ## Overview
//!
//! This module defines the error types used throughout ejbpack. Every fatal
//! condition surfaces as a single terminal error with a human-readable message;
//! there are no retries and no partial-success modes.
//!
//! ## Architecture
//!
//! The error system consists of two main components:
//! - `EjbError`: A custom error enum using `thiserror` for the specific failure kinds
//! - `Result<T>`: A type alias for `anyhow::Result<T>` for flexible error handling
//!
//! The error kinds fall into three groups:
//! - Configuration errors (invalid version, invalid classifier, missing descriptor,
//!   primary artifact already set). These abort before the archive step is written.
//! - Archive errors, prefixed so the operator can tell which archive failed.
//! - Filtering errors, with their own prefix so a failed descriptor interpolation
//!   is never confused with a failed archive write.
//!
//! ## Examples
//!
//! ```rust
//! // Return a specific error type
//! if !descriptor.exists() {
//!     anyhow::bail!(EjbError::DescriptorRequired { descriptor: "META-INF/ejb-jar.xml".into() });
//! }
//!
//! // Check the kind of a failure
//! match result {
//!     Err(e) if matches!(e.downcast_ref::<EjbError>(), Some(EjbError::Filtering(_))) => {
//!         eprintln!("descriptor could not be filtered");
//!     }
//!     other => other?,
//! }
//! ```
//!
use thiserror::Error;

/// Custom error type for ejbpack.
#[derive(Error, Debug)]
pub enum EjbError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("ejbVersion is not valid: {version}. Must be 2.x, 3.x or 4.x (where x is a digit)")]
    InvalidVersion { version: String },

    #[error("Error assembling EJB: {descriptor} is required for ejbVersion 2.x")]
    DescriptorRequired { descriptor: String },

    #[error("The given classifier '{classifier}' is not valid.")]
    InvalidClassifier { classifier: String },

    #[error("The given client classifier '{classifier}' is not valid.")]
    InvalidClientClassifier { classifier: String },

    #[error(
        "You have to use a classifier to attach supplemental artifacts to the project instead of replacing them."
    )]
    PrimaryArtifactAlreadySet,

    /// `label` is "EJB" or "EJB client".
    #[error("There was a problem creating the {label} archive: {reason}")]
    Archive { label: &'static str, reason: String },

    #[error("There was a problem filtering the deployment descriptor: {0}")]
    Filtering(String),

    #[error("Filesystem error: {0}")]
    FileSystem(String),

    #[error("Invalid output timestamp '{value}': {reason}")]
    Timestamp { value: String, reason: String },

    #[error("Argument parsing error: {0}")]
    ArgumentParsing(String),
}

/// Type alias for Result using anyhow::Error for broad compatibility.
/// Anyhow allows for easy context addition and flexible error handling.
pub type Result<T> = anyhow::Result<T>;
