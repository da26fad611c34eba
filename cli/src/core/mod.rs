//! # ejbpack Core Infrastructure
//!
//! File: cli/src/core/mod.rs
//!
//! ## Overview
//!
//! This module aggregates the domain rules and infrastructure shared by the
//! commands: configuration, errors, pattern selection, the two archive
//! profiles, classifier/version validation, and descriptor interpolation.
//!
//! ## Architecture
//!
//! - `config`: Configuration loading, merging, and the resolved `PackageSettings`
//! - `error`: `EjbError` and the crate-wide `Result` alias
//! - `interpolate`: `${...}` / `@...@` property interpolation and `.properties` parsing
//! - `profile`: `ArchiveProfile::{Main, Client}` and their default pattern tables
//! - `selector`: All-or-nothing include/exclude override resolution
//! - `validation`: Classifier and EJB version checks
//!
//! ## Usage
//!
//! ```rust
//! use crate::core::config::PackageSettings;
//! use crate::core::error::{EjbError, Result};
//! use crate::core::profile::ArchiveProfile;
//! ```
//!
pub mod config;
pub mod error;
pub mod interpolate;
pub mod profile;
pub mod selector;
pub mod validation;
