//! # Deployment Descriptor Filtering
//!
//! File: cli/src/commands/build/descriptor.rs
//!
//! ## Overview
//!
//! Filters the deployment descriptor in place before it is added to the main
//! archive. The descriptor is copied to a sibling `<descriptor>.unfiltered`
//! file, filtered from that copy back over the original, and the copy is
//! deleted. When a step fails the copy may be left behind.
//!
//! Failures while loading filter files, resolving the charset or interpolating
//! are `EjbError::Filtering`. Copying to and deleting the sibling are plain I/O
//! failures and carry no filtering prefix.
//!
//! The charset used for reading and writing is sniffed from the unfiltered
//! copy: byte-order mark first, then the shape of a BOM-less UTF-16 prolog,
//! then the `encoding` attribute of the XML declaration, and UTF-8 otherwise.
//!
use crate::common::fs::{copy, encoding::Charset, io};
use crate::core::config::FilterSettings;
use crate::core::error::{EjbError, Result};
use crate::core::interpolate::{self, Interpolator};
use anyhow::anyhow;
use regex::Regex;
use std::collections::BTreeMap;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use tracing::debug;

pub const UNFILTERED_SUFFIX: &str = ".unfiltered";
const DEFAULT_XML_ENCODING: &str = "UTF-8";

static XML_DECLARED_ENCODING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"\A\s*<\?xml[^>]*?\sencoding\s*=\s*["']([A-Za-z][A-Za-z0-9._\-]*)["']"#)
        .expect("xml encoding pattern")
});

/// Names the charset of an XML document from its leading bytes.
pub fn detect_xml_encoding(bytes: &[u8]) -> String {
    match bytes {
        [0xEF, 0xBB, 0xBF, ..] => return "UTF-8".to_string(),
        [0xFE, 0xFF, ..] | [0x00, b'<', 0x00, b'?', ..] => return "UTF-16BE".to_string(),
        [0xFF, 0xFE, ..] | [b'<', 0x00, b'?', 0x00, ..] => return "UTF-16LE".to_string(),
        _ => {}
    }

    // The declaration is ASCII in every remaining supported charset.
    let head = &bytes[..bytes.len().min(1024)];
    let prolog: String = head.iter().map(|&b| b as char).collect();
    XML_DECLARED_ENCODING
        .captures(&prolog)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
        .unwrap_or_else(|| DEFAULT_XML_ENCODING.to_string())
}

/// `<descriptor>.unfiltered`, next to the descriptor.
pub fn unfiltered_path(descriptor: &Path) -> PathBuf {
    let mut name = OsString::from(descriptor.as_os_str());
    name.push(UNFILTERED_SUFFIX);
    PathBuf::from(name)
}

/// Filters `descriptor` in place.
///
/// `base_properties` are layered under the filter files and `-D` properties
/// carried by `settings`.
pub fn filter_descriptor(
    descriptor: &Path,
    settings: &FilterSettings,
    base_properties: BTreeMap<String, String>,
) -> Result<()> {
    debug!("Filtering deployment descriptor.");
    let properties = interpolate::merge_property_sources(
        base_properties,
        &settings.filters,
        &settings.user_properties,
    )
    .map_err(filtering_failure)?;
    let interpolator = Interpolator::new(properties)
        .with_escape_string(settings.escape_string.clone())
        .with_escape_windows_paths(settings.escape_backslashes);

    let unfiltered = unfiltered_path(descriptor);
    copy::copy_file(descriptor, &unfiltered)?;

    let encoding = detect_xml_encoding(&io::read_file_bytes(&unfiltered)?);
    debug!("Deployment descriptor encoding: {}", encoding);
    let charset = Charset::from_name(&encoding)?;

    interpolate::copy_file_filtered(&unfiltered, descriptor, true, &interpolator, charset)
        .map_err(filtering_failure)?;
    copy::force_delete(&unfiltered)?;
    Ok(())
}

fn filtering_failure(err: anyhow::Error) -> anyhow::Error {
    match err.downcast_ref::<EjbError>() {
        Some(EjbError::Filtering(_)) => err,
        _ => anyhow!(EjbError::Filtering(format!("{:#}", err))),
    }
}
