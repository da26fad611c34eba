//! # JAR Manifest (`common::archive::manifest`)
//!
//! File: cli/src/common/archive/manifest.rs
//!
//! ## Overview
//!
//! Builds the `META-INF/MANIFEST.MF` main section. Headers keep insertion order,
//! `Manifest-Version` always comes first, and every line is wrapped to the
//! 72-byte limit of the JAR manifest format with single-space continuation lines.
//!
//! ```rust
//! let mut manifest = Manifest::new();
//! manifest.set_created_by("ejbpack", "org.ejbpack", "ejbpack", "0.1.0")?;
//! manifest.insert("Implementation-Title", "orders")?;
//! let bytes = manifest.to_bytes();
//! ```
//!
use crate::core::error::{EjbError, Result};

pub const MANIFEST_PATH: &str = "META-INF/MANIFEST.MF";
const MAX_LINE_BYTES: usize = 72;
const MAX_NAME_BYTES: usize = 70;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Manifest {
    headers: Vec<(String, String)>,
}

impl Default for Manifest {
    fn default() -> Self {
        Self::new()
    }
}

impl Manifest {
    pub fn new() -> Self {
        Self {
            headers: vec![("Manifest-Version".to_string(), "1.0".to_string())],
        }
    }

    /// Stamps the tool identity as `Created-By: <tool> <version> (<group>:<artifact>)`.
    pub fn set_created_by(
        &mut self,
        tool: &str,
        group_id: &str,
        artifact_id: &str,
        version: &str,
    ) -> Result<()> {
        self.insert(
            "Created-By",
            &format!("{} {} ({}:{})", tool, version, group_id, artifact_id),
        )
    }

    /// Adds a header, replacing an existing one of the same name (names compare
    /// case-insensitively, as the manifest format requires).
    pub fn insert(&mut self, name: &str, value: &str) -> Result<()> {
        validate_name(name)?;
        if value.contains(['\r', '\n', '\0']) {
            anyhow::bail!(EjbError::Config(format!(
                "Manifest header '{}' has a value containing a line break",
                name
            )));
        }
        match self
            .headers
            .iter_mut()
            .find(|(existing, _)| existing.eq_ignore_ascii_case(name))
        {
            Some(header) => header.1 = value.to_string(),
            None => self.headers.push((name.to_string(), value.to_string())),
        }
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(existing, _)| existing.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Serialises the main section, CRLF terminated, followed by the blank line
    /// that ends the section.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = String::new();
        for (name, value) in &self.headers {
            write_wrapped(&mut out, &format!("{}: {}", name, value));
        }
        out.push_str("\r\n");
        out.into_bytes()
    }
}

fn validate_name(name: &str) -> Result<()> {
    let mut chars = name.chars();
    let well_formed = chars.next().is_some_and(|c| c.is_ascii_alphanumeric())
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        && name.len() <= MAX_NAME_BYTES;
    if !well_formed {
        anyhow::bail!(EjbError::Config(format!(
            "Invalid manifest header name '{}'",
            name
        )));
    }
    Ok(())
}

/// First line holds up to 72 bytes; continuation lines a space plus 71 bytes.
/// Splits only on character boundaries.
fn write_wrapped(out: &mut String, line: &str) {
    let mut limit = MAX_LINE_BYTES;
    let mut chunk_len = 0;
    for ch in line.chars() {
        if chunk_len + ch.len_utf8() > limit {
            out.push_str("\r\n ");
            limit = MAX_LINE_BYTES - 1;
            chunk_len = 0;
        }
        out.push(ch);
        chunk_len += ch.len_utf8();
    }
    out.push_str("\r\n");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_manifest() {
        let bytes = Manifest::new().to_bytes();
        assert_eq!(bytes, b"Manifest-Version: 1.0\r\n\r\n");
    }

    #[test]
    fn test_created_by_and_order() {
        let mut m = Manifest::new();
        m.set_created_by("ejbpack", "org.ejbpack", "ejbpack", "0.1.0")
            .unwrap();
        m.insert("X-Team", "billing").unwrap();
        let text = String::from_utf8(m.to_bytes()).unwrap();
        assert_eq!(
            text,
            "Manifest-Version: 1.0\r\nCreated-By: ejbpack 0.1.0 (org.ejbpack:ejbpack)\r\nX-Team: billing\r\n\r\n"
        );
    }

    #[test]
    fn test_insert_replaces_case_insensitively() {
        let mut m = Manifest::new();
        m.insert("X-Team", "a").unwrap();
        m.insert("x-team", "b").unwrap();
        assert_eq!(m.get("X-TEAM"), Some("b"));
        assert_eq!(m.headers.len(), 2);
    }

    #[test]
    fn test_long_lines_wrap_at_72_bytes() {
        let mut m = Manifest::new();
        let value = "a".repeat(150);
        m.insert("Class-Path", &value).unwrap();
        let text = String::from_utf8(m.to_bytes()).unwrap();
        for line in text.split("\r\n") {
            assert!(line.len() <= 72, "line too long: {}", line.len());
        }
        let rejoined: String = text
            .split("\r\n")
            .skip(1)
            .map(|l| l.strip_prefix(' ').unwrap_or(l))
            .collect();
        assert!(rejoined.contains(&format!("Class-Path: {}", value)));
    }

    #[test]
    fn test_wrapping_respects_multibyte_chars() {
        let mut out = String::new();
        write_wrapped(&mut out, &format!("K: {}", "é".repeat(60)));
        assert!(out.split("\r\n").all(|l| l.len() <= 72));
    }

    #[test]
    fn test_invalid_names_and_values() {
        let mut m = Manifest::new();
        assert!(m.insert("Bad Name", "v").is_err());
        assert!(m.insert("-Leading", "v").is_err());
        assert!(m.insert("", "v").is_err());
        assert!(m.insert("Ok", "line\nbreak").is_err());
    }
}
