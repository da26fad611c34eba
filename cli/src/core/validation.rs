//! # Classifier and EJB Version Validation
//!
//! File: cli/src/core/validation.rs
//!
//! ## Overview
//!
//! Pure predicates guarding the build: classifier presence and well-formedness,
//! the EJB version shape (`2.x`, `3.x`, `4.x` where `x` is one digit), and the
//! rule that EJB 2.x requires the deployment descriptor on disk.
//!
//! The classifier rule is a plain `fn(&str) -> bool` (`ClassifierRule`) so a
//! caller can swap in a stricter or looser check; `default_classifier_rule`
//! accepts a run of letters followed by letters, digits, and dashes. That rule
//! keeps path separators, whitespace, and `:` (the coordinate separator) out of
//! artifact file names.
//!
use crate::core::error::{EjbError, Result};
use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;

/// Predicate deciding whether a non-blank classifier is acceptable.
pub type ClassifierRule = fn(&str) -> bool;

static CLASSIFIER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\A[a-zA-Z]+[0-9a-zA-Z\-]*\z").expect("classifier pattern"));

static EJB_VERSION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\A[2-4]\.[0-9]\z").expect("version pattern"));

static EJB_VERSION_2: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\A2\.[0-9]\z").expect("version 2 pattern"));

/// True when `classifier` is present and contains something other than whitespace.
pub fn has_classifier(classifier: Option<&str>) -> bool {
    classifier.is_some_and(|c| !c.trim().is_empty())
}

pub fn default_classifier_rule(classifier: &str) -> bool {
    CLASSIFIER.is_match(classifier)
}

/// A blank classifier is never valid.
pub fn is_classifier_valid(classifier: Option<&str>, rule: ClassifierRule) -> bool {
    match classifier {
        Some(c) if has_classifier(Some(c)) => rule(c),
        _ => false,
    }
}

/// Full-string match of `^[2-4]\.[0-9]$`.
pub fn is_version_valid(version: &str) -> bool {
    EJB_VERSION.is_match(version)
}

pub fn validate_version(version: &str) -> Result<()> {
    if !is_version_valid(version) {
        anyhow::bail!(EjbError::InvalidVersion {
            version: version.to_string(),
        });
    }
    Ok(())
}

/// Version must be valid, and a 2.x version needs the descriptor to exist.
///
/// `descriptor_name` is the configured relative path, used in the message.
pub fn check_version_compliance(
    version: &str,
    descriptor: &Path,
    descriptor_name: &str,
) -> Result<()> {
    validate_version(version)?;
    if EJB_VERSION_2.is_match(version) && !descriptor.exists() {
        anyhow::bail!(EjbError::DescriptorRequired {
            descriptor: descriptor_name.to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_accepted_versions() {
        for v in ["3.1", "2.0", "4.9", "3.0", "2.1"] {
            assert!(is_version_valid(v), "{v} should be accepted");
        }
    }

    #[test]
    fn test_rejected_versions() {
        for v in ["5.0", "3.10", "abc", "", "2.x", "1.1", " 3.1", "3.1\n", "3"] {
            assert!(!is_version_valid(v), "{v:?} should be rejected");
        }
        let err = validate_version("5.0").unwrap_err();
        assert!(err.to_string().contains("ejbVersion is not valid: 5.0"));
    }

    #[test]
    fn test_version_2_requires_descriptor() {
        let dir = tempdir().unwrap();
        let descriptor = dir.path().join("META-INF/ejb-jar.xml");

        let err = check_version_compliance("2.0", &descriptor, "META-INF/ejb-jar.xml").unwrap_err();
        assert!(matches!(
            err.downcast_ref::<EjbError>(),
            Some(EjbError::DescriptorRequired { .. })
        ));

        // 3.x does not need the descriptor.
        assert!(check_version_compliance("3.0", &descriptor, "META-INF/ejb-jar.xml").is_ok());

        fs::create_dir_all(descriptor.parent().unwrap()).unwrap();
        fs::write(&descriptor, "<ejb-jar/>").unwrap();
        assert!(check_version_compliance("2.0", &descriptor, "META-INF/ejb-jar.xml").is_ok());
    }

    #[test]
    fn test_invalid_version_fails_before_descriptor_check() {
        let dir = tempdir().unwrap();
        let err = check_version_compliance("9.9", &dir.path().join("missing.xml"), "missing.xml")
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<EjbError>(),
            Some(EjbError::InvalidVersion { .. })
        ));
    }

    #[test]
    fn test_has_classifier() {
        assert!(has_classifier(Some("client")));
        assert!(!has_classifier(Some("   ")));
        assert!(!has_classifier(Some("")));
        assert!(!has_classifier(None));
    }

    #[test]
    fn test_default_classifier_rule() {
        assert!(is_classifier_valid(Some("client"), default_classifier_rule));
        assert!(is_classifier_valid(Some("jdk11-tests"), default_classifier_rule));
        assert!(!is_classifier_valid(Some("a/b"), default_classifier_rule));
        assert!(!is_classifier_valid(Some("with space"), default_classifier_rule));
        assert!(!is_classifier_valid(Some("g:a"), default_classifier_rule));
        assert!(!is_classifier_valid(Some("1client"), default_classifier_rule));
        assert!(!is_classifier_valid(Some(" "), default_classifier_rule));
    }

    #[test]
    fn test_custom_classifier_rule() {
        fn anything(_: &str) -> bool {
            true
        }
        assert!(is_classifier_valid(Some("1/weird"), anything));
        assert!(!is_classifier_valid(None, anything));
    }
}
