//! # ejbpack Configuration System
//!
//! File: cli/src/core/config.rs
//!
//! ## Overview
//!
//! This module implements the configuration system for ejbpack, handling loading,
//! merging, and resolution of the packaging parameters. The result is a single
//! immutable `PackageSettings` value that is handed to the archive assembler; no
//! configuration lives in global state.
//!
//! ## Architecture
//!
//! Configuration sources (in order of precedence):
//! 1. Command-line flags (`PackageArgs`)
//! 2. Project-specific `ejbpack.toml` in the current directory or ancestors
//!    (or the file named by `--config`)
//! 3. User-specific `<config dir>/ejbpack/config.toml`
//! 4. Default values defined in the code
//!
//! Relative paths in a configuration file resolve against the directory holding
//! the project configuration (the current directory when there is none). `~` is
//! expanded.
//!
//! ## Examples
//!
//! ```toml
//! [project]
//! group_id = "com.acme"
//! artifact_id = "orders"
//! version = "1.4.0"
//! output_timestamp = "2024-01-01T00:00:00Z"
//!
//! [ejb]
//! ejb_version = "3.2"
//! generate_client = true
//! client_excludes = ["**/*Bean.class", "**/internal/**"]
//! filter_deployment_descriptor = true
//! filters = ["src/main/filters/prod.properties"]
//!
//! [archive.manifest_entries]
//! "Dependencies" = "org.slf4j"
//! ```
//!
//! ```rust
//! let loaded = config::load_config(args.config.as_deref())?;
//! let settings = PackageSettings::resolve(loaded, &args)?;
//! println!("Packaging {}", settings.source_directory.display());
//! ```
//!
use crate::core::error::{EjbError, Result};
use anyhow::{anyhow, Context};
use clap::Args;
use directories::ProjectDirs;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::{debug, info, warn};

pub const PROJECT_CONFIG_FILENAME: &str = "ejbpack.toml";
pub const DEFAULT_CLIENT_CLASSIFIER: &str = "client";
pub const DEFAULT_EJB_JAR: &str = "META-INF/ejb-jar.xml";
pub const DEFAULT_EJB_VERSION: &str = "3.1";
const DEFAULT_BUILD_DIRECTORY: &str = "target";
const DEFAULT_OUTPUT_DIRECTORY: &str = "target/classes";

/// # Packaging Arguments (`PackageArgs`)
///
/// Command-line flags shared by `ejbpack build` and `ejbpack files`. Every flag
/// overrides the matching configuration file key when given.
#[derive(Args, Debug, Default, Clone)]
pub struct PackageArgs {
    /// Project configuration file to use instead of searching for `ejbpack.toml`.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Directory holding the compiled classes to package (default `target/classes`).
    #[arg(long)]
    pub source_dir: Option<PathBuf>,

    /// Directory the archives are written to (default `target`).
    #[arg(long, short = 'o')]
    pub output_dir: Option<PathBuf>,

    /// Base archive name (default `<artifact_id>-<version>`).
    #[arg(long)]
    pub name: Option<String>,

    /// Classifier for the main archive. When set the archive is attached instead
    /// of becoming the primary artifact.
    #[arg(long)]
    pub classifier: Option<String>,

    /// Classifier for the client archive (default `client`).
    #[arg(long)]
    pub client_classifier: Option<String>,

    /// Location of the deployment descriptor relative to the source directory.
    #[arg(long)]
    pub ejb_jar: Option<String>,

    /// Also build the client archive.
    #[arg(long, overrides_with = "no_generate_client")]
    pub generate_client: bool,

    /// Do not build the client archive, whatever the configuration says.
    #[arg(long, overrides_with = "generate_client")]
    pub no_generate_client: bool,

    /// Pattern to exclude from the main archive. Repeatable; replaces the defaults.
    #[arg(long = "exclude", action = clap::ArgAction::Append)]
    pub excludes: Vec<String>,

    /// Pattern to include in the client archive. Repeatable; replaces the defaults.
    #[arg(long = "client-include", action = clap::ArgAction::Append)]
    pub client_includes: Vec<String>,

    /// Pattern to exclude from the client archive. Repeatable; replaces the defaults.
    #[arg(long = "client-exclude", action = clap::ArgAction::Append)]
    pub client_excludes: Vec<String>,

    /// EJB version: 2.x, 3.x or 4.x (default 3.1).
    #[arg(long)]
    pub ejb_version: Option<String>,

    /// Interpolate `${...}` expressions in the deployment descriptor.
    #[arg(long, overrides_with = "no_filter_descriptor")]
    pub filter_descriptor: bool,

    /// Package the deployment descriptor as is.
    #[arg(long, overrides_with = "filter_descriptor")]
    pub no_filter_descriptor: bool,

    /// Properties file used while filtering the descriptor. Repeatable.
    #[arg(long = "filter", action = clap::ArgAction::Append)]
    pub filters: Vec<PathBuf>,

    /// Double the backslashes of Windows-path values during filtering.
    #[arg(long, overrides_with = "no_escape_backslashes")]
    pub escape_backslashes: bool,

    /// Leave backslashes in filtered values alone.
    #[arg(long, overrides_with = "escape_backslashes")]
    pub no_escape_backslashes: bool,

    /// Expressions preceded by this string are emitted literally.
    #[arg(long)]
    pub escape_string: Option<String>,

    /// Reproducible entry timestamp: ISO-8601 with offset, or epoch seconds.
    #[arg(long, env = "SOURCE_DATE_EPOCH")]
    pub output_timestamp: Option<String>,

    /// Property made available to descriptor filtering (`KEY=VALUE`). Repeatable.
    #[arg(short = 'D', long = "define", value_parser = parse_key_val, action = clap::ArgAction::Append)]
    pub defines: Vec<(String, String)>,

    /// An already-built primary artifact file for the project.
    #[arg(long)]
    pub artifact_file: Option<PathBuf>,
}

/// A `--flag` / `--no-flag` pair: `None` when neither was given.
fn switch(on: bool, off: bool) -> Option<bool> {
    match (on, off) {
        (true, _) => Some(true),
        (_, true) => Some(false),
        _ => None,
    }
}

/// # Parse Key-Value Pair (`parse_key_val`)
///
/// Used by `clap` for `-D KEY=VALUE`. Splits on the first `=`; the key is trimmed,
/// the value kept verbatim so it can carry leading spaces or further `=` signs.
fn parse_key_val(s: &str) -> Result<(String, String)> {
    s.split_once('=')
        .map(|(k, v)| (k.trim().to_string(), v.to_string()))
        .filter(|(k, _)| !k.is_empty())
        .ok_or_else(|| {
            anyhow!(EjbError::ArgumentParsing(format!(
                "Invalid property format: '{}'. Expected format: KEY=VALUE",
                s
            )))
        })
}

/// Represents the configuration file structure, loaded from TOML files.
#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub project: ProjectConfig,
    #[serde(default)]
    pub ejb: EjbConfig,
    #[serde(default)]
    pub archive: ArchiveConfig,
}

/// Project identity and build layout.
#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields)]
pub struct ProjectConfig {
    pub group_id: Option<String>,
    pub artifact_id: Option<String>,
    pub version: Option<String>,
    pub name: Option<String>,
    /// Where archives are written (`target`).
    pub build_directory: Option<String>,
    /// Where compiled classes live (`target/classes`).
    pub output_directory: Option<String>,
    pub final_name: Option<String>,
    /// An existing primary artifact file, if the project already produced one.
    pub artifact_file: Option<String>,
    pub output_timestamp: Option<String>,
    /// Extra properties for descriptor filtering.
    #[serde(default)]
    pub properties: BTreeMap<String, String>,
}

/// Packaging parameters.
#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields)]
pub struct EjbConfig {
    pub classifier: Option<String>,
    pub client_classifier: Option<String>,
    pub ejb_jar: Option<String>,
    pub generate_client: Option<bool>,
    pub client_includes: Option<Vec<String>>,
    pub client_excludes: Option<Vec<String>>,
    pub excludes: Option<Vec<String>>,
    pub ejb_version: Option<String>,
    pub filter_deployment_descriptor: Option<bool>,
    pub filters: Option<Vec<String>>,
    pub escape_backslashes_in_file_path: Option<bool>,
    pub escape_string: Option<String>,
}

/// Manifest customisation.
#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields)]
pub struct ArchiveConfig {
    pub add_default_implementation_entries: Option<bool>,
    #[serde(default)]
    pub manifest_entries: BTreeMap<String, String>,
}

/// A merged configuration together with the directory its relative paths resolve against.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: Config,
    pub base_dir: PathBuf,
}

/// Settings that feed descriptor filtering.
#[derive(Debug, Clone, Default)]
pub struct FilterSettings {
    pub enabled: bool,
    pub filters: Vec<PathBuf>,
    pub escape_backslashes: bool,
    pub escape_string: Option<String>,
    /// `-D` properties; these win over every other source.
    pub user_properties: BTreeMap<String, String>,
}

/// Settings that feed the generated manifest.
#[derive(Debug, Clone, Default)]
pub struct ManifestSettings {
    pub add_default_implementation_entries: bool,
    pub entries: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Default)]
pub struct ProjectIdentity {
    pub group_id: Option<String>,
    pub artifact_id: Option<String>,
    pub version: Option<String>,
    pub name: Option<String>,
    pub properties: BTreeMap<String, String>,
}

/// # Effective Packaging Settings (`PackageSettings`)
///
/// The final, immutable parameters of one invocation, after defaults, user
/// config, project config, and CLI flags have been merged.
#[derive(Debug, Clone)]
pub struct PackageSettings {
    pub output_directory: PathBuf,
    pub source_directory: PathBuf,
    pub jar_name: String,
    pub classifier: Option<String>,
    /// May be blank if explicitly configured so.
    pub client_classifier: String,
    pub ejb_jar: String,
    pub generate_client: bool,
    pub client_includes: Option<Vec<String>>,
    pub client_excludes: Option<Vec<String>>,
    pub excludes: Option<Vec<String>>,
    pub ejb_version: String,
    pub filtering: FilterSettings,
    pub output_timestamp: Option<String>,
    pub manifest: ManifestSettings,
    pub project: ProjectIdentity,
    pub artifact_file: Option<PathBuf>,
}

impl PackageSettings {
    /// Merges CLI flags over a loaded configuration.
    pub fn resolve(loaded: LoadedConfig, args: &PackageArgs) -> Result<Self> {
        let LoadedConfig { config, base_dir } = loaded;
        let Config {
            project,
            ejb,
            archive,
        } = config;

        let output_directory = match &args.output_dir {
            Some(dir) => dir.clone(),
            None => resolve_path(
                &base_dir,
                project
                    .build_directory
                    .as_deref()
                    .unwrap_or(DEFAULT_BUILD_DIRECTORY),
            ),
        };
        let source_directory = match &args.source_dir {
            Some(dir) => dir.clone(),
            None => resolve_path(
                &base_dir,
                project
                    .output_directory
                    .as_deref()
                    .unwrap_or(DEFAULT_OUTPUT_DIRECTORY),
            ),
        };

        let jar_name = args
            .name
            .clone()
            .or_else(|| project.final_name.clone())
            .or_else(|| match (&project.artifact_id, &project.version) {
                (Some(a), Some(v)) => Some(format!("{}-{}", a, v)),
                _ => None,
            })
            .ok_or_else(|| {
                anyhow!(EjbError::Config(
                    "No archive name: set --name, project.final_name, or project.artifact_id and project.version."
                        .to_string()
                ))
            })?;

        let filters = if !args.filters.is_empty() {
            args.filters.clone()
        } else {
            ejb.filters
                .unwrap_or_default()
                .iter()
                .map(|f| resolve_path(&base_dir, f))
                .collect()
        };

        let artifact_file = args
            .artifact_file
            .clone()
            .or_else(|| project.artifact_file.as_deref().map(|f| resolve_path(&base_dir, f)));

        let settings = PackageSettings {
            output_directory,
            source_directory,
            jar_name,
            classifier: args.classifier.clone().or(ejb.classifier),
            client_classifier: args
                .client_classifier
                .clone()
                .or(ejb.client_classifier)
                .unwrap_or_else(|| DEFAULT_CLIENT_CLASSIFIER.to_string()),
            ejb_jar: args
                .ejb_jar
                .clone()
                .or(ejb.ejb_jar)
                .unwrap_or_else(|| DEFAULT_EJB_JAR.to_string()),
            generate_client: switch(args.generate_client, args.no_generate_client)
                .or(ejb.generate_client)
                .unwrap_or(false),
            client_includes: override_list(&args.client_includes, ejb.client_includes),
            client_excludes: override_list(&args.client_excludes, ejb.client_excludes),
            excludes: override_list(&args.excludes, ejb.excludes),
            ejb_version: args
                .ejb_version
                .clone()
                .or(ejb.ejb_version)
                .unwrap_or_else(|| DEFAULT_EJB_VERSION.to_string()),
            filtering: FilterSettings {
                enabled: switch(args.filter_descriptor, args.no_filter_descriptor)
                    .or(ejb.filter_deployment_descriptor)
                    .unwrap_or(false),
                filters,
                escape_backslashes: switch(args.escape_backslashes, args.no_escape_backslashes)
                    .or(ejb.escape_backslashes_in_file_path)
                    .unwrap_or(false),
                escape_string: args.escape_string.clone().or(ejb.escape_string),
                user_properties: args.defines.iter().cloned().collect(),
            },
            output_timestamp: args
                .output_timestamp
                .clone()
                .or(project.output_timestamp),
            manifest: ManifestSettings {
                add_default_implementation_entries: archive
                    .add_default_implementation_entries
                    .unwrap_or(false),
                entries: archive.manifest_entries,
            },
            project: ProjectIdentity {
                group_id: project.group_id,
                artifact_id: project.artifact_id,
                version: project.version,
                name: project.name,
                properties: project.properties,
            },
            artifact_file,
        };
        debug!("Resolved package settings: {:?}", settings);
        Ok(settings)
    }

    /// Absolute location of the deployment descriptor.
    pub fn descriptor_path(&self) -> PathBuf {
        self.source_directory.join(&self.ejb_jar)
    }

    /// Properties available to filtering before filter files and `-D` values
    /// are layered on: the built-in `project.*` expressions, then `[project.properties]`.
    pub fn base_properties(&self) -> BTreeMap<String, String> {
        let mut props = BTreeMap::new();
        let builtins = [
            ("project.groupId", self.project.group_id.clone()),
            ("project.artifactId", self.project.artifact_id.clone()),
            ("project.version", self.project.version.clone()),
            ("project.name", self.project.name.clone()),
            ("project.build.finalName", Some(self.jar_name.clone())),
            (
                "project.build.directory",
                Some(self.output_directory.to_string_lossy().into_owned()),
            ),
            (
                "project.build.outputDirectory",
                Some(self.source_directory.to_string_lossy().into_owned()),
            ),
        ];
        for (key, value) in builtins {
            if let Some(value) = value {
                props.insert(key.to_string(), value);
            }
        }
        props.extend(self.project.properties.clone());
        props
    }

    /// Minimal settings rooted at the given directories, for unit tests.
    #[cfg(test)]
    pub fn for_tests(output: impl Into<PathBuf>, source: impl Into<PathBuf>, name: &str) -> Self {
        PackageSettings {
            output_directory: output.into(),
            source_directory: source.into(),
            jar_name: name.to_string(),
            classifier: None,
            client_classifier: DEFAULT_CLIENT_CLASSIFIER.to_string(),
            ejb_jar: DEFAULT_EJB_JAR.to_string(),
            generate_client: false,
            client_includes: None,
            client_excludes: None,
            excludes: None,
            ejb_version: DEFAULT_EJB_VERSION.to_string(),
            filtering: FilterSettings::default(),
            output_timestamp: None,
            manifest: ManifestSettings::default(),
            project: ProjectIdentity::default(),
            artifact_file: None,
        }
    }
}

/// A list given on the command line replaces the configured list.
fn override_list(cli: &[String], configured: Option<Vec<String>>) -> Option<Vec<String>> {
    if cli.is_empty() {
        configured
    } else {
        Some(cli.to_vec())
    }
}

fn resolve_path(base_dir: &Path, raw: &str) -> PathBuf {
    let expanded = PathBuf::from(shellexpand::tilde(raw).into_owned());
    if expanded.is_relative() {
        base_dir.join(expanded)
    } else {
        expanded
    }
}

/// Loads and merges the user and project configuration files.
///
/// `explicit` names a project configuration file that must exist; without it the
/// current directory and its ancestors are searched for `ejbpack.toml`.
pub fn load_config(explicit: Option<&Path>) -> Result<LoadedConfig> {
    let current_dir = std::env::current_dir().context("Failed to get current directory")?;
    let user_config = load_user_config()?;

    let project_path = match explicit {
        Some(path) => {
            if !path.is_file() {
                anyhow::bail!(EjbError::Config(format!(
                    "Configuration file '{}' does not exist.",
                    path.display()
                )));
            }
            Some(path.to_path_buf())
        }
        None => find_project_config_path(&current_dir),
    };

    let (project_config, base_dir) = match project_path {
        Some(path) => {
            info!("Loading project configuration from: {}", path.display());
            let cfg = load_config_from_path(&path)?;
            let base = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .map(Path::to_path_buf)
                .unwrap_or_else(|| current_dir.clone());
            (Some(cfg), base)
        }
        None => {
            debug!(
                "No project configuration file ({}) found in current directory or ancestors.",
                PROJECT_CONFIG_FILENAME
            );
            (None, current_dir)
        }
    };

    let merged = merge_configs(user_config.unwrap_or_default(), project_config);
    debug!("Final loaded configuration: {:?}", merged);
    Ok(LoadedConfig {
        config: merged,
        base_dir,
    })
}

fn load_user_config() -> Result<Option<Config>> {
    if let Some(proj_dirs) = ProjectDirs::from("org", "ejbpack", "ejbpack") {
        let config_path = proj_dirs.config_dir().join("config.toml");
        if config_path.exists() {
            info!("Loading user configuration from: {}", config_path.display());
            load_config_from_path(&config_path).map(Some)
        } else {
            debug!(
                "User configuration file not found at {}",
                config_path.display()
            );
            Ok(None)
        }
    } else {
        warn!("Could not determine user config directory.");
        Ok(None)
    }
}

fn find_project_config_path(start: &Path) -> Option<PathBuf> {
    let mut path = start;
    loop {
        let project_config = path.join(PROJECT_CONFIG_FILENAME);
        if project_config.is_file() {
            return Some(project_config);
        }
        if path.join(".git").is_dir() {
            debug!(
                "Found .git directory at {}, stopping project config search.",
                path.display()
            );
            return None;
        }
        path = path.parent()?;
    }
}

fn load_config_from_path(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read configuration file: {}", path.display()))?;
    toml::from_str(&content)
        .map_err(|e| anyhow!(EjbError::Config(e.to_string())))
        .with_context(|| format!("Failed to parse TOML from file: {}", path.display()))
}

/// Project values win field by field; property and manifest maps are combined
/// with project entries replacing user entries of the same key.
fn merge_configs(user: Config, project: Option<Config>) -> Config {
    let project = match project {
        Some(p) => p,
        None => return user,
    };
    let (u, p) = (user.project, project.project);
    let mut properties = u.properties;
    properties.extend(p.properties);
    let merged_project = ProjectConfig {
        group_id: p.group_id.or(u.group_id),
        artifact_id: p.artifact_id.or(u.artifact_id),
        version: p.version.or(u.version),
        name: p.name.or(u.name),
        build_directory: p.build_directory.or(u.build_directory),
        output_directory: p.output_directory.or(u.output_directory),
        final_name: p.final_name.or(u.final_name),
        artifact_file: p.artifact_file.or(u.artifact_file),
        output_timestamp: p.output_timestamp.or(u.output_timestamp),
        properties,
    };

    let (u, p) = (user.ejb, project.ejb);
    let merged_ejb = EjbConfig {
        classifier: p.classifier.or(u.classifier),
        client_classifier: p.client_classifier.or(u.client_classifier),
        ejb_jar: p.ejb_jar.or(u.ejb_jar),
        generate_client: p.generate_client.or(u.generate_client),
        client_includes: p.client_includes.or(u.client_includes),
        client_excludes: p.client_excludes.or(u.client_excludes),
        excludes: p.excludes.or(u.excludes),
        ejb_version: p.ejb_version.or(u.ejb_version),
        filter_deployment_descriptor: p
            .filter_deployment_descriptor
            .or(u.filter_deployment_descriptor),
        filters: p.filters.or(u.filters),
        escape_backslashes_in_file_path: p
            .escape_backslashes_in_file_path
            .or(u.escape_backslashes_in_file_path),
        escape_string: p.escape_string.or(u.escape_string),
    };

    let (u, p) = (user.archive, project.archive);
    let mut manifest_entries = u.manifest_entries;
    manifest_entries.extend(p.manifest_entries);
    let merged_archive = ArchiveConfig {
        add_default_implementation_entries: p
            .add_default_implementation_entries
            .or(u.add_default_implementation_entries),
        manifest_entries,
    };

    Config {
        project: merged_project,
        ejb: merged_ejb,
        archive: merged_archive,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn loaded(config: Config, base: &Path) -> LoadedConfig {
        LoadedConfig {
            config,
            base_dir: base.to_path_buf(),
        }
    }

    #[test]
    fn test_deserialize_basic_toml() {
        let toml_content = r#"
            [project]
            group_id = "com.acme"
            artifact_id = "orders"
            version = "1.0"

            [project.properties]
            "db.url" = "jdbc:h2:mem"

            [ejb]
            ejb_version = "3.2"
            generate_client = true
            client_excludes = ["**/*Bean.class"]

            [archive.manifest_entries]
            "X-Team" = "billing"
        "#;

        let config: Config = toml::from_str(toml_content).expect("Failed to parse TOML");
        assert_eq!(config.project.artifact_id.as_deref(), Some("orders"));
        assert_eq!(config.project.properties["db.url"], "jdbc:h2:mem");
        assert_eq!(config.ejb.ejb_version.as_deref(), Some("3.2"));
        assert_eq!(config.ejb.generate_client, Some(true));
        assert_eq!(
            config.ejb.client_excludes,
            Some(vec!["**/*Bean.class".to_string()])
        );
        assert!(config.ejb.client_includes.is_none());
        assert_eq!(config.archive.manifest_entries["X-Team"], "billing");
    }

    #[test]
    fn test_unknown_keys_rejected() {
        let result: std::result::Result<Config, _> = toml::from_str("[ejb]\nejbVersion = \"3.1\"");
        assert!(result.is_err());
    }

    #[test]
    fn test_defaults_applied() {
        let base = tempdir().unwrap();
        let mut config = Config::default();
        config.project.artifact_id = Some("orders".into());
        config.project.version = Some("2.0".into());
        let settings =
            PackageSettings::resolve(loaded(config, base.path()), &PackageArgs::default()).unwrap();
        assert_eq!(settings.jar_name, "orders-2.0");
        assert_eq!(settings.client_classifier, "client");
        assert_eq!(settings.ejb_jar, "META-INF/ejb-jar.xml");
        assert_eq!(settings.ejb_version, "3.1");
        assert_eq!(settings.output_directory, base.path().join("target"));
        assert_eq!(
            settings.source_directory,
            base.path().join("target/classes")
        );
        assert!(!settings.generate_client);
        assert!(settings.excludes.is_none());
    }

    #[test]
    fn test_missing_name_is_config_error() {
        let base = tempdir().unwrap();
        let err = PackageSettings::resolve(loaded(Config::default(), base.path()), &PackageArgs::default())
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<EjbError>(),
            Some(EjbError::Config(_))
        ));
    }

    #[test]
    fn test_cli_overrides_file() {
        let base = tempdir().unwrap();
        let mut config = Config::default();
        config.project.final_name = Some("from-file".into());
        config.ejb.excludes = Some(vec!["**/file.class".into()]);
        config.ejb.ejb_version = Some("2.1".into());
        let args = PackageArgs {
            name: Some("from-cli".into()),
            excludes: vec!["**/cli.class".into()],
            defines: vec![("env".into(), "prod".into())],
            ..Default::default()
        };
        let settings = PackageSettings::resolve(loaded(config, base.path()), &args).unwrap();
        assert_eq!(settings.jar_name, "from-cli");
        assert_eq!(settings.excludes, Some(vec!["**/cli.class".to_string()]));
        assert_eq!(settings.ejb_version, "2.1"); // not given on CLI
        assert_eq!(settings.filtering.user_properties["env"], "prod");
    }

    #[test]
    fn test_cli_switches_turn_file_settings_off() {
        let base = tempdir().unwrap();
        let mut config = Config::default();
        config.project.final_name = Some("orders".into());
        config.ejb.generate_client = Some(true);
        config.ejb.filter_deployment_descriptor = Some(true);
        config.ejb.escape_backslashes_in_file_path = Some(true);

        let from_file =
            PackageSettings::resolve(loaded(config.clone(), base.path()), &PackageArgs::default())
                .unwrap();
        assert!(from_file.generate_client);
        assert!(from_file.filtering.enabled);
        assert!(from_file.filtering.escape_backslashes);

        let args = PackageArgs {
            no_generate_client: true,
            no_filter_descriptor: true,
            no_escape_backslashes: true,
            ..Default::default()
        };
        let settings = PackageSettings::resolve(loaded(config, base.path()), &args).unwrap();
        assert!(!settings.generate_client);
        assert!(!settings.filtering.enabled);
        assert!(!settings.filtering.escape_backslashes);
    }

    #[test]
    fn test_switch_pairs() {
        assert_eq!(switch(false, false), None);
        assert_eq!(switch(true, false), Some(true));
        assert_eq!(switch(false, true), Some(false));
    }

    #[test]
    fn test_merge_project_wins_and_maps_combine() {
        let mut user = Config::default();
        user.project.version = Some("1.0".into());
        user.project.properties.insert("a".into(), "user".into());
        user.project.properties.insert("b".into(), "user".into());
        user.ejb.ejb_version = Some("2.0".into());

        let mut project = Config::default();
        project.project.properties.insert("b".into(), "project".into());
        project.ejb.ejb_version = Some("3.0".into());

        let merged = merge_configs(user, Some(project));
        assert_eq!(merged.project.version.as_deref(), Some("1.0"));
        assert_eq!(merged.ejb.ejb_version.as_deref(), Some("3.0"));
        assert_eq!(merged.project.properties["a"], "user");
        assert_eq!(merged.project.properties["b"], "project");
    }

    #[test]
    fn test_path_expansion() {
        let base = Path::new("/work/project");
        let home_dir = dirs::home_dir().unwrap();
        assert_eq!(resolve_path(base, "~/classes"), home_dir.join("classes"));
        assert_eq!(resolve_path(base, "out"), base.join("out"));
        assert_eq!(resolve_path(base, "/abs/out"), PathBuf::from("/abs/out"));
    }

    #[test]
    fn test_find_project_config_walks_up() {
        let root = tempdir().unwrap();
        fs::write(root.path().join(PROJECT_CONFIG_FILENAME), "").unwrap();
        let nested = root.path().join("a/b");
        fs::create_dir_all(&nested).unwrap();
        assert_eq!(
            find_project_config_path(&nested),
            Some(root.path().join(PROJECT_CONFIG_FILENAME))
        );
    }

    #[test]
    fn test_find_project_config_stops_at_git() {
        let root = tempdir().unwrap();
        fs::write(root.path().join(PROJECT_CONFIG_FILENAME), "").unwrap();
        let repo = root.path().join("repo");
        fs::create_dir_all(repo.join(".git")).unwrap();
        assert_eq!(find_project_config_path(&repo), None);
    }

    #[test]
    fn test_parse_key_val() {
        assert_eq!(
            parse_key_val("db.url = jdbc:x=1").unwrap(),
            ("db.url".to_string(), " jdbc:x=1".to_string())
        );
        assert!(parse_key_val("novalue").is_err());
        assert!(parse_key_val("=v").is_err());
    }

    #[test]
    fn test_base_properties() {
        let mut settings = PackageSettings::for_tests("/o", "/s", "orders-1.0");
        settings.project.artifact_id = Some("orders".into());
        settings
            .project
            .properties
            .insert("project.artifactId".into(), "override".into());
        let props = settings.base_properties();
        assert_eq!(props["project.build.finalName"], "orders-1.0");
        assert_eq!(props["project.artifactId"], "override");
        assert!(!props.contains_key("project.version"));
    }
}
