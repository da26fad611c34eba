//! # ejbpack CLI Integration Test Common Helpers
//!
//! File: cli/tests/common.rs
//!
//! ## Overview
//!
//! Shared helpers for the integration tests in this directory. `Project` is a
//! throwaway project root with a `.git` marker (so the `ejbpack.toml` search
//! stops there) and its own home directory (so no user configuration leaks in).
//!

// Different test files use different helpers.
#![allow(dead_code)]

pub use assert_cmd::Command;
use std::fs::{self, File};
use std::io::Read;
use std::path::{Path, PathBuf};
use tempfile::{tempdir, TempDir};
use zip::ZipArchive;

/// An `assert_cmd::Command` for the compiled `ejbpack` binary.
pub fn ejbpack_cmd() -> Command {
    Command::cargo_bin("ejbpack").expect("Failed to find ejbpack binary for testing")
}

pub struct Project {
    dir: TempDir,
}

impl Project {
    /// An empty project with `target/classes` and the standard five-file fixture.
    pub fn new() -> Self {
        let dir = tempdir().expect("Failed to create temp project dir");
        fs::create_dir_all(dir.path().join(".git")).unwrap();
        fs::create_dir_all(dir.path().join("home")).unwrap();
        let project = Project { dir };
        for name in [
            "Foo.class",
            "FooBean.class",
            "FooCMP.class",
            "FooSession.class",
            "package.html",
        ] {
            project.write(&format!("target/classes/com/acme/{}", name), name);
        }
        project
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn target(&self) -> PathBuf {
        self.path().join("target")
    }

    pub fn write(&self, rel: &str, content: &str) {
        let path = self.path().join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    pub fn write_config(&self, content: &str) {
        self.write("ejbpack.toml", content);
    }

    pub fn write_descriptor(&self, content: &str) {
        self.write("target/classes/META-INF/ejb-jar.xml", content);
    }

    /// `ejbpack` running inside the project with an isolated environment.
    pub fn cmd(&self) -> Command {
        let home = self.path().join("home");
        let mut cmd = ejbpack_cmd();
        cmd.current_dir(self.path())
            .env("HOME", &home)
            .env("XDG_CONFIG_HOME", home.join(".config"))
            .env_remove("SOURCE_DATE_EPOCH")
            .env_remove("RUST_LOG");
        cmd
    }

    /// File entries (no directories) of a jar under `target/`, sorted.
    pub fn jar_files(&self, jar: &str) -> Vec<String> {
        let mut names: Vec<String> = self
            .jar_names(jar)
            .into_iter()
            .filter(|n| !n.ends_with('/') && n != "META-INF/MANIFEST.MF")
            .collect();
        names.sort();
        names
    }

    /// All entry names of a jar under `target/`, in archive order.
    pub fn jar_names(&self, jar: &str) -> Vec<String> {
        let archive = self.open_jar(jar);
        archive.file_names().map(String::from).collect()
    }

    pub fn jar_text(&self, jar: &str, entry: &str) -> String {
        let mut archive = self.open_jar(jar);
        let mut file = archive.by_name(entry).expect("entry present");
        let mut content = String::new();
        file.read_to_string(&mut content).unwrap();
        content
    }

    fn open_jar(&self, jar: &str) -> ZipArchive<File> {
        let file = File::open(self.target().join(jar)).expect("jar exists");
        ZipArchive::new(file).expect("valid zip")
    }
}
