//! # ejbpack CLI Files Integration Tests
//!
//! File: cli/tests/files.rs
//!
//! ## Overview
//!
//! `ejbpack files` lists what an archive would contain and writes nothing.
//!

mod common;
use common::*;
use predicates::prelude::*;

const CONFIG: &str = "[project]\nartifact_id = \"orders\"\nversion = \"1.0\"\n";

#[test]
fn test_files_main() {
    let project = Project::new();
    project.write_config(CONFIG);
    project.write_descriptor("<ejb-jar/>");

    project
        .cmd()
        .arg("files")
        .assert()
        .success()
        .stdout(
            predicate::str::contains("META-INF/ejb-jar.xml")
                .and(predicate::str::contains("com/acme/FooBean.class"))
                .and(predicate::str::contains("package.html").not()),
        );
    assert!(!project.target().join("orders-1.0.jar").exists());
}

#[test]
fn test_files_client() {
    let project = Project::new();
    project.write_config(CONFIG);

    project
        .cmd()
        .args(["f", "--client"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("com/acme/Foo.class")
                .and(predicate::str::contains("FooBean").not())
                .and(predicate::str::contains("FooSession").not()),
        );
}

#[test]
fn test_files_skips_version_gate() {
    let project = Project::new();
    project.write_config(CONFIG);

    project
        .cmd()
        .args(["files", "--ejb-version", "2.0"])
        .assert()
        .success();
}
