//! End-to-end tests for the `eo-build` binary.
//!
//! Nothing here touches the network: assembly runs on sources that refer to
//! no other objects, and the hash table comes from a local file.

#[allow(dead_code)]
mod common;
use common::prelude::*;

#[test]
fn test_help() {
    let mut cmd = cargo_bin_cmd!("eo-build");
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("register"))
        .stdout(predicate::str::contains("assemble"))
        .stdout(predicate::str::contains("binarize"));
}

#[test]
fn test_version() {
    let mut cmd = cargo_bin_cmd!("eo-build");
    cmd.arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_unknown_command() {
    let mut cmd = cargo_bin_cmd!("eo-build");
    cmd.arg("compile").assert().failure();
}

#[test]
fn test_register() {
    let fixture = TestFixture::new()
        .with_source("org/example/app.eo", "[] > app")
        .with_source("org/example/main.eo", "[] > main");
    fixture
        .command()
        .arg("register")
        .assert()
        .success()
        .stdout(predicate::str::contains("Registered 2 EO source(s)"));
    fixture
        .child("target/eo/eo-foreign.json")
        .assert(predicate::str::contains("org.example.app"))
        .assert(predicate::str::contains("\"registered\""));
}

#[test]
fn test_register_rejects_odd_names() {
    let fixture = TestFixture::new().with_source(".hidden.eo", "[] > hidden");
    fixture
        .command()
        .arg("register")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Incorrect name found: '.hidden.eo'"));
}

#[test]
fn test_register_lenient_names() {
    let fixture = TestFixture::new().with_source(".hidden.eo", "[] > hidden");
    fixture
        .command()
        .args(["register", "--lenient-names"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Registered 1 EO source(s)"));
}

#[test]
fn test_register_with_versions() {
    let fixture = TestFixture::new()
        .with_config("project: { group: org.example, artifact: app, version: 1.2.3 }\n")
        .with_source("app.eo", "[] > app");
    fixture
        .command()
        .args(["register", "--with-versions"])
        .assert()
        .success();
    fixture
        .child("target/eo/eo-external.json")
        .assert(predicate::str::contains("1.2.3"))
        .assert(predicate::str::contains("\"exported\""));
}

#[test]
fn test_register_without_sources() {
    let fixture = TestFixture::new();
    fixture
        .command()
        .arg("register")
        .assert()
        .failure()
        .stderr(predicate::str::contains("doesn't exist"));
}

#[test]
fn test_config_from_other_directory() {
    let fixture = TestFixture::new()
        .with_file("project/eo.yaml", configs::FLAT)
        .with_file("project/eo/app.eo", "[] > app");
    fixture
        .command()
        .arg("register")
        .arg("--config")
        .arg(fixture.path().join("project/eo.yaml"))
        .assert()
        .success();
    fixture
        .child("project/target/eo/eo-foreign.json")
        .assert(predicate::path::exists());
}

#[test]
fn test_missing_config_file() {
    let fixture = TestFixture::new();
    fixture
        .command()
        .args(["status", "--config", "nowhere.yaml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Configuration file not found"));
}

#[test]
fn test_unknown_config_key() {
    let fixture = TestFixture::new().with_config(configs::UNKNOWN_KEY);
    fixture
        .command()
        .arg("status")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid eo.yaml"));
}

#[test]
fn test_status() {
    let fixture = TestFixture::new().with_source("app.eo", "[] > app");
    fixture.command().arg("register").assert().success();
    fixture
        .command()
        .args(["--color", "never", "status", "--verbose"])
        .assert()
        .success()
        .stdout(predicate::str::contains("foreign"))
        .stdout(predicate::str::contains("1 object(s)"))
        .stdout(predicate::str::contains("app registered"));
}

#[test]
fn test_deps() {
    let fixture = TestFixture::new().with_config(configs::WITH_DEPENDENCIES);
    fixture
        .command()
        .arg("deps")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "org.eolang:eo-collections:0.1.0 (compile)",
        ))
        .stdout(predicate::str::contains("eo-runtime").not());
}

#[test]
fn test_deps_all() {
    let fixture = TestFixture::new().with_config(configs::WITH_DEPENDENCIES);
    fixture
        .command()
        .args(["deps", "--all"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "org.eolang:eo-runtime:0.29.0 (compile) filtered by not-runtime",
        ))
        .stdout(predicate::str::contains(
            "junit:junit:4.13.2 (test) filtered by not-testing",
        ))
        .stdout(predicate::str::contains(
            "org.example:app:0.9.0 (compile) filtered by not-same",
        ));
}

#[test]
fn test_hash_from_local_table() {
    let fixture = TestFixture::new()
        .with_config(configs::WITH_HASHES)
        .with_file(
            "tags.txt",
            "9b883935257bd59d1ba36240f7e213d4890df7ca 0.28.10\n\
             4b19944d3a2ff4d7bd2b3e1a2ac3ed1a0de64cb6 0.28.11\n",
        );
    fixture
        .command()
        .args(["hash", "0.28.10"])
        .assert()
        .success()
        .stdout("9b88393\n");
    fixture
        .command()
        .args(["hash", "0.0.0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("0.0.0"));
}

#[cfg(unix)]
#[test]
fn test_assemble_and_binarize() {
    let fixture = TestFixture::new()
        .with_config("parser: [cat]\n")
        .with_source("app.eo", programs::EMPTY);
    fixture
        .command()
        .arg("assemble")
        .assert()
        .success()
        .stdout(predicate::str::contains("Assembled 1 object(s)"));
    fixture
        .child("target/eo/03-optimize/app.xmir")
        .assert(predicate::path::exists());
    fixture
        .command()
        .args(["binarize", "--no-build"])
        .assert()
        .success()
        .stdout(predicate::str::contains("0 native insert(s) generated"));
}

#[test]
fn test_assemble_with_missing_parser() {
    let fixture = TestFixture::new()
        .with_config("parser: [eo-build-no-such-parser]\n")
        .with_source("app.eo", "[] > app");
    fixture.command().arg("assemble").assert().failure();
}

#[test]
fn test_log_level_goes_to_stderr() {
    let fixture = TestFixture::new().with_source("app.eo", "[] > app");
    fixture
        .command()
        .args(["--log-level", "debug", "register"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Registered app.eo as 'app'"));
}

#[test]
fn test_completions_bash() {
    let mut cmd = cargo_bin_cmd!("eo-build");
    cmd.args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("_eo__build()"))
        .stdout(predicate::str::contains("complete -F _eo__build"))
        .stdout(predicate::str::contains("assemble"));
}

#[test]
fn test_completions_to_file() {
    let fixture = TestFixture::new();
    fixture
        .command()
        .args(["completions", "zsh", "--output", "_eo-build"])
        .assert()
        .success();
    fixture
        .child("_eo-build")
        .assert(predicate::str::contains("#compdef eo-build"));
}
