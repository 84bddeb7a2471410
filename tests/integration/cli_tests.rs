//! CLI integration tests
//!
//! These tests verify that the CLI works correctly with various options.

use appscope::config::PATH_SEPARATOR;
use assert_cmd::Command;
use fixtures::{build_dex, write_apk, write_platforms};
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

mod fixtures;

/// Command for the appscope binary, run inside `dir` so no stray settings
/// file is picked up
fn appscope(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("appscope").expect("binary should build");
    cmd.current_dir(dir).env("NO_COLOR", "1");
    cmd
}

fn list(items: &[&str]) -> String {
    items.join(&PATH_SEPARATOR.to_string())
}

// ============================================================================
// Basic CLI Tests
// ============================================================================

#[test]
fn test_cli_help() {
    let dir = TempDir::new().unwrap();
    appscope(dir.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--application-regex"))
        .stdout(predicate::str::contains("--android-platform-directory"))
        .stdout(predicate::str::contains("--java-runtime-directory"));
}

#[test]
fn test_cli_version() {
    let dir = TempDir::new().unwrap();
    appscope(dir.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("appscope"));
}

// ============================================================================
// Configuration errors print usage and exit 0
// ============================================================================

#[test]
fn test_cli_missing_required_options() {
    let dir = TempDir::new().unwrap();
    appscope(dir.path())
        .assert()
        .success()
        .stderr(predicate::str::contains("missing option r"))
        .stdout(predicate::str::contains("Usage"));
}

#[test]
fn test_cli_unknown_flag_prints_usage() {
    let dir = TempDir::new().unwrap();
    appscope(dir.path())
        .arg("--no-such-flag")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage"));
}

#[test]
fn test_cli_java_mode_requires_main_class() {
    let dir = TempDir::new().unwrap();
    appscope(dir.path())
        .args(["-r", "com.app.**", "-a", "app.jar", "-o", "out", "-j", "/jre"])
        .assert()
        .success()
        .stderr(predicate::str::contains("missing runtime directory and/or main class"))
        .stdout(predicate::str::contains("Usage"));
}

#[test]
fn test_cli_rejects_multiple_apks() {
    let dir = TempDir::new().unwrap();
    appscope(dir.path())
        .args(["-r", "com.app.*", "-o", "out", "-p", "platforms"])
        .args(["-a", list(&["app.apk", "app2.apk"]).as_str()])
        .assert()
        .success()
        .stderr(predicate::str::contains("multiple application archives in Android mode"));
}

#[test]
fn test_cli_android_requires_platform_directory() {
    let dir = TempDir::new().unwrap();
    appscope(dir.path())
        .args(["-r", "com.app.*", "-a", "app.apk", "-o", "out"])
        .assert()
        .success()
        .stderr(predicate::str::contains("missing platform directory"));
}

// ============================================================================
// Successful runs
// ============================================================================

#[test]
fn test_cli_java_run() {
    let dir = TempDir::new().unwrap();
    appscope(dir.path())
        .args(["-r", list(&["com.app.**", "Launcher"]).as_str()])
        .args(["-a", list(&["app.jar", "util.jar"]).as_str()])
        .args(["-l", "guava.jar", "-o", "out", "-j", "/jre", "-m", "com.app.Main"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Mode: java"))
        .stdout(predicate::str::contains("1 classes, 0 packages, 1 super-packages"))
        .stdout(predicate::str::contains("lib guava.jar"))
        .stdout(predicate::str::contains("Main class: com.app.Main (application)"));
}

#[test]
fn test_cli_dynamic_classes() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("dynamic.txt"),
        "com.app.PluginA\ncom.app.PluginB\norg.json.JSONObject\n",
    )
    .unwrap();

    appscope(dir.path())
        .args(["-r", "com.app.*", "-a", "app.jar", "-o", "out", "-j", "/jre", "-m", "com.app.Main"])
        .args(["-d", "dynamic.txt"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Dynamic classes: 3 (2 application, 1 library)"));
}

#[test]
fn test_cli_missing_dynamic_classes_file_fails() {
    let dir = TempDir::new().unwrap();
    appscope(dir.path())
        .args(["-r", "com.app.*", "-a", "app.jar", "-o", "out", "-j", "/jre", "-m", "com.app.Main"])
        .args(["-d", "missing.txt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("missing.txt"));
}

#[test]
fn test_cli_settings_file() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("appscope.yml"),
        "application-regex:\n  - com.app.**\napplication-jars:\n  - app.jar\njava-runtime-directory: /jre\nmain-class: org.other.Main\n",
    )
    .unwrap();

    // settings file is found in the working directory, CLI fills in the rest
    appscope(dir.path())
        .args(["-o", "out"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Mode: java"))
        .stdout(predicate::str::contains("Main class: org.other.Main (library)"));
}

#[test]
fn test_cli_android_without_installed_platform_fails() {
    let dir = TempDir::new().unwrap();
    fs::create_dir_all(dir.path().join("platforms")).unwrap();

    appscope(dir.path())
        .args(["-r", "com.app.*", "-a", "app.apk", "-o", "out", "-p", "platforms"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Android API version"));
}

#[test]
fn test_cli_android_census() {
    let dir = TempDir::new().unwrap();
    write_platforms(&dir.path().join("platforms"), &[28, 33]);
    write_apk(
        &dir.path().join("app.apk"),
        &[
            ("AndroidManifest.xml", b"<manifest/>".to_vec()),
            (
                "classes.dex",
                build_dex(&["Lcom/app/A;", "Lcom/app/B;", "Landroid/app/Activity;"]),
            ),
        ],
    );

    appscope(dir.path())
        .args(["-r", "com.app.*", "-a", "app.apk", "-o", "out", "-p", "platforms"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Mode: android"))
        .stdout(predicate::str::contains("Android API level: 33"))
        .stdout(predicate::str::contains("Application references: 2 classes, 2 methods"));
}

#[test]
fn test_cli_android_corrupt_dex_fails() {
    let dir = TempDir::new().unwrap();
    write_platforms(&dir.path().join("platforms"), &[30]);

    let mut dex = build_dex(&["Lcom/app/A;"]);
    dex[0x60..0x64].copy_from_slice(&u32::MAX.to_le_bytes());
    write_apk(&dir.path().join("app.apk"), &[("classes.dex", dex)]);

    appscope(dir.path())
        .args(["-r", "com.app.*", "-a", "app.apk", "-o", "out", "-p", "platforms"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to index"));
}
