//! CLI integration tests for compilervars.
//!
//! Every test runs with a scratch HOME and working directory so user
//! configuration and an already activated shell cannot leak in.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use assert_cmd::prelude::*;
use predicates::prelude::*;
use tempfile::TempDir;

/// Get the compilervars binary command, isolated in `dir`.
fn compilervars(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("compilervars").unwrap();
    cmd.current_dir(dir)
        .env("HOME", dir)
        .env_remove("PSTLROOT")
        .env_remove("RUST_LOG");
    cmd
}

/// Create a temporary directory for test projects.
fn temp_dir() -> TempDir {
    TempDir::new().unwrap()
}

/// Write a project config pointing the install root at `root`.
fn write_config(dir: &Path, root: &Path) {
    let config_dir = dir.join(".compilervars");
    fs::create_dir_all(&config_dir).unwrap();
    fs::write(
        config_dir.join("config.toml"),
        format!(
            "[toolchain]\ncompiler = \"intel\"\nbase = \"gcc\"\nversion = \"19.1\"\narch = \"x86_64\"\n\n\
             [activation]\ninstall_root = {:?}\n",
            root.display().to_string()
        ),
    )
    .unwrap();
}

/// Lay out a fake 2019 installation with an activation script under `root`.
fn fake_install(root: &Path) -> PathBuf {
    let dir = root.join("compiler_and_libraries_2019").join("linux");
    let bin = dir.join("bin");
    fs::create_dir_all(&bin).unwrap();
    fs::write(
        bin.join("compilervars.sh"),
        "echo \"Intel(R) environment\"\n\
         export COMPILERVARS_IT_VAR=activated\n\
         export PSTLROOT=/opt/intel/pstl\n\
         export PATH=\"/opt/intel/it/bin:$PATH\"\n",
    )
    .unwrap();
    dir
}

// ============================================================================
// Toolchain not present
// ============================================================================

#[test]
fn test_command_other_family_prints_nothing() {
    let tmp = temp_dir();

    compilervars(tmp.path())
        .args(["--no-color", "command", "--compiler", "gcc"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("note: no activation applies"));
}

#[test]
fn test_command_missing_installation_prints_nothing() {
    let tmp = temp_dir();
    write_config(tmp.path(), &tmp.path().join("intel"));

    compilervars(tmp.path())
        .arg("command")
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
}

#[test]
fn test_diff_json_empty_when_not_installed() {
    let tmp = temp_dir();
    write_config(tmp.path(), &tmp.path().join("intel"));

    compilervars(tmp.path())
        .args(["diff", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::diff("{}\n"));
}

#[test]
fn test_show_not_found() {
    let tmp = temp_dir();
    write_config(tmp.path(), &tmp.path().join("intel"));

    compilervars(tmp.path())
        .arg("show")
        .assert()
        .success()
        .stdout(predicate::str::contains("Compiler:     intel"))
        .stdout(predicate::str::contains("Installation: not found"));
}

// ============================================================================
// Toolchain present
// ============================================================================

#[test]
fn test_command_prints_activation_line() {
    let tmp = temp_dir();
    let root = tmp.path().join("intel");
    fake_install(&root);
    write_config(tmp.path(), &root);

    compilervars(tmp.path())
        .arg("command")
        .assert()
        .success()
        .stdout(predicate::str::starts_with(". "))
        .stdout(predicate::str::contains(
            "compiler_and_libraries_2019/linux/bin/compilervars.sh -arch intel64",
        ));
}

#[test]
fn test_command_arch_override() {
    let tmp = temp_dir();
    let root = tmp.path().join("intel");
    fake_install(&root);
    write_config(tmp.path(), &root);

    compilervars(tmp.path())
        .args(["command", "--arch", "x86"])
        .assert()
        .success()
        .stdout(predicate::str::contains("-arch ia32"));
}

#[test]
fn test_command_when_already_active() {
    let tmp = temp_dir();
    let root = tmp.path().join("intel");
    fake_install(&root);
    write_config(tmp.path(), &root);

    compilervars(tmp.path())
        .arg("command")
        .env("PSTLROOT", "/opt/intel/pstl")
        .assert()
        .success()
        .stdout(predicate::str::contains("environment already set"));
}

#[test]
#[cfg(not(windows))]
fn test_visual_studio_without_store_prints_nothing() {
    let tmp = temp_dir();

    compilervars(tmp.path())
        .args([
            "command",
            "--compiler",
            "intel",
            "--base",
            "Visual Studio",
            "--base-version",
            "99",
            "--force",
        ])
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
}

#[test]
#[cfg(target_os = "linux")]
fn test_diff_captures_script_changes() {
    let tmp = temp_dir();
    let root = tmp.path().join("intel");
    fake_install(&root);
    write_config(tmp.path(), &root);

    compilervars(tmp.path())
        .arg("diff")
        .assert()
        .success()
        .stdout(predicate::str::contains("COMPILERVARS_IT_VAR=activated"))
        .stdout(predicate::str::contains("PSTLROOT=/opt/intel/pstl"))
        .stdout(predicate::str::contains("PATH+=/opt/intel/it/bin"))
        .stdout(predicate::str::contains("Intel(R) environment").not());
}

#[test]
#[cfg(target_os = "linux")]
fn test_diff_json() {
    let tmp = temp_dir();
    let root = tmp.path().join("intel");
    fake_install(&root);
    write_config(tmp.path(), &root);

    let output = compilervars(tmp.path())
        .args(["diff", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["COMPILERVARS_IT_VAR"], "activated");
    assert_eq!(json["PATH"], serde_json::json!(["/opt/intel/it/bin"]));
}

#[test]
#[cfg(target_os = "linux")]
fn test_run_sees_activated_environment() {
    let tmp = temp_dir();
    let root = tmp.path().join("intel");
    fake_install(&root);
    write_config(tmp.path(), &root);

    compilervars(tmp.path())
        .args(["run", "--", "sh", "-c", "printf '%s' \"$COMPILERVARS_IT_VAR\""])
        .assert()
        .success()
        .stdout(predicate::str::diff("activated"));
}

#[test]
#[cfg(unix)]
fn test_run_propagates_exit_code() {
    let tmp = temp_dir();

    compilervars(tmp.path())
        .args(["run", "--", "sh", "-c", "exit 7"])
        .assert()
        .code(7);
}

#[test]
#[cfg(target_os = "linux")]
fn test_failing_script_reports_diagnostic() {
    let tmp = temp_dir();
    let root = tmp.path().join("intel");
    let dir = fake_install(&root);
    fs::write(
        dir.join("bin").join("compilervars.sh"),
        "echo 'bad architecture' >&2\nfalse\n",
    )
    .unwrap();
    write_config(tmp.path(), &root);

    compilervars(tmp.path())
        .args(["--no-color", "diff"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("error: activation failed"))
        .stderr(predicate::str::contains("bad architecture"));
}
