use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn test_help_lists_commands() {
    Command::cargo_bin("modup")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("update"))
        .stdout(predicate::str::contains("list"))
        .stdout(predicate::str::contains("add"))
        .stdout(predicate::str::contains("sort"));
}

#[test]
fn test_version_flag() {
    Command::cargo_bin("modup")
        .unwrap()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("modup "));
}

#[test]
fn test_invalid_list_format_is_rejected() {
    Command::cargo_bin("modup")
        .unwrap()
        .args(["list", "--format", "yaml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid value 'yaml'"));
}

#[test]
fn test_verbose_and_quiet_conflict() {
    Command::cargo_bin("modup")
        .unwrap()
        .args(["--verbose", "--quiet", "sort"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot be used with"));
}
