use assert_cmd::Command;
use predicates::prelude::*;
use std::path::PathBuf;

fn catalog() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("demos/catalog.json")
}

fn builder(home: &std::path::Path) -> Command {
    let mut cmd = Command::cargo_bin("exchange-builder").unwrap();
    cmd.env("EXCHANGE_HOME", home)
        .env("NO_COLOR", "1")
        .env_remove("EXCHANGE_LOG")
        .env_remove("RUST_LOG");
    cmd
}

fn session(home: &std::path::Path) -> Command {
    let mut cmd = builder(home);
    cmd.arg("session").arg("--catalog").arg(catalog());
    cmd
}

#[test]
fn test_submit_flow_persists_application() {
    let temp_dir = tempfile::tempdir().unwrap();

    session(temp_dir.path())
        .write_stdin("add lund\nadd tokyo\nsubmit\nconfirm\nquit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Added Lund University as choice 1"))
        .stdout(predicate::str::contains("Added University of Tokyo as choice 2"))
        .stdout(predicate::str::contains("Submit 2 of 5 choices?"))
        .stdout(predicate::str::contains("Application submitted (revision 1)"));

    assert!(temp_dir.path().join("application.json").exists());

    builder(temp_dir.path())
        .arg("show")
        .assert()
        .success()
        .stdout(predicate::str::contains("rev 1"))
        .stdout(predicate::str::contains("1. Lund University"))
        .stdout(predicate::str::contains("2. University of Tokyo"));
}

#[test]
fn test_empty_submit_is_rejected() {
    let temp_dir = tempfile::tempdir().unwrap();

    session(temp_dir.path())
        .write_stdin("submit\nconfirm\nurl\n")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Select at least one university before submitting",
        ))
        .stdout(predicate::str::contains("Nothing to confirm, submit first"))
        .stdout(predicate::str::contains("confirm: closed"));

    assert!(!temp_dir.path().join("application.json").exists());
}

#[test]
fn test_back_closes_search_dialog() {
    let temp_dir = tempfile::tempdir().unwrap();

    session(temp_dir.path())
        .write_stdin("open\nurl\nback\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("url: /application/edit?modal=search"))
        .stdout(predicate::str::contains("search: open (pushed)"))
        .stdout(predicate::str::contains("search: closed"))
        .stdout(predicate::str::contains("url: /application/edit\n"));
}

#[test]
fn test_search_pick_toggles_row() {
    let temp_dir = tempfile::tempdir().unwrap();

    session(temp_dir.path())
        .write_stdin("search kyoto\npick 1\npick 1\npick 9\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Search universities: \"kyoto\""))
        .stdout(predicate::str::contains("Added Kyoto University as choice 1"))
        .stdout(predicate::str::contains("Removed Kyoto University (was choice 1)"))
        .stdout(predicate::str::contains("No row 9 in the last listing"));
}

#[test]
fn test_deep_link_opens_search() {
    let temp_dir = tempfile::tempdir().unwrap();

    session(temp_dir.path())
        .arg("--at")
        .arg("/application/edit?modal=search")
        .write_stdin("url\nclose\nurl\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Seoul National University"))
        .stdout(predicate::str::contains("search: open (from url)"))
        .stdout(predicate::str::contains("search: closed"));
}

#[test]
fn test_edit_without_application_fails() {
    let temp_dir = tempfile::tempdir().unwrap();

    session(temp_dir.path())
        .arg("--edit")
        .write_stdin("quit\n")
        .assert()
        .failure()
        .stderr(predicate::str::contains("No submitted application to edit"));
}

#[test]
fn test_edit_resubmits_new_revision() {
    let temp_dir = tempfile::tempdir().unwrap();

    session(temp_dir.path())
        .write_stdin("add eth\nadd vienna\nsubmit\nconfirm\n")
        .assert()
        .success();

    session(temp_dir.path())
        .arg("--edit")
        .write_stdin("order 2 1\nsubmit\nconfirm\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Application submitted (revision 2)"));

    builder(temp_dir.path())
        .arg("show")
        .assert()
        .success()
        .stdout(predicate::str::contains("1. University of Vienna"))
        .stdout(predicate::str::contains("2. ETH Zurich"));
}

#[test]
fn test_unknown_session_command_is_reported() {
    let temp_dir = tempfile::tempdir().unwrap();

    session(temp_dir.path())
        .write_stdin("launch\nadd oxford\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Unknown command: launch"))
        .stdout(predicate::str::contains("No university matches \"oxford\""));
}

#[test]
fn test_config_get_and_set() {
    let temp_dir = tempfile::tempdir().unwrap();

    builder(temp_dir.path())
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("modal-param = modal"))
        .stdout(predicate::str::contains("base-path = /application/edit"));

    builder(temp_dir.path())
        .args(["config", "modal-param", "overlay"])
        .assert()
        .success()
        .stdout(predicate::str::contains("modal-param = overlay"));

    builder(temp_dir.path())
        .args(["config", "confirm-key", "search"])
        .assert()
        .success()
        .stdout(predicate::str::contains("must differ"));

    session(temp_dir.path())
        .write_stdin("open\nurl\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("url: /application/edit?overlay=search"));
}

#[test]
fn test_show_without_application() {
    let temp_dir = tempfile::tempdir().unwrap();

    builder(temp_dir.path())
        .arg("show")
        .assert()
        .success()
        .stdout(predicate::str::contains("No application submitted yet."));
}
