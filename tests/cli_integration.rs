use assert_cmd::Command;
use predicates::prelude::PredicateBooleanExt;
use predicates::prelude::*;
use std::fs;
use std::path::Path;

/// A `rowz` command running inside `dir`, with its config kept there too.
fn rowz(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("rowz").unwrap();
    cmd.current_dir(dir)
        .env("ROWZ_CONFIG_DIR", dir.join("config"))
        .env_remove("RUST_LOG")
        .arg("--no-color");
    cmd
}

fn seed_people(dir: &Path) {
    fs::write(
        dir.join("people.csv"),
        "id,name\n1,Ana\n2,Bea\n3,\"Cruz, Carla\"\n",
    )
    .unwrap();
}

#[test]
fn test_new_add_and_list() {
    let temp_dir = tempfile::tempdir().unwrap();

    rowz(temp_dir.path())
        .args(["new", "people", "id", "name"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created people.csv with fields: id, name"));

    rowz(temp_dir.path())
        .args(["add", "people.csv", "id=1", "name=Ana Maria"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Record added to people.csv"));

    let content = fs::read_to_string(temp_dir.path().join("people.csv")).unwrap();
    assert_eq!(content, "id,name\n1,Ana Maria\n");

    rowz(temp_dir.path())
        .args(["list", "people.csv"])
        .assert()
        .success()
        .stdout(predicate::str::contains("#  id  name"))
        .stdout(predicate::str::contains("1  1   Ana Maria"))
        .stdout(predicate::str::contains("1 record"));
}

#[test]
fn test_new_refuses_existing_file_without_force() {
    let temp_dir = tempfile::tempdir().unwrap();
    seed_people(temp_dir.path());

    rowz(temp_dir.path())
        .args(["new", "people.csv", "a,b"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("already exists"));

    rowz(temp_dir.path())
        .args(["new", "people.csv", "a,b", "--force"])
        .assert()
        .success();
    let content = fs::read_to_string(temp_dir.path().join("people.csv")).unwrap();
    assert_eq!(content, "a,b\n");
}

#[test]
fn test_add_with_wrong_fields_fails() {
    let temp_dir = tempfile::tempdir().unwrap();
    seed_people(temp_dir.path());
    let before = fs::read(temp_dir.path().join("people.csv")).unwrap();

    rowz(temp_dir.path())
        .args(["add", "people.csv", "id=4", "age=30"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("unknown field 'age'"));

    let after = fs::read(temp_dir.path().join("people.csv")).unwrap();
    assert_eq!(before, after);
}

#[test]
fn test_delete_by_number_and_range() {
    let temp_dir = tempfile::tempdir().unwrap();
    seed_people(temp_dir.path());

    rowz(temp_dir.path())
        .args(["delete", "people.csv", "1-2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Deleted 2 records from people.csv"));

    let content = fs::read_to_string(temp_dir.path().join("people.csv")).unwrap();
    assert_eq!(content, "id,name\n3,\"Cruz, Carla\"\n");
}

#[test]
fn test_delete_out_of_range_leaves_file_alone() {
    let temp_dir = tempfile::tempdir().unwrap();
    seed_people(temp_dir.path());
    let before = fs::read(temp_dir.path().join("people.csv")).unwrap();

    rowz(temp_dir.path())
        .args(["delete", "people.csv", "9"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No records deleted"));

    let after = fs::read(temp_dir.path().join("people.csv")).unwrap();
    assert_eq!(before, after);
}

#[test]
fn test_modify_with_yes() {
    let temp_dir = tempfile::tempdir().unwrap();
    seed_people(temp_dir.path());

    rowz(temp_dir.path())
        .args(["modify", "people.csv", "2", "name", "Beatriz", "--yes"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Record 2 updated: name = 'Bea' -> 'Beatriz'",
        ));

    let content = fs::read_to_string(temp_dir.path().join("people.csv")).unwrap();
    assert!(content.contains("2,Beatriz\n"));
}

#[test]
fn test_modify_declined_changes_nothing() {
    let temp_dir = tempfile::tempdir().unwrap();
    seed_people(temp_dir.path());
    let before = fs::read(temp_dir.path().join("people.csv")).unwrap();

    rowz(temp_dir.path())
        .args(["modify", "people.csv", "1", "name", "Zoe"])
        .write_stdin("n\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Change: name = 'Ana' -> 'Zoe'?"))
        .stdout(predicate::str::contains("Cancelled"));

    let after = fs::read(temp_dir.path().join("people.csv")).unwrap();
    assert_eq!(before, after);
}

#[test]
fn test_modify_unknown_field_fails() {
    let temp_dir = tempfile::tempdir().unwrap();
    seed_people(temp_dir.path());

    rowz(temp_dir.path())
        .args(["modify", "people.csv", "1", "age", "30", "--yes"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("'age' is not a field of this file"));
}

#[test]
fn test_modify_missing_file_fails() {
    let temp_dir = tempfile::tempdir().unwrap();

    rowz(temp_dir.path())
        .args(["modify", "missing.csv", "1", "name", "x", "--yes"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("File not found: missing.csv"));

    assert!(!temp_dir.path().join("missing.csv").exists());
}

#[test]
fn test_list_missing_file_warns() {
    let temp_dir = tempfile::tempdir().unwrap();

    rowz(temp_dir.path())
        .args(["list", "nope.csv"])
        .assert()
        .success()
        .stdout(predicate::str::contains("File not found: nope.csv"));
}

#[test]
fn test_list_json() {
    let temp_dir = tempfile::tempdir().unwrap();
    seed_people(temp_dir.path());

    let output = rowz(temp_dir.path())
        .args(["list", "people.csv", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let parsed: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(parsed.as_array().unwrap().len(), 3);
    assert_eq!(parsed[2]["name"], "Cruz, Carla");
}

#[test]
fn test_delimiter_flag_and_config() {
    let temp_dir = tempfile::tempdir().unwrap();
    fs::write(temp_dir.path().join("people.csv"), "id;name\n1;Ana\n").unwrap();

    rowz(temp_dir.path())
        .args(["-d", ";", "add", "people.csv", "id=2", "name=Bea"])
        .assert()
        .success();
    let content = fs::read_to_string(temp_dir.path().join("people.csv")).unwrap();
    assert_eq!(content, "id;name\n1;Ana\n2;Bea\n");

    rowz(temp_dir.path())
        .args(["config", "delimiter", "semicolon"])
        .assert()
        .success()
        .stdout(predicate::str::contains("delimiter set to ;"));

    rowz(temp_dir.path())
        .args(["list", "people.csv"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2 records"));

    rowz(temp_dir.path())
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("delimiter"))
        .stdout(predicate::str::contains("atomic-writes"));
}

#[test]
fn test_files_and_info() {
    let temp_dir = tempfile::tempdir().unwrap();
    seed_people(temp_dir.path());
    fs::write(temp_dir.path().join("notes.txt"), "not data").unwrap();

    rowz(temp_dir.path())
        .arg("files")
        .assert()
        .success()
        .stdout(predicate::str::contains("people.csv"))
        .stdout(predicate::str::contains("notes.txt").not());

    rowz(temp_dir.path())
        .args(["info", "people.csv"])
        .assert()
        .success()
        .stdout(predicate::str::contains("fields"))
        .stdout(predicate::str::contains("id, name"))
        .stdout(predicate::str::contains("records   3"));
}

#[test]
fn test_info_missing_file_fails() {
    let temp_dir = tempfile::tempdir().unwrap();

    rowz(temp_dir.path())
        .args(["info", "nope.csv"])
        .assert()
        .failure();
}

#[test]
fn test_shell_session() {
    let temp_dir = tempfile::tempdir().unwrap();
    seed_people(temp_dir.path());

    rowz(temp_dir.path())
        .args(["shell", "people.csv"])
        .write_stdin("add\n4\nDan\ndelete 1\ny\nmodify 1 name Bianca\ny\nquit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("rowz:people.csv> "))
        .stdout(predicate::str::contains("Deleted 1 record from people.csv"));

    let content = fs::read_to_string(temp_dir.path().join("people.csv")).unwrap();
    assert_eq!(content, "id,name\n2,Bianca\n3,\"Cruz, Carla\"\n4,Dan\n");
}

#[test]
fn test_shell_open_unreadable_file_has_no_create_hint() {
    let temp_dir = tempfile::tempdir().unwrap();
    fs::write(temp_dir.path().join("ragged.csv"), "a,b\n1,2\n3\n").unwrap();

    rowz(temp_dir.path())
        .args(["shell", "ragged.csv"])
        .write_stdin("quit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Could not read ragged.csv"))
        .stdout(predicate::str::contains("Create it with").not());
}

#[test]
fn test_grouped_help() {
    let temp_dir = tempfile::tempdir().unwrap();

    rowz(temp_dir.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Record Commands:"))
        .stdout(predicate::str::contains("shell"));
}
