//! End-to-end tests that run the compiled `spyce` binary with assert_cmd.

use assert_cmd::Command;
use predicates::prelude::*;
use spyce_test_utils::{SCRIPT, TestProject};

fn spyce(project: &TestProject) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("spyce"));
    cmd.current_dir(project.root())
        .env_remove("RUST_LOG")
        .arg("--color")
        .arg("never");
    cmd
}

fn project() -> TestProject {
    let project = TestProject::new();
    project.write("tool.py", SCRIPT);
    project.write_bytes("img/logo.png", &[0x89, b'P', b'N', b'G', 0, 1, 2]);
    project.write("lib/helpers.py", "def helper():\n    return 42\n");
    project
}

#[test]
fn help_lists_commands() {
    let project = TestProject::new();
    spyce(&project)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("extract").and(predicate::str::contains("apply")));
}

#[test]
fn add_list_show_del_round_trip() {
    let project = project();

    spyce(&project)
        .args(["add", "tool.py", "-f", "img/logo.png"])
        .assert()
        .success()
        .stdout(predicate::str::contains("added logo.png"));
    spyce(&project)
        .args(["add", "tool.py", "-s", "lib/helpers.py", "-n", "helpers"])
        .assert()
        .success();

    spyce(&project)
        .args(["list", "tool.py"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("name")
                .and(predicate::str::is_match(r"helpers\s+text").unwrap())
                .and(predicate::str::is_match(r"logo\.png\s+bytes").unwrap()),
        );
    spyce(&project)
        .args(["list", "tool.py", "-H", "-f", ":bytes"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("logo.png").and(predicate::str::contains("helpers").not()));

    spyce(&project)
        .args(["show", "tool.py", "helpers"])
        .assert()
        .success()
        .stdout("def helper():\n    return 42\n");

    spyce(&project)
        .args(["del", "tool.py", "-f", "~helpers"])
        .assert()
        .success()
        .stdout(predicate::str::contains("removed logo.png"));
    spyce(&project)
        .args(["list", "tool.py", "-H"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("helpers"));
}

#[test]
fn add_to_output_leaves_input_alone() {
    let project = project();
    spyce(&project)
        .args(["set", "tool.py", "out/tool.py", "-i", "hello", "-n", "greeting"])
        .assert()
        .success();

    assert_eq!(project.read("tool.py"), SCRIPT);
    project.assert_file_contains("out/tool.py", "# spyce: start greeting:text\n");
}

#[test]
fn backup_is_made_on_request() {
    let project = project();
    spyce(&project)
        .args(["add", "tool.py", "-a", "-b"])
        .assert()
        .success()
        .stdout(predicate::str::contains("backup"));

    let backups: Vec<_> = project
        .list("")
        .into_iter()
        .filter(|name| name.starts_with("tool.py.bck."))
        .collect();
    assert_eq!(backups.len(), 1);
    assert_eq!(project.read(&backups[0]), SCRIPT);
    project.assert_file_contains("tool.py", "def get_spyce(name, file=None):");
}

#[test]
fn extract_writes_the_payload() {
    let project = project();
    spyce(&project)
        .args(["add", "tool.py", "-f", "img/logo.png", "-n", "logo", "-z", "--base85"])
        .assert()
        .success();
    spyce(&project)
        .args(["extract", "tool.py", "logo", "-o", "out/logo.png"])
        .assert()
        .success();

    let extracted = std::fs::read(project.path("out/logo.png")).unwrap();
    assert_eq!(extracted, vec![0x89, b'P', b'N', b'G', 0, 1, 2]);
}

#[test]
fn dir_spyce_untars() {
    let project = project();
    spyce(&project)
        .args(["add", "tool.py", "-d", "lib", "-n", "lib"])
        .assert()
        .success();
    spyce(&project)
        .args(["extract", "tool.py", "lib", "--untar", "unpacked"])
        .assert()
        .success();
    project.assert_file_contains("unpacked/lib/helpers.py", "return 42");
}

#[test]
fn errors_exit_nonzero_with_message() {
    let project = project();
    spyce(&project)
        .args(["show", "tool.py", "nope"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("error: Spyce not found: nope"));

    spyce(&project)
        .args(["--trace", "show", "missing.py", "x"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("caused by:"));

    spyce(&project)
        .args(["del", "tool.py"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("at least one"));
}

#[test]
fn wok_status_apply_diff() {
    let project = project();
    project.write_wok("tool.py:\n  spyces:\n    logo:\n      path: img/logo.png\n");

    spyce(&project)
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("missing"));

    spyce(&project)
        .arg("diff")
        .assert()
        .success()
        .stdout(predicate::str::contains("+# spyce: start logo:bytes"));

    spyce(&project)
        .arg("apply")
        .assert()
        .success()
        .stdout(predicate::str::contains("added logo"));

    spyce(&project)
        .args(["status", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"state\": \"up-to-date\""));

    spyce(&project).arg("diff").assert().success().stdout("");
}

#[test]
fn wok_not_found() {
    let project = TestProject::new();
    spyce(&project)
        .arg("status")
        .assert()
        .failure()
        .stderr(predicate::str::contains("No .wok-project.yaml found"));
}
