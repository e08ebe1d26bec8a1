use assert_fs::prelude::*;
use predicates::prelude::*;
use pretty_assertions::assert_eq;
use rstest::rstest;
use spyce_fs::{BackupFormat, Timestamp, is_same_file, read_text, write_atomic, write_preserving_mode};

#[test]
fn write_then_backup_keeps_both_versions() {
    let temp = assert_fs::TempDir::new().unwrap();
    let file = temp.child("bin/tool.py");
    file.write_str("v1\n").unwrap();

    let backup = BackupFormat::default()
        .backup(file.path(), Timestamp::now())
        .unwrap();
    write_atomic(file.path(), b"v2\n").unwrap();

    file.assert("v2\n");
    assert!(predicate::path::exists().eval(&backup));
    assert_eq!(std::fs::read_to_string(backup).unwrap(), "v1\n");
}

#[test]
fn write_atomic_replaces_existing_content() {
    let temp = assert_fs::TempDir::new().unwrap();
    let file = temp.child("data.txt");
    file.write_str("a much longer original content\n").unwrap();

    write_atomic(file.path(), b"short\n").unwrap();

    file.assert(predicate::str::diff("short\n"));
}

#[test]
fn rewrite_to_new_path_reads_back_and_keeps_source_mode() {
    let temp = assert_fs::TempDir::new().unwrap();
    let source = temp.child("tool.py");
    source.write_str("#!/bin/sh\n").unwrap();
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(source.path(), std::fs::Permissions::from_mode(0o750)).unwrap();
    }

    let target = temp.child("dist/tool.py");
    write_preserving_mode(target.path(), "#!/bin/sh\necho héllo\n".as_bytes(), source.path())
        .unwrap();

    assert_eq!(read_text(target.path()).unwrap(), "#!/bin/sh\necho héllo\n");
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mode = std::fs::metadata(target.path()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o750);
    }
}

#[rstest]
#[case("{path}.bck.{timestamp}", true)]
#[case("backups/{timestamp}", true)]
#[case("{path}.orig", true)]
#[case("{path}.{pid}", false)]
#[case("", false)]
fn backup_format_validation(#[case] template: &str, #[case] valid: bool) {
    assert_eq!(BackupFormat::new(template).is_ok(), valid);
}

#[test]
fn missing_files_compare_lexically() {
    let temp = assert_fs::TempDir::new().unwrap();
    let a = temp.child("nope.py");
    assert!(is_same_file(a.path(), &temp.path().join("./nope.py")));
}
