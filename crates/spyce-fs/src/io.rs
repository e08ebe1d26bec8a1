//! Whole-file I/O with temp-then-rename writes

use std::fs::{self, OpenOptions, Permissions};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::{Error, Result};

/// Read a whole file as text.
pub fn read_text(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| Error::io(path, e))
}

/// Write content to a file without ever leaving a partial target behind.
///
/// Parent directories are created as needed. The content goes to a hidden
/// sibling temp file first (same directory, so the same filesystem) and is
/// renamed over the target once fully flushed.
pub fn write_atomic(path: &Path, content: &[u8]) -> Result<()> {
    write_file(path, content, None)
}

/// Like [`write_atomic`], then give the new file the permission bits that
/// `mode_source` had before the write. A missing `mode_source` is ignored.
///
/// The bits are captured up front, so `mode_source` may be `path` itself.
pub fn write_preserving_mode(path: &Path, content: &[u8], mode_source: &Path) -> Result<()> {
    let permissions = match fs::metadata(mode_source) {
        Ok(meta) if meta.is_file() => Some(meta.permissions()),
        Ok(_) => None,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
        Err(e) => return Err(Error::io(mode_source, e)),
    };
    write_file(path, content, permissions)
}

fn write_file(path: &Path, content: &[u8], permissions: Option<Permissions>) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
    }

    let temp_path = temp_sibling(path);

    let mut temp_file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(&temp_path)
        .map_err(|e| Error::io(&temp_path, e))?;

    let written = temp_file
        .write_all(content)
        .and_then(|()| temp_file.sync_all())
        .and_then(|()| match permissions {
            Some(permissions) => temp_file.set_permissions(permissions),
            None => Ok(()),
        });
    drop(temp_file);
    if let Err(e) = written {
        let _ = fs::remove_file(&temp_path);
        return Err(Error::io(&temp_path, e));
    }

    if let Err(e) = fs::rename(&temp_path, path) {
        let _ = fs::remove_file(&temp_path);
        return Err(Error::io(path, e));
    }

    tracing::debug!(path = %path.display(), bytes = content.len(), "wrote file");
    Ok(())
}

/// Whether two paths name the same file.
///
/// Existing paths are compared after canonicalization; otherwise the
/// absolute forms are compared lexically.
pub fn is_same_file(a: &Path, b: &Path) -> bool {
    if let (Ok(ca), Ok(cb)) = (dunce::canonicalize(a), dunce::canonicalize(b)) {
        return ca == cb;
    }
    match (std::path::absolute(a), std::path::absolute(b)) {
        (Ok(aa), Ok(ab)) => aa == ab,
        _ => a == b,
    }
}

fn temp_sibling(path: &Path) -> PathBuf {
    let temp_name = format!(
        ".{}.{}.tmp",
        path.file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_default(),
        std::process::id()
    );
    path.with_file_name(temp_name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn write_atomic_creates_parent_directories() {
        let temp = TempDir::new().unwrap();
        let target = temp.path().join("a/b/c.txt");

        write_atomic(&target, b"hello\n").unwrap();

        assert_eq!(fs::read_to_string(&target).unwrap(), "hello\n");
    }

    #[test]
    fn write_atomic_leaves_no_temp_file() {
        let temp = TempDir::new().unwrap();
        let target = temp.path().join("file.py");

        write_atomic(&target, b"one\n").unwrap();
        write_atomic(&target, b"two\n").unwrap();

        let names: Vec<_> = fs::read_dir(temp.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["file.py".to_string()]);
        assert_eq!(fs::read_to_string(&target).unwrap(), "two\n");
    }

    #[test]
    fn read_text_reports_path_on_error() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("missing.py");

        let err = read_text(&missing).unwrap_err();
        assert!(err.to_string().contains("missing.py"));
    }

    #[test]
    fn same_file_through_relative_components() {
        let temp = TempDir::new().unwrap();
        fs::create_dir(temp.path().join("sub")).unwrap();
        let file = temp.path().join("x.py");
        fs::write(&file, "x").unwrap();

        let indirect = temp.path().join("sub/../x.py");
        assert!(is_same_file(&file, &indirect));
        assert!(!is_same_file(&file, &temp.path().join("y.py")));
    }

    #[cfg(unix)]
    #[test]
    fn in_place_write_keeps_mode_bits() {
        use std::os::unix::fs::PermissionsExt;

        let temp = TempDir::new().unwrap();
        let script = temp.path().join("script.py");
        fs::write(&script, "#!/usr/bin/env python3\n").unwrap();
        fs::set_permissions(&script, fs::Permissions::from_mode(0o750)).unwrap();

        write_preserving_mode(&script, b"#!/usr/bin/env python3\nprint()\n", &script).unwrap();

        let mode = fs::metadata(&script).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o750);
    }

    #[cfg(unix)]
    #[test]
    fn mode_is_copied_to_another_target() {
        use std::os::unix::fs::PermissionsExt;

        let temp = TempDir::new().unwrap();
        let source = temp.path().join("tool.py");
        let target = temp.path().join("out/tool.py");
        fs::write(&source, "x\n").unwrap();
        fs::set_permissions(&source, fs::Permissions::from_mode(0o755)).unwrap();

        write_preserving_mode(&target, b"y\n", &source).unwrap();

        let mode = fs::metadata(&target).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o755);
    }

    #[test]
    fn missing_mode_source_is_ignored() {
        let temp = TempDir::new().unwrap();
        let target = temp.path().join("new.py");

        write_preserving_mode(&target, b"z\n", &temp.path().join("absent.py")).unwrap();

        assert_eq!(fs::read_to_string(&target).unwrap(), "z\n");
    }
}
