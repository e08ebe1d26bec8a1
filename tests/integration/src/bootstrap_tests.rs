//! The embedded `get_spyce()` reader decodes what the engine wrote
//!
//! Runs the host script with `python3`; skipped when no interpreter is found.

use std::process::Command;

use pretty_assertions::assert_eq;
use spyce_core::{Compression, Encoding, Position, RefactorOptions, Spyce, SpycyFile};
use spyce_flavor::{ApiFlavor, Flavor, FlavorOptions};
use spyce_test_utils::TestProject;

const HOST: &str = "\
#!/usr/bin/env python3
import sys

which = sys.argv[1]
data = get_spyce(which)
if isinstance(data, str):
    data = data.encode('utf-8')
sys.stdout.buffer.write(data)
";

fn python() -> Option<&'static str> {
    let found = Command::new("python3")
        .arg("--version")
        .output()
        .is_ok_and(|out| out.status.success());
    found.then_some("python3")
}

fn payload() -> Vec<u8> {
    (0u8..=255).cycle().take(3000).collect()
}

#[test]
fn python_reader_decodes_every_codec() {
    let Some(python) = python() else {
        eprintln!("python3 not found; skipping");
        return;
    };

    let project = TestProject::new();
    let path = project.write("host.py", HOST);
    let api = ApiFlavor::new(FlavorOptions::default()).unwrap();

    let mut file = SpycyFile::open(&path).unwrap();
    file.refactor(&RefactorOptions::default(), |file| {
        file.set(api.spyce().unwrap(), Position::Auto)?;
        file.set(Spyce::new("plain", payload()), Position::Auto)?;
        file.set(
            Spyce::new("packed", payload())
                .with_encoding(Encoding::Base85)
                .with_compression(Compression::Gzip),
            Position::Auto,
        )?;
        file.set(Spyce::new("greeting", "# héllo\n# world\n"), Position::Auto)?;
        Ok::<_, spyce_core::Error>(())
    })
    .unwrap();

    let run = |name: &str| {
        let out = Command::new(python).arg(&path).arg(name).output().unwrap();
        assert!(
            out.status.success(),
            "{name}: {}",
            String::from_utf8_lossy(&out.stderr)
        );
        out.stdout
    };

    assert_eq!(run("plain"), payload());
    assert_eq!(run("packed"), payload());
    assert_eq!(run("greeting"), "# héllo\n# world\n".as_bytes());
}
