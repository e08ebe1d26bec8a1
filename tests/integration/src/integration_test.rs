//! End-to-end integration tests across the workspace crates
//!
//! Flavors produce spyces, the document model stores them, scoped edits write
//! them back, and the wok drives the whole thing from YAML.

use pretty_assertions::assert_eq;
use spyce_core::{
    CodecOptions, EditKind, FileOptions, MarkerSyntax, Payload, PayloadType, Pattern, Position,
    RefactorOptions, Spyce, SpycyFile,
};
use spyce_flavor::{DirFlavor, FileFlavor, Flavor, FlavorOptions, SourceFlavor};
use spyce_test_utils::{SCRIPT, TestProject};
use spyce_wok::{SpyceState, load_wok};

fn assets(project: &TestProject) {
    project.write("tool.py", SCRIPT);
    project.write_bytes("img/logo.png", &(0u8..=255).collect::<Vec<_>>());
    project.write("lib/helpers.py", "def helper():\n    return 42\n");
    project.write("lib/data/table.csv", "a,b\n1,2\n");
}

#[test]
fn lifecycle_restores_the_original_file() {
    let project = TestProject::new();
    assets(&project);
    let path = project.path("tool.py");

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    }

    let flavors: Vec<Box<dyn Flavor>> = vec![
        Box::new(FileFlavor::new(project.path("img/logo.png"), FlavorOptions::default()).unwrap()),
        Box::new(
            SourceFlavor::new(project.path("lib/helpers.py"), FlavorOptions::named("helpers"))
                .unwrap(),
        ),
        Box::new(DirFlavor::new(project.path("lib"), FlavorOptions::default()).unwrap()),
    ];

    let mut file = SpycyFile::open(&path).unwrap();
    let done = file
        .refactor(&RefactorOptions::default(), |file| {
            flavors
                .iter()
                .map(|flavor| file.set(flavor.spyce().unwrap(), Position::Auto))
                .collect::<spyce_core::Result<Vec<_>>>()
        })
        .unwrap();
    assert!(done.value.iter().all(|edit| edit.kind == EditKind::Insert));
    assert_eq!(done.written.as_deref(), Some(path.as_path()));
    assert!(!file.is_modified());

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o755);
    }

    let reopened = SpycyFile::open(&path).unwrap();
    assert_eq!(reopened.names(), vec!["helpers", "logo.png", "lib"]);
    assert_eq!(
        reopened.content("logo.png").unwrap().as_bytes(),
        (0u8..=255).collect::<Vec<_>>().as_slice()
    );
    let bytes_only = reopened.filter(&[Pattern::parse(":bytes").unwrap()]);
    assert_eq!(bytes_only, vec!["logo.png", "lib"]);
    let from_dir = reopened.filter(&[Pattern::flavor("dir").unwrap()]);
    assert_eq!(from_dir, vec!["lib"]);

    let mut file = reopened;
    file.refactor(&RefactorOptions::default(), |file| {
        for name in ["helpers", "logo.png", "lib"] {
            file.delete(name, false)?;
        }
        Ok::<_, spyce_core::Error>(())
    })
    .unwrap();
    assert_eq!(project.read("tool.py"), SCRIPT);
}

#[test]
fn content_only_delete_keeps_markers() {
    let project = TestProject::new();
    assets(&project);

    let mut file = SpycyFile::open(project.path("tool.py")).unwrap();
    file.set(Spyce::new("note", "one\ntwo"), Position::End).unwrap();
    file.set(Spyce::new("tail", vec![1u8, 2, 3]), Position::End).unwrap();

    let edit = file.delete("note", true).unwrap();
    assert_eq!(edit.kind, EditKind::Delete);
    assert_eq!(edit.delta, -2);
    assert_eq!(file.content("note").unwrap(), &Payload::Text(String::new()));
    assert_eq!(file.content("tail").unwrap().as_bytes(), &[1, 2, 3]);

    let reparsed = SpycyFile::parse(&file.render()).unwrap();
    assert_eq!(reparsed.names(), vec!["note", "tail"]);
    assert!(reparsed.get("note").unwrap().body_range().is_empty());
}

#[test]
fn custom_marker_syntax_is_invisible_to_the_default() {
    let options = FileOptions {
        syntax: MarkerSyntax::new("//", "embed").unwrap(),
        codec: CodecOptions {
            max_line_length: 40,
            ..CodecOptions::default()
        },
    };
    let mut file = SpycyFile::parse_with("int main() {}\n", "main.c", options.clone()).unwrap();
    file.set(Spyce::new("blob", vec![7u8; 100]), Position::Auto)
        .unwrap();

    let text = file.render();
    assert!(text.contains("// embed: start blob:bytes\n"));
    assert!(text.lines().filter(|l| l.starts_with("//|")).all(|l| l.len() <= 40));

    assert!(SpycyFile::parse(&text).unwrap().is_empty());
    let reparsed = SpycyFile::parse_with(&text, "main.c", options).unwrap();
    assert_eq!(reparsed.content("blob").unwrap().as_bytes(), &[7u8; 100]);
    assert_eq!(reparsed.get("blob").unwrap().payload_type(), PayloadType::Bytes);
}

#[test]
fn wok_builds_target_from_template() {
    let project = TestProject::new();
    assets(&project);
    project.write("templates/tool.py", SCRIPT);
    project.write_wok(
        "\
dist/tool.py:
  source: templates/tool.py
  spyces:
    helpers:
      category: source
      path: lib/helpers.py
    logo:
      path: img/logo.png
      encoding: base85
      compression: gzip
",
    );

    let wok = load_wok(&project.path(".wok-project.yaml")).unwrap();
    let status = wok.status().unwrap();
    assert!(!status[0].exists);

    wok.apply(&RefactorOptions::default()).unwrap();
    assert_eq!(project.read("templates/tool.py"), SCRIPT);

    let built = SpycyFile::open(project.path("dist/tool.py")).unwrap();
    assert_eq!(built.names(), vec!["helpers", "logo"]);
    let logo = built.get("logo").unwrap();
    assert_eq!(logo.configuration().get_str("encoding"), Some("base85"));
    assert_eq!(logo.configuration().get_str("compression"), Some("gzip"));
    assert_eq!(
        built.content("logo").unwrap().as_bytes(),
        (0u8..=255).collect::<Vec<_>>().as_slice()
    );

    let status = wok.status().unwrap();
    let states: Vec<_> = status[0].spyces.iter().map(|s| s.state).collect();
    assert_eq!(states, vec![SpyceState::UpToDate, SpyceState::UpToDate]);
    assert!(status[0].is_up_to_date());
}
