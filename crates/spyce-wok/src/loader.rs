//! Finding and parsing `.wok-project.yaml`

use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde_yaml::{Mapping, Value};
use spyce_flavor::{FlavorSpec, build_flavor};

use crate::error::{Error, Result};
use crate::wok::{Wok, WokFile};

/// File name looked up by [`find_wok_path`].
pub const WOK_FILE_NAME: &str = ".wok-project.yaml";

/// One entry of `wok.files`.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileEntry {
    #[serde(default)]
    source: Option<PathBuf>,
    #[serde(default)]
    spyces: Mapping,
}

/// Walk up from `start` looking for [`WOK_FILE_NAME`].
pub fn find_wok_path(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .map(|dir| dir.join(WOK_FILE_NAME))
        .find(|candidate| candidate.is_file())
}

/// Load a wok file. Relative paths inside it are taken from its directory.
pub fn load_wok(path: &Path) -> Result<Wok> {
    let path = std::path::absolute(path).map_err(|e| spyce_fs::Error::io(path, e))?;
    let text = spyce_fs::read_text(&path)?;
    parse_wok(&text, &path)
}

/// Parse wok YAML as if it had been read from `path`.
pub fn parse_wok(text: &str, path: &Path) -> Result<Wok> {
    let base_dir = path.parent().unwrap_or_else(|| Path::new(""));
    let document: Value = serde_yaml::from_str(text).map_err(|source| Error::Yaml {
        path: path.to_path_buf(),
        source,
    })?;

    let Value::Mapping(document) = document else {
        return Err(Error::invalid(path, "<root>", "not a mapping"));
    };
    let wok = match document.get("wok") {
        Some(Value::Mapping(wok)) => wok,
        Some(_) => return Err(Error::invalid(path, "wok", "not a mapping")),
        None => return Err(Error::invalid(path, "<root>", "missing wok section")),
    };
    let files = match wok.get("files") {
        Some(Value::Mapping(files)) => files.clone(),
        Some(Value::Null) | None => Mapping::new(),
        Some(_) => return Err(Error::invalid(path, "wok.files", "not a mapping")),
    };

    let mut wok_files = Vec::with_capacity(files.len());
    for (key, value) in files {
        let Some(file) = key.as_str() else {
            return Err(Error::invalid(path, "wok.files", "file keys must be strings"));
        };
        let section = format!("wok.files.{file}");
        let entry: FileEntry = serde_yaml::from_value(value)
            .map_err(|e| Error::invalid(path, section.as_str(), e.to_string()))?;

        let target = base_dir.join(file);
        let source = entry.source.map(|source| base_dir.join(source));
        let mut wok_file = WokFile::new(target, source);

        for (name, spec) in entry.spyces {
            let Some(name) = name.as_str() else {
                return Err(Error::invalid(
                    path,
                    format!("{section}.spyces"),
                    "spyce keys must be strings",
                ));
            };
            let section = format!("{section}.spyces.{name}");
            let spec: FlavorSpec = serde_yaml::from_value(spec)
                .map_err(|e| Error::invalid(path, section.as_str(), e.to_string()))?;
            let flavor = build_flavor(name, &spec, base_dir).map_err(|source| Error::Flavor {
                path: path.to_path_buf(),
                section,
                source,
            })?;
            wok_file.push(flavor);
        }
        tracing::debug!(
            target = %wok_file.target().display(),
            spyces = wok_file.len(),
            "parsed wok file entry"
        );
        wok_files.push(wok_file);
    }

    Ok(Wok::new(path, wok_files))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use spyce_core::PayloadType;
    use spyce_test_utils::TestProject;

    #[test]
    fn finds_wok_in_a_parent() {
        let project = TestProject::new();
        let wok = project.write_wok("");
        project.write("a/b/c/keep.txt", "");

        let found = find_wok_path(&project.path("a/b/c")).unwrap();
        assert_eq!(found, wok);
    }

    #[test]
    fn parses_files_in_order() {
        let project = TestProject::new();
        project.write("img/logo.png", "png");
        let yaml = "\
wok:
  files:
    zeta.py:
      spyces:
        logo:
          path: img/logo.png
        greeting:
          category: inline
          text: hi
    alpha.py:
      source: templates/alpha.py
";
        let wok = parse_wok(yaml, &project.path(WOK_FILE_NAME)).unwrap();
        let targets: Vec<_> = wok.files().iter().map(|f| f.target().to_path_buf()).collect();
        assert_eq!(targets, vec![project.path("zeta.py"), project.path("alpha.py")]);

        let zeta = &wok.files()[0];
        assert_eq!(zeta.source(), project.path("zeta.py"));
        assert_eq!(zeta.names(), vec!["logo", "greeting"]);
        assert_eq!(zeta.flavors()[0].payload_type(), PayloadType::Bytes);

        let alpha = &wok.files()[1];
        assert_eq!(alpha.source(), project.path("templates/alpha.py"));
        assert!(alpha.is_empty());
    }

    #[rstest]
    #[case("- 1\n", "<root>")]
    #[case("other: 1\n", "missing wok section")]
    #[case("wok: [1]\n", "section wok:")]
    #[case("wok:\n  files: 3\n", "section wok.files:")]
    #[case("wok:\n  files:\n    a.py:\n      colour: red\n", "section wok.files.a.py:")]
    #[case(
        "wok:\n  files:\n    a.py:\n      spyces:\n        x:\n          category: image\n",
        "section wok.files.a.py.spyces.x: Unknown flavor category"
    )]
    fn errors_name_the_section(#[case] yaml: &str, #[case] expected: &str) {
        let err = parse_wok(yaml, Path::new("/p/.wok-project.yaml")).unwrap_err();
        let message = err.to_string();
        assert!(message.contains(expected), "{message}");
    }

    #[test]
    fn broken_yaml_is_reported_with_the_path() {
        let err = parse_wok("wok: [", Path::new("/p/.wok-project.yaml")).unwrap_err();
        assert!(matches!(err, Error::Yaml { .. }));
        assert!(err.to_string().starts_with("wok file /p/.wok-project.yaml"));
    }
}
