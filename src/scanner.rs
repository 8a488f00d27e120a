use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::config::Config;
use crate::error::Error;
use crate::paths::normalize_path;
use crate::types::SourceFile;

/// Enumerate every file under `docs_dir` as an absolute source descriptor.
/// Entries are sorted by file name within each directory so the enumeration
/// order, and with it duplicate resolution, is stable across runs.
///
/// # Errors
///
/// Returns `Error::DocsDirNotFound` if `docs_dir` is not a directory,
/// `Error::Io` if it cannot be made absolute, or `Error::Walk` if a
/// directory entry cannot be read.
pub fn discover(docs_dir: &Path) -> Result<Vec<SourceFile>, Error> {
    if !docs_dir.is_dir() {
        return Err(Error::DocsDirNotFound {
            path: docs_dir.to_path_buf(),
        });
    }
    let root = docs_root(docs_dir)?;

    let mut sources = Vec::new();
    for entry in WalkDir::new(&root).sort_by_file_name() {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        sources.push(SourceFile::from_path(entry.into_path()));
    }

    log::debug!("discovered {} files under {}", sources.len(), root.display());
    return Ok(sources);
}

/// Absolute, lexically normalized form of `docs_dir`: the prefix every
/// discovered path starts with.
///
/// # Errors
///
/// Returns `Error::Io` if the current directory cannot be determined.
pub fn docs_root(docs_dir: &Path) -> Result<PathBuf, Error> {
    return Ok(normalize_path(&std::path::absolute(docs_dir)?));
}

/// Markdown documents among `sources` that the config selects for rewriting.
/// Include/exclude prefixes are matched against the `/`-separated path
/// relative to `root`, as returned by [`docs_root`].
pub fn documents<'a>(sources: &'a [SourceFile], root: &Path, config: &Config) -> Vec<&'a Path> {
    return sources
        .iter()
        .map(|source| source.abs_path.as_path())
        .filter(|path| path.extension().is_some_and(|ext| ext == "md"))
        .filter(|path| config.should_rewrite(&relative_to(path, root)))
        .collect();
}

/// `path` relative to `root` with `/` separators, for prefix matching.
pub fn relative_to(path: &Path, root: &Path) -> String {
    let relative: PathBuf = path.strip_prefix(root).unwrap_or(path).to_path_buf();
    return relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join("/");
}

#[cfg(test)]
#[allow(clippy::missing_panics_doc, clippy::unwrap_used, reason = "test code")]
mod tests {
    use super::*;

    fn tree() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        let docs = dir.path().join("docs");
        for file in ["index.md", "guide/intro.md", "guide/drafts/wip.md", "assets/logo.png", ".pages"] {
            let path = docs.join(file);
            std::fs::create_dir_all(path.parent().unwrap()).unwrap();
            std::fs::write(path, "").unwrap();
        }
        return dir;
    }

    #[test]
    fn discovers_every_file_with_absolute_paths() {
        let dir = tree();
        let sources = discover(&dir.path().join("docs")).unwrap();
        let names: Vec<&str> = sources.iter().map(|s| s.filename.as_str()).collect();
        assert_eq!(names.len(), 5);
        assert!(names.contains(&".pages"));
        assert!(sources.iter().all(|s| s.abs_path.is_absolute()));
    }

    #[test]
    fn enumeration_order_is_sorted_and_stable() {
        let dir = tree();
        let first = discover(&dir.path().join("docs")).unwrap();
        let second = discover(&dir.path().join("docs")).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn missing_docs_dir_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = discover(&dir.path().join("nope")).unwrap_err();
        assert!(matches!(err, Error::DocsDirNotFound { .. }));
    }

    #[test]
    fn documents_are_markdown_filtered_by_config() {
        let dir = tree();
        let docs = dir.path().join("docs");
        let sources = discover(&docs).unwrap();
        let config = Config::parse(dir.path(), "exclude = [\"guide/drafts/\"]").unwrap();
        let root = docs_root(&docs).unwrap();

        let selected: Vec<String> = documents(&sources, &root, &config)
            .iter()
            .map(|p| relative_to(p, &root))
            .collect();
        assert_eq!(selected, vec!["guide/intro.md".to_string(), "index.md".to_string()]);
    }
}
