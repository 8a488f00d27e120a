use std::path::{Path, PathBuf};

use crate::error::Error;

/// Name of the optional project config file.
pub const CONFIG_FILE: &str = ".autolinks.toml";

/// Docs directory used when neither the config nor the command line names one.
const DEFAULT_DOCS_DIR: &str = "docs";

/// Project configuration loaded from `.autolinks.toml`.
/// Include/exclude patterns are path prefixes applied to markdown documents,
/// relative to the docs directory. Every file is indexed regardless.
pub struct Config {
    /// Root of the documentation tree.
    pub docs_dir: PathBuf,
    /// Path prefixes whose documents are never rewritten.
    exclude: Vec<String>,
    /// When non-empty, only documents under these prefixes are rewritten.
    include: Vec<String>,
}

/// Raw TOML structure for `.autolinks.toml`.
#[derive(serde::Deserialize)]
#[serde(deny_unknown_fields)]
struct AutolinksTomlConfig {
    /// Docs directory relative to the project root.
    docs_dir: Option<PathBuf>,
    /// Exclude prefixes, as written.
    #[serde(default)]
    exclude: Vec<String>,
    /// Include prefixes, as written.
    #[serde(default)]
    include: Vec<String>,
}

impl Config {
    /// Load config from `.autolinks.toml` in the given root directory.
    /// Returns the defaults if the file doesn't exist. A file that exists but
    /// is malformed is an error, never a silent fallback.
    ///
    /// # Errors
    ///
    /// Returns `Error::Io` if reading fails (other than not-found),
    /// or `Error::TomlDe` if the TOML is malformed.
    pub fn load(root: &Path) -> Result<Self, Error> {
        let path = root.join(CONFIG_FILE);
        let content = match std::fs::read_to_string(&path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(Self::rewrite_everything_by_default(root));
            },
            Err(e) => return Err(Error::Io(e)),
        };

        return Self::parse(root, &content);
    }

    /// Parse config content; relative `docs_dir` values are taken from `root`.
    ///
    /// # Errors
    ///
    /// Returns `Error::TomlDe` if the TOML is malformed.
    pub fn parse(root: &Path, content: &str) -> Result<Self, Error> {
        let raw: AutolinksTomlConfig = toml::from_str(content)?;
        let docs_dir = raw
            .docs_dir
            .map_or_else(|| root.join(DEFAULT_DOCS_DIR), |d| root.join(d));
        return Ok(Self {
            docs_dir,
            exclude: raw.exclude,
            include: raw.include,
        });
    }

    /// Defaults: `docs/` under the root, every markdown document rewritten.
    fn rewrite_everything_by_default(root: &Path) -> Self {
        return Self {
            docs_dir: root.join(DEFAULT_DOCS_DIR),
            exclude: Vec::new(),
            include: Vec::new(),
        };
    }

    /// Check whether a markdown document should be rewritten.
    ///
    /// A path is included if no include patterns are set, or if it starts
    /// with at least one include pattern. An included path is then dropped
    /// if it starts with any exclude pattern.
    pub fn should_rewrite(&self, relative_path: &str) -> bool {
        let included = self.include.is_empty()
            || self.include.iter().any(|p| relative_path.starts_with(p.as_str()));

        if !included {
            return false;
        }

        return !self.exclude.iter().any(|p| relative_path.starts_with(p.as_str()));
    }
}

#[cfg(test)]
#[allow(clippy::missing_panics_doc, clippy::unwrap_used, reason = "test code")]
mod tests {
    use super::*;

    #[test]
    fn missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load(dir.path()).unwrap();
        assert_eq!(config.docs_dir, dir.path().join("docs"));
        assert!(config.should_rewrite("anything/at/all.md"));
    }

    #[test]
    fn docs_dir_is_relative_to_root() {
        let config = Config::parse(Path::new("/project"), "docs_dir = \"site/src\"").unwrap();
        assert_eq!(config.docs_dir, PathBuf::from("/project/site/src"));
    }

    #[test]
    fn include_then_exclude() {
        let config = Config::parse(
            Path::new("."),
            "include = [\"guide/\"]\nexclude = [\"guide/drafts/\"]",
        )
        .unwrap();
        assert!(config.should_rewrite("guide/intro.md"));
        assert!(!config.should_rewrite("guide/drafts/wip.md"));
        assert!(!config.should_rewrite("reference/api.md"));
    }

    #[test]
    fn malformed_config_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE), "include = 3").unwrap();
        assert!(matches!(Config::load(dir.path()), Err(Error::TomlDe(_))));
    }
}
