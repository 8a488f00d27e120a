//! Filename index: base filename to every absolute path it was found at.

use std::path::{Path, PathBuf};

use indexmap::IndexMap;

use crate::diagnostics::Diagnostic;
use crate::paths::percent_decode;
use crate::types::SourceFile;

/// Mapping from base filename to candidate paths, in enumeration order.
///
/// Built once per build and read-only afterwards, so a single index can be
/// shared across threads rewriting different documents.
#[derive(Debug, Clone, Default)]
pub struct FilenameIndex {
    entries: IndexMap<String, Vec<PathBuf>>,
}

impl FilenameIndex {
    /// Build the index and report ambiguous filenames, once, as a single
    /// aggregated warning.
    pub fn build(files: impl IntoIterator<Item = SourceFile>) -> Self {
        let index = Self::from_sources(files);
        if let Some(report) = index.duplicate_report() {
            report.emit();
        }
        log::debug!("indexed {} filenames", index.len());
        return index;
    }

    /// Group files by base filename without reporting anything.
    /// Dot-prefixed filenames are hidden and never indexed.
    pub fn from_sources(files: impl IntoIterator<Item = SourceFile>) -> Self {
        let mut entries: IndexMap<String, Vec<PathBuf>> = IndexMap::new();
        for file in files {
            let filename = file.base_filename();
            if filename.is_empty() || filename.starts_with('.') {
                continue;
            }
            entries.entry(filename).or_default().push(file.abs_path);
        }
        return Self { entries };
    }

    /// First path recorded for `filename`, if any.
    pub fn resolve(&self, filename: &str) -> Option<&Path> {
        return self.candidates(filename).first().map(PathBuf::as_path);
    }

    /// Resolve a filename as written in a link: verbatim first, then with
    /// percent-escapes decoded so previously rewritten names still resolve.
    pub fn resolve_link(&self, written: &str) -> Option<&Path> {
        return self
            .resolve(written)
            .or_else(|| self.resolve(&percent_decode(written)));
    }

    /// Every path recorded for `filename`, in enumeration order.
    pub fn candidates(&self, filename: &str) -> &[PathBuf] {
        return self.entries.get(filename).map(Vec::as_slice).unwrap_or_default();
    }

    /// Whether `filename` was found under more than one path.
    pub fn is_ambiguous(&self, filename: &str) -> bool {
        return self.candidates(filename).len() > 1;
    }

    /// Ambiguous filenames with all of their candidates, in first-seen order.
    pub fn duplicates(&self) -> impl Iterator<Item = (&str, &[PathBuf])> {
        return self.iter().filter(|(_, paths)| paths.len() > 1);
    }

    /// The aggregated duplicate-filename warning, or `None` when every
    /// filename is unique.
    pub fn duplicate_report(&self) -> Option<Diagnostic> {
        let entries: Vec<(String, Vec<PathBuf>)> = self
            .duplicates()
            .map(|(name, paths)| (name.to_string(), paths.to_vec()))
            .collect();
        return (!entries.is_empty()).then_some(Diagnostic::DuplicateFilenames { entries });
    }

    /// All filenames with their candidates, in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[PathBuf])> {
        return self
            .entries
            .iter()
            .map(|(name, paths)| (name.as_str(), paths.as_slice()));
    }

    /// Number of distinct filenames.
    pub fn len(&self) -> usize {
        return self.entries.len();
    }

    /// Whether no filename was indexed.
    pub fn is_empty(&self) -> bool {
        return self.entries.is_empty();
    }
}

#[cfg(test)]
#[allow(clippy::missing_panics_doc, clippy::indexing_slicing, reason = "test code")]
mod tests {
    use super::*;

    fn sources(paths: &[&str]) -> Vec<SourceFile> {
        return paths.iter().map(|p| SourceFile::from_path(*p)).collect();
    }

    #[test]
    fn groups_by_base_filename_in_enumeration_order() {
        let index = FilenameIndex::from_sources(sources(&[
            "/docs/b/index.md",
            "/docs/a/index.md",
            "/docs/assets/logo.png",
        ]));
        assert_eq!(index.len(), 2);
        assert_eq!(
            index.candidates("index.md"),
            &[PathBuf::from("/docs/b/index.md"), PathBuf::from("/docs/a/index.md")]
        );
        assert_eq!(index.resolve("index.md"), Some(Path::new("/docs/b/index.md")));
        assert_eq!(index.resolve("logo.png"), Some(Path::new("/docs/assets/logo.png")));
    }

    #[test]
    fn dotfiles_are_never_indexed() {
        let index = FilenameIndex::from_sources(sources(&["/docs/.pages", "/docs/.hidden.md"]));
        assert!(index.is_empty());
        assert_eq!(index.resolve(".hidden.md"), None);
    }

    #[test]
    fn absent_filename_resolves_to_nothing() {
        let index = FilenameIndex::from_sources(sources(&["/docs/guide.md"]));
        assert_eq!(index.resolve("missing.md"), None);
        assert!(index.candidates("missing.md").is_empty());
    }

    #[test]
    fn duplicate_report_aggregates_every_ambiguous_name() {
        let index = FilenameIndex::from_sources(sources(&[
            "/docs/a/index.md",
            "/docs/a/logo.png",
            "/docs/b/index.md",
            "/docs/b/logo.png",
            "/docs/c/index.md",
            "/docs/unique.md",
        ]));
        assert!(index.is_ambiguous("index.md"));
        assert!(!index.is_ambiguous("unique.md"));

        let Some(Diagnostic::DuplicateFilenames { entries }) = index.duplicate_report() else {
            panic!("expected a duplicate report");
        };
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].0, "index.md");
        assert_eq!(entries[0].1.len(), 3);
        assert_eq!(entries[1].0, "logo.png");
    }

    #[test]
    fn unique_names_produce_no_report() {
        let index = FilenameIndex::from_sources(sources(&["/docs/a.md", "/docs/b.md"]));
        assert!(index.duplicate_report().is_none());
    }

    #[test]
    fn percent_encoded_link_resolves_to_decoded_name() {
        let index = FilenameIndex::from_sources(sources(&["/docs/my notes.md"]));
        assert_eq!(index.resolve_link("my%20notes.md"), Some(Path::new("/docs/my notes.md")));
        assert_eq!(index.resolve_link("my notes.md"), Some(Path::new("/docs/my notes.md")));
    }

    #[test]
    fn index_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<FilenameIndex>();
    }
}
