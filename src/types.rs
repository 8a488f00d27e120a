//! Core domain types for autolinks: source files, link references, scanner state.

use std::path::{Path, PathBuf};

/// A file the host build knows about. Immutable for the duration of a build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    /// Absolute path of the file in the source tree.
    pub abs_path: PathBuf,
    /// Name the host reports for the file. Not unique across a docs tree.
    pub filename: String,
}

impl SourceFile {
    /// Describe a file by its absolute path alone; the filename is the final segment.
    pub fn from_path(abs_path: impl Into<PathBuf>) -> Self {
        let abs_path = abs_path.into();
        let filename = file_name_of(&abs_path).unwrap_or_default();
        return Self { abs_path, filename };
    }

    /// Create a descriptor from an explicit filename and absolute path.
    pub fn new(filename: impl Into<String>, abs_path: impl Into<PathBuf>) -> Self {
        return Self {
            abs_path: abs_path.into(),
            filename: filename.into(),
        };
    }

    /// The key this file is indexed under: the final segment of its path,
    /// extension included. Falls back to the reported filename when the path
    /// has no final segment.
    pub fn base_filename(&self) -> String {
        return file_name_of(&self.abs_path).unwrap_or_else(|| {
            self.filename
                .rsplit(['/', '\\'])
                .next()
                .unwrap_or_default()
                .to_string()
        });
    }
}

/// Final path segment as an owned string.
fn file_name_of(path: &Path) -> Option<String> {
    return path.file_name().map(|n| n.to_string_lossy().into_owned());
}

/// Which syntax a link reference was written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkSyntax {
    /// `href="..."` or `src="..."` inside raw HTML.
    HtmlAttribute,
    /// `[alt](target)` or `![alt](target)`.
    Markdown,
}

/// A candidate link found in a line of text. Transient: built while
/// scanning, never stored past the line it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkReference {
    /// Display or alt text. `None` for HTML attributes.
    pub alt: Option<String>,
    /// Bare filename portion of the target, as written.
    pub filename: String,
    /// Anchor including the leading `#`.
    pub fragment: Option<String>,
    /// Syntax the reference was written in.
    pub syntax: LinkSyntax,
    /// Raw target text between the delimiters, fragment and title included.
    pub target: String,
    /// Quoted title including its leading whitespace and quotes.
    pub title: Option<String>,
}

/// Per-document scanner flags, threaded from one line to the next.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScannerState {
    /// Inside an unterminated `<!--` comment.
    pub inside_comment: bool,
    /// Between an opening and closing fence line.
    pub inside_fence: bool,
}
