use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::Error;

/// ANSI bold, for markdown headings on stderr.
const BOLD: &str = "\x1b[1m";
/// ANSI attribute reset.
const RESET: &str = "\x1b[0m";

/// Advisory findings from indexing or rewriting. Never fatal: the
/// offending reference is left as written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// Filenames that exist under more than one path, with every candidate
    /// in enumeration order. Reported once per build.
    DuplicateFilenames {
        /// Each ambiguous filename with all of its candidate paths.
        entries: Vec<(String, Vec<PathBuf>)>,
    },
    /// A bare filename link that matches nothing in the index.
    MissingFilename {
        /// Document containing the link.
        document: PathBuf,
        /// Filename as written in the link.
        filename: String,
    },
}

impl Diagnostic {
    /// Log this diagnostic at warning level.
    pub fn emit(&self) {
        log::warn!("{self}");
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        return match self {
            Self::DuplicateFilenames { entries } => {
                write!(f, "duplicate filenames resolve to the first candidate:")?;
                for (filename, paths) in entries {
                    write!(f, "\n  '{filename}' exists at {}", join_paths(paths))?;
                }
                Ok(())
            },
            Self::MissingFilename { document, filename } => write!(
                f,
                "unable to find '{filename}' referenced from {}",
                document.display()
            ),
        };
    }
}

/// Comma-separated display form of candidate paths.
fn join_paths(paths: &[PathBuf]) -> String {
    return paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ");
}

/// Render an error as markdown with bold headings and print to stderr.
pub fn print_error(e: &Error) {
    let md = render_error(e);
    for line in md.lines() {
        if line.starts_with('#') {
            eprintln!("{BOLD}{line}{RESET}");
        } else {
            eprintln!("{line}");
        }
    }
}

/// Render an error as a markdown block: what happened and how to fix it.
pub fn render_error(e: &Error) -> String {
    return match e {
        Error::DocsDirNotFound { path } => render_docs_dir_not_found(path),
        Error::TomlDe(e) => format!(
            "\
# Error: Invalid Config

{e}

## Fix

Correct `.autolinks.toml` or remove it to use the defaults.
"
        ),
        Error::Walk(e) => format!(
            "\
# Error: Cannot Walk Docs Directory

{e}
"
        ),
        Error::Io(e) => format!(
            "\
# Error: I/O

{e}
"
        ),
        Error::Json(e) => format!(
            "\
# Error: JSON Serialization

{e}
"
        ),
    };
}

/// Markdown for a missing docs directory, with both ways to point at one.
fn render_docs_dir_not_found(path: &Path) -> String {
    return format!(
        "\
# Error: Docs Directory Not Found

`{}` does not exist.

## Fix

Pass the directory explicitly:

    autolinks rewrite --docs-dir path/to/docs

Or set it in `.autolinks.toml`:

    docs_dir = \"path/to/docs\"
",
        path.display()
    );
}
