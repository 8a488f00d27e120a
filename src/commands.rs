//! Host driver commands: rewrite a docs tree, list the filename index.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use autolinks::config::Config;
use autolinks::error::Error;
use autolinks::index::FilenameIndex;
use autolinks::rewriter::{Rewrite, rewrite_document};
use autolinks::scanner;
use rayon::prelude::*;
use serde::Serialize;

/// Where rewritten documents go.
pub enum Output {
    /// Report pending rewrites, write nothing.
    Check,
    /// Overwrite each document.
    InPlace,
    /// Mirror the docs tree under this directory: rewritten documents plus
    /// a copy of every other discovered file.
    Mirror(PathBuf),
}

/// A document with its rewrite result.
struct Processed<'a> {
    /// Text as read from disk.
    original: String,
    /// Absolute path of the document.
    path: &'a Path,
    /// Rewritten text and its diagnostics.
    result: Rewrite,
}

/// Docs directory from the command line, else from `.autolinks.toml`.
fn resolve_docs_dir(config: &Config, docs_dir: Option<PathBuf>) -> PathBuf {
    return docs_dir.unwrap_or_else(|| config.docs_dir.clone());
}

/// Build the index once, rewrite every selected document against it, and
/// write the results.
///
/// # Errors
///
/// Returns errors from config loading, discovery, or reading and writing documents.
pub fn rewrite(docs_dir: Option<PathBuf>, output: &Output) -> Result<ExitCode, Error> {
    let root = PathBuf::from(".");
    let config = Config::load(&root)?;
    let docs_dir = resolve_docs_dir(&config, docs_dir);

    let sources = scanner::discover(&docs_dir)?;
    let docs_root = scanner::docs_root(&docs_dir)?;
    let index = FilenameIndex::build(sources.iter().cloned());
    let documents = scanner::documents(&sources, &docs_root, &config);

    let processed = documents
        .par_iter()
        .map(|&path| -> Result<Processed, Error> {
            let original = std::fs::read_to_string(path)?;
            let result = rewrite_document(&original, path, &index);
            return Ok(Processed { original, path, result });
        })
        .collect::<Result<Vec<_>, Error>>()?;

    let mut changed = 0_usize;
    for doc in &processed {
        for diagnostic in &doc.result.diagnostics {
            diagnostic.emit();
        }
        let is_changed = doc.result.changed(&doc.original);
        if is_changed {
            changed = changed.saturating_add(1);
        }
        write_output(doc, is_changed, &docs_root, output)?;
    }

    if let Output::Mirror(out_dir) = output {
        let rewritten: HashSet<&Path> = documents.iter().copied().collect();
        let others = sources
            .iter()
            .map(|source| source.abs_path.as_path())
            .filter(|path| !rewritten.contains(path));
        for path in others {
            let destination = mirror_path(out_dir, path, &docs_root);
            if let Some(parent) = destination.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::copy(path, &destination)?;
            log::debug!("copied {}", destination.display());
        }
    }

    let total = processed.len();
    return Ok(match output {
        Output::Check if changed > 0 => {
            println!("{changed} of {total} documents have links to rewrite");
            ExitCode::from(1)
        },
        Output::Check => {
            println!("All {total} documents up to date");
            ExitCode::SUCCESS
        },
        Output::InPlace | Output::Mirror(_) => {
            println!("Rewrote {changed} of {total} documents");
            ExitCode::SUCCESS
        },
    });
}

/// Persist one document according to `output`.
///
/// # Errors
///
/// Returns `Error::Io` if a directory or file cannot be written.
fn write_output(doc: &Processed<'_>, is_changed: bool, docs_root: &Path, output: &Output) -> Result<(), Error> {
    match output {
        Output::Check => {
            if is_changed {
                println!("PENDING {}", doc.path.display());
            }
        },
        Output::InPlace => {
            if is_changed {
                std::fs::write(doc.path, &doc.result.text)?;
                log::info!("rewrote {}", doc.path.display());
            }
        },
        Output::Mirror(out_dir) => {
            let destination = mirror_path(out_dir, doc.path, docs_root);
            if let Some(parent) = destination.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(&destination, &doc.result.text)?;
            log::debug!("wrote {}", destination.display());
        },
    }
    return Ok(());
}

/// Where `path` lands when the docs tree is mirrored under `out_dir`.
fn mirror_path(out_dir: &Path, path: &Path, docs_root: &Path) -> PathBuf {
    return out_dir.join(path.strip_prefix(docs_root).unwrap_or(path));
}

/// One index entry in JSON output.
#[derive(Serialize)]
struct IndexEntry<'a> {
    /// More than one file shares this name.
    ambiguous: bool,
    /// The indexed base filename.
    filename: &'a str,
    /// Every candidate path, first one wins.
    paths: &'a [PathBuf],
}

/// Print the filename index, one filename per line with every candidate path.
///
/// # Errors
///
/// Returns errors from config loading, discovery, or JSON serialization.
pub fn index(docs_dir: Option<PathBuf>, json: bool) -> Result<(), Error> {
    let root = PathBuf::from(".");
    let config = Config::load(&root)?;
    let docs_dir = resolve_docs_dir(&config, docs_dir);

    let sources = scanner::discover(&docs_dir)?;
    let index = FilenameIndex::from_sources(sources);

    if json {
        let entries: Vec<IndexEntry<'_>> = index
            .iter()
            .map(|(filename, paths)| IndexEntry {
                ambiguous: paths.len() > 1,
                filename,
                paths,
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    for (filename, paths) in index.iter() {
        let marker = if paths.len() > 1 { "  (ambiguous)" } else { "" };
        println!("{filename}{marker}");
        for path in paths {
            println!("  {}", path.display());
        }
    }
    let duplicates = index.duplicates().count();
    println!();
    println!("{} filenames, {duplicates} ambiguous", index.len());
    return Ok(());
}
