//! Resolve bare filename links in markdown documents.
//!
//! A documentation build enumerates its source files once into a
//! [`FilenameIndex`], then passes each document through [`rewrite`], which
//! replaces links such as `![](logo.png)` with the path to the file relative
//! to the linking document (`../assets/logo.png`). Fenced code blocks and
//! HTML comments are left untouched.

pub mod config;
pub mod diagnostics;
pub mod error;
pub mod index;
pub mod links;
pub mod paths;
pub mod rewriter;
pub mod scanner;
pub mod types;

pub use crate::diagnostics::Diagnostic;
pub use crate::index::FilenameIndex;
pub use crate::rewriter::{Rewrite, rewrite, rewrite_document};
pub use crate::types::{LinkReference, LinkSyntax, ScannerState, SourceFile};
