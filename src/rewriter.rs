//! Line-scanning rewriter: resolves bare filename links in one document.
//!
//! Each physical line is classified against the scanner state in order:
//! fence toggle, inside fence, comment handling, then plain substitution.
//! Code blocks and comments are copied through untouched.

use std::path::Path;

use regex::Captures;

use crate::diagnostics::Diagnostic;
use crate::index::FilenameIndex;
use crate::links;
use crate::paths::relative_link;
use crate::types::ScannerState;

/// Fence markers recognised at the start of a trimmed line.
const FENCE_MARKERS: [&str; 2] = ["```", "~~~"];

/// Opens a block comment.
const COMMENT_START: &str = "<!--";

/// Closes a block comment.
const COMMENT_END: &str = "-->";

/// Rewritten document text plus the diagnostics raised while producing it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rewrite {
    /// One `MissingFilename` per unresolved reference, in document order.
    pub diagnostics: Vec<Diagnostic>,
    /// The document with every resolvable bare filename link rewritten.
    pub text: String,
}

impl Rewrite {
    /// Whether the rewritten text differs from `original`.
    pub fn changed(&self, original: &str) -> bool {
        return self.text != original;
    }
}

/// Rewrite a document and log its diagnostics at warning level.
pub fn rewrite(text: &str, document: &Path, index: &FilenameIndex) -> String {
    let result = rewrite_document(text, document, index);
    for diagnostic in &result.diagnostics {
        diagnostic.emit();
    }
    return result.text;
}

/// Rewrite a document without side effects. `document` is the absolute path
/// of the file the text came from; resolved links are made relative to its
/// directory.
pub fn rewrite_document(text: &str, document: &Path, index: &FilenameIndex) -> Rewrite {
    let mut scanner = LineScanner {
        diagnostics: Vec::new(),
        document,
        index,
        out: String::with_capacity(text.len()),
        state: ScannerState::default(),
    };
    for line in text.split_inclusive('\n') {
        scanner.line(line);
    }
    return Rewrite {
        diagnostics: scanner.diagnostics,
        text: scanner.out,
    };
}

/// Mutable pass over one document.
struct LineScanner<'a> {
    /// Missing-filename findings, in document order.
    diagnostics: Vec<Diagnostic>,
    /// Absolute path of the document being rewritten.
    document: &'a Path,
    /// Shared read-only filename index.
    index: &'a FilenameIndex,
    /// Rewritten text so far.
    out: String,
    /// Fence and comment flags carried between lines.
    state: ScannerState,
}

impl LineScanner<'_> {
    /// Apply the per-line rules in priority order.
    fn line(&mut self, line: &str) {
        if is_fence_line(line) {
            self.state.inside_fence = !self.state.inside_fence;
            self.out.push_str(line);
            return;
        }

        if self.state.inside_fence {
            self.out.push_str(line);
            return;
        }

        if self.state.inside_comment {
            self.state.inside_comment = ends_inside_comment(line);
            self.out.push_str(line);
            return;
        }

        self.outside_comment(line);
    }

    /// Substitute everything outside comment spans. A comment closed on the
    /// same line is copied and scanning resumes after it; an unclosed one
    /// copies the rest of the line and carries over to the next.
    fn outside_comment(&mut self, line: &str) {
        let mut rest = line;
        while let Some(start) = rest.find(COMMENT_START) {
            let (before, comment) = rest.split_at(start);
            let rewritten = self.substitute(before);
            self.out.push_str(&rewritten);

            let body_from = COMMENT_START.len();
            let Some(end) = comment.get(body_from..).and_then(|body| body.find(COMMENT_END)) else {
                self.out.push_str(comment);
                self.state.inside_comment = true;
                return;
            };
            let close = body_from.saturating_add(end).saturating_add(COMMENT_END.len());
            let (span, after) = comment.split_at(close);
            self.out.push_str(span);
            rest = after;
        }
        let rewritten = self.substitute(rest);
        self.out.push_str(&rewritten);
    }

    /// Rewrite every link match in `segment`, left to right.
    fn substitute(&mut self, segment: &str) -> String {
        let mut out = String::with_capacity(segment.len());
        let mut last = 0;
        for cap in links::pattern().captures_iter(segment) {
            let Some(whole) = cap.get(0) else {
                continue;
            };
            let Some(before) = segment.get(last..whole.start()) else {
                continue;
            };
            out.push_str(before);
            let replacement = self.replace(&cap);
            out.push_str(&replacement);
            last = whole.end();
        }
        out.push_str(segment.get(last..).unwrap_or_default());
        return out;
    }

    /// Replacement text for one match. Links nested in the alt text are
    /// rewritten first; the filename is swapped for the resolved relative
    /// path, or kept as written when it is hidden or can't be resolved.
    fn replace(&mut self, cap: &Captures<'_>) -> String {
        let original = cap.get(0).map(|m| m.as_str()).unwrap_or_default();
        let Some(link) = links::parse_capture(cap) else {
            return original.to_string();
        };
        let alt = match link.alt {
            Some(alt) if alt.contains('[') => self.substitute(alt),
            Some(alt) => alt.to_string(),
            None => String::new(),
        };
        let filename = link.reference.filename.as_str();

        if filename.starts_with('.') {
            return link.compose(&alt, filename);
        }

        let Some(target) = self.index.resolve_link(filename) else {
            self.diagnostics.push(Diagnostic::MissingFilename {
                document: self.document.to_path_buf(),
                filename: filename.to_string(),
            });
            return link.compose(&alt, filename);
        };

        return link.compose(&alt, &relative_link(self.document, target));
    }
}

/// Whether a line that starts inside a comment is still inside one at its
/// end: every `-->` closes, every later `<!--` reopens.
fn ends_inside_comment(line: &str) -> bool {
    let mut rest = line;
    loop {
        let Some(end) = rest.find(COMMENT_END) else {
            return true;
        };
        rest = rest.get(end.saturating_add(COMMENT_END.len())..).unwrap_or_default();
        let Some(start) = rest.find(COMMENT_START) else {
            return false;
        };
        rest = rest.get(start.saturating_add(COMMENT_START.len())..).unwrap_or_default();
    }
}

/// Whether the trimmed line opens or closes a fenced code block.
fn is_fence_line(line: &str) -> bool {
    let trimmed = line.trim();
    return FENCE_MARKERS.iter().any(|marker| trimmed.starts_with(marker));
}
