//! Link pattern matcher: finds bare-filename link targets in a run of text.

use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::types::{LinkReference, LinkSyntax};

/// Extensions a target must end in to be considered, case-sensitive.
pub const LINKABLE_EXTENSIONS: [&str; 8] = ["md", "png", "jpg", "jpeg", "bmp", "gif", "svg", "webp"];

/// One alternation per syntax so matches come back strictly left to right.
///
/// Markdown: `[alt](file.ext#frag "title")`, optional leading `!`. The
/// title may be quoted with `"`, `'` or parentheses. Alt text may hold one
/// nested link, as in a linked image `[![logo](logo.png)](index.md)`.
/// HTML: `href="file.ext#frag"` or `src="file.ext"`.
///
/// A filename never contains whitespace, quotes, brackets, `#`, `/`, `\`
/// or `:`, so explicit paths and URLs can't match.
#[allow(clippy::expect_used, reason = "hardcoded pattern is a compile-time invariant")]
static LINK_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    let exts = LINKABLE_EXTENSIONS.join("|");
    let file = format!(r#"[^\s()\[\]<>"'#/\\:]+\.(?:{exts})"#);
    let pattern = format!(
        concat!(
            r#"(?P<md_lead>!?\[)(?P<alt>(?:[^\[\]]|\[[^\[\]]*\]\([^()]*\))*)\]\("#,
            r#"(?P<md_file>{file})"#,
            r#"(?P<md_rest>(?P<md_fragment>#[^\s)"']*)?"#,
            r#"(?P<title>\s+(?:"[^"]*"|'[^']*'|\([^()]*\)))?\s*\))"#,
            r#"|(?P<html_open>\b(?:href|src)=")"#,
            r#"(?P<html_file>{file})"#,
            r#"(?P<html_rest>(?P<html_fragment>#[^"]*)?")"#,
        ),
        file = file,
    );
    return Regex::new(&pattern).expect("valid link regex");
});

/// A match split into the pieces substitution works with.
pub struct LinkMatch<'t> {
    /// Alt text between the brackets. `None` for HTML attributes.
    pub alt: Option<&'t str>,
    /// Text before the alt text or filename: `[`, `![`, `href="` or `src="`.
    pub lead: &'t str,
    /// The parsed reference.
    pub reference: LinkReference,
    /// Text after the filename, fragment and title through the closing delimiter.
    pub rest: &'t str,
}

impl LinkMatch<'_> {
    /// Reassemble the match around a replacement alt text and filename.
    /// `alt` is ignored for HTML attributes.
    pub fn compose(&self, alt: &str, filename: &str) -> String {
        return match self.reference.syntax {
            LinkSyntax::HtmlAttribute => format!("{}{filename}{}", self.lead, self.rest),
            LinkSyntax::Markdown => format!("{}{alt}]({filename}{}", self.lead, self.rest),
        };
    }
}

/// The compiled link pattern.
pub fn pattern() -> &'static Regex {
    return &LINK_PATTERN;
}

/// Split a capture from [`pattern`] into its parts. Returns `None` only if
/// the capture didn't come from the link pattern.
pub fn parse_capture<'t>(cap: &Captures<'t>) -> Option<LinkMatch<'t>> {
    if let (Some(lead), Some(file), Some(rest)) =
        (cap.name("md_lead"), cap.name("md_file"), cap.name("md_rest"))
    {
        let alt = cap.name("alt").map_or("", |m| m.as_str());
        return Some(LinkMatch {
            alt: Some(alt),
            lead: lead.as_str(),
            reference: LinkReference {
                alt: Some(alt.to_string()),
                filename: file.as_str().to_string(),
                fragment: cap.name("md_fragment").map(|m| m.as_str().to_string()),
                syntax: LinkSyntax::Markdown,
                target: target_text(file.as_str(), rest.as_str(), ')'),
                title: cap.name("title").map(|m| m.as_str().to_string()),
            },
            rest: rest.as_str(),
        });
    }

    let open = cap.name("html_open")?;
    let file = cap.name("html_file")?;
    let rest = cap.name("html_rest")?;
    return Some(LinkMatch {
        alt: None,
        lead: open.as_str(),
        reference: LinkReference {
            alt: None,
            filename: file.as_str().to_string(),
            fragment: cap.name("html_fragment").map(|m| m.as_str().to_string()),
            syntax: LinkSyntax::HtmlAttribute,
            target: target_text(file.as_str(), rest.as_str(), '"'),
            title: None,
        },
        rest: rest.as_str(),
    });
}

/// Raw target: the filename plus everything up to the closing delimiter.
fn target_text(file: &str, rest: &str, close: char) -> String {
    let inner = rest.strip_suffix(close).unwrap_or(rest).trim_end();
    return format!("{file}{inner}");
}

/// All candidate link references in `text`, left to right.
pub fn find_links(text: &str) -> Vec<LinkReference> {
    return pattern()
        .captures_iter(text)
        .filter_map(|cap| parse_capture(&cap).map(|m| m.reference))
        .collect();
}

#[cfg(test)]
#[allow(clippy::missing_panics_doc, clippy::indexing_slicing, reason = "test code")]
mod tests {
    use super::*;

    #[test]
    fn markdown_link_and_image() {
        let links = find_links("See [Guide](guide.md) and ![](logo.png)");
        assert_eq!(links.len(), 2);
        assert_eq!(links[0].alt.as_deref(), Some("Guide"));
        assert_eq!(links[0].filename, "guide.md");
        assert_eq!(links[0].syntax, LinkSyntax::Markdown);
        assert_eq!(links[1].alt.as_deref(), Some(""));
        assert_eq!(links[1].filename, "logo.png");
    }

    #[test]
    fn fragment_and_title_are_separated() {
        let links = find_links(r#"[Setup](install.md#linux "Linux setup")"#);
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].filename, "install.md");
        assert_eq!(links[0].fragment.as_deref(), Some("#linux"));
        assert_eq!(links[0].title.as_deref(), Some(r#" "Linux setup""#));
        assert_eq!(links[0].target, r#"install.md#linux "Linux setup""#);
    }

    #[test]
    fn single_quoted_and_parenthesized_titles() {
        let links = find_links("![a](logo.png 'Logo') [b](guide.md#x (Guide))");
        assert_eq!(links.len(), 2);
        assert_eq!(links[0].title.as_deref(), Some(" 'Logo'"));
        assert_eq!(links[1].fragment.as_deref(), Some("#x"));
        assert_eq!(links[1].title.as_deref(), Some(" (Guide)"));
    }

    #[test]
    fn linked_image_matches_outer_link_with_image_as_alt() {
        let links = find_links("[![x](logo.png)](index.md)");
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].filename, "index.md");
        assert_eq!(links[0].alt.as_deref(), Some("![x](logo.png)"));
    }

    #[test]
    fn plain_brackets_in_alt_do_not_match() {
        assert!(find_links("[a [b] c](guide.md)").is_empty());
    }

    #[test]
    fn html_attributes() {
        let links = find_links(r#"<a href="guide.md#top">x</a> <img src="diagram.svg">"#);
        assert_eq!(links.len(), 2);
        assert_eq!(links[0].syntax, LinkSyntax::HtmlAttribute);
        assert_eq!(links[0].filename, "guide.md");
        assert_eq!(links[0].fragment.as_deref(), Some("#top"));
        assert_eq!(links[1].filename, "diagram.svg");
        assert_eq!(links[1].alt, None);
    }

    #[test]
    fn explicit_paths_and_urls_are_not_candidates() {
        let text = "[a](./guide.md) [b](../img/logo.png) [c](/abs/x.md) \
                    [d](https://example.com/x.md) [e](dir\\x.md) href=\"sub/x.md\"";
        assert!(find_links(text).is_empty());
    }

    #[test]
    fn unrecognized_extensions_are_ignored() {
        let text = "[a](notes.txt) [b](guide.mdx) [c](photo.PNG) [d](archive.tar.gz)";
        assert!(find_links(text).is_empty());
    }

    #[test]
    fn every_listed_extension_matches() {
        for ext in LINKABLE_EXTENSIONS {
            let text = format!("[x](file.{ext})");
            assert_eq!(find_links(&text).len(), 1, "extension {ext}");
        }
    }

    #[test]
    fn multiple_dots_keep_final_extension() {
        let links = find_links("![](chart.v2.webp)");
        assert_eq!(links[0].filename, "chart.v2.webp");
    }
}
