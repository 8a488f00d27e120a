//! Lexical path arithmetic and URL escaping for rewritten link targets.

use std::borrow::Cow;
use std::path::{Component, Path, PathBuf};

/// Collapse `.` and `..` components in a path without touching the filesystem.
/// Preserves leading `..` when there is nothing left to pop.
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut components: Vec<Component<'_>> = Vec::new();
    for component in path.components() {
        push_normalized_component(&mut components, component);
    }
    return components.iter().collect();
}

/// Handle a single path component during normalization.
/// Pops the last component for `..` when possible, preserves it otherwise.
fn push_normalized_component<'a>(components: &mut Vec<Component<'a>>, component: Component<'a>) {
    match component {
        Component::CurDir => {},
        Component::ParentDir => {
            let can_pop = matches!(components.last(), Some(Component::Normal(_)));
            let at_root = matches!(components.last(), Some(Component::RootDir | Component::Prefix(_)));
            if can_pop {
                components.pop();
            } else if !at_root {
                components.push(component);
            }
        },
        other => components.push(other),
    }
}

/// Path of `target` relative to the directory containing `document`, with
/// `/` separators on every platform and each segment percent-encoded.
///
/// `relative_link("/docs/a/b.md", "/docs/c/d.png")` is `"../c/d.png"`.
pub fn relative_link(document: &Path, target: &Path) -> String {
    let document = normalize_path(document);
    let target = normalize_path(target);
    let from: Vec<Component<'_>> = document
        .parent()
        .map(|dir| dir.components().collect())
        .unwrap_or_default();
    let to: Vec<Component<'_>> = target.components().collect();

    let common = from
        .iter()
        .zip(to.iter())
        .take_while(|(a, b)| a == b)
        .count();

    let mut segments: Vec<String> = Vec::new();
    for _ in common..from.len() {
        segments.push("..".to_string());
    }
    for component in to.iter().skip(common) {
        let segment = component.as_os_str().to_string_lossy();
        segments.push(percent_encode_segment(&segment));
    }

    return segments.join("/");
}

/// Bytes left as-is in a path segment: RFC 3986 unreserved characters.
const fn is_unreserved(byte: u8) -> bool {
    return byte.is_ascii_alphanumeric() || matches!(byte, b'-' | b'.' | b'_' | b'~');
}

/// Percent-encode one path segment. Unreserved characters pass through,
/// every other byte becomes `%XX` with uppercase hex.
pub fn percent_encode_segment(segment: &str) -> String {
    let mut out = String::with_capacity(segment.len());
    for byte in segment.bytes() {
        if is_unreserved(byte) {
            out.push(char::from(byte));
        } else {
            out.push('%');
            out.push(hex_digit(byte >> 4));
            out.push(hex_digit(byte & 0x0F));
        }
    }
    return out;
}

/// Uppercase hex digit for the low nibble of `nibble`.
fn hex_digit(nibble: u8) -> char {
    return char::from_digit(u32::from(nibble & 0x0F), 16)
        .unwrap_or('0')
        .to_ascii_uppercase();
}

/// Decode `%XX` escapes. Malformed escapes are kept verbatim, and a decoded
/// sequence that isn't valid UTF-8 is replaced lossily.
pub fn percent_decode(text: &str) -> Cow<'_, str> {
    if !text.contains('%') {
        return Cow::Borrowed(text);
    }

    let bytes = text.as_bytes();
    let mut out: Vec<u8> = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while let Some(&byte) = bytes.get(i) {
        let escaped = (byte == b'%')
            .then(|| bytes.get(i.saturating_add(1)..i.saturating_add(3)))
            .flatten()
            .and_then(decode_hex_pair);
        if let Some(decoded) = escaped {
            out.push(decoded);
            i = i.saturating_add(3);
        } else {
            out.push(byte);
            i = i.saturating_add(1);
        }
    }

    return Cow::Owned(String::from_utf8_lossy(&out).into_owned());
}

/// Two ASCII hex digits to the byte they spell.
fn decode_hex_pair(pair: &[u8]) -> Option<u8> {
    let &[hi, lo] = pair else {
        return None;
    };
    let hi = char::from(hi).to_digit(16)?;
    let lo = char::from(lo).to_digit(16)?;
    return u8::try_from(hi.checked_mul(16)?.checked_add(lo)?).ok();
}
