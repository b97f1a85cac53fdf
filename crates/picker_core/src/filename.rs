use std::path::Path;

use sha2::{Digest, Sha256};
use url::Url;

const MAX_STEM_LEN: usize = 180;
const MAX_EXTENSION_LEN: usize = 8;

/// Windows-safe destination filename for a link label.
///
/// The label's own extension is kept; a label without one borrows the
/// extension of the last URL path segment.
pub fn derive_filename(label: &str, url: &Url) -> String {
    let (stem, extension) = match split_extension(label) {
        Some((stem, ext)) => (stem, Some(ext.to_string())),
        None => (label, url_extension(url)),
    };
    join(&sanitize_stem(stem), extension.as_deref())
}

/// `{stem}--{short_hash(url)}.{ext}`, used when two tasks would share a file.
pub fn disambiguate(filename: &str, url: &Url) -> String {
    let hash = short_hash(url.as_str());
    match split_extension(filename) {
        Some((stem, ext)) => format!("{stem}--{hash}.{ext}"),
        None => format!("{filename}--{hash}"),
    }
}

/// An all-digit suffix is a version number (`Game v1.1`), not an extension.
fn split_extension(name: &str) -> Option<(&str, &str)> {
    let (stem, ext) = name.rsplit_once('.')?;
    let valid = !stem.trim().is_empty()
        && ext.len() <= MAX_EXTENSION_LEN
        && ext.chars().all(|c| c.is_ascii_alphanumeric())
        && ext.chars().any(|c| c.is_ascii_alphabetic());
    valid.then_some((stem, ext))
}

fn url_extension(url: &Url) -> Option<String> {
    let segment = url.path_segments()?.next_back()?;
    let ext = Path::new(segment).extension()?.to_str()?;
    let valid = ext.len() <= MAX_EXTENSION_LEN && ext.chars().all(|c| c.is_ascii_alphanumeric());
    valid.then(|| ext.to_ascii_lowercase())
}

fn join(stem: &str, extension: Option<&str>) -> String {
    match extension {
        Some(ext) => format!("{stem}.{ext}"),
        None => stem.to_string(),
    }
}

fn sanitize_stem(input: &str) -> String {
    let cleaned: String = input
        .chars()
        .map(|c| if is_forbidden(c) { '_' } else { c })
        .collect();
    let cleaned = cleaned.trim_matches(&['_', ' ', '.'][..]);

    let mut compacted = String::with_capacity(cleaned.len());
    let mut prev_underscore = false;
    for c in cleaned.chars() {
        if c == '_' && prev_underscore {
            continue;
        }
        prev_underscore = c == '_';
        compacted.push(c);
    }

    if compacted.len() > MAX_STEM_LEN {
        let mut cut = MAX_STEM_LEN;
        while !compacted.is_char_boundary(cut) {
            cut -= 1;
        }
        compacted.truncate(cut);
        compacted = compacted.trim_end().to_string();
    }
    if compacted.is_empty() {
        compacted = "untitled".to_string();
    }
    if is_reserved_windows_name(&compacted) {
        compacted.push('_');
    }
    compacted
}

fn is_forbidden(c: char) -> bool {
    matches!(c,
        '\\' | '/' | ':' | '*' | '?' | '"' | '<' | '>' | '|' | '\0'..='\u{1F}'
    )
}

fn is_reserved_windows_name(name: &str) -> bool {
    const RESERVED: &[&str] = &[
        "CON", "PRN", "AUX", "NUL", "COM1", "COM2", "COM3", "COM4", "COM5", "COM6", "COM7", "COM8",
        "COM9", "LPT1", "LPT2", "LPT3", "LPT4", "LPT5", "LPT6", "LPT7", "LPT8", "LPT9",
    ];
    RESERVED.iter().any(|r| r.eq_ignore_ascii_case(name))
}

fn short_hash(input: &str) -> String {
    let digest = Sha256::digest(input.as_bytes());
    let mut hex = String::with_capacity(8);
    for byte in digest.iter().take(4) {
        use std::fmt::Write;
        let _ = write!(&mut hex, "{byte:02x}");
    }
    hex
}
