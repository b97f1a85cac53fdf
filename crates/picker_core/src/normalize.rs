use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

static PRERELEASE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[(\[]\s*((?:beta|demo|proto|rev)(?:\s*\d+)?)\s*[)\]]").unwrap()
});
static DISC_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[(\[]\s*(disc\s*\d+)\s*[)\]]").unwrap());

const ARTICLES: &[&str] = &["the", "of", "or", "is", "a", "an"];

/// Canonical comparison key for a title or link label. Never empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NormalizedKey(String);

impl NormalizedKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NormalizedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// True when the text carries a bracketed beta/demo/proto/rev marker.
pub fn has_prerelease_marker(text: &str) -> bool {
    PRERELEASE_REGEX.is_match(&text.to_lowercase())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Normalizer {
    prerelease: bool,
}

impl Normalizer {
    /// `prerelease` keeps beta/demo/proto/rev markers as part of the key.
    pub fn new(prerelease: bool) -> Self {
        Self { prerelease }
    }

    /// Returns `None` when nothing usable is left after normalization.
    pub fn normalize(&self, text: &str) -> Option<NormalizedKey> {
        let lower = text.to_lowercase();

        let prerelease_tag = if self.prerelease {
            capture_tag(&PRERELEASE_REGEX, &lower)
        } else {
            None
        };
        let disc_tag = capture_tag(&DISC_REGEX, &lower);

        let head = match lower.find('(') {
            Some(idx) => &lower[..idx],
            None => lower.as_str(),
        };

        let mut key: String = head
            .split(' ')
            .filter(|token| !ARTICLES.contains(token))
            .flat_map(str::chars)
            .filter(|c| c.is_alphanumeric())
            .collect();
        // A core that spells an article would vanish on a second pass.
        if ARTICLES.contains(&key.as_str()) {
            key.clear();
        }
        key.extend(prerelease_tag);
        key.extend(disc_tag);

        if key.is_empty() {
            None
        } else {
            Some(NormalizedKey(key))
        }
    }
}

fn capture_tag(regex: &Regex, text: &str) -> Option<String> {
    regex.captures(text).and_then(|caps| caps.get(1)).map(|tag| {
        tag.as_str()
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect()
    })
}
