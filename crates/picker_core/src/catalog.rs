use std::collections::HashMap;

use url::Url;

use crate::normalize::{has_prerelease_marker, NormalizedKey, Normalizer};
use crate::priority::{PriorityPolicy, UNSELECTABLE};
use crate::Config;

/// An anchor found on a source page, already resolved against the page URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawledLink {
    pub href: Url,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoredCandidate {
    pub link: CrawledLink,
    pub key: NormalizedKey,
    pub priority: u8,
}

/// Best eligible link per normalized key across every page of one title list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkCatalog {
    entries: HashMap<NormalizedKey, ScoredCandidate>,
}

impl LinkCatalog {
    pub fn build(links: &[CrawledLink], config: &Config) -> Self {
        let normalizer = Normalizer::new(config.allow_prerelease);
        let policy = PriorityPolicy::from_config(config);
        let mut catalog = Self::default();
        for link in links {
            if !config.allow_prerelease && has_prerelease_marker(&link.text) {
                continue;
            }
            let Some(key) = normalizer.normalize(&link.text) else {
                continue;
            };
            let priority = policy.score(&link.text);
            catalog.offer(ScoredCandidate {
                link: link.clone(),
                key,
                priority,
            });
        }
        catalog
    }

    /// Keeps the candidate only if it strictly beats the stored one.
    pub fn offer(&mut self, candidate: ScoredCandidate) -> bool {
        if candidate.priority == UNSELECTABLE {
            return false;
        }
        match self.entries.get(&candidate.key) {
            Some(current) if current.priority >= candidate.priority => false,
            _ => {
                self.entries.insert(candidate.key.clone(), candidate);
                true
            }
        }
    }

    pub fn get(&self, key: &NormalizedKey) -> Option<&ScoredCandidate> {
        self.entries.get(key)
    }

    pub fn contains(&self, key: &NormalizedKey) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
