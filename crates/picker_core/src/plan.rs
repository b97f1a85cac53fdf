use std::collections::HashSet;
use std::path::{Path, PathBuf};

use url::Url;

use crate::catalog::LinkCatalog;
use crate::filename::{derive_filename, disambiguate};
use crate::normalize::{NormalizedKey, Normalizer};

/// One file to fetch. Immutable once planned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadTask {
    pub url: Url,
    pub destination: PathBuf,
    pub label: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Plan {
    pub tasks: Vec<DownloadTask>,
    /// Labels of catalog matches already present in the destination.
    pub skipped_existing: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TitleKey {
    pub key: NormalizedKey,
    pub title: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TitleSet {
    /// First occurrence of every key, in input order.
    pub keys: Vec<TitleKey>,
    /// Titles that normalize to nothing and cannot be matched.
    pub rejected: Vec<String>,
}

impl TitleSet {
    pub fn build<'a, I>(titles: I, normalizer: &Normalizer) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut seen = HashSet::new();
        let mut set = Self::default();
        for title in titles {
            match normalizer.normalize(title) {
                Some(key) => {
                    if seen.insert(key.clone()) {
                        set.keys.push(TitleKey {
                            key,
                            title: title.to_string(),
                        });
                    }
                }
                None => set.rejected.push(title.to_string()),
            }
        }
        set
    }

    pub fn ordered_keys(&self) -> Vec<NormalizedKey> {
        self.keys.iter().map(|t| t.key.clone()).collect()
    }
}

/// Keys of files already in the destination directory.
///
/// Names are keyed by their stem so `Game (USA).zip` matches `Game`.
pub fn existing_keys<'a, I>(names: I, normalizer: &Normalizer) -> HashSet<NormalizedKey>
where
    I: IntoIterator<Item = &'a str>,
{
    names
        .into_iter()
        .filter_map(|name| {
            let stem = Path::new(name)
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or(name);
            normalizer.normalize(stem)
        })
        .collect()
}

/// Intersects title keys with the catalog, in title order.
pub fn plan(
    title_keys: &[NormalizedKey],
    catalog: &LinkCatalog,
    existing: &HashSet<NormalizedKey>,
    cross_check: bool,
    destination_dir: &Path,
) -> Plan {
    let mut plan = Plan::default();
    let mut planned = HashSet::new();
    let mut used_names = HashSet::new();
    for key in title_keys {
        let Some(candidate) = catalog.get(key) else {
            continue;
        };
        if !planned.insert(key) {
            continue;
        }
        let label = candidate.link.text.clone();
        if cross_check && existing.contains(key) {
            plan.skipped_existing.push(label);
            continue;
        }
        let mut filename = derive_filename(&label, &candidate.link.href);
        if !used_names.insert(filename.to_lowercase()) {
            filename = disambiguate(&filename, &candidate.link.href);
            used_names.insert(filename.to_lowercase());
        }
        plan.tasks.push(DownloadTask {
            url: candidate.link.href.clone(),
            destination: destination_dir.join(filename),
            label,
        });
    }
    plan
}
