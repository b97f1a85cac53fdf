//! Picker core: title matching, link scoring and download planning. No IO.
mod catalog;
mod config;
mod filename;
mod normalize;
mod plan;
pub mod priority;

pub use catalog::{CrawledLink, LinkCatalog, ScoredCandidate};
pub use config::{Config, ConfigError, Language, ListSource, DEFAULT_THROTTLE};
pub use filename::{derive_filename, disambiguate};
pub use normalize::{has_prerelease_marker, NormalizedKey, Normalizer};
pub use plan::{existing_keys, plan, DownloadTask, Plan, TitleKey, TitleSet};
pub use priority::{score, LabelTags, PriorityPolicy};
