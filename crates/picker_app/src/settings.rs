//! Run configuration file.
//!
//! ```ron
//! (
//!     main_language: "Fr",
//!     allow_english: true,
//!     lists: {
//!         "gb": (urls: ["https://roms.example/gb/"], cross_check: true),
//!     },
//! )
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use anyhow::Context;
use picker_core::{Config, ConfigError, Language, ListSource, DEFAULT_THROTTLE};
use serde::Deserialize;
use url::Url;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
struct Settings {
    main_language: String,
    allow_english: bool,
    allow_japanese: bool,
    allow_prerelease: bool,
    throttle: usize,
    lists: BTreeMap<String, ListSettings>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            main_language: Language::ENGLISH.to_string(),
            allow_english: true,
            allow_japanese: false,
            allow_prerelease: false,
            throttle: DEFAULT_THROTTLE,
            lists: BTreeMap::new(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct ListSettings {
    urls: Vec<String>,
    cross_check: bool,
}

pub(crate) fn load(path: &Path) -> anyhow::Result<Config> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("could not read config file {}", path.display()))?;
    parse(&text).with_context(|| format!("invalid config file {}", path.display()))
}

fn parse(text: &str) -> anyhow::Result<Config> {
    let settings: Settings = ron::from_str(text)?;
    Ok(into_config(settings)?)
}

fn into_config(settings: Settings) -> Result<Config, ConfigError> {
    let sources = settings
        .lists
        .into_iter()
        .map(|(name, list)| {
            let urls = list
                .urls
                .iter()
                .map(|raw| {
                    Url::parse(raw.trim()).map_err(|_| ConfigError::InvalidUrl {
                        list: name.clone(),
                        url: raw.clone(),
                    })
                })
                .collect::<Result<Vec<_>, _>>()?;
            Ok(ListSource {
                name,
                urls,
                cross_check: list.cross_check,
            })
        })
        .collect::<Result<Vec<_>, ConfigError>>()?;

    let config = Config {
        main_language: Language::parse(&settings.main_language)?,
        allow_english: settings.allow_english,
        allow_japanese: settings.allow_japanese,
        allow_prerelease: settings.allow_prerelease,
        throttle: settings.throttle,
        sources,
    };
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn full_file_is_converted() {
        let config = parse(
            r#"(
                main_language: "fr",
                allow_english: false,
                allow_japanese: true,
                throttle: 8,
                lists: {
                    "gb": (urls: ["https://roms.example/gb/", "https://mirror.example/gb/"], cross_check: true),
                    "nes": (urls: ["https://roms.example/nes/"]),
                },
            )"#,
        )
        .unwrap();

        assert_eq!(config.main_language.code(), "Fr");
        assert!(!config.allow_english);
        assert!(config.allow_japanese);
        assert!(!config.allow_prerelease);
        assert_eq!(config.throttle, 8);
        assert_eq!(config.sources.len(), 2);
        assert_eq!(config.sources[0].name, "gb");
        assert!(config.sources[0].cross_check);
        assert_eq!(config.sources[0].urls.len(), 2);
        assert!(!config.sources[1].cross_check);
    }

    #[test]
    fn defaults_apply_to_missing_fields() {
        let config = parse("(allow_japanese: false)").unwrap();
        assert_eq!(config.main_language.code(), "En");
        assert_eq!(config.throttle, DEFAULT_THROTTLE);
        assert!(config.sources.is_empty());
    }

    #[test]
    fn bad_values_are_rejected() {
        assert!(parse(r#"(throttle: 0)"#).is_err());
        assert!(parse(r#"(main_language: "French")"#).is_err());
        let err = parse(r#"(lists: { "gb": (urls: ["not a url"]) })"#).unwrap_err();
        assert_eq!(
            err.downcast_ref::<ConfigError>(),
            Some(&ConfigError::InvalidUrl {
                list: "gb".to_string(),
                url: "not a url".to_string()
            })
        );
    }
}
