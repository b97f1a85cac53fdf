use std::fmt;

use thiserror::Error;
use url::Url;

pub const DEFAULT_THROTTLE: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("no title lists to process")]
    NoTitleLists,
    #[error("title list '{list}' has no source urls")]
    NoUrls { list: String },
    #[error("title list '{list}' has no source entry in the configuration")]
    UnknownList { list: String },
    #[error("throttle limit must be at least 1")]
    InvalidThrottle,
    #[error("title list '{list}' has an invalid source url '{url}'")]
    InvalidUrl { list: String, url: String },
    #[error("invalid language code '{0}'")]
    InvalidLanguage(String),
}

/// Two-letter language code in title case, e.g. `En`, `Fr`, `Ja`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Language(String);

impl Language {
    pub const ENGLISH: &'static str = "En";
    pub const JAPANESE: &'static str = "Ja";

    pub fn parse(code: &str) -> Result<Self, ConfigError> {
        let trimmed = code.trim();
        if trimmed.len() != 2 || !trimmed.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(ConfigError::InvalidLanguage(code.to_string()));
        }
        let mut chars = trimmed.chars();
        let mut normalized = String::with_capacity(2);
        if let Some(first) = chars.next() {
            normalized.push(first.to_ascii_uppercase());
        }
        normalized.extend(chars.map(|c| c.to_ascii_lowercase()));
        Ok(Self(normalized))
    }

    pub fn code(&self) -> &str {
        &self.0
    }

    pub fn is_english(&self) -> bool {
        self.0 == Self::ENGLISH
    }

    pub fn is_japanese(&self) -> bool {
        self.0 == Self::JAPANESE
    }

    /// Region name used in release tags for the country of this language.
    pub fn country(&self) -> Option<&'static str> {
        let country = match self.0.as_str() {
            "En" => "USA",
            "Ja" => "Japan",
            "Fr" => "France",
            "De" => "Germany",
            "Es" => "Spain",
            "It" => "Italy",
            "Nl" => "Netherlands",
            "Pt" => "Portugal",
            "Sv" => "Sweden",
            "No" => "Norway",
            "Da" => "Denmark",
            "Fi" => "Finland",
            "Pl" => "Poland",
            "Ru" => "Russia",
            "Ko" => "Korea",
            "Zh" => "China",
            "El" => "Greece",
            "Cs" => "Czech",
            "Hu" => "Hungary",
            "Tr" => "Turkey",
            _ => return None,
        };
        Some(country)
    }
}

impl Default for Language {
    fn default() -> Self {
        Self(Self::ENGLISH.to_string())
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Source pages and cross-check policy for one title list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListSource {
    pub name: String,
    pub urls: Vec<Url>,
    pub cross_check: bool,
}

/// Immutable run configuration handed to every component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub main_language: Language,
    pub allow_english: bool,
    pub allow_japanese: bool,
    pub allow_prerelease: bool,
    pub throttle: usize,
    pub sources: Vec<ListSource>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            main_language: Language::default(),
            allow_english: true,
            allow_japanese: false,
            allow_prerelease: false,
            throttle: DEFAULT_THROTTLE,
            sources: Vec::new(),
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.throttle == 0 {
            return Err(ConfigError::InvalidThrottle);
        }
        Ok(())
    }

    /// Source entry for a title list; a list without URLs is a fatal configuration error.
    pub fn source_for(&self, list: &str) -> Result<&ListSource, ConfigError> {
        let source = self
            .sources
            .iter()
            .find(|source| source.name == list)
            .ok_or_else(|| ConfigError::UnknownList {
                list: list.to_string(),
            })?;
        if source.urls.is_empty() {
            return Err(ConfigError::NoUrls {
                list: list.to_string(),
            });
        }
        Ok(source)
    }

    /// English rules apply when English is the main language or an allowed fallback.
    pub fn english_enabled(&self) -> bool {
        self.allow_english || self.main_language.is_english()
    }

    pub fn japanese_enabled(&self) -> bool {
        self.allow_japanese || self.main_language.is_japanese()
    }

    pub fn regional_enabled(&self) -> bool {
        !self.main_language.is_english() && !self.main_language.is_japanese()
    }
}
