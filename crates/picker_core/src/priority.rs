//! Regional and language preference scoring for link labels.
//!
//! A label such as `Game (Europe) (En,Fr,De) [!]` is split into its
//! parenthesized groups and bracketed shorthands once, then an ordered rule
//! table built from the [`Config`] is evaluated top to bottom. The first rule
//! that matches decides the priority; no match yields [`UNSELECTABLE`].

use crate::Config;

/// Priority of a label that fits no enabled rule. Never selected.
pub const UNSELECTABLE: u8 = 0;

pub const EXACT_COUNTRY: u8 = 20;
pub const LANGUAGE_IN_EUROPE: u8 = 20;
pub const LANGUAGE_TAG: u8 = 19;
pub const EUROPE: u8 = 18;
pub const WORLD_REGIONAL: u8 = 17;
pub const USA: u8 = 10;
pub const ENGLISH_TAG: u8 = 10;
pub const WORLD_FALLBACK: u8 = 9;
pub const JAPANESE_FALLBACK: u8 = 1;

/// Tags found in a link label.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LabelTags {
    items: Vec<String>,
    shorthands: Vec<String>,
}

impl LabelTags {
    pub fn parse(text: &str) -> Self {
        let mut tags = Self::default();
        let mut rest = text;
        while let Some(open) = rest.find(['(', '[']) {
            let closing = if rest[open..].starts_with('(') { ')' } else { ']' };
            let body_start = open + 1;
            let Some(len) = rest[body_start..].find(closing) else {
                break;
            };
            let body = &rest[body_start..body_start + len];
            if closing == ')' {
                tags.items.extend(
                    body.split([',', '+'])
                        .map(str::trim)
                        .filter(|item| !item.is_empty())
                        .map(str::to_string),
                );
            } else {
                tags.shorthands.push(body.trim().to_string());
            }
            rest = &rest[body_start + len + 1..];
        }
        tags
    }

    /// A parenthesized group lists this item, e.g. `USA` in `(USA, Europe)`.
    pub fn has_item(&self, item: &str) -> bool {
        self.items.iter().any(|i| i.eq_ignore_ascii_case(item))
    }

    /// A bracketed shorthand marker such as `[U]`.
    pub fn has_shorthand(&self, marker: &str) -> bool {
        self.shorthands.iter().any(|s| s.eq_ignore_ascii_case(marker))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    Item(String),
    ItemWith { item: String, also: String },
    Shorthand(String),
    AnyOf(Vec<Predicate>),
}

impl Predicate {
    fn item(value: &str) -> Self {
        Self::Item(value.to_string())
    }

    fn shorthand(value: &str) -> Self {
        Self::Shorthand(value.to_string())
    }

    pub fn matches(&self, tags: &LabelTags) -> bool {
        match self {
            Predicate::Item(item) => tags.has_item(item),
            Predicate::ItemWith { item, also } => tags.has_item(item) && tags.has_item(also),
            Predicate::Shorthand(marker) => tags.has_shorthand(marker),
            Predicate::AnyOf(options) => options.iter().any(|p| p.matches(tags)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    pub predicate: Predicate,
    pub score: u8,
}

impl Rule {
    fn new(predicate: Predicate, score: u8) -> Self {
        Self { predicate, score }
    }
}

/// Ordered rule table for one configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriorityPolicy {
    rules: Vec<Rule>,
}

impl PriorityPolicy {
    pub fn from_rules(rules: Vec<Rule>) -> Self {
        Self { rules }
    }

    pub fn from_config(config: &Config) -> Self {
        let mut rules = Vec::new();
        let world = || Predicate::AnyOf(vec![Predicate::item("World"), Predicate::shorthand("W")]);

        if config.regional_enabled() {
            let code = config.main_language.code();
            if let Some(country) = config.main_language.country() {
                rules.push(Rule::new(Predicate::item(country), EXACT_COUNTRY));
            }
            rules.push(Rule::new(
                Predicate::ItemWith {
                    item: code.to_string(),
                    also: "Europe".to_string(),
                },
                LANGUAGE_IN_EUROPE,
            ));
            rules.push(Rule::new(Predicate::item(code), LANGUAGE_TAG));
            rules.push(Rule::new(Predicate::item("Europe"), EUROPE));
            rules.push(Rule::new(world(), WORLD_REGIONAL));
        }

        if config.english_enabled() {
            rules.push(Rule::new(
                Predicate::AnyOf(vec![Predicate::item("USA"), Predicate::shorthand("U")]),
                USA,
            ));
            rules.push(Rule::new(Predicate::item("En"), ENGLISH_TAG));
            rules.push(Rule::new(world(), WORLD_FALLBACK));
        }

        if config.japanese_enabled() {
            rules.push(Rule::new(
                Predicate::AnyOf(vec![
                    Predicate::item("Japan"),
                    Predicate::shorthand("J"),
                    Predicate::item("Ja"),
                ]),
                JAPANESE_FALLBACK,
            ));
        }

        Self { rules }
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn score(&self, text: &str) -> u8 {
        let tags = LabelTags::parse(text);
        self.rules
            .iter()
            .find(|rule| rule.predicate.matches(&tags))
            .map_or(UNSELECTABLE, |rule| rule.score)
    }
}

/// Priority of `text` under `config`.
pub fn score(text: &str, config: &Config) -> u8 {
    PriorityPolicy::from_config(config).score(text)
}
