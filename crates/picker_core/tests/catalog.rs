use picker_core::{CrawledLink, Config, Language, LinkCatalog, Normalizer};
use pretty_assertions::assert_eq;
use url::Url;

fn link(text: &str, href: &str) -> CrawledLink {
    CrawledLink {
        href: Url::parse(href).unwrap(),
        text: text.to_string(),
    }
}

fn key(text: &str, prerelease: bool) -> picker_core::NormalizedKey {
    Normalizer::new(prerelease).normalize(text).unwrap()
}

fn french() -> Config {
    Config {
        main_language: Language::parse("Fr").unwrap(),
        allow_english: true,
        ..Config::default()
    }
}

#[test]
fn exact_country_beats_europe() {
    let links = vec![
        link("Game (Europe).zip", "https://a.example/eu.zip"),
        link("Game (France).zip", "https://a.example/fr.zip"),
    ];
    let catalog = LinkCatalog::build(&links, &french());

    let entry = catalog.get(&key("Game", false)).unwrap();
    assert_eq!(entry.link.href.as_str(), "https://a.example/fr.zip");
    assert_eq!(entry.priority, 20);
}

#[test]
fn prerelease_links_are_excluded_when_disallowed() {
    let links = vec![link("Game (France) (Beta 2)", "https://a.example/beta.zip")];
    let catalog = LinkCatalog::build(&links, &french());

    assert!(catalog.is_empty());
    assert!(!catalog.contains(&key("Game", false)));
}

#[test]
fn prerelease_links_get_their_own_key_when_allowed() {
    let config = Config {
        allow_prerelease: true,
        ..french()
    };
    let links = vec![
        link("Game (France) (Beta 2)", "https://a.example/beta.zip"),
        link("Game (Europe)", "https://a.example/eu.zip"),
    ];
    let catalog = LinkCatalog::build(&links, &config);

    assert_eq!(catalog.len(), 2);
    assert_eq!(
        catalog.get(&key("Game (Beta 2)", true)).unwrap().link.href.as_str(),
        "https://a.example/beta.zip"
    );
    assert_eq!(
        catalog.get(&key("Game", true)).unwrap().link.href.as_str(),
        "https://a.example/eu.zip"
    );
}

#[test]
fn equal_priority_keeps_first_seen() {
    let links = vec![
        link("Game (USA)", "https://a.example/first.zip"),
        link("Game (USA) (Alt)", "https://b.example/second.zip"),
    ];
    let catalog = LinkCatalog::build(&links, &french());

    let entry = catalog.get(&key("Game", false)).unwrap();
    assert_eq!(entry.link.href.as_str(), "https://a.example/first.zip");
}

#[test]
fn later_strictly_better_candidate_replaces() {
    let links = vec![
        link("Game (USA)", "https://a.example/usa.zip"),
        link("Game (World)", "https://a.example/world.zip"),
        link("Game (Europe) (En,Fr)", "https://a.example/eu.zip"),
    ];
    let catalog = LinkCatalog::build(&links, &french());

    let entry = catalog.get(&key("Game", false)).unwrap();
    assert_eq!(entry.link.href.as_str(), "https://a.example/eu.zip");
    assert_eq!(entry.priority, 20);
}

#[test]
fn unselectable_and_empty_labels_are_dropped() {
    let links = vec![
        link("Game (Japan)", "https://a.example/jp.zip"),
        link("(USA)", "https://a.example/blank.zip"),
        link("Parent Directory", "https://a.example/"),
    ];
    let catalog = LinkCatalog::build(&links, &french());

    assert!(catalog.is_empty());
}
