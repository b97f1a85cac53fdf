use std::fs;
use std::sync::{mpsc, Arc, Once};
use std::time::Duration;

use picker_core::{Config, ConfigError, Language, ListSource};
use picker_engine::{
    ChannelSink, FetchSettings, ListSummary, Outcome, PickerEvent, Pipeline, PipelineError,
    ReqwestFetcher, TaskReport, TitleList,
};
use pretty_assertions::assert_eq;
use tempfile::TempDir;
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

static INIT: Once = Once::new();

const LISTING: &str = r#"<html><body><pre>
<a href="../">Parent directory/</a>
<a href="files/red-jp.zip">Pokemon Red (Japan).zip</a>
<a href="files/red-usa.zip">Pokemon Red (USA).zip</a>
<a href="files/tetris-beta.zip">Tetris (World) (Beta 2).zip</a>
<a href="http://[broken/x.zip">Broken (USA).zip</a>
</pre></body></html>"#;

const SECOND_LISTING: &str = r#"<a href="/mirror/tetris.zip">Tetris (World).zip</a>"#;

async fn serve(server: &MockServer, route: &str, body: &str, mime: &str, expected: u64) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body.to_string(), mime))
        .expect(expected)
        .mount(server)
        .await;
}

async fn gb_server(file_requests: u64, red_requests: u64) -> MockServer {
    let server = MockServer::start().await;
    serve(&server, "/gb/", LISTING, "text/html", 1).await;
    serve(&server, "/gb3/", SECOND_LISTING, "text/html; charset=utf-8", 1).await;
    Mock::given(method("GET"))
        .and(path("/gb2/"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    serve(&server, "/gb/files/red-usa.zip", "red", "application/zip", red_requests).await;
    serve(&server, "/mirror/tetris.zip", "tetris", "application/zip", file_requests).await;
    serve(&server, "/gb/files/red-jp.zip", "jp", "application/zip", 0).await;
    serve(&server, "/gb/files/tetris-beta.zip", "beta", "application/zip", 0).await;
    server
}

fn config(server: &MockServer, cross_check: bool) -> Config {
    let page = |p: &str| Url::parse(&format!("{}{p}", server.uri())).unwrap();
    Config {
        main_language: Language::parse("En").unwrap(),
        allow_english: true,
        throttle: 2,
        sources: vec![
            ListSource {
                name: "gb".to_string(),
                urls: vec![page("/gb/"), page("/gb2/"), page("/gb3/")],
                cross_check,
            },
            ListSource {
                name: "empty".to_string(),
                urls: Vec::new(),
                cross_check: false,
            },
        ],
        ..Config::default()
    }
}

fn gb_titles() -> TitleList {
    TitleList {
        name: "gb".to_string(),
        titles: ["Pokemon Red", "Tetris", "Zelda Missing", "The", "pokemon red"]
            .map(String::from)
            .to_vec(),
    }
}

fn pipeline(config: Config, dry_run: bool) -> (Pipeline, mpsc::Receiver<PickerEvent>) {
    INIT.call_once(picker_logging::initialize_for_tests);
    let (tx, rx) = mpsc::channel();
    let pipeline = Pipeline::with_fetchers(
        Arc::new(config),
        Arc::new(ReqwestFetcher::new(FetchSettings::for_pages())),
        Arc::new(ReqwestFetcher::new(FetchSettings::for_downloads())),
        Arc::new(ChannelSink::new(tx)),
        Duration::from_secs(10),
        dry_run,
    );
    (pipeline, rx)
}

fn has_event(events: &[PickerEvent], wanted: impl Fn(&PickerEvent) -> bool) -> bool {
    events.iter().any(wanted)
}

#[tokio::test]
async fn downloads_best_match_per_title() {
    let server = gb_server(1, 1).await;
    let dest = TempDir::new().unwrap();
    let (pipeline, events) = pipeline(config(&server, false), false);

    let summaries = pipeline.run(&[gb_titles()], dest.path()).await.unwrap();

    assert_eq!(
        summaries,
        vec![ListSummary {
            name: "gb".to_string(),
            matched: 2,
            unmatched: 1,
            skipped: 0,
            planned: 2,
            downloaded: 2,
            failed: 0,
        }]
    );
    let gb = dest.path().join("gb");
    assert_eq!(fs::read_to_string(gb.join("Pokemon Red (USA).zip")).unwrap(), "red");
    assert_eq!(fs::read_to_string(gb.join("Tetris (World).zip")).unwrap(), "tetris");

    let events: Vec<PickerEvent> = events.try_iter().collect();
    assert!(has_event(&events, |e| matches!(
        e,
        PickerEvent::PageFetchFailed { url, .. } if url.ends_with("/gb2/")
    )));
    assert!(has_event(&events, |e| matches!(
        e,
        PickerEvent::LinkUnresolved { href, .. } if href == "http://[broken/x.zip"
    )));
    assert!(has_event(&events, |e| matches!(
        e,
        PickerEvent::NoMatch { title, .. } if title == "Zelda Missing"
    )));
    assert!(has_event(&events, |e| matches!(
        e,
        PickerEvent::TitleRejected { title, .. } if title == "The"
    )));
}

#[tokio::test]
async fn cross_check_skips_titles_already_on_disk() {
    let server = gb_server(1, 0).await;
    let dest = TempDir::new().unwrap();
    let gb = dest.path().join("gb");
    fs::create_dir_all(&gb).unwrap();
    fs::write(gb.join("Pokemon Red (Europe).zip"), "old").unwrap();
    let (pipeline, events) = pipeline(config(&server, true), false);

    let summaries = pipeline.run(&[gb_titles()], dest.path()).await.unwrap();

    assert_eq!(summaries[0].skipped, 1);
    assert_eq!(summaries[0].downloaded, 1);
    assert!(!gb.join("Pokemon Red (USA).zip").exists());
    let events: Vec<PickerEvent> = events.try_iter().collect();
    assert!(events.contains(&PickerEvent::Task(TaskReport {
        label: "Pokemon Red (USA).zip".to_string(),
        outcome: Outcome::SkippedExisting,
    })));
}

#[tokio::test]
async fn dry_run_plans_without_downloading() {
    let server = gb_server(0, 0).await;
    let dest = TempDir::new().unwrap();
    let (pipeline, events) = pipeline(config(&server, false), true);

    let summaries = pipeline.run(&[gb_titles()], dest.path()).await.unwrap();

    assert_eq!(summaries[0].planned, 2);
    assert_eq!(summaries[0].downloaded, 0);
    let planned: Vec<String> = events
        .try_iter()
        .filter_map(|e| match e {
            PickerEvent::Planned(task) => Some(task.label),
            _ => None,
        })
        .collect();
    assert_eq!(
        planned,
        vec!["Pokemon Red (USA).zip".to_string(), "Tetris (World).zip".to_string()]
    );
    assert!(!dest.path().join("gb").exists());
}

#[tokio::test]
async fn list_without_urls_stops_the_run() {
    let server = MockServer::start().await;
    let dest = TempDir::new().unwrap();
    let (pipeline, _events) = pipeline(config(&server, false), false);
    let lists = vec![
        gb_titles(),
        TitleList {
            name: "empty".to_string(),
            titles: vec!["Anything".to_string()],
        },
    ];

    let err = pipeline.run(&lists, dest.path()).await.unwrap_err();
    assert!(matches!(
        err,
        PipelineError::Config(ConfigError::NoUrls { ref list }) if list == "empty"
    ));
}

#[tokio::test]
async fn no_title_lists_stops_the_run() {
    let server = MockServer::start().await;
    let dest = TempDir::new().unwrap();
    let (pipeline, _events) = pipeline(config(&server, false), false);

    let err = pipeline.run(&[], dest.path()).await.unwrap_err();
    assert!(matches!(err, PipelineError::Config(ConfigError::NoTitleLists)));
}
