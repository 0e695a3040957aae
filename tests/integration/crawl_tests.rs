//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and test
//! the full crawl cycle end-to-end.

use ripple_crawl::config::{load_config, load_seeds, Config};
use ripple_crawl::crawl;
use ripple_crawl::storage::ResultStore;
use std::collections::BTreeMap;
use std::io::Write;
use std::sync::Arc;
use std::time::Duration;
use tempfile::NamedTempFile;
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration with short timeouts
fn create_test_config(max_depth: u32, follow_external: bool) -> Config {
    let mut config = Config::default();
    config.frontier.max_depth = max_depth;
    config.frontier.max_concurrency = 4;
    config.frontier.max_pool_size = 2;
    config.frontier.publish_queue_size = 4;
    config.crawler.follow_external_links = follow_external;
    config.fetcher.request_timeout_ms = 2000;
    config.fetcher.connect_timeout_ms = 2000;
    config
}

fn html(hrefs: &[&str]) -> String {
    let anchors: String = hrefs
        .iter()
        .map(|href| format!(r#"<a href="{}">{}</a>"#, href, href))
        .collect();
    format!(
        "<html><head><title>Test</title></head><body>{}</body></html>",
        anchors
    )
}

async fn mount_page(server: &MockServer, page: &str, hrefs: &[&str], expected_hits: u64) {
    Mock::given(method("GET"))
        .and(path(page))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(html(hrefs))
                .insert_header("content-type", "text/html"),
        )
        .expect(expected_hits)
        .mount(server)
        .await;
}

fn snapshot(store: &Arc<dyn ResultStore>) -> BTreeMap<String, Vec<String>> {
    serde_json::from_str(&store.dump().expect("dump failed")).expect("dump is not JSON")
}

#[tokio::test]
async fn test_full_crawl_respects_depth() {
    let mock_server = MockServer::start().await;
    let base = mock_server.uri();

    mount_page(&mock_server, "/", &["/a", "/b"], 1).await;
    mount_page(&mock_server, "/a", &["/a1", "/"], 1).await;
    mount_page(&mock_server, "/b", &["/b1", "/a"], 1).await;
    mount_page(&mock_server, "/a1", &[], 0).await;
    mount_page(&mock_server, "/b1", &[], 0).await;

    let (summary, store) = crawl(
        &create_test_config(1, true),
        vec![format!("{}/", base)],
        CancellationToken::new(),
    )
    .await
    .expect("Crawl failed");

    assert_eq!(summary.runs, 1);
    assert_eq!(summary.pages_fetched, 3);
    assert_eq!(summary.pages_failed, 0);

    let results = snapshot(&store);
    assert_eq!(results.len(), 3);
    assert_eq!(
        results[&format!("{}/", base)],
        vec![format!("{}/a", base), format!("{}/b", base)]
    );
    assert_eq!(
        results[&format!("{}/b", base)],
        vec![format!("{}/b1", base), format!("{}/a", base)]
    );
}

#[tokio::test]
async fn test_depth_zero_fetches_only_seed() {
    let mock_server = MockServer::start().await;
    let base = mock_server.uri();

    mount_page(&mock_server, "/", &["/1", "/2", "/3"], 1).await;
    mount_page(&mock_server, "/1", &[], 0).await;

    let (summary, store) = crawl(
        &create_test_config(0, true),
        vec![format!("{}/", base)],
        CancellationToken::new(),
    )
    .await
    .expect("Crawl failed");

    assert_eq!(summary.jobs_dispatched, 1);
    assert_eq!(store.len(), 1);
}

#[tokio::test]
async fn test_seed_without_trailing_slash_fetched_once() {
    let mock_server = MockServer::start().await;
    let base = mock_server.uri();

    mount_page(&mock_server, "/", &["/a"], 1).await;
    mount_page(&mock_server, "/a", &["/"], 1).await;

    // MockServer::uri() has no trailing slash
    let (summary, store) = crawl(
        &create_test_config(3, true),
        vec![base.clone()],
        CancellationToken::new(),
    )
    .await
    .expect("Crawl failed");

    assert_eq!(summary.pages_fetched, 2);

    let results = snapshot(&store);
    assert_eq!(
        results.keys().cloned().collect::<Vec<_>>(),
        vec![format!("{}/", base), format!("{}/a", base)]
    );
}

#[tokio::test]
async fn test_external_links_not_followed() {
    let site = MockServer::start().await;
    let other = MockServer::start().await;

    // Same IP, different host name: a different host for link classification
    let other_port = url::Url::parse(&other.uri()).unwrap().port().unwrap();
    let external = format!("http://localhost:{}/elsewhere", other_port);

    mount_page(&site, "/", &["/inside", external.as_str()], 1).await;
    mount_page(&site, "/inside", &[], 1).await;
    mount_page(&other, "/elsewhere", &[], 0).await;

    let (_, store) = crawl(
        &create_test_config(2, false),
        vec![format!("{}/", site.uri())],
        CancellationToken::new(),
    )
    .await
    .expect("Crawl failed");

    let results = snapshot(&store);
    assert_eq!(
        results[&format!("{}/", site.uri())],
        vec![format!("{}/inside", site.uri())]
    );
    assert!(!results.contains_key(&external));
}

#[tokio::test]
async fn test_external_links_followed() {
    let site = MockServer::start().await;
    let other = MockServer::start().await;

    let other_port = url::Url::parse(&other.uri()).unwrap().port().unwrap();
    let external = format!("http://localhost:{}/elsewhere", other_port);

    mount_page(&site, "/", &[external.as_str()], 1).await;
    mount_page(&other, "/elsewhere", &[], 1).await;

    let (_, store) = crawl(
        &create_test_config(1, true),
        vec![format!("{}/", site.uri())],
        CancellationToken::new(),
    )
    .await
    .expect("Crawl failed");

    assert!(snapshot(&store).contains_key(&external));
}

#[tokio::test]
async fn test_failing_pages_are_isolated() {
    let mock_server = MockServer::start().await;
    let base = mock_server.uri();

    mount_page(&mock_server, "/", &["/broken", "/missing", "/fine"], 1).await;
    mount_page(&mock_server, "/fine", &["/deeper"], 1).await;
    mount_page(&mock_server, "/deeper", &[], 1).await;
    Mock::given(method("GET"))
        .and(path("/broken"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&mock_server)
        .await;

    let (summary, store) = crawl(
        &create_test_config(2, true),
        vec![format!("{}/", base)],
        CancellationToken::new(),
    )
    .await
    .expect("Crawl failed");

    assert_eq!(summary.pages_failed, 2);
    assert_eq!(summary.pages_fetched, 3);

    let results = snapshot(&store);
    assert!(!results.contains_key(&format!("{}/broken", base)));
    assert!(!results.contains_key(&format!("{}/missing", base)));
    assert!(results.contains_key(&format!("{}/deeper", base)));
}

#[tokio::test]
async fn test_seeds_crawled_independently() {
    let mock_server = MockServer::start().await;
    let base = mock_server.uri();

    // Both seeds reach /shared; each run fetches it once
    mount_page(&mock_server, "/one", &["/shared"], 1).await;
    mount_page(&mock_server, "/two", &["/shared"], 1).await;
    mount_page(&mock_server, "/shared", &[], 2).await;

    let (summary, store) = crawl(
        &create_test_config(1, true),
        vec![format!("{}/one", base), format!("{}/two", base)],
        CancellationToken::new(),
    )
    .await
    .expect("Crawl failed");

    assert_eq!(summary.runs, 2);
    assert_eq!(summary.pages_fetched, 4);
    assert_eq!(store.len(), 3);
}

#[tokio::test]
async fn test_cancellation_keeps_completed_results() {
    let mock_server = MockServer::start().await;
    let base = mock_server.uri();

    mount_page(&mock_server, "/", &["/slow"], 1).await;
    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(html(&["/never"]))
                .set_delay(Duration::from_secs(30)),
        )
        .mount(&mock_server)
        .await;
    mount_page(&mock_server, "/never", &[], 0).await;

    let mut config = create_test_config(3, true);
    config.fetcher.request_timeout_ms = 60_000;

    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(500)).await;
        trigger.cancel();
    });

    let started = std::time::Instant::now();
    let (summary, store) = crawl(&config, vec![format!("{}/", base)], cancel)
        .await
        .expect("Crawl failed");

    assert!(started.elapsed() < Duration::from_secs(10));
    assert_eq!(summary.runs_cancelled, 1);

    let results = snapshot(&store);
    assert_eq!(results.len(), 1);
    assert!(results.contains_key(&format!("{}/", base)));
}

#[tokio::test]
async fn test_crawl_from_config_and_seed_files() {
    let mock_server = MockServer::start().await;
    let base = mock_server.uri();

    mount_page(&mock_server, "/", &["/next"], 1).await;
    mount_page(&mock_server, "/next", &[], 1).await;

    let mut seeds_file = NamedTempFile::new().unwrap();
    writeln!(seeds_file, "# test seeds").unwrap();
    writeln!(seeds_file).unwrap();
    writeln!(seeds_file, "  {}/  ", base).unwrap();
    seeds_file.flush().unwrap();

    let mut config_file = NamedTempFile::new().unwrap();
    write!(
        config_file,
        r#"
[frontier]
max-depth = 1
max-concurrency = 2

[crawler]
follow-external-links = false

[seeds]
file = "{}"
"#,
        seeds_file.path().display()
    )
    .unwrap();
    config_file.flush().unwrap();

    let config = load_config(config_file.path()).expect("Failed to load config");
    let seeds = load_seeds(std::path::Path::new(&config.seeds.file)).expect("Failed to load seeds");
    assert_eq!(seeds, vec![format!("{}/", base)]);

    let (summary, store) = crawl(&config, seeds, CancellationToken::new())
        .await
        .expect("Crawl failed");

    assert_eq!(summary.pages_fetched, 2);
    assert_eq!(store.len(), 2);
}

#[tokio::test]
async fn test_dump_is_tab_indented_and_sorted() {
    let mock_server = MockServer::start().await;
    let base = mock_server.uri();

    mount_page(&mock_server, "/", &["/z", "/a"], 1).await;
    mount_page(&mock_server, "/z", &[], 1).await;
    mount_page(&mock_server, "/a", &[], 1).await;

    let (_, store) = crawl(
        &create_test_config(1, true),
        vec![format!("{}/", base)],
        CancellationToken::new(),
    )
    .await
    .expect("Crawl failed");

    let expected = format!(
        "{{\n\t\"{b}/\": [\n\t\t\"{b}/z\",\n\t\t\"{b}/a\"\n\t],\n\t\"{b}/a\": [],\n\t\"{b}/z\": []\n}}",
        b = base
    );
    assert_eq!(store.dump().unwrap(), expected);
}
