//! Integration tests for the harvester
//!
//! These tests use wiremock to create mock HTTP servers and run the full
//! fetch → extract → resolve → write cycle end-to-end.

use link_harvester::config::{Config, CrawlerConfig, InputConfig, OutputConfig, UserAgentConfig};
use link_harvester::crawler::{
    build_http_client, crawl_page, download_assets, fetch_page, harvest, links_from_body,
    FetchFailure, LinkAttribute,
};
use link_harvester::output::RECORD_HEADER;
use std::collections::{BTreeSet, HashSet};
use std::io;
use std::path::Path;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;
use tracing_subscriber::fmt::MakeWriter;
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration writing records to `records_path`
fn create_test_config(records_path: &Path) -> Config {
    Config {
        crawler: CrawlerConfig {
            request_timeout: 5,
            connect_timeout: 2,
            ..CrawlerConfig::default()
        },
        user_agent: UserAgentConfig {
            crawler_name: "TestBot".to_string(),
            crawler_version: "1.0.0".to_string(),
            contact_url: None,
        },
        input: InputConfig::default(),
        output: OutputConfig {
            records_path: records_path.to_string_lossy().into_owned(),
            log_path: "harvest.log".to_string(),
            download_dir: "unused".to_string(),
        },
    }
}

fn seed(s: &str) -> Url {
    Url::parse(s).expect("valid seed")
}

/// Mounts a GET handler returning `body` as HTML
async fn mount_page(server: &MockServer, route: &str, body: &str) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(body)
                .insert_header("content-type", "text/html"),
        )
        .mount(server)
        .await;
}

/// Reads the record file, checks the header and returns the data rows
fn read_rows(path: &Path) -> Vec<String> {
    let content = std::fs::read_to_string(path).expect("record file exists");
    assert!(
        content.starts_with(RECORD_HEADER),
        "record file must start with the header"
    );
    content[RECORD_HEADER.len()..]
        .lines()
        .map(str::to_string)
        .collect()
}

fn rows_for<'a>(rows: &'a [String], source: &str) -> Vec<&'a str> {
    rows.iter()
        .map(String::as_str)
        .filter(|row| row.split('\t').next() == Some(source))
        .collect()
}

/// Log writer that keeps everything in memory
#[derive(Clone, Default)]
struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl CapturedLogs {
    fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for CapturedLogs {
    type Writer = CapturedLogs;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

#[tokio::test]
async fn test_completeness_relative_and_absolute() {
    let mock_server = MockServer::start().await;
    mount_page(
        &mock_server,
        "/",
        r#"<html><body><a href="/b">B</a> <a href="http://c.test/d">D</a></body></html>"#,
    )
    .await;

    let dir = TempDir::new().unwrap();
    let records = dir.path().join("found.tsv");
    let config = create_test_config(&records);

    let source = format!("{}/", mock_server.uri());
    let summary = harvest(&config, BTreeSet::from([seed(&source)]))
        .await
        .expect("harvest runs");

    let mut rows = read_rows(&records);
    rows.sort();
    let mut expected = vec![
        format!("{}\t{}b", source, source),
        format!("{}\thttp://c.test/d", source),
    ];
    expected.sort();

    assert_eq!(rows, expected);
    assert_eq!(summary.pages_harvested, 1);
    assert_eq!(summary.rows_written, 2);
}

#[tokio::test]
async fn test_duplicate_links_written_once() {
    let mock_server = MockServer::start().await;
    mount_page(
        &mock_server,
        "/dupes",
        r#"
        <a href="/x">1</a><a href="/x">2</a><a href="x">3</a>
        <a href="/y">4</a><a href="/y">5</a>
        "#,
    )
    .await;

    let dir = TempDir::new().unwrap();
    let records = dir.path().join("found.tsv");
    let config = create_test_config(&records);

    let source = format!("{}/dupes", mock_server.uri());
    harvest(&config, BTreeSet::from([seed(&source)]))
        .await
        .unwrap();

    let rows = read_rows(&records);
    let targets: Vec<&str> = rows
        .iter()
        .map(|row| row.split('\t').nth(1).unwrap())
        .collect();
    let unique: HashSet<&str> = targets.iter().copied().collect();

    assert_eq!(targets.len(), unique.len(), "targets must be unique");
    assert_eq!(unique.len(), 2);
}

#[tokio::test]
async fn test_failures_are_isolated() {
    let mock_server = MockServer::start().await;
    let base = mock_server.uri();

    mount_page(&mock_server, "/ok1", r#"<a href="/from-ok1">x</a>"#).await;
    mount_page(&mock_server, "/ok2", r#"<a href="/from-ok2">x</a><a href="/more">y</a>"#).await;
    Mock::given(method("GET"))
        .and(path("/broken"))
        .respond_with(ResponseTemplate::new(500).set_body_string(r#"<a href="/never">x</a>"#))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().unwrap();
    let records = dir.path().join("found.tsv");
    let config = create_test_config(&records);

    let seeds = BTreeSet::from([
        seed(&format!("{}/ok1", base)),
        seed(&format!("{}/broken", base)),
        seed(&format!("{}/missing", base)),
        seed("http://127.0.0.1:1/unreachable"),
        seed(&format!("{}/ok2", base)),
    ]);
    let summary = harvest(&config, seeds).await.unwrap();

    let rows = read_rows(&records);
    assert_eq!(rows_for(&rows, &format!("{}/ok1", base)).len(), 1);
    assert_eq!(rows_for(&rows, &format!("{}/ok2", base)).len(), 2);
    assert!(rows_for(&rows, &format!("{}/broken", base)).is_empty());
    assert!(rows_for(&rows, &format!("{}/missing", base)).is_empty());
    assert!(rows_for(&rows, "http://127.0.0.1:1/unreachable").is_empty());
    assert_eq!(rows.len(), 3);

    assert_eq!(summary.seeds, 5);
    assert_eq!(summary.pages_harvested, 2);
    assert_eq!(summary.pages_failed, 3);
    assert_eq!(summary.rows_written, 3);
}

#[tokio::test]
async fn test_malformed_link_is_not_fatal() {
    let mock_server = MockServer::start().await;
    mount_page(
        &mock_server,
        "/mixed",
        r#"<a href="/good1">1</a><a href="http://[bad">bad</a><a href="/good2">2</a><a href="https://other.test/good3">3</a>"#,
    )
    .await;

    let dir = TempDir::new().unwrap();
    let records = dir.path().join("found.tsv");
    let config = create_test_config(&records);

    let source = format!("{}/mixed", mock_server.uri());
    let summary = harvest(&config, BTreeSet::from([seed(&source)]))
        .await
        .unwrap();

    let rows = read_rows(&records);
    assert_eq!(rows.len(), 3);
    assert!(rows.iter().all(|row| !row.contains("[bad")));
    assert_eq!(summary.pages_failed, 0);
}

#[tokio::test]
async fn test_page_without_links_writes_nothing() {
    let mock_server = MockServer::start().await;
    mount_page(&mock_server, "/plain", "<html><body>No links</body></html>").await;

    let dir = TempDir::new().unwrap();
    let records = dir.path().join("found.tsv");
    let config = create_test_config(&records);

    let summary = harvest(
        &config,
        BTreeSet::from([seed(&format!("{}/plain", mock_server.uri()))]),
    )
    .await
    .unwrap();

    assert!(read_rows(&records).is_empty());
    assert_eq!(summary.pages_empty, 1);
    assert_eq!(summary.pages_failed, 0);
}

#[tokio::test]
async fn test_concurrent_seeds_produce_union() {
    let mock_server = MockServer::start().await;
    let base = mock_server.uri();

    let body1: String = (0..40)
        .map(|i| format!(r#"<a href="/one/{}">x</a>"#, i))
        .collect();
    let body2: String = (0..40)
        .map(|i| format!(r#"<a href="https://two.test/{}">x</a>"#, i))
        .collect();
    mount_page(&mock_server, "/s1", &body1).await;
    mount_page(&mock_server, "/s2", &body2).await;

    let s1 = seed(&format!("{}/s1", base));
    let s2 = seed(&format!("{}/s2", base));

    // Records each seed produces on its own
    let mut expected: Vec<String> = Vec::new();
    for (source, body) in [(&s1, &body1), (&s2, &body2)] {
        for target in links_from_body(source, body, LinkAttribute::Href) {
            expected.push(format!("{}\t{}", source, target));
        }
    }
    expected.sort();

    let dir = TempDir::new().unwrap();
    let records = dir.path().join("found.tsv");
    let config = create_test_config(&records);
    harvest(&config, BTreeSet::from([s1.clone(), s2.clone()]))
        .await
        .unwrap();

    let rows = read_rows(&records);

    // Each source's rows are one contiguous block
    let first_s2 = rows
        .iter()
        .position(|row| row.starts_with(&format!("{}\t", s2)))
        .unwrap();
    let first_s1 = rows
        .iter()
        .position(|row| row.starts_with(&format!("{}\t", s1)))
        .unwrap();
    let (first, second) = if first_s1 < first_s2 {
        (s1.as_str(), s2.as_str())
    } else {
        (s2.as_str(), s1.as_str())
    };
    let boundary = rows
        .iter()
        .position(|row| row.starts_with(&format!("{}\t", second)))
        .unwrap();
    assert!(rows[..boundary]
        .iter()
        .all(|row| row.starts_with(&format!("{}\t", first))));
    assert!(rows[boundary..]
        .iter()
        .all(|row| row.starts_with(&format!("{}\t", second))));

    let mut actual = rows.clone();
    actual.sort();
    assert_eq!(actual, expected);
}

#[tokio::test]
async fn test_concurrency_limit_still_completes_all() {
    let mock_server = MockServer::start().await;
    let base = mock_server.uri();
    for i in 0..6 {
        mount_page(
            &mock_server,
            &format!("/p{}", i),
            &format!(r#"<a href="/target/{}">x</a>"#, i),
        )
        .await;
    }

    let dir = TempDir::new().unwrap();
    let records = dir.path().join("found.tsv");
    let mut config = create_test_config(&records);
    config.crawler.max_concurrent_tasks = Some(2);

    let seeds: BTreeSet<Url> = (0..6).map(|i| seed(&format!("{}/p{}", base, i))).collect();
    let summary = harvest(&config, seeds).await.unwrap();

    assert_eq!(summary.pages_harvested, 6);
    assert_eq!(read_rows(&records).len(), 6);
}

#[tokio::test]
async fn test_http_500_logs_one_error() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/fail"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let logs = CapturedLogs::default();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(logs.clone())
        .with_ansi(false)
        .with_max_level(tracing::Level::DEBUG)
        .finish();
    let _guard = tracing::subscriber::set_default(subscriber);

    let dir = TempDir::new().unwrap();
    let records = dir.path().join("found.tsv");
    let config = create_test_config(&records);

    let failing = format!("{}/fail", mock_server.uri());
    let summary = harvest(&config, BTreeSet::from([seed(&failing)]))
        .await
        .unwrap();

    assert!(read_rows(&records).is_empty());
    assert_eq!(summary.pages_failed, 1);

    let output = logs.contents();
    let error_lines: Vec<&str> = output
        .lines()
        .filter(|line| line.contains("ERROR") && line.contains("link_harvester"))
        .collect();
    assert_eq!(error_lines.len(), 1, "logs were:\n{}", output);
    assert!(error_lines[0].contains(&failing));
    assert!(error_lines[0].contains("500"));
}

#[tokio::test]
async fn test_record_file_written_even_when_everything_fails() {
    let dir = TempDir::new().unwrap();
    let records = dir.path().join("found.tsv");
    std::fs::write(&records, "old data from a previous run\n").unwrap();
    let config = create_test_config(&records);

    let summary = harvest(&config, BTreeSet::from([seed("http://127.0.0.1:1/")]))
        .await
        .unwrap();

    assert_eq!(std::fs::read_to_string(&records).unwrap(), RECORD_HEADER);
    assert_eq!(summary.pages_failed, 1);
}

#[tokio::test]
async fn test_fetch_page_status_handling() {
    let mock_server = MockServer::start().await;
    mount_page(&mock_server, "/ok", "hello").await;
    Mock::given(method("GET"))
        .and(path("/teapot"))
        .respond_with(ResponseTemplate::new(418).set_body_string("short and stout"))
        .mount(&mock_server)
        .await;

    let client = build_http_client(&CrawlerConfig::default(), &UserAgentConfig::default()).unwrap();

    let ok = seed(&format!("{}/ok", mock_server.uri()));
    assert_eq!(fetch_page(&client, &ok).await.unwrap(), "hello");

    let teapot = seed(&format!("{}/teapot", mock_server.uri()));
    let err = fetch_page(&client, &teapot).await.unwrap_err();
    assert_eq!(
        err,
        FetchFailure::Protocol {
            url: teapot.to_string(),
            status: 418,
        }
    );
}

#[tokio::test]
async fn test_redirects_are_followed() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/old"))
        .respond_with(
            ResponseTemplate::new(301)
                .insert_header("location", format!("{}/new", mock_server.uri()).as_str()),
        )
        .mount(&mock_server)
        .await;
    mount_page(&mock_server, "/new", r#"<a href="/landed">x</a>"#).await;

    let client = build_http_client(&CrawlerConfig::default(), &UserAgentConfig::default()).unwrap();
    let old = seed(&format!("{}/old", mock_server.uri()));

    let links = crawl_page(&client, &old, LinkAttribute::Href)
        .await
        .into_links();

    // Relative links resolve against the seed URL
    let expected = format!("{}/landed", mock_server.uri());
    assert_eq!(
        links.iter().map(Url::as_str).collect::<Vec<_>>(),
        vec![expected.as_str()]
    );
}

#[tokio::test]
async fn test_srcset_harvest() {
    let mock_server = MockServer::start().await;
    mount_page(
        &mock_server,
        "/gallery",
        r#"<img srcset="/img/a.jpg 480w, /img/a-big.jpg 1080w"><a href="/not-an-image">x</a>"#,
    )
    .await;

    let dir = TempDir::new().unwrap();
    let records = dir.path().join("found.tsv");
    let mut config = create_test_config(&records);
    config.crawler.link_attribute = LinkAttribute::Srcset;

    let source = format!("{}/gallery", mock_server.uri());
    harvest(&config, BTreeSet::from([seed(&source)]))
        .await
        .unwrap();

    assert_eq!(
        read_rows(&records),
        vec![format!("{}\t{}/img/a.jpg", source, mock_server.uri())]
    );
}

#[tokio::test]
async fn test_download_assets() {
    let mock_server = MockServer::start().await;
    let base = mock_server.uri();

    mount_page(
        &mock_server,
        "/gallery",
        r#"
        <img srcset="/img/cat.png 1x, /img/cat@2x.png 2x">
        <img srcset="/img/missing.png">
        <img srcset="data:image/png;base64,AAAA">
        "#,
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/img/cat.png"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![0x89, b'P', b'N', b'G']))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/img/missing.png"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let client = build_http_client(&CrawlerConfig::default(), &UserAgentConfig::default()).unwrap();
    let dir = TempDir::new().unwrap();
    let target = dir.path().join("downloaded");

    let seeds = BTreeSet::from([seed(&format!("{}/gallery", base))]);
    let summary = download_assets(&client, &seeds, LinkAttribute::Srcset, &target)
        .await
        .unwrap();

    assert_eq!(summary.pages, 1);
    assert_eq!(summary.assets, 2);
    assert_eq!(summary.files_written, 1);
    assert_eq!(summary.failures, 1);
    assert_eq!(summary.skipped, 1);
    assert_eq!(
        std::fs::read(target.join("cat.png")).unwrap(),
        vec![0x89, b'P', b'N', b'G']
    );
    assert!(!target.join("missing.png").exists());
}
