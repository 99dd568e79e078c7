//! Integration tests for the crawler
//!
//! These tests use wiremock to serve synthetic timelines over HTTP and run
//! the full locate-crawl-write cycle end-to-end.

use chrono::{DateTime, Duration as ChronoDuration, TimeZone, Utc};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use timeline_corpus::config::{parse_config, Config};
use timeline_corpus::crawler::{Coordinator, InstantSleeper};
use timeline_corpus::output::{parse_record, FileCorpusWriter, ParsedRecord};
use timeline_corpus::{AccountState, HttpFeedClient};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

const TIMELINE_PATH: &str = "/1.1/statuses/user_timeline.json";

/// Serves `user_timeline.json` pages from in-memory feeds
struct TimelineResponder {
    feeds: HashMap<String, Vec<Value>>,
}

impl Respond for TimelineResponder {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let query: HashMap<String, String> = request.url.query_pairs().into_owned().collect();
        let account = query.get("screen_name").cloned().unwrap_or_default();
        let page: usize = query.get("page").and_then(|p| p.parse().ok()).unwrap_or(1);
        let count: usize = query.get("count").and_then(|c| c.parse().ok()).unwrap_or(20);

        let Some(feed) = self.feeds.get(&account) else {
            return ResponseTemplate::new(404)
                .set_body_json(json!({"errors": [{"code": 34, "message": "Sorry, that page does not exist"}]}));
        };

        let start = (page.max(1) - 1) * count;
        let items: Vec<Value> = feed.iter().skip(start).take(count).cloned().collect();
        ResponseTemplate::new(200).set_body_json(Value::Array(items))
    }
}

/// A feed of `count` posts spaced `step` apart, the newest at `newest`
fn feed(account: &str, newest: DateTime<Utc>, step: ChronoDuration, count: usize) -> Vec<Value> {
    (0..count)
        .map(|i| {
            let created_at = newest - step * i as i32;
            json!({
                "id": 300_000_000_000u64 + (count - i) as u64,
                "text": format!("post {} from {}", i, account),
                "created_at": created_at.format("%a %b %d %H:%M:%S %z %Y").to_string(),
                "user": {"screen_name": account},
                "retweet_count": i % 5,
                "favorited": i % 2 == 0,
                "geo": null,
                "entities": {"urls": [], "user_mentions": [], "hashtags": []}
            })
        })
        .collect()
}

fn newest() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2013, 5, 30, 12, 0, 0).unwrap()
}

fn create_test_config(base_url: &str) -> Config {
    parse_config(&format!(
        r#"
[window]
lower = "2011-05-01T00:00:00Z"
upper = "2013-05-31T23:59:59Z"

[crawler]
page-size = 100
courtesy-delay = 100
network-retry-delay = 100
rate-limit-slack = 10
max-retries = 5

[api]
base-url = "{}/1.1/"

[user-agent]
crawler-name = "TestBot"
crawler-version = "1.0.0"
contact-url = "https://example.com/contact"
contact-email = "test@example.com"
"#,
        base_url
    ))
    .expect("test config is valid")
}

async fn start_server(feeds: HashMap<String, Vec<Value>>) -> MockServer {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(TIMELINE_PATH))
        .respond_with(TimelineResponder { feeds })
        .mount(&mock_server)
        .await;
    mock_server
}

fn build_coordinator(
    mock_server: &MockServer,
    output: &TempDir,
    sleeper: Arc<InstantSleeper>,
) -> Coordinator<HttpFeedClient, FileCorpusWriter> {
    let config = create_test_config(&mock_server.uri());
    let client = HttpFeedClient::new(&config.api, &config.user_agent).expect("client builds");
    let writer = FileCorpusWriter::new(output.path()).expect("output dir");
    Coordinator::new(&config, client, writer)
        .expect("coordinator builds")
        .with_sleeper(sleeper)
}

/// Splits a corpus file back into records
fn read_corpus(path: &Path) -> Vec<ParsedRecord> {
    let content = std::fs::read_to_string(path).expect("corpus file exists");
    let inner = content
        .strip_prefix("[\n")
        .and_then(|c| c.strip_suffix("\n]\n"))
        .expect("corpus file is bracketed");

    inner
        .split(",\n{\nid:")
        .enumerate()
        .map(|(i, chunk)| {
            let record = if i == 0 {
                chunk.to_string()
            } else {
                format!("{{\nid:{}", chunk)
            };
            parse_record(&record).expect("record parses")
        })
        .collect()
}

fn accounts(names: &[&str]) -> Vec<String> {
    names.iter().map(|n| n.to_string()).collect()
}

#[tokio::test]
async fn test_alice_and_bob_end_to_end() {
    let mut feeds = HashMap::new();
    feeds.insert(
        "alice".to_string(),
        feed("alice", newest(), ChronoDuration::hours(1), 250),
    );
    feeds.insert("bob".to_string(), Vec::new());
    let mock_server = start_server(feeds).await;

    let output = TempDir::new().unwrap();
    let sleeper = Arc::new(InstantSleeper::new());
    let mut coordinator = build_coordinator(&mock_server, &output, sleeper.clone());

    let summary = coordinator.run(&accounts(&["alice", "bob"])).await;

    assert_eq!(summary.succeeded(), 2);
    assert_eq!(summary.total_records(), 250);

    let records = read_corpus(&output.path().join("alice"));
    assert_eq!(records.len(), 250);
    let ids: Vec<u64> = records.iter().map(|r| r.sequence_id).collect();
    assert_eq!(ids, (1..=250).collect::<Vec<_>>());

    // Fetch order is newest first
    assert_eq!(records[0].text, "post 0 from alice");
    assert_eq!(records[249].text, "post 249 from alice");
    assert_eq!(records[0].time, "Thu May 30 12:00:00 UTC 2013");
    assert!(records.iter().all(|r| r.author == "alice"));

    // Zero records means no file
    assert!(!output.path().join("bob").exists());
}

#[tokio::test]
async fn test_posts_newer_than_window_are_skipped() {
    let mut feeds = HashMap::new();
    let start = Utc.with_ymd_and_hms(2013, 6, 10, 0, 0, 0).unwrap();
    feeds.insert(
        "dana".to_string(),
        feed("dana", start, ChronoDuration::hours(6), 400),
    );
    let mock_server = start_server(feeds).await;

    let output = TempDir::new().unwrap();
    let mut coordinator =
        build_coordinator(&mock_server, &output, Arc::new(InstantSleeper::new()));

    let summary = coordinator.run(&accounts(&["dana"])).await;
    assert_eq!(summary.accounts[0].state, AccountState::Succeeded);

    // Posts 0..=36 are at or after 2013-06-01T00:00:00Z
    let records = read_corpus(&output.path().join("dana"));
    assert_eq!(records.len(), 363);
    assert_eq!(records[0].text, "post 37 from dana");
    assert_eq!(records[0].sequence_id, 1);
}

#[tokio::test]
async fn test_rate_limit_then_success() {
    let mock_server = MockServer::start().await;

    // The first request is throttled
    Mock::given(method("GET"))
        .and(path(TIMELINE_PATH))
        .respond_with(ResponseTemplate::new(429).insert_header("retry-after", "3"))
        .up_to_n_times(1)
        .mount(&mock_server)
        .await;

    let mut feeds = HashMap::new();
    feeds.insert(
        "alice".to_string(),
        feed("alice", newest(), ChronoDuration::hours(1), 120),
    );
    Mock::given(method("GET"))
        .and(path(TIMELINE_PATH))
        .respond_with(TimelineResponder { feeds })
        .mount(&mock_server)
        .await;

    let output = TempDir::new().unwrap();
    let sleeper = Arc::new(InstantSleeper::new());
    let mut coordinator = build_coordinator(&mock_server, &output, sleeper.clone());

    let summary = coordinator.run(&accounts(&["alice"])).await;

    let report = &summary.accounts[0];
    assert_eq!(report.state, AccountState::Succeeded);
    assert_eq!(report.attempts, 2);
    assert_eq!(report.records, 120);

    // Retry-after plus slack before the next fetch
    let slept = sleeper.recorded();
    assert!(slept[0] >= Duration::from_secs(13));
}

#[tokio::test]
async fn test_missing_account_is_not_retried() {
    let mock_server = start_server(HashMap::new()).await;

    let output = TempDir::new().unwrap();
    let sleeper = Arc::new(InstantSleeper::new());
    let mut coordinator = build_coordinator(&mock_server, &output, sleeper.clone());

    let summary = coordinator.run(&accounts(&["nobody"])).await;

    let report = &summary.accounts[0];
    assert_eq!(report.state, AccountState::Exhausted);
    assert_eq!(report.attempts, 1);

    let received = mock_server.received_requests().await.unwrap();
    assert_eq!(received.len(), 1);
    assert!(sleeper.recorded().is_empty());
    assert!(!output.path().join("nobody").exists());
}

#[tokio::test]
async fn test_server_errors_exhaust_attempts() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(TIMELINE_PATH))
        .respond_with(ResponseTemplate::new(503))
        .mount(&mock_server)
        .await;

    let output = TempDir::new().unwrap();
    let sleeper = Arc::new(InstantSleeper::new());
    let mut coordinator = build_coordinator(&mock_server, &output, sleeper.clone());

    let summary = coordinator.run(&accounts(&["alice"])).await;

    let report = &summary.accounts[0];
    assert_eq!(report.state, AccountState::Exhausted);
    assert_eq!(report.attempts, 5);
    assert_eq!(report.last_failure.as_deref(), Some("Network failure: HTTP 503"));
    assert_eq!(mock_server.received_requests().await.unwrap().len(), 5);
    assert_eq!(sleeper.recorded(), vec![Duration::from_millis(100); 4]);
}

#[tokio::test]
async fn test_entities_survive_http_and_serialization() {
    let mock_server = MockServer::start().await;
    let post = json!({
        "id": 68947552366542848u64,
        "full_text": "Shopping with @bob https://t.co/x #sale #shoes",
        "created_at": "Thu May 12 14:03:09 +0000 2011",
        "user": {"screen_name": "erin"},
        "retweet_count": 3,
        "favorited": true,
        "geo": {"type": "Point", "coordinates": [40.7128, -74.006]},
        "entities": {
            "urls": [{"url": "https://t.co/x", "expanded_url": "https://shop.example.com/shoes"}],
            "user_mentions": [{"screen_name": "bob", "name": "Bob Jones"}],
            "hashtags": [{"text": "sale"}, {"text": "shoes"}]
        }
    });
    Mock::given(method("GET"))
        .and(path(TIMELINE_PATH))
        .and(query_param("screen_name", "erin"))
        .and(query_param("page", "1"))
        .and(query_param("count", "100"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([post])))
        .mount(&mock_server)
        .await;
    // Probes and later pages find nothing
    Mock::given(method("GET"))
        .and(path(TIMELINE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&mock_server)
        .await;

    let output = TempDir::new().unwrap();
    let mut coordinator =
        build_coordinator(&mock_server, &output, Arc::new(InstantSleeper::new()));

    let summary = coordinator.run(&accounts(&["erin"])).await;
    assert_eq!(summary.total_records(), 1);

    let records = read_corpus(&output.path().join("erin"));
    let record = &records[0];
    assert_eq!(record.post_id, 68947552366542848);
    assert_eq!(record.text, "Shopping with @bob https://t.co/x #sale #shoes");
    assert_eq!(record.time, "Thu May 12 14:03:09 UTC 2011");
    assert_eq!(record.retweet_count, 3);
    assert!(record.favorited);
    assert_eq!(record.mentions, vec!["Bob Jones"]);
    assert_eq!(record.urls, vec!["https://shop.example.com/shoes"]);
    assert_eq!(record.hashtags, vec!["sale", "shoes"]);
    assert_eq!(
        record.geolocation.as_deref(),
        Some("GeoLocation{latitude=40.7128, longitude=-74.006}")
    );
}

#[tokio::test]
async fn test_requests_carry_timeline_parameters() {
    let mut feeds = HashMap::new();
    feeds.insert(
        "alice".to_string(),
        feed("alice", newest(), ChronoDuration::hours(1), 10),
    );
    let mock_server = start_server(feeds).await;

    let output = TempDir::new().unwrap();
    let mut coordinator =
        build_coordinator(&mock_server, &output, Arc::new(InstantSleeper::new()));
    coordinator.run(&accounts(&["alice"])).await;

    let received = mock_server.received_requests().await.unwrap();
    // One probe, then page 1 (10 posts) and the empty page 2
    assert_eq!(received.len(), 3);

    let probe: HashMap<String, String> = received[0].url.query_pairs().into_owned().collect();
    assert_eq!(probe["page"], "100");
    assert_eq!(probe["count"], "1");
    assert_eq!(probe["include_entities"], "true");

    let first_page: HashMap<String, String> =
        received[1].url.query_pairs().into_owned().collect();
    assert_eq!(first_page["page"], "1");
    assert_eq!(first_page["count"], "100");
}
