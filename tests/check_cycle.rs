//! End-to-end check cycle tests.
//!
//! A store on disk, product pages behind a mock HTTP server, and
//! notifications captured in memory.

use std::sync::Arc;

use async_trait::async_trait;
use tempfile::TempDir;
use tokio::sync::Mutex;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use pricewatch::fetch::PageFetcher;
use pricewatch::notify::Notifier;
use pricewatch::scheduler::ChangeDetector;
use pricewatch::store::{item_from_observation, TrackedStore};

#[derive(Default)]
struct RecordingNotifier {
    sent: Mutex<Vec<(String, String, String)>>,
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn notify(&self, id: &str, title: &str, body: &str) {
        self.sent
            .lock()
            .await
            .push((id.to_string(), title.to_string(), body.to_string()));
    }
}

fn product_page(price: &str) -> String {
    format!(
        r#"<html><head><title>Widget</title></head>
        <body><h1>Widget</h1><div class="price">{price}</div></body></html>"#
    )
}

async fn serve(server: &MockServer, route: &str, price: &str) {
    Mock::given(method("GET"))
        .and(path(route.to_string()))
        .respond_with(ResponseTemplate::new(200).set_body_string(product_page(price)))
        .mount(server)
        .await;
}

fn seed(dir: &TempDir, url: &str, raw: &str) {
    let mut store = TrackedStore::open(dir.path().to_path_buf()).unwrap();
    store.upsert(item_from_observation(url, Some("Widget"), raw, None));
    store.save().unwrap();
}

fn detector(dir: &TempDir, notifier: Arc<RecordingNotifier>) -> ChangeDetector {
    let store = TrackedStore::open(dir.path().to_path_buf()).unwrap();
    ChangeDetector::new(store, PageFetcher::default(), notifier)
}

#[tokio::test]
async fn test_price_change_updates_store_and_notifies() {
    let server = MockServer::start().await;
    serve(&server, "/p", "$24.99").await;

    let dir = TempDir::new().unwrap();
    let url = format!("{}/p", server.uri());
    seed(&dir, &url, "$19.99");

    let notifier = Arc::new(RecordingNotifier::default());
    let summary = detector(&dir, Arc::clone(&notifier)).run_cycle(true).await;
    assert_eq!(summary.checked, 1);
    assert_eq!(summary.skipped, 0);

    let store = TrackedStore::open(dir.path().to_path_buf()).unwrap();
    let item = store.get(&url).unwrap();
    assert_eq!(item.last_price, Some(24.99));
    assert_eq!(item.last_raw, "$24.99");
    assert_eq!(item.history.len(), 2);
    assert_eq!(item.history.last().unwrap().price, Some(24.99));
    assert!(item.last_checked.is_some());

    let sent = notifier.sent.lock().await;
    assert_eq!(sent.len(), 1);
    let (id, title, body) = &sent[0];
    assert!(id.starts_with("price-change-0-"), "id was {id}");
    assert_eq!(title, "Price update: Widget");
    assert!(body.contains("$19.99") && body.contains("$24.99"), "body was {body}");
}

#[tokio::test]
async fn test_formatting_noise_adopts_baseline_without_alert() {
    let server = MockServer::start().await;
    serve(&server, "/p", "$10.0000").await;

    let dir = TempDir::new().unwrap();
    let url = format!("{}/p", server.uri());
    seed(&dir, &url, "$10.00");

    let notifier = Arc::new(RecordingNotifier::default());
    let summary = detector(&dir, Arc::clone(&notifier)).run_cycle(true).await;
    assert_eq!(summary.checked, 1);

    let store = TrackedStore::open(dir.path().to_path_buf()).unwrap();
    let item = store.get(&url).unwrap();
    // Newer formatting becomes the baseline, but nothing counts as a change.
    assert_eq!(item.last_raw, "$10.0000");
    assert_eq!(item.last_price, Some(10.0));
    assert_eq!(item.history.len(), 1);
    assert_eq!(item.history[0].raw, "$10.0000");
    assert!(notifier.sent.lock().await.is_empty());
}

#[tokio::test]
async fn test_unchanged_price_records_nothing() {
    let server = MockServer::start().await;
    serve(&server, "/p", "$19.99").await;

    let dir = TempDir::new().unwrap();
    let url = format!("{}/p", server.uri());
    seed(&dir, &url, "$19.99");

    let notifier = Arc::new(RecordingNotifier::default());
    detector(&dir, Arc::clone(&notifier)).run_cycle(true).await;

    let store = TrackedStore::open(dir.path().to_path_buf()).unwrap();
    let item = store.get(&url).unwrap();
    assert_eq!(item.history.len(), 1);
    assert!(notifier.sent.lock().await.is_empty());
}

#[tokio::test]
async fn test_interval_throttle_skips_fresh_items() {
    let server = MockServer::start().await;
    // No routes mounted: any request would 404, but none should arrive.

    let dir = TempDir::new().unwrap();
    let url = format!("{}/p", server.uri());
    seed(&dir, &url, "$19.99");

    let notifier = Arc::new(RecordingNotifier::default());
    let summary = detector(&dir, Arc::clone(&notifier)).run_cycle(false).await;
    assert_eq!(summary.checked, 0);
    assert_eq!(summary.skipped, 1);
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_fetch_failure_does_not_stop_the_cycle() {
    let server = MockServer::start().await;
    serve(&server, "/ok", "$30.00").await;

    let dir = TempDir::new().unwrap();
    let good_url = format!("{}/ok", server.uri());
    {
        let mut store = TrackedStore::open(dir.path().to_path_buf()).unwrap();
        store.upsert(item_from_observation(
            "http://127.0.0.1:1/unreachable",
            Some("Dead"),
            "$5.00",
            None,
        ));
        store.upsert(item_from_observation(&good_url, Some("Widget"), "$29.00", None));
        store.save().unwrap();
    }

    let notifier = Arc::new(RecordingNotifier::default());
    let summary = detector(&dir, Arc::clone(&notifier)).run_cycle(true).await;

    // The unreachable item counts toward neither checked nor skipped.
    assert_eq!(summary.checked, 1);
    assert_eq!(summary.skipped, 0);

    let store = TrackedStore::open(dir.path().to_path_buf()).unwrap();
    let good = store.get(&good_url).unwrap();
    assert_eq!(good.last_price, Some(30.0));
    let dead = store.get("http://127.0.0.1:1/unreachable").unwrap();
    assert_eq!(dead.last_price, Some(5.0));

    let sent = notifier.sent.lock().await;
    assert_eq!(sent.len(), 1);
    assert!(sent[0].2.contains("$30.00"));
}
