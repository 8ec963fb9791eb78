//! Tests for engine module

use super::*;
use crate::config::CopierConfig;
use crate::error::Error;
use crate::upload::FailureReason;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

const SOURCE_KEY: &str = "SOURCEKEY0123456789a";
const TARGET_KEY: &str = "TARGETKEY0123456789a";
const BASE: Duration = Duration::from_millis(20);

fn image_json(id: u64) -> Value {
    json!({
        "id": id,
        "description": format!("image {id}"),
        "source_url": "",
        "tags": ["safe", "pony"],
        "view_url": format!("https://cdn.example.com/{id}.png")
    })
}

async fn mount_page(server: &MockServer, page: u32, ids: &[u64], total: u64) {
    let images: Vec<Value> = ids.iter().map(|id| image_json(*id)).collect();
    Mock::given(method("GET"))
        .and(path("/api/v1/json/search/images"))
        .and(query_param("page", page.to_string()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "images": images,
            "total": total
        })))
        .expect(1)
        .mount(server)
        .await;
}

fn copier(source: &MockServer, target: &MockServer) -> Copier {
    let config = CopierConfig::builder()
        .delays(BASE, Duration::from_millis(500))
        .request_timeout(Duration::from_secs(5))
        .build();
    Copier::new(
        &config,
        Booru::from_base_url(&source.uri(), SOURCE_KEY).unwrap(),
        Booru::from_base_url(&target.uri(), TARGET_KEY).unwrap(),
        "safe",
    )
    .unwrap()
}

fn uploaded_urls(requests: &[Request]) -> Vec<String> {
    requests
        .iter()
        .map(|r| {
            let body: Value = serde_json::from_slice(&r.body).unwrap();
            body["url"].as_str().unwrap().to_string()
        })
        .collect()
}

/// Target that fails a fixed number of uploads and records when each arrives
struct TimedTarget {
    failures_left: Mutex<u32>,
    arrivals: Arc<Mutex<Vec<(String, Instant)>>>,
}

impl Respond for TimedTarget {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let body: Value = serde_json::from_slice(&request.body).unwrap();
        let url = body["url"].as_str().unwrap().to_string();
        self.arrivals.lock().unwrap().push((url, Instant::now()));

        let mut failures_left = self.failures_left.lock().unwrap();
        if *failures_left > 0 {
            *failures_left -= 1;
            ResponseTemplate::new(500)
        } else {
            ResponseTemplate::new(201)
        }
    }
}

fn without_finished(events: Vec<Event>) -> Vec<Event> {
    events
        .into_iter()
        .filter(|e| !matches!(e, Event::Finished { .. }))
        .collect()
}

// ============================================================================
// Event / CopyStats Tests
// ============================================================================

#[test]
fn test_event_display() {
    assert_eq!(
        Event::TotalKnown { total: 12 }.to_string(),
        "There are 12 images in this query"
    );
    assert_eq!(
        Event::ImageStarted {
            index: 3,
            total: 12,
            image_id: 4501
        }
        .to_string(),
        "Uploading image 3/12 (4501)..."
    );
    assert_eq!(
        Event::RetryScheduled {
            image_id: 1,
            delay: Duration::from_secs(8)
        }
        .to_string(),
        "Retrying in 8 seconds..."
    );
    assert_eq!(
        Event::UploadFailed {
            image_id: 1,
            reason: FailureReason::Status(502)
        }
        .to_string(),
        "Error uploading image (502 Bad Gateway)"
    );
    assert_eq!(
        Event::AlreadyUploaded { image_id: 1 }.to_string(),
        "Image has already been uploaded"
    );
}

#[test]
fn test_copy_stats() {
    let mut stats = CopyStats::new();
    stats.add_page();
    stats.add_uploaded();
    stats.add_already_present();
    stats.add_already_present();

    assert_eq!(stats.pages_fetched, 1);
    assert_eq!(stats.images_processed, 3);
    assert_eq!(stats.uploaded, 1);
    assert_eq!(stats.already_present, 2);
}

// ============================================================================
// Copier Tests
// ============================================================================

#[tokio::test]
async fn test_run_with_no_images() {
    let source = MockServer::start().await;
    let target = MockServer::start().await;

    mount_page(&source, 1, &[], 0).await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&target)
        .await;

    let mut copier = copier(&source, &target);
    let mut events: Vec<Event> = Vec::new();
    let stats = copier.run(&mut events).await.unwrap();

    assert_eq!(
        events,
        vec![Event::PageFetched { page: 1, images: 0 }, Event::NoImages]
    );
    assert_eq!(stats.images_processed, 0);
    assert_eq!(stats.pages_fetched, 1);
}

#[tokio::test]
async fn test_run_uploaded_then_duplicate() {
    let source = MockServer::start().await;
    let target = MockServer::start().await;

    mount_page(&source, 1, &[11, 12], 2).await;
    mount_page(&source, 2, &[], 2).await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(201))
        .up_to_n_times(1)
        .mount(&target)
        .await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(400))
        .mount(&target)
        .await;

    let mut copier = copier(&source, &target);
    let mut events: Vec<Event> = Vec::new();

    let start = Instant::now();
    let stats = copier.run(&mut events).await.unwrap();
    let elapsed = start.elapsed();

    assert_eq!(
        without_finished(events),
        vec![
            Event::PageFetched { page: 1, images: 2 },
            Event::TotalKnown { total: 2 },
            Event::ImageStarted {
                index: 1,
                total: 2,
                image_id: 11
            },
            Event::UploadAttempt {
                image_id: 11,
                attempt: 1
            },
            Event::Uploaded { image_id: 11 },
            Event::ImageStarted {
                index: 2,
                total: 2,
                image_id: 12
            },
            Event::UploadAttempt {
                image_id: 12,
                attempt: 1
            },
            Event::AlreadyUploaded { image_id: 12 },
            Event::PageFetched { page: 2, images: 0 },
        ]
    );

    assert_eq!(stats.uploaded, 1);
    assert_eq!(stats.already_present, 1);
    assert_eq!(stats.attempts, 2);
    assert_eq!(stats.retries, 0);
    assert_eq!(stats.pages_fetched, 2);
    // Two pacing waits and no backoff
    assert!(elapsed >= BASE * 2);

    let requests = target.received_requests().await.unwrap();
    assert_eq!(requests.len(), 2);
}

#[tokio::test]
async fn test_run_retries_then_paces() {
    let source = MockServer::start().await;
    let target = MockServer::start().await;

    mount_page(&source, 1, &[21, 22], 2).await;
    mount_page(&source, 2, &[], 2).await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .up_to_n_times(3)
        .mount(&target)
        .await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(201))
        .mount(&target)
        .await;

    let mut copier = copier(&source, &target);
    let mut events: Vec<Event> = Vec::new();

    let start = Instant::now();
    let stats = copier.run(&mut events).await.unwrap();
    let elapsed = start.elapsed();

    let retry_delays: Vec<(u64, Duration)> = events
        .iter()
        .filter_map(|e| match e {
            Event::RetryScheduled { image_id, delay } => Some((*image_id, *delay)),
            _ => None,
        })
        .collect();
    assert_eq!(
        retry_delays,
        vec![(21, BASE), (21, BASE * 2), (21, BASE * 4)]
    );

    let attempts_for_21 = events
        .iter()
        .filter(|e| matches!(e, Event::UploadAttempt { image_id: 21, .. }))
        .count();
    assert_eq!(attempts_for_21, 4);

    assert_eq!(stats.uploaded, 2);
    assert_eq!(stats.attempts, 5);
    assert_eq!(stats.retries, 3);
    // 1 + 2 + 4 backoff units plus two pacing waits
    assert!(elapsed >= BASE * 9);
}

#[tokio::test]
async fn test_run_preserves_source_order_across_pages() {
    let source = MockServer::start().await;
    let target = MockServer::start().await;

    mount_page(&source, 1, &[5, 1, 9], 5).await;
    mount_page(&source, 2, &[2, 7], 5).await;
    mount_page(&source, 3, &[], 5).await;

    Mock::given(method("POST"))
        .and(path("/api/v1/json/images"))
        .and(query_param("key", TARGET_KEY))
        .respond_with(ResponseTemplate::new(201))
        .expect(5)
        .mount(&target)
        .await;

    let mut copier = copier(&source, &target);
    let mut events: Vec<Event> = Vec::new();
    let stats = copier.run(&mut events).await.unwrap();

    let requests = target.received_requests().await.unwrap();
    assert_eq!(
        uploaded_urls(&requests),
        vec![
            "https://cdn.example.com/5.png",
            "https://cdn.example.com/1.png",
            "https://cdn.example.com/9.png",
            "https://cdn.example.com/2.png",
            "https://cdn.example.com/7.png",
        ]
    );

    let indices: Vec<(u64, u64)> = events
        .iter()
        .filter_map(|e| match e {
            Event::ImageStarted { index, total, .. } => Some((*index, *total)),
            _ => None,
        })
        .collect();
    assert_eq!(indices, vec![(1, 5), (2, 5), (3, 5), (4, 5), (5, 5)]);

    assert_eq!(stats.pages_fetched, 3);
    assert!(matches!(events.last(), Some(Event::Finished { .. })));
}

#[tokio::test]
async fn test_rerun_only_finds_duplicates() {
    let source = MockServer::start().await;
    let target = MockServer::start().await;

    Mock::given(method("GET"))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "images": [image_json(1), image_json(2)],
            "total": 2
        })))
        .mount(&source)
        .await;
    Mock::given(method("GET"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "images": [],
            "total": 2
        })))
        .mount(&source)
        .await;

    // The target accepts each image once, then reports it as a duplicate
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(201))
        .up_to_n_times(2)
        .mount(&target)
        .await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(400))
        .mount(&target)
        .await;

    let first = copier(&source, &target).run(&mut Vec::<Event>::new()).await.unwrap();
    assert_eq!(first.uploaded, 2);

    let second = copier(&source, &target).run(&mut Vec::<Event>::new()).await.unwrap();
    assert_eq!(second.uploaded, 0);
    assert_eq!(second.already_present, 2);
}

#[tokio::test]
async fn test_run_aborts_on_search_failure() {
    let source = MockServer::start().await;
    let target = MockServer::start().await;

    mount_page(&source, 1, &[1], 2).await;
    Mock::given(method("GET"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(502))
        .expect(1)
        .mount(&source)
        .await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&target)
        .await;

    let mut copier = copier(&source, &target);
    let err = copier.run(&mut Vec::<Event>::new()).await.unwrap_err();

    assert!(err.is_transport());
    assert_eq!(copier.stats().uploaded, 1);
}

#[tokio::test]
async fn test_preview_then_run_from() {
    let source = MockServer::start().await;
    let target = MockServer::start().await;

    mount_page(&source, 1, &[1], 1).await;
    mount_page(&source, 2, &[], 1).await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&target)
        .await;

    let mut copier = copier(&source, &target);
    let mut events: Vec<Event> = Vec::new();

    let first = copier.preview(&mut events).await.unwrap();
    assert_eq!(first.total, 1);
    assert_eq!(events.last(), Some(&Event::TotalKnown { total: 1 }));

    let stats = copier.run_from(first, &mut events).await.unwrap();
    assert_eq!(stats.uploaded, 1);
    assert_eq!(stats.pages_fetched, 2);
}

#[tokio::test]
async fn test_run_from_without_preview_is_rejected() {
    let source = MockServer::start().await;
    let target = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&source)
        .await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&target)
        .await;

    let first = SearchPage {
        images: vec![serde_json::from_value(image_json(1)).unwrap()],
        total: 1,
    };
    let mut copier = copier(&source, &target);
    let mut events: Vec<Event> = Vec::new();
    let err = copier.run_from(first, &mut events).await.unwrap_err();

    assert!(matches!(err, Error::Config { .. }));
    assert!(events.is_empty());
    assert_eq!(copier.stats().images_processed, 0);
}

#[tokio::test]
async fn test_pacing_after_retries_uses_base_delay() {
    let source = MockServer::start().await;
    let target = MockServer::start().await;

    mount_page(&source, 1, &[21, 22], 2).await;
    mount_page(&source, 2, &[], 2).await;

    let arrivals = Arc::new(Mutex::new(Vec::new()));
    Mock::given(method("POST"))
        .respond_with(TimedTarget {
            failures_left: Mutex::new(3),
            arrivals: Arc::clone(&arrivals),
        })
        .mount(&target)
        .await;

    let stats = copier(&source, &target)
        .run(&mut Vec::<Event>::new())
        .await
        .unwrap();
    assert_eq!(stats.uploaded, 2);
    assert_eq!(stats.retries, 3);

    let arrivals = arrivals.lock().unwrap();
    let last_for_21 = arrivals
        .iter()
        .filter(|(url, _)| url.ends_with("/21.png"))
        .map(|(_, at)| *at)
        .last()
        .unwrap();
    let first_for_22 = arrivals
        .iter()
        .find(|(url, _)| url.ends_with("/22.png"))
        .map(|(_, at)| *at)
        .unwrap();
    let gap = first_for_22 - last_for_21;

    // The next backoff step would have been BASE * 8
    assert!(gap >= BASE, "gap {gap:?}");
    assert!(gap < BASE * 4, "gap {gap:?}");
}

#[test]
fn test_new_rejects_invalid_config() {
    let config = CopierConfig::builder().page_size(0).build();
    let result = Copier::new(
        &config,
        Booru::new("source.example", SOURCE_KEY).unwrap(),
        Booru::new("target.example", TARGET_KEY).unwrap(),
        "safe",
    );
    assert!(result.is_err());
}
