//! Integration tests for page fetching and snapshots
//!
//! These tests use wiremock to serve certificate pages and exercise the real
//! HTTP fetcher and snapshot writer.

use cert_lookup::crawler::{
    DiagnosticSnapshot, FailureKind, FetchOutcome, HtmlSnapshotWriter, HttpPageFetcher,
    PageFetcher, SessionFactory,
};
use cert_lookup::CertificateId;
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const CARD_PAGE: &str = r#"<!DOCTYPE html>
<html>
<body>
  <main>
    <h2 class="text-xl sm:text-2xl font-bold">
      Charizard
      Base Set   Holo
    </h2>
    <div class="w-3/4 bg-gold rounded text-center">  10  </div>
  </main>
</body>
</html>"#;

pub const EMPTY_PAGE: &str = r#"<!DOCTYPE html>
<html><body><p>Certificate not found</p></body></html>"#;

fn sessions(server: &MockServer) -> SessionFactory {
    SessionFactory::new(&format!("{}/cert/", server.uri()), "TestAgent/1.0").unwrap()
}

fn id(raw: &str) -> CertificateId {
    CertificateId::new(raw).unwrap()
}

#[tokio::test]
async fn test_fetch_extracts_card_fields() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/cert/10042"))
        .respond_with(ResponseTemplate::new(200).set_body_string(CARD_PAGE))
        .expect(1)
        .mount(&server)
        .await;

    let fetcher = HttpPageFetcher::new(sessions(&server), Duration::ZERO);
    let outcome = fetcher.fetch(&id("10042"), Duration::from_secs(5)).await;

    assert_eq!(
        outcome,
        FetchOutcome::success("Charizard Base Set Holo", "10")
    );
    assert_eq!(fetcher.sessions().open_sessions(), 0);
}

#[tokio::test]
async fn test_fetch_missing_elements_is_extraction_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/cert/404404"))
        .respond_with(ResponseTemplate::new(200).set_body_string(EMPTY_PAGE))
        .mount(&server)
        .await;

    let fetcher = HttpPageFetcher::new(sessions(&server), Duration::ZERO);
    let outcome = fetcher.fetch(&id("404404"), Duration::from_secs(5)).await;

    assert_eq!(outcome, FetchOutcome::failure(FailureKind::ExtractionError));
}

#[tokio::test]
async fn test_fetch_slow_page_is_timeout() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/cert/777"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(CARD_PAGE)
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let fetcher = HttpPageFetcher::new(sessions(&server), Duration::ZERO);
    let outcome = fetcher.fetch(&id("777"), Duration::from_millis(200)).await;

    assert_eq!(outcome, FetchOutcome::failure(FailureKind::Timeout));
    assert_eq!(fetcher.sessions().open_sessions(), 0);
}

#[tokio::test]
async fn test_fetch_server_error_is_transport_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/cert/500"))
        .respond_with(ResponseTemplate::new(500).set_body_string(CARD_PAGE))
        .mount(&server)
        .await;

    let fetcher = HttpPageFetcher::new(sessions(&server), Duration::ZERO);
    let outcome = fetcher.fetch(&id("500"), Duration::from_secs(5)).await;

    assert_eq!(outcome, FetchOutcome::failure(FailureKind::TransportError));
}

#[tokio::test]
async fn test_fetch_unreachable_host_is_transport_error() {
    let factory = SessionFactory::new("http://127.0.0.1:9/cert/", "TestAgent/1.0").unwrap();
    let fetcher = HttpPageFetcher::new(factory, Duration::ZERO);
    let outcome = fetcher.fetch(&id("1"), Duration::from_secs(5)).await;

    assert!(!outcome.is_success());
}

#[tokio::test]
async fn test_snapshot_writes_raw_page() {
    let server = MockServer::start().await;
    let temp_dir = tempfile::tempdir().unwrap();
    let debug_dir = temp_dir.path().join("debug_pages");

    Mock::given(method("GET"))
        .and(path("/cert/A2"))
        .respond_with(ResponseTemplate::new(404).set_body_string(EMPTY_PAGE))
        .expect(1)
        .mount(&server)
        .await;

    let writer = HtmlSnapshotWriter::new(sessions(&server), &debug_dir, Duration::ZERO);
    writer.snapshot(&id("A2"), Duration::from_secs(5)).await;

    let saved = std::fs::read_to_string(debug_dir.join("A2.html")).unwrap();
    assert_eq!(saved, EMPTY_PAGE);
}

#[tokio::test]
async fn test_fetch_addresses_id_as_single_segment() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/cert/ABC%3A123"))
        .respond_with(ResponseTemplate::new(200).set_body_string(CARD_PAGE))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/cert/%2F%2Fother.example%2Fx"))
        .respond_with(ResponseTemplate::new(200).set_body_string(CARD_PAGE))
        .expect(1)
        .mount(&server)
        .await;

    let fetcher = HttpPageFetcher::new(sessions(&server), Duration::ZERO);
    for raw in ["ABC:123", "//other.example/x"] {
        let outcome = fetcher.fetch(&id(raw), Duration::from_secs(5)).await;
        assert!(outcome.is_success(), "id {:?} gave {:?}", raw, outcome);
    }
}

#[tokio::test]
async fn test_fetch_dot_segment_id_never_leaves_base() {
    let server = MockServer::start().await;

    // Any request at all would mean the ID resolved to some other page
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string(CARD_PAGE))
        .expect(0)
        .mount(&server)
        .await;

    let fetcher = HttpPageFetcher::new(sessions(&server), Duration::ZERO);
    let outcome = fetcher.fetch(&id(".."), Duration::from_secs(5)).await;

    assert_eq!(outcome, FetchOutcome::failure(FailureKind::TransportError));
}

#[tokio::test]
async fn test_snapshots_of_similar_ids_do_not_collide() {
    let server = MockServer::start().await;
    let temp_dir = tempfile::tempdir().unwrap();

    Mock::given(method("GET"))
        .and(path("/cert/A_B"))
        .respond_with(ResponseTemplate::new(200).set_body_string("underscore"))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/cert/A%3AB"))
        .respond_with(ResponseTemplate::new(200).set_body_string("colon"))
        .mount(&server)
        .await;

    let writer = HtmlSnapshotWriter::new(sessions(&server), temp_dir.path(), Duration::ZERO);
    writer.snapshot(&id("A_B"), Duration::from_secs(5)).await;
    writer.snapshot(&id("A:B"), Duration::from_secs(5)).await;

    let underscore = std::fs::read_to_string(writer.snapshot_path(&id("A_B"))).unwrap();
    let colon = std::fs::read_to_string(writer.snapshot_path(&id("A:B"))).unwrap();
    assert_eq!(underscore, "underscore");
    assert_eq!(colon, "colon");
}

#[tokio::test]
async fn test_snapshot_timeout_writes_nothing() {
    let server = MockServer::start().await;
    let temp_dir = tempfile::tempdir().unwrap();

    Mock::given(method("GET"))
        .and(path("/cert/slow"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(CARD_PAGE)
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let writer = HtmlSnapshotWriter::new(sessions(&server), temp_dir.path(), Duration::ZERO);
    writer.snapshot(&id("slow"), Duration::from_millis(200)).await;

    assert!(!writer.snapshot_path(&id("slow")).exists());
}
