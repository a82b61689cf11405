//! End-to-end lookup tests
//!
//! The scripted tests run on a paused clock with fake collaborators; the
//! wiremock test drives the real HTTP fetcher, snapshot writer and CSV report.

use crate::fetch_tests::{CARD_PAGE, EMPTY_PAGE};
use async_trait::async_trait;
use cert_lookup::config::Config;
use cert_lookup::crawler::{
    run_lookup, Coordinator, DiagnosticSnapshot, FailureKind, FetchOutcome, PageFetcher,
};
use cert_lookup::output::CsvReport;
use cert_lookup::{load_certificate_ids, CertificateId, ConfigError, LookupError, LookupRecord};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Succeeds for every ID except those listed as always failing
#[derive(Default)]
struct ScriptedFetcher {
    failing: HashMap<String, FailureKind>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedFetcher {
    fn failing(id: &str, kind: FailureKind) -> Self {
        Self {
            failing: HashMap::from([(id.to_string(), kind)]),
            calls: Mutex::new(Vec::new()),
        }
    }

    fn calls_for(&self, id: &str) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| *c == id).count()
    }
}

#[async_trait]
impl PageFetcher for ScriptedFetcher {
    async fn fetch(&self, id: &CertificateId, _timeout: Duration) -> FetchOutcome {
        self.calls.lock().unwrap().push(id.to_string());
        tokio::time::sleep(Duration::from_millis(500)).await;

        match self.failing.get(id.as_str()) {
            Some(kind) => FetchOutcome::failure(*kind),
            None => FetchOutcome::success(format!("Card {}", id), "9"),
        }
    }
}

#[derive(Default)]
struct RecordingSnapshot {
    ids: Mutex<Vec<String>>,
}

#[async_trait]
impl DiagnosticSnapshot for RecordingSnapshot {
    async fn snapshot(&self, id: &CertificateId, _timeout: Duration) {
        self.ids.lock().unwrap().push(id.to_string());
    }
}

fn ids(raw: &[&str]) -> Vec<CertificateId> {
    raw.iter().map(|r| CertificateId::new(r).unwrap()).collect()
}

fn scripted_config(concurrency: usize, max_retries: u32, rate_limit_secs: f64) -> Config {
    let mut config = Config::default();
    config.batch.concurrency = concurrency;
    config.batch.rate_limit_secs = rate_limit_secs;
    config.retry.max_retries = max_retries;
    config.retry.base_delay_secs = 1.0;
    config
}

#[tokio::test(start_paused = true)]
async fn test_timeout_certificate_reported_in_order() {
    let temp_dir = tempfile::tempdir().unwrap();
    let report_path = temp_dir.path().join("results.csv");

    let fetcher = Arc::new(ScriptedFetcher::failing("A2", FailureKind::Timeout));
    let snapshot = Arc::new(RecordingSnapshot::default());
    let coordinator = Coordinator::with_collaborators(
        scripted_config(2, 1, 1.0),
        fetcher.clone(),
        snapshot.clone(),
    );

    let stats = run_lookup(
        &coordinator,
        &ids(&["A1", "A2", "A3"]),
        &CsvReport::new(&report_path),
        std::future::pending(),
    )
    .await
    .unwrap();

    assert_eq!(stats.total, 3);
    assert_eq!(stats.failed_ids, vec!["A2".to_string()]);

    // One initial attempt plus one retry, then exactly one snapshot
    assert_eq!(fetcher.calls_for("A2"), 2);
    assert_eq!(fetcher.calls_for("A1"), 1);
    assert_eq!(*snapshot.ids.lock().unwrap(), vec!["A2".to_string()]);

    let csv = std::fs::read_to_string(&report_path).unwrap();
    assert_eq!(
        csv,
        "Certificate ID,Card Name,Grade\r\n\
         A1,Card A1,9\r\n\
         A2,Error,Error\r\n\
         A3,Card A3,9\r\n"
    );
}

#[tokio::test(start_paused = true)]
async fn test_all_failures_still_produce_full_report() {
    let fetcher = Arc::new(ScriptedFetcher {
        failing: HashMap::from([
            ("B1".to_string(), FailureKind::TransportError),
            ("B2".to_string(), FailureKind::ExtractionError),
        ]),
        calls: Mutex::new(Vec::new()),
    });
    let snapshot = Arc::new(RecordingSnapshot::default());
    let coordinator =
        Coordinator::with_collaborators(scripted_config(5, 0, 0.0), fetcher.clone(), snapshot.clone());

    let records = coordinator.run(&ids(&["B1", "B2"])).await.unwrap();

    assert_eq!(
        records,
        vec![
            LookupRecord::failed(CertificateId::new("B1").unwrap()),
            LookupRecord::failed(CertificateId::new("B2").unwrap()),
        ]
    );
    assert_eq!(fetcher.calls_for("B1"), 1);
    assert_eq!(snapshot.ids.lock().unwrap().len(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_zero_rate_limit_dispatches_window_at_once() {
    let coordinator = Coordinator::with_collaborators(
        scripted_config(3, 0, 0.0),
        Arc::new(ScriptedFetcher::default()),
        Arc::new(RecordingSnapshot::default()),
    );

    let start = tokio::time::Instant::now();
    let records = coordinator.run(&ids(&["C1", "C2", "C3"])).await.unwrap();

    assert_eq!(records.len(), 3);
    // Only the simulated 500ms fetch, shared by the whole window
    assert!(start.elapsed() < Duration::from_secs(1));
}

#[tokio::test(start_paused = true)]
async fn test_interrupt_abandons_run() {
    let temp_dir = tempfile::tempdir().unwrap();
    let report_path = temp_dir.path().join("results.csv");

    let coordinator = Coordinator::with_collaborators(
        scripted_config(1, 0, 0.0),
        Arc::new(ScriptedFetcher::default()),
        Arc::new(RecordingSnapshot::default()),
    );

    let result = run_lookup(
        &coordinator,
        &ids(&["D1", "D2", "D3", "D4"]),
        &CsvReport::new(&report_path),
        tokio::time::sleep(Duration::from_millis(1200)),
    )
    .await;

    assert!(matches!(result, Err(LookupError::Interrupted)));
    assert!(!report_path.exists());
}

#[test]
fn test_missing_input_file_is_fatal() {
    let temp_dir = tempfile::tempdir().unwrap();
    let missing = temp_dir.path().join("certs.txt");

    assert!(matches!(
        load_certificate_ids(&missing),
        Err(ConfigError::InputNotFound(_))
    ));
}

#[test]
fn test_blank_input_file_is_fatal() {
    let temp_dir = tempfile::tempdir().unwrap();
    let input = temp_dir.path().join("certs.txt");
    std::fs::write(&input, "\n   \n\n").unwrap();

    assert!(matches!(
        load_certificate_ids(&input),
        Err(ConfigError::EmptyInput(_))
    ));
}

/// Configuration pointing at a mock server, with every delay disabled
fn live_config(server: &MockServer, debug_dir: PathBuf, max_retries: u32) -> Config {
    let mut config = Config::default();
    config.fetch.base_url = format!("{}/cert/", server.uri());
    config.fetch.timeout_ms = 5000;
    config.fetch.settle_ms = 0;
    config.fetch.snapshot_settle_ms = 0;
    config.retry.max_retries = max_retries;
    config.retry.base_delay_secs = 0.0;
    config.batch.concurrency = 2;
    config.batch.rate_limit_secs = 0.0;
    config.output.debug_dir = debug_dir.display().to_string();
    config
}

#[tokio::test]
async fn test_full_lookup_against_mock_site() {
    let server = MockServer::start().await;
    let temp_dir = tempfile::tempdir().unwrap();
    let debug_dir = temp_dir.path().join("debug_pages");
    let report_path = temp_dir.path().join("results.csv");

    let input = temp_dir.path().join("certs.txt");
    std::fs::write(&input, "A1\n\n  A2  \nA3\n").unwrap();

    Mock::given(method("GET"))
        .and(path("/cert/A1"))
        .respond_with(ResponseTemplate::new(200).set_body_string(CARD_PAGE))
        .expect(1)
        .mount(&server)
        .await;

    // Two attempts and one snapshot
    Mock::given(method("GET"))
        .and(path("/cert/A2"))
        .respond_with(ResponseTemplate::new(200).set_body_string(EMPTY_PAGE))
        .expect(3)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/cert/A3"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"<h2 class="sm:text-2xl">Pikachu, Promo</h2><div class="w-3/4 bg-gold">9.5</div>"#,
        ))
        .expect(1)
        .mount(&server)
        .await;

    let ids = load_certificate_ids(&input).unwrap();
    let coordinator = Coordinator::new(live_config(&server, debug_dir.clone(), 1)).unwrap();
    let stats = run_lookup(
        &coordinator,
        &ids,
        &CsvReport::new(&report_path),
        std::future::pending(),
    )
    .await
    .unwrap();

    assert_eq!(stats.succeeded, 2);
    assert_eq!(stats.failed, 1);

    let csv = std::fs::read_to_string(&report_path).unwrap();
    assert_eq!(
        csv,
        "Certificate ID,Card Name,Grade\r\n\
         A1,Charizard Base Set Holo,10\r\n\
         A2,Error,Error\r\n\
         A3,\"Pikachu, Promo\",9.5\r\n"
    );

    assert_eq!(
        std::fs::read_to_string(debug_dir.join("A2.html")).unwrap(),
        EMPTY_PAGE
    );
    assert!(!debug_dir.join("A1.html").exists());
}

#[tokio::test]
async fn test_report_write_failure_is_fatal() {
    let server = MockServer::start().await;
    let temp_dir = tempfile::tempdir().unwrap();

    Mock::given(method("GET"))
        .and(path("/cert/A1"))
        .respond_with(ResponseTemplate::new(200).set_body_string(CARD_PAGE))
        .mount(&server)
        .await;

    let coordinator =
        Coordinator::new(live_config(&server, temp_dir.path().join("debug"), 0)).unwrap();
    let unwritable = temp_dir.path().join("missing_dir").join("results.csv");

    let result = run_lookup(
        &coordinator,
        &ids(&["A1"]),
        &CsvReport::new(&unwritable),
        std::future::pending(),
    )
    .await;

    assert!(matches!(result, Err(LookupError::Output(_))));
}
