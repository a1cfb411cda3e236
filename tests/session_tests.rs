//! Session store state machine and single-load guarantee

use async_trait::async_trait;
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use empdir::services::geocoder::{Coordinates, GeocodeBackend, GeocodeError, Geocoder};
use empdir::services::transport::{EmployeeTransport, RawPayload};
use empdir::store::{SessionStatus, SessionStore};
use empdir::Error;

/// Backend that never resolves anything; keeps tests off the network.
struct NullBackend;

#[async_trait]
impl GeocodeBackend for NullBackend {
    async fn lookup(&self, _city: &str) -> Result<Option<Coordinates>, GeocodeError> {
        Ok(None)
    }
}

/// Transport serving a canned payload, with a configurable response delay
/// and an optional number of leading failures.
struct FakeTransport {
    calls: AtomicUsize,
    delay: Duration,
    fail_first: usize,
}

impl FakeTransport {
    fn new() -> Self {
        Self {
            calls: AtomicUsize::new(0),
            delay: Duration::from_millis(0),
            fail_first: 0,
        }
    }

    fn slow(delay: Duration) -> Self {
        Self {
            delay,
            ..Self::new()
        }
    }

    fn failing_first(n: usize) -> Self {
        Self {
            fail_first: n,
            ..Self::new()
        }
    }

    fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn payload() -> RawPayload {
        serde_json::from_value(json!({
            "TABLE_DATA": {
                "data": [
                    ["Asha Rao", "Engineer", "Mumbai", "7", "2020-01-01", "$90,000"],
                    ["Vikram Iyer", "Designer", "Pune", "8", "2021-03-15", "$70,000"],
                ]
            }
        }))
        .unwrap()
    }
}

#[async_trait]
impl EmployeeTransport for FakeTransport {
    async fn fetch_raw(&self) -> Result<RawPayload, Error> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(self.delay).await;
        if call < self.fail_first {
            return Err(Error::Transport("upstream unavailable".to_string()));
        }
        Ok(Self::payload())
    }
}

fn store_with(transport: Arc<FakeTransport>) -> SessionStore {
    let geocoder = Arc::new(Geocoder::new(Arc::new(NullBackend), 0));
    SessionStore::new(transport, geocoder)
}

#[tokio::test]
async fn test_idle_to_success_transition() {
    let transport = Arc::new(FakeTransport::new());
    let store = store_with(transport.clone());

    assert_eq!(store.status().await, SessionStatus::Idle);

    store.fetch_employees().await;

    let snapshot = store.snapshot().await;
    assert_eq!(snapshot.status, SessionStatus::Success);
    assert_eq!(snapshot.count, 2);
    assert!(snapshot.error.is_none());
}

#[tokio::test]
async fn test_concurrent_fetches_trigger_one_transport_call() {
    let transport = Arc::new(FakeTransport::slow(Duration::from_millis(50)));
    let store = Arc::new(store_with(transport.clone()));

    let mut handles = Vec::new();
    for _ in 0..3 {
        let store = Arc::clone(&store);
        handles.push(tokio::spawn(async move {
            store.fetch_employees().await;
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }

    // The first caller ran the load; the others hit the loading guard.
    assert_eq!(transport.call_count(), 1);
    assert_eq!(store.status().await, SessionStatus::Success);
}

#[tokio::test]
async fn test_success_suppresses_refetch() {
    let transport = Arc::new(FakeTransport::new());
    let store = store_with(transport.clone());

    store.fetch_employees().await;
    store.fetch_employees().await;
    store.fetch_employees().await;

    assert_eq!(transport.call_count(), 1);
    assert_eq!(store.status().await, SessionStatus::Success);
}

#[tokio::test]
async fn test_transport_failure_sets_error_status() {
    let transport = Arc::new(FakeTransport::failing_first(1));
    let store = store_with(transport.clone());

    store.fetch_employees().await;

    let snapshot = store.snapshot().await;
    assert_eq!(snapshot.status, SessionStatus::Error);
    assert_eq!(snapshot.count, 0);
    assert!(snapshot.error.unwrap().contains("upstream unavailable"));
}

#[tokio::test]
async fn test_error_state_permits_manual_retry() {
    let transport = Arc::new(FakeTransport::failing_first(1));
    let store = store_with(transport.clone());

    store.fetch_employees().await;
    assert_eq!(store.status().await, SessionStatus::Error);

    store.fetch_employees().await;
    assert_eq!(store.status().await, SessionStatus::Success);
    assert_eq!(transport.call_count(), 2);

    // Error message is cleared on successful retry
    assert!(store.snapshot().await.error.is_none());
}

#[tokio::test]
async fn test_clear_returns_to_idle_and_allows_reload() {
    let transport = Arc::new(FakeTransport::new());
    let store = store_with(transport.clone());

    store.fetch_employees().await;
    assert_eq!(store.snapshot().await.count, 2);

    store.clear().await;
    let snapshot = store.snapshot().await;
    assert_eq!(snapshot.status, SessionStatus::Idle);
    assert_eq!(snapshot.count, 0);

    store.fetch_employees().await;
    assert_eq!(store.status().await, SessionStatus::Success);
    assert_eq!(transport.call_count(), 2);
}

#[tokio::test]
async fn test_queries_read_previous_snapshot_during_load() {
    let transport = Arc::new(FakeTransport::slow(Duration::from_millis(100)));
    let store = Arc::new(store_with(transport.clone()));

    let loader = {
        let store = Arc::clone(&store);
        tokio::spawn(async move { store.fetch_employees().await })
    };

    // While the load is in flight the directory must stay readable.
    tokio::time::sleep(Duration::from_millis(20)).await;
    assert_eq!(store.status().await, SessionStatus::Loading);
    assert!(store.directory().await.is_empty());

    loader.await.unwrap();
    assert_eq!(store.directory().await.len(), 2);
}
