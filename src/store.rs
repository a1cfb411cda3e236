//! Session store
//!
//! Process-wide owner of the load state machine and the directory service.
//! `idle --fetch--> loading --> success | error`; `success` is terminal for
//! the session (redundant fetches are no-ops), `error` permits a manual
//! retry. The guard also covers `loading`, so concurrent fetches never
//! trigger a second transport call.

use serde::Serialize;
use std::sync::Arc;
use tokio::sync::{RwLock, RwLockReadGuard};
use tracing::{error, info, warn};

use crate::services::geocoder::Geocoder;
use crate::services::transport::EmployeeTransport;
use crate::services::DirectoryService;

/// Load status observed by consumers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    Idle,
    Loading,
    Success,
    Error,
}

/// Read-only snapshot for status observers
#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot {
    pub status: SessionStatus,
    pub error: Option<String>,
    pub count: usize,
}

struct SessionState {
    status: SessionStatus,
    error: Option<String>,
    directory: DirectoryService,
}

/// Single owner of session state. Constructed once at startup and shared via
/// `Arc`; all mutation goes through [`SessionStore::fetch_employees`].
pub struct SessionStore {
    state: RwLock<SessionState>,
    transport: Arc<dyn EmployeeTransport>,
    geocoder: Arc<Geocoder>,
}

impl SessionStore {
    pub fn new(transport: Arc<dyn EmployeeTransport>, geocoder: Arc<Geocoder>) -> Self {
        Self {
            state: RwLock::new(SessionState {
                status: SessionStatus::Idle,
                error: None,
                directory: DirectoryService::new(),
            }),
            transport,
            geocoder,
        }
    }

    /// Run the session load at most once.
    ///
    /// Returns immediately when a load has already succeeded or is currently
    /// in flight. The load itself runs without holding the state lock, so
    /// queries keep reading the previous snapshot while enrichment is
    /// rate-limit sleeping.
    pub async fn fetch_employees(&self) {
        {
            let mut state = self.state.write().await;
            match state.status {
                SessionStatus::Success => return,
                SessionStatus::Loading => return,
                SessionStatus::Idle | SessionStatus::Error => {
                    state.status = SessionStatus::Loading;
                    state.error = None;
                }
            }
        }

        info!("Session load started");

        let mut fresh = DirectoryService::new();
        let result = fresh
            .load_all(self.transport.as_ref(), &self.geocoder)
            .await;

        let mut state = self.state.write().await;
        match result {
            Ok(_) => {
                info!(count = fresh.len(), "Session load succeeded");
                state.directory = fresh;
                state.status = SessionStatus::Success;
            }
            Err(e) => {
                error!(error = %e, "Session load failed");
                state.status = SessionStatus::Error;
                state.error = Some(e.to_string());
            }
        }
    }

    pub async fn status(&self) -> SessionStatus {
        self.state.read().await.status
    }

    pub async fn snapshot(&self) -> SessionSnapshot {
        let state = self.state.read().await;
        SessionSnapshot {
            status: state.status,
            error: state.error.clone(),
            count: state.directory.len(),
        }
    }

    /// Read access to the directory for query handlers.
    pub async fn directory(&self) -> RwLockReadGuard<'_, DirectoryService> {
        RwLockReadGuard::map(self.state.read().await, |s| &s.directory)
    }

    /// Drop the session collection and return to `idle`. The geocode cache
    /// survives on purpose: it exists to avoid redundant external calls.
    pub async fn clear(&self) {
        let mut state = self.state.write().await;
        if state.status == SessionStatus::Loading {
            warn!("Clear requested while a load is in flight, ignoring");
            return;
        }
        state.status = SessionStatus::Idle;
        state.error = None;
        state.directory = DirectoryService::new();
    }
}
