//! Application state.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use sqlctx_core::{ErrorKind, RetrievalError, RetrievalResult, Retriever, Strategy};

/// Search outcome counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStats {
    pub logic_driven: u64,
    pub schema_only: u64,
    pub invalid_requests: u64,
    pub dependency_failures: u64,
}

impl SearchStats {
    pub fn total(&self) -> u64 {
        self.logic_driven + self.schema_only + self.invalid_requests + self.dependency_failures
    }
}

/// Application state shared across handlers.
pub struct AppState {
    retriever: Arc<Retriever>,
    /// File the domain table is re-read from on reload.
    config_path: Option<PathBuf>,
    start_time: Instant,
    request_count: AtomicU64,
    logic_driven: AtomicU64,
    schema_only: AtomicU64,
    invalid_requests: AtomicU64,
    dependency_failures: AtomicU64,
    reloads: AtomicU64,
}

impl AppState {
    pub fn new(retriever: Arc<Retriever>) -> Self {
        Self {
            retriever,
            config_path: None,
            start_time: Instant::now(),
            request_count: AtomicU64::new(0),
            logic_driven: AtomicU64::new(0),
            schema_only: AtomicU64::new(0),
            invalid_requests: AtomicU64::new(0),
            dependency_failures: AtomicU64::new(0),
            reloads: AtomicU64::new(0),
        }
    }

    pub fn with_config_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_path = Some(path.into());
        self
    }

    pub fn retriever(&self) -> &Arc<Retriever> {
        &self.retriever
    }

    pub fn config_path(&self) -> Option<&Path> {
        self.config_path.as_deref()
    }

    pub fn uptime(&self) -> Duration {
        self.start_time.elapsed()
    }

    pub fn request_count(&self) -> u64 {
        self.request_count.load(Ordering::Relaxed)
    }

    pub fn increment_requests(&self) {
        self.request_count.fetch_add(1, Ordering::Relaxed);
    }

    /// Count a finished search by strategy or error kind.
    pub fn record_search(&self, outcome: &Result<RetrievalResult, RetrievalError>) {
        let counter = match outcome {
            Ok(result) => match result.strategy {
                Strategy::LogicDriven => &self.logic_driven,
                Strategy::SchemaOnly => &self.schema_only,
            },
            Err(err) => match err.kind() {
                ErrorKind::InvalidRequest => &self.invalid_requests,
                ErrorKind::DependencyUnavailable => &self.dependency_failures,
            },
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    /// Count a request rejected before it reached the retriever.
    pub fn record_rejected(&self) {
        self.invalid_requests.fetch_add(1, Ordering::Relaxed);
    }

    pub fn search_stats(&self) -> SearchStats {
        SearchStats {
            logic_driven: self.logic_driven.load(Ordering::Relaxed),
            schema_only: self.schema_only.load(Ordering::Relaxed),
            invalid_requests: self.invalid_requests.load(Ordering::Relaxed),
            dependency_failures: self.dependency_failures.load(Ordering::Relaxed),
        }
    }

    pub fn record_reload(&self) {
        self.reloads.fetch_add(1, Ordering::Relaxed);
    }

    pub fn reload_count(&self) -> u64 {
        self.reloads.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::test_retriever;
    use std::collections::BTreeSet;

    fn result(strategy: Strategy) -> RetrievalResult {
        RetrievalResult {
            strategy,
            domain: "default".to_string(),
            logics: Vec::new(),
            schemas: Vec::new(),
            detected_domains: BTreeSet::new(),
            referenced_tables: BTreeSet::new(),
            processing_time_ms: 0.0,
        }
    }

    #[tokio::test]
    async fn test_request_count() {
        let state = AppState::new(test_retriever().await);
        assert_eq!(state.request_count(), 0);

        state.increment_requests();
        state.increment_requests();
        assert_eq!(state.request_count(), 2);
    }

    #[tokio::test]
    async fn test_record_search_outcomes() {
        let state = AppState::new(test_retriever().await);

        state.record_search(&Ok(result(Strategy::LogicDriven)));
        state.record_search(&Ok(result(Strategy::SchemaOnly)));
        state.record_search(&Ok(result(Strategy::SchemaOnly)));
        state.record_search(&Err(RetrievalError::InvalidRequest("blank".into())));
        state.record_search(&Err(RetrievalError::DeadlineExceeded(Duration::from_secs(1))));
        state.record_rejected();

        let stats = state.search_stats();
        assert_eq!(stats.logic_driven, 1);
        assert_eq!(stats.schema_only, 2);
        assert_eq!(stats.invalid_requests, 2);
        assert_eq!(stats.dependency_failures, 1);
        assert_eq!(stats.total(), 6);
    }

    #[tokio::test]
    async fn test_config_path() {
        let state = AppState::new(test_retriever().await);
        assert!(state.config_path().is_none());

        let state = state.with_config_path("/etc/sqlctx.toml");
        assert_eq!(state.config_path(), Some(Path::new("/etc/sqlctx.toml")));
    }

    #[tokio::test]
    async fn test_reload_count() {
        let state = AppState::new(test_retriever().await);
        state.record_reload();
        assert_eq!(state.reload_count(), 1);
    }
}
