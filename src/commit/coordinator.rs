//! # Commit Coordinator
//!
//! Submits a bounded mutation list to the store as one all-or-nothing
//! operation. The coordinator never inspects business semantics, only
//! count, and never retries internally: retry policy belongs to the
//! caller, who alone knows whether regenerating mutations with fresh
//! expected versions is appropriate.

use std::sync::Arc;

use crate::observability::{Logger, MetricsRegistry};
use crate::store::{Mutation, RecordStore};

use super::config::CommitConfig;
use super::errors::{CommitError, CommitResult};

/// Coordinator for single bounded atomic commits
#[derive(Clone)]
pub struct CommitCoordinator {
    store: Arc<dyn RecordStore>,
    config: CommitConfig,
    metrics: Arc<MetricsRegistry>,
}

impl CommitCoordinator {
    /// Create a coordinator over a store.
    pub fn new(store: Arc<dyn RecordStore>, config: CommitConfig) -> Self {
        Self {
            store,
            config,
            metrics: Arc::new(MetricsRegistry::new()),
        }
    }

    /// Create a coordinator sharing an external metrics registry.
    pub fn with_metrics(
        store: Arc<dyn RecordStore>,
        config: CommitConfig,
        metrics: Arc<MetricsRegistry>,
    ) -> Self {
        Self {
            store,
            config,
            metrics,
        }
    }

    /// The active configuration.
    pub fn config(&self) -> CommitConfig {
        self.config
    }

    /// The commit-layer metrics.
    pub fn metrics(&self) -> &MetricsRegistry {
        &self.metrics
    }

    /// Handle to the underlying store.
    pub fn store(&self) -> Arc<dyn RecordStore> {
        Arc::clone(&self.store)
    }

    /// Commit a mutation list atomically.
    ///
    /// An empty list succeeds without contacting the store. A list larger
    /// than the ceiling fails fast with [`CommitError::TooLarge`] before
    /// any network call. Otherwise exactly one store operation happens:
    /// either every mutation's preconditions hold and all records are
    /// applied, or none are.
    pub async fn commit(&self, mutations: Vec<Mutation>) -> CommitResult<()> {
        if mutations.is_empty() {
            Logger::trace("COMMIT_EMPTY", &[]);
            return Ok(());
        }

        let count = mutations.len();
        let count_s = count.to_string();

        if count > self.config.ceiling {
            self.metrics.increment_commits_rejected();
            let ceiling_s = self.config.ceiling.to_string();
            Logger::warn(
                "COMMIT_REJECTED",
                &[("mutations", &count_s), ("ceiling", &ceiling_s)],
            );
            return Err(CommitError::TooLarge {
                count,
                ceiling: self.config.ceiling,
            });
        }

        self.metrics.increment_store_calls();
        match self.store.transact(mutations).await {
            Ok(()) => {
                self.metrics.increment_commits_applied();
                Logger::info("COMMIT_APPLIED", &[("mutations", &count_s)]);
                Ok(())
            }
            Err(store_err) => {
                let err = CommitError::from(store_err);
                match &err {
                    CommitError::ConditionFailed { index, reason } => {
                        self.metrics.increment_commits_condition_failed();
                        let index_s = index.to_string();
                        Logger::info(
                            "COMMIT_CONDITION_FAILED",
                            &[
                                ("mutations", &count_s),
                                ("index", &index_s),
                                ("reason", reason),
                            ],
                        );
                    }
                    CommitError::Transient(reason) => {
                        self.metrics.increment_commits_transient_failed();
                        Logger::warn(
                            "COMMIT_TRANSIENT_ERROR",
                            &[("mutations", &count_s), ("reason", reason)],
                        );
                    }
                    CommitError::TooLarge { .. } => {
                        self.metrics.increment_commits_rejected();
                        Logger::error("COMMIT_STORE_LIMIT", &[("mutations", &count_s)]);
                    }
                }
                Err(err)
            }
        }
    }
}
