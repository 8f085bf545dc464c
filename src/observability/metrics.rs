//! Commit-layer metrics
//!
//! Counters only: monotonic, exact, reset on process start. Atomic with
//! `Relaxed` ordering; metrics tolerate eventual consistency.

use std::sync::atomic::{AtomicU64, Ordering};

/// Registry of commit-layer counters
#[derive(Debug, Default)]
pub struct MetricsRegistry {
    /// Commits applied by the store
    commits_applied: AtomicU64,
    /// Commits rejected before any store call (ceiling)
    commits_rejected: AtomicU64,
    /// Commits refused by a condition predicate
    commits_condition_failed: AtomicU64,
    /// Commits lost to transport/store faults
    commits_transient_failed: AtomicU64,
    /// Batch chunks applied
    batch_chunks_applied: AtomicU64,
    /// Batch chunks failed
    batch_chunks_failed: AtomicU64,
    /// Transact calls issued to the store
    store_calls: AtomicU64,
}

impl MetricsRegistry {
    /// Create a registry with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an applied commit.
    pub fn increment_commits_applied(&self) {
        self.commits_applied.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a commit rejected before reaching the store.
    pub fn increment_commits_rejected(&self) {
        self.commits_rejected.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a commit refused by a condition predicate.
    pub fn increment_commits_condition_failed(&self) {
        self.commits_condition_failed.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a commit lost to a transient fault.
    pub fn increment_commits_transient_failed(&self) {
        self.commits_transient_failed.fetch_add(1, Ordering::Relaxed);
    }

    /// Record an applied batch chunk.
    pub fn increment_batch_chunks_applied(&self) {
        self.batch_chunks_applied.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a failed batch chunk.
    pub fn increment_batch_chunks_failed(&self) {
        self.batch_chunks_failed.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a transact call issued to the store.
    pub fn increment_store_calls(&self) {
        self.store_calls.fetch_add(1, Ordering::Relaxed);
    }

    /// Commits applied.
    pub fn commits_applied(&self) -> u64 {
        self.commits_applied.load(Ordering::Relaxed)
    }

    /// Commits rejected before any store call.
    pub fn commits_rejected(&self) -> u64 {
        self.commits_rejected.load(Ordering::Relaxed)
    }

    /// Commits refused by a condition predicate.
    pub fn commits_condition_failed(&self) -> u64 {
        self.commits_condition_failed.load(Ordering::Relaxed)
    }

    /// Commits lost to transient faults.
    pub fn commits_transient_failed(&self) -> u64 {
        self.commits_transient_failed.load(Ordering::Relaxed)
    }

    /// Batch chunks applied.
    pub fn batch_chunks_applied(&self) -> u64 {
        self.batch_chunks_applied.load(Ordering::Relaxed)
    }

    /// Batch chunks failed.
    pub fn batch_chunks_failed(&self) -> u64 {
        self.batch_chunks_failed.load(Ordering::Relaxed)
    }

    /// Transact calls issued.
    pub fn store_calls(&self) -> u64 {
        self.store_calls.load(Ordering::Relaxed)
    }
}
