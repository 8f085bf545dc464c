//! # Batch Executor
//!
//! Chunked execution of a mutation list larger than one commit may carry.
//! Atomicity holds within each chunk and nowhere else: the executor runs
//! every chunk to the end regardless of earlier failures and reports the
//! complete picture, so a caller can re-derive and resubmit exactly the
//! chunks that failed. Never a substitute for a single atomic commit on a
//! business transaction.

use crate::observability::Logger;
use crate::store::Mutation;

use super::coordinator::CommitCoordinator;
use super::errors::CommitError;

/// Outcome of one batch run. A return value, never persisted.
///
/// A non-empty `failed_chunks` list means the overall operation is
/// partially applied and must be reconciled; it is never a safe,
/// consistent end state.
#[derive(Debug, Clone, Default)]
pub struct BatchOutcome {
    /// Number of chunks the list was split into
    pub chunk_count: usize,
    /// Indices of chunks the store applied
    pub succeeded_chunks: Vec<usize>,
    /// Indices of chunks that failed
    pub failed_chunks: Vec<usize>,
    /// Most recent chunk error
    pub last_error: Option<CommitError>,
}

impl BatchOutcome {
    /// Every chunk applied.
    pub fn is_complete(&self) -> bool {
        self.failed_chunks.is_empty()
    }

    /// Some chunks applied and some failed.
    pub fn is_partial(&self) -> bool {
        !self.failed_chunks.is_empty() && !self.succeeded_chunks.is_empty()
    }
}

/// Chunked, sequential, continue-on-error executor
pub struct BatchExecutor {
    coordinator: CommitCoordinator,
}

impl BatchExecutor {
    /// Create an executor over a coordinator.
    pub fn new(coordinator: CommitCoordinator) -> Self {
        Self { coordinator }
    }

    /// The coordinator used per chunk.
    pub fn coordinator(&self) -> &CommitCoordinator {
        &self.coordinator
    }

    /// Split `mutations` into consecutive chunks of at most the ceiling,
    /// preserving order, and commit them one at a time.
    ///
    /// Chunks are committed sequentially and a failed chunk does not stop
    /// later ones. No rollback ever happens.
    pub async fn commit_batches(&self, mutations: Vec<Mutation>) -> BatchOutcome {
        if mutations.is_empty() {
            return BatchOutcome::default();
        }

        let chunks = split_chunks(mutations, self.coordinator.config().ceiling);
        let mut outcome = BatchOutcome {
            chunk_count: chunks.len(),
            ..BatchOutcome::default()
        };

        for (index, chunk) in chunks.into_iter().enumerate() {
            let index_s = index.to_string();
            match self.coordinator.commit(chunk).await {
                Ok(()) => {
                    self.coordinator.metrics().increment_batch_chunks_applied();
                    outcome.succeeded_chunks.push(index);
                }
                Err(err) => {
                    self.coordinator.metrics().increment_batch_chunks_failed();
                    let reason = err.to_string();
                    Logger::warn(
                        "BATCH_CHUNK_FAILED",
                        &[("chunk", &index_s), ("reason", &reason)],
                    );
                    outcome.failed_chunks.push(index);
                    outcome.last_error = Some(err);
                }
            }
        }

        let chunks_s = outcome.chunk_count.to_string();
        if outcome.is_complete() {
            Logger::info("BATCH_COMPLETE", &[("chunks", &chunks_s)]);
        } else {
            let failed_s = outcome.failed_chunks.len().to_string();
            Logger::warn(
                "BATCH_PARTIAL",
                &[("chunks", &chunks_s), ("failed", &failed_s)],
            );
        }

        outcome
    }
}

/// Split into consecutive chunks of at most `size`, preserving order.
fn split_chunks(mutations: Vec<Mutation>, size: usize) -> Vec<Vec<Mutation>> {
    let mut chunks = Vec::with_capacity(mutations.len().div_ceil(size));
    let mut rest = mutations;
    while rest.len() > size {
        let tail = rest.split_off(size);
        chunks.push(rest);
        rest = tail;
    }
    chunks.push(rest);
    chunks
}
