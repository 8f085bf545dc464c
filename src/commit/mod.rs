//! # Commit Layer
//!
//! The two write paths of the application, both built on the store's
//! conditional multi-mutation commit:
//!
//! - [`CommitCoordinator`]: one bounded all-or-nothing commit. The only
//!   path business transactions are allowed to take.
//! - [`BatchExecutor`]: chunked, sequential, best-effort execution of an
//!   arbitrarily large mutation list. Explicitly non-atomic across chunks;
//!   for bulk/maintenance work that tolerates partial, resumable progress.

pub mod batch;
pub mod config;
pub mod coordinator;
pub mod errors;

pub use batch::{BatchExecutor, BatchOutcome};
pub use config::CommitConfig;
pub use coordinator::CommitCoordinator;
pub use errors::{CommitError, CommitResult};
