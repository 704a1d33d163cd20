//! Health score and closing-readiness for real-estate transactions.
//!
//! [`scoring::compute_health`] turns a [`snapshot::TransactionSnapshot`] and an
//! explicit `now` into a 0-100 score, a readiness tier, a per-category
//! breakdown, blockers and recommendations. The other modules feed it
//! (`store`, `config`) or present it (`server`, `output`).

pub mod config;
pub mod output;
pub mod scoring;
pub mod server;
pub mod snapshot;
pub mod store;
