//! Infrastructure adapters for application ports.

#![forbid(unsafe_code)]

mod in_memory_verdict_repository;
mod inventory_snapshot_provider;
mod postgres_verdict_repository;

pub use in_memory_verdict_repository::InMemoryVerdictRepository;
pub use inventory_snapshot_provider::InventorySnapshotProvider;
pub use postgres_verdict_repository::{MIGRATOR, PostgresVerdictRepository};
