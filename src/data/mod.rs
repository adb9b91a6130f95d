//! Data held by the running process.

pub mod store;

pub use store::SnapshotStore;
