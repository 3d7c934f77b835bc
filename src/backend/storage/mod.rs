// src/backend/storage/mod.rs
// Stable memory layout and the stores built on it

pub mod accounts;
pub mod chat;
pub mod collection;
pub mod config;
pub mod kv_store;
pub mod memory;
pub mod metrics;
pub mod purchases;
pub mod reminders;
pub mod sequence;
pub mod storable;

pub use collection::{scoped_key, Record, RecordCollection, SortPolicy};
pub use kv_store::{with_kv_store, KeyValueStore, StableKvStore};
pub use memory::Memory;
pub use storable::Cbor;
