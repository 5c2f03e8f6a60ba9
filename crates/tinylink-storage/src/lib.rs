//! [`UrlStore`](tinylink_core::UrlStore) implementations.

pub mod memory;
pub mod mysql;

pub use memory::InMemoryStore;
pub use mysql::MySqlStore;
pub use tinylink_core::store::{IncrementOutcome, InsertOutcome, Result, UrlRecord, UrlStore};
pub use tinylink_core::StorageError;
