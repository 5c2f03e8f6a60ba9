//! Disposable backing services for integration tests.
//!
//! Every fixture starts a container through `testcontainers` and tears it
//! down when dropped, so a Docker daemon must be reachable.

pub mod error;
pub mod mysql;
pub mod redis;

pub use error::{Result, TestInfraError};
