//! Durable tip history storage
//!
//! This module provides the file-backed store for generated tips. The store
//! keeps a bounded, insertion-ordered history in one JSON file, recovers a
//! corrupt file as an empty history at load time, and rewrites the file
//! atomically on every append.

mod store;

pub use store::{CacheStore, StoreError, TipEntry};
