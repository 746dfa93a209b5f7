//! Adapters for the domain ports.
//!
//! In-memory stores are always available. The RocksDB store is compiled only
//! with the `storage-rocksdb` feature.

pub mod in_memory;
pub mod json_file;
#[cfg(feature = "storage-rocksdb")]
pub mod rocksdb;
