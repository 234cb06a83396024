//! Adapters behind the domain ports: in-memory and RocksDB storage, clocks
//! and the simulated payment gateway.

pub mod clock;
pub mod in_memory;
#[cfg(feature = "storage-rocksdb")]
pub mod rocksdb;
pub mod simulated_payment;
