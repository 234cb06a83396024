//! Batch CSV adapters used by the binary: requests in, reservations out.

pub mod request_reader;
pub mod reservation_writer;
