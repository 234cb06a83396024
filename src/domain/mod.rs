//! Domain model: catalog types, stays, pricing, payments, reservations and the
//! ports the application layer talks to.

pub mod catalog;
pub mod money;
pub mod payment;
pub mod ports;
pub mod pricing;
pub mod reservation;
pub mod stay;
