//! Application layer containing the reservation orchestration.
//!
//! This module defines the `ReservationEngine`, the entry point for booking,
//! cancelling and listing stays. Room-scoped async locks serialize the
//! conflict check and commit for each room.

pub mod conflict;
pub mod engine;
pub mod room_locks;
