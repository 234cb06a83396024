use crate::domain::catalog::RoomId;
use crate::domain::ports::ReservationStore;
use crate::domain::stay::StayDates;
use crate::error::Result;

/// Answers whether a requested stay collides with a Confirmed reservation.
///
/// Only reads from the store. Callers that act on the answer must hold the
/// room's lock, otherwise the answer can be stale by the time they commit.
pub struct IntervalConflictChecker<'a> {
    store: &'a dyn ReservationStore,
}

impl<'a> IntervalConflictChecker<'a> {
    pub fn new(store: &'a dyn ReservationStore) -> Self {
        Self { store }
    }

    pub async fn has_conflict(&self, room_id: RoomId, requested: &StayDates) -> Result<bool> {
        let booked = self.store.find_confirmed_by_room(room_id).await?;
        Ok(booked.iter().any(|existing| existing.overlaps(requested)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::money::Amount;
    use crate::domain::payment::{Payment, PaymentMethodKind};
    use crate::domain::reservation::{Reservation, ReservationStatus};
    use crate::infrastructure::in_memory::InMemoryReservationStore;
    use chrono::{NaiveDate, Utc};
    use rust_decimal_macros::dec;

    fn jan(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, day).unwrap()
    }

    async fn book(
        store: &InMemoryReservationStore,
        room_id: RoomId,
        from: u32,
        to: u32,
    ) -> Reservation {
        let reservation = Reservation::tentative(
            1,
            1,
            room_id,
            StayDates::new(jan(from), jan(to)).unwrap(),
            1,
            None,
            Amount::new(dec!(100)).unwrap(),
        );
        let payment = Payment::pending(
            reservation.id,
            reservation.total_price,
            PaymentMethodKind::Card,
            Utc::now(),
        );
        store.insert(reservation.clone(), payment).await.unwrap();
        reservation
    }

    #[tokio::test]
    async fn test_back_to_back_is_free() {
        let store = InMemoryReservationStore::new();
        book(&store, 7, 1, 5).await;
        let checker = IntervalConflictChecker::new(&store);

        let requested = StayDates::new(jan(5), jan(8)).unwrap();
        assert!(!checker.has_conflict(7, &requested).await.unwrap());
    }

    #[tokio::test]
    async fn test_overlap_is_conflict() {
        let store = InMemoryReservationStore::new();
        book(&store, 7, 1, 5).await;
        let checker = IntervalConflictChecker::new(&store);

        let requested = StayDates::new(jan(3), jan(6)).unwrap();
        assert!(checker.has_conflict(7, &requested).await.unwrap());
    }

    #[tokio::test]
    async fn test_other_rooms_do_not_conflict() {
        let store = InMemoryReservationStore::new();
        book(&store, 7, 1, 5).await;
        let checker = IntervalConflictChecker::new(&store);

        let requested = StayDates::new(jan(1), jan(5)).unwrap();
        assert!(!checker.has_conflict(8, &requested).await.unwrap());
    }

    #[tokio::test]
    async fn test_cancelled_reservations_are_ignored() {
        let store = InMemoryReservationStore::new();
        let existing = book(&store, 7, 1, 5).await;
        store
            .update_status(existing.id, ReservationStatus::Cancelled)
            .await
            .unwrap();
        let checker = IntervalConflictChecker::new(&store);

        let requested = StayDates::new(jan(2), jan(4)).unwrap();
        assert!(!checker.has_conflict(7, &requested).await.unwrap());
    }
}
