use innkeeper::application::engine::ReservationEngine;
use innkeeper::domain::money::Amount;
use innkeeper::domain::payment::PaymentStatus;
use innkeeper::domain::reservation::{Reservation, ReservationStatus};
use innkeeper::domain::stay::StayDates;
use innkeeper::error::ReservationError;
use innkeeper::infrastructure::in_memory::InMemoryReservationStore;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rust_decimal_macros::dec;
use std::sync::Arc;

mod common;

async fn engine() -> Arc<ReservationEngine> {
    Arc::new(common::engine_with_store(Box::new(InMemoryReservationStore::new())).await)
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_room_seven_race() {
    let engine = engine().await;
    let a = common::priced(
        common::request(7, "2025-06-01", "2025-06-04"),
        Amount::new(dec!(300)).unwrap(),
    );
    let b = common::request(7, "2025-06-02", "2025-06-05");

    let first = tokio::spawn({
        let engine = engine.clone();
        async move { engine.create(a, 1).await }
    });
    let second = tokio::spawn({
        let engine = engine.clone();
        async move { engine.create(b, 2).await }
    });
    let results = [first.await.unwrap(), second.await.unwrap()];

    let winners: Vec<&Reservation> = results.iter().filter_map(|r| r.as_ref().ok()).collect();
    assert_eq!(winners.len(), 1);
    assert!(
        results
            .iter()
            .any(|r| matches!(r, Err(ReservationError::Conflict { room_id: 7 })))
    );

    let winner = winners[0];
    assert_eq!(winner.status, ReservationStatus::Confirmed);
    assert_eq!(winner.total_price.value(), dec!(300));
    let payment = winner.payment.as_ref().unwrap();
    assert_eq!(payment.status, PaymentStatus::Success);
    assert!(payment.transaction_id.as_ref().unwrap().starts_with("TXN"));

    let stored = engine.list_all().await.unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].id, winner.id);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_random_concurrent_bookings_never_overlap() {
    let engine = engine().await;
    let mut rng = StdRng::seed_from_u64(0x1d7);

    let mut handles = Vec::new();
    for i in 0..64u64 {
        let room = if rng.gen_bool(0.5) { 7 } else { 8 };
        let start = rng.gen_range(1..=25u32);
        let nights = rng.gen_range(1..=4u32);
        let check_in = format!("2025-06-{start:02}");
        let check_out = format!("2025-06-{:02}", start + nights);
        let request = common::request(room, &check_in, &check_out);
        let actor = 1 + i % 2;
        let engine = engine.clone();
        handles.push(tokio::spawn(async move {
            (room, engine.create(request, actor).await)
        }));
    }

    let mut rejected = Vec::new();
    for handle in handles {
        let (room, result) = handle.await.unwrap();
        match result {
            Ok(_) => {}
            Err(ReservationError::Conflict { room_id }) => {
                assert_eq!(room_id, room);
                rejected.push(room_id);
            }
            Err(e) => panic!("unexpected error: {e}"),
        }
    }

    let confirmed = engine.list_all().await.unwrap();
    assert_eq!(confirmed.len() + rejected.len(), 64);
    for (i, a) in confirmed.iter().enumerate() {
        for b in &confirmed[i + 1..] {
            if a.room_id == b.room_id {
                assert!(
                    !a.dates.overlaps(&b.dates),
                    "{:?} overlaps {:?}",
                    a.dates,
                    b.dates
                );
            }
        }
    }
}

#[tokio::test]
async fn test_cancel_frees_dates_for_rebooking() {
    let engine = engine().await;
    let first = engine
        .create(common::request(7, "2025-06-01", "2025-06-04"), 1)
        .await
        .unwrap();

    let blocked = engine
        .create(common::request(7, "2025-06-03", "2025-06-06"), 2)
        .await;
    assert!(matches!(blocked, Err(ReservationError::Conflict { .. })));

    engine.cancel(first.id, 1).await.unwrap();
    let rebooked = engine
        .create(common::request(7, "2025-06-03", "2025-06-06"), 2)
        .await
        .unwrap();

    let mine = engine.list_for_actor(2).await.unwrap();
    assert_eq!(mine.len(), 1);
    assert_eq!(mine[0].id, rebooked.id);

    let cancelled = engine.get(first.id, 1).await.unwrap();
    assert_eq!(cancelled.status, ReservationStatus::Cancelled);
    assert!(matches!(
        engine.cancel(first.id, 1).await,
        Err(ReservationError::InvalidState(_))
    ));
}

#[tokio::test]
async fn test_hotel_listing_and_view() {
    let engine = engine().await;
    engine
        .create(common::request(7, "2025-06-01", "2025-06-04"), 1)
        .await
        .unwrap();
    let deluxe = engine
        .create(common::request(8, "2025-07-01", "2025-07-03"), 2)
        .await
        .unwrap();

    let listing = engine.list_for_hotel(1).await.unwrap();
    assert_eq!(listing.len(), 2);
    assert_eq!(listing[0].id, deluxe.id);

    let view = engine.describe(&deluxe).await.unwrap();
    assert_eq!(view.hotel_name, "Castle Dracula");
    assert_eq!(view.room_label, "Room 8");
    assert_eq!(view.nights, 2);
    assert_eq!(view.price_per_night.value(), dec!(120));
    assert_eq!(view.total_price.value(), dec!(240));
    assert_eq!(
        StayDates::new(view.check_in, view.check_out).unwrap(),
        deluxe.dates
    );
}
