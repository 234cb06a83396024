use innkeeper::domain::ports::{ReservationStoreBox, ReservationStoreFactory};
use innkeeper::infrastructure::in_memory::InMemoryReservationStore;

mod common;

#[tokio::test]
async fn test_factory_instantiation() {
    let factory: ReservationStoreFactory =
        Box::new(|| Box::new(InMemoryReservationStore::new()) as ReservationStoreBox);

    let engine = common::engine_with_store(factory()).await;
    let reservation = engine
        .create(common::request(7, "2025-06-01", "2025-06-04"), 1)
        .await
        .unwrap();

    let retrieved = engine.get(reservation.id, 1).await.unwrap();
    assert_eq!(retrieved.room_id, 7);
    assert!(retrieved.payment.is_some());
}

#[tokio::test]
async fn test_factory_stores_are_independent() {
    let factory: ReservationStoreFactory =
        Box::new(|| Box::new(InMemoryReservationStore::new()) as ReservationStoreBox);

    let first = common::engine_with_store(factory()).await;
    let handle = tokio::spawn(async move {
        let second = common::engine_with_store(factory()).await;
        second
            .create(common::request(7, "2025-06-01", "2025-06-04"), 2)
            .await
            .map(|r| r.id)
    });

    first
        .create(common::request(7, "2025-06-01", "2025-06-04"), 1)
        .await
        .unwrap();
    // Same room and dates succeed because the stores share nothing
    assert!(handle.await.unwrap().is_ok());
}
