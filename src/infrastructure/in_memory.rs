use crate::domain::catalog::{Actor, ActorId, Hotel, HotelId, Room, RoomId};
use crate::domain::payment::Payment;
use crate::domain::ports::{ActorLookup, CatalogLookup, ReservationStore};
use crate::domain::reservation::{Reservation, ReservationId, ReservationStatus};
use crate::domain::stay::StayDates;
use crate::error::{ReservationError, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// A read-mostly in-memory catalog of actors, hotels and rooms.
///
/// Seeded from configuration or tests; the engine only ever reads it.
#[derive(Default, Clone)]
pub struct InMemoryCatalog {
    actors: Arc<RwLock<HashMap<ActorId, Actor>>>,
    hotels: Arc<RwLock<HashMap<HotelId, Hotel>>>,
    rooms: Arc<RwLock<HashMap<RoomId, Room>>>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn add_actor(&self, actor: Actor) {
        self.actors.write().await.insert(actor.id, actor);
    }

    pub async fn add_hotel(&self, hotel: Hotel) {
        self.hotels.write().await.insert(hotel.id, hotel);
    }

    pub async fn add_room(&self, room: Room) {
        self.rooms.write().await.insert(room.id, room);
    }
}

#[async_trait]
impl ActorLookup for InMemoryCatalog {
    async fn get_by_id(&self, id: ActorId) -> Result<Option<Actor>> {
        Ok(self.actors.read().await.get(&id).cloned())
    }
}

#[async_trait]
impl CatalogLookup for InMemoryCatalog {
    async fn get_hotel(&self, id: HotelId) -> Result<Option<Hotel>> {
        Ok(self.hotels.read().await.get(&id).cloned())
    }

    async fn get_room(&self, id: RoomId) -> Result<Option<Room>> {
        Ok(self.rooms.read().await.get(&id).cloned())
    }
}

#[derive(Default)]
struct Tables {
    reservations: HashMap<ReservationId, Reservation>,
    /// Keyed by owning reservation: at most one payment each.
    payments: HashMap<ReservationId, Payment>,
}

impl Tables {
    fn joined(&self, reservation: &Reservation) -> Reservation {
        let mut reservation = reservation.clone();
        reservation.payment = self.payments.get(&reservation.id).cloned();
        reservation
    }
}

/// A thread-safe in-memory reservation store.
///
/// Reservations and payments live behind a single `RwLock`, so `insert`
/// commits both rows under one write guard and readers never observe one
/// without the other.
#[derive(Default, Clone)]
pub struct InMemoryReservationStore {
    tables: Arc<RwLock<Tables>>,
}

impl InMemoryReservationStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ReservationStore for InMemoryReservationStore {
    async fn find_confirmed_by_room(&self, room_id: RoomId) -> Result<Vec<StayDates>> {
        let tables = self.tables.read().await;
        Ok(tables
            .reservations
            .values()
            .filter(|r| r.room_id == room_id && r.status == ReservationStatus::Confirmed)
            .map(|r| r.dates)
            .collect())
    }

    async fn insert(&self, mut reservation: Reservation, payment: Payment) -> Result<()> {
        if payment.reservation_id != reservation.id {
            return Err(ReservationError::InvalidRequest(format!(
                "payment {} does not belong to reservation {}",
                payment.id, reservation.id
            )));
        }

        let mut tables = self.tables.write().await;
        if tables.reservations.contains_key(&reservation.id) {
            return Err(ReservationError::TransactionAborted(format!(
                "reservation {} already exists",
                reservation.id
            )));
        }
        let overlapping = tables.reservations.values().any(|existing| {
            existing.room_id == reservation.room_id
                && existing.status == ReservationStatus::Confirmed
                && existing.dates.overlaps(&reservation.dates)
        });
        if reservation.status == ReservationStatus::Confirmed && overlapping {
            return Err(ReservationError::TransactionAborted(format!(
                "room {} already has a confirmed reservation for these dates",
                reservation.room_id
            )));
        }

        reservation.payment = None;
        tables.payments.insert(reservation.id, payment);
        tables.reservations.insert(reservation.id, reservation);
        Ok(())
    }

    async fn update_status(&self, id: ReservationId, status: ReservationStatus) -> Result<()> {
        let mut tables = self.tables.write().await;
        let reservation = tables
            .reservations
            .get_mut(&id)
            .ok_or_else(|| ReservationError::not_found("Reservation", id))?;
        reservation.status = status;
        Ok(())
    }

    async fn get(&self, id: ReservationId) -> Result<Option<Reservation>> {
        let tables = self.tables.read().await;
        Ok(tables.reservations.get(&id).map(|r| tables.joined(r)))
    }

    async fn find_by_actor(&self, actor_id: ActorId) -> Result<Vec<Reservation>> {
        let tables = self.tables.read().await;
        Ok(tables
            .reservations
            .values()
            .filter(|r| r.actor_id == actor_id)
            .map(|r| tables.joined(r))
            .collect())
    }

    async fn find_by_hotel(&self, hotel_id: HotelId) -> Result<Vec<Reservation>> {
        let tables = self.tables.read().await;
        Ok(tables
            .reservations
            .values()
            .filter(|r| r.hotel_id == hotel_id)
            .map(|r| tables.joined(r))
            .collect())
    }

    async fn get_all(&self) -> Result<Vec<Reservation>> {
        let tables = self.tables.read().await;
        Ok(tables
            .reservations
            .values()
            .map(|r| tables.joined(r))
            .collect())
    }
}
