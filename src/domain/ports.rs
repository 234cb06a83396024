use super::catalog::{Actor, ActorId, Hotel, HotelId, Room, RoomId};
use super::money::Amount;
use super::payment::{Payment, PaymentMethod, Settlement};
use super::reservation::{Reservation, ReservationId, ReservationStatus};
use super::stay::StayDates;
use crate::error::Result;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};

#[async_trait]
pub trait ActorLookup: Send + Sync {
    async fn get_by_id(&self, id: ActorId) -> Result<Option<Actor>>;
}

#[async_trait]
pub trait CatalogLookup: Send + Sync {
    async fn get_hotel(&self, id: HotelId) -> Result<Option<Hotel>>;
    async fn get_room(&self, id: RoomId) -> Result<Option<Room>>;
}

#[async_trait]
pub trait ReservationStore: Send + Sync {
    /// Date ranges of every Confirmed reservation on `room_id`.
    async fn find_confirmed_by_room(&self, room_id: RoomId) -> Result<Vec<StayDates>>;
    /// Persists the reservation and its payment together, or neither.
    ///
    /// Implementations must reject the write with
    /// `ReservationError::TransactionAborted` if a Confirmed reservation on
    /// the same room overlaps at commit time.
    async fn insert(&self, reservation: Reservation, payment: Payment) -> Result<()>;
    async fn update_status(&self, id: ReservationId, status: ReservationStatus) -> Result<()>;
    async fn get(&self, id: ReservationId) -> Result<Option<Reservation>>;
    async fn find_by_actor(&self, actor_id: ActorId) -> Result<Vec<Reservation>>;
    async fn find_by_hotel(&self, hotel_id: HotelId) -> Result<Vec<Reservation>>;
    async fn get_all(&self) -> Result<Vec<Reservation>>;
}

/// An external payment gateway.
#[async_trait]
pub trait PaymentProcessor: Send + Sync {
    async fn attempt(&self, method: &PaymentMethod, amount: Amount) -> Settlement;
    /// Best-effort; the simulated gateways always accept refunds.
    async fn refund(&self, method: &PaymentMethod, amount: Amount) -> bool;
}

pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;

    fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }
}

pub type ActorLookupBox = Box<dyn ActorLookup>;
pub type CatalogLookupBox = Box<dyn CatalogLookup>;
pub type ReservationStoreBox = Box<dyn ReservationStore>;
pub type PaymentProcessorBox = Box<dyn PaymentProcessor>;
pub type ClockBox = Box<dyn Clock>;
pub type ReservationStoreFactory = Box<dyn Fn() -> ReservationStoreBox + Send + Sync>;
