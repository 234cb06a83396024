use super::catalog::{ActorId, HotelId, RoomId};
use super::money::Amount;
use super::payment::{Payment, PaymentMethod};
use super::pricing::RoomCategory;
use super::stay::StayDates;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

pub type ReservationId = Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ReservationStatus {
    Confirmed,
    Cancelled,
    /// Reached after checkout by an external process; terminal.
    Completed,
}

impl fmt::Display for ReservationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ReservationStatus::Confirmed => "CONFIRMED",
            ReservationStatus::Cancelled => "CANCELLED",
            ReservationStatus::Completed => "COMPLETED",
        };
        f.write_str(name)
    }
}

/// What a caller asks for when booking a room.
///
/// Dates are kept raw here; the engine validates them. `total_price` is
/// optional: when absent the engine prices the stay itself. `reservation_id`
/// lets the caller choose the id up front; otherwise a fresh one is minted.
#[derive(Debug, Clone)]
pub struct ReservationRequest {
    pub reservation_id: Option<ReservationId>,
    pub hotel_id: HotelId,
    pub room_id: RoomId,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub guests: u32,
    pub note: Option<String>,
    pub total_price: Option<Amount>,
    pub payment_method: PaymentMethod,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reservation {
    pub id: ReservationId,
    pub actor_id: ActorId,
    pub room_id: RoomId,
    /// Denormalized for reporting; conflict detection never looks at it.
    pub hotel_id: HotelId,
    pub dates: StayDates,
    pub guests: u32,
    pub note: Option<String>,
    pub total_price: Amount,
    pub status: ReservationStatus,
    /// Filled in by stores on read; stored separately from the reservation row.
    #[serde(skip)]
    pub payment: Option<Payment>,
}

impl Reservation {
    /// A Confirmed reservation that exists only in memory until the payment settles.
    pub fn tentative(
        actor_id: ActorId,
        hotel_id: HotelId,
        room_id: RoomId,
        dates: StayDates,
        guests: u32,
        note: Option<String>,
        total_price: Amount,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            actor_id,
            room_id,
            hotel_id,
            dates,
            guests,
            note,
            total_price,
            status: ReservationStatus::Confirmed,
            payment: None,
        }
    }

    pub fn check_in(&self) -> NaiveDate {
        self.dates.check_in()
    }

    pub fn check_out(&self) -> NaiveDate {
        self.dates.check_out()
    }

    pub fn nights(&self) -> u32 {
        self.dates.nights()
    }

    pub fn is_cancellable(&self, today: NaiveDate) -> bool {
        self.status == ReservationStatus::Confirmed && self.check_in() > today
    }

    /// Guest is in-house today.
    pub fn is_active(&self, today: NaiveDate) -> bool {
        self.status == ReservationStatus::Confirmed
            && self.check_in() <= today
            && self.check_out() >= today
    }
}

/// Orders reservations by check-in, most recent first.
pub fn sort_by_check_in_desc(reservations: &mut [Reservation]) {
    reservations.sort_by(|a, b| b.check_in().cmp(&a.check_in()));
}

/// A reservation joined with its catalog data, for listings and reports.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReservationView {
    pub id: ReservationId,
    pub actor_id: ActorId,
    pub hotel_id: HotelId,
    pub hotel_name: String,
    pub location: String,
    pub room_id: RoomId,
    pub room_label: String,
    pub category: RoomCategory,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub nights: u32,
    pub guests: u32,
    pub note: Option<String>,
    pub price_per_night: Amount,
    pub total_price: Amount,
    pub status: ReservationStatus,
}
