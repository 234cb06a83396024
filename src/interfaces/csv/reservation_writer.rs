use crate::domain::catalog::{ActorId, HotelId, RoomId};
use crate::domain::payment::PaymentStatus;
use crate::domain::reservation::{Reservation, ReservationId, ReservationStatus};
use crate::error::Result;
use chrono::NaiveDate;
use serde::Serialize;
use std::io::Write;

const COLUMNS: [&str; 13] = [
    "id",
    "actor",
    "hotel",
    "room",
    "check_in",
    "check_out",
    "nights",
    "guests",
    "total_price",
    "status",
    "payment_method",
    "payment_status",
    "transaction_id",
];

/// Flat output row, in `COLUMNS` order. Payment columns are empty for reservations loaded without
/// a payment record.
#[derive(Debug, Serialize)]
struct ReservationRow {
    id: ReservationId,
    actor: ActorId,
    hotel: HotelId,
    room: RoomId,
    check_in: NaiveDate,
    check_out: NaiveDate,
    nights: u32,
    guests: u32,
    total_price: String,
    status: ReservationStatus,
    payment_method: Option<&'static str>,
    payment_status: Option<PaymentStatus>,
    transaction_id: Option<String>,
}

impl From<Reservation> for ReservationRow {
    fn from(reservation: Reservation) -> Self {
        let nights = reservation.nights();
        let payment = reservation.payment;
        Self {
            id: reservation.id,
            actor: reservation.actor_id,
            hotel: reservation.hotel_id,
            room: reservation.room_id,
            check_in: reservation.dates.check_in(),
            check_out: reservation.dates.check_out(),
            nights,
            guests: reservation.guests,
            total_price: reservation.total_price.to_string(),
            status: reservation.status,
            payment_method: payment.as_ref().map(|p| p.method.tag()),
            payment_status: payment.as_ref().map(|p| p.status),
            transaction_id: payment.and_then(|p| p.transaction_id),
        }
    }
}

/// Writes reservations as CSV, one row per reservation.
///
/// The header is always written, even when there is nothing to report.
pub struct ReservationWriter<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> ReservationWriter<W> {
    pub fn new(sink: W) -> Self {
        let writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(sink);
        Self { writer }
    }

    pub fn write_reservations(
        &mut self,
        reservations: impl IntoIterator<Item = Reservation>,
    ) -> Result<()> {
        self.writer.write_record(COLUMNS)?;
        for reservation in reservations {
            self.writer.serialize(ReservationRow::from(reservation))?;
        }
        self.writer.flush()?;
        Ok(())
    }
}
