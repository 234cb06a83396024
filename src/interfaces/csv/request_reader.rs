use crate::domain::catalog::{ActorId, HotelId, RoomId};
use crate::domain::money::Amount;
use crate::domain::payment::{CardDetails, PaymentMethod, PaymentMethodKind, UpiAccount};
use crate::domain::reservation::{ReservationId, ReservationRequest};
use crate::error::{ReservationError, Result};
use chrono::NaiveDate;
use serde::Deserialize;
use std::io::Read;

#[derive(Debug, Deserialize, PartialEq, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub enum CommandType {
    Create,
    Cancel,
}

/// One raw row of the requests file.
///
/// Only `type` and `actor` are required by every row; the rest depend on the
/// command and are checked when converting into a [`Command`]. `reservation`
/// names the stay to cancel, or the id to assign on create.
#[derive(Debug, Deserialize, PartialEq, Clone)]
pub struct RequestRecord {
    pub r#type: CommandType,
    pub actor: ActorId,
    pub reservation: Option<ReservationId>,
    pub hotel: Option<HotelId>,
    pub room: Option<RoomId>,
    pub check_in: Option<NaiveDate>,
    pub check_out: Option<NaiveDate>,
    pub guests: Option<u32>,
    pub price: Option<Amount>,
    pub method: Option<PaymentMethodKind>,
    pub account: Option<String>,
    pub holder: Option<String>,
    pub note: Option<String>,
}

#[derive(Debug, Clone)]
pub enum Command {
    Create {
        actor_id: ActorId,
        request: ReservationRequest,
    },
    Cancel {
        actor_id: ActorId,
        reservation_id: ReservationId,
    },
}

fn required<T>(value: Option<T>, field: &str) -> Result<T> {
    value.ok_or_else(|| ReservationError::InvalidRequest(format!("missing `{field}` column")))
}

impl TryFrom<RequestRecord> for Command {
    type Error = ReservationError;

    fn try_from(record: RequestRecord) -> Result<Self> {
        match record.r#type {
            CommandType::Cancel => Ok(Command::Cancel {
                actor_id: record.actor,
                reservation_id: required(record.reservation, "reservation")?,
            }),
            CommandType::Create => {
                let account = required(record.account, "account")?;
                let holder = required(record.holder, "holder")?;
                let payment_method = match required(record.method, "method")? {
                    PaymentMethodKind::Card => {
                        PaymentMethod::Card(CardDetails::new(&account, holder))
                    }
                    PaymentMethodKind::Upi => PaymentMethod::Upi(UpiAccount::new(account, holder)?),
                };
                let request = ReservationRequest {
                    reservation_id: record.reservation,
                    hotel_id: required(record.hotel, "hotel")?,
                    room_id: required(record.room, "room")?,
                    check_in: required(record.check_in, "check_in")?,
                    check_out: required(record.check_out, "check_out")?,
                    guests: required(record.guests, "guests")?,
                    note: record.note.filter(|note| !note.is_empty()),
                    total_price: record.price,
                    payment_method,
                };
                Ok(Command::Create {
                    actor_id: record.actor,
                    request,
                })
            }
        }
    }
}

/// Reads reservation commands from a CSV source.
///
/// Whitespace is trimmed and rows may omit trailing columns, so a cancel row
/// can stop after `reservation`.
pub struct RequestReader<R: Read> {
    reader: csv::Reader<R>,
}

impl<R: Read> RequestReader<R> {
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(source);
        Self { reader }
    }

    /// Lazily parses rows; a bad row yields an error without ending the stream.
    pub fn commands(self) -> impl Iterator<Item = Result<Command>> {
        self.reader.into_deserialize::<RequestRecord>().map(|result| {
            result
                .map_err(ReservationError::from)
                .and_then(Command::try_from)
        })
    }
}
