#![allow(dead_code)]

use chrono::NaiveDate;
use innkeeper::application::engine::ReservationEngine;
use innkeeper::config::AppConfig;
use innkeeper::domain::money::Amount;
use innkeeper::domain::payment::{CardDetails, PaymentMethod, PaymentOutcome};
use innkeeper::domain::ports::ReservationStoreBox;
use innkeeper::domain::reservation::ReservationRequest;
use innkeeper::infrastructure::clock::FixedClock;
use innkeeper::infrastructure::simulated_payment::SimulatedPaymentProcessor;
use std::io::{Error, Write};
use std::path::Path;
use tempfile::NamedTempFile;

pub const HEADER: [&str; 13] = [
    "type",
    "actor",
    "reservation",
    "hotel",
    "room",
    "check_in",
    "check_out",
    "guests",
    "price",
    "method",
    "account",
    "holder",
    "note",
];

/// Two guests, one hotel, three rooms at a 100.00 base rate. Room 9 is
/// closed for booking. Gateways settle instantly with `success_rate`.
pub fn config_toml(success_rate: f64) -> String {
    format!(
        r#"
[payments.card]
success_rate = {success_rate:?}
delay_ms = 0

[payments.upi]
success_rate = {success_rate:?}
delay_ms = 0

[[catalog.actors]]
id = 1
name = "Mina"

[[catalog.actors]]
id = 2
name = "Jonathan"

[[catalog.hotels]]
id = 1
name = "Castle Dracula"
location = "Transylvania"

[[catalog.rooms]]
id = 7
hotel_id = 1
label = "Room 7"
category = "standard"
base_price = "100.00"

[[catalog.rooms]]
id = 8
hotel_id = 1
label = "Room 8"
category = "deluxe"
base_price = "100.00"

[[catalog.rooms]]
id = 9
hotel_id = 1
label = "Room 9"
category = "suite"
base_price = "100.00"
available = false
"#
    )
}

pub fn config_file(success_rate: f64) -> Result<NamedTempFile, Error> {
    let mut file = NamedTempFile::new()?;
    file.write_all(config_toml(success_rate).as_bytes())?;
    Ok(file)
}

/// Writes `rows` under the requests header. Rows may be shorter than the header.
pub fn requests_file(rows: &[Vec<String>]) -> Result<NamedTempFile, Error> {
    let file = NamedTempFile::new()?;
    write_requests(file.path(), rows)?;
    Ok(file)
}

pub fn write_requests(path: &Path, rows: &[Vec<String>]) -> Result<(), Error> {
    let mut wtr = csv::WriterBuilder::new().flexible(true).from_path(path)?;
    wtr.write_record(HEADER)?;
    for row in rows {
        wtr.write_record(row)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn create_row(actor: u64, room: u64, check_in: &str, check_out: &str) -> Vec<String> {
    let actor = actor.to_string();
    let room = room.to_string();
    [
        "create",
        actor.as_str(),
        "",
        "1",
        room.as_str(),
        check_in,
        check_out,
        "2",
        "",
        "card",
        "4111 1111 1111 1234",
        "Mina",
        "",
    ]
    .iter()
    .map(|field| field.to_string())
    .collect()
}

pub fn cancel_row(actor: u64, reservation: &str) -> Vec<String> {
    vec!["cancel".to_string(), actor.to_string(), reservation.to_string()]
}

pub fn date(day: &str) -> NaiveDate {
    NaiveDate::parse_from_str(day, "%Y-%m-%d").unwrap()
}

pub fn request(room_id: u64, check_in: &str, check_out: &str) -> ReservationRequest {
    ReservationRequest {
        reservation_id: None,
        hotel_id: 1,
        room_id,
        check_in: date(check_in),
        check_out: date(check_out),
        guests: 2,
        note: None,
        total_price: None,
        payment_method: PaymentMethod::Card(CardDetails::new("4111111111111234", "Mina")),
    }
}

pub fn priced(mut request: ReservationRequest, total: Amount) -> ReservationRequest {
    request.total_price = Some(total);
    request
}

/// Engine over the shared test catalog with the given store and an
/// always-succeeding gateway, with today pinned to 2025-05-01.
pub async fn engine_with_store(reservations: ReservationStoreBox) -> ReservationEngine {
    let config = AppConfig::from_toml(&config_toml(1.0)).unwrap();
    let catalog = config.catalog.seed().await;
    ReservationEngine::new(
        Box::new(catalog.clone()),
        Box::new(catalog),
        reservations,
        Box::new(SimulatedPaymentProcessor::always(PaymentOutcome::Success)),
    )
    .with_clock(Box::new(FixedClock::new(date("2025-05-01"))))
}
