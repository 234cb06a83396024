use crate::domain::catalog::{ActorId, HotelId, RoomId};
use crate::domain::payment::Payment;
use crate::domain::ports::ReservationStore;
use crate::domain::reservation::{Reservation, ReservationId, ReservationStatus};
use crate::domain::stay::StayDates;
use crate::error::{ReservationError, Result};
use async_trait::async_trait;
use rocksdb::{ColumnFamilyDescriptor, DB, Options, WriteBatch};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Column Family for reservation rows.
pub const CF_RESERVATIONS: &str = "reservations";
/// Column Family for payment rows, keyed by owning reservation id.
pub const CF_PAYMENTS: &str = "payments";

/// A persistent reservation store backed by RocksDB.
///
/// Reservations and payments live in separate Column Families under the same
/// reservation key. `insert` writes both in one `WriteBatch`, and writers are
/// serialized by a commit lock so the overlap re-check and the batch are a
/// single unit within this process.
///
/// This struct is thread-safe (`Clone` shares the underlying `Arc<DB>`).
#[derive(Clone)]
pub struct RocksDBStore {
    db: Arc<DB>,
    commit_lock: Arc<Mutex<()>>,
}

impl RocksDBStore {
    /// Opens or creates a RocksDB instance at the specified path.
    ///
    /// Ensures that the "reservations" and "payments" column families exist.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let cf_reservations = ColumnFamilyDescriptor::new(CF_RESERVATIONS, Options::default());
        let cf_payments = ColumnFamilyDescriptor::new(CF_PAYMENTS, Options::default());

        let db = DB::open_cf_descriptors(&opts, path, vec![cf_reservations, cf_payments])?;

        Ok(Self {
            db: Arc::new(db),
            commit_lock: Arc::new(Mutex::new(())),
        })
    }

    fn cf(&self, name: &'static str) -> Result<&rocksdb::ColumnFamily> {
        self.db.cf_handle(name).ok_or_else(|| {
            ReservationError::InternalError(Box::new(std::io::Error::other(format!(
                "{name} column family not found"
            ))))
        })
    }

    fn read<T: DeserializeOwned>(&self, cf: &'static str, key: &[u8]) -> Result<Option<T>> {
        match self.db.get_cf(self.cf(cf)?, key)? {
            Some(bytes) => Ok(Some(decode(&bytes)?)),
            None => Ok(None),
        }
    }

    fn joined(&self, mut reservation: Reservation) -> Result<Reservation> {
        reservation.payment = self.read(CF_PAYMENTS, reservation.id.as_bytes())?;
        Ok(reservation)
    }

    fn scan(&self) -> Result<Vec<Reservation>> {
        let cf = self.cf(CF_RESERVATIONS)?;
        let mut reservations = Vec::new();
        for item in self.db.iterator_cf(cf, rocksdb::IteratorMode::Start) {
            let (_key, value) = item?;
            reservations.push(decode::<Reservation>(&value)?);
        }
        Ok(reservations)
    }

    fn scan_joined(&self, keep: impl Fn(&Reservation) -> bool) -> Result<Vec<Reservation>> {
        self.scan()?
            .into_iter()
            .filter(|r| keep(r))
            .map(|r| self.joined(r))
            .collect()
    }
}

fn encode<T: Serialize>(value: &T) -> Result<Vec<u8>> {
    serde_json::to_vec(value).map_err(|e| {
        ReservationError::InternalError(Box::new(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            format!("Serialization error: {}", e),
        )))
    })
}

fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T> {
    serde_json::from_slice(bytes).map_err(|e| {
        ReservationError::InternalError(Box::new(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            format!("Deserialization error: {}", e),
        )))
    })
}

#[async_trait]
impl ReservationStore for RocksDBStore {
    async fn find_confirmed_by_room(&self, room_id: RoomId) -> Result<Vec<StayDates>> {
        Ok(self
            .scan()?
            .into_iter()
            .filter(|r| r.room_id == room_id && r.status == ReservationStatus::Confirmed)
            .map(|r| r.dates)
            .collect())
    }

    async fn insert(&self, reservation: Reservation, payment: Payment) -> Result<()> {
        if payment.reservation_id != reservation.id {
            return Err(ReservationError::InvalidRequest(format!(
                "payment {} does not belong to reservation {}",
                payment.id, reservation.id
            )));
        }

        let _commit = self.commit_lock.lock().await;

        let key = reservation.id.as_bytes();
        if self
            .db
            .get_pinned_cf(self.cf(CF_RESERVATIONS)?, key)?
            .is_some()
        {
            return Err(ReservationError::TransactionAborted(format!(
                "reservation {} already exists",
                reservation.id
            )));
        }
        if reservation.status == ReservationStatus::Confirmed {
            let overlapping = self.scan()?.iter().any(|existing| {
                existing.room_id == reservation.room_id
                    && existing.status == ReservationStatus::Confirmed
                    && existing.dates.overlaps(&reservation.dates)
            });
            if overlapping {
                return Err(ReservationError::TransactionAborted(format!(
                    "room {} already has a confirmed reservation for these dates",
                    reservation.room_id
                )));
            }
        }

        let mut batch = WriteBatch::default();
        batch.put_cf(self.cf(CF_RESERVATIONS)?, key, encode(&reservation)?);
        batch.put_cf(self.cf(CF_PAYMENTS)?, key, encode(&payment)?);
        self.db.write(batch)?;

        Ok(())
    }

    async fn update_status(&self, id: ReservationId, status: ReservationStatus) -> Result<()> {
        let _commit = self.commit_lock.lock().await;

        let mut reservation: Reservation = self
            .read(CF_RESERVATIONS, id.as_bytes())?
            .ok_or_else(|| ReservationError::not_found("Reservation", id))?;
        reservation.status = status;
        self.db.put_cf(
            self.cf(CF_RESERVATIONS)?,
            id.as_bytes(),
            encode(&reservation)?,
        )?;
        Ok(())
    }

    async fn get(&self, id: ReservationId) -> Result<Option<Reservation>> {
        match self.read::<Reservation>(CF_RESERVATIONS, id.as_bytes())? {
            Some(reservation) => Ok(Some(self.joined(reservation)?)),
            None => Ok(None),
        }
    }

    async fn find_by_actor(&self, actor_id: ActorId) -> Result<Vec<Reservation>> {
        self.scan_joined(|r| r.actor_id == actor_id)
    }

    async fn find_by_hotel(&self, hotel_id: HotelId) -> Result<Vec<Reservation>> {
        self.scan_joined(|r| r.hotel_id == hotel_id)
    }

    async fn get_all(&self) -> Result<Vec<Reservation>> {
        self.scan_joined(|_| true)
    }
}
