use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReservationError {
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
    #[error("Room {room_id} is not available for the selected dates")]
    Conflict { room_id: u64 },
    #[error("Payment declined ({method}, transaction {transaction_id})")]
    PaymentDeclined {
        method: &'static str,
        transaction_id: String,
    },
    #[error("Actor {actor_id} does not own reservation {reservation_id}")]
    Forbidden {
        actor_id: u64,
        reservation_id: uuid::Uuid,
    },
    #[error("Invalid state: {0}")]
    InvalidState(String),
    #[error("Transaction aborted: {0}")]
    TransactionAborted(String),
    #[error("Internal error: {0}")]
    InternalError(Box<dyn std::error::Error + Send + Sync>),
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Config error: {0}")]
    ConfigError(#[from] toml::de::Error),
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    #[cfg(feature = "storage-rocksdb")]
    #[error("RocksDB error: {0}")]
    RocksDBError(#[from] rocksdb::Error),
}

impl ReservationError {
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    /// Whether the caller may resubmit the identical `create` request.
    ///
    /// Only storage-level aborts qualify. `Conflict` and `PaymentDeclined` are
    /// final for the given input.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::TransactionAborted(_))
    }
}

pub type Result<T> = std::result::Result<T, ReservationError>;
