use super::money::Amount;
use super::reservation::ReservationId;
use crate::error::{ReservationError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use uuid::Uuid;

pub type PaymentId = Uuid;

/// The tag persisted with a payment. Account identifiers never leave the
/// in-flight `PaymentMethod`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethodKind {
    Card,
    Upi,
}

impl PaymentMethodKind {
    pub fn tag(&self) -> &'static str {
        match self {
            PaymentMethodKind::Card => "CARD",
            PaymentMethodKind::Upi => "UPI",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            PaymentMethodKind::Card => "Card Payment",
            PaymentMethodKind::Upi => "UPI Payment",
        }
    }

    pub fn default_success_rate(&self) -> f64 {
        match self {
            PaymentMethodKind::Card => 0.95,
            PaymentMethodKind::Upi => 0.97,
        }
    }

    pub fn default_delay(&self) -> Duration {
        match self {
            PaymentMethodKind::Card => Duration::from_millis(1000),
            PaymentMethodKind::Upi => Duration::from_millis(800),
        }
    }
}

impl fmt::Display for PaymentMethodKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Card details with the number already masked.
///
/// Only the last four digits survive construction, so neither `Debug` nor
/// `Display` can leak the full number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardDetails {
    masked_number: String,
    holder: String,
}

impl CardDetails {
    pub fn new(number: &str, holder: impl Into<String>) -> Self {
        Self {
            masked_number: mask_card_number(number),
            holder: holder.into(),
        }
    }

    pub fn masked_number(&self) -> &str {
        &self.masked_number
    }

    pub fn last_four(&self) -> &str {
        let start = self
            .masked_number
            .char_indices()
            .rev()
            .nth(3)
            .map_or(0, |(i, _)| i);
        &self.masked_number[start..]
    }

    pub fn holder(&self) -> &str {
        &self.holder
    }
}

fn mask_card_number(number: &str) -> String {
    let digits: Vec<char> = number.chars().filter(|c| !c.is_whitespace()).collect();
    if digits.len() < 4 {
        return "****".to_string();
    }
    let last_four: String = digits[digits.len() - 4..].iter().collect();
    format!("**** **** **** {last_four}")
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpiAccount {
    upi_id: String,
    holder: String,
}

impl UpiAccount {
    pub fn new(upi_id: impl Into<String>, holder: impl Into<String>) -> Result<Self> {
        let upi_id = upi_id.into();
        if !upi_id.contains('@') {
            return Err(ReservationError::InvalidRequest(format!(
                "invalid UPI id: {upi_id}"
            )));
        }
        Ok(Self {
            upi_id,
            holder: holder.into(),
        })
    }

    pub fn upi_id(&self) -> &str {
        &self.upi_id
    }

    pub fn holder(&self) -> &str {
        &self.holder
    }
}

/// How a stay is paid for. Closed set; behaviour is dispatched on the variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaymentMethod {
    Card(CardDetails),
    Upi(UpiAccount),
}

impl PaymentMethod {
    pub fn kind(&self) -> PaymentMethodKind {
        match self {
            PaymentMethod::Card(_) => PaymentMethodKind::Card,
            PaymentMethod::Upi(_) => PaymentMethodKind::Upi,
        }
    }

    pub fn holder(&self) -> &str {
        match self {
            PaymentMethod::Card(card) => card.holder(),
            PaymentMethod::Upi(upi) => upi.holder(),
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PaymentMethod::Card(card) => write!(f, "card {}", card.masked_number()),
            PaymentMethod::Upi(upi) => write!(f, "UPI {}", upi.upi_id()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PaymentStatus {
    Pending,
    Success,
    Failed,
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PaymentStatus::Pending => "PENDING",
            PaymentStatus::Success => "SUCCESS",
            PaymentStatus::Failed => "FAILED",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentOutcome {
    Success,
    Failed,
}

/// Terminal result of one payment attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settlement {
    pub outcome: PaymentOutcome,
    pub transaction_id: String,
}

/// `TXN<epoch millis><0..9999>`
pub fn generate_transaction_id(now: DateTime<Utc>, suffix: u16) -> String {
    format!("TXN{}{}", now.timestamp_millis(), suffix % 10_000)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payment {
    pub id: PaymentId,
    pub reservation_id: ReservationId,
    pub amount: Amount,
    pub method: PaymentMethodKind,
    pub status: PaymentStatus,
    pub timestamp: DateTime<Utc>,
    pub transaction_id: Option<String>,
}

impl Payment {
    pub fn pending(
        reservation_id: ReservationId,
        amount: Amount,
        method: PaymentMethodKind,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            reservation_id,
            amount,
            method,
            status: PaymentStatus::Pending,
            timestamp: now,
            transaction_id: None,
        }
    }

    /// Records the gateway outcome. Only `Pending` payments can settle.
    pub fn settle(&mut self, settlement: Settlement, at: DateTime<Utc>) -> Result<()> {
        if self.status != PaymentStatus::Pending {
            return Err(ReservationError::InvalidState(format!(
                "payment {} already settled as {}",
                self.id, self.status
            )));
        }
        self.status = match settlement.outcome {
            PaymentOutcome::Success => PaymentStatus::Success,
            PaymentOutcome::Failed => PaymentStatus::Failed,
        };
        self.transaction_id = Some(settlement.transaction_id);
        self.timestamp = at;
        Ok(())
    }

    pub fn is_successful(&self) -> bool {
        self.status == PaymentStatus::Success
    }

    pub fn is_failed(&self) -> bool {
        self.status == PaymentStatus::Failed
    }

    pub fn is_pending(&self) -> bool {
        self.status == PaymentStatus::Pending
    }
}
