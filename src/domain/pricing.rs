//! Category-based room pricing.
//!
//! Every room belongs to one of a fixed set of categories. The category only
//! changes the multiplier applied to the room's nightly base rate, so pricing
//! is a pure function of `(category, base rate, nights)`.

use super::money::Amount;
use crate::error::{ReservationError, Result};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoomCategory {
    Standard,
    Deluxe,
    Suite,
}

impl RoomCategory {
    pub fn multiplier(&self) -> Decimal {
        match self {
            RoomCategory::Standard => dec!(1.00),
            RoomCategory::Deluxe => dec!(1.20),
            RoomCategory::Suite => dec!(1.50),
        }
    }

    /// Markup over the base rate, in percent.
    pub fn premium_percentage(&self) -> Decimal {
        (self.multiplier() - Decimal::ONE) * dec!(100)
    }
}

impl fmt::Display for RoomCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RoomCategory::Standard => "STANDARD",
            RoomCategory::Deluxe => "DELUXE",
            RoomCategory::Suite => "SUITE",
        };
        f.write_str(name)
    }
}

/// Total price of a stay: `base * multiplier(category) * nights`, rounded to cents.
pub fn price(category: RoomCategory, base_price: Amount, nights: u32) -> Result<Amount> {
    if nights == 0 {
        return Err(ReservationError::InvalidRequest(
            "a stay must last at least one night".to_string(),
        ));
    }
    let total = nightly(category, base_price)?
        .checked_mul(Decimal::from(nights))
        .ok_or_else(price_overflow)?;
    Amount::new(total.round_dp(2))
}

/// Display price for a single night. Never used for commit decisions.
pub fn price_per_night(category: RoomCategory, base_price: Amount) -> Result<Amount> {
    Amount::new(nightly(category, base_price)?.round_dp(2))
}

fn nightly(category: RoomCategory, base_price: Amount) -> Result<Decimal> {
    base_price
        .value()
        .checked_mul(category.multiplier())
        .ok_or_else(price_overflow)
}

fn price_overflow() -> ReservationError {
    ReservationError::InvalidRequest("price overflow".to_string())
}
