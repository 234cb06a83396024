use super::money::Amount;
use super::pricing::{self, RoomCategory};
use crate::error::Result;
use serde::{Deserialize, Serialize};

pub type ActorId = u64;
pub type HotelId = u64;
pub type RoomId = u64;

/// Someone who can hold reservations. Only the identity matters to the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Actor {
    pub id: ActorId,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hotel {
    pub id: HotelId,
    pub name: String,
    pub location: String,
}

/// A bookable room as exposed by the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Room {
    pub id: RoomId,
    pub hotel_id: HotelId,
    /// Display label, e.g. "Ocean View King".
    pub label: String,
    pub category: RoomCategory,
    /// Nightly base rate before the category multiplier.
    pub base_price: Amount,
    #[serde(default = "default_available")]
    pub available: bool,
}

fn default_available() -> bool {
    true
}

impl Room {
    pub fn is_bookable(&self) -> bool {
        self.available
    }

    pub fn price_per_night(&self) -> Result<Amount> {
        pricing::price_per_night(self.category, self.base_price)
    }
}
