//! Configuration loaded from a TOML file.
//!
//! Every section is optional; anything missing falls back to the defaults
//! below. The `catalog` section seeds the in-memory actor/hotel/room lookups.

use crate::application::engine::PricePolicy;
use crate::domain::catalog::{Actor, Hotel, Room};
use crate::domain::payment::PaymentMethodKind;
use crate::error::{ReservationError, Result};
use crate::infrastructure::in_memory::InMemoryCatalog;
use crate::infrastructure::simulated_payment::GatewaySettings;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub logging: LoggingConfig,
    pub payments: PaymentsConfig,
    pub pricing: PricingConfig,
    pub catalog: CatalogConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `tracing_subscriber::EnvFilter` directive; `RUST_LOG` overrides it.
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// Overrides for one simulated gateway; unset fields use the method's defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    pub success_rate: Option<f64>,
    pub delay_ms: Option<u64>,
}

impl GatewayConfig {
    pub fn settings(&self, kind: PaymentMethodKind) -> GatewaySettings {
        GatewaySettings {
            success_rate: self
                .success_rate
                .unwrap_or_else(|| kind.default_success_rate()),
            delay: self
                .delay_ms
                .map(Duration::from_millis)
                .unwrap_or_else(|| kind.default_delay()),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PaymentsConfig {
    pub card: GatewayConfig,
    pub upi: GatewayConfig,
}

impl PaymentsConfig {
    pub fn card_settings(&self) -> GatewaySettings {
        self.card.settings(PaymentMethodKind::Card)
    }

    pub fn upi_settings(&self) -> GatewaySettings {
        self.upi.settings(PaymentMethodKind::Upi)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PricingConfig {
    pub policy: PricePolicy,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    pub actors: Vec<Actor>,
    pub hotels: Vec<Hotel>,
    pub rooms: Vec<Room>,
}

impl CatalogConfig {
    pub async fn seed(&self) -> InMemoryCatalog {
        let catalog = InMemoryCatalog::new();
        for actor in &self.actors {
            catalog.add_actor(actor.clone()).await;
        }
        for hotel in &self.hotels {
            catalog.add_hotel(hotel.clone()).await;
        }
        for room in &self.rooms {
            catalog.add_room(room.clone()).await;
        }
        catalog
    }
}

impl AppConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_toml(&raw)
    }

    pub fn from_toml(raw: &str) -> Result<Self> {
        let config: Self = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        for (name, gateway) in [("card", &self.payments.card), ("upi", &self.payments.upi)] {
            if let Some(rate) = gateway.success_rate
                && !(0.0..=1.0).contains(&rate)
            {
                return Err(ReservationError::InvalidConfig(format!(
                    "payments.{name}.success_rate must be within [0, 1], got {rate}"
                )));
            }
        }
        Ok(())
    }
}
