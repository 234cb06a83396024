//! A stand-in for external card and UPI gateways.
//!
//! Each method waits a bounded delay and then succeeds with a fixed
//! probability. The random draw comes from a [`ChanceSource`], so tests can
//! force either outcome.

use crate::domain::money::Amount;
use crate::domain::payment::{
    PaymentMethod, PaymentMethodKind, PaymentOutcome, Settlement, generate_transaction_id,
};
use crate::domain::ports::PaymentProcessor;
use async_trait::async_trait;
use chrono::Utc;
use rand::Rng;
use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;
use tracing::{info, warn};

/// Yields draws in `[0, 1)`. A draw below the success rate is a success.
pub trait ChanceSource: Send + Sync {
    fn roll(&self) -> f64;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadRngChance;

impl ChanceSource for ThreadRngChance {
    fn roll(&self) -> f64 {
        rand::thread_rng().r#gen::<f64>()
    }
}

/// Always returns the same draw. `0.0` always succeeds for any positive
/// rate; `1.0` never does.
#[derive(Debug, Clone, Copy)]
pub struct FixedChance(pub f64);

impl ChanceSource for FixedChance {
    fn roll(&self) -> f64 {
        self.0
    }
}

/// Replays a fixed sequence of draws, then falls back to `fallback`.
pub struct ScriptedChance {
    draws: Mutex<VecDeque<f64>>,
    fallback: f64,
}

impl ScriptedChance {
    pub fn new(draws: impl IntoIterator<Item = f64>, fallback: f64) -> Self {
        Self {
            draws: Mutex::new(draws.into_iter().collect()),
            fallback,
        }
    }
}

impl ChanceSource for ScriptedChance {
    fn roll(&self) -> f64 {
        match self.draws.lock() {
            Ok(mut draws) => draws.pop_front().unwrap_or(self.fallback),
            Err(_) => self.fallback,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GatewaySettings {
    pub success_rate: f64,
    pub delay: Duration,
}

impl GatewaySettings {
    pub fn defaults_for(kind: PaymentMethodKind) -> Self {
        Self {
            success_rate: kind.default_success_rate(),
            delay: kind.default_delay(),
        }
    }

    pub fn instant(success_rate: f64) -> Self {
        Self {
            success_rate,
            delay: Duration::ZERO,
        }
    }
}

pub struct SimulatedPaymentProcessor {
    card: GatewaySettings,
    upi: GatewaySettings,
    chance: Box<dyn ChanceSource>,
}

impl Default for SimulatedPaymentProcessor {
    fn default() -> Self {
        Self::new(
            GatewaySettings::defaults_for(PaymentMethodKind::Card),
            GatewaySettings::defaults_for(PaymentMethodKind::Upi),
            Box::new(ThreadRngChance),
        )
    }
}

impl SimulatedPaymentProcessor {
    pub fn new(
        card: GatewaySettings,
        upi: GatewaySettings,
        chance: Box<dyn ChanceSource>,
    ) -> Self {
        Self { card, upi, chance }
    }

    /// No delay, and every attempt resolves to `outcome`.
    pub fn always(outcome: PaymentOutcome) -> Self {
        let draw = match outcome {
            PaymentOutcome::Success => 0.0,
            PaymentOutcome::Failed => 1.0,
        };
        Self::new(
            GatewaySettings::instant(PaymentMethodKind::Card.default_success_rate()),
            GatewaySettings::instant(PaymentMethodKind::Upi.default_success_rate()),
            Box::new(FixedChance(draw)),
        )
    }

    fn settings(&self, kind: PaymentMethodKind) -> GatewaySettings {
        match kind {
            PaymentMethodKind::Card => self.card,
            PaymentMethodKind::Upi => self.upi,
        }
    }
}

#[async_trait]
impl PaymentProcessor for SimulatedPaymentProcessor {
    async fn attempt(&self, method: &PaymentMethod, amount: Amount) -> Settlement {
        let settings = self.settings(method.kind());
        info!(%method, %amount, holder = method.holder(), "Processing payment");

        if !settings.delay.is_zero() {
            tokio::time::sleep(settings.delay).await;
        }

        let outcome = if self.chance.roll() < settings.success_rate {
            info!(%method, "Payment successful");
            PaymentOutcome::Success
        } else {
            warn!(%method, "Payment failed");
            PaymentOutcome::Failed
        };

        Settlement {
            outcome,
            transaction_id: generate_transaction_id(
                Utc::now(),
                rand::thread_rng().gen_range(0..10_000),
            ),
        }
    }

    async fn refund(&self, method: &PaymentMethod, amount: Amount) -> bool {
        info!(%method, %amount, "Processing refund");
        true
    }
}
