//! Injected settings shared by the services.
//!
//! Global constants (payment thresholds, provider sender identity) are
//! modeled as plain configuration structs handed to each service at
//! construction, never as process-wide mutable state. [`Settings::default`]
//! encodes the production constants; tests construct their own.

use crate::payment::domain::{BridgeSender, CURRENCY_BTC};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Top-level settings bundle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Settings {
    /// Payment distribution settings.
    pub payment: PaymentSettings,
    /// Milestone scheduling settings.
    pub milestones: MilestoneSettings,
    /// Time-tracking sync settings.
    pub timetrack: TimeTrackSettings,
}

/// Settings for the payment distribution engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentSettings {
    /// Sender identity block submitted with every bridge transaction.
    pub bridge_sender: BridgeSender,
    /// Input currency code submitted to both providers.
    pub currency: String,
}

impl Default for PaymentSettings {
    fn default() -> Self {
        Self {
            bridge_sender: BridgeSender {
                country_code: "NL".to_owned(),
                phone_number: String::new(),
                first_name: "Settlor".to_owned(),
                last_name: "Payments".to_owned(),
                email: "payments@settlor.example".to_owned(),
            },
            currency: CURRENCY_BTC.to_owned(),
        }
    }
}

/// Settings for submission-milestone scheduling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MilestoneSettings {
    /// Pay amount above which high-value tasks get a longer draft offset.
    pub draft_pay_threshold: Decimal,
    /// Minimum task period, in days, for the longer draft offset.
    pub long_period_days: i64,
    /// Draft offset, in days, for high-value tasks with a long period.
    pub long_offset_days: i64,
    /// Draft offset, in days, for every other standalone task.
    pub short_offset_days: i64,
}

impl Default for MilestoneSettings {
    fn default() -> Self {
        Self {
            draft_pay_threshold: dec!(150),
            long_period_days: 7,
            long_offset_days: 2,
            short_offset_days: 1,
        }
    }
}

/// Settings for time-tracking sync.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeTrackSettings {
    /// Prefix applied to remote task names.
    pub task_name_prefix: String,
}

impl Default for TimeTrackSettings {
    fn default() -> Self {
        Self {
            task_name_prefix: "Settlor".to_owned(),
        }
    }
}
