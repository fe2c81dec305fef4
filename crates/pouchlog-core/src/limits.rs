//! Daily limit classification.
//!
//! Pure functions of `(count, config)`. When the limit is enabled the three
//! states below partition the count axis exactly: under-threshold,
//! approaching, at-or-over. "Approaching" is strictly below the limit, so it
//! can never overlap "at-or-over".

use serde::{Deserialize, Serialize};

/// Daily limit configuration consumed by the classification functions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LimitConfig {
    pub enabled: bool,
    pub limit: i64,
    /// Fraction of the limit at which the "approaching" state begins, in [0, 1].
    pub approach_threshold: f64,
}

impl Default for LimitConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            limit: 10,
            approach_threshold: 0.8,
        }
    }
}

/// Mutually exclusive limit state for a given count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LimitStatus {
    Disabled,
    Under,
    Approaching,
    AtOrOver,
}

impl LimitConfig {
    /// Progress toward the limit, clamped to [0, 1].
    ///
    /// Zero when the limit is disabled or non-positive.
    pub fn progress_fraction(&self, count: i64) -> f64 {
        if !self.enabled || self.limit <= 0 {
            return 0.0;
        }
        (count as f64 / self.limit as f64).min(1.0)
    }

    /// At or past the approach threshold but strictly below the limit.
    pub fn is_approaching(&self, count: i64) -> bool {
        if !self.enabled {
            return false;
        }
        self.progress_fraction(count) >= self.approach_threshold && count < self.limit
    }

    pub fn is_at_or_over(&self, count: i64) -> bool {
        if !self.enabled {
            return false;
        }
        count >= self.limit
    }

    pub fn status(&self, count: i64) -> LimitStatus {
        if !self.enabled {
            LimitStatus::Disabled
        } else if self.is_at_or_over(count) {
            LimitStatus::AtOrOver
        } else if self.is_approaching(count) {
            LimitStatus::Approaching
        } else {
            LimitStatus::Under
        }
    }
}
