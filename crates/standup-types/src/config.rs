//! Configuration for settlement and the retry policy around persistence.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{DealError, Result, constants};

/// Settlement configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SettlementConfig {
    /// ISO currency code amounts are denominated in.
    pub currency: String,
    /// Commission applied when a manager has no explicit rate.
    pub default_commission_percentage: Decimal,
    /// Retry behaviour for calls that persist settlement results.
    pub retry: RetryConfig,
}

impl Default for SettlementConfig {
    fn default() -> Self {
        Self {
            currency: constants::DEFAULT_CURRENCY.to_string(),
            default_commission_percentage: Decimal::from(constants::DEFAULT_COMMISSION_PERCENTAGE),
            retry: RetryConfig::default(),
        }
    }
}

impl SettlementConfig {
    /// Parse a JSON document; missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| DealError::Configuration(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject configurations that cannot work.
    pub fn validate(&self) -> Result<()> {
        if self.currency.len() != 3 {
            return Err(DealError::Configuration(format!(
                "currency must be a 3-letter code, got {:?}",
                self.currency
            )));
        }
        if self.default_commission_percentage < Decimal::ZERO
            || self.default_commission_percentage > Decimal::from(constants::MAX_SPLIT_PERCENTAGE)
        {
            return Err(DealError::Configuration(format!(
                "default_commission_percentage must be within 0..=100, got {}",
                self.default_commission_percentage
            )));
        }
        self.retry.validate()
    }
}

/// Exponential backoff parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Total attempts, including the first call.
    pub max_attempts: u32,
    /// Delay before the first retry, in milliseconds.
    pub base_delay_ms: u64,
    /// Cap on any single delay, in milliseconds.
    pub max_delay_ms: u64,
    /// Randomise each delay within `0..=computed` (full jitter).
    pub jitter: bool,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: constants::DEFAULT_RETRY_MAX_ATTEMPTS,
            base_delay_ms: constants::DEFAULT_RETRY_BASE_DELAY_MS,
            max_delay_ms: constants::DEFAULT_RETRY_MAX_DELAY_MS,
            jitter: true,
        }
    }
}

impl RetryConfig {
    pub fn validate(&self) -> Result<()> {
        if self.max_attempts == 0 {
            return Err(DealError::Configuration(
                "retry.max_attempts must be at least 1".into(),
            ));
        }
        if self.base_delay_ms > self.max_delay_ms {
            return Err(DealError::Configuration(format!(
                "retry.base_delay_ms ({}) exceeds retry.max_delay_ms ({})",
                self.base_delay_ms, self.max_delay_ms
            )));
        }
        Ok(())
    }
}
