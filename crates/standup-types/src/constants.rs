//! System-wide constants for deal settlement.

/// Decimal places money is rounded to (cents).
pub const MONEY_SCALE: u32 = 2;

/// Upper bound of a percentage split.
pub const MAX_SPLIT_PERCENTAGE: u32 = 100;

/// Commission a manager takes when no explicit rate is configured.
pub const DEFAULT_COMMISSION_PERCENTAGE: u32 = 15;

/// Settlement currency.
pub const DEFAULT_CURRENCY: &str = "AUD";

/// Attempts (including the first) before a transient failure is surfaced.
pub const DEFAULT_RETRY_MAX_ATTEMPTS: u32 = 3;

/// Delay before the first retry, in milliseconds.
pub const DEFAULT_RETRY_BASE_DELAY_MS: u64 = 200;

/// Upper bound on a single retry delay, in milliseconds.
pub const DEFAULT_RETRY_MAX_DELAY_MS: u64 = 5_000;
