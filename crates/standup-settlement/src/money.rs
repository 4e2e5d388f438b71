//! Saturating money arithmetic.
//!
//! `Decimal` operators panic on overflow. Calculations here are total, so
//! results outside the representable range clamp to `Decimal::MAX` or
//! `Decimal::MIN` instead.

use rust_decimal::Decimal;

fn clamp(negative: bool) -> Decimal {
    if negative { Decimal::MIN } else { Decimal::MAX }
}

#[must_use]
pub fn saturating_add(a: Decimal, b: Decimal) -> Decimal {
    a.checked_add(b)
        .unwrap_or_else(|| clamp(a.is_sign_negative()))
}

#[must_use]
pub fn saturating_sub(a: Decimal, b: Decimal) -> Decimal {
    a.checked_sub(b)
        .unwrap_or_else(|| clamp(a.is_sign_negative()))
}

#[must_use]
pub fn saturating_mul(a: Decimal, b: Decimal) -> Decimal {
    a.checked_mul(b)
        .unwrap_or_else(|| clamp(a.is_sign_negative() != b.is_sign_negative()))
}

/// `amount * percentage / 100`, saturating.
#[must_use]
pub fn percentage_of(amount: Decimal, percentage: Decimal) -> Decimal {
    // Dividing by 100 first can only shrink the rate, so it never overflows.
    saturating_mul(amount, percentage / Decimal::ONE_HUNDRED)
}

/// Sum of `amounts`, saturating.
pub fn saturating_sum(amounts: impl IntoIterator<Item = Decimal>) -> Decimal {
    amounts.into_iter().fold(Decimal::ZERO, saturating_add)
}
