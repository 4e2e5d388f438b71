//! Split calculation and split-term display.
//!
//! Both functions are pure: the participant is only read, never updated.
//! Writing the result back to `calculated_amount` is the ledger's job.

use rust_decimal::Decimal;
use standup_types::{DealParticipant, SplitTerms};

use crate::money::percentage_of;

/// A participant's entitlement out of `total_revenue`.
///
/// - `Percentage`: that share of revenue.
/// - `FlatFee`: the fee, whatever the revenue (zero and negative included).
/// - `MinimumPlusPercentage`: the larger of the fee and the percentage share.
/// - door split, tiered, custom and unknown splits: zero.
///
/// Inputs are not validated; a negative fee is returned as is. Shares
/// beyond the `Decimal` range saturate at `Decimal::MAX` / `Decimal::MIN`.
#[must_use]
pub fn calculate_split_amount(participant: &DealParticipant, total_revenue: Decimal) -> Decimal {
    split_amount(&participant.split, total_revenue)
}

/// [`calculate_split_amount`] on bare terms.
#[must_use]
pub fn split_amount(terms: &SplitTerms, total_revenue: Decimal) -> Decimal {
    match *terms {
        SplitTerms::Percentage { split_percentage } => {
            percentage_of(total_revenue, split_percentage)
        }
        SplitTerms::FlatFee { flat_fee_amount } => flat_fee_amount,
        SplitTerms::MinimumPlusPercentage {
            split_percentage,
            flat_fee_amount,
        } => flat_fee_amount.max(percentage_of(total_revenue, split_percentage)),
        SplitTerms::DoorSplit { .. }
        | SplitTerms::Tiered { .. }
        | SplitTerms::Custom
        | SplitTerms::Other => Decimal::ZERO,
    }
}

/// Human-readable summary of a participant's terms, for display only.
///
/// The minimum-plus-percentage wording says "of remainder" although
/// [`calculate_split_amount`] takes the percentage of the whole revenue and
/// keeps the larger of the two. Both are kept as they are until the
/// business rule is settled.
#[must_use]
pub fn generate_split_description(participant: &DealParticipant) -> String {
    describe_split(&participant.split)
}

/// [`generate_split_description`] on bare terms.
#[must_use]
pub fn describe_split(terms: &SplitTerms) -> String {
    match terms {
        SplitTerms::Percentage { split_percentage } => {
            format!("{}% of total revenue", split_percentage.normalize())
        }
        SplitTerms::FlatFee { flat_fee_amount } => {
            format!("Flat fee: ${}", flat_fee_amount.normalize())
        }
        SplitTerms::MinimumPlusPercentage {
            split_percentage,
            flat_fee_amount,
        } => format!(
            "Guaranteed ${} + {}% of remainder",
            flat_fee_amount.normalize(),
            split_percentage.normalize()
        ),
        SplitTerms::DoorSplit { .. }
        | SplitTerms::Tiered { .. }
        | SplitTerms::Custom
        | SplitTerms::Other => "Custom split".to_string(),
    }
}
