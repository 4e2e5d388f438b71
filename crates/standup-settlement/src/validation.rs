//! Readiness checks for submitting and settling deals.
//!
//! Every check runs on every call and each failure is recorded, so the
//! caller can show the complete list at once. Nothing here returns an error
//! or panics; the verdict is data.

use std::fmt;

use rust_decimal::Decimal;
use serde::ser::{Serialize, SerializeStruct, Serializer};
use standup_types::{DealError, DealStatus, EventDeal, SplitTerms, UserId, constants};

/// One reason a deal, or a participant's terms, is not ready.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DealIssue {
    // --- settlement ---
    NotFullyApproved,
    ParticipantsNotApproved,
    RevenueNotSet,
    NotEventOwner,
    // --- submission ---
    NotDraft,
    NoParticipants,
    // --- split terms ---
    PercentageOutOfRange,
    FlatFeeNotPositive,
    DoorSplitPercentageOutOfRange,
    TieredConfigMissing,
    /// 1-based tier number.
    TierThresholdNegative(usize),
    /// 1-based tier number.
    TierPercentageOutOfRange(usize),
}

impl fmt::Display for DealIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            Self::NotFullyApproved => "Deal must be fully approved",
            Self::ParticipantsNotApproved => "All participants must approve",
            Self::RevenueNotSet => "Total revenue must be set",
            Self::NotEventOwner => "Only event owner can settle deals",
            Self::NotDraft => "Deal must be in draft status to submit",
            Self::NoParticipants => "Deal must have at least one participant",
            Self::PercentageOutOfRange => "Percentage must be between 0 and 100",
            Self::FlatFeeNotPositive => "Flat fee amount must be greater than 0",
            Self::DoorSplitPercentageOutOfRange => {
                "Door split percentage must be between 0 and 100"
            }
            Self::TieredConfigMissing => "Tiered config is required for tiered splits",
            Self::TierThresholdNegative(n) => {
                return write!(f, "Tier {n}: Threshold must be greater than 0");
            }
            Self::TierPercentageOutOfRange(n) => {
                return write!(f, "Tier {n}: Percentage must be between 0 and 100");
            }
        };
        f.write_str(msg)
    }
}

/// Accumulated outcome of a validation pass.
///
/// Serializes as `{ "is_valid": bool, "errors": [message, ...] }`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    issues: Vec<DealIssue>,
}

impl ValidationReport {
    fn check(&mut self, ok: bool, issue: DealIssue) {
        if !ok {
            self.issues.push(issue);
        }
    }

    /// True iff no issue was recorded.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.issues.is_empty()
    }

    #[must_use]
    pub fn issues(&self) -> &[DealIssue] {
        &self.issues
    }

    /// User-facing messages, in check order.
    #[must_use]
    pub fn errors(&self) -> Vec<String> {
        self.issues.iter().map(ToString::to_string).collect()
    }

    #[must_use]
    pub fn contains(&self, issue: DealIssue) -> bool {
        self.issues.contains(&issue)
    }

    /// `Ok(())` if valid, otherwise the error built from every message.
    pub fn into_result(
        self,
        to_error: impl FnOnce(Vec<String>) -> DealError,
    ) -> standup_types::Result<()> {
        if self.is_valid() {
            Ok(())
        } else {
            Err(to_error(self.errors()))
        }
    }
}

impl Serialize for ValidationReport {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("ValidationReport", 2)?;
        state.serialize_field("is_valid", &self.is_valid())?;
        state.serialize_field("errors", &self.errors())?;
        state.end()
    }
}

/// Can `user_id` settle `deal` right now?
///
/// 1. the deal is fully approved,
/// 2. every participant approved (vacuously true with no participants),
/// 3. total revenue is set and positive,
/// 4. `user_id` owns the deal's event.
#[must_use]
pub fn validate_deal_for_settlement(deal: &EventDeal, user_id: UserId) -> ValidationReport {
    let mut report = ValidationReport::default();
    report.check(
        deal.status == DealStatus::FullyApproved,
        DealIssue::NotFullyApproved,
    );
    // Empty participant list passes; see DESIGN.md before changing.
    report.check(
        deal.deal_participants.iter().all(|p| p.is_approved()),
        DealIssue::ParticipantsNotApproved,
    );
    report.check(
        deal.total_revenue.is_some_and(|r| r > Decimal::ZERO),
        DealIssue::RevenueNotSet,
    );
    report.check(deal.promoter_id() == user_id, DealIssue::NotEventOwner);
    report
}

/// Can `deal` be submitted for participant approval?
#[must_use]
pub fn validate_deal_for_submission(deal: &EventDeal) -> ValidationReport {
    let mut report = ValidationReport::default();
    report.check(deal.status == DealStatus::Draft, DealIssue::NotDraft);
    report.check(
        !deal.deal_participants.is_empty(),
        DealIssue::NoParticipants,
    );
    report
}

/// Are these split terms acceptable for a new or edited participant?
///
/// Percentages (revenue, door, and per tier) must lie within `0..=100`,
/// flat fees (including the guaranteed minimum) must be positive, and a
/// tiered split needs at least one tier with a non-negative threshold.
/// Custom and unknown splits are accepted as is.
#[must_use]
pub fn validate_participant_split(terms: &SplitTerms) -> ValidationReport {
    let mut report = ValidationReport::default();
    if let Some(pct) = terms.split_percentage() {
        report.check(is_percentage(pct), DealIssue::PercentageOutOfRange);
    }
    if let Some(fee) = terms.flat_fee_amount() {
        report.check(fee > Decimal::ZERO, DealIssue::FlatFeeNotPositive);
    }
    match terms {
        SplitTerms::DoorSplit {
            door_split_percentage,
            ..
        } => report.check(
            is_percentage(*door_split_percentage),
            DealIssue::DoorSplitPercentageOutOfRange,
        ),
        SplitTerms::Tiered { tiered_config } => {
            report.check(!tiered_config.is_empty(), DealIssue::TieredConfigMissing);
            for (idx, tier) in tiered_config.iter().enumerate() {
                report.check(
                    tier.threshold >= Decimal::ZERO,
                    DealIssue::TierThresholdNegative(idx + 1),
                );
                report.check(
                    is_percentage(tier.percentage),
                    DealIssue::TierPercentageOutOfRange(idx + 1),
                );
            }
        }
        _ => {}
    }
    report
}

fn is_percentage(pct: Decimal) -> bool {
    pct >= Decimal::ZERO && pct <= Decimal::from(constants::MAX_SPLIT_PERCENTAGE)
}
