//! Deal participants and their split terms.
//!
//! A [`DealParticipant`] is one party's share of a deal: a comedian, a venue,
//! a manager taking commission, and so on. How the share is computed is
//! captured by [`SplitTerms`], a tagged union keyed on the `split_type`
//! column. Rows are parsed straight into it, so a percentage split can never
//! carry a stray flat fee and vice versa.

use std::fmt;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{DealId, ParticipantId, UserId};

/// How a participant's entitlement is derived from the deal's revenue.
///
/// Serialized with the `split_type` tag, matching the row layout:
///
/// ```json
/// { "split_type": "minimum_plus_percentage", "split_percentage": "10", "flat_fee_amount": "2000" }
/// ```
///
/// `door_split`, `tiered` and `custom` rows keep their fields so they can be
/// written back unchanged, but have no built-in calculation. Tags this crate
/// does not know at all parse as [`SplitTerms::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "split_type", rename_all = "snake_case")]
pub enum SplitTerms {
    /// A share of total revenue.
    Percentage {
        #[serde(default)]
        split_percentage: Decimal,
    },
    /// A fixed amount regardless of revenue.
    FlatFee {
        #[serde(default)]
        flat_fee_amount: Decimal,
    },
    /// A share of total revenue with `flat_fee_amount` as a guaranteed floor.
    MinimumPlusPercentage {
        #[serde(default)]
        split_percentage: Decimal,
        #[serde(default)]
        flat_fee_amount: Decimal,
    },
    /// A share of the door takings, optionally with a guarantee.
    DoorSplit {
        #[serde(default)]
        door_split_percentage: Decimal,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        guaranteed_minimum: Option<Decimal>,
    },
    /// Percentage bands keyed on revenue thresholds.
    Tiered {
        #[serde(default)]
        tiered_config: Vec<SplitTier>,
    },
    /// Terms agreed outside the system.
    Custom,
    /// Any split type without a known layout.
    #[serde(other)]
    Other,
}

/// One band of a tiered split.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitTier {
    pub threshold: Decimal,
    pub percentage: Decimal,
}

impl SplitTerms {
    #[must_use]
    pub fn percentage(split_percentage: Decimal) -> Self {
        Self::Percentage { split_percentage }
    }

    #[must_use]
    pub fn flat_fee(flat_fee_amount: Decimal) -> Self {
        Self::FlatFee { flat_fee_amount }
    }

    #[must_use]
    pub fn minimum_plus_percentage(flat_fee_amount: Decimal, split_percentage: Decimal) -> Self {
        Self::MinimumPlusPercentage {
            split_percentage,
            flat_fee_amount,
        }
    }

    /// The `split_type` tag as stored.
    #[must_use]
    pub fn split_type(&self) -> &'static str {
        match self {
            Self::Percentage { .. } => "percentage",
            Self::FlatFee { .. } => "flat_fee",
            Self::MinimumPlusPercentage { .. } => "minimum_plus_percentage",
            Self::DoorSplit { .. } => "door_split",
            Self::Tiered { .. } => "tiered",
            Self::Custom => "custom",
            Self::Other => "other",
        }
    }

    /// Percentage of total revenue, if the split has one.
    #[must_use]
    pub fn split_percentage(&self) -> Option<Decimal> {
        match self {
            Self::Percentage { split_percentage }
            | Self::MinimumPlusPercentage {
                split_percentage, ..
            } => Some(*split_percentage),
            _ => None,
        }
    }

    /// Flat fee (or guaranteed minimum), if the split has one.
    #[must_use]
    pub fn flat_fee_amount(&self) -> Option<Decimal> {
        match self {
            Self::FlatFee { flat_fee_amount }
            | Self::MinimumPlusPercentage {
                flat_fee_amount, ..
            } => Some(*flat_fee_amount),
            _ => None,
        }
    }
}

impl fmt::Display for SplitTerms {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.split_type())
    }
}

/// The kind of party a participant row represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParticipantType {
    Comedian,
    Manager,
    Organization,
    Venue,
    Promoter,
    Other,
}

/// A participant's response to the deal terms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApprovalStatus {
    /// Awaiting the participant's approval.
    Pending,
    /// The participant accepted the current version of the terms.
    Approved,
    /// The participant asked for changes.
    Edited,
    /// The participant declined.
    Declined,
}

impl fmt::Display for ApprovalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Approved => write!(f, "approved"),
            Self::Edited => write!(f, "edited"),
            Self::Declined => write!(f, "declined"),
        }
    }
}

/// One party's share of an [`EventDeal`](crate::EventDeal).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DealParticipant {
    /// Row identifier.
    pub id: ParticipantId,
    /// The deal this row belongs to.
    pub deal_id: DealId,
    /// The user taking part.
    pub participant_id: UserId,
    pub participant_type: ParticipantType,
    /// Free-text role shown on the deal, e.g. "Headliner".
    #[serde(default)]
    pub participant_role: Option<String>,
    /// Split terms, flattened into the row (`split_type` + amounts).
    #[serde(flatten)]
    pub split: SplitTerms,
    pub approval_status: ApprovalStatus,
    /// Entitlement materialised at settlement.
    #[serde(default)]
    pub calculated_amount: Option<Decimal>,
    /// Revenue the participant already holds (e.g. door takings at a venue).
    #[serde(default)]
    pub revenue_collected: Decimal,
    /// Bumped on every change of terms; approval applies to one version.
    pub version: u32,
    #[serde(default)]
    pub edit_notes: Option<String>,
    #[serde(default)]
    pub approved_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub edited_at: Option<DateTime<Utc>>,
}

impl DealParticipant {
    /// A fresh participant row: pending approval, version 1.
    #[must_use]
    pub fn new(
        deal_id: DealId,
        participant_id: UserId,
        participant_type: ParticipantType,
        split: SplitTerms,
    ) -> Self {
        Self {
            id: ParticipantId::new(),
            deal_id,
            participant_id,
            participant_type,
            participant_role: None,
            split,
            approval_status: ApprovalStatus::Pending,
            calculated_amount: None,
            revenue_collected: Decimal::ZERO,
            version: 1,
            edit_notes: None,
            approved_at: None,
            edited_at: None,
        }
    }

    #[must_use]
    pub fn is_approved(&self) -> bool {
        self.approval_status == ApprovalStatus::Approved
    }
}

/// A superseded version of a participant's terms, recorded when the terms
/// change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParticipantHistoryEntry {
    /// The participant row the terms belonged to.
    pub participant_id: ParticipantId,
    /// Version the terms had while current.
    pub version: u32,
    #[serde(flatten)]
    pub split: SplitTerms,
    pub changed_by: UserId,
    #[serde(default)]
    pub change_notes: Option<String>,
    pub changed_at: DateTime<Utc>,
    pub previous_approval_status: ApprovalStatus,
}

#[cfg(any(test, feature = "test-helpers"))]
impl DealParticipant {
    /// A comedian on a throwaway deal with the given terms and status.
    pub fn dummy(split: SplitTerms, approval_status: ApprovalStatus) -> Self {
        let mut participant =
            Self::new(DealId::new(), UserId::new(), ParticipantType::Comedian, split);
        participant.approval_status = approval_status;
        participant
    }
}
