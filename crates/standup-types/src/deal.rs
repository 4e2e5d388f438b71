//! Event deals: revenue-sharing arrangements tied to one event.
//!
//! ## Lifecycle
//!
//! ```text
//!   ┌───────┐ submit ┌──────────────────┐ all approved ┌────────────────┐ settle ┌─────────┐
//!   │ DRAFT ├───────▶│ PENDING_APPROVAL │◀────────────▶│ FULLY_APPROVED ├───────▶│ SETTLED │
//!   └───┬───┘        └────────┬─────────┘  terms edited └───────┬────────┘        └─────────┘
//!       │                     │ cancel                          │
//!       └─────────────────────┴────────────────┬────────────────┘
//!                                              ▼
//!                                        ┌───────────┐
//!                                        │ CANCELLED │
//!                                        └───────────┘
//! ```
//!
//! `SETTLED` and `CANCELLED` are terminal.

use std::fmt;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{DealId, DealParticipant, EventId, ParticipantId, UserId};

/// Commercial shape of a deal. Informational; splits are per participant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DealType {
    SoloShow,
    CoHeadliner,
    DoorSplit,
    FlatFee,
    Percentage,
    Custom,
}

/// Where a deal is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DealStatus {
    /// Being put together by the promoter.
    Draft,
    /// Submitted; waiting on participant approvals.
    PendingApproval,
    /// Every participant approved the current terms.
    FullyApproved,
    /// Amounts materialised and invoices issued. Terminal.
    Settled,
    /// Abandoned. Terminal.
    Cancelled,
}

impl DealStatus {
    /// Can a deal move from this status to `target`?
    #[must_use]
    pub fn can_transition_to(&self, target: Self) -> bool {
        matches!(
            (self, target),
            (Self::Draft, Self::PendingApproval)
                | (Self::PendingApproval, Self::FullyApproved)
                | (Self::FullyApproved, Self::PendingApproval | Self::Settled)
                | (
                    Self::Draft | Self::PendingApproval | Self::FullyApproved,
                    Self::Cancelled
                )
        )
    }

    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Settled | Self::Cancelled)
    }
}

impl fmt::Display for DealStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Draft => write!(f, "draft"),
            Self::PendingApproval => write!(f, "pending_approval"),
            Self::FullyApproved => write!(f, "fully_approved"),
            Self::Settled => write!(f, "settled"),
            Self::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// The event a deal is attached to. Its promoter owns the deal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DealEvent {
    pub id: EventId,
    /// Owner of the event; the only user allowed to settle its deals.
    pub promoter_id: UserId,
    #[serde(default)]
    pub title: Option<String>,
}

/// A revenue-sharing arrangement between a promoter and its participants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventDeal {
    pub id: DealId,
    pub deal_name: String,
    pub deal_type: DealType,
    pub status: DealStatus,
    /// Gross revenue to split. Must be positive before settlement.
    #[serde(default)]
    pub total_revenue: Option<Decimal>,
    /// Participants in creation order.
    #[serde(default)]
    pub deal_participants: Vec<DealParticipant>,
    /// Joined event row.
    pub events: DealEvent,
    pub created_by: UserId,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub submitted_for_approval_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub fully_approved_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub settled_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub settled_by: Option<UserId>,
    #[serde(default)]
    pub cancelled_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub cancelled_by: Option<UserId>,
    #[serde(default)]
    pub cancellation_reason: Option<String>,
}

impl EventDeal {
    /// A new draft deal on `event`, created by its promoter.
    #[must_use]
    pub fn new(deal_name: impl Into<String>, deal_type: DealType, event: DealEvent) -> Self {
        Self {
            id: DealId::new(),
            deal_name: deal_name.into(),
            deal_type,
            status: DealStatus::Draft,
            total_revenue: None,
            deal_participants: Vec::new(),
            created_by: event.promoter_id,
            events: event,
            created_at: Utc::now(),
            submitted_for_approval_at: None,
            fully_approved_at: None,
            settled_at: None,
            settled_by: None,
            cancelled_at: None,
            cancelled_by: None,
            cancellation_reason: None,
        }
    }

    /// The event owner.
    #[must_use]
    pub fn promoter_id(&self) -> UserId {
        self.events.promoter_id
    }

    #[must_use]
    pub fn participant(&self, id: ParticipantId) -> Option<&DealParticipant> {
        self.deal_participants.iter().find(|p| p.id == id)
    }

    pub fn participant_mut(&mut self, id: ParticipantId) -> Option<&mut DealParticipant> {
        self.deal_participants.iter_mut().find(|p| p.id == id)
    }

    /// True when there is at least one participant and all of them approved.
    #[must_use]
    pub fn all_participants_approved(&self) -> bool {
        !self.deal_participants.is_empty()
            && self.deal_participants.iter().all(DealParticipant::is_approved)
    }
}

#[cfg(any(test, feature = "test-helpers"))]
impl EventDeal {
    /// A draft deal owned by `promoter` with no participants.
    pub fn dummy(promoter: UserId) -> Self {
        Self::new(
            "Friday Late Show",
            DealType::DoorSplit,
            DealEvent {
                id: EventId::new(),
                promoter_id: promoter,
                title: Some("Friday Late Show".to_string()),
            },
        )
    }
}
