//! Aggregate counters for deal dashboards.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use standup_types::{ApprovalStatus, DealParticipant, DealStatus, EventDeal, SplitTerms};

use crate::money::{saturating_add, saturating_sub};

/// Deal counts and revenue for one event (or any set of deals).
///
/// Revenue totals saturate at `Decimal::MAX`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DealStats {
    pub total_deals: usize,
    pub draft: usize,
    pub pending_approval: usize,
    pub fully_approved: usize,
    pub settled: usize,
    pub cancelled: usize,
    /// Sum of every deal's revenue where set.
    pub total_revenue: Decimal,
    /// Revenue of settled deals only.
    pub total_settled_revenue: Decimal,
}

impl DealStats {
    #[must_use]
    pub fn from_deals<'a>(deals: impl IntoIterator<Item = &'a EventDeal>) -> Self {
        let mut stats = Self::default();
        for deal in deals {
            stats.total_deals += 1;
            match deal.status {
                DealStatus::Draft => stats.draft += 1,
                DealStatus::PendingApproval => stats.pending_approval += 1,
                DealStatus::FullyApproved => stats.fully_approved += 1,
                DealStatus::Settled => stats.settled += 1,
                DealStatus::Cancelled => stats.cancelled += 1,
            }
            if let Some(revenue) = deal.total_revenue {
                stats.total_revenue = saturating_add(stats.total_revenue, revenue);
                if deal.status == DealStatus::Settled {
                    stats.total_settled_revenue =
                        saturating_add(stats.total_settled_revenue, revenue);
                }
            }
        }
        stats
    }
}

/// Approval progress and allocation of one deal's participants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParticipantStats {
    pub total: usize,
    pub pending: usize,
    pub approved: usize,
    pub edited: usize,
    pub declined: usize,
    /// Sum of materialised amounts.
    pub total_allocated: Decimal,
    /// `100` minus the pure-percentage splits, floored at zero.
    pub unallocated_percentage: Decimal,
}

impl ParticipantStats {
    #[must_use]
    pub fn from_participants<'a>(
        participants: impl IntoIterator<Item = &'a DealParticipant>,
    ) -> Self {
        let mut stats = Self {
            total: 0,
            pending: 0,
            approved: 0,
            edited: 0,
            declined: 0,
            total_allocated: Decimal::ZERO,
            unallocated_percentage: Decimal::ONE_HUNDRED,
        };
        let mut allocated_percentage = Decimal::ZERO;

        for p in participants {
            stats.total += 1;
            match p.approval_status {
                ApprovalStatus::Pending => stats.pending += 1,
                ApprovalStatus::Approved => stats.approved += 1,
                ApprovalStatus::Edited => stats.edited += 1,
                ApprovalStatus::Declined => stats.declined += 1,
            }
            // Guaranteed-minimum splits are not counted: their share
            // depends on revenue.
            if let SplitTerms::Percentage { split_percentage } = p.split {
                allocated_percentage = saturating_add(allocated_percentage, split_percentage);
            }
            if let Some(amount) = p.calculated_amount {
                stats.total_allocated = saturating_add(stats.total_allocated, amount);
            }
        }

        stats.unallocated_percentage =
            saturating_sub(Decimal::ONE_HUNDRED, allocated_percentage).max(Decimal::ZERO);
        stats
    }
}
