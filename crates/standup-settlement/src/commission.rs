//! Manager commission on comedian deal earnings.
//!
//! A manager earns a percentage of what each managed comedian is allocated
//! in a deal. Commission is a separate calculation on top of settlement: it
//! reads `calculated_amount` and never changes it.

use std::collections::HashSet;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use standup_types::{
    DealStatus, EventDeal, ManagerCommission, ManagerEarnings, ParticipantType, UserId, constants,
};

use crate::money::{percentage_of, saturating_sum};

fn round_money(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(constants::MONEY_SCALE, RoundingStrategy::MidpointAwayFromZero)
}

/// `amount * percentage / 100`, rounded to cents.
#[must_use]
pub fn calculate_commission(amount: Decimal, commission_percentage: Decimal) -> Decimal {
    round_money(percentage_of(amount, commission_percentage))
}

/// The active commission arrangement for `comedian_id`, if any.
#[must_use]
pub fn active_commission_for(
    commissions: &[ManagerCommission],
    comedian_id: UserId,
) -> Option<&ManagerCommission> {
    commissions
        .iter()
        .find(|c| c.is_active && c.comedian_id == comedian_id)
}

/// Commission `manager_id` earns from one deal, one entry per managed
/// comedian. Comedians without a calculated amount count as zero.
#[must_use]
pub fn calculate_manager_earnings(
    deal: &EventDeal,
    commissions: &[ManagerCommission],
    manager_id: UserId,
) -> Vec<ManagerEarnings> {
    deal.deal_participants
        .iter()
        .filter(|p| p.participant_type == ParticipantType::Comedian)
        .filter_map(|p| {
            let commission = active_commission_for(commissions, p.participant_id)?;
            if commission.manager_id != manager_id {
                return None;
            }
            let calculated_amount = p.calculated_amount.unwrap_or(Decimal::ZERO);
            Some(ManagerEarnings {
                deal_id: deal.id,
                participant_id: p.id,
                comedian_id: p.participant_id,
                calculated_amount,
                commission_percentage: commission.commission_percentage,
                commission_amount: calculate_commission(
                    calculated_amount,
                    commission.commission_percentage,
                ),
            })
        })
        .collect()
}

/// A manager's commission across many deals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManagerEarningsSummary {
    /// Rounded to cents.
    pub total_earnings: Decimal,
    pub earnings_by_deal: Vec<ManagerEarnings>,
    /// Distinct comedians contributing.
    pub comedians_count: usize,
}

/// Commission `manager_id` earned from the settled deals among `deals`.
#[must_use]
pub fn total_manager_earnings<'a>(
    deals: impl IntoIterator<Item = &'a EventDeal>,
    commissions: &[ManagerCommission],
    manager_id: UserId,
) -> ManagerEarningsSummary {
    let earnings: Vec<ManagerEarnings> = deals
        .into_iter()
        .filter(|d| d.status == DealStatus::Settled)
        .flat_map(|d| calculate_manager_earnings(d, commissions, manager_id))
        .collect();
    let comedians: HashSet<UserId> = earnings.iter().map(|e| e.comedian_id).collect();
    ManagerEarningsSummary {
        total_earnings: round_money(saturating_sum(earnings.iter().map(|e| e.commission_amount))),
        comedians_count: comedians.len(),
        earnings_by_deal: earnings,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use standup_types::{ApprovalStatus, DealId, DealParticipant, SplitTerms};

    fn comedian(deal_id: DealId, user: UserId, amount: Option<Decimal>) -> DealParticipant {
        let mut p = DealParticipant::new(
            deal_id,
            user,
            ParticipantType::Comedian,
            SplitTerms::flat_fee(Decimal::new(100, 0)),
        );
        p.approval_status = ApprovalStatus::Approved;
        p.calculated_amount = amount;
        p
    }

    fn commission(manager: UserId, comedian: UserId, pct: i64, active: bool) -> ManagerCommission {
        ManagerCommission {
            manager_id: manager,
            comedian_id: comedian,
            commission_percentage: Decimal::from(pct),
            is_active: active,
        }
    }

    #[test]
    fn commission_rounds_to_cents() {
        assert_eq!(
            calculate_commission(Decimal::new(33_333, 2), Decimal::new(15, 0)),
            Decimal::new(5_000, 2) // 49.99995 -> 50.00
        );
        assert_eq!(
            calculate_commission(Decimal::new(1_000, 0), Decimal::new(15, 0)),
            Decimal::new(150, 0)
        );
        assert_eq!(
            calculate_commission(Decimal::new(5, 2), Decimal::new(10, 0)),
            Decimal::new(1, 2) // 0.005 -> 0.01
        );
    }

    #[test]
    fn earnings_only_for_managed_comedians() {
        let manager = UserId::new();
        let (alice, bob, carol) = (UserId::new(), UserId::new(), UserId::new());
        let mut deal = EventDeal::dummy(UserId::new());
        deal.deal_participants.push(comedian(deal.id, alice, Some(Decimal::new(1_000, 0))));
        deal.deal_participants.push(comedian(deal.id, bob, Some(Decimal::new(800, 0))));
        deal.deal_participants.push(comedian(deal.id, carol, None));

        let commissions = vec![
            commission(manager, alice, 15, true),
            commission(UserId::new(), bob, 20, true),
            commission(manager, carol, 10, true),
        ];

        let earnings = calculate_manager_earnings(&deal, &commissions, manager);
        assert_eq!(earnings.len(), 2);
        assert_eq!(earnings[0].comedian_id, alice);
        assert_eq!(earnings[0].commission_amount, Decimal::new(150, 0));
        assert_eq!(earnings[1].comedian_id, carol);
        assert_eq!(earnings[1].commission_amount, Decimal::ZERO);
    }

    #[test]
    fn inactive_commission_earns_nothing() {
        let manager = UserId::new();
        let alice = UserId::new();
        let mut deal = EventDeal::dummy(UserId::new());
        deal.deal_participants.push(comedian(deal.id, alice, Some(Decimal::new(1_000, 0))));

        let commissions = vec![commission(manager, alice, 15, false)];
        assert!(calculate_manager_earnings(&deal, &commissions, manager).is_empty());
    }

    #[test]
    fn non_comedian_participants_ignored() {
        let manager = UserId::new();
        let venue = UserId::new();
        let mut deal = EventDeal::dummy(UserId::new());
        let mut p = comedian(deal.id, venue, Some(Decimal::new(2_000, 0)));
        p.participant_type = ParticipantType::Venue;
        deal.deal_participants.push(p);

        let commissions = vec![commission(manager, venue, 15, true)];
        assert!(calculate_manager_earnings(&deal, &commissions, manager).is_empty());
    }

    #[test]
    fn totals_cover_settled_deals_only() {
        let manager = UserId::new();
        let alice = UserId::new();
        let commissions = vec![commission(manager, alice, 15, true)];

        let mut settled_a = EventDeal::dummy(UserId::new());
        settled_a.status = DealStatus::Settled;
        settled_a
            .deal_participants
            .push(comedian(settled_a.id, alice, Some(Decimal::new(1_000, 0))));

        let mut settled_b = EventDeal::dummy(UserId::new());
        settled_b.status = DealStatus::Settled;
        settled_b
            .deal_participants
            .push(comedian(settled_b.id, alice, Some(Decimal::new(333, 0))));

        let mut pending = EventDeal::dummy(UserId::new());
        pending.status = DealStatus::FullyApproved;
        pending
            .deal_participants
            .push(comedian(pending.id, alice, Some(Decimal::new(9_999, 0))));

        let summary =
            total_manager_earnings(&[settled_a, settled_b, pending], &commissions, manager);
        assert_eq!(summary.earnings_by_deal.len(), 2);
        assert_eq!(summary.comedians_count, 1);
        // 150.00 + 49.95
        assert_eq!(summary.total_earnings, Decimal::new(19_995, 2));
    }
}
