//! Settlement statements: the materialised outcome of settling a deal.
//!
//! For every participant the statement carries the computed share, the
//! display description, the net position towards the promoter, and the
//! resulting invoice instruction. The caller persists it; nothing here
//! touches storage.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use standup_types::{
    DealId, DealParticipant, EventDeal, InvoiceId, InvoiceInstruction, ParticipantId, UserId,
};

use crate::invoice::calculate_invoice_direction;
use crate::money::{saturating_sub, saturating_sum};
use crate::split::{calculate_split_amount, generate_split_description};

/// One participant's settlement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettlementLine {
    pub participant_row: ParticipantId,
    pub participant_id: UserId,
    /// Entitlement from the split terms.
    pub amount: Decimal,
    pub description: String,
    /// `revenue_collected - amount`: positive when the participant holds
    /// more than their share and must pay the difference to the promoter.
    pub net_position: Decimal,
    pub invoice: InvoiceInstruction,
    /// Stable reference for the invoice, present when one is needed.
    pub invoice_id: Option<InvoiceId>,
}

impl SettlementLine {
    #[must_use]
    pub fn for_participant(
        deal_id: DealId,
        participant: &DealParticipant,
        total_revenue: Decimal,
    ) -> Self {
        let amount = calculate_split_amount(participant, total_revenue);
        let net_position = saturating_sub(participant.revenue_collected, amount);
        let invoice = calculate_invoice_direction(net_position);
        Self {
            participant_row: participant.id,
            participant_id: participant.participant_id,
            amount,
            description: generate_split_description(participant),
            net_position,
            invoice,
            invoice_id: invoice
                .should_generate()
                .then(|| InvoiceId::deterministic(deal_id, participant.id)),
        }
    }
}

/// Everything a settled deal produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettlementStatement {
    pub deal_id: DealId,
    pub total_revenue: Decimal,
    pub settled_by: UserId,
    pub settled_at: DateTime<Utc>,
    /// In participant order.
    pub lines: Vec<SettlementLine>,
}

impl SettlementStatement {
    /// Compute the statement for `deal` at `total_revenue`.
    ///
    /// Does not check readiness; run the settlement validator first.
    #[must_use]
    pub fn prepare(
        deal: &EventDeal,
        total_revenue: Decimal,
        settled_by: UserId,
        settled_at: DateTime<Utc>,
    ) -> Self {
        let lines = deal
            .deal_participants
            .iter()
            .map(|p| SettlementLine::for_participant(deal.id, p, total_revenue))
            .collect();
        Self {
            deal_id: deal.id,
            total_revenue,
            settled_by,
            settled_at,
            lines,
        }
    }

    /// Sum of every participant's share, saturating.
    #[must_use]
    pub fn total_allocated(&self) -> Decimal {
        saturating_sum(self.lines.iter().map(|l| l.amount))
    }

    /// Revenue left to the promoter after all shares. Negative when the
    /// shares (e.g. guarantees) exceed revenue.
    #[must_use]
    pub fn unallocated(&self) -> Decimal {
        saturating_sub(self.total_revenue, self.total_allocated())
    }

    /// Lines that need an invoice.
    pub fn invoices(&self) -> impl Iterator<Item = &SettlementLine> {
        self.lines.iter().filter(|l| l.invoice.should_generate())
    }

    /// Hex SHA-256 over the canonical content of the statement.
    ///
    /// Independent of timestamps, so two runs over the same deal and
    /// revenue agree.
    #[must_use]
    pub fn digest(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(b"standup:statement:v1:");
        hasher.update(self.deal_id.0.as_bytes());
        hasher.update(self.total_revenue.normalize().to_string().as_bytes());
        for line in &self.lines {
            hasher.update(line.participant_row.0.as_bytes());
            hasher.update(line.amount.normalize().to_string().as_bytes());
            hasher.update(b"|");
            hasher.update(line.net_position.normalize().to_string().as_bytes());
            hasher.update(b"|");
        }
        hex::encode(hasher.finalize())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use standup_types::{ApprovalStatus, InvoiceDirection, SplitTerms};

    fn deal_with(terms: &[(SplitTerms, Decimal)]) -> EventDeal {
        let mut deal = EventDeal::dummy(UserId::new());
        for (split, collected) in terms {
            let mut p = DealParticipant::dummy(split.clone(), ApprovalStatus::Approved);
            p.deal_id = deal.id;
            p.revenue_collected = *collected;
            deal.deal_participants.push(p);
        }
        deal
    }

    #[test]
    fn promoter_pays_participant_share() {
        let deal = deal_with(&[(SplitTerms::percentage(Decimal::new(30, 0)), Decimal::ZERO)]);
        let stmt = SettlementStatement::prepare(
            &deal,
            Decimal::new(1_000, 0),
            deal.promoter_id(),
            Utc::now(),
        );

        let line = &stmt.lines[0];
        assert_eq!(line.amount, Decimal::new(300, 0));
        assert_eq!(line.net_position, Decimal::new(-300, 0));
        assert_eq!(
            line.invoice.direction(),
            Some(InvoiceDirection::PromoterToParticipant)
        );
        assert_eq!(line.invoice.absolute_amount(), Decimal::new(300, 0));
        assert!(line.invoice_id.is_some());
        assert_eq!(line.description, "30% of total revenue");
    }

    #[test]
    fn venue_holding_door_takings_owes_promoter() {
        let deal = deal_with(&[(
            SplitTerms::flat_fee(Decimal::new(500, 0)),
            Decimal::new(2_000, 0),
        )]);
        let stmt = SettlementStatement::prepare(
            &deal,
            Decimal::new(2_000, 0),
            deal.promoter_id(),
            Utc::now(),
        );
        let line = &stmt.lines[0];
        assert_eq!(line.net_position, Decimal::new(1_500, 0));
        assert_eq!(
            line.invoice.direction(),
            Some(InvoiceDirection::ParticipantToPromoter)
        );
    }

    #[test]
    fn balanced_position_has_no_invoice() {
        let deal = deal_with(&[(
            SplitTerms::flat_fee(Decimal::new(400, 0)),
            Decimal::new(400, 0),
        )]);
        let stmt = SettlementStatement::prepare(
            &deal,
            Decimal::new(1_000, 0),
            deal.promoter_id(),
            Utc::now(),
        );
        assert_eq!(stmt.lines[0].invoice, InvoiceInstruction::NotNeeded);
        assert!(stmt.lines[0].invoice_id.is_none());
        assert_eq!(stmt.invoices().count(), 0);
    }

    #[test]
    fn totals() {
        let deal = deal_with(&[
            (SplitTerms::percentage(Decimal::new(40, 0)), Decimal::ZERO),
            (
                SplitTerms::minimum_plus_percentage(Decimal::new(1_000, 0), Decimal::new(10, 0)),
                Decimal::ZERO,
            ),
        ]);
        let stmt = SettlementStatement::prepare(
            &deal,
            Decimal::new(5_000, 0),
            deal.promoter_id(),
            Utc::now(),
        );
        assert_eq!(stmt.total_allocated(), Decimal::new(3_000, 0));
        assert_eq!(stmt.unallocated(), Decimal::new(2_000, 0));
        assert_eq!(stmt.invoices().count(), 2);
    }

    #[test]
    fn extreme_amounts_saturate() {
        let deal = deal_with(&[
            (SplitTerms::percentage(Decimal::new(200, 0)), Decimal::MIN),
            (SplitTerms::flat_fee(Decimal::MAX), Decimal::ZERO),
        ]);
        let stmt =
            SettlementStatement::prepare(&deal, Decimal::MAX, deal.promoter_id(), Utc::now());
        assert_eq!(stmt.lines[0].amount, Decimal::MAX);
        assert_eq!(stmt.lines[0].net_position, Decimal::MIN);
        assert_eq!(stmt.total_allocated(), Decimal::MAX);
        assert_eq!(stmt.unallocated(), Decimal::ZERO);
    }

    #[test]
    fn digest_ignores_time_but_tracks_amounts() {
        let deal = deal_with(&[(SplitTerms::percentage(Decimal::new(50, 0)), Decimal::ZERO)]);
        let promoter = deal.promoter_id();
        let a = SettlementStatement::prepare(&deal, Decimal::new(100, 0), promoter, Utc::now());
        let b = SettlementStatement::prepare(
            &deal,
            Decimal::new(10_000, 2),
            promoter,
            Utc::now() + chrono::Duration::hours(1),
        );
        let c = SettlementStatement::prepare(&deal, Decimal::new(200, 0), promoter, Utc::now());

        assert_eq!(a.digest(), b.digest());
        assert_ne!(a.digest(), c.digest());
        assert_eq!(a.digest().len(), 64);
    }
}
