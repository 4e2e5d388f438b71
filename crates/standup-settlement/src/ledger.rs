//! In-memory deal ledger driving the deal lifecycle.
//!
//! The ledger owns the deals it tracks and applies every lifecycle step:
//! 1. Promoter drafts a deal and adds participants
//! 2. Deal is submitted for approval (`draft → pending_approval`)
//! 3. Participants approve, decline, or request changes; the deal status
//!    follows (`pending_approval ⇄ fully_approved`)
//! 4. Promoter sets total revenue and settles (`fully_approved → settled`)
//!
//! Persistence stays with the caller: every mutating call either applies
//! completely or leaves the deal untouched. Rows fetched again from storage
//! are brought back in with [`DealLedger::upsert`].

use std::collections::HashMap;

use chrono::Utc;
use rust_decimal::Decimal;
use standup_types::{
    ApprovalStatus, DealError, DealId, DealParticipant, DealStatus, EventDeal, ManagerCommission,
    ParticipantHistoryEntry, ParticipantId, ParticipantType, Result, SettlementConfig, SplitTerms,
    UserId,
};

use crate::commission::active_commission_for;
use crate::statement::SettlementStatement;
use crate::validation::{
    validate_deal_for_settlement, validate_deal_for_submission, validate_participant_split,
};

/// Tracks deals and enforces their lifecycle.
pub struct DealLedger {
    deals: HashMap<DealId, EventDeal>,
    /// Superseded terms per participant row, oldest first.
    history: HashMap<ParticipantId, Vec<ParticipantHistoryEntry>>,
    config: SettlementConfig,
}

impl DealLedger {
    #[must_use]
    pub fn new(config: SettlementConfig) -> Self {
        Self {
            deals: HashMap::new(),
            history: HashMap::new(),
            config,
        }
    }

    #[must_use]
    pub fn config(&self) -> &SettlementConfig {
        &self.config
    }

    /// Start tracking `deal`.
    ///
    /// # Errors
    /// `DuplicateDeal` if a deal with the same ID is already tracked.
    pub fn insert(&mut self, deal: EventDeal) -> Result<DealId> {
        let id = deal.id;
        if self.deals.contains_key(&id) {
            return Err(DealError::DuplicateDeal(id));
        }
        self.deals.insert(id, deal);
        Ok(id)
    }

    /// Replace a tracked deal with a copy re-read from storage, or start
    /// tracking it.
    ///
    /// A settled deal stays settled: a copy that is not itself settled is
    /// stale and is refused.
    ///
    /// # Errors
    /// `AlreadySettled` if the tracked deal is settled and `deal` is not.
    pub fn upsert(&mut self, deal: EventDeal) -> Result<DealId> {
        let id = deal.id;
        let settled = self
            .deals
            .get(&id)
            .is_some_and(|current| current.status == DealStatus::Settled);
        if settled && deal.status != DealStatus::Settled {
            tracing::warn!(deal_id = %id, stale_status = %deal.status, "Stale deal copy refused");
            return Err(DealError::AlreadySettled(id));
        }
        self.deals.insert(id, deal);
        Ok(id)
    }

    #[must_use]
    pub fn get(&self, deal_id: DealId) -> Option<&EventDeal> {
        self.deals.get(&deal_id)
    }

    pub fn deals(&self) -> impl Iterator<Item = &EventDeal> {
        self.deals.values()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.deals.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.deals.is_empty()
    }

    // ----------------------------------------------------------------
    // Participants
    // ----------------------------------------------------------------

    /// Add `participant` to an open deal.
    ///
    /// The row is attached to the deal and starts `pending` at version 1,
    /// whatever its incoming state.
    ///
    /// # Errors
    /// - `DealNotFound`
    /// - `DealLocked` once the deal is fully approved, settled or cancelled
    /// - `InvalidSplit` if the split terms fail validation
    pub fn add_participant(
        &mut self,
        deal_id: DealId,
        mut participant: DealParticipant,
    ) -> Result<ParticipantId> {
        let deal = deal_mut(&mut self.deals, deal_id)?;
        if !matches!(deal.status, DealStatus::Draft | DealStatus::PendingApproval) {
            return Err(DealError::DealLocked(deal.status));
        }
        validate_participant_split(&participant.split)
            .into_result(|reasons| DealError::InvalidSplit { reasons })?;

        participant.deal_id = deal_id;
        participant.approval_status = ApprovalStatus::Pending;
        participant.version = 1;
        participant.approved_at = None;
        participant.calculated_amount = None;
        let row = participant.id;

        tracing::debug!(
            deal_id = %deal_id,
            participant = %participant.participant_id,
            split = %participant.split,
            "Participant added"
        );
        deal.deal_participants.push(participant);
        refresh(deal)?;
        Ok(row)
    }

    /// Add the active manager of `comedian_id` to the deal, unless the
    /// comedian has none or the manager is already a participant.
    ///
    /// The manager joins on a percentage split at their commission rate,
    /// falling back to the configured default when the rate is zero.
    pub fn auto_add_manager(
        &mut self,
        deal_id: DealId,
        comedian_id: UserId,
        commissions: &[ManagerCommission],
    ) -> Result<Option<ParticipantId>> {
        let Some(commission) = active_commission_for(commissions, comedian_id) else {
            return Ok(None);
        };
        let deal = self
            .deals
            .get(&deal_id)
            .ok_or(DealError::DealNotFound(deal_id))?;
        if deal.deal_participants.iter().any(|p| {
            p.participant_id == commission.manager_id
                && p.participant_type == ParticipantType::Manager
        }) {
            return Ok(None);
        }

        let rate = if commission.commission_percentage.is_zero() {
            self.config.default_commission_percentage
        } else {
            commission.commission_percentage
        };
        let mut manager = DealParticipant::new(
            deal_id,
            commission.manager_id,
            ParticipantType::Manager,
            SplitTerms::percentage(rate),
        );
        manager.participant_role = Some("Manager".to_string());
        self.add_participant(deal_id, manager).map(Some)
    }

    /// Remove a participant row from an open deal.
    pub fn remove_participant(
        &mut self,
        deal_id: DealId,
        participant_row: ParticipantId,
    ) -> Result<DealParticipant> {
        let deal = deal_mut(&mut self.deals, deal_id)?;
        if !matches!(deal.status, DealStatus::Draft | DealStatus::PendingApproval) {
            return Err(DealError::DealLocked(deal.status));
        }
        let idx = deal
            .deal_participants
            .iter()
            .position(|p| p.id == participant_row)
            .ok_or(DealError::ParticipantNotFound(participant_row))?;
        let removed = deal.deal_participants.remove(idx);
        refresh(deal)?;
        Ok(removed)
    }

    /// Submit a draft deal for participant approval.
    ///
    /// # Errors
    /// `SubmissionRejected` listing every failed check.
    pub fn submit_for_approval(&mut self, deal_id: DealId) -> Result<()> {
        let deal = deal_mut(&mut self.deals, deal_id)?;
        validate_deal_for_submission(deal)
            .into_result(|reasons| DealError::SubmissionRejected { reasons })?;
        transition(deal, DealStatus::PendingApproval)?;
        deal.submitted_for_approval_at = Some(Utc::now());
        Ok(())
    }

    /// `user_id` approves their participant row. Returns the deal status
    /// after the approval.
    pub fn approve_participant(
        &mut self,
        deal_id: DealId,
        participant_row: ParticipantId,
        user_id: UserId,
    ) -> Result<DealStatus> {
        let deal = deal_mut(&mut self.deals, deal_id)?;
        let participant = own_participant(deal, participant_row, user_id)?;
        participant.approval_status = ApprovalStatus::Approved;
        participant.approved_at = Some(Utc::now());
        tracing::info!(deal_id = %deal_id, participant = %participant_row, "Participant approved");
        refresh(deal)
    }

    /// Approve every pending row `user_id` holds on the deal. Returns the
    /// rows approved, in participant order.
    ///
    /// # Errors
    /// `DealLocked` once the deal is settled or cancelled.
    pub fn approve_all_pending_for_user(
        &mut self,
        deal_id: DealId,
        user_id: UserId,
    ) -> Result<Vec<ParticipantId>> {
        let deal = deal_mut(&mut self.deals, deal_id)?;
        if deal.status.is_terminal() {
            return Err(DealError::DealLocked(deal.status));
        }
        let now = Utc::now();
        let approved: Vec<ParticipantId> = deal
            .deal_participants
            .iter_mut()
            .filter(|p| {
                p.participant_id == user_id && p.approval_status == ApprovalStatus::Pending
            })
            .map(|p| {
                p.approval_status = ApprovalStatus::Approved;
                p.approved_at = Some(now);
                p.id
            })
            .collect();
        tracing::info!(
            deal_id = %deal_id,
            user_id = %user_id,
            count = approved.len(),
            "Bulk approved pending terms"
        );
        refresh(deal)?;
        Ok(approved)
    }

    /// Rows awaiting `user_id`'s approval on deals that are out for
    /// approval.
    pub fn pending_approvals_for(
        &self,
        user_id: UserId,
    ) -> impl Iterator<Item = (&EventDeal, &DealParticipant)> {
        self.deals
            .values()
            .filter(|d| d.status == DealStatus::PendingApproval)
            .flat_map(move |d| {
                d.deal_participants
                    .iter()
                    .filter(move |p| {
                        p.participant_id == user_id && p.approval_status == ApprovalStatus::Pending
                    })
                    .map(move |p| (d, p))
            })
    }

    /// Superseded terms of a participant row, newest first.
    pub fn participant_history(
        &self,
        participant_row: ParticipantId,
    ) -> impl Iterator<Item = &ParticipantHistoryEntry> {
        self.history
            .get(&participant_row)
            .into_iter()
            .flat_map(|entries| entries.iter().rev())
    }

    /// `user_id` declines their participant row.
    pub fn decline_participant(
        &mut self,
        deal_id: DealId,
        participant_row: ParticipantId,
        user_id: UserId,
        reason: Option<String>,
    ) -> Result<DealStatus> {
        let deal = deal_mut(&mut self.deals, deal_id)?;
        let participant = own_participant(deal, participant_row, user_id)?;
        participant.approval_status = ApprovalStatus::Declined;
        participant.approved_at = None;
        if reason.is_some() {
            participant.edit_notes = reason;
        }
        tracing::info!(deal_id = %deal_id, participant = %participant_row, "Participant declined");
        refresh(deal)
    }

    /// `user_id` replaces the terms of their participant row.
    ///
    /// The row goes back to `pending` under a new version, so a fully
    /// approved deal drops back to `pending_approval`.
    pub fn request_changes(
        &mut self,
        deal_id: DealId,
        participant_row: ParticipantId,
        user_id: UserId,
        new_terms: SplitTerms,
        notes: Option<String>,
    ) -> Result<DealStatus> {
        validate_participant_split(&new_terms)
            .into_result(|reasons| DealError::InvalidSplit { reasons })?;
        let deal = deal_mut(&mut self.deals, deal_id)?;
        let participant = own_participant(deal, participant_row, user_id)?;
        let now = Utc::now();
        let previous = std::mem::replace(&mut participant.split, new_terms);
        self.history
            .entry(participant_row)
            .or_default()
            .push(ParticipantHistoryEntry {
                participant_id: participant_row,
                version: participant.version,
                split: previous,
                changed_by: user_id,
                change_notes: notes.clone(),
                changed_at: now,
                previous_approval_status: participant.approval_status,
            });
        participant.version += 1;
        participant.approval_status = ApprovalStatus::Pending;
        participant.approved_at = None;
        participant.edit_notes = notes;
        participant.edited_at = Some(now);
        tracing::info!(
            deal_id = %deal_id,
            participant = %participant_row,
            version = participant.version,
            "Participant requested changes"
        );
        refresh(deal)
    }

    /// Recompute the deal status from participant approvals.
    pub fn refresh_approval_status(&mut self, deal_id: DealId) -> Result<DealStatus> {
        refresh(deal_mut(&mut self.deals, deal_id)?)
    }

    // ----------------------------------------------------------------
    // Revenue, cancellation, settlement
    // ----------------------------------------------------------------

    /// # Errors
    /// `DealLocked` once the deal is settled or cancelled.
    pub fn set_total_revenue(&mut self, deal_id: DealId, revenue: Decimal) -> Result<()> {
        let deal = deal_mut(&mut self.deals, deal_id)?;
        if deal.status.is_terminal() {
            return Err(DealError::DealLocked(deal.status));
        }
        deal.total_revenue = Some(revenue);
        Ok(())
    }

    pub fn cancel(&mut self, deal_id: DealId, user_id: UserId, reason: Option<String>) -> Result<()> {
        let deal = deal_mut(&mut self.deals, deal_id)?;
        transition(deal, DealStatus::Cancelled)?;
        deal.cancelled_at = Some(Utc::now());
        deal.cancelled_by = Some(user_id);
        deal.cancellation_reason = reason;
        Ok(())
    }

    /// Settle the deal on behalf of `user_id`.
    ///
    /// Each participant's `calculated_amount` is written back to the deal
    /// and the returned statement carries amounts, net positions and
    /// invoice instructions.
    ///
    /// # Errors
    /// - `AlreadySettled` if the deal was settled before
    /// - `SettlementRejected` carrying every failed readiness check
    pub fn settle(&mut self, deal_id: DealId, user_id: UserId) -> Result<SettlementStatement> {
        let deal = deal_mut(&mut self.deals, deal_id)?;
        if deal.status == DealStatus::Settled {
            return Err(DealError::AlreadySettled(deal_id));
        }

        let report = validate_deal_for_settlement(deal, user_id);
        if !report.is_valid() {
            tracing::warn!(
                deal_id = %deal_id,
                user_id = %user_id,
                errors = ?report.errors(),
                "Settlement rejected"
            );
            return Err(DealError::SettlementRejected {
                reasons: report.errors(),
            });
        }
        let revenue = deal
            .total_revenue
            .ok_or_else(|| DealError::Internal(format!("deal {deal_id} has no revenue")))?;

        let statement = SettlementStatement::prepare(deal, revenue, user_id, Utc::now());

        for (participant, line) in deal.deal_participants.iter_mut().zip(&statement.lines) {
            participant.calculated_amount = Some(line.amount);
            tracing::debug!(
                deal_id = %deal_id,
                participant = %line.participant_id,
                amount = %line.amount,
                net_position = %line.net_position,
                "Participant settled"
            );
        }
        transition(deal, DealStatus::Settled)?;
        deal.settled_at = Some(statement.settled_at);
        deal.settled_by = Some(user_id);

        tracing::info!(
            deal_id = %deal_id,
            total_revenue = %revenue,
            currency = %self.config.currency,
            allocated = %statement.total_allocated(),
            invoices = statement.invoices().count(),
            "Deal settled"
        );
        Ok(statement)
    }
}

impl Default for DealLedger {
    fn default() -> Self {
        Self::new(SettlementConfig::default())
    }
}

// --------------------------------------------------------------------
// Helpers
// --------------------------------------------------------------------

fn deal_mut(deals: &mut HashMap<DealId, EventDeal>, deal_id: DealId) -> Result<&mut EventDeal> {
    deals
        .get_mut(&deal_id)
        .ok_or(DealError::DealNotFound(deal_id))
}

/// The row `participant_row`, provided `user_id` is the participant.
fn own_participant(
    deal: &mut EventDeal,
    participant_row: ParticipantId,
    user_id: UserId,
) -> Result<&mut DealParticipant> {
    if deal.status.is_terminal() {
        return Err(DealError::DealLocked(deal.status));
    }
    let participant = deal
        .participant_mut(participant_row)
        .ok_or(DealError::ParticipantNotFound(participant_row))?;
    if participant.participant_id != user_id {
        return Err(DealError::NotParticipant {
            participant: participant_row,
            user: user_id,
        });
    }
    Ok(participant)
}

fn transition(deal: &mut EventDeal, to: DealStatus) -> Result<()> {
    let from = deal.status;
    if !from.can_transition_to(to) {
        return Err(DealError::InvalidTransition { from, to });
    }
    deal.status = to;
    tracing::info!(deal_id = %deal.id, %from, %to, "Deal status changed");
    Ok(())
}

/// `fully_approved` when every participant approved, `pending_approval`
/// otherwise. Drafts and terminal deals are left alone.
fn refresh(deal: &mut EventDeal) -> Result<DealStatus> {
    if !matches!(
        deal.status,
        DealStatus::PendingApproval | DealStatus::FullyApproved
    ) {
        return Ok(deal.status);
    }
    let target = if deal.all_participants_approved() {
        DealStatus::FullyApproved
    } else {
        DealStatus::PendingApproval
    };
    if target != deal.status {
        transition(deal, target)?;
        deal.fully_approved_at = (target == DealStatus::FullyApproved).then(Utc::now);
    }
    Ok(deal.status)
}
