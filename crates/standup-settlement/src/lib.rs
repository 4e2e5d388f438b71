//! # standup-settlement
//!
//! Deal settlement: split calculation, readiness checks, invoice
//! direction, and the deal lifecycle up to settlement.
//!
//! ## Architecture
//!
//! The pure calculations sit at the bottom and never fail:
//! - [`split`]: a participant's share of revenue and its description
//! - [`validation`]: every reason a deal is not ready, collected as data
//! - [`invoice`]: who invoices whom for a net amount
//!
//! On top of them, [`DealLedger`] drives a deal through
//! `draft → pending_approval → fully_approved → settled` and produces a
//! [`SettlementStatement`] per settled deal. [`RetryPolicy`] wraps the
//! caller's persistence of that statement.
//!
//! Reporting helpers live in [`stats`] and [`commission`].

pub mod commission;
pub mod invoice;
pub mod ledger;
pub mod money;
pub mod retry;
pub mod split;
pub mod statement;
pub mod stats;
pub mod validation;

pub use commission::{
    ManagerEarningsSummary, calculate_commission, calculate_manager_earnings,
    total_manager_earnings,
};
pub use invoice::calculate_invoice_direction;
pub use ledger::DealLedger;
pub use retry::RetryPolicy;
pub use split::{calculate_split_amount, generate_split_description};
pub use statement::{SettlementLine, SettlementStatement};
pub use stats::{DealStats, ParticipantStats};
pub use validation::{
    DealIssue, ValidationReport, validate_deal_for_settlement, validate_deal_for_submission,
    validate_participant_split,
};
