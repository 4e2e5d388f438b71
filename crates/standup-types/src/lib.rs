//! # standup-types
//!
//! Shared types, errors, and configuration for Stand Up Sydney deal
//! settlement.
//!
//! This crate is the leaf dependency of the workspace. It defines:
//!
//! - **Identifiers**: [`DealId`], [`ParticipantId`], [`UserId`], [`EventId`], [`InvoiceId`]
//! - **Deal model**: [`EventDeal`], [`DealEvent`], [`DealStatus`], [`DealType`]
//! - **Participant model**: [`DealParticipant`], [`SplitTerms`], [`ApprovalStatus`], [`ParticipantType`]
//! - **Invoice model**: [`InvoiceInstruction`], [`InvoiceDirection`]
//! - **Commission model**: [`ManagerCommission`], [`ManagerEarnings`]
//! - **Configuration**: [`SettlementConfig`], [`RetryConfig`]
//! - **Errors**: [`DealError`] with `DEAL_ERR_` prefix codes
//! - **Constants**: defaults and limits

pub mod commission;
pub mod config;
pub mod constants;
pub mod deal;
pub mod error;
pub mod ids;
pub mod invoice;
pub mod participant;

pub use commission::*;
pub use config::*;
pub use deal::*;
pub use error::*;
pub use ids::*;
pub use invoice::*;
pub use participant::*;

// Constants are accessed via `standup_types::constants::FOO`
// (not re-exported to avoid name collisions).
