//! Error types for deal settlement.
//!
//! All errors use the `DEAL_ERR_` prefix so they are easy to grep in logs.
//! Codes are grouped by subsystem:
//! - 1xx: Deal lifecycle errors
//! - 2xx: Participant errors
//! - 3xx: Settlement errors
//! - 9xx: General / internal errors
//!
//! Pure calculations never return these; validation failures are reported
//! as data and only become an error when a lifecycle operation is refused.

use thiserror::Error;

use crate::{DealId, DealStatus, ParticipantId, UserId};

/// Central error enum for deal operations.
#[derive(Debug, Error)]
pub enum DealError {
    // =================================================================
    // Deal Errors (1xx)
    // =================================================================
    /// The requested deal is unknown.
    #[error("DEAL_ERR_100: Deal not found: {0}")]
    DealNotFound(DealId),

    /// A deal with this ID is already tracked.
    #[error("DEAL_ERR_101: Deal already exists: {0}")]
    DuplicateDeal(DealId),

    /// The requested status change is not part of the deal lifecycle.
    #[error("DEAL_ERR_102: Invalid deal transition: {from} -> {to}")]
    InvalidTransition { from: DealStatus, to: DealStatus },

    /// The deal failed submission checks.
    #[error("DEAL_ERR_103: Deal cannot be submitted: {}", reasons.join("; "))]
    SubmissionRejected { reasons: Vec<String> },

    /// The deal can no longer be edited in its current status.
    #[error("DEAL_ERR_104: Deal is locked in status {0}")]
    DealLocked(DealStatus),

    // =================================================================
    // Participant Errors (2xx)
    // =================================================================
    /// The participant row is not part of the deal.
    #[error("DEAL_ERR_200: Participant not found: {0}")]
    ParticipantNotFound(ParticipantId),

    /// Only the participant's own user may approve, decline or edit.
    #[error("DEAL_ERR_201: User {user} may not act for participant {participant}")]
    NotParticipant {
        participant: ParticipantId,
        user: UserId,
    },

    /// The split terms failed validation.
    #[error("DEAL_ERR_202: Invalid split terms: {}", reasons.join("; "))]
    InvalidSplit { reasons: Vec<String> },

    // =================================================================
    // Settlement Errors (3xx)
    // =================================================================
    /// The deal failed settlement checks.
    #[error("DEAL_ERR_300: Deal cannot be settled: {}", reasons.join("; "))]
    SettlementRejected { reasons: Vec<String> },

    /// The deal has already been settled.
    #[error("DEAL_ERR_301: Deal already settled: {0}")]
    AlreadySettled(DealId),

    // =================================================================
    // General / Internal (9xx)
    // =================================================================
    /// Unrecoverable internal error.
    #[error("DEAL_ERR_900: Internal error: {0}")]
    Internal(String),

    /// Serialization / deserialization error.
    #[error("DEAL_ERR_901: Serialization error: {0}")]
    Serialization(String),

    /// Configuration error (invalid config file, missing fields, etc.).
    #[error("DEAL_ERR_902: Configuration error: {0}")]
    Configuration(String),

    /// I/O error (disk, network).
    #[error("DEAL_ERR_903: I/O error: {0}")]
    Io(String),

    /// The backing store rejected or dropped a request.
    #[error("DEAL_ERR_904: Persistence error: {0}")]
    Persistence(String),
}

impl DealError {
    /// Whether retrying the same call may succeed.
    ///
    /// Only failures of the surrounding infrastructure qualify; a rejected
    /// deal stays rejected no matter how often it is resubmitted.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Io(_) | Self::Persistence(_))
    }
}

/// Crate-wide `Result` alias.
pub type Result<T> = std::result::Result<T, DealError>;

impl From<std::io::Error> for DealError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for DealError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}
