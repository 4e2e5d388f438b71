//! Identifiers for deals, participants, users, events, and invoices.
//!
//! Row identifiers use UUIDv7 for time-ordered sorting. [`InvoiceId`] is
//! derived deterministically so that settling the same deal twice can never
//! mint two different invoice references for one participant.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ---------------------------------------------------------------------------
// DealId
// ---------------------------------------------------------------------------

/// Identifier of an `event_deals` row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DealId(pub Uuid);

impl DealId {
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }
}

impl Default for DealId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for DealId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "deal:{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// ParticipantId
// ---------------------------------------------------------------------------

/// Identifier of a `deal_participants` row.
///
/// Not to be confused with the participant's [`UserId`]: one user may hold
/// several rows across deals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParticipantId(pub Uuid);

impl ParticipantId {
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }
}

impl Default for ParticipantId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "participant:{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// UserId
// ---------------------------------------------------------------------------

/// A user profile (comedian, promoter, manager, venue contact...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub Uuid);

impl UserId {
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }
}

impl Default for UserId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// EventId
// ---------------------------------------------------------------------------

/// Identifier of the event a deal belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventId(pub Uuid);

impl EventId {
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }
}

impl Default for EventId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "event:{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// InvoiceId
// ---------------------------------------------------------------------------

/// Reference of an invoice generated by settlement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InvoiceId(pub Uuid);

impl InvoiceId {
    /// Deterministic `InvoiceId` for one participant row of one deal.
    ///
    /// The same (deal, participant row) pair always yields the same id, so
    /// a retried persistence call upserts instead of duplicating invoices.
    #[must_use]
    pub fn deterministic(deal_id: DealId, participant: ParticipantId) -> Self {
        use sha2::{Digest, Sha256};
        let mut hasher = Sha256::new();
        hasher.update(b"standup:invoice_id:v1:");
        hasher.update(deal_id.0.as_bytes());
        hasher.update(participant.0.as_bytes());
        let hash = hasher.finalize();
        let mut bytes = [0u8; 16];
        bytes.copy_from_slice(&hash[..16]);
        Self(Uuid::from_bytes(bytes))
    }

    /// Short human-facing reference, e.g. `INV-1a2b3c4d`.
    #[must_use]
    pub fn reference(&self) -> String {
        format!("INV-{}", hex::encode(&self.0.as_bytes()[..4]))
    }
}

impl fmt::Display for InvoiceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deal_id_uniqueness_and_ordering() {
        let a = DealId::new();
        let b = DealId::new();
        assert_ne!(a, b);
        assert!(a < b);
    }

    #[test]
    fn invoice_id_is_deterministic() {
        let deal = DealId::new();
        let row = ParticipantId::new();
        assert_eq!(
            InvoiceId::deterministic(deal, row),
            InvoiceId::deterministic(deal, row)
        );
        assert_ne!(
            InvoiceId::deterministic(deal, row),
            InvoiceId::deterministic(deal, ParticipantId::new())
        );
    }

    #[test]
    fn invoice_reference_format() {
        let id = InvoiceId::deterministic(DealId::new(), ParticipantId::new());
        let reference = id.reference();
        assert!(reference.starts_with("INV-"));
        assert_eq!(reference.len(), 12);
    }

    #[test]
    fn ids_serialize_as_plain_uuid_strings() {
        let user = UserId::new();
        let json = serde_json::to_string(&user).unwrap();
        assert_eq!(json, format!("\"{}\"", user.0));
        let back: UserId = serde_json::from_str(&json).unwrap();
        assert_eq!(user, back);
    }
}
