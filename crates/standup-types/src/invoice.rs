//! Invoice instructions derived at settlement.
//!
//! Settlement does not persist invoices; it only decides whether one is
//! needed and who bills whom. The caller issues it.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Who invoices whom.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvoiceDirection {
    /// The participant owes the promoter.
    ParticipantToPromoter,
    /// The promoter owes the participant.
    PromoterToParticipant,
}

impl fmt::Display for InvoiceDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ParticipantToPromoter => write!(f, "participant_to_promoter"),
            Self::PromoterToParticipant => write!(f, "promoter_to_participant"),
        }
    }
}

/// Outcome of resolving a participant's net position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum InvoiceInstruction {
    /// The position is exactly balanced.
    NotNeeded,
    /// Issue an invoice for `absolute_amount` in `direction`.
    Generate {
        direction: InvoiceDirection,
        absolute_amount: Decimal,
    },
}

impl InvoiceInstruction {
    #[must_use]
    pub fn should_generate(&self) -> bool {
        matches!(self, Self::Generate { .. })
    }

    #[must_use]
    pub fn direction(&self) -> Option<InvoiceDirection> {
        match self {
            Self::Generate { direction, .. } => Some(*direction),
            Self::NotNeeded => None,
        }
    }

    /// Amount to invoice; zero when no invoice is needed.
    #[must_use]
    pub fn absolute_amount(&self) -> Decimal {
        match self {
            Self::Generate {
                absolute_amount, ..
            } => *absolute_amount,
            Self::NotNeeded => Decimal::ZERO,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accessors() {
        let generate = InvoiceInstruction::Generate {
            direction: InvoiceDirection::PromoterToParticipant,
            absolute_amount: Decimal::new(250, 0),
        };
        assert!(generate.should_generate());
        assert_eq!(
            generate.direction(),
            Some(InvoiceDirection::PromoterToParticipant)
        );
        assert_eq!(generate.absolute_amount(), Decimal::new(250, 0));

        let none = InvoiceInstruction::NotNeeded;
        assert!(!none.should_generate());
        assert_eq!(none.direction(), None);
        assert_eq!(none.absolute_amount(), Decimal::ZERO);
    }

    #[test]
    fn direction_display_matches_wire_names() {
        assert_eq!(
            format!("{}", InvoiceDirection::ParticipantToPromoter),
            "participant_to_promoter"
        );
        let json = serde_json::to_string(&InvoiceDirection::PromoterToParticipant).unwrap();
        assert_eq!(json, "\"promoter_to_participant\"");
    }
}
