//! Invoice direction from a participant's net position.

use rust_decimal::Decimal;
use standup_types::{InvoiceDirection, InvoiceInstruction};

/// Decide whether settling `amount` needs an invoice, and which way it runs.
///
/// `amount` is the participant's net position towards the promoter:
/// positive means the participant owes the promoter, negative the reverse,
/// and exactly zero needs no invoice. Amounts are fixed-point, so zero is an
/// exact boundary.
#[must_use]
pub fn calculate_invoice_direction(amount: Decimal) -> InvoiceInstruction {
    if amount.is_zero() {
        InvoiceInstruction::NotNeeded
    } else if amount.is_sign_positive() {
        InvoiceInstruction::Generate {
            direction: InvoiceDirection::ParticipantToPromoter,
            absolute_amount: amount,
        }
    } else {
        InvoiceInstruction::Generate {
            direction: InvoiceDirection::PromoterToParticipant,
            absolute_amount: amount.abs(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_needs_no_invoice() {
        assert_eq!(
            calculate_invoice_direction(Decimal::ZERO),
            InvoiceInstruction::NotNeeded
        );
        // -0.00 is still zero.
        assert!(!calculate_invoice_direction(-Decimal::new(0, 2)).should_generate());
    }

    #[test]
    fn positive_is_participant_to_promoter() {
        assert_eq!(
            calculate_invoice_direction(Decimal::new(1_999, 2)),
            InvoiceInstruction::Generate {
                direction: InvoiceDirection::ParticipantToPromoter,
                absolute_amount: Decimal::new(1_999, 2),
            }
        );
    }

    #[test]
    fn negative_is_promoter_to_participant() {
        assert_eq!(
            calculate_invoice_direction(Decimal::new(-250, 0)),
            InvoiceInstruction::Generate {
                direction: InvoiceDirection::PromoterToParticipant,
                absolute_amount: Decimal::new(250, 0),
            }
        );
    }

    #[test]
    fn absolute_amount_is_abs_of_input() {
        for cents in [-1_000_000_i64, -1, 1, 42, 7_777_777] {
            let amount = Decimal::new(cents, 2);
            let instruction = calculate_invoice_direction(amount);
            assert!(instruction.should_generate());
            assert_eq!(instruction.absolute_amount(), amount.abs());
        }
    }

    #[test]
    fn smallest_amounts_still_invoice() {
        let tiny = Decimal::new(1, 28);
        assert!(calculate_invoice_direction(tiny).should_generate());
        assert!(calculate_invoice_direction(-tiny).should_generate());
    }
}
