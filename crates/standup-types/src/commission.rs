//! Manager commission on comedian earnings.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{DealId, ParticipantId, UserId};

/// A manager's commission arrangement with one comedian.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManagerCommission {
    pub manager_id: UserId,
    pub comedian_id: UserId,
    /// Percentage of the comedian's deal earnings, e.g. `15` for 15%.
    pub commission_percentage: Decimal,
    /// Ended arrangements are kept for history but earn nothing.
    pub is_active: bool,
}

/// Commission a manager earns from one comedian's share of one deal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManagerEarnings {
    pub deal_id: DealId,
    /// The comedian's participant row.
    pub participant_id: ParticipantId,
    pub comedian_id: UserId,
    /// The comedian's settled share.
    pub calculated_amount: Decimal,
    pub commission_percentage: Decimal,
    /// Commission rounded to cents.
    pub commission_amount: Decimal,
}
