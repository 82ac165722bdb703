use serde::{Deserialize, Serialize};

use crate::domain::{Action, Cents, Commission, ModificationId, Options, RentalId, RentalInfo};

/// Price of a rental, optionally with its breakdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RentalPrice {
    pub id: RentalId,
    pub price: Cents,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commission: Option<Commission>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Options>,
}

impl RentalPrice {
    pub fn from_info(info: &RentalInfo, detailed: bool) -> Self {
        Self {
            id: info.id,
            price: info.price,
            commission: detailed.then_some(info.commission),
            options: detailed.then_some(info.options),
        }
    }
}

/// Ledger of a billed rental.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RentalActions {
    pub id: RentalId,
    pub actions: Vec<Action>,
}

impl From<&RentalInfo> for RentalActions {
    fn from(info: &RentalInfo) -> Self {
        Self {
            id: info.id,
            actions: info.actions.clone(),
        }
    }
}

/// What a modification adds to the ledger of its rental.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModificationActions {
    pub id: ModificationId,
    pub rental_id: RentalId,
    pub actions: Vec<Action>,
}

/// Balance check of one rental ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerBalance {
    pub rental_id: RentalId,
    pub price: Cents,
    pub net_balance: Cents,
    pub drivy_fee: Cents,
}

impl LedgerBalance {
    pub fn is_balanced(&self) -> bool {
        self.net_balance == 0
    }
}

/// Result of checking every rental ledger of a dataset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerReport {
    pub ledgers: Vec<LedgerBalance>,
    /// Rentals that could not be billed at all
    pub issues: Vec<String>,
}

impl LedgerReport {
    pub fn unbalanced(&self) -> impl Iterator<Item = &LedgerBalance> {
        self.ledgers.iter().filter(|ledger| !ledger.is_balanced())
    }

    /// Rentals whose commission pool does not cover the assistance fee.
    pub fn negative_drivy_fees(&self) -> impl Iterator<Item = &LedgerBalance> {
        self.ledgers.iter().filter(|ledger| ledger.drivy_fee < 0)
    }

    pub fn is_healthy(&self) -> bool {
        self.issues.is_empty() && self.unbalanced().next().is_none()
    }
}
