use thiserror::Error;

use crate::domain::{BillingError, ModificationId, RentalId};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AppError {
    #[error("Rental not found: {0}")]
    RentalNotFound(RentalId),

    #[error("Modification {modification_id} targets unknown rental {rental_id}")]
    ModificationTargetNotFound {
        modification_id: ModificationId,
        rental_id: RentalId,
    },

    #[error(transparent)]
    Billing(#[from] BillingError),
}
