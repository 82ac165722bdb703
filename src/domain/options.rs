use serde::{Deserialize, Serialize};

use super::Cents;

/// Daily fee for the reduced-deductible option, paid in full to the platform.
pub const DEDUCTIBLE_REDUCTION_PER_DAY: Cents = 400;

/// Add-ons billed to the driver on top of the rental price.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Options {
    pub deductible_reduction: Cents,
}

impl Options {
    pub fn price(nb_days: i64, deductible_option: bool) -> Self {
        let deductible_reduction = if deductible_option {
            nb_days * DEDUCTIBLE_REDUCTION_PER_DAY
        } else {
            0
        };

        Self {
            deductible_reduction,
        }
    }

    pub fn total(&self) -> Cents {
        self.deductible_reduction
    }
}
