use serde::{Deserialize, Serialize};

use super::Cents;

/// Share of the rental price kept by the platform, in percent.
pub const COMMISSION_PERCENT: Cents = 30;

/// Flat roadside-assistance fee per rented day.
pub const ASSISTANCE_FEE_PER_DAY: Cents = 100;

/// How the commission pool is split between the insurer, roadside assistance
/// and the platform.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Commission {
    pub insurance_fee: Cents,
    pub assistance_fee: Cents,
    /// Residual kept by the platform. Negative when the assistance fee
    /// exceeds what is left of the pool.
    pub drivy_fee: Cents,
}

impl Commission {
    /// Split the commission pool of a rental.
    pub fn split(price: Cents, nb_days: i64) -> Self {
        let pool = commission_pool(price);
        let insurance_fee = pool / 2;
        let assistance_fee = ASSISTANCE_FEE_PER_DAY * nb_days;

        Self {
            insurance_fee,
            assistance_fee,
            drivy_fee: pool - insurance_fee - assistance_fee,
        }
    }

    /// Sum of the three fees, equal to the pool they were split from.
    pub fn total(&self) -> Cents {
        self.insurance_fee + self.assistance_fee + self.drivy_fee
    }
}

/// Gross commission taken on a price, truncated to cents.
pub fn commission_pool(price: Cents) -> Cents {
    // never larger than the price itself, so the narrowing cast is lossless
    (i128::from(price) * i128::from(COMMISSION_PERCENT) / 100) as Cents
}
