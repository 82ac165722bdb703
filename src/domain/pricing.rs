use super::money::{CENT_FRACTIONS, CentFractions};
use super::{Cents, Kilometers};

/// A day-based discount: every day strictly above `threshold` is billed
/// `discount_percent` off the daily rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiscountTier {
    pub threshold: i64,
    pub discount_percent: i64,
}

impl DiscountTier {
    pub const fn new(threshold: i64, discount_percent: i64) -> Self {
        Self {
            threshold,
            discount_percent,
        }
    }

    /// Charge for the days between this tier's threshold and `days`.
    fn charge(&self, days: i64, price_per_day: Cents) -> Option<CentFractions> {
        CentFractions::from(100 - self.discount_percent)
            .checked_mul(CentFractions::from(days - self.threshold))?
            .checked_mul(CentFractions::from(price_per_day))?
            .checked_mul(CENT_FRACTIONS)
            .map(|charge| charge / 100)
    }
}

/// Discount schedule, highest threshold first.
pub const DISCOUNT_TIERS: [DiscountTier; 3] = [
    DiscountTier::new(10, 50),
    DiscountTier::new(4, 30),
    DiscountTier::new(1, 10),
];

/// Largest price a rental ledger may carry. Options and the difference
/// between two ledgers must still fit in [`Cents`].
pub const MAX_RENTAL_PRICE: Cents = Cents::MAX / 4;

/// Apply the discount tiers to a number of days.
/// Returns the discounted charge and the days left to bill at full price,
/// or `None` if the charge overflows.
fn tiered_day_charge(nb_days: i64, price_per_day: Cents) -> Option<(CentFractions, i64)> {
    DISCOUNT_TIERS
        .iter()
        .try_fold((0 as CentFractions, nb_days), |(charge, days), tier| {
            if days > tier.threshold {
                let tier_charge = tier.charge(days, price_per_day)?;
                Some((charge.checked_add(tier_charge)?, tier.threshold))
            } else {
                Some((charge, days))
            }
        })
}

/// Price of a rental in cents.
///
/// The distance charge is never discounted. Days go through [`DISCOUNT_TIERS`]
/// and whatever is left is billed at the full daily rate. Fractions of a cent
/// are kept until the end and then truncated.
///
/// Returns `None` when the price does not fit within [`MAX_RENTAL_PRICE`].
pub fn rental_price(
    nb_days: i64,
    price_per_day: Cents,
    price_per_km: Cents,
    nb_kms: Kilometers,
) -> Option<Cents> {
    let distance_charge = CentFractions::from(nb_kms)
        .checked_mul(CentFractions::from(price_per_km))?
        .checked_mul(CENT_FRACTIONS)?;
    let (discounted_charge, full_price_days) = tiered_day_charge(nb_days, price_per_day)?;
    let full_price_charge = CentFractions::from(full_price_days)
        .checked_mul(CentFractions::from(price_per_day))?
        .checked_mul(CENT_FRACTIONS)?;

    let total = distance_charge
        .checked_add(discounted_charge)?
        .checked_add(full_price_charge)?
        / CENT_FRACTIONS;
    Cents::try_from(total)
        .ok()
        .filter(|price| price.abs() <= MAX_RENTAL_PRICE)
}
