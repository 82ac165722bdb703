use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{
    build_actions, ledger_delta, rental_price, Action, Actor, CarId, CarLookup, Cents, Commission,
    Kilometers, Options, Rental, RentalId, RentalModification,
};

/// Everything computed when billing a rental.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RentalInfo {
    pub id: RentalId,
    pub nb_days: i64,
    pub price_per_day: Cents,
    pub price_per_km: Cents,
    pub nb_kms: Kilometers,
    pub deductible_option: bool,
    pub price: Cents,
    pub commission: Commission,
    pub options: Options,
    /// Ledger of the rental, one action per actor
    pub actions: Vec<Action>,
}

/// Bill a rental: price, commission split, options and ledger.
pub fn process_rental<L>(rental: &Rental, cars: &L) -> Result<RentalInfo, BillingError>
where
    L: CarLookup + ?Sized,
{
    let nb_days = rental.billable_days()?;
    let car = cars
        .car(rental.car_id)
        .ok_or(BillingError::UnknownCar {
            rental_id: rental.id,
            car_id: rental.car_id,
        })?;

    let price = rental_price(nb_days, car.price_per_day, car.price_per_km, rental.distance)
        .ok_or(BillingError::AmountOutOfRange {
            rental_id: rental.id,
        })?;
    let commission = Commission::split(price, nb_days);
    let options = Options::price(nb_days, rental.deductible_reduction);
    let actions = build_actions(price, &commission, &options);

    Ok(RentalInfo {
        id: rental.id,
        nb_days,
        price_per_day: car.price_per_day,
        price_per_km: car.price_per_km,
        nb_kms: rental.distance,
        deductible_option: rental.deductible_reduction,
        price,
        commission,
        options,
        actions,
    })
}

/// Bill a modification of an already billed rental.
///
/// The amended rental is billed from scratch and the result is the per-actor
/// difference with the original ledger.
pub fn process_modification<L>(
    original: &Rental,
    modification: &RentalModification,
    original_info: &RentalInfo,
    cars: &L,
) -> Result<Vec<Action>, BillingError>
where
    L: CarLookup + ?Sized,
{
    let amended = modification.apply(original);
    let amended_info = process_rental(&amended, cars)?;
    ledger_delta(&original_info.actions, &amended_info.actions)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BillingError {
    UnknownCar {
        rental_id: RentalId,
        car_id: CarId,
    },
    UnknownActor(Actor),
    MalformedDateRange {
        rental_id: RentalId,
        start_date: NaiveDate,
        end_date: NaiveDate,
    },
    /// The price does not fit in a ledger
    AmountOutOfRange {
        rental_id: RentalId,
    },
}

impl std::fmt::Display for BillingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BillingError::UnknownCar { rental_id, car_id } => {
                write!(f, "Rental {} references unknown car {}", rental_id, car_id)
            }
            BillingError::UnknownActor(actor) => {
                write!(f, "Ledger has no action for {}", actor)
            }
            BillingError::MalformedDateRange {
                rental_id,
                start_date,
                end_date,
            } => {
                write!(
                    f,
                    "Rental {} ends on {} before it starts on {}",
                    rental_id, end_date, start_date
                )
            }
            BillingError::AmountOutOfRange { rental_id } => {
                write!(f, "Rental {} is priced beyond the supported range", rental_id)
            }
        }
    }
}

impl std::error::Error for BillingError {}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::domain::{net_balance, Car};

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn cars() -> HashMap<CarId, Car> {
        HashMap::from([(1, Car::new(1, 2000, 10))])
    }

    #[test]
    fn test_one_day_without_distance() {
        let rental = Rental::new(1, 1, date("2017-12-08"), date("2017-12-08"), 0);
        let info = process_rental(&rental, &cars()).unwrap();

        assert_eq!(info.nb_days, 1);
        assert_eq!(info.price, 2000);
        assert_eq!(
            info.actions,
            vec![
                Action::debit(Actor::Driver, 2000),
                Action::credit(Actor::Owner, 1400),
                Action::credit(Actor::Insurance, 300),
                Action::credit(Actor::Assistance, 100),
                Action::credit(Actor::Drivy, 200),
            ]
        );
    }

    #[test]
    fn test_rental_info_carries_inputs() {
        let rental = Rental::new(3, 1, date("2015-07-03"), date("2015-07-14"), 1000)
            .with_deductible_reduction(true);
        let info = process_rental(&rental, &cars()).unwrap();

        assert_eq!(info.id, 3);
        assert_eq!(info.nb_days, 12);
        assert_eq!(info.price_per_day, 2000);
        assert_eq!(info.price_per_km, 10);
        assert_eq!(info.nb_kms, 1000);
        assert!(info.deductible_option);
        assert_eq!(info.price, 27800);
        assert_eq!(info.options.deductible_reduction, 4800);
        assert_eq!(net_balance(&info.actions), 0);
    }

    #[test]
    fn test_processing_is_repeatable() {
        let rental = Rental::new(2, 1, date("2015-03-31"), date("2015-04-01"), 300);
        assert_eq!(
            process_rental(&rental, &cars()),
            process_rental(&rental, &cars())
        );
    }

    #[test]
    fn test_unknown_car() {
        let rental = Rental::new(5, 42, date("2015-03-31"), date("2015-04-01"), 300);
        assert_eq!(
            process_rental(&rental, &cars()),
            Err(BillingError::UnknownCar {
                rental_id: 5,
                car_id: 42
            })
        );
    }

    #[test]
    fn test_malformed_range_is_reported_before_car_lookup() {
        let rental = Rental::new(6, 42, date("2015-04-02"), date("2015-04-01"), 0);
        assert!(matches!(
            process_rental(&rental, &cars()),
            Err(BillingError::MalformedDateRange { rental_id: 6, .. })
        ));
    }

    #[test]
    fn test_very_long_distance_is_billed() {
        let cars = HashMap::from([(1, Car::new(1, 2000, 10_000))]);
        let day = date("2015-12-08");
        let rental = Rental::new(1, 1, day, day, 100_000_000_000_000);

        let info = process_rental(&rental, &cars).unwrap();

        assert_eq!(info.price, 1_000_000_000_000_002_000);
        assert_eq!(info.commission.total(), 300_000_000_000_000_600);
        assert_eq!(net_balance(&info.actions), 0);
    }

    #[test]
    fn test_price_out_of_range() {
        let cars = HashMap::from([(1, Car::new(1, 2000, 10_000))]);
        let day = date("2015-12-08");
        let rental = Rental::new(9, 1, day, day, 10_000_000_000_000_000);

        assert_eq!(
            process_rental(&rental, &cars),
            Err(BillingError::AmountOutOfRange { rental_id: 9 })
        );
    }

    #[test]
    fn test_modification_out_of_range() {
        let rental = Rental::new(2, 1, date("2015-03-31"), date("2015-04-01"), 300);
        let info = process_rental(&rental, &cars()).unwrap();
        let modification = RentalModification::new(4, 2).with_distance(Kilometers::MAX);

        assert_eq!(
            process_modification(&rental, &modification, &info, &cars()),
            Err(BillingError::AmountOutOfRange { rental_id: 2 })
        );
    }

    #[test]
    fn test_modification_extending_rental() {
        let rental = Rental::new(1, 1, date("2015-12-08"), date("2015-12-08"), 100)
            .with_deductible_reduction(true);
        let info = process_rental(&rental, &cars()).unwrap();
        let modification = RentalModification::new(1, 1)
            .with_end_date(date("2015-12-10"))
            .with_distance(150);

        let delta = process_modification(&rental, &modification, &info, &cars()).unwrap();

        assert_eq!(
            delta,
            vec![
                Action::debit(Actor::Driver, 4900),
                Action::credit(Actor::Owner, 2870),
                Action::credit(Actor::Insurance, 615),
                Action::credit(Actor::Assistance, 200),
                Action::credit(Actor::Drivy, 1215),
            ]
        );
    }

    #[test]
    fn test_empty_modification_yields_zero_deltas() {
        let rental = Rental::new(2, 1, date("2015-03-31"), date("2015-04-01"), 300);
        let info = process_rental(&rental, &cars()).unwrap();

        let delta =
            process_modification(&rental, &RentalModification::new(7, 2), &info, &cars()).unwrap();

        assert_eq!(delta.len(), 5);
        assert!(delta.iter().all(|action| action.amount == 0));
    }

    #[test]
    fn test_modification_into_malformed_range_fails() {
        let rental = Rental::new(2, 1, date("2015-03-31"), date("2015-04-01"), 300);
        let info = process_rental(&rental, &cars()).unwrap();
        let modification = RentalModification::new(3, 2).with_start_date(date("2015-04-05"));

        assert!(matches!(
            process_modification(&rental, &modification, &info, &cars()),
            Err(BillingError::MalformedDateRange { .. })
        ));
    }

    #[test]
    fn test_corrupted_original_ledger_fails() {
        let rental = Rental::new(2, 1, date("2015-03-31"), date("2015-04-01"), 300);
        let mut info = process_rental(&rental, &cars()).unwrap();
        info.actions.retain(|action| action.who != Actor::Assistance);

        let result = process_modification(&rental, &RentalModification::new(1, 2), &info, &cars());
        assert_eq!(result, Err(BillingError::UnknownActor(Actor::Assistance)));
    }
}
