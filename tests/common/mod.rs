// Allow dead_code because these helpers are used across different test files
// which are compiled separately
#![allow(dead_code)]

use std::path::PathBuf;

use anyhow::Result;
use carshare_ledger::application::BillingService;
use carshare_ledger::domain::{Action, ActionType, Actor, Car, Cents, Rental, RentalModification};
use carshare_ledger::storage::Dataset;
use chrono::NaiveDate;
use tempfile::TempDir;

/// Helper to parse a date string into a NaiveDate
pub fn date(date_str: &str) -> NaiveDate {
    NaiveDate::parse_from_str(date_str, "%Y-%m-%d").unwrap()
}

/// Test fixture: one car, three rentals of increasing length and two
/// modifications (one extends rental 1, one shortens rental 3).
pub struct StandardFleet;

impl StandardFleet {
    pub fn car() -> Car {
        Car::new(1, 2000, 10)
    }

    pub fn rentals() -> Vec<Rental> {
        vec![
            Rental::new(1, 1, date("2015-12-08"), date("2015-12-08"), 100)
                .with_deductible_reduction(true),
            Rental::new(2, 1, date("2015-03-31"), date("2015-04-01"), 300),
            Rental::new(3, 1, date("2015-07-03"), date("2015-07-14"), 1000)
                .with_deductible_reduction(true),
        ]
    }

    pub fn modifications() -> Vec<RentalModification> {
        vec![
            RentalModification::new(1, 1)
                .with_end_date(date("2015-12-10"))
                .with_distance(150),
            RentalModification::new(2, 3).with_start_date(date("2015-07-04")),
        ]
    }

    pub fn dataset() -> Dataset {
        Dataset {
            cars: vec![Self::car()],
            rentals: Self::rentals(),
            rental_modifications: Self::modifications(),
        }
    }

    pub fn service() -> BillingService {
        BillingService::from_dataset(Self::dataset())
    }
}

/// Build a ledger from (type, amount) pairs in actor order.
pub fn ledger(entries: [(ActionType, Cents); 5]) -> Vec<Action> {
    Actor::ALL
        .into_iter()
        .zip(entries)
        .map(|(who, (kind, amount))| Action { who, kind, amount })
        .collect()
}

/// Write a dataset as JSON into a temporary directory
pub fn write_dataset(dataset: &Dataset) -> Result<(PathBuf, TempDir)> {
    let temp_dir = TempDir::new()?;
    let path = temp_dir.path().join("data.json");
    std::fs::write(&path, serde_json::to_string_pretty(dataset)?)?;
    Ok((path, temp_dir))
}
