use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::domain::{Car, CarId, CarLookup, Rental, RentalId, RentalModification};

/// Input document: the cars, the rentals and their later modifications.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Dataset {
    pub cars: Vec<Car>,
    pub rentals: Vec<Rental>,
    #[serde(default)]
    pub rental_modifications: Vec<RentalModification>,
}

/// In-memory lookups over a dataset.
///
/// Cars and rentals are keyed by id. Rentals and modifications also keep the
/// order they were given in, which is the order outputs are produced in.
/// When an id appears twice the last record wins.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    cars: HashMap<CarId, Car>,
    rentals: Vec<Rental>,
    rental_index: HashMap<RentalId, usize>,
    modifications: Vec<RentalModification>,
}

impl Catalog {
    pub fn from_dataset(dataset: Dataset) -> Self {
        let mut cars = HashMap::with_capacity(dataset.cars.len());
        for car in dataset.cars {
            if cars.insert(car.id, car).is_some() {
                warn!(car_id = car.id, "duplicate car id, keeping the last one");
            }
        }

        let mut rentals: Vec<Rental> = Vec::with_capacity(dataset.rentals.len());
        let mut rental_index = HashMap::with_capacity(dataset.rentals.len());
        for rental in dataset.rentals {
            match rental_index.get(&rental.id).copied() {
                Some(position) => {
                    warn!(rental_id = rental.id, "duplicate rental id, keeping the last one");
                    rentals[position] = rental;
                }
                None => {
                    rental_index.insert(rental.id, rentals.len());
                    rentals.push(rental);
                }
            }
        }

        Self {
            cars,
            rentals,
            rental_index,
            modifications: dataset.rental_modifications,
        }
    }

    pub fn car(&self, id: CarId) -> Option<&Car> {
        self.cars.get(&id)
    }

    pub fn rental(&self, id: RentalId) -> Option<&Rental> {
        self.rental_index
            .get(&id)
            .and_then(|&position| self.rentals.get(position))
    }

    /// Rentals in input order.
    pub fn rentals(&self) -> &[Rental] {
        &self.rentals
    }

    /// Modifications in input order.
    pub fn modifications(&self) -> &[RentalModification] {
        &self.modifications
    }

    pub fn car_count(&self) -> usize {
        self.cars.len()
    }
}

impl CarLookup for Catalog {
    fn car(&self, id: CarId) -> Option<&Car> {
        Catalog::car(self, id)
    }
}
