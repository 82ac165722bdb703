use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::Cents;

pub type CarId = i64;

/// A car available for rent, with the owner's rates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Car {
    pub id: CarId,
    /// Full-price rate for one rented day
    pub price_per_day: Cents,
    /// Rate per kilometer driven, never discounted
    pub price_per_km: Cents,
}

impl Car {
    pub fn new(id: CarId, price_per_day: Cents, price_per_km: Cents) -> Self {
        Self {
            id,
            price_per_day,
            price_per_km,
        }
    }
}

/// Read-only access to cars by id.
pub trait CarLookup {
    fn car(&self, id: CarId) -> Option<&Car>;
}

impl CarLookup for HashMap<CarId, Car> {
    fn car(&self, id: CarId) -> Option<&Car> {
        self.get(&id)
    }
}

impl CarLookup for [Car] {
    fn car(&self, id: CarId) -> Option<&Car> {
        self.iter().find(|car| car.id == id)
    }
}
