use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{BillingError, CarId};

pub type RentalId = i64;
pub type ModificationId = i64;

/// Distance driven during a rental, in kilometers.
pub type Kilometers = i64;

/// A booking of one car over an inclusive range of calendar days.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rental {
    pub id: RentalId,
    pub car_id: CarId,
    /// First billed day
    pub start_date: NaiveDate,
    /// Last billed day
    pub end_date: NaiveDate,
    pub distance: Kilometers,
    /// Whether the driver opted in for a reduced deductible
    #[serde(default)]
    pub deductible_reduction: bool,
}

impl Rental {
    pub fn new(
        id: RentalId,
        car_id: CarId,
        start_date: NaiveDate,
        end_date: NaiveDate,
        distance: Kilometers,
    ) -> Self {
        Self {
            id,
            car_id,
            start_date,
            end_date,
            distance,
            deductible_reduction: false,
        }
    }

    pub fn with_deductible_reduction(mut self, deductible_reduction: bool) -> Self {
        self.deductible_reduction = deductible_reduction;
        self
    }

    /// Number of billed days. Both the start and the end day are billed.
    pub fn billable_days(&self) -> Result<i64, BillingError> {
        let days = (self.end_date - self.start_date).num_days() + 1;
        if days < 1 {
            return Err(BillingError::MalformedDateRange {
                rental_id: self.id,
                start_date: self.start_date,
                end_date: self.end_date,
            });
        }
        Ok(days)
    }
}

/// A later amendment of a rental. Only the fields that are set override the
/// original; everything else is kept.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RentalModification {
    pub id: ModificationId,
    pub rental_id: RentalId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance: Option<Kilometers>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deductible_reduction: Option<bool>,
}

impl RentalModification {
    pub fn new(id: ModificationId, rental_id: RentalId) -> Self {
        Self {
            id,
            rental_id,
            ..Self::default()
        }
    }

    pub fn with_start_date(mut self, start_date: NaiveDate) -> Self {
        self.start_date = Some(start_date);
        self
    }

    pub fn with_end_date(mut self, end_date: NaiveDate) -> Self {
        self.end_date = Some(end_date);
        self
    }

    pub fn with_distance(mut self, distance: Kilometers) -> Self {
        self.distance = Some(distance);
        self
    }

    pub fn with_deductible_reduction(mut self, deductible_reduction: bool) -> Self {
        self.deductible_reduction = Some(deductible_reduction);
        self
    }

    /// True when the modification overrides no field at all.
    pub fn is_empty(&self) -> bool {
        self.start_date.is_none()
            && self.end_date.is_none()
            && self.distance.is_none()
            && self.deductible_reduction.is_none()
    }

    /// Build the amended rental. The original keeps its id and car.
    pub fn apply(&self, original: &Rental) -> Rental {
        Rental {
            id: original.id,
            car_id: original.car_id,
            start_date: self.start_date.unwrap_or(original.start_date),
            end_date: self.end_date.unwrap_or(original.end_date),
            distance: self.distance.unwrap_or(original.distance),
            deductible_reduction: self
                .deductible_reduction
                .unwrap_or(original.deductible_reduction),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn sample_rental() -> Rental {
        Rental::new(1, 1, date("2015-12-08"), date("2015-12-08"), 100)
            .with_deductible_reduction(true)
    }

    #[test]
    fn test_single_day_is_billed_once() {
        assert_eq!(sample_rental().billable_days(), Ok(1));
    }

    #[test]
    fn test_both_boundaries_are_billed() {
        let rental = Rental::new(2, 1, date("2015-03-31"), date("2015-04-01"), 300);
        assert_eq!(rental.billable_days(), Ok(2));

        let rental = Rental::new(3, 1, date("2015-07-03"), date("2015-07-14"), 1000);
        assert_eq!(rental.billable_days(), Ok(12));
    }

    #[test]
    fn test_end_before_start_is_rejected() {
        let rental = Rental::new(4, 1, date("2015-07-14"), date("2015-07-13"), 0);
        assert!(matches!(
            rental.billable_days(),
            Err(BillingError::MalformedDateRange { rental_id: 4, .. })
        ));
    }

    #[test]
    fn test_apply_overrides_only_present_fields() {
        let original = sample_rental();
        let modification = RentalModification::new(1, 1)
            .with_end_date(date("2015-12-10"))
            .with_distance(150);

        let amended = modification.apply(&original);

        assert_eq!(amended.id, original.id);
        assert_eq!(amended.car_id, original.car_id);
        assert_eq!(amended.start_date, original.start_date);
        assert_eq!(amended.end_date, date("2015-12-10"));
        assert_eq!(amended.distance, 150);
        assert!(amended.deductible_reduction);
        // original is untouched
        assert_eq!(original.end_date, date("2015-12-08"));
    }

    #[test]
    fn test_empty_modification_keeps_rental() {
        let original = sample_rental();
        let modification = RentalModification::new(9, 1);

        assert!(modification.is_empty());
        assert_eq!(modification.apply(&original), original);
    }

    #[test]
    fn test_modification_deserializes_partial_fields() {
        let json = r#"{"id": 2, "rental_id": 3, "start_date": "2015-07-04"}"#;
        let modification: RentalModification = serde_json::from_str(json).unwrap();

        assert_eq!(modification.start_date, Some(date("2015-07-04")));
        assert_eq!(modification.end_date, None);
        assert_eq!(modification.distance, None);
        assert_eq!(modification.deductible_reduction, None);
    }

    #[test]
    fn test_rental_defaults_deductible_option_to_false() {
        let json = r#"{"id": 1, "car_id": 1, "start_date": "2017-12-08", "end_date": "2017-12-10", "distance": 100}"#;
        let rental: Rental = serde_json::from_str(json).unwrap();

        assert!(!rental.deductible_reduction);
        assert_eq!(rental.billable_days(), Ok(3));
    }
}
