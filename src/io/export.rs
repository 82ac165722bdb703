use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::io::Write;

use crate::application::{ModificationActions, RentalActions, RentalPrice};
use crate::domain::Action;

/// Output document for rentals: `{"rentals": [...]}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RentalsDocument<T> {
    pub rentals: Vec<T>,
}

/// Output document for modifications: `{"rental_modifications": [...]}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModificationsDocument {
    pub rental_modifications: Vec<ModificationActions>,
}

/// Writes billing results as JSON documents or CSV action lines.
pub struct Exporter<W: Write> {
    writer: W,
}

impl<W: Write> Exporter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    pub fn prices_json(&mut self, prices: Vec<RentalPrice>) -> Result<usize> {
        let count = prices.len();
        self.write_json(&RentalsDocument { rentals: prices })?;
        Ok(count)
    }

    pub fn actions_json(&mut self, rentals: Vec<RentalActions>) -> Result<usize> {
        let count = rentals.len();
        self.write_json(&RentalsDocument { rentals })?;
        Ok(count)
    }

    pub fn modifications_json(&mut self, modifications: Vec<ModificationActions>) -> Result<usize> {
        let count = modifications.len();
        self.write_json(&ModificationsDocument {
            rental_modifications: modifications,
        })?;
        Ok(count)
    }

    /// One line per action: rental_id, who, type, amount
    pub fn actions_csv(&mut self, rentals: &[RentalActions]) -> Result<usize> {
        let mut csv_writer = csv::Writer::from_writer(&mut self.writer);
        csv_writer.write_record(["rental_id", "who", "type", "amount"])?;

        let mut count = 0;
        for rental in rentals {
            for action in &rental.actions {
                let mut record = vec![rental.id.to_string()];
                record.extend(action_fields(action));
                csv_writer.write_record(&record)?;
                count += 1;
            }
        }

        csv_writer.flush()?;
        Ok(count)
    }

    /// One line per action: id, rental_id, who, type, amount
    pub fn modifications_csv(&mut self, modifications: &[ModificationActions]) -> Result<usize> {
        let mut csv_writer = csv::Writer::from_writer(&mut self.writer);
        csv_writer.write_record(["id", "rental_id", "who", "type", "amount"])?;

        let mut count = 0;
        for modification in modifications {
            for action in &modification.actions {
                let mut record = vec![modification.id.to_string(), modification.rental_id.to_string()];
                record.extend(action_fields(action));
                csv_writer.write_record(&record)?;
                count += 1;
            }
        }

        csv_writer.flush()?;
        Ok(count)
    }

    fn write_json<T: Serialize>(&mut self, document: &T) -> Result<()> {
        serde_json::to_writer_pretty(&mut self.writer, document)?;
        writeln!(self.writer)?;
        self.writer.flush()?;
        Ok(())
    }
}

fn action_fields(action: &Action) -> [String; 3] {
    [
        action.who.to_string(),
        action.kind.to_string(),
        action.amount.to_string(),
    ]
}
