use std::collections::HashMap;

use tracing::{debug, info, warn};

use crate::domain::{
    net_balance, process_modification, process_rental, RentalId, RentalInfo,
    RentalModification,
};
use crate::storage::{Catalog, Dataset};

use super::{AppError, LedgerBalance, LedgerReport, ModificationActions};

/// Billing operations over a loaded dataset.
/// This is the interface used by the CLI and by anything else embedding the crate.
pub struct BillingService {
    catalog: Catalog,
}

/// A record that could not be billed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchFailure {
    /// Id of the rental or modification
    pub record_id: i64,
    pub error: AppError,
}

/// Outcome of billing every record of a kind. One failing record does not
/// prevent the others from being billed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchResult<T> {
    pub outputs: Vec<T>,
    pub failures: Vec<BatchFailure>,
}

impl<T> BatchResult<T> {
    fn new() -> Self {
        Self {
            outputs: Vec::new(),
            failures: Vec::new(),
        }
    }

    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    /// All outputs, or the first failure.
    pub fn into_result(self) -> Result<Vec<T>, AppError> {
        match self.failures.into_iter().next() {
            Some(failure) => Err(failure.error),
            None => Ok(self.outputs),
        }
    }

    fn push(&mut self, record_id: i64, result: Result<T, AppError>) {
        match result {
            Ok(output) => self.outputs.push(output),
            Err(err) => {
                warn!(record_id, error = %err, "record could not be billed");
                self.failures.push(BatchFailure {
                    record_id,
                    error: err,
                });
            }
        }
    }
}

impl BillingService {
    pub fn new(catalog: Catalog) -> Self {
        Self { catalog }
    }

    pub fn from_dataset(dataset: Dataset) -> Self {
        Self::new(Catalog::from_dataset(dataset))
    }

    // ========================
    // Rentals
    // ========================

    /// Bill a single rental by id.
    pub fn rental_info(&self, rental_id: RentalId) -> Result<RentalInfo, AppError> {
        let rental = self
            .catalog
            .rental(rental_id)
            .ok_or(AppError::RentalNotFound(rental_id))?;

        let info = process_rental(rental, &self.catalog)?;
        debug!(
            rental_id,
            nb_days = info.nb_days,
            price = info.price,
            "rental billed"
        );
        if info.commission.drivy_fee < 0 {
            warn!(
                rental_id,
                drivy_fee = info.commission.drivy_fee,
                "commission pool does not cover the assistance fee"
            );
        }
        Ok(info)
    }

    /// Bill every rental, in input order.
    pub fn process_rentals(&self) -> BatchResult<RentalInfo> {
        let mut batch = BatchResult::new();
        for rental in self.catalog.rentals() {
            batch.push(rental.id, self.rental_info(rental.id));
        }

        info!(
            billed = batch.outputs.len(),
            failed = batch.failures.len(),
            cars = self.catalog.car_count(),
            "rentals processed"
        );
        batch
    }

    // ========================
    // Modifications
    // ========================

    /// Bill a single modification against an already billed original.
    pub fn modification_actions(
        &self,
        modification: &RentalModification,
        original_info: &RentalInfo,
    ) -> Result<ModificationActions, AppError> {
        let original = self.catalog.rental(modification.rental_id).ok_or(
            AppError::ModificationTargetNotFound {
                modification_id: modification.id,
                rental_id: modification.rental_id,
            },
        )?;

        if modification.is_empty() {
            debug!(modification_id = modification.id, "modification overrides no field");
        }
        let actions = process_modification(original, modification, original_info, &self.catalog)?;
        debug!(
            modification_id = modification.id,
            rental_id = modification.rental_id,
            "modification billed"
        );

        Ok(ModificationActions {
            id: modification.id,
            rental_id: modification.rental_id,
            actions,
        })
    }

    /// Bill every modification, in input order. Each original rental is billed
    /// once, however many modifications target it.
    pub fn process_modifications(&self) -> BatchResult<ModificationActions> {
        let mut originals: HashMap<RentalId, Result<RentalInfo, AppError>> = HashMap::new();
        let mut batch = BatchResult::new();

        for modification in self.catalog.modifications() {
            let result = if self.catalog.rental(modification.rental_id).is_none() {
                Err(AppError::ModificationTargetNotFound {
                    modification_id: modification.id,
                    rental_id: modification.rental_id,
                })
            } else {
                let original_info = originals
                    .entry(modification.rental_id)
                    .or_insert_with(|| self.rental_info(modification.rental_id));

                match original_info {
                    Ok(original_info) => self.modification_actions(modification, original_info),
                    Err(err) => Err(err.clone()),
                }
            };
            batch.push(modification.id, result);
        }

        info!(
            billed = batch.outputs.len(),
            failed = batch.failures.len(),
            "modifications processed"
        );
        batch
    }

    // ========================
    // Integrity
    // ========================

    /// Rebuild every rental ledger and verify it moves as much money in as out.
    pub fn check_ledgers(&self) -> LedgerReport {
        let batch = self.process_rentals();

        let ledgers = batch
            .outputs
            .iter()
            .map(|info| LedgerBalance {
                rental_id: info.id,
                price: info.price,
                net_balance: net_balance(&info.actions),
                drivy_fee: info.commission.drivy_fee,
            })
            .collect();
        let issues = batch
            .failures
            .iter()
            .map(|failure| format!("rental {}: {}", failure.record_id, failure.error))
            .collect();

        LedgerReport { ledgers, issues }
    }
}
