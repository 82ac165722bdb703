use anyhow::{Context, Result};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use crate::storage::Dataset;

/// Parse a dataset document from any reader.
pub fn read_dataset<R: Read>(reader: R) -> Result<Dataset> {
    let dataset: Dataset =
        serde_json::from_reader(reader).context("Invalid dataset: expected cars and rentals")?;

    tracing::debug!(
        cars = dataset.cars.len(),
        rentals = dataset.rentals.len(),
        modifications = dataset.rental_modifications.len(),
        "dataset parsed"
    );
    Ok(dataset)
}

/// Load a dataset document from a JSON file.
pub fn load_dataset(path: impl AsRef<Path>) -> Result<Dataset> {
    let path = path.as_ref();
    let file = File::open(path)
        .with_context(|| format!("Failed to open input file: {}", path.display()))?;

    read_dataset(BufReader::new(file))
        .with_context(|| format!("Failed to read dataset from {}", path.display()))
}
