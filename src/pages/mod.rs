//! Dashboard pages.

pub mod home;
pub mod not_found;
pub mod overview;

use crate::data::{DataError, Dataset};

/// The dataset shipped with the app, so the CSR build needs no fetch layer.
const DATASET_CSV: &str = include_str!("../../data/final_with_indexes.csv");

/// Parse the bundled dataset.
pub(crate) fn bundled_dataset() -> Result<Dataset, DataError> {
	Dataset::from_csv_str(DATASET_CSV)
}
