//! Parallel cleaning of independent sheets.

use super::builder::{CleanOutput, Pipeline};
use crate::error::Result;
use crate::types::Dataset;
use rayon::prelude::*;
use tracing::info;

/// Outcome for one sheet of a batch.
#[derive(Debug)]
pub struct SheetOutcome {
    pub sheet: String,
    pub result: Result<CleanOutput>,
}

impl Pipeline {
    /// Clean several named datasets in parallel.
    ///
    /// Runs share nothing but the configuration, so one sheet's failure does
    /// not affect the others. Outcomes come back in input order.
    pub fn clean_many(&self, sheets: Vec<(String, Dataset)>) -> Vec<SheetOutcome> {
        info!("Cleaning {} sheets in parallel", sheets.len());
        sheets
            .into_par_iter()
            .map(|(sheet, dataset)| {
                let result = self.clean(dataset);
                SheetOutcome { sheet, result }
            })
            .collect()
    }
}
