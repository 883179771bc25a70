//! Duplicate row removal.

use super::names::{Rename, find_column};
use crate::error::{CleaningError, Result};
use crate::reporting::{IssueKind, ValidationIssue, ValidationReporter};
use crate::types::{Cell, Dataset};
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use tracing::{debug, info};

/// Removes rows whose key values repeat an earlier row.
///
/// The key is a list of column names; `None` keys on every column. Missing
/// cells compare equal to each other and to nothing else.
pub struct Deduplicator<'a> {
    key: Option<&'a [String]>,
    renames: &'a [Rename],
}

impl<'a> Deduplicator<'a> {
    pub fn new(key: Option<&'a [String]>) -> Self {
        Self { key, renames: &[] }
    }

    /// Also accept the pre-standardization names of renamed columns.
    pub fn with_renames(mut self, renames: &'a [Rename]) -> Self {
        self.renames = renames;
        self
    }

    /// Resolve key names to column indices.
    ///
    /// A name matches a standardized column name, or the original name of a
    /// renamed column. Anything else is a configuration error.
    pub fn resolve_key(&self, dataset: &Dataset) -> Result<Vec<usize>> {
        let Some(key) = self.key else {
            return Ok((0..dataset.width()).collect());
        };

        let mut indices = Vec::with_capacity(key.len());
        for name in key {
            let index = find_column(dataset, self.renames, name)
                .ok_or_else(|| CleaningError::UnknownKeyColumn(name.clone()))?;
            if !indices.contains(&index) {
                indices.push(index);
            }
        }
        Ok(indices)
    }

    /// Drop duplicate rows, keeping the first of each key group.
    ///
    /// `row_origin[i]` is the caller's index for current row `i`; issues cite
    /// those indices. Returns the origin indices of the surviving rows.
    pub fn deduplicate(
        &self,
        dataset: &mut Dataset,
        row_origin: &[usize],
        reporter: &mut ValidationReporter,
    ) -> Result<Vec<usize>> {
        let key_indices = self.resolve_key(dataset)?;
        let height = dataset.height();
        let mut keep = vec![true; height];
        let mut removed: Vec<(usize, usize)> = Vec::new();

        {
            let columns = dataset.columns();
            let mut first_seen: HashMap<Vec<&Cell>, usize> = HashMap::with_capacity(height);
            for row in 0..height {
                let key: Vec<&Cell> = key_indices
                    .iter()
                    .map(|&c| &columns[c].values[row])
                    .collect();
                match first_seen.entry(key) {
                    Entry::Occupied(entry) => {
                        keep[row] = false;
                        removed.push((row, *entry.get()));
                    }
                    Entry::Vacant(entry) => {
                        entry.insert(row);
                    }
                }
            }
        }

        for &(row, first) in &removed {
            let (row, first) = (row_origin[row], row_origin[first]);
            debug!("Row {} duplicates row {}", row, first);
            reporter.record(
                ValidationIssue::new(
                    IssueKind::DuplicateRemoved,
                    format!("row {row} duplicates row {first}"),
                )
                .at_row(row),
            );
        }

        info!("Removed {} duplicate rows", removed.len());
        dataset.retain_rows(&keep);

        Ok(row_origin
            .iter()
            .zip(&keep)
            .filter_map(|(&origin, &kept)| kept.then_some(origin))
            .collect())
    }
}
