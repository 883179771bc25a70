//! Report rendering: pretty JSON and a polars table.

use super::reporter::ValidationReport;
use crate::error::{ResultExt, Result};
use polars::prelude::*;

/// Message used for the single row of an empty report table.
pub const NO_ISSUES_MESSAGE: &str = "No issues found";

impl ValidationReport {
    /// Pretty-printed JSON of the whole report.
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Render the issue list as a table with columns
    /// `row`, `column`, `kind`, `severity`, `message`.
    ///
    /// An empty report yields one row reading "No issues found".
    pub fn to_dataframe(&self) -> Result<DataFrame> {
        let (rows, columns, kinds, severities, messages) = if self.issues.is_empty() {
            (
                vec![None],
                vec![None],
                vec![None],
                vec![None],
                vec![NO_ISSUES_MESSAGE.to_string()],
            )
        } else {
            let mut rows = Vec::with_capacity(self.issues.len());
            let mut columns = Vec::with_capacity(self.issues.len());
            let mut kinds = Vec::with_capacity(self.issues.len());
            let mut severities = Vec::with_capacity(self.issues.len());
            let mut messages = Vec::with_capacity(self.issues.len());
            for issue in &self.issues {
                rows.push(issue.row.map(|r| r as u64));
                columns.push(issue.column.clone());
                kinds.push(Some(issue.kind.as_str()));
                severities.push(Some(issue.severity.as_str()));
                messages.push(issue.message.clone());
            }
            (rows, columns, kinds, severities, messages)
        };

        DataFrame::new(vec![
            Series::new("row".into(), rows).into_column(),
            Series::new("column".into(), columns).into_column(),
            Series::new("kind".into(), kinds).into_column(),
            Series::new("severity".into(), severities).into_column(),
            Series::new("message".into(), messages).into_column(),
        ])
        .context("Failed to build report table")
    }
}
