//! Validation issues recorded during a cleaning run.

use serde::{Deserialize, Serialize};
use std::fmt;

/// How serious an issue is. Nothing in a report is fatal.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Info,
    Warning,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Warning => "warning",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Broad grouping of issue kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueCategory {
    /// Something the pipeline noticed without changing data.
    Observation,
    /// A corrective action applied to the dataset.
    Action,
    /// A cell or column the pipeline could not handle as typed.
    CellAnomaly,
    /// Two names standardized to the same identifier.
    NameCollision,
    /// A caller-declared column requirement was not met.
    Requirement,
}

/// What an issue is about. Summary counters are keyed by this.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    TypeInferred,
    EmptyColumn,
    UnparsableValue,
    WhitespaceTrimmed,
    BlankAsMissing,
    ColumnRenamed,
    NameCollision,
    MissingRequiredColumn,
    RequiredColumnIncomplete,
    DuplicateRemoved,
    CellFilled,
    ImputationImpossible,
    MissingDate,
    MissingDatesSummarized,
}

impl IssueKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TypeInferred => "type_inferred",
            Self::EmptyColumn => "empty_column",
            Self::UnparsableValue => "unparsable_value",
            Self::WhitespaceTrimmed => "whitespace_trimmed",
            Self::BlankAsMissing => "blank_as_missing",
            Self::ColumnRenamed => "column_renamed",
            Self::NameCollision => "name_collision",
            Self::MissingRequiredColumn => "missing_required_column",
            Self::RequiredColumnIncomplete => "required_column_incomplete",
            Self::DuplicateRemoved => "duplicate_removed",
            Self::CellFilled => "cell_filled",
            Self::ImputationImpossible => "imputation_impossible",
            Self::MissingDate => "missing_date",
            Self::MissingDatesSummarized => "missing_dates_summarized",
        }
    }

    /// Severity an issue of this kind is recorded with.
    pub fn default_severity(&self) -> Severity {
        match self {
            Self::EmptyColumn
            | Self::UnparsableValue
            | Self::NameCollision
            | Self::MissingRequiredColumn
            | Self::RequiredColumnIncomplete
            | Self::ImputationImpossible => Severity::Warning,
            _ => Severity::Info,
        }
    }

    pub fn category(&self) -> IssueCategory {
        match self {
            Self::TypeInferred | Self::MissingDate | Self::MissingDatesSummarized => {
                IssueCategory::Observation
            }
            Self::EmptyColumn | Self::UnparsableValue | Self::ImputationImpossible => {
                IssueCategory::CellAnomaly
            }
            Self::NameCollision => IssueCategory::NameCollision,
            Self::MissingRequiredColumn | Self::RequiredColumnIncomplete => {
                IssueCategory::Requirement
            }
            Self::WhitespaceTrimmed
            | Self::BlankAsMissing
            | Self::ColumnRenamed
            | Self::DuplicateRemoved
            | Self::CellFilled => IssueCategory::Action,
        }
    }
}

impl fmt::Display for IssueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single entry in the validation report.
///
/// `row` always refers to the row index in the caller's input, even after
/// duplicate removal has shifted rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationIssue {
    pub row: Option<usize>,
    pub column: Option<String>,
    pub kind: IssueKind,
    pub severity: Severity,
    pub message: String,
}

impl ValidationIssue {
    /// Create an issue with the kind's default severity.
    pub fn new(kind: IssueKind, message: impl Into<String>) -> Self {
        Self {
            row: None,
            column: None,
            kind,
            severity: kind.default_severity(),
            message: message.into(),
        }
    }

    pub fn at_row(mut self, row: usize) -> Self {
        self.row = Some(row);
        self
    }

    pub fn in_column(mut self, column: impl Into<String>) -> Self {
        self.column = Some(column.into());
        self
    }

    pub fn is_warning(&self) -> bool {
        self.severity == Severity::Warning
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.severity, self.kind)?;
        if let Some(column) = &self.column {
            write!(f, " column '{column}'")?;
        }
        if let Some(row) = self.row {
            write!(f, " row {row}")?;
        }
        write!(f, ": {}", self.message)
    }
}
