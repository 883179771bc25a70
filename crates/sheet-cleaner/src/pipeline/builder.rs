//! Main cleaning pipeline.
//!
//! This module provides the core `Pipeline` struct and builder for
//! orchestrating the cleaning workflow.

use crate::cleaner::{Deduplicator, NameStandardizer, RequiredColumnCheck};
use crate::config::{CleaningConfig, ConfigValidationError};
use crate::error::Result;
use crate::imputers::MissingValueResolver;
use crate::pipeline::progress::{
    ClosureProgressReporter, CleaningStage, ProgressReporter, ProgressUpdate,
};
use crate::profiler::{ColumnProfile, ColumnProfiler};
use crate::reporting::{ValidationReport, ValidationReporter};
use crate::types::Dataset;
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info};

/// Result of a successful run.
#[derive(Debug, Clone)]
pub struct CleanOutput {
    /// The cleaned dataset.
    pub dataset: Dataset,
    /// Every issue found and action taken.
    pub report: ValidationReport,
    /// Per-column profiles as inferred at the start of the run.
    pub profiles: Vec<ColumnProfile>,
}

/// The cleaning pipeline.
///
/// Stages run in a fixed order: profile, standardize names, check required
/// columns, remove duplicates, resolve missing values. Only configuration
/// errors abort a run; every other anomaly lands in the report.
///
/// Use [`Pipeline::builder()`] to create a pipeline with custom configuration.
///
/// # Example
///
/// ```rust,ignore
/// use sheet_cleaner::{CleaningConfig, Pipeline};
///
/// let output = Pipeline::builder()
///     .config(CleaningConfig::builder().dedup_key(["id"]).build()?)
///     .on_progress(|update| {
///         println!("[{:.0}%] {}", update.progress * 100.0, update.message);
///     })
///     .build()?
///     .clean(dataset)?;
///
/// println!("{} duplicates removed", output.report.summary.duplicates_removed());
/// ```
pub struct Pipeline {
    config: CleaningConfig,
    progress_reporter: Option<Arc<dyn ProgressReporter>>,
}

// Batch cleaning shares one pipeline across rayon workers
static_assertions::assert_impl_all!(Pipeline: Send, Sync);

impl Pipeline {
    /// Create a new pipeline builder.
    pub fn builder() -> PipelineBuilder {
        PipelineBuilder::default()
    }

    pub fn config(&self) -> &CleaningConfig {
        &self.config
    }

    /// Clean a dataset.
    ///
    /// # Errors
    ///
    /// Returns a configuration error (see
    /// [`CleaningError::is_configuration_error`](crate::CleaningError::is_configuration_error))
    /// when the dedup key names a column that does not exist. No partially
    /// cleaned dataset is returned in that case.
    pub fn clean(&self, dataset: Dataset) -> Result<CleanOutput> {
        match self.clean_internal(dataset) {
            Ok(output) => {
                self.report_progress(ProgressUpdate::complete("Cleaning completed successfully"));
                Ok(output)
            }
            Err(e) => {
                self.report_progress(ProgressUpdate::failed(e.to_string()));
                error!("Pipeline error: {}", e);
                Err(e)
            }
        }
    }

    /// Profile a dataset without cleaning it.
    pub fn profile(&self, dataset: &Dataset) -> Vec<ColumnProfile> {
        ColumnProfiler::new(&self.config).preview(dataset)
    }

    /// Report progress if a reporter is configured.
    fn report_progress(&self, update: ProgressUpdate) {
        if let Some(reporter) = &self.progress_reporter {
            reporter.report(update);
        }
    }

    fn stage_started(&self, stage: CleaningStage, message: &str) {
        info!("{}", message);
        self.report_progress(ProgressUpdate::new(stage, 0.0, message));
    }

    fn stage_finished(&self, stage: CleaningStage) {
        self.report_progress(ProgressUpdate::new(
            stage,
            1.0,
            format!("{} complete", stage.display_name()),
        ));
    }

    fn clean_internal(&self, mut dataset: Dataset) -> Result<CleanOutput> {
        let start_time = Instant::now();
        let (rows_before, columns) = dataset.shape();
        info!(
            "Starting cleaning pipeline ({} rows x {} columns)",
            rows_before, columns
        );

        let mut reporter = ValidationReporter::new();

        // Step 1: Profile and coerce
        self.stage_started(CleaningStage::Profiling, "Step 1: Profiling columns...");
        let profiles = ColumnProfiler::new(&self.config).profile(&mut dataset, &mut reporter);
        self.stage_finished(CleaningStage::Profiling);

        // Step 2: Standardize names
        self.stage_started(CleaningStage::Standardizing, "Step 2: Standardizing column names...");
        let renames = NameStandardizer::new().standardize(&mut dataset, &mut reporter);
        self.stage_finished(CleaningStage::Standardizing);

        // Step 3: Required columns, counted before any fill
        self.stage_started(CleaningStage::Validating, "Step 3: Checking required columns...");
        RequiredColumnCheck::new(&self.config.required_columns)
            .with_renames(&renames)
            .check(&dataset, &mut reporter);
        self.stage_finished(CleaningStage::Validating);

        // Step 4: Duplicates
        let deduplicator =
            Deduplicator::new(self.config.dedup_key.as_deref()).with_renames(&renames);
        let mut row_origin: Vec<usize> = (0..rows_before).collect();
        if self.config.remove_duplicates {
            self.stage_started(CleaningStage::Deduplicating, "Step 4: Removing duplicate rows...");
            row_origin = deduplicator.deduplicate(&mut dataset, &row_origin, &mut reporter)?;
            self.stage_finished(CleaningStage::Deduplicating);
        } else {
            info!("Step 4: Skipping duplicate removal (disabled)");
            deduplicator.resolve_key(&dataset)?;
        }

        // Step 5: Missing values
        self.stage_started(CleaningStage::Resolving, "Step 5: Resolving missing values...");
        MissingValueResolver::new(&self.config).resolve(&mut dataset, &row_origin, &mut reporter);
        self.stage_finished(CleaningStage::Resolving);

        reporter.set_shape(rows_before, dataset.height(), dataset.width());
        let report = reporter.finalize();

        info!(
            "Cleaning finished in {:.2?}: {} rows kept, {} duplicates removed, {} cells filled, {} warnings",
            start_time.elapsed(),
            dataset.height(),
            report.summary.duplicates_removed(),
            report.summary.cells_filled(),
            report.summary.warnings
        );

        Ok(CleanOutput {
            dataset,
            report,
            profiles,
        })
    }
}

/// Builder for [`Pipeline`].
#[derive(Default)]
pub struct PipelineBuilder {
    config: Option<CleaningConfig>,
    progress_reporter: Option<Arc<dyn ProgressReporter>>,
}

static_assertions::assert_impl_all!(PipelineBuilder: Send);

impl PipelineBuilder {
    /// Set the cleaning configuration.
    pub fn config(mut self, config: CleaningConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set a progress reporter for receiving updates during cleaning.
    pub fn progress_reporter(mut self, reporter: Arc<dyn ProgressReporter>) -> Self {
        self.progress_reporter = Some(reporter);
        self
    }

    /// Set a progress callback closure.
    ///
    /// For more complex scenarios, use [`progress_reporter`](Self::progress_reporter).
    pub fn on_progress<F>(mut self, callback: F) -> Self
    where
        F: Fn(ProgressUpdate) + Send + Sync + 'static,
    {
        self.progress_reporter = Some(Arc::new(ClosureProgressReporter::new(callback)));
        self
    }

    /// Build the pipeline.
    ///
    /// Returns an error if the configuration is invalid.
    pub fn build(self) -> std::result::Result<Pipeline, ConfigValidationError> {
        let config = self.config.unwrap_or_default();
        config.validate()?;

        Ok(Pipeline {
            config,
            progress_reporter: self.progress_reporter,
        })
    }
}
