//! Daily time series over a directory of grid files.
//!
//! Each file contributes one sample dated from its file name. Files that
//! cannot be dated or read are skipped and recorded in the [`BatchReport`];
//! only a missing directory or an empty result stops the batch.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use rayon::prelude::*;
use sat_common::{date_from_filename, TargetPoint};
use serde::Serialize;
use tracing::{info, warn};

use crate::config::BatchConfig;
use crate::error::{BatchError, BatchResult, ExtractError};
use crate::extract::{extract_file, validate_request, ExtractionResult};

/// One dated extraction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailySample {
    pub date: NaiveDate,
    pub result: ExtractionResult,
}

/// Why a file did not contribute a sample.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "message", rename_all = "snake_case")]
pub enum SkipReason {
    DateParseFailure(String),
    FileUnreadable(String),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkippedFile {
    pub file_name: String,
    pub reason: SkipReason,
}

/// Bookkeeping for one batch run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BatchReport {
    /// Files matching the configured extensions.
    pub discovered: usize,
    /// Files that produced a sample.
    pub processed: usize,
    pub skipped: Vec<SkippedFile>,
}

/// Three aligned series in ascending date order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TimeSeries {
    pub target: Option<TargetPoint>,
    pub dates: Vec<NaiveDate>,
    pub precipitation: Vec<f64>,
    pub cloud_fraction: Vec<f64>,
    pub cloud_top_pressure: Vec<f64>,
    pub report: BatchReport,
}

impl TimeSeries {
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// Split sorted samples into parallel series.
    fn from_samples(target: TargetPoint, samples: Vec<DailySample>, report: BatchReport) -> Self {
        let mut series = Self {
            target: Some(target),
            report,
            ..Default::default()
        };
        for sample in samples {
            series.dates.push(sample.date);
            series.precipitation.push(sample.result.precipitation);
            series.cloud_fraction.push(sample.result.cloud_fraction);
            series.cloud_top_pressure.push(sample.result.cloud_top_pressure);
        }
        series
    }
}

/// Runs the extractor over every grid file of a directory.
#[derive(Debug, Clone)]
pub struct BatchAggregator {
    config: BatchConfig,
}

impl BatchAggregator {
    pub fn new(config: BatchConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &BatchConfig {
        &self.config
    }

    /// List grid files in the data directory, sorted by file name.
    pub fn discover_files(&self) -> BatchResult<Vec<PathBuf>> {
        let dir = &self.config.data_dir;
        let source_error = |source| BatchError::SourceDirectory {
            path: dir.clone(),
            source,
        };

        let mut files = Vec::new();
        for entry in std::fs::read_dir(dir).map_err(source_error)? {
            let path = entry.map_err(source_error)?.path();
            let matches = path.is_file()
                && path
                    .extension()
                    .and_then(|ext| ext.to_str())
                    .is_some_and(|ext| self.config.accepts_extension(ext));
            if matches {
                files.push(path);
            }
        }
        files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));

        Ok(files)
    }

    /// Build the time series for `target` from the data directory.
    pub fn aggregate(&self, target: TargetPoint) -> BatchResult<TimeSeries> {
        let files = self.discover_files()?;
        info!(
            dir = %self.config.data_dir.display(),
            files = files.len(),
            target = %target,
            "Aggregating grid files"
        );
        self.aggregate_paths(&files, target)
    }

    /// Build the time series for `target` from an explicit list of files.
    ///
    /// Samples are sorted by date; files sharing a date keep their order in
    /// `paths`.
    pub fn aggregate_paths(&self, paths: &[PathBuf], target: TargetPoint) -> BatchResult<TimeSeries> {
        validate_request(target, self.config.extract.tolerance).map_err(BatchError::InvalidRequest)?;

        let outcomes: Vec<Result<DailySample, SkippedFile>> = if self.config.parallel {
            paths.par_iter().map(|p| self.process_file(p, target)).collect()
        } else {
            paths.iter().map(|p| self.process_file(p, target)).collect()
        };

        let mut report = BatchReport {
            discovered: paths.len(),
            ..Default::default()
        };
        let mut samples = Vec::with_capacity(outcomes.len());
        for outcome in outcomes {
            match outcome {
                Ok(sample) => samples.push(sample),
                Err(skipped) => report.skipped.push(skipped),
            }
        }
        report.processed = samples.len();

        if samples.is_empty() {
            warn!(
                discovered = report.discovered,
                skipped = report.skipped.len(),
                "No usable grid files"
            );
            return Err(BatchError::EmptyDataset(report));
        }

        // Stable: equal dates keep discovery order
        samples.sort_by_key(|s| s.date);

        info!(
            processed = report.processed,
            skipped = report.skipped.len(),
            "Time series ready"
        );
        Ok(TimeSeries::from_samples(target, samples, report))
    }

    fn process_file(&self, path: &Path, target: TargetPoint) -> Result<DailySample, SkippedFile> {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        let date = match date_from_filename(&file_name) {
            Ok(date) => date,
            Err(e) => {
                warn!(file = %file_name, error = %e, "Skipping file with undated name");
                return Err(SkippedFile {
                    file_name,
                    reason: SkipReason::DateParseFailure(e.to_string()),
                });
            }
        };

        match extract_file(path, target, &self.config.extract) {
            Ok(result) => Ok(DailySample { date, result }),
            Err(e @ ExtractError::FileUnreadable { .. }) => {
                warn!(file = %file_name, error = %e, "Skipping unreadable file");
                Err(SkippedFile {
                    file_name,
                    reason: SkipReason::FileUnreadable(e.to_string()),
                })
            }
            // Request errors were ruled out up front; record them like any other skip.
            Err(e) => Err(SkippedFile {
                file_name,
                reason: SkipReason::FileUnreadable(e.to_string()),
            }),
        }
    }
}
