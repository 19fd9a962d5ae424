//! Per-partition conversion reports.
//!
//! Everything the converter skips or tolerates ends up here instead of
//! being dropped silently, so callers and tests can see exactly what
//! happened without scraping log output.

use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};

/// What happened while converting one partition.
#[derive(Clone, Debug, Default, Serialize)]
pub struct ConversionReport {
    /// Partition name.
    pub partition: String,
    /// Image files found with an accepted extension.
    pub image_files: usize,
    /// Records written to the output dataset.
    pub output: ConversionCounts,
    /// Skipped items and notes, in the order they were encountered.
    pub issues: Vec<ConversionIssue>,
}

impl ConversionReport {
    pub fn new(partition: impl Into<String>) -> Self {
        Self {
            partition: partition.into(),
            ..Default::default()
        }
    }

    pub fn add(&mut self, issue: ConversionIssue) {
        self.issues.push(issue);
    }

    /// Count of warning-level issues (skipped or suspicious items).
    pub fn warning_count(&self) -> usize {
        self.issues
            .iter()
            .filter(|i| i.severity == ConversionSeverity::Warning)
            .count()
    }

    /// Count of info-level issues.
    pub fn info_count(&self) -> usize {
        self.issues
            .iter()
            .filter(|i| i.severity == ConversionSeverity::Info)
            .count()
    }

    /// Number of issues carrying `code`.
    pub fn count_of(&self, code: ConversionIssueCode) -> usize {
        self.issues.iter().filter(|i| i.code == code).count()
    }

    /// Returns true if nothing was skipped or flagged.
    pub fn is_clean(&self) -> bool {
        self.warning_count() == 0
    }
}

impl fmt::Display for ConversionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "  {} images ({} files found), {} categories, {} annotations",
            self.output.images, self.image_files, self.output.categories, self.output.annotations
        )?;

        let warnings = self.warning_count();
        if warnings > 0 {
            writeln!(f, "  Warnings ({}):", warnings)?;
            for issue in self
                .issues
                .iter()
                .filter(|i| i.severity == ConversionSeverity::Warning)
            {
                writeln!(f, "    - {}", issue)?;
            }
        }

        let infos = self.info_count();
        if infos > 0 {
            writeln!(f, "  Notes ({}):", infos)?;
            for issue in self
                .issues
                .iter()
                .filter(|i| i.severity == ConversionSeverity::Info)
            {
                writeln!(f, "    - {}", issue)?;
            }
        }

        Ok(())
    }
}

/// Counts of dataset records.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ConversionCounts {
    pub images: usize,
    pub categories: usize,
    pub annotations: usize,
}

/// A single skipped item or note.
#[derive(Clone, Debug, Serialize)]
pub struct ConversionIssue {
    pub severity: ConversionSeverity,
    pub code: ConversionIssueCode,
    pub message: String,
    /// File the issue refers to, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
    /// 1-based line number inside `path`, for label file issues.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,
}

impl ConversionIssue {
    pub fn warning(code: ConversionIssueCode, message: impl Into<String>) -> Self {
        Self {
            severity: ConversionSeverity::Warning,
            code,
            message: message.into(),
            path: None,
            line: None,
        }
    }

    pub fn info(code: ConversionIssueCode, message: impl Into<String>) -> Self {
        Self {
            severity: ConversionSeverity::Info,
            code,
            message: message.into(),
            path: None,
            line: None,
        }
    }

    pub fn at_path(mut self, path: &Path) -> Self {
        self.path = Some(path.to_path_buf());
        self
    }

    pub fn at_line(mut self, path: &Path, line: usize) -> Self {
        self.path = Some(path.to_path_buf());
        self.line = Some(line);
        self
    }
}

impl fmt::Display for ConversionIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.path, self.line) {
            (Some(path), Some(line)) => {
                write!(f, "[{:?}] {}:{}: {}", self.code, path.display(), line, self.message)
            }
            (Some(path), None) => write!(f, "[{:?}] {}: {}", self.code, path.display(), self.message),
            _ => write!(f, "[{:?}] {}", self.code, self.message),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConversionSeverity {
    /// An item was skipped or kept despite looking wrong.
    Warning,
    /// A note about how the partition was handled.
    Info,
}

/// Stable issue codes for programmatic consumption.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConversionIssueCode {
    /// The labels directory is missing; the partition is image-only.
    MissingLabelsDirectory,
    /// An image could not be probed for its size and was skipped.
    ImageDecodeFailure,
    /// A label line could not be parsed and was skipped.
    MalformedLabelLine,
    /// A label's class id has no matching category. The annotation is kept.
    CategoryOutOfRange,
    /// A label file exists but could not be read.
    LabelReadFailure,
}
