//! The dataset driver: runs the partition converter over every configured
//! partition and writes one `instances_<partition>.json` per partition.
//!
//! Partitions are independent. A partition without an images directory is
//! skipped, and a partition whose output cannot be written is marked failed;
//! either way the driver moves on to the next one.

use std::fmt;
use std::path::PathBuf;

use crate::config::ConvertConfig;
use crate::conversion::{
    convert_partition, ConversionIssue, ConversionIssueCode, ConversionReport,
};
use crate::error::Yolo2CocoError;
use crate::ir::io_coco_json::{write_coco_json, CocoWriteOptions};
use crate::ir::io_yolo::{DimensionProbe, ImageSizeProbe};

/// Why a partition produced no output.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SkipReason {
    MissingImagesDirectory(PathBuf),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::MissingImagesDirectory(path) => {
                write!(f, "images directory not found: {}", path.display())
            }
        }
    }
}

/// Result of processing a single partition.
#[derive(Debug)]
pub enum PartitionOutcome {
    Written {
        path: PathBuf,
        report: ConversionReport,
    },
    Skipped {
        reason: SkipReason,
    },
    Failed {
        error: Yolo2CocoError,
    },
}

/// One entry per configured partition, in configured order.
#[derive(Debug, Default)]
pub struct RunSummary {
    pub partitions: Vec<(String, PartitionOutcome)>,
}

impl RunSummary {
    pub fn written_count(&self) -> usize {
        self.partitions
            .iter()
            .filter(|(_, o)| matches!(o, PartitionOutcome::Written { .. }))
            .count()
    }

    pub fn skipped_count(&self) -> usize {
        self.partitions
            .iter()
            .filter(|(_, o)| matches!(o, PartitionOutcome::Skipped { .. }))
            .count()
    }

    pub fn failed_count(&self) -> usize {
        self.partitions
            .iter()
            .filter(|(_, o)| matches!(o, PartitionOutcome::Failed { .. }))
            .count()
    }

    /// Looks up the outcome for a partition by name.
    pub fn outcome(&self, partition: &str) -> Option<&PartitionOutcome> {
        self.partitions
            .iter()
            .find(|(name, _)| name == partition)
            .map(|(_, outcome)| outcome)
    }

    /// Turns any failed partition into an error for the caller.
    pub fn into_result(self) -> Result<Self, Yolo2CocoError> {
        let failed = self.failed_count();
        if failed > 0 {
            Err(Yolo2CocoError::PartitionsFailed {
                failed,
                total: self.partitions.len(),
            })
        } else {
            Ok(self)
        }
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (name, outcome) in &self.partitions {
            match outcome {
                PartitionOutcome::Written { path, report } => {
                    writeln!(f, "{}: wrote {}", name, path.display())?;
                    write!(f, "{}", report)?;
                }
                PartitionOutcome::Skipped { reason } => {
                    writeln!(f, "{}: skipped ({})", name, reason)?;
                }
                PartitionOutcome::Failed { error } => {
                    writeln!(f, "{}: failed ({})", name, error)?;
                }
            }
        }
        writeln!(
            f,
            "{} written, {} skipped, {} failed",
            self.written_count(),
            self.skipped_count(),
            self.failed_count()
        )
    }
}

/// Converts every partition using the `imagesize` header probe.
pub fn convert_dataset(config: &ConvertConfig) -> RunSummary {
    convert_dataset_with(config, &ImageSizeProbe)
}

/// Converts every partition using the given dimension probe.
pub fn convert_dataset_with<P>(config: &ConvertConfig, probe: &P) -> RunSummary
where
    P: DimensionProbe + ?Sized,
{
    log::info!(
        "converting {} partition(s) under {} with classes {:?}",
        config.partitions.len(),
        config.root.display(),
        config.classes
    );

    let mut summary = RunSummary::default();
    for partition in &config.partitions {
        let outcome = convert_one(config, partition, probe);
        summary.partitions.push((partition.clone(), outcome));
    }
    summary
}

fn convert_one<P>(config: &ConvertConfig, partition: &str, probe: &P) -> PartitionOutcome
where
    P: DimensionProbe + ?Sized,
{
    let images_dir = config.images_dir(partition);
    if !images_dir.is_dir() {
        log::warn!(
            "skipping partition '{}': images directory not found: {}",
            partition,
            images_dir.display()
        );
        return PartitionOutcome::Skipped {
            reason: SkipReason::MissingImagesDirectory(images_dir),
        };
    }

    let labels_dir = config.labels_dir(partition);
    let labels_present = labels_dir.is_dir();
    if !labels_present {
        log::info!(
            "partition '{}' has no labels directory ({}); converting images only",
            partition,
            labels_dir.display()
        );
    }

    let converted = match convert_partition(
        partition,
        &images_dir,
        labels_present.then_some(labels_dir.as_path()),
        config,
        probe,
    ) {
        Ok(converted) => converted,
        Err(error) => {
            log::error!("partition '{}' failed: {}", partition, error);
            return PartitionOutcome::Failed { error };
        }
    };

    let mut report = converted.report;
    if !labels_present {
        report.issues.insert(
            0,
            ConversionIssue::info(
                ConversionIssueCode::MissingLabelsDirectory,
                "labels directory not found; partition converted without annotations",
            )
            .at_path(&labels_dir),
        );
    }

    let output_path = config.output_path(partition);
    let options = CocoWriteOptions {
        pretty: config.pretty,
    };
    if let Err(error) = write_coco_json(&output_path, &converted.dataset, options) {
        log::error!("partition '{}' failed: {}", partition, error);
        return PartitionOutcome::Failed { error };
    }

    log::info!(
        "{}: saved {} ({} images, {} annotations, {} warning(s))",
        partition,
        output_path.display(),
        report.output.images,
        report.output.annotations,
        report.warning_count()
    );

    PartitionOutcome::Written {
        path: output_path,
        report,
    }
}
