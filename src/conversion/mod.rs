//! The partition converter: one YOLO partition in, one COCO dataset out.
//!
//! The pipeline is scan → probe → parse → accumulate, with no retries or
//! backtracking. Anything that cannot be converted is skipped and recorded in
//! the partition's [`ConversionReport`]; only failing to list the images
//! directory aborts a partition.

pub mod report;

pub use report::{
    ConversionCounts, ConversionIssue, ConversionIssueCode, ConversionReport, ConversionSeverity,
};

use std::fs;
use std::path::Path;

use crate::config::ConvertConfig;
use crate::error::Yolo2CocoError;
use crate::ir::io_yolo::{label_path_for, list_image_files, parse_label_line, DimensionProbe};
use crate::ir::{Annotation, AnnotationId, Category, CategoryId, Dataset, Image, ImageId};

/// A converted partition and the report of what was skipped along the way.
#[derive(Clone, Debug)]
pub struct PartitionConversion {
    pub dataset: Dataset,
    pub report: ConversionReport,
}

/// Builds the category table: one entry per class name, id = position.
pub fn build_categories(classes: &[String], supercategory: &str) -> Vec<Category> {
    classes
        .iter()
        .enumerate()
        .map(|(index, name)| Category::new(index as i64, name.clone(), supercategory))
        .collect()
}

/// Converts one partition.
///
/// `labels_dir` is `None` for image-only partitions. Image ids are assigned
/// from 0 in file-name order, counting only images whose dimensions could be
/// read. Annotation ids run from 0 across the whole partition in
/// image-then-line order.
pub fn convert_partition<P>(
    partition: &str,
    images_dir: &Path,
    labels_dir: Option<&Path>,
    config: &ConvertConfig,
    probe: &P,
) -> Result<PartitionConversion, Yolo2CocoError>
where
    P: DimensionProbe + ?Sized,
{
    let mut dataset = Dataset::with_description(config.description.clone());
    let mut report = ConversionReport::new(partition);

    dataset.categories = build_categories(&config.classes, &config.supercategory);

    let image_files = list_image_files(images_dir, &config.image_extensions)?;
    report.image_files = image_files.len();
    log::info!(
        "{}: found {} image(s) in {}",
        partition,
        image_files.len(),
        images_dir.display()
    );

    let mut next_image_id = ImageId::new(0);
    let mut next_annotation_id = AnnotationId::new(0);

    for image_path in &image_files {
        let (width, height) = match probe.dimensions(image_path) {
            Ok(dims) => dims,
            Err(err) => {
                log::error!("cannot read image {}: {}", image_path.display(), err);
                report.add(
                    ConversionIssue::warning(ConversionIssueCode::ImageDecodeFailure, err.to_string())
                        .at_path(image_path),
                );
                continue;
            }
        };

        let file_name = image_path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        let image_id = next_image_id.take_next();
        dataset
            .images
            .push(Image::new(image_id, file_name, width, height));

        let Some(labels_dir) = labels_dir else {
            continue;
        };

        let label_path = label_path_for(labels_dir, image_path);
        if !label_path.is_file() {
            continue;
        }

        let content = match fs::read_to_string(&label_path) {
            Ok(content) => content,
            Err(err) => {
                log::warn!("cannot read label file {}: {}", label_path.display(), err);
                report.add(
                    ConversionIssue::warning(ConversionIssueCode::LabelReadFailure, err.to_string())
                        .at_path(&label_path),
                );
                continue;
            }
        };

        let target = LabelTarget {
            image_id,
            width,
            height,
            label_path: &label_path,
            class_count: config.classes.len(),
        };
        append_label_annotations(
            &content,
            &target,
            &mut next_annotation_id,
            &mut dataset.annotations,
            &mut report,
        );
    }

    report.output = ConversionCounts {
        images: dataset.images.len(),
        categories: dataset.categories.len(),
        annotations: dataset.annotations.len(),
    };

    Ok(PartitionConversion { dataset, report })
}

struct LabelTarget<'a> {
    image_id: ImageId,
    width: u32,
    height: u32,
    label_path: &'a Path,
    class_count: usize,
}

fn append_label_annotations(
    content: &str,
    target: &LabelTarget<'_>,
    next_annotation_id: &mut AnnotationId,
    annotations: &mut Vec<Annotation>,
    report: &mut ConversionReport,
) {
    for (line_idx, line) in content.lines().enumerate() {
        let line_num = line_idx + 1;

        let row = match parse_label_line(line) {
            Ok(Some(row)) => row,
            Ok(None) => continue,
            Err(err) => {
                log::debug!(
                    "skipping {}:{}: {}",
                    target.label_path.display(),
                    line_num,
                    err
                );
                report.add(
                    ConversionIssue::warning(ConversionIssueCode::MalformedLabelLine, err.to_string())
                        .at_line(target.label_path, line_num),
                );
                continue;
            }
        };

        let in_range = usize::try_from(row.class_id)
            .map(|index| index < target.class_count)
            .unwrap_or(false);
        if !in_range {
            report.add(
                ConversionIssue::warning(
                    ConversionIssueCode::CategoryOutOfRange,
                    format!(
                        "class_id {} is out of range for {} class(es); annotation kept",
                        row.class_id, target.class_count
                    ),
                )
                .at_line(target.label_path, line_num),
            );
        }

        let bbox = row.bbox.to_pixel_xywh(target.width, target.height);
        annotations.push(Annotation::new(
            next_annotation_id.take_next(),
            target.image_id,
            CategoryId::new(row.class_id),
            bbox,
        ));
    }
}
