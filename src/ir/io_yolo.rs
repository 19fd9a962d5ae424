//! YOLO-side input handling for one partition.
//!
//! A partition is an `images/<partition>` directory of image files plus an
//! optional `labels/<partition>` directory holding one `<stem>.txt` per
//! image. This module lists the images, probes their dimensions, and parses
//! label rows. Assembling the COCO dataset is left to
//! [`conversion`](crate::conversion).

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use log::warn;
use thiserror::Error;
use walkdir::WalkDir;

use super::{BBoxCxCyWH, Normalized};
use crate::error::Yolo2CocoError;

pub const DEFAULT_IMAGE_EXTENSIONS: [&str; 5] = ["jpg", "jpeg", "png", "bmp", "tif"];
pub const LABEL_EXTENSION: &str = "txt";

/// Something that can report the pixel size of an image file.
///
/// The converter only needs `(width, height)`; how the file is decoded is up
/// to the implementation.
pub trait DimensionProbe {
    fn dimensions(&self, path: &Path) -> Result<(u32, u32), Yolo2CocoError>;
}

/// Header-only probe backed by the `imagesize` crate.
#[derive(Clone, Copy, Debug, Default)]
pub struct ImageSizeProbe;

impl DimensionProbe for ImageSizeProbe {
    fn dimensions(&self, path: &Path) -> Result<(u32, u32), Yolo2CocoError> {
        read_image_dimensions(path)
    }
}

/// One parsed label row.
#[derive(Debug, PartialEq)]
pub struct YoloLabelRow {
    pub class_id: i64,
    pub bbox: BBoxCxCyWH<Normalized>,
}

/// Why a label line was discarded.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum LabelLineError {
    #[error("expected at least 5 tokens, found {found}")]
    TooFewTokens { found: usize },

    #[error("invalid class_id '{raw}'; expected integer")]
    InvalidClassId { raw: String },

    #[error("invalid {field} '{raw}'; expected finite floating-point number")]
    InvalidNumber { field: &'static str, raw: String },
}

/// Lists the image files directly inside `images_dir`.
///
/// Only regular files whose extension matches one of `extensions`
/// (case-insensitive, no leading dot) are kept. The result is sorted by file
/// name so ids are reproducible across platforms.
///
/// An entry that cannot be inspected (a dangling symlink, say) is still
/// returned when its name matches, so the dimension probe reports it as an
/// undecodable image. Only a failure to read `images_dir` itself is an error.
pub fn list_image_files(
    images_dir: &Path,
    extensions: &[String],
) -> Result<Vec<PathBuf>, Yolo2CocoError> {
    let mut files = Vec::new();

    for entry in WalkDir::new(images_dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
    {
        let entry = match entry {
            Ok(entry) => entry,
            Err(source) => {
                match source.path() {
                    Some(path) if source.depth() > 0 => {
                        if has_extension(path, extensions) {
                            files.push(path.to_path_buf());
                        } else {
                            warn!("skipping unreadable entry {}: {source}", path.display());
                        }
                    }
                    _ => {
                        return Err(Yolo2CocoError::ImagesDirScan {
                            path: images_dir.to_path_buf(),
                            message: format!("failed while listing directory: {source}"),
                        })
                    }
                }
                continue;
            }
        };

        if entry.file_type().is_file() && has_extension(entry.path(), extensions) {
            files.push(entry.into_path());
        }
    }

    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}

fn has_extension(path: &Path, allowed: &[String]) -> bool {
    let Some(ext) = path.extension().and_then(|ext| ext.to_str()) else {
        return false;
    };

    allowed
        .iter()
        .any(|allowed_ext| ext.eq_ignore_ascii_case(allowed_ext))
}

/// Reads `(width, height)` from the image header.
///
/// Zero-sized images are rejected; COCO image records need positive sizes.
pub fn read_image_dimensions(path: &Path) -> Result<(u32, u32), Yolo2CocoError> {
    let size = imagesize::size(path).map_err(|source| Yolo2CocoError::ImageDimensionRead {
        path: path.to_path_buf(),
        source,
    })?;

    let invalid = |message: String| Yolo2CocoError::ImageDimensionInvalid {
        path: path.to_path_buf(),
        message,
    };

    let width: u32 = size
        .width
        .try_into()
        .map_err(|_| invalid(format!("width {} does not fit in u32", size.width)))?;
    let height: u32 = size
        .height
        .try_into()
        .map_err(|_| invalid(format!("height {} does not fit in u32", size.height)))?;

    if width == 0 || height == 0 {
        return Err(invalid(format!("image is {width}x{height}")));
    }

    Ok((width, height))
}

/// Returns `<labels_dir>/<stem>.txt` for an image path.
///
/// Only the last extension is replaced, so `a.b.jpg` maps to `a.b.txt`.
pub fn label_path_for(labels_dir: &Path, image_path: &Path) -> PathBuf {
    let mut name: OsString = image_path
        .file_stem()
        .map(|stem| stem.to_os_string())
        .unwrap_or_default();
    name.push(".");
    name.push(LABEL_EXTENSION);
    labels_dir.join(name)
}

/// Parses one label line.
///
/// Returns `Ok(None)` for blank lines. Tokens past the fifth are ignored.
pub fn parse_label_line(line: &str) -> Result<Option<YoloLabelRow>, LabelLineError> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    let mut tokens = [""; 5];
    let mut found = 0;
    for token in trimmed.split_whitespace().take(5) {
        tokens[found] = token;
        found += 1;
    }

    if found < 5 {
        return Err(LabelLineError::TooFewTokens { found });
    }

    let class_id = tokens[0]
        .parse::<i64>()
        .map_err(|_| LabelLineError::InvalidClassId {
            raw: tokens[0].to_string(),
        })?;

    let cx = parse_f64_token(tokens[1], "x_center")?;
    let cy = parse_f64_token(tokens[2], "y_center")?;
    let w = parse_f64_token(tokens[3], "width")?;
    let h = parse_f64_token(tokens[4], "height")?;

    Ok(Some(YoloLabelRow {
        class_id,
        bbox: BBoxCxCyWH::new(cx, cy, w, h),
    }))
}

/// Fuzz-only entrypoint for YOLO single-line parsing.
#[cfg(feature = "fuzzing")]
pub fn fuzz_parse_label_line(input: &str) -> Result<(), LabelLineError> {
    let _ = parse_label_line(input)?;
    Ok(())
}

/// Parses one box component. `NaN` and infinities are rejected because they
/// cannot be written as JSON numbers.
fn parse_f64_token(raw: &str, field: &'static str) -> Result<f64, LabelLineError> {
    raw.parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .ok_or_else(|| LabelLineError::InvalidNumber {
            field,
            raw: raw.to_string(),
        })
}
