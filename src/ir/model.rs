//! COCO-shaped dataset model for one converted partition.
//!
//! The field names and their order match the COCO detection layout, so the
//! structs serialize directly into the output document.

use serde::{Deserialize, Serialize};

use super::bbox::BBoxXYWH;
use super::ids::{AnnotationId, CategoryId, ImageId};
use super::space::Pixel;

pub const DEFAULT_DESCRIPTION: &str = "Converted from YOLO format";

/// A complete detection dataset for a single partition.
///
/// Built in memory by the partition converter and written once.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Dataset {
    #[serde(default)]
    pub info: DatasetInfo,

    /// Always written, even when empty.
    #[serde(default)]
    pub licenses: Vec<License>,

    pub categories: Vec<Category>,

    pub images: Vec<Image>,

    pub annotations: Vec<Annotation>,
}

impl Dataset {
    /// Creates an empty dataset with the given `info.description`.
    pub fn with_description(description: impl Into<String>) -> Self {
        Self {
            info: DatasetInfo {
                description: Some(description.into()),
            },
            ..Default::default()
        }
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct DatasetInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// A COCO license entry. The converter never produces any, but the list is
/// part of the document shape.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct License {
    pub id: u64,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// A category (class label).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub supercategory: String,
}

impl Category {
    pub fn new(
        id: impl Into<CategoryId>,
        name: impl Into<String>,
        supercategory: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            supercategory: supercategory.into(),
        }
    }
}

/// An image record. `file_name` is the bare file name inside the
/// partition's images directory.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Image {
    pub id: ImageId,
    pub file_name: String,
    pub width: u32,
    pub height: u32,
}

impl Image {
    pub fn new(
        id: impl Into<ImageId>,
        file_name: impl Into<String>,
        width: u32,
        height: u32,
    ) -> Self {
        Self {
            id: id.into(),
            file_name: file_name.into(),
            width,
            height,
        }
    }
}

/// A single bounding-box annotation.
///
/// `area` is always `bbox.w * bbox.h` and `iscrowd` is always 0 for
/// annotations built with [`Annotation::new`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    pub id: AnnotationId,
    pub image_id: ImageId,
    pub category_id: CategoryId,
    pub bbox: BBoxXYWH<Pixel>,
    pub area: f64,
    pub iscrowd: u8,
}

impl Annotation {
    pub fn new(
        id: impl Into<AnnotationId>,
        image_id: impl Into<ImageId>,
        category_id: impl Into<CategoryId>,
        bbox: BBoxXYWH<Pixel>,
    ) -> Self {
        Self {
            id: id.into(),
            image_id: image_id.into(),
            category_id: category_id.into(),
            area: bbox.area(),
            bbox,
            iscrowd: 0,
        }
    }
}
