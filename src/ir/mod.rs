//! Dataset types and format I/O for yolo2coco.
//!
//! The model is COCO-shaped: a converted partition is a [`Dataset`] whose
//! serialized form is the output document. YOLO data never gets a model of
//! its own; label rows are parsed and transformed on the fly by
//! [`io_yolo`].
//!
//! # Design Principles
//!
//! 1. **Type Safety**: id newtypes keep image, annotation, and category ids
//!    apart, and coordinate space markers keep normalized YOLO boxes from
//!    being mistaken for pixel COCO boxes.
//!
//! 2. **Permissive Construction**: boxes are not clamped or checked. Label
//!    files are trusted, and anything suspicious is reported rather than
//!    rejected.
//!
//! # Example
//!
//! ```
//! use yolo2coco::ir::{Annotation, BBoxCxCyWH, Category, Dataset, Image, Normalized};
//!
//! let bbox = BBoxCxCyWH::<Normalized>::new(0.5, 0.5, 0.2, 0.2).to_pixel_xywh(100, 100);
//! let dataset = Dataset {
//!     categories: vec![Category::new(0i64, "body", "object")],
//!     images: vec![Image::new(0u64, "cow.jpg", 100, 100)],
//!     annotations: vec![Annotation::new(0u64, 0u64, 0i64, bbox)],
//!     ..Default::default()
//! };
//! assert_eq!(dataset.annotations[0].area, 400.0);
//! ```

mod bbox;
mod ids;
pub mod io_coco_json;
pub mod io_yolo;
mod model;
mod space;

pub use bbox::{BBoxCxCyWH, BBoxXYWH};
pub use ids::{AnnotationId, CategoryId, ImageId};
pub use model::{Annotation, Category, Dataset, DatasetInfo, Image, License, DEFAULT_DESCRIPTION};
pub use space::{Normalized, Pixel};
