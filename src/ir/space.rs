//! Coordinate space marker types.
//!
//! YOLO label rows live in [`Normalized`] space (fractions of the image
//! size); COCO boxes live in [`Pixel`] space. The markers are uninhabited,
//! so they only ever appear as type parameters.

use std::fmt;

/// Absolute pixel coordinates, origin at the top-left corner of the image.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub enum Pixel {}

/// Coordinates expressed as fractions of the image width/height.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub enum Normalized {}

impl fmt::Debug for Pixel {
    fn fmt(&self, _: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {}
    }
}

impl fmt::Debug for Normalized {
    fn fmt(&self, _: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {}
    }
}
