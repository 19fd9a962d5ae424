//! Bounding box types for both sides of the conversion.
//!
//! - [`BBoxCxCyWH`] is the YOLO representation: center point plus size.
//! - [`BBoxXYWH`] is the COCO representation: top-left corner plus size.
//!
//! Neither type enforces positive sizes or in-bounds coordinates. Label files
//! are trusted as-is, so a box that hangs off the image edge converts to one
//! that does the same.

use std::marker::PhantomData;

use serde::{Deserialize, Serialize};

use super::{Normalized, Pixel};

/// A center-based box `(cx, cy, w, h)`.
#[derive(Clone, Copy, PartialEq)]
pub struct BBoxCxCyWH<TSpace> {
    pub cx: f64,
    pub cy: f64,
    pub w: f64,
    pub h: f64,
    _space: PhantomData<TSpace>,
}

impl<TSpace> BBoxCxCyWH<TSpace> {
    #[inline]
    pub fn new(cx: f64, cy: f64, w: f64, h: f64) -> Self {
        Self {
            cx,
            cy,
            w,
            h,
            _space: PhantomData,
        }
    }
}

impl BBoxCxCyWH<Normalized> {
    /// Scales a normalized center box to an absolute top-left box.
    ///
    /// `abs_w = w * W`, `abs_h = h * H`, and the corner is the scaled center
    /// minus half the scaled size.
    pub fn to_pixel_xywh(&self, image_width: u32, image_height: u32) -> BBoxXYWH<Pixel> {
        let image_width = f64::from(image_width);
        let image_height = f64::from(image_height);

        let abs_w = self.w * image_width;
        let abs_h = self.h * image_height;
        let abs_x = self.cx * image_width - abs_w / 2.0;
        let abs_y = self.cy * image_height - abs_h / 2.0;

        BBoxXYWH::new(abs_x, abs_y, abs_w, abs_h)
    }
}

impl<TSpace> std::fmt::Debug for BBoxCxCyWH<TSpace> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BBoxCxCyWH")
            .field("cx", &self.cx)
            .field("cy", &self.cy)
            .field("w", &self.w)
            .field("h", &self.h)
            .finish()
    }
}

/// A top-left based box `(x, y, w, h)`.
#[derive(Clone, Copy, PartialEq)]
pub struct BBoxXYWH<TSpace> {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
    _space: PhantomData<TSpace>,
}

impl<TSpace> BBoxXYWH<TSpace> {
    #[inline]
    pub fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self {
            x,
            y,
            w,
            h,
            _space: PhantomData,
        }
    }

    /// Returns `w * h`. May be negative for boxes with a negative size.
    #[inline]
    pub fn area(&self) -> f64 {
        self.w * self.h
    }

    #[inline]
    pub fn to_array(&self) -> [f64; 4] {
        [self.x, self.y, self.w, self.h]
    }
}

impl<TSpace> std::fmt::Debug for BBoxXYWH<TSpace> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BBoxXYWH")
            .field("x", &self.x)
            .field("y", &self.y)
            .field("w", &self.w)
            .field("h", &self.h)
            .finish()
    }
}

// COCO writes boxes as a bare `[x, y, w, h]` array. Hand-written so the
// marker type does not pick up Serialize/Deserialize bounds.
impl<TSpace> Serialize for BBoxXYWH<TSpace> {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_array().serialize(serializer)
    }
}

impl<'de, TSpace> Deserialize<'de> for BBoxXYWH<TSpace> {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let [x, y, w, h] = <[f64; 4]>::deserialize(deserializer)?;
        Ok(Self::new(x, y, w, h))
    }
}
