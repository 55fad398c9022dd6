// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Geometric utility functions.
//!
//! This module provides utilities for coordinate transformations between
//! pixel coordinates, normalized coordinates (0.0 to 1.0) and the
//! unit-height convention used by RV session files, where y spans
//! [-0.5, 0.5] and x spans [-aspect/2, aspect/2].

use crate::error::GeometryError;
use crate::models::annotation::Point;

/// Pen widths are stored in session files divided by this factor.
pub const PEN_WIDTH_SCALE: f32 = 500.0;

/// Font sizes are stored in session files divided by this factor.
pub const FONT_SIZE_SCALE: f32 = 2000.0;

/// Width over height of the annotated media.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AspectRatio(f64);

impl AspectRatio {
    pub const SQUARE: AspectRatio = AspectRatio(1.0);

    /// Aspect ratio of a `width` x `height` image. Zero dimensions are an
    /// error.
    pub fn new(width: u32, height: u32) -> Result<Self, GeometryError> {
        if width == 0 || height == 0 {
            return Err(GeometryError::InvalidDimensions { width, height });
        }
        Ok(Self(width as f64 / height as f64))
    }

    /// Aspect ratio from a raw ratio, rejecting non-positive or non-finite
    /// values.
    pub fn from_ratio(ratio: f64) -> Result<Self, GeometryError> {
        if !ratio.is_finite() || ratio <= 0.0 {
            return Err(GeometryError::InvalidAspect(ratio));
        }
        Ok(Self(ratio))
    }

    /// Like [`AspectRatio::new`], but falls back to a square aspect when
    /// the dimensions are unknown.
    pub fn or_square(width: u32, height: u32) -> Self {
        match Self::new(width, height) {
            Ok(aspect) => aspect,
            Err(e) => {
                log::warn!("{}, assuming square aspect", e);
                Self::SQUARE
            }
        }
    }

    pub fn value(&self) -> f64 {
        self.0
    }
}

/// Convert unit-height coordinates to normalized coordinates.
pub fn unit_height_to_normalized(point: Point, aspect: AspectRatio) -> Point {
    let aspect = aspect.value();
    Point {
        x: (point.x + aspect / 2.0) / aspect,
        y: point.y + 0.5,
    }
}

/// Convert normalized coordinates to unit-height coordinates.
pub fn normalized_to_unit_height(point: Point, aspect: AspectRatio) -> Point {
    let aspect = aspect.value();
    Point {
        x: point.x * aspect - aspect / 2.0,
        y: point.y - 0.5,
    }
}

pub fn pen_width_to_stored(width: f32) -> f32 {
    width / PEN_WIDTH_SCALE
}

pub fn pen_width_from_stored(stored: f32) -> f32 {
    stored * PEN_WIDTH_SCALE
}

pub fn font_size_to_stored(size: f32) -> f32 {
    size / FONT_SIZE_SCALE
}

pub fn font_size_from_stored(stored: f32) -> f32 {
    stored * FONT_SIZE_SCALE
}

/// Convert pixel coordinates to normalized coordinates (0.0 to 1.0).
pub fn normalize_coordinates(
    pixel_x: f64,
    pixel_y: f64,
    width: u32,
    height: u32,
) -> Result<Point, GeometryError> {
    if width == 0 || height == 0 {
        return Err(GeometryError::InvalidDimensions { width, height });
    }
    Ok(Point {
        x: pixel_x / width as f64,
        y: pixel_y / height as f64,
    })
}

/// Convert normalized coordinates to pixel coordinates.
pub fn denormalize_coordinates(point: &Point, width: u32, height: u32) -> (f64, f64) {
    (point.x * width as f64, point.y * height as f64)
}
