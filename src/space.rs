//! Virtual coordinate space and selection scope.
//!
//! Selections are addressed in a fixed-size virtual space, decoupled from
//! the current viewport zoom/pan, so a selection survives navigation. A
//! selection is scoped either to the whole raster (`Global`) or to one
//! object's local pixel frame (`Object`).

use crate::error::SelectionError;
use crate::geometry::{PixelRect, Point};

/// Identifier of an object on the canvas, assigned by the host editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObjectId(pub u64);

/// Which pixel frame a selection addresses.
///
/// Masks of different scopes are never combined without an explicit
/// reprojection step in the host; the combiner enforces this.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    /// The whole raster.
    Global,
    /// One object's local frame.
    Object(ObjectId),
}

/// Fixed-size addressing space for selections.
///
/// Out-of-bounds coordinates are clamped to the valid region rather than
/// rejected, so a gesture dragged off-canvas still produces a
/// deterministic result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VirtualCoordinateSpace {
    width: usize,
    height: usize,
}

impl VirtualCoordinateSpace {
    pub fn new(width: usize, height: usize) -> Result<Self, SelectionError> {
        if width == 0 || height == 0 {
            return Err(SelectionError::InvalidSpace { width, height });
        }
        Ok(VirtualCoordinateSpace { width, height })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// The full addressable region as a rectangle.
    pub fn bounds(&self) -> PixelRect {
        PixelRect::new(0, 0, self.width, self.height)
    }

    /// Clamp a sub-pixel point into the addressable region.
    pub fn clamp_point(&self, p: Point) -> Point {
        Point::new(
            p.x.clamp(0.0, self.width as f32),
            p.y.clamp(0.0, self.height as f32),
        )
    }

    /// Clamp a sub-pixel point to the nearest addressable pixel index.
    pub fn clamp_pixel(&self, p: Point) -> (usize, usize) {
        let x = (p.x.floor().max(0.0) as usize).min(self.width - 1);
        let y = (p.y.floor().max(0.0) as usize).min(self.height - 1);
        (x, y)
    }

    /// Clip a rectangle to the addressable region.
    pub fn clip_rect(&self, rect: &PixelRect) -> PixelRect {
        rect.intersection(&self.bounds())
    }
}
