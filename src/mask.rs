//! The published selection state: a dense coverage mask with tight bounds.
//!
//! Coverage is one byte per pixel: 0 = unselected, 255 = fully selected,
//! intermediate values represent partial (anti-aliased or feathered)
//! selection. Pixels outside `bounds` are implicitly 0 and never
//! materialized.

use ndarray::{s, Array2};

use crate::error::SelectionError;
use crate::geometry::PixelRect;
use crate::space::{Scope, VirtualCoordinateSpace};

/// A selection mask: tight bounds, per-pixel coverage and a scope.
///
/// Invariants (maintained by every constructor):
/// - `coverage` has shape `(bounds.height, bounds.width)`
/// - `bounds` tightly encloses every non-zero pixel: no border row or
///   column of the buffer is entirely zero
/// - an empty selection has zero-area bounds and an empty buffer
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionMask {
    bounds: PixelRect,
    coverage: Array2<u8>,
    scope: Scope,
}

impl SelectionMask {
    /// The empty selection for a scope.
    pub fn empty(scope: Scope) -> Self {
        SelectionMask {
            bounds: PixelRect::EMPTY,
            coverage: Array2::zeros((0, 0)),
            scope,
        }
    }

    /// Fully selected mask covering the whole addressing space.
    pub fn full(space: &VirtualCoordinateSpace, scope: Scope) -> Self {
        SelectionMask {
            bounds: space.bounds(),
            coverage: Array2::from_elem((space.height(), space.width()), 255),
            scope,
        }
    }

    /// Build a mask from a coverage buffer positioned at `origin`,
    /// tightening the bounds to the non-zero extent.
    ///
    /// An all-zero buffer yields the empty mask. This is the canonical
    /// path every mask producer (rasterizer, grower, combiner) goes
    /// through, so the tight-bounds invariant holds crate-wide.
    pub fn from_coverage(origin: (usize, usize), coverage: Array2<u8>, scope: Scope) -> Self {
        let (h, w) = coverage.dim();
        match tight_extent(&coverage, w, h) {
            None => SelectionMask::empty(scope),
            Some((x0, y0, x1, y1)) => {
                let tight = if x0 == 0 && y0 == 0 && x1 == w && y1 == h {
                    coverage
                } else {
                    coverage.slice(s![y0..y1, x0..x1]).to_owned()
                };
                SelectionMask {
                    bounds: PixelRect::new(origin.0 + x0, origin.1 + y0, x1 - x0, y1 - y0),
                    coverage: tight,
                    scope,
                }
            }
        }
    }

    /// Build a mask from a flat buffer, validating dimensions.
    ///
    /// For external callers (persistence, bindings) that hand over raw
    /// bytes; internal producers use [`SelectionMask::from_coverage`].
    pub fn from_raw(
        bounds: PixelRect,
        buffer: Vec<u8>,
        scope: Scope,
    ) -> Result<Self, SelectionError> {
        if bounds.width == 0 || bounds.height == 0 || buffer.len() != bounds.area() {
            return Err(SelectionError::InvalidDimensions {
                width: bounds.width,
                height: bounds.height,
                len: buffer.len(),
            });
        }
        let coverage = Array2::from_shape_vec((bounds.height, bounds.width), buffer).map_err(
            |_| SelectionError::InvalidDimensions {
                width: bounds.width,
                height: bounds.height,
                len: bounds.area(),
            },
        )?;
        Ok(SelectionMask::from_coverage((bounds.x, bounds.y), coverage, scope))
    }

    pub fn bounds(&self) -> PixelRect {
        self.bounds
    }

    pub fn scope(&self) -> Scope {
        self.scope
    }

    pub fn is_empty(&self) -> bool {
        self.bounds.is_empty()
    }

    /// Coverage buffer, `(bounds.height, bounds.width)`.
    pub fn coverage(&self) -> &Array2<u8> {
        &self.coverage
    }

    /// Coverage at a virtual-space pixel; implicitly 0 outside bounds.
    pub fn coverage_at(&self, x: usize, y: usize) -> u8 {
        if self.bounds.contains(x, y) {
            self.coverage[[y - self.bounds.y, x - self.bounds.x]]
        } else {
            0
        }
    }

    /// Number of pixels with non-zero coverage.
    pub fn selected_area(&self) -> usize {
        self.coverage.iter().filter(|&&v| v > 0).count()
    }
}

/// Tight non-zero extent of a buffer as `(x0, y0, x1, y1)` (exclusive
/// ends), or `None` if every value is zero.
fn tight_extent(coverage: &Array2<u8>, w: usize, h: usize) -> Option<(usize, usize, usize, usize)> {
    let mut min_x = w;
    let mut min_y = h;
    let mut max_x = 0usize;
    let mut max_y = 0usize;
    let mut any = false;

    for y in 0..h {
        for x in 0..w {
            if coverage[[y, x]] > 0 {
                any = true;
                min_x = min_x.min(x);
                min_y = min_y.min(y);
                max_x = max_x.max(x);
                max_y = max_y.max(y);
            }
        }
    }

    if any {
        Some((min_x, min_y, max_x + 1, max_y + 1))
    } else {
        None
    }
}
