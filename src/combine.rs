//! Mask combination algebra.
//!
//! Pure functions merging an existing selection with a newly computed
//! region mask under a combine mode. Both operands must share a scope;
//! the result always carries tight bounds.

use ndarray::Array2;

use crate::error::SelectionError;
use crate::mask::SelectionMask;

/// The algebraic operator applied when merging a new region into the
/// existing selection. Chosen per gesture from modifier keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CombineMode {
    Replace,
    Add,
    Subtract,
    Intersect,
}

/// Combine `existing` and `incoming` under `mode`.
///
/// Per-pixel semantics:
/// - `Replace`: result = incoming, existing discarded
/// - `Add`: `max(existing, incoming)` over the union of bounds
/// - `Subtract`: `existing * (1 - incoming/255)` over existing's bounds
///   (subtracting can never grow the selection)
/// - `Intersect`: `min(existing, incoming)` over the bounds intersection
///
/// Bounds are recomputed to the tight non-zero extent afterwards, never
/// left at the union/intersection of inputs when those overestimate.
///
/// # Errors
/// `ScopeMismatch` if the operands address different pixel frames; this
/// is a bug in the calling layer, not a recoverable condition.
pub fn combine(
    existing: &SelectionMask,
    incoming: &SelectionMask,
    mode: CombineMode,
) -> Result<SelectionMask, SelectionError> {
    if existing.scope() != incoming.scope() {
        return Err(SelectionError::ScopeMismatch {
            existing: existing.scope(),
            incoming: incoming.scope(),
        });
    }
    let scope = existing.scope();

    let result = match mode {
        CombineMode::Replace => incoming.clone(),
        CombineMode::Add => {
            let rect = existing.bounds().union(&incoming.bounds());
            if rect.is_empty() {
                return Ok(SelectionMask::empty(scope));
            }
            let mut out = Array2::<u8>::zeros((rect.height, rect.width));
            for y in 0..rect.height {
                for x in 0..rect.width {
                    let gx = rect.x + x;
                    let gy = rect.y + y;
                    out[[y, x]] = existing.coverage_at(gx, gy).max(incoming.coverage_at(gx, gy));
                }
            }
            SelectionMask::from_coverage((rect.x, rect.y), out, scope)
        }
        CombineMode::Subtract => {
            let rect = existing.bounds();
            if rect.is_empty() {
                return Ok(SelectionMask::empty(scope));
            }
            let mut out = Array2::<u8>::zeros((rect.height, rect.width));
            for y in 0..rect.height {
                for x in 0..rect.width {
                    let gx = rect.x + x;
                    let gy = rect.y + y;
                    let e = existing.coverage_at(gx, gy) as u16;
                    let i = incoming.coverage_at(gx, gy) as u16;
                    out[[y, x]] = (e * (255 - i) / 255) as u8;
                }
            }
            SelectionMask::from_coverage((rect.x, rect.y), out, scope)
        }
        CombineMode::Intersect => {
            let rect = existing.bounds().intersection(&incoming.bounds());
            if rect.is_empty() {
                return Ok(SelectionMask::empty(scope));
            }
            let mut out = Array2::<u8>::zeros((rect.height, rect.width));
            for y in 0..rect.height {
                for x in 0..rect.width {
                    let gx = rect.x + x;
                    let gy = rect.y + y;
                    out[[y, x]] = existing.coverage_at(gx, gy).min(incoming.coverage_at(gx, gy));
                }
            }
            SelectionMask::from_coverage((rect.x, rect.y), out, scope)
        }
    };

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::PixelRect;
    use crate::space::{ObjectId, Scope};
    use ndarray::Array2;

    fn solid(x: usize, y: usize, w: usize, h: usize) -> SelectionMask {
        SelectionMask::from_coverage((x, y), Array2::from_elem((h, w), 255), Scope::Global)
    }

    #[test]
    fn test_replace_returns_incoming() {
        let existing = solid(0, 0, 10, 10);
        let incoming = solid(20, 20, 5, 5);
        let result = combine(&existing, &incoming, CombineMode::Replace).unwrap();
        assert_eq!(result, incoming);
    }

    #[test]
    fn test_add_is_per_pixel_max() {
        let a = SelectionMask::from_coverage(
            (0, 0),
            Array2::from_elem((4, 4), 100),
            Scope::Global,
        );
        let b = SelectionMask::from_coverage(
            (2, 2),
            Array2::from_elem((4, 4), 200),
            Scope::Global,
        );
        let result = combine(&a, &b, CombineMode::Add).unwrap();
        assert_eq!(result.bounds(), PixelRect::new(0, 0, 6, 6));
        assert_eq!(result.coverage_at(0, 0), 100);
        assert_eq!(result.coverage_at(3, 3), 200);
        assert_eq!(result.coverage_at(5, 5), 200);
    }

    #[test]
    fn test_subtract_overlap_scenario() {
        // Full 10x10 at origin minus full 10x10 at (5,5)
        let existing = solid(0, 0, 10, 10);
        let incoming = solid(5, 5, 10, 10);
        let result = combine(&existing, &incoming, CombineMode::Subtract).unwrap();
        assert_eq!(result.bounds(), PixelRect::new(0, 0, 10, 10));
        // Overlap {5,5,5,5} zeroed
        for y in 5..10 {
            for x in 5..10 {
                assert_eq!(result.coverage_at(x, y), 0);
            }
        }
        assert_eq!(result.coverage_at(4, 4), 255);
        assert_eq!(result.coverage_at(0, 9), 255);
    }

    #[test]
    fn test_subtract_cannot_grow() {
        let existing = solid(0, 0, 5, 5);
        let incoming = solid(20, 20, 50, 50);
        let result = combine(&existing, &incoming, CombineMode::Subtract).unwrap();
        assert_eq!(result.bounds(), existing.bounds());
    }

    #[test]
    fn test_intersect_is_per_pixel_min() {
        let a = solid(0, 0, 10, 10);
        let b = solid(5, 5, 10, 10);
        let result = combine(&a, &b, CombineMode::Intersect).unwrap();
        assert_eq!(result.bounds(), PixelRect::new(5, 5, 5, 5));
        assert_eq!(result.coverage_at(5, 5), 255);
        assert_eq!(result.coverage_at(4, 4), 0);
    }

    #[test]
    fn test_intersect_disjoint_is_empty() {
        let a = solid(0, 0, 5, 5);
        let b = solid(10, 10, 5, 5);
        let result = combine(&a, &b, CombineMode::Intersect).unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn test_algebraic_identities() {
        let m = solid(3, 3, 7, 7);
        let empty = SelectionMask::empty(Scope::Global);

        // M ∩ M == M
        assert_eq!(combine(&m, &m, CombineMode::Intersect).unwrap(), m);
        // M + empty == M
        assert_eq!(combine(&m, &empty, CombineMode::Add).unwrap(), m);
        // M - M == empty
        assert!(combine(&m, &m, CombineMode::Subtract).unwrap().is_empty());
    }

    #[test]
    fn test_add_recomputes_tight_bounds() {
        // Two masks whose union rect has empty border rows after max()
        let mut buf = Array2::<u8>::zeros((5, 5));
        buf[[2, 2]] = 255;
        let a = SelectionMask::from_coverage((0, 0), buf, Scope::Global);
        let b = SelectionMask::empty(Scope::Global);
        let result = combine(&a, &b, CombineMode::Add).unwrap();
        assert_eq!(result.bounds(), PixelRect::new(2, 2, 1, 1));
    }

    #[test]
    fn test_scope_mismatch_is_error() {
        let a = solid(0, 0, 4, 4);
        let b = SelectionMask::from_coverage(
            (0, 0),
            Array2::from_elem((4, 4), 255),
            Scope::Object(ObjectId(7)),
        );
        let err = combine(&a, &b, CombineMode::Add);
        assert!(matches!(
            err,
            Err(crate::error::SelectionError::ScopeMismatch { .. })
        ));
    }
}
