//! Post-selection mask refinement: feather, expand, contract, invert.
//!
//! Pure functions producing a new mask from a published one. Feathering
//! blurs the coverage channel with a separable Gaussian; expand/contract
//! apply an anti-aliased circular structuring element. All results go
//! through the tight-bounds constructor, so the mask invariants hold.

use ndarray::Array2;

use crate::mask::SelectionMask;
use crate::space::VirtualCoordinateSpace;

/// Soften the selection edge with a Gaussian blur of the coverage.
///
/// The result's bounds grow by the blur support (clipped to the space)
/// and are re-tightened afterwards. `sigma <= 0` returns the input
/// unchanged.
pub fn feather(
    mask: &SelectionMask,
    sigma: f32,
    space: &VirtualCoordinateSpace,
) -> SelectionMask {
    if mask.is_empty() || sigma <= 0.0 {
        return mask.clone();
    }

    let kernel = gaussian_kernel_1d(sigma);
    let half = kernel.len() / 2;
    let (ox, oy, padded) = padded_coverage(mask, half, space);
    let (h, w) = padded.dim();

    let mut temp = Array2::<f32>::zeros((h, w));
    let mut result = Array2::<f32>::zeros((h, w));

    // Horizontal pass
    for y in 0..h {
        for x in 0..w {
            let mut sum = 0.0f32;
            for (ki, &kv) in kernel.iter().enumerate() {
                let sx = (x as isize + ki as isize - half as isize).clamp(0, w as isize - 1);
                sum += padded[[y, sx as usize]] as f32 * kv;
            }
            temp[[y, x]] = sum;
        }
    }

    // Vertical pass
    for y in 0..h {
        for x in 0..w {
            let mut sum = 0.0f32;
            for (ki, &kv) in kernel.iter().enumerate() {
                let sy = (y as isize + ki as isize - half as isize).clamp(0, h as isize - 1);
                sum += temp[[sy as usize, x]] * kv;
            }
            result[[y, x]] = sum;
        }
    }

    let coverage = result.mapv(|v| v.clamp(0.0, 255.0).round() as u8);
    SelectionMask::from_coverage((ox, oy), coverage, mask.scope())
}

/// Grow the selection outward by `radius` pixels.
///
/// Anti-aliased: the coverage contribution falls off linearly within the
/// last pixel of the structuring element.
pub fn expand(
    mask: &SelectionMask,
    radius: f32,
    space: &VirtualCoordinateSpace,
) -> SelectionMask {
    if mask.is_empty() || radius <= 0.0 {
        return mask.clone();
    }

    let r_ceil = radius.ceil() as isize;
    let r_sq = radius * radius;
    let (ox, oy, padded) = padded_coverage(mask, r_ceil as usize, space);
    let (h, w) = padded.dim();

    let mut result = Array2::<u8>::zeros((h, w));
    for y in 0..h {
        for x in 0..w {
            let mut max_val = 0.0f32;
            for dy in -r_ceil..=r_ceil {
                let sy = y as isize + dy;
                if sy < 0 || sy >= h as isize {
                    continue;
                }
                for dx in -r_ceil..=r_ceil {
                    let sx = x as isize + dx;
                    if sx < 0 || sx >= w as isize {
                        continue;
                    }
                    let dist_sq = (dx * dx + dy * dy) as f32;
                    if dist_sq <= r_sq {
                        let v = padded[[sy as usize, sx as usize]] as f32;
                        // Linear falloff within the last pixel of the element
                        let edge_dist = radius - dist_sq.sqrt();
                        max_val = max_val.max(v * edge_dist.clamp(0.0, 1.0));
                    }
                }
            }
            result[[y, x]] = max_val.round().clamp(0.0, 255.0) as u8;
        }
    }

    SelectionMask::from_coverage((ox, oy), result, mask.scope())
}

/// Shrink the selection inward by `radius` pixels.
///
/// Pixels outside the mask bounds count as unselected, so the erosion
/// eats inward from every boundary. Contracting cannot grow the
/// selection, so no padding is needed.
pub fn contract(mask: &SelectionMask, radius: f32) -> SelectionMask {
    if mask.is_empty() || radius <= 0.0 {
        return mask.clone();
    }

    let bounds = mask.bounds();
    let cov = mask.coverage();
    let (h, w) = cov.dim();
    let r_ceil = radius.ceil() as isize;
    let r_sq = radius * radius;

    let mut result = Array2::<u8>::zeros((h, w));
    for y in 0..h {
        for x in 0..w {
            let mut min_val = 255u8;
            for dy in -r_ceil..=r_ceil {
                for dx in -r_ceil..=r_ceil {
                    let dist_sq = (dx * dx + dy * dy) as f32;
                    if dist_sq > r_sq {
                        continue;
                    }
                    let sy = y as isize + dy;
                    let sx = x as isize + dx;
                    if sy < 0 || sy >= h as isize || sx < 0 || sx >= w as isize {
                        min_val = 0;
                    } else {
                        min_val = min_val.min(cov[[sy as usize, sx as usize]]);
                    }
                }
            }
            result[[y, x]] = min_val;
        }
    }

    SelectionMask::from_coverage((bounds.x, bounds.y), result, mask.scope())
}

/// Complement the selection over the full addressing space.
pub fn invert(mask: &SelectionMask, space: &VirtualCoordinateSpace) -> SelectionMask {
    let (w, h) = (space.width(), space.height());
    let mut coverage = Array2::<u8>::zeros((h, w));
    for y in 0..h {
        for x in 0..w {
            coverage[[y, x]] = 255 - mask.coverage_at(x, y);
        }
    }
    SelectionMask::from_coverage((0, 0), coverage, mask.scope())
}

/// Coverage buffer of `mask` with `pad` pixels of zero padding on every
/// side, clipped to the space. Returns the padded buffer's origin.
fn padded_coverage(
    mask: &SelectionMask,
    pad: usize,
    space: &VirtualCoordinateSpace,
) -> (usize, usize, Array2<u8>) {
    let bounds = mask.bounds();
    let ox = bounds.x.saturating_sub(pad);
    let oy = bounds.y.saturating_sub(pad);
    let ex = (bounds.right() + pad).min(space.width());
    let ey = (bounds.bottom() + pad).min(space.height());

    let mut padded = Array2::<u8>::zeros((ey - oy, ex - ox));
    let cov = mask.coverage();
    for y in 0..bounds.height {
        for x in 0..bounds.width {
            padded[[bounds.y - oy + y, bounds.x - ox + x]] = cov[[y, x]];
        }
    }
    (ox, oy, padded)
}

/// Normalized 1D Gaussian kernel, size 6 sigma rounded to odd.
fn gaussian_kernel_1d(sigma: f32) -> Vec<f32> {
    let kernel_size = ((sigma * 6.0).ceil() as usize) | 1;
    let half = kernel_size / 2;

    let mut kernel: Vec<f32> = (0..kernel_size)
        .map(|i| {
            let x = i as f32 - half as f32;
            (-x * x / (2.0 * sigma * sigma)).exp()
        })
        .collect();

    let sum: f32 = kernel.iter().sum();
    for v in kernel.iter_mut() {
        *v /= sum;
    }
    kernel
}
