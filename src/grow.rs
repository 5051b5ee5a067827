//! Similarity-based region growing: magic wand and quick selection.
//!
//! Contiguous growth is a breadth-first flood fill over 4-connected
//! neighbors; non-contiguous growth tests every pixel of the addressed
//! region independently. Both use Euclidean RGBA color distance against
//! the seed color. Edge-aware growth tightens the tolerance to half on
//! pixels whose local gradient marks them as an edge, producing tighter
//! boundaries at high-contrast edges.

use std::collections::{HashSet, VecDeque};

use ndarray::{s, Array2, Array3};
use rayon::prelude::*;

use crate::combine::{combine, CombineMode};
use crate::geometry::{PixelRect, Point};
use crate::mask::SelectionMask;
use crate::space::{Scope, VirtualCoordinateSpace};

/// Local gradient magnitude (sum of absolute channel differences to the
/// 4 neighbors) above which a pixel is treated as an edge pixel.
///
/// Edge pixels must match within half tolerance when `edge_aware` is
/// set.
pub const EDGE_GRADIENT_THRESHOLD: u32 = 128;

/// Per-operation similarity parameters, supplied by the caller.
///
/// Not persisted as part of the mask: the mask records the resulting
/// coverage, not how it was produced.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToleranceProfile {
    /// Maximum Euclidean RGBA distance to the seed color (0-255).
    pub color_tolerance: u8,
    /// Flood fill from the seed (true) or global threshold (false).
    pub contiguous: bool,
    /// Tighten tolerance to half on high-gradient pixels.
    pub edge_aware: bool,
}

impl Default for ToleranceProfile {
    fn default() -> Self {
        ToleranceProfile {
            color_tolerance: 32,
            contiguous: true,
            edge_aware: false,
        }
    }
}

/// Read-only access to raster pixels, the only capability the engine
/// needs from the storage layer.
pub trait PixelSource {
    /// RGBA pixels for a region, shape `(bounds.height, bounds.width, 4)`.
    ///
    /// `scope` selects the canvas-wide raster or one object's local
    /// bitmap; the requested bounds are always inside the corresponding
    /// addressing space.
    fn read_region(&self, bounds: &PixelRect, scope: Scope) -> Array3<u8>;
}

/// In-memory pixel source over a single RGBA buffer. Used by tests and
/// flat-buffer bindings; ignores scope.
pub struct BufferPixelSource {
    pixels: Array3<u8>,
}

impl BufferPixelSource {
    /// Wrap an RGBA buffer of shape `(height, width, 4)`.
    pub fn new(pixels: Array3<u8>) -> Self {
        BufferPixelSource { pixels }
    }
}

impl PixelSource for BufferPixelSource {
    fn read_region(&self, bounds: &PixelRect, _scope: Scope) -> Array3<u8> {
        self.pixels
            .slice(s![
                bounds.y..bounds.bottom(),
                bounds.x..bounds.right(),
                ..
            ])
            .to_owned()
    }
}

/// Grow a selection from a seed point.
///
/// The seed is clamped into the addressable space, so a seed on or past
/// the boundary still produces a deterministic result. An empty result
/// (no pixel matches) is success, not failure.
pub fn grow(
    seed: Point,
    profile: &ToleranceProfile,
    source: &dyn PixelSource,
    space: &VirtualCoordinateSpace,
    scope: Scope,
) -> SelectionMask {
    let region = source.read_region(&space.bounds(), scope);
    let (h, w) = (region.shape()[0], region.shape()[1]);
    if h == 0 || w == 0 {
        return SelectionMask::empty(scope);
    }

    let (sx, sy) = space.clamp_pixel(seed);
    let seed_color = pixel_at(&region, sx, sy);

    let coverage = if profile.contiguous {
        flood_fill(&region, w, h, sx, sy, seed_color, profile)
    } else {
        global_threshold(&region, w, h, seed_color, profile)
    };

    SelectionMask::from_coverage((0, 0), coverage, scope)
}

/// Breadth-first flood fill over 4-connected neighbors.
fn flood_fill(
    region: &Array3<u8>,
    w: usize,
    h: usize,
    sx: usize,
    sy: usize,
    seed_color: [u8; 4],
    profile: &ToleranceProfile,
) -> Array2<u8> {
    let mut coverage = Array2::<u8>::zeros((h, w));
    let mut visited = vec![false; w * h];
    let mut queue = VecDeque::new();

    queue.push_back((sx, sy));
    visited[sy * w + sx] = true;

    while let Some((x, y)) = queue.pop_front() {
        if !matches(region, w, h, x, y, seed_color, profile) {
            continue;
        }
        coverage[[y, x]] = 255;

        for (dx, dy) in [(-1i32, 0i32), (1, 0), (0, -1), (0, 1)] {
            let nx = x as i32 + dx;
            let ny = y as i32 + dy;
            if nx >= 0 && nx < w as i32 && ny >= 0 && ny < h as i32 {
                let idx = ny as usize * w + nx as usize;
                if !visited[idx] {
                    visited[idx] = true;
                    queue.push_back((nx as usize, ny as usize));
                }
            }
        }
    }

    coverage
}

/// Independent per-pixel test against the seed color, no connectivity.
fn global_threshold(
    region: &Array3<u8>,
    w: usize,
    h: usize,
    seed_color: [u8; 4],
    profile: &ToleranceProfile,
) -> Array2<u8> {
    let mut buf = vec![0u8; w * h];
    buf.par_chunks_mut(w).enumerate().for_each(|(y, row)| {
        for (x, out) in row.iter_mut().enumerate() {
            if matches(region, w, h, x, y, seed_color, profile) {
                *out = 255;
            }
        }
    });
    Array2::from_shape_vec((h, w), buf).expect("row buffer matches region dimensions")
}

/// Incremental brush-driven region growing for the quick-selection tool.
///
/// Invoked repeatedly with a moving brush center as the pointer drags.
/// Each invocation grows contiguously from the brush center but only
/// within the brush disc, and its result is unioned into the gesture's
/// running mask. Spatial tiles already processed in the current gesture
/// are skipped (tile size = brush radius), so drag cost is proportional
/// to newly covered area, not total drag length.
pub struct QuickSelection {
    radius: usize,
    profile: ToleranceProfile,
    scope: Scope,
    visited_tiles: HashSet<(usize, usize)>,
    mask: SelectionMask,
}

impl QuickSelection {
    pub fn new(radius: usize, profile: ToleranceProfile, scope: Scope) -> Self {
        QuickSelection {
            radius: radius.max(1),
            profile,
            scope,
            visited_tiles: HashSet::new(),
            mask: SelectionMask::empty(scope),
        }
    }

    /// The gesture's running mask so far.
    pub fn mask(&self) -> &SelectionMask {
        &self.mask
    }

    /// Grow at a brush position; returns false when the disc lies
    /// entirely in already-processed tiles and nothing was done.
    pub fn grow_at(
        &mut self,
        center: Point,
        source: &dyn PixelSource,
        space: &VirtualCoordinateSpace,
    ) -> bool {
        let (cx, cy) = space.clamp_pixel(center);
        let r = self.radius;

        let x0 = cx.saturating_sub(r);
        let y0 = cy.saturating_sub(r);
        let x1 = (cx + r + 1).min(space.width());
        let y1 = (cy + r + 1).min(space.height());

        // Tile dedup: skip only if every tile the disc touches was seen
        let tile = r;
        let mut fresh = false;
        for ty in (y0 / tile)..=((y1 - 1) / tile) {
            for tx in (x0 / tile)..=((x1 - 1) / tile) {
                if self.visited_tiles.insert((tx, ty)) {
                    fresh = true;
                }
            }
        }
        if !fresh {
            return false;
        }

        let rect = PixelRect::new(x0, y0, x1 - x0, y1 - y0);
        let region = source.read_region(&rect, self.scope);
        let (h, w) = (rect.height, rect.width);

        let lx = cx - x0;
        let ly = cy - y0;
        let seed_color = pixel_at(&region, lx, ly);
        let r_sq = (r * r) as i64;

        // Disc-bounded flood fill from the brush center
        let mut coverage = Array2::<u8>::zeros((h, w));
        let mut visited = vec![false; w * h];
        let mut queue = VecDeque::new();
        queue.push_back((lx, ly));
        visited[ly * w + lx] = true;

        while let Some((x, y)) = queue.pop_front() {
            let dx = (x0 + x) as i64 - cx as i64;
            let dy = (y0 + y) as i64 - cy as i64;
            if dx * dx + dy * dy > r_sq {
                continue;
            }
            if !matches(&region, w, h, x, y, seed_color, &self.profile) {
                continue;
            }
            coverage[[y, x]] = 255;

            for (ddx, ddy) in [(-1i32, 0i32), (1, 0), (0, -1), (0, 1)] {
                let nx = x as i32 + ddx;
                let ny = y as i32 + ddy;
                if nx >= 0 && nx < w as i32 && ny >= 0 && ny < h as i32 {
                    let idx = ny as usize * w + nx as usize;
                    if !visited[idx] {
                        visited[idx] = true;
                        queue.push_back((nx as usize, ny as usize));
                    }
                }
            }
        }

        let piece = SelectionMask::from_coverage((x0, y0), coverage, self.scope);
        if !piece.is_empty() {
            self.mask = combine(&self.mask, &piece, CombineMode::Add)
                .expect("running mask and growth piece share a scope");
        }
        true
    }

    /// Finalize the gesture and yield the accumulated mask.
    pub fn finish(self) -> SelectionMask {
        self.mask
    }
}

/// Whether the pixel matches the seed color under the profile.
#[inline]
fn matches(
    region: &Array3<u8>,
    w: usize,
    h: usize,
    x: usize,
    y: usize,
    seed_color: [u8; 4],
    profile: &ToleranceProfile,
) -> bool {
    let mut tolerance = profile.color_tolerance as f32;
    if profile.edge_aware && gradient_at(region, w, h, x, y) > EDGE_GRADIENT_THRESHOLD {
        tolerance /= 2.0;
    }
    color_distance(pixel_at(region, x, y), seed_color) <= tolerance
}

#[inline]
fn pixel_at(region: &Array3<u8>, x: usize, y: usize) -> [u8; 4] {
    [
        region[[y, x, 0]],
        region[[y, x, 1]],
        region[[y, x, 2]],
        region[[y, x, 3]],
    ]
}

/// Euclidean distance over the 4 RGBA channels.
#[inline]
fn color_distance(a: [u8; 4], b: [u8; 4]) -> f32 {
    let dr = a[0] as f32 - b[0] as f32;
    let dg = a[1] as f32 - b[1] as f32;
    let db = a[2] as f32 - b[2] as f32;
    let da = a[3] as f32 - b[3] as f32;
    (dr * dr + dg * dg + db * db + da * da).sqrt()
}

/// Local gradient magnitude: sum of absolute channel differences to the
/// 4-connected neighbors.
#[inline]
fn gradient_at(region: &Array3<u8>, w: usize, h: usize, x: usize, y: usize) -> u32 {
    let center = pixel_at(region, x, y);
    let mut sum = 0u32;
    for (dx, dy) in [(-1i32, 0i32), (1, 0), (0, -1), (0, 1)] {
        let nx = x as i32 + dx;
        let ny = y as i32 + dy;
        if nx >= 0 && nx < w as i32 && ny >= 0 && ny < h as i32 {
            let n = pixel_at(region, nx as usize, ny as usize);
            for c in 0..4 {
                sum += (center[c] as i32 - n[c] as i32).unsigned_abs();
            }
        }
    }
    sum
}
