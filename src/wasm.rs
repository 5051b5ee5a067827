//! WebAssembly exports for the selection engine.
//!
//! Flat-buffer entry points exposed to JavaScript via wasm-bindgen for a
//! browser-hosted editor shell. Masks cross the boundary as full-size
//! `width * height` coverage buffers; the typed [`crate::SelectionMask`]
//! API is for Rust hosts.

use ndarray::Array3;
use wasm_bindgen::prelude::*;

use crate::combine::{combine, CombineMode};
use crate::geometry::{PixelRect, Point};
use crate::grow::{grow, BufferPixelSource, ToleranceProfile};
use crate::mask::SelectionMask;
use crate::rasterize::{rasterize, Shape};
use crate::space::{Scope, VirtualCoordinateSpace};

/// Expand a mask into a full-size coverage buffer.
fn flatten(mask: &SelectionMask, width: usize, height: usize) -> Vec<u8> {
    let mut out = vec![0u8; width * height];
    let bounds = mask.bounds();
    for y in bounds.y..bounds.bottom().min(height) {
        for x in bounds.x..bounds.right().min(width) {
            out[y * width + x] = mask.coverage_at(x, y);
        }
    }
    out
}

/// Magic wand selection over an RGBA buffer.
///
/// # Arguments
/// * `data` - Flat RGBA bytes (length = width * height * 4)
/// * `seed_x`, `seed_y` - Seed pixel (clamped into the buffer)
/// * `tolerance` - Euclidean RGBA color tolerance (0-255)
/// * `contiguous` - Flood fill (true) or global threshold (false)
/// * `edge_aware` - Tighten tolerance at high-contrast edges
///
/// # Returns
/// Full-size coverage buffer (width * height bytes)
#[wasm_bindgen]
pub fn magic_wand_wasm(
    data: &[u8],
    width: usize,
    height: usize,
    seed_x: f32,
    seed_y: f32,
    tolerance: u8,
    contiguous: bool,
    edge_aware: bool,
) -> Vec<u8> {
    let pixels = Array3::from_shape_vec((height, width, 4), data.to_vec())
        .expect("Invalid dimensions");
    let source = BufferPixelSource::new(pixels);
    let space = VirtualCoordinateSpace::new(width, height).expect("Invalid dimensions");

    let profile = ToleranceProfile {
        color_tolerance: tolerance,
        contiguous,
        edge_aware,
    };
    let mask = grow(
        Point::new(seed_x, seed_y),
        &profile,
        &source,
        &space,
        Scope::Global,
    );
    flatten(&mask, width, height)
}

/// Rasterize a rectangle into a full-size coverage buffer.
#[wasm_bindgen]
pub fn rasterize_rect_wasm(
    width: usize,
    height: usize,
    x0: f32,
    y0: f32,
    x1: f32,
    y1: f32,
    antialias: bool,
) -> Vec<u8> {
    let space = VirtualCoordinateSpace::new(width, height).expect("Invalid dimensions");
    let shape = Shape::rectangle(Point::new(x0, y0), Point::new(x1, y1));
    let mask = rasterize(&shape, &space, Scope::Global, antialias);
    flatten(&mask, width, height)
}

/// Rasterize an ellipse inscribed in the rectangle spanned by two
/// corners.
#[wasm_bindgen]
pub fn rasterize_ellipse_wasm(
    width: usize,
    height: usize,
    x0: f32,
    y0: f32,
    x1: f32,
    y1: f32,
    antialias: bool,
) -> Vec<u8> {
    let space = VirtualCoordinateSpace::new(width, height).expect("Invalid dimensions");
    let shape = Shape::ellipse(Point::new(x0, y0), Point::new(x1, y1));
    let mask = rasterize(&shape, &space, Scope::Global, antialias);
    flatten(&mask, width, height)
}

/// Combine two full-size coverage buffers.
///
/// `mode`: 0 = replace, 1 = add, 2 = subtract, 3 = intersect.
#[wasm_bindgen]
pub fn combine_masks_wasm(
    existing: &[u8],
    incoming: &[u8],
    width: usize,
    height: usize,
    mode: u8,
) -> Vec<u8> {
    let bounds = PixelRect::new(0, 0, width, height);
    let a = SelectionMask::from_raw(bounds, existing.to_vec(), Scope::Global)
        .expect("Invalid dimensions");
    let b = SelectionMask::from_raw(bounds, incoming.to_vec(), Scope::Global)
        .expect("Invalid dimensions");
    let mode = match mode {
        1 => CombineMode::Add,
        2 => CombineMode::Subtract,
        3 => CombineMode::Intersect,
        _ => CombineMode::Replace,
    };
    let result = combine(&a, &b, mode).expect("Scopes are both global");
    flatten(&result, width, height)
}
