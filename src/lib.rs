//! Maskforge - the pixel-accurate selection engine of a raster editor.
//!
//! Turns pointer gestures and color-similarity queries into a persistent,
//! composable coverage mask describing which pixels are selected. Every
//! paint, filter, crop and fill operation in the surrounding editor
//! consults this mask.
//!
//! ## Architecture
//!
//! Data flows one direction per gesture:
//!
//! input event -> [`SelectionController`] -> ([`rasterize`](rasterize::rasterize)
//! | [`grow`](grow::grow), using a [`PixelSource`]) ->
//! [`combine`](combine::combine) -> published [`SelectionMask`]
//!
//! - [`mask`] - the selection data model: tight bounds, dense `u8`
//!   coverage (`ndarray::Array2`), scope
//! - [`rasterize`] - rectangle/ellipse/polygon to coverage, with
//!   optional edge anti-aliasing
//! - [`grow`] - magic wand flood fill, global color threshold and the
//!   incremental quick-selection brush
//! - [`combine`] - the replace/add/subtract/intersect mask algebra
//! - [`controller`] - the gesture state machine driving all of the above
//! - [`refine`] - feather/expand/contract/invert on a published mask
//! - [`contour`] - boundary polylines for marching-ants renderers
//!
//! Selections are addressed in a fixed [`VirtualCoordinateSpace`],
//! decoupled from viewport zoom/pan, and scoped to the whole raster or
//! to one object's local frame.
//!
//! Everything is single-threaded and event-driven: one event is fully
//! processed before the next is accepted; the published mask is
//! immutable between gestures and safe to share with readers.

pub mod combine;
pub mod contour;
pub mod controller;
pub mod error;
pub mod geometry;
pub mod grow;
pub mod mask;
pub mod rasterize;
pub mod refine;
pub mod space;

#[cfg(feature = "wasm")]
pub mod wasm;

pub use combine::{combine, CombineMode};
pub use contour::extract_contours;
pub use controller::{
    GlobalOnly, Modifiers, SelectionChange, SelectionController, SelectionTool, TargetResolver,
};
pub use error::SelectionError;
pub use geometry::{PixelRect, Point};
pub use grow::{grow, BufferPixelSource, PixelSource, QuickSelection, ToleranceProfile};
pub use mask::SelectionMask;
pub use rasterize::{rasterize, Shape};
pub use space::{ObjectId, Scope, VirtualCoordinateSpace};
