//! The selection interaction state machine.
//!
//! Owns the in-progress gesture and the published selection mask. One
//! pointer/keyboard event is fully processed before the next is accepted;
//! modifier keys are re-sampled on every event so mode and constraints
//! can change mid-gesture. Finalizing materializes the gesture through
//! the rasterizer or region grower, combines with the published mask and
//! returns a [`SelectionChange`] - the single change notification the
//! host translates into undo records and redraws.

use log::debug;

use crate::combine::{combine, CombineMode};
use crate::geometry::Point;
use crate::grow::{grow, PixelSource, QuickSelection, ToleranceProfile};
use crate::mask::SelectionMask;
use crate::rasterize::{rasterize, Shape};
use crate::space::{ObjectId, Scope, VirtualCoordinateSpace};

/// Drags shorter than this (in virtual-space pixels, either axis) are
/// rejected at finalize as accidental clicks.
const MIN_DRAG_EXTENT: f32 = 1.0;

/// Freeform paths need at least this many points to enclose area.
const MIN_PATH_POINTS: usize = 3;

/// Minimum pointer travel before a new lasso path point is recorded.
const MIN_PATH_STEP: f32 = 0.5;

/// Modifier-key state, sampled by the host per input event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub add: bool,
    pub subtract: bool,
    pub intersect: bool,
    /// Force width == height for rectangle/ellipse gestures.
    pub constrain: bool,
    /// Grow the shape from the origin as its center instead of a corner.
    pub center_anchor: bool,
}

impl Modifiers {
    /// Combine mode implied by the mode flags.
    /// Precedence: intersect > subtract > add > replace.
    pub fn combine_mode(&self) -> CombineMode {
        if self.intersect {
            CombineMode::Intersect
        } else if self.subtract {
            CombineMode::Subtract
        } else if self.add {
            CombineMode::Add
        } else {
            CombineMode::Replace
        }
    }
}

/// The active selection tool for a gesture, with its per-gesture
/// configuration passed explicitly.
#[derive(Debug, Clone, PartialEq)]
pub enum SelectionTool {
    Rectangle,
    Ellipse,
    Lasso,
    MagicWand(ToleranceProfile),
    QuickSelect {
        radius: usize,
        profile: ToleranceProfile,
    },
}

/// Resolves which object (if any) sits under a point, fixing the scope
/// of a gesture at pointer-down.
pub trait TargetResolver {
    fn resolve_target_at(&self, point: Point) -> Option<ObjectId>;
}

/// Resolver for hosts without per-object frames: everything is global.
pub struct GlobalOnly;

impl TargetResolver for GlobalOnly {
    fn resolve_target_at(&self, _point: Point) -> Option<ObjectId> {
        None
    }
}

/// Emitted exactly once per successful finalize, carrying the previous
/// and new published masks.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionChange {
    pub previous: SelectionMask,
    pub current: SelectionMask,
}

/// Ephemeral per-gesture state; destroyed on finalize or cancel.
struct Gesture {
    tool: SelectionTool,
    origin: Point,
    current: Point,
    path: Vec<Point>,
    mode: CombineMode,
    scope: Scope,
    constrain: bool,
    center_anchor: bool,
    quick: Option<QuickSelection>,
}

/// The interaction state machine: `Idle -> Active -> (Finalizing) -> Idle`.
///
/// Owns the published [`SelectionMask`]; after finalize it is immutable
/// and safe to share with any number of readers until the next gesture
/// replaces it wholesale.
pub struct SelectionController {
    space: VirtualCoordinateSpace,
    selection: SelectionMask,
    gesture: Option<Gesture>,
    antialias: bool,
}

impl SelectionController {
    pub fn new(space: VirtualCoordinateSpace) -> Self {
        SelectionController {
            space,
            selection: SelectionMask::empty(Scope::Global),
            gesture: None,
            antialias: true,
        }
    }

    pub fn space(&self) -> &VirtualCoordinateSpace {
        &self.space
    }

    /// Edge anti-aliasing for rasterized shapes (on by default).
    pub fn set_antialias(&mut self, antialias: bool) {
        self.antialias = antialias;
    }

    /// Whether a gesture is in progress.
    pub fn is_active(&self) -> bool {
        self.gesture.is_some()
    }

    /// Read-only snapshot of the published selection.
    pub fn current_selection(&self) -> &SelectionMask {
        &self.selection
    }

    /// Coverage of the published selection at a pixel, 0 outside.
    pub fn is_selected(&self, x: usize, y: usize) -> u8 {
        self.selection.coverage_at(x, y)
    }

    /// Begin a gesture: capture the origin, pick the combine mode from
    /// the modifiers and fix the scope for the gesture's duration.
    ///
    /// Switching to a different scope than the published selection's
    /// clears it - scopes are never silently mixed.
    pub fn pointer_down(
        &mut self,
        point: Point,
        tool: SelectionTool,
        modifiers: Modifiers,
        resolver: &dyn TargetResolver,
        source: &dyn PixelSource,
    ) {
        if self.gesture.is_some() {
            debug!("pointer_down during active gesture, discarding previous gesture");
        }

        let point = self.space.clamp_point(point);
        let scope = resolver
            .resolve_target_at(point)
            .map(Scope::Object)
            .unwrap_or(Scope::Global);
        self.ensure_scope(scope);

        let mode = modifiers.combine_mode();
        let mut quick = None;
        if let SelectionTool::QuickSelect { radius, profile } = &tool {
            let mut q = QuickSelection::new(*radius, *profile, scope);
            q.grow_at(point, source, &self.space);
            quick = Some(q);
        }

        debug!("gesture begin: tool={tool:?} mode={mode:?} scope={scope:?}");
        self.gesture = Some(Gesture {
            tool,
            origin: point,
            current: point,
            path: vec![point],
            mode,
            scope,
            constrain: modifiers.constrain,
            center_anchor: modifiers.center_anchor,
            quick,
        });
    }

    /// Update the active gesture with a new pointer position.
    ///
    /// Modifiers are re-sampled, never cached: changing mode or
    /// constraints mid-gesture takes effect without restarting it.
    pub fn pointer_move(&mut self, point: Point, modifiers: Modifiers, source: &dyn PixelSource) {
        let space = self.space;
        let Some(gesture) = self.gesture.as_mut() else {
            return;
        };

        let point = space.clamp_point(point);
        gesture.current = point;
        gesture.mode = modifiers.combine_mode();
        gesture.constrain = modifiers.constrain;
        gesture.center_anchor = modifiers.center_anchor;

        match &gesture.tool {
            SelectionTool::Lasso => {
                let moved = gesture
                    .path
                    .last()
                    .map(|last| last.distance(&point) >= MIN_PATH_STEP)
                    .unwrap_or(true);
                if moved {
                    gesture.path.push(point);
                }
            }
            SelectionTool::QuickSelect { .. } => {
                if let Some(quick) = gesture.quick.as_mut() {
                    quick.grow_at(point, source, &space);
                }
            }
            _ => {}
        }
    }

    /// Finalize the active gesture.
    ///
    /// Sub-minimum gestures (near-zero drag extent, lasso with fewer
    /// than 3 points) are silent no-ops that leave the published mask
    /// untouched. Otherwise the gesture is materialized, combined under
    /// its mode and published.
    pub fn pointer_up(
        &mut self,
        modifiers: Modifiers,
        source: &dyn PixelSource,
    ) -> Option<SelectionChange> {
        let mut gesture = self.gesture.take()?;
        gesture.mode = modifiers.combine_mode();
        gesture.constrain = modifiers.constrain;
        gesture.center_anchor = modifiers.center_anchor;

        let region = match &gesture.tool {
            SelectionTool::Rectangle | SelectionTool::Ellipse => {
                let dx = (gesture.current.x - gesture.origin.x).abs();
                let dy = (gesture.current.y - gesture.origin.y).abs();
                if dx.max(dy) < MIN_DRAG_EXTENT {
                    debug!("gesture below minimum drag extent, no-op");
                    return None;
                }
                let (a, b) = gesture_corners(
                    gesture.origin,
                    gesture.current,
                    gesture.constrain,
                    gesture.center_anchor,
                );
                let shape = if matches!(gesture.tool, SelectionTool::Rectangle) {
                    Shape::rectangle(a, b)
                } else {
                    Shape::ellipse(a, b)
                };
                rasterize(&shape, &self.space, gesture.scope, self.antialias)
            }
            SelectionTool::Lasso => {
                if gesture.path.len() < MIN_PATH_POINTS {
                    debug!("lasso path has fewer than {MIN_PATH_POINTS} points, no-op");
                    return None;
                }
                let shape = Shape::polygon(gesture.path.clone());
                rasterize(&shape, &self.space, gesture.scope, self.antialias)
            }
            SelectionTool::MagicWand(profile) => {
                grow(gesture.current, profile, source, &self.space, gesture.scope)
            }
            SelectionTool::QuickSelect { .. } => {
                let mut quick = gesture.quick.take()?;
                quick.grow_at(gesture.current, source, &self.space);
                quick.finish()
            }
        };

        debug!("gesture finalize: mode={:?}", gesture.mode);
        self.publish(region, gesture.mode)
    }

    /// Discard the active gesture without touching the published mask.
    /// Cancellation never partially applies a combination.
    pub fn cancel(&mut self) {
        if self.gesture.take().is_some() {
            debug!("gesture cancelled");
        }
    }

    /// Programmatically select a shape, driving the same
    /// materialize/combine/publish path as a pointer gesture. Degenerate
    /// shapes are rejected as silent no-ops, like sub-minimum gestures.
    pub fn select_shape(
        &mut self,
        shape: &Shape,
        mode: CombineMode,
        scope: Scope,
    ) -> Option<SelectionChange> {
        if shape_is_degenerate(shape) {
            return None;
        }
        self.ensure_scope(scope);
        let region = rasterize(shape, &self.space, scope, self.antialias);
        self.publish(region, mode)
    }

    /// Programmatically run region growing from a seed and publish the
    /// result. An empty growth result is still published (combining an
    /// empty mask is well-defined for every mode).
    pub fn select_region(
        &mut self,
        seed: Point,
        profile: &ToleranceProfile,
        mode: CombineMode,
        scope: Scope,
        source: &dyn PixelSource,
    ) -> Option<SelectionChange> {
        self.ensure_scope(scope);
        let region = grow(seed, profile, source, &self.space, scope);
        self.publish(region, mode)
    }

    /// Select the whole addressing space under the current scope.
    pub fn select_all(&mut self) -> Option<SelectionChange> {
        let scope = self.selection.scope();
        self.publish(SelectionMask::full(&self.space, scope), CombineMode::Replace)
    }

    /// Clear the published selection. No-op when already empty.
    pub fn clear_selection(&mut self) -> Option<SelectionChange> {
        if self.selection.is_empty() {
            return None;
        }
        let scope = self.selection.scope();
        self.publish(SelectionMask::empty(scope), CombineMode::Replace)
    }

    /// Clear the published mask when the target scope differs; a mask
    /// created under one scope is never combined with another scope.
    fn ensure_scope(&mut self, scope: Scope) {
        if self.selection.scope() != scope {
            debug!(
                "scope change {:?} -> {:?}, clearing selection",
                self.selection.scope(),
                scope
            );
            self.selection = SelectionMask::empty(scope);
        }
    }

    fn publish(&mut self, region: SelectionMask, mode: CombineMode) -> Option<SelectionChange> {
        let combined = match combine(&self.selection, &region, mode) {
            Ok(mask) => mask,
            Err(err) => {
                // Scopes are fixed at gesture start, so this indicates a
                // bug in scope bookkeeping; surface it, never swallow.
                log::error!("selection combine failed: {err}");
                return None;
            }
        };
        let previous = std::mem::replace(&mut self.selection, combined);
        Some(SelectionChange {
            previous,
            current: self.selection.clone(),
        })
    }
}

/// Whether a programmatically supplied shape falls under the same
/// rejection rules as a sub-minimum gesture.
fn shape_is_degenerate(shape: &Shape) -> bool {
    match shape {
        Shape::Rectangle { min, max } => {
            (max.x - min.x) < MIN_DRAG_EXTENT || (max.y - min.y) < MIN_DRAG_EXTENT
        }
        Shape::Ellipse { rx, ry, .. } => {
            *rx * 2.0 < MIN_DRAG_EXTENT || *ry * 2.0 < MIN_DRAG_EXTENT
        }
        Shape::Polygon { points } => points.len() < MIN_PATH_POINTS,
    }
}

/// Apply shape constraints to a drag and return the two shape corners.
///
/// Constrain-proportions forces both extents to the larger drag
/// dimension, keeping the shape growing toward the drag direction.
/// Center-anchor mirrors the extent around the origin. Both compose.
fn gesture_corners(origin: Point, current: Point, constrain: bool, center_anchor: bool) -> (Point, Point) {
    let mut dx = current.x - origin.x;
    let mut dy = current.y - origin.y;

    if constrain {
        let side = dx.abs().max(dy.abs());
        dx = side.copysign(if dx == 0.0 { 1.0 } else { dx });
        dy = side.copysign(if dy == 0.0 { 1.0 } else { dy });
    }

    if center_anchor {
        (
            Point::new(origin.x - dx, origin.y - dy),
            Point::new(origin.x + dx, origin.y + dy),
        )
    } else {
        (origin, Point::new(origin.x + dx, origin.y + dy))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::PixelRect;
    use crate::grow::BufferPixelSource;
    use ndarray::Array3;

    fn space(w: usize, h: usize) -> VirtualCoordinateSpace {
        VirtualCoordinateSpace::new(w, h).unwrap()
    }

    fn solid_source(w: usize, h: usize, color: [u8; 4]) -> BufferPixelSource {
        let mut pixels = Array3::<u8>::zeros((h, w, 4));
        for y in 0..h {
            for x in 0..w {
                for c in 0..4 {
                    pixels[[y, x, c]] = color[c];
                }
            }
        }
        BufferPixelSource::new(pixels)
    }

    struct FixedTarget(ObjectId);

    impl TargetResolver for FixedTarget {
        fn resolve_target_at(&self, _point: Point) -> Option<ObjectId> {
            Some(self.0)
        }
    }

    fn drag_rect(
        ctl: &mut SelectionController,
        source: &BufferPixelSource,
        from: Point,
        to: Point,
        modifiers: Modifiers,
    ) -> Option<SelectionChange> {
        ctl.pointer_down(from, SelectionTool::Rectangle, modifiers, &GlobalOnly, source);
        ctl.pointer_move(to, modifiers, source);
        ctl.pointer_up(modifiers, source)
    }

    #[test]
    fn test_rectangle_drag_replace() {
        let mut ctl = SelectionController::new(space(64, 64));
        ctl.set_antialias(false);
        let source = solid_source(64, 64, [0, 0, 0, 255]);

        let change = drag_rect(
            &mut ctl,
            &source,
            Point::new(10.0, 10.0),
            Point::new(30.0, 30.0),
            Modifiers::default(),
        )
        .unwrap();

        assert!(change.previous.is_empty());
        assert_eq!(change.current.bounds(), PixelRect::new(10, 10, 20, 20));
        assert_eq!(ctl.is_selected(15, 15), 255);
        assert_eq!(ctl.is_selected(5, 5), 0);
        assert!(!ctl.is_active());
    }

    #[test]
    fn test_constrain_uses_larger_dimension() {
        // Constrained drag (0,0) -> (30,10) gives 30x30
        let mut ctl = SelectionController::new(space(64, 64));
        ctl.set_antialias(false);
        let source = solid_source(64, 64, [0, 0, 0, 255]);

        let modifiers = Modifiers {
            constrain: true,
            ..Modifiers::default()
        };
        let change = drag_rect(
            &mut ctl,
            &source,
            Point::new(0.0, 0.0),
            Point::new(30.0, 10.0),
            modifiers,
        )
        .unwrap();

        assert_eq!(change.current.bounds(), PixelRect::new(0, 0, 30, 30));
    }

    #[test]
    fn test_center_anchor_grows_from_origin() {
        let mut ctl = SelectionController::new(space(64, 64));
        ctl.set_antialias(false);
        let source = solid_source(64, 64, [0, 0, 0, 255]);

        let modifiers = Modifiers {
            center_anchor: true,
            ..Modifiers::default()
        };
        let change = drag_rect(
            &mut ctl,
            &source,
            Point::new(20.0, 20.0),
            Point::new(25.0, 28.0),
            modifiers,
        )
        .unwrap();

        assert_eq!(change.current.bounds(), PixelRect::new(15, 12, 10, 16));
    }

    #[test]
    fn test_constrain_and_center_compose() {
        let mut ctl = SelectionController::new(space(64, 64));
        ctl.set_antialias(false);
        let source = solid_source(64, 64, [0, 0, 0, 255]);

        let modifiers = Modifiers {
            constrain: true,
            center_anchor: true,
            ..Modifiers::default()
        };
        let change = drag_rect(
            &mut ctl,
            &source,
            Point::new(20.0, 20.0),
            Point::new(26.0, 22.0),
            modifiers,
        )
        .unwrap();

        // Larger dimension is 6, mirrored around the origin: 12x12
        assert_eq!(change.current.bounds(), PixelRect::new(14, 14, 12, 12));
    }

    #[test]
    fn test_modifiers_resampled_mid_gesture() {
        let mut ctl = SelectionController::new(space(64, 64));
        ctl.set_antialias(false);
        let source = solid_source(64, 64, [0, 0, 0, 255]);

        drag_rect(
            &mut ctl,
            &source,
            Point::new(0.0, 0.0),
            Point::new(20.0, 20.0),
            Modifiers::default(),
        );

        // Start without add, press add mid-gesture: finalize unions
        ctl.pointer_down(
            Point::new(30.0, 30.0),
            SelectionTool::Rectangle,
            Modifiers::default(),
            &GlobalOnly,
            &source,
        );
        let with_add = Modifiers {
            add: true,
            ..Modifiers::default()
        };
        ctl.pointer_move(Point::new(40.0, 40.0), with_add, &source);
        let change = ctl.pointer_up(with_add, &source).unwrap();

        assert_eq!(change.current.bounds(), PixelRect::new(0, 0, 40, 40));
        assert_eq!(ctl.is_selected(10, 10), 255);
        assert_eq!(ctl.is_selected(35, 35), 255);
        assert_eq!(ctl.is_selected(25, 25), 0);
    }

    #[test]
    fn test_subtract_gesture() {
        let mut ctl = SelectionController::new(space(64, 64));
        ctl.set_antialias(false);
        let source = solid_source(64, 64, [0, 0, 0, 255]);

        drag_rect(
            &mut ctl,
            &source,
            Point::new(0.0, 0.0),
            Point::new(10.0, 10.0),
            Modifiers::default(),
        );
        let subtract = Modifiers {
            subtract: true,
            ..Modifiers::default()
        };
        let change = drag_rect(
            &mut ctl,
            &source,
            Point::new(5.0, 5.0),
            Point::new(15.0, 15.0),
            subtract,
        )
        .unwrap();

        assert_eq!(ctl.is_selected(2, 2), 255);
        assert_eq!(ctl.is_selected(7, 7), 0);
        // Subtract never grows the selection
        assert!(change.current.bounds().right() <= 10);
    }

    #[test]
    fn test_sub_minimum_drag_is_noop() {
        let mut ctl = SelectionController::new(space(64, 64));
        let source = solid_source(64, 64, [0, 0, 0, 255]);

        drag_rect(
            &mut ctl,
            &source,
            Point::new(0.0, 0.0),
            Point::new(20.0, 20.0),
            Modifiers::default(),
        );
        let before = ctl.current_selection().clone();

        let change = drag_rect(
            &mut ctl,
            &source,
            Point::new(30.0, 30.0),
            Point::new(30.4, 30.4),
            Modifiers::default(),
        );
        assert!(change.is_none());
        assert_eq!(ctl.current_selection(), &before);
    }

    #[test]
    fn test_short_lasso_is_noop() {
        // A lasso with only 2 recorded points encloses no area
        let mut ctl = SelectionController::new(space(64, 64));
        let source = solid_source(64, 64, [0, 0, 0, 255]);

        drag_rect(
            &mut ctl,
            &source,
            Point::new(0.0, 0.0),
            Point::new(20.0, 20.0),
            Modifiers::default(),
        );
        let before = ctl.current_selection().clone();

        ctl.pointer_down(
            Point::new(30.0, 30.0),
            SelectionTool::Lasso,
            Modifiers::default(),
            &GlobalOnly,
            &source,
        );
        ctl.pointer_move(Point::new(35.0, 30.0), Modifiers::default(), &source);
        let change = ctl.pointer_up(Modifiers::default(), &source);

        assert!(change.is_none());
        assert_eq!(ctl.current_selection(), &before);
    }

    #[test]
    fn test_lasso_triangle_selects_interior() {
        let mut ctl = SelectionController::new(space(64, 64));
        ctl.set_antialias(false);
        let source = solid_source(64, 64, [0, 0, 0, 255]);

        ctl.pointer_down(
            Point::new(5.0, 5.0),
            SelectionTool::Lasso,
            Modifiers::default(),
            &GlobalOnly,
            &source,
        );
        ctl.pointer_move(Point::new(40.0, 5.0), Modifiers::default(), &source);
        ctl.pointer_move(Point::new(5.0, 40.0), Modifiers::default(), &source);
        let change = ctl.pointer_up(Modifiers::default(), &source).unwrap();

        assert!(!change.current.is_empty());
        assert_eq!(ctl.is_selected(10, 10), 255);
        assert_eq!(ctl.is_selected(39, 39), 0);
    }

    #[test]
    fn test_cancel_preserves_published_mask() {
        let mut ctl = SelectionController::new(space(64, 64));
        let source = solid_source(64, 64, [0, 0, 0, 255]);

        drag_rect(
            &mut ctl,
            &source,
            Point::new(0.0, 0.0),
            Point::new(20.0, 20.0),
            Modifiers::default(),
        );
        let before = ctl.current_selection().clone();

        ctl.pointer_down(
            Point::new(30.0, 30.0),
            SelectionTool::Rectangle,
            Modifiers::default(),
            &GlobalOnly,
            &source,
        );
        ctl.pointer_move(Point::new(50.0, 50.0), Modifiers::default(), &source);
        ctl.cancel();

        assert!(!ctl.is_active());
        assert_eq!(ctl.current_selection(), &before);
        // A pointer-up after cancel does nothing
        assert!(ctl.pointer_up(Modifiers::default(), &source).is_none());
    }

    #[test]
    fn test_magic_wand_click() {
        let mut ctl = SelectionController::new(space(20, 20));
        let source = solid_source(20, 20, [100, 50, 25, 255]);

        let tool = SelectionTool::MagicWand(ToleranceProfile {
            color_tolerance: 0,
            contiguous: true,
            edge_aware: false,
        });
        ctl.pointer_down(
            Point::new(10.0, 10.0),
            tool,
            Modifiers::default(),
            &GlobalOnly,
            &source,
        );
        let change = ctl.pointer_up(Modifiers::default(), &source).unwrap();

        assert_eq!(change.current.selected_area(), 400);
    }

    #[test]
    fn test_quick_select_drag() {
        let mut ctl = SelectionController::new(space(60, 60));
        let source = solid_source(60, 60, [100, 100, 100, 255]);

        let tool = SelectionTool::QuickSelect {
            radius: 4,
            profile: ToleranceProfile {
                color_tolerance: 0,
                contiguous: true,
                edge_aware: false,
            },
        };
        ctl.pointer_down(
            Point::new(10.0, 10.0),
            tool,
            Modifiers::default(),
            &GlobalOnly,
            &source,
        );
        ctl.pointer_move(Point::new(20.0, 10.0), Modifiers::default(), &source);
        ctl.pointer_move(Point::new(30.0, 10.0), Modifiers::default(), &source);
        let change = ctl.pointer_up(Modifiers::default(), &source).unwrap();

        // A swath along the drag, not the whole canvas
        assert!(change.current.selected_area() > 100);
        assert!(change.current.selected_area() < 60 * 60);
        assert_eq!(ctl.is_selected(20, 10), 255);
        assert_eq!(ctl.is_selected(50, 50), 0);
    }

    #[test]
    fn test_scope_change_clears_selection() {
        let mut ctl = SelectionController::new(space(64, 64));
        let source = solid_source(64, 64, [0, 0, 0, 255]);

        drag_rect(
            &mut ctl,
            &source,
            Point::new(0.0, 0.0),
            Point::new(20.0, 20.0),
            Modifiers::default(),
        );
        assert!(!ctl.current_selection().is_empty());

        // Next gesture resolves to an object scope: old mask is cleared
        let resolver = FixedTarget(ObjectId(3));
        ctl.pointer_down(
            Point::new(5.0, 5.0),
            SelectionTool::Rectangle,
            Modifiers::default(),
            &resolver,
            &source,
        );
        ctl.pointer_move(Point::new(10.0, 10.0), Modifiers::default(), &source);
        let change = ctl.pointer_up(Modifiers::default(), &source).unwrap();

        assert!(change.previous.is_empty());
        assert_eq!(change.current.scope(), Scope::Object(ObjectId(3)));
    }

    #[test]
    fn test_programmatic_select_shape() {
        // AI-adapter style: "select the top half" without pointer events
        let mut ctl = SelectionController::new(space(100, 100));
        ctl.set_antialias(false);

        let shape = Shape::rectangle(Point::new(0.0, 0.0), Point::new(100.0, 50.0));
        let change = ctl
            .select_shape(&shape, CombineMode::Replace, Scope::Global)
            .unwrap();

        assert_eq!(change.current.bounds(), PixelRect::new(0, 0, 100, 50));
        assert_eq!(ctl.is_selected(50, 25), 255);
        assert_eq!(ctl.is_selected(50, 75), 0);
    }

    #[test]
    fn test_programmatic_degenerate_shape_is_noop() {
        let mut ctl = SelectionController::new(space(100, 100));
        let shape = Shape::polygon(vec![Point::new(0.0, 0.0), Point::new(10.0, 0.0)]);
        assert!(ctl
            .select_shape(&shape, CombineMode::Replace, Scope::Global)
            .is_none());
    }

    #[test]
    fn test_select_all_and_clear() {
        let mut ctl = SelectionController::new(space(16, 16));
        let change = ctl.select_all().unwrap();
        assert_eq!(change.current.selected_area(), 256);

        let change = ctl.clear_selection().unwrap();
        assert!(change.current.is_empty());
        assert!(ctl.clear_selection().is_none());
    }
}
