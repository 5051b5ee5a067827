//! Contour extraction from a selection mask.
//!
//! Traces the boundary of selected regions into closed polylines for the
//! host's marching-ants renderer. The engine itself renders nothing;
//! this is a pure geometry query in virtual-space coordinates.

use std::collections::HashSet;

use crate::mask::SelectionMask;

/// Moore neighborhood directions (8-connected, clockwise from right).
const DIRECTIONS: [(i32, i32); 8] = [
    (1, 0),
    (1, 1),
    (0, 1),
    (-1, 1),
    (-1, 0),
    (-1, -1),
    (0, -1),
    (1, -1),
];

/// Extract the boundary contours of all selected regions.
///
/// Each contour is a closed polyline of pixel-center points (offset by
/// 0.5) in virtual-space coordinates. The empty mask has no contours.
pub fn extract_contours(mask: &SelectionMask) -> Vec<Vec<(f32, f32)>> {
    let bounds = mask.bounds();
    if bounds.is_empty() {
        return Vec::new();
    }

    let cov = mask.coverage();
    let (h, w) = cov.dim();
    let selected = |x: i32, y: i32| -> bool {
        x >= 0 && y >= 0 && (x as usize) < w && (y as usize) < h && cov[[y as usize, x as usize]] > 0
    };
    let boundary = |x: i32, y: i32| -> bool {
        selected(x, y)
            && (!selected(x - 1, y)
                || !selected(x + 1, y)
                || !selected(x, y - 1)
                || !selected(x, y + 1))
    };

    let mut contours = Vec::new();
    let mut visited: HashSet<(i32, i32)> = HashSet::new();

    for y in 0..h as i32 {
        for x in 0..w as i32 {
            if boundary(x, y) && !visited.contains(&(x, y)) {
                let contour = trace_boundary(x, y, &selected, &boundary, &mut visited, w * h);
                if !contour.is_empty() {
                    // Translate from mask-local to virtual-space coords
                    contours.push(
                        contour
                            .into_iter()
                            .map(|(cx, cy)| (cx + bounds.x as f32, cy + bounds.y as f32))
                            .collect(),
                    );
                }
            }
        }
    }

    contours
}

/// Trace one closed boundary using Moore neighbor tracing.
fn trace_boundary(
    start_x: i32,
    start_y: i32,
    selected: &dyn Fn(i32, i32) -> bool,
    boundary: &dyn Fn(i32, i32) -> bool,
    visited: &mut HashSet<(i32, i32)>,
    area: usize,
) -> Vec<(f32, f32)> {
    let mut contour = Vec::new();

    // Initial backtrack direction: first unselected neighbor
    let mut dir = 0usize;
    for (i, &(dx, dy)) in DIRECTIONS.iter().enumerate() {
        if !selected(start_x + dx, start_y + dy) {
            dir = i;
            break;
        }
    }

    let mut x = start_x;
    let mut y = start_y;
    // Safety cap against degenerate tracing
    let max_steps = area * 2;
    let mut steps = 0;

    loop {
        if !visited.contains(&(x, y)) {
            contour.push((x as f32 + 0.5, y as f32 + 0.5));
            visited.insert((x, y));
        }

        // Resume the clockwise search from behind the entry direction
        let search_start = (dir + 5) % 8;
        let mut found = false;
        for i in 0..8 {
            let check_dir = (search_start + i) % 8;
            let (dx, dy) = DIRECTIONS[check_dir];
            let nx = x + dx;
            let ny = y + dy;

            if selected(nx, ny) {
                if nx == start_x && ny == start_y && steps > 0 {
                    return contour;
                }
                if boundary(nx, ny) {
                    x = nx;
                    y = ny;
                    dir = check_dir;
                    found = true;
                    break;
                }
            }
        }

        if !found {
            break;
        }
        steps += 1;
        if steps >= max_steps {
            break;
        }
    }

    contour
}
