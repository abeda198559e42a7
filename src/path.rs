//! stepwise octile route planning between grid cells
//!
//! No cost model and no obstacles: the walk is a taut approximation of the
//! straight line from start to target, preferring axis-aligned steps and
//! moving diagonally only when the remaining deltas tie.

use crate::cell::{CellRecord, Coord};
use crate::grid::GridWindow;

/// Plan an ordered route from `start` to `target` over the active window.
///
/// Exactly `max(|dx|, |dy|)` steps are attempted. Stepped-to coordinates
/// with no active cell are skipped silently, so the returned route may be
/// shorter than the step count; planning never extends the window. The
/// start cell itself is not part of the route.
pub fn plan<'g>(start: Coord, target: Coord, grid: &'g GridWindow) -> Vec<&'g CellRecord> {
    let total_steps = (target.x - start.x).abs().max((target.y - start.y).abs());

    let mut route = Vec::with_capacity(total_steps as usize);
    let mut current = start;
    for _ in 0..total_steps {
        let (dx, dy) = step_direction(current, target);
        current = Coord::new(current.x + dx, current.y + dy);
        if let Some(cell) = grid.get(current) {
            route.push(cell);
        }
    }
    route
}

/// the larger remaining axis wins; an exact tie steps diagonally in both
fn step_direction(current: Coord, target: Coord) -> (i32, i32) {
    let horizontal = (target.x - current.x).abs();
    let vertical = (target.y - current.y).abs();
    if horizontal > vertical {
        ((target.x - current.x).signum(), 0)
    } else if horizontal < vertical {
        (0, (target.y - current.y).signum())
    } else {
        (
            (target.x - current.x).signum(),
            (target.y - current.y).signum(),
        )
    }
}
