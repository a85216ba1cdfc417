//! Recursive tree compositing.

use crate::canvas::Canvas;
use crate::surface::Surface;

/// Composites `root` onto `dest` at `(x, y)`, then every live child
/// recursively at its position relative to its parent, in child order.
///
/// No surface lock is held while children are visited. A surface already
/// on the current path is skipped, so cyclic child lists terminate.
/// `dest` must not be the canvas of a surface in the tree.
pub fn composite_tree(root: &Surface, dest: &mut Canvas, x: i32, y: i32) {
    let mut path = Vec::new();
    visit(root, dest, i64::from(x), i64::from(y), &mut path);
}

/// Offsets accumulate in `i64`; a clamped origin is off the destination.
fn visit(surface: &Surface, dest: &mut Canvas, x: i64, y: i64, path: &mut Vec<usize>) {
    let id = surface.id();
    if path.contains(&id) {
        log::warn!("skipping surface {id:#x}: it is its own ancestor");
        return;
    }
    dest.composite(&surface.lock().canvas, clamp(x), clamp(y));
    let children = surface.children();
    path.push(id);
    for child in &children {
        let offset = child.position();
        visit(child, dest, x + i64::from(offset.x), y + i64::from(offset.y), path);
    }
    path.pop();
}

fn clamp(value: i64) -> i32 {
    value.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
}

#[cfg(test)]
#[path = "tests/compositor_tests.rs"]
mod tests;
