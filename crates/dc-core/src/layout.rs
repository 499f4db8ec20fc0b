//! Scene-rect maintenance.
//!
//! The scene rect grows when a node would paint outside it and only shrinks
//! when a node sitting on one of its extremes is removed. Growth moves the
//! exceeded side to `pos + local_extent * factor`, leaving a margin so a
//! node dragged slightly further does not grow the rect again.

use kurbo::{Point, Rect, Size};

/// The visible canvas dimensions, in view pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
        }
    }
}

impl Viewport {
    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// The raw viewport rectangle the scene rect resets to.
    pub fn rect(&self) -> Rect {
        Rect::from_origin_size(Point::ZERO, self.size())
    }
}

/// Where a node sits: its position plus its outline extent around that position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Footprint {
    pub pos: Point,
    pub local: Rect,
}

impl Footprint {
    pub fn scene_rect(&self) -> Rect {
        self.local + self.pos.to_vec2()
    }
}

/// Grow `rect` so the footprint fits. Returns `true` if any side moved.
pub fn enlarge_to_fit(rect: &mut Rect, node: Footprint, factor: f64) -> bool {
    let bounds = node.scene_rect();
    let mut updated = false;

    if bounds.x0 < rect.x0 {
        rect.x0 = node.pos.x + node.local.x0 * factor;
        updated = true;
    }
    if bounds.x1 > rect.x1 {
        rect.x1 = node.pos.x + node.local.x1 * factor;
        updated = true;
    }
    if bounds.y0 < rect.y0 {
        rect.y0 = node.pos.y + node.local.y0 * factor;
        updated = true;
    }
    if bounds.y1 > rect.y1 {
        rect.y1 = node.pos.y + node.local.y1 * factor;
        updated = true;
    }

    updated
}

/// Pull in the sides of `rect` the removed node was holding out.
///
/// A side only moves when the removed node was strictly beyond every
/// remaining node on that axis, and it only ever moves inward. With no
/// remaining nodes nothing happens; the caller resets to the viewport.
pub fn shrink_after_removal(
    rect: &mut Rect,
    removed: Footprint,
    remaining: &[Footprint],
    factor: f64,
) -> bool {
    if remaining.is_empty() {
        return false;
    }

    let mut updated = false;

    if removed.pos.x < min_of(remaining, |n| n.pos.x) {
        let side = min_of(remaining, |n| n.pos.x + n.local.x0 * factor);
        if side > rect.x0 {
            rect.x0 = side;
            updated = true;
        }
    }
    if removed.pos.x > max_of(remaining, |n| n.pos.x) {
        let side = max_of(remaining, |n| n.pos.x + n.local.x1 * factor);
        if side < rect.x1 {
            rect.x1 = side;
            updated = true;
        }
    }
    if removed.pos.y < min_of(remaining, |n| n.pos.y) {
        let side = min_of(remaining, |n| n.pos.y + n.local.y0 * factor);
        if side > rect.y0 {
            rect.y0 = side;
            updated = true;
        }
    }
    if removed.pos.y > max_of(remaining, |n| n.pos.y) {
        let side = max_of(remaining, |n| n.pos.y + n.local.y1 * factor);
        if side < rect.y1 {
            rect.y1 = side;
            updated = true;
        }
    }

    updated
}

fn min_of(nodes: &[Footprint], f: impl Fn(&Footprint) -> f64) -> f64 {
    nodes.iter().map(f).fold(f64::INFINITY, f64::min)
}

fn max_of(nodes: &[Footprint], f: impl Fn(&Footprint) -> f64) -> f64 {
    nodes.iter().map(f).fold(f64::NEG_INFINITY, f64::max)
}
