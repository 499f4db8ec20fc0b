//! Geometry helpers: boundary anchoring, segment distances, rect overlap.

use kurbo::{Line, ParamCurve, ParamCurveNearest, Point, Rect, Shape};

/// Accuracy passed to kurbo's nearest-point solver.
const NEAREST_ACCURACY: f64 = 1e-6;

/// The point on `shape`'s outline closest to `reference`.
///
/// Degenerate input (zero-size shape, non-finite coordinates, empty path)
/// yields the center of the shape's bounding box.
pub fn closest_point_to<S: Shape>(reference: Point, shape: &S, tolerance: f64) -> Point {
    let bbox = shape.bounding_box();
    let fallback = bbox.center();
    if !reference.is_finite() || !bbox.is_finite() || (bbox.width() <= 0.0 && bbox.height() <= 0.0)
    {
        return fallback;
    }

    let mut best: Option<(f64, Point)> = None;
    for seg in shape.path_segments(tolerance) {
        let nearest = seg.nearest(reference, NEAREST_ACCURACY);
        if best.is_none_or(|(d, _)| nearest.distance_sq < d) {
            best = Some((nearest.distance_sq, seg.eval(nearest.t)));
        }
    }

    best.map(|(_, p)| p)
        .filter(|p| p.is_finite())
        .unwrap_or(fallback)
}

/// Shortest distance from `p` to the segment `line`.
pub fn distance_to_segment(p: Point, line: Line) -> f64 {
    if line.p0 == line.p1 {
        return p.distance(line.p0);
    }
    line.nearest(p, NEAREST_ACCURACY).distance_sq.sqrt()
}

/// Rect built from two arbitrary corners.
pub fn normalized_rect(a: Point, b: Point) -> Rect {
    Rect::from_points(a, b)
}

/// AABB overlap, touching edges included.
pub fn rects_overlap(a: Rect, b: Rect) -> bool {
    a.x0 <= b.x1 && a.x1 >= b.x0 && a.y0 <= b.y1 && a.y1 >= b.y0
}

/// `true` if the segment touches `rect` (an endpoint inside, or it crosses a side).
pub fn segment_intersects_rect(line: Line, rect: Rect) -> bool {
    if rect.contains(line.p0) || rect.contains(line.p1) {
        return true;
    }
    let corners = [
        Point::new(rect.x0, rect.y0),
        Point::new(rect.x1, rect.y0),
        Point::new(rect.x1, rect.y1),
        Point::new(rect.x0, rect.y1),
    ];
    (0..4).any(|i| segments_intersect(line.p0, line.p1, corners[i], corners[(i + 1) % 4]))
}

fn segments_intersect(p1: Point, p2: Point, q1: Point, q2: Point) -> bool {
    fn orient(a: Point, b: Point, c: Point) -> f64 {
        (b - a).cross(c - a)
    }
    fn on_segment(a: Point, b: Point, p: Point) -> bool {
        p.x >= a.x.min(b.x) && p.x <= a.x.max(b.x) && p.y >= a.y.min(b.y) && p.y <= a.y.max(b.y)
    }

    let d1 = orient(q1, q2, p1);
    let d2 = orient(q1, q2, p2);
    let d3 = orient(p1, p2, q1);
    let d4 = orient(p1, p2, q2);

    if ((d1 > 0.0 && d2 < 0.0) || (d1 < 0.0 && d2 > 0.0))
        && ((d3 > 0.0 && d4 < 0.0) || (d3 < 0.0 && d4 > 0.0))
    {
        return true;
    }

    (d1 == 0.0 && on_segment(q1, q2, p1))
        || (d2 == 0.0 && on_segment(q1, q2, p2))
        || (d3 == 0.0 && on_segment(p1, p2, q1))
        || (d4 == 0.0 && on_segment(p1, p2, q2))
}
