//! Hit testing: point → shape lookup.
//!
//! Nodes are tested before edges, and later nodes before earlier ones, so
//! the topmost painted shape wins.

use dc_core::geometry::{rects_overlap, segment_intersects_rect};
use dc_core::{EdgeId, NodeId, NodeShape, ShapeGraph};
use kurbo::{Point, Rect};

/// A shape under the pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hit {
    Node(NodeId),
    Edge(EdgeId),
}

/// Find the topmost shape at scene position `p`.
/// Edges are hit within a band `edge_width` wide around their line.
pub fn hit_test(graph: &ShapeGraph, p: Point, edge_width: f64) -> Option<Hit> {
    if let Some(id) = node_at(graph, p, None) {
        return Some(Hit::Node(id));
    }
    graph
        .edges()
        .filter(|e| e.hit(p, edge_width))
        .last()
        .map(|e| Hit::Edge(e.id))
}

/// Find the topmost node whose outline contains `p`, skipping `exclude`.
pub fn node_at(graph: &ShapeGraph, p: Point, exclude: Option<NodeId>) -> Option<NodeId> {
    graph
        .nodes()
        .filter(|n| Some(n.id) != exclude && n.contains(p))
        .last()
        .map(|n| n.id)
}

/// Find every node and edge whose shape intersects `rect`.
/// Used for rubber-band selection.
pub fn hit_test_rect(graph: &ShapeGraph, rect: Rect) -> Vec<Hit> {
    let nodes = graph
        .nodes()
        .filter(|n| node_touches_rect(n, rect))
        .map(|n| Hit::Node(n.id));
    let edges = graph
        .edges()
        .filter(|e| segment_intersects_rect(e.line(), rect))
        .map(|e| Hit::Edge(e.id));
    nodes.chain(edges).collect()
}

fn node_touches_rect(node: &NodeShape, rect: Rect) -> bool {
    if !rects_overlap(node.scene_bounds(), rect) {
        return false;
    }
    // Bounding boxes overlap; check the outline itself so ellipse corners don't count.
    let c = node.center();
    let nearest = Point::new(c.x.clamp(rect.x0, rect.x1), c.y.clamp(rect.y0, rect.y1));
    node.contains(nearest) || rect.contains(node.closest_boundary_point(rect.center()))
}
