//! Shape model for the graph canvas.
//!
//! The canvas mirrors the controller's graph as a `StableDiGraph` whose node
//! weights are [`NodeShape`]s and whose edge weights are [`EdgeShape`]s.
//! Node positions are authoritative; edge lines are always derived from the
//! outlines of their two endpoints and recomputed whenever one of them moves.

use crate::attrs::{DotAttrs, EdgeArgs, NodeArgs, keys};
use crate::config::CanvasConfig;
use crate::dot::unquote_label;
use crate::error::SceneError;
use crate::geometry::{closest_point_to, distance_to_segment};
use crate::id::{EdgeId, NodeId};
use crate::layout::Footprint;
use kurbo::{BezPath, Ellipse, Line, Point, Rect, Shape, Size, Vec2};
use petgraph::Direction;
use petgraph::graph::{EdgeIndex, NodeIndex};
use petgraph::stable_graph::StableDiGraph;
use petgraph::visit::EdgeRef;
use std::collections::HashMap;
use std::f64::consts::SQRT_2;
use std::fmt;

// ─── Labels & bodies ─────────────────────────────────────────────────────

/// Measurements used to size labels and outlines.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShapeMetrics {
    pub char_width: f64,
    pub line_height: f64,
    pub padding: f64,
    pub tolerance: f64,
}

impl From<&CanvasConfig> for ShapeMetrics {
    fn from(config: &CanvasConfig) -> Self {
        Self {
            char_width: config.char_width,
            line_height: config.line_height,
            padding: config.label_padding,
            tolerance: config.tolerance,
        }
    }
}

impl Default for ShapeMetrics {
    fn default() -> Self {
        Self::from(&CanvasConfig::default())
    }
}

/// Display text of a node and the box it occupies, relative to the node position.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelBox {
    pub text: String,
    pub rect: Rect,
}

impl LabelBox {
    /// Estimate the label box from glyph metrics. DOT `\n` escapes and real
    /// newlines both break lines.
    pub fn measure(text: &str, metrics: &ShapeMetrics) -> Self {
        let lines: Vec<&str> = text.split("\\n").flat_map(|l| l.split('\n')).collect();
        let columns = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0).max(1);
        let size = Size::new(
            columns as f64 * metrics.char_width,
            lines.len().max(1) as f64 * metrics.line_height,
        );
        Self {
            text: text.to_string(),
            rect: Rect::from_center_size(Point::ZERO, size),
        }
    }
}

/// The drawable body of a node: builds the outline around its label.
pub trait NodeBody: fmt::Debug {
    /// Outline in node-local coordinates (the node position is the origin).
    fn outline(&self, label: &LabelBox, metrics: &ShapeMetrics) -> BezPath;

    /// Place the label inside `outline`. Bodies that need a specific text
    /// placement override this; the default keeps the measured box.
    fn center_text_in_shape(&self, _label: &mut LabelBox, _outline: &BezPath) {}
}

/// The default node body: an ellipse circumscribing the padded label.
#[derive(Debug, Clone, Copy, Default)]
pub struct EllipseBody;

impl NodeBody for EllipseBody {
    fn outline(&self, label: &LabelBox, metrics: &ShapeMetrics) -> BezPath {
        let frame = label.rect.inflate(metrics.padding, metrics.padding);
        let radii = Vec2::new(frame.width() / 2.0 * SQRT_2, frame.height() / 2.0 * SQRT_2);
        Ellipse::new(frame.center(), radii, 0.0).to_path(metrics.tolerance)
    }
}

// ─── Node shape ──────────────────────────────────────────────────────────

/// What a call to [`NodeShape::edit`] actually changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NodeChange {
    pub label: bool,
    pub pos: bool,
}

impl NodeChange {
    /// Whether the node's outline moved or resized.
    pub fn geometry(&self) -> bool {
        self.label || self.pos
    }
}

/// Visual representation of one graph node.
#[derive(Debug)]
pub struct NodeShape {
    pub id: NodeId,
    pos: Point,
    label: LabelBox,
    outline: BezPath,
    body: Box<dyn NodeBody>,
    metrics: ShapeMetrics,
    pub selected: bool,
    /// Rubber-band line of an in-progress edge gesture started on this node.
    pub semi_edge: Option<SemiEdge>,
}

impl NodeShape {
    /// A node with the default ellipse body, labelled with its id, at the origin.
    pub fn new(id: NodeId, metrics: ShapeMetrics) -> Self {
        Self::with_body(id, Box::new(EllipseBody), metrics)
    }

    pub fn with_body(id: NodeId, body: Box<dyn NodeBody>, metrics: ShapeMetrics) -> Self {
        let mut node = Self {
            id,
            pos: Point::ZERO,
            label: LabelBox::measure(id.as_str(), &metrics),
            outline: BezPath::new(),
            body,
            metrics,
            selected: false,
            semi_edge: None,
        };
        node.relayout();
        node
    }

    fn relayout(&mut self) {
        self.outline = self.body.outline(&self.label, &self.metrics);
        self.body.center_text_in_shape(&mut self.label, &self.outline);
    }

    /// Apply a controller payload. Unchanged values are left alone.
    pub fn edit(&mut self, args: &NodeArgs) -> NodeChange {
        NodeChange {
            label: self.edit_label(&args.dot_attrs),
            pos: self.edit_pos(args.x, args.y),
        }
    }

    /// Take the label from `attrs` (unquoted), falling back to the id.
    pub fn edit_label(&mut self, attrs: &DotAttrs) -> bool {
        let text = attrs
            .get(keys::LABEL)
            .map(|raw| unquote_label(raw))
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| self.id.as_str().to_string());

        if text == self.label.text {
            return false;
        }
        self.label = LabelBox::measure(&text, &self.metrics);
        self.relayout();
        true
    }

    pub fn edit_pos(&mut self, x: f64, y: f64) -> bool {
        let mut changed = false;
        if self.pos.x != x {
            self.pos.x = x;
            changed = true;
        }
        if self.pos.y != y {
            self.pos.y = y;
            changed = true;
        }
        changed
    }

    /// Move by `delta` during a drag.
    pub fn translate(&mut self, delta: Vec2) {
        self.pos += delta;
    }

    pub fn pos(&self) -> Point {
        self.pos
    }

    pub fn label(&self) -> &str {
        &self.label.text
    }

    /// Label box in scene coordinates.
    pub fn label_rect(&self) -> Rect {
        self.label.rect + self.pos.to_vec2()
    }

    pub fn outline(&self) -> &BezPath {
        &self.outline
    }

    /// Outline translated to scene coordinates.
    pub fn scene_outline(&self) -> BezPath {
        let mut path = self.outline.clone();
        path.apply_affine(kurbo::Affine::translate(self.pos.to_vec2()));
        path
    }

    pub fn local_bounds(&self) -> Rect {
        self.outline.bounding_box()
    }

    pub fn scene_bounds(&self) -> Rect {
        self.local_bounds() + self.pos.to_vec2()
    }

    pub fn center(&self) -> Point {
        self.scene_bounds().center()
    }

    pub fn footprint(&self) -> Footprint {
        Footprint {
            pos: self.pos,
            local: self.local_bounds(),
        }
    }

    /// Whether scene point `p` lies inside the outline.
    pub fn contains(&self, p: Point) -> bool {
        self.outline.contains(p - self.pos.to_vec2())
    }

    /// Point on the outline closest to scene point `reference`.
    pub fn closest_boundary_point(&self, reference: Point) -> Point {
        let offset = self.pos.to_vec2();
        closest_point_to(reference - offset, &self.outline, self.metrics.tolerance) + offset
    }
}

// ─── Semi-edge ───────────────────────────────────────────────────────────

/// Transient line from the node a new-edge gesture started on to the pointer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SemiEdge {
    anchor: Point,
    tip: Point,
}

impl SemiEdge {
    pub fn new(anchor: Point) -> Self {
        Self { anchor, tip: anchor }
    }

    /// Move the free end. Returns `false` if the pointer did not move.
    pub fn update(&mut self, pointer: Point) -> bool {
        if self.tip == pointer {
            return false;
        }
        self.tip = pointer;
        true
    }

    pub fn anchor(&self) -> Point {
        self.anchor
    }

    pub fn tip(&self) -> Point {
        self.tip
    }

    pub fn line(&self) -> Line {
        Line::new(self.anchor, self.tip)
    }
}

// ─── Edge shape ──────────────────────────────────────────────────────────

/// Visual representation of one graph edge: a straight line between the
/// outlines of its endpoints.
#[derive(Debug, Clone)]
pub struct EdgeShape {
    pub id: EdgeId,
    pub source: NodeId,
    pub dest: NodeId,
    line: Line,
    attrs: DotAttrs,
    pub selected: bool,
    recomputes: u64,
}

impl EdgeShape {
    pub fn new(id: EdgeId, source: &NodeShape, dest: &NodeShape) -> Self {
        Self {
            id,
            source: source.id,
            dest: dest.id,
            line: Self::route(source, dest),
            attrs: DotAttrs::new(),
            selected: false,
            recomputes: 0,
        }
    }

    /// The line joining the two outlines: each end is the point of its node's
    /// outline closest to the other node's center.
    pub fn route(source: &NodeShape, dest: &NodeShape) -> Line {
        Line::new(
            source.closest_boundary_point(dest.center()),
            dest.closest_boundary_point(source.center()),
        )
    }

    /// Recompute the line from the current endpoint shapes.
    pub fn update(&mut self, source: &NodeShape, dest: &NodeShape) {
        self.set_line(Self::route(source, dest));
    }

    fn set_line(&mut self, line: Line) {
        self.line = line;
        self.recomputes += 1;
    }

    /// Apply non-geometric attributes. Returns `true` if anything changed.
    pub fn edit(&mut self, args: &EdgeArgs) -> bool {
        if self.attrs == args.dot_attrs {
            return false;
        }
        self.attrs = args.dot_attrs.clone();
        true
    }

    pub fn line(&self) -> Line {
        self.line
    }

    pub fn attrs(&self) -> &DotAttrs {
        &self.attrs
    }

    pub fn label(&self) -> Option<String> {
        self.attrs
            .get(keys::LABEL)
            .map(|raw| unquote_label(raw))
            .filter(|t| !t.is_empty())
    }

    /// Where the label sits: the middle of the line.
    pub fn label_anchor(&self) -> Point {
        self.line.midpoint()
    }

    /// Number of times the line was recomputed after construction.
    pub fn recomputes(&self) -> u64 {
        self.recomputes
    }

    /// Hit test against a band of total width `width` centred on the line.
    pub fn hit(&self, p: Point, width: f64) -> bool {
        distance_to_segment(p, self.line) <= width / 2.0
    }
}

// ─── Shape graph ─────────────────────────────────────────────────────────

/// Storage for the canvas shapes, indexed by controller ids.
#[derive(Debug, Default)]
pub struct ShapeGraph {
    pub graph: StableDiGraph<NodeShape, EdgeShape>,
    node_index: HashMap<NodeId, NodeIndex>,
    edge_index: HashMap<EdgeId, EdgeIndex>,
}

impl ShapeGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn node_count(&self) -> usize {
        self.node_index.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edge_index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.node_index.is_empty()
    }

    pub fn node(&self, id: NodeId) -> Option<&NodeShape> {
        self.node_index.get(&id).map(|idx| &self.graph[*idx])
    }

    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut NodeShape> {
        self.node_index
            .get(&id)
            .copied()
            .map(|idx| &mut self.graph[idx])
    }

    pub fn edge(&self, id: EdgeId) -> Option<&EdgeShape> {
        self.edge_index.get(&id).map(|idx| &self.graph[*idx])
    }

    pub fn edge_mut(&mut self, id: EdgeId) -> Option<&mut EdgeShape> {
        self.edge_index
            .get(&id)
            .copied()
            .map(|idx| &mut self.graph[idx])
    }

    /// Nodes in insertion order (later nodes paint on top).
    pub fn nodes(&self) -> impl Iterator<Item = &NodeShape> {
        self.graph.node_weights()
    }

    pub fn nodes_mut(&mut self) -> impl Iterator<Item = &mut NodeShape> {
        self.graph.node_weights_mut()
    }

    pub fn edges(&self) -> impl Iterator<Item = &EdgeShape> {
        self.graph.edge_weights()
    }

    pub fn edges_mut(&mut self) -> impl Iterator<Item = &mut EdgeShape> {
        self.graph.edge_weights_mut()
    }

    pub fn insert_node(&mut self, node: NodeShape) -> Result<(), SceneError> {
        if self.node_index.contains_key(&node.id) {
            return Err(SceneError::DuplicateNode(node.id));
        }
        let id = node.id;
        let idx = self.graph.add_node(node);
        self.node_index.insert(id, idx);
        Ok(())
    }

    /// Remove a node. Edges still attached to it go with it; their ids are
    /// returned alongside the node.
    pub fn remove_node(&mut self, id: NodeId) -> Result<(NodeShape, Vec<EdgeId>), SceneError> {
        let idx = self
            .node_index
            .remove(&id)
            .ok_or(SceneError::UnknownNode(id))?;

        let dropped: Vec<EdgeId> = self
            .incident(idx)
            .into_iter()
            .map(|e| self.graph[e].id)
            .collect();
        for edge_id in &dropped {
            self.edge_index.remove(edge_id);
        }

        let node = self
            .graph
            .remove_node(idx)
            .ok_or(SceneError::UnknownNode(id))?;
        Ok((node, dropped))
    }

    /// Create the edge shape between two known nodes.
    pub fn insert_edge(
        &mut self,
        id: EdgeId,
        source: NodeId,
        dest: NodeId,
    ) -> Result<&mut EdgeShape, SceneError> {
        if self.edge_index.contains_key(&id) {
            return Err(SceneError::DuplicateEdge(id));
        }
        let s = self.index_of(source)?;
        let d = self.index_of(dest)?;

        let shape = EdgeShape::new(id, &self.graph[s], &self.graph[d]);
        let idx = self.graph.add_edge(s, d, shape);
        self.edge_index.insert(id, idx);
        Ok(&mut self.graph[idx])
    }

    pub fn remove_edge(&mut self, id: EdgeId) -> Result<EdgeShape, SceneError> {
        let idx = self
            .edge_index
            .remove(&id)
            .ok_or(SceneError::UnknownEdge(id))?;
        self.graph
            .remove_edge(idx)
            .ok_or(SceneError::UnknownEdge(id))
    }

    /// Recompute the line of every edge touching `id`. Returns how many were updated.
    pub fn update_edges_of(&mut self, id: NodeId) -> usize {
        let Some(&idx) = self.node_index.get(&id) else {
            return 0;
        };
        let incident = self.incident(idx);
        for &e in &incident {
            if let Some((s, d)) = self.graph.edge_endpoints(e) {
                let line = EdgeShape::route(&self.graph[s], &self.graph[d]);
                self.graph[e].set_line(line);
            }
        }
        log::trace!("recomputed {} edge(s) of {}", incident.len(), id);
        incident.len()
    }

    fn index_of(&self, id: NodeId) -> Result<NodeIndex, SceneError> {
        self.node_index
            .get(&id)
            .copied()
            .ok_or(SceneError::UnknownNode(id))
    }

    fn incident(&self, idx: NodeIndex) -> Vec<EdgeIndex> {
        let mut edges: Vec<EdgeIndex> = self
            .graph
            .edges_directed(idx, Direction::Outgoing)
            .chain(self.graph.edges_directed(idx, Direction::Incoming))
            .map(|e| e.id())
            .collect();
        edges.sort();
        edges.dedup();
        edges
    }
}
