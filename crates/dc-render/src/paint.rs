//! Shape graph → Vello drawing commands.
//!
//! Paints edges under nodes, then in-progress semi-edges and the rubber
//! band on top. Everything is drawn in scene coordinates under the view
//! transform supplied by the caller.

use dc_core::{EdgeShape, NodeShape, ShapeGraph};
use kurbo::{Affine, BezPath, Line, Rect, Stroke};
use peniko::{Color, Fill};
use vello::Scene as VelloScene;

/// Length of the arrowhead drawn at the destination end of an edge.
const ARROW_LENGTH: f64 = 10.0;
const ARROW_HALF_WIDTH: f64 = 4.0;

/// Colors used by the painter.
#[derive(Debug, Clone, Copy)]
pub struct CanvasTheme {
    pub node_fill: Color,
    pub node_stroke: Color,
    pub edge: Color,
    pub selection: Color,
    pub semi_edge: Color,
    pub rubber_band_fill: Color,
    pub rubber_band_stroke: Color,
}

impl CanvasTheme {
    pub fn light() -> Self {
        Self {
            node_fill: Color::from_rgb8(255, 255, 255),
            node_stroke: Color::from_rgb8(33, 33, 33),
            edge: Color::from_rgb8(33, 33, 33),
            selection: Color::from_rgb8(30, 136, 229),
            semi_edge: Color::from_rgb8(117, 117, 117),
            rubber_band_fill: Color::from_rgba8(30, 136, 229, 40),
            rubber_band_stroke: Color::from_rgba8(30, 136, 229, 200),
        }
    }

    pub fn dark() -> Self {
        Self {
            node_fill: Color::from_rgb8(48, 48, 48),
            node_stroke: Color::from_rgb8(224, 224, 224),
            edge: Color::from_rgb8(224, 224, 224),
            selection: Color::from_rgb8(100, 181, 246),
            semi_edge: Color::from_rgb8(158, 158, 158),
            rubber_band_fill: Color::from_rgba8(100, 181, 246, 40),
            rubber_band_stroke: Color::from_rgba8(100, 181, 246, 200),
        }
    }
}

impl Default for CanvasTheme {
    fn default() -> Self {
        Self::light()
    }
}

/// Paint the whole canvas to a Vello scene.
///
/// Call once per frame with a freshly-cleared `Scene`; `view` maps scene
/// coordinates to view pixels.
pub fn paint_scene(
    scene: &mut VelloScene,
    graph: &ShapeGraph,
    view: Affine,
    rubber_band: Option<Rect>,
    theme: &CanvasTheme,
) {
    for edge in graph.edges() {
        paint_edge(scene, edge, view, theme);
    }
    for node in graph.nodes() {
        paint_node(scene, node, view, theme);
    }
    for semi in graph.nodes().filter_map(|n| n.semi_edge.as_ref()) {
        let dashed = Stroke::new(1.0).with_dashes(0.0, [6.0, 4.0]);
        scene.stroke(&dashed, view, theme.semi_edge, None, &semi.line());
    }
    if let Some(rect) = rubber_band {
        scene.fill(Fill::NonZero, view, theme.rubber_band_fill, None, &rect);
        scene.stroke(&Stroke::new(1.0), view, theme.rubber_band_stroke, None, &rect);
    }
}

fn paint_node(scene: &mut VelloScene, node: &NodeShape, view: Affine, theme: &CanvasTheme) {
    let transform = view * Affine::translate(node.pos().to_vec2());
    let (stroke_color, width) = if node.selected {
        (theme.selection, 2.0)
    } else {
        (theme.node_stroke, 1.0)
    };
    scene.fill(Fill::NonZero, transform, theme.node_fill, None, node.outline());
    scene.stroke(&Stroke::new(width), transform, stroke_color, None, node.outline());

    // Glyph shaping needs a font context; the host draws text into label_rect().
    log::trace!("LABEL {} {:?} at {:?}", node.id, node.label(), node.label_rect());
}

fn paint_edge(scene: &mut VelloScene, edge: &EdgeShape, view: Affine, theme: &CanvasTheme) {
    let (color, width) = if edge.selected {
        (theme.selection, 2.0)
    } else {
        (theme.edge, 1.0)
    };
    let line = edge.line();
    scene.stroke(&Stroke::new(width), view, color, None, &line);
    if let Some(head) = arrow_head(line) {
        scene.fill(Fill::NonZero, view, color, None, &head);
    }
    if let Some(label) = edge.label() {
        log::trace!("LABEL {} {:?} at {:?}", edge.id, label, edge.label_anchor());
    }
}

/// Filled triangle at `line.p1`, pointing along the line.
fn arrow_head(line: Line) -> Option<BezPath> {
    let along = line.p1 - line.p0;
    if along.hypot() < f64::EPSILON {
        return None;
    }
    let dir = along.normalize();
    let base = line.p1 - dir * ARROW_LENGTH;
    let side = kurbo::Vec2::new(-dir.y, dir.x) * ARROW_HALF_WIDTH;

    let mut head = BezPath::new();
    head.move_to(line.p1);
    head.line_to(base + side);
    head.line_to(base - side);
    head.close_path();
    Some(head)
}

#[cfg(test)]
mod tests {
    use super::*;
    use dc_core::{EdgeArgs, EdgeId, NodeId, SemiEdge, ShapeMetrics};
    use kurbo::{Point, Shape};

    fn two_nodes() -> ShapeGraph {
        let mut graph = ShapeGraph::new();
        for (id, x) in [("p", 0.0), ("q", 200.0)] {
            let mut node = NodeShape::new(NodeId::intern(id), ShapeMetrics::default());
            node.edit_pos(x, 0.0);
            graph.insert_node(node).unwrap();
        }
        graph
            .insert_edge(EdgeId::intern("pq"), NodeId::intern("p"), NodeId::intern("q"))
            .unwrap();
        graph
    }

    #[test]
    fn empty_canvas_paints_nothing() {
        let mut scene = VelloScene::new();
        paint_scene(&mut scene, &ShapeGraph::new(), Affine::IDENTITY, None, &CanvasTheme::light());
        assert!(scene.encoding().is_empty());
    }

    #[test]
    fn shapes_and_overlays_are_encoded() {
        let mut graph = two_nodes();
        let mut semi = SemiEdge::new(Point::new(0.0, 0.0));
        semi.update(Point::new(50.0, 80.0));
        graph.node_mut(NodeId::intern("p")).unwrap().semi_edge = Some(semi);

        let mut scene = VelloScene::new();
        paint_scene(
            &mut scene,
            &graph,
            Affine::scale(1.25),
            Some(Rect::new(0.0, 0.0, 10.0, 10.0)),
            &CanvasTheme::dark(),
        );
        assert!(!scene.encoding().is_empty());
    }

    #[test]
    fn labelled_edge_paints_like_plain_edge() {
        let plain = two_nodes();
        let mut labelled = two_nodes();
        labelled
            .edge_mut(EdgeId::intern("pq"))
            .unwrap()
            .edit(&EdgeArgs::new("pq", "p", "q").with_attr("label", "\"next\""));

        let mut a = VelloScene::new();
        let mut b = VelloScene::new();
        paint_scene(&mut a, &plain, Affine::IDENTITY, None, &CanvasTheme::light());
        paint_scene(&mut b, &labelled, Affine::IDENTITY, None, &CanvasTheme::light());
        assert_eq!(a.encoding().n_paths, b.encoding().n_paths);
    }

    #[test]
    fn arrow_head_points_at_destination() {
        let head = arrow_head(Line::new((0.0, 0.0), (100.0, 0.0))).unwrap();
        let bounds = head.bounding_box();
        assert_eq!(bounds.x1, 100.0);
        assert_eq!(bounds.x0, 90.0);
        assert_eq!(bounds.height(), 8.0);
        assert!(arrow_head(Line::new((3.0, 3.0), (3.0, 3.0))).is_none());
    }
}
