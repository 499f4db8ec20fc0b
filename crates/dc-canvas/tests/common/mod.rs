//! Shared harness: a toy document that records canvas intents and replays
//! its confirmations into the scene, the way a real controller would.

#![allow(dead_code)]

use dc_canvas::{InputEvent, Intent, IntentLog, Modifiers, PointerButton, Scene, SceneResponse};
use dc_core::attrs::keys;
use dc_core::dot::parse_pos;
use dc_core::{EdgeArgs, EdgeId, NodeArgs, NodeId};
use kurbo::Point;
use std::collections::BTreeMap;

pub struct Document {
    /// Intents reported by the canvas, not yet confirmed.
    pub log: IntentLog,
    /// Label editor requests.
    pub editor: IntentLog,
    pub nodes: BTreeMap<NodeId, NodeArgs>,
    pub edges: BTreeMap<EdgeId, EdgeArgs>,
    next_id: usize,
}

impl Document {
    pub fn new() -> Self {
        Self {
            log: IntentLog::new(),
            editor: IntentLog::new(),
            nodes: BTreeMap::new(),
            edges: BTreeMap::new(),
            next_id: 0,
        }
    }

    /// Load `fixtures/triangle.json` into a fresh document and scene.
    pub fn triangle() -> (Self, Scene) {
        let _ = env_logger::builder().is_test(true).try_init();

        let fixture: serde_json::Value =
            serde_json::from_str(include_str!("../fixtures/triangle.json")).unwrap();
        let nodes: Vec<NodeArgs> = serde_json::from_value(fixture["nodes"].clone()).unwrap();
        let edges: Vec<EdgeArgs> = serde_json::from_value(fixture["edges"].clone()).unwrap();

        let mut doc = Self::new();
        let mut scene = Scene::default();
        for node in nodes {
            scene.add_node(&node).unwrap();
            doc.nodes.insert(node.id, node);
        }
        for edge in edges {
            scene.add_edge(&edge).unwrap();
            doc.edges.insert(edge.id, edge);
        }
        (doc, scene)
    }

    pub fn send(&mut self, scene: &mut Scene, event: InputEvent) -> SceneResponse {
        scene.handle(&event, &mut self.log, &mut self.editor)
    }

    /// Apply every pending intent to the document and echo it into the scene.
    /// Returns the intents that were processed.
    pub fn confirm(&mut self, scene: &mut Scene) -> Vec<Intent> {
        let intents = self.log.take();
        for intent in &intents {
            match intent {
                Intent::CreateNode { x, y } => {
                    let args = NodeArgs::new(self.fresh_id("n").as_str(), *x, *y);
                    scene.add_node(&args).unwrap();
                    self.nodes.insert(args.id, args);
                }
                Intent::EditNode { id, attrs } => {
                    let args = self.nodes.get_mut(id).unwrap();
                    for (key, value) in attrs {
                        if key == keys::POS {
                            let (x, y) = parse_pos(value).unwrap();
                            args.x = x;
                            args.y = y;
                        }
                        args.dot_attrs.insert(key.clone(), value.clone());
                    }
                    scene.edit_node(args).unwrap();
                }
                Intent::RemoveNode(id) => {
                    let attached: Vec<EdgeId> = self
                        .edges
                        .values()
                        .filter(|e| e.source_id == *id || e.dest_id == *id)
                        .map(|e| e.id)
                        .collect();
                    for edge in attached {
                        if let Some(args) = self.edges.remove(&edge) {
                            scene.remove_edge(&args).unwrap();
                        }
                    }
                    if let Some(args) = self.nodes.remove(id) {
                        scene.remove_node(&args).unwrap();
                    }
                }
                Intent::CreateEdge { source, dest } => {
                    let args = EdgeArgs::new(self.fresh_id("e").as_str(), *source, *dest);
                    scene.add_edge(&args).unwrap();
                    self.edges.insert(args.id, args);
                }
                Intent::RemoveEdge(id) => {
                    if let Some(args) = self.edges.remove(id) {
                        scene.remove_edge(&args).unwrap();
                    }
                }
                Intent::SelectItem(_) | Intent::BeginLabelEdit { .. } => {}
            }
        }
        intents
    }

    fn fresh_id(&mut self, prefix: &str) -> String {
        self.next_id += 1;
        format!("{prefix}{}", self.next_id)
    }
}

// ─── Events in scene coordinates ─────────────────────────────────────────

fn to_view(scene: &Scene, x: f64, y: f64) -> Point {
    scene.view().map_from_scene(Point::new(x, y))
}

pub fn press(scene: &Scene, x: f64, y: f64, modifiers: Modifiers) -> InputEvent {
    InputEvent::PointerDown {
        pos: to_view(scene, x, y),
        button: PointerButton::Primary,
        modifiers,
    }
}

pub fn drag(scene: &Scene, x: f64, y: f64, modifiers: Modifiers) -> InputEvent {
    InputEvent::PointerMove {
        pos: to_view(scene, x, y),
        modifiers,
    }
}

pub fn release(scene: &Scene, x: f64, y: f64) -> InputEvent {
    InputEvent::PointerUp {
        pos: to_view(scene, x, y),
        button: PointerButton::Primary,
        modifiers: Modifiers::NONE,
    }
}

pub fn double_click(scene: &Scene, x: f64, y: f64) -> InputEvent {
    InputEvent::DoubleClick {
        pos: to_view(scene, x, y),
        button: PointerButton::Primary,
        modifiers: Modifiers::NONE,
    }
}

/// Click (press + release) at a scene position.
pub fn click(doc: &mut Document, scene: &mut Scene, x: f64, y: f64) {
    let down = press(scene, x, y, Modifiers::NONE);
    doc.send(scene, down);
    let up = release(scene, x, y);
    doc.send(scene, up);
}

/// Alt-drag the node under `(x, y)` to `(to_x, to_y)` and release.
pub fn alt_drag(doc: &mut Document, scene: &mut Scene, (x, y): (f64, f64), (to_x, to_y): (f64, f64)) {
    let down = press(scene, x, y, Modifiers::ALT);
    doc.send(scene, down);
    let mid = drag(scene, (x + to_x) / 2.0, (y + to_y) / 2.0, Modifiers::ALT);
    doc.send(scene, mid);
    let end = drag(scene, to_x, to_y, Modifiers::ALT);
    doc.send(scene, end);
    let up = release(scene, to_x, to_y);
    doc.send(scene, up);
}

pub fn id(s: &str) -> NodeId {
    NodeId::intern(s)
}

pub fn eid(s: &str) -> EdgeId {
    EdgeId::intern(s)
}
