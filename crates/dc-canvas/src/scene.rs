//! Scene controller: the shape graph, the scene rect and the interaction
//! state machine.
//!
//! The scene mutates shapes only when the document controller confirms an
//! edit through [`Scene::add_node`], [`Scene::edit_node`] and friends.
//! Pointer and keyboard input arrives through [`Scene::handle`], which runs
//! the gesture state machine and reports intents to a [`GraphController`].

use crate::controller::{GraphController, LabelEditor};
use crate::input::{InputEvent, Modifiers, PointerButton};
use crate::node::{ContextAction, NodeEvents};
use crate::shortcuts::{ShortcutAction, ShortcutMap};
use crate::view::View;
use dc_core::attrs::keys;
use dc_core::dot::quote_label;
use dc_core::geometry::normalized_rect;
use dc_core::layout::{enlarge_to_fit, shrink_after_removal};
use dc_core::{
    CanvasConfig, DotAttrs, EdgeArgs, EdgeId, Footprint, NodeArgs, NodeChange, NodeId, NodeShape,
    SceneError, ShapeGraph, ShapeMetrics, Viewport,
};
use dc_render::{Hit, hit_test, hit_test_rect, node_at};
use kurbo::{Point, Rect, Vec2};
use smallvec::SmallVec;

/// Gesture in progress.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Interaction {
    Idle,
    /// Primary press on empty canvas; the band spans `origin` to `current`.
    RubberBandSelecting { origin: Point, current: Point },
    /// Alt-drag of the selected nodes. `travel` is the offset applied so
    /// far; `moved` is set once any node moved.
    DraggingSelection {
        last: Point,
        travel: Vec2,
        moved: bool,
    },
    /// `node` holds a semi-edge following the pointer.
    DrawingSemiEdge { node: NodeId },
}

/// What the host should do after [`Scene::handle`].
#[derive(Debug, Clone, PartialEq)]
pub enum SceneResponse {
    Ignored,
    Redraw,
    /// Show `actions` for `node` at view position `at`; feed the choice back
    /// through [`Scene::trigger_context_action`].
    ContextMenu {
        node: NodeId,
        at: Point,
        actions: &'static [ContextAction],
    },
}

pub type Selection<T> = SmallVec<[T; 8]>;

/// The canvas scene.
#[derive(Debug)]
pub struct Scene {
    shapes: ShapeGraph,
    config: CanvasConfig,
    metrics: ShapeMetrics,
    view: View,
    bounds: Rect,
    state: Interaction,
    label_focus: Option<NodeId>,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new(CanvasConfig::default())
    }
}

impl Scene {
    pub fn new(config: CanvasConfig) -> Self {
        let view = View::new(Viewport {
            width: config.viewport_width,
            height: config.viewport_height,
        });
        Self {
            shapes: ShapeGraph::new(),
            metrics: ShapeMetrics::from(&config),
            bounds: view.viewport().rect(),
            view,
            config,
            state: Interaction::Idle,
            label_focus: None,
        }
    }

    // ─── Accessors ───────────────────────────────────────────────────────

    pub fn shapes(&self) -> &ShapeGraph {
        &self.shapes
    }

    pub fn node(&self, id: NodeId) -> Option<&NodeShape> {
        self.shapes.node(id)
    }

    pub fn config(&self) -> &CanvasConfig {
        &self.config
    }

    pub fn view(&self) -> &View {
        &self.view
    }

    /// The scene rect: always contains every node at rest.
    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    pub fn state(&self) -> Interaction {
        self.state
    }

    /// Node whose label editor currently has input focus.
    pub fn label_focus(&self) -> Option<NodeId> {
        self.label_focus
    }

    /// Rubber band in scene coordinates, while one is being dragged.
    pub fn rubber_band(&self) -> Option<Rect> {
        match self.state {
            Interaction::RubberBandSelecting { origin, current } => {
                Some(normalized_rect(origin, current))
            }
            _ => None,
        }
    }

    pub fn selected_nodes(&self) -> Selection<NodeId> {
        self.shapes
            .nodes()
            .filter(|n| n.selected)
            .map(|n| n.id)
            .collect()
    }

    pub fn selected_edges(&self) -> Selection<EdgeId> {
        self.shapes
            .edges()
            .filter(|e| e.selected)
            .map(|e| e.id)
            .collect()
    }

    /// The host widget was resized.
    pub fn resize(&mut self, width: f64, height: f64) {
        self.view.set_viewport(Viewport { width, height });
        if self.shapes.is_empty() {
            self.reset_bounds();
        }
    }

    // ─── Controller commands ─────────────────────────────────────────────

    pub fn add_node(&mut self, args: &NodeArgs) -> Result<(), SceneError> {
        self.shapes
            .insert_node(NodeShape::new(args.id, self.metrics))
            .inspect_err(|e| log::warn!("add_node rejected: {e}"))?;
        log::debug!("add node {} at ({}, {})", args.id, args.x, args.y);

        let change = self.apply_node_args(args)?;
        // A fresh node always needs a bounds check, even at the origin.
        self.after_node_change(args.id, NodeChange { pos: true, ..change });
        Ok(())
    }

    pub fn edit_node(&mut self, args: &NodeArgs) -> Result<(), SceneError> {
        let change = self.apply_node_args(args)?;
        if change.geometry() {
            log::debug!("edit node {}: {:?}", args.id, change);
        }
        self.after_node_change(args.id, change);
        Ok(())
    }

    pub fn remove_node(&mut self, args: &NodeArgs) -> Result<(), SceneError> {
        let (node, dropped) = self
            .shapes
            .remove_node(args.id)
            .inspect_err(|e| log::warn!("remove_node rejected: {e}"))?;
        log::debug!("remove node {} ({} attached edge(s))", args.id, dropped.len());

        if self.label_focus == Some(args.id) {
            self.label_focus = None;
        }
        if self.state == (Interaction::DrawingSemiEdge { node: args.id }) {
            self.state = Interaction::Idle;
        }

        if self.shapes.is_empty() {
            self.reset_bounds();
        } else {
            let remaining: Vec<Footprint> = self.shapes.nodes().map(NodeShape::footprint).collect();
            shrink_after_removal(
                &mut self.bounds,
                node.footprint(),
                &remaining,
                self.config.growth_factor,
            );
        }
        Ok(())
    }

    pub fn add_edge(&mut self, args: &EdgeArgs) -> Result<(), SceneError> {
        let edge = self
            .shapes
            .insert_edge(args.id, args.source_id, args.dest_id)
            .inspect_err(|e| log::warn!("add_edge rejected: {e}"))?;
        edge.edit(args);
        log::debug!("add edge {} ({} -> {})", args.id, args.source_id, args.dest_id);
        Ok(())
    }

    pub fn edit_edge(&mut self, args: &EdgeArgs) -> Result<(), SceneError> {
        let edge = self.shapes.edge_mut(args.id).ok_or_else(|| {
            log::warn!("edit_edge rejected: unknown edge {}", args.id);
            SceneError::UnknownEdge(args.id)
        })?;
        if edge.edit(args) {
            log::debug!("edit edge {}", args.id);
        }
        Ok(())
    }

    pub fn remove_edge(&mut self, args: &EdgeArgs) -> Result<(), SceneError> {
        self.shapes
            .remove_edge(args.id)
            .inspect_err(|e| log::warn!("remove_edge rejected: {e}"))?;
        log::debug!("remove edge {}", args.id);
        Ok(())
    }

    fn apply_node_args(&mut self, args: &NodeArgs) -> Result<NodeChange, SceneError> {
        let node = self.shapes.node_mut(args.id).ok_or_else(|| {
            log::warn!("edit_node rejected: unknown node {}", args.id);
            SceneError::UnknownNode(args.id)
        })?;
        Ok(node.edit(args))
    }

    /// Keep edges and the scene rect in step with a node's new geometry.
    fn after_node_change(&mut self, id: NodeId, change: NodeChange) {
        if !change.geometry() {
            return;
        }
        self.shapes.update_edges_of(id);
        if self.enlarge_bounds(id) && change.pos {
            self.center_on_node(id);
        }
    }

    // ─── Scene rect ──────────────────────────────────────────────────────

    /// Grow the scene rect around node `id`. Returns `true` if it grew.
    fn enlarge_bounds(&mut self, id: NodeId) -> bool {
        let Some(node) = self.shapes.node(id) else {
            return false;
        };
        let grew = enlarge_to_fit(&mut self.bounds, node.footprint(), self.config.growth_factor);
        if grew {
            log::debug!("scene rect grew to {:?} for {}", self.bounds, id);
        }
        grew
    }

    fn reset_bounds(&mut self) {
        self.bounds = self.view.viewport().rect();
        log::debug!("scene rect reset to {:?}", self.bounds);
    }

    fn center_on_node(&mut self, id: NodeId) {
        if let Some(node) = self.shapes.node(id) {
            self.view.center_on(node.center());
        }
    }

    // ─── Input ───────────────────────────────────────────────────────────

    /// Run one input event through the state machine.
    pub fn handle(
        &mut self,
        event: &InputEvent,
        controller: &mut dyn GraphController,
        editor: &mut dyn LabelEditor,
    ) -> SceneResponse {
        match event {
            InputEvent::PointerDown {
                pos,
                button,
                modifiers,
            } => self.pointer_down(*pos, *button, *modifiers, controller),
            InputEvent::PointerMove { pos, modifiers } => self.pointer_move(*pos, *modifiers),
            InputEvent::PointerUp { pos, button, .. } => {
                self.pointer_up(*pos, *button, controller)
            }
            InputEvent::DoubleClick { pos, button, .. } => {
                self.double_click(*pos, *button, controller, editor)
            }
            InputEvent::Wheel {
                pos,
                dx,
                dy,
                modifiers,
            } => self.wheel(*pos, Vec2::new(*dx, *dy), *modifiers),
            InputEvent::Key { key, modifiers } => self.key(key, *modifiers, controller),
        }
    }

    fn pointer_down(
        &mut self,
        pos: Point,
        button: PointerButton,
        modifiers: Modifiers,
        controller: &mut dyn GraphController,
    ) -> SceneResponse {
        if self.state != Interaction::Idle {
            if button != PointerButton::Primary {
                return SceneResponse::Ignored;
            }
            // The release of the previous gesture never arrived.
            log::debug!("dropping stale gesture {:?}", self.state);
            self.abort_gesture();
        }
        let at = self.view.map_to_scene(pos);
        let hit = hit_test(&self.shapes, at, self.config.edge_hit_width);

        match (button, hit) {
            (PointerButton::Primary, Some(Hit::Node(id))) => {
                self.press_select(Hit::Node(id), modifiers);
                if modifiers.alt {
                    controller.on_select_item(id);
                    self.state = Interaction::DraggingSelection {
                        last: at,
                        travel: Vec2::ZERO,
                        moved: false,
                    };
                } else if let Some(node) = self.shapes.node_mut(id) {
                    node.press_primary(at, controller);
                    self.state = Interaction::DrawingSemiEdge { node: id };
                }
                SceneResponse::Redraw
            }
            (PointerButton::Primary, Some(hit @ Hit::Edge(_))) => {
                self.press_select(hit, modifiers);
                SceneResponse::Redraw
            }
            (PointerButton::Primary, None) => {
                if !modifiers.ctrl {
                    self.clear_selection();
                }
                self.state = Interaction::RubberBandSelecting {
                    origin: at,
                    current: at,
                };
                SceneResponse::Redraw
            }
            (PointerButton::Secondary, Some(Hit::Node(id))) => match self.shapes.node(id) {
                Some(node) => SceneResponse::ContextMenu {
                    node: id,
                    at: pos,
                    actions: node.context_menu(),
                },
                None => SceneResponse::Ignored,
            },
            _ => SceneResponse::Ignored,
        }
    }

    fn pointer_move(&mut self, pos: Point, modifiers: Modifiers) -> SceneResponse {
        let at = self.view.map_to_scene(pos);
        match self.state {
            Interaction::Idle => SceneResponse::Ignored,
            Interaction::RubberBandSelecting { origin, .. } => {
                self.state = Interaction::RubberBandSelecting {
                    origin,
                    current: at,
                };
                SceneResponse::Redraw
            }
            Interaction::DrawingSemiEdge { node } if modifiers.alt => {
                // Alt turns the edge gesture into a move of the selection.
                let last = self
                    .shapes
                    .node_mut(node)
                    .and_then(|n| n.semi_edge.take())
                    .map_or(at, |semi| semi.tip());
                self.state = Interaction::DraggingSelection {
                    last,
                    travel: Vec2::ZERO,
                    moved: false,
                };
                self.pointer_move(pos, modifiers)
            }
            Interaction::DrawingSemiEdge { node } => {
                let moved = self
                    .shapes
                    .node_mut(node)
                    .is_some_and(|n| n.drag_semi_edge(at));
                if moved {
                    SceneResponse::Redraw
                } else {
                    SceneResponse::Ignored
                }
            }
            Interaction::DraggingSelection {
                last,
                travel,
                moved,
            } => {
                if !modifiers.alt || at == last {
                    self.state = Interaction::DraggingSelection {
                        last: at,
                        travel,
                        moved,
                    };
                    return SceneResponse::Ignored;
                }
                let delta = at - last;
                let count = self.drag_selection(delta);
                self.state = Interaction::DraggingSelection {
                    last: at,
                    travel: travel + delta,
                    moved: moved || count > 0,
                };
                SceneResponse::Redraw
            }
        }
    }

    fn pointer_up(
        &mut self,
        pos: Point,
        button: PointerButton,
        controller: &mut dyn GraphController,
    ) -> SceneResponse {
        if button != PointerButton::Primary {
            return SceneResponse::Ignored;
        }
        let at = self.view.map_to_scene(pos);

        match std::mem::replace(&mut self.state, Interaction::Idle) {
            Interaction::Idle => SceneResponse::Ignored,
            Interaction::DrawingSemiEdge { node } => {
                let target = node_at(&self.shapes, at, Some(node));
                if let Some(shape) = self.shapes.node_mut(node) {
                    shape.release(target, controller);
                }
                SceneResponse::Redraw
            }
            Interaction::RubberBandSelecting { origin, .. } => {
                let band = normalized_rect(origin, at);
                if band.width() > self.config.min_rubber_band
                    || band.height() > self.config.min_rubber_band
                {
                    for hit in hit_test_rect(&self.shapes, band) {
                        self.set_selected(hit, true);
                    }
                }
                SceneResponse::Redraw
            }
            Interaction::DraggingSelection { moved, .. } => {
                if moved {
                    self.commit_moves(controller);
                    SceneResponse::Redraw
                } else {
                    SceneResponse::Ignored
                }
            }
        }
    }

    fn double_click(
        &mut self,
        pos: Point,
        button: PointerButton,
        controller: &mut dyn GraphController,
        editor: &mut dyn LabelEditor,
    ) -> SceneResponse {
        if button != PointerButton::Primary {
            return SceneResponse::Ignored;
        }
        let at = self.view.map_to_scene(pos);

        match hit_test(&self.shapes, at, self.config.edge_hit_width) {
            Some(Hit::Node(id)) => {
                self.begin_label_edit(id, editor);
                SceneResponse::Redraw
            }
            Some(Hit::Edge(_)) => SceneResponse::Ignored,
            None => {
                log::debug!("node requested at ({}, {})", at.x, at.y);
                controller.on_create_node(at.x, at.y);
                SceneResponse::Ignored
            }
        }
    }

    fn wheel(&mut self, pos: Point, delta: Vec2, modifiers: Modifiers) -> SceneResponse {
        if modifiers.ctrl {
            if delta.y == 0.0 {
                return SceneResponse::Ignored;
            }
            self.zoom(pos, delta.y > 0.0);
        } else {
            if delta == Vec2::ZERO {
                return SceneResponse::Ignored;
            }
            self.view.scroll(delta);
        }
        SceneResponse::Redraw
    }

    fn key(
        &mut self,
        key: &str,
        modifiers: Modifiers,
        controller: &mut dyn GraphController,
    ) -> SceneResponse {
        let Some(action) = ShortcutMap::resolve(key, modifiers) else {
            return SceneResponse::Ignored;
        };
        match action {
            ShortcutAction::Delete => {
                if self.delete_selection(controller) > 0 {
                    SceneResponse::Redraw
                } else {
                    SceneResponse::Ignored
                }
            }
            ShortcutAction::Deselect => {
                self.abort_gesture();
                self.clear_selection();
                SceneResponse::Redraw
            }
            ShortcutAction::ZoomIn | ShortcutAction::ZoomOut => {
                let viewport = self.view.viewport();
                let middle = Point::new(viewport.width / 2.0, viewport.height / 2.0);
                self.zoom(middle, action == ShortcutAction::ZoomIn);
                SceneResponse::Redraw
            }
        }
    }

    // ─── Operations ──────────────────────────────────────────────────────

    /// Zoom by one step around view position `anchor`.
    pub fn zoom(&mut self, anchor: Point, zoom_in: bool) {
        let factor = if zoom_in {
            self.config.zoom_step
        } else {
            1.0 / self.config.zoom_step
        };
        self.view.zoom_at(anchor, factor);
        log::trace!("zoom to {}", self.view.scale());
    }

    /// Ask the controller to remove the selection. Returns how many removals
    /// were requested. A node whose label is being edited is left alone.
    pub fn delete_selection(&mut self, controller: &mut dyn GraphController) -> usize {
        let mut requested = 0;
        for id in self.selected_edges() {
            controller.on_remove_edge(id);
            requested += 1;
        }
        for id in self.selected_nodes() {
            if self.label_focus == Some(id) {
                log::debug!("not removing {id}: label editor has focus");
                continue;
            }
            controller.on_remove_node(id);
            requested += 1;
        }
        if requested > 0 {
            log::debug!("requested removal of {requested} item(s)");
        }
        requested
    }

    /// Run an action picked from a node's context menu.
    pub fn trigger_context_action(
        &mut self,
        node: NodeId,
        action: ContextAction,
        editor: &mut dyn LabelEditor,
    ) -> Result<(), SceneError> {
        if self.shapes.node(node).is_none() {
            return Err(SceneError::UnknownNode(node));
        }
        match action {
            ContextAction::EditLabel => self.begin_label_edit(node, editor),
        }
        Ok(())
    }

    fn begin_label_edit(&mut self, id: NodeId, editor: &mut dyn LabelEditor) {
        if let Some(node) = self.shapes.node(id) {
            node.open_label_editor(editor);
            self.label_focus = Some(id);
        }
    }

    /// The label editor for `id` finished with `text`. Reports the new label
    /// unless it is unchanged; returns whether a report was made.
    pub fn commit_label_edit(
        &mut self,
        id: NodeId,
        text: &str,
        controller: &mut dyn GraphController,
    ) -> bool {
        if self.label_focus == Some(id) {
            self.label_focus = None;
        }
        let Some(node) = self.shapes.node(id) else {
            return false;
        };
        if node.label() == text {
            return false;
        }
        let mut attrs = DotAttrs::new();
        attrs.insert(keys::LABEL.to_string(), quote_label(text));
        log::debug!("label of {id} edited");
        controller.on_edit_node(id, attrs);
        true
    }

    pub fn cancel_label_edit(&mut self) {
        self.label_focus = None;
    }

    /// Translate every selected node and recompute its edges.
    fn drag_selection(&mut self, delta: Vec2) -> usize {
        let selected = self.selected_nodes();
        for &id in &selected {
            if let Some(node) = self.shapes.node_mut(id) {
                node.translate(delta);
            }
            self.shapes.update_edges_of(id);
        }
        selected.len()
    }

    /// Report the final position of every dragged node.
    fn commit_moves(&mut self, controller: &mut dyn GraphController) {
        for id in self.selected_nodes() {
            if let Some(node) = self.shapes.node(id) {
                node.report_pos(controller);
            }
            if self.enlarge_bounds(id) {
                self.center_on_node(id);
            }
        }
    }

    /// Drop any gesture in progress without reporting anything. A drag puts
    /// the selection back where the document has it.
    fn abort_gesture(&mut self) {
        match std::mem::replace(&mut self.state, Interaction::Idle) {
            Interaction::DrawingSemiEdge { node } => {
                if let Some(shape) = self.shapes.node_mut(node) {
                    shape.semi_edge = None;
                }
            }
            Interaction::DraggingSelection { travel, .. } if travel != Vec2::ZERO => {
                log::debug!("drag cancelled, moving selection back by {:?}", -travel);
                self.drag_selection(-travel);
            }
            _ => {}
        }
    }

    // ─── Selection ───────────────────────────────────────────────────────

    /// Ctrl toggles; otherwise an unselected hit replaces the selection and
    /// a selected one keeps it, so a multi-selection can be dragged.
    fn press_select(&mut self, hit: Hit, modifiers: Modifiers) {
        if modifiers.ctrl {
            let selected = self.is_selected(hit);
            self.set_selected(hit, !selected);
        } else if !self.is_selected(hit) {
            self.clear_selection();
            self.set_selected(hit, true);
        }
    }

    fn is_selected(&self, hit: Hit) -> bool {
        match hit {
            Hit::Node(id) => self.shapes.node(id).is_some_and(|n| n.selected),
            Hit::Edge(id) => self.shapes.edge(id).is_some_and(|e| e.selected),
        }
    }

    fn set_selected(&mut self, hit: Hit, selected: bool) {
        match hit {
            Hit::Node(id) => {
                if let Some(node) = self.shapes.node_mut(id) {
                    node.selected = selected;
                }
            }
            Hit::Edge(id) => {
                if let Some(edge) = self.shapes.edge_mut(id) {
                    edge.selected = selected;
                }
            }
        }
    }

    pub fn clear_selection(&mut self) {
        for node in self.shapes.nodes_mut() {
            node.selected = false;
        }
        for edge in self.shapes.edges_mut() {
            edge.selected = false;
        }
    }
}
