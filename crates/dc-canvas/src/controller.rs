//! Collaborators the canvas reports edit intents to.
//!
//! The canvas never mutates the document. Every user edit becomes a call on
//! a [`GraphController`]; the controller applies it to the document and,
//! once the document confirms, calls back into the scene (`add_node`,
//! `edit_node`, ...). Confirmations are delivered after the notifying call
//! returns, never from inside it.

use dc_core::{DotAttrs, EdgeId, NodeId};

/// The document side of the canvas.
pub trait GraphController {
    /// A node should be created at scene position `(x, y)`.
    fn on_create_node(&mut self, x: f64, y: f64);

    /// Node `id` should get `attrs` merged into its DOT attributes.
    fn on_edit_node(&mut self, id: NodeId, attrs: DotAttrs);

    fn on_remove_node(&mut self, id: NodeId);

    /// An edge `source -> dest` should be created.
    fn on_create_edge(&mut self, source: NodeId, dest: NodeId);

    fn on_remove_edge(&mut self, id: EdgeId);

    /// The user picked node `id` on the canvas; the document view may follow.
    fn on_select_item(&mut self, id: NodeId);
}

/// Host widget that edits node labels in place.
pub trait LabelEditor {
    /// Open an editor over node `id`, prefilled with its display label.
    /// The host later calls `Scene::commit_label_edit` or `Scene::cancel_label_edit`.
    fn begin_label_edit(&mut self, id: NodeId, current: &str);
}

/// A reported intent, as captured by [`IntentLog`].
#[derive(Debug, Clone, PartialEq)]
pub enum Intent {
    CreateNode { x: f64, y: f64 },
    EditNode { id: NodeId, attrs: DotAttrs },
    RemoveNode(NodeId),
    CreateEdge { source: NodeId, dest: NodeId },
    RemoveEdge(EdgeId),
    SelectItem(NodeId),
    BeginLabelEdit { id: NodeId, current: String },
}

/// Queues intents for hosts that process them outside the input handler,
/// e.g. by posting them to another thread or an undo stack.
#[derive(Debug, Default)]
pub struct IntentLog {
    pub intents: Vec<Intent>,
}

impl IntentLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drain everything recorded so far.
    pub fn take(&mut self) -> Vec<Intent> {
        std::mem::take(&mut self.intents)
    }

    pub fn is_empty(&self) -> bool {
        self.intents.is_empty()
    }

    fn push(&mut self, intent: Intent) {
        log::trace!("intent {intent:?}");
        self.intents.push(intent);
    }
}

impl GraphController for IntentLog {
    fn on_create_node(&mut self, x: f64, y: f64) {
        self.push(Intent::CreateNode { x, y });
    }

    fn on_edit_node(&mut self, id: NodeId, attrs: DotAttrs) {
        self.push(Intent::EditNode { id, attrs });
    }

    fn on_remove_node(&mut self, id: NodeId) {
        self.push(Intent::RemoveNode(id));
    }

    fn on_create_edge(&mut self, source: NodeId, dest: NodeId) {
        self.push(Intent::CreateEdge { source, dest });
    }

    fn on_remove_edge(&mut self, id: EdgeId) {
        self.push(Intent::RemoveEdge(id));
    }

    fn on_select_item(&mut self, id: NodeId) {
        self.push(Intent::SelectItem(id));
    }
}

impl LabelEditor for IntentLog {
    fn begin_label_edit(&mut self, id: NodeId, current: &str) {
        self.push(Intent::BeginLabelEdit {
            id,
            current: current.to_string(),
        });
    }
}
