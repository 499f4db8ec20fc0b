//! Pointer behaviour of a single node: semi-edge gestures, label editing,
//! position reports and the context menu.

use crate::controller::{GraphController, LabelEditor};
use dc_core::attrs::keys;
use dc_core::dot::format_pos;
use dc_core::{DotAttrs, NodeId, NodeShape, SemiEdge};
use kurbo::Point;

/// Entries of a node's context menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextAction {
    EditLabel,
}

impl ContextAction {
    pub fn title(self) -> &'static str {
        match self {
            Self::EditLabel => "Edit label",
        }
    }
}

const NODE_MENU: &[ContextAction] = &[ContextAction::EditLabel];

/// Gesture handling the scene delegates to the node under the pointer.
pub trait NodeEvents {
    /// Primary press: select in the document and anchor a semi-edge at `at`.
    fn press_primary(&mut self, at: Point, controller: &mut dyn GraphController);

    /// Move the semi-edge's free end. Returns whether anything moved.
    fn drag_semi_edge(&mut self, at: Point) -> bool;

    /// Drop the semi-edge. If the pointer was released over another node
    /// (`target`), request an edge to it. Returns whether one was requested.
    fn release(&mut self, target: Option<NodeId>, controller: &mut dyn GraphController) -> bool;

    fn open_label_editor(&self, editor: &mut dyn LabelEditor);

    /// Report the current position as the node's DOT `pos`.
    fn report_pos(&self, controller: &mut dyn GraphController);

    fn context_menu(&self) -> &'static [ContextAction];
}

impl NodeEvents for NodeShape {
    fn press_primary(&mut self, at: Point, controller: &mut dyn GraphController) {
        controller.on_select_item(self.id);
        self.semi_edge = Some(SemiEdge::new(at));
    }

    fn drag_semi_edge(&mut self, at: Point) -> bool {
        self.semi_edge.as_mut().is_some_and(|semi| semi.update(at))
    }

    fn release(&mut self, target: Option<NodeId>, controller: &mut dyn GraphController) -> bool {
        if self.semi_edge.take().is_none() {
            return false;
        }
        match target {
            Some(dest) if dest != self.id => {
                log::debug!("edge requested {} -> {}", self.id, dest);
                controller.on_create_edge(self.id, dest);
                true
            }
            _ => false,
        }
    }

    fn open_label_editor(&self, editor: &mut dyn LabelEditor) {
        editor.begin_label_edit(self.id, self.label());
    }

    fn report_pos(&self, controller: &mut dyn GraphController) {
        let pos = self.pos();
        let mut attrs = DotAttrs::new();
        attrs.insert(keys::POS.to_string(), format_pos(pos.x, pos.y));
        controller.on_edit_node(self.id, attrs);
    }

    fn context_menu(&self) -> &'static [ContextAction] {
        NODE_MENU
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::{Intent, IntentLog};
    use dc_core::ShapeMetrics;
    use kurbo::Vec2;
    use pretty_assertions::assert_eq;

    fn node(id: &str) -> NodeShape {
        NodeShape::new(NodeId::intern(id), ShapeMetrics::default())
    }

    #[test]
    fn press_selects_and_anchors_semi_edge() {
        let mut log = IntentLog::new();
        let mut a = node("a");
        a.press_primary(Point::new(3.0, 4.0), &mut log);

        assert_eq!(log.take(), vec![Intent::SelectItem(NodeId::intern("a"))]);
        assert_eq!(a.semi_edge.map(|s| s.anchor()), Some(Point::new(3.0, 4.0)));
        assert!(a.drag_semi_edge(Point::new(50.0, 60.0)));
        assert_eq!(a.semi_edge.map(|s| s.tip()), Some(Point::new(50.0, 60.0)));
    }

    #[test]
    fn release_over_other_node_requests_edge() {
        let mut log = IntentLog::new();
        let mut a = node("a");
        a.press_primary(Point::ZERO, &mut log);
        log.take();

        assert!(a.release(Some(NodeId::intern("b")), &mut log));
        assert!(a.semi_edge.is_none());
        assert_eq!(
            log.take(),
            vec![Intent::CreateEdge {
                source: NodeId::intern("a"),
                dest: NodeId::intern("b")
            }]
        );
    }

    #[test]
    fn release_elsewhere_only_discards() {
        let mut log = IntentLog::new();
        let mut a = node("a");

        a.press_primary(Point::ZERO, &mut log);
        assert!(!a.release(None, &mut log));
        a.press_primary(Point::ZERO, &mut log);
        assert!(!a.release(Some(NodeId::intern("a")), &mut log));
        // Without a semi-edge there is nothing to release.
        assert!(!a.release(Some(NodeId::intern("b")), &mut log));

        assert!(a.semi_edge.is_none());
        assert!(log.take().iter().all(|i| matches!(i, Intent::SelectItem(_))));
    }

    #[test]
    fn position_report_uses_dot_point() {
        let mut log = IntentLog::new();
        let mut a = node("a");
        a.translate(Vec2::new(120.0, -7.5));
        a.report_pos(&mut log);

        let mut attrs = DotAttrs::new();
        attrs.insert("pos".to_string(), "\"120,-7.5\"".to_string());
        assert_eq!(
            log.take(),
            vec![Intent::EditNode {
                id: NodeId::intern("a"),
                attrs
            }]
        );
    }

    #[test]
    fn context_menu_offers_label_editing() {
        let a = node("a");
        assert_eq!(a.context_menu(), &[ContextAction::EditLabel]);
        assert_eq!(ContextAction::EditLabel.title(), "Edit label");

        let mut log = IntentLog::new();
        a.open_label_editor(&mut log);
        assert_eq!(
            log.take(),
            vec![Intent::BeginLabelEdit {
                id: NodeId::intern("a"),
                current: "a".to_string()
            }]
        );
    }
}
