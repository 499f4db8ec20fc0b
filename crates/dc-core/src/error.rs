use crate::id::{EdgeId, NodeId};
use thiserror::Error;

/// A controller command the scene cannot apply.
///
/// The controller is expected to only issue commands against ids it has
/// already confirmed; these errors mean that contract was broken. The scene
/// is left untouched when one is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SceneError {
    #[error("unknown node `{0}`")]
    UnknownNode(NodeId),
    #[error("unknown edge `{0}`")]
    UnknownEdge(EdgeId),
    #[error("node `{0}` already exists")]
    DuplicateNode(NodeId),
    #[error("edge `{0}` already exists")]
    DuplicateEdge(EdgeId),
}
