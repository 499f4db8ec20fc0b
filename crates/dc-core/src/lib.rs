pub mod attrs;
pub mod config;
pub mod dot;
pub mod error;
pub mod geometry;
pub mod id;
pub mod layout;
pub mod model;

pub use attrs::{DotAttrs, EdgeArgs, NodeArgs};
pub use config::CanvasConfig;
pub use error::SceneError;
pub use id::{EdgeId, NodeId};
pub use layout::{Footprint, Viewport};
pub use model::*;

// Re-export kurbo so downstream crates share one geometry version
pub use kurbo;
