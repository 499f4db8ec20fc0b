pub mod controller;
pub mod input;
pub mod node;
pub mod scene;
pub mod shortcuts;
pub mod view;

pub use controller::{GraphController, Intent, IntentLog, LabelEditor};
pub use input::{InputEvent, Modifiers, PointerButton};
pub use node::{ContextAction, NodeEvents};
pub use scene::{Interaction, Scene, SceneResponse, Selection};
pub use shortcuts::{ShortcutAction, ShortcutMap};
pub use view::View;
