pub mod hit;
pub mod paint;

pub use hit::{Hit, hit_test, hit_test_rect, node_at};
pub use paint::{CanvasTheme, paint_scene};
