//! View transform: scene coordinates ↔ view pixels.

use dc_core::Viewport;
use kurbo::{Affine, Point, Vec2};

/// Maps scene coordinates to view pixels as `view = scene * scale + offset`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct View {
    scale: f64,
    offset: Vec2,
    viewport: Viewport,
}

impl View {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            scale: 1.0,
            offset: Vec2::ZERO,
            viewport,
        }
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn offset(&self) -> Vec2 {
        self.offset
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    /// Scene → view transform, for painting.
    pub fn transform(&self) -> Affine {
        Affine::translate(self.offset) * Affine::scale(self.scale)
    }

    pub fn map_to_scene(&self, p: Point) -> Point {
        Point::new(
            (p.x - self.offset.x) / self.scale,
            (p.y - self.offset.y) / self.scale,
        )
    }

    pub fn map_from_scene(&self, p: Point) -> Point {
        Point::new(
            p.x * self.scale + self.offset.x,
            p.y * self.scale + self.offset.y,
        )
    }

    /// Scale by `factor`, keeping the scene point under `anchor` (view pixels) fixed.
    pub fn zoom_at(&mut self, anchor: Point, factor: f64) {
        let before = self.map_to_scene(anchor);
        self.scale *= factor;
        let after = self.map_to_scene(anchor);
        self.translate(after - before);
    }

    /// Shift the scene by `delta` scene units.
    pub fn translate(&mut self, delta: Vec2) {
        self.offset += delta * self.scale;
    }

    /// Shift the view by `delta` view pixels.
    pub fn scroll(&mut self, delta: Vec2) {
        self.offset += delta;
    }

    /// Put scene point `p` at the middle of the viewport.
    pub fn center_on(&mut self, p: Point) {
        let middle = Vec2::new(self.viewport.width / 2.0, self.viewport.height / 2.0);
        self.offset = middle - p.to_vec2() * self.scale;
    }
}

impl Default for View {
    fn default() -> Self {
        Self::new(Viewport::default())
    }
}
