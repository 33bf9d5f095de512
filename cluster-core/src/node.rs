use glam::Vec2;

use crate::canvas::Canvas;

/// One point on a cluster ring.
#[derive(Clone, Debug, PartialEq)]
pub struct Node {
    pub offset: Vec2,
    pub size: f32,
    pub position: Vec2,
}

impl Node {
    pub fn new(offset: Vec2, size: f32) -> Self {
        Self {
            offset,
            size,
            position: Vec2::ZERO,
        }
    }

    /// Recomputes the absolute position from the owning cluster's centre.
    pub fn update(&mut self, center: Vec2) -> Vec2 {
        self.position = center + self.offset;
        self.position
    }

    pub fn render(&self, canvas: &mut impl Canvas) {
        canvas.circle(self.position, self.size);
    }

    pub fn scale(&mut self, factor: f32) {
        self.offset *= factor;
    }
}
