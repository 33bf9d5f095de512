use glam::Vec2;

use crate::canvas::{BlendMode, Canvas, Hsb};

/// Stroke colour and weight in effect when a primitive was drawn.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Pen {
    pub color: Hsb,
    pub weight: f32,
}

/// A drawing call with the state it was issued under fully resolved.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Primitive {
    Background {
        color: Hsb,
        blend: BlendMode,
    },
    Circle {
        center: Vec2,
        diameter: f32,
        fill: Hsb,
        pen: Pen,
        blend: BlendMode,
    },
    Line {
        a: Vec2,
        b: Vec2,
        pen: Pen,
        blend: BlendMode,
    },
}

/// Drawing state saved by `push` and restored by `pop`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DrawState {
    pub fill: Hsb,
    pub stroke: Hsb,
    pub weight: f32,
    pub blend: BlendMode,
}

impl Default for DrawState {
    fn default() -> Self {
        Self {
            fill: Hsb::WHITE,
            stroke: Hsb::BLACK,
            weight: 1.0,
            blend: BlendMode::Normal,
        }
    }
}

/// A [`Canvas`] that records one frame of primitives for a host to replay.
///
/// The state stack persists across frames like it does on a real sketching
/// surface, so anything not scoped by `push`/`pop` leaks into the next frame.
#[derive(Debug)]
pub struct FrameRecorder {
    size: Vec2,
    state: DrawState,
    saved: Vec<DrawState>,
    primitives: Vec<Primitive>,
}

impl FrameRecorder {
    pub fn new(size: Vec2) -> Self {
        Self {
            size,
            state: DrawState::default(),
            saved: Vec::with_capacity(8),
            primitives: Vec::with_capacity(2048),
        }
    }

    pub fn set_size(&mut self, size: Vec2) {
        self.size = size;
    }

    /// Drawing state currently in effect.
    pub fn state(&self) -> DrawState {
        self.state
    }

    /// Number of `push` calls not yet matched by a `pop`.
    pub fn depth(&self) -> usize {
        self.saved.len()
    }

    pub fn primitives(&self) -> &[Primitive] {
        &self.primitives
    }

    /// Hands out the recorded frame and starts an empty one.
    pub fn take_primitives(&mut self) -> Vec<Primitive> {
        std::mem::take(&mut self.primitives)
    }

    fn pen(&self) -> Pen {
        Pen {
            color: self.state.stroke,
            weight: self.state.weight,
        }
    }
}

impl Canvas for FrameRecorder {
    fn size(&self) -> Vec2 {
        self.size
    }

    fn push(&mut self) {
        self.saved.push(self.state);
    }

    fn pop(&mut self) {
        match self.saved.pop() {
            Some(state) => self.state = state,
            None => log::warn!("pop() called without a matching push(); ignoring"),
        }
    }

    fn fill(&mut self, color: Hsb) {
        self.state.fill = color;
    }

    fn stroke(&mut self, color: Hsb) {
        self.state.stroke = color;
    }

    fn stroke_weight(&mut self, weight: f32) {
        self.state.weight = weight;
    }

    fn blend_mode(&mut self, mode: BlendMode) {
        self.state.blend = mode;
    }

    fn background(&mut self, color: Hsb) {
        self.primitives.push(Primitive::Background {
            color,
            blend: self.state.blend,
        });
    }

    fn circle(&mut self, center: Vec2, diameter: f32) {
        self.primitives.push(Primitive::Circle {
            center,
            diameter,
            fill: self.state.fill,
            pen: self.pen(),
            blend: self.state.blend,
        });
    }

    fn line(&mut self, a: Vec2, b: Vec2) {
        self.primitives.push(Primitive::Line {
            a,
            b,
            pen: self.pen(),
            blend: self.state.blend,
        });
    }
}
