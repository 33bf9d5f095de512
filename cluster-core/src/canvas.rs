//! Drawing surface supplied by the host runtime.
//!
//! The simulation never talks to a window directly. It issues drawing calls
//! against a [`Canvas`], which keeps a stack of drawing state (fill, stroke,
//! stroke weight, blend mode) in the style of immediate-mode sketching
//! environments: [`Canvas::push`] saves the state and [`Canvas::pop`]
//! restores it.

use glam::Vec2;

/// A colour in HSB space with every channel scaled to `0..=255`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Hsb {
    pub h: f32,
    pub s: f32,
    pub b: f32,
    pub a: f32,
}

impl Hsb {
    pub const WHITE: Hsb = Hsb::new(0.0, 0.0, 255.0);
    pub const BLACK: Hsb = Hsb::new(0.0, 0.0, 0.0);

    /// Opaque colour.
    pub const fn new(h: f32, s: f32, b: f32) -> Self {
        Self { h, s, b, a: 255.0 }
    }

    pub const fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }

    /// Fully saturated, full brightness colour of the given hue.
    pub const fn vivid(hue: f32) -> Self {
        Self::new(hue, 255.0, 255.0)
    }

    /// Fixed node colour of the growing cluster.
    pub const HIGHLIGHT: Hsb = Hsb::new(255.0, 0.0, 255.0);
}

/// How new pixels combine with what is already on the canvas.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BlendMode {
    /// Regular alpha compositing.
    #[default]
    Normal,
    /// Colours are summed; overlapping lines brighten.
    Add,
}

/// Primitive drawing operations and scoped drawing state.
pub trait Canvas {
    /// Current drawable extent in canvas units (width, height).
    fn size(&self) -> Vec2;

    /// Saves the current drawing state.
    fn push(&mut self);

    /// Restores the state saved by the matching [`Canvas::push`].
    fn pop(&mut self);

    fn fill(&mut self, color: Hsb);

    fn stroke(&mut self, color: Hsb);

    fn stroke_weight(&mut self, weight: f32);

    fn blend_mode(&mut self, mode: BlendMode);

    /// Paints the whole canvas with `color`; a translucent colour leaves
    /// faded traces of earlier frames.
    fn background(&mut self, color: Hsb);

    /// Filled and stroked circle of the given diameter.
    fn circle(&mut self, center: Vec2, diameter: f32);

    fn line(&mut self, a: Vec2, b: Vec2);
}
