//! Translucent-background trails for a repaint-from-scratch UI.
//!
//! The sketch clears each frame with a translucent black, so earlier frames
//! fade out instead of vanishing. egui repaints everything every frame, so
//! [`Afterimage`] keeps the most recent frames and hands them back with the
//! fade factor each one would have reached.

use std::collections::VecDeque;

use cluster_core::canvas::{BlendMode, Hsb};
use cluster_core::recorder::Primitive;
use egui::{Color32, Pos2, Shape, Stroke, ecolor::Hsva};

/// Hard cap on retained frames, reached when the background is almost clear.
pub const MAX_DEPTH: usize = 48;

/// Fade below which a frame no longer shows up on an 8-bit display.
const VISIBLE: f32 = 1.0 / 255.0;

#[derive(Debug)]
pub struct Afterimage {
    frames: VecDeque<Vec<Primitive>>,
    decay: f32,
    depth: usize,
}

impl Afterimage {
    /// ### Parameters
    /// - `background_alpha` - Alpha (0-255) of the per-frame clear; each
    ///   older frame keeps `1 - alpha / 255` of its brightness.
    pub fn new(background_alpha: f32) -> Self {
        let decay = (1.0 - background_alpha / 255.0).clamp(0.0, 1.0);
        let depth = if decay <= 0.0 {
            1
        } else if decay >= 1.0 {
            MAX_DEPTH
        } else {
            let frames = (VISIBLE.ln() / decay.ln()).ceil() as usize;
            frames.clamp(1, MAX_DEPTH)
        };

        Self {
            frames: VecDeque::with_capacity(depth),
            decay,
            depth,
        }
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Adds the newest frame, dropping the oldest once full.
    pub fn push(&mut self, frame: Vec<Primitive>) {
        if self.frames.len() == self.depth {
            self.frames.pop_front();
        }
        self.frames.push_back(frame);
    }

    /// Retained frames, oldest first, with the fade to draw each at.
    pub fn layers(&self) -> impl Iterator<Item = (f32, &[Primitive])> {
        let newest = self.frames.len().saturating_sub(1);
        self.frames
            .iter()
            .enumerate()
            .map(move |(i, frame)| (self.decay.powi((newest - i) as i32), frame.as_slice()))
    }
}

/// Converts an HSB colour to an egui colour, additive when `blend` says so.
pub fn to_color32(color: Hsb, blend: BlendMode, fade: f32) -> Color32 {
    let hsva = Hsva::new(
        color.h / 255.0,
        color.s / 255.0,
        color.b / 255.0,
        color.a / 255.0,
    );
    let c = Color32::from(hsva);
    let c = match blend {
        BlendMode::Normal => c,
        // Premultiplied colour with zero alpha is added onto the target.
        BlendMode::Add => {
            let [r, g, b, _] = c.to_array();
            Color32::from_rgba_premultiplied(r, g, b, 0)
        }
    };
    c.gamma_multiply(fade)
}

/// Appends the egui shapes for one primitive.
///
/// Backgrounds are skipped: the panel is painted black and fading is
/// handled by [`Afterimage::layers`].
pub fn push_shapes(out: &mut Vec<Shape>, primitive: &Primitive, origin: Pos2, fade: f32) {
    let at = |p: glam::Vec2| origin + egui::vec2(p.x, p.y);

    match *primitive {
        Primitive::Background { .. } => {}
        Primitive::Circle {
            center,
            diameter,
            fill,
            pen,
            blend,
        } => {
            let radius = diameter / 2.0;
            out.push(Shape::circle_filled(
                at(center),
                radius,
                to_color32(fill, blend, fade),
            ));
            out.push(Shape::circle_stroke(
                at(center),
                radius,
                Stroke::new(pen.weight, to_color32(pen.color, blend, fade)),
            ));
        }
        Primitive::Line { a, b, pen, blend } => {
            out.push(Shape::line_segment(
                [at(a), at(b)],
                Stroke::new(pen.weight, to_color32(pen.color, blend, fade)),
            ));
        }
    }
}
