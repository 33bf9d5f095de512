//! Ring-shaped clusters of nodes that drift across the canvas.
//!
//! A [`Cluster`] owns [`RING_NODES`] nodes evenly spaced around its centre.
//! Every frame it moves by its velocity, bounces off the canvas edges, and
//! draws its ring outline plus one circle per node. The single growing
//! cluster shares all of that and differs only in colouring and in being
//! able to [`Cluster::grow`].

use std::f32::consts::TAU;

use glam::Vec2;
use rand::Rng;

use crate::{
    canvas::{Canvas, Hsb},
    config::Config,
    node::Node,
    types::RING_NODES,
};

/// Node diameter used when a cluster is built without a [`Config`].
pub const DEFAULT_NODE_SIZE: f32 = 10.0;

/// Which role a cluster plays in the field.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClusterKind {
    /// Drifts, bounces and can be absorbed.
    Ordinary,
    /// The one cluster that absorbs others and grows.
    Growing,
}

#[derive(Clone, Debug)]
pub struct Cluster {
    pub kind: ClusterKind,
    pub center: Vec2,
    pub velocity: Vec2,
    pub radius: f32,
    pub hue: f32,
    pub nodes: Vec<Node>,
}

impl Cluster {
    /// Builds a cluster with its ring nodes placed at equal angular steps
    /// (`TAU / RING_NODES`), starting at angle 0.
    ///
    /// ### Parameters
    /// - `kind` - Ordinary or growing.
    /// - `center` - Initial centre position.
    /// - `velocity` - Per-frame drift.
    /// - `hue` - Colour identity, fixed for the cluster's lifetime.
    /// - `radius` - Ring radius.
    /// - `node_size` - Diameter of each node circle.
    pub fn new(
        kind: ClusterKind,
        center: Vec2,
        velocity: Vec2,
        hue: f32,
        radius: f32,
        node_size: f32,
    ) -> Self {
        let step = TAU / RING_NODES as f32;
        let nodes = (0..RING_NODES)
            .map(|k| {
                let angle = k as f32 * step;
                let offset = Vec2::new(angle.cos(), angle.sin()) * radius;
                let mut node = Node::new(offset, node_size);
                node.update(center);
                node
            })
            .collect();

        Self {
            kind,
            center,
            velocity,
            radius,
            hue,
            nodes,
        }
    }

    pub fn ordinary(center: Vec2, velocity: Vec2, hue: f32, radius: f32) -> Self {
        Self::new(
            ClusterKind::Ordinary,
            center,
            velocity,
            hue,
            radius,
            DEFAULT_NODE_SIZE,
        )
    }

    pub fn growing(center: Vec2, velocity: Vec2, hue: f32, radius: f32) -> Self {
        Self::new(
            ClusterKind::Growing,
            center,
            velocity,
            hue,
            radius,
            DEFAULT_NODE_SIZE,
        )
    }

    /// Ordinary cluster with radius and velocity drawn from `cfg`.
    pub fn random(center: Vec2, hue: f32, cfg: &Config, rng: &mut impl Rng) -> Self {
        let radius = rng.random_range(cfg.radius.range());
        let velocity = random_velocity(cfg.max_speed, rng);
        Self::new(
            ClusterKind::Ordinary,
            center,
            velocity,
            hue,
            radius,
            cfg.node_size,
        )
    }

    /// Growing cluster: smaller radius range and the highlight hue.
    pub fn random_growing(center: Vec2, cfg: &Config, rng: &mut impl Rng) -> Self {
        let radius = rng.random_range(cfg.growing_radius.range());
        let velocity = random_velocity(cfg.max_speed, rng);
        Self::new(
            ClusterKind::Growing,
            center,
            velocity,
            cfg.highlight_hue,
            radius,
            cfg.node_size,
        )
    }

    pub fn is_growing(&self) -> bool {
        self.kind == ClusterKind::Growing
    }

    /// Moves the centre by one velocity step, then flips the velocity on
    /// every axis where the new centre lies outside `[radius, extent - radius]`.
    ///
    /// The check runs after the move, so a cluster may overshoot the margin
    /// for one frame before heading back.
    pub fn advance(&mut self, extent: Vec2) {
        self.center += self.velocity;

        if self.center.x < self.radius || self.center.x > extent.x - self.radius {
            self.velocity.x = -self.velocity.x;
        }
        if self.center.y < self.radius || self.center.y > extent.y - self.radius {
            self.velocity.y = -self.velocity.y;
        }
    }

    pub fn refresh_node_positions(&mut self) {
        let center = self.center;
        for node in &mut self.nodes {
            node.update(center);
        }
    }

    /// Closed outline through the ring nodes, last node joined to the first.
    pub fn render_ring(&self, canvas: &mut impl Canvas) {
        let n = self.nodes.len();
        for i in 0..n {
            let a = self.nodes[i].position;
            let b = self.nodes[(i + 1) % n].position;
            canvas.line(a, b);
        }
    }

    /// Updates motion and node positions, then draws the ring and nodes.
    ///
    /// Drawing state is saved before and restored after, so colours set
    /// here never reach sibling clusters or the field-level lines.
    pub fn render(&mut self, canvas: &mut impl Canvas) {
        canvas.push();

        if self.kind == ClusterKind::Ordinary {
            let color = Hsb::vivid(self.hue);
            canvas.fill(color);
            canvas.stroke(color);
        }

        self.advance(canvas.size());
        self.refresh_node_positions();
        self.render_ring(canvas);

        if self.kind == ClusterKind::Growing {
            canvas.fill(Hsb::HIGHLIGHT);
        }
        for node in &self.nodes {
            node.render(canvas);
        }

        canvas.pop();
    }

    /// Scales every ring offset by `factor` and re-derives the radius.
    ///
    /// Only the growing cluster can grow; on an ordinary cluster this is a
    /// no-op.
    pub fn grow(&mut self, factor: f32) {
        if self.kind != ClusterKind::Growing {
            log::debug!("ignoring grow({}) on an ordinary cluster", factor);
            return;
        }

        for node in &mut self.nodes {
            node.scale(factor);
        }
        // All offsets share one magnitude, so any node will do.
        if let Some(first) = self.nodes.first() {
            self.radius = first.offset.length();
        }
    }
}

fn random_velocity(max_speed: f32, rng: &mut impl Rng) -> Vec2 {
    Vec2::new(
        rng.random_range(-max_speed..max_speed),
        rng.random_range(-max_speed..max_speed),
    )
}
