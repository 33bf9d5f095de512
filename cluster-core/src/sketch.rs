//! Setup and per-frame drawing of the whole animation.

use glam::Vec2;
use rand::Rng;

use crate::{
    canvas::{BlendMode, Canvas, Hsb},
    cluster::Cluster,
    config::Config,
    error::ConfigError,
    field::ClusterField,
};

/// A running animation: the cluster field plus the settings it was built from.
#[derive(Clone, Debug)]
pub struct Sketch {
    pub field: ClusterField,
    cfg: Config,
    frame: u64,
}

impl Sketch {
    /// Builds the initial population for a canvas of the given extent.
    ///
    /// `cfg.cluster_count` ordinary clusters are placed at random centres
    /// within `cfg.spawn_margin` of the edges, each with a random hue and
    /// the default radius range. One growing cluster is then placed the
    /// same way with the highlight hue.
    ///
    /// ### Parameters
    /// - `cfg` - Population and merge settings.
    /// - `extent` - Canvas width and height.
    /// - `rng` - Source of all randomness; nothing is drawn after setup.
    ///
    /// ### Returns
    /// - `Ok(sketch)` for a configuration that passes [`Config::validate`].
    /// - `Err(ConfigError::Invalid)` otherwise; nothing is sampled.
    pub fn setup(cfg: Config, extent: Vec2, rng: &mut impl Rng) -> Result<Self, ConfigError> {
        cfg.validate()?;

        let clusters = (0..cfg.cluster_count)
            .map(|_| {
                let center = spawn_point(extent, cfg.spawn_margin, rng);
                let hue = rng.random_range(0.0..cfg.hue_max);
                Cluster::random(center, hue, &cfg, rng)
            })
            .collect();

        let growing = Cluster::random_growing(spawn_point(extent, cfg.spawn_margin, rng), &cfg, rng);

        log::info!(
            "sketch set up on {:.0}x{:.0}: {} clusters, growing radius {:.1} at {:?}",
            extent.x,
            extent.y,
            cfg.cluster_count,
            growing.radius,
            growing.center
        );

        let field = ClusterField::new(clusters, growing).with_parameters(
            cfg.hit_distance,
            cfg.growth_factor,
            cfg.link_weight,
        );

        Ok(Self {
            field,
            cfg,
            frame: 0,
        })
    }

    pub fn config(&self) -> &Config {
        &self.cfg
    }

    /// Frames drawn since setup.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Draws one frame: a translucent black clear in normal blending, then
    /// the field in additive blending so overlapping lines brighten.
    pub fn draw(&mut self, canvas: &mut impl Canvas) {
        canvas.blend_mode(BlendMode::Normal);
        canvas.background(Hsb::BLACK.with_alpha(self.cfg.background_alpha));
        canvas.blend_mode(BlendMode::Add);

        let merges_before = self.field.merges();
        self.field.render(canvas);
        if self.field.merges() != merges_before && self.field.all_absorbed() {
            log::info!("every cluster absorbed after {} frames", self.frame + 1);
        }

        self.frame += 1;
    }
}

/// Random point at least `margin` away from every edge.
///
/// On an axis shorter than `2 * margin` there is no such point, and the
/// centre of that axis is used instead.
fn spawn_point(extent: Vec2, margin: f32, rng: &mut impl Rng) -> Vec2 {
    let mut axis = |len: f32| {
        if len - margin > margin {
            rng.random_range(margin..len - margin)
        } else {
            len / 2.0
        }
    };
    let x = axis(extent.x);
    let y = axis(extent.y);
    Vec2::new(x, y)
}
