//! The collection of clusters and the merge rule between them.
//!
//! A frame of the field runs in three steps:
//! 1. [`ClusterField::detect_and_resolve_merges`] — at most one ordinary
//!    cluster close enough to the growing cluster is removed, and the
//!    growing cluster grows.
//! 2. Every remaining cluster renders itself (which also moves it).
//! 3. Connective lines join ring node `k` of each cluster to ring node `k`
//!    of the next one, wrapping from the growing cluster back to the first.

use glam::Vec2;

use crate::{
    canvas::{Canvas, Hsb},
    cluster::Cluster,
    error::FieldError,
    types::{ClusterIndex, RING_NODES},
};

/// Centre distance under which the growing cluster absorbs another.
pub const HIT_DISTANCE: f32 = 50.0;
/// Ring scale applied to the growing cluster per merge.
pub const GROWTH_FACTOR: f32 = 1.1;
/// Stroke weight of connective lines.
pub const LINK_WEIGHT: f32 = 0.5;

/// Owner of all clusters.
///
/// Ordinary clusters are kept in one ordered sequence that only ever
/// shrinks; the growing cluster is stored separately and is logically the
/// last element of the combined order used for drawing.
#[derive(Clone, Debug)]
pub struct ClusterField {
    clusters: Vec<Cluster>,
    growing: Cluster,
    hit_distance: f32,
    growth_factor: f32,
    link_weight: f32,
    merges: usize,
}

impl ClusterField {
    /// Creates a field from ordinary clusters and the growing cluster.
    ///
    /// Uses the default merge parameters ([`HIT_DISTANCE`],
    /// [`GROWTH_FACTOR`], [`LINK_WEIGHT`]); see
    /// [`ClusterField::with_parameters`] to override them.
    ///
    /// # Panics
    /// If `growing` is not a [`Growing`](crate::cluster::ClusterKind::Growing)
    /// cluster or any of `clusters` is. Use [`ClusterField::from_sequence`]
    /// to get an error instead.
    pub fn new(clusters: Vec<Cluster>, growing: Cluster) -> Self {
        assert!(
            growing.is_growing(),
            "ClusterField::new needs a growing cluster in `growing`"
        );
        assert!(
            clusters.iter().all(|c| !c.is_growing()),
            "ClusterField::new accepts only ordinary clusters in `clusters`"
        );
        Self {
            clusters,
            growing,
            hit_distance: HIT_DISTANCE,
            growth_factor: GROWTH_FACTOR,
            link_weight: LINK_WEIGHT,
            merges: 0,
        }
    }

    /// Builds a field from one sequence whose last element is the growing
    /// cluster.
    ///
    /// ### Returns
    /// - `Ok(field)` if exactly one growing cluster is present and it is last.
    /// - `Err(FieldError::MissingGrowing)` if the sequence is empty or its
    ///   last cluster is ordinary (and no other growing cluster exists).
    /// - `Err(FieldError::MisplacedGrowing)` if a growing cluster sits
    ///   anywhere before the last slot.
    pub fn from_sequence(mut clusters: Vec<Cluster>) -> Result<Self, FieldError> {
        let len = clusters.len();
        if let Some(index) = clusters
            .iter()
            .take(len.saturating_sub(1))
            .position(Cluster::is_growing)
        {
            return Err(FieldError::MisplacedGrowing { index, len });
        }

        match clusters.pop() {
            Some(growing) if growing.is_growing() => Ok(Self::new(clusters, growing)),
            _ => Err(FieldError::MissingGrowing),
        }
    }

    /// Overrides the merge distance, growth factor and link stroke weight.
    pub fn with_parameters(
        mut self,
        hit_distance: f32,
        growth_factor: f32,
        link_weight: f32,
    ) -> Self {
        self.hit_distance = hit_distance;
        self.growth_factor = growth_factor;
        self.link_weight = link_weight;
        self
    }

    /// Total number of clusters, growing cluster included; never zero.
    pub fn count(&self) -> usize {
        self.clusters.len() + 1
    }

    /// `true` once every ordinary cluster has been absorbed.
    pub fn all_absorbed(&self) -> bool {
        self.clusters.is_empty()
    }

    pub fn ordinary(&self) -> &[Cluster] {
        &self.clusters
    }

    pub fn growing(&self) -> &Cluster {
        &self.growing
    }

    /// Number of merges resolved so far.
    pub fn merges(&self) -> usize {
        self.merges
    }

    /// Iterates all clusters in drawing order: ordinary clusters first,
    /// the growing cluster last.
    pub fn iter(&self) -> impl Iterator<Item = &Cluster> {
        self.clusters.iter().chain(std::iter::once(&self.growing))
    }

    fn get(&self, index: usize) -> &Cluster {
        self.clusters.get(index).unwrap_or(&self.growing)
    }

    /// Absorbs the first ordinary cluster within reach of the growing one.
    ///
    /// Ordinary clusters are scanned in their current order. The first one
    /// whose centre is closer than the hit distance to the growing
    /// cluster's centre is removed, the growing cluster grows by the growth
    /// factor, and the scan stops. Other clusters in range wait for a
    /// later frame.
    ///
    /// ### Returns
    /// - `Some(index)` - Index the absorbed cluster occupied before removal.
    /// - `None` - Nothing was in range.
    pub fn detect_and_resolve_merges(&mut self) -> Option<ClusterIndex> {
        let target = self.growing.center;
        let index = self
            .clusters
            .iter()
            .position(|c| c.center.distance(target) < self.hit_distance)?;

        let absorbed = self.clusters.remove(index);
        self.growing.grow(self.growth_factor);
        self.merges += 1;

        log::debug!(
            "merged cluster {} (hue {:.0}) at {:?}; growing radius now {:.1}, {} left",
            index,
            absorbed.hue,
            absorbed.center,
            self.growing.radius,
            self.clusters.len()
        );
        Some(index)
    }

    /// Runs one frame: merges, per-cluster rendering, connective lines.
    ///
    /// Merges are resolved before anything is drawn, so no removed cluster
    /// is ever touched by this frame's line pass.
    pub fn render(&mut self, canvas: &mut impl Canvas) {
        self.detect_and_resolve_merges();

        for cluster in &mut self.clusters {
            cluster.render(canvas);
        }
        self.growing.render(canvas);

        self.render_links(canvas);
    }

    /// Draws lines between corresponding ring nodes of neighbouring
    /// clusters, using the left cluster's hue.
    ///
    /// With only the growing cluster left there is no pair to connect and
    /// nothing is drawn.
    pub fn render_links(&self, canvas: &mut impl Canvas) {
        let n = self.count();
        if n < 2 {
            return;
        }

        for i in 0..n {
            let left = self.get(i);
            let right = self.get((i + 1) % n);

            canvas.push();
            canvas.stroke(Hsb::vivid(left.hue));
            canvas.stroke_weight(self.link_weight);
            for (a, b) in link_segments(left, right) {
                canvas.line(a, b);
            }
            canvas.pop();
        }
    }
}

fn link_segments<'a>(
    left: &'a Cluster,
    right: &'a Cluster,
) -> impl Iterator<Item = (Vec2, Vec2)> + 'a {
    left.nodes
        .iter()
        .zip(&right.nodes)
        .take(RING_NODES)
        .map(|(a, b)| (a.position, b.position))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::BlendMode;
    use crate::recorder::{FrameRecorder, Primitive};

    const EXTENT: Vec2 = Vec2::new(1000.0, 1000.0);

    fn still(center: Vec2, hue: f32) -> Cluster {
        Cluster::ordinary(center, Vec2::ZERO, hue, 100.0)
    }

    fn still_growing(center: Vec2) -> Cluster {
        Cluster::growing(center, Vec2::ZERO, 255.0, 20.0)
    }

    fn links(prims: &[Primitive]) -> Vec<(Vec2, Vec2, f32, f32)> {
        prims
            .iter()
            .filter_map(|p| match *p {
                Primitive::Line { a, b, pen, .. } if pen.weight == LINK_WEIGHT => {
                    Some((a, b, pen.color.h, pen.weight))
                }
                _ => None,
            })
            .collect()
    }

    #[test]
    fn merge_triggers_only_below_hit_distance() {
        // Exactly at the threshold: no merge.
        let mut field = ClusterField::new(
            vec![still(Vec2::new(550.0, 500.0), 0.0)],
            still_growing(Vec2::new(500.0, 500.0)),
        );
        assert_eq!(field.detect_and_resolve_merges(), None);
        assert_eq!(field.count(), 2);

        // Just inside: merge.
        let mut field = ClusterField::new(
            vec![still(Vec2::new(549.0, 500.0), 0.0)],
            still_growing(Vec2::new(500.0, 500.0)),
        );
        assert_eq!(field.detect_and_resolve_merges(), Some(0));
        assert_eq!(field.count(), 1);
        assert!(field.all_absorbed());
        assert_eq!(field.merges(), 1);
    }

    #[test]
    fn merge_grows_radius_by_growth_factor() {
        let mut field = ClusterField::new(
            vec![still(Vec2::new(510.0, 500.0), 0.0)],
            still_growing(Vec2::new(500.0, 500.0)),
        );
        let before = field.growing().nodes[0].offset.length();

        field.detect_and_resolve_merges();

        let after = field.growing().radius;
        assert!((after - before * GROWTH_FACTOR).abs() < 1e-4);
    }

    #[test]
    fn at_most_one_merge_per_call_and_first_in_order_wins() {
        let mut field = ClusterField::new(
            vec![
                still(Vec2::new(900.0, 900.0), 1.0),
                still(Vec2::new(510.0, 500.0), 2.0),
                still(Vec2::new(490.0, 500.0), 3.0),
            ],
            still_growing(Vec2::new(500.0, 500.0)),
        );

        assert_eq!(field.detect_and_resolve_merges(), Some(1));

        let hues: Vec<f32> = field.ordinary().iter().map(|c| c.hue).collect();
        assert_eq!(hues, vec![1.0, 3.0]);

        // The other cluster in range is absorbed on the next call.
        assert_eq!(field.detect_and_resolve_merges(), Some(1));
        assert_eq!(field.ordinary().len(), 1);
        assert_eq!(field.merges(), 2);
    }

    #[test]
    fn scenario_three_clusters_on_a_line() {
        // Ordinary clusters at (0,0) and (40,0), growing at (45,0). Both are
        // within reach; scan order is insertion order, so (0,0) goes first.
        let mut field = ClusterField::new(
            vec![still(Vec2::new(0.0, 0.0), 0.0), still(Vec2::new(40.0, 0.0), 50.0)],
            still_growing(Vec2::new(45.0, 0.0)),
        );

        assert_eq!(field.detect_and_resolve_merges(), Some(0));

        assert_eq!(field.count(), 2);
        assert_eq!(field.ordinary()[0].center, Vec2::new(40.0, 0.0));
        assert_eq!(field.ordinary()[0].hue, 50.0);
        assert!(field.growing().is_growing());
        assert!((field.growing().radius - 22.0).abs() < 1e-4);
    }

    #[test]
    fn growing_cluster_stays_last_through_every_merge() {
        let mut field = ClusterField::new(
            (0..5)
                .map(|i| still(Vec2::new(500.0 + i as f32, 500.0), i as f32))
                .collect(),
            still_growing(Vec2::new(500.0, 500.0)),
        );
        let mut rec = FrameRecorder::new(EXTENT);

        for _ in 0..8 {
            field.render(&mut rec);
            let last = field.iter().last().unwrap();
            assert!(last.is_growing());
            assert_eq!(field.iter().filter(|c| c.is_growing()).count(), 1);
        }

        assert!(field.all_absorbed());
        assert_eq!(field.merges(), 5);
    }

    #[test]
    fn render_draws_links_between_neighbours_with_wraparound() {
        let mut field = ClusterField::new(
            vec![still(Vec2::new(200.0, 200.0), 10.0), still(Vec2::new(800.0, 200.0), 20.0)],
            still_growing(Vec2::new(500.0, 800.0)),
        );
        let mut rec = FrameRecorder::new(EXTENT);

        field.render(&mut rec);

        let lines = links(rec.primitives());
        assert_eq!(lines.len(), 3 * RING_NODES);

        // Left cluster's hue, pair by pair: 0->1, 1->growing, growing->0.
        assert!(lines[..RING_NODES].iter().all(|l| l.2 == 10.0));
        assert!(lines[RING_NODES..2 * RING_NODES].iter().all(|l| l.2 == 20.0));
        assert!(lines[2 * RING_NODES..].iter().all(|l| l.2 == 255.0));

        // Node k joins node k of the neighbour.
        let clusters: Vec<&Cluster> = field.iter().collect();
        for k in 0..RING_NODES {
            assert_eq!(lines[k].0, clusters[0].nodes[k].position);
            assert_eq!(lines[k].1, clusters[1].nodes[k].position);
            let w = 2 * RING_NODES + k;
            assert_eq!(lines[w].0, clusters[2].nodes[k].position);
            assert_eq!(lines[w].1, clusters[0].nodes[k].position);
        }
    }

    #[test]
    fn links_use_post_merge_order_and_current_positions() {
        let mut field = ClusterField::new(
            vec![
                Cluster::ordinary(Vec2::new(200.0, 200.0), Vec2::new(1.0, 0.0), 10.0, 60.0),
                still(Vec2::new(510.0, 500.0), 20.0),
            ],
            still_growing(Vec2::new(500.0, 500.0)),
        );
        let mut rec = FrameRecorder::new(EXTENT);

        field.render(&mut rec);

        // The absorbed cluster is gone from the link pass.
        let lines = links(rec.primitives());
        assert_eq!(lines.len(), 2 * RING_NODES);
        assert!(lines.iter().all(|l| l.2 != 20.0));

        // Lines start where the moving cluster is after this frame's step.
        let moved = &field.ordinary()[0];
        assert_eq!(moved.center, Vec2::new(201.0, 200.0));
        assert_eq!(lines[0].0, moved.nodes[0].position);
    }

    #[test]
    fn lone_growing_cluster_renders_without_links() {
        let mut field = ClusterField::new(Vec::new(), still_growing(Vec2::new(500.0, 500.0)));
        let mut rec = FrameRecorder::new(EXTENT);

        field.render(&mut rec);

        assert_eq!(field.count(), 1);
        assert_eq!(field.detect_and_resolve_merges(), None);
        // Ring and nodes only.
        assert_eq!(rec.primitives().len(), 2 * RING_NODES);
        assert!(links(rec.primitives()).is_empty());
    }

    #[test]
    fn render_keeps_drawing_state_balanced() {
        let mut field = ClusterField::new(
            vec![still(Vec2::new(200.0, 200.0), 10.0), still(Vec2::new(800.0, 200.0), 20.0)],
            still_growing(Vec2::new(500.0, 800.0)),
        );
        let mut rec = FrameRecorder::new(EXTENT);
        rec.blend_mode(BlendMode::Add);
        let before = rec.state();

        field.render(&mut rec);

        assert_eq!(rec.depth(), 0);
        assert_eq!(rec.state(), before);
    }

    #[test]
    fn absorbed_field_still_counts_the_growing_cluster() {
        let mut field = ClusterField::new(
            vec![still(Vec2::new(510.0, 500.0), 0.0)],
            still_growing(Vec2::new(500.0, 500.0)),
        );
        assert!(!field.all_absorbed());
        assert_eq!(field.count(), 2);

        field.detect_and_resolve_merges();

        assert!(field.all_absorbed());
        assert_eq!(field.count(), 1);
    }

    #[test]
    #[should_panic]
    fn new_rejects_growing_cluster_among_ordinary_ones() {
        ClusterField::new(
            vec![still_growing(Vec2::ZERO)],
            still_growing(Vec2::new(500.0, 500.0)),
        );
    }

    #[test]
    #[should_panic]
    fn new_rejects_ordinary_cluster_as_growing() {
        ClusterField::new(Vec::new(), still(Vec2::ZERO, 0.0));
    }

    #[test]
    fn from_sequence_requires_growing_cluster_last() {
        let ok = ClusterField::from_sequence(vec![
            still(Vec2::ZERO, 0.0),
            still_growing(Vec2::ZERO),
        ])
        .unwrap();
        assert_eq!(ok.count(), 2);

        let missing = ClusterField::from_sequence(vec![still(Vec2::ZERO, 0.0)]).unwrap_err();
        assert_eq!(missing, FieldError::MissingGrowing);

        let empty = ClusterField::from_sequence(Vec::new()).unwrap_err();
        assert_eq!(empty, FieldError::MissingGrowing);

        let misplaced = ClusterField::from_sequence(vec![
            still_growing(Vec2::ZERO),
            still(Vec2::ZERO, 0.0),
        ])
        .unwrap_err();
        assert_eq!(misplaced, FieldError::MisplacedGrowing { index: 0, len: 2 });
    }

    #[test]
    fn custom_parameters_change_merge_reach() {
        let mut field = ClusterField::new(
            vec![still(Vec2::new(580.0, 500.0), 0.0)],
            still_growing(Vec2::new(500.0, 500.0)),
        )
        .with_parameters(100.0, 2.0, 0.25);

        assert_eq!(field.detect_and_resolve_merges(), Some(0));
        assert!((field.growing().radius - 40.0).abs() < 1e-4);
    }
}
