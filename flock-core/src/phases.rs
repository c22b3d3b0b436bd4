//! High-level simulation phases for the boid–predator system.
//!
//! The per-tick update loop looks like:
//! 1. [`index_phase`] — rebuild the quad-tree from current boid positions.
//! 2. [`steering_phase`] — compute predator avoidance plus the weighted
//!    flocking forces for every boid into a [`ForceBuffer`].
//! 3. [`integration_phase`] — apply the buffered forces, integrate motion
//!    and wrap positions at the world edges.
//! 4. [`predator_phase`] — advance the predator's scripted patrol.
//!
//! Steering only reads boid state while integration only writes it, so
//! every force in a tick is computed against the same tick-start
//! population.

use crate::{
    boid::{Boid, Neighbor},
    config::Config,
    force_buffer::ForceBuffer,
    predator::Predator,
    quadtree::{IndexedPoint, QuadTree, Rect},
};
use glam::Vec2;
use rand::Rng;

/// Clears the index and reinserts every boid's current position.
///
/// Each point carries the boid's index as its payload so queries can be
/// mapped back to live boids. A boid outside the root boundary fails to
/// insert and is silently absent from this tick's queries; wraparound at
/// the end of the previous tick normally keeps everything in bounds.
pub fn index_phase(boids: &[Boid], index: &mut QuadTree) {
    index.clear();
    for (id, boid) in boids.iter().enumerate() {
        index.insert(IndexedPoint {
            pos: boid.position,
            boid: id,
        });
    }
}

/// Accumulates each boid's combined steering force into `forces`.
///
/// For every boid:
///
/// 1. Add the predator-avoidance force.
/// 2. Query the index for points within a square of half-extent
///    `perception_radius` centered on the boid, excluding the boid itself
///    by id.
/// 3. Snapshot the matching boids as [`Neighbor`] values and add the
///    alignment, cohesion and separation forces, each scaled by its
///    weight from `cfg`.
///
/// The buffer is resized (and cleared) to `boids.len()` at the start via
/// [`ForceBuffer::ensure_len`]. Query and neighbor scratch space is reused
/// across the whole population.
pub fn steering_phase(
    boids: &[Boid],
    predator: &Predator,
    index: &QuadTree,
    cfg: &Config,
    forces: &mut ForceBuffer,
) {
    forces.ensure_len(boids.len());

    let mut found: Vec<IndexedPoint> = Vec::new();
    let mut neighbors: Vec<Neighbor> = Vec::new();

    for (id, boid) in boids.iter().enumerate() {
        forces.add(id, boid.avoid_predator(predator, cfg.predator_avoid_radius));

        found.clear();
        let range = Rect::new(boid.position, Vec2::splat(boid.perception_radius));
        index.query(&range, &mut found);

        neighbors.clear();
        neighbors.extend(found.iter().filter(|p| p.boid != id).map(|p| {
            let other = &boids[p.boid];
            Neighbor {
                position: other.position,
                velocity: other.velocity,
            }
        }));

        let flock = boid.align(&neighbors) * cfg.alignment_weight
            + boid.cohesion(&neighbors) * cfg.cohesion_weight
            + boid.separation(&neighbors) * cfg.separation_weight;
        forces.add(id, flock);
    }
}

/// Applies the buffered forces and integrates every boid.
///
/// Runs strictly after [`steering_phase`]: this is the write barrier that
/// lets steering read a consistent population. Forces accumulate on top of
/// anything already in a boid's acceleration (external repulsion events
/// land there between ticks).
pub fn integration_phase(boids: &mut [Boid], forces: &ForceBuffer, width: f32, height: f32) {
    for (id, boid) in boids.iter_mut().enumerate() {
        boid.apply_force(forces.force(id));
        boid.update();
        boid.handle_edges(width, height);
    }
}

/// Advances the predator's patrol and handles its edge turnaround.
pub fn predator_phase(predator: &mut Predator, width: f32, height: f32, rng: &mut impl Rng) {
    predator.update();
    predator.handle_edges(width, height, rng);
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn world_index(width: f32, height: f32, capacity: usize) -> QuadTree {
        let half = Vec2::new(width * 0.5, height * 0.5);
        QuadTree::new(Rect::new(half, half), capacity)
    }

    fn still_boid(x: f32, y: f32) -> Boid {
        Boid {
            position: Vec2::new(x, y),
            velocity: Vec2::ZERO,
            acceleration: Vec2::ZERO,
            max_speed: 2.0,
            max_force: 0.03,
            perception_radius: 50.0,
        }
    }

    fn far_predator() -> Predator {
        let mut rng = StdRng::seed_from_u64(9);
        let mut predator = Predator::new(Vec2::new(5000.0, 5000.0), &Config::default(), &mut rng);
        predator.velocity = Vec2::ZERO;
        predator
    }

    #[test]
    fn index_phase_makes_all_in_bounds_boids_queryable() {
        let boids = vec![still_boid(10.0, 10.0), still_boid(90.0, 90.0)];
        let mut index = world_index(100.0, 100.0, 4);

        index_phase(&boids, &mut index);
        index_phase(&boids, &mut index); // rebuild must not duplicate

        let mut found = Vec::new();
        index.query(&Rect::new(Vec2::new(50.0, 50.0), Vec2::new(50.0, 50.0)), &mut found);
        let mut ids: Vec<usize> = found.iter().map(|p| p.boid).collect();
        ids.sort_unstable();
        assert_eq!(ids, vec![0, 1]);
    }

    #[test]
    fn index_phase_silently_drops_out_of_bounds_boids() {
        let boids = vec![still_boid(10.0, 10.0), still_boid(150.0, 10.0)];
        let mut index = world_index(100.0, 100.0, 4);

        index_phase(&boids, &mut index);

        let mut found = Vec::new();
        index.query(&Rect::new(Vec2::new(75.0, 75.0), Vec2::new(100.0, 100.0)), &mut found);
        let ids: Vec<usize> = found.iter().map(|p| p.boid).collect();
        assert_eq!(ids, vec![0]);
    }

    #[test]
    fn steering_pushes_a_threatened_boid_away_from_the_predator() {
        let cfg = Config::default();
        let boids = vec![still_boid(450.0, 500.0)];
        let mut predator = far_predator();
        predator.position = Vec2::new(500.0, 500.0); // 50 units away

        let mut index = world_index(1000.0, 1000.0, cfg.quadtree_capacity);
        index_phase(&boids, &mut index);

        let mut forces = ForceBuffer::with_len(0);
        steering_phase(&boids, &predator, &index, &cfg, &mut forces);

        let away = boids[0].position - predator.position;
        assert!(
            forces.force(0).dot(away) > 0.0,
            "net force must have a component away from the predator"
        );
    }

    #[test]
    fn steering_ignores_a_distant_predator_and_isolated_boids() {
        let cfg = Config::default();
        let boids = vec![still_boid(100.0, 100.0)];
        let predator = far_predator();

        let mut index = world_index(10000.0, 10000.0, cfg.quadtree_capacity);
        index_phase(&boids, &mut index);

        let mut forces = ForceBuffer::with_len(0);
        steering_phase(&boids, &predator, &index, &cfg, &mut forces);

        assert_eq!(forces.force(0), Vec2::ZERO);
    }

    #[test]
    fn steering_excludes_self_from_the_neighbor_set() {
        // A lone boid only ever sees itself in the query square; with self
        // excluded, every flocking force must stay zero even though the
        // query returns a point.
        let cfg = Config::default();
        let mut boid = still_boid(100.0, 100.0);
        boid.velocity = Vec2::new(2.0, 0.0);
        let boids = vec![boid];

        let mut index = world_index(10000.0, 10000.0, cfg.quadtree_capacity);
        index_phase(&boids, &mut index);

        let mut forces = ForceBuffer::with_len(0);
        steering_phase(&boids, &far_predator(), &index, &cfg, &mut forces);

        assert_eq!(forces.force(0), Vec2::ZERO);
    }

    #[test]
    fn integration_applies_buffered_forces_and_wraps() {
        let mut boids = vec![still_boid(99.0, 50.0)];
        boids[0].velocity = Vec2::new(2.0, 0.0);

        let mut forces = ForceBuffer::with_len(1);
        forces.add(0, Vec2::new(0.01, 0.0));

        integration_phase(&mut boids, &forces, 100.0, 100.0);

        // 99 + 2 = 101 > 100: wraps to the exact left edge.
        assert_eq!(boids[0].position.x, 0.0);
        assert!((boids[0].velocity.x - 2.0).abs() < 1e-5, "speed stays clamped");
        assert_eq!(boids[0].acceleration, Vec2::ZERO);
    }

    #[test]
    fn predator_phase_turns_around_at_the_left_edge() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut predator = far_predator();
        predator.position = Vec2::new(0.4, 100.0);
        predator.start_y = 100.0;

        predator_phase(&mut predator, 800.0, 600.0, &mut rng);

        // One leftward step crosses x = 0 and restarts a rightward pass.
        assert_eq!(predator.direction, crate::predator::SweepDirection::Right);
        assert_eq!(predator.position.x, 0.0);
    }
}
