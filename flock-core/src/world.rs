use crate::{
    boid::Boid,
    config::Config,
    force_buffer::ForceBuffer,
    phases,
    predator::Predator,
    quadtree::{QuadTree, Rect},
};
use glam::Vec2;
use rand::rngs::ThreadRng;
use rand::Rng;

/// An external repulsion event: an outward push on every boid within
/// `radius` of `position`, scaled by `strength` times each boid's own
/// maximum speed.
#[derive(Clone, Copy, Debug)]
pub struct Repulsion {
    pub position: Vec2,
    pub radius: f32,
    pub strength: f32,
}

/// The live simulation: population, predator, spatial index and bounds.
///
/// One `World` value owns all mutable state; whatever drives the frame
/// loop holds it and calls [`World::tick`] once per frame, reading boid
/// and predator positions back through the public fields afterwards.
///
/// The quad-tree is rebuilt from scratch inside every tick and never
/// outlives one; the population is append-only.
pub struct World {
    pub boids: Vec<Boid>,
    pub predator: Predator,
    pub index: QuadTree,
    pub cfg: Config,
    pub width: f32,
    pub height: f32,
    forces: ForceBuffer,
    rng: ThreadRng,
}

impl World {
    /// Creates an empty world of the given size with the predator at its
    /// center.
    pub fn new(width: f32, height: f32, cfg: Config) -> Self {
        let mut rng = rand::rng();
        let half = Vec2::new(width * 0.5, height * 0.5);
        let predator = Predator::new(half, &cfg, &mut rng);

        Self {
            boids: Vec::new(),
            predator,
            index: QuadTree::new(Rect::new(half, half), cfg.quadtree_capacity),
            cfg,
            width,
            height,
            forces: ForceBuffer::with_len(0),
            rng,
        }
    }

    /// Advances the simulation one tick.
    ///
    /// Queued events are applied first: one boid spawned per position in
    /// `spawns`, then each entry in `repulsions` pushed into the affected
    /// boids' accelerations. The phase pipeline then runs: index rebuild,
    /// steering, integration with edge wrap, predator patrol.
    pub fn tick(&mut self, spawns: &[Vec2], repulsions: &[Repulsion]) {
        for &pos in spawns {
            self.spawn_boid(pos.x, pos.y);
        }
        for r in repulsions {
            self.apply_repulsion(r.position, r.radius, r.strength);
        }

        phases::index_phase(&self.boids, &mut self.index);
        phases::steering_phase(
            &self.boids,
            &self.predator,
            &self.index,
            &self.cfg,
            &mut self.forces,
        );
        phases::integration_phase(&mut self.boids, &self.forces, self.width, self.height);
        phases::predator_phase(&mut self.predator, self.width, self.height, &mut self.rng);
    }

    /// Appends one boid at `(x, y)` with a randomized initial velocity.
    pub fn spawn_boid(&mut self, x: f32, y: f32) {
        self.boids
            .push(Boid::new(Vec2::new(x, y), &self.cfg, &mut self.rng));
    }

    /// Scatters `count` boids uniformly across the world.
    pub fn spawn_random(&mut self, count: usize) {
        for _ in 0..count {
            let x = self.rng.random_range(0.0..self.width);
            let y = self.rng.random_range(0.0..self.height);
            self.spawn_boid(x, y);
        }
    }

    /// Pushes every boid within `radius` of `center` directly away from
    /// it, with magnitude `strength` times the boid's maximum speed.
    ///
    /// The push lands in the boids' accelerations and takes effect at the
    /// next integration.
    pub fn apply_repulsion(&mut self, center: Vec2, radius: f32, strength: f32) {
        for boid in &mut self.boids {
            let distance = center.distance(boid.position);
            if distance < radius {
                let push =
                    (boid.position - center).normalize_or_zero() * (boid.max_speed * strength);
                boid.apply_force(push);
            }
        }
    }
}
