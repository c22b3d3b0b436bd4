use crate::config::Config;
use crate::predator::Predator;
use glam::Vec2;
use rand::Rng;

/// Position and velocity of one neighbor, snapshotted for force
/// computation.
///
/// Steering reads neighbors through this view instead of the live
/// population, so a whole tick's forces are computed against the same
/// tick-start state.
#[derive(Clone, Copy, Debug)]
pub struct Neighbor {
    pub position: Vec2,
    pub velocity: Vec2,
}

/// A single flocking agent.
///
/// Per-boid parameters are copied out of [`Config`] at spawn time, so a
/// later config change only affects newly spawned boids.
#[derive(Clone, Copy, Debug)]
pub struct Boid {
    pub position: Vec2,
    pub velocity: Vec2,
    pub acceleration: Vec2,
    pub max_speed: f32,
    pub max_force: f32,
    pub perception_radius: f32,
}

impl Boid {
    /// Creates a boid at `position` with velocity components drawn
    /// uniformly from `[-1, 1]`.
    pub fn new(position: Vec2, cfg: &Config, rng: &mut impl Rng) -> Self {
        let velocity = Vec2::new(
            rng.random_range(-1.0..=1.0),
            rng.random_range(-1.0..=1.0),
        );
        Self {
            position,
            velocity,
            acceleration: Vec2::ZERO,
            max_speed: cfg.max_speed,
            max_force: cfg.max_force,
            perception_radius: cfg.perception_radius,
        }
    }

    pub fn apply_force(&mut self, force: Vec2) {
        self.acceleration += force;
    }

    /// Steering force toward a world-space target: desired direction at
    /// full speed, minus the current velocity, limited to `max_force`.
    ///
    /// A target coinciding with the current position yields a zero desired
    /// direction (the normalize guard), so the result is pure braking.
    pub fn steer_towards(&self, target: Vec2) -> Vec2 {
        let desired = (target - self.position).normalize_or_zero() * self.max_speed;
        (desired - self.velocity).clamp_length_max(self.max_force)
    }

    /// Integrates one tick: position by velocity, velocity by accumulated
    /// acceleration, speed clamped to `max_speed`, acceleration zeroed.
    pub fn update(&mut self) {
        self.position += self.velocity;
        self.velocity += self.acceleration;
        self.velocity = self.velocity.clamp_length_max(self.max_speed);
        self.acceleration = Vec2::ZERO;
    }

    /// Toroidal wraparound: a boid leaving the world re-enters exactly at
    /// the opposite edge (at 0 or the bound, not modulo-continuous).
    pub fn handle_edges(&mut self, width: f32, height: f32) {
        if self.position.x > width {
            self.position.x = 0.0;
        } else if self.position.x < 0.0 {
            self.position.x = width;
        }

        if self.position.y > height {
            self.position.y = 0.0;
        } else if self.position.y < 0.0 {
            self.position.y = height;
        }
    }

    /// Velocity-matching force: steer toward the average velocity of the
    /// neighbors strictly within the perception radius.
    ///
    /// Neighbors arrive pre-filtered to a square around this boid; each
    /// force re-checks the circular radius, so corner points inside the
    /// square but outside the circle are fetched yet ignored. Both stages
    /// are part of the query contract.
    pub fn align(&self, neighbors: &[Neighbor]) -> Vec2 {
        let mut steering = Vec2::ZERO;
        let mut total = 0;
        for other in neighbors {
            let distance = self.position.distance(other.position);
            if distance > 0.0 && distance < self.perception_radius {
                steering += other.velocity;
                total += 1;
            }
        }
        if total > 0 {
            steering /= total as f32;
            steering = steering.normalize_or_zero() * self.max_speed - self.velocity;
            steering = steering.clamp_length_max(self.max_force);
        }
        steering
    }

    /// Center-of-mass force: steer toward the average neighbor position.
    pub fn cohesion(&self, neighbors: &[Neighbor]) -> Vec2 {
        let mut center = Vec2::ZERO;
        let mut total = 0;
        for other in neighbors {
            let distance = self.position.distance(other.position);
            if distance > 0.0 && distance < self.perception_radius {
                center += other.position;
                total += 1;
            }
        }
        if total > 0 {
            center /= total as f32;
            return self.steer_towards(center);
        }
        Vec2::ZERO
    }

    /// Crowding-avoidance force: away from each neighbor, weighted by
    /// inverse distance.
    pub fn separation(&self, neighbors: &[Neighbor]) -> Vec2 {
        let mut steering = Vec2::ZERO;
        let mut total = 0;
        for other in neighbors {
            let distance = self.position.distance(other.position);
            if distance > 0.0 && distance < self.perception_radius {
                steering += (self.position - other.position) / distance / distance;
                total += 1;
            }
        }
        if total > 0 {
            steering /= total as f32;
            steering = steering.normalize_or_zero() * self.max_speed - self.velocity;
            steering = steering.clamp_length_max(self.max_force);
        }
        steering
    }

    /// Evasion force away from the predator, active inside `avoid_radius`.
    ///
    /// A boid exactly on the predator divides by zero distance and
    /// propagates the resulting non-finite values, matching the rest of
    /// the unguarded scalar math.
    pub fn avoid_predator(&self, predator: &Predator, avoid_radius: f32) -> Vec2 {
        let mut steer = Vec2::ZERO;
        let distance = self.position.distance(predator.position);

        if distance < avoid_radius {
            steer += (self.position - predator.position).normalize_or_zero() / distance;
        }

        if steer.length() > 0.0 {
            steer = steer.normalize_or_zero() * self.max_speed - self.velocity;
            steer = steer.clamp_length_max(self.max_force);
        }
        steer
    }
}
