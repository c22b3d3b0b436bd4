use crate::config::Config;
use glam::Vec2;
use rand::Rng;

/// Horizontal sweep direction of the predator's patrol.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SweepDirection {
    Left,
    Right,
}

impl SweepDirection {
    pub fn sign(self) -> f32 {
        match self {
            SweepDirection::Left => -1.0,
            SweepDirection::Right => 1.0,
        }
    }

    pub fn flipped(self) -> Self {
        match self {
            SweepDirection::Left => SweepDirection::Right,
            SweepDirection::Right => SweepDirection::Left,
        }
    }
}

/// A scripted predator the boids evade.
///
/// The predator does not flock: it patrols the world horizontally at
/// constant speed while its vertical position follows a sine wave anchored
/// at `start_y`. Reaching a world edge flips the sweep, re-randomizes the
/// wave anchor and restarts the patrol from the opposite edge.
#[derive(Clone, Copy, Debug)]
pub struct Predator {
    pub position: Vec2,
    pub velocity: Vec2,
    pub acceleration: Vec2,
    pub max_speed: f32,
    pub max_force: f32,
    /// Body radius, used by the view layer.
    pub radius: f32,
    /// Anchor of the sinusoidal vertical track for the current pass.
    pub start_y: f32,
    pub direction: SweepDirection,
    pub wave_amplitude: f32,
    pub wave_frequency: f32,
}

impl Predator {
    pub fn new(position: Vec2, cfg: &Config, rng: &mut impl Rng) -> Self {
        let velocity = Vec2::new(
            rng.random_range(-1.0..=1.0),
            rng.random_range(-1.0..=1.0),
        );
        Self {
            position,
            velocity,
            acceleration: Vec2::ZERO,
            max_speed: cfg.predator_max_speed,
            max_force: cfg.predator_max_force,
            radius: cfg.predator_radius,
            start_y: position.y,
            direction: SweepDirection::Left,
            wave_amplitude: cfg.wave_amplitude,
            wave_frequency: cfg.wave_frequency,
        }
    }

    pub fn apply_force(&mut self, force: Vec2) {
        self.acceleration += force;
    }

    /// Advances the patrol one tick.
    ///
    /// The wave offset is derived from the pre-step x position, then the
    /// horizontal velocity is pinned to `max_speed` in the sweep
    /// direction, merged with any applied forces, speed-limited and
    /// integrated.
    pub fn update(&mut self) {
        let wave = (self.position.x * self.wave_frequency).sin() * self.wave_amplitude;
        self.position.y = self.start_y + wave;

        self.velocity.x = self.max_speed * self.direction.sign();
        self.velocity += self.acceleration;
        self.velocity = self.velocity.clamp_length_max(self.max_speed);
        self.position += self.velocity;
        self.acceleration = Vec2::ZERO;
    }

    /// Flips the sweep at the world edges and starts a fresh pass from the
    /// opposite side with a new random wave anchor.
    pub fn handle_edges(&mut self, width: f32, height: f32, rng: &mut impl Rng) {
        let left_exit = self.direction == SweepDirection::Left && self.position.x < 0.0;
        let right_exit = self.direction == SweepDirection::Right && self.position.x > width;

        if left_exit || right_exit {
            self.direction = self.direction.flipped();
            self.start_y = rng.random_range(0.0..height);
            self.position.x = match self.direction {
                SweepDirection::Right => 0.0,
                SweepDirection::Left => width,
            };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn test_predator(position: Vec2) -> Predator {
        let mut rng = StdRng::seed_from_u64(1);
        let mut predator = Predator::new(position, &Config::default(), &mut rng);
        predator.velocity = Vec2::ZERO;
        predator
    }

    #[test]
    fn update_follows_the_sine_track() {
        let mut predator = test_predator(Vec2::new(40.0, 300.0));
        let cfg = Config::default();

        let expected_wave = (40.0_f32 * cfg.wave_frequency).sin() * cfg.wave_amplitude;
        predator.update();

        // Vertical: anchor plus the wave sampled at the pre-step x.
        // Horizontal: one full step in the initial (leftward) sweep.
        assert!((predator.position.y - (300.0 + expected_wave)).abs() < 1e-4);
        assert!((predator.position.x - (40.0 - cfg.predator_max_speed)).abs() < 1e-5);
    }

    #[test]
    fn leaving_an_edge_flips_the_sweep_and_rebases_the_wave() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut predator = test_predator(Vec2::new(-0.5, 120.0));
        let old_start_y = predator.start_y;

        predator.handle_edges(800.0, 600.0, &mut rng);

        assert_eq!(predator.direction, SweepDirection::Right);
        assert_eq!(predator.position.x, 0.0);
        assert!(predator.start_y >= 0.0 && predator.start_y < 600.0);
        assert_ne!(predator.start_y, old_start_y);

        // Now exit on the right.
        predator.position.x = 800.5;
        predator.handle_edges(800.0, 600.0, &mut rng);
        assert_eq!(predator.direction, SweepDirection::Left);
        assert_eq!(predator.position.x, 800.0);
    }

    #[test]
    fn handle_edges_ignores_the_trailing_edge() {
        let mut rng = StdRng::seed_from_u64(4);
        // Sweeping left: being past the right edge is not an exit.
        let mut predator = test_predator(Vec2::new(900.0, 100.0));
        predator.handle_edges(800.0, 600.0, &mut rng);

        assert_eq!(predator.direction, SweepDirection::Left);
        assert_eq!(predator.position.x, 900.0);
    }
}
