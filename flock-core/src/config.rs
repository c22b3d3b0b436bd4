/// Global tunables for the flocking simulation.
///
/// The defaults reproduce the stock behavior: slow, tightly-limited
/// steering with separation weighted above alignment and cohesion.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Config {
    /// Maximum boid speed, world units per tick.
    pub max_speed: f32,
    /// Maximum steering force a boid can apply per tick.
    pub max_force: f32,
    /// Distance within which another boid counts as a neighbor.
    pub perception_radius: f32,

    pub alignment_weight: f32,
    pub cohesion_weight: f32,
    pub separation_weight: f32,

    pub predator_max_speed: f32,
    pub predator_max_force: f32,
    /// Body radius of the predator, used by the view layer.
    pub predator_radius: f32,
    /// Distance at which boids start evading the predator.
    pub predator_avoid_radius: f32,
    /// Amplitude of the predator's sinusoidal vertical patrol.
    pub wave_amplitude: f32,
    /// Frequency of the predator's sinusoidal vertical patrol.
    pub wave_frequency: f32,

    /// Points a quad-tree node holds before splitting.
    pub quadtree_capacity: usize,

    /// Radius of a click-triggered repulsion burst.
    pub repulsion_radius: f32,
    /// Repulsion force as a multiple of each boid's `max_speed`.
    pub repulsion_strength: f32,

    /// Boids scattered across the world at startup.
    pub initial_boids: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_speed: 2.0,
            max_force: 0.03,
            perception_radius: 50.0,
            alignment_weight: 1.0,
            cohesion_weight: 1.0,
            separation_weight: 1.5,
            predator_max_speed: 1.0,
            predator_max_force: 0.05,
            predator_radius: 20.0,
            predator_avoid_radius: 100.0,
            wave_amplitude: 50.0,
            wave_frequency: 0.05,
            quadtree_capacity: 4,
            repulsion_radius: 100.0,
            repulsion_strength: 2.0,
            initial_boids: 500,
        }
    }
}
