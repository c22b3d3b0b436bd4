/// Identifier for a boid in a [`crate::world::World`].
///
/// This is an index into `World::boids`, and is only meaningful for the
/// tick whose index rebuild produced it. The population is append-only,
/// so an id handed out during a run never dangles.
pub type BoidId = usize;
