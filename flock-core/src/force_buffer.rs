use crate::types::BoidId;
use glam::Vec2;

/// A temporary buffer that accumulates the steering force per boid.
///
/// The steering phase computes every boid's combined force against the
/// same tick-start state and stores it here; the integration phase then
/// applies the buffered forces. This split is what keeps neighbor reads
/// consistent: no boid moves until all forces for the tick are known.
///
/// Internally, `force[i]` corresponds to boid `i` (where [`BoidId`] is an
/// index-like type).
#[derive(Debug)]
pub struct ForceBuffer {
    force: Vec<Vec2>,
}

impl ForceBuffer {
    /// Creates a new [`ForceBuffer`] with the given length, all entries
    /// zeroed.
    pub fn with_len(len: usize) -> Self {
        Self {
            force: vec![Vec2::ZERO; len],
        }
    }

    /// Ensures the internal storage has exactly the given length.
    ///
    /// After this call all entries are zeroed, even if the length was
    /// already correct.
    pub fn ensure_len(&mut self, len: usize) {
        if self.force.len() != len {
            self.force.resize(len, Vec2::ZERO);
        }
        self.clear();
    }

    /// Zeroes all accumulated forces, keeping the length unchanged.
    pub fn clear(&mut self) {
        for f in &mut self.force {
            *f = Vec2::ZERO;
        }
    }

    /// Adds one force contribution for the given boid.
    ///
    /// ### Panics
    /// Panics if `id` is out of bounds.
    #[inline]
    pub fn add(&mut self, id: BoidId, force: Vec2) {
        self.force[id] += force;
    }

    /// Returns the accumulated force for a boid.
    #[inline]
    pub fn force(&self, id: BoidId) -> Vec2 {
        self.force[id]
    }

    pub fn len(&self) -> usize {
        self.force.len()
    }

    pub fn is_empty(&self) -> bool {
        self.force.is_empty()
    }
}
