//! Core 2-D boids flocking simulation library.
//!
//! Main components:
//! - [`quadtree`] — rebuildable spatial index for neighbor queries.
//! - [`boid`] — boid state, steering forces and integration.
//! - [`predator`] — scripted sweeping predator.
//! - [`config`] — global configuration for the simulation.
//! - [`force_buffer`] — temporary buffer for accumulated steering forces.
//! - [`phases`] — high-level simulation phases / pipeline.
//! - [`world`] — the simulation world owning all mutable state.
//! - [`types`] — shared type aliases and IDs.

pub mod boid;
pub mod config;
pub mod force_buffer;
pub mod phases;
pub mod predator;
pub mod quadtree;
pub mod types;
pub mod world;
