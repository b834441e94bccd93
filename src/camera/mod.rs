//! Camera system for the visualization.
//!
//! Provides a perspective camera with a GPU-ready uniform and an orbit
//! controller with damped rotation, wheel zoom and eased zoom
//! transitions.

/// Orbit controller: damping, distance limits and zoom transitions.
pub mod controller;
/// Core camera struct and GPU uniform type.
pub mod core;
