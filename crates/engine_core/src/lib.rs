//! Core types shared by every Starlane crate.
//!
//! This crate provides the foundational pieces the galaxy and game crates
//! build on:
//! - Clamped resource gauges (hull, shield, fuel)
//! - Synchronous change observers
//! - The seeded random stream behind all procedural values

pub mod components;
pub mod observer;
pub mod random;

pub use components::*;
pub use observer::*;
pub use random::*;

// Re-export commonly used types
pub use glam::Vec3;
