//! Core types shared by the Catch The Drop crates.
//!
//! This crate provides the foundational types used across all engine systems:
//! - Scene bounds
//! - Colours and tinting
//! - Frame pacing for the simulation loop

pub mod color;
pub mod scene;
pub mod time;

pub use color::*;
pub use scene::*;
pub use time::*;

// Re-export commonly used types
pub use glam::DVec2;
