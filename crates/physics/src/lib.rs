//! Collision geometry and body-segment motion prediction for Catch The Drop.

pub mod bone;
pub mod collision;
pub mod segment;

pub use bone::*;
pub use collision::*;
pub use segment::*;
