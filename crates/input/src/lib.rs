//! Body-tracking input: skeleton frames, per-player bone state, and the
//! roster of players currently in the scene.

pub mod player;
pub mod roster;
pub mod skeleton;

pub use player::*;
pub use roster::*;
pub use skeleton::*;
