//! Catch The Drop: shapes fall from the top of the scene and players catch
//! them with their hands.
//!
//! - [`engine`]: the simulation (integration, spawning, hit detection, scoring)
//! - [`things`], [`shapes`], [`score`], [`flying_text`]: the state it owns
//! - [`commands`]: game commands and the phrase vocabulary
//! - [`game_loop`], [`snapshot`]: the loop thread and its per-frame output
//! - [`config`]: RON settings

pub mod commands;
pub mod config;
pub mod engine;
pub mod flying_text;
pub mod game_loop;
pub mod score;
pub mod shapes;
pub mod snapshot;
pub mod things;

pub use commands::{interpret, Command};
pub use config::{ConfigError, GameConfig};
pub use engine::{EngineSettings, FallingThingsEngine, GameMode, HitSummary, Tunables};
pub use game_loop::{GameLoop, LoopCommand, LoopState};
pub use score::{FillLevel, HandScores, ScoreBoard};
pub use shapes::{ShapeKind, ShapeSet};
pub use snapshot::{FrameSnapshot, SnapshotSlot, ThingView};
pub use things::{Thing, ThingState};
