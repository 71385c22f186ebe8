//! The loop thread: owns the engine and the roster, takes input over a
//! channel and publishes one snapshot per displayed frame.

use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Instant;

use anyhow::Context;
use engine_core::{FrameClock, SceneRect};
use input::{PlayerId, Roster, SkeletonFrame};

use crate::commands::{interpret, Command};
use crate::config::GameConfig;
use crate::engine::{FallingThingsEngine, GameMode};
use crate::snapshot::{FrameSnapshot, SnapshotSlot};

/// Messages into the loop thread.
#[derive(Debug, Clone)]
pub enum LoopCommand {
    /// A full skeleton for one player; every bone in it updates together.
    Skeleton { player: PlayerId, frame: SkeletonFrame },
    Game(Command),
    /// Something a player said.
    Phrase(String),
    /// Banner text in the middle of the scene.
    Announce(String),
    /// The play area changed size.
    Resize(SceneRect),
    Shutdown,
}

/// Everything the loop thread owns. Driven by explicit timestamps so a
/// test can step it without a thread.
pub struct LoopState {
    engine: FallingThingsEngine,
    roster: Roster,
    clock: FrameClock,
    paused: bool,
}

impl LoopState {
    pub fn new(config: &GameConfig, now: Instant) -> Self {
        Self::with_engine(config, FallingThingsEngine::new(&config.engine_settings(), now), now)
    }

    pub fn with_engine(config: &GameConfig, engine: FallingThingsEngine, now: Instant) -> Self {
        Self {
            engine,
            roster: Roster::new(config.scene()),
            clock: FrameClock::new(config.frame_rate, config.min_frame_rate, now),
            paused: false,
        }
    }

    /// Apply one message. Returns false when the loop should stop.
    pub fn handle(&mut self, cmd: LoopCommand, now: Instant) -> bool {
        match cmd {
            LoopCommand::Skeleton { player, frame } => self.roster.apply_frame(player, &frame, now),
            LoopCommand::Game(command) => self.apply(command, now),
            LoopCommand::Phrase(said) => {
                let commands = interpret(&said, &self.engine.tunables());
                if commands.is_empty() {
                    log::debug!("Ignoring phrase {:?}", said);
                }
                for command in commands {
                    self.apply(command, now);
                }
            }
            LoopCommand::Announce(text) => self.engine.announce(text),
            LoopCommand::Resize(scene) => {
                log::debug!("Scene resized to {}x{}", scene.width, scene.height);
                self.engine.set_boundaries(scene);
                self.roster.set_bounds(scene);
            }
            LoopCommand::Shutdown => return false,
        }
        true
    }

    fn apply(&mut self, command: Command, now: Instant) {
        if self.paused && !command.accepted_while_paused() {
            log::debug!("Paused, ignoring {:?}", command);
            return;
        }
        match command {
            Command::Pause => {
                log::info!("Game paused");
                self.paused = true;
            }
            Command::Resume | Command::Reset => {
                if self.paused {
                    log::info!("Game resumed");
                }
                self.paused = false;
            }
            _ => {}
        }
        command.apply(&mut self.engine, now);
    }

    /// Start a displayed frame at `now`; returns how long to sleep first.
    pub fn pace(&mut self, now: Instant) -> std::time::Duration {
        let sleep = self.clock.begin_frame(now);
        if self.clock.is_rate_check_frame() {
            self.engine.set_framerate(self.clock.actual_rate());
        }
        sleep
    }

    /// Run one displayed frame of simulation and capture its snapshot.
    pub fn tick(&mut self, now: Instant) -> FrameSnapshot {
        self.roster.prune(now);
        let mode = GameMode::from_player_count(self.roster.alive_count(now));
        if mode != self.engine.game_mode() {
            self.engine.set_game_mode(mode, now);
        }

        if !self.paused {
            for _ in 0..self.engine.intra_frames() {
                for player in self.roster.players() {
                    let summary = self.engine.look_for_hits(player.bones(), player.id(), now);
                    if summary.any() {
                        log::trace!("Player {:?}: {:?}", player.id(), summary);
                    }
                }
                self.engine.advance_frame();
            }
        }

        let snapshot = FrameSnapshot::capture(&self.engine, self.clock.frame_count(), self.paused, now);
        if !self.paused {
            self.engine.advance_effects();
        }
        snapshot
    }

    pub fn engine(&self) -> &FallingThingsEngine {
        &self.engine
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }
}

/// Handle to the running loop thread. Dropping it stops the loop.
pub struct GameLoop {
    tx_cmd: Sender<LoopCommand>,
    snapshots: SnapshotSlot,
    thread: Option<JoinHandle<()>>,
}

impl GameLoop {
    pub fn spawn(config: &GameConfig) -> anyhow::Result<Self> {
        config.validate().context("refusing to start with an invalid config")?;
        let (tx_cmd, rx_cmd) = mpsc::channel::<LoopCommand>();
        let snapshots = SnapshotSlot::new();
        let slot = snapshots.clone();
        let config = config.clone();

        let thread = thread::Builder::new()
            .name("game-loop".to_string())
            .spawn(move || {
                let state = LoopState::new(&config, Instant::now());
                loop_thread(rx_cmd, state, slot)
            })
            .context("failed to spawn game loop thread")?;

        Ok(Self {
            tx_cmd,
            snapshots,
            thread: Some(thread),
        })
    }

    /// Queue a message. False if the loop has already stopped.
    pub fn send(&self, cmd: LoopCommand) -> bool {
        self.tx_cmd.send(cmd).is_ok()
    }

    /// Shared handle renderers read frames from.
    pub fn snapshots(&self) -> SnapshotSlot {
        self.snapshots.clone()
    }

    pub fn latest(&self) -> Option<Arc<FrameSnapshot>> {
        self.snapshots.latest()
    }

    /// Stop the loop between ticks and wait for the thread.
    pub fn shutdown(mut self) -> anyhow::Result<()> {
        self.stop()
    }

    fn stop(&mut self) -> anyhow::Result<()> {
        let _ = self.tx_cmd.send(LoopCommand::Shutdown);
        if let Some(thread) = self.thread.take() {
            thread
                .join()
                .map_err(|_| anyhow::anyhow!("game loop thread panicked"))?;
        }
        Ok(())
    }
}

impl Drop for GameLoop {
    fn drop(&mut self) {
        if let Err(e) = self.stop() {
            log::error!("{}", e);
        }
    }
}

fn loop_thread(rx_cmd: Receiver<LoopCommand>, mut state: LoopState, slot: SnapshotSlot) {
    log::info!("Game loop started");
    'frames: loop {
        loop {
            match rx_cmd.try_recv() {
                Ok(cmd) => {
                    if !state.handle(cmd, Instant::now()) {
                        break 'frames;
                    }
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => break 'frames,
            }
        }

        let sleep = state.pace(Instant::now());
        if !sleep.is_zero() {
            thread::sleep(sleep);
        }
        slot.publish(state.tick(Instant::now()));
    }
    log::info!("Game loop stopped");
}
