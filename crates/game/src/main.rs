//! Headless Catch The Drop demo: one synthetic player sweeps their hands
//! through the drop zone while the loop thread runs the game.

use std::thread;
use std::time::{Duration, Instant};

use anyhow::Result;
use engine_core::DVec2;
use game::{GameConfig, GameLoop, LoopCommand};
use input::{JointId, PlayerId, SkeletonFrame};

/// Skeleton frames per second, like a depth sensor.
const SENSOR_RATE: f64 = 30.0;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = GameConfig::load();
    log::info!(
        "Catch The Drop: {}x{} scene, {} Hz x {} ticks, running {} s",
        config.scene_width,
        config.scene_height,
        config.frame_rate,
        config.intra_frames,
        config.demo_seconds
    );

    let game = GameLoop::spawn(&config)?;
    game.send(LoopCommand::Announce("3 2 1 Go!!!".to_string()));

    let start = Instant::now();
    let end = start + Duration::from_secs(config.demo_seconds);
    let mut next_report = start + Duration::from_secs(1);
    let frame_interval = Duration::from_secs_f64(1.0 / SENSOR_RATE);

    while Instant::now() < end {
        let t = start.elapsed().as_secs_f64();
        if !game.send(LoopCommand::Skeleton {
            player: PlayerId(0),
            frame: demo_skeleton(t),
        }) {
            anyhow::bail!("game loop stopped unexpectedly");
        }

        if Instant::now() >= next_report {
            next_report += Duration::from_secs(1);
            if let Some(snap) = game.latest() {
                let hands = snap.scores.first().map(|s| s.hands).unwrap_or_default();
                log::info!(
                    "t={:>4.1}s mode={:?} level={} shapes={} score L{} R{}",
                    snap.elapsed.as_secs_f64(),
                    snap.game_mode,
                    snap.level,
                    snap.things.len(),
                    hands.left,
                    hands.right
                );
            }
        }
        thread::sleep(frame_interval);
    }

    game.shutdown()
}

/// A standing figure whose hands trace slow loops across the upper body.
fn demo_skeleton(t: f64) -> SkeletonFrame {
    let sway = (t * 0.4).sin() * 0.3;
    let left_hand = DVec2::new(sway - 0.35 + 0.45 * (t * 1.3).sin(), 0.45 + 0.25 * (t * 2.1).sin());
    let right_hand = DVec2::new(sway + 0.35 + 0.45 * (t * 1.1).cos(), 0.45 + 0.25 * (t * 1.7).cos());

    SkeletonFrame::new()
        .with_joint(JointId::Head, DVec2::new(sway, 0.75))
        .with_joint(JointId::ShoulderCenter, DVec2::new(sway, 0.6))
        .with_joint(JointId::Spine, DVec2::new(sway, 0.35))
        .with_joint(JointId::HipCenter, DVec2::new(sway, 0.15))
        .with_joint(JointId::ShoulderLeft, DVec2::new(sway - 0.18, 0.58))
        .with_joint(JointId::ShoulderRight, DVec2::new(sway + 0.18, 0.58))
        .with_joint(JointId::ElbowLeft, (DVec2::new(sway - 0.18, 0.58) + left_hand) / 2.0)
        .with_joint(JointId::ElbowRight, (DVec2::new(sway + 0.18, 0.58) + right_hand) / 2.0)
        .with_joint(JointId::HandLeft, left_hand)
        .with_joint(JointId::HandRight, right_hand)
        .with_joint(JointId::HipLeft, DVec2::new(sway - 0.1, 0.12))
        .with_joint(JointId::HipRight, DVec2::new(sway + 0.1, 0.12))
        .with_joint(JointId::KneeLeft, DVec2::new(sway - 0.12, -0.3))
        .with_joint(JointId::KneeRight, DVec2::new(sway + 0.12, -0.3))
        .with_joint(JointId::FootLeft, DVec2::new(sway - 0.14, -0.7))
        .with_joint(JointId::FootRight, DVec2::new(sway + 0.14, -0.7))
}
