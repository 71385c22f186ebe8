//! Immutable per-frame views of the game, handed from the loop thread to
//! whoever draws it.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};

use engine_core::{DVec2, Rgb};
use input::PlayerId;

use crate::engine::{FallingThingsEngine, GameMode};
use crate::score::{FillLevel, HandScores};
use crate::shapes::{ShapeKind, ShapeSet};
use crate::things::{Thing, ThingState};

/// Everything needed to draw one shape.
#[derive(Debug, Clone, PartialEq)]
pub struct ThingView {
    pub kind: ShapeKind,
    pub center: DVec2,
    pub size: f64,
    pub rotation: f64,
    pub color: Rgb,
    /// Outline colour; none while dissolving.
    pub edge: Option<Rgb>,
    pub opacity: f64,
    /// Edge pulse of a bouncing shape.
    pub pulse: Option<f64>,
    pub hotness: u8,
    pub flash_count: u32,
    pub state: ThingState,
}

impl From<&Thing> for ThingView {
    fn from(thing: &Thing) -> Self {
        Self {
            kind: thing.kind,
            center: thing.center,
            size: thing.size,
            rotation: thing.rotation,
            color: thing.color,
            edge: (thing.state != ThingState::Dissolving).then(|| thing.color.edge()),
            opacity: thing.opacity(),
            pulse: thing.pulse(),
            hotness: thing.hotness,
            flash_count: thing.flash_count,
            state: thing.state,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayerScore {
    pub player: PlayerId,
    pub hands: HandScores,
    pub left_fill: FillLevel,
    pub right_fill: FillLevel,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextView {
    pub text: String,
    pub center: DVec2,
    pub font_size: f64,
    pub opacity: f64,
}

/// One published frame.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameSnapshot {
    pub frame: u64,
    pub things: Vec<ThingView>,
    pub scores: Vec<PlayerScore>,
    pub level: u32,
    pub elapsed: Duration,
    pub game_mode: GameMode,
    pub texts: Vec<TextView>,
    pub shapes: ShapeSet,
    /// Physics ticks per second at the time of capture.
    pub tick_rate: f64,
    pub paused: bool,
}

impl FrameSnapshot {
    pub fn capture(engine: &FallingThingsEngine, frame: u64, paused: bool, now: Instant) -> Self {
        let scores = engine
            .scores()
            .iter()
            .map(|(player, hands)| PlayerScore {
                player,
                hands,
                left_fill: FillLevel::from_score(hands.left),
                right_fill: FillLevel::from_score(hands.right),
            })
            .collect();
        let texts = engine
            .texts()
            .iter()
            .map(|t| TextView {
                text: t.text.clone(),
                center: t.center,
                font_size: t.font_size,
                opacity: t.opacity(),
            })
            .collect();

        Self {
            frame,
            things: engine.things().iter().map(ThingView::from).collect(),
            scores,
            level: engine.level(),
            elapsed: engine.scores().elapsed(now),
            game_mode: engine.game_mode(),
            texts,
            shapes: engine.shapes(),
            tick_rate: engine.target_frame_rate(),
            paused,
        }
    }

    pub fn score(&self, player: PlayerId) -> Option<&PlayerScore> {
        self.scores.iter().find(|s| s.player == player)
    }
}

/// Single-slot handoff: the writer replaces the latest frame, readers take
/// a cheap clone of whatever is there.
#[derive(Debug, Clone, Default)]
pub struct SnapshotSlot {
    latest: Arc<Mutex<Option<Arc<FrameSnapshot>>>>,
}

impl SnapshotSlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn publish(&self, snapshot: FrameSnapshot) {
        *self.lock() = Some(Arc::new(snapshot));
    }

    pub fn latest(&self) -> Option<Arc<FrameSnapshot>> {
        self.lock().clone()
    }

    fn lock(&self) -> MutexGuard<'_, Option<Arc<FrameSnapshot>>> {
        // Only whole Arcs are ever stored, so a poisoned slot is still consistent.
        self.latest.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::EngineSettings;
    use physics::HandSide;

    #[test]
    fn capture_reflects_engine_state() {
        let now = Instant::now();
        let mut engine = FallingThingsEngine::with_seed(&EngineSettings::default(), 2, now);
        let mut bouncing = Thing::new(ShapeKind::Hex, DVec2::new(10.0, 10.0), 3.0, Rgb::WHITE);
        bouncing.start_bouncing(PlayerId(0));
        engine.add_thing(bouncing);
        let mut fading = Thing::new(ShapeKind::Star, DVec2::new(20.0, 10.0), 3.0, Rgb::WHITE);
        fading.fade_out();
        engine.add_thing(fading);
        engine.announce("3 2 1 Go!!!");

        let snap = FrameSnapshot::capture(&engine, 7, false, now);
        assert_eq!(snap.frame, 7);
        assert_eq!(snap.things.len(), 2);
        assert_eq!(snap.things[0].pulse, Some(1.0));
        assert!(snap.things[0].edge.is_some());
        assert_eq!(snap.things[1].edge, None);
        assert_eq!(snap.texts.len(), 1);
        assert_eq!(snap.level, 1);
    }

    #[test]
    fn scores_carry_fill_levels() {
        let now = Instant::now();
        let mut engine = FallingThingsEngine::with_seed(&EngineSettings::default(), 2, now);
        engine.set_game_mode(GameMode::Solo, now);
        let bones = [physics::BoneData::new(
            physics::Segment::circle(DVec2::new(50.0, 50.0), 2.0).with_role(physics::Role::RightHand),
            now,
        )];
        engine.add_thing(Thing::new(ShapeKind::Circle, DVec2::new(50.0, 52.0), 1.0, Rgb::WHITE));
        engine.look_for_hits(&bones, PlayerId(3), now);

        let snap = FrameSnapshot::capture(&engine, 1, false, now);
        let score = snap.score(PlayerId(3)).expect("player scored");
        assert_eq!(score.hands.get(HandSide::Right), 5);
        assert_eq!(score.right_fill, FillLevel::Empty);
    }

    #[test]
    fn slot_keeps_only_the_latest_frame() {
        let now = Instant::now();
        let engine = FallingThingsEngine::with_seed(&EngineSettings::default(), 2, now);
        let slot = SnapshotSlot::new();
        assert!(slot.latest().is_none());

        slot.publish(FrameSnapshot::capture(&engine, 1, false, now));
        let reader = slot.clone();
        let first = reader.latest().expect("published");
        slot.publish(FrameSnapshot::capture(&engine, 2, true, now));

        assert_eq!(first.frame, 1);
        let second = reader.latest().expect("published");
        assert_eq!(second.frame, 2);
        assert!(second.paused);
    }
}
