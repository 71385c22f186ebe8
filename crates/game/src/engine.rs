//! The falling-things simulation: integration, spawning, hit detection
//! against players and scoring.
//!
//! One `advance_frame` is one physics tick. The host runs
//! `intra_frames` ticks per displayed frame and calls `look_for_hits` once
//! per player before each tick, so the effective tick rate is
//! `frame_rate * intra_frames`.

use std::time::Instant;

use engine_core::{ColorMode, DVec2, SceneRect};
use input::PlayerId;
use physics::{BoneData, HandSide};
use rand::rngs::StdRng;
use rand::seq::IteratorRandom;
use rand::{Rng, SeedableRng};

use crate::flying_text::FlyingTexts;
use crate::score::{ScoreBoard, CAPTURE_POINTS};
use crate::shapes::{ShapeKind, ShapeSet};
use crate::things::{Thing, ThingState, HIT_DEBOUNCE};

/// Seconds a captured shape takes to fade out.
pub const DISSOLVE_SECONDS: f64 = 0.4;

/// A dissolving shape grows to this multiple of its size.
const DISSOLVE_GROWTH: f64 = 6.0;

const BASE_GRAVITY: f64 = 0.017;
const BASE_AIR_FRICTION: f64 = 0.994;
/// Air friction while gravity is switched off.
const ZERO_GRAVITY_AIR_FRICTION: f64 = 0.997;

/// Gravity factor restored by a reset or game mode change.
pub const BASELINE_GRAVITY_FACTOR: f64 = 1.0;

/// Dissolve progress within this of 1.0 counts as finished.
const DISSOLVE_EPSILON: f64 = 1e-9;

/// How many players are playing, which decides how touches are scored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum GameMode {
    #[default]
    Off,
    Solo,
    TwoPlayer,
}

impl GameMode {
    pub fn from_player_count(count: usize) -> Self {
        match count {
            0 => GameMode::Off,
            1 => GameMode::Solo,
            _ => GameMode::TwoPlayer,
        }
    }
}

/// Contacts found by one `look_for_hits` pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HitSummary {
    /// Shapes caught by a hand (and now dissolving).
    pub captured: u32,
    /// Debounced contacts with arms, legs, torso or head.
    pub arm_contacts: u32,
}

impl HitSummary {
    pub fn any(&self) -> bool {
        self.captured > 0 || self.arm_contacts > 0
    }
}

/// Knobs the engine is created with.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineSettings {
    /// Displayed frames per second.
    pub frame_rate: f64,
    /// Physics ticks per displayed frame.
    pub intra_frames: u32,
    pub max_things: usize,
    /// New shapes per second.
    pub drop_rate: f64,
    /// Shape radius as a fraction of the scene height.
    pub shape_size: f64,
    pub gravity_factor: f64,
    pub shapes: ShapeSet,
    pub color_mode: ColorMode,
    pub scene: SceneRect,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            frame_rate: 60.0,
            intra_frames: 1,
            max_things: 80,
            drop_rate: 2.0,
            shape_size: 0.02,
            gravity_factor: BASELINE_GRAVITY_FACTOR,
            shapes: ShapeSet::ALL,
            color_mode: ColorMode::default(),
            scene: SceneRect::default(),
        }
    }
}

/// Current values of the settings players can nudge by voice.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tunables {
    pub gravity_factor: f64,
    pub drop_rate: f64,
    pub shape_size: f64,
}

/// Owns every falling shape, the scores and the transient popups.
#[derive(Debug)]
pub struct FallingThingsEngine {
    things: Vec<Thing>,
    scene: SceneRect,
    max_things: usize,
    intra_frames: u32,
    /// Physics ticks per second (`frame_rate * intra_frames`).
    target_frame_rate: f64,
    drop_rate: f64,
    /// Radius of new shapes as a fraction of scene height.
    shape_size: f64,
    gravity_factor: f64,
    /// Per-tick velocity gain per pixel of scene height.
    gravity: f64,
    air_friction: f64,
    /// Per-tick size multiplier while dissolving.
    expanding_rate: f64,
    shapes: ShapeSet,
    color_mode: ColorMode,
    game_mode: GameMode,
    scores: ScoreBoard,
    texts: FlyingTexts,
    rng: StdRng,
}

impl FallingThingsEngine {
    pub fn new(settings: &EngineSettings, now: Instant) -> Self {
        Self::with_rng(settings, StdRng::from_entropy(), now)
    }

    /// Deterministic engine for tests and replays of a seed.
    pub fn with_seed(settings: &EngineSettings, seed: u64, now: Instant) -> Self {
        Self::with_rng(settings, StdRng::seed_from_u64(seed), now)
    }

    fn with_rng(settings: &EngineSettings, rng: StdRng, now: Instant) -> Self {
        let intra_frames = settings.intra_frames.max(1);
        let mut engine = Self {
            things: Vec::with_capacity(settings.max_things),
            scene: settings.scene,
            max_things: settings.max_things,
            intra_frames,
            target_frame_rate: settings.frame_rate.max(1.0) * intra_frames as f64,
            drop_rate: settings.drop_rate.max(0.0),
            shape_size: settings.shape_size.max(0.0),
            gravity_factor: settings.gravity_factor,
            gravity: 0.0,
            air_friction: BASE_AIR_FRICTION,
            expanding_rate: 1.0,
            shapes: settings.shapes,
            color_mode: settings.color_mode,
            game_mode: GameMode::Off,
            scores: ScoreBoard::new(now),
            texts: FlyingTexts::new(),
            rng,
        };
        engine.update_expanding_rate();
        engine.set_gravity(settings.gravity_factor);
        engine
    }

    // ── Settings ────────────────────────────────────────────────────────

    /// Tell the engine the displayed frame rate actually achieved.
    pub fn set_framerate(&mut self, actual_frame_rate: f64) {
        if actual_frame_rate.is_nan() || actual_frame_rate <= 0.0 {
            return;
        }
        self.target_frame_rate = actual_frame_rate * self.intra_frames as f64;
        self.update_expanding_rate();
        if self.gravity_factor != 0.0 {
            self.set_gravity(self.gravity_factor);
        }
    }

    fn update_expanding_rate(&mut self) {
        self.expanding_rate = (DISSOLVE_GROWTH.ln() / (self.target_frame_rate * DISSOLVE_SECONDS)).exp();
    }

    pub fn set_boundaries(&mut self, scene: SceneRect) {
        self.scene = scene;
    }

    pub fn set_drop_rate(&mut self, drop_rate: f64) {
        self.drop_rate = drop_rate.max(0.0);
    }

    /// Radius of newly dropped shapes as a fraction of the scene height.
    pub fn set_size(&mut self, shape_size: f64) {
        self.shape_size = shape_size.max(0.0);
    }

    pub fn set_shapes(&mut self, shapes: ShapeSet) {
        self.shapes = shapes;
    }

    pub fn set_color_mode(&mut self, color_mode: ColorMode) {
        self.color_mode = color_mode;
    }

    /// Scale gravity (1.0 is normal). Zero freezes every shape in place.
    pub fn set_gravity(&mut self, factor: f64) {
        let factor = factor.max(0.0);
        let rate = self.target_frame_rate;
        let intra = self.intra_frames as f64;
        self.gravity_factor = factor;
        self.gravity = factor * BASE_GRAVITY / rate / rate.sqrt() / intra.sqrt();
        self.air_friction = if factor == 0.0 {
            ZERO_GRAVITY_AIR_FRICTION
        } else {
            let per_frame = (1.0 - (1.0 - BASE_AIR_FRICTION) / factor).max(f64::MIN_POSITIVE);
            (per_frame.ln() / intra).exp()
        };

        if factor == 0.0 {
            for thing in &mut self.things {
                thing.velocity = DVec2::ZERO;
            }
        }
    }

    /// Switch between no game, one player and two players. Scores restart.
    pub fn set_game_mode(&mut self, mode: GameMode, now: Instant) {
        if mode != self.game_mode {
            log::info!("Game mode {:?} -> {:?}", self.game_mode, mode);
        }
        self.game_mode = mode;
        self.restart_scoring(now);
    }

    /// Fade out every shape in play and start the game over.
    pub fn reset(&mut self, now: Instant) {
        for thing in &mut self.things {
            if thing.state.is_live() {
                thing.fade_out();
            }
        }
        log::info!("Game reset");
        self.restart_scoring(now);
    }

    fn restart_scoring(&mut self, now: Instant) {
        self.scores.reset(now);
        self.texts.clear();
        self.set_gravity(BASELINE_GRAVITY_FACTOR);
    }

    // ── Simulation ──────────────────────────────────────────────────────

    /// One physics tick: move, bounce off walls, expire, dissolve and spawn.
    pub fn advance_frame(&mut self) {
        let scene = self.scene;
        let fall = self.gravity * scene.height;
        let dissolve_step = 1.0 / (self.target_frame_rate * DISSOLVE_SECONDS);

        for thing in &mut self.things {
            thing.center += thing.velocity;
            thing.velocity.y += fall;
            thing.velocity *= self.air_friction;
            thing.rotation += thing.spin_rate;

            // Single-step correction; a shape may sit inside the wall for a frame.
            if thing.center.x - thing.size < scene.left || thing.center.x + thing.size > scene.right() {
                thing.velocity.x = -thing.velocity.x;
                thing.center.x += thing.velocity.x;
            }

            if thing.center.y - thing.size > scene.bottom() {
                thing.state = ThingState::Removed;
            }

            if thing.state == ThingState::Dissolving {
                thing.dissolve += dissolve_step;
                thing.size *= self.expanding_rate;
                if thing.dissolve >= 1.0 - DISSOLVE_EPSILON {
                    thing.state = ThingState::Removed;
                }
            }
        }

        self.things.retain(|t| t.state != ThingState::Removed);

        if self.things.len() < self.max_things
            && !self.shapes.is_empty()
            && self.rng.gen::<f64>() < self.drop_rate / self.target_frame_rate
        {
            self.drop_new_thing();
        }
    }

    fn drop_new_thing(&mut self) {
        let shapes = self.shapes;
        let Some(kind) = shapes.kinds().choose(&mut self.rng) else {
            return;
        };
        let color = self.color_mode.pick(&mut self.rng);
        let size = self.scene.height * self.shape_size;
        let rate = self.target_frame_rate;
        let (zone_left, zone_width) = self.scene.drop_zone();

        let x = zone_left + self.rng.gen::<f64>() * zone_width;
        let fall_speed = (0.5 * self.rng.gen::<f64>() - 0.25) / rate;
        let spin = (self.rng.gen::<f64>() * 12.0 - 6.0) * std::f64::consts::TAU / rate / 4.0;

        let thing = Thing::new(kind, DVec2::new(x, self.scene.top - size), size, color)
            .with_velocity(DVec2::new(0.0, fall_speed))
            .with_spin(spin);
        self.things.push(thing);
    }

    /// Put a shape into play directly, ignoring the live-object cap.
    pub fn add_thing(&mut self, thing: Thing) {
        self.things.push(thing);
    }

    /// Hit-test every live shape against one player's body segments,
    /// extrapolated to `now`, and apply bounces, state changes and scoring.
    pub fn look_for_hits<'a, I>(&mut self, bones: I, player: PlayerId, now: Instant) -> HitSummary
    where
        I: IntoIterator<Item = &'a BoneData>,
    {
        self.scores.ensure_player(player);
        let mut summary = HitSummary::default();
        let debounce_ms = HIT_DEBOUNCE.as_secs_f64() * 1000.0;
        let rate = self.target_frame_rate;

        for bone in bones {
            let segment = bone.estimate_at(now);
            let hand = segment.role().hand_side();

            for i in 0..self.things.len() {
                let thing = &mut self.things[i];
                if !thing.state.is_live() {
                    continue;
                }
                let Some(contact) = thing.hit(&segment) else {
                    continue;
                };

                let fresh_contact = thing.record_hit(now) > debounce_ms;
                // Bone velocities are per second, shapes move per tick.
                let other_velocity = match hand {
                    Some(_) => bone.velocity1,
                    None => bone.velocity_at(contact.t),
                } / rate;
                thing.bounce_off(contact.point, segment.radius(), other_velocity);

                if hand.is_none() && fresh_contact {
                    summary.arm_contacts += 1;
                }

                if hand.is_some() {
                    match (self.game_mode, thing.state) {
                        (GameMode::Solo | GameMode::TwoPlayer, ThingState::Falling) => {
                            thing.start_bouncing(player);
                        }
                        (GameMode::TwoPlayer, ThingState::Bouncing)
                            if thing.touched_by != Some(player) =>
                        {
                            thing.pass_to(player);
                        }
                        _ => {}
                    }
                }

                if let (Some(side), true) = (hand, fresh_contact) {
                    thing.capture();
                    let owner = thing.touched_by.unwrap_or(player);
                    let center = thing.center;
                    summary.captured += 1;
                    log::debug!("Player {:?} caught a {:?}", owner, thing.kind);
                    self.award(owner, side, center);
                }
            }
        }
        summary
    }

    fn award(&mut self, player: PlayerId, side: HandSide, at: DVec2) {
        let font_size = self.scene.width / 300.0;
        self.texts.push(format!("+{}", CAPTURE_POINTS), font_size, at);
        if self.scores.add(player, side, CAPTURE_POINTS) {
            self.texts.push("Level Completed", font_size, self.scene.center());
            self.set_gravity(self.gravity_factor * 2.0);
        }
    }

    /// Per displayed frame: advance bouncing pulses and popups.
    pub fn advance_effects(&mut self) {
        for thing in &mut self.things {
            if thing.state == ThingState::Bouncing {
                thing.flash_count = thing.flash_count.wrapping_add(1);
            }
        }
        self.texts.advance();
    }

    /// Show a banner in the middle of the scene.
    pub fn announce(&mut self, text: impl Into<String>) {
        let font_size = self.scene.width / 30.0;
        self.texts.push(text, font_size, self.scene.center());
    }

    // ── Read-only state ─────────────────────────────────────────────────

    pub fn things(&self) -> &[Thing] {
        &self.things
    }

    pub fn scores(&self) -> &ScoreBoard {
        &self.scores
    }

    pub fn texts(&self) -> &FlyingTexts {
        &self.texts
    }

    pub fn scene(&self) -> SceneRect {
        self.scene
    }

    pub fn game_mode(&self) -> GameMode {
        self.game_mode
    }

    pub fn level(&self) -> u32 {
        self.scores.level()
    }

    pub fn gravity_factor(&self) -> f64 {
        self.gravity_factor
    }

    pub fn target_frame_rate(&self) -> f64 {
        self.target_frame_rate
    }

    pub fn intra_frames(&self) -> u32 {
        self.intra_frames
    }

    pub fn shapes(&self) -> ShapeSet {
        self.shapes
    }

    pub fn color_mode(&self) -> ColorMode {
        self.color_mode
    }

    pub fn tunables(&self) -> Tunables {
        Tunables {
            gravity_factor: self.gravity_factor,
            drop_rate: self.drop_rate,
            shape_size: self.shape_size,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use engine_core::Rgb;
    use physics::{Role, Segment};
    use std::time::Duration;

    const P0: PlayerId = PlayerId(0);
    const P1: PlayerId = PlayerId(1);

    fn quiet_settings(scene: SceneRect) -> EngineSettings {
        EngineSettings {
            frame_rate: 60.0,
            intra_frames: 1,
            drop_rate: 0.0,
            scene,
            ..Default::default()
        }
    }

    fn engine() -> FallingThingsEngine {
        FallingThingsEngine::with_seed(&quiet_settings(SceneRect::new(640.0, 480.0)), 1, Instant::now())
    }

    fn circle_at(x: f64, y: f64, size: f64) -> Thing {
        Thing::new(ShapeKind::Circle, DVec2::new(x, y), size, Rgb::WHITE)
    }

    fn hand(role: Role, x: f64, y: f64, now: Instant) -> BoneData {
        BoneData::new(Segment::circle(DVec2::new(x, y), 5.0).with_role(role), now)
    }

    #[test]
    fn falling_object_accelerates_and_leaves_through_the_bottom() {
        let scene = SceneRect::new(100.0, 100.0);
        let mut engine = FallingThingsEngine::with_seed(&quiet_settings(scene), 3, Instant::now());
        engine.add_thing(circle_at(50.0, 10.0, 2.0));

        // Movement uses the velocity from before gravity is added, so the
        // first tick only picks up speed.
        engine.advance_frame();
        assert_eq!(engine.things()[0].center.y, 10.0);
        assert!(engine.things()[0].velocity.y > 0.0);

        let mut last_y = 10.0;
        for _ in 0..50 {
            engine.advance_frame();
            let y = engine.things()[0].center.y;
            assert!(y > last_y, "y went from {} to {}", last_y, y);
            last_y = y;
        }

        let mut ticks = 51;
        loop {
            let before = engine.things()[0].clone();
            let moved_to = before.center.y + before.velocity.y;
            engine.advance_frame();
            ticks += 1;
            if moved_to - before.size > 100.0 {
                assert!(engine.things().is_empty(), "top edge at {} is past the bottom", moved_to - before.size);
                break;
            }
            let t = &engine.things()[0];
            assert!(t.center.y - t.size <= 100.0);
            assert!(t.center.y > before.center.y);
            assert!(ticks < 10_000, "object never left the scene");
        }
    }

    #[test]
    fn objects_below_the_scene_are_removed_in_any_state() {
        let scene = SceneRect::new(100.0, 100.0);
        let mut engine = FallingThingsEngine::with_seed(&quiet_settings(scene), 3, Instant::now());
        for state in [ThingState::Falling, ThingState::Bouncing, ThingState::Dissolving] {
            let mut t = circle_at(50.0, 106.0, 5.0);
            t.state = state;
            engine.add_thing(t);
        }
        engine.add_thing(circle_at(50.0, 50.0, 5.0));
        engine.advance_frame();
        assert_eq!(engine.things().len(), 1);
        assert!(engine.things()[0].center.y < 60.0);
    }

    #[test]
    fn dissolve_takes_exactly_rate_times_duration_ticks() {
        let mut engine = engine();
        engine.set_gravity(0.0);
        let mut t = circle_at(320.0, 200.0, 4.0);
        t.capture();
        engine.add_thing(t);

        // 60 Hz * 0.4 s = 24 ticks.
        for _ in 0..23 {
            engine.advance_frame();
        }
        assert_eq!(engine.things().len(), 1);
        assert!(engine.things()[0].size > 4.0);
        engine.advance_frame();
        assert!(engine.things().is_empty());
    }

    #[test]
    fn dissolving_shape_grows_six_fold() {
        let mut engine = engine();
        engine.set_gravity(0.0);
        let mut t = circle_at(320.0, 200.0, 4.0);
        t.fade_out();
        engine.add_thing(t);
        for _ in 0..23 {
            engine.advance_frame();
        }
        let expected = 4.0 * 6f64.powf(23.0 / 24.0);
        assert!((engine.things()[0].size - expected).abs() < 1e-6);
    }

    #[test]
    fn right_wall_flips_horizontal_velocity() {
        let mut engine = FallingThingsEngine::with_seed(&quiet_settings(SceneRect::new(100.0, 100.0)), 1, Instant::now());
        engine.add_thing(circle_at(98.0, 50.0, 5.0).with_velocity(DVec2::new(1.0, 0.0)));
        engine.advance_frame();
        assert!(engine.things()[0].velocity.x < 0.0);
    }

    #[test]
    fn left_wall_flips_horizontal_velocity() {
        let mut engine = FallingThingsEngine::with_seed(&quiet_settings(SceneRect::new(100.0, 100.0)), 1, Instant::now());
        engine.add_thing(circle_at(3.0, 50.0, 5.0).with_velocity(DVec2::new(-1.0, 0.0)));
        engine.advance_frame();
        assert!(engine.things()[0].velocity.x > 0.0);
    }

    #[test]
    fn spawning_respects_cap_and_enabled_shapes() {
        let settings = EngineSettings {
            frame_rate: 60.0,
            drop_rate: 1000.0,
            max_things: 5,
            shapes: ShapeSet::from_kinds(&[ShapeKind::Star, ShapeKind::Hex]),
            scene: SceneRect::new(640.0, 480.0),
            ..Default::default()
        };
        let mut engine = FallingThingsEngine::with_seed(&settings, 42, Instant::now());
        for _ in 0..20 {
            engine.advance_frame();
        }
        assert_eq!(engine.things().len(), 5);
        for t in engine.things() {
            assert!(matches!(t.kind, ShapeKind::Star | ShapeKind::Hex));
            assert!(t.center.x >= 80.0 && t.center.x <= 560.0);
            assert_eq!(t.state, ThingState::Falling);
        }

        let mut empty = FallingThingsEngine::with_seed(&settings, 42, Instant::now());
        empty.set_shapes(ShapeSet::NONE);
        for _ in 0..20 {
            empty.advance_frame();
        }
        assert!(empty.things().is_empty());
    }

    #[test]
    fn new_shapes_enter_above_the_scene_with_scaled_size() {
        let settings = EngineSettings {
            drop_rate: 1000.0,
            max_things: 1,
            shape_size: 0.05,
            scene: SceneRect::new(640.0, 480.0),
            ..Default::default()
        };
        let mut engine = FallingThingsEngine::with_seed(&settings, 5, Instant::now());
        engine.set_gravity(0.0);
        engine.advance_frame();
        let t = &engine.things()[0];
        assert!((t.size - 24.0).abs() < 1e-9);
        assert!((t.center.y + 24.0).abs() < 1e-9);
    }

    #[test]
    fn hand_touch_captures_and_scores_for_that_hand() {
        let now = Instant::now();
        let mut engine = engine();
        engine.set_game_mode(GameMode::Solo, now);
        engine.add_thing(circle_at(100.0, 100.0, 10.0).with_velocity(DVec2::new(0.0, 1.0)));
        let bones = [hand(Role::LeftHand, 100.0, 112.0, now)];

        let summary = engine.look_for_hits(&bones, P0, now);
        assert_eq!(summary.captured, 1);
        let t = &engine.things()[0];
        assert_eq!(t.state, ThingState::Dissolving);
        assert_eq!(t.velocity, DVec2::ZERO);
        assert_eq!(t.touched_by, Some(P0));
        assert_eq!(engine.scores().hands(P0).left, 5);
        assert_eq!(engine.scores().hands(P0).right, 0);
        assert_eq!(engine.texts().len(), 1);

        // Dissolving shapes no longer collide.
        let again = engine.look_for_hits(&bones, P0, now + Duration::from_millis(500));
        assert!(!again.any());
    }

    #[test]
    fn arm_contact_bounces_without_state_change_in_solo() {
        let now = Instant::now();
        let mut engine = engine();
        engine.set_game_mode(GameMode::Solo, now);
        engine.add_thing(circle_at(100.0, 100.0, 11.0).with_velocity(DVec2::new(0.0, 1.0)));
        let arm = BoneData::new(
            Segment::line(DVec2::new(80.0, 112.0), DVec2::new(120.0, 112.0), 2.0),
            now,
        );

        let summary = engine.look_for_hits([&arm], P0, now);
        assert_eq!(summary, HitSummary { captured: 0, arm_contacts: 1 });
        let t = &engine.things()[0];
        assert_eq!(t.state, ThingState::Falling);
        assert!(t.velocity.y < 0.0, "should bounce upward: {:?}", t.velocity);
        assert!((t.center.y - 99.0).abs() < 1e-9);
        assert_eq!(engine.scores().hands(P0), Default::default());
    }

    #[test]
    fn rising_hand_launches_a_resting_shape() {
        let now = Instant::now();
        let mut engine = engine();
        engine.set_game_mode(GameMode::Solo, now);
        let mut t = circle_at(100.0, 100.0, 10.0);
        // Recent hit, so this touch bounces instead of capturing.
        t.last_hit = Some(now - Duration::from_millis(50));
        engine.add_thing(t);
        let mut palm = hand(Role::RightHand, 100.0, 112.0, now);
        // 600 px/s upward is 10 px per tick at 60 Hz.
        palm.velocity1 = DVec2::new(0.0, -600.0);

        let summary = engine.look_for_hits([&palm], P0, now);
        assert_eq!(summary.captured, 0);
        let t = &engine.things()[0];
        assert_eq!(t.state, ThingState::Bouncing);
        assert!((t.center - DVec2::new(100.0, 97.0)).length() < 1e-9);
        assert!((t.velocity - DVec2::new(0.0, -20.0)).length() < 1e-9, "{:?}", t.velocity);
    }

    #[test]
    fn arm_bounce_uses_velocity_at_the_contact_point() {
        let now = Instant::now();
        let mut engine = engine();
        engine.set_game_mode(GameMode::Solo, now);
        engine.add_thing(circle_at(90.0, 100.0, 11.0));
        let mut arm = BoneData::new(
            Segment::line(DVec2::new(80.0, 112.0), DVec2::new(120.0, 112.0), 2.0),
            now,
        );
        // Elbow end swings up, the other end is still. The contact sits a
        // quarter of the way along, so it moves at 900 px/s, 15 px per tick.
        arm.velocity1 = DVec2::new(0.0, -1200.0);
        arm.velocity2 = DVec2::ZERO;

        let summary = engine.look_for_hits([&arm], P0, now);
        assert_eq!(summary.arm_contacts, 1);
        let t = &engine.things()[0];
        assert!((t.center - DVec2::new(90.0, 99.0)).length() < 1e-9);
        assert!((t.velocity - DVec2::new(0.0, -30.0)).length() < 1e-9, "{:?}", t.velocity);
    }

    fn arm_contacts_for_two_touches(gap: Duration) -> u32 {
        let t0 = Instant::now();
        let mut engine = engine();
        engine.set_game_mode(GameMode::Solo, t0);
        engine.add_thing(circle_at(100.0, 100.0, 11.0));
        let arm = BoneData::new(
            Segment::line(DVec2::new(80.0, 112.0), DVec2::new(120.0, 112.0), 2.0),
            t0,
        );

        let first = engine.look_for_hits([&arm], P0, t0);
        // Put the shape back on the arm for the second touch.
        engine.things[0].center = DVec2::new(100.0, 100.0);
        engine.things[0].velocity = DVec2::ZERO;
        let second = engine.look_for_hits([&arm], P0, t0 + gap);
        first.arm_contacts + second.arm_contacts
    }

    #[test]
    fn arm_contacts_within_the_debounce_count_once() {
        assert_eq!(arm_contacts_for_two_touches(Duration::from_millis(50)), 1);
        assert_eq!(arm_contacts_for_two_touches(Duration::from_millis(150)), 2);
    }

    #[test]
    fn new_boundaries_move_walls_floor_and_drop_zone() {
        let mut engine = FallingThingsEngine::with_seed(&quiet_settings(SceneRect::new(100.0, 100.0)), 1, Instant::now());
        engine.set_gravity(0.0);
        engine.set_boundaries(SceneRect::new(200.0, 200.0));
        // Outside the old scene on both axes, inside the new one.
        engine.add_thing(circle_at(98.0, 150.0, 5.0).with_velocity(DVec2::new(1.0, 0.0)));
        engine.add_thing(circle_at(198.0, 50.0, 5.0).with_velocity(DVec2::new(1.0, 0.0)));
        engine.advance_frame();

        assert_eq!(engine.things().len(), 2);
        assert!(engine.things()[0].velocity.x > 0.0);
        assert!(engine.things()[1].velocity.x < 0.0);

        engine.set_drop_rate(1.0e6);
        engine.advance_frame();
        let spawned = &engine.things()[2];
        let (left, width) = SceneRect::new(200.0, 200.0).drop_zone();
        assert!(spawned.center.x >= left && spawned.center.x <= left + width);
        assert!((spawned.size - 200.0 * EngineSettings::default().shape_size).abs() < 1e-9);
    }

    #[test]
    fn pass_between_players_heats_up_a_bouncing_shape() {
        let now = Instant::now();
        let mut engine = engine();
        engine.set_game_mode(GameMode::TwoPlayer, now);
        let mut t = circle_at(300.0, 300.0, 10.0);
        t.start_bouncing(P0);
        t.last_hit = Some(now - Duration::from_millis(50));
        engine.add_thing(t);

        let bones = [hand(Role::RightHand, 300.0, 312.0, now)];
        let summary = engine.look_for_hits(&bones, P1, now);
        assert_eq!(summary.captured, 0);
        let t = &engine.things()[0];
        assert_eq!(t.state, ThingState::Bouncing);
        assert_eq!(t.touched_by, Some(P1));
        assert_eq!(t.hotness, 2);
    }

    #[test]
    fn arm_does_not_steal_a_bouncing_shape() {
        let now = Instant::now();
        let mut engine = engine();
        engine.set_game_mode(GameMode::TwoPlayer, now);
        let mut t = circle_at(300.0, 300.0, 10.0);
        t.start_bouncing(P0);
        engine.add_thing(t);
        let arm = BoneData::new(
            Segment::line(DVec2::new(280.0, 311.0), DVec2::new(320.0, 311.0), 2.0),
            now,
        );
        engine.look_for_hits([&arm], P1, now);
        let t = &engine.things()[0];
        assert_eq!(t.touched_by, Some(P0));
        assert_eq!(t.hotness, 1);
    }

    #[test]
    fn capture_credits_the_player_who_touched_it_last() {
        let now = Instant::now();
        let mut engine = engine();
        engine.set_game_mode(GameMode::TwoPlayer, now);
        let mut t = circle_at(300.0, 300.0, 10.0);
        t.start_bouncing(P0);
        t.last_hit = Some(now - Duration::from_millis(50));
        engine.add_thing(t);
        // P0 touches again after the debounce window.
        let later = now + Duration::from_millis(200);
        let bones = [hand(Role::RightHand, 300.0, 312.0, later)];
        let summary = engine.look_for_hits(&bones, P0, later);
        assert_eq!(summary.captured, 1);
        assert_eq!(engine.scores().hands(P0).right, 5);
    }

    #[test]
    fn level_up_doubles_gravity_and_clears_hands() {
        let now = Instant::now();
        let mut engine = engine();
        engine.set_game_mode(GameMode::Solo, now);
        engine.scores.add(P0, HandSide::Left, 51);
        engine.scores.add(P0, HandSide::Right, 50);
        engine.add_thing(circle_at(100.0, 100.0, 10.0));
        let bones = [hand(Role::RightHand, 100.0, 112.0, now)];
        engine.look_for_hits(&bones, P0, now);

        assert_eq!(engine.level(), 2);
        assert_eq!(engine.gravity_factor(), 2.0);
        assert_eq!(engine.scores().hands(P0), Default::default());
        assert_eq!(engine.texts().len(), 2);
    }

    #[test]
    fn mode_change_resets_scores_level_and_gravity() {
        let now = Instant::now();
        let mut engine = engine();
        engine.set_game_mode(GameMode::Solo, now);
        engine.scores.add(P0, HandSide::Left, 51);
        engine.scores.add(P0, HandSide::Right, 51);
        engine.set_gravity(4.0);
        engine.set_game_mode(GameMode::TwoPlayer, now);
        assert_eq!(engine.level(), 1);
        assert!(engine.scores().is_empty());
        assert_eq!(engine.gravity_factor(), BASELINE_GRAVITY_FACTOR);
    }

    #[test]
    fn reset_fades_out_shapes_in_play() {
        let now = Instant::now();
        let mut engine = engine();
        engine.add_thing(circle_at(100.0, 100.0, 10.0));
        let mut bouncing = circle_at(200.0, 100.0, 10.0);
        bouncing.start_bouncing(P0);
        engine.add_thing(bouncing);
        engine.reset(now);
        assert!(engine.things().iter().all(|t| t.state == ThingState::Dissolving));
    }

    #[test]
    fn zero_gravity_freezes_motion() {
        let mut engine = engine();
        engine.add_thing(circle_at(100.0, 100.0, 10.0).with_velocity(DVec2::new(2.0, 3.0)));
        engine.set_gravity(0.0);
        assert_eq!(engine.things()[0].velocity, DVec2::ZERO);
        engine.advance_frame();
        assert_eq!(engine.things()[0].center, DVec2::new(100.0, 100.0));
    }

    #[test]
    fn framerate_change_rescales_gravity() {
        let mut engine = engine();
        let before = engine.gravity;
        engine.set_framerate(30.0);
        assert_eq!(engine.target_frame_rate(), 30.0);
        assert!(engine.gravity > before);
        assert_eq!(engine.gravity_factor(), 1.0);
    }

    #[test]
    fn hits_before_any_mode_still_bounce() {
        let now = Instant::now();
        let mut engine = engine();
        engine.add_thing(circle_at(100.0, 100.0, 10.0).with_velocity(DVec2::new(0.0, 1.0)));
        let bones = [hand(Role::LeftHand, 100.0, 112.0, now)];
        let summary = engine.look_for_hits(&bones, P0, now);
        // Off mode never starts a bounce, but a hand still catches.
        assert_eq!(summary.captured, 1);
        assert_eq!(engine.scores().hands(P0).left, 5);
    }

    #[test]
    fn bouncing_pulse_advances_per_displayed_frame() {
        let mut engine = engine();
        let mut t = circle_at(100.0, 100.0, 10.0);
        t.start_bouncing(P0);
        engine.add_thing(t);
        engine.add_thing(circle_at(200.0, 100.0, 10.0));
        engine.advance_effects();
        engine.advance_effects();
        assert_eq!(engine.things()[0].flash_count, 2);
        assert_eq!(engine.things()[1].flash_count, 0);
    }

    #[test]
    fn player_count_selects_mode() {
        assert_eq!(GameMode::from_player_count(0), GameMode::Off);
        assert_eq!(GameMode::from_player_count(1), GameMode::Solo);
        assert_eq!(GameMode::from_player_count(2), GameMode::TwoPlayer);
        assert_eq!(GameMode::from_player_count(5), GameMode::TwoPlayer);
    }
}
