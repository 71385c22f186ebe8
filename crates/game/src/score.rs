//! Per-player, per-hand scores and level progression.

use std::collections::BTreeMap;
use std::time::{Duration, Instant};

use input::PlayerId;
use physics::HandSide;

/// Both hands must score more than this to complete a level.
pub const LEVEL_THRESHOLD: u32 = 50;

/// Hand score from which the hand icon shows half full.
pub const HALF_FULL_SCORE: u32 = 25;

/// Points awarded for one captured shape.
pub const CAPTURE_POINTS: u32 = 5;

/// Scores of one player's two hands.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HandScores {
    pub left: u32,
    pub right: u32,
}

impl HandScores {
    pub fn get(&self, side: HandSide) -> u32 {
        match side {
            HandSide::Left => self.left,
            HandSide::Right => self.right,
        }
    }

    fn get_mut(&mut self, side: HandSide) -> &mut u32 {
        match side {
            HandSide::Left => &mut self.left,
            HandSide::Right => &mut self.right,
        }
    }
}

/// How full a hand's glass is drawn, from its score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FillLevel {
    Empty,
    Half,
    Full,
}

impl FillLevel {
    pub fn from_score(score: u32) -> Self {
        match score {
            s if s < HALF_FULL_SCORE => FillLevel::Empty,
            s if s <= LEVEL_THRESHOLD => FillLevel::Half,
            _ => FillLevel::Full,
        }
    }
}

/// Scores for every player in the current game, plus the shared level.
#[derive(Debug, Clone)]
pub struct ScoreBoard {
    scores: BTreeMap<PlayerId, HandScores>,
    level: u32,
    started: Instant,
}

impl ScoreBoard {
    pub fn new(now: Instant) -> Self {
        Self {
            scores: BTreeMap::new(),
            level: 1,
            started: now,
        }
    }

    /// Forget all scores and restart at level 1.
    pub fn reset(&mut self, now: Instant) {
        self.scores.clear();
        self.level = 1;
        self.started = now;
    }

    /// Make sure `player` has an entry, starting at zero.
    pub fn ensure_player(&mut self, player: PlayerId) {
        self.scores.entry(player).or_default();
    }

    /// Add points to one hand. Returns true when this completed a level, in
    /// which case the level has advanced and the player's hands are back at 0.
    pub fn add(&mut self, player: PlayerId, side: HandSide, points: u32) -> bool {
        let hands = self.scores.entry(player).or_default();
        *hands.get_mut(side) += points;

        if hands.left > LEVEL_THRESHOLD && hands.right > LEVEL_THRESHOLD {
            *hands = HandScores::default();
            self.level += 1;
            log::info!("Player {:?} completed a level, now level {}", player, self.level);
            return true;
        }
        false
    }

    pub fn hands(&self, player: PlayerId) -> HandScores {
        self.scores.get(&player).copied().unwrap_or_default()
    }

    pub fn score(&self, player: PlayerId, side: HandSide) -> u32 {
        self.hands(player).get(side)
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn elapsed(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.started)
    }

    /// All players with a score entry, in player order.
    pub fn iter(&self) -> impl Iterator<Item = (PlayerId, HandScores)> + '_ {
        self.scores.iter().map(|(id, hands)| (*id, *hands))
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }
}
