//! Set of players currently in front of the sensor.

use std::collections::BTreeMap;
use std::time::Instant;

use engine_core::SceneRect;

use crate::player::Player;
use crate::skeleton::{PlayerId, SkeletonFrame};

/// Tracks every player seen recently, keyed by tracker slot.
#[derive(Debug, Clone)]
pub struct Roster {
    players: BTreeMap<PlayerId, Player>,
    bounds: SceneRect,
}

impl Roster {
    pub fn new(bounds: SceneRect) -> Self {
        Self {
            players: BTreeMap::new(),
            bounds,
        }
    }

    /// Change the screen area skeletons are mapped into, for all players.
    pub fn set_bounds(&mut self, bounds: SceneRect) {
        self.bounds = bounds;
        for player in self.players.values_mut() {
            player.set_bounds(bounds);
        }
    }

    /// Apply a full skeleton frame for one player, adding the player on first sight.
    /// Empty frames only refresh the player's liveness.
    pub fn apply_frame(&mut self, id: PlayerId, frame: &SkeletonFrame, now: Instant) {
        let bounds = self.bounds;
        let player = self.players.entry(id).or_insert_with(|| {
            log::info!("Player {:?} entered the scene", id);
            Player::new(id, bounds, now)
        });
        player.apply_frame(frame, now);
    }

    /// Drop players that have not been updated recently. Returns who left.
    pub fn prune(&mut self, now: Instant) -> Vec<PlayerId> {
        let gone: Vec<PlayerId> = self
            .players
            .values()
            .filter(|p| !p.is_alive(now))
            .map(Player::id)
            .collect();
        for id in &gone {
            log::info!("Player {:?} left the scene", id);
            self.players.remove(id);
        }
        gone
    }

    pub fn alive_count(&self, now: Instant) -> usize {
        self.players.values().filter(|p| p.is_alive(now)).count()
    }

    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.get(&id)
    }

    /// Players in slot order.
    pub fn players(&self) -> impl Iterator<Item = &Player> {
        self.players.values()
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::JointId;
    use engine_core::DVec2;
    use std::time::Duration;

    fn frame() -> SkeletonFrame {
        SkeletonFrame::new().with_joint(JointId::HandLeft, DVec2::new(0.1, 0.1))
    }

    #[test]
    fn players_are_added_and_pruned() {
        let t0 = Instant::now();
        let mut roster = Roster::new(SceneRect::new(640.0, 480.0));
        roster.apply_frame(PlayerId(0), &frame(), t0);
        roster.apply_frame(PlayerId(3), &frame(), t0 + Duration::from_millis(400));
        assert_eq!(roster.alive_count(t0 + Duration::from_millis(450)), 2);

        let gone = roster.prune(t0 + Duration::from_millis(600));
        assert_eq!(gone, vec![PlayerId(0)]);
        assert_eq!(roster.len(), 1);
        assert!(roster.player(PlayerId(3)).is_some());
    }

    #[test]
    fn empty_frame_keeps_a_player_alive() {
        let t0 = Instant::now();
        let mut roster = Roster::new(SceneRect::new(640.0, 480.0));
        roster.apply_frame(PlayerId(0), &frame(), t0);
        let empty = SkeletonFrame::new();
        assert!(empty.is_empty());
        roster.apply_frame(PlayerId(0), &empty, t0 + Duration::from_millis(400));
        assert_eq!(roster.alive_count(t0 + Duration::from_millis(700)), 1);
        assert!(roster.prune(t0 + Duration::from_millis(700)).is_empty());

        // The empty frame left the hand where it was.
        let p = roster.player(PlayerId(0)).expect("present");
        assert_eq!(p.bones().count(), 1);
    }

    #[test]
    fn bounds_change_reaches_existing_players() {
        let t0 = Instant::now();
        let mut roster = Roster::new(SceneRect::new(640.0, 480.0));
        roster.apply_frame(PlayerId(0), &frame(), t0);
        roster.set_bounds(SceneRect::new(200.0, 200.0));
        let p = roster.player(PlayerId(0)).expect("present");
        assert_eq!(p.to_screen(DVec2::ZERO), DVec2::new(100.0, 100.0));
    }
}
