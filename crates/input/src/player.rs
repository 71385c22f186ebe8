//! Per-player body segments built from skeleton frames.

use std::time::{Duration, Instant};

use engine_core::{DVec2, SceneRect};
use physics::{BoneData, Role, Segment};

use crate::skeleton::{BoneId, JointId, PlayerId, SkeletonFrame, LIMB_BONES, POINT_JOINTS};

/// A player not seen for this long has left the scene.
pub const PLAYER_TIMEOUT: Duration = Duration::from_millis(500);

/// Limb thickness as a fraction of the player area height.
const BONE_SIZE: f64 = 0.01;
/// Head radius as a fraction of the player area height.
const HEAD_SIZE: f64 = 0.08;
/// Hand and foot diameter as a fraction of the player area height.
const HAND_SIZE: f64 = 0.1;

/// One tracked person and the motion state of each of their body segments.
#[derive(Debug, Clone)]
pub struct Player {
    id: PlayerId,
    bounds: SceneRect,
    center: DVec2,
    scale: f64,
    /// Bone states in first-observed order, which is also hit-test order.
    bones: Vec<(BoneId, BoneData)>,
    last_updated: Instant,
}

impl Player {
    pub fn new(id: PlayerId, bounds: SceneRect, now: Instant) -> Self {
        let mut player = Self {
            id,
            bounds,
            center: DVec2::ZERO,
            scale: 1.0,
            bones: Vec::new(),
            last_updated: now,
        };
        player.set_bounds(bounds);
        player
    }

    pub fn id(&self) -> PlayerId {
        self.id
    }

    /// Screen area the skeleton is mapped into.
    pub fn set_bounds(&mut self, bounds: SceneRect) {
        self.bounds = bounds;
        self.center = bounds.center();
        self.scale = bounds.width.min(bounds.height / 2.0);
    }

    /// Map a sensor-space joint position to screen pixels.
    pub fn to_screen(&self, p: DVec2) -> DVec2 {
        DVec2::new(p.x * self.scale + self.center.x, self.center.y - p.y * self.scale)
    }

    /// Fold a new skeleton frame into the bone states. Joints missing from
    /// the frame leave their segments untouched.
    pub fn apply_frame(&mut self, frame: &SkeletonFrame, now: Instant) {
        self.last_updated = now;
        let height = self.bounds.height;

        for joint in POINT_JOINTS {
            let Some(p) = frame.joint(joint) else {
                continue;
            };
            let center = self.to_screen(p);
            let segment = match joint {
                JointId::Head => Segment::circle(center, height * HEAD_SIZE),
                JointId::HandLeft => {
                    Segment::circle(center, height * HAND_SIZE / 2.0).with_role(Role::LeftHand)
                }
                JointId::HandRight => {
                    Segment::circle(center, height * HAND_SIZE / 2.0).with_role(Role::RightHand)
                }
                _ => Segment::circle(center, height * HAND_SIZE / 2.0),
            };
            self.update_segment(BoneId::point(joint), segment, now);
        }

        let bone_radius = (height * BONE_SIZE).max(3.0) / 2.0;
        for bone in LIMB_BONES {
            let (Some(a), Some(b)) = (frame.joint(bone.0), frame.joint(bone.1)) else {
                continue;
            };
            let segment = Segment::line(self.to_screen(a), self.to_screen(b), bone_radius);
            self.update_segment(bone, segment, now);
        }
    }

    /// Record an observed screen-space segment for `bone`, creating its
    /// state on first sight.
    pub fn update_segment(&mut self, bone: BoneId, segment: Segment, now: Instant) {
        self.last_updated = now;
        match self.bones.iter_mut().find(|(id, _)| *id == bone) {
            Some((_, data)) => data.update(segment, now),
            None => self.bones.push((bone, BoneData::new(segment, now))),
        }
    }

    pub fn bone(&self, bone: BoneId) -> Option<&BoneData> {
        self.bones.iter().find(|(id, _)| *id == bone).map(|(_, data)| data)
    }

    /// All bone states in hit-test order.
    pub fn bones(&self) -> impl Iterator<Item = &BoneData> {
        self.bones.iter().map(|(_, data)| data)
    }

    pub fn is_alive(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.last_updated) <= PLAYER_TIMEOUT
    }
}
