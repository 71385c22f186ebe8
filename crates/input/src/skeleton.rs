//! Skeleton joints as delivered by the body tracker.

use std::collections::HashMap;

use engine_core::DVec2;

/// Tracker slot a skeleton was reported in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PlayerId(pub u32);

/// The twenty tracked skeletal joints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum JointId {
    HipCenter,
    Spine,
    ShoulderCenter,
    Head,
    ShoulderLeft,
    ElbowLeft,
    WristLeft,
    HandLeft,
    ShoulderRight,
    ElbowRight,
    WristRight,
    HandRight,
    HipLeft,
    KneeLeft,
    AnkleLeft,
    FootLeft,
    HipRight,
    KneeRight,
    AnkleRight,
    FootRight,
}

/// One tracked skeleton: joint positions in sensor space (metres, y up,
/// x to the right, origin on the sensor axis).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SkeletonFrame {
    joints: HashMap<JointId, DVec2>,
}

impl SkeletonFrame {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style joint insertion.
    pub fn with_joint(mut self, joint: JointId, position: DVec2) -> Self {
        self.joints.insert(joint, position);
        self
    }

    pub fn joint(&self, joint: JointId) -> Option<DVec2> {
        self.joints.get(&joint).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.joints.is_empty()
    }

    pub fn len(&self) -> usize {
        self.joints.len()
    }
}

/// Identity of a tracked body segment: a joint pair, or the same joint twice
/// for point segments such as hands and head.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BoneId(pub JointId, pub JointId);

impl BoneId {
    pub fn point(joint: JointId) -> Self {
        Self(joint, joint)
    }

    pub fn is_point(&self) -> bool {
        self.0 == self.1
    }
}

/// Point segments, in hit-test order: head, hands, feet.
pub const POINT_JOINTS: [JointId; 5] = [
    JointId::Head,
    JointId::HandLeft,
    JointId::HandRight,
    JointId::FootLeft,
    JointId::FootRight,
];

/// Limb segments between joint pairs.
pub const LIMB_BONES: [BoneId; 18] = [
    // Hands and arms
    BoneId(JointId::HandRight, JointId::WristRight),
    BoneId(JointId::WristRight, JointId::ElbowRight),
    BoneId(JointId::ElbowRight, JointId::ShoulderRight),
    BoneId(JointId::HandLeft, JointId::WristLeft),
    BoneId(JointId::WristLeft, JointId::ElbowLeft),
    BoneId(JointId::ElbowLeft, JointId::ShoulderLeft),
    // Head and shoulders
    BoneId(JointId::ShoulderCenter, JointId::Head),
    BoneId(JointId::ShoulderLeft, JointId::ShoulderCenter),
    BoneId(JointId::ShoulderCenter, JointId::ShoulderRight),
    // Legs
    BoneId(JointId::HipLeft, JointId::KneeLeft),
    BoneId(JointId::KneeLeft, JointId::AnkleLeft),
    BoneId(JointId::AnkleLeft, JointId::FootLeft),
    BoneId(JointId::HipRight, JointId::KneeRight),
    BoneId(JointId::KneeRight, JointId::AnkleRight),
    BoneId(JointId::AnkleRight, JointId::FootRight),
    BoneId(JointId::HipLeft, JointId::HipCenter),
    BoneId(JointId::HipCenter, JointId::HipRight),
    // Spine
    BoneId(JointId::HipCenter, JointId::ShoulderCenter),
];
