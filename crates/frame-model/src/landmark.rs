//! Skeletal landmark types produced by the pose extractor.
//!
//! Coordinates are normalized to frame-relative space: x and y in roughly
//! `[0.0, 1.0]` with the origin at the top-left, so smaller y means higher
//! in the frame. Landmarks can land slightly outside that range when a
//! joint is inferred off-screen.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Fixed vocabulary of skeletal joints used by posture classification.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Joint {
    LeftHip,
    RightHip,
    LeftKnee,
    RightKnee,
    LeftAnkle,
    RightAnkle,
}

/// A normalized 3D landmark coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Point3 {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

/// One frame's set of named skeletal landmarks.
///
/// Produced fresh per frame by the pose extractor and consumed immediately
/// by the activity classifier.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LandmarkSet {
    joints: BTreeMap<Joint, Point3>,
}

impl LandmarkSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, joint: Joint, point: Point3) {
        self.joints.insert(joint, point);
    }

    pub fn get(&self, joint: Joint) -> Option<Point3> {
        self.joints.get(&joint).copied()
    }

    pub fn len(&self) -> usize {
        self.joints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.joints.is_empty()
    }

    /// Build a set from `(joint, (x, y, z))` pairs.
    pub fn from_pairs(pairs: impl IntoIterator<Item = (Joint, (f64, f64, f64))>) -> Self {
        let mut set = Self::new();
        for (joint, (x, y, z)) in pairs {
            set.insert(joint, Point3::new(x, y, z));
        }
        set
    }
}
