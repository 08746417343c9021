//! Rule-based posture classification.
//!
//! Classifies one frame's landmark set into a coarse activity label using
//! the relative heights of hips, knees, and ankles. Heights are image-space
//! y coordinates: smaller y means higher in the frame.
//!
//! The rules overlap, so they are evaluated strictly top to bottom and the
//! first match wins. Rule order is part of the observable contract;
//! downstream report consumers depend on the current labeling.

use framewatch_frame_model::{ActivityLabel, Joint, LandmarkSet};

/// A knee must sit at least this far above the hip for a crouch.
const CROUCH_KNEE_MARGIN: f64 = 0.1;

/// An ankle must sit at least this far above the hip for a crouch.
const CROUCH_ANKLE_MARGIN: f64 = 0.2;

/// An ankle must sit at least this far above the hip to count as standing.
const STAND_ANKLE_MARGIN: f64 = 0.1;

/// An ankle must sit at least this far below the hip for a jump.
const JUMP_ANKLE_MARGIN: f64 = 0.1;

/// Averaged left/right heights of the three leg joints.
struct LegHeights {
    hip: f64,
    knee: f64,
    ankle: f64,
}

fn leg_heights(landmarks: &LandmarkSet) -> Option<LegHeights> {
    let avg_y = |left: Joint, right: Joint| -> Option<f64> {
        Some((landmarks.get(left)?.y + landmarks.get(right)?.y) / 2.0)
    };

    Some(LegHeights {
        hip: avg_y(Joint::LeftHip, Joint::RightHip)?,
        knee: avg_y(Joint::LeftKnee, Joint::RightKnee)?,
        ankle: avg_y(Joint::LeftAnkle, Joint::RightAnkle)?,
    })
}

/// Classify a frame's posture from its landmark set.
///
/// Returns `Unknown` when no landmarks were extracted or any of the six
/// leg joints is missing; there is no partial inference. Pure function:
/// bit-for-bit reproducible for identical coordinates.
pub fn classify(landmarks: Option<&LandmarkSet>) -> ActivityLabel {
    let Some(heights) = landmarks.and_then(leg_heights) else {
        return ActivityLabel::Unknown;
    };

    let LegHeights { hip, knee, ankle } = heights;

    if knee > hip {
        ActivityLabel::Sitting
    } else if knee < hip - CROUCH_KNEE_MARGIN && ankle < hip - CROUCH_ANKLE_MARGIN {
        ActivityLabel::Crouching
    } else if ankle < hip - STAND_ANKLE_MARGIN {
        ActivityLabel::Standing
    } else if knee < hip && ankle > hip {
        ActivityLabel::Running
    } else if knee < hip && ankle < hip {
        ActivityLabel::Walking
    } else if knee < hip && ankle > hip + JUMP_ANKLE_MARGIN {
        // TODO: this arm is unreachable, the Running rule above already
        // matches any ankle below hip level. Confirm the intended rule
        // order with report consumers before reordering.
        ActivityLabel::Jumping
    } else {
        ActivityLabel::Lying
    }
}
