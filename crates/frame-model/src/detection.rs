//! Face detection output types.

use serde::{Deserialize, Serialize};

/// Axis-aligned face bounding box in pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x: i32,
    pub y: i32,
    pub w: u32,
    pub h: u32,
}

/// Dominant emotion label vocabulary of the face/emotion backend.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Emotion {
    Angry,
    Disgust,
    Fear,
    Happy,
    Sad,
    Surprise,
    Neutral,
}

/// One detected face with its dominant emotion.
///
/// Produced fresh per frame; not persisted beyond tally accumulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaceDetection {
    /// Where the face was found.
    pub region: BoundingBox,

    /// Highest-confidence emotion for this face.
    pub emotion: Emotion,
}

impl FaceDetection {
    pub fn new(region: BoundingBox, emotion: Emotion) -> Self {
        Self { region, emotion }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_emotion_serializes_lowercase() {
        let json = serde_json::to_string(&Emotion::Happy).unwrap();
        assert_eq!(json, "\"happy\"");
        let parsed: Emotion = serde_json::from_str("\"surprise\"").unwrap();
        assert_eq!(parsed, Emotion::Surprise);
    }

    #[test]
    fn test_detection_roundtrip() {
        let det = FaceDetection::new(
            BoundingBox {
                x: 10,
                y: 20,
                w: 64,
                h: 64,
            },
            Emotion::Neutral,
        );
        let json = serde_json::to_string(&det).unwrap();
        let parsed: FaceDetection = serde_json::from_str(&json).unwrap();
        assert_eq!(det, parsed);
    }
}
