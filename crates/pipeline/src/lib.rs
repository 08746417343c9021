//! Framewatch Video Pipeline
//!
//! Drives frame-by-frame analysis over a frame source and reduces the
//! per-frame results into one aggregate report:
//!
//! ```text
//! ┌────────────────────────────────────────────────┐
//! │                VideoPipeline                    │
//! │  ┌───────────┐ ┌───────────┐ ┌──────────────┐  │
//! │  │ Face/     │ │ Pose +    │ │ Anomaly      │  │
//! │  │ Emotion   │ │ Activity  │ │ (flow vs.    │  │
//! │  │ Analyzer  │ │ Classifier│ │  prev frame) │  │
//! │  └─────┬─────┘ └─────┬─────┘ └──────┬───────┘  │
//! │        ▼             ▼              ▼          │
//! │  ┌──────────────────────────────────────────┐  │
//! │  │         Running tallies (per frame)      │  │
//! │  └──────────────────┬───────────────────────┘  │
//! │                     ▼ end of stream            │
//! │              AggregateReport                   │
//! └────────────────────────────────────────────────┘
//! ```
//!
//! Processing is strictly sequential and single-threaded; the only state
//! crossing frame boundaries is the retained previous frame.

pub mod pipeline;
pub mod source;

pub use pipeline::*;
pub use source::*;
