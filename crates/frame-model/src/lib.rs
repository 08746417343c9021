//! Framewatch Frame Model
//!
//! Data types flowing through the analysis pipeline:
//! - **Frame / FlowField:** pixel buffers and dense motion fields
//! - **FaceDetection / Emotion:** face analyzer output
//! - **Joint / LandmarkSet:** pose extractor output
//! - **ActivityLabel / AggregateReport:** classifier output and the final
//!   summary document
//!
//! This crate is pure data; no analysis logic lives here.

pub mod detection;
pub mod frame;
pub mod landmark;
pub mod report;

pub use detection::{BoundingBox, Emotion, FaceDetection};
pub use frame::{FlowField, Frame};
pub use landmark::{Joint, LandmarkSet, Point3};
pub use report::{ActivityLabel, AggregateReport};
