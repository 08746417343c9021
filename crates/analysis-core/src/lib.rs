//! Framewatch Analysis Core
//!
//! The decision logic of the pipeline:
//! - **Activity classification:** a fixed rule tree over relative skeletal
//!   landmark heights, one label per frame
//! - **Anomaly detection:** a magnitude threshold over the dense optical
//!   flow between consecutive frames
//!
//! Both are deterministic: identical inputs always produce identical
//! outputs.

pub mod activity;
pub mod anomaly;

pub use activity::classify;
pub use anomaly::AnomalyDetector;
