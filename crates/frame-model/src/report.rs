//! Activity labels and the aggregate summary report.
//!
//! The report schema is fixed: five top-level keys with the Portuguese
//! field names existing downstream consumers already parse, written as
//! UTF-8 JSON with 4-space indentation and non-ASCII text unescaped.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use framewatch_common::error::{FramewatchError, FramewatchResult};

use crate::detection::Emotion;

/// Coarse body-posture label, exactly one per processed frame.
///
/// Serialized values are the Portuguese labels the report consumers expect.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum ActivityLabel {
    #[serde(rename = "Sentado")]
    Sitting,
    #[serde(rename = "Agachado")]
    Crouching,
    #[serde(rename = "Em pé")]
    Standing,
    #[serde(rename = "Correndo")]
    Running,
    #[serde(rename = "Andando")]
    Walking,
    #[serde(rename = "Pulando")]
    Jumping,
    #[serde(rename = "Deitado")]
    Lying,
    #[serde(rename = "Desconhecida")]
    Unknown,
}

/// The final summary document, built once at end of stream.
///
/// Invariants: activity counts sum to `total_frames`; emotion counts sum to
/// `total_faces`. Histograms are ordered maps so serialization is
/// deterministic.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AggregateReport {
    #[serde(rename = "Total de Frames")]
    pub total_frames: u64,

    #[serde(rename = "Total de Rostos Detectados")]
    pub total_faces: u64,

    #[serde(rename = "Total de Anomalias Detectadas")]
    pub total_anomalies: u64,

    #[serde(rename = "Resumo de Emoções")]
    pub emotions: BTreeMap<Emotion, u64>,

    #[serde(rename = "Resumo de Atividades")]
    pub activities: BTreeMap<ActivityLabel, u64>,
}

impl AggregateReport {
    /// Serialize with the fixed report formatting: 4-space indentation,
    /// non-ASCII text left unescaped.
    pub fn to_json(&self) -> FramewatchResult<String> {
        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
        self.serialize(&mut ser)?;
        String::from_utf8(buf)
            .map_err(|e| FramewatchError::report(format!("Report is not valid UTF-8: {e}")))
    }

    /// Write the report to disk.
    ///
    /// Report generation and persistence are separate steps: a failed write
    /// surfaces here without losing the in-memory tallies.
    pub fn save(&self, path: &Path) -> FramewatchResult<()> {
        let json = self.to_json()?;
        std::fs::write(path, json).map_err(|e| {
            FramewatchError::report(format!("Failed to write {}: {e}", path.display()))
        })
    }

    /// Load a previously saved report.
    pub fn load(path: &Path) -> FramewatchResult<Self> {
        if !path.exists() {
            return Err(FramewatchError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        let content = std::fs::read_to_string(path).map_err(|e| {
            FramewatchError::report(format!("Failed to read {}: {e}", path.display()))
        })?;
        Ok(serde_json::from_str(&content)?)
    }
}
