//! Stored memories, aliases, and ingestion job status.
//!
//! All of these are transport values: the engine owns them, the client only
//! reads them or asks the engine to change them.

use serde::{Deserialize, Serialize};

use crate::Metadata;

/// A memory as stored by the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Memory {
    /// Engine-assigned identifier
    pub id: String,

    pub content: String,

    /// Normalized retrieval tokens, in engine order
    #[serde(default)]
    pub cues: Vec<String>,

    #[serde(default)]
    pub metadata: Metadata,

    #[serde(default)]
    pub created_at: f64,

    #[serde(default)]
    pub last_accessed: f64,
}

/// Body of `POST /memories`.
///
/// An empty cue list asks the engine to generate cues itself.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NewMemory {
    pub content: String,
    pub cues: Vec<String>,
    pub metadata: Metadata,
    pub disable_temporal_chunking: bool,
}

impl NewMemory {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ..Self::default()
        }
    }

    pub fn cues(mut self, cues: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.cues = cues.into_iter().map(Into::into).collect();
        self
    }

    pub fn metadata(mut self, metadata: Metadata) -> Self {
        self.metadata = metadata;
        self
    }

    /// Set a single metadata key.
    pub fn meta(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    pub fn disable_temporal_chunking(mut self, disable: bool) -> Self {
        self.disable_temporal_chunking = disable;
        self
    }
}

/// A directed, weighted mapping from a surface token to a canonical cue.
///
/// The weight is conceptually in `[0, 1]`; the engine is authoritative and
/// the client does not validate it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alias {
    pub from: String,
    pub to: String,
    #[serde(default = "default_weight")]
    pub weight: f64,
}

fn default_weight() -> f64 {
    1.0
}

impl Alias {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            weight: default_weight(),
        }
    }

    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = weight;
        self
    }
}

/// Ingestion progress for the configured project.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobStatus {
    #[serde(default)]
    pub writes_completed: u64,

    #[serde(default)]
    pub writes_total: u64,

    /// Any additional fields the engine reports
    #[serde(flatten)]
    pub extra: Metadata,
}

impl JobStatus {
    /// True once every submitted write has landed.
    pub fn is_complete(&self) -> bool {
        self.writes_completed >= self.writes_total
    }

    pub fn pending(&self) -> u64 {
        self.writes_total.saturating_sub(self.writes_completed)
    }
}
