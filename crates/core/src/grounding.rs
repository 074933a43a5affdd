//! Grounded recall: the engine's proof payload and the prompt-ready artifact.
//!
//! A grounded recall returns a token-budgeted context block together with a
//! proof of which memories were selected and which top-ranked ones were left
//! out. [`assemble`] turns that response into a [`VerifiedContextArtifact`]
//! that prompt-construction code can use without touching the proof.

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A memory the engine put into the context block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectedMemory {
    pub memory_id: String,

    #[serde(default)]
    pub content: String,

    /// Composite score used for selection
    #[serde(default)]
    pub score: f64,

    /// Per-component scores (intersection, recency, reinforcement, salience, ...)
    #[serde(default)]
    pub components: BTreeMap<String, f64>,

    #[serde(default)]
    pub estimated_tokens: u32,

    /// Human-readable justification for the selection
    #[serde(default)]
    pub reason: String,
}

/// A top-ranked memory that did not make it into the context block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExcludedMemory {
    pub memory_id: String,

    #[serde(default)]
    pub score: f64,

    #[serde(default)]
    pub reason: String,
}

/// Proof of how the context block was built.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GroundingProof {
    #[serde(default)]
    pub trace_id: String,

    #[serde(default)]
    pub query_text: String,

    /// Normalized query tokens
    #[serde(default)]
    pub query_tokens: Vec<String>,

    /// `(token, score)` pairs after alias and pattern expansion
    #[serde(default)]
    pub expanded_cues: Vec<(String, f64)>,

    #[serde(default)]
    pub token_budget: u32,

    #[serde(default)]
    pub selected: Vec<SelectedMemory>,

    #[serde(default)]
    pub excluded_top: Vec<ExcludedMemory>,
}

/// A proof that breaks one of its own invariants.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProofViolation {
    #[error("memory {0} is both selected and excluded")]
    SelectedAndExcluded(String),

    #[error("selected memories use {used} estimated tokens, budget is {budget}")]
    OverBudget { used: u64, budget: u32 },
}

impl GroundingProof {
    /// Sum of `estimated_tokens` across the selected memories.
    pub fn estimated_tokens(&self) -> u64 {
        self.selected
            .iter()
            .map(|m| u64::from(m.estimated_tokens))
            .sum()
    }

    /// Check the proof against its invariants.
    ///
    /// The engine enforces these; the client never calls this on its own.
    pub fn verify(&self) -> Result<(), ProofViolation> {
        let selected: HashSet<&str> = self.selected.iter().map(|m| m.memory_id.as_str()).collect();
        if let Some(dup) = self
            .excluded_top
            .iter()
            .find(|m| selected.contains(m.memory_id.as_str()))
        {
            return Err(ProofViolation::SelectedAndExcluded(dup.memory_id.clone()));
        }

        let used = self.estimated_tokens();
        if used > u64::from(self.token_budget) {
            return Err(ProofViolation::OverBudget {
                used,
                budget: self.token_budget,
            });
        }

        Ok(())
    }
}

/// Response of `POST /recall/grounded`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroundedResponse {
    pub verified_context: String,
    pub proof: GroundingProof,

    #[serde(default)]
    pub engine_latency_ms: f64,
}

/// Prompt-ready result of a grounded recall.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerifiedContextArtifact {
    pub verified_context_block: String,
    pub grounding_proof: GroundingProof,
    pub selected_memories: Vec<SelectedMemory>,
}

impl VerifiedContextArtifact {
    pub fn selected_ids(&self) -> Vec<&str> {
        self.selected_memories
            .iter()
            .map(|m| m.memory_id.as_str())
            .collect()
    }

    pub fn estimated_tokens(&self) -> u64 {
        self.grounding_proof.estimated_tokens()
    }
}

/// Project a grounded response into its artifact. Pure and deterministic.
pub fn assemble(response: GroundedResponse) -> VerifiedContextArtifact {
    let selected_memories = response.proof.selected.clone();
    tracing::trace!(
        trace_id = %response.proof.trace_id,
        selected = selected_memories.len(),
        "Assembled grounded context"
    );
    VerifiedContextArtifact {
        verified_context_block: response.verified_context,
        grounding_proof: response.proof,
        selected_memories,
    }
}

impl From<GroundedResponse> for VerifiedContextArtifact {
    fn from(response: GroundedResponse) -> Self {
        assemble(response)
    }
}
