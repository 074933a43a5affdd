//! # CueMap Core
//!
//! Domain types, error definitions, and grounding assembly for the CueMap
//! client. This crate has **no transport dependencies**: it describes what
//! the engine sends and receives, and leaves the wire to `cuemap-client`.
//!
//! ## Layout
//!
//! - [`context`] — the immutable connection context every request reads
//! - [`error`] — the single client error surface
//! - [`memory`] — stored memories, aliases, ingestion job status
//! - [`recall`] — recall request options and ranked results
//! - [`grounding`] — grounded recall proofs and the prompt-ready artifact

pub mod context;
pub mod error;
pub mod grounding;
pub mod memory;
pub mod recall;

// Re-export key types at crate root for ergonomics
pub use context::ClientContext;
pub use error::{ClientError, ErrorKind, Result};
pub use grounding::{
    ExcludedMemory, GroundedResponse, GroundingProof, ProofViolation, SelectedMemory,
    VerifiedContextArtifact, assemble,
};
pub use memory::{Alias, JobStatus, Memory, NewMemory};
pub use recall::{GroundedRecallRequest, RecallRequest, RecallResponse, RecallResult};

/// Opaque JSON payload for engine responses without a contractual shape.
pub type Opaque = serde_json::Value;

/// Open key-value mapping (memory metadata, engine stats).
pub type Metadata = serde_json::Map<String, serde_json::Value>;
