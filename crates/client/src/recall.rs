//! Recall: cue, natural-language, and grounded.

use cuemap_core::{
    GroundedRecallRequest, GroundedResponse, RecallRequest, RecallResponse, Result,
    VerifiedContextArtifact, assemble,
};
use tracing::debug;

use crate::{CueMapClient, EngineRequest};

impl CueMapClient {
    /// Ranked recall. Results arrive already scored by the engine.
    pub async fn recall(&self, request: &RecallRequest) -> Result<RecallResponse> {
        let response: RecallResponse = self
            .transport
            .invoke_as(EngineRequest::post(["recall"]).json(request)?)
            .await?;
        debug!(results = response.results.len(), limit = request.limit, "Recall completed");
        Ok(response)
    }

    /// Token-budgeted recall with a selection proof.
    pub async fn recall_grounded(&self, request: &GroundedRecallRequest) -> Result<GroundedResponse> {
        let response: GroundedResponse = self
            .transport
            .invoke_as(EngineRequest::post(["recall", "grounded"]).json(request)?)
            .await?;
        debug!(
            selected = response.proof.selected.len(),
            excluded = response.proof.excluded_top.len(),
            token_budget = request.token_budget,
            engine_latency_ms = response.engine_latency_ms,
            "Grounded recall completed"
        );
        Ok(response)
    }

    /// Grounded recall assembled into a prompt-ready artifact.
    pub async fn ground(&self, request: &GroundedRecallRequest) -> Result<VerifiedContextArtifact> {
        Ok(assemble(self.recall_grounded(request).await?))
    }
}
