//! Memory CRUD and engine stats.

use cuemap_core::{Memory, Metadata, NewMemory, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{CueMapClient, EngineRequest, best_effort};

#[derive(Deserialize)]
struct Created {
    id: String,
}

#[derive(Serialize)]
struct ReinforceBody {
    cues: Vec<String>,
}

impl CueMapClient {
    /// Store a memory and return its engine-assigned id.
    ///
    /// An empty cue list lets the engine generate cues from the content.
    pub async fn add(&self, memory: &NewMemory) -> Result<String> {
        let created: Created = self
            .transport
            .invoke_as(EngineRequest::post(["memories"]).json(memory)?)
            .await?;
        debug!(memory_id = %created.id, cues = memory.cues.len(), "Memory stored");
        Ok(created.id)
    }

    pub async fn get(&self, memory_id: &str) -> Result<Memory> {
        self.transport
            .invoke_as(EngineRequest::get(["memories", memory_id]))
            .await
    }

    /// Strengthen a memory's association with `cues`. Best-effort.
    pub async fn reinforce(
        &self,
        memory_id: &str,
        cues: impl IntoIterator<Item = impl Into<String>>,
    ) -> bool {
        best_effort("reinforce", self.try_reinforce(memory_id, cues).await)
    }

    pub async fn try_reinforce(
        &self,
        memory_id: &str,
        cues: impl IntoIterator<Item = impl Into<String>>,
    ) -> Result<()> {
        let body = ReinforceBody {
            cues: cues.into_iter().map(Into::into).collect(),
        };
        self.send_unit(EngineRequest::patch(["memories", memory_id, "reinforce"]).json(&body)?)
            .await
    }

    /// Engine statistics; the shape is engine-defined.
    pub async fn stats(&self) -> Result<Metadata> {
        self.transport.invoke_as(EngineRequest::get(["stats"])).await
    }
}
