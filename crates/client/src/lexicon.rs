//! Lexicon (token → canonical cue) management. Payloads are engine-defined.

use cuemap_core::{Opaque, Result};
use serde::Serialize;

use crate::{CueMapClient, EngineRequest, best_effort};

#[derive(Serialize)]
struct WireBody<'a> {
    token: &'a str,
    canonical: &'a str,
}

impl CueMapClient {
    /// Wire a surface token to a canonical cue.
    pub async fn lexicon_wire(&self, token: &str, canonical: &str) -> Result<Opaque> {
        self.transport
            .invoke(EngineRequest::post(["lexicon", "wire"]).json(&WireBody { token, canonical })?)
            .await
    }

    pub async fn lexicon_inspect(&self, cue: &str) -> Result<Opaque> {
        self.transport
            .invoke(EngineRequest::get(["lexicon", "inspect", cue]))
            .await
    }

    /// The whole lexicon graph.
    pub async fn lexicon_graph(&self) -> Result<Opaque> {
        self.transport
            .invoke(EngineRequest::get(["lexicon", "graph"]))
            .await
    }

    pub async fn lexicon_synonyms(&self, cue: &str) -> Result<Opaque> {
        self.transport
            .invoke(EngineRequest::get(["lexicon", "synonyms", cue]))
            .await
    }

    /// Remove a lexicon entry. Best-effort.
    pub async fn lexicon_delete(&self, entry_id: &str) -> bool {
        best_effort("lexicon_delete", self.try_lexicon_delete(entry_id).await)
    }

    pub async fn try_lexicon_delete(&self, entry_id: &str) -> Result<()> {
        self.send_unit(EngineRequest::delete(["lexicon", "entry", entry_id]))
            .await
    }
}
