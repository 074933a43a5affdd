//! Alias graph management.

use cuemap_core::{Alias, Result};
use serde::{Deserialize, Serialize};

use crate::{CueMapClient, EngineRequest, best_effort};

#[derive(Serialize)]
struct MergeBody<'a> {
    cues: Vec<String>,
    to: &'a str,
}

/// Engines answer with either a bare array or `{"aliases": [...]}`.
#[derive(Deserialize)]
#[serde(untagged)]
enum AliasList {
    Bare(Vec<Alias>),
    Wrapped { aliases: Vec<Alias> },
}

impl From<AliasList> for Vec<Alias> {
    fn from(list: AliasList) -> Self {
        match list {
            AliasList::Bare(aliases) | AliasList::Wrapped { aliases } => aliases,
        }
    }
}

impl CueMapClient {
    /// Map `alias.from` onto the canonical cue `alias.to`. Best-effort.
    pub async fn add_alias(&self, alias: &Alias) -> bool {
        best_effort("add_alias", self.try_add_alias(alias).await)
    }

    pub async fn try_add_alias(&self, alias: &Alias) -> Result<()> {
        self.send_unit(EngineRequest::post(["aliases"]).json(alias)?)
            .await
    }

    /// All aliases, or only those touching `cue`.
    pub async fn get_aliases(&self, cue: Option<&str>) -> Result<Vec<Alias>> {
        let mut request = EngineRequest::get(["aliases"]);
        if let Some(cue) = cue {
            request = request.query("cue", cue);
        }
        let list: AliasList = self.transport.invoke_as(request).await?;
        Ok(list.into())
    }

    /// Fold every cue in `cues` into `to`. Best-effort.
    pub async fn merge_aliases(
        &self,
        cues: impl IntoIterator<Item = impl Into<String>>,
        to: &str,
    ) -> bool {
        best_effort("merge_aliases", self.try_merge_aliases(cues, to).await)
    }

    pub async fn try_merge_aliases(
        &self,
        cues: impl IntoIterator<Item = impl Into<String>>,
        to: &str,
    ) -> Result<()> {
        let body = MergeBody {
            cues: cues.into_iter().map(Into::into).collect(),
            to,
        };
        self.send_unit(EngineRequest::post(["aliases", "merge"]).json(&body)?)
            .await
    }
}
