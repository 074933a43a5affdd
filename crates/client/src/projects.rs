//! Project (tenant) listing and deletion.

use cuemap_core::Result;
use serde::Deserialize;

use crate::{CueMapClient, EngineRequest, best_effort};

#[derive(Deserialize)]
#[serde(untagged)]
enum ProjectList {
    Bare(Vec<String>),
    Wrapped { projects: Vec<String> },
}

impl CueMapClient {
    pub async fn list_projects(&self) -> Result<Vec<String>> {
        let list: ProjectList = self
            .transport
            .invoke_as(EngineRequest::get(["projects"]))
            .await?;
        Ok(match list {
            ProjectList::Bare(ids) | ProjectList::Wrapped { projects: ids } => ids,
        })
    }

    /// Drop a project and its memories. Best-effort.
    pub async fn delete_project(&self, project_id: &str) -> bool {
        best_effort("delete_project", self.try_delete_project(project_id).await)
    }

    pub async fn try_delete_project(&self, project_id: &str) -> Result<()> {
        self.send_unit(EngineRequest::delete(["projects", project_id]))
            .await
    }
}
