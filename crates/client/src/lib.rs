//! Typed async client for the CueMap associative-memory engine.
//!
//! [`CueMapClient`] exposes one method per engine capability: memory CRUD,
//! recall (cue, natural-language, grounded), alias and lexicon management,
//! and ingestion. Each call is an independent request with its own deadline;
//! the client holds no state beyond its [`ClientContext`], so clones can be
//! shared freely across tasks.
//!
//! Best-effort mutations (`reinforce`, `delete_project`, `add_alias`,
//! `merge_aliases`, `lexicon_delete`) report failure as `false`. Each has a
//! `try_*` twin that returns the underlying [`ClientError`] instead.

mod aliases;
mod ingest;
mod lexicon;
mod memories;
mod projects;
mod recall;
pub mod transport;

pub use cuemap_config::ClientConfig;
pub use cuemap_core::{
    Alias, ClientContext, ClientError, ErrorKind, ExcludedMemory, GroundedRecallRequest,
    GroundedResponse, GroundingProof, JobStatus, Memory, Metadata, NewMemory, Opaque,
    ProofViolation, RecallRequest, RecallResponse, RecallResult, Result, SelectedMemory,
    VerifiedContextArtifact, assemble,
};
pub use ingest::MIN_POLL_INTERVAL;
pub use transport::{EngineRequest, RequestBody, Transport};

use tracing::warn;

/// Client for one engine endpoint, project, and credential set.
#[derive(Debug, Clone)]
pub struct CueMapClient {
    transport: Transport,
}

impl CueMapClient {
    /// Create a client with a fresh connection pool.
    pub fn new(context: ClientContext) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("cuemap-rs/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ClientError::transport("failed to build HTTP client", e))?;
        Ok(Self::with_http_client(context, http))
    }

    /// Create a client on top of an existing `reqwest` pool.
    pub fn with_http_client(context: ClientContext, http: reqwest::Client) -> Self {
        Self {
            transport: Transport::new(context, http),
        }
    }

    /// Resolve `config` (filling defaults) and create a client.
    pub fn from_config(config: ClientConfig) -> Result<Self> {
        Self::new(config.resolve())
    }

    pub fn context(&self) -> &ClientContext {
        self.transport.context()
    }

    pub fn transport(&self) -> &Transport {
        &self.transport
    }

    /// Send a request and discard the response body.
    async fn send_unit(&self, request: EngineRequest) -> Result<()> {
        self.transport.invoke(request).await.map(|_| ())
    }
}

/// Collapse a best-effort result into a boolean, logging the cause.
fn best_effort(operation: &'static str, result: Result<()>) -> bool {
    match result {
        Ok(()) => true,
        Err(e) => {
            warn!(operation, error = %e, kind = ?e.kind(), "Best-effort engine call failed");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn best_effort_maps_errors_to_false() {
        assert!(best_effort("reinforce", Ok(())));
        assert!(!best_effort("reinforce", Err(ClientError::Authentication)));
        assert!(!best_effort(
            "add_alias",
            Err(ClientError::transport_msg("connection refused"))
        ));
    }

    #[test]
    fn from_config_resolves_defaults() {
        let client = CueMapClient::from_config(ClientConfig::default()).unwrap();
        assert_eq!(client.context().base_url(), "http://localhost:8080");
        assert_eq!(client.context().timeout().as_millis(), 30_000);
    }

    #[test]
    fn transport_shares_client_context() {
        let config = ClientConfig::default().url("http://engine:9000").project_id("billing");
        let client = CueMapClient::from_config(config).unwrap();
        let transport = client.transport();
        assert_eq!(transport.context(), client.context());

        let url = transport.url_for(&EngineRequest::get(["stats"])).unwrap();
        assert_eq!(url.as_str(), "http://engine:9000/stats");
    }
}
