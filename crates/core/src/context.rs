//! Immutable connection context shared by every request a client issues.

use std::time::Duration;

/// Base URL, credentials, tenancy, and per-call timeout.
///
/// Built once (usually by `cuemap-config`) and never mutated; a different
/// configuration means a new client.
#[derive(Clone, PartialEq, Eq)]
pub struct ClientContext {
    base_url: String,
    api_key: Option<String>,
    project_id: Option<String>,
    timeout: Duration,
}

impl ClientContext {
    pub fn new(
        base_url: impl Into<String>,
        api_key: Option<String>,
        project_id: Option<String>,
        timeout: Duration,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            api_key,
            project_id,
            timeout,
        }
    }

    /// Engine base URL, exactly as configured (validated on first use).
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref()
    }

    /// Tenancy identifier sent as `X-Project-ID`.
    pub fn project_id(&self) -> Option<&str> {
        self.project_id.as_deref()
    }

    /// Deadline applied to each call independently.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

impl std::fmt::Debug for ClientContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientContext")
            .field("base_url", &self.base_url)
            .field("api_key", &redact(&self.api_key))
            .field("project_id", &self.project_id)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Placeholder rendered in place of a secret in `Debug` output.
pub fn redact(secret: &Option<String>) -> &'static str {
    match secret {
        Some(_) => "[REDACTED]",
        None => "None",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_redacts_api_key() {
        let ctx = ClientContext::new(
            "http://localhost:8080",
            Some("sk-secret".into()),
            Some("proj".into()),
            Duration::from_secs(30),
        );
        let rendered = format!("{ctx:?}");
        assert!(!rendered.contains("sk-secret"));
        assert!(rendered.contains("[REDACTED]"));
        assert!(rendered.contains("proj"));
    }

    #[test]
    fn accessors_return_configured_values() {
        let ctx = ClientContext::new("http://engine:9000", None, None, Duration::from_millis(250));
        assert_eq!(ctx.base_url(), "http://engine:9000");
        assert!(ctx.api_key().is_none());
        assert!(ctx.project_id().is_none());
        assert_eq!(ctx.timeout(), Duration::from_millis(250));
    }
}
