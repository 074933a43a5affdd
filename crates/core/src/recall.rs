//! Recall request options and ranked results.
//!
//! [`RecallRequest`] carries every recognized option as a named field, so new
//! options can be added without disturbing existing call sites.

use serde::{Deserialize, Serialize};

use crate::{Metadata, Opaque};

const DEFAULT_LIMIT: u32 = 10;
const DEFAULT_TOKEN_BUDGET: u32 = 500;

/// Options for `POST /recall`.
///
/// Supply `query_text`, `cues`, or both; when both are present the engine
/// decides how they combine. Setting `min_intersection` requests strict AND
/// matching, leaving it unset gives OR matching. `projects` widens the query
/// beyond the configured project.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecallRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query_text: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub cues: Option<Vec<String>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub projects: Option<Vec<String>>,

    pub limit: u32,
    pub auto_reinforce: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_intersection: Option<u32>,

    pub explain: bool,
    pub disable_pattern_completion: bool,
    pub disable_salience_bias: bool,
    pub disable_systems_consolidation: bool,
}

impl Default for RecallRequest {
    fn default() -> Self {
        Self {
            query_text: None,
            cues: None,
            projects: None,
            limit: DEFAULT_LIMIT,
            auto_reinforce: false,
            min_intersection: None,
            explain: false,
            disable_pattern_completion: false,
            disable_salience_bias: false,
            disable_systems_consolidation: false,
        }
    }
}

impl RecallRequest {
    /// Keyword recall over explicit cues.
    pub fn by_cues(cues: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self::default().cues(cues)
    }

    /// Natural-language recall; the engine resolves the text to cues.
    pub fn by_query(query_text: impl Into<String>) -> Self {
        Self::default().query_text(query_text)
    }

    pub fn query_text(mut self, query_text: impl Into<String>) -> Self {
        self.query_text = Some(query_text.into());
        self
    }

    pub fn cues(mut self, cues: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.cues = Some(cues.into_iter().map(Into::into).collect());
        self
    }

    pub fn projects(mut self, projects: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.projects = Some(projects.into_iter().map(Into::into).collect());
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }

    pub fn auto_reinforce(mut self, enabled: bool) -> Self {
        self.auto_reinforce = enabled;
        self
    }

    pub fn min_intersection(mut self, min: u32) -> Self {
        self.min_intersection = Some(min);
        self
    }

    pub fn explain(mut self, enabled: bool) -> Self {
        self.explain = enabled;
        self
    }

    pub fn disable_pattern_completion(mut self, disable: bool) -> Self {
        self.disable_pattern_completion = disable;
        self
    }

    pub fn disable_salience_bias(mut self, disable: bool) -> Self {
        self.disable_salience_bias = disable;
        self
    }

    pub fn disable_systems_consolidation(mut self, disable: bool) -> Self {
        self.disable_systems_consolidation = disable;
        self
    }
}

/// One ranked memory returned by recall.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecallResult {
    pub memory_id: String,
    pub content: String,

    /// Composite ranking score
    #[serde(default)]
    pub score: f64,

    #[serde(default)]
    pub intersection_count: u32,

    #[serde(default)]
    pub recency_score: f64,

    #[serde(default)]
    pub reinforcement_score: f64,

    #[serde(default)]
    pub salience_score: f64,

    #[serde(default)]
    pub match_integrity: f64,

    #[serde(default, alias = "cues")]
    pub structural_cues: Vec<String>,

    #[serde(default)]
    pub metadata: Metadata,

    /// Present only when the request asked for `explain`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explain: Option<Opaque>,
}

/// Response of `POST /recall`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecallResponse {
    #[serde(default)]
    pub results: Vec<RecallResult>,

    /// Extra top-level fields returned when `explain` is on
    #[serde(flatten)]
    pub extra: Metadata,
}

impl RecallResponse {
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Highest-ranked result, in engine order.
    pub fn top(&self) -> Option<&RecallResult> {
        self.results.first()
    }
}

/// Options for `POST /recall/grounded`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroundedRecallRequest {
    pub query_text: String,
    pub token_budget: u32,
    pub limit: u32,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub projects: Option<Vec<String>>,

    pub disable_pattern_completion: bool,
    pub disable_salience_bias: bool,
    pub disable_systems_consolidation: bool,
}

impl GroundedRecallRequest {
    pub fn new(query_text: impl Into<String>) -> Self {
        Self {
            query_text: query_text.into(),
            token_budget: DEFAULT_TOKEN_BUDGET,
            limit: DEFAULT_LIMIT,
            projects: None,
            disable_pattern_completion: false,
            disable_salience_bias: false,
            disable_systems_consolidation: false,
        }
    }

    pub fn token_budget(mut self, budget: u32) -> Self {
        self.token_budget = budget;
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }

    pub fn projects(mut self, projects: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.projects = Some(projects.into_iter().map(Into::into).collect());
        self
    }

    pub fn disable_pattern_completion(mut self, disable: bool) -> Self {
        self.disable_pattern_completion = disable;
        self
    }

    pub fn disable_salience_bias(mut self, disable: bool) -> Self {
        self.disable_salience_bias = disable;
        self
    }

    pub fn disable_systems_consolidation(mut self, disable: bool) -> Self {
        self.disable_systems_consolidation = disable;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn cue_recall_omits_query_text() {
        let body = serde_json::to_value(RecallRequest::by_cues(["meeting", "john"]).limit(10)).unwrap();
        let obj = body.as_object().unwrap();

        assert_eq!(body["cues"], json!(["meeting", "john"]));
        assert_eq!(body["limit"], 10);
        assert!(!obj.contains_key("query_text"));
        assert!(!obj.contains_key("projects"));
        assert!(!obj.contains_key("min_intersection"));
    }

    #[test]
    fn disable_flags_default_to_false() {
        let body = serde_json::to_value(RecallRequest::by_query("who did I meet?")).unwrap();
        assert_eq!(body["query_text"], "who did I meet?");
        assert_eq!(body["auto_reinforce"], false);
        assert_eq!(body["explain"], false);
        assert_eq!(body["disable_pattern_completion"], false);
        assert_eq!(body["disable_salience_bias"], false);
        assert_eq!(body["disable_systems_consolidation"], false);
    }

    #[test]
    fn strict_and_cross_project_options_are_forwarded() {
        let body = serde_json::to_value(
            RecallRequest::by_cues(["payment"])
                .min_intersection(2)
                .projects(["billing", "ops"])
                .disable_salience_bias(true),
        )
        .unwrap();
        assert_eq!(body["min_intersection"], 2);
        assert_eq!(body["projects"], json!(["billing", "ops"]));
        assert_eq!(body["disable_salience_bias"], true);
    }

    #[test]
    fn recall_response_keeps_explain_payload() {
        let response: RecallResponse = serde_json::from_value(json!({
            "results": [{
                "memory_id": "m1",
                "content": "Meeting with John",
                "score": 0.92,
                "intersection_count": 2,
                "explain": {"matched": ["meeting", "john"]}
            }],
            "explain": {"query_cues": ["meeting", "john"]}
        }))
        .unwrap();

        let top = response.top().unwrap();
        assert_eq!(top.memory_id, "m1");
        assert_eq!(top.intersection_count, 2);
        assert!(top.explain.is_some());
        assert!(response.extra.contains_key("explain"));
    }

    #[test]
    fn grounded_request_defaults() {
        let body = serde_json::to_value(GroundedRecallRequest::new("Why is payment failing?")).unwrap();
        assert_eq!(body["query_text"], "Why is payment failing?");
        assert_eq!(body["token_budget"], 500);
        assert_eq!(body["limit"], 10);
        assert!(!body.as_object().unwrap().contains_key("projects"));
    }
}
