use serde::{Deserialize, Serialize};

use super::CheckError;

/// Sentinel literal used in `quote` to mark an error record.
pub const ERROR_SENTINEL: &str = "ERROR";

/// Placeholder explanation for records the model left unexplained.
pub const MISSING_EXPLANATION: &str = "Missing explanation";

/// Contradiction category. `Error` is the sentinel for a failed check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FindingType {
    Character,
    Setting,
    Timeline,
    Error,
}

impl FindingType {
    /// Map a model-supplied label onto an ordinary category.
    /// Matching is trimmed and case-insensitive; anything else is `None`.
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_lowercase().as_str() {
            "character" => Some(Self::Character),
            "setting" => Some(Self::Setting),
            "timeline" => Some(Self::Timeline),
            _ => None,
        }
    }

    pub fn is_error(self) -> bool {
        matches!(self, Self::Error)
    }
}

/// One reported contradiction, or the error sentinel record.
///
/// This is the only wire artifact of the service and its field names are
/// stable: `id`, `type`, `line`, `page`, `quote`, `explanation`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    pub id: u32,
    #[serde(rename = "type")]
    pub finding_type: FindingType,
    pub line: u32,
    pub page: u32,
    pub quote: String,
    pub explanation: String,
}

impl Finding {
    /// The canonical error record: `type=Error`, `line=0`, `page=0`,
    /// `quote="ERROR"`.
    pub fn error(explanation: impl Into<String>) -> Self {
        Self {
            id: 1,
            finding_type: FindingType::Error,
            line: 0,
            page: 0,
            quote: ERROR_SENTINEL.to_string(),
            explanation: explanation.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.finding_type.is_error()
    }
}

/// Three-way result the boundary layer reacts to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// No contradictions found.
    Empty,
    /// The check failed; carries the single error Finding.
    Error(Finding),
    /// One or more ordinary Findings, in response order.
    Findings(Vec<Finding>),
}

impl Outcome {
    pub fn is_empty(&self) -> bool {
        matches!(self, Outcome::Empty)
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Outcome::Error(_))
    }

    /// Short label for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Outcome::Empty => "empty",
            Outcome::Error(_) => "error",
            Outcome::Findings(_) => "findings",
        }
    }

    /// The Finding list as sent over the wire.
    pub fn findings(&self) -> Vec<Finding> {
        match self {
            Outcome::Empty => vec![],
            Outcome::Error(finding) => vec![finding.clone()],
            Outcome::Findings(findings) => findings.clone(),
        }
    }
}

/// Inference capability abstraction (allows mocking).
///
/// Implementations perform exactly one attempt and return the model's raw
/// reply text unchanged, or a `CheckError` describing why there is none.
pub trait LlmClient: Send + Sync {
    fn generate(&self, prompt: &str, system: &str) -> Result<String, CheckError>;

    /// Model identifier, for logs and the health endpoint.
    fn model(&self) -> &str;
}

impl<T: LlmClient + ?Sized> LlmClient for std::sync::Arc<T> {
    fn generate(&self, prompt: &str, system: &str) -> Result<String, CheckError> {
        (**self).generate(prompt, system)
    }

    fn model(&self) -> &str {
        (**self).model()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finding_serializes_with_type_key() {
        let finding = Finding {
            id: 1,
            finding_type: FindingType::Character,
            line: 2,
            page: 1,
            quote: "Her eyes, a deep brown, narrowed.".into(),
            explanation: "Line 1 says her eyes were blue.".into(),
        };
        let json = serde_json::to_value(&finding).unwrap();
        assert_eq!(json["type"], "Character");
        assert_eq!(json["line"], 2);
        assert!(json.get("finding_type").is_none());
    }

    #[test]
    fn error_finding_uses_sentinels() {
        let finding = Finding::error("Request timed out");
        assert_eq!(finding.finding_type, FindingType::Error);
        assert_eq!(finding.line, 0);
        assert_eq!(finding.page, 0);
        assert_eq!(finding.quote, ERROR_SENTINEL);
        assert!(finding.is_error());
    }

    #[test]
    fn labels_match_case_insensitively() {
        assert_eq!(FindingType::from_label(" setting "), Some(FindingType::Setting));
        assert_eq!(FindingType::from_label("TIMELINE"), Some(FindingType::Timeline));
        assert_eq!(FindingType::from_label("ERROR"), None);
        assert_eq!(FindingType::from_label("Plot"), None);
    }

    #[test]
    fn outcome_findings_round_trip_wire_list() {
        let err = Finding::error("boom");
        assert!(Outcome::Empty.findings().is_empty());
        assert_eq!(Outcome::Error(err.clone()).findings(), vec![err]);
        assert_eq!(Outcome::Empty.kind(), "empty");
    }
}
