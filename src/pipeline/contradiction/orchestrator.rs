use uuid::Uuid;

use super::annotate::annotate;
use super::attribution::reconcile_attribution;
use super::classify::classify_outcome;
use super::decoder::decode_response;
use super::prompt::{build_check_prompt, CONTRADICTION_SYSTEM_PROMPT};
use super::sanitize::sanitize_records;
use super::types::{LlmClient, Outcome};

/// Runs the full contradiction pipeline for one manuscript:
/// annotate → prompt → LLM → decode → sanitize → attribute → classify
pub struct ContradictionChecker {
    llm: Box<dyn LlmClient>,
}

impl ContradictionChecker {
    pub fn new(llm: Box<dyn LlmClient>) -> Self {
        Self { llm }
    }

    pub fn model(&self) -> &str {
        self.llm.model()
    }

    /// Check one manuscript. Always returns one of the three outcomes;
    /// invocation and decode failures surface as `Outcome::Error`.
    pub fn check(&self, manuscript: &str) -> Outcome {
        let check_id = Uuid::new_v4();
        let _span = tracing::info_span!("check_manuscript", %check_id, model = %self.llm.model())
            .entered();

        // Nothing to contradict
        if manuscript.trim().is_empty() {
            tracing::info!("Blank manuscript, skipping inference");
            return Outcome::Empty;
        }

        let annotated = annotate(manuscript);
        let prompt = build_check_prompt(&annotated);
        tracing::info!(
            line_count = annotated.line_count(),
            prompt_len = prompt.len(),
            "Requesting contradiction check"
        );

        let reply = self.llm.generate(&prompt, CONTRADICTION_SYSTEM_PROMPT);
        if let Ok(text) = &reply {
            tracing::trace!(reply = %text, "Raw inference reply");
        }

        let records = decode_response(reply);
        let mut findings = sanitize_records(&records);
        reconcile_attribution(&mut findings, &annotated);

        let outcome = classify_outcome(findings);
        tracing::info!(
            record_count = records.len(),
            finding_count = outcome.findings().len(),
            outcome = outcome.kind(),
            "Contradiction check complete"
        );
        outcome
    }
}
