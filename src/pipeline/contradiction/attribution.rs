use super::annotate::AnnotatedManuscript;
use super::types::Finding;

/// Check ordinary Findings against the manuscript they claim to cite.
///
/// A `line` past the end of the manuscript cannot be attributed and is reset
/// to 0 together with its page. A missing page on a valid line is estimated
/// from the word count. Error records are left alone.
pub fn reconcile_attribution(findings: &mut [Finding], manuscript: &AnnotatedManuscript) {
    let mut unattributed = 0usize;

    for finding in findings.iter_mut().filter(|f| !f.is_error()) {
        if finding.line > manuscript.line_count() {
            unattributed += 1;
            finding.line = 0;
            finding.page = 0;
            continue;
        }

        if finding.page == 0 {
            if let Some(page) = manuscript.page_of_line(finding.line) {
                finding.page = page;
            }
        }
    }

    if unattributed > 0 {
        tracing::warn!(
            unattributed,
            line_count = manuscript.line_count(),
            "Findings cited lines beyond the end of the manuscript"
        );
    }
}
