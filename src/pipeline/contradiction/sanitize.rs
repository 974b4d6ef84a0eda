// Record sanitization: untrusted decoded records become well-typed Findings.
// Each field is coerced independently to a safe default, then the list is
// forced into one of the three legal response shapes, deduplicated, and
// densely renumbered.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

use super::types::{Finding, FindingType, ERROR_SENTINEL, MISSING_EXPLANATION};

/// "line 3", "lines 3 and 5", "Lines 2, 4-6" ...
static CITED_LINES: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\blines?\s+(\d+(?:\s*(?:,|&|-|–|\band\b|\bor\b)\s*\d+)*)").unwrap()
});

static NUMBER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d+").unwrap());

/// Sanitize decoded records into the final Finding list. Never fails.
pub fn sanitize_records(records: &[Value]) -> Vec<Finding> {
    let coerced: Vec<Finding> = records
        .iter()
        .enumerate()
        .map(|(i, record)| coerce_record(record, i + 1))
        .collect();

    let shaped = enforce_response_shape(coerced);
    let mut findings = deduplicate(shaped);
    renumber(&mut findings);
    findings
}

/// Coerce one record field by field. `position` is 1-based.
pub fn coerce_record(record: &Value, position: usize) -> Finding {
    let id = record
        .get("id")
        .and_then(Value::as_u64)
        .filter(|&id| id > 0)
        .and_then(|id| u32::try_from(id).ok())
        .unwrap_or(position as u32);

    let finding_type = record
        .get("type")
        .and_then(Value::as_str)
        .and_then(FindingType::from_label)
        .unwrap_or(FindingType::Error);

    Finding {
        id,
        finding_type,
        line: non_negative_int(record.get("line")),
        page: non_negative_int(record.get("page")),
        quote: text_or(record.get("quote"), ERROR_SENTINEL),
        explanation: text_or(record.get("explanation"), MISSING_EXPLANATION),
    }
}

fn non_negative_int(value: Option<&Value>) -> u32 {
    value
        .and_then(Value::as_u64)
        .and_then(|n| u32::try_from(n).ok())
        .unwrap_or(0)
}

fn text_or(value: Option<&Value>, fallback: &str) -> String {
    value
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty())
        .unwrap_or(fallback)
        .to_string()
}

/// Force the list into one legal shape: ordinary Findings only, or exactly
/// one error record carrying the sentinels.
fn enforce_response_shape(findings: Vec<Finding>) -> Vec<Finding> {
    let error_count = findings.iter().filter(|f| f.is_error()).count();
    if error_count == 0 {
        return findings;
    }

    if error_count < findings.len() {
        tracing::warn!(
            dropped = error_count,
            kept = findings.len() - error_count,
            "Dropping malformed records mixed with valid findings"
        );
        return findings.into_iter().filter(|f| !f.is_error()).collect();
    }

    if error_count > 1 {
        tracing::warn!(error_count, "Collapsing multiple error records into one");
    }

    findings
        .into_iter()
        .take(1)
        .map(|f| Finding {
            line: 0,
            page: 0,
            quote: ERROR_SENTINEL.to_string(),
            ..f
        })
        .collect()
}

/// Identity of the conflict a Finding reports.
#[derive(Debug)]
struct ConflictKey {
    finding_type: FindingType,
    quote: Option<String>,
    line: u32,
    cited_lines: BTreeSet<u32>,
}

impl ConflictKey {
    fn of(finding: &Finding) -> Self {
        let quote = (finding.quote != ERROR_SENTINEL).then(|| normalize_quote(&finding.quote));
        let cited_lines = if finding.line > 0 {
            cited_earlier_lines(&finding.explanation, finding.line)
        } else {
            BTreeSet::new()
        };

        Self {
            finding_type: finding.finding_type,
            quote,
            line: finding.line,
            cited_lines,
        }
    }

    fn same_conflict(&self, other: &ConflictKey) -> bool {
        if self.finding_type != other.finding_type {
            return false;
        }
        let same_quote = self.quote.is_some() && self.quote == other.quote;
        // A shared baseline alone is not enough: several later statements
        // can each contradict the same earlier line.
        let same_citation = !self.cited_lines.is_empty()
            && self.line == other.line
            && self.cited_lines == other.cited_lines;
        same_quote || same_citation
    }
}

/// Trim, strip wrapping quote marks, collapse whitespace, lowercase.
pub fn normalize_quote(quote: &str) -> String {
    quote
        .trim()
        .trim_matches(|c| matches!(c, '"' | '\'' | '“' | '”' | '‘' | '’'))
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Line numbers cited in an explanation that precede the finding's own line.
pub fn cited_earlier_lines(explanation: &str, line: u32) -> BTreeSet<u32> {
    CITED_LINES
        .captures_iter(explanation)
        .filter_map(|caps| caps.get(1))
        .flat_map(|list| NUMBER.find_iter(list.as_str()))
        .filter_map(|n| n.as_str().parse::<u32>().ok())
        .filter(|&n| n > 0 && n < line)
        .collect()
}

/// Keep one Finding per conflict. The slot stays where the conflict first
/// appeared; the occurrence with the lowest non-zero line fills it.
fn deduplicate(findings: Vec<Finding>) -> Vec<Finding> {
    let mut kept: Vec<(Finding, ConflictKey)> = Vec::with_capacity(findings.len());

    for finding in findings {
        let key = ConflictKey::of(&finding);
        match kept.iter_mut().find(|(_, k)| k.same_conflict(&key)) {
            Some((existing, existing_key)) => {
                let earlier = finding.line > 0 && (existing.line == 0 || finding.line < existing.line);
                tracing::debug!(
                    kept_line = existing.line,
                    duplicate_line = finding.line,
                    replaced = earlier,
                    "Duplicate finding removed"
                );
                // The whole record moves, explanation included.
                if earlier {
                    *existing = finding;
                    *existing_key = key;
                }
            }
            None => kept.push((finding, key)),
        }
    }

    kept.into_iter().map(|(finding, _)| finding).collect()
}

/// Rewrite ids as 1..=n unless they already are.
fn renumber(findings: &mut [Finding]) {
    let dense = findings
        .iter()
        .enumerate()
        .all(|(i, f)| f.id as usize == i + 1);
    if dense {
        return;
    }

    tracing::debug!(count = findings.len(), "Renumbering finding ids");
    for (i, finding) in findings.iter_mut().enumerate() {
        finding.id = i as u32 + 1;
    }
}
