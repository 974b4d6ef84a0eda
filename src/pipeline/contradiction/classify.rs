use super::types::{Finding, Outcome};

/// Reduce a sanitized Finding list to the outcome the boundary reacts to.
pub fn classify_outcome(mut findings: Vec<Finding>) -> Outcome {
    match findings.len() {
        0 => Outcome::Empty,
        1 if findings[0].is_error() => match findings.pop() {
            Some(finding) => Outcome::Error(finding),
            None => Outcome::Empty,
        },
        _ => Outcome::Findings(findings),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::contradiction::types::FindingType;

    fn ordinary(id: u32, finding_type: FindingType, quote: &str) -> Finding {
        Finding {
            id,
            finding_type,
            line: id + 1,
            page: 1,
            quote: quote.into(),
            explanation: "Contradicts line 1.".into(),
        }
    }

    #[test]
    fn empty_list_is_empty() {
        assert_eq!(classify_outcome(vec![]), Outcome::Empty);
    }

    #[test]
    fn single_error_is_error() {
        let error = Finding::error("timed out");
        assert_eq!(classify_outcome(vec![error.clone()]), Outcome::Error(error));
    }

    #[test]
    fn ordinary_findings_keep_order() {
        let findings = vec![
            ordinary(1, FindingType::Character, "brown eyes"),
            ordinary(2, FindingType::Setting, "noon sunlight"),
        ];
        assert_eq!(classify_outcome(findings.clone()), Outcome::Findings(findings));
    }

    #[test]
    fn single_ordinary_is_findings() {
        let findings = vec![ordinary(1, FindingType::Timeline, "next spring")];
        assert!(matches!(classify_outcome(findings), Outcome::Findings(f) if f.len() == 1));
    }
}
