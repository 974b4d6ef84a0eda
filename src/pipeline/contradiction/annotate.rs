/// Words per manuscript page used for page estimates.
pub const WORDS_PER_PAGE: usize = 300;

/// A single manuscript line with its 1-based number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotatedLine {
    pub number: u32,
    pub text: String,
}

/// Line-numbered view of a manuscript, used for attribution.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AnnotatedManuscript {
    pub lines: Vec<AnnotatedLine>,
    /// `"<n>: <text>"` per line, joined by `\n`.
    pub rendered: String,
    /// Words preceding each line, indexed like `lines`.
    words_before: Vec<usize>,
}

impl AnnotatedManuscript {
    pub fn line_count(&self) -> u32 {
        self.lines.len() as u32
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn line(&self, number: u32) -> Option<&AnnotatedLine> {
        if number == 0 {
            return None;
        }
        self.lines.get(number as usize - 1)
    }

    /// Estimated page of a line: one page per `WORDS_PER_PAGE` words
    /// preceding it.
    pub fn page_of_line(&self, number: u32) -> Option<u32> {
        let words_before = *self.words_before.get(number.checked_sub(1)? as usize)?;
        Some((words_before / WORDS_PER_PAGE) as u32 + 1)
    }
}

/// Number every line of the manuscript, starting at 1.
///
/// Splits on `\n` only and keeps each line verbatim, blank lines included,
/// so numbering always matches the writer's own. An empty manuscript yields
/// an empty annotation.
pub fn annotate(text: &str) -> AnnotatedManuscript {
    if text.is_empty() {
        return AnnotatedManuscript::default();
    }

    let lines: Vec<AnnotatedLine> = text
        .split('\n')
        .enumerate()
        .map(|(i, line)| AnnotatedLine {
            number: i as u32 + 1,
            text: line.to_string(),
        })
        .collect();

    let rendered = lines
        .iter()
        .map(|l| format!("{}: {}", l.number, l.text))
        .collect::<Vec<_>>()
        .join("\n");

    let words_before = lines
        .iter()
        .scan(0usize, |total, line| {
            let before = *total;
            *total += line.text.split_whitespace().count();
            Some(before)
        })
        .collect();

    AnnotatedManuscript {
        lines,
        rendered,
        words_before,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbers_lines_from_one() {
        let annotated = annotate("Her eyes were blue.\nHer eyes, a deep brown, narrowed.");
        assert_eq!(annotated.line_count(), 2);
        assert_eq!(
            annotated.rendered,
            "1: Her eyes were blue.\n2: Her eyes, a deep brown, narrowed."
        );
    }

    #[test]
    fn blank_lines_consume_numbers() {
        let annotated = annotate("First.\n\nThird.");
        assert_eq!(annotated.line_count(), 3);
        assert_eq!(annotated.line(2).unwrap().text, "");
        assert_eq!(annotated.rendered, "1: First.\n2: \n3: Third.");
    }

    #[test]
    fn line_count_is_breaks_plus_one() {
        let text = "a\nb\n\nc\n";
        let annotated = annotate(text);
        let breaks = text.matches('\n').count() as u32;
        assert_eq!(annotated.line_count(), breaks + 1);
    }

    #[test]
    fn annotation_is_deterministic() {
        let text = "  Indented line\twith tab.\r\nSecond line.";
        assert_eq!(annotate(text), annotate(text));
    }

    #[test]
    fn content_is_kept_verbatim() {
        let annotated = annotate("  spaced  \r\nnext");
        assert_eq!(annotated.line(1).unwrap().text, "  spaced  \r");
    }

    #[test]
    fn empty_manuscript_yields_empty_annotation() {
        let annotated = annotate("");
        assert!(annotated.is_empty());
        assert_eq!(annotated.rendered, "");
    }

    #[test]
    fn line_zero_and_out_of_range_are_none() {
        let annotated = annotate("one\ntwo");
        assert!(annotated.line(0).is_none());
        assert!(annotated.line(3).is_none());
        assert!(annotated.page_of_line(3).is_none());
    }

    #[test]
    fn page_estimate_follows_word_count() {
        let long_line = vec!["word"; WORDS_PER_PAGE].join(" ");
        let text = format!("{long_line}\nshort line\n{long_line}\nlast");
        let annotated = annotate(&text);
        assert_eq!(annotated.page_of_line(1), Some(1));
        assert_eq!(annotated.page_of_line(2), Some(2));
        assert_eq!(annotated.page_of_line(4), Some(3));
    }

    #[test]
    fn page_estimate_on_large_manuscript() {
        let text = vec!["one two three"; 10_000].join("\n");
        let annotated = annotate(&text);
        assert_eq!(annotated.page_of_line(1), Some(1));
        assert_eq!(annotated.page_of_line(100), Some(1));
        assert_eq!(annotated.page_of_line(101), Some(2));
        assert_eq!(annotated.page_of_line(10_000), Some(100));
        assert_eq!(annotated.page_of_line(0), None);
    }
}
