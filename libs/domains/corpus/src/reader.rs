use std::io::BufRead;
use tracing::debug;

use crate::error::{CorpusError, CorpusResult};
use crate::models::{PageDocument, SectionRecord};

/// Parse a pages JSONL stream into sections, preserving source order.
///
/// Blank lines are skipped. The first line that is not a valid page document
/// aborts the read with its 1-based line number.
pub fn read_corpus<R: BufRead>(reader: R) -> CorpusResult<Vec<SectionRecord>> {
    let mut sections = Vec::new();
    let mut pages = 0usize;

    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let page: PageDocument = serde_json::from_str(&line).map_err(|source| {
            CorpusError::Parse {
                line: index + 1,
                source,
            }
        })?;
        pages += 1;
        sections.extend(page.into_sections());
    }

    debug!(pages, sections = sections.len(), "Read corpus");
    Ok(sections)
}

/// Newlines become spaces, then surrounding whitespace is trimmed.
pub fn normalize_passage(content: &str) -> String {
    content.replace('\n', " ").trim().to_string()
}

/// One passage per section, index-aligned with `sections`.
pub fn passages(sections: &[SectionRecord]) -> Vec<String> {
    sections
        .iter()
        .map(|section| normalize_passage(&section.content))
        .collect()
}
