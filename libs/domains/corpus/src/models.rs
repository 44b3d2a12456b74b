use serde::{Deserialize, Serialize};

/// One line of the pages JSONL corpus.
///
/// Only the fields the batch run reads are modelled; anything else on the
/// line is ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct PageDocument {
    pub url: String,
    pub title: String,
    #[serde(default)]
    pub summaries: Summaries,
    #[serde(default)]
    pub sections: Vec<SectionDocument>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Summaries {
    pub sbert: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SectionDocument {
    pub content: SectionContent,
    #[serde(default)]
    pub tokens: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SectionContent {
    pub raw: String,
}

/// Page metadata carried alongside each section. Not persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageMeta {
    pub url: String,
    pub title: String,
    pub summary: Option<String>,
}

/// A section flattened out of its page, in corpus order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SectionRecord {
    pub page: PageMeta,
    pub content: String,
    pub tokens: u32,
}

impl PageDocument {
    pub fn into_sections(self) -> impl Iterator<Item = SectionRecord> {
        let page = PageMeta {
            url: self.url,
            title: self.title,
            summary: self.summaries.sbert,
        };
        self.sections.into_iter().map(move |section| SectionRecord {
            page: page.clone(),
            content: section.content.raw,
            tokens: section.tokens,
        })
    }
}
