use axum_helpers::HtmlTemplates;
use handlebars::TemplateError;
use serde::Serialize;

use crate::models::{DataPage, QuestionRecord};

pub const EXPLORER_TEMPLATE: &str = "explorer";

const EXPLORER_HTML: &str = r#"<!doctype html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <title>Questions explorer</title>
  <style>
    table { border-collapse: collapse; font-family: sans-serif; font-size: 13px; }
    th, td { border: 1px solid #ddd; padding: 4px 8px; vertical-align: top; }
    td.text { max-width: 40em; white-space: pre-wrap; }
  </style>
</head>
<body>
  <h1>Questions explorer</h1>
  <p>Rows {{first}}–{{last}} of {{total}} · <a href="{{data_href}}">JSON</a> · <a href="/logout/">Log out</a></p>
  <nav>
    {{#if prev_href}}<a href="{{prev_href}}">&larr; previous</a>{{/if}}
    {{#if next_href}}<a href="{{next_href}}">next &rarr;</a>{{/if}}
  </nav>
  <table>
    <thead>
      <tr><th>id</th><th>created_at</th><th>question</th><th>prompt</th><th>prompt_length</th><th>answer</th></tr>
    </thead>
    <tbody>
      {{#each rows}}
      <tr>
        <td>{{id}}</td>
        <td>{{created_at}}</td>
        <td class="text">{{question}}</td>
        <td class="text">{{prompt}}</td>
        <td>{{prompt_length}}</td>
        <td class="text">{{answer}}</td>
      </tr>
      {{/each}}
    </tbody>
  </table>
</body>
</html>
"#;

#[derive(Debug, Serialize)]
struct RowView {
    id: i64,
    created_at: String,
    question: String,
    prompt: String,
    prompt_length: String,
    answer: String,
}

impl From<&QuestionRecord> for RowView {
    fn from(record: &QuestionRecord) -> Self {
        Self {
            id: record.id,
            created_at: record
                .created_at
                .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
                .unwrap_or_default(),
            question: record.question.clone().unwrap_or_default(),
            prompt: record.prompt.clone().unwrap_or_default(),
            prompt_length: record
                .prompt_length
                .map(|n| n.to_string())
                .unwrap_or_default(),
            answer: record.answer.clone().unwrap_or_default(),
        }
    }
}

/// Template data for one explorer page
#[derive(Debug, Serialize)]
pub struct ExplorerView {
    first: usize,
    last: usize,
    total: usize,
    data_href: String,
    prev_href: Option<String>,
    next_href: Option<String>,
    rows: Vec<RowView>,
}

impl ExplorerView {
    pub fn new(page: &DataPage) -> Self {
        let base = format!("/explore/{}", page.data_id);
        let link = |offset: usize| format!("{}?offset={}&limit={}", base, offset, page.limit);

        let shown = page.rows.len();
        let prev_href = (page.offset > 0).then(|| link(page.offset.saturating_sub(page.limit)));
        let next_href = (page.offset + shown < page.total).then(|| link(page.offset + page.limit));

        Self {
            first: if shown == 0 { 0 } else { page.offset + 1 },
            last: page.offset + shown,
            total: page.total,
            data_href: format!("{}/data?offset={}&limit={}", base, page.offset, page.limit),
            prev_href,
            next_href,
            rows: page.rows.iter().map(RowView::from).collect(),
        }
    }
}

pub fn explorer_templates() -> Result<HtmlTemplates, TemplateError> {
    HtmlTemplates::new([(EXPLORER_TEMPLATE, EXPLORER_HTML)])
}
