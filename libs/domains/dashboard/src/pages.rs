use axum_helpers::{HtmlTemplates, script_json};
use chrono::{DateTime, Utc};
use sea_orm::ConnectionTrait;
use serde::Serialize;
use tracing::info;

use crate::aggregates::{cumulative_histogram, question_mix};
use crate::config::DashboardConfig;
use crate::error::{DashboardError, DashboardResult};
use crate::figures::{
    Figure, cumulative_questions_chart, default_questions_pie, embedding_scatter,
    question_mix_pie,
};
use crate::queries::{
    DefaultQuestion, SectionSample, count_questions, fetch_default_questions,
    fetch_question_timestamps, fetch_section_sample,
};
use crate::tsne::TsneProjector;

const PAGE_TEMPLATE: &str = "dashboard_page";

const PAGE_HTML: &str = r#"<!doctype html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <title>{{title}}</title>
  <script src="https://cdn.plot.ly/plotly-2.35.2.min.js" charset="utf-8"></script>
  <style>
    body { font-family: sans-serif; margin: 1.5rem; }
    .row { display: flex; flex-wrap: wrap; gap: 1rem; }
    .col { flex: 1 1 32rem; min-width: 24rem; }
  </style>
</head>
<body>
  <nav><a href="/dashboard/">Overview</a> · <a href="/dashboard/embeddings">Embeddings</a> · <a href="/logout/">Log out</a></nav>
  <h1>{{title}}</h1>
  <p>Built {{built_at}}</p>
  <div class="row">
    {{#each charts}}
    <div class="col">
      <h2>{{heading}}</h2>
      <div id="{{id}}"></div>
      <script>
        (function () {
          var figure = {{{figure_json}}};
          Plotly.newPlot("{{id}}", figure.data, figure.layout, {responsive: true});
        })();
      </script>
    </div>
    {{/each}}
  </div>
</body>
</html>
"#;

#[derive(Debug, Serialize)]
struct ChartView {
    id: &'static str,
    heading: &'static str,
    figure_json: String,
}

#[derive(Debug, Serialize)]
struct PageView<'a> {
    title: &'a str,
    built_at: String,
    charts: Vec<ChartView>,
}

/// Query results the pages are built from
#[derive(Debug, Clone, Default)]
pub struct DashboardData {
    pub default_questions: Vec<DefaultQuestion>,
    pub total_questions: i64,
    pub question_timestamps: Vec<DateTime<Utc>>,
    pub sections: Vec<SectionSample>,
}

impl DashboardData {
    pub async fn load<C: ConnectionTrait>(db: &C, config: &DashboardConfig) -> DashboardResult<Self> {
        let data = Self {
            default_questions: fetch_default_questions(
                db,
                config.cutoff_date,
                config.default_question_threshold,
            )
            .await?,
            total_questions: count_questions(db, config.cutoff_date).await?,
            question_timestamps: fetch_question_timestamps(db, config.cutoff_date).await?,
            sections: fetch_section_sample(db, config.section_sample_percent).await?,
        };

        info!(
            default_questions = data.default_questions.len(),
            total_questions = data.total_questions,
            sections = data.sections.len(),
            "Loaded dashboard data"
        );
        Ok(data)
    }
}

/// Rendered dashboard pages. Built once at process start and served as-is.
#[derive(Debug, Clone)]
pub struct Dashboard {
    overview: String,
    embeddings: String,
    built_at: DateTime<Utc>,
}

impl Dashboard {
    /// Run the queries, project the section sample and render both pages.
    pub async fn build<C: ConnectionTrait>(db: &C, config: &DashboardConfig) -> DashboardResult<Self> {
        let data = DashboardData::load(db, config).await?;
        let config = config.clone();
        tokio::task::spawn_blocking(move || Self::render(&data, &config)).await?
    }

    /// Pure rendering step; CPU-bound because of the projection.
    pub fn render(data: &DashboardData, config: &DashboardConfig) -> DashboardResult<Self> {
        let templates = HtmlTemplates::new([(PAGE_TEMPLATE, PAGE_HTML)])
            .map_err(|e| DashboardError::Render(e.to_string()))?;
        let built_at = Utc::now();

        let mix = question_mix(&data.default_questions, data.total_questions);
        let bins = cumulative_histogram(&data.question_timestamps, config.histogram_bins);

        let overview = render_page(
            &templates,
            "Concierge dashboard",
            built_at,
            vec![
                chart(
                    "graph_def_questions",
                    "Distribution default questions",
                    &default_questions_pie(&data.default_questions),
                )?,
                chart(
                    "graph_question_cumulated_by_date",
                    "# of asked questions over time",
                    &cumulative_questions_chart(&bins),
                )?,
                chart(
                    "graph_question_mix",
                    "Default vs custom questions",
                    &question_mix_pie(mix),
                )?,
            ],
        )?;

        let vectors: Vec<Vec<f32>> = data.sections.iter().map(|s| s.embedding.clone()).collect();
        let points = TsneProjector::new(config.tsne_iterations, config.tsne_perplexity)
            .project(&vectors)?;

        let embeddings = render_page(
            &templates,
            "Embedding space",
            built_at,
            vec![chart(
                "tsne",
                "Sampled sections, coloured by page",
                &embedding_scatter(&data.sections, &points),
            )?],
        )?;

        info!(canned = mix.canned, custom = mix.custom, bins = bins.len(), "Rendered dashboard pages");

        Ok(Self {
            overview,
            embeddings,
            built_at,
        })
    }

    pub fn overview_html(&self) -> &str {
        &self.overview
    }

    pub fn embeddings_html(&self) -> &str {
        &self.embeddings
    }

    pub fn built_at(&self) -> DateTime<Utc> {
        self.built_at
    }
}

fn chart(id: &'static str, heading: &'static str, figure: &Figure) -> DashboardResult<ChartView> {
    Ok(ChartView {
        id,
        heading,
        figure_json: script_json(figure)?,
    })
}

fn render_page(
    templates: &HtmlTemplates,
    title: &str,
    built_at: DateTime<Utc>,
    charts: Vec<ChartView>,
) -> DashboardResult<String> {
    let view = PageView {
        title,
        built_at: built_at.format("%Y-%m-%d %H:%M UTC").to_string(),
        charts,
    };
    templates
        .render_string(PAGE_TEMPLATE, &view)
        .map_err(|e| DashboardError::Render(e.to_string()))
}
