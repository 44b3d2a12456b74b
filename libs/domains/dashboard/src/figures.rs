//! Plotly figure specs, serialized as `{data, layout}` for `Plotly.newPlot`.

use serde::Serialize;
use std::collections::BTreeMap;

use crate::aggregates::{HistogramBin, QuestionMix};
use crate::queries::{DefaultQuestion, SectionSample};

#[derive(Debug, Clone, Serialize)]
pub struct Figure {
    pub data: Vec<Trace>,
    pub layout: Layout,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Trace {
    Pie(PieTrace),
    Bar(BarTrace),
    Scatter3d(Scatter3dTrace),
}

#[derive(Debug, Clone, Serialize)]
pub struct PieTrace {
    pub labels: Vec<String>,
    pub values: Vec<i64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BarTrace {
    pub x: Vec<String>,
    pub y: Vec<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Scatter3dTrace {
    pub name: String,
    pub mode: &'static str,
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub z: Vec<f64>,
    pub text: Vec<String>,
    pub marker: Marker,
}

#[derive(Debug, Clone, Serialize)]
pub struct Marker {
    pub size: u32,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct Layout {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<Title>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub legend: Option<Legend>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bargap: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Title {
    pub text: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Legend {
    pub title: Title,
}

impl Layout {
    fn titled(text: &str) -> Self {
        Self {
            title: Some(Title { text: text.into() }),
            ..Default::default()
        }
    }
}

pub const SCATTER_MARKER_SIZE: u32 = 5;

/// Share of each default question
pub fn default_questions_pie(defaults: &[DefaultQuestion]) -> Figure {
    Figure {
        data: vec![Trace::Pie(PieTrace {
            labels: defaults.iter().map(|d| d.question.clone()).collect(),
            values: defaults.iter().map(|d| d.cnt).collect(),
        })],
        layout: Layout::default(),
    }
}

/// Running total of questions per time bin
pub fn cumulative_questions_chart(bins: &[HistogramBin]) -> Figure {
    Figure {
        data: vec![Trace::Bar(BarTrace {
            x: bins.iter().map(|b| b.start.to_rfc3339()).collect(),
            y: bins.iter().map(|b| b.cumulative).collect(),
            name: Some("cumulative".into()),
        })],
        layout: Layout {
            bargap: Some(0.0),
            ..Default::default()
        },
    }
}

pub fn question_mix_pie(mix: QuestionMix) -> Figure {
    Figure {
        data: vec![Trace::Pie(PieTrace {
            labels: vec!["canned".into(), "custom".into()],
            values: vec![mix.canned, mix.custom],
        })],
        layout: Layout::default(),
    }
}

/// One 3-D scatter trace per source page so each page gets its own colour.
/// `points[i]` is the projection of `samples[i]`.
pub fn embedding_scatter(samples: &[SectionSample], points: &[[f64; 3]]) -> Figure {
    let mut by_page: BTreeMap<&str, Vec<usize>> = BTreeMap::new();
    for (i, sample) in samples.iter().enumerate().take(points.len()) {
        by_page.entry(sample.page_url.as_str()).or_default().push(i);
    }

    let data = by_page
        .into_iter()
        .map(|(page_url, indices)| {
            Trace::Scatter3d(Scatter3dTrace {
                name: page_url.to_string(),
                mode: "markers",
                x: indices.iter().map(|&i| points[i][0]).collect(),
                y: indices.iter().map(|&i| points[i][1]).collect(),
                z: indices.iter().map(|&i| points[i][2]).collect(),
                text: indices
                    .iter()
                    .map(|&i| samples[i].page_title.clone().unwrap_or_default())
                    .collect(),
                marker: Marker {
                    size: SCATTER_MARKER_SIZE,
                },
            })
        })
        .collect();

    Figure {
        data,
        layout: Layout {
            legend: Some(Legend {
                title: Title {
                    text: "page_url".into(),
                },
            }),
            height: Some(800),
            ..Layout::titled("Section embeddings (t-SNE)")
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample(url: &str) -> SectionSample {
        SectionSample {
            page_url: url.into(),
            page_title: Some(format!("title of {}", url)),
            tokens: Some(10),
            embedding: vec![0.0; 4],
        }
    }

    #[test]
    fn test_pie_serializes_as_plotly_trace() {
        let figure = question_mix_pie(QuestionMix {
            canned: 3,
            custom: 7,
        });
        let value = serde_json::to_value(&figure).unwrap();

        assert_eq!(
            value["data"][0],
            json!({"type": "pie", "labels": ["canned", "custom"], "values": [3, 7]})
        );
        assert_eq!(value["layout"], json!({}));
    }

    #[test]
    fn test_scatter_groups_by_page() {
        let samples = vec![sample("b"), sample("a"), sample("b")];
        let points = vec![[1.0, 2.0, 3.0], [4.0, 5.0, 6.0], [7.0, 8.0, 9.0]];

        let value = serde_json::to_value(embedding_scatter(&samples, &points)).unwrap();
        let traces = value["data"].as_array().unwrap();

        assert_eq!(traces.len(), 2);
        assert_eq!(traces[0]["type"], "scatter3d");
        assert_eq!(traces[0]["name"], "a");
        assert_eq!(traces[1]["x"], json!([1.0, 7.0]));
        assert_eq!(traces[1]["marker"]["size"], 5);
        assert_eq!(traces[1]["text"][0], "title of b");
    }

    #[test]
    fn test_histogram_uses_cumulative_counts() {
        use chrono::{TimeZone, Utc};
        let t = Utc.with_ymd_and_hms(2023, 5, 2, 0, 0, 0).unwrap();
        let bins = vec![
            HistogramBin {
                start: t,
                end: t,
                count: 2,
                cumulative: 2,
            },
            HistogramBin {
                start: t,
                end: t,
                count: 3,
                cumulative: 5,
            },
        ];

        let value = serde_json::to_value(cumulative_questions_chart(&bins)).unwrap();
        assert_eq!(value["data"][0]["y"], json!([2, 5]));
        assert_eq!(value["layout"]["bargap"], 0.0);
    }
}
