//! Read-only analytical SQL.

use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::{ConnectionTrait, DbBackend, FromQueryResult, Statement};
use serde::Serialize;
use tracing::{debug, instrument};

use crate::error::{DashboardError, DashboardResult};

/// A question asked more than the threshold number of times
#[derive(Debug, Clone, PartialEq, Serialize, FromQueryResult)]
pub struct DefaultQuestion {
    pub question: String,
    pub cnt: i64,
}

/// A sampled section with its parsed embedding
#[derive(Debug, Clone, PartialEq)]
pub struct SectionSample {
    pub page_url: String,
    pub page_title: Option<String>,
    pub tokens: Option<i64>,
    pub embedding: Vec<f32>,
}

#[derive(Debug, FromQueryResult)]
struct TimestampRow {
    created_at: DateTime<Utc>,
}

#[derive(Debug, FromQueryResult)]
struct CountRow {
    total: i64,
}

#[derive(Debug, FromQueryResult)]
struct SectionRow {
    page_url: String,
    page_title: Option<String>,
    tokens: Option<i64>,
    embedding: String,
}

#[instrument(skip(db))]
pub async fn fetch_default_questions<C: ConnectionTrait>(
    db: &C,
    cutoff: NaiveDate,
    threshold: i64,
) -> DashboardResult<Vec<DefaultQuestion>> {
    let sql = r#"
        SELECT question, t.cnt
        FROM (
            SELECT DISTINCT question,
                   COUNT(*) OVER (PARTITION BY question) AS cnt
            FROM questions
            WHERE created_at >= $1::date AND question IS NOT NULL
        ) AS t
        WHERE t.cnt > $2
        ORDER BY t.cnt DESC, question
    "#;

    let stmt = Statement::from_sql_and_values(
        DbBackend::Postgres,
        sql,
        [cutoff.into(), threshold.into()],
    );
    let rows = DefaultQuestion::find_by_statement(stmt).all(db).await?;

    debug!(count = rows.len(), "Fetched default questions");
    Ok(rows)
}

#[instrument(skip(db))]
pub async fn fetch_question_timestamps<C: ConnectionTrait>(
    db: &C,
    cutoff: NaiveDate,
) -> DashboardResult<Vec<DateTime<Utc>>> {
    let sql = r#"
        SELECT created_at
        FROM questions
        WHERE created_at >= $1::date
        ORDER BY created_at
    "#;

    let stmt = Statement::from_sql_and_values(DbBackend::Postgres, sql, [cutoff.into()]);
    let rows = TimestampRow::find_by_statement(stmt).all(db).await?;

    debug!(count = rows.len(), "Fetched question timestamps");
    Ok(rows.into_iter().map(|r| r.created_at).collect())
}

#[instrument(skip(db))]
pub async fn count_questions<C: ConnectionTrait>(db: &C, cutoff: NaiveDate) -> DashboardResult<i64> {
    let sql = "SELECT COUNT(*) AS total FROM questions WHERE created_at >= $1::date";

    let stmt = Statement::from_sql_and_values(DbBackend::Postgres, sql, [cutoff.into()]);
    let row = CountRow::find_by_statement(stmt).one(db).await?;

    Ok(row.map(|r| r.total).unwrap_or(0))
}

/// Block-level random sample of `sections`. `percent` must already be
/// validated to lie in (0, 100].
#[instrument(skip(db))]
pub async fn fetch_section_sample<C: ConnectionTrait>(
    db: &C,
    percent: f64,
) -> DashboardResult<Vec<SectionSample>> {
    let sql = format!(
        r#"
        SELECT page_url, page_title, tokens::bigint AS tokens, embedding::text AS embedding
        FROM sections TABLESAMPLE SYSTEM ({})
        WHERE embedding IS NOT NULL
        "#,
        percent
    );

    let stmt = Statement::from_string(DbBackend::Postgres, sql);
    let rows = SectionRow::find_by_statement(stmt).all(db).await?;

    let samples = rows
        .into_iter()
        .map(|row| {
            Ok(SectionSample {
                embedding: parse_vector(&row.embedding)?,
                page_url: row.page_url,
                page_title: row.page_title,
                tokens: row.tokens,
            })
        })
        .collect::<DashboardResult<Vec<_>>>()?;

    debug!(count = samples.len(), "Fetched section sample");
    Ok(samples)
}

/// Parse pgvector's text form, e.g. `[0.1,-2,3e-4]`.
pub fn parse_vector(text: &str) -> DashboardResult<Vec<f32>> {
    let inner = text
        .trim()
        .strip_prefix('[')
        .and_then(|s| s.strip_suffix(']'))
        .ok_or_else(|| DashboardError::InvalidEmbedding(format!("not a vector literal: {}", text)))?;

    if inner.trim().is_empty() {
        return Ok(vec![]);
    }

    inner
        .split(',')
        .map(|v| {
            v.trim()
                .parse::<f32>()
                .map_err(|e| DashboardError::InvalidEmbedding(format!("{:?}: {}", v, e)))
        })
        .collect()
}
