use chrono::{DateTime, Utc};
use sea_orm::FromQueryResult;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

pub const DEFAULT_PAGE_SIZE: usize = 50;
pub const MAX_PAGE_SIZE: usize = 500;

/// One logged question/answer exchange. Read-only; every column except
/// `id` is nullable in the `questions` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromQueryResult, ToSchema)]
pub struct QuestionRecord {
    pub id: i64,
    pub created_at: Option<DateTime<Utc>>,
    pub question: Option<String>,
    pub prompt: Option<String>,
    pub prompt_length: Option<i32>,
    pub answer: Option<String>,
}

/// Paging window for explorer views
#[derive(Debug, Clone, Copy, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PageParams {
    pub offset: Option<usize>,
    /// Clamped to 1..=500, default 50
    pub limit: Option<usize>,
}

impl PageParams {
    pub fn offset(&self) -> usize {
        self.offset.unwrap_or(0)
    }

    pub fn limit(&self) -> usize {
        self.limit
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, MAX_PAGE_SIZE)
    }
}

/// A window of rows from a registered snapshot
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DataPage {
    pub data_id: Uuid,
    pub offset: usize,
    pub limit: usize,
    pub total: usize,
    pub rows: Vec<QuestionRecord>,
}
