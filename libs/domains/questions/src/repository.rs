use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::error::QuestionResult;
use crate::models::QuestionRecord;

/// Read access to the question log
#[async_trait]
pub trait QuestionRepository: Send + Sync {
    /// Every record, ordered by id
    async fn export_all(&self) -> QuestionResult<Vec<QuestionRecord>>;
}

/// In-memory implementation of QuestionRepository (for development/testing)
#[derive(Debug, Default, Clone)]
pub struct InMemoryQuestionRepository {
    records: Arc<RwLock<Vec<QuestionRecord>>>,
}

impl InMemoryQuestionRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_records(records: Vec<QuestionRecord>) -> Self {
        Self {
            records: Arc::new(RwLock::new(records)),
        }
    }
}

#[async_trait]
impl QuestionRepository for InMemoryQuestionRepository {
    async fn export_all(&self) -> QuestionResult<Vec<QuestionRecord>> {
        let mut records = self.records.read().await.clone();
        records.sort_by_key(|r| r.id);
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: i64) -> QuestionRecord {
        QuestionRecord {
            id,
            created_at: None,
            question: Some(format!("question {}", id)),
            prompt: None,
            prompt_length: None,
            answer: None,
        }
    }

    #[tokio::test]
    async fn test_export_is_ordered_by_id() {
        let repo = InMemoryQuestionRepository::with_records(vec![record(3), record(1), record(2)]);
        let ids: Vec<i64> = repo.export_all().await.unwrap().iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }
}
