use async_trait::async_trait;
use sea_orm::{DatabaseConnection, DbBackend, FromQueryResult, Statement};
use tracing::info;

use crate::error::QuestionResult;
use crate::models::QuestionRecord;
use crate::repository::QuestionRepository;

const EXPORT_SQL: &str = r#"
    SELECT id, created_at, question, prompt, prompt_length, answer
    FROM questions
    ORDER BY id
"#;

/// PostgreSQL implementation of QuestionRepository using SeaORM
#[derive(Clone)]
pub struct PgQuestionRepository {
    db: DatabaseConnection,
}

impl PgQuestionRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl QuestionRepository for PgQuestionRepository {
    async fn export_all(&self) -> QuestionResult<Vec<QuestionRecord>> {
        let stmt = Statement::from_string(DbBackend::Postgres, EXPORT_SQL);
        let records = QuestionRecord::find_by_statement(stmt).all(&self.db).await?;

        info!(count = records.len(), "Exported question records");
        Ok(records)
    }
}
