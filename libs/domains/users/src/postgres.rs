use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{
    ConnectionTrait, DatabaseConnection, DbBackend, DbErr, FromQueryResult, SqlErr, Statement,
};
use tracing::info;
use uuid::Uuid;

use crate::error::{UserError, UserResult};
use crate::models::User;
use crate::repository::UserRepository;

const CREATE_USERS_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS users (
        id UUID PRIMARY KEY,
        username TEXT NOT NULL,
        password_hash TEXT NOT NULL,
        created_at TIMESTAMPTZ NOT NULL DEFAULT now()
    )
"#;

const CREATE_USERNAME_INDEX: &str =
    "CREATE UNIQUE INDEX IF NOT EXISTS users_username_lower_idx ON users (lower(username))";

/// PostgreSQL implementation of UserRepository using SeaORM
#[derive(Clone)]
pub struct PgUserRepository {
    db: DatabaseConnection,
}

impl PgUserRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Create the `users` table and its case-insensitive username index.
    pub async fn ensure_schema(&self) -> Result<(), DbErr> {
        self.db.execute_unprepared(CREATE_USERS_TABLE).await?;
        self.db.execute_unprepared(CREATE_USERNAME_INDEX).await?;
        info!("users table ready");
        Ok(())
    }
}

#[derive(Debug, FromQueryResult)]
struct UserRow {
    id: Uuid,
    username: String,
    password_hash: String,
    created_at: DateTime<Utc>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User {
            id: row.id,
            username: row.username,
            password_hash: row.password_hash,
            created_at: row.created_at,
        }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn create(&self, user: User) -> UserResult<User> {
        let sql = r#"
            INSERT INTO users (id, username, password_hash, created_at)
            VALUES ($1, $2, $3, $4)
            RETURNING id, username, password_hash, created_at
        "#;

        let stmt = Statement::from_sql_and_values(
            DbBackend::Postgres,
            sql,
            [
                user.id.into(),
                user.username.clone().into(),
                user.password_hash.clone().into(),
                user.created_at.into(),
            ],
        );

        let row = UserRow::find_by_statement(stmt)
            .one(&self.db)
            .await
            .map_err(|e| match e.sql_err() {
                Some(SqlErr::UniqueConstraintViolation(_)) => {
                    UserError::DuplicateUsername(user.username.clone())
                }
                _ => UserError::Database(e),
            })?
            .ok_or_else(|| UserError::Internal("Failed to create user".to_string()))?;

        info!(user_id = %row.id, username = %row.username, "Created user");
        Ok(row.into())
    }

    async fn get_by_username(&self, username: &str) -> UserResult<Option<User>> {
        let sql = r#"
            SELECT id, username, password_hash, created_at
            FROM users
            WHERE lower(username) = lower($1)
        "#;

        let stmt = Statement::from_sql_and_values(DbBackend::Postgres, sql, [username.into()]);

        let row = UserRow::find_by_statement(stmt).one(&self.db).await?;
        Ok(row.map(Into::into))
    }

    async fn username_exists(&self, username: &str) -> UserResult<bool> {
        Ok(self.get_by_username(username).await?.is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{MockDatabase, MockExecResult, Value};
    use std::collections::BTreeMap;

    fn row(user: &User) -> BTreeMap<&'static str, Value> {
        BTreeMap::from([
            ("id", user.id.into()),
            ("username", user.username.clone().into()),
            ("password_hash", user.password_hash.clone().into()),
            ("created_at", user.created_at.into()),
        ])
    }

    #[tokio::test]
    async fn test_create_returns_inserted_row() {
        let user = User::new("alice".into(), "$argon2id$hash".into());
        let db = MockDatabase::new(DbBackend::Postgres)
            .append_query_results([vec![row(&user)]])
            .into_connection();
        let repo = PgUserRepository::new(db);

        let created = repo.create(user.clone()).await.unwrap();
        assert_eq!(created, user);
    }

    #[tokio::test]
    async fn test_get_by_username_lowercases_in_sql() {
        let user = User::new("Alice".into(), "hash".into());
        let db = MockDatabase::new(DbBackend::Postgres)
            .append_query_results([vec![row(&user)]])
            .into_connection();
        let repo = PgUserRepository::new(db.clone());

        let found = repo.get_by_username("ALICE").await.unwrap();
        assert_eq!(found.map(|u| u.id), Some(user.id));

        let log = db.into_transaction_log();
        let sql = format!("{:?}", log[0]);
        assert!(sql.contains("lower(username) = lower($1)"));
    }

    #[tokio::test]
    async fn test_username_exists_false_when_no_rows() {
        let db = MockDatabase::new(DbBackend::Postgres)
            .append_query_results([Vec::<BTreeMap<&str, Value>>::new()])
            .into_connection();
        let repo = PgUserRepository::new(db);

        assert!(!repo.username_exists("nobody").await.unwrap());
    }

    #[tokio::test]
    async fn test_ensure_schema_runs_both_statements() {
        let done = || MockExecResult {
            last_insert_id: 0,
            rows_affected: 0,
        };
        let db = MockDatabase::new(DbBackend::Postgres)
            .append_exec_results([done(), done()])
            .into_connection();
        let repo = PgUserRepository::new(db.clone());

        repo.ensure_schema().await.unwrap();
        assert_eq!(db.into_transaction_log().len(), 2);
    }
}
