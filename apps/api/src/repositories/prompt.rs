//! Prompt repository

use sqlx::PgPool;
use uuid::Uuid;

use super::utils::PROMPT_COLUMNS;
use crate::models::{NewPrompt, Prompt};

/// Repository for prompt database operations
#[derive(Clone)]
pub struct PromptRepository {
    pool: PgPool,
}

impl PromptRepository {
    /// Create a new PromptRepository instance
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a prompt and return the stored row
    pub async fn create(&self, input: &NewPrompt) -> Result<Prompt, sqlx::Error> {
        let sql = format!(
            r#"
            INSERT INTO prompts (user_id, mood, additional_notes)
            VALUES ($1, $2, $3)
            RETURNING {}
            "#,
            PROMPT_COLUMNS
        );
        sqlx::query_as::<_, Prompt>(&sql)
            .bind(input.user_id)
            .bind(&input.mood)
            .bind(&input.additional_notes)
            .fetch_one(&self.pool)
            .await
    }

    /// Find a prompt by its unique ID
    pub async fn find_by_id(&self, prompt_id: Uuid) -> Result<Option<Prompt>, sqlx::Error> {
        let sql = format!("SELECT {} FROM prompts WHERE id = $1", PROMPT_COLUMNS);
        sqlx::query_as::<_, Prompt>(&sql)
            .bind(prompt_id)
            .fetch_optional(&self.pool)
            .await
    }

    /// All prompts of a user, newest first
    pub async fn find_by_user(&self, user_id: Uuid) -> Result<Vec<Prompt>, sqlx::Error> {
        let sql = format!(
            "SELECT {} FROM prompts WHERE user_id = $1 ORDER BY created_at DESC",
            PROMPT_COLUMNS
        );
        sqlx::query_as::<_, Prompt>(&sql)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await
    }
}
