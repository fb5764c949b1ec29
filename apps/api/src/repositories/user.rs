//! User repository
//!
//! Users are keyed by their Spotify account id; saving a user that already
//! exists refreshes its profile fields instead of failing.

use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use super::utils::USER_COLUMNS;
use crate::models::{SaveUserOutcome, UpsertUser, User};

/// Row returned by the upsert, flagged with whether it was inserted
#[derive(FromRow)]
struct UpsertedUser {
    #[sqlx(flatten)]
    user: User,
    inserted: bool,
}

/// Repository for user database operations
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    /// Create a new UserRepository instance
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Get a reference to the underlying connection pool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Find a user by their unique ID
    pub async fn find_by_id(&self, user_id: Uuid) -> Result<Option<User>, sqlx::Error> {
        let sql = format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS);
        sqlx::query_as::<_, User>(&sql)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
    }

    /// Find a user by their Spotify account id
    ///
    /// # Returns
    /// * `Ok(Some(User))` - If the user exists
    /// * `Ok(None)` - If no user has that Spotify id
    /// * `Err(sqlx::Error)` - If a database error occurs
    pub async fn find_by_spotify_id(&self, spotify_id: &str) -> Result<Option<User>, sqlx::Error> {
        let sql = format!("SELECT {} FROM users WHERE spotify_id = $1", USER_COLUMNS);
        sqlx::query_as::<_, User>(&sql)
            .bind(spotify_id)
            .fetch_optional(&self.pool)
            .await
    }

    /// Create a user, or update the profile fields of the existing one
    ///
    /// `xmax = 0` only holds for a freshly inserted tuple, which tells the
    /// caller whether the row was created.
    pub async fn upsert(&self, input: &UpsertUser) -> Result<(User, SaveUserOutcome), sqlx::Error> {
        let sql = format!(
            r#"
            INSERT INTO users (spotify_id, email, display_name, profile_image)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (spotify_id)
            DO UPDATE SET
                email = EXCLUDED.email,
                display_name = EXCLUDED.display_name,
                profile_image = EXCLUDED.profile_image
            RETURNING {}, (xmax = 0) AS inserted
            "#,
            USER_COLUMNS
        );

        let row = sqlx::query_as::<_, UpsertedUser>(&sql)
            .bind(&input.spotify_id)
            .bind(&input.email)
            .bind(&input.display_name)
            .bind(&input.profile_image)
            .fetch_one(&self.pool)
            .await?;

        let outcome = if row.inserted {
            SaveUserOutcome::Created
        } else {
            SaveUserOutcome::Updated
        };
        Ok((row.user, outcome))
    }
}
