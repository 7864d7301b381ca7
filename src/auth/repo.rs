use sqlx::SqlitePool;
use time::OffsetDateTime;

use crate::auth::repo_types::User;

impl User {
    /// Find a user by username.
    pub async fn find_by_username(
        db: &SqlitePool,
        username: &str,
    ) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, password_hash, is_admin, created_at
            FROM users
            WHERE username = ?
            "#,
        )
        .bind(username)
        .fetch_optional(db)
        .await
    }

    pub async fn find_by_id(db: &SqlitePool, id: i64) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, password_hash, is_admin, created_at
            FROM users
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(db)
        .await
    }

    pub async fn count(db: &SqlitePool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users")
            .fetch_one(db)
            .await
    }

    /// Create a new user with a hashed credential.
    pub async fn create(
        db: &SqlitePool,
        username: &str,
        password_hash: &str,
        is_admin: bool,
    ) -> Result<User, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (username, password_hash, is_admin, created_at)
            VALUES (?, ?, ?, ?)
            RETURNING id, username, password_hash, is_admin, created_at
            "#,
        )
        .bind(username)
        .bind(password_hash)
        .bind(is_admin)
        .bind(OffsetDateTime::now_utc())
        .fetch_one(db)
        .await
    }

    /// All users, oldest first, for the admin panel.
    pub async fn list(db: &SqlitePool) -> Result<Vec<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, password_hash, is_admin, created_at
            FROM users
            ORDER BY id
            "#,
        )
        .fetch_all(db)
        .await
    }
}
