use sqlx::SqlitePool;
use tracing::{info, instrument, warn};

use crate::auth::password::{hash_password, verify_password};
use crate::auth::repo_types::User;
use crate::auth::sessions::SessionStore;
use crate::error::AppError;

fn is_unique_violation(e: &sqlx::Error) -> bool {
    e.as_database_error()
        .map(|db| db.is_unique_violation())
        .unwrap_or(false)
}

/// Create an account. The first account in an empty store becomes the
/// admin; everyone after is a regular user.
#[instrument(skip(db, password))]
pub async fn register(db: &SqlitePool, username: &str, password: &str) -> Result<i64, AppError> {
    let username = username.trim();
    if username.is_empty() || password.trim().is_empty() {
        return Err(AppError::Validation(
            "username and password are required".into(),
        ));
    }

    if User::find_by_username(db, username).await?.is_some() {
        warn!(username, "registration with taken username");
        return Err(AppError::DuplicateUsername);
    }

    let hash = hash_password(password)?;
    let is_admin = User::count(db).await? == 0;
    let user = match User::create(db, username, &hash, is_admin).await {
        Ok(user) => user,
        // the UNIQUE constraint catches a concurrent registration the
        // pre-check missed
        Err(e) if is_unique_violation(&e) => return Err(AppError::DuplicateUsername),
        Err(e) => return Err(e.into()),
    };

    info!(user_id = user.id, username, is_admin, "user registered");
    Ok(user.id)
}

/// Verify credentials and issue a session token.
#[instrument(skip(db, sessions, password))]
pub async fn login(
    db: &SqlitePool,
    sessions: &SessionStore,
    username: &str,
    password: &str,
) -> Result<String, AppError> {
    let username = username.trim();
    let Some(user) = User::find_by_username(db, username).await? else {
        warn!(username, "login with unknown username");
        return Err(AppError::InvalidCredentials);
    };

    if !verify_password(password, &user.password_hash)? {
        warn!(user_id = user.id, "login with wrong password");
        return Err(AppError::InvalidCredentials);
    }

    let token = sessions.create(user.id);
    info!(user_id = user.id, "session established");
    Ok(token)
}

/// Drop the session. Idempotent.
pub fn logout(sessions: &SessionStore, token: &str) {
    sessions.destroy(token);
}

/// Resolve the session token to a user id.
pub fn require_authenticated(
    sessions: &SessionStore,
    token: Option<&str>,
) -> Result<i64, AppError> {
    token
        .and_then(|t| sessions.resolve(t))
        .ok_or(AppError::NotAuthenticated)
}

/// Resolve the session and check the admin flag.
pub async fn require_admin(
    db: &SqlitePool,
    sessions: &SessionStore,
    token: Option<&str>,
) -> Result<User, AppError> {
    let user_id = require_authenticated(sessions, token)?;
    let user = User::find_by_id(db, user_id)
        .await?
        .ok_or(AppError::NotAuthenticated)?;
    if !user.is_admin {
        warn!(user_id = user.id, "admin route refused");
        return Err(AppError::NotAuthorized);
    }
    Ok(user)
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn test_db() -> SqlitePool {
        let db = sqlx::sqlite::SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .expect("open in-memory sqlite");
        sqlx::migrate!("./migrations")
            .run(&db)
            .await
            .expect("run migrations");
        db
    }

    #[tokio::test]
    async fn first_user_is_admin_second_is_not() {
        let db = test_db().await;
        let first = register(&db, "alice", "pw").await.expect("first register");
        let second = register(&db, "bob", "pw").await.expect("second register");

        let alice = User::find_by_id(&db, first).await.unwrap().unwrap();
        let bob = User::find_by_id(&db, second).await.unwrap().unwrap();
        assert!(alice.is_admin);
        assert!(!bob.is_admin);
    }

    #[tokio::test]
    async fn duplicate_username_is_rejected_and_count_unchanged() {
        let db = test_db().await;
        register(&db, "alice", "pw").await.expect("first register");
        let err = register(&db, "alice", "other").await.unwrap_err();
        assert!(matches!(err, AppError::DuplicateUsername));
        assert_eq!(User::count(&db).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn empty_fields_fail_validation() {
        let db = test_db().await;
        assert!(matches!(
            register(&db, "  ", "pw").await.unwrap_err(),
            AppError::Validation(_)
        ));
        assert!(matches!(
            register(&db, "alice", "").await.unwrap_err(),
            AppError::Validation(_)
        ));
        assert_eq!(User::count(&db).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn login_succeeds_with_correct_credentials() {
        let db = test_db().await;
        let sessions = SessionStore::new(60);
        let user_id = register(&db, "alice", "pw").await.unwrap();

        let token = login(&db, &sessions, "alice", "pw").await.expect("login");
        assert_eq!(sessions.resolve(&token), Some(user_id));
    }

    #[tokio::test]
    async fn login_rejects_wrong_password_every_time() {
        let db = test_db().await;
        let sessions = SessionStore::new(60);
        register(&db, "alice", "pw").await.unwrap();

        for _ in 0..3 {
            let err = login(&db, &sessions, "alice", "wrong").await.unwrap_err();
            assert!(matches!(err, AppError::InvalidCredentials));
        }

        // failed attempts do not lock the account out
        login(&db, &sessions, "alice", "pw").await.expect("login");
    }

    #[tokio::test]
    async fn login_rejects_unknown_username() {
        let db = test_db().await;
        let sessions = SessionStore::new(60);
        let err = login(&db, &sessions, "ghost", "pw").await.unwrap_err();
        assert!(matches!(err, AppError::InvalidCredentials));
    }

    #[tokio::test]
    async fn require_authenticated_without_session() {
        let sessions = SessionStore::new(60);
        assert!(matches!(
            require_authenticated(&sessions, None).unwrap_err(),
            AppError::NotAuthenticated
        ));
        assert!(matches!(
            require_authenticated(&sessions, Some("stale")).unwrap_err(),
            AppError::NotAuthenticated
        ));
    }

    #[tokio::test]
    async fn require_admin_separates_roles() {
        let db = test_db().await;
        let sessions = SessionStore::new(60);
        register(&db, "alice", "pw").await.unwrap();
        register(&db, "bob", "pw").await.unwrap();

        let admin_token = login(&db, &sessions, "alice", "pw").await.unwrap();
        let user_token = login(&db, &sessions, "bob", "pw").await.unwrap();

        let admin = require_admin(&db, &sessions, Some(&admin_token))
            .await
            .expect("first user is admin");
        assert_eq!(admin.username, "alice");

        let err = require_admin(&db, &sessions, Some(&user_token))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotAuthorized));
    }

    #[tokio::test]
    async fn logout_invalidates_the_session() {
        let db = test_db().await;
        let sessions = SessionStore::new(60);
        register(&db, "alice", "pw").await.unwrap();
        let token = login(&db, &sessions, "alice", "pw").await.unwrap();

        logout(&sessions, &token);
        logout(&sessions, &token); // idempotent
        assert!(matches!(
            require_authenticated(&sessions, Some(&token)).unwrap_err(),
            AppError::NotAuthenticated
        ));
    }
}
