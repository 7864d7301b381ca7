use sqlx::SqlitePool;
use tracing::{info, instrument};

use crate::error::AppError;
use crate::records::repo::{self, Appointment, Contact};

fn required(field: &'static str, value: &str) -> Result<String, AppError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::Validation(format!("{field} is required")));
    }
    Ok(trimmed.to_string())
}

#[instrument(skip(db, message))]
pub async fn submit_contact(
    db: &SqlitePool,
    name: &str,
    email: &str,
    message: &str,
) -> Result<i64, AppError> {
    let name = required("name", name)?;
    let email = required("email", email)?;
    let message = required("message", message)?;

    let id = repo::insert_contact(db, &name, &email, &message).await?;
    info!(contact_id = id, "contact submitted");
    Ok(id)
}

#[instrument(skip(db, issue))]
pub async fn submit_appointment(
    db: &SqlitePool,
    name: &str,
    date: &str,
    issue: &str,
) -> Result<i64, AppError> {
    let name = required("name", name)?;
    let date = required("date", date)?;
    let issue = required("issue", issue)?;

    let id = repo::insert_appointment(db, &name, &date, &issue).await?;
    info!(appointment_id = id, "appointment submitted");
    Ok(id)
}

pub async fn list_contacts(db: &SqlitePool) -> Result<Vec<Contact>, AppError> {
    Ok(repo::list_contacts(db).await?)
}

pub async fn list_appointments(db: &SqlitePool) -> Result<Vec<Appointment>, AppError> {
    Ok(repo::list_appointments(db).await?)
}

#[instrument(skip(db))]
pub async fn delete_contact(db: &SqlitePool, id: i64) -> Result<(), AppError> {
    if repo::delete_contact(db, id).await? == 0 {
        return Err(AppError::NotFound);
    }
    info!(contact_id = id, "contact deleted");
    Ok(())
}

#[instrument(skip(db))]
pub async fn delete_appointment(db: &SqlitePool, id: i64) -> Result<(), AppError> {
    if repo::delete_appointment(db, id).await? == 0 {
        return Err(AppError::NotFound);
    }
    info!(appointment_id = id, "appointment deleted");
    Ok(())
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
    async fn empty_name_fails_validation_and_persists_nothing() {
        let db = test_db().await;
        let err = submit_contact(&db, "   ", "a@b.c", "hello").await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert!(list_contacts(&db).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn submitted_fields_are_trimmed() {
        let db = test_db().await;
        submit_contact(&db, "  Ada  ", " ada@example.com ", " hi ")
            .await
            .expect("submit");
        let contacts = list_contacts(&db).await.unwrap();
        assert_eq!(contacts[0].name, "Ada");
        assert_eq!(contacts[0].email, "ada@example.com");
        assert_eq!(contacts[0].message, "hi");
    }

    #[tokio::test]
    async fn contacts_are_listed_most_recent_first() {
        let db = test_db().await;
        for n in ["one", "two", "three"] {
            submit_contact(&db, n, "a@b.c", "msg").await.expect("submit");
        }
        let ids: Vec<i64> = list_contacts(&db).await.unwrap().iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![3, 2, 1]);
    }

    #[tokio::test]
    async fn appointments_are_listed_most_recent_first() {
        let db = test_db().await;
        for n in ["one", "two"] {
            submit_appointment(&db, n, "2026-09-01", "checkup")
                .await
                .expect("submit");
        }
        let ids: Vec<i64> = list_appointments(&db)
            .await
            .unwrap()
            .iter()
            .map(|a| a.id)
            .collect();
        assert_eq!(ids, vec![2, 1]);
    }

    #[tokio::test]
    async fn delete_missing_contact_is_not_found() {
        let db = test_db().await;
        let err = delete_contact(&db, 999).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound));
        assert!(list_contacts(&db).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn delete_removes_exactly_one_row() {
        let db = test_db().await;
        let first = submit_contact(&db, "one", "a@b.c", "msg").await.unwrap();
        submit_contact(&db, "two", "a@b.c", "msg").await.unwrap();

        delete_contact(&db, first).await.expect("delete");
        let remaining = list_contacts(&db).await.unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].name, "two");

        // a second delete of the same id reports NotFound
        let err = delete_contact(&db, first).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound));
    }

    #[tokio::test]
    async fn empty_appointment_issue_fails_validation() {
        let db = test_db().await;
        let err = submit_appointment(&db, "Ada", "2026-09-01", "")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert!(list_appointments(&db).await.unwrap().is_empty());
    }
}
