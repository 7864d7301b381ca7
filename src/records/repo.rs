use serde::Serialize;
use sqlx::{FromRow, SqlitePool};
use time::OffsetDateTime;

/// A message left through the public contact form. Submissions are
/// anonymous; there is no link to the users table.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Contact {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub message: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// An appointment request left through the public form.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Appointment {
    pub id: i64,
    pub name: String,
    pub date: String,
    pub issue: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

pub async fn insert_contact(
    db: &SqlitePool,
    name: &str,
    email: &str,
    message: &str,
) -> Result<i64, sqlx::Error> {
    let row = sqlx::query_as::<_, Contact>(
        r#"
        INSERT INTO contacts (name, email, message, created_at)
        VALUES (?, ?, ?, ?)
        RETURNING id, name, email, message, created_at
        "#,
    )
    .bind(name)
    .bind(email)
    .bind(message)
    .bind(OffsetDateTime::now_utc())
    .fetch_one(db)
    .await?;
    Ok(row.id)
}

/// Most recent first.
pub async fn list_contacts(db: &SqlitePool) -> Result<Vec<Contact>, sqlx::Error> {
    sqlx::query_as::<_, Contact>(
        r#"
        SELECT id, name, email, message, created_at
        FROM contacts
        ORDER BY id DESC
        "#,
    )
    .fetch_all(db)
    .await
}

/// Returns the number of rows removed (0 or 1).
pub async fn delete_contact(db: &SqlitePool, id: i64) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM contacts WHERE id = ?")
        .bind(id)
        .execute(db)
        .await?;
    Ok(result.rows_affected())
}

pub async fn insert_appointment(
    db: &SqlitePool,
    name: &str,
    date: &str,
    issue: &str,
) -> Result<i64, sqlx::Error> {
    let row = sqlx::query_as::<_, Appointment>(
        r#"
        INSERT INTO appointments (name, date, issue, created_at)
        VALUES (?, ?, ?, ?)
        RETURNING id, name, date, issue, created_at
        "#,
    )
    .bind(name)
    .bind(date)
    .bind(issue)
    .bind(OffsetDateTime::now_utc())
    .fetch_one(db)
    .await?;
    Ok(row.id)
}

pub async fn list_appointments(db: &SqlitePool) -> Result<Vec<Appointment>, sqlx::Error> {
    sqlx::query_as::<_, Appointment>(
        r#"
        SELECT id, name, date, issue, created_at
        FROM appointments
        ORDER BY id DESC
        "#,
    )
    .fetch_all(db)
    .await
}

pub async fn delete_appointment(db: &SqlitePool, id: i64) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM appointments WHERE id = ?")
        .bind(id)
        .execute(db)
        .await?;
    Ok(result.rows_affected())
}
