use axum::{
    extract::{Path, State},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use axum_extra::extract::cookie::CookieJar;
use tracing::instrument;

use crate::auth::extractors::AdminUser;
use crate::auth::repo_types::User;
use crate::error::AppError;
use crate::flash;
use crate::records::services;
use crate::state::AppState;
use crate::templates;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/admin", get(panel))
        .route("/admin/delete_contact/:id", get(delete_contact))
        .route("/admin/delete_appointment/:id", get(delete_appointment))
}

#[instrument(skip_all)]
async fn panel(
    State(state): State<AppState>,
    AdminUser(user): AdminUser,
    jar: CookieJar,
) -> Result<Response, AppError> {
    let contacts = services::list_contacts(&state.db).await?;
    let appointments = services::list_appointments(&state.db).await?;
    let users = User::list(&state.db).await?;

    let (jar, notice) = flash::take_notice(jar);
    let mut context = templates::page_context(Some(&user));
    context.insert("contacts", &contacts);
    context.insert("appointments", &appointments);
    context.insert("users", &users);
    let page = templates::render("admin.html", context, notice)?;
    Ok((jar, page).into_response())
}

#[instrument(skip_all)]
async fn delete_contact(
    State(state): State<AppState>,
    _admin: AdminUser,
    jar: CookieJar,
    Path(id): Path<i64>,
) -> Result<Response, AppError> {
    match services::delete_contact(&state.db, id).await {
        Ok(()) => Ok(flash::redirect_with_notice(jar, "/admin", "contact deleted").into_response()),
        Err(e) if e.is_recoverable() => {
            Ok(flash::redirect_with_notice(jar, "/admin", &e.to_string()).into_response())
        }
        Err(e) => Err(e),
    }
}

#[instrument(skip_all)]
async fn delete_appointment(
    State(state): State<AppState>,
    _admin: AdminUser,
    jar: CookieJar,
    Path(id): Path<i64>,
) -> Result<Response, AppError> {
    match services::delete_appointment(&state.db, id).await {
        Ok(()) => {
            Ok(flash::redirect_with_notice(jar, "/admin", "appointment deleted").into_response())
        }
        Err(e) if e.is_recoverable() => {
            Ok(flash::redirect_with_notice(jar, "/admin", &e.to_string()).into_response())
        }
        Err(e) => Err(e),
    }
}
