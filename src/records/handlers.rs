use axum::{
    extract::State,
    response::{IntoResponse, Response},
    routing::get,
    Form, Router,
};
use axum_extra::extract::cookie::CookieJar;
use tracing::instrument;

use crate::auth::extractors::CurrentUser;
use crate::error::AppError;
use crate::flash;
use crate::records::dto::{AppointmentForm, ContactForm};
use crate::records::services;
use crate::state::AppState;
use crate::templates;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/contact", get(contact_page).post(submit_contact))
        .route("/appointment", get(appointment_page).post(submit_appointment))
}

#[instrument(skip_all)]
async fn contact_page(user: Option<CurrentUser>, jar: CookieJar) -> Result<Response, AppError> {
    templates::render_page("contact.html", user.as_ref().map(|u| &u.0), jar)
}

#[instrument(skip_all)]
async fn submit_contact(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<ContactForm>,
) -> Result<Response, AppError> {
    match services::submit_contact(&state.db, &form.name, &form.email, &form.message).await {
        Ok(_) => Ok(flash::redirect_with_notice(
            jar,
            "/contact",
            "thanks for your message, we will be in touch",
        )
        .into_response()),
        Err(e) if e.is_recoverable() => {
            Ok(flash::redirect_with_notice(jar, "/contact", &e.to_string()).into_response())
        }
        Err(e) => Err(e),
    }
}

#[instrument(skip_all)]
async fn appointment_page(
    user: Option<CurrentUser>,
    jar: CookieJar,
) -> Result<Response, AppError> {
    templates::render_page("appointment.html", user.as_ref().map(|u| &u.0), jar)
}

#[instrument(skip_all)]
async fn submit_appointment(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<AppointmentForm>,
) -> Result<Response, AppError> {
    match services::submit_appointment(&state.db, &form.name, &form.date, &form.issue).await {
        Ok(_) => Ok(flash::redirect_with_notice(
            jar,
            "/appointment",
            "appointment request received",
        )
        .into_response()),
        Err(e) if e.is_recoverable() => {
            Ok(flash::redirect_with_notice(jar, "/appointment", &e.to_string()).into_response())
        }
        Err(e) => Err(e),
    }
}
