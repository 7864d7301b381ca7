use axum::{
    extract::State,
    response::{IntoResponse, Response},
    routing::get,
    Form, Router,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use tracing::instrument;

use crate::auth::dto::{LoginForm, RegisterForm};
use crate::auth::extractors::{CurrentUser, SESSION_COOKIE};
use crate::auth::services;
use crate::error::AppError;
use crate::flash;
use crate::state::AppState;
use crate::templates;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/register", get(register_page).post(register))
        .route("/login", get(login_page).post(login))
        .route("/logout", get(logout))
}

#[instrument(skip_all)]
async fn register_page(user: Option<CurrentUser>, jar: CookieJar) -> Result<Response, AppError> {
    templates::render_page("register.html", user.as_ref().map(|u| &u.0), jar)
}

#[instrument(skip_all, fields(username = %form.username))]
async fn register(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<RegisterForm>,
) -> Result<Response, AppError> {
    match services::register(&state.db, &form.username, &form.password).await {
        Ok(_) => Ok(flash::redirect_with_notice(jar, "/login", "account created, please log in")
            .into_response()),
        Err(e) if e.is_recoverable() => {
            Ok(flash::redirect_with_notice(jar, "/register", &e.to_string()).into_response())
        }
        Err(e) => Err(e),
    }
}

#[instrument(skip_all)]
async fn login_page(user: Option<CurrentUser>, jar: CookieJar) -> Result<Response, AppError> {
    templates::render_page("login.html", user.as_ref().map(|u| &u.0), jar)
}

#[instrument(skip_all, fields(username = %form.username))]
async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<LoginForm>,
) -> Result<Response, AppError> {
    match services::login(&state.db, &state.sessions, &form.username, &form.password).await {
        Ok(token) => {
            let mut cookie = Cookie::new(SESSION_COOKIE, token);
            cookie.set_path("/");
            cookie.set_http_only(true);
            cookie.set_same_site(SameSite::Lax);
            let jar = jar.add(cookie);
            Ok(flash::redirect_with_notice(jar, "/", "welcome back").into_response())
        }
        Err(e) if e.is_recoverable() => {
            Ok(flash::redirect_with_notice(jar, "/login", &e.to_string()).into_response())
        }
        Err(e) => Err(e),
    }
}

#[instrument(skip_all)]
async fn logout(State(state): State<AppState>, _user: CurrentUser, jar: CookieJar) -> Response {
    if let Some(cookie) = jar.get(SESSION_COOKIE) {
        services::logout(&state.sessions, cookie.value());
    }
    let mut removal = Cookie::from(SESSION_COOKIE);
    removal.set_path("/");
    let jar = jar.remove(removal);
    flash::redirect_with_notice(jar, "/", "logged out").into_response()
}
