use axum::{
    async_trait,
    extract::FromRequestParts,
    http::request::Parts,
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::CookieJar;

use crate::auth::repo_types::User;
use crate::auth::services;
use crate::error::AppError;
use crate::flash;
use crate::state::AppState;

pub const SESSION_COOKIE: &str = "session";

fn guard_redirect(to: &'static str, notice: &'static str) -> Response {
    flash::redirect_with_notice(CookieJar::new(), to, notice).into_response()
}

fn session_token(parts: &Parts) -> Option<String> {
    CookieJar::from_headers(&parts.headers)
        .get(SESSION_COOKIE)
        .map(|c| c.value().to_string())
}

/// Guard for routes that need a logged-in user; rejects to the login
/// page with a notice.
pub struct CurrentUser(pub User);

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = Response;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = session_token(parts);
        let user_id = services::require_authenticated(&state.sessions, token.as_deref())
            .map_err(|_| guard_redirect("/login", "please log in first"))?;

        match User::find_by_id(&state.db, user_id).await {
            Ok(Some(user)) => Ok(CurrentUser(user)),
            Ok(None) => Err(guard_redirect("/login", "please log in first")),
            Err(e) => Err(AppError::from(e).into_response()),
        }
    }
}

/// Guard for admin-only routes; non-admins are sent home with a notice.
pub struct AdminUser(pub User);

#[async_trait]
impl FromRequestParts<AppState> for AdminUser {
    type Rejection = Response;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = session_token(parts);
        match services::require_admin(&state.db, &state.sessions, token.as_deref()).await {
            Ok(user) => Ok(AdminUser(user)),
            Err(AppError::NotAuthenticated) => {
                Err(guard_redirect("/login", "please log in first"))
            }
            Err(AppError::NotAuthorized) => Err(guard_redirect("/", "admin access required")),
            Err(e) => Err(e.into_response()),
        }
    }
}
