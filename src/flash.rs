use axum::response::Redirect;
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};

const FLASH_COOKIE: &str = "flash";

/// Queue a one-time notice and redirect. The cookie is cleared by the
/// next page render.
pub fn redirect_with_notice(jar: CookieJar, to: &str, notice: &str) -> (CookieJar, Redirect) {
    let mut cookie = Cookie::new(FLASH_COOKIE, notice.to_string());
    cookie.set_path("/");
    cookie.set_http_only(true);
    cookie.set_same_site(SameSite::Lax);
    (jar.add(cookie), Redirect::to(to))
}

/// Take the pending notice, if any, clearing it from the jar.
pub fn take_notice(jar: CookieJar) -> (CookieJar, Option<String>) {
    match jar.get(FLASH_COOKIE) {
        Some(cookie) => {
            let notice = cookie.value().to_string();
            let mut removal = Cookie::from(FLASH_COOKIE);
            removal.set_path("/");
            (jar.remove(removal), Some(notice))
        }
        None => (jar, None),
    }
}
