use axum::response::{Html, IntoResponse, Response};
use axum_extra::extract::cookie::CookieJar;
use include_dir::{include_dir, Dir};
use lazy_static::lazy_static;
use tera::{Context, Tera};

use crate::auth::repo_types::User;
use crate::error::AppError;
use crate::flash;

static TEMPLATE_DIR: Dir<'_> = include_dir!("$CARGO_MANIFEST_DIR/templates");

lazy_static! {
    static ref TEMPLATES: Tera = load_templates().expect("embedded templates must parse");
}

fn load_templates() -> Result<Tera, tera::Error> {
    let mut templates = Vec::new();
    for file in TEMPLATE_DIR.files() {
        if let Some(name) = file.path().file_name() {
            templates.push((
                name.to_string_lossy().to_string(),
                String::from_utf8_lossy(file.contents()).to_string(),
            ));
        }
    }
    let mut tera = Tera::default();
    tera.add_raw_templates(templates)?;
    Ok(tera)
}

/// Base context for a page render; the logged-in user, when present,
/// drives the nav in `base.html`.
pub fn page_context(user: Option<&User>) -> Context {
    let mut context = Context::new();
    if let Some(user) = user {
        context.insert("user", user);
    }
    context
}

/// Render a template with the given context, threading the one-time
/// flash notice into the layout.
pub fn render(
    name: &str,
    mut context: Context,
    notice: Option<String>,
) -> Result<Html<String>, AppError> {
    if let Some(notice) = notice {
        context.insert("flash", &notice);
    }
    Ok(Html(TEMPLATES.render(name, &context)?))
}

/// Shortcut for plain pages: consume the flash cookie and render.
pub fn render_page(
    name: &str,
    user: Option<&User>,
    jar: CookieJar,
) -> Result<Response, AppError> {
    let (jar, notice) = flash::take_notice(jar);
    let page = render(name, page_context(user), notice)?;
    Ok((jar, page).into_response())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_pages_render_without_a_user() {
        for name in [
            "index.html",
            "contact.html",
            "appointment.html",
            "register.html",
            "login.html",
        ] {
            let html = render(name, page_context(None), None).expect(name);
            assert!(html.0.contains("<nav>"), "{name} misses the nav");
        }
    }

    #[test]
    fn flash_notice_is_rendered() {
        let html = render(
            "index.html",
            page_context(None),
            Some("account created".into()),
        )
        .expect("index renders");
        assert!(html.0.contains("account created"));
    }

    #[test]
    fn admin_page_lists_records() {
        let mut context = page_context(None);
        context.insert("contacts", &Vec::<crate::records::repo::Contact>::new());
        context.insert(
            "appointments",
            &Vec::<crate::records::repo::Appointment>::new(),
        );
        context.insert("users", &Vec::<User>::new());
        let html = render("admin.html", context, None).expect("admin renders");
        assert!(html.0.contains("Admin panel"));
    }
}
