use actix_web::{HttpRequest, HttpResponse, http::StatusCode, web};

use super::{get_user, html};
use crate::adapters::http::{dtos::LoginPageQuery, errors::ApiError, templates::TemplateEngine};
use crate::application::auth::DEFAULT_REDIRECT;
use crate::domain::invoice::INVOICES_PATH;

fn redirect(location: &str) -> HttpResponse {
  HttpResponse::Found()
    .insert_header(("Location", location))
    .finish()
}

/// GET / - Send visitors to the dashboard
pub async fn root_redirect() -> HttpResponse {
  redirect(DEFAULT_REDIRECT)
}

/// GET /dashboard - Invoices are the only dashboard page
pub async fn dashboard_redirect() -> HttpResponse {
  redirect(INVOICES_PATH)
}

/// Render login page
pub async fn login_page(
  query: web::Query<LoginPageQuery>,
  templates: web::Data<TemplateEngine>,
) -> Result<HttpResponse, ApiError> {
  let mut context = tera::Context::new();
  context.insert("title", "Login");
  context.insert(
    "redirect_to",
    query.redirect_to.as_deref().unwrap_or(DEFAULT_REDIRECT),
  );

  let body = templates.render("pages/login.html.tera", &context)?;

  Ok(html(StatusCode::OK, body))
}

/// 404 page shown inside the dashboard chrome
pub fn not_found_page(req: &HttpRequest, templates: &TemplateEngine) -> Result<HttpResponse, ApiError> {
  let mut context = tera::Context::new();
  if let Ok(user) = get_user(req) {
    context.insert("user", &user);
  }

  let body = templates.render("pages/not_found.html.tera", &context)?;

  Ok(html(StatusCode::NOT_FOUND, body))
}
