use actix_web::{
  HttpRequest, HttpResponse,
  cookie::{Cookie, SameSite, time::Duration as CookieDuration},
  http::StatusCode,
  web,
};
use chrono::Utc;
use std::sync::Arc;
use validator::Validate;

use super::{extract_ip_address, extract_user_agent, html};
use crate::adapters::http::{
  dtos::LoginFormData, errors::ApiError, middleware::SESSION_COOKIE, templates::TemplateEngine,
};
use crate::application::action_result::INVALID_CREDENTIALS;
use crate::application::auth::{
  AuthenticateCommand, AuthenticateOutcome, AuthenticateUseCase, SignOutUseCase,
};

/// Attributes of the session cookie that depend on deployment
#[derive(Debug, Clone, Copy, Default)]
pub struct SessionCookieSettings {
  pub secure: bool,
}

fn render_login_form(
  templates: &TemplateEngine,
  form: &LoginFormData,
  error_message: &str,
) -> Result<HttpResponse, ApiError> {
  let mut context = tera::Context::new();
  context.insert("email", &form.email);
  context.insert("error_message", error_message);
  if let Some(redirect_to) = &form.redirect_to {
    context.insert("redirect_to", redirect_to);
  }

  let body = templates.render("partials/login_form.html.tera", &context)?;

  Ok(html(StatusCode::BAD_REQUEST, body))
}

/// Handle login form submission
pub async fn login_submit(
  form: web::Form<LoginFormData>,
  use_case: web::Data<Arc<AuthenticateUseCase>>,
  templates: web::Data<TemplateEngine>,
  cookie_settings: web::Data<SessionCookieSettings>,
  req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
  let form = form.into_inner();

  if let Err(e) = form.validate() {
    tracing::debug!("Rejected login form: {}", e);
    return render_login_form(&templates, &form, INVALID_CREDENTIALS);
  }

  let command = AuthenticateCommand {
    email: form.email.clone(),
    password: form.password.clone(),
    redirect_to: form.redirect_to.clone(),
    ip_address: extract_ip_address(&req),
    user_agent: extract_user_agent(&req),
  };

  match use_case.execute(command).await? {
    AuthenticateOutcome::SignedIn {
      token,
      expires_at,
      redirect_to,
    } => {
      let max_age = (expires_at - Utc::now()).num_seconds().max(0);

      let cookie = Cookie::build(SESSION_COOKIE, token.into_inner())
        .path("/")
        .http_only(true)
        .secure(cookie_settings.secure)
        .same_site(SameSite::Lax)
        .max_age(CookieDuration::seconds(max_age))
        .finish();

      Ok(
        HttpResponse::Ok()
          .cookie(cookie)
          .insert_header(("HX-Redirect", redirect_to))
          .finish(),
      )
    }
    AuthenticateOutcome::Failed(message) => render_login_form(&templates, &form, &message),
  }
}

/// Handle logout
pub async fn logout(
  use_case: web::Data<Arc<SignOutUseCase>>,
  req: HttpRequest,
) -> HttpResponse {
  if let Some(cookie) = req.cookie(SESSION_COOKIE) {
    if let Err(e) = use_case.execute(cookie.value()).await {
      tracing::warn!("Failed to end session on logout: {}", e);
    }
  }

  let mut cookie = Cookie::build(SESSION_COOKIE, "")
    .path("/")
    .http_only(true)
    .same_site(SameSite::Lax)
    .finish();
  cookie.make_removal();

  HttpResponse::Found()
    .cookie(cookie)
    .insert_header(("Location", "/login"))
    .finish()
}
