use actix_governor::{Governor, GovernorConfigBuilder};
use actix_web::{guard, web};
use std::sync::Arc;

use crate::application::auth::{AuthenticateUseCase, SignOutUseCase};
use crate::application::invoice::{
  CreateInvoiceUseCase, DeleteInvoiceUseCase, GetInvoiceFormUseCase, ListInvoicesUseCase,
  UpdateInvoiceUseCase,
};
use crate::domain::auth::AuthService;
use crate::domain::invoice::PageCache;

use super::handlers::web_auth::SessionCookieSettings;
use super::handlers::{invoices_web, pages, web_auth};
use super::middleware::WebAuthMiddleware;
use super::templates::TemplateEngine;

/// Throttle for `POST /login`, applied per client IP
#[derive(Debug, Clone, Copy)]
pub struct LoginRateLimit {
  /// Seconds to replenish one request
  pub per_second: u64,
  pub burst_size: u32,
}

/// Everything the web UI routes hand to their handlers
#[derive(Clone)]
pub struct WebRouteDependencies {
  pub templates: TemplateEngine,
  pub auth_service: Arc<AuthService>,
  pub authenticate_use_case: Arc<AuthenticateUseCase>,
  pub sign_out_use_case: Arc<SignOutUseCase>,
  pub list_invoices_use_case: Arc<ListInvoicesUseCase>,
  pub invoice_form_use_case: Arc<GetInvoiceFormUseCase>,
  pub create_invoice_use_case: Arc<CreateInvoiceUseCase>,
  pub update_invoice_use_case: Arc<UpdateInvoiceUseCase>,
  pub delete_invoice_use_case: Arc<DeleteInvoiceUseCase>,
  pub page_cache: Arc<dyn PageCache>,
  pub cookie_settings: SessionCookieSettings,
  pub login_rate_limit: LoginRateLimit,
}

/// Configure web UI routes
///
/// # Routes
///
/// - GET / - Redirect to the dashboard
/// - GET /login - Login page
/// - POST /login - Authenticate (rate limited per client IP)
/// - POST /logout - End the session
/// - GET /dashboard - Redirect to the invoice listing
/// - GET /dashboard/invoices - Latest invoices
/// - GET, POST /dashboard/invoices/create - Create invoice form and action
/// - GET, POST /dashboard/invoices/{id}/edit - Edit invoice form and action
/// - POST /dashboard/invoices/{id}/delete - Delete invoice action
///
/// Everything under `/dashboard` requires a session.
pub fn configure_web_routes(cfg: &mut web::ServiceConfig, deps: WebRouteDependencies) {
  let governor = GovernorConfigBuilder::default()
    .per_second(deps.login_rate_limit.per_second.max(1))
    .burst_size(deps.login_rate_limit.burst_size.max(1))
    .finish()
    .unwrap_or_default();

  cfg
    .app_data(web::Data::new(deps.templates))
    .app_data(web::Data::new(deps.cookie_settings))
    .app_data(web::Data::new(deps.authenticate_use_case))
    .app_data(web::Data::new(deps.sign_out_use_case))
    .app_data(web::Data::new(deps.list_invoices_use_case))
    .app_data(web::Data::new(deps.invoice_form_use_case))
    .app_data(web::Data::new(deps.create_invoice_use_case))
    .app_data(web::Data::new(deps.update_invoice_use_case))
    .app_data(web::Data::new(deps.delete_invoice_use_case))
    .app_data(web::Data::new(deps.page_cache));

  // Public routes (no authentication required)
  cfg
    .route("/", web::get().to(pages::root_redirect))
    .service(
      web::resource("/login")
        .guard(guard::Get())
        .to(pages::login_page),
    )
    .service(
      web::resource("/login")
        .guard(guard::Post())
        .wrap(Governor::new(&governor))
        .to(web_auth::login_submit),
    )
    .route("/logout", web::post().to(web_auth::logout));

  // Protected routes (require authentication)
  cfg.service(
    web::scope("/dashboard")
      .wrap(WebAuthMiddleware::new(deps.auth_service))
      .route("", web::get().to(pages::dashboard_redirect))
      .route("/invoices", web::get().to(invoices_web::invoices_page))
      .route(
        "/invoices/create",
        web::get().to(invoices_web::invoice_create_page),
      )
      .route(
        "/invoices/create",
        web::post().to(invoices_web::invoice_create_submit),
      )
      .route(
        "/invoices/{id}/edit",
        web::get().to(invoices_web::invoice_edit_page),
      )
      .route(
        "/invoices/{id}/edit",
        web::post().to(invoices_web::invoice_edit_submit),
      )
      .route(
        "/invoices/{id}/delete",
        web::post().to(invoices_web::invoice_delete),
      ),
  );
}
