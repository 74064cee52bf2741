use actix_files as fs;
use actix_web::{App, HttpServer, middleware::Logger, web};
use anyhow::Context;
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use invoice_dashboard::{
  adapters::http::{
    LoginRateLimit, RequestIdMiddleware, SessionCookieSettings, TemplateEngine,
    WebRouteDependencies, configure_web_routes,
  },
  application::auth::{AuthenticateUseCase, SignOutUseCase},
  application::invoice::{
    CreateInvoiceUseCase, DeleteInvoiceUseCase, GetInvoiceFormUseCase, ListInvoicesUseCase,
    UpdateInvoiceUseCase,
  },
  domain::auth::{AuthService, AuthServiceConfig},
  domain::invoice::{InvoiceService, PageCache},
  infrastructure::{
    cache::RedisPageCache,
    config::Config,
    persistence::postgres::{
      PostgresCustomerRepository, PostgresInvoiceRepository, PostgresLoginAttemptRepository,
      PostgresSessionRepository, PostgresUserRepository,
    },
    security::Argon2PasswordHasher,
  },
};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
  // Initialize environment variables from .env file
  dotenvy::dotenv().ok();

  // Initialize tracing subscriber for logging
  tracing_subscriber::registry()
    .with(
      tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "invoice_dashboard=debug,actix_web=info".into()),
    )
    .with(tracing_subscriber::fmt::layer())
    .init();

  tracing::info!("Starting invoice dashboard");

  let config = Config::load().context("Failed to load configuration")?;
  tracing::info!("Configuration loaded successfully");

  // Set up database connection pool with timeout
  tracing::info!("Connecting to database");

  let db_pool = tokio::time::timeout(
    Duration::from_secs(config.database.connect_timeout_seconds),
    PgPoolOptions::new()
      .max_connections(config.database.max_connections)
      .acquire_timeout(Duration::from_secs(config.database.acquire_timeout_seconds))
      .connect(&config.database.url),
  )
  .await
  .with_context(|| {
    format!(
      "Database connection timed out after {} seconds. Is PostgreSQL running?",
      config.database.connect_timeout_seconds
    )
  })?
  .context("Could not connect to database")?;

  tracing::info!("Database connection pool created");

  tracing::info!("Running database migrations");
  sqlx::migrate!("./migrations")
    .run(&db_pool)
    .await
    .context("Failed to run database migrations")?;
  tracing::info!("Database migrations completed");

  // Set up Redis connection with timeout
  tracing::info!("Connecting to Redis: {}", config.redis.url);

  let redis_client = redis::Client::open(config.redis.url.clone()).context("Invalid Redis URL")?;

  let redis_conn = tokio::time::timeout(
    Duration::from_secs(config.redis.connect_timeout_seconds),
    redis_client.get_connection_manager(),
  )
  .await
  .with_context(|| {
    format!(
      "Redis connection timed out after {} seconds. Is Redis running?",
      config.redis.connect_timeout_seconds
    )
  })?
  .with_context(|| format!("Could not connect to Redis at {}", config.redis.url))?;

  tracing::info!("Redis connection established");

  // Initialize repositories
  let user_repo = Arc::new(PostgresUserRepository::new(db_pool.clone()));
  let session_repo = Arc::new(PostgresSessionRepository::new(db_pool.clone()));
  let login_attempt_repo = Arc::new(PostgresLoginAttemptRepository::new(db_pool.clone()));
  let customer_repo = Arc::new(PostgresCustomerRepository::new(db_pool.clone()));
  let invoice_repo = Arc::new(PostgresInvoiceRepository::new(db_pool.clone()));

  let password_hasher =
    Arc::new(Argon2PasswordHasher::new().context("Failed to create password hasher")?);

  let page_cache: Arc<dyn PageCache> = Arc::new(RedisPageCache::new(
    redis_conn,
    config.redis.page_cache_ttl_seconds,
  ));

  // Initialize domain services
  let auth_config = AuthServiceConfig {
    password_min_length: config.security.password_min_length,
    session_ttl_seconds: config.security.session_ttl_seconds as i64,
    rate_limit_window_seconds: config.rate_limit.login_window_seconds as i64,
    max_failed_attempts: config.rate_limit.login_max_attempts as i64,
  };

  let auth_service = Arc::new(AuthService::new(
    user_repo,
    session_repo,
    login_attempt_repo,
    password_hasher,
    auth_config,
  ));

  let invoice_service = Arc::new(InvoiceService::new(invoice_repo, customer_repo));

  let templates = TemplateEngine::new().context("Failed to load templates")?;

  let deps = WebRouteDependencies {
    templates,
    auth_service: auth_service.clone(),
    authenticate_use_case: Arc::new(AuthenticateUseCase::new(auth_service.clone())),
    sign_out_use_case: Arc::new(SignOutUseCase::new(auth_service)),
    list_invoices_use_case: Arc::new(ListInvoicesUseCase::new(invoice_service.clone())),
    invoice_form_use_case: Arc::new(GetInvoiceFormUseCase::new(invoice_service.clone())),
    create_invoice_use_case: Arc::new(CreateInvoiceUseCase::new(
      invoice_service.clone(),
      page_cache.clone(),
    )),
    update_invoice_use_case: Arc::new(UpdateInvoiceUseCase::new(
      invoice_service.clone(),
      page_cache.clone(),
    )),
    delete_invoice_use_case: Arc::new(DeleteInvoiceUseCase::new(
      invoice_service,
      page_cache.clone(),
    )),
    page_cache,
    cookie_settings: SessionCookieSettings {
      secure: config.security.secure_cookies,
    },
    login_rate_limit: LoginRateLimit {
      per_second: config.rate_limit.login_requests_per_second,
      burst_size: config.rate_limit.login_burst_size,
    },
  };

  let server_host = config.server.host.clone();
  let server_port = config.server.port;

  tracing::info!("Starting HTTP server on {}:{}", server_host, server_port);

  HttpServer::new(move || {
    let deps = deps.clone();

    App::new()
      .wrap(Logger::default())
      .wrap(RequestIdMiddleware)
      .configure(|cfg| configure_web_routes(cfg, deps))
      // Static files
      .service(fs::Files::new("/static", "./static"))
      // Health check endpoint
      .route("/health", web::get().to(health_check))
  })
  .bind((server_host.as_str(), server_port))?
  .run()
  .await?;

  Ok(())
}

/// Health check endpoint
async fn health_check() -> &'static str {
  "OK"
}
