//! Creates a dashboard user
//!
//! There is no sign-up page; accounts are provisioned with this command:
//!
//! ```text
//! create-user --name User --email user@nextmail.com --password 123456
//! ```

use anyhow::Context;
use clap::Parser;
use sqlx::postgres::PgPoolOptions;

use invoice_dashboard::{
  domain::auth::{Email, Password, User},
  infrastructure::{
    config::Config, persistence::postgres::PostgresUserRepository,
    security::Argon2PasswordHasher,
  },
};

/// Create a user who can sign in to the dashboard
#[derive(Parser, Debug)]
#[command(name = "create-user")]
#[command(version, about, long_about = None)]
struct Args {
  /// Display name
  #[arg(long)]
  name: String,

  /// Login email, stored lowercased
  #[arg(long)]
  email: String,

  /// Plain password, hashed with Argon2id before it is stored
  #[arg(long)]
  password: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  dotenvy::dotenv().ok();
  tracing_subscriber::fmt()
    .with_env_filter(
      tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "invoice_dashboard=info".into()),
    )
    .init();

  let args = Args::parse();
  let config = Config::load().context("Failed to load configuration")?;

  let email = Email::new(args.email)?;
  let password = Password::new(args.password, config.security.password_min_length)?;

  let hasher = Argon2PasswordHasher::new()?;
  let password_hash = hasher.hash_password(&password)?;

  let pool = PgPoolOptions::new()
    .max_connections(1)
    .connect(&config.database.url)
    .await
    .context("Could not connect to database")?;

  sqlx::migrate!("./migrations")
    .run(&pool)
    .await
    .context("Failed to run database migrations")?;

  let user = PostgresUserRepository::new(pool)
    .create(&User::new(
      args.name,
      email.into_inner(),
      password_hash.into_inner(),
    ))
    .await?;

  tracing::info!(user_id = %user.id, email = %user.email, "User created");
  Ok(())
}
