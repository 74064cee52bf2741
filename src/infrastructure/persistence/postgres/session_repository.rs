use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::domain::auth::entities::Session;
use crate::domain::auth::errors::{AuthError, RepositoryError};
use crate::domain::auth::ports::SessionRepository;

const SESSION_COLUMNS: &str =
  "id, user_id, session_token, HOST(ip_address) AS ip_address, user_agent, expires_at, created_at";

#[derive(Debug, FromRow)]
struct SessionRow {
  id: Uuid,
  user_id: Uuid,
  session_token: String,
  /// `HOST()` text form of the INET column
  ip_address: Option<String>,
  user_agent: Option<String>,
  expires_at: DateTime<Utc>,
  created_at: DateTime<Utc>,
}

impl From<SessionRow> for Session {
  fn from(row: SessionRow) -> Self {
    let ip_address = row.ip_address.as_deref().and_then(|ip| ip.parse().ok());

    Session {
      id: row.id,
      user_id: row.user_id,
      session_token: row.session_token,
      ip_address,
      user_agent: row.user_agent,
      expires_at: row.expires_at,
      created_at: row.created_at,
    }
  }
}

fn query_failed(operation: &'static str) -> impl FnOnce(sqlx::Error) -> AuthError {
  move |e| {
    tracing::error!(operation, error = %e, "Session query failed");
    AuthError::Repository(RepositoryError::QueryFailed(e.to_string()))
  }
}

/// Sessions table; rows are looked up by the SHA-256 hash of the cookie token
pub struct PostgresSessionRepository {
  pool: PgPool,
}

impl PostgresSessionRepository {
  pub fn new(pool: PgPool) -> Self {
    Self { pool }
  }
}

#[async_trait]
impl SessionRepository for PostgresSessionRepository {
  async fn create(&self, session: Session) -> Result<Session, AuthError> {
    let sql = format!(
      "INSERT INTO sessions (id, user_id, session_token, ip_address, user_agent, expires_at, created_at) \
       VALUES ($1, $2, $3, CAST($4 AS INET), $5, $6, $7) \
       RETURNING {SESSION_COLUMNS}"
    );

    sqlx::query_as::<_, SessionRow>(&sql)
      .bind(session.id)
      .bind(session.user_id)
      .bind(&session.session_token)
      .bind(session.ip_address.map(|ip| ip.to_string()))
      .bind(session.user_agent.as_deref())
      .bind(session.expires_at)
      .bind(session.created_at)
      .fetch_one(&self.pool)
      .await
      .map(Session::from)
      .map_err(query_failed("create"))
  }

  async fn find_by_token_hash(&self, token_hash: &str) -> Result<Option<Session>, AuthError> {
    let sql = format!("SELECT {SESSION_COLUMNS} FROM sessions WHERE session_token = $1");

    sqlx::query_as::<_, SessionRow>(&sql)
      .bind(token_hash)
      .fetch_optional(&self.pool)
      .await
      .map(|row| row.map(Session::from))
      .map_err(query_failed("find_by_token_hash"))
  }

  async fn delete(&self, session_id: Uuid) -> Result<(), AuthError> {
    sqlx::query("DELETE FROM sessions WHERE id = $1")
      .bind(session_id)
      .execute(&self.pool)
      .await
      .map(|_| ())
      .map_err(query_failed("delete"))
  }
}
