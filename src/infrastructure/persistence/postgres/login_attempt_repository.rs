use async_trait::async_trait;
use sqlx::{FromRow, PgPool};

use crate::domain::auth::{
  entities::LoginAttempt,
  errors::{AuthError, RepositoryError},
  ports::LoginAttemptRepository,
};

/// Database row structure for scalar count query
#[derive(Debug, FromRow)]
struct CountRow {
  count: Option<i64>,
}

/// PostgreSQL implementation of the LoginAttemptRepository trait
pub struct PostgresLoginAttemptRepository {
  pool: PgPool,
}

impl PostgresLoginAttemptRepository {
  pub fn new(pool: PgPool) -> Self {
    Self { pool }
  }
}

#[async_trait]
impl LoginAttemptRepository for PostgresLoginAttemptRepository {
  async fn create(&self, attempt: LoginAttempt) -> Result<(), AuthError> {
    let ip_string = attempt.ip_address.map(|ip| ip.to_string());

    sqlx::query(
      r#"
            INSERT INTO login_attempts (id, email, ip_address, success, attempted_at)
            VALUES ($1, $2, CAST($3 AS INET), $4, $5)
            "#,
    )
    .bind(attempt.id)
    .bind(&attempt.email)
    .bind(ip_string.as_deref())
    .bind(attempt.success)
    .bind(attempt.attempted_at)
    .execute(&self.pool)
    .await
    .map_err(|e| {
      tracing::error!("Failed to create login attempt: {}", e);
      AuthError::Repository(RepositoryError::QueryFailed(e.to_string()))
    })?;

    Ok(())
  }

  async fn count_recent_failures(&self, email: &str, window_seconds: i64) -> Result<i64, AuthError> {
    let count_row = sqlx::query_as::<_, CountRow>(
      r#"
            SELECT COUNT(*) as count
            FROM login_attempts
            WHERE email = $1
              AND success = false
              AND attempted_at >= NOW() - INTERVAL '1 second' * $2
            "#,
    )
    .bind(email)
    .bind(window_seconds as f64)
    .fetch_one(&self.pool)
    .await
    .map_err(|e| {
      tracing::error!("Failed to count login failures for email {}: {}", email, e);
      AuthError::Repository(RepositoryError::QueryFailed(e.to_string()))
    })?;

    Ok(count_row.count.unwrap_or(0))
  }
}
