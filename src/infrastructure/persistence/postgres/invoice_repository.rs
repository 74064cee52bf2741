use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::{FromRow, PgPool};
use std::str::FromStr;

use crate::domain::invoice::{
  InvoiceRecord, InvoiceStatus, InvoiceSummary, errors::InvoiceError, ports::InvoiceRepository,
};

#[derive(Debug, FromRow)]
struct InvoiceRow {
  id: String,
  customer_id: String,
  amount: i64,
  status: String,
  date: NaiveDate,
}

impl TryFrom<InvoiceRow> for InvoiceRecord {
  type Error = InvoiceError;

  fn try_from(row: InvoiceRow) -> Result<Self, Self::Error> {
    Ok(InvoiceRecord {
      id: row.id,
      customer_id: row.customer_id,
      amount_in_cents: row.amount,
      status: InvoiceStatus::from_str(&row.status)?,
      date: Some(row.date),
    })
  }
}

#[derive(Debug, FromRow)]
struct InvoiceSummaryRow {
  id: String,
  name: String,
  email: String,
  image_url: Option<String>,
  amount: i64,
  status: String,
  date: NaiveDate,
}

impl TryFrom<InvoiceSummaryRow> for InvoiceSummary {
  type Error = InvoiceError;

  fn try_from(row: InvoiceSummaryRow) -> Result<Self, Self::Error> {
    Ok(InvoiceSummary {
      id: row.id,
      customer_name: row.name,
      customer_email: row.email,
      customer_image_url: row.image_url,
      amount_in_cents: row.amount,
      status: InvoiceStatus::from_str(&row.status)?,
      date: row.date,
    })
  }
}

/// Invoice storage; ids travel as text and are cast to UUID in SQL
pub struct PostgresInvoiceRepository {
  pool: PgPool,
}

impl PostgresInvoiceRepository {
  pub fn new(pool: PgPool) -> Self {
    Self { pool }
  }
}

#[async_trait]
impl InvoiceRepository for PostgresInvoiceRepository {
  async fn create(&self, record: &InvoiceRecord) -> Result<(), InvoiceError> {
    sqlx::query(
      r#"
            INSERT INTO invoices (id, customer_id, amount, status, date)
            VALUES (CAST($1 AS UUID), CAST($2 AS UUID), $3, $4, COALESCE($5, CURRENT_DATE))
            "#,
    )
    .bind(&record.id)
    .bind(&record.customer_id)
    .bind(record.amount_in_cents)
    .bind(record.status.as_str())
    .bind(record.date)
    .execute(&self.pool)
    .await?;

    Ok(())
  }

  async fn update(&self, record: &InvoiceRecord) -> Result<(), InvoiceError> {
    let result = sqlx::query(
      r#"
            UPDATE invoices
            SET customer_id = CAST($2 AS UUID), amount = $3, status = $4
            WHERE id = CAST($1 AS UUID)
            "#,
    )
    .bind(&record.id)
    .bind(&record.customer_id)
    .bind(record.amount_in_cents)
    .bind(record.status.as_str())
    .execute(&self.pool)
    .await?;

    if result.rows_affected() == 0 {
      tracing::warn!(invoice_id = %record.id, "Update matched no invoice");
    }

    Ok(())
  }

  async fn delete(&self, id: &str) -> Result<(), InvoiceError> {
    let result = sqlx::query(
      r#"
      DELETE FROM invoices
      WHERE id = CAST($1 AS UUID)
      "#,
    )
    .bind(id)
    .execute(&self.pool)
    .await?;

    if result.rows_affected() == 0 {
      tracing::warn!(invoice_id = %id, "Delete matched no invoice");
    }

    Ok(())
  }

  async fn find_by_id(&self, id: &str) -> Result<Option<InvoiceRecord>, InvoiceError> {
    let row = sqlx::query_as::<_, InvoiceRow>(
      r#"
            SELECT id::text AS id, customer_id::text AS customer_id, amount, status, date
            FROM invoices
            WHERE id = CAST($1 AS UUID)
            "#,
    )
    .bind(id)
    .fetch_optional(&self.pool)
    .await?;

    row.map(InvoiceRecord::try_from).transpose()
  }

  async fn find_latest(&self, limit: i64) -> Result<Vec<InvoiceSummary>, InvoiceError> {
    let rows = sqlx::query_as::<_, InvoiceSummaryRow>(
      r#"
            SELECT
                invoices.id::text AS id,
                customers.name,
                customers.email,
                customers.image_url,
                invoices.amount,
                invoices.status,
                invoices.date
            FROM invoices
            JOIN customers ON invoices.customer_id = customers.id
            ORDER BY invoices.date DESC, invoices.id
            LIMIT $1
            "#,
    )
    .bind(limit)
    .fetch_all(&self.pool)
    .await?;

    rows.into_iter().map(|r| r.try_into()).collect()
  }
}
