use chrono::{NaiveDate, Utc};
use std::sync::Arc;

use super::entities::{Customer, InvoiceInput, InvoiceRecord, InvoiceSummary};
use super::errors::InvoiceError;
use super::ports::{CustomerRepository, InvoiceRepository};

/// Path of the invoice listing view
pub const INVOICES_PATH: &str = "/dashboard/invoices";

const LISTING_LIMIT: i64 = 50;

pub struct InvoiceService {
  invoice_repo: Arc<dyn InvoiceRepository>,
  customer_repo: Arc<dyn CustomerRepository>,
}

impl InvoiceService {
  pub fn new(
    invoice_repo: Arc<dyn InvoiceRepository>,
    customer_repo: Arc<dyn CustomerRepository>,
  ) -> Self {
    Self {
      invoice_repo,
      customer_repo,
    }
  }

  /// Persists a new invoice dated today (UTC)
  pub async fn create_invoice(&self, input: InvoiceInput) -> Result<InvoiceRecord, InvoiceError> {
    self.create_invoice_on(input, Utc::now().date_naive()).await
  }

  pub async fn create_invoice_on(
    &self,
    input: InvoiceInput,
    today: NaiveDate,
  ) -> Result<InvoiceRecord, InvoiceError> {
    let record = InvoiceRecord::for_create(input, today);
    self.invoice_repo.create(&record).await?;

    tracing::info!(invoice_id = %record.id, "Invoice created");
    Ok(record)
  }

  pub async fn update_invoice(
    &self,
    id: &str,
    input: InvoiceInput,
  ) -> Result<InvoiceRecord, InvoiceError> {
    let record = InvoiceRecord::for_update(input, id);
    self.invoice_repo.update(&record).await?;

    tracing::info!(invoice_id = %record.id, "Invoice updated");
    Ok(record)
  }

  pub async fn delete_invoice(&self, id: &str) -> Result<(), InvoiceError> {
    self.invoice_repo.delete(id).await?;

    tracing::info!(invoice_id = %id, "Invoice deleted");
    Ok(())
  }

  pub async fn get_invoice(&self, id: &str) -> Result<InvoiceRecord, InvoiceError> {
    self
      .invoice_repo
      .find_by_id(id)
      .await?
      .ok_or_else(|| InvoiceError::InvoiceNotFound(id.to_string()))
  }

  pub async fn list_invoices(&self) -> Result<Vec<InvoiceSummary>, InvoiceError> {
    self.invoice_repo.find_latest(LISTING_LIMIT).await
  }

  pub async fn list_customers(&self) -> Result<Vec<Customer>, InvoiceError> {
    self.customer_repo.find_all().await
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::invoice::ports::{MockCustomerRepository, MockInvoiceRepository};
  use crate::domain::invoice::value_objects::{Amount, InvoiceStatus};
  use rust_decimal_macros::dec;

  fn input() -> InvoiceInput {
    InvoiceInput {
      customer_id: "3958dc9e-712f-4377-85e9-fec4b6a6442a".to_string(),
      amount: Amount::new(dec!(99.99)).unwrap(),
      status: InvoiceStatus::Paid,
    }
  }

  fn service(invoice_repo: MockInvoiceRepository) -> InvoiceService {
    InvoiceService::new(Arc::new(invoice_repo), Arc::new(MockCustomerRepository::new()))
  }

  #[tokio::test]
  async fn test_create_invoice_persists_scaled_record() {
    let today = NaiveDate::from_ymd_opt(2023, 12, 6).unwrap();
    let mut repo = MockInvoiceRepository::new();
    repo
      .expect_create()
      .withf(move |record| {
        record.amount_in_cents == 9999
          && record.status == InvoiceStatus::Paid
          && record.date == Some(today)
      })
      .times(1)
      .returning(|_| Ok(()));

    let record = service(repo).create_invoice_on(input(), today).await.unwrap();
    assert_eq!(record.date_iso().as_deref(), Some("2023-12-06"));
  }

  #[tokio::test]
  async fn test_update_invoice_targets_given_id() {
    let mut repo = MockInvoiceRepository::new();
    repo
      .expect_update()
      .withf(|record| record.id == "invoice-1" && record.date.is_none())
      .times(1)
      .returning(|_| Ok(()));

    let record = service(repo).update_invoice("invoice-1", input()).await.unwrap();
    assert_eq!(record.amount_in_cents, 9999);
  }

  #[tokio::test]
  async fn test_get_invoice_not_found() {
    let mut repo = MockInvoiceRepository::new();
    repo.expect_find_by_id().returning(|_| Ok(None));

    let result = service(repo).get_invoice("missing").await;
    assert!(matches!(result, Err(InvoiceError::InvoiceNotFound(id)) if id == "missing"));
  }

  #[tokio::test]
  async fn test_repository_failure_propagates() {
    let mut repo = MockInvoiceRepository::new();
    repo
      .expect_delete()
      .returning(|_| Err(InvoiceError::Repository("connection reset".to_string())));

    let result = service(repo).delete_invoice("invoice-1").await;
    assert!(matches!(result, Err(InvoiceError::Repository(_))));
  }
}
