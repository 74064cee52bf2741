use serde::Serialize;
use std::sync::Arc;

use crate::domain::invoice::{Amount, Customer, InvoiceError, InvoiceRecord, InvoiceService};

#[derive(Debug, Serialize)]
pub struct CustomerOptionDto {
  pub id: String,
  pub name: String,
}

impl From<Customer> for CustomerOptionDto {
  fn from(customer: Customer) -> Self {
    Self {
      id: customer.id,
      name: customer.name,
    }
  }
}

/// Stored invoice values prefilled into the edit form
#[derive(Debug, Serialize)]
pub struct InvoiceFormValuesDto {
  pub id: String,
  pub customer_id: String,
  /// Dollars, e.g. `157.95`
  pub amount: String,
  pub status: String,
}

impl From<InvoiceRecord> for InvoiceFormValuesDto {
  fn from(record: InvoiceRecord) -> Self {
    let amount = Amount::from_cents(record.amount_in_cents)
      .map(|amount| amount.value().to_string())
      .unwrap_or_default();

    Self {
      id: record.id,
      customer_id: record.customer_id,
      amount,
      status: record.status.as_str().to_string(),
    }
  }
}

#[derive(Debug, Serialize)]
pub struct InvoiceFormResponse {
  pub invoice: Option<InvoiceFormValuesDto>,
  pub customers: Vec<CustomerOptionDto>,
}

/// Loads what the create and edit forms need to render
pub struct GetInvoiceFormUseCase {
  invoice_service: Arc<InvoiceService>,
}

impl GetInvoiceFormUseCase {
  pub fn new(invoice_service: Arc<InvoiceService>) -> Self {
    Self { invoice_service }
  }

  /// With `invoice_id` set the stored invoice is loaded too.
  ///
  /// # Errors
  /// `InvoiceError::InvoiceNotFound` when the invoice does not exist
  pub async fn execute(
    &self,
    invoice_id: Option<&str>,
  ) -> Result<InvoiceFormResponse, InvoiceError> {
    let invoice = match invoice_id {
      Some(id) => Some(self.invoice_service.get_invoice(id).await?.into()),
      None => None,
    };

    let customers = self
      .invoice_service
      .list_customers()
      .await?
      .into_iter()
      .map(CustomerOptionDto::from)
      .collect();

    Ok(InvoiceFormResponse { invoice, customers })
  }
}
