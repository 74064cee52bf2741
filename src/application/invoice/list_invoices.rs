use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use std::sync::Arc;

use crate::domain::invoice::{InvoiceError, InvoiceService, InvoiceSummary};

#[derive(Debug, Serialize)]
pub struct InvoiceListItemDto {
  pub id: String,
  pub customer_name: String,
  pub customer_email: String,
  pub customer_image_url: Option<String>,
  /// e.g. `$1,234.56`
  pub amount: String,
  pub status: String,
  /// e.g. `Dec 6, 2023`
  pub date: String,
}

impl From<InvoiceSummary> for InvoiceListItemDto {
  fn from(summary: InvoiceSummary) -> Self {
    Self {
      id: summary.id,
      customer_name: summary.customer_name,
      customer_email: summary.customer_email,
      customer_image_url: summary.customer_image_url,
      amount: format_currency(summary.amount_in_cents),
      status: summary.status.as_str().to_string(),
      date: format_date(summary.date),
    }
  }
}

#[derive(Debug, Serialize)]
pub struct ListInvoicesResponse {
  pub invoices: Vec<InvoiceListItemDto>,
}

pub struct ListInvoicesUseCase {
  invoice_service: Arc<InvoiceService>,
}

impl ListInvoicesUseCase {
  pub fn new(invoice_service: Arc<InvoiceService>) -> Self {
    Self { invoice_service }
  }

  pub async fn execute(&self) -> Result<ListInvoicesResponse, InvoiceError> {
    let invoices = self.invoice_service.list_invoices().await?;

    Ok(ListInvoicesResponse {
      invoices: invoices.into_iter().map(InvoiceListItemDto::from).collect(),
    })
  }
}

/// Formats a cent amount as US dollars with thousands separators
fn format_currency(cents: i64) -> String {
  let formatted = format!("{:.2}", Decimal::new(cents, 2).abs());
  let (whole, fraction) = formatted.split_once('.').unwrap_or((formatted.as_str(), "00"));

  let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
  for (i, digit) in whole.chars().enumerate() {
    if i > 0 && (whole.len() - i) % 3 == 0 {
      grouped.push(',');
    }
    grouped.push(digit);
  }

  let sign = if cents < 0 { "-" } else { "" };
  format!("{}${}.{}", sign, grouped, fraction)
}

fn format_date(date: NaiveDate) -> String {
  date.format("%b %-d, %Y").to_string()
}
