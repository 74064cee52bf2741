use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::value_objects::{Amount, InvoiceStatus};

/// Validated invoice form input, amount still in dollars
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceInput {
  pub customer_id: String,
  pub amount: Amount,
  pub status: InvoiceStatus,
}

/// Invoice row as written to the store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceRecord {
  pub id: String,
  pub customer_id: String,
  pub amount_in_cents: i64,
  pub status: InvoiceStatus,
  /// Set on creation only; updates keep the stored date.
  pub date: Option<NaiveDate>,
}

impl InvoiceRecord {
  /// Builds the record for a new invoice dated `today`
  pub fn for_create(input: InvoiceInput, today: NaiveDate) -> Self {
    Self {
      id: Uuid::new_v4().to_string(),
      customer_id: input.customer_id,
      amount_in_cents: input.amount.in_cents(),
      status: input.status,
      date: Some(today),
    }
  }

  /// Builds the record replacing the editable columns of invoice `id`
  pub fn for_update(input: InvoiceInput, id: impl Into<String>) -> Self {
    Self {
      id: id.into(),
      customer_id: input.customer_id,
      amount_in_cents: input.amount.in_cents(),
      status: input.status,
      date: None,
    }
  }

  /// ISO calendar date (YYYY-MM-DD), if any
  pub fn date_iso(&self) -> Option<String> {
    self.date.map(|d| d.format("%Y-%m-%d").to_string())
  }
}

/// Row of the invoice listing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvoiceSummary {
  pub id: String,
  pub customer_name: String,
  pub customer_email: String,
  pub customer_image_url: Option<String>,
  pub amount_in_cents: i64,
  pub status: InvoiceStatus,
  pub date: NaiveDate,
}

/// Customer available for selection in invoice forms
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Customer {
  pub id: String,
  pub name: String,
  pub email: String,
  pub image_url: Option<String>,
}

#[cfg(test)]
mod tests {
  use super::*;
  use rust_decimal_macros::dec;

  fn input() -> InvoiceInput {
    InvoiceInput {
      customer_id: "abc".to_string(),
      amount: Amount::new(dec!(12.5)).unwrap(),
      status: InvoiceStatus::Pending,
    }
  }

  #[test]
  fn test_for_create_scales_amount_and_sets_date() {
    let today = NaiveDate::from_ymd_opt(2024, 3, 7).unwrap();
    let record = InvoiceRecord::for_create(input(), today);

    assert_eq!(record.amount_in_cents, 1250);
    assert_eq!(record.customer_id, "abc");
    assert_eq!(record.status, InvoiceStatus::Pending);
    assert_eq!(record.date_iso().as_deref(), Some("2024-03-07"));
    assert!(Uuid::parse_str(&record.id).is_ok());
  }

  #[test]
  fn test_for_create_generates_distinct_ids() {
    let today = NaiveDate::from_ymd_opt(2024, 3, 7).unwrap();
    let first = InvoiceRecord::for_create(input(), today);
    let second = InvoiceRecord::for_create(input(), today);

    assert_ne!(first.id, second.id);
  }

  #[test]
  fn test_for_update_keeps_id_and_leaves_date_unset() {
    let record = InvoiceRecord::for_update(input(), "existing-id");

    assert_eq!(record.id, "existing-id");
    assert_eq!(record.amount_in_cents, 1250);
    assert_eq!(record.date, None);
  }
}
