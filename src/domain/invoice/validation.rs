//! Invoice form validation
//!
//! Turns the raw fields of a submitted invoice form into an [`InvoiceInput`],
//! collecting one message per failing field.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::str::FromStr;

use super::entities::InvoiceInput;
use super::value_objects::{Amount, InvoiceStatus};

pub const CUSTOMER_ID_FIELD: &str = "customerId";
pub const AMOUNT_FIELD: &str = "amount";
pub const STATUS_FIELD: &str = "status";

pub const CUSTOMER_REQUIRED: &str = "Please select a customer.";
pub const AMOUNT_NOT_POSITIVE: &str = "Please enter an amount greater than $0";
pub const STATUS_REQUIRED: &str = "Please select an invoice status.";

/// Submitted form fields in the order the browser sent them
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormFields(Vec<(String, String)>);

impl FormFields {
  pub fn new(fields: Vec<(String, String)>) -> Self {
    Self(fields)
  }

  /// First value submitted under `name`
  pub fn get(&self, name: &str) -> Option<&str> {
    self
      .0
      .iter()
      .find(|(key, _)| key == name)
      .map(|(_, value)| value.as_str())
  }
}

impl<K, V> FromIterator<(K, V)> for FormFields
where
  K: Into<String>,
  V: Into<String>,
{
  fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
    Self(
      iter
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .collect(),
    )
  }
}

/// Field name to its ordered list of error messages
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn add(&mut self, field: &str, message: impl Into<String>) {
    self
      .0
      .entry(field.to_string())
      .or_default()
      .push(message.into());
  }

  pub fn get(&self, field: &str) -> Option<&[String]> {
    self.0.get(field).map(Vec::as_slice)
  }

  pub fn contains(&self, field: &str) -> bool {
    self.0.contains_key(field)
  }

  pub fn is_empty(&self) -> bool {
    self.0.is_empty()
  }

  pub fn fields(&self) -> impl Iterator<Item = &str> {
    self.0.keys().map(String::as_str)
  }
}

/// Validates invoice forms for both creation and update
pub struct FormValidator;

impl FormValidator {
  /// Checks `customerId`, `amount` and `status` independently and either
  /// returns the parsed input or every field error found.
  pub fn validate(fields: &FormFields) -> Result<InvoiceInput, FieldErrors> {
    let mut errors = FieldErrors::new();

    let customer_id = match fields.get(CUSTOMER_ID_FIELD) {
      Some(id) if !id.is_empty() => Some(id.to_string()),
      _ => {
        errors.add(CUSTOMER_ID_FIELD, CUSTOMER_REQUIRED);
        None
      }
    };

    let amount = Amount::coerce(fields.get(AMOUNT_FIELD))
      .map_err(|_| errors.add(AMOUNT_FIELD, AMOUNT_NOT_POSITIVE))
      .ok();

    let status = fields
      .get(STATUS_FIELD)
      .ok_or(())
      .and_then(|s| InvoiceStatus::from_str(s).map_err(|_| ()))
      .map_err(|_| errors.add(STATUS_FIELD, STATUS_REQUIRED))
      .ok();

    match (customer_id, amount, status) {
      (Some(customer_id), Some(amount), Some(status)) => Ok(InvoiceInput {
        customer_id,
        amount,
        status,
      }),
      _ => Err(errors),
    }
  }
}
