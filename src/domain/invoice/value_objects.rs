use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValueObjectError {
  #[error("Invalid amount: {0}")]
  InvalidAmount(String),
  #[error("Invalid invoice status: {0}")]
  InvalidStatus(String),
}

// Invoice Status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvoiceStatus {
  Pending,
  Paid,
}

impl InvoiceStatus {
  pub fn as_str(&self) -> &'static str {
    match self {
      InvoiceStatus::Pending => "pending",
      InvoiceStatus::Paid => "paid",
    }
  }
}

/// Form values are matched exactly; "Paid" or " paid" are rejected.
impl FromStr for InvoiceStatus {
  type Err = ValueObjectError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "pending" => Ok(InvoiceStatus::Pending),
      "paid" => Ok(InvoiceStatus::Paid),
      _ => Err(ValueObjectError::InvalidStatus(format!(
        "Unknown status: {}",
        s
      ))),
    }
  }
}

impl fmt::Display for InvoiceStatus {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

// Amount - in dollars, worth at least one cent once rounded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Amount(Decimal);

impl Amount {
  pub fn new(value: Decimal) -> Result<Self, ValueObjectError> {
    if value <= Decimal::ZERO {
      return Err(ValueObjectError::InvalidAmount(
        "Amount must be greater than zero".to_string(),
      ));
    }

    let amount = Self(value);
    match amount.cents() {
      None => Err(ValueObjectError::InvalidAmount(
        "Amount is too large".to_string(),
      )),
      // Stored in cents, so anything that rounds to nothing is not positive
      Some(0) => Err(ValueObjectError::InvalidAmount(
        "Amount is less than one cent".to_string(),
      )),
      Some(_) => Ok(amount),
    }
  }

  /// Coerces a raw form value into a number the way an HTML form field is
  /// read: surrounding whitespace is ignored and a blank value counts as zero.
  pub fn coerce(raw: Option<&str>) -> Result<Self, ValueObjectError> {
    let trimmed = raw.unwrap_or_default().trim();

    let value = if trimmed.is_empty() {
      Decimal::ZERO
    } else {
      Decimal::from_str(trimmed)
        .or_else(|_| Decimal::from_scientific(trimmed))
        .map_err(|_| ValueObjectError::InvalidAmount(format!("Not a number: {}", trimmed)))?
    };

    Self::new(value)
  }

  /// Rebuilds an amount from its stored cent value.
  pub fn from_cents(cents: i64) -> Result<Self, ValueObjectError> {
    Self::new(Decimal::new(cents, 2))
  }

  pub fn value(&self) -> Decimal {
    self.0
  }

  /// Amount scaled to cents, rounded half away from zero.
  pub fn in_cents(&self) -> i64 {
    self.cents().unwrap_or(i64::MAX)
  }

  fn cents(&self) -> Option<i64> {
    self
      .0
      .checked_mul(Decimal::ONE_HUNDRED)?
      .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
      .to_i64()
  }
}

impl fmt::Display for Amount {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "${:.2}", self.0)
  }
}
