use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::invoice::FormFields;
use crate::domain::invoice::validation::{AMOUNT_FIELD, CUSTOMER_ID_FIELD, STATUS_FIELD};

/// Login form submission
///
/// Fields default to empty so a stripped-down form still reaches the
/// authenticator and fails as bad credentials.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct LoginFormData {
  #[serde(default)]
  #[validate(length(max = 254, message = "Email is too long"))]
  pub email: String,

  #[serde(default)]
  #[validate(length(max = 1024, message = "Password is too long"))]
  pub password: String,

  /// Page to continue to after signing in
  #[serde(default, rename = "redirectTo")]
  #[validate(length(max = 2048, message = "Redirect path is too long"))]
  pub redirect_to: Option<String>,
}

/// `?redirectTo=` on the login page
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginPageQuery {
  #[serde(default, rename = "redirectTo")]
  pub redirect_to: Option<String>,
}

/// Invoice form values echoed back into a re-rendered form
#[derive(Debug, Clone, Default, Serialize)]
pub struct InvoiceFormValues {
  pub customer_id: String,
  pub amount: String,
  pub status: String,
}

impl From<&FormFields> for InvoiceFormValues {
  fn from(fields: &FormFields) -> Self {
    let value = |name: &str| fields.get(name).unwrap_or_default().to_string();

    Self {
      customer_id: value(CUSTOMER_ID_FIELD),
      amount: value(AMOUNT_FIELD),
      status: value(STATUS_FIELD),
    }
  }
}
