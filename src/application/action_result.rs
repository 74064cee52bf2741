use serde::Serialize;

use crate::domain::invoice::FieldErrors;

pub const CREATE_FAILED: &str = "Database Error: Failed to Create Invoice.";
pub const UPDATE_FAILED: &str = "Database Error: Failed to Update Invoice.";
pub const DELETE_FAILED: &str = "Database Error: Failed to Delete Invoice.";
pub const DELETED: &str = "Deleted Invoice.";
pub const CREATE_MISSING_FIELDS: &str = "Missing Fields. Failed to Create Invoice.";
pub const UPDATE_MISSING_FIELDS: &str = "Missing Fields. Failed to Update Invoice.";
pub const INVALID_CREDENTIALS: &str = "Invalid credentials.";
pub const SOMETHING_WENT_WRONG: &str = "Something went wrong.";

/// State handed back to a form after an action that did not navigate away
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ActionResult {
  #[serde(skip_serializing_if = "Option::is_none")]
  pub message: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub errors: Option<FieldErrors>,
  /// Set only when the action went through
  #[serde(skip)]
  pub succeeded: bool,
}

impl ActionResult {
  pub fn message(message: impl Into<String>) -> Self {
    Self {
      message: Some(message.into()),
      ..Self::default()
    }
  }

  pub fn success(message: impl Into<String>) -> Self {
    Self {
      message: Some(message.into()),
      succeeded: true,
      ..Self::default()
    }
  }

  pub fn invalid(errors: FieldErrors, message: impl Into<String>) -> Self {
    Self {
      message: Some(message.into()),
      errors: Some(errors),
      ..Self::default()
    }
  }

  pub fn has_errors(&self) -> bool {
    self.errors.as_ref().is_some_and(|errors| !errors.is_empty())
  }
}

/// What a form action asks the caller to do next
#[derive(Debug, Clone, PartialEq)]
pub enum ActionOutcome {
  /// Navigate to the given path
  Redirect(String),
  /// Stay on the form and show the result
  State(ActionResult),
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_empty_fields_are_not_serialized() {
    let json = serde_json::to_value(ActionResult::success(DELETED)).unwrap();
    assert_eq!(json, serde_json::json!({ "message": "Deleted Invoice." }));

    let json = serde_json::to_value(ActionResult::default()).unwrap();
    assert_eq!(json, serde_json::json!({}));
  }

  #[test]
  fn test_invalid_result_carries_field_errors() {
    let mut errors = FieldErrors::new();
    errors.add("status", "Please select an invoice status.");

    let result = ActionResult::invalid(errors, CREATE_MISSING_FIELDS);
    assert!(result.has_errors());
    assert!(!result.succeeded);

    let json = serde_json::to_value(&result).unwrap();
    assert_eq!(json["errors"]["status"][0], "Please select an invoice status.");
    assert_eq!(json["message"], CREATE_MISSING_FIELDS);
  }
}
