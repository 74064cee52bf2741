use std::sync::Arc;

use crate::application::action_result::{
  ActionOutcome, ActionResult, UPDATE_FAILED, UPDATE_MISSING_FIELDS,
};
use crate::domain::invoice::{FormFields, FormValidator, INVOICES_PATH, InvoiceService, PageCache};

pub struct UpdateInvoiceUseCase {
  invoice_service: Arc<InvoiceService>,
  page_cache: Arc<dyn PageCache>,
}

impl UpdateInvoiceUseCase {
  pub fn new(invoice_service: Arc<InvoiceService>, page_cache: Arc<dyn PageCache>) -> Self {
    Self {
      invoice_service,
      page_cache,
    }
  }

  /// Validates the submitted form and overwrites invoice `id`
  ///
  /// The id is passed through as-is; an id the store cannot parse fails
  /// like any other database error.
  pub async fn execute(&self, id: &str, fields: &FormFields) -> ActionOutcome {
    let input = match FormValidator::validate(fields) {
      Ok(input) => input,
      Err(errors) => {
        return ActionOutcome::State(ActionResult::invalid(errors, UPDATE_MISSING_FIELDS));
      }
    };

    if let Err(e) = self.invoice_service.update_invoice(id, input).await {
      tracing::error!(invoice_id = %id, error = %e, "Failed to update invoice");
      return ActionOutcome::State(ActionResult::message(UPDATE_FAILED));
    }

    self.page_cache.revalidate(INVOICES_PATH).await;
    ActionOutcome::Redirect(INVOICES_PATH.to_string())
  }
}
