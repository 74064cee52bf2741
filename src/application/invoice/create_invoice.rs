use std::sync::Arc;

use crate::application::action_result::{
  ActionOutcome, ActionResult, CREATE_FAILED, CREATE_MISSING_FIELDS,
};
use crate::domain::invoice::{FormFields, FormValidator, INVOICES_PATH, InvoiceService, PageCache};

pub struct CreateInvoiceUseCase {
  invoice_service: Arc<InvoiceService>,
  page_cache: Arc<dyn PageCache>,
}

impl CreateInvoiceUseCase {
  pub fn new(invoice_service: Arc<InvoiceService>, page_cache: Arc<dyn PageCache>) -> Self {
    Self {
      invoice_service,
      page_cache,
    }
  }

  /// Validates the submitted form and stores a new invoice dated today
  pub async fn execute(&self, fields: &FormFields) -> ActionOutcome {
    let input = match FormValidator::validate(fields) {
      Ok(input) => input,
      Err(errors) => {
        return ActionOutcome::State(ActionResult::invalid(errors, CREATE_MISSING_FIELDS));
      }
    };

    if let Err(e) = self.invoice_service.create_invoice(input).await {
      tracing::error!(error = %e, "Failed to create invoice");
      return ActionOutcome::State(ActionResult::message(CREATE_FAILED));
    }

    self.page_cache.revalidate(INVOICES_PATH).await;
    ActionOutcome::Redirect(INVOICES_PATH.to_string())
  }
}
