use std::sync::Arc;

use crate::application::action_result::{ActionResult, DELETE_FAILED, DELETED};
use crate::domain::invoice::{INVOICES_PATH, InvoiceService, PageCache};

pub struct DeleteInvoiceUseCase {
  invoice_service: Arc<InvoiceService>,
  page_cache: Arc<dyn PageCache>,
}

impl DeleteInvoiceUseCase {
  pub fn new(invoice_service: Arc<InvoiceService>, page_cache: Arc<dyn PageCache>) -> Self {
    Self {
      invoice_service,
      page_cache,
    }
  }

  /// Deletes invoice `id`; the caller stays on the listing either way
  pub async fn execute(&self, id: &str) -> ActionResult {
    match self.invoice_service.delete_invoice(id).await {
      Ok(()) => {
        self.page_cache.revalidate(INVOICES_PATH).await;
        ActionResult::success(DELETED)
      }
      Err(e) => {
        tracing::error!(invoice_id = %id, error = %e, "Failed to delete invoice");
        ActionResult::message(DELETE_FAILED)
      }
    }
  }
}
