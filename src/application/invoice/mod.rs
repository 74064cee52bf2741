pub mod create_invoice;
pub mod delete_invoice;
pub mod get_invoice_form;
pub mod list_invoices;
pub mod update_invoice;

pub use create_invoice::CreateInvoiceUseCase;
pub use delete_invoice::DeleteInvoiceUseCase;
pub use get_invoice_form::{
  CustomerOptionDto, GetInvoiceFormUseCase, InvoiceFormResponse, InvoiceFormValuesDto,
};
pub use list_invoices::{InvoiceListItemDto, ListInvoicesResponse, ListInvoicesUseCase};
pub use update_invoice::UpdateInvoiceUseCase;
