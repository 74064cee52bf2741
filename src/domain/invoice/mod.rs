pub mod entities;
pub mod errors;
pub mod ports;
pub mod services;
pub mod validation;
pub mod value_objects;

pub use entities::{Customer, InvoiceInput, InvoiceRecord, InvoiceSummary};
pub use errors::InvoiceError;
pub use ports::{CustomerRepository, InvoiceRepository, PageCache};
pub use services::{INVOICES_PATH, InvoiceService};
pub use validation::{FieldErrors, FormFields, FormValidator};
pub use value_objects::{Amount, InvoiceStatus, ValueObjectError};
