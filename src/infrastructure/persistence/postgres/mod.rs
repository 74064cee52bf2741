pub mod customer_repository;
pub mod invoice_repository;
pub mod login_attempt_repository;
pub mod session_repository;
pub mod user_repository;

#[cfg(test)]
pub(crate) mod test_support;

pub use customer_repository::PostgresCustomerRepository;
pub use invoice_repository::PostgresInvoiceRepository;
pub use login_attempt_repository::PostgresLoginAttemptRepository;
pub use session_repository::PostgresSessionRepository;
pub use user_repository::PostgresUserRepository;
