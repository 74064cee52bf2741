use async_trait::async_trait;

use super::entities::{Customer, InvoiceRecord, InvoiceSummary};
use super::errors::InvoiceError;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait InvoiceRepository: Send + Sync {
  async fn create(&self, record: &InvoiceRecord) -> Result<(), InvoiceError>;
  /// Replaces customer, amount and status; the stored date is left untouched.
  async fn update(&self, record: &InvoiceRecord) -> Result<(), InvoiceError>;
  async fn delete(&self, id: &str) -> Result<(), InvoiceError>;
  async fn find_by_id(&self, id: &str) -> Result<Option<InvoiceRecord>, InvoiceError>;
  async fn find_latest(&self, limit: i64) -> Result<Vec<InvoiceSummary>, InvoiceError>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CustomerRepository: Send + Sync {
  async fn find_all(&self) -> Result<Vec<Customer>, InvoiceError>;
}

/// Cache of rendered page fragments keyed by request path
///
/// Implementations swallow their own failures: a cache outage degrades to
/// re-rendering and must never fail the action that triggered it.
///
/// Fragments are stored per generation. A reader takes the generation before
/// loading data and stores under it, so a fragment rendered from data read
/// before a `revalidate` lands in a generation nobody reads anymore.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PageCache: Send + Sync {
  /// Current generation of `path`, bumped by every `revalidate`
  async fn generation(&self, path: &str) -> u64;
  async fn get(&self, path: &str, generation: u64) -> Option<String>;
  async fn put(&self, path: &str, generation: u64, html: &str);
  /// Moves `path` to a new generation so the next read re-renders it
  async fn revalidate(&self, path: &str);
}
