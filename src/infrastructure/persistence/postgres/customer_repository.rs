use async_trait::async_trait;
use sqlx::{FromRow, PgPool};

use crate::domain::invoice::{Customer, errors::InvoiceError, ports::CustomerRepository};

#[derive(Debug, FromRow)]
struct CustomerRow {
  id: String,
  name: String,
  email: String,
  image_url: Option<String>,
}

impl From<CustomerRow> for Customer {
  fn from(row: CustomerRow) -> Self {
    Customer {
      id: row.id,
      name: row.name,
      email: row.email,
      image_url: row.image_url,
    }
  }
}

pub struct PostgresCustomerRepository {
  pool: PgPool,
}

impl PostgresCustomerRepository {
  pub fn new(pool: PgPool) -> Self {
    Self { pool }
  }
}

#[async_trait]
impl CustomerRepository for PostgresCustomerRepository {
  async fn find_all(&self) -> Result<Vec<Customer>, InvoiceError> {
    let rows = sqlx::query_as::<_, CustomerRow>(
      r#"
            SELECT id::text AS id, name, email, image_url
            FROM customers
            ORDER BY name ASC
            "#,
    )
    .fetch_all(&self.pool)
    .await?;

    Ok(rows.into_iter().map(Customer::from).collect())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::infrastructure::persistence::postgres::test_support::{
    insert_customer, setup_test_db,
  };

  #[tokio::test]
  #[ignore = "requires a running Docker daemon"]
  async fn test_find_all_sorted_by_name() {
    let (pool, _container) = setup_test_db().await;
    insert_customer(&pool, "Michael Novotny", "michael@novotny.com").await;
    let amy = insert_customer(&pool, "Amy Burns", "amy@burns.com").await;
    let repo = PostgresCustomerRepository::new(pool);

    let customers = repo.find_all().await.unwrap();

    assert_eq!(customers.len(), 2);
    assert_eq!(customers[0].id, amy);
    assert_eq!(customers[0].name, "Amy Burns");
  }
}
