use actix_web::{HttpRequest, HttpResponse, http::StatusCode, web};
use std::sync::Arc;

use super::{get_user, html, pages::not_found_page, parse_form};
use crate::adapters::http::{dtos::InvoiceFormValues, errors::ApiError, templates::TemplateEngine};
use crate::application::action_result::{ActionOutcome, ActionResult};
use crate::application::invoice::{
  CreateInvoiceUseCase, DeleteInvoiceUseCase, GetInvoiceFormUseCase, ListInvoicesUseCase,
  UpdateInvoiceUseCase,
};
use crate::domain::invoice::{FormFields, INVOICES_PATH, InvoiceError, PageCache};

const CREATE_ACTION: &str = "/dashboard/invoices/create";
const CREATE_LABEL: &str = "Create Invoice";
const EDIT_LABEL: &str = "Edit Invoice";

fn edit_action(id: &str) -> String {
  format!("/dashboard/invoices/{}/edit", id)
}

/// Renders the listing table, serving it from the page cache when possible
async fn invoices_table(
  templates: &TemplateEngine,
  use_case: &ListInvoicesUseCase,
  page_cache: &dyn PageCache,
) -> Result<String, ApiError> {
  // Taken before the query so a table rendered from pre-write data is
  // stored under a generation the write has already retired.
  let generation = page_cache.generation(INVOICES_PATH).await;

  if let Some(table) = page_cache.get(INVOICES_PATH, generation).await {
    return Ok(table);
  }

  let response = use_case.execute().await?;

  let mut context = tera::Context::new();
  context.insert("invoices", &response.invoices);
  let table = templates.render("partials/invoices_table.html.tera", &context)?;

  page_cache.put(INVOICES_PATH, generation, &table).await;
  Ok(table)
}

/// Re-renders the invoice form after a rejected or failed submission
///
/// Field errors answer 400; a message without field errors means the write
/// itself failed and answers 500. The message is rendered even when the
/// customer options cannot be reloaded.
async fn form_state_response(
  templates: &TemplateEngine,
  form_use_case: &GetInvoiceFormUseCase,
  action: &str,
  submit_label: &str,
  fields: &FormFields,
  result: ActionResult,
) -> Result<HttpResponse, ApiError> {
  let status = if result.has_errors() {
    StatusCode::BAD_REQUEST
  } else {
    StatusCode::INTERNAL_SERVER_ERROR
  };

  let customers = match form_use_case.execute(None).await {
    Ok(form) => form.customers,
    Err(e) => {
      tracing::warn!(error = %e, "Failed to reload customers for invoice form");
      Vec::new()
    }
  };

  let mut context = tera::Context::new();
  context.insert("action", action);
  context.insert("submit_label", submit_label);
  context.insert("customers", &customers);
  context.insert("values", &InvoiceFormValues::from(fields));
  context.insert("errors", &result.errors);
  context.insert("message", &result.message);

  let body = templates.render("partials/invoice_form.html.tera", &context)?;

  Ok(html(status, body))
}

async fn action_response(
  outcome: ActionOutcome,
  templates: &TemplateEngine,
  form_use_case: &GetInvoiceFormUseCase,
  action: &str,
  submit_label: &str,
  fields: &FormFields,
) -> Result<HttpResponse, ApiError> {
  match outcome {
    ActionOutcome::Redirect(location) => Ok(
      HttpResponse::Ok()
        .insert_header(("HX-Redirect", location))
        .finish(),
    ),
    ActionOutcome::State(result) => {
      form_state_response(templates, form_use_case, action, submit_label, fields, result).await
    }
  }
}

// GET /dashboard/invoices - List latest invoices
pub async fn invoices_page(
  req: HttpRequest,
  templates: web::Data<TemplateEngine>,
  list_invoices_use_case: web::Data<Arc<ListInvoicesUseCase>>,
  page_cache: web::Data<Arc<dyn PageCache>>,
) -> Result<HttpResponse, ApiError> {
  let user = get_user(&req)?;

  let table = invoices_table(
    &templates,
    &list_invoices_use_case,
    page_cache.get_ref().as_ref(),
  )
  .await?;

  let mut context = tera::Context::new();
  context.insert("user", &user);
  context.insert("table", &table);

  let body = templates.render("pages/invoices.html.tera", &context)?;

  Ok(html(StatusCode::OK, body))
}

// GET /dashboard/invoices/create - Show invoice creation form
pub async fn invoice_create_page(
  req: HttpRequest,
  templates: web::Data<TemplateEngine>,
  form_use_case: web::Data<Arc<GetInvoiceFormUseCase>>,
) -> Result<HttpResponse, ApiError> {
  let user = get_user(&req)?;
  let form = form_use_case.execute(None).await?;

  let mut context = tera::Context::new();
  context.insert("user", &user);
  context.insert("action", CREATE_ACTION);
  context.insert("submit_label", CREATE_LABEL);
  context.insert("customers", &form.customers);
  context.insert("values", &InvoiceFormValues::default());

  let body = templates.render("pages/invoice_create.html.tera", &context)?;

  Ok(html(StatusCode::OK, body))
}

// POST /dashboard/invoices/create - Create invoice form action
pub async fn invoice_create_submit(
  body: web::Bytes,
  templates: web::Data<TemplateEngine>,
  create_use_case: web::Data<Arc<CreateInvoiceUseCase>>,
  form_use_case: web::Data<Arc<GetInvoiceFormUseCase>>,
) -> Result<HttpResponse, ApiError> {
  let fields = parse_form(&body)?;
  let outcome = create_use_case.execute(&fields).await;

  action_response(
    outcome,
    &templates,
    &form_use_case,
    CREATE_ACTION,
    CREATE_LABEL,
    &fields,
  )
  .await
}

// GET /dashboard/invoices/{id}/edit - Show invoice edit form
pub async fn invoice_edit_page(
  req: HttpRequest,
  path: web::Path<String>,
  templates: web::Data<TemplateEngine>,
  form_use_case: web::Data<Arc<GetInvoiceFormUseCase>>,
) -> Result<HttpResponse, ApiError> {
  let user = get_user(&req)?;
  let id = path.into_inner();

  let form = match form_use_case.execute(Some(&id)).await {
    Ok(form) => form,
    Err(InvoiceError::InvoiceNotFound(_)) => return not_found_page(&req, &templates),
    Err(e) => return Err(e.into()),
  };

  let mut context = tera::Context::new();
  context.insert("user", &user);
  context.insert("action", &edit_action(&id));
  context.insert("submit_label", EDIT_LABEL);
  context.insert("customers", &form.customers);
  context.insert("values", &form.invoice);

  let body = templates.render("pages/invoice_edit.html.tera", &context)?;

  Ok(html(StatusCode::OK, body))
}

// POST /dashboard/invoices/{id}/edit - Update invoice form action
pub async fn invoice_edit_submit(
  path: web::Path<String>,
  body: web::Bytes,
  templates: web::Data<TemplateEngine>,
  update_use_case: web::Data<Arc<UpdateInvoiceUseCase>>,
  form_use_case: web::Data<Arc<GetInvoiceFormUseCase>>,
) -> Result<HttpResponse, ApiError> {
  let id = path.into_inner();
  let fields = parse_form(&body)?;
  let outcome = update_use_case.execute(&id, &fields).await;

  action_response(
    outcome,
    &templates,
    &form_use_case,
    &edit_action(&id),
    EDIT_LABEL,
    &fields,
  )
  .await
}

// POST /dashboard/invoices/{id}/delete - Delete invoice form action
pub async fn invoice_delete(
  path: web::Path<String>,
  templates: web::Data<TemplateEngine>,
  delete_use_case: web::Data<Arc<DeleteInvoiceUseCase>>,
) -> Result<HttpResponse, ApiError> {
  let id = path.into_inner();
  let result = delete_use_case.execute(&id).await;

  let deleted = result.succeeded;

  let mut context = tera::Context::new();
  context.insert("success", &deleted);
  context.insert("message", &result.message);
  if deleted {
    context.insert("removed_id", &id);
  }

  let body = templates.render("partials/action_message.html.tera", &context)?;

  let status = if deleted {
    StatusCode::OK
  } else {
    StatusCode::INTERNAL_SERVER_ERROR
  };
  Ok(html(status, body))
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::auth::User;
  use crate::domain::invoice::ports::{
    MockCustomerRepository, MockInvoiceRepository, MockPageCache,
  };
  use crate::domain::invoice::{Customer, InvoiceService, InvoiceStatus, InvoiceSummary};
  use actix_web::{App, HttpMessage, dev::Service, test};
  use chrono::NaiveDate;

  const CUSTOMER_ID: &str = "3958dc9e-712f-4377-85e9-fec4b6a6442a";
  const INVOICE_ID: &str = "cc27c14a-0acf-4f4a-a6c9-d45682c144b9";

  fn customers() -> MockCustomerRepository {
    let mut repo = MockCustomerRepository::new();
    repo.expect_find_all().returning(|| {
      Ok(vec![Customer {
        id: CUSTOMER_ID.to_string(),
        name: "Lee Robinson".to_string(),
        email: "lee@robinson.com".to_string(),
        image_url: None,
      }])
    });
    repo
  }

  fn configure(
    invoices: MockInvoiceRepository,
    customers: MockCustomerRepository,
    cache: MockPageCache,
  ) -> impl FnOnce(&mut web::ServiceConfig) {
    move |cfg| {
      let service = Arc::new(InvoiceService::new(Arc::new(invoices), Arc::new(customers)));
      let page_cache: Arc<dyn PageCache> = Arc::new(cache);

      cfg
        .app_data(web::Data::new(TemplateEngine::new().unwrap()))
        .app_data(web::Data::new(Arc::new(ListInvoicesUseCase::new(
          service.clone(),
        ))))
        .app_data(web::Data::new(Arc::new(GetInvoiceFormUseCase::new(
          service.clone(),
        ))))
        .app_data(web::Data::new(Arc::new(CreateInvoiceUseCase::new(
          service.clone(),
          page_cache.clone(),
        ))))
        .app_data(web::Data::new(Arc::new(UpdateInvoiceUseCase::new(
          service.clone(),
          page_cache.clone(),
        ))))
        .app_data(web::Data::new(Arc::new(DeleteInvoiceUseCase::new(
          service,
          page_cache.clone(),
        ))))
        .app_data(web::Data::new(page_cache))
        .route("/dashboard/invoices", web::get().to(invoices_page))
        .route("/dashboard/invoices/create", web::get().to(invoice_create_page))
        .route("/dashboard/invoices/create", web::post().to(invoice_create_submit))
        .route("/dashboard/invoices/{id}/edit", web::get().to(invoice_edit_page))
        .route("/dashboard/invoices/{id}/edit", web::post().to(invoice_edit_submit))
        .route("/dashboard/invoices/{id}/delete", web::post().to(invoice_delete));
    }
  }

  macro_rules! signed_in_app {
    ($configure:expr) => {
      test::init_service(App::new().configure($configure).wrap_fn(|req, srv| {
        req.extensions_mut().insert(User::new(
          "User".to_string(),
          "user@nextmail.com".to_string(),
          "hash".to_string(),
        ));
        srv.call(req)
      }))
      .await
    };
  }

  fn form_post(uri: &str, body: &str) -> test::TestRequest {
    test::TestRequest::post()
      .uri(uri)
      .insert_header(("content-type", "application/x-www-form-urlencoded"))
      .set_payload(body.to_string())
  }

  async fn body_text(resp: actix_web::dev::ServiceResponse) -> String {
    String::from_utf8(test::read_body(resp).await.to_vec()).unwrap()
  }

  #[actix_web::test]
  async fn test_listing_served_from_cache() {
    let mut invoices = MockInvoiceRepository::new();
    invoices.expect_find_latest().never();
    let mut cache = MockPageCache::new();
    cache.expect_generation().return_const(4u64);
    cache
      .expect_get()
      .withf(|path, generation| path == INVOICES_PATH && *generation == 4)
      .returning(|_, _| Some(r#"<table id="cached-table"></table>"#.to_string()));
    cache.expect_put().never();

    let app = signed_in_app!(configure(invoices, MockCustomerRepository::new(), cache));
    let resp = test::call_service(
      &app,
      test::TestRequest::get().uri("/dashboard/invoices").to_request(),
    )
    .await;

    assert_eq!(resp.status(), StatusCode::OK);
    assert!(body_text(resp).await.contains(r#"<table id="cached-table">"#));
  }

  #[actix_web::test]
  async fn test_listing_cache_miss_renders_and_stores() {
    let mut invoices = MockInvoiceRepository::new();
    invoices.expect_find_latest().times(1).returning(|_| {
      Ok(vec![InvoiceSummary {
        id: INVOICE_ID.to_string(),
        customer_name: "Lee Robinson".to_string(),
        customer_email: "lee@robinson.com".to_string(),
        customer_image_url: None,
        amount_in_cents: 15795,
        status: InvoiceStatus::Pending,
        date: NaiveDate::from_ymd_opt(2023, 12, 6).unwrap(),
      }])
    });
    let mut cache = MockPageCache::new();
    cache.expect_generation().times(1).return_const(7u64);
    cache.expect_get().returning(|_, _| None);
    cache
      .expect_put()
      .withf(|path, generation, html| {
        path == INVOICES_PATH && *generation == 7 && html.contains("Lee Robinson")
      })
      .times(1)
      .return_const(());

    let app = signed_in_app!(configure(invoices, MockCustomerRepository::new(), cache));
    let resp = test::call_service(
      &app,
      test::TestRequest::get().uri("/dashboard/invoices").to_request(),
    )
    .await;

    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_text(resp).await;
    assert!(body.contains("$157.95"));
    assert!(body.contains("Dec 6, 2023"));
  }

  #[actix_web::test]
  async fn test_create_with_missing_fields_rerenders_form() {
    let mut invoices = MockInvoiceRepository::new();
    invoices.expect_create().never();
    let mut cache = MockPageCache::new();
    cache.expect_revalidate().never();

    let app = signed_in_app!(configure(invoices, customers(), cache));
    let resp = test::call_service(
      &app,
      form_post("/dashboard/invoices/create", "amount=-5").to_request(),
    )
    .await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body = body_text(resp).await;
    assert!(body.contains("Missing Fields. Failed to Create Invoice."));
    assert!(body.contains("Please select a customer."));
    assert!(body.contains("Please enter an amount greater than $0"));
    assert!(body.contains("Please select an invoice status."));
    assert!(body.contains(r#"value="-5""#));
  }

  #[actix_web::test]
  async fn test_create_success_redirects_to_listing() {
    let mut invoices = MockInvoiceRepository::new();
    invoices
      .expect_create()
      .withf(|record| record.amount_in_cents == 15795)
      .times(1)
      .returning(|_| Ok(()));
    let mut cache = MockPageCache::new();
    cache.expect_revalidate().times(1).return_const(());

    let app = signed_in_app!(configure(invoices, MockCustomerRepository::new(), cache));
    let resp = test::call_service(
      &app,
      form_post(
        "/dashboard/invoices/create",
        &format!("customerId={}&amount=157.95&status=pending", CUSTOMER_ID),
      )
      .to_request(),
    )
    .await;

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
      resp.headers().get("HX-Redirect").unwrap(),
      "/dashboard/invoices"
    );
  }

  #[actix_web::test]
  async fn test_update_failure_shows_database_message() {
    let mut invoices = MockInvoiceRepository::new();
    invoices
      .expect_update()
      .returning(|_| Err(InvoiceError::Repository("connection reset".into())));
    let mut cache = MockPageCache::new();
    cache.expect_revalidate().never();

    let app = signed_in_app!(configure(invoices, customers(), cache));
    let resp = test::call_service(
      &app,
      form_post(
        &format!("/dashboard/invoices/{}/edit", INVOICE_ID),
        &format!("customerId={}&amount=10&status=paid", CUSTOMER_ID),
      )
      .to_request(),
    )
    .await;

    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_text(resp).await;
    assert!(body.contains("Database Error: Failed to Update Invoice."));
    assert!(!body.contains("connection reset"));
  }

  #[actix_web::test]
  async fn test_create_failure_message_survives_customer_reload_failure() {
    let mut invoices = MockInvoiceRepository::new();
    invoices
      .expect_create()
      .returning(|_| Err(InvoiceError::Repository("connection refused".into())));
    let mut customers = MockCustomerRepository::new();
    customers
      .expect_find_all()
      .returning(|| Err(InvoiceError::Repository("connection refused".into())));
    let mut cache = MockPageCache::new();
    cache.expect_revalidate().never();

    let app = signed_in_app!(configure(invoices, customers, cache));
    let resp = test::call_service(
      &app,
      form_post(
        "/dashboard/invoices/create",
        &format!("customerId={}&amount=157.95&status=pending", CUSTOMER_ID),
      )
      .to_request(),
    )
    .await;

    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_text(resp).await;
    assert!(body.contains("Database Error: Failed to Create Invoice."));
    assert!(body.contains(r#"value="157.95""#));
    assert!(!body.contains("connection refused"));
  }

  #[actix_web::test]
  async fn test_edit_page_for_unknown_invoice_is_not_found() {
    let mut invoices = MockInvoiceRepository::new();
    invoices.expect_find_by_id().returning(|_| Ok(None));

    let app = signed_in_app!(configure(invoices, customers(), MockPageCache::new()));
    let resp = test::call_service(
      &app,
      test::TestRequest::get()
        .uri(&format!("/dashboard/invoices/{}/edit", INVOICE_ID))
        .to_request(),
    )
    .await;

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert!(body_text(resp).await.contains("404 Not Found"));
  }

  #[actix_web::test]
  async fn test_delete_reports_outcome() {
    let mut invoices = MockInvoiceRepository::new();
    invoices
      .expect_delete()
      .withf(|id| id == INVOICE_ID)
      .returning(|_| Ok(()));
    invoices
      .expect_delete()
      .withf(|id| id != INVOICE_ID)
      .returning(|_| Err(InvoiceError::Repository("gone".into())));
    let mut cache = MockPageCache::new();
    cache.expect_revalidate().times(1).return_const(());

    let app = signed_in_app!(configure(invoices, MockCustomerRepository::new(), cache));

    let resp = test::call_service(
      &app,
      form_post(&format!("/dashboard/invoices/{}/delete", INVOICE_ID), "").to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_text(resp).await;
    assert!(body.contains("Deleted Invoice."));
    assert!(body.contains(r#"hx-swap-oob="delete""#));

    let resp = test::call_service(
      &app,
      form_post("/dashboard/invoices/not-a-uuid/delete", "").to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body_text(resp).await.contains("Database Error: Failed to Delete Invoice."));
  }
}
