pub mod invoices_web;
pub mod pages;
pub mod web_auth;

use actix_web::{HttpMessage, HttpRequest, HttpResponse, http::StatusCode, web::Bytes};

use crate::adapters::http::errors::ApiError;
use crate::domain::auth::{AuthErrorKind, User};
use crate::domain::invoice::FormFields;

/// Extract authenticated user from request extensions
pub fn get_user(req: &HttpRequest) -> Result<User, ApiError> {
  let user = req.extensions().get::<User>().cloned();

  if user.is_none() {
    tracing::warn!(
      "get_user: User not found in request extensions for path {}",
      req.path()
    );
  }

  user.ok_or(ApiError::Auth(AuthErrorKind::SessionRequired))
}

/// Decodes an `application/x-www-form-urlencoded` body keeping repeated keys
pub fn parse_form(body: &Bytes) -> Result<FormFields, ApiError> {
  serde_urlencoded::from_bytes::<Vec<(String, String)>>(body)
    .map(FormFields::new)
    .map_err(|e| ApiError::Validation(format!("Malformed form body: {}", e)))
}

/// Extract IP address from request
pub fn extract_ip_address(req: &HttpRequest) -> Option<std::net::IpAddr> {
  req
    .connection_info()
    .realip_remote_addr()
    .and_then(|addr| addr.parse().ok())
}

/// Extract User-Agent from request
pub fn extract_user_agent(req: &HttpRequest) -> Option<String> {
  req
    .headers()
    .get("user-agent")
    .and_then(|h| h.to_str().ok())
    .map(|s| s.to_string())
}

pub fn html(status: StatusCode, body: String) -> HttpResponse {
  HttpResponse::build(status)
    .content_type("text/html; charset=utf-8")
    .body(body)
}

#[cfg(test)]
mod tests {
  use super::*;
  use actix_web::test::TestRequest;

  #[test]
  fn test_parse_form_keeps_repeated_keys() {
    let body = Bytes::from_static(b"customerId=abc&amount=12.50&amount=99&status=paid");
    let fields = parse_form(&body).unwrap();

    assert_eq!(fields.get("customerId"), Some("abc"));
    assert_eq!(fields.get("amount"), Some("12.50"));
    assert_eq!(fields.get("missing"), None);
  }

  #[test]
  fn test_parse_form_empty_body() {
    let fields = parse_form(&Bytes::new()).unwrap();
    assert_eq!(fields, FormFields::default());
  }

  #[test]
  fn test_get_user_without_session() {
    let req = TestRequest::default().to_http_request();
    assert!(matches!(
      get_user(&req),
      Err(ApiError::Auth(AuthErrorKind::SessionRequired))
    ));
  }

  #[test]
  fn test_request_metadata_extraction() {
    let req = TestRequest::default()
      .insert_header(("user-agent", "Mozilla/5.0"))
      .peer_addr("10.1.2.3:4567".parse().unwrap())
      .to_http_request();

    assert_eq!(extract_user_agent(&req).as_deref(), Some("Mozilla/5.0"));
    assert_eq!(
      extract_ip_address(&req),
      Some("10.1.2.3".parse().unwrap())
    );
  }
}
