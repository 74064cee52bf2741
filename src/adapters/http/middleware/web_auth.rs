use actix_web::{
  Error, HttpMessage, HttpResponse,
  body::EitherBody,
  dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready},
};
use futures_util::future::LocalBoxFuture;
use std::{future::ready, rc::Rc, sync::Arc};

use crate::domain::auth::{AuthService, SessionToken};

pub const SESSION_COOKIE: &str = "session_token";

/// Cookie-session guard for the dashboard
///
/// A valid session puts the signed-in `User` into request extensions.
/// Anything else is sent to `/login?redirectTo=<path>`; HTMX requests get an
/// `HX-Redirect` instead of a 302 so the whole page navigates.
pub struct WebAuthMiddleware {
  auth_service: Arc<AuthService>,
}

impl WebAuthMiddleware {
  pub fn new(auth_service: Arc<AuthService>) -> Self {
    Self { auth_service }
  }
}

impl<S, B> Transform<S, ServiceRequest> for WebAuthMiddleware
where
  S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
  S::Future: 'static,
  B: 'static,
{
  type Response = ServiceResponse<EitherBody<B>>;
  type Error = Error;
  type InitError = ();
  type Transform = WebAuthMiddlewareService<S>;
  type Future = std::future::Ready<Result<Self::Transform, Self::InitError>>;

  fn new_transform(&self, service: S) -> Self::Future {
    ready(Ok(WebAuthMiddlewareService {
      service: Rc::new(service),
      auth_service: self.auth_service.clone(),
    }))
  }
}

pub struct WebAuthMiddlewareService<S> {
  service: Rc<S>,
  auth_service: Arc<AuthService>,
}

impl<S, B> Service<ServiceRequest> for WebAuthMiddlewareService<S>
where
  S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
  S::Future: 'static,
  B: 'static,
{
  type Response = ServiceResponse<EitherBody<B>>;
  type Error = Error;
  type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

  forward_ready!(service);

  fn call(&self, req: ServiceRequest) -> Self::Future {
    let token = req
      .cookie(SESSION_COOKIE)
      .and_then(|c| SessionToken::from_string(c.value()).ok());

    let auth_service = self.auth_service.clone();
    let service = Rc::clone(&self.service);

    Box::pin(async move {
      let user = match token {
        Some(token) => match auth_service.validate_session(&token).await {
          Ok(user) => Some(user),
          Err(e) => {
            tracing::debug!(error = %e, "Rejected dashboard session");
            None
          }
        },
        None => None,
      };

      match user {
        Some(user) => {
          req.extensions_mut().insert(user);
          let res = service.call(req).await?;
          Ok(res.map_into_left_body())
        }
        None => {
          let response = login_redirect(&req);
          Ok(req.into_response(response).map_into_right_body())
        }
      }
    })
  }
}

fn login_redirect(req: &ServiceRequest) -> HttpResponse {
  let query = serde_urlencoded::to_string([("redirectTo", req.path())]).unwrap_or_default();
  let location = format!("/login?{}", query);

  if req.headers().contains_key("HX-Request") {
    HttpResponse::Ok()
      .insert_header(("HX-Redirect", location))
      .finish()
  } else {
    HttpResponse::Found()
      .insert_header(("Location", location))
      .finish()
  }
}
