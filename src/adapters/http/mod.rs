pub mod dtos;
pub mod errors;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod templates;

// Re-export commonly used types
pub use dtos::{InvoiceFormValues, LoginFormData, LoginPageQuery};
pub use errors::ApiError;
pub use handlers::web_auth::SessionCookieSettings;
pub use middleware::{RequestId, RequestIdMiddleware, SESSION_COOKIE, WebAuthMiddleware};
pub use routes::{LoginRateLimit, WebRouteDependencies, configure_web_routes};
pub use templates::TemplateEngine;
