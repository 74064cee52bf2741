//! Authentication use cases

mod authenticate;
mod sign_out;

pub use authenticate::{
  AuthenticateCommand, AuthenticateOutcome, AuthenticateUseCase, DEFAULT_REDIRECT,
};
pub use sign_out::SignOutUseCase;
