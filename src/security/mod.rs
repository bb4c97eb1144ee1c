//! Security validator boundary
//!
//! Checks are fire-and-forget: [`SecurityCheckDispatcher`] hands them to
//! background workers, and the verdict arrives later through account
//! activation.

pub mod dispatcher;
pub mod validator;

pub use dispatcher::SecurityCheckDispatcher;
pub use validator::{HttpSecurityValidator, SecurityValidator, ValidationRequest};
