//! Authorization guard.
//!
//! Every state-mutating operation declares a [`Policy`]; the guard evaluates it
//! against the caller before any status, temporal or numeric check runs.

pub mod error;
pub mod guard;
pub mod policy;

pub use error::AuthError;
pub use guard::{AuthorizationGuard, Caller, CallerContext};
pub use policy::Policy;
