//! Core business logic for the document portal.
//!
//! Services take an explicit [`RequestContext`] describing who is calling
//! and in which language; nothing here reads ambient session state.

pub mod context;
pub mod retry;
pub mod services;

pub use context::{CallerIdentity, Lang, RequestContext};
pub use retry::RetryPolicy;
pub use services::*;
