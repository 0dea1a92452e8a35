mod args;
mod diff;
mod error;
mod order;
pub mod parser;
mod service;
mod types;

pub use args::{create_args, run_request};
pub use diff::{Decision, Drift, decide, diff};
pub use error::{OrderError, ParseError, ReconcileError};
pub use order::dependency_order;
pub use service::Reconciler;
pub use types::*;
