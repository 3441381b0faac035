//! HTTP-facing helpers shared by REST modules.

pub mod identity;
pub mod problem;
pub mod query;
pub mod response;

pub use identity::{CallerId, CALLER_ID_HEADER};
pub use problem::{unauthorized, Problem, ProblemResponse};
pub use query::{query_error_to_problem, ListQuery};
