//! # REST API Interface Layer
//!
//! HTTP endpoints for the daybook. Each resource has its own router; the
//! handlers log the request, resolve the owner, call one domain service and
//! translate its errors into status codes.
//!
//! ## Error Translation
//!
//! - Malformed month, range, date or amount: 400 with the validation message
//! - Unknown or foreign record: 404
//! - Storage failure: 500 (`Could not load data` for aggregations)

pub mod blog_apis;
pub mod calendar_apis;
pub mod dashboard_apis;
pub mod errors;
pub mod event_apis;
pub mod finance_apis;
pub mod habit_apis;
pub mod owner;
pub mod task_apis;

pub use owner::Owner;
