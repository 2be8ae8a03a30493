//! # Domain Module
//!
//! Business logic for the daybook: the unified temporal aggregator behind the
//! calendar and dashboard pages, plus the thin record services used by the
//! habit, todo, event, budget and blog screens.
//!
//! ## Module Organization
//!
//! - **models**: Windows, month ids, the fetched snapshot and the error types
//! - **floating_time**: Parsing client dates as floating wall-clock values
//! - **bucketing**: Bucket plans and the per-kind fold
//! - **composer**: Calendar item lists, chart series and expense breakdowns
//! - **statistics**: Dashboard header figures
//! - **calendar**: Month arithmetic and the Sunday-start grid
//! - **aggregation_service**: Concurrent reads joined into calendar and dashboard views
//! - **habit_service**, **task_service**, **event_service**, **finance_service**: Record CRUD
//! - **blog_service**: Posts, categories and like/dislike reactions
//!
//! ## Business Rules
//!
//! - Dates are floating: a record stays on the calendar day it was authored on
//! - A habit has at most one log per calendar day
//! - Every bucket of a window is present in every series, zero-filled
//! - Any failed read fails the whole aggregation; there are no partial views
//! - The aggregator is always given an explicit owner

pub mod aggregation_service;
pub mod blog_service;
pub mod bucketing;
pub mod calendar;
pub mod composer;
pub mod event_service;
pub mod finance_service;
pub mod floating_time;
pub mod habit_service;
pub mod models;
pub mod statistics;
pub mod task_service;
pub mod validation;

pub use aggregation_service::AggregationService;
pub use blog_service::BlogService;
pub use calendar::CalendarService;
pub use event_service::EventService;
pub use finance_service::FinanceService;
pub use habit_service::HabitService;
pub use task_service::TaskService;
