//! # Storage Module
//!
//! SQLite persistence through SQLx. Each entity family has a repository that
//! owns its SQL; `ActivityRepository` bundles the read side behind the
//! `ActivityStorage` trait used by the aggregation services.
//!
//! All date columns hold floating wall-clock text (`YYYY-MM-DD HH:MM:SS`), so
//! range filters compare calendar values exactly as authored.

pub mod connection;
pub mod repositories;
pub mod traits;

pub use connection::DbConnection;
pub use repositories::{
    ActivityRepository,
    BlogRepository,
    EventRepository,
    FinanceRepository,
    HabitRepository,
    TaskRepository,
};
pub use traits::ActivityStorage;
