pub mod activity_repository;
pub mod blog_repository;
pub mod event_repository;
pub mod finance_repository;
pub mod habit_repository;
pub mod task_repository;

pub use activity_repository::ActivityRepository;
pub use blog_repository::BlogRepository;
pub use event_repository::EventRepository;
pub use finance_repository::FinanceRepository;
pub use habit_repository::HabitRepository;
pub use task_repository::TaskRepository;
