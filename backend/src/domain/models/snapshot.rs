use shared::{Event, Expense, Habit, HabitLog, Income, Saving, Task};

/// Everything one aggregation request read from storage.
///
/// Built once per request by the fan-out loader and consumed by the bucketing
/// engine, the view composer and the statistics. Never cached.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ActivitySnapshot {
    pub habits: Vec<Habit>,
    pub habit_logs: Vec<HabitLog>,
    /// Tasks by due date (calendar items)
    pub tasks_due: Vec<Task>,
    /// DONE tasks by last modification (completion charts)
    pub tasks_completed: Vec<Task>,
    pub events: Vec<Event>,
    pub incomes: Vec<Income>,
    pub expenses: Vec<Expense>,
    pub savings: Vec<Saving>,
    pub open_tasks: u64,
}
