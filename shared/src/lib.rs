use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

// ---------------------------------------------------------------------------
// Records
//
// Every date below is a floating wall-clock value. It is never reinterpreted
// through a timezone: "done on the 5th" stays on the 5th.
// ---------------------------------------------------------------------------

/// A habit the user wants to repeat
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Habit {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub description: Option<String>,
    /// Free-form cadence label, `DAILY` unless the user picked something else
    pub frequency: String,
    /// CSS color used for the habit line and calendar chips
    pub color: String,
    pub created_at: NaiveDateTime,
}

/// One completion of a habit on one calendar day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HabitLog {
    pub id: String,
    pub habit_id: String,
    /// Denormalized from the owning habit for display
    pub habit_name: String,
    pub habit_color: String,
    pub date: NaiveDateTime,
    /// Always true when the row exists; absence means "not done"
    pub completed: bool,
}

/// Habit plus its recent completion logs, as listed on the habits page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HabitWithLogs {
    #[serde(flatten)]
    pub habit: Habit,
    pub logs: Vec<HabitLog>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    Pending,
    InProgress,
    Done,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "PENDING",
            TaskStatus::InProgress => "IN_PROGRESS",
            TaskStatus::Done => "DONE",
        }
    }
}

impl FromStr for TaskStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(TaskStatus::Pending),
            "IN_PROGRESS" => Ok(TaskStatus::InProgress),
            "DONE" => Ok(TaskStatus::Done),
            other => Err(format!("Unknown task status: {}", other)),
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskPriority {
    Low,
    #[default]
    Medium,
    High,
}

impl TaskPriority {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskPriority::Low => "LOW",
            TaskPriority::Medium => "MEDIUM",
            TaskPriority::High => "HIGH",
        }
    }
}

impl FromStr for TaskPriority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "LOW" => Ok(TaskPriority::Low),
            "MEDIUM" => Ok(TaskPriority::Medium),
            "HIGH" => Ok(TaskPriority::High),
            other => Err(format!("Unknown task priority: {}", other)),
        }
    }
}

impl fmt::Display for TaskPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub description: Option<String>,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    pub due_date: Option<NaiveDateTime>,
    /// Ordered, user-entered labels
    pub tags: Vec<String>,
    pub created_at: NaiveDateTime,
    /// Last modification; a DONE task counts as completed at this instant
    pub updated_at: NaiveDateTime,
}

/// A user-authored calendar marker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub description: Option<String>,
    pub date: NaiveDateTime,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Income {
    pub id: String,
    pub user_id: String,
    pub amount: f64,
    pub source: String,
    pub date: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    pub id: String,
    pub user_id: String,
    pub amount: f64,
    pub category: String,
    pub description: Option<String>,
    pub date: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Saving {
    pub id: String,
    pub user_id: String,
    pub amount: f64,
    pub purpose: String,
    pub date: NaiveDateTime,
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateHabitRequest {
    pub name: String,
    pub description: Option<String>,
    pub frequency: Option<String>,
    pub color: Option<String>,
}

/// Check-in for one calendar day.
///
/// Without `completed` the day is toggled; with it the day is set idempotently.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HabitCheckRequest {
    pub date: String,
    pub completed: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HabitCheckResponse {
    pub completed: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateTaskRequest {
    pub title: String,
    pub description: Option<String>,
    pub priority: Option<TaskPriority>,
    /// Floating date or date-time, e.g. `2025-06-14` or `2025-06-14T10:30:00`
    pub due_date: Option<String>,
    pub tags: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateTaskRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
    pub due_date: Option<String>,
    pub tags: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateEventRequest {
    pub title: String,
    pub date: String,
    pub color: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FinanceKind {
    Income,
    Expense,
    Saving,
}

impl FinanceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FinanceKind::Income => "income",
            FinanceKind::Expense => "expense",
            FinanceKind::Saving => "saving",
        }
    }
}

impl FromStr for FinanceKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "income" => Ok(FinanceKind::Income),
            "expense" => Ok(FinanceKind::Expense),
            "saving" => Ok(FinanceKind::Saving),
            other => Err(format!("Unknown finance type: {}", other)),
        }
    }
}

/// Budget entry form. `category` doubles as income source and saving purpose.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateFinanceRequest {
    #[serde(rename = "type")]
    pub kind: FinanceKind,
    pub amount: f64,
    pub category: String,
    pub description: Option<String>,
    pub date: String,
}

/// Income, expense or saving flattened into one budget-table row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinanceTransaction {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: FinanceKind,
    pub amount: f64,
    pub category: String,
    pub title: String,
    pub date: NaiveDateTime,
}

// ---------------------------------------------------------------------------
// Blog
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlogCategory {
    pub id: String,
    pub user_id: String,
    /// Unique per user
    pub name: String,
    pub color: String,
}

/// A reader's verdict on a post. A user holds at most one per post.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlogReaction {
    Like,
    Dislike,
}

impl BlogReaction {
    pub fn as_str(&self) -> &'static str {
        match self {
            BlogReaction::Like => "like",
            BlogReaction::Dislike => "dislike",
        }
    }
}

impl FromStr for BlogReaction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "like" => Ok(BlogReaction::Like),
            "dislike" => Ok(BlogReaction::Dislike),
            other => Err(format!("Unknown reaction: {}", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlogPost {
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub content: String,
    pub published: bool,
    pub tags: Vec<String>,
    pub category: Option<BlogCategory>,
    pub likes: u32,
    pub dislikes: u32,
    /// The requesting user's own reaction, if any
    pub reaction: Option<BlogReaction>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateBlogPostRequest {
    pub title: String,
    pub content: String,
    pub published: Option<bool>,
    pub tags: Option<Vec<String>>,
    /// Empty or `none` files the post under no category
    pub category_id: Option<String>,
}

/// Absent fields are left unchanged; `category_id` of `""` or `none` clears the category
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateBlogPostRequest {
    pub title: Option<String>,
    pub content: Option<String>,
    pub published: Option<bool>,
    pub tags: Option<Vec<String>>,
    pub category_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateBlogCategoryRequest {
    pub name: String,
    pub color: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateBlogCategoryRequest {
    pub name: Option<String>,
    pub color: Option<String>,
}

/// State of the caller's reaction after a like or dislike
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlogReactionResponse {
    pub liked: bool,
    pub disliked: bool,
}

impl From<Option<BlogReaction>> for BlogReactionResponse {
    fn from(reaction: Option<BlogReaction>) -> Self {
        Self {
            liked: reaction == Some(BlogReaction::Like),
            disliked: reaction == Some(BlogReaction::Dislike),
        }
    }
}

// ---------------------------------------------------------------------------
// Aggregated views
// ---------------------------------------------------------------------------

/// Entity kind of a calendar item. Declaration order is display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    Habit,
    Task,
    Event,
    Income,
    Expense,
    Saving,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarItem {
    pub id: String,
    pub title: String,
    pub kind: ItemKind,
    pub color: String,
    /// Record the item points back to (the habit, for habit completions)
    pub source_id: String,
}

/// One cell of the 7-column month grid
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarDay {
    pub date: NaiveDate,
    /// False for the leading/trailing days borrowed from neighbouring months
    pub in_month: bool,
    pub is_today: bool,
    pub items: Vec<CalendarItem>,
}

/// Raw per-kind records behind a calendar month, for kind-specific edit affordances
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CalendarRecords {
    pub habit_logs: Vec<HabitLog>,
    pub tasks: Vec<Task>,
    pub events: Vec<Event>,
    pub incomes: Vec<Income>,
    pub expenses: Vec<Expense>,
    pub savings: Vec<Saving>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryTotal {
    pub category: String,
    pub total: f64,
}

/// Habit persistence for one bucket
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HabitPoint {
    pub start: NaiveDateTime,
    pub label: String,
    pub completed: u32,
    pub total: u32,
    /// Whole percent of the roster completed in this bucket
    pub percentage: u32,
    /// 0 or 100 per tracked habit key
    pub tracked: BTreeMap<String, u32>,
}

/// Task completions for one bucket
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskPoint {
    pub start: NaiveDateTime,
    pub label: String,
    pub done: u32,
    pub high: u32,
    pub medium: u32,
    pub low: u32,
    pub rate: u32,
}

/// Budget trend for one bucket
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetPoint {
    pub start: NaiveDateTime,
    pub label: String,
    pub income: f64,
    pub expense: f64,
    pub savings: f64,
    /// income - expense for this bucket alone
    pub net: f64,
    pub cumulative_income: f64,
    pub cumulative_expense: f64,
    pub cumulative_savings: f64,
    /// cumulative_income - cumulative_expense
    pub cumulative_balance: f64,
}

/// Chart series aligned point-for-point with the bucket sequence
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChartSeries {
    pub habits: Vec<HabitPoint>,
    pub tasks: Vec<TaskPoint>,
    pub budget: Vec<BudgetPoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarMonthView {
    pub month: u32,
    pub year: i32,
    pub grid_start: NaiveDate,
    pub grid_end: NaiveDate,
    pub days: Vec<CalendarDay>,
    pub series: ChartSeries,
    pub expense_categories: Vec<CategoryTotal>,
    pub records: CalendarRecords,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DashboardRange {
    Day,
    #[default]
    Week,
    Month,
}

impl DashboardRange {
    pub fn as_str(&self) -> &'static str {
        match self {
            DashboardRange::Day => "day",
            DashboardRange::Week => "week",
            DashboardRange::Month => "month",
        }
    }
}

impl FromStr for DashboardRange {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "day" => Ok(DashboardRange::Day),
            "week" => Ok(DashboardRange::Week),
            "month" => Ok(DashboardRange::Month),
            other => Err(format!("Unknown dashboard range: {}", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardStats {
    /// Whole percent of habits checked in today
    pub habit_completion: u32,
    pub pending_tasks: u64,
    /// Month-to-date income minus expense
    pub monthly_savings: f64,
}

/// A habit that gets its own line on the persistence chart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackedHabit {
    pub id: String,
    pub name: String,
    /// Key used in `HabitPoint::tracked`
    pub key: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardView {
    pub range: DashboardRange,
    pub window_start: NaiveDateTime,
    pub window_end: NaiveDateTime,
    pub series: ChartSeries,
    pub expense_categories: Vec<CategoryTotal>,
    pub stats: DashboardStats,
    pub top_habits: Vec<TrackedHabit>,
}
