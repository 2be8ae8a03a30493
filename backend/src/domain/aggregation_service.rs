//! Unified temporal aggregation.
//!
//! Given an owner and a window, fans out the six range reads concurrently,
//! joins them into one `ActivitySnapshot`, then buckets and composes the
//! calendar month view or the dashboard view. Nothing is cached; every call
//! recomputes from the storage.

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use shared::{CalendarMonthView, CalendarRecords, DashboardRange, DashboardView};
use std::sync::Arc;
use tracing::{error, info};

use super::bucketing::{fold, BucketPlan};
use super::calendar::CalendarService;
use super::composer::{chart_series, expense_breakdown, tracked_habits, CalendarIndex, LabelStyle};
use super::floating_time::month_start;
use super::models::{ActivitySnapshot, AggregationError, MonthId, TimeWindow, WindowError};
use super::statistics::dashboard_stats;
use crate::storage::ActivityStorage;

pub struct AggregationService<S: ActivityStorage> {
    storage: Arc<S>,
    calendar: CalendarService,
}

impl<S: ActivityStorage> Clone for AggregationService<S> {
    fn clone(&self) -> Self {
        Self {
            storage: Arc::clone(&self.storage),
            calendar: self.calendar.clone(),
        }
    }
}

impl<S: ActivityStorage> AggregationService<S> {
    pub fn new(storage: Arc<S>) -> Self {
        Self {
            storage,
            calendar: CalendarService::new(),
        }
    }

    /// Read every stream for `[start, end)` concurrently.
    ///
    /// The first failing read fails the whole snapshot.
    pub async fn load_snapshot(
        &self,
        owner: &str,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<ActivitySnapshot, AggregationError> {
        let storage = self.storage.as_ref();
        let (habits, habit_logs, tasks_due, tasks_completed, events, incomes, expenses, savings, open_tasks) = tokio::try_join!(
            storage.list_habits(owner),
            storage.habit_logs_between(owner, start, end),
            storage.tasks_due_between(owner, start, end),
            storage.tasks_completed_between(owner, start, end),
            storage.events_between(owner, start, end),
            storage.incomes_between(owner, start, end),
            storage.expenses_between(owner, start, end),
            storage.savings_between(owner, start, end),
            storage.count_open_tasks(owner),
        )
        .map_err(|e| {
            error!("Failed to load activity for {} between {} and {}: {:#}", owner, start, end, e);
            AggregationError::Storage(e)
        })?;

        Ok(ActivitySnapshot {
            habits,
            habit_logs,
            tasks_due,
            tasks_completed,
            events,
            incomes,
            expenses,
            savings,
            open_tasks,
        })
    }

    /// Calendar page data for one month, over its Sunday-start grid
    pub async fn calendar_month(
        &self,
        owner: &str,
        month: MonthId,
        today: NaiveDate,
    ) -> Result<CalendarMonthView, AggregationError> {
        info!("Building calendar for {} ({})", month, owner);

        let (grid_start, grid_end) = self.calendar.grid_bounds(month);
        let grid = TimeWindow::days(grid_start, grid_end)?;
        let in_month = TimeWindow::days(month.first_day(), month.last_day())?;

        let snapshot = self.load_snapshot(owner, grid.start(), grid.end_exclusive()).await?;

        let tracked = tracked_habits(&snapshot.habits);
        let plan = BucketPlan::for_window(&grid);
        let figures = fold(&plan, &snapshot, &tracked);
        let series = chart_series(&figures, LabelStyle::MonthDay);
        let expense_categories = expense_breakdown(&snapshot.expenses, &in_month);

        let index = CalendarIndex::build(&snapshot);
        let days = self.calendar.generate_grid(month, today, &index);

        let ActivitySnapshot {
            habit_logs,
            tasks_due,
            events,
            incomes,
            expenses,
            savings,
            ..
        } = snapshot;

        Ok(CalendarMonthView {
            month: month.month(),
            year: month.year(),
            grid_start,
            grid_end,
            days,
            series,
            expense_categories,
            records: CalendarRecords {
                habit_logs,
                tasks: tasks_due,
                events,
                incomes,
                expenses,
                savings,
            },
        })
    }

    /// Dashboard charts and header stats for a trailing range ending at `now`
    pub async fn dashboard(
        &self,
        owner: &str,
        range: DashboardRange,
        now: NaiveDateTime,
    ) -> Result<DashboardView, AggregationError> {
        info!("Building {} dashboard for {}", range.as_str(), owner);

        let today = now.date();
        let (window, style) = window_for_range(range, today)?;

        // One fetch serves both the chart window and the month-to-date stats
        let end_of_today = today.and_time(NaiveTime::MIN) + Duration::days(1);
        let fetch_start = window.start().min(month_start(today));
        let fetch_end = window.end_exclusive().max(end_of_today);
        let snapshot = self.load_snapshot(owner, fetch_start, fetch_end).await?;

        let top_habits = tracked_habits(&snapshot.habits);
        let plan = BucketPlan::for_window(&window);
        let figures = fold(&plan, &snapshot, &top_habits);

        Ok(DashboardView {
            range,
            window_start: window.start(),
            window_end: window.end_exclusive(),
            series: chart_series(&figures, style),
            expense_categories: expense_breakdown(&snapshot.expenses, &window),
            stats: dashboard_stats(&snapshot, today),
            top_habits,
        })
    }
}

/// Chart window and axis labels for a dashboard range ending `today`
pub fn window_for_range(range: DashboardRange, today: NaiveDate) -> Result<(TimeWindow, LabelStyle), WindowError> {
    match range {
        DashboardRange::Day => Ok((TimeWindow::hours_of(today), LabelStyle::Hour)),
        DashboardRange::Week => Ok((TimeWindow::trailing_days(today, 7)?, LabelStyle::Weekday)),
        DashboardRange::Month => Ok((TimeWindow::trailing_days(today, 30)?, LabelStyle::MonthDay)),
    }
}
