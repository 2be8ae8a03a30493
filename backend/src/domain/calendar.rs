//! Calendar domain logic.
//!
//! Month arithmetic and the Sunday-start grid the calendar page renders. The
//! UI only lays out cells; which dates fill the grid and what each cell holds
//! is decided here.

use chrono::{Datelike, Duration, NaiveDate};
use shared::CalendarDay;
use tracing::debug;

use super::composer::CalendarIndex;
use super::models::MonthId;

/// Stateless calendar helpers
#[derive(Clone, Default)]
pub struct CalendarService;

impl CalendarService {
    pub fn new() -> Self {
        Self
    }

    /// Get the first day of month (0 = Sunday, 1 = Monday, etc.)
    pub fn first_day_of_month(&self, month: MonthId) -> u32 {
        month.first_day().weekday().num_days_from_sunday()
    }

    /// First and last date of the 7-column grid covering `month`.
    ///
    /// The grid starts on the Sunday on or before the 1st and ends on the
    /// Saturday on or after the last day, so it always holds whole weeks.
    pub fn grid_bounds(&self, month: MonthId) -> (NaiveDate, NaiveDate) {
        let first = month.first_day();
        let last = month.last_day();
        let lead = i64::from(self.first_day_of_month(month));
        let trail = 6 - i64::from(last.weekday().num_days_from_sunday());
        (first - Duration::days(lead), last + Duration::days(trail))
    }

    /// One cell per grid date with its merged items
    pub fn generate_grid(&self, month: MonthId, today: NaiveDate, index: &CalendarIndex) -> Vec<CalendarDay> {
        let (grid_start, grid_end) = self.grid_bounds(month);
        debug!("Generating calendar grid for {}: {} to {}", month, grid_start, grid_end);

        grid_start
            .iter_days()
            .take_while(|date| *date <= grid_end)
            .map(|date| CalendarDay {
                date,
                in_month: date.month() == month.month() && date.year() == month.year(),
                is_today: date == today,
                items: index.for_day(date),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::ActivitySnapshot;
    use shared::{Event, ItemKind};

    fn month(y: i32, m: u32) -> MonthId {
        MonthId::new(y, m).unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_first_day_of_month() {
        let service = CalendarService::new();

        assert_eq!(service.first_day_of_month(month(2024, 9)), 0); // Sunday
        assert_eq!(service.first_day_of_month(month(2024, 2)), 4); // Thursday
    }

    #[test]
    fn test_grid_bounds_cover_whole_weeks() {
        let service = CalendarService::new();

        // February 2024: Thu 1st to Thu 29th
        let (start, end) = service.grid_bounds(month(2024, 2));
        assert_eq!(start, date(2024, 1, 28));
        assert_eq!(end, date(2024, 3, 2));

        // September 2024 starts on a Sunday
        let (start, end) = service.grid_bounds(month(2024, 9));
        assert_eq!(start, date(2024, 9, 1));
        assert_eq!(end, date(2024, 10, 5));
    }

    #[test]
    fn test_generate_grid() {
        let service = CalendarService::new();
        let snapshot = ActivitySnapshot {
            events: vec![Event {
                id: "ev1".to_string(),
                user_id: "u1".to_string(),
                title: "Standup".to_string(),
                description: None,
                date: date(2024, 2, 14).and_hms_opt(9, 0, 0).unwrap(),
                color: "#3b82f6".to_string(),
            }],
            ..Default::default()
        };
        let index = CalendarIndex::build(&snapshot);

        let days = service.generate_grid(month(2024, 2), date(2024, 2, 20), &index);

        assert_eq!(days.len(), 35);
        assert_eq!(days.len() % 7, 0);
        assert!(!days[0].in_month);
        assert!(days[4].in_month);
        assert_eq!(days[4].date, date(2024, 2, 1));

        let valentines = days.iter().find(|d| d.date == date(2024, 2, 14)).unwrap();
        assert_eq!(valentines.items.len(), 1);
        assert_eq!(valentines.items[0].kind, ItemKind::Event);

        let today: Vec<_> = days.iter().filter(|d| d.is_today).collect();
        assert_eq!(today.len(), 1);
        assert_eq!(today[0].date, date(2024, 2, 20));
    }
}
