//! Habit roster and daily check-ins.
use chrono::{Duration, Local, NaiveDate, NaiveTime};
use shared::{CreateHabitRequest, Habit, HabitCheckRequest, HabitCheckResponse, HabitLog, HabitWithLogs};
use std::collections::HashMap;
use tracing::info;
use uuid::Uuid;

use super::models::ServiceError;
use super::validation::{optional_text, required_date, required_text};
use crate::storage::HabitRepository;

pub const DEFAULT_FREQUENCY: &str = "DAILY";
pub const DEFAULT_HABIT_COLOR: &str = "#a855f7";

/// Days of logs returned with each habit in the roster listing
const RECENT_LOG_DAYS: i64 = 7;

#[derive(Clone)]
pub struct HabitService {
    habit_repository: HabitRepository,
}

impl HabitService {
    pub fn new(habit_repository: HabitRepository) -> Self {
        Self { habit_repository }
    }

    /// Newest habit first, each with its logs from the last week up to `today`
    pub async fn list_habits(&self, owner: &str, today: NaiveDate) -> Result<Vec<HabitWithLogs>, ServiceError> {
        let habits = self.habit_repository.list_habits(owner).await?;

        let end = today.and_time(NaiveTime::MIN) + Duration::days(1);
        let start = end - Duration::days(RECENT_LOG_DAYS);
        let mut logs_by_habit: HashMap<String, Vec<HabitLog>> = HashMap::new();
        for log in self.habit_repository.list_logs_between(owner, start, end).await? {
            logs_by_habit.entry(log.habit_id.clone()).or_default().push(log);
        }

        Ok(habits
            .into_iter()
            .rev()
            .map(|habit| {
                let logs = logs_by_habit.remove(&habit.id).unwrap_or_default();
                HabitWithLogs { habit, logs }
            })
            .collect())
    }

    pub async fn create_habit(&self, owner: &str, request: CreateHabitRequest) -> Result<Habit, ServiceError> {
        let name = required_text(&request.name, "Name")?;
        let habit = Habit {
            id: Uuid::new_v4().to_string(),
            user_id: owner.to_string(),
            name,
            description: optional_text(request.description, "Description")?,
            frequency: optional_text(request.frequency, "Frequency")?
                .unwrap_or_else(|| DEFAULT_FREQUENCY.to_string()),
            color: optional_text(request.color, "Color")?
                .unwrap_or_else(|| DEFAULT_HABIT_COLOR.to_string()),
            created_at: Local::now().naive_local(),
        };

        self.habit_repository.store_habit(&habit).await?;
        info!("Created habit {} for {}", habit.id, owner);
        Ok(habit)
    }

    /// Remove a habit together with all of its logs
    pub async fn delete_habit(&self, owner: &str, habit_id: &str) -> Result<(), ServiceError> {
        if !self.habit_repository.delete_habit(owner, habit_id).await? {
            return Err(ServiceError::NotFound("Habit"));
        }
        info!("Deleted habit {} for {}", habit_id, owner);
        Ok(())
    }

    /// Toggle (or set, when `completed` is given) the habit's log for the
    /// calendar day of the requested date.
    pub async fn check_in(
        &self,
        owner: &str,
        habit_id: &str,
        request: HabitCheckRequest,
    ) -> Result<HabitCheckResponse, ServiceError> {
        let date = required_date(&request.date, "Date")?;

        if self.habit_repository.get_habit(owner, habit_id).await?.is_none() {
            return Err(ServiceError::NotFound("Habit"));
        }

        let log_id = Uuid::new_v4().to_string();
        let completed = match request.completed {
            Some(completed) => self.habit_repository.set_log(habit_id, &log_id, date, completed).await?,
            None => self.habit_repository.toggle_log(habit_id, &log_id, date).await?,
        };

        info!("Habit {} on {}: completed={}", habit_id, date.date(), completed);
        Ok(HabitCheckResponse { completed })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::RecordValidationError;
    use crate::storage::DbConnection;

    async fn setup() -> (HabitService, HabitRepository) {
        let db = DbConnection::init_test().await.expect("test database");
        let repository = HabitRepository::new(db);
        (HabitService::new(repository.clone()), repository)
    }

    fn create_request(name: &str) -> CreateHabitRequest {
        CreateHabitRequest {
            name: name.to_string(),
            description: None,
            frequency: None,
            color: None,
        }
    }

    fn check(date: &str, completed: Option<bool>) -> HabitCheckRequest {
        HabitCheckRequest {
            date: date.to_string(),
            completed,
        }
    }

    #[tokio::test]
    async fn test_create_habit_applies_defaults() {
        let (service, _) = setup().await;

        let habit = service.create_habit("u1", create_request("  Drink water ")).await.unwrap();

        assert_eq!(habit.name, "Drink water");
        assert_eq!(habit.frequency, "DAILY");
        assert_eq!(habit.color, "#a855f7");
        assert_eq!(habit.user_id, "u1");
    }

    #[tokio::test]
    async fn test_create_habit_requires_name() {
        let (service, _) = setup().await;

        let result = service.create_habit("u1", create_request("")).await;
        assert!(matches!(
            result,
            Err(ServiceError::Validation(RecordValidationError::MissingField("Name")))
        ));
    }

    #[tokio::test]
    async fn test_check_in_toggles_per_day() {
        let (service, repository) = setup().await;
        let habit = service.create_habit("u1", create_request("Read")).await.unwrap();

        let first = service.check_in("u1", &habit.id, check("2024-01-15T08:00:00", None)).await.unwrap();
        assert!(first.completed);

        // Same calendar day, different time and offset: still the same log
        let second = service
            .check_in("u1", &habit.id, check("2024-01-15T23:30:00-05:00", None))
            .await
            .unwrap();
        assert!(!second.completed);
        assert_eq!(repository.count_logs(&habit.id).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_explicit_check_in_is_idempotent() {
        let (service, repository) = setup().await;
        let habit = service.create_habit("u1", create_request("Read")).await.unwrap();

        for _ in 0..3 {
            let response = service
                .check_in("u1", &habit.id, check("2024-01-15", Some(true)))
                .await
                .unwrap();
            assert!(response.completed);
        }
        assert_eq!(repository.count_logs(&habit.id).await.unwrap(), 1);

        let cleared = service
            .check_in("u1", &habit.id, check("2024-01-15", Some(false)))
            .await
            .unwrap();
        assert!(!cleared.completed);
        assert_eq!(repository.count_logs(&habit.id).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_check_in_rejects_foreign_or_unknown_habit() {
        let (service, _) = setup().await;
        let habit = service.create_habit("u1", create_request("Read")).await.unwrap();

        let foreign = service.check_in("u2", &habit.id, check("2024-01-15", None)).await;
        assert!(matches!(foreign, Err(ServiceError::NotFound("Habit"))));

        let bad_date = service.check_in("u1", &habit.id, check("someday", None)).await;
        assert!(matches!(
            bad_date,
            Err(ServiceError::Validation(RecordValidationError::InvalidDate(_)))
        ));
    }

    #[tokio::test]
    async fn test_list_habits_newest_first_with_recent_logs() {
        let (service, repository) = setup().await;
        let older = service.create_habit("u1", create_request("Older")).await.unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        let newer = service.create_habit("u1", create_request("Newer")).await.unwrap();

        let today = NaiveDate::from_ymd_opt(2024, 3, 10).unwrap();
        service.check_in("u1", &older.id, check("2024-03-10T07:00:00", None)).await.unwrap();
        service.check_in("u1", &older.id, check("2024-03-04", None)).await.unwrap();
        // Eight days back: outside the listing window
        service.check_in("u1", &older.id, check("2024-03-02", None)).await.unwrap();
        assert_eq!(repository.count_logs(&older.id).await.unwrap(), 3);

        let listed = service.list_habits("u1", today).await.unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].habit.id, newer.id);
        assert_eq!(listed[1].habit.id, older.id);
        assert_eq!(listed[1].logs.len(), 2);
        assert!(listed[0].logs.is_empty());
    }

    #[tokio::test]
    async fn test_delete_habit() {
        let (service, _) = setup().await;
        let habit = service.create_habit("u1", create_request("Read")).await.unwrap();

        assert!(matches!(service.delete_habit("u2", &habit.id).await, Err(ServiceError::NotFound(_))));
        service.delete_habit("u1", &habit.id).await.unwrap();
        assert!(service.list_habits("u1", Local::now().date_naive()).await.unwrap().is_empty());
    }
}
