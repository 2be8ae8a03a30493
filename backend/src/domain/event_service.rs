//! Custom calendar events.
use shared::{CreateEventRequest, Event};
use tracing::info;
use uuid::Uuid;

use super::models::{RecordValidationError, ServiceError};
use super::validation::{optional_text, required_date, required_text};
use crate::storage::EventRepository;

pub const DEFAULT_EVENT_COLOR: &str = "#3b82f6";

#[derive(Clone)]
pub struct EventService {
    event_repository: EventRepository,
}

impl EventService {
    pub fn new(event_repository: EventRepository) -> Self {
        Self { event_repository }
    }

    pub async fn create_event(&self, owner: &str, request: CreateEventRequest) -> Result<Event, ServiceError> {
        let event = Event {
            id: Uuid::new_v4().to_string(),
            user_id: owner.to_string(),
            title: required_text(&request.title, "Title")?,
            description: optional_text(request.description, "Description")?,
            date: required_date(&request.date, "Date")?,
            color: optional_text(request.color, "Color")?
                .unwrap_or_else(|| DEFAULT_EVENT_COLOR.to_string()),
        };

        self.event_repository.store_event(&event).await?;
        info!("Created event {} on {} for {}", event.id, event.date, owner);
        Ok(event)
    }

    pub async fn delete_event(&self, owner: &str, event_id: &str) -> Result<(), ServiceError> {
        if event_id.trim().is_empty() {
            return Err(RecordValidationError::MissingField("Event ID").into());
        }
        if !self.event_repository.delete_event(owner, event_id).await? {
            return Err(ServiceError::NotFound("Event"));
        }
        info!("Deleted event {} for {}", event_id, owner);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::DbConnection;
    use chrono::NaiveDate;

    async fn setup() -> (EventService, EventRepository) {
        let db = DbConnection::init_test().await.expect("test database");
        let repository = EventRepository::new(db);
        (EventService::new(repository.clone()), repository)
    }

    fn request(title: &str, date: &str) -> CreateEventRequest {
        CreateEventRequest {
            title: title.to_string(),
            date: date.to_string(),
            color: None,
            description: None,
        }
    }

    #[tokio::test]
    async fn test_create_event_keeps_wall_clock() {
        let (service, repository) = setup().await;

        let event = service
            .create_event("u1", request("Concert", "2024-06-01T21:30:00-07:00"))
            .await
            .unwrap();
        assert_eq!(event.color, "#3b82f6");

        let day = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let stored = repository
            .list_between(
                "u1",
                day.and_hms_opt(0, 0, 0).unwrap(),
                day.and_hms_opt(23, 59, 59).unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].date, day.and_hms_opt(21, 30, 0).unwrap());
    }

    #[tokio::test]
    async fn test_create_event_requires_title_and_date() {
        let (service, _) = setup().await;

        assert!(matches!(
            service.create_event("u1", request("", "2024-06-01")).await,
            Err(ServiceError::Validation(RecordValidationError::MissingField("Title")))
        ));
        assert!(matches!(
            service.create_event("u1", request("Concert", "")).await,
            Err(ServiceError::Validation(RecordValidationError::MissingField("Date")))
        ));
    }

    #[tokio::test]
    async fn test_delete_event() {
        let (service, _) = setup().await;
        let event = service.create_event("u1", request("Concert", "2024-06-01")).await.unwrap();

        assert!(matches!(service.delete_event("u2", &event.id).await, Err(ServiceError::NotFound(_))));
        assert!(matches!(service.delete_event("u1", "").await, Err(ServiceError::Validation(_))));
        service.delete_event("u1", &event.id).await.unwrap();
        assert!(matches!(service.delete_event("u1", &event.id).await, Err(ServiceError::NotFound(_))));
    }
}
