//! Todo tasks.
use chrono::Local;
use shared::{CreateTaskRequest, Task, TaskStatus, UpdateTaskRequest};
use tracing::info;
use uuid::Uuid;

use super::models::ServiceError;
use super::validation::{clean_tags, optional_date, optional_text, required_text};
use crate::storage::TaskRepository;

#[derive(Clone)]
pub struct TaskService {
    task_repository: TaskRepository,
}

impl TaskService {
    pub fn new(task_repository: TaskRepository) -> Self {
        Self { task_repository }
    }

    /// Newest first
    pub async fn list_tasks(&self, owner: &str) -> Result<Vec<Task>, ServiceError> {
        Ok(self.task_repository.list_tasks(owner).await?)
    }

    pub async fn create_task(&self, owner: &str, request: CreateTaskRequest) -> Result<Task, ServiceError> {
        let now = Local::now().naive_local();
        let task = Task {
            id: Uuid::new_v4().to_string(),
            user_id: owner.to_string(),
            title: required_text(&request.title, "Title")?,
            description: optional_text(request.description, "Description")?,
            status: TaskStatus::Pending,
            priority: request.priority.unwrap_or_default(),
            due_date: optional_date(request.due_date.as_deref())?,
            tags: clean_tags(request.tags.unwrap_or_default()),
            created_at: now,
            updated_at: now,
        };

        self.task_repository.store_task(&task).await?;
        info!("Created task {} for {}", task.id, owner);
        Ok(task)
    }

    /// Apply the provided fields. Every update refreshes `updated_at`, which is
    /// what the completion charts bucket DONE tasks by.
    pub async fn update_task(
        &self,
        owner: &str,
        task_id: &str,
        request: UpdateTaskRequest,
    ) -> Result<Task, ServiceError> {
        let mut task = self
            .task_repository
            .get_task(owner, task_id)
            .await?
            .ok_or(ServiceError::NotFound("Task"))?;

        if let Some(title) = request.title {
            task.title = required_text(&title, "Title")?;
        }
        if request.description.is_some() {
            task.description = optional_text(request.description, "Description")?;
        }
        if let Some(status) = request.status {
            task.status = status;
        }
        if let Some(priority) = request.priority {
            task.priority = priority;
        }
        // An empty due date leaves the existing one in place
        if let Some(due_date) = optional_date(request.due_date.as_deref())? {
            task.due_date = Some(due_date);
        }
        if let Some(tags) = request.tags {
            task.tags = clean_tags(tags);
        }
        task.updated_at = Local::now().naive_local();

        if !self.task_repository.update_task(&task).await? {
            return Err(ServiceError::NotFound("Task"));
        }
        info!("Updated task {} ({})", task.id, task.status);
        Ok(task)
    }

    pub async fn delete_task(&self, owner: &str, task_id: &str) -> Result<(), ServiceError> {
        if !self.task_repository.delete_task(owner, task_id).await? {
            return Err(ServiceError::NotFound("Task"));
        }
        info!("Deleted task {} for {}", task_id, owner);
        Ok(())
    }
}
