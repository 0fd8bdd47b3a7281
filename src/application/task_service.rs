use async_trait::async_trait;
use thiserror::Error;

use crate::domain::filter::TaskFilter;
use crate::domain::repository::TaskRepository;
use crate::domain::task::{CreateTask, PatchTask, ReplaceTask, Task, TaskId};
use crate::domain::validate::{validate_create, validate_patch, validate_replace, ValidationError};

/// Handler-facing error taxonomy. Validation failures short-circuit
/// before the store is touched; storage failures carry the cause for
/// server-side logging only.
#[derive(Debug, Error)]
pub enum TaskError {
    #[error("{0}")]
    Validation(#[from] ValidationError),
    #[error("Task not found")]
    NotFound,
    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

#[async_trait]
pub trait TaskService: Send + Sync + 'static {
    async fn create(&self, input: CreateTask) -> Result<Task, TaskError>;
    async fn get(&self, id: TaskId) -> Result<Task, TaskError>;
    async fn list(&self, filter: TaskFilter) -> Result<Vec<Task>, TaskError>;
    async fn replace(&self, id: TaskId, input: ReplaceTask) -> Result<Task, TaskError>;
    async fn patch(&self, id: TaskId, input: PatchTask) -> Result<Task, TaskError>;
    async fn delete(&self, id: TaskId) -> Result<(), TaskError>;
}

#[derive(Clone)]
pub struct TaskServiceImpl<R: TaskRepository> {
    repo: R,
}

impl<R: TaskRepository> TaskServiceImpl<R> {
    pub fn new(repo: R) -> Self { Self { repo } }
}

#[async_trait]
impl<R: TaskRepository> TaskService for TaskServiceImpl<R> {
    async fn create(&self, input: CreateTask) -> Result<Task, TaskError> {
        let new = validate_create(input)?;
        Ok(self.repo.insert(new).await?)
    }

    async fn get(&self, id: TaskId) -> Result<Task, TaskError> {
        self.repo.get(id).await?.ok_or(TaskError::NotFound)
    }

    async fn list(&self, filter: TaskFilter) -> Result<Vec<Task>, TaskError> {
        Ok(self.repo.list(filter).await?)
    }

    async fn replace(&self, id: TaskId, input: ReplaceTask) -> Result<Task, TaskError> {
        let update = validate_replace(input)?;
        self.repo.replace(id, update).await?.ok_or(TaskError::NotFound)
    }

    async fn patch(&self, id: TaskId, input: PatchTask) -> Result<Task, TaskError> {
        let update = validate_patch(input)?;
        self.repo.patch(id, update).await?.ok_or(TaskError::NotFound)
    }

    async fn delete(&self, id: TaskId) -> Result<(), TaskError> {
        if self.repo.delete(id).await? { Ok(()) } else { Err(TaskError::NotFound) }
    }
}
