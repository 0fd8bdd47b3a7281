use async_trait::async_trait;

use super::filter::TaskFilter;
use super::task::{FullUpdate, NewTask, PartialUpdate, Task, TaskId};

/// Keyed task store. Implementations serialize individual operations;
/// `replace`/`patch` return `None` for an unknown id rather than
/// erroring.
#[async_trait]
pub trait TaskRepository: Send + Sync + 'static {
    async fn init(&self) -> anyhow::Result<()>;
    async fn insert(&self, input: NewTask) -> anyhow::Result<Task>;
    async fn get(&self, id: TaskId) -> anyhow::Result<Option<Task>>;
    /// Matching records, `created_at` descending, within the filter's
    /// limit/offset window.
    async fn list(&self, filter: TaskFilter) -> anyhow::Result<Vec<Task>>;
    async fn replace(&self, id: TaskId, input: FullUpdate) -> anyhow::Result<Option<Task>>;
    async fn patch(&self, id: TaskId, input: PartialUpdate) -> anyhow::Result<Option<Task>>;
    async fn delete(&self, id: TaskId) -> anyhow::Result<bool>;
}
