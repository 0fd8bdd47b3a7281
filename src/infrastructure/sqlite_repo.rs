use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{sqlite::{SqlitePoolOptions, SqliteRow}, Pool, Row, Sqlite};
use uuid::Uuid;

use crate::domain::{
    filter::TaskFilter,
    repository::TaskRepository,
    task::{FullUpdate, NewTask, PartialUpdate, Task, TaskId},
};

const COLUMNS: &str = "id, description, due_date, notes, completed, created_at, updated_at";

#[derive(Clone)]
pub struct SqliteTaskRepository {
    pool: Arc<Pool<Sqlite>>,
}

impl SqliteTaskRepository {
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect(database_url)
            .await?;
        Ok(Self { pool: Arc::new(pool) })
    }
}

#[async_trait]
impl TaskRepository for SqliteTaskRepository {
    async fn init(&self) -> Result<()> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS tasks (
                id TEXT PRIMARY KEY,
                description TEXT NOT NULL,
                due_date TEXT,
                notes TEXT,
                completed INTEGER NOT NULL DEFAULT 0,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )",
        )
        .execute(&*self.pool)
        .await?;
        Ok(())
    }

    async fn insert(&self, input: NewTask) -> Result<Task> {
        let now = Utc::now();
        let id = TaskId(Uuid::new_v4());
        sqlx::query(
            "INSERT INTO tasks (id, description, due_date, notes, completed, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, 0, ?5, ?6)",
        )
        .bind(id.0.to_string())
        .bind(&input.description)
        .bind(&input.due_date)
        .bind(&input.notes)
        .bind(now.to_rfc3339())
        .bind(now.to_rfc3339())
        .execute(&*self.pool)
        .await?;
        Ok(Task {
            id,
            description: input.description,
            due_date: input.due_date,
            notes: input.notes,
            completed: false,
            created_at: now,
            updated_at: now,
        })
    }

    async fn get(&self, id: TaskId) -> Result<Option<Task>> {
        let row = sqlx::query(&format!("SELECT {COLUMNS} FROM tasks WHERE id = ?1"))
            .bind(id.0.to_string())
            .fetch_optional(&*self.pool)
            .await?;
        row.map(row_to_task).transpose()
    }

    async fn list(&self, filter: TaskFilter) -> Result<Vec<Task>> {
        // WHERE clauses come only from the filter fields; every value is
        // a bound parameter.
        let mut sql = format!("SELECT {COLUMNS} FROM tasks");
        let mut clauses: Vec<&str> = Vec::new();
        if filter.completed.is_some() {
            clauses.push("completed = ?");
        }
        if filter.q.is_some() {
            clauses.push("(description LIKE ? OR notes LIKE ?)");
        }
        if !clauses.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&clauses.join(" AND "));
        }
        sql.push_str(" ORDER BY created_at DESC LIMIT ? OFFSET ?");

        let mut query = sqlx::query(&sql);
        if let Some(completed) = filter.completed {
            query = query.bind(completed);
        }
        if let Some(q) = &filter.q {
            let pattern = format!("%{q}%");
            query = query.bind(pattern.clone()).bind(pattern);
        }
        let rows = query
            .bind(filter.limit)
            .bind(filter.offset)
            .fetch_all(&*self.pool)
            .await?;
        rows.into_iter().map(row_to_task).collect()
    }

    async fn replace(&self, id: TaskId, input: FullUpdate) -> Result<Option<Task>> {
        let Some(existing) = self.get(id.clone()).await? else { return Ok(None) };

        let task = Task {
            id,
            description: input.description,
            due_date: input.due_date,
            notes: input.notes,
            completed: input.completed,
            created_at: existing.created_at,
            updated_at: Utc::now(),
        };
        self.write_back(&task).await?;
        Ok(Some(task))
    }

    async fn patch(&self, id: TaskId, input: PartialUpdate) -> Result<Option<Task>> {
        let Some(mut task) = self.get(id).await? else { return Ok(None) };
        task.apply(input, Utc::now());
        self.write_back(&task).await?;
        Ok(Some(task))
    }

    async fn delete(&self, id: TaskId) -> Result<bool> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = ?1")
            .bind(id.0.to_string())
            .execute(&*self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

impl SqliteTaskRepository {
    async fn write_back(&self, task: &Task) -> Result<()> {
        sqlx::query(
            "UPDATE tasks SET description = ?2, due_date = ?3, notes = ?4, completed = ?5, updated_at = ?6
             WHERE id = ?1",
        )
        .bind(task.id.0.to_string())
        .bind(&task.description)
        .bind(&task.due_date)
        .bind(&task.notes)
        .bind(task.completed)
        .bind(task.updated_at.to_rfc3339())
        .execute(&*self.pool)
        .await?;
        Ok(())
    }
}

fn row_to_task(row: SqliteRow) -> Result<Task> {
    let id_str: String = row.get("id");
    let completed: i64 = row.get("completed");
    let created_at_str: String = row.get("created_at");
    let updated_at_str: String = row.get("updated_at");

    Ok(Task {
        id: TaskId(Uuid::parse_str(&id_str)?),
        description: row.get("description"),
        due_date: row.get("due_date"),
        notes: row.get("notes"),
        completed: completed != 0,
        created_at: DateTime::parse_from_rfc3339(&created_at_str)?.with_timezone(&Utc),
        updated_at: DateTime::parse_from_rfc3339(&updated_at_str)?.with_timezone(&Utc),
    })
}
