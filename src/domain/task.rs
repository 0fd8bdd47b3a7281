use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TaskId(pub Uuid);

impl Default for TaskId {
    fn default() -> Self { Self(Uuid::new_v4()) }
}

/// The sole persisted entity. Text fields hold HTML-escaped values;
/// `due_date` is stored verbatim as the client supplied it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,
    pub description: String,
    pub due_date: Option<String>,
    pub notes: Option<String>,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request body for POST. `description` is optional here so that its
/// absence surfaces as a validation error rather than a decode error.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTask {
    pub description: Option<String>,
    pub due_date: Option<String>,
    pub notes: Option<String>,
}

/// Request body for PUT. Same constraints as create, plus `completed`
/// (defaults to false when absent).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplaceTask {
    pub description: Option<String>,
    pub due_date: Option<String>,
    pub notes: Option<String>,
    pub completed: Option<bool>,
}

/// Request body for PATCH. Outer `Option` = field present in the JSON,
/// inner `Option` = its value (null clears). Serde collapses null into
/// the outer layer by default, hence the custom deserializer.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatchTask {
    #[serde(default, deserialize_with = "double_option")]
    pub description: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub due_date: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub notes: Option<Option<String>>,
    pub completed: Option<bool>,
}

fn double_option<'de, T, D>(de: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(de).map(Some)
}

/// Validated + sanitized insert, ready for the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    pub description: String,
    pub due_date: Option<String>,
    pub notes: Option<String>,
}

/// Validated full overwrite. `id` and `created_at` are untouched by it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FullUpdate {
    pub description: String,
    pub due_date: Option<String>,
    pub notes: Option<String>,
    pub completed: bool,
}

/// Validated partial merge; `None` fields keep their stored values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PartialUpdate {
    pub description: Option<String>,
    pub due_date: Option<Option<String>>,
    pub notes: Option<Option<String>>,
    pub completed: Option<bool>,
}

impl Task {
    /// Fold a validated partial update into the current record.
    pub fn apply(&mut self, update: PartialUpdate, now: DateTime<Utc>) {
        if let Some(d) = update.description { self.description = d; }
        if let Some(dd) = update.due_date { self.due_date = dd; }
        if let Some(n) = update.notes { self.notes = n; }
        if let Some(c) = update.completed { self.completed = c; }
        self.updated_at = now;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn patch_distinguishes_absent_from_null() {
        let patch: PatchTask = serde_json::from_value(json!({ "dueDate": null })).unwrap();
        assert_eq!(patch.due_date, Some(None));
        assert_eq!(patch.notes, None);

        let patch: PatchTask = serde_json::from_value(json!({ "notes": "later" })).unwrap();
        assert_eq!(patch.notes, Some(Some("later".to_string())));
        assert_eq!(patch.due_date, None);
    }

    #[test]
    fn task_serializes_camel_case() {
        let now = Utc::now();
        let task = Task {
            id: TaskId::default(),
            description: "Buy milk".into(),
            due_date: Some("2026-01-15".into()),
            notes: None,
            completed: false,
            created_at: now,
            updated_at: now,
        };
        let value = serde_json::to_value(&task).unwrap();
        assert_eq!(value["dueDate"], "2026-01-15");
        assert!(value["notes"].is_null());
        assert_eq!(value["completed"], false);
        assert!(value.get("createdAt").is_some());
    }
}
