//! Pure request validation. Each function turns an untrusted request
//! shape into a sanitized, store-ready value or a named error, before
//! anything touches the repository.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use thiserror::Error;

use super::sanitize::escape_html;
use super::task::{CreateTask, FullUpdate, NewTask, PartialUpdate, PatchTask, ReplaceTask};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Description is required")]
    DescriptionRequired,
    #[error("Invalid dueDate")]
    InvalidDueDate,
}

/// Accepts a plain ISO date (`2026-01-15`, midnight) or a full RFC 3339
/// timestamp. Anything else is not a due date.
pub fn parse_due_date(s: &str) -> Option<NaiveDateTime> {
    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return d.and_hms_opt(0, 0, 0);
    }
    DateTime::parse_from_rfc3339(s).ok().map(|dt| dt.naive_local())
}

pub fn validate_create(input: CreateTask) -> Result<NewTask, ValidationError> {
    let description = require_description(input.description)?;
    let due_date = check_due_date(input.due_date)?;
    Ok(NewTask { description, due_date, notes: input.notes.map(|n| escape_html(&n)) })
}

pub fn validate_replace(input: ReplaceTask) -> Result<FullUpdate, ValidationError> {
    let description = require_description(input.description)?;
    let due_date = check_due_date(input.due_date)?;
    Ok(FullUpdate {
        description,
        due_date,
        notes: input.notes.map(|n| escape_html(&n)),
        completed: input.completed.unwrap_or(false),
    })
}

pub fn validate_patch(input: PatchTask) -> Result<PartialUpdate, ValidationError> {
    let description = match input.description {
        None => None,
        // explicit null counts as supplied-and-empty
        Some(None) => return Err(ValidationError::DescriptionRequired),
        Some(Some(s)) => Some(require_description(Some(s))?),
    };
    let due_date = match input.due_date {
        Some(Some(s)) => Some(check_due_date(Some(s))?),
        other => other,
    };
    Ok(PartialUpdate {
        description,
        due_date,
        notes: input.notes.map(|n| n.map(|s| escape_html(&s))),
        completed: input.completed,
    })
}

fn require_description(description: Option<String>) -> Result<String, ValidationError> {
    match description {
        Some(s) if !s.trim().is_empty() => Ok(escape_html(&s)),
        _ => Err(ValidationError::DescriptionRequired),
    }
}

fn check_due_date(due_date: Option<String>) -> Result<Option<String>, ValidationError> {
    match due_date {
        Some(s) if parse_due_date(&s).is_none() => Err(ValidationError::InvalidDueDate),
        other => Ok(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_requires_description() {
        assert_eq!(
            validate_create(CreateTask::default()),
            Err(ValidationError::DescriptionRequired)
        );
        assert_eq!(
            validate_create(CreateTask { description: Some("   ".into()), ..Default::default() }),
            Err(ValidationError::DescriptionRequired)
        );
    }

    #[test]
    fn create_sanitizes_text_fields() {
        let new = validate_create(CreateTask {
            description: Some("  <b>Buy milk</b> ".into()),
            notes: Some("a & b".into()),
            due_date: None,
        })
        .unwrap();
        assert_eq!(new.description, "&lt;b&gt;Buy milk&lt;&#x2F;b&gt;");
        assert_eq!(new.notes.as_deref(), Some("a &amp; b"));
    }

    #[test]
    fn create_rejects_bad_due_date() {
        let input = CreateTask {
            description: Some("x".into()),
            due_date: Some("not-a-date".into()),
            notes: None,
        };
        assert_eq!(validate_create(input), Err(ValidationError::InvalidDueDate));
    }

    #[test]
    fn create_accepts_iso_date_and_rfc3339() {
        for due in ["2026-01-15", "2026-01-15T10:30:00Z"] {
            let input = CreateTask {
                description: Some("x".into()),
                due_date: Some(due.into()),
                notes: None,
            };
            assert_eq!(validate_create(input).unwrap().due_date.as_deref(), Some(due));
        }
    }

    #[test]
    fn replace_defaults_completed_false() {
        let input = ReplaceTask { description: Some("x".into()), ..Default::default() };
        assert!(!validate_replace(input).unwrap().completed);
    }

    #[test]
    fn patch_null_description_is_rejected() {
        let input = PatchTask { description: Some(None), ..Default::default() };
        assert_eq!(validate_patch(input), Err(ValidationError::DescriptionRequired));
    }

    #[test]
    fn patch_null_due_date_clears() {
        let update = validate_patch(PatchTask { due_date: Some(None), ..Default::default() }).unwrap();
        assert_eq!(update.due_date, Some(None));
        assert_eq!(update.description, None);
    }

    #[test]
    fn patch_untouched_fields_stay_none() {
        let update = validate_patch(PatchTask { completed: Some(true), ..Default::default() }).unwrap();
        assert_eq!(update, PartialUpdate { completed: Some(true), ..Default::default() });
    }
}
