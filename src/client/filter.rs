//! Client-side narrowing of an already-fetched task list. Independent
//! of the server's list filtering; operates purely on local state and a
//! caller-supplied "today".

use chrono::NaiveDate;

use crate::domain::task::Task;
use crate::domain::validate::parse_due_date;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CompletionBucket {
    #[default]
    All,
    Active,
    Completed,
}

impl CompletionBucket {
    pub fn cycle(self) -> Self {
        match self {
            Self::All => Self::Active,
            Self::Active => Self::Completed,
            Self::Completed => Self::All,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::All => "All",
            Self::Active => "Active",
            Self::Completed => "Completed",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DueBucket {
    #[default]
    All,
    Overdue,
    Today,
    Upcoming,
}

impl DueBucket {
    pub fn cycle(self) -> Self {
        match self {
            Self::All => Self::Overdue,
            Self::Overdue => Self::Today,
            Self::Today => Self::Upcoming,
            Self::Upcoming => Self::All,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::All => "Any due",
            Self::Overdue => "Overdue",
            Self::Today => "Due today",
            Self::Upcoming => "Upcoming",
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ViewFilter {
    pub search: String,
    pub completion: CompletionBucket,
    pub due: DueBucket,
}

impl ViewFilter {
    pub fn matches(&self, task: &Task, today: NaiveDate) -> bool {
        self.matches_search(task) && self.matches_completion(task) && self.matches_due(task, today)
    }

    fn matches_search(&self, task: &Task) -> bool {
        if self.search.is_empty() {
            return true;
        }
        let needle = self.search.to_lowercase();
        task.description.to_lowercase().contains(&needle)
            || task
                .notes
                .as_deref()
                .is_some_and(|n| n.to_lowercase().contains(&needle))
    }

    fn matches_completion(&self, task: &Task) -> bool {
        match self.completion {
            CompletionBucket::All => true,
            CompletionBucket::Active => !task.completed,
            CompletionBucket::Completed => task.completed,
        }
    }

    /// Tasks without a parseable due date never land in a non-All
    /// bucket.
    fn matches_due(&self, task: &Task, today: NaiveDate) -> bool {
        if self.due == DueBucket::All {
            return true;
        }
        let Some(due) = task.due_date.as_deref().and_then(parse_due_date) else {
            return false;
        };
        // before start of today / within today / after end of today
        match self.due {
            DueBucket::All => true,
            DueBucket::Overdue => due.date() < today,
            DueBucket::Today => due.date() == today,
            DueBucket::Upcoming => due.date() > today,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::task::TaskId;
    use chrono::Utc;

    fn task(description: &str, notes: Option<&str>, due: Option<&str>, completed: bool) -> Task {
        let now = Utc::now();
        Task {
            id: TaskId::default(),
            description: description.into(),
            due_date: due.map(Into::into),
            notes: notes.map(Into::into),
            completed,
            created_at: now,
            updated_at: now,
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 8, 30).unwrap()
    }

    #[test]
    fn search_is_case_insensitive_over_description_and_notes() {
        let filter = ViewFilter { search: "MILK".into(), ..Default::default() };
        assert!(filter.matches(&task("buy milk", None, None, false), today()));
        assert!(filter.matches(&task("errands", Some("also milk"), None, false), today()));
        assert!(!filter.matches(&task("call mom", None, None, false), today()));
    }

    #[test]
    fn completion_buckets() {
        let done = task("x", None, None, true);
        let open = task("y", None, None, false);
        let active = ViewFilter { completion: CompletionBucket::Active, ..Default::default() };
        let completed = ViewFilter { completion: CompletionBucket::Completed, ..Default::default() };
        assert!(active.matches(&open, today()) && !active.matches(&done, today()));
        assert!(completed.matches(&done, today()) && !completed.matches(&open, today()));
    }

    #[test]
    fn due_buckets_relative_to_today() {
        let overdue = task("a", None, Some("2026-08-29"), false);
        let due_today = task("b", None, Some("2026-08-30"), false);
        let upcoming = task("c", None, Some("2026-08-31"), false);

        let filter = |due| ViewFilter { due, ..Default::default() };
        assert!(filter(DueBucket::Overdue).matches(&overdue, today()));
        assert!(!filter(DueBucket::Overdue).matches(&due_today, today()));
        assert!(filter(DueBucket::Today).matches(&due_today, today()));
        assert!(filter(DueBucket::Upcoming).matches(&upcoming, today()));
        assert!(!filter(DueBucket::Upcoming).matches(&due_today, today()));
    }

    #[test]
    fn missing_or_bad_due_date_excluded_from_non_all_buckets() {
        let none = task("a", None, None, false);
        let garbage = task("b", None, Some("whenever"), false);
        for due in [DueBucket::Overdue, DueBucket::Today, DueBucket::Upcoming] {
            let filter = ViewFilter { due, ..Default::default() };
            assert!(!filter.matches(&none, today()));
            assert!(!filter.matches(&garbage, today()));
        }
        let all = ViewFilter::default();
        assert!(all.matches(&none, today()) && all.matches(&garbage, today()));
    }

    #[test]
    fn buckets_cycle_through_all_states() {
        let mut bucket = CompletionBucket::All;
        for _ in 0..3 {
            bucket = bucket.cycle();
        }
        assert_eq!(bucket, CompletionBucket::All);

        let mut due = DueBucket::All;
        for _ in 0..4 {
            due = due.cycle();
        }
        assert_eq!(due, DueBucket::All);
    }
}
