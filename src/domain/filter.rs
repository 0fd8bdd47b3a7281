/// Server-side list predicates. The store only ever builds SQL from
/// these fields, every value bound as a parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskFilter {
    pub completed: Option<bool>,
    pub q: Option<String>,
    pub limit: i64,
    pub offset: i64,
}

impl Default for TaskFilter {
    fn default() -> Self {
        Self { completed: None, q: None, limit: 100, offset: 0 }
    }
}
