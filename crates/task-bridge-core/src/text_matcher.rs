use crate::model::Task;

/// Case-insensitive substring matcher over a task's title and description.
pub struct TextMatcher {
    needle: String,
}

impl TextMatcher {
    /// Normalize a query string into a matcher. Returns `None` for empty inputs.
    pub fn new(query: &str) -> Option<Self> {
        if query.is_empty() {
            return None;
        }
        Some(Self {
            needle: query.to_lowercase(),
        })
    }

    /// Whether the title or the description contains the query.
    pub fn matches(&self, task: &Task) -> bool {
        self.matches_field(&task.title)
            || task
                .description
                .as_deref()
                .is_some_and(|description| self.matches_field(description))
    }

    fn matches_field(&self, value: &str) -> bool {
        value.to_lowercase().contains(&self.needle)
    }
}
