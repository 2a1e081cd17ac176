use crate::{Category, HistoricalEvent};

/// Category filter applied to the events before they reach the map.
/// `None` shows every category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CategoryFilter {
    selected: Option<Category>,
}

impl CategoryFilter {
    pub fn selected(&self) -> Option<Category> {
        self.selected
    }

    /// Returns `true` if the selection actually changed.
    pub fn set(&mut self, category: Option<Category>) -> bool {
        if self.selected == category {
            return false;
        }
        self.selected = category;
        true
    }

    pub fn matches(&self, event: &HistoricalEvent) -> bool {
        self.selected.is_none_or(|c| c == event.category)
    }
}
