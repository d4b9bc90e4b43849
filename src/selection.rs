use crate::types::ActiveFilter;

/// Ordered set of checked (group, value) pairs
///
/// Insertion order is kept so that badges appear in the order their groups
/// were first selected.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ActiveFilters {
    filters: Vec<ActiveFilter>,
}

impl ActiveFilters {
    pub fn new() -> Self {
        ActiveFilters {
            filters: Vec::new(),
        }
    }

    /// Build from a saved list, dropping duplicate pairs
    pub fn from_saved(saved: Vec<ActiveFilter>) -> Self {
        let mut active = ActiveFilters::new();
        for filter in saved {
            if !active.is_checked(&filter.group, &filter.value) {
                active.filters.push(filter);
            }
        }
        active
    }

    pub fn is_checked(&self, group: &str, value: &str) -> bool {
        self.filters
            .iter()
            .any(|f| f.group == group && f.value == value)
    }

    /// Flip membership of the pair
    ///
    /// # Returns
    /// The new checked state
    pub fn toggle(&mut self, group: &str, value: &str) -> bool {
        if self.is_checked(group, value) {
            self.filters
                .retain(|f| !(f.group == group && f.value == value));
            tracing::debug!("Unchecked filter {}={}", group, value);
            false
        } else {
            self.filters.push(ActiveFilter::new(group, value));
            tracing::debug!("Checked filter {}={}", group, value);
            true
        }
    }

    /// Remove every selection in `group`
    ///
    /// # Returns
    /// Number of selections removed
    pub fn clear_group(&mut self, group: &str) -> usize {
        let before = self.filters.len();
        self.filters.retain(|f| f.group != group);
        let removed = before - self.filters.len();
        tracing::debug!("Cleared {} filters from group '{}'", removed, group);
        removed
    }

    pub fn clear(&mut self) {
        self.filters.clear();
    }

    pub fn as_slice(&self) -> &[ActiveFilter] {
        &self.filters
    }

    pub fn to_vec(&self) -> Vec<ActiveFilter> {
        self.filters.clone()
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_adds_then_removes() {
        let mut active = ActiveFilters::new();
        assert!(active.toggle("customer", "Acme"));
        assert!(active.is_checked("customer", "Acme"));
        assert!(!active.toggle("customer", "Acme"));
        assert!(active.is_empty());
    }

    #[test]
    fn test_same_value_in_different_groups_is_independent() {
        let mut active = ActiveFilters::new();
        active.toggle("type", "other");
        assert!(active.is_checked("type", "other"));
        assert!(!active.is_checked("customer", "other"));

        active.toggle("customer", "other");
        active.toggle("type", "other");
        assert!(active.is_checked("customer", "other"));
        assert_eq!(active.len(), 1);
    }

    #[test]
    fn test_clear_group() {
        let mut active = ActiveFilters::new();
        active.toggle("customer", "Acme");
        active.toggle("importance", "high");
        active.toggle("customer", "Globex");

        assert_eq!(active.clear_group("customer"), 2);
        assert_eq!(active.as_slice(), &[ActiveFilter::new("importance", "high")]);
    }

    #[test]
    fn test_from_saved_drops_duplicates() {
        let active = ActiveFilters::from_saved(vec![
            ActiveFilter::new("type", "bug"),
            ActiveFilter::new("type", "bug"),
            ActiveFilter::new("type", "task"),
        ]);
        assert_eq!(active.len(), 2);
    }
}
