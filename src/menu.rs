//! Checkbox dropdown state
//!
//! The menu shows one header per filter group. Activating a header reveals
//! its values as checkboxes; a checkbox's state is read from
//! [`ActiveFilters`] on every render and never stored here.

use crate::selection::ActiveFilters;
use crate::types::MenuGroup;

/// A line of the flattened menu
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuEntry {
    Group(usize),
    Item { group: usize, item: usize },
}

#[derive(Debug, Clone, Default)]
pub struct MenuState {
    groups: Vec<MenuGroup>,
    expanded: Vec<bool>,
    pub cursor: usize,
}

impl MenuState {
    pub fn new(groups: Vec<MenuGroup>) -> Self {
        let expanded = vec![false; groups.len()];
        MenuState {
            groups,
            expanded,
            cursor: 0,
        }
    }

    pub fn groups(&self) -> &[MenuGroup] {
        &self.groups
    }

    pub fn is_expanded(&self, group: usize) -> bool {
        self.expanded.get(group).copied().unwrap_or(false)
    }

    /// All lines currently shown, top to bottom
    pub fn entries(&self) -> Vec<MenuEntry> {
        let mut entries = Vec::new();
        for (g, group) in self.groups.iter().enumerate() {
            entries.push(MenuEntry::Group(g));
            if self.is_expanded(g) {
                entries.extend((0..group.values.len()).map(|item| MenuEntry::Item { group: g, item }));
            }
        }
        entries
    }

    pub fn current(&self) -> Option<MenuEntry> {
        self.entries().get(self.cursor).copied()
    }

    pub fn next(&mut self) {
        let len = self.entries().len();
        if self.cursor + 1 < len {
            self.cursor += 1;
        }
    }

    pub fn previous(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    /// Move the cursor to line `pos` (mouse click)
    pub fn select(&mut self, pos: usize) -> bool {
        if pos < self.entries().len() {
            self.cursor = pos;
            true
        } else {
            false
        }
    }

    /// Expand the group under the cursor, or toggle the checkbox under it.
    ///
    /// # Returns
    /// `true` if `active` changed
    pub fn activate(&mut self, active: &mut ActiveFilters) -> bool {
        match self.current() {
            Some(MenuEntry::Group(g)) => {
                if let Some(flag) = self.expanded.get_mut(g) {
                    *flag = true;
                }
                false
            }
            Some(MenuEntry::Item { group, item }) => {
                let group = &self.groups[group];
                let value = &group.values[item];
                active.toggle(&group.field, value);
                true
            }
            None => false,
        }
    }

    /// Collapse the group containing the cursor and move onto its header
    pub fn collapse(&mut self) {
        let group = match self.current() {
            Some(MenuEntry::Group(g)) => g,
            Some(MenuEntry::Item { group, .. }) => group,
            None => return,
        };
        if let Some(flag) = self.expanded.get_mut(group) {
            *flag = false;
        }
        if let Some(pos) = self
            .entries()
            .iter()
            .position(|e| *e == MenuEntry::Group(group))
        {
            self.cursor = pos;
        }
    }

    /// Checked state of an item line
    pub fn is_checked(&self, entry: MenuEntry, active: &ActiveFilters) -> bool {
        match entry {
            MenuEntry::Item { group, item } => self
                .groups
                .get(group)
                .and_then(|g| g.values.get(item).map(|v| active.is_checked(&g.field, v)))
                .unwrap_or(false),
            MenuEntry::Group(_) => false,
        }
    }
}
