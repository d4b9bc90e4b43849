//! Filter-menu grouping and filter application
//!
//! Selections are ANDed across groups and ORed within a group. A group
//! with no selection does not restrict the result.

use crate::types::{ActiveFilter, MenuGroup, Row};

/// Build the filter menu sections for `rows`.
///
/// Sections follow the order of `filter_fields`. Values inside a section are
/// distinct and keep the order in which they were first seen. A field that no
/// row carries produces no section.
pub fn menu_groups(rows: &[Row], filter_fields: &[String]) -> Vec<MenuGroup> {
    let mut groups: Vec<MenuGroup> = filter_fields
        .iter()
        .map(|field| MenuGroup {
            field: field.clone(),
            values: Vec::new(),
        })
        .collect();

    for row in rows {
        for group in groups.iter_mut() {
            if let Some(value) = row.get(&group.field)
                && !group.values.iter().any(|v| v == value)
            {
                group.values.push(value.to_string());
            }
        }
    }

    groups.retain(|g| !g.values.is_empty());
    tracing::debug!(
        "Built {} filter menu groups from {} rows",
        groups.len(),
        rows.len()
    );
    groups
}

/// Partition active selections by group, keeping first-seen group order.
/// The group is the row field name exactly as written.
fn partition(active: &[ActiveFilter]) -> Vec<(&str, Vec<&str>)> {
    let mut partitions: Vec<(&str, Vec<&str>)> = Vec::new();
    for filter in active {
        let key = filter.group.as_str();
        match partitions.iter_mut().find(|(g, _)| *g == key) {
            Some((_, values)) => values.push(filter.value.as_str()),
            None => partitions.push((key, vec![filter.value.as_str()])),
        }
    }
    partitions
}

/// Return the indices of rows that pass every active group, in input order.
///
/// A row missing a field that has active selections is rejected.
pub fn apply_filters(rows: &[Row], active: &[ActiveFilter]) -> Vec<usize> {
    if active.is_empty() {
        return (0..rows.len()).collect();
    }

    let partitions = partition(active);
    let kept: Vec<usize> = rows
        .iter()
        .enumerate()
        .filter(|(_, row)| {
            partitions.iter().all(|(field, values)| {
                row.get(field)
                    .is_some_and(|cell| values.iter().any(|v| *v == cell))
            })
        })
        .map(|(idx, _)| idx)
        .collect();

    tracing::debug!(
        "Applied {} filters across {} groups: {}/{} rows kept",
        active.len(),
        partitions.len(),
        kept.len(),
        rows.len()
    );
    kept
}

/// Number of selections per group, ordered by first appearance.
pub fn badge_counts(active: &[ActiveFilter]) -> Vec<(String, usize)> {
    let mut counts: Vec<(String, usize)> = Vec::new();
    for filter in active {
        match counts.iter_mut().find(|(g, _)| *g == filter.group) {
            Some((_, count)) => *count += 1,
            None => counts.push((filter.group.clone(), 1)),
        }
    }
    counts
}

pub fn pluralize(word: &str) -> String {
    if word.ends_with('s') {
        format!("{}es", word)
    } else {
        format!("{}s", word)
    }
}

/// Badge text for a group, e.g. "2 Customers"
pub fn badge_label(group: &str, count: usize) -> String {
    format!("{} {}", count, pluralize(&display_name(group)))
}

/// Section title for a field: first character upper-cased
pub fn display_name(field: &str) -> String {
    let mut chars = field.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    fn create_test_rows() -> Vec<Row> {
        vec![
            Row::from_pairs([("name", "Outage"), ("importance", "high"), ("customer", "Acme")]),
            Row::from_pairs([("name", "Billing"), ("importance", "low"), ("customer", "Globex")]),
            Row::from_pairs([("name", "Login"), ("importance", "high"), ("customer", "Globex")]),
            Row::from_pairs([("name", "Export"), ("importance", "medium")]),
        ]
    }

    #[test]
    fn test_menu_groups_first_seen_order() {
        let rows = create_test_rows();
        let groups = menu_groups(&rows, &fields(&["importance", "customer"]));

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].field, "importance");
        assert_eq!(groups[0].values, vec!["high", "low", "medium"]);
        assert_eq!(groups[1].field, "customer");
        assert_eq!(groups[1].values, vec!["Acme", "Globex"]);
    }

    #[test]
    fn test_menu_groups_skips_absent_fields() {
        let rows = create_test_rows();
        let groups = menu_groups(&rows, &fields(&["type", "importance"]));

        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].field, "importance");
    }

    #[test]
    fn test_menu_groups_ignores_unlisted_fields() {
        let rows = create_test_rows();
        let groups = menu_groups(&rows, &fields(&["customer"]));
        assert!(groups.iter().all(|g| g.field != "name"));
    }

    #[test]
    fn test_no_filters_keeps_everything() {
        let rows = create_test_rows();
        assert_eq!(apply_filters(&rows, &[]), vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_or_within_group() {
        let rows = create_test_rows();
        let active = vec![
            ActiveFilter::new("importance", "low"),
            ActiveFilter::new("importance", "medium"),
        ];
        assert_eq!(apply_filters(&rows, &active), vec![1, 3]);
    }

    #[test]
    fn test_and_across_groups() {
        let rows = create_test_rows();
        let active = vec![
            ActiveFilter::new("importance", "high"),
            ActiveFilter::new("customer", "Globex"),
        ];
        assert_eq!(apply_filters(&rows, &active), vec![2]);
    }

    #[test]
    fn test_missing_field_is_rejected() {
        let rows = create_test_rows();
        let active = vec![ActiveFilter::new("customer", "Acme")];
        assert_eq!(apply_filters(&rows, &active), vec![0]);
    }

    #[test]
    fn test_mixed_case_field_filters_as_written() {
        let rows = vec![
            Row::from_pairs([("Title", "a"), ("Customer", "Acme")]),
            Row::from_pairs([("Title", "b"), ("Customer", "Globex")]),
        ];
        let groups = menu_groups(&rows, &fields(&["Customer"]));
        assert_eq!(groups[0].values, vec!["Acme", "Globex"]);

        let active = vec![ActiveFilter::new("Customer", "Acme")];
        assert_eq!(apply_filters(&rows, &active), vec![0]);
    }

    #[test]
    fn test_badge_counts() {
        let active = vec![
            ActiveFilter::new("customer", "Acme"),
            ActiveFilter::new("importance", "high"),
            ActiveFilter::new("customer", "Globex"),
        ];
        assert_eq!(
            badge_counts(&active),
            vec![("customer".to_string(), 2), ("importance".to_string(), 1)]
        );
    }

    #[test]
    fn test_pluralize() {
        assert_eq!(pluralize("type"), "types");
        assert_eq!(pluralize("status"), "statuses");
        assert_eq!(badge_label("customer", 3), "3 Customers");
        assert_eq!(badge_label("status", 1), "1 Statuses");
    }

    #[test]
    fn test_display_name() {
        assert_eq!(display_name("importance"), "Importance");
        assert_eq!(display_name(""), "");
    }
}
