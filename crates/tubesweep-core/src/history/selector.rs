use std::collections::HashSet;

use super::HistoryItem;

/// Filter the scanned entries down to those whose video is flagged.
///
/// Pure function; keeps the scan order.
pub fn select(items: &[HistoryItem], flagged: &HashSet<String>) -> Vec<HistoryItem> {
    items
        .iter()
        .filter(|item| flagged.contains(&item.video_id))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::super::testing::item;
    use super::*;

    fn items() -> Vec<HistoryItem> {
        vec![
            item("item-a", "vid-a", "2026-08-07T10:00:00Z", "A").into(),
            item("item-b", "vid-b", "2026-08-07T09:30:00Z", "B").into(),
            item("item-c", "vid-c", "2026-08-07T09:00:00Z", "C").into(),
        ]
    }

    #[test]
    fn test_selects_flagged_in_order() {
        let flagged: HashSet<String> = ["vid-c", "vid-a"].iter().map(|s| s.to_string()).collect();

        let selected = select(&items(), &flagged);

        let ids: Vec<_> = selected.iter().map(|i| i.item_id.as_str()).collect();
        assert_eq!(ids, vec!["item-a", "item-c"]);
    }

    #[test]
    fn test_empty_flag_set_selects_nothing() {
        assert!(select(&items(), &HashSet::new()).is_empty());
    }

    #[test]
    fn test_output_is_subset_of_input() {
        let flagged: HashSet<String> =
            ["vid-b", "vid-unknown"].iter().map(|s| s.to_string()).collect();

        let selected = select(&items(), &flagged);

        assert_eq!(selected.len(), 1);
        assert!(selected.iter().all(|s| items()
            .iter()
            .any(|i| i.item_id == s.item_id && flagged.contains(&s.video_id))));
    }
}
