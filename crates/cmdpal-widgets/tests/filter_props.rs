//! Property tests for filtering.

use std::rc::Rc;

use cmdpal_widgets::command::{Command, CommandConfig, ItemProps};
use proptest::prelude::*;

fn config_with_scores(scores: Rc<Vec<f64>>) -> CommandConfig {
    CommandConfig::new().filter(move |value, _, _| {
        value
            .strip_prefix("item-")
            .and_then(|i| i.parse::<usize>().ok())
            .and_then(|i| scores.get(i).copied())
            .unwrap_or(0.0)
    })
}

proptest! {
    #[test]
    fn count_matches_positive_scores(
        scores in prop::collection::vec(prop_oneof![Just(0.0), 0.01f64..1.0], 0..24),
        search in "[a-z]{1,4}",
    ) {
        let expected = scores.iter().filter(|s| **s > 0.0).count();
        let cmd = Command::new(config_with_scores(Rc::new(scores.clone())));
        let _items: Vec<_> = (0..scores.len())
            .map(|i| cmd.item(ItemProps::new().value(format!("item-{i}"))))
            .collect();

        cmd.store().set_search(search);

        prop_assert_eq!(cmd.store().snapshot().filtered.count, expected);
        prop_assert_eq!(cmd.store().valid_items().len(), expected);
    }

    #[test]
    fn selection_is_empty_or_rendered(
        scores in prop::collection::vec(prop_oneof![Just(0.0), 0.01f64..1.0], 1..16),
        moves in prop::collection::vec(any::<bool>(), 0..12),
    ) {
        let cmd = Command::new(config_with_scores(Rc::new(scores.clone())));
        let items: Vec<_> = (0..scores.len())
            .map(|i| cmd.item(ItemProps::new().value(format!("item-{i}"))))
            .collect();
        cmd.store().set_search("q");
        for forward in moves {
            let dir = if forward {
                cmdpal_widgets::command::Direction::Next
            } else {
                cmdpal_widgets::command::Direction::Prev
            };
            cmd.store().move_by_item(dir);
        }

        let value = cmd.store().snapshot().value.clone();
        if value.is_empty() {
            prop_assert!(scores.iter().all(|s| *s <= 0.0));
        } else {
            let selected: Vec<_> = items.iter().filter(|i| i.is_selected()).collect();
            prop_assert_eq!(selected.len(), 1);
            prop_assert!(selected[0].is_rendered());
        }
    }

    #[test]
    fn score_stays_in_unit_interval(value in ".{0,24}", search in ".{0,8}") {
        let score = cmdpal_core::command_score(&value, &search, &[]);
        prop_assert!((0.0..=1.0).contains(&score));
    }
}
