#![forbid(unsafe_code)]

//! Sorting.
//!
//! After filtering, valid items are appended to the end of their container
//! best-first, then visible groups are appended to the end of the list in
//! order of their best member. Appending in score order leaves every
//! container sorted without ever computing target positions.
//!
//! # Invariants
//!
//! 1. Sorting is a no-op with an empty search or filtering disabled.
//! 2. Both passes are stable: ties keep their current relative order.
//! 3. The built-in view model is reordered first; a host controller sees
//!    the same sequence of appends afterwards, with no engine borrow held.

use cmdpal_core::NodeId;

use super::store::Store;
use super::view::PresentationOrder;

impl Store {
    /// Reorder the presentation by score.
    pub(crate) fn sort(&self) {
        if self.inner.state.borrow().search.is_empty() || !self.should_filter() {
            return;
        }

        #[cfg(feature = "tracing")]
        let _span = tracing::debug_span!("cmdpal.sort").entered();

        let (items, groups) = self.sort_plan();

        {
            let mut view = self.inner.view.borrow_mut();
            apply(&mut *view, &items, &groups);
        }
        if let Some(host) = self.inner.host.borrow_mut().as_deref_mut() {
            apply(host, &items, &groups);
        }
    }

    /// Items (with their group) and groups in append order.
    fn sort_plan(&self) -> (Vec<(NodeId, Option<NodeId>)>, Vec<NodeId>) {
        let valid = self.valid_items();
        let state = self.inner.state.borrow();
        let registry = self.inner.registry.borrow();
        let view = self.inner.view.borrow();

        let mut items: Vec<(NodeId, Option<NodeId>, f64)> = valid
            .into_iter()
            .map(|id| {
                let group = view
                    .item(id)
                    .and_then(|n| n.group)
                    .filter(|g| view.group(*g).is_some());
                (id, group, state.filtered.score(id))
            })
            .collect();
        items.sort_by(|a, b| b.2.total_cmp(&a.2));

        let mut groups: Vec<(NodeId, f64)> = view
            .group_order()
            .into_iter()
            .filter(|g| state.filtered.groups.contains(g))
            .map(|g| {
                let best = registry.members(g).map_or(0.0, |members| {
                    members
                        .iter()
                        .map(|m| state.filtered.score(*m))
                        .fold(0.0, f64::max)
                });
                (g, best)
            })
            .collect();
        groups.sort_by(|a, b| b.1.total_cmp(&a.1));

        (
            items.into_iter().map(|(id, g, _)| (id, g)).collect(),
            groups.into_iter().map(|(g, _)| g).collect(),
        )
    }
}

fn apply(
    target: &mut dyn PresentationOrder,
    items: &[(NodeId, Option<NodeId>)],
    groups: &[NodeId],
) {
    for &(item, group) in items {
        target.append_item(item, group);
    }
    for &group in groups {
        target.append_group(group);
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::command::{Command, CommandConfig, GroupProps, ItemProps};

    #[derive(Default)]
    struct Recorder {
        ops: Rc<RefCell<Vec<String>>>,
    }

    impl PresentationOrder for Recorder {
        fn append_item(&mut self, item: NodeId, _group: Option<NodeId>) {
            self.ops.borrow_mut().push(format!("item {item}"));
        }

        fn append_group(&mut self, group: NodeId) {
            self.ops.borrow_mut().push(format!("group {group}"));
        }
    }

    fn scored(scores: &'static [(&'static str, f64)]) -> CommandConfig {
        CommandConfig::new().filter(move |value, _, _| {
            scores
                .iter()
                .find(|(v, _)| *v == value)
                .map_or(0.0, |(_, s)| *s)
        })
    }

    #[test]
    fn items_sort_best_first_within_group() {
        let cmd = Command::new(scored(&[("A", 0.0), ("B", 5.0), ("C", 10.0)]));
        let group = cmd.group(GroupProps::new().heading("Letters"));
        let a = group.item(ItemProps::new().value("A"));
        let b = group.item(ItemProps::new().value("B"));
        let c = group.item(ItemProps::new().value("C"));
        cmd.store().set_search("x");
        assert_eq!(cmd.store().snapshot().filtered.count, 2);
        let order = cmd.store().view().group(group.id()).map(|g| g.items.clone());
        assert_eq!(order, Some(vec![a.id(), c.id(), b.id()]));
        let valid = cmd.store().valid_items();
        assert_eq!(valid, vec![c.id(), b.id()]);
    }

    #[test]
    fn groups_sort_by_best_member_and_host_mirrors() {
        let cmd = Command::new(scored(&[("low", 1.0), ("high", 9.0)]));
        let ops = Rc::new(RefCell::new(Vec::new()));
        cmd.set_presentation_host(Recorder {
            ops: Rc::clone(&ops),
        });
        let first = cmd.group(GroupProps::new().value("first"));
        let second = cmd.group(GroupProps::new().value("second"));
        let _low = first.item(ItemProps::new().value("low"));
        let high = second.item(ItemProps::new().value("high"));
        ops.borrow_mut().clear();
        cmd.store().set_search("q");
        assert_eq!(cmd.store().view().group_order(), vec![second.id(), first.id()]);
        let recorded = ops.borrow();
        assert_eq!(recorded.first(), Some(&format!("item {}", high.id())));
        assert_eq!(recorded.last(), Some(&format!("group {}", first.id())));
    }

    #[test]
    fn ties_keep_presentation_order() {
        let cmd = Command::new(CommandConfig::new().filter(|_, _, _| 1.0));
        let x = cmd.item(ItemProps::new().value("x"));
        let y = cmd.item(ItemProps::new().value("y"));
        let z = cmd.item(ItemProps::new().value("z"));
        cmd.store().set_search("q");
        assert_eq!(cmd.store().view().item_order(), vec![x.id(), y.id(), z.id()]);
    }

    #[test]
    fn empty_search_leaves_order_alone() {
        let cmd = Command::new(scored(&[("a", 1.0), ("b", 2.0)]));
        let a = cmd.item(ItemProps::new().value("a"));
        let b = cmd.item(ItemProps::new().value("b"));
        cmd.store().set_search("");
        assert_eq!(cmd.store().view().item_order(), vec![a.id(), b.id()]);
    }
}
