#![forbid(unsafe_code)]

//! Flatten an [`ActionGraph`] into a deduplicated, order-preserving list.
//!
//! # Order
//!
//! 1. Toolbars in declaration order, each toolbar's actions in order.
//! 2. Menu bar entries, depth-first pre-order: an action is recorded before
//!    the submenu it opens, and the submenu is walked before the action's
//!    next sibling.
//! 3. Actions owned directly by widgets.
//!
//! An action is recorded the first time it is reached; later occurrences,
//! whether in a toolbar, a submenu, or a widget, are skipped. Toolbar
//! actions are recorded before the menus are walked, so a toolbar action
//! that also sits in a submenu appears once, in its toolbar position.
//! Separators are never recorded.
//!
//! A submenu that (directly or transitively) contains itself is walked
//! once per path; re-entering a menu already on the current path is
//! skipped.

use std::collections::HashSet;

use super::{ActionGraph, ActionId, MenuId};

/// Collect every command in `graph` in palette order.
#[must_use]
pub fn aggregate(graph: &ActionGraph) -> Vec<ActionId> {
    #[cfg(feature = "tracing")]
    let _span = tracing::debug_span!("action_aggregate", actions = graph.len()).entered();

    let mut collector = Collector {
        graph,
        seen: HashSet::new(),
        out: Vec::new(),
        path: Vec::new(),
    };

    for toolbar in graph.toolbars() {
        for &id in &toolbar.actions {
            collector.record(id);
        }
    }
    #[cfg(feature = "tracing")]
    let from_toolbars = collector.out.len();

    for &id in graph.menu_bar() {
        collector.visit(id);
    }
    #[cfg(feature = "tracing")]
    let from_menus = collector.out.len() - from_toolbars;

    for widget in graph.widgets() {
        for &id in &widget.actions {
            collector.record(id);
        }
    }

    #[cfg(feature = "tracing")]
    tracing::debug!(
        target: "cmdpal_widgets::actions",
        from_toolbars,
        from_menus,
        from_widgets = collector.out.len() - from_toolbars - from_menus,
        "actions aggregated"
    );

    collector.out
}

struct Collector<'a> {
    graph: &'a ActionGraph,
    seen: HashSet<ActionId>,
    out: Vec<ActionId>,
    /// Menus on the current recursion path.
    path: Vec<MenuId>,
}

impl Collector<'_> {
    fn record(&mut self, id: ActionId) {
        let Some(action) = self.graph.get(id) else {
            return;
        };
        if action.is_separator() {
            return;
        }
        if self.seen.insert(id) {
            self.out.push(id);
        }
    }

    fn visit(&mut self, id: ActionId) {
        self.record(id);

        let Some(menu_id) = self.graph.get(id).and_then(|a| a.submenu) else {
            return;
        };
        if self.path.contains(&menu_id) {
            #[cfg(feature = "tracing")]
            tracing::warn!(
                target: "cmdpal_widgets::actions",
                action = id.get(),
                "submenu cycle skipped"
            );
            return;
        }
        let graph = self.graph;
        let Some(menu) = graph.menu(menu_id) else {
            return;
        };

        self.path.push(menu_id);
        for &child in &menu.actions {
            self.visit(child);
        }
        self.path.pop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::Action;

    fn labels(graph: &ActionGraph, ids: &[ActionId]) -> Vec<String> {
        ids.iter()
            .map(|&id| graph.get(id).unwrap().label.clone())
            .collect()
    }

    #[test]
    fn toolbar_menu_widget_order_without_duplicates() {
        // toolbar:[A,B], menu:[C -> submenu[D, A]], widget:[E]
        let mut g = ActionGraph::new();
        let a = g.add(Action::new("A"));
        let b = g.add(Action::new("B"));
        let c = g.add(Action::new("C"));
        let d = g.add(Action::new("D"));
        let e = g.add(Action::new("E"));

        let tb = g.add_toolbar("main");
        g.toolbar_push(tb, a);
        g.toolbar_push(tb, b);

        let sub = g.add_menu("sub");
        g.menu_push(sub, d);
        g.menu_push(sub, a);
        g.set_submenu(c, sub);
        g.menu_bar_push(c);

        let w = g.add_widget("pad");
        g.widget_push(w, e);

        assert_eq!(aggregate(&g), vec![a, b, c, d, e]);
    }

    #[test]
    fn nested_submenus_are_preorder() {
        let mut g = ActionGraph::new();
        let file = g.add_menu_bar_menu("File");
        let open = g.add(Action::new("Open"));
        let recent = g.add_menu("Recent");
        let recent_action = g.submenu_action(recent).unwrap();
        let r1 = g.add(Action::new("one.txt"));
        let r2 = g.add(Action::new("two.txt"));
        let quit = g.add(Action::new("Quit"));
        g.menu_push(file, open);
        g.menu_push(file, recent_action);
        g.menu_push(recent, r1);
        g.menu_push(recent, r2);
        g.menu_push(file, quit);

        let out = aggregate(&g);
        assert_eq!(
            labels(&g, &out),
            ["File", "Open", "Recent", "one.txt", "two.txt", "Quit"]
        );
    }

    #[test]
    fn separators_are_skipped() {
        let mut g = ActionGraph::new();
        let file = g.add_menu_bar_menu("File");
        let open = g.add(Action::new("Open"));
        let sep = g.add(Action::separator());
        let quit = g.add(Action::new("Quit"));
        g.menu_push(file, open);
        g.menu_push(file, sep);
        g.menu_push(file, quit);

        assert_eq!(labels(&g, &aggregate(&g)), ["File", "Open", "Quit"]);
    }

    #[test]
    fn cyclic_submenu_terminates() {
        let mut g = ActionGraph::new();
        let top = g.add_menu_bar_menu("Loop");
        let inner = g.add_menu("Inner");
        let to_inner = g.submenu_action(inner).unwrap();
        let back = g.submenu_action(top).unwrap();
        let leaf = g.add(Action::new("Leaf"));
        g.menu_push(top, to_inner);
        g.menu_push(inner, leaf);
        g.menu_push(inner, back);

        assert_eq!(labels(&g, &aggregate(&g)), ["Loop", "Inner", "Leaf", "Loop"]);
    }

    #[test]
    fn self_referencing_menu_terminates() {
        let mut g = ActionGraph::new();
        let menu = g.add_menu_bar_menu("Self");
        let again = g.submenu_action(menu).unwrap();
        g.menu_push(menu, again);
        let out = aggregate(&g);
        assert_eq!(out.len(), 2);
    }

    #[test]
    fn widget_actions_already_collected_are_skipped() {
        let mut g = ActionGraph::new();
        let edit = g.add_menu_bar_menu("Edit");
        let undo = g.add(Action::new("Undo"));
        let redo = g.add(Action::new("Redo"));
        g.menu_push(edit, undo);
        let w = g.add_widget("pad");
        g.widget_push(w, undo);
        g.widget_push(w, redo);
        g.widget_push(w, redo);

        assert_eq!(labels(&g, &aggregate(&g)), ["Edit", "Undo", "Redo"]);
    }

    #[test]
    fn action_on_two_toolbars_appears_once() {
        let mut g = ActionGraph::new();
        let a = g.add(Action::new("A"));
        let t1 = g.add_toolbar("one");
        let t2 = g.add_toolbar("two");
        g.toolbar_push(t1, a);
        g.toolbar_push(t2, a);
        assert_eq!(aggregate(&g), vec![a]);
    }

    #[test]
    fn empty_graph() {
        assert!(aggregate(&ActionGraph::new()).is_empty());
    }
}
