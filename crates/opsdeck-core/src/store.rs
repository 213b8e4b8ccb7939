//! Client-side state for the pending action set and its filter context.
//!
//! The store is mutated only from the controller task, always inside the
//! completion handler of a single outstanding request, so it needs no
//! locking. `replace` is the sole authoritative mutation path; everything
//! else is a local, reconcilable convenience.

use crate::action::Action;
use crate::context::FilterContext;

/// Pending actions in backend rank order, plus the filters that scoped them.
#[derive(Debug, Clone, Default)]
pub struct ActionStore {
    pending: Vec<Action>,
    active_filters: FilterContext,
}

impl ActionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pending(&self) -> &[Action] {
        &self.pending
    }

    pub fn active_filters(&self) -> &FilterContext {
        &self.active_filters
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Record the filters a fetch was issued with, before its response
    /// arrives. A failed fetch thus leaves the list stale but the intent
    /// visible.
    pub fn set_filters(&mut self, filters: FilterContext) {
        self.active_filters = filters;
    }

    /// Atomically swap in a backend-confirmed list. The only mutation that
    /// is trusted as authoritative; always a replace, never a merge.
    pub fn replace(&mut self, actions: Vec<Action>, filters: FilterContext) {
        self.pending = actions;
        self.active_filters = filters;
    }

    /// Optimistic local removal, used only when a post-approval re-fetch
    /// failed. The next successful fetch reconciles the list.
    pub fn remove_locally(&mut self, action: &Action) {
        self.pending.retain(|a| !a.same_identity(action));
    }

    /// The "ignore" affordance: drop one action from the pending view by
    /// position, with no backend call. A later fetch may bring it back;
    /// that is accepted behavior.
    pub fn dismiss(&mut self, index: usize) -> Option<Action> {
        if index < self.pending.len() {
            Some(self.pending.remove(index))
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::ActionType;
    use crate::context::Dimension;

    fn action(id: &str, desc: &str) -> Action {
        Action {
            id: Some(id.to_string()),
            action_type: ActionType::SlackMessage,
            title: None,
            description: desc.to_string(),
            metadata: serde_json::Value::Null,
        }
    }

    #[test]
    fn replace_swaps_list_and_filters() {
        let mut store = ActionStore::new();
        store.replace(vec![action("a-1", "x")], FilterContext::new());

        let mut filters = FilterContext::new();
        filters.set(Dimension::Region, "West");
        store.replace(vec![action("a-2", "y"), action("a-3", "z")], filters);

        assert_eq!(store.len(), 2);
        assert_eq!(store.pending()[0].id.as_deref(), Some("a-2"));
        assert_eq!(store.active_filters().get(&Dimension::Region), Some("West"));
    }

    #[test]
    fn replace_never_merges() {
        let mut store = ActionStore::new();
        store.replace(vec![action("a-1", "x")], FilterContext::new());
        store.replace(vec![action("a-1", "x refreshed")], FilterContext::new());
        assert_eq!(store.len(), 1);
        assert_eq!(store.pending()[0].description, "x refreshed");
    }

    #[test]
    fn remove_locally_drops_exactly_the_match() {
        let mut store = ActionStore::new();
        store.replace(
            vec![action("a-1", "x"), action("a-2", "y"), action("a-3", "z")],
            FilterContext::new(),
        );
        store.remove_locally(&action("a-2", "y"));
        let ids: Vec<_> = store.pending().iter().filter_map(|a| a.id.as_deref()).collect();
        assert_eq!(ids, vec!["a-1", "a-3"]);
    }

    #[test]
    fn remove_locally_matches_by_id_despite_drift() {
        let mut store = ActionStore::new();
        store.replace(vec![action("a-1", "original wording")], FilterContext::new());
        // Same backend id, different body: still the same action.
        store.remove_locally(&action("a-1", "rewritten elsewhere"));
        assert!(store.is_empty());
    }

    #[test]
    fn dismiss_is_positional_and_bounded() {
        let mut store = ActionStore::new();
        store.replace(
            vec![action("a-1", "x"), action("a-2", "y")],
            FilterContext::new(),
        );
        let dropped = store.dismiss(0).unwrap();
        assert_eq!(dropped.id.as_deref(), Some("a-1"));
        assert_eq!(store.len(), 1);
        assert!(store.dismiss(5).is_none());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn set_filters_leaves_list_untouched() {
        let mut store = ActionStore::new();
        store.replace(vec![action("a-1", "x")], FilterContext::new());
        let mut filters = FilterContext::new();
        filters.set(Dimension::Stage, "Proposal");
        store.set_filters(filters);
        assert_eq!(store.len(), 1);
        assert_eq!(
            store.active_filters().get(&Dimension::Stage),
            Some("Proposal")
        );
    }
}
