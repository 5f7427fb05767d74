//! Record of what is currently open

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::ids::PanelId;

/// Navigation state for one page session
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NavigationState {
    /// Last-active child section per container. Toggled-off entries stay as `None`.
    pub active_sub_tab_tracker: BTreeMap<PanelId, Option<PanelId>>,
    pub current_active_main_tab_id: Option<PanelId>,
    pub active_nested_submenu_id: Option<PanelId>,
    pub active_mobile_nested_submenu_id: Option<String>,
    /// Set once the home panel has been hidden by the first section navigation
    pub home_retired: bool,
}

impl NavigationState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remembered child of `container`, if any
    pub fn tracked(&self, container: &str) -> Option<&PanelId> {
        self.active_sub_tab_tracker
            .get(container)
            .and_then(Option::as_ref)
    }

    pub fn track(&mut self, container: PanelId, section: PanelId) {
        self.active_sub_tab_tracker.insert(container, Some(section));
    }

    /// Forget the child of `container`, keeping the key
    pub fn clear_tracked(&mut self, container: &str) {
        if let Some(entry) = self.active_sub_tab_tracker.get_mut(container) {
            *entry = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clear_keeps_key() {
        let mut state = NavigationState::new();
        state.track(PanelId::from("trnmMain"), PanelId::from("combine"));
        assert_eq!(state.tracked("trnmMain").unwrap(), "combine");

        state.clear_tracked("trnmMain");
        assert!(state.tracked("trnmMain").is_none());
        assert!(state.active_sub_tab_tracker.contains_key("trnmMain"));
    }

    #[test]
    fn test_clear_unknown_key_does_not_insert() {
        let mut state = NavigationState::new();
        state.clear_tracked("actgMain");
        assert!(state.active_sub_tab_tracker.is_empty());
    }
}
