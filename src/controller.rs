//! The single navigation controller owning all navigation state
//!
//! Desktop, mobile and outside-click operations are implemented as `impl` blocks
//! in their own modules; this one holds the shared plumbing.

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::command::NavCommand;
use crate::dom::{Display, Document};
use crate::error::{NavError, NavResult};
use crate::ids::PanelId;
use crate::index::PanelIndex;
use crate::layout::NavLayout;
use crate::outside_click::OutsideClickCollapseService;
use crate::registry::InitializerRegistry;
use crate::state::NavigationState;
use crate::visibility::VisibilityController;

/// Options for the section-opening path shared by every caller
#[derive(Debug, Clone, Copy)]
pub(crate) struct SubTabOptions {
    /// Collapse top-level dropdowns after opening an ordinary leaf section
    pub close_dropdowns: bool,
    /// Revisiting the tracked section hides it
    pub allow_toggle_off: bool,
}

impl SubTabOptions {
    pub(crate) const MENU_ITEM: SubTabOptions = SubTabOptions {
        close_dropdowns: true,
        allow_toggle_off: true,
    };

    pub(crate) const MODULE_DEFAULT: SubTabOptions = SubTabOptions {
        close_dropdowns: false,
        allow_toggle_off: false,
    };
}

/// Serializable view of what is on screen
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NavSnapshot {
    pub state: NavigationState,
    pub visible_panels: Vec<PanelId>,
    pub open_dropdowns: Vec<String>,
    pub expanded_nested_submenus: Vec<PanelId>,
    pub drawer_open: bool,
    pub scroll_locked: bool,
}

/// Navigation controller for one page
pub struct NavigationController<D: Document> {
    pub(crate) doc: D,
    pub(crate) index: PanelIndex,
    pub(crate) state: NavigationState,
    pub(crate) visibility: VisibilityController,
    pub(crate) registry: InitializerRegistry,
    pub(crate) outside_click: OutsideClickCollapseService,
    message_hook: Option<Box<dyn FnMut()>>,
}

impl<D: Document> NavigationController<D> {
    pub fn new(layout: &NavLayout, doc: D) -> NavResult<Self> {
        Ok(Self::with_index(PanelIndex::build(layout)?, doc))
    }

    pub fn with_index(index: PanelIndex, doc: D) -> Self {
        let visibility = VisibilityController::new(index.transition_ms);
        let outside_click = OutsideClickCollapseService::new(&index);
        Self {
            doc,
            index,
            state: NavigationState::new(),
            visibility,
            registry: InitializerRegistry::new(),
            outside_click,
            message_hook: None,
        }
    }

    // ========================
    // Collaborators
    // ========================

    /// Register the initializer run whenever `panel` is shown
    pub fn register_initializer(&mut self, panel: &str, init: impl FnMut() + 'static) -> bool {
        match self.index.slot(panel) {
            Some(slot) => debug!("initializer registered for {:?} '{}'", slot.kind(), panel),
            None => warn!("initializer registered for '{}', which is not in the layout", panel),
        }
        self.registry.register(panel, init)
    }

    /// Callback dismissing the transient status banner after each navigation
    pub fn set_message_hook(&mut self, hook: impl FnMut() + 'static) {
        self.message_hook = Some(Box::new(hook));
    }

    pub(crate) fn hide_message(&mut self) {
        if let Some(hook) = self.message_hook.as_mut() {
            hook();
        }
    }

    pub fn state(&self) -> &NavigationState {
        &self.state
    }

    pub fn document(&self) -> &D {
        &self.doc
    }

    pub fn document_mut(&mut self) -> &mut D {
        &mut self.doc
    }

    // ========================
    // Timing
    // ========================

    pub fn on_animation_frame(&mut self) {
        self.visibility.on_animation_frame(&mut self.doc);
    }

    pub fn advance(&mut self, elapsed_ms: u64) {
        self.visibility.advance(&mut self.doc, elapsed_ms);
    }

    /// Finish every pending transition
    pub fn settle(&mut self) {
        self.visibility.settle(&mut self.doc);
    }

    pub fn has_frame_work(&self) -> bool {
        self.visibility.has_frame_work()
    }

    pub fn next_deadline(&self) -> Option<u64> {
        self.visibility.next_deadline()
    }

    // ========================
    // Commands
    // ========================

    /// Apply a command, reporting failures to the caller
    pub fn apply(&mut self, command: NavCommand) -> NavResult<()> {
        match command {
            NavCommand::OpenTab { tab_id } => self.open_tab(&tab_id),
            NavCommand::OpenSubTab {
                parent_container_id,
                sub_item_id,
                default_sub_sub_item_id,
            } => self.open_sub_tab(
                &parent_container_id,
                &sub_item_id,
                default_sub_sub_item_id.as_deref(),
            ),
            NavCommand::ToggleNestedSubmenu { submenu_id } => self.toggle_nested_submenu(&submenu_id),
            NavCommand::OpenMobileTab { tab_id } => self.open_mobile_tab_and_toggle_submenu(&tab_id),
            NavCommand::OpenMobileSubTab {
                parent_container_id,
                sub_item_id,
                default_sub_sub_item_id,
            } => self.open_mobile_sub_tab(
                &parent_container_id,
                &sub_item_id,
                default_sub_sub_item_id.as_deref(),
            ),
            NavCommand::ToggleMobileNestedSubmenu { submenu_id } => {
                self.toggle_mobile_nested_submenu(&submenu_id)
            }
            NavCommand::ToggleMobileMenu => self.toggle_mobile_menu(),
            NavCommand::CloseMobileMenu => self.close_mobile_menu(),
            NavCommand::DocumentClick { path } => {
                self.handle_document_click(&path);
                Ok(())
            }
            NavCommand::Resize => {
                self.handle_resize();
                Ok(())
            }
        }
    }

    /// Handler entry point: failures are logged, never propagated
    pub fn dispatch(&mut self, command: NavCommand) -> bool {
        let name = command.name();
        match self.apply(command) {
            Ok(()) => true,
            Err(e) => {
                warn!("{} aborted: {}", name, e);
                false
            }
        }
    }

    // ========================
    // Shared helpers
    // ========================

    /// Fail unless the element is in the document
    pub(crate) fn require(&self, element: &str) -> NavResult<()> {
        if self.doc.contains(element) {
            Ok(())
        } else {
            Err(NavError::MissingElement(element.to_string()))
        }
    }

    pub(crate) fn show_tab(&mut self, pos: usize) {
        let id = self.index.tabs[pos].id.clone();
        let class = self.index.classes.active.clone();
        self.visibility.show(&mut self.doc, id.as_str(), &class);
    }

    pub(crate) fn hide_tab(&mut self, pos: usize) {
        let id = self.index.tabs[pos].id.clone();
        let class = self.index.classes.active.clone();
        self.visibility.hide(&mut self.doc, id.as_str(), &class);
    }

    pub(crate) fn is_tab_shown(&self, pos: usize) -> bool {
        let id = self.index.tabs[pos].id.as_str();
        self.doc.display(id) == Display::Block || self.doc.has_class(id, &self.index.classes.active)
    }

    pub(crate) fn show_section(&mut self, pos: usize) {
        let id = self.index.sections[pos].id.clone();
        let class = self.index.section_class(pos).to_string();
        self.visibility.show(&mut self.doc, id.as_str(), &class);
    }

    pub(crate) fn hide_section(&mut self, pos: usize) {
        let id = self.index.sections[pos].id.clone();
        let class = self.index.section_class(pos).to_string();
        self.visibility.hide(&mut self.doc, id.as_str(), &class);
    }

    pub(crate) fn is_section_shown(&self, pos: usize) -> bool {
        let id = self.index.sections[pos].id.as_str();
        self.doc.display(id) == Display::Block
            || self.doc.has_class(id, self.index.section_class(pos))
    }

    /// Hide every shown section except those in `keep`
    pub(crate) fn hide_sections_except(&mut self, keep: &[usize]) {
        for pos in 0..self.index.sections.len() {
            if !keep.contains(&pos) && self.is_section_shown(pos) {
                self.hide_section(pos);
            }
        }
    }

    /// Show the section's hosts and then the section
    pub(crate) fn reveal_section(&mut self, pos: usize) {
        for step in self.index.reveal_chain(pos) {
            self.show_section(step);
        }
    }

    pub(crate) fn clear_menu_items(&mut self) {
        let active = self.index.classes.active.clone();
        for section in &self.index.sections {
            if let Some(item) = &section.menu_item {
                self.doc.remove_class(item, &active);
            }
        }
    }

    pub(crate) fn mark_menu_item(&mut self, pos: usize, on: bool) {
        if let Some(item) = self.index.sections[pos].menu_item.clone() {
            let active = self.index.classes.active.clone();
            if on {
                self.doc.add_class(&item, &active);
            } else {
                self.doc.remove_class(&item, &active);
            }
        }
    }

    pub(crate) fn run_initializer(&mut self, panel: &str) {
        self.registry.run_if_registered(panel);
    }

    /// Hide the home panel the first time any section is opened
    pub(crate) fn retire_home(&mut self) {
        let home = self.index.home.clone();
        let active = self.index.classes.active.clone();
        if self.doc.has_class(home.as_str(), &active) {
            debug!("retiring home panel '{}'", home);
            self.visibility.hide(&mut self.doc, home.as_str(), &active);
        }
        self.state.home_retired = true;
    }

    /// Snapshot of state and visible panels, sorted for stable output
    pub fn snapshot(&self) -> NavSnapshot {
        let classes = &self.index.classes;
        let shown = |id: &str, class: &str| {
            self.doc.display(id) == Display::Block && self.doc.has_class(id, class)
        };

        let mut visible_panels = Vec::new();
        if shown(self.index.home.as_str(), &classes.active) {
            visible_panels.push(self.index.home.clone());
        }
        for tab in &self.index.tabs {
            if shown(tab.id.as_str(), &classes.active) {
                visible_panels.push(tab.id.clone());
            }
        }
        for (pos, section) in self.index.sections.iter().enumerate() {
            if shown(section.id.as_str(), self.index.section_class(pos)) {
                visible_panels.push(section.id.clone());
            }
        }
        visible_panels.sort();

        let mut open_dropdowns: Vec<String> = self
            .index
            .tabs
            .iter()
            .filter_map(|t| t.dropdown.clone())
            .filter(|d| self.doc.has_class(d, &classes.active))
            .collect();
        if let Some(mobile) = self.index.mobile() {
            open_dropdowns.extend(
                mobile
                    .tabs
                    .iter()
                    .filter_map(|(_, _, submenu)| submenu.clone())
                    .filter(|s| self.doc.has_class(s, &classes.active)),
            );
        }
        open_dropdowns.sort();

        let mut expanded_nested_submenus: Vec<PanelId> = self
            .index
            .nested
            .iter()
            .filter(|n| self.doc.has_class(n.id.as_str(), &classes.expanded))
            .map(|n| n.id.clone())
            .collect();
        expanded_nested_submenus.sort();

        let drawer_open = self
            .index
            .mobile()
            .is_some_and(|m| self.doc.has_class(&m.drawer, &classes.drawer_open));

        NavSnapshot {
            state: self.state.clone(),
            visible_panels,
            open_dropdowns,
            expanded_nested_submenus,
            drawer_open,
            scroll_locked: self.doc.scroll_locked(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::HeadlessDocument;
    use std::cell::Cell;
    use std::rc::Rc;

    fn controller() -> NavigationController<HeadlessDocument> {
        let layout = NavLayout::dashboard();
        let doc = HeadlessDocument::from_layout(&layout);
        NavigationController::new(&layout, doc).unwrap()
    }

    #[test]
    fn test_fresh_controller_shows_home_only() {
        let nav = controller();
        let snapshot = nav.snapshot();
        assert_eq!(snapshot.visible_panels, vec![PanelId::from("home")]);
        assert!(snapshot.open_dropdowns.is_empty());
        assert!(snapshot.state.active_sub_tab_tracker.is_empty());
        assert!(snapshot.state.current_active_main_tab_id.is_none());
    }

    #[test]
    fn test_dispatch_swallows_errors() {
        let mut nav = controller();
        let before = nav.state().clone();

        assert!(!nav.dispatch(NavCommand::open_tab("noSuchTab")));
        assert!(!nav.dispatch(NavCommand::open_sub_tab("actgMain", "noSuchSection")));
        assert_eq!(nav.state(), &before);
    }

    #[test]
    fn test_missing_element_leaves_state_unchanged() {
        let mut nav = controller();
        nav.document_mut().remove("actgGl");
        let before = nav.state().clone();

        let result = nav.apply(NavCommand::open_sub_tab("actgMain", "actgGl"));
        assert!(matches!(result, Err(NavError::MissingElement(id)) if id == "actgGl"));
        assert_eq!(nav.state(), &before);
        assert!(nav.document().is_shown("home", "active"));
    }

    #[test]
    fn test_message_hook_runs_after_navigation() {
        let mut nav = controller();
        let dismissed = Rc::new(Cell::new(0));
        let counter = dismissed.clone();
        nav.set_message_hook(move || counter.set(counter.get() + 1));

        nav.dispatch(NavCommand::open_tab("actgMain"));
        nav.dispatch(NavCommand::open_sub_tab("actgMain", "actgJournal"));
        assert_eq!(dismissed.get(), 2);
    }

    #[test]
    fn test_snapshot_serializes() {
        let mut nav = controller();
        nav.dispatch(NavCommand::open_tab("actgMain"));
        nav.settle();
        let json = serde_json::to_value(nav.snapshot()).unwrap();
        assert_eq!(json["state"]["current_active_main_tab_id"], "actgMain");
        assert_eq!(json["open_dropdowns"][0], "accountingSubmenu");
    }
}
