//! Top-bar navigation: main tabs, sections and nested submenus
//!
//! Every operation checks the elements it is about to touch before mutating
//! anything, so an aborted operation leaves [`NavigationState`] as it was.
//!
//! [`NavigationState`]: crate::state::NavigationState

use log::debug;

use crate::controller::{NavigationController, SubTabOptions};
use crate::dom::Document;
use crate::error::NavResult;
use crate::ids::PanelId;

impl<D: Document> NavigationController<D> {
    /// Open a main tab, or close its dropdown when it is already open
    pub fn open_tab(&mut self, tab_name: &str) -> NavResult<()> {
        let pos = self.index.tab_pos(tab_name)?;
        let tab = &self.index.tabs[pos];
        self.require(tab.id.as_str())?;
        self.require(&tab.button)?;
        if let Some(dropdown) = &tab.dropdown {
            self.require(dropdown)?;
        }
        let default = self.default_section_of(pos);
        if let Some(section) = default {
            self.require_chain(section)?;
        }

        let tab = &self.index.tabs[pos];
        let classes = &self.index.classes;
        let already_open = self.state.current_active_main_tab_id.as_ref() == Some(&tab.id)
            && self.doc.has_class(&tab.button, &classes.active)
            && tab
                .dropdown
                .as_ref()
                .is_some_and(|d| self.doc.has_class(d, &classes.active));
        if already_open {
            debug!("closing dropdown of '{}'", tab_name);
            self.close_dropdown(pos);
            return Ok(());
        }

        self.close_all_top_level_dropdowns();
        self.switch_main_tab(pos);

        let tab = &self.index.tabs[pos];
        match tab.dropdown.clone() {
            Some(dropdown) => {
                let button = tab.button.clone();
                let expanded = self.index.classes.expanded.clone();
                let active = self.index.classes.active.clone();
                self.doc.toggle_class(&button, &expanded);
                self.doc.toggle_class(&dropdown, &active);
            }
            None => {
                let id = tab.id.clone();
                self.run_initializer(id.as_str());
            }
        }

        self.hide_message();
        Ok(())
    }

    /// Show the tab's content with its remembered or default section
    pub(crate) fn switch_main_tab(&mut self, pos: usize) {
        let default = self.default_section_of(pos);
        let keep = default.map(|s| self.index.reveal_chain(s)).unwrap_or_default();

        self.activate_tab(pos);
        self.hide_sections_except(&keep);
        self.clear_menu_items();

        if let Some(section) = default {
            let tab_id = self.index.tabs[pos].id.clone();
            let section_id = self.index.sections[section].id.clone();
            debug!("'{}' lands on '{}'", tab_id, section_id);

            self.reveal_section(section);
            self.mark_menu_item(section, true);
            self.run_initializer(section_id.as_str());
            self.state.track(tab_id, section_id);
        }
    }

    /// Remembered child of the tab, falling back to its configured default
    pub(crate) fn default_section_of(&self, pos: usize) -> Option<usize> {
        let tab = &self.index.tabs[pos];
        self.state
            .tracked(tab.id.as_str())
            .and_then(|id| self.index.section_pos(id.as_str()).ok())
            .or(tab.default_section)
    }

    /// Make `pos` the only active main tab. The home panel is left alone.
    pub(crate) fn activate_tab(&mut self, pos: usize) {
        for other in 0..self.index.tabs.len() {
            if other != pos && self.is_tab_shown(other) {
                self.hide_tab(other);
            }
        }
        self.show_tab(pos);

        let active = self.index.classes.active.clone();
        for (i, tab) in self.index.tabs.iter().enumerate() {
            if i == pos {
                self.doc.add_class(&tab.button, &active);
            } else {
                self.doc.remove_class(&tab.button, &active);
            }
        }
        self.state.current_active_main_tab_id = Some(self.index.tabs[pos].id.clone());
    }

    pub(crate) fn require_chain(&self, section: usize) -> NavResult<()> {
        for step in self.index.reveal_chain(section) {
            self.require(self.index.sections[step].id.as_str())?;
        }
        Ok(())
    }

    /// Show a section from a dropdown entry
    pub fn open_sub_tab(
        &mut self,
        parent_container_id: &str,
        sub_item_id: &str,
        default_sub_sub_item_id: Option<&str>,
    ) -> NavResult<()> {
        self.open_sub_tab_with(
            parent_container_id,
            sub_item_id,
            default_sub_sub_item_id,
            SubTabOptions::MENU_ITEM,
        )
    }

    pub(crate) fn open_sub_tab_with(
        &mut self,
        parent_container_id: &str,
        sub_item_id: &str,
        default_sub_sub_item_id: Option<&str>,
        options: SubTabOptions,
    ) -> NavResult<()> {
        let parent = self.index.tab_pos(parent_container_id)?;
        let sub = self.index.section_pos(sub_item_id)?;
        let nested_default = default_sub_sub_item_id
            .map(|id| self.index.section_pos(id))
            .transpose()?;
        self.require(parent_container_id)?;
        self.require_chain(sub)?;
        if let Some(nested) = nested_default {
            self.require_chain(nested)?;
        }

        self.retire_home();

        let key = self.index.tracker_key(parent_container_id, sub);
        let is_container = self.index.is_level_two(sub) || self.index.is_admin_top(sub);

        let revisit = self.state.tracked(key.as_str()).is_some_and(|s| s == sub_item_id)
            && default_sub_sub_item_id.is_none();
        if revisit && self.index.is_admin_top(sub) {
            debug!("'{}' is already open", sub_item_id);
            self.hide_message();
            return Ok(());
        }
        if revisit && options.allow_toggle_off {
            debug!("toggling off '{}' under '{}'", sub_item_id, key);
            for section in self.index.descendants(sub) {
                if self.is_section_shown(section) {
                    self.hide_section(section);
                }
            }
            self.hide_section(sub);
            self.mark_menu_item(sub, false);
            self.state.clear_tracked(key.as_str());
            self.hide_message();
            return Ok(());
        }

        self.state.track(key, PanelId::from(sub_item_id));
        self.clear_menu_items();

        let mut reveal = self.index.reveal_chain(sub);
        let audit_branch = parent == self.index.audit_root;
        // a nested default is only shown when the target actually hosts it
        let nested_default =
            nested_default.filter(|&n| audit_branch && self.index.reveal_chain(n).contains(&sub));
        if let Some(nested) = nested_default {
            for step in self.index.reveal_chain(nested) {
                if !reveal.contains(&step) {
                    reveal.push(step);
                }
            }
        }
        if !audit_branch {
            if let Some(wrapper) = self.index.tabs[parent].sections_wrapper {
                if !reveal.contains(&wrapper) {
                    reveal.insert(0, wrapper);
                }
            }
        }

        self.hide_sections_except(&reveal);
        if self.state.current_active_main_tab_id.as_ref() != Some(&self.index.tabs[parent].id)
            || !self.is_tab_shown(parent)
        {
            self.activate_tab(parent);
        }
        for section in reveal.iter().copied() {
            self.show_section(section);
        }
        if audit_branch {
            self.doc.scroll_into_view(sub_item_id);
        }

        self.mark_menu_item(sub, true);
        self.run_initializer(sub_item_id);
        if let Some(nested) = nested_default {
            let nested_id = self.index.sections[nested].id.clone();
            self.mark_menu_item(nested, true);
            self.run_initializer(nested_id.as_str());
        }

        if options.close_dropdowns && !is_container {
            self.close_all_top_level_dropdowns();
        }
        self.hide_message();
        Ok(())
    }

    /// Expand or collapse a third-level submenu inside a dropdown
    pub fn toggle_nested_submenu(&mut self, submenu_id: &str) -> NavResult<()> {
        let pos = self.index.nested_pos(submenu_id)?;
        let nested = &self.index.nested[pos];
        self.require(nested.id.as_str())?;
        self.require(&nested.toggle)?;
        self.index.tab_pos(nested.parent_container.as_str())?;
        self.require(nested.parent_container.as_str())?;
        let default = self.module_default(pos);
        if let Some(section) = default {
            self.require_chain(section)?;
        }

        let expanded = self.index.classes.expanded.clone();
        let was_expanded = self.doc.has_class(submenu_id, &expanded);

        let dropdown = self.index.nested[pos].dropdown.clone();
        let siblings: Vec<usize> = self
            .index
            .nested_in_dropdown(&dropdown)
            .filter(|&i| i != pos)
            .collect();
        for sibling in siblings {
            self.collapse_nested_dom(sibling);
        }

        if was_expanded {
            self.collapse_nested_dom(pos);
            self.state.active_nested_submenu_id = None;
            self.deactivate_module(pos);
            return Ok(());
        }

        self.expand_nested_dom(pos);
        self.state.active_nested_submenu_id = Some(PanelId::from(submenu_id));
        self.activate_module(pos, default)
    }

    /// Default child for a nested submenu: tracker first, then the configured default
    pub(crate) fn module_default(&self, pos: usize) -> Option<usize> {
        let nested = &self.index.nested[pos];
        self.state
            .tracked(nested.module.as_str())
            .and_then(|id| self.index.section_pos(id.as_str()).ok())
            .or(nested.default_section)
    }

    /// Open the default section of the submenu's module, or reveal the module section
    pub(crate) fn activate_module(&mut self, pos: usize, default: Option<usize>) -> NavResult<()> {
        let nested = &self.index.nested[pos];
        match default {
            Some(section) => {
                let parent = nested.parent_container.clone();
                let section_id = self.index.sections[section].id.clone();
                debug!("'{}' opens '{}'", nested.id, section_id);
                self.open_sub_tab_with(
                    parent.as_str(),
                    section_id.as_str(),
                    None,
                    SubTabOptions::MODULE_DEFAULT,
                )
            }
            None => {
                if let Some(section) = nested.module_section {
                    self.reveal_section(section);
                }
                Ok(())
            }
        }
    }

    /// Hide the submenu's own module section and forget the module's child
    pub(crate) fn deactivate_module(&mut self, pos: usize) {
        let nested = &self.index.nested[pos];
        let module = nested.module.clone();
        if let Some(section) = nested.module_section {
            for child in self.index.descendants(section) {
                if self.is_section_shown(child) {
                    self.hide_section(child);
                }
            }
            if self.is_section_shown(section) {
                self.hide_section(section);
            }
        }
        debug!("collapsed module '{}'", module);
        self.state.clear_tracked(module.as_str());
    }

    fn expand_nested_dom(&mut self, pos: usize) {
        let nested = &self.index.nested[pos];
        let (id, toggle) = (nested.id.clone(), nested.toggle.clone());
        let classes = &self.index.classes;
        let (expanded, active) = (classes.expanded.clone(), classes.active.clone());
        self.doc.add_class(id.as_str(), &expanded);
        self.doc.add_class(&toggle, &expanded);
        self.doc.add_class(&toggle, &active);
    }

    pub(crate) fn collapse_nested_dom(&mut self, pos: usize) {
        let nested = &self.index.nested[pos];
        let (id, toggle) = (nested.id.clone(), nested.toggle.clone());
        let classes = &self.index.classes;
        let (expanded, active) = (classes.expanded.clone(), classes.active.clone());
        self.doc.remove_class(id.as_str(), &expanded);
        self.doc.remove_class(&toggle, &expanded);
        self.doc.remove_class(&toggle, &active);
    }

    fn close_dropdown(&mut self, pos: usize) {
        let tab = &self.index.tabs[pos];
        let Some(dropdown) = tab.dropdown.clone() else {
            return;
        };
        let button = tab.button.clone();
        let expanded = self.index.classes.expanded.clone();
        let active = self.index.classes.active.clone();
        self.doc.remove_class(&button, &expanded);
        self.doc.remove_class(&dropdown, &active);

        let nested: Vec<usize> = self.index.nested_in_dropdown(&dropdown).collect();
        for n in nested {
            self.collapse_nested_dom(n);
        }
    }

    /// Collapse every top-level dropdown and nested submenu
    pub fn close_all_top_level_dropdowns(&mut self) {
        for pos in 0..self.index.tabs.len() {
            self.close_dropdown(pos);
        }
        self.state.active_nested_submenu_id = None;
    }

    /// Whether any top-level dropdown is open
    pub fn any_dropdown_open(&self) -> bool {
        let active = &self.index.classes.active;
        self.index
            .tabs
            .iter()
            .filter_map(|t| t.dropdown.as_deref())
            .any(|d| self.doc.has_class(d, active))
    }
}
