//! Mobile drawer navigation
//!
//! Same operations as the top bar, driven from the drawer's own subtree. Section
//! tracking is shared with the desktop surface; the drawer additionally locks page
//! scrolling while it is open and closes after every leaf action.

use log::debug;

use crate::controller::NavigationController;
use crate::dom::Document;
use crate::error::{NavError, NavResult};
use crate::index::MobileIndex;

impl<D: Document> NavigationController<D> {
    fn mobile_index(&self, what: &str) -> NavResult<&MobileIndex> {
        self.index
            .mobile()
            .ok_or_else(|| NavError::NoMobileEntry(what.to_string()))
    }

    pub fn is_mobile_menu_open(&self) -> bool {
        self.index
            .mobile()
            .is_some_and(|m| self.doc.has_class(&m.drawer, &self.index.classes.drawer_open))
    }

    pub fn toggle_mobile_menu(&mut self) -> NavResult<()> {
        if self.is_mobile_menu_open() {
            self.close_mobile_menu()
        } else {
            self.open_mobile_menu()
        }
    }

    /// Drawer and its toggle, both present in the document
    fn drawer_parts(&self, what: &str) -> NavResult<(String, String)> {
        let mobile = self.mobile_index(what)?;
        self.require(&mobile.drawer)?;
        self.require(&mobile.toggle)?;
        Ok((mobile.drawer.clone(), mobile.toggle.clone()))
    }

    pub fn open_mobile_menu(&mut self) -> NavResult<()> {
        let (drawer, toggle) = self.drawer_parts("drawer")?;

        let open = self.index.classes.drawer_open.clone();
        let active = self.index.classes.active.clone();
        self.doc.add_class(&drawer, &open);
        self.doc.add_class(&toggle, &active);
        self.doc.set_scroll_locked(true);
        Ok(())
    }

    pub fn close_mobile_menu(&mut self) -> NavResult<()> {
        let (drawer, toggle) = self.drawer_parts("drawer")?;

        let open = self.index.classes.drawer_open.clone();
        let active = self.index.classes.active.clone();
        self.doc.remove_class(&drawer, &open);
        self.doc.remove_class(&toggle, &active);
        self.doc.set_scroll_locked(false);
        Ok(())
    }

    /// Tap on a main tab in the drawer
    ///
    /// Tabs with a submenu toggle it, switching the content to the tab when it
    /// opens. Tabs without one switch the content, run the tab's initializer and
    /// close the drawer.
    pub fn open_mobile_tab_and_toggle_submenu(&mut self, tab_name: &str) -> NavResult<()> {
        let pos = self.index.tab_pos(tab_name)?;
        let mobile = self.mobile_index(tab_name)?;
        let (button, submenu) = mobile
            .tabs
            .iter()
            .find(|(tab, _, _)| *tab == pos)
            .map(|(_, button, submenu)| (button.clone(), submenu.clone()))
            .ok_or_else(|| NavError::NoMobileEntry(tab_name.to_string()))?;
        self.require(&button)?;
        self.require(tab_name)?;
        match &submenu {
            Some(submenu) => self.require(submenu)?,
            None => {
                self.drawer_parts(tab_name)?;
            }
        }
        if let Some(section) = self.default_section_of(pos) {
            self.require_chain(section)?;
        }

        let active = self.index.classes.active.clone();
        let expanded = self.index.classes.expanded.clone();

        match submenu {
            Some(submenu) => {
                let was_open = self.doc.has_class(&submenu, &active);
                self.close_mobile_submenus();
                if was_open {
                    debug!("closing mobile submenu '{}'", submenu);
                } else {
                    self.doc.add_class(&submenu, &active);
                    self.doc.add_class(&button, &expanded);
                    self.switch_main_tab(pos);
                }
            }
            None => {
                self.close_mobile_submenus();
                self.switch_main_tab(pos);
                self.run_initializer(tab_name);
                self.close_mobile_menu()?;
            }
        }

        self.hide_message();
        Ok(())
    }

    /// Section entry in the drawer: opens the section and closes the drawer
    pub fn open_mobile_sub_tab(
        &mut self,
        parent_container_id: &str,
        sub_item_id: &str,
        default_sub_sub_item_id: Option<&str>,
    ) -> NavResult<()> {
        self.drawer_parts(sub_item_id)?;
        self.open_sub_tab(parent_container_id, sub_item_id, default_sub_sub_item_id)?;
        self.close_mobile_menu()
    }

    /// Expand or collapse a nested submenu in the drawer. The drawer stays open.
    pub fn toggle_mobile_nested_submenu(&mut self, submenu_id: &str) -> NavResult<()> {
        let mobile = self.mobile_index(submenu_id)?;
        let pos = self.index.mobile_nested_pos(submenu_id)?;
        let entry = mobile.nested[pos].clone();
        let siblings: Vec<usize> = mobile
            .nested
            .iter()
            .enumerate()
            .filter(|(i, n)| *i != pos && n.submenu == entry.submenu)
            .map(|(i, _)| i)
            .collect();
        self.require(&entry.id)?;
        self.require(&entry.toggle)?;
        let parent = &self.index.nested[entry.mirrors].parent_container;
        self.index.tab_pos(parent.as_str())?;
        self.require(parent.as_str())?;
        let default = self.module_default(entry.mirrors);
        if let Some(section) = default {
            self.require_chain(section)?;
        }

        let expanded = self.index.classes.expanded.clone();
        let was_expanded = self.doc.has_class(&entry.id, &expanded);
        for sibling in siblings {
            self.collapse_mobile_nested_dom(sibling);
        }

        if was_expanded {
            self.collapse_mobile_nested_dom(pos);
            self.state.active_mobile_nested_submenu_id = None;
            self.deactivate_module(entry.mirrors);
            return Ok(());
        }

        let active = self.index.classes.active.clone();
        self.doc.add_class(&entry.id, &expanded);
        self.doc.add_class(&entry.toggle, &expanded);
        self.doc.add_class(&entry.toggle, &active);
        self.state.active_mobile_nested_submenu_id = Some(entry.id.clone());
        self.activate_module(entry.mirrors, default)
    }

    fn collapse_mobile_nested_dom(&mut self, pos: usize) {
        let Some(mobile) = self.index.mobile() else {
            return;
        };
        let entry = &mobile.nested[pos];
        let (id, toggle) = (entry.id.clone(), entry.toggle.clone());
        let expanded = self.index.classes.expanded.clone();
        let active = self.index.classes.active.clone();
        self.doc.remove_class(&id, &expanded);
        self.doc.remove_class(&toggle, &expanded);
        self.doc.remove_class(&toggle, &active);
    }

    /// Close every mobile submenu and the nested submenus inside them
    fn close_mobile_submenus(&mut self) {
        let Some(mobile) = self.index.mobile() else {
            return;
        };
        let tabs = mobile.tabs.clone();
        let nested_count = mobile.nested.len();
        let active = self.index.classes.active.clone();
        let expanded = self.index.classes.expanded.clone();

        for (_, button, submenu) in &tabs {
            if let Some(submenu) = submenu {
                self.doc.remove_class(submenu, &active);
            }
            self.doc.remove_class(button, &expanded);
        }
        for pos in 0..nested_count {
            self.collapse_mobile_nested_dom(pos);
        }
        self.state.active_mobile_nested_submenu_id = None;
    }
}
