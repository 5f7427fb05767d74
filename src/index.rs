//! Arena of panels built once from the layout
//!
//! Every panel lives in one of three vectors and is addressed by position.
//! `by_id` gives O(1) lookups from panel ids, `by_element` from the ids of the
//! dropdowns, drawer parts and modals that take part in click handling.

use std::collections::HashMap;

use crate::error::{NavError, NavResult};
use crate::ids::{PanelId, PanelKind, SectionLevel};
use crate::layout::{ClassNames, MobileLayout, NavLayout};

#[derive(Debug, Clone)]
pub struct TabEntry {
    pub id: PanelId,
    pub button: String,
    pub dropdown: Option<String>,
    pub sections_wrapper: Option<usize>,
    pub default_section: Option<usize>,
    /// Sections whose group is this tab
    pub sections: Vec<usize>,
}

#[derive(Debug, Clone)]
pub struct SectionEntry {
    pub id: PanelId,
    pub group: usize,
    pub owner: Option<PanelId>,
    pub menu_item: Option<String>,
    pub host: Option<usize>,
    pub level: SectionLevel,
    /// Tracker key when this section is a level-2 container
    pub level_two_key: Option<PanelId>,
}

#[derive(Debug, Clone)]
pub struct NestedEntry {
    pub id: PanelId,
    pub toggle: String,
    pub dropdown: String,
    pub module: PanelId,
    pub parent_container: PanelId,
    pub default_section: Option<usize>,
    pub module_section: Option<usize>,
}

#[derive(Debug, Clone)]
pub struct MobileNestedEntry {
    pub id: String,
    pub toggle: String,
    pub submenu: String,
    pub mirrors: usize,
}

/// Position of a panel in the arena
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelSlot {
    Home,
    Tab(usize),
    Section(usize),
    Nested(usize),
}

impl PanelSlot {
    pub fn kind(&self) -> PanelKind {
        match self {
            PanelSlot::Home | PanelSlot::Tab(_) => PanelKind::MainTab,
            PanelSlot::Section(_) => PanelKind::Section,
            PanelSlot::Nested(_) => PanelKind::NestedSubmenu,
        }
    }
}

/// Role a non-panel element plays in the navigation UI
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementRole {
    /// Top-level dropdown of the tab at this position
    Dropdown(usize),
    MobileDrawer,
    MobileToggle,
    MobileNestedSubmenu(usize),
    Modal,
}

#[derive(Debug, Clone)]
pub struct PanelIndex {
    pub home: PanelId,
    pub audit_root: usize,
    pub admin_top: Option<usize>,
    pub tabs: Vec<TabEntry>,
    pub sections: Vec<SectionEntry>,
    pub nested: Vec<NestedEntry>,
    pub classes: ClassNames,
    pub transition_ms: u64,
    pub mobile: Option<MobileIndex>,
    pub protected_markers: Vec<String>,
    pub modal_ids: Vec<String>,
    by_id: HashMap<PanelId, PanelSlot>,
    by_element: HashMap<String, ElementRole>,
}

/// Mobile drawer subtree, with tab positions resolved
#[derive(Debug, Clone)]
pub struct MobileIndex {
    pub drawer: String,
    pub toggle: String,
    /// `(tab, button, submenu)` per mobile tab entry
    pub tabs: Vec<(usize, String, Option<String>)>,
    pub nested: Vec<MobileNestedEntry>,
}

impl PanelIndex {
    /// Flatten a layout into the arena. The layout is validated first.
    pub fn build(layout: &NavLayout) -> NavResult<Self> {
        layout.validate()?;

        let mut by_id = HashMap::new();
        by_id.insert(layout.home.clone(), PanelSlot::Home);
        for (i, tab) in layout.main_tabs.iter().enumerate() {
            by_id.insert(tab.id.clone(), PanelSlot::Tab(i));
        }
        for (i, section) in layout.sections.iter().enumerate() {
            by_id.insert(section.id.clone(), PanelSlot::Section(i));
        }
        for (i, nested) in layout.nested_submenus.iter().enumerate() {
            by_id.insert(nested.id.clone(), PanelSlot::Nested(i));
        }

        let section_pos = |id: &PanelId| -> NavResult<usize> {
            match by_id.get(id) {
                Some(PanelSlot::Section(i)) => Ok(*i),
                _ => Err(NavError::UnknownPanel(id.to_string())),
            }
        };
        let tab_pos = |id: &PanelId| -> NavResult<usize> {
            match by_id.get(id) {
                Some(PanelSlot::Tab(i)) => Ok(*i),
                _ => Err(NavError::UnknownPanel(id.to_string())),
            }
        };

        let mut tabs = Vec::with_capacity(layout.main_tabs.len());
        for spec in &layout.main_tabs {
            tabs.push(TabEntry {
                id: spec.id.clone(),
                button: spec.button.clone(),
                dropdown: spec.dropdown.clone(),
                sections_wrapper: spec.sections_wrapper.as_ref().map(section_pos).transpose()?,
                default_section: spec.default_section.as_ref().map(section_pos).transpose()?,
                sections: Vec::new(),
            });
        }

        let mut sections = Vec::with_capacity(layout.sections.len());
        for (i, spec) in layout.sections.iter().enumerate() {
            let group = tab_pos(&spec.group)?;
            tabs[group].sections.push(i);
            sections.push(SectionEntry {
                id: spec.id.clone(),
                group,
                owner: spec.owner.clone(),
                menu_item: spec.menu_item.clone(),
                host: spec.host.as_ref().map(section_pos).transpose()?,
                level: spec.level,
                level_two_key: layout
                    .level_two
                    .iter()
                    .find(|l| l.id == spec.id)
                    .map(|l| l.tracker_key.clone()),
            });
        }

        let mut nested = Vec::with_capacity(layout.nested_submenus.len());
        for spec in &layout.nested_submenus {
            nested.push(NestedEntry {
                id: spec.id.clone(),
                toggle: spec.toggle.clone(),
                dropdown: spec.dropdown.clone(),
                module: spec.module.clone(),
                parent_container: spec.parent_container.clone(),
                default_section: spec.default_section.as_ref().map(section_pos).transpose()?,
                module_section: spec.module_section.as_ref().map(section_pos).transpose()?,
            });
        }

        let mobile = layout
            .mobile
            .as_ref()
            .map(|m| Self::build_mobile(m, &tab_pos, &nested))
            .transpose()?;

        let audit_root = tab_pos(&layout.audit_root)?;
        let admin_top = layout.admin_top.as_ref().map(section_pos).transpose()?;

        let mut index = PanelIndex {
            home: layout.home.clone(),
            audit_root,
            admin_top,
            tabs,
            sections,
            nested,
            classes: layout.classes.clone(),
            transition_ms: layout.transition_ms,
            mobile,
            protected_markers: layout.protected.marker_classes.clone(),
            modal_ids: layout.protected.modal_ids.clone(),
            by_id,
            by_element: HashMap::new(),
        };
        index.index_elements();
        Ok(index)
    }

    fn build_mobile(
        mobile: &MobileLayout,
        tab_pos: &dyn Fn(&PanelId) -> NavResult<usize>,
        nested: &[NestedEntry],
    ) -> NavResult<MobileIndex> {
        let tabs = mobile
            .tabs
            .iter()
            .map(|t| Ok((tab_pos(&t.tab)?, t.button.clone(), t.submenu.clone())))
            .collect::<NavResult<Vec<_>>>()?;
        let nested = mobile
            .nested_submenus
            .iter()
            .map(|n| {
                let mirrors = nested
                    .iter()
                    .position(|d| d.id == n.mirrors)
                    .ok_or_else(|| NavError::UnknownSubmenu(n.mirrors.to_string()))?;
                Ok(MobileNestedEntry {
                    id: n.id.clone(),
                    toggle: n.toggle.clone(),
                    submenu: n.submenu.clone(),
                    mirrors,
                })
            })
            .collect::<NavResult<Vec<_>>>()?;
        Ok(MobileIndex {
            drawer: mobile.drawer.clone(),
            toggle: mobile.toggle.clone(),
            tabs,
            nested,
        })
    }

    fn index_elements(&mut self) {
        let mut roles = HashMap::new();
        for (i, tab) in self.tabs.iter().enumerate() {
            if let Some(dropdown) = &tab.dropdown {
                roles.insert(dropdown.clone(), ElementRole::Dropdown(i));
            }
        }
        if let Some(mobile) = &self.mobile {
            roles.insert(mobile.drawer.clone(), ElementRole::MobileDrawer);
            roles.insert(mobile.toggle.clone(), ElementRole::MobileToggle);
            for (i, nested) in mobile.nested.iter().enumerate() {
                roles.insert(nested.id.clone(), ElementRole::MobileNestedSubmenu(i));
            }
        }
        for modal in &self.modal_ids {
            roles.insert(modal.clone(), ElementRole::Modal);
        }
        self.by_element = roles;
    }

    pub fn slot(&self, id: &str) -> Option<PanelSlot> {
        self.by_id.get(id).copied()
    }

    /// What the element with this id drives, if anything
    pub fn role_of(&self, element: &str) -> Option<ElementRole> {
        self.by_element.get(element).copied()
    }

    pub fn tab_pos(&self, id: &str) -> NavResult<usize> {
        match self.slot(id) {
            Some(PanelSlot::Tab(i)) => Ok(i),
            _ => Err(NavError::UnknownPanel(id.to_string())),
        }
    }

    pub fn section_pos(&self, id: &str) -> NavResult<usize> {
        match self.slot(id) {
            Some(PanelSlot::Section(i)) => Ok(i),
            _ => Err(NavError::UnknownPanel(id.to_string())),
        }
    }

    pub fn nested_pos(&self, id: &str) -> NavResult<usize> {
        match self.slot(id) {
            Some(PanelSlot::Nested(i)) => Ok(i),
            _ => Err(NavError::UnknownSubmenu(id.to_string())),
        }
    }

    /// CSS class marking the section at `pos` visible
    pub fn section_class(&self, pos: usize) -> &str {
        self.classes.for_level(self.sections[pos].level)
    }

    /// Hosts of the section at `pos` followed by the section itself, outermost first
    pub fn reveal_chain(&self, pos: usize) -> Vec<usize> {
        let mut chain = vec![pos];
        let mut current = pos;
        while let Some(host) = self.sections[current].host {
            if chain.contains(&host) {
                break;
            }
            chain.push(host);
            current = host;
        }
        chain.reverse();
        chain
    }

    /// Sections hosted (directly or not) by the section at `pos`
    pub fn descendants(&self, pos: usize) -> Vec<usize> {
        (0..self.sections.len())
            .filter(|&i| i != pos && self.reveal_chain(i).contains(&pos))
            .collect()
    }

    pub fn is_level_two(&self, pos: usize) -> bool {
        self.sections[pos].level_two_key.is_some()
    }

    pub fn is_admin_top(&self, pos: usize) -> bool {
        self.admin_top == Some(pos)
    }

    /// Key under which the tracker remembers `sub` when opened from `parent`
    pub fn tracker_key(&self, parent: &str, sub: usize) -> PanelId {
        let section = &self.sections[sub];
        if let Some(key) = &section.level_two_key {
            return key.clone();
        }
        section
            .owner
            .clone()
            .unwrap_or_else(|| PanelId::from(parent))
    }

    /// Position of a drawer nested submenu in [`MobileIndex::nested`]
    pub fn mobile_nested_pos(&self, id: &str) -> NavResult<usize> {
        match self.role_of(id) {
            Some(ElementRole::MobileNestedSubmenu(i)) => Ok(i),
            _ => Err(NavError::UnknownSubmenu(id.to_string())),
        }
    }

    /// Nested submenus inside the given dropdown
    pub fn nested_in_dropdown<'a>(&'a self, dropdown: &'a str) -> impl Iterator<Item = usize> + 'a {
        self.nested
            .iter()
            .enumerate()
            .filter(move |(_, n)| n.dropdown == dropdown)
            .map(|(i, _)| i)
    }

    pub fn mobile(&self) -> Option<&MobileIndex> {
        self.mobile.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index() -> PanelIndex {
        PanelIndex::build(&NavLayout::dashboard()).unwrap()
    }

    #[test]
    fn test_lookup_by_panel_and_element() {
        let index = index();
        let actg = index.tab_pos("actgMain").unwrap();
        assert_eq!(index.role_of("accountingSubmenu"), Some(ElementRole::Dropdown(actg)));
        assert_eq!(index.role_of("mobileNav"), Some(ElementRole::MobileDrawer));
        assert_eq!(index.role_of("reportModal"), Some(ElementRole::Modal));
        assert_eq!(index.role_of("actgTabBtn"), None);
        assert_eq!(index.mobile_nested_pos("m_trnmSubmenuNested").unwrap(), 0);
        assert!(matches!(
            index.mobile_nested_pos("trnmSubmenuNested"),
            Err(NavError::UnknownSubmenu(_))
        ));
        assert_eq!(index.slot("trnmSubmenuNested").unwrap().kind(), PanelKind::NestedSubmenu);
        assert!(matches!(index.section_pos("actgMain"), Err(NavError::UnknownPanel(_))));
    }

    #[test]
    fn test_reveal_chain_is_outermost_first() {
        let index = index();
        let combine = index.section_pos("combine").unwrap();
        let wrapper = index.section_pos("trnmMainSection").unwrap();
        assert_eq!(index.reveal_chain(combine), vec![wrapper, combine]);
        assert!(index.descendants(wrapper).contains(&combine));
    }

    #[test]
    fn test_tracker_keys() {
        let index = index();
        let combine = index.section_pos("combine").unwrap();
        let trnm = index.section_pos("trnmMainSection").unwrap();
        let ops = index.section_pos("operationsDashboardSection").unwrap();
        let aging = index.section_pos("agingConsolidatedSection").unwrap();

        assert_eq!(index.tracker_key("auditToolMainPage", combine), "trnmMain");
        assert_eq!(index.tracker_key("auditToolMainPage", trnm), "trnmMain");
        assert_eq!(index.tracker_key("operationsMain", ops), "operationsDashboardSection");
        assert_eq!(index.tracker_key("auditToolMainPage", aging), "auditToolMainPage");
        assert!(index.is_level_two(trnm));
        assert!(!index.is_level_two(combine));
    }

    #[test]
    fn test_nested_in_dropdown() {
        let index = index();
        let audit: Vec<_> = index.nested_in_dropdown("auditSubmenu").collect();
        assert_eq!(audit.len(), 4);
        assert_eq!(index.nested_in_dropdown("adminSubmenu").count(), 1);
    }
}
