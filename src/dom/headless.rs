//! In-memory document used by tests, benchmarks and the replay binary

use std::collections::{BTreeSet, HashMap};

use super::{ClickNode, ClickPath, Display, Document};
use crate::layout::NavLayout;

pub const BODY_ID: &str = "body";

#[derive(Debug, Clone, Default)]
struct Element {
    parent: Option<String>,
    classes: BTreeSet<String>,
    display: Display,
}

/// Element tree kept entirely in memory
#[derive(Debug, Clone)]
pub struct HeadlessDocument {
    elements: HashMap<String, Element>,
    scroll_locked: bool,
    scrolled: Vec<String>,
}

impl Default for HeadlessDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl HeadlessDocument {
    /// Empty document containing only the body
    pub fn new() -> Self {
        let mut elements = HashMap::new();
        elements.insert(
            BODY_ID.to_string(),
            Element {
                display: Display::Block,
                ..Element::default()
            },
        );
        Self {
            elements,
            scroll_locked: false,
            scrolled: Vec::new(),
        }
    }

    /// Add an element. An existing element with the same id is replaced.
    pub fn insert(&mut self, id: &str, parent: Option<&str>, classes: &[&str]) -> &mut Self {
        self.elements.insert(
            id.to_string(),
            Element {
                parent: parent.map(str::to_string),
                classes: classes.iter().map(|c| c.to_string()).collect(),
                display: Display::None,
            },
        );
        self
    }

    pub fn remove(&mut self, id: &str) {
        self.elements.remove(id);
    }

    /// Markup matching the given layout, with only the home panel showing
    pub fn from_layout(layout: &NavLayout) -> Self {
        let mut doc = Self::new();
        doc.insert("topNav", Some(BODY_ID), &["top-nav"]);
        doc.insert("mainContent", Some(BODY_ID), &[]);
        doc.set_display("mainContent", Display::Block);

        doc.insert(layout.home.as_str(), Some("mainContent"), &["tab-content"]);
        doc.add_class(layout.home.as_str(), &layout.classes.active);
        doc.set_display(layout.home.as_str(), Display::Block);

        for tab in &layout.main_tabs {
            doc.insert(&tab.button, Some("topNav"), &["tab-button"]);
            if let Some(dropdown) = &tab.dropdown {
                doc.insert(dropdown, Some("topNav"), &["dropdown-menu"]);
            }
            doc.insert(tab.id.as_str(), Some("mainContent"), &["tab-content"]);
        }

        for nested in &layout.nested_submenus {
            doc.insert(&nested.toggle, Some(nested.dropdown.as_str()), &["nested-tab-button"]);
            doc.insert(nested.id.as_str(), Some(nested.dropdown.as_str()), &["nested-submenu"]);
        }

        for section in &layout.sections {
            let parent = section.host.as_ref().unwrap_or(&section.group);
            doc.insert(section.id.as_str(), Some(parent.as_str()), &["section-content"]);

            if let Some(item) = &section.menu_item {
                let nested_parent = layout
                    .nested_submenus
                    .iter()
                    .find(|n| section.owner.as_ref() == Some(&n.module))
                    .map(|n| n.id.as_str().to_string());
                let dropdown_parent = layout
                    .main_tabs
                    .iter()
                    .find(|t| t.id == section.group)
                    .and_then(|t| t.dropdown.clone());
                let parent = nested_parent
                    .or(dropdown_parent)
                    .unwrap_or_else(|| "topNav".to_string());
                doc.insert(item, Some(parent.as_str()), &["submenu-item"]);
            }
        }

        if let Some(mobile) = &layout.mobile {
            doc.insert(&mobile.drawer, Some(BODY_ID), &["mobile-drawer"]);
            doc.insert(&mobile.toggle, Some(BODY_ID), &["mobile-toggle"]);
            for tab in &mobile.tabs {
                doc.insert(&tab.button, Some(mobile.drawer.as_str()), &["mobile-tab-button"]);
                if let Some(submenu) = &tab.submenu {
                    doc.insert(submenu, Some(mobile.drawer.as_str()), &["mobile-submenu"]);
                }
            }
            for nested in &mobile.nested_submenus {
                doc.insert(&nested.toggle, Some(nested.submenu.as_str()), &["mobile-nested-button"]);
                doc.insert(&nested.id, Some(nested.submenu.as_str()), &["mobile-nested-submenu"]);
            }
        }

        for modal in &layout.protected.modal_ids {
            doc.insert(modal, Some(BODY_ID), &["modal"]);
        }

        doc
    }

    /// Path from `id` up to the body, as a browser click on that element would report it
    pub fn click_path(&self, id: &str) -> Option<ClickPath> {
        let mut nodes = Vec::new();
        let mut current = Some(id.to_string());
        while let Some(cur) = current {
            let element = self.elements.get(&cur)?;
            nodes.push(ClickNode {
                // the body carries no id in real markup
                id: (cur != BODY_ID).then(|| cur.clone()),
                classes: element.classes.iter().cloned().collect(),
            });
            if nodes.len() > self.elements.len() {
                break;
            }
            current = element.parent.clone();
        }
        Some(ClickPath(nodes))
    }

    /// Displayed and carrying the class that marks it visible
    pub fn is_shown(&self, id: &str, class: &str) -> bool {
        self.display(id) == Display::Block && self.has_class(id, class)
    }

    /// Elements scrolled into view, oldest first
    pub fn scroll_log(&self) -> &[String] {
        &self.scrolled
    }
}

impl Document for HeadlessDocument {
    fn contains(&self, id: &str) -> bool {
        self.elements.contains_key(id)
    }

    fn has_class(&self, id: &str, class: &str) -> bool {
        self.elements
            .get(id)
            .is_some_and(|e| e.classes.contains(class))
    }

    fn add_class(&mut self, id: &str, class: &str) {
        if let Some(element) = self.elements.get_mut(id) {
            element.classes.insert(class.to_string());
        }
    }

    fn remove_class(&mut self, id: &str, class: &str) {
        if let Some(element) = self.elements.get_mut(id) {
            element.classes.remove(class);
        }
    }

    fn display(&self, id: &str) -> Display {
        self.elements.get(id).map(|e| e.display).unwrap_or_default()
    }

    fn set_display(&mut self, id: &str, display: Display) {
        if let Some(element) = self.elements.get_mut(id) {
            element.display = display;
        }
    }

    fn scroll_into_view(&mut self, id: &str) {
        if self.contains(id) {
            self.scrolled.push(id.to_string());
        }
    }

    fn set_scroll_locked(&mut self, locked: bool) {
        self.scroll_locked = locked;
    }

    fn scroll_locked(&self) -> bool {
        self.scroll_locked
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_class_and_display_edits() {
        let mut doc = HeadlessDocument::new();
        doc.insert("panel", Some(BODY_ID), &["section-content"]);

        assert!(!doc.is_shown("panel", "active"));
        doc.set_display("panel", Display::Block);
        doc.add_class("panel", "active");
        assert!(doc.is_shown("panel", "active"));

        assert!(!doc.toggle_class("panel", "active"));
        assert!(!doc.has_class("panel", "active"));
    }

    #[test]
    fn test_missing_ids_are_ignored() {
        let mut doc = HeadlessDocument::new();
        doc.add_class("ghost", "active");
        doc.set_display("ghost", Display::Block);
        doc.scroll_into_view("ghost");
        assert!(!doc.contains("ghost"));
        assert_eq!(doc.display("ghost"), Display::None);
        assert!(doc.scroll_log().is_empty());
    }

    #[test]
    fn test_click_path_walks_to_body() {
        let mut doc = HeadlessDocument::new();
        doc.insert("menu", Some(BODY_ID), &["dropdown-menu"]);
        doc.insert("item", Some("menu"), &["submenu-item"]);

        let path = doc.click_path("item").unwrap();
        let ids: Vec<&str> = path.ids().collect();
        assert_eq!(ids, vec!["item", "menu"]);
        assert_eq!(path.0.len(), 3);
        assert!(path.0[0].has_class("submenu-item"));
        assert!(doc.click_path("ghost").is_none());
    }

    #[test]
    fn test_dashboard_markup_starts_on_home() {
        let layout = NavLayout::dashboard();
        let doc = HeadlessDocument::from_layout(&layout);

        assert!(doc.is_shown("home", "active"));
        assert!(!doc.is_shown("actgMain", "active"));
        assert!(doc.contains("accountingSubmenu"));
        assert!(doc.contains("menu-combine"));
        assert!(doc.contains("m_accountingSubmenu"));

        let path = doc.click_path("menu-combine").unwrap();
        assert!(path.passes_through("trnmSubmenuNested"));
        assert!(path.passes_through("auditSubmenu"));
    }
}
