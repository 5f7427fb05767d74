//! Collapse of open dropdowns on clicks outside the navigation

use log::debug;

use crate::controller::NavigationController;
use crate::dom::{ClickPath, Document};
use crate::index::{ElementRole, PanelIndex, PanelSlot};
use crate::layout::ClassNames;

/// Why a click is considered inside the navigation UI
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Protection {
    /// An element on the path carries a protected marker class
    Marker(String),
    Dropdown(String),
    NestedDropdown(String),
    MobileDrawer,
    MobileToggle,
    Modal(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClickRegion {
    Protected(Protection),
    Outside,
}

impl ClickRegion {
    pub fn is_outside(&self) -> bool {
        matches!(self, ClickRegion::Outside)
    }
}

/// Classifies document clicks against the protected regions of the layout
#[derive(Debug, Clone)]
pub struct OutsideClickCollapseService {
    markers: Vec<String>,
    classes: ClassNames,
}

impl OutsideClickCollapseService {
    pub fn new(index: &PanelIndex) -> Self {
        Self {
            markers: index.protected_markers.clone(),
            classes: index.classes.clone(),
        }
    }

    /// Classify a click, looking at the innermost element first
    pub fn classify<D: Document>(
        &self,
        index: &PanelIndex,
        doc: &D,
        path: &ClickPath,
    ) -> ClickRegion {
        for node in path.nodes() {
            if let Some(marker) = self.markers.iter().find(|m| node.has_class(m)) {
                return ClickRegion::Protected(Protection::Marker(marker.clone()));
            }
            let Some(id) = node.id.as_deref() else {
                continue;
            };
            if let Some(PanelSlot::Nested(_)) = index.slot(id) {
                if doc.has_class(id, &self.classes.expanded) {
                    return ClickRegion::Protected(Protection::NestedDropdown(id.to_string()));
                }
                continue;
            }
            let protection = match index.role_of(id) {
                Some(ElementRole::Dropdown(_)) if doc.has_class(id, &self.classes.active) => {
                    Protection::Dropdown(id.to_string())
                }
                Some(ElementRole::MobileDrawer) if doc.has_class(id, &self.classes.drawer_open) => {
                    Protection::MobileDrawer
                }
                Some(ElementRole::MobileToggle) => Protection::MobileToggle,
                Some(ElementRole::Modal) => Protection::Modal(id.to_string()),
                _ => continue,
            };
            return ClickRegion::Protected(protection);
        }
        ClickRegion::Outside
    }
}

impl<D: Document> NavigationController<D> {
    /// Document-level click. Returns true when dropdowns were collapsed.
    pub fn handle_document_click(&mut self, path: &ClickPath) -> bool {
        match self.outside_click.classify(&self.index, &self.doc, path) {
            ClickRegion::Outside if self.any_dropdown_open() => {
                debug!("click outside navigation, collapsing dropdowns");
                self.close_all_top_level_dropdowns();
                true
            }
            ClickRegion::Outside => false,
            ClickRegion::Protected(reason) => {
                debug!("click inside protected region: {:?}", reason);
                false
            }
        }
    }

    /// Window resize always collapses the dropdowns
    pub fn handle_resize(&mut self) {
        self.close_all_top_level_dropdowns();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{ClickNode, HeadlessDocument};
    use crate::layout::NavLayout;

    fn controller() -> NavigationController<HeadlessDocument> {
        let layout = NavLayout::dashboard();
        let doc = HeadlessDocument::from_layout(&layout);
        NavigationController::new(&layout, doc).unwrap()
    }

    fn path_to(nav: &NavigationController<HeadlessDocument>, id: &str) -> ClickPath {
        nav.document().click_path(id).unwrap()
    }

    #[test]
    fn test_body_click_collapses_open_dropdown() {
        let mut nav = controller();
        nav.open_tab("actgMain").unwrap();
        assert!(nav.handle_document_click(&ClickPath::body()));
        assert!(!nav.document().has_class("accountingSubmenu", "active"));
        assert!(!nav.document().has_class("actgTabBtn", "expanded"));
    }

    #[test]
    fn test_click_inside_open_dropdown_is_protected() {
        let mut nav = controller();
        nav.open_tab("actgMain").unwrap();
        let path = path_to(&nav, "accountingSubmenu");
        assert_eq!(
            nav.outside_click.classify(&nav.index, nav.document(), &path),
            ClickRegion::Protected(Protection::Dropdown("accountingSubmenu".to_string()))
        );
        assert!(!nav.handle_document_click(&path));
        assert!(nav.document().has_class("accountingSubmenu", "active"));
    }

    #[test]
    fn test_closed_dropdown_offers_no_protection() {
        let nav = controller();
        let path = path_to(&nav, "accountingSubmenu");
        assert!(nav.outside_click.classify(&nav.index, nav.document(), &path).is_outside());
    }

    #[test]
    fn test_protected_regions() {
        let mut nav = controller();
        nav.open_tab("auditToolMainPage").unwrap();

        let modal = path_to(&nav, "reportModal");
        assert_eq!(
            nav.outside_click.classify(&nav.index, nav.document(), &modal),
            ClickRegion::Protected(Protection::Modal("reportModal".to_string()))
        );

        let toggle = path_to(&nav, "trnmNestedToggle");
        assert_eq!(
            nav.outside_click.classify(&nav.index, nav.document(), &toggle),
            ClickRegion::Protected(Protection::Marker("nested-tab-button".to_string()))
        );

        let row = ClickPath(vec![
            ClickNode {
                id: None,
                classes: vec!["clickable-row".to_string()],
            },
            ClickNode::default(),
        ]);
        assert!(!nav.handle_document_click(&row));

        let drawer_toggle = path_to(&nav, "mobileMenuToggle");
        assert_eq!(
            nav.outside_click.classify(&nav.index, nav.document(), &drawer_toggle),
            ClickRegion::Protected(Protection::MobileToggle)
        );
        assert!(nav.document().has_class("auditSubmenu", "active"));
    }

    #[test]
    fn test_expanded_nested_submenu_is_protected_on_its_own() {
        let mut nav = controller();
        nav.open_tab("actgMain").unwrap();
        nav.toggle_nested_submenu("trnmSubmenuNested").unwrap();
        assert!(!nav.document().has_class("auditSubmenu", "active"));
        assert!(nav.document().has_class("trnmSubmenuNested", "expanded"));

        let item = path_to(&nav, "menu-combine");
        assert_eq!(
            nav.outside_click.classify(&nav.index, nav.document(), &item),
            ClickRegion::Protected(Protection::NestedDropdown("trnmSubmenuNested".to_string()))
        );
        assert!(!nav.handle_document_click(&item));
        assert!(nav.document().has_class("accountingSubmenu", "active"));
        assert!(nav.document().has_class("trnmSubmenuNested", "expanded"));

        nav.toggle_nested_submenu("trnmSubmenuNested").unwrap();
        assert!(nav.outside_click.classify(&nav.index, nav.document(), &item).is_outside());
    }

    #[test]
    fn test_open_drawer_is_protected() {
        let mut nav = controller();
        let drawer = path_to(&nav, "mobileNav");
        assert!(nav.outside_click.classify(&nav.index, nav.document(), &drawer).is_outside());

        nav.open_mobile_menu().unwrap();
        assert_eq!(
            nav.outside_click.classify(&nav.index, nav.document(), &drawer),
            ClickRegion::Protected(Protection::MobileDrawer)
        );
    }

    #[test]
    fn test_resize_collapses_dropdowns_and_nested() {
        let mut nav = controller();
        nav.open_tab("auditToolMainPage").unwrap();
        nav.toggle_nested_submenu("svaccSubmenuNested").unwrap();
        nav.handle_resize();

        assert!(!nav.document().has_class("auditSubmenu", "active"));
        assert!(!nav.document().has_class("svaccSubmenuNested", "expanded"));
        assert!(nav.state().active_nested_submenu_id.is_none());
        assert_eq!(nav.state().tracked("svaccMain").unwrap(), "svaccDos");
    }
}
