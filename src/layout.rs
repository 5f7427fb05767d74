//! Navigation layout - the contract between the navigation core and the page markup
//!
//! A layout lists every navigable panel once, together with the ids of the buttons,
//! dropdowns and menu items that drive it. It is normally the built-in
//! [`NavLayout::dashboard`] layout, but can be loaded from JSON so the markup can
//! evolve without recompiling.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

use crate::error::{NavError, NavResult};
use crate::ids::{PanelId, SectionLevel};

/// Default duration of the show/hide CSS transition, in milliseconds
pub const TRANSITION_DURATION_MS: u64 = 300;

fn default_transition_ms() -> u64 {
    TRANSITION_DURATION_MS
}

/// Complete navigation layout
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NavLayout {
    /// Landing panel, visible until the first section is opened
    pub home: PanelId,
    /// Main tab whose sections are shown directly and scrolled into view
    pub audit_root: PanelId,
    /// Admin top-level container; revisiting it is an idempotent landing, not a toggle
    #[serde(default)]
    pub admin_top: Option<PanelId>,
    pub main_tabs: Vec<MainTabSpec>,
    pub sections: Vec<SectionSpec>,
    #[serde(default)]
    pub nested_submenus: Vec<NestedSubmenuSpec>,
    /// Wrapper sections that host a module's own sections
    #[serde(default)]
    pub level_two: Vec<LevelTwoSpec>,
    #[serde(default)]
    pub mobile: Option<MobileLayout>,
    #[serde(default)]
    pub protected: ProtectedRegions,
    #[serde(default)]
    pub classes: ClassNames,
    #[serde(default = "default_transition_ms")]
    pub transition_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MainTabSpec {
    pub id: PanelId,
    /// Top-bar button element id
    pub button: String,
    /// Dropdown element id; tabs without one are initialized directly
    #[serde(default)]
    pub dropdown: Option<String>,
    /// Section that wraps this tab's sections (conventionally `<id>Section`)
    #[serde(default)]
    pub sections_wrapper: Option<PanelId>,
    /// Section shown when the tracker has nothing remembered for this tab
    #[serde(default)]
    pub default_section: Option<PanelId>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SectionSpec {
    pub id: PanelId,
    /// Main tab (or audit root) whose content contains this section
    pub group: PanelId,
    /// Tracker key remembering this section; defaults to the caller's parent container
    #[serde(default)]
    pub owner: Option<PanelId>,
    /// Dropdown entry marked active while this section is shown
    #[serde(default)]
    pub menu_item: Option<String>,
    /// Section that must be visible for this one to be laid out
    #[serde(default)]
    pub host: Option<PanelId>,
    #[serde(default)]
    pub level: SectionLevel,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NestedSubmenuSpec {
    pub id: PanelId,
    /// Button that expands the submenu
    pub toggle: String,
    /// Top-level dropdown that contains the submenu
    pub dropdown: String,
    /// Module owning the submenu; also its tracker key
    pub module: PanelId,
    /// Parent container passed to `open_sub_tab` when the submenu opens
    pub parent_container: PanelId,
    #[serde(default)]
    pub default_section: Option<PanelId>,
    /// Section revealed when no default resolves and hidden when the submenu collapses
    #[serde(default)]
    pub module_section: Option<PanelId>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LevelTwoSpec {
    pub id: PanelId,
    pub tracker_key: PanelId,
}

impl LevelTwoSpec {
    /// Level-2 container keyed on its id without the `Section` suffix
    pub fn stripped(id: &str) -> Self {
        let id = PanelId::from(id);
        Self {
            tracker_key: id.without_section_suffix(),
            id,
        }
    }

    /// Level-2 container keyed on itself
    pub fn self_keyed(id: &str) -> Self {
        Self {
            id: PanelId::from(id),
            tracker_key: PanelId::from(id),
        }
    }
}

/// Mobile drawer subtree
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MobileLayout {
    pub drawer: String,
    pub toggle: String,
    pub tabs: Vec<MobileTabSpec>,
    #[serde(default)]
    pub nested_submenus: Vec<MobileNestedSpec>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MobileTabSpec {
    pub tab: PanelId,
    pub button: String,
    #[serde(default)]
    pub submenu: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MobileNestedSpec {
    pub id: String,
    pub toggle: String,
    /// Mobile submenu containing this nested submenu
    pub submenu: String,
    /// Desktop nested submenu this one mirrors
    pub mirrors: PanelId,
}

/// Regions where a click must not collapse open dropdowns
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProtectedRegions {
    pub marker_classes: Vec<String>,
    pub modal_ids: Vec<String>,
}

impl Default for ProtectedRegions {
    fn default() -> Self {
        Self {
            marker_classes: vec![
                "tab-button".to_string(),
                "nested-tab-button".to_string(),
                "clickable-row".to_string(),
            ],
            modal_ids: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassNames {
    pub active: String,
    pub section: String,
    pub sub_tab: String,
    pub expanded: String,
    pub drawer_open: String,
}

impl Default for ClassNames {
    fn default() -> Self {
        Self {
            active: "active".to_string(),
            section: "active-section-display".to_string(),
            sub_tab: "active-sub-tab-display".to_string(),
            expanded: "expanded".to_string(),
            drawer_open: "open".to_string(),
        }
    }
}

impl ClassNames {
    /// Class that marks a section of the given level visible
    pub fn for_level(&self, level: SectionLevel) -> &str {
        match level {
            SectionLevel::Section => &self.section,
            SectionLevel::SubTab => &self.sub_tab,
        }
    }
}

impl NavLayout {
    /// Parse a layout from JSON and validate it
    pub fn from_json_str(json: &str) -> NavResult<Self> {
        let layout: NavLayout = serde_json::from_str(json)?;
        layout.validate()?;
        Ok(layout)
    }

    /// Load a layout file
    pub fn load(path: impl AsRef<Path>) -> NavResult<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&content)
    }

    pub fn to_json_pretty(&self) -> NavResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check ids are unique and every reference points at a declared panel
    pub fn validate(&self) -> NavResult<()> {
        let declared = std::iter::once(&self.home)
            .chain(self.main_tabs.iter().map(|t| &t.id))
            .chain(self.sections.iter().map(|s| &s.id))
            .chain(self.nested_submenus.iter().map(|n| &n.id));
        let mut panels: HashSet<&str> = HashSet::new();
        for id in declared {
            if !panels.insert(id.as_str()) {
                return Err(NavError::InvalidLayout(format!("duplicate panel id '{}'", id)));
            }
        }

        let tabs: HashSet<&str> = self.main_tabs.iter().map(|t| t.id.as_str()).collect();
        let sections: HashSet<&str> = self.sections.iter().map(|s| s.id.as_str()).collect();
        let missing = |what: &str, id: &PanelId| {
            NavError::InvalidLayout(format!("{} '{}' is not declared", what, id))
        };

        if !tabs.contains(self.audit_root.as_str()) {
            return Err(missing("audit root", &self.audit_root));
        }
        if let Some(admin) = &self.admin_top {
            if !sections.contains(admin.as_str()) {
                return Err(missing("admin top section", admin));
            }
        }
        for tab in &self.main_tabs {
            for section in tab.sections_wrapper.iter().chain(tab.default_section.iter()) {
                if !sections.contains(section.as_str()) {
                    return Err(missing("section", section));
                }
            }
        }
        for section in &self.sections {
            if !tabs.contains(section.group.as_str()) {
                return Err(missing("group", &section.group));
            }
            if let Some(host) = &section.host {
                if host == &section.id || !sections.contains(host.as_str()) {
                    return Err(missing("host section", host));
                }
            }
        }
        for submenu in &self.nested_submenus {
            for section in submenu.default_section.iter().chain(submenu.module_section.iter()) {
                if !sections.contains(section.as_str()) {
                    return Err(missing("section", section));
                }
            }
            if !self.main_tabs.iter().any(|t| t.dropdown.as_deref() == Some(submenu.dropdown.as_str())) {
                return Err(NavError::InvalidLayout(format!(
                    "dropdown '{}' of nested submenu '{}' belongs to no main tab",
                    submenu.dropdown, submenu.id
                )));
            }
        }
        for level_two in &self.level_two {
            if !sections.contains(level_two.id.as_str()) {
                return Err(missing("level-2 container", &level_two.id));
            }
        }
        if let Some(mobile) = &self.mobile {
            for tab in &mobile.tabs {
                if !tabs.contains(tab.tab.as_str()) {
                    return Err(missing("mobile tab", &tab.tab));
                }
            }
            for nested in &mobile.nested_submenus {
                if !self.nested_submenus.iter().any(|n| n.id == nested.mirrors) {
                    return Err(missing("mirrored nested submenu", &nested.mirrors));
                }
            }
        }

        // host chains must terminate
        for section in &self.sections {
            let mut seen = HashSet::new();
            let mut current = section;
            while let Some(host) = &current.host {
                if !seen.insert(host.as_str()) {
                    return Err(NavError::InvalidLayout(format!(
                        "host chain of '{}' is cyclic",
                        section.id
                    )));
                }
                match self.sections.iter().find(|s| &s.id == host) {
                    Some(next) => current = next,
                    None => break,
                }
            }
        }

        Ok(())
    }

    /// Built-in layout of the administrative dashboard
    pub fn dashboard() -> Self {
        let tab = |id: &str, button: &str, dropdown: Option<&str>, default: Option<&str>| {
            let id = PanelId::from(id);
            MainTabSpec {
                sections_wrapper: dropdown.map(|_| id.sections_wrapper()),
                id,
                button: button.to_string(),
                dropdown: dropdown.map(str::to_string),
                default_section: default.map(PanelId::from),
            }
        };

        let mut main_tabs = vec![
            tab("auditToolMainPage", "auditToolTabBtn", Some("auditSubmenu"), Some("agingConsolidatedSection")),
            tab("actgMain", "actgTabBtn", Some("accountingSubmenu"), Some("actgGl")),
            tab("operationsMain", "operationsTabBtn", Some("operationsSubmenu"), Some("operationsAgingReport")),
            tab("monitoringMain", "monitoringTabBtn", Some("monitoringSubmenu"), Some("monRegAud")),
            tab("adminMain", "adminTabBtn", Some("adminSubmenu"), Some("adminProfile")),
            tab("uploadMain", "uploadTabBtn", None, None),
        ];
        // audit sections sit directly on the page
        main_tabs[0].sections_wrapper = None;

        let mut sections = Vec::new();
        let mut section = |id: &str, group: &str, owner: Option<&str>, host: Option<&str>, level: SectionLevel| {
            sections.push(SectionSpec {
                id: PanelId::from(id),
                group: PanelId::from(group),
                owner: owner.map(PanelId::from),
                menu_item: Some(format!("menu-{}", id)),
                host: host.map(PanelId::from),
                level,
            });
        };

        section("agingConsolidatedSection", "auditToolMainPage", None, None, SectionLevel::Section);
        for (module, children) in [
            ("trnm", ["combine", "trnmSummary"]),
            ("gl", ["glDos", "glLedger"]),
            ("lnacc", ["lnaccDos", "lnaccAging"]),
            ("svacc", ["svaccDos", "svaccDormant"]),
        ] {
            let wrapper = format!("{}MainSection", module);
            let owner = format!("{}Main", module);
            section(&wrapper, "auditToolMainPage", None, None, SectionLevel::Section);
            for child in children {
                section(child, "auditToolMainPage", Some(&owner), Some(&wrapper), SectionLevel::SubTab);
            }
        }

        for (group, children) in [
            ("actgMain", vec!["actgGl", "actgTrialBalance", "actgJournal"]),
            ("operationsMain", vec!["operationsAgingReport", "operationsDashboardSection", "operationsLoanReleases"]),
            ("monitoringMain", vec!["monRegAud", "monExceptions"]),
            ("adminMain", vec!["adminProfile", "adminUsers", "adminAuditLog"]),
        ] {
            let wrapper = format!("{}Section", group);
            section(&wrapper, group, None, None, SectionLevel::Section);
            for child in children {
                section(child, group, Some(group), Some(&wrapper), SectionLevel::SubTab);
            }
        }
        // wrappers are reached through their children, not from the dropdown
        for s in sections.iter_mut() {
            if s.id.as_str().ends_with("MainSection") && s.id != "adminMainSection" {
                s.menu_item = None;
            }
        }

        let nested = |module: &str, dropdown: &str, parent: &str, default: &str, module_section: &str| {
            NestedSubmenuSpec {
                id: PanelId::from(format!("{}SubmenuNested", module.trim_end_matches("Main"))),
                toggle: format!("{}NestedToggle", module.trim_end_matches("Main")),
                dropdown: dropdown.to_string(),
                module: PanelId::from(module),
                parent_container: PanelId::from(parent),
                default_section: Some(PanelId::from(default)),
                module_section: Some(PanelId::from(module_section)),
            }
        };
        let nested_submenus = vec![
            nested("trnmMain", "auditSubmenu", "auditToolMainPage", "combine", "trnmMainSection"),
            nested("glMain", "auditSubmenu", "auditToolMainPage", "glDos", "glMainSection"),
            nested("lnaccMain", "auditSubmenu", "auditToolMainPage", "lnaccDos", "lnaccMainSection"),
            nested("svaccMain", "auditSubmenu", "auditToolMainPage", "svaccDos", "svaccMainSection"),
            nested("adminMain", "adminSubmenu", "adminMain", "adminProfile", "adminMainSection"),
        ];

        let level_two = vec![
            LevelTwoSpec::stripped("trnmMainSection"),
            LevelTwoSpec::stripped("glMainSection"),
            LevelTwoSpec::stripped("lnaccMainSection"),
            LevelTwoSpec::stripped("svaccMainSection"),
            LevelTwoSpec::self_keyed("operationsDashboardSection"),
            LevelTwoSpec::self_keyed("adminMainSection"),
        ];

        let mobile = MobileLayout {
            drawer: "mobileNav".to_string(),
            toggle: "mobileMenuToggle".to_string(),
            tabs: main_tabs
                .iter()
                .map(|t| MobileTabSpec {
                    tab: t.id.clone(),
                    button: format!("m_{}", t.button),
                    submenu: t.dropdown.as_ref().map(|d| format!("m_{}", d)),
                })
                .collect(),
            nested_submenus: nested_submenus
                .iter()
                .map(|n| MobileNestedSpec {
                    id: format!("m_{}", n.id),
                    toggle: format!("m_{}", n.toggle),
                    submenu: format!("m_{}", n.dropdown),
                    mirrors: n.id.clone(),
                })
                .collect(),
        };

        NavLayout {
            home: PanelId::from("home"),
            audit_root: PanelId::from("auditToolMainPage"),
            admin_top: Some(PanelId::from("adminMainSection")),
            main_tabs,
            sections,
            nested_submenus,
            level_two,
            mobile: Some(mobile),
            protected: ProtectedRegions {
                modal_ids: vec!["reportModal".to_string(), "uploadModal".to_string()],
                ..ProtectedRegions::default()
            },
            classes: ClassNames::default(),
            transition_ms: TRANSITION_DURATION_MS,
        }
    }
}
