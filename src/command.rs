//! Navigation commands
//!
//! Every user interaction that affects navigation is one of these. The page binds
//! its buttons to commands instead of calling global functions, and scripts replayed
//! by `nav-replay` are plain JSON arrays of them:
//!
//! ```json
//! [
//!   { "type": "OPEN_TAB", "tabId": "actgMain" },
//!   { "type": "OPEN_SUB_TAB", "parentContainerId": "actgMain", "subItemId": "actgJournal" }
//! ]
//! ```

use serde::{Deserialize, Serialize};

use crate::dom::ClickPath;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    tag = "type",
    rename_all = "SCREAMING_SNAKE_CASE",
    rename_all_fields = "camelCase"
)]
pub enum NavCommand {
    OpenTab {
        tab_id: String,
    },
    OpenSubTab {
        parent_container_id: String,
        sub_item_id: String,
        #[serde(default)]
        default_sub_sub_item_id: Option<String>,
    },
    ToggleNestedSubmenu {
        submenu_id: String,
    },
    OpenMobileTab {
        tab_id: String,
    },
    OpenMobileSubTab {
        parent_container_id: String,
        sub_item_id: String,
        #[serde(default)]
        default_sub_sub_item_id: Option<String>,
    },
    ToggleMobileNestedSubmenu {
        submenu_id: String,
    },
    ToggleMobileMenu,
    CloseMobileMenu,
    DocumentClick {
        path: ClickPath,
    },
    Resize,
}

impl NavCommand {
    pub fn open_tab(tab: &str) -> Self {
        NavCommand::OpenTab {
            tab_id: tab.to_string(),
        }
    }

    pub fn open_sub_tab(parent: &str, sub: &str) -> Self {
        NavCommand::OpenSubTab {
            parent_container_id: parent.to_string(),
            sub_item_id: sub.to_string(),
            default_sub_sub_item_id: None,
        }
    }

    pub fn toggle_nested_submenu(submenu: &str) -> Self {
        NavCommand::ToggleNestedSubmenu {
            submenu_id: submenu.to_string(),
        }
    }

    /// Short name used in log lines
    pub fn name(&self) -> &'static str {
        match self {
            NavCommand::OpenTab { .. } => "open_tab",
            NavCommand::OpenSubTab { .. } => "open_sub_tab",
            NavCommand::ToggleNestedSubmenu { .. } => "toggle_nested_submenu",
            NavCommand::OpenMobileTab { .. } => "open_mobile_tab",
            NavCommand::OpenMobileSubTab { .. } => "open_mobile_sub_tab",
            NavCommand::ToggleMobileNestedSubmenu { .. } => "toggle_mobile_nested_submenu",
            NavCommand::ToggleMobileMenu => "toggle_mobile_menu",
            NavCommand::CloseMobileMenu => "close_mobile_menu",
            NavCommand::DocumentClick { .. } => "document_click",
            NavCommand::Resize => "resize",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_tagged_commands() {
        let json = r#"[
            { "type": "OPEN_TAB", "tabId": "actgMain" },
            { "type": "OPEN_SUB_TAB", "parentContainerId": "auditToolMainPage",
              "subItemId": "trnmMainSection", "defaultSubSubItemId": "combine" },
            { "type": "TOGGLE_MOBILE_MENU" },
            { "type": "DOCUMENT_CLICK", "path": [{ "id": "reportModal" }, {}] }
        ]"#;
        let commands: Vec<NavCommand> = serde_json::from_str(json).unwrap();

        assert_eq!(commands[0], NavCommand::open_tab("actgMain"));
        match &commands[1] {
            NavCommand::OpenSubTab {
                default_sub_sub_item_id,
                ..
            } => assert_eq!(default_sub_sub_item_id.as_deref(), Some("combine")),
            other => panic!("unexpected command {:?}", other),
        }
        assert_eq!(commands[2], NavCommand::ToggleMobileMenu);
        match &commands[3] {
            NavCommand::DocumentClick { path } => assert!(path.passes_through("reportModal")),
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_missing_default_sub_sub_item_is_none() {
        let cmd: NavCommand = serde_json::from_str(
            r#"{ "type": "OPEN_SUB_TAB", "parentContainerId": "actgMain", "subItemId": "actgGl" }"#,
        )
        .unwrap();
        assert_eq!(cmd, NavCommand::open_sub_tab("actgMain", "actgGl"));
        assert_eq!(cmd.name(), "open_sub_tab");
    }
}
