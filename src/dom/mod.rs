//! DOM contract used by the navigation core
//!
//! The core never touches a browser directly. Everything it needs from the page is
//! expressed through [`Document`], keyed by element id. Operations on ids that are
//! not in the document are no-ops; callers check [`Document::contains`] first.

mod headless;

pub use headless::HeadlessDocument;

use serde::{Deserialize, Serialize};

/// CSS display mode of an element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Display {
    #[default]
    None,
    Block,
}

/// Mutable view of the page markup
pub trait Document {
    fn contains(&self, id: &str) -> bool;

    fn has_class(&self, id: &str, class: &str) -> bool;

    fn add_class(&mut self, id: &str, class: &str);

    fn remove_class(&mut self, id: &str, class: &str);

    fn display(&self, id: &str) -> Display;

    fn set_display(&mut self, id: &str, display: Display);

    fn scroll_into_view(&mut self, id: &str);

    /// Lock or unlock page scrolling (`overflow: hidden` on the body)
    fn set_scroll_locked(&mut self, locked: bool);

    fn scroll_locked(&self) -> bool;

    fn toggle_class(&mut self, id: &str, class: &str) -> bool {
        if self.has_class(id, class) {
            self.remove_class(id, class);
            false
        } else {
            self.add_class(id, class);
            true
        }
    }
}

/// One element on the path from a click target up to the document root
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClickNode {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub classes: Vec<String>,
}

impl ClickNode {
    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }
}

/// Click target and its ancestors, innermost first
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClickPath(pub Vec<ClickNode>);

impl ClickPath {
    /// Path of a click on the bare document body
    pub fn body() -> Self {
        ClickPath(vec![ClickNode {
            id: None,
            classes: Vec::new(),
        }])
    }

    pub fn nodes(&self) -> impl Iterator<Item = &ClickNode> {
        self.0.iter()
    }

    /// Whether any element on the path carries the given id
    pub fn passes_through(&self, id: &str) -> bool {
        self.0.iter().any(|n| n.id.as_deref() == Some(id))
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.0.iter().filter_map(|n| n.id.as_deref())
    }
}
