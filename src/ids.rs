//! Panel identifiers

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

/// Globally unique identifier of a navigable panel. Equal to the element id in the page markup.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PanelId(String);

impl PanelId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Id of the `<id>Section` wrapper that conventionally hosts this panel's sections
    pub fn sections_wrapper(&self) -> PanelId {
        PanelId(format!("{}Section", self.0))
    }

    /// Strip a trailing `Section` suffix, if any
    pub fn without_section_suffix(&self) -> PanelId {
        PanelId(self.0.strip_suffix("Section").unwrap_or(&self.0).to_string())
    }
}

impl fmt::Display for PanelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for PanelId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for PanelId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for PanelId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for PanelId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl PartialEq<str> for PanelId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for PanelId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// Level of a panel in the navigation tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PanelKind {
    MainTab,
    Section,
    NestedSubmenu,
}

/// Display level of a section, selecting which CSS class marks it visible
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionLevel {
    /// Second-level section (`active-section-display`)
    #[default]
    Section,
    /// Third-level content inside a sections wrapper (`active-sub-tab-display`)
    SubTab,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_section_suffix_helpers() {
        let id = PanelId::from("trnmMainSection");
        assert_eq!(id.without_section_suffix(), "trnmMain");
        assert_eq!(PanelId::from("actgMain").sections_wrapper(), "actgMainSection");
        assert_eq!(PanelId::from("actgMain").without_section_suffix(), "actgMain");
    }

    #[test]
    fn test_serializes_as_plain_string() {
        let json = serde_json::to_string(&PanelId::from("combine")).unwrap();
        assert_eq!(json, "\"combine\"");
    }
}
