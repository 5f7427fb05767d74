//! navshell - hierarchical navigation controller for the dashboard shell
//!
//! This library decides which of the dashboard's content panels are visible and
//! owns the navigation state behind them:
//! - Main tabs with a top-bar dropdown each
//! - Sections (sub-tabs) remembered per container
//! - Nested submenus gating a module's own sections
//! - A mobile drawer sharing the same state
//! - Collapse of open dropdowns on outside clicks
//!
//! The core is DOM-independent: it works against the [`dom::Document`] trait, so it
//! runs the same against [`dom::HeadlessDocument`] in tests and against the live
//! page with the `web` feature.
//!
//! ## Example
//! ```rust
//! use navshell::prelude::*;
//!
//! let layout = NavLayout::dashboard();
//! let doc = HeadlessDocument::from_layout(&layout);
//! let mut nav = NavigationController::new(&layout, doc).unwrap();
//!
//! nav.register_initializer("actgGl", || println!("loading general ledger"));
//!
//! nav.dispatch(NavCommand::open_tab("actgMain"));
//! nav.settle();
//!
//! assert_eq!(nav.state().tracked("actgMain").unwrap(), "actgGl");
//! assert!(nav.document().is_shown("actgGl", "active-sub-tab-display"));
//! ```

pub mod command;
pub mod controller;
mod desktop;
pub mod dom;
pub mod error;
pub mod ids;
pub mod index;
pub mod layout;
mod mobile;
pub mod outside_click;
pub mod registry;
pub mod state;
pub mod visibility;

// Re-export common types
pub mod prelude {
    pub use crate::command::NavCommand;
    pub use crate::controller::{NavSnapshot, NavigationController};
    pub use crate::dom::{ClickNode, ClickPath, Display, Document, HeadlessDocument};
    pub use crate::error::{NavError, NavResult};
    pub use crate::ids::{PanelId, PanelKind, SectionLevel};
    pub use crate::layout::{NavLayout, TRANSITION_DURATION_MS};
    pub use crate::outside_click::{ClickRegion, OutsideClickCollapseService, Protection};
    pub use crate::registry::InitializerRegistry;
    pub use crate::state::NavigationState;
    pub use crate::visibility::VisibilityController;
}

#[cfg(feature = "web")]
pub mod web;
