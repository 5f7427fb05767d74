//! Panel initializers registered by content modules

use log::debug;
use std::collections::HashMap;
use std::fmt;

use crate::ids::PanelId;

/// Callback that populates a panel. It runs on every show, so it must guard its own
/// expensive work.
pub type Initializer = Box<dyn FnMut()>;

/// Mapping from panel id to its initializer
#[derive(Default)]
pub struct InitializerRegistry {
    entries: HashMap<PanelId, Initializer>,
}

impl fmt::Debug for InitializerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut ids: Vec<&str> = self.entries.keys().map(PanelId::as_str).collect();
        ids.sort_unstable();
        f.debug_struct("InitializerRegistry").field("panels", &ids).finish()
    }
}

impl InitializerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `init` for `panel`. Last writer wins; returns true if one was replaced.
    pub fn register(&mut self, panel: impl Into<PanelId>, init: impl FnMut() + 'static) -> bool {
        let panel = panel.into();
        let replaced = self.entries.insert(panel.clone(), Box::new(init)).is_some();
        if replaced {
            debug!("initializer for '{}' replaced", panel);
        }
        replaced
    }

    /// Invoke the initializer for `panel`, if one is registered
    pub fn run_if_registered(&mut self, panel: &str) -> bool {
        match self.entries.get_mut(panel) {
            Some(init) => {
                debug!("running initializer for '{}'", panel);
                init();
                true
            }
            None => false,
        }
    }

    pub fn contains(&self, panel: &str) -> bool {
        self.entries.contains_key(panel)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
