//! Transition-aware show/hide of single elements
//!
//! `show` makes an element displayable now and adds its active class on the next
//! animation frame, so the CSS transition starts from a laid-out element. `hide`
//! removes the class now and drops the element from layout once the transition
//! has run. Both deferred steps are queued here and stamped with the element's
//! generation; any later `show`/`hide` of the same element invalidates them.

use log::trace;
use std::collections::HashMap;

use crate::dom::{Display, Document};

#[derive(Debug, Clone, PartialEq, Eq)]
enum TaskKind {
    AddClass(String),
    ClearDisplay,
}

#[derive(Debug, Clone)]
struct PendingTask {
    element: String,
    generation: u64,
    kind: TaskKind,
    /// `None` for next-frame tasks
    due_ms: Option<u64>,
}

/// Queue of deferred visibility steps
#[derive(Debug, Clone)]
pub struct VisibilityController {
    transition_ms: u64,
    now_ms: u64,
    generations: HashMap<String, u64>,
    pending: Vec<PendingTask>,
}

impl VisibilityController {
    pub fn new(transition_ms: u64) -> Self {
        Self {
            transition_ms,
            now_ms: 0,
            generations: HashMap::new(),
            pending: Vec::new(),
        }
    }

    fn bump(&mut self, element: &str) -> u64 {
        let generation = self.generations.entry(element.to_string()).or_insert(0);
        *generation += 1;
        *generation
    }

    fn is_current(&self, task: &PendingTask) -> bool {
        self.generations.get(&task.element) == Some(&task.generation)
    }

    /// Display `element` now and add `active_class` on the next animation frame
    pub fn show<D: Document>(&mut self, doc: &mut D, element: &str, active_class: &str) {
        let generation = self.bump(element);
        doc.set_display(element, Display::Block);
        trace!("show '{}' (generation {})", element, generation);
        self.pending.push(PendingTask {
            element: element.to_string(),
            generation,
            kind: TaskKind::AddClass(active_class.to_string()),
            due_ms: None,
        });
    }

    /// Remove `active_class` now and clear the display once the transition has run
    pub fn hide<D: Document>(&mut self, doc: &mut D, element: &str, active_class: &str) {
        let generation = self.bump(element);
        doc.remove_class(element, active_class);
        trace!("hide '{}' (generation {})", element, generation);
        self.pending.push(PendingTask {
            element: element.to_string(),
            generation,
            kind: TaskKind::ClearDisplay,
            due_ms: Some(self.now_ms + self.transition_ms),
        });
    }

    /// Run every next-frame task
    pub fn on_animation_frame<D: Document>(&mut self, doc: &mut D) {
        let (frame, rest): (Vec<_>, Vec<_>) =
            self.pending.drain(..).partition(|t| t.due_ms.is_none());
        self.pending = rest;
        for task in frame {
            self.run(doc, task);
        }
    }

    /// Advance the clock and run every timer that has come due
    pub fn advance<D: Document>(&mut self, doc: &mut D, elapsed_ms: u64) {
        self.now_ms += elapsed_ms;
        let now = self.now_ms;
        let (due, rest): (Vec<_>, Vec<_>) = self
            .pending
            .drain(..)
            .partition(|t| t.due_ms.is_some_and(|d| d <= now));
        self.pending = rest;
        for task in due {
            self.run(doc, task);
        }
    }

    /// Run frames and timers until nothing is pending
    pub fn settle<D: Document>(&mut self, doc: &mut D) {
        if self.is_idle() {
            return;
        }
        self.on_animation_frame(doc);
        while let Some(remaining) = self.next_deadline() {
            self.advance(doc, remaining);
        }
    }

    fn run<D: Document>(&mut self, doc: &mut D, task: PendingTask) {
        if !self.is_current(&task) {
            trace!("dropping stale task for '{}'", task.element);
            return;
        }
        match task.kind {
            TaskKind::AddClass(class) => doc.add_class(&task.element, &class),
            TaskKind::ClearDisplay => doc.set_display(&task.element, Display::None),
        }
    }

    pub fn has_frame_work(&self) -> bool {
        self.pending.iter().any(|t| t.due_ms.is_none())
    }

    /// Milliseconds until the earliest pending timer, if any
    pub fn next_deadline(&self) -> Option<u64> {
        self.pending
            .iter()
            .filter_map(|t| t.due_ms)
            .min()
            .map(|due| due.saturating_sub(self.now_ms))
    }

    pub fn is_idle(&self) -> bool {
        self.pending.is_empty()
    }
}
