//! WASM bindings for the live page
//!
//! [`NavShell`] owns the controller and a [`WebDocument`] over the browser DOM. It
//! installs the document click and window resize listeners, and drives the
//! visibility queue with one `requestAnimationFrame` and one timeout at a time.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use gloo_timers::callback::Timeout;
use log::{trace, warn};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Element, Event, HtmlElement};

use crate::command::NavCommand;
use crate::controller::NavigationController;
use crate::dom::{ClickNode, ClickPath, Display, Document};
use crate::layout::NavLayout;

/// Initialize panic hook and console logging
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
    if let Err(e) = console_log::init_with_level(log::Level::Debug) {
        warn!("console logger not installed: {}", e);
    }
}

fn to_js(err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

// ========================
// Document over web_sys
// ========================

pub struct WebDocument {
    document: web_sys::Document,
}

impl WebDocument {
    pub fn new() -> Result<Self, JsValue> {
        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| JsValue::from_str("no document available"))?;
        Ok(Self { document })
    }

    fn element(&self, id: &str) -> Option<Element> {
        self.document.get_element_by_id(id)
    }

    fn html(&self, id: &str) -> Option<HtmlElement> {
        self.element(id)
            .and_then(|e| e.dyn_into::<HtmlElement>().ok())
    }
}

impl Document for WebDocument {
    fn contains(&self, id: &str) -> bool {
        self.element(id).is_some()
    }

    fn has_class(&self, id: &str, class: &str) -> bool {
        self.element(id)
            .is_some_and(|e| e.class_list().contains(class))
    }

    fn add_class(&mut self, id: &str, class: &str) {
        if let Some(element) = self.element(id) {
            if let Err(e) = element.class_list().add_1(class) {
                warn!("adding class '{}' to '{}' failed: {:?}", class, id, e);
            }
        }
    }

    fn remove_class(&mut self, id: &str, class: &str) {
        if let Some(element) = self.element(id) {
            if let Err(e) = element.class_list().remove_1(class) {
                warn!("removing class '{}' from '{}' failed: {:?}", class, id, e);
            }
        }
    }

    fn display(&self, id: &str) -> Display {
        match self.html(id).map(|h| h.style().get_property_value("display")) {
            Some(Ok(value)) if value == "block" => Display::Block,
            _ => Display::None,
        }
    }

    fn set_display(&mut self, id: &str, display: Display) {
        if let Some(html) = self.html(id) {
            let value = match display {
                Display::Block => "block",
                Display::None => "none",
            };
            if let Err(e) = html.style().set_property("display", value) {
                warn!("setting display of '{}' failed: {:?}", id, e);
            }
        }
    }

    fn scroll_into_view(&mut self, id: &str) {
        if let Some(element) = self.element(id) {
            element.scroll_into_view();
        }
    }

    fn set_scroll_locked(&mut self, locked: bool) {
        let Some(body) = self.document.body() else {
            return;
        };
        let result = if locked {
            body.style().set_property("overflow", "hidden")
        } else {
            body.style().remove_property("overflow").map(|_| ())
        };
        if let Err(e) = result {
            warn!("updating body overflow failed: {:?}", e);
        }
    }

    fn scroll_locked(&self) -> bool {
        self.document
            .body()
            .and_then(|b| b.style().get_property_value("overflow").ok())
            .is_some_and(|v| v == "hidden")
    }
}

/// Click target and its ancestors, as the outside-click service expects them
fn click_path(event: &Event) -> ClickPath {
    let mut nodes = Vec::new();
    let mut current = event.target().and_then(|t| t.dyn_into::<Element>().ok());
    while let Some(element) = current {
        let id = element.id();
        nodes.push(ClickNode {
            id: (!id.is_empty()).then_some(id),
            classes: element
                .class_name()
                .split_whitespace()
                .map(str::to_string)
                .collect(),
        });
        current = element.parent_element();
    }
    ClickPath(nodes)
}

// ========================
// Shell
// ========================

struct Shared {
    nav: RefCell<NavigationController<WebDocument>>,
    last_tick: Cell<f64>,
    frame_requested: Cell<bool>,
    timer: RefCell<Option<Timeout>>,
}

impl Shared {
    /// Run `f` against the controller unless a handler is already running
    fn with_nav<R>(
        self: &Rc<Self>,
        f: impl FnOnce(&mut NavigationController<WebDocument>) -> R,
    ) -> Option<R> {
        let result = match self.nav.try_borrow_mut() {
            Ok(mut nav) => {
                self.catch_up(&mut nav);
                Some(f(&mut nav))
            }
            Err(_) => {
                warn!("navigation handler re-entered, ignoring call");
                None
            }
        };
        self.schedule();
        result
    }

    /// Bring the visibility clock up to wall time
    fn catch_up(&self, nav: &mut NavigationController<WebDocument>) {
        let now = js_sys::Date::now();
        let elapsed = (now - self.last_tick.get()).max(0.0) as u64;
        self.last_tick.set(now);
        nav.advance(elapsed);
    }

    /// Request the next frame and arm the timer for the earliest pending hide
    fn schedule(self: &Rc<Self>) {
        let Ok(nav) = self.nav.try_borrow() else {
            return;
        };
        let frame_work = nav.has_frame_work();
        let deadline = nav.next_deadline();
        drop(nav);

        if frame_work && !self.frame_requested.get() {
            let weak = Rc::downgrade(self);
            let callback = Closure::once_into_js(move || on_frame(&weak));
            let requested = web_sys::window()
                .map(|w| w.request_animation_frame(callback.unchecked_ref()));
            match requested {
                Some(Ok(_)) => self.frame_requested.set(true),
                _ => warn!("requestAnimationFrame unavailable"),
            }
        }

        let timer = deadline.map(|ms| {
            trace!("next visibility timer in {} ms", ms);
            let weak = Rc::downgrade(self);
            Timeout::new(ms as u32, move || on_timer(&weak))
        });
        // dropping the previous timeout cancels it
        *self.timer.borrow_mut() = timer;
    }
}

fn on_frame(shared: &Weak<Shared>) {
    if let Some(shared) = shared.upgrade() {
        shared.frame_requested.set(false);
        shared.with_nav(|nav| nav.on_animation_frame());
    }
}

fn on_timer(shared: &Weak<Shared>) {
    if let Some(shared) = shared.upgrade() {
        shared.with_nav(|_| ());
    }
}

/// Navigation controller bound to the page
#[wasm_bindgen]
pub struct NavShell {
    shared: Rc<Shared>,
    _on_click: Closure<dyn FnMut(Event)>,
    _on_resize: Closure<dyn FnMut(Event)>,
}

impl NavShell {
    fn run(&self, command: NavCommand) -> bool {
        self.shared
            .with_nav(|nav| nav.dispatch(command))
            .unwrap_or(false)
    }
}

#[wasm_bindgen]
impl NavShell {
    /// Build the shell from a layout object, or the built-in dashboard layout when
    /// none is given
    #[wasm_bindgen(constructor)]
    pub fn new(layout: JsValue) -> Result<NavShell, JsValue> {
        let layout = if layout.is_undefined() || layout.is_null() {
            NavLayout::dashboard()
        } else {
            let layout: NavLayout = serde_wasm_bindgen::from_value(layout)?;
            layout.validate().map_err(to_js)?;
            layout
        };
        let nav = NavigationController::new(&layout, WebDocument::new()?).map_err(to_js)?;

        let shared = Rc::new(Shared {
            nav: RefCell::new(nav),
            last_tick: Cell::new(js_sys::Date::now()),
            frame_requested: Cell::new(false),
            timer: RefCell::new(None),
        });

        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window available"))?;
        let document = window
            .document()
            .ok_or_else(|| JsValue::from_str("no document available"))?;

        let click_shared = shared.clone();
        let on_click = Closure::<dyn FnMut(Event)>::wrap(Box::new(move |event: Event| {
            let path = click_path(&event);
            click_shared.with_nav(|nav| nav.dispatch(NavCommand::DocumentClick { path }));
        }));
        document.add_event_listener_with_callback("click", on_click.as_ref().unchecked_ref())?;

        let resize_shared = shared.clone();
        let on_resize = Closure::<dyn FnMut(Event)>::wrap(Box::new(move |_event: Event| {
            resize_shared.with_nav(|nav| nav.dispatch(NavCommand::Resize));
        }));
        window.add_event_listener_with_callback("resize", on_resize.as_ref().unchecked_ref())?;

        Ok(NavShell {
            shared,
            _on_click: on_click,
            _on_resize: on_resize,
        })
    }

    /// Register the initializer run whenever `panel` is shown
    #[wasm_bindgen(js_name = "registerInitializer")]
    pub fn register_initializer(&self, panel: &str, callback: js_sys::Function) -> bool {
        let panel_id = panel.to_string();
        self.shared
            .with_nav(|nav| {
                nav.register_initializer(panel, move || {
                    if let Err(e) = callback.call0(&JsValue::NULL) {
                        warn!("initializer for '{}' threw: {:?}", panel_id, e);
                    }
                })
            })
            .unwrap_or(false)
    }

    /// Callback dismissing the status banner after each navigation
    #[wasm_bindgen(js_name = "setMessageHook")]
    pub fn set_message_hook(&self, callback: js_sys::Function) {
        self.shared.with_nav(|nav| {
            nav.set_message_hook(move || {
                if let Err(e) = callback.call0(&JsValue::NULL) {
                    warn!("message hook threw: {:?}", e);
                }
            })
        });
    }

    /// Apply a command object such as `{ type: "OPEN_TAB", tabId: "actgMain" }`
    pub fn dispatch(&self, command: JsValue) -> Result<bool, JsValue> {
        let command: NavCommand = serde_wasm_bindgen::from_value(command)?;
        Ok(self.run(command))
    }

    #[wasm_bindgen(js_name = "openTab")]
    pub fn open_tab(&self, tab_id: &str) -> bool {
        self.run(NavCommand::open_tab(tab_id))
    }

    #[wasm_bindgen(js_name = "openSubTab")]
    pub fn open_sub_tab(
        &self,
        parent_container_id: &str,
        sub_item_id: &str,
        default_sub_sub_item_id: Option<String>,
    ) -> bool {
        self.run(NavCommand::OpenSubTab {
            parent_container_id: parent_container_id.to_string(),
            sub_item_id: sub_item_id.to_string(),
            default_sub_sub_item_id,
        })
    }

    /// Nested submenu toggle. The click must not reach the document listener.
    #[wasm_bindgen(js_name = "toggleNestedSubmenu")]
    pub fn toggle_nested_submenu(&self, event: Option<Event>, submenu_id: &str) -> bool {
        if let Some(event) = event {
            event.stop_propagation();
        }
        self.run(NavCommand::toggle_nested_submenu(submenu_id))
    }

    #[wasm_bindgen(js_name = "openMobileTabAndToggleSubmenu")]
    pub fn open_mobile_tab_and_toggle_submenu(&self, tab_id: &str) -> bool {
        self.run(NavCommand::OpenMobileTab {
            tab_id: tab_id.to_string(),
        })
    }

    #[wasm_bindgen(js_name = "openMobileSubTab")]
    pub fn open_mobile_sub_tab(
        &self,
        parent_container_id: &str,
        sub_item_id: &str,
        default_sub_sub_item_id: Option<String>,
    ) -> bool {
        self.run(NavCommand::OpenMobileSubTab {
            parent_container_id: parent_container_id.to_string(),
            sub_item_id: sub_item_id.to_string(),
            default_sub_sub_item_id,
        })
    }

    #[wasm_bindgen(js_name = "toggleMobileNestedSubmenu")]
    pub fn toggle_mobile_nested_submenu(&self, event: Option<Event>, submenu_id: &str) -> bool {
        if let Some(event) = event {
            event.stop_propagation();
        }
        self.run(NavCommand::ToggleMobileNestedSubmenu {
            submenu_id: submenu_id.to_string(),
        })
    }

    #[wasm_bindgen(js_name = "toggleMobileMenu")]
    pub fn toggle_mobile_menu(&self, event: Option<Event>) -> bool {
        if let Some(event) = event {
            event.stop_propagation();
        }
        self.run(NavCommand::ToggleMobileMenu)
    }

    #[wasm_bindgen(js_name = "closeMobileMenu")]
    pub fn close_mobile_menu(&self) -> bool {
        self.run(NavCommand::CloseMobileMenu)
    }

    /// Current navigation snapshot as a plain object
    pub fn snapshot(&self) -> Result<JsValue, JsValue> {
        let snapshot = self
            .shared
            .nav
            .try_borrow()
            .map_err(to_js)?
            .snapshot();
        Ok(serde_wasm_bindgen::to_value(&snapshot)?)
    }
}
