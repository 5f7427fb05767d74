use std::cell::Cell;
use std::rc::Rc;

use navshell::prelude::*;
use rstest::rstest;

fn controller() -> NavigationController<HeadlessDocument> {
    let layout = NavLayout::dashboard();
    let doc = HeadlessDocument::from_layout(&layout);
    NavigationController::new(&layout, doc).unwrap()
}

fn visible(nav: &NavigationController<HeadlessDocument>, id: &str) -> bool {
    nav.snapshot().visible_panels.iter().any(|p| p == id)
}

fn tracked(nav: &NavigationController<HeadlessDocument>, key: &str) -> Option<String> {
    nav.state().tracked(key).map(|p| p.to_string())
}

#[rstest]
#[case("actgMain", "accountingSubmenu", "monitoringMain", "monitoringSubmenu")]
#[case("auditToolMainPage", "auditSubmenu", "adminMain", "adminSubmenu")]
#[case("operationsMain", "operationsSubmenu", "actgMain", "accountingSubmenu")]
fn single_active_dropdown(
    #[case] first: &str,
    #[case] first_dropdown: &str,
    #[case] second: &str,
    #[case] second_dropdown: &str,
) {
    let mut nav = controller();
    nav.open_tab(first).unwrap();
    nav.open_tab(second).unwrap();
    nav.settle();

    let snapshot = nav.snapshot();
    assert_eq!(snapshot.open_dropdowns, vec![second_dropdown.to_string()]);
    assert!(!nav.document().has_class(first_dropdown, "active"));
    assert_eq!(snapshot.state.current_active_main_tab_id.unwrap(), second);
    assert!(!visible(&nav, first));
}

#[rstest]
#[case("actgMain", "actgJournal", "actgMain")]
#[case("monitoringMain", "monExceptions", "monitoringMain")]
#[case("auditToolMainPage", "agingConsolidatedSection", "auditToolMainPage")]
#[case("auditToolMainPage", "combine", "trnmMain")]
fn toggle_idempotence(#[case] parent: &str, #[case] section: &str, #[case] key: &str) {
    let mut nav = controller();

    nav.open_sub_tab(parent, section, None).unwrap();
    nav.settle();
    assert!(visible(&nav, section));
    assert_eq!(tracked(&nav, key).as_deref(), Some(section));

    nav.open_sub_tab(parent, section, None).unwrap();
    nav.settle();
    assert!(!visible(&nav, section));
    assert_eq!(tracked(&nav, key), None);
    assert!(nav.state().active_sub_tab_tracker.contains_key(key));

    nav.open_sub_tab(parent, section, None).unwrap();
    nav.settle();
    assert!(visible(&nav, section));
    assert_eq!(tracked(&nav, key).as_deref(), Some(section));
}

#[rstest]
#[case("actgMain", "actgGl", "actgTrialBalance", "actgMain")]
#[case("adminMain", "adminUsers", "adminAuditLog", "adminMain")]
#[case("auditToolMainPage", "glDos", "glLedger", "glMain")]
fn replacement(#[case] parent: &str, #[case] s1: &str, #[case] s2: &str, #[case] key: &str) {
    let mut nav = controller();
    nav.open_sub_tab(parent, s1, None).unwrap();
    nav.open_sub_tab(parent, s2, None).unwrap();
    nav.settle();

    assert!(!visible(&nav, s1));
    assert!(visible(&nav, s2));
    assert_eq!(tracked(&nav, key).as_deref(), Some(s2));
}

#[rstest]
#[case("trnmSubmenuNested", "trnmMain", "combine")]
#[case("glSubmenuNested", "glMain", "glDos")]
#[case("lnaccSubmenuNested", "lnaccMain", "lnaccDos")]
#[case("svaccSubmenuNested", "svaccMain", "svaccDos")]
#[case("adminSubmenuNested", "adminMain", "adminProfile")]
fn default_child_resolution(#[case] submenu: &str, #[case] module: &str, #[case] default: &str) {
    let mut nav = controller();
    assert_eq!(tracked(&nav, module), None);

    nav.toggle_nested_submenu(submenu).unwrap();
    nav.settle();

    assert!(visible(&nav, default));
    assert_eq!(tracked(&nav, module).as_deref(), Some(default));
    assert_eq!(nav.state().active_nested_submenu_id.as_ref().unwrap(), submenu);
}

#[test]
fn nested_submenu_restores_last_section() {
    let mut nav = controller();
    nav.open_tab("auditToolMainPage").unwrap();
    nav.toggle_nested_submenu("trnmSubmenuNested").unwrap();
    nav.open_sub_tab("auditToolMainPage", "trnmSummary", None).unwrap();
    nav.open_tab("auditToolMainPage").unwrap();
    nav.toggle_nested_submenu("trnmSubmenuNested").unwrap();
    nav.settle();

    assert!(visible(&nav, "trnmSummary"));
    assert!(!visible(&nav, "combine"));
}

#[test]
fn home_retirement() {
    let mut nav = controller();
    assert!(visible(&nav, "home"));

    // opening a tab alone keeps the landing panel
    nav.open_tab("actgMain").unwrap();
    nav.settle();
    assert!(visible(&nav, "home"));
    assert!(!nav.state().home_retired);

    nav.open_sub_tab("actgMain", "actgTrialBalance", None).unwrap();
    nav.settle();
    assert!(!visible(&nav, "home"));

    nav.open_sub_tab("actgMain", "actgTrialBalance", None).unwrap();
    nav.open_tab("monitoringMain").unwrap();
    nav.settle();
    assert!(!visible(&nav, "home"));
    assert!(nav.state().home_retired);
}

#[test]
fn outside_click_collapse() {
    let mut nav = controller();
    nav.open_tab("actgMain").unwrap();

    let inside = nav.document().click_path("menu-actgGl").unwrap();
    nav.dispatch(NavCommand::DocumentClick { path: inside });
    assert!(nav.document().has_class("accountingSubmenu", "active"));

    nav.dispatch(NavCommand::DocumentClick {
        path: ClickPath::body(),
    });
    assert!(!nav.document().has_class("accountingSubmenu", "active"));
    assert!(nav.snapshot().open_dropdowns.is_empty());
}

#[test]
fn accounting_first_load_scenario() {
    let mut nav = controller();
    let runs = Rc::new(Cell::new(0));
    let counter = runs.clone();
    nav.register_initializer("actgGl", move || counter.set(counter.get() + 1));

    nav.open_tab("actgMain").unwrap();
    nav.settle();

    assert!(visible(&nav, "actgMain"));
    assert!(visible(&nav, "actgGl"));
    assert!(nav.document().has_class("accountingSubmenu", "active"));
    assert!(nav.document().has_class("actgTabBtn", "expanded"));
    assert!(nav.document().has_class("menu-actgGl", "active"));
    assert_eq!(runs.get(), 1);
}

#[test]
fn initializer_runs_on_every_show() {
    let mut nav = controller();
    let runs = Rc::new(Cell::new(0));
    let counter = runs.clone();
    nav.register_initializer("monExceptions", move || counter.set(counter.get() + 1));

    nav.open_sub_tab("monitoringMain", "monExceptions", None).unwrap();
    nav.open_sub_tab("monitoringMain", "monExceptions", None).unwrap();
    nav.open_sub_tab("monitoringMain", "monExceptions", None).unwrap();
    assert_eq!(runs.get(), 2);
}

#[test]
fn missing_toggle_aborts_without_state_change() {
    let mut nav = controller();
    nav.open_tab("auditToolMainPage").unwrap();
    nav.document_mut().remove("glNestedToggle");
    let before = nav.state().clone();

    let result = nav.toggle_nested_submenu("glSubmenuNested");
    assert!(matches!(result, Err(NavError::MissingElement(id)) if id == "glNestedToggle"));
    assert_eq!(nav.state(), &before);
    assert!(!nav.document().has_class("glSubmenuNested", "expanded"));
}

#[rstest]
#[case("auditToolMainPage", r#"{ "type": "TOGGLE_NESTED_SUBMENU", "submenuId": "trnmSubmenuNested" }"#)]
#[case("trnmMainSection", r#"{ "type": "TOGGLE_MOBILE_NESTED_SUBMENU", "submenuId": "m_trnmSubmenuNested" }"#)]
#[case("mobileNav", r#"{ "type": "OPEN_MOBILE_SUB_TAB", "parentContainerId": "actgMain", "subItemId": "actgGl" }"#)]
#[case("mobileNav", r#"{ "type": "OPEN_MOBILE_TAB", "tabId": "uploadMain" }"#)]
fn missing_element_aborts_before_any_change(#[case] removed: &str, #[case] command: &str) {
    let mut nav = controller();
    nav.document_mut().remove(removed);
    let before = nav.snapshot();

    let command: NavCommand = serde_json::from_str(command).unwrap();
    let result = nav.apply(command);
    nav.settle();

    assert!(matches!(result, Err(NavError::MissingElement(id)) if id == removed));
    assert_eq!(nav.snapshot(), before);
}

#[test]
fn reopening_during_hide_transition_does_not_flicker() {
    let mut nav = controller();
    nav.open_sub_tab("actgMain", "actgGl", None).unwrap();
    nav.settle();

    nav.open_sub_tab("actgMain", "actgGl", None).unwrap();
    nav.advance(100);
    nav.open_sub_tab("actgMain", "actgGl", None).unwrap();
    nav.on_animation_frame();
    nav.advance(TRANSITION_DURATION_MS);

    assert!(visible(&nav, "actgGl"));
    assert_eq!(nav.next_deadline(), None);
}

#[test]
fn json_script_replays_through_dispatch() {
    let script = r#"[
        { "type": "OPEN_TAB", "tabId": "adminMain" },
        { "type": "TOGGLE_NESTED_SUBMENU", "submenuId": "adminSubmenuNested" },
        { "type": "OPEN_SUB_TAB", "parentContainerId": "adminMain", "subItemId": "adminUsers" },
        { "type": "OPEN_TAB", "tabId": "noSuchTab" },
        { "type": "RESIZE" }
    ]"#;
    let commands: Vec<NavCommand> = serde_json::from_str(script).unwrap();

    let mut nav = controller();
    let applied: Vec<bool> = commands.into_iter().map(|c| nav.dispatch(c)).collect();
    nav.settle();

    assert_eq!(applied, vec![true, true, true, false, true]);
    assert!(visible(&nav, "adminUsers"));
    assert_eq!(tracked(&nav, "adminMain").as_deref(), Some("adminUsers"));
    assert!(nav.snapshot().open_dropdowns.is_empty());
}
