//! Benchmarks for command dispatch

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use navshell::prelude::*;

fn create_controller() -> NavigationController<HeadlessDocument> {
    let layout = NavLayout::dashboard();
    let doc = HeadlessDocument::from_layout(&layout);
    NavigationController::new(&layout, doc).unwrap()
}

fn tour() -> Vec<NavCommand> {
    vec![
        NavCommand::open_tab("auditToolMainPage"),
        NavCommand::toggle_nested_submenu("trnmSubmenuNested"),
        NavCommand::open_sub_tab("auditToolMainPage", "trnmSummary"),
        NavCommand::toggle_nested_submenu("glSubmenuNested"),
        NavCommand::open_tab("actgMain"),
        NavCommand::open_sub_tab("actgMain", "actgJournal"),
        NavCommand::open_tab("operationsMain"),
        NavCommand::open_sub_tab("operationsMain", "operationsDashboardSection"),
        NavCommand::DocumentClick {
            path: ClickPath::body(),
        },
        NavCommand::open_tab("adminMain"),
        NavCommand::toggle_nested_submenu("adminSubmenuNested"),
        NavCommand::Resize,
    ]
}

fn bench_build(c: &mut Criterion) {
    let layout = NavLayout::dashboard();
    c.bench_function("build_controller", |b| {
        b.iter(|| {
            let doc = HeadlessDocument::from_layout(black_box(&layout));
            NavigationController::new(&layout, doc).unwrap()
        })
    });
}

fn bench_tour(c: &mut Criterion) {
    let commands = tour();
    c.bench_function("dispatch_tour", |b| {
        b.iter(|| {
            let mut nav = create_controller();
            for command in &commands {
                nav.dispatch(black_box(command.clone()));
            }
            nav.settle();
            nav
        })
    });
}

fn bench_outside_click(c: &mut Criterion) {
    let mut nav = create_controller();
    nav.dispatch(NavCommand::open_tab("actgMain"));
    let path = nav.document().click_path("menu-actgGl").unwrap();
    c.bench_function("classify_click", |b| {
        b.iter(|| nav.handle_document_click(black_box(&path)))
    });
}

criterion_group!(benches, bench_build, bench_tour, bench_outside_click);
criterion_main!(benches);
