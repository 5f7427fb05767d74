//! Replay a navigation script against the headless document
//!
//! Usage: `nav-replay <script.json> [layout.json]`
//!
//! The layout comes from the second argument, then `NAVSHELL_LAYOUT`, then the
//! built-in dashboard layout. One JSON snapshot is printed per command.

use anyhow::{bail, Context, Result};
use log::info;
use serde::Serialize;
use std::env;
use std::fs;

use navshell::prelude::*;

#[derive(Debug, Serialize)]
struct Step<'a> {
    step: usize,
    command: &'a NavCommand,
    applied: bool,
    snapshot: NavSnapshot,
}

fn load_layout(arg: Option<String>) -> Result<NavLayout> {
    match arg.or_else(|| env::var("NAVSHELL_LAYOUT").ok()) {
        Some(path) => {
            info!("Loading layout from {}", path);
            NavLayout::load(&path).with_context(|| format!("failed to load layout {}", path))
        }
        None => Ok(NavLayout::dashboard()),
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let mut args = env::args().skip(1);
    let Some(script_path) = args.next() else {
        bail!("usage: nav-replay <script.json> [layout.json]");
    };
    let layout = load_layout(args.next())?;

    let script = fs::read_to_string(&script_path)
        .with_context(|| format!("failed to read script {}", script_path))?;
    let commands: Vec<NavCommand> =
        serde_json::from_str(&script).with_context(|| format!("invalid script {}", script_path))?;

    let doc = HeadlessDocument::from_layout(&layout);
    let mut nav = NavigationController::new(&layout, doc)?;
    for section in &layout.sections {
        let id = section.id.clone();
        nav.register_initializer(section.id.as_str(), move || info!("initializing {}", id));
    }

    info!("Replaying {} commands", commands.len());
    for (i, command) in commands.iter().enumerate() {
        let applied = nav.dispatch(command.clone());
        nav.settle();
        let step = Step {
            step: i + 1,
            command,
            applied,
            snapshot: nav.snapshot(),
        };
        println!("{}", serde_json::to_string(&step)?);
    }

    Ok(())
}
