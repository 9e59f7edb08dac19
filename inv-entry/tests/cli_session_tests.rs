//! Integration tests for the terminal session loop
//!
//! Feeds scripted input through `run_session` against the offline catalog.

mod helpers;

use helpers::engine_with;
use inv_entry::cli::{render_form, run_session};
use inv_entry::provider::OfflineCatalog;
use inv_entry::SelectionEngine;
use std::sync::Arc;
use tokio::io::BufReader;

async fn run_script(engine: &mut SelectionEngine, script: &str) -> String {
    let mut output = Vec::new();
    run_session(engine, BufReader::new(script.as_bytes()), &mut output)
        .await
        .unwrap();
    String::from_utf8(output).unwrap()
}

fn offline_engine() -> SelectionEngine {
    engine_with(Arc::new(OfflineCatalog::new()))
}

#[tokio::test]
async fn test_session_selects_and_creates() {
    let mut engine = offline_engine();
    engine.load_root_options();

    let output = run_script(
        &mut engine,
        "select catalog Electronics\n\
         select category Smartphones\n\
         select subCategory iPhones\n\
         create brand Acme Devices\n\
         yes\n\
         quit\n\
         select model ignored after quit\n",
    )
    .await;

    assert!(output.contains("Add \"Acme Devices\" as a new Brand? [yes/no]"));
    assert!(output.contains("Created and selected \"Acme Devices\""));

    assert_eq!(engine.selection("brand").unwrap(), Some("Acme Devices"));
    assert_eq!(engine.selection("model").unwrap(), None);
    assert!(engine
        .options("brand")
        .unwrap()
        .iter()
        .any(|b| b == "Acme Devices"));
    // Pending fetches are applied before the session returns
    assert_eq!(engine.in_flight(), 0);
    assert!(engine
        .options("model")
        .unwrap()
        .iter()
        .all(|m| m.starts_with("Acme Devices ")));
}

#[tokio::test]
async fn test_session_reports_errors_and_keeps_going() {
    let mut engine = offline_engine();

    let output = run_script(
        &mut engine,
        "select brand Samsung\n\
         select warehouse North\n\
         frobnicate\n\
         yes\n\
         submit\n",
    )
    .await;

    assert!(output.contains("error: Level 'brand' is disabled until 'subCategory' is selected"));
    assert!(output.contains("error: Unknown level: warehouse"));
    assert!(output.contains("unknown command 'frobnicate'"));
    assert!(output.contains("error: No pending creation to confirm"));
    assert!(output.contains("Entry incomplete: 0/8 levels selected"));
}

#[tokio::test]
async fn test_session_pick_and_submit() {
    let mut engine = offline_engine();
    engine.load_root_options();
    engine.settle().await;

    let output = run_script(
        &mut engine,
        "pick catalog automotive\n\
         select category Car Parts\n\
         select subCategory Brakes\n\
         select brand Bosch\n\
         select model Bosch Ultra\n\
         select year 2020\n\
         select color Racing Red\n\
         select identifier BOS-240101-AB12C\n\
         submit\n",
    )
    .await;

    assert!(output.contains("Catalog = Automotive"));
    assert!(output.contains("Submission complete:"));
    assert!(output.contains("\"identifier\": \"BOS-240101-AB12C\""));
    assert!(engine.is_complete());
}

#[tokio::test]
async fn test_render_form_shows_status() {
    let mut engine = offline_engine();
    engine.load_root_options();
    engine.settle().await;
    engine
        .select_value("catalog", Some("Fashion".to_string()))
        .unwrap();

    let form = render_form(&engine);
    let lines: Vec<&str> = form.lines().collect();

    assert_eq!(lines.len(), 9);
    assert!(lines[0].contains("Fashion") && lines[0].contains("6 options"));
    assert!(lines[1].contains("loading..."));
    assert!(lines[2].contains("disabled"));
    assert!(lines[8].starts_with("Progress: 1/8 (13%)"));

    engine.settle().await;
    let form = render_form(&engine);
    assert!(form.lines().nth(1).unwrap().contains("5 options"));
}
