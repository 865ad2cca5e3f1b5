use std::rc::Rc;

use ui_testgen::{
    extractor::{Extractor, fetch::HttpFetcher},
    llm::ScriptedCompletion,
    scenario::{ScenarioSettings, ScenarioSynthesizer, model::TestCase},
    script::{ScriptSettings, ScriptSynthesizer, model::ScriptRecord},
    sheet::read_records,
};

use crate::common::utils::{five_case_reply, page};

mod common;

// =========================================================================
// All three stages, handing off through the filesystem
// =========================================================================

#[test]
fn stages_chain_through_files() {
    let dir = tempfile::tempdir().unwrap();
    let elements = dir.path().join("output").join("elements.json");
    let test_cases = dir.path().join("output").join("test_cases.xlsx");
    let test_scripts = dir.path().join("output").join("test_scripts.xlsx");

    // Stage 1
    let extractor = Extractor::new(&page("store_page.html"), Box::new(HttpFetcher::new()));
    extractor.run(&elements).unwrap();

    // Stage 2
    let scenario_backend = Rc::new(ScriptedCompletion::from_texts([five_case_reply()]));
    ScenarioSynthesizer::new(Box::new(scenario_backend.clone()), ScenarioSettings::default())
        .export(&elements, &test_cases)
        .unwrap();
    let prompt = &scenario_backend.requests()[0].prompt;
    assert!(prompt.contains("loginusername"));

    // Stage 3
    let scripts: Vec<String> = (1..=5).map(|i| format!("\n# script {}\n", i)).collect();
    let script_backend = Rc::new(ScriptedCompletion::from_texts(scripts));
    ScriptSynthesizer::new(Box::new(script_backend.clone()), ScriptSettings::default())
        .export(&test_cases, &test_scripts)
        .unwrap();
    assert_eq!(script_backend.calls(), 5);

    let cases: Vec<TestCase> = read_records(&test_cases).unwrap();
    let records: Vec<ScriptRecord> = read_records(&test_scripts).unwrap();
    assert_eq!(records.len(), cases.len());
    for (i, (case, record)) in cases.iter().zip(&records).enumerate() {
        assert_eq!(record.test_case_id, case.test_case_id);
        assert_eq!(record.test_scenario, case.test_scenario);
        assert_eq!(record.selenium_script, format!("# script {}", i + 1));
    }
}

#[test]
fn failed_scenario_stage_leaves_only_inventory() {
    let dir = tempfile::tempdir().unwrap();
    let elements = dir.path().join("elements.json");
    let test_cases = dir.path().join("test_cases.xlsx");

    Extractor::new(&page("store_page.html"), Box::new(HttpFetcher::new()))
        .run(&elements)
        .unwrap();

    let backend = ScriptedCompletion::from_texts(["no array here"]);
    let result = ScenarioSynthesizer::new(Box::new(backend), ScenarioSettings::default())
        .export(&elements, &test_cases);

    assert!(result.is_err());
    assert!(elements.exists());
    assert!(!test_cases.exists());
}
