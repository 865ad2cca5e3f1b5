use serde::{Deserialize, Serialize};

use crate::sheet::SheetRecord;

/// A natural-language test case drafted by the model.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TestCase {
    #[serde(rename = "Test_Case_ID")]
    pub test_case_id: String,
    #[serde(rename = "Test_Scenario")]
    pub test_scenario: String,
    #[serde(rename = "Steps_to_Execute")]
    pub steps_to_execute: String,
    #[serde(rename = "Expected_Result")]
    pub expected_result: String,
}

impl SheetRecord for TestCase {
    const COLUMNS: &'static [&'static str] = &[
        "Test_Case_ID",
        "Test_Scenario",
        "Steps_to_Execute",
        "Expected_Result",
    ];

    fn to_row(&self) -> Vec<String> {
        vec![
            self.test_case_id.clone(),
            self.test_scenario.clone(),
            self.steps_to_execute.clone(),
            self.expected_result.clone(),
        ]
    }

    fn from_cells(cells: Vec<String>) -> Self {
        let mut it = cells.into_iter();
        Self {
            test_case_id: it.next().unwrap_or_default(),
            test_scenario: it.next().unwrap_or_default(),
            steps_to_execute: it.next().unwrap_or_default(),
            expected_result: it.next().unwrap_or_default(),
        }
    }
}
