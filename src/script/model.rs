use serde::{Deserialize, Serialize};

use crate::sheet::SheetRecord;

/// A generated browser-automation script for one test case.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScriptRecord {
    #[serde(rename = "Test_Case_ID")]
    pub test_case_id: String,
    #[serde(rename = "Test_Scenario")]
    pub test_scenario: String,
    #[serde(rename = "Selenium_Script")]
    pub selenium_script: String,
}

impl SheetRecord for ScriptRecord {
    const COLUMNS: &'static [&'static str] = &["Test_Case_ID", "Test_Scenario", "Selenium_Script"];

    fn to_row(&self) -> Vec<String> {
        vec![
            self.test_case_id.clone(),
            self.test_scenario.clone(),
            self.selenium_script.clone(),
        ]
    }

    fn from_cells(cells: Vec<String>) -> Self {
        let mut it = cells.into_iter();
        Self {
            test_case_id: it.next().unwrap_or_default(),
            test_scenario: it.next().unwrap_or_default(),
            selenium_script: it.next().unwrap_or_default(),
        }
    }
}
