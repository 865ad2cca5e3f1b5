use crate::llm::template::render;
use crate::scenario::model::TestCase;

pub const SCRIPT_TEMPLATE: &str = r##"Generate a Python Selenium script for the following test case:

Test Case ID: {test_case_id}
Test Scenario: {test_scenario}
Steps to Execute: {steps}
Expected Result: {expected_result}

Requirements:
1. Use Python and Selenium WebDriver
2. Include proper waits and error handling
3. Use Page Object Model pattern
4. Include documentation and comments
5. Handle exceptions appropriately
6. Include logging
7. Return the complete script as a single string

Generate a complete, runnable Python script that implements this test case."##;

pub fn render_script_prompt(case: &TestCase) -> String {
    render(
        SCRIPT_TEMPLATE,
        &[
            ("test_case_id", case.test_case_id.as_str()),
            ("test_scenario", case.test_scenario.as_str()),
            ("steps", case.steps_to_execute.as_str()),
            ("expected_result", case.expected_result.as_str()),
        ],
    )
}
