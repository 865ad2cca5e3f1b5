use crate::error::{PipelineError, Result};
use crate::extractor::inventory::ElementInventory;
use crate::llm::template::render;

/// Scenario template. `{elements}` receives the inventory as indented JSON.
pub const SCENARIO_TEMPLATE: &str = r##"You are a test automation expert. Based on the following website UI elements, generate 5 detailed test cases.

Website UI Elements:
{elements}

Generate exactly 5 test cases in a valid JSON array format. Each test case must be a JSON object with these exact keys:
- Test_Case_ID (format: TC001, TC002, etc.)
- Test_Scenario (clear description of what is being tested)
- Steps_to_Execute (numbered steps)
- Expected_Result (clear success criteria)

Focus areas:
1. User authentication flows
2. Navigation and menu interactions
3. Form submissions and validations
4. Error handling scenarios
5. Data validation checks

IMPORTANT: Return ONLY the JSON array without any additional text or explanation.
Example format:
[
  {
    "Test_Case_ID": "TC001",
    "Test_Scenario": "Verify user login with valid credentials",
    "Steps_to_Execute": "1. Navigate to login page\n2. Enter valid username\n3. Enter valid password\n4. Click login button",
    "Expected_Result": "User should be successfully logged in and redirected to dashboard"
  }
]"##;

pub fn render_scenario_prompt(inventory: &ElementInventory) -> Result<String> {
    let elements = serde_json::to_string_pretty(inventory)
        .map_err(|e| PipelineError::parse("element inventory", e))?;
    Ok(render(SCENARIO_TEMPLATE, &[("elements", elements.as_str())]))
}
