use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::{PipelineError, Result};
use crate::scenario::model::TestCase;
use crate::sheet::SheetRecord;

/// Number of test cases the scenario prompt asks for.
pub const EXPECTED_TEST_CASES: usize = 5;

/// How strictly a model reply is interpreted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponsePolicy {
    /// Reply must be exactly the array (after trimming), no surrounding prose.
    #[serde(default)]
    pub strict_array: bool,

    /// Reject replies whose array length differs from `EXPECTED_TEST_CASES`.
    #[serde(default)]
    pub enforce_count: bool,
}

// ============================================================================
// Array extraction
// ============================================================================

/// Locate the JSON array payload in a model reply.
///
/// Lenient mode takes everything from the first `[` to the last `]`
/// inclusive. This misreads replies with bracketed prose before the array or
/// more than one array; strict mode avoids that by requiring the trimmed reply
/// to be the array itself.
pub fn extract_json_array(response: &str, strict: bool) -> Result<&str> {
    let trimmed = response.trim();

    if strict {
        if trimmed.starts_with('[') && trimmed.ends_with(']') {
            return Ok(trimmed);
        }
        return Err(PipelineError::Extraction(
            "reply is not exactly a JSON array".into(),
        ));
    }

    let start = trimmed.find('[');
    let end = trimmed.rfind(']');
    match (start, end) {
        (Some(s), Some(e)) if e >= s => Ok(&trimmed[s..=e]),
        // ']' before '[' yields an empty payload, which then fails to parse
        (Some(_), Some(_)) => Ok(""),
        _ => Err(PipelineError::Extraction(
            "no '[' ... ']' found in reply".into(),
        )),
    }
}

// ============================================================================
// Validation
// ============================================================================

/// Required keys absent from one parsed record, in column order.
/// A non-object record is missing all of them.
pub fn missing_keys(record: &Value) -> Vec<String> {
    TestCase::COLUMNS
        .iter()
        .filter(|key| record.get(**key).is_none())
        .map(|key| key.to_string())
        .collect()
}

/// Extract, parse and validate the test cases in a model reply.
///
/// Only key presence is checked; extra keys are dropped and non-string values
/// are stored in their JSON form.
pub fn parse_test_cases(response: &str, policy: &ResponsePolicy) -> Result<Vec<TestCase>> {
    let payload = extract_json_array(response, policy.strict_array)?;
    debug!("Extracted JSON string: {}", payload);

    let records: Vec<Value> =
        serde_json::from_str(payload).map_err(|e| PipelineError::parse("model response", e))?;

    let mut cases = Vec::with_capacity(records.len());
    for (index, record) in records.iter().enumerate() {
        let missing = missing_keys(record);
        if !missing.is_empty() {
            return Err(PipelineError::Validation { index, missing });
        }
        cases.push(TestCase::from_cells(
            TestCase::COLUMNS
                .iter()
                .map(|key| value_text(&record[*key]))
                .collect(),
        ));
    }

    if cases.len() != EXPECTED_TEST_CASES {
        if policy.enforce_count {
            return Err(PipelineError::CountMismatch {
                expected: EXPECTED_TEST_CASES,
                actual: cases.len(),
            });
        }
        warn!(
            "model returned {} test cases, expected {}",
            cases.len(),
            EXPECTED_TEST_CASES
        );
    }

    Ok(cases)
}

fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
