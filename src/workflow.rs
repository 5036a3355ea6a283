//! Patch decision and transform for the test workflow defect.
//!
//! The defect: `jobs.test` declares `needs: test_matrix` but no `if` guard,
//! so when the matrix fails the dependent job is skipped instead of failed
//! and the combined status check stays green.

use anyhow::{bail, Context, Result};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde_yaml::{Mapping, Value};
use tracing::debug;

use crate::github::WorkflowFile;

pub const WORKFLOW_PATH: &str = ".github/workflows/test.yml";

const ALWAYS_RUN_EXPRESSION: &str = "${{ always }}";
const GUARD_STEP_RUN: &str = "exit 1";
const GUARD_STEP_IF: &str = "${{ needs.test_matrix.result != 'success' }}";

/// Adds an `if` guard to the `test` job and a leading step that exits
/// non-zero when `test_matrix` did not succeed.
///
/// Returns the reserialized workflow text, or `None` when the workflow is
/// not in the one shape this tool patches: `jobs.test_matrix` and
/// `jobs.test` present, `jobs.test.needs` exactly the string
/// `"test_matrix"`, and `jobs.test.if` absent. A workflow that was already
/// patched fails the `if`-absent check and is left alone.
pub fn fix_test_workflow(file: &WorkflowFile) -> Result<Option<String>> {
    let text = decode_content(&file.content, &file.encoding)?;
    let mut document: Value =
        serde_yaml::from_str(&text).context("workflow file is not valid YAML")?;

    if !needs_patch(&document) {
        return Ok(None);
    }

    apply_patch(&mut document)?;

    if tracing::enabled!(tracing::Level::DEBUG) {
        let as_json = serde_json::to_value(&document)?;
        debug!(document = %serde_json::to_string_pretty(&as_json)?, "patched workflow document");
    }

    let serialized =
        serde_yaml::to_string(&document).context("failed to serialize patched workflow")?;

    Ok(Some(format_yaml(serialized)))
}

fn needs_patch(document: &Value) -> bool {
    let Some(jobs) = document.get("jobs").and_then(Value::as_mapping) else {
        return false;
    };
    // A bare `test_matrix:` key with no value is not a job definition.
    if matches!(jobs.get("test_matrix"), None | Some(Value::Null)) {
        return false;
    }
    let Some(test) = jobs.get("test").and_then(Value::as_mapping) else {
        return false;
    };

    // Exact string match: `needs: [test_matrix]` is a different shape and
    // is deliberately not touched.
    let needs_matches = matches!(
        test.get("needs"),
        Some(Value::String(needs)) if needs == "test_matrix"
    );

    needs_matches && !test.contains_key("if")
}

fn apply_patch(document: &mut Value) -> Result<()> {
    let test = document
        .get_mut("jobs")
        .and_then(|jobs| jobs.get_mut("test"))
        .and_then(Value::as_mapping_mut)
        .context("jobs.test disappeared between check and patch")?;

    test.insert(
        Value::from("if"),
        Value::from(ALWAYS_RUN_EXPRESSION),
    );

    let mut guard = Mapping::new();
    guard.insert(Value::from("run"), Value::from(GUARD_STEP_RUN));
    guard.insert(Value::from("if"), Value::from(GUARD_STEP_IF));

    match test.get_mut("steps").and_then(Value::as_sequence_mut) {
        Some(steps) => steps.insert(0, Value::Mapping(guard)),
        None => bail!("jobs.test has no steps sequence"),
    }

    Ok(())
}

fn decode_content(content: &str, encoding: &str) -> Result<String> {
    if encoding != "base64" {
        bail!("unsupported content encoding `{encoding}`");
    }

    // The contents API wraps base64 payloads with embedded newlines.
    let stripped: String = content.chars().filter(|c| !c.is_whitespace()).collect();
    let bytes = STANDARD
        .decode(stripped)
        .context("workflow content is not valid base64")?;

    String::from_utf8(bytes).context("workflow content is not valid UTF-8")
}

/// Normalize serializer output to end with exactly one newline.
fn format_yaml(mut text: String) -> String {
    while text.ends_with('\n') {
        text.pop();
    }
    text.push('\n');
    text
}
