use anyhow::Result;
use serde_json::{json, Value};
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

fn qbank(data_dir: &Path, args: &[&str]) -> Result<Output> {
    Ok(Command::new(env!("CARGO_BIN_EXE_qbank"))
        .arg("--data-dir")
        .arg(data_dir)
        .args(args)
        .env_remove("RUST_LOG")
        .output()?)
}

fn write_json(path: &Path, value: &Value) -> Result<()> {
    std::fs::write(path, serde_json::to_string_pretty(value)? + "\n")?;
    Ok(())
}

fn setup() -> Result<(TempDir, String)> {
    let temp_dir = TempDir::new()?;
    write_json(
        &temp_dir.path().join("questions_people.json"),
        &json!([{"id": 1, "domain": "People", "questionText": "What is RBAC?", "type": "single"}]),
    )?;
    write_json(&temp_dir.path().join("questions_process.json"), &json!([]))?;
    write_json(&temp_dir.path().join("questions_business.json"), &json!([]))?;

    let input = temp_dir.path().join("new.json");
    write_json(
        &input,
        &json!([
            {"group": "Week 1", "questions": [
                {"id": 1, "domain": "people", "questionText": "what is rbac?"},
                {"id": 1, "domain": "Process", "questionText": "Order these steps", "dragdrop": {}}
            ]}
        ]),
    )?;
    let input = input.to_string_lossy().into_owned();
    Ok((temp_dir, input))
}

#[test]
fn test_bank_summary_without_input() -> Result<()> {
    let (temp_dir, _) = setup()?;
    let output = qbank(temp_dir.path(), &[])?;

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout)?;
    assert!(stdout.starts_with("Question Bank Summary\n"));
    assert!(stdout.contains("- People: 1 total | single 1, multi 0, drag 0, hotspot 0, fill 0"));
    assert!(stdout.contains("- Overall: 1 total"));
    Ok(())
}

#[test]
fn test_input_summary_touches_nothing() -> Result<()> {
    let (temp_dir, input) = setup()?;
    let before = std::fs::read(temp_dir.path().join("questions_process.json"))?;

    let output = qbank(temp_dir.path(), &["--summary-input", input.as_str()])?;

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout)?;
    assert!(stdout.contains("- Process: 1 total | single 0, multi 0, drag 1, hotspot 0, fill 0"));
    assert!(stdout.contains("- Week 1: 2 total"));
    assert_eq!(std::fs::read(temp_dir.path().join("questions_process.json"))?, before);
    Ok(())
}

#[test]
fn test_merge_with_duplicate_report() -> Result<()> {
    let (temp_dir, input) = setup()?;
    let output = qbank(temp_dir.path(), &["--report-duplicates", input.as_str()])?;

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout)?;
    assert!(
        stdout.contains("questions_people.json: +0 new (skipped 1 text-duplicates, reassigned 0 IDs)")
    );
    assert!(
        stdout.contains("questions_process.json: +1 new (skipped 0 text-duplicates, reassigned 0 IDs)")
    );
    assert!(stdout.contains("- Week 1: input 2, added 1, text-duplicates 1, reassigned IDs 0"));
    assert!(stdout.contains("- People: input id 1 matches existing id 1 | what is rbac?"));

    let process: Vec<Value> =
        serde_json::from_slice(&std::fs::read(temp_dir.path().join("questions_process.json"))?)?;
    assert_eq!(process.len(), 1);
    Ok(())
}

#[test]
fn test_dry_run_leaves_banks_alone() -> Result<()> {
    let (temp_dir, input) = setup()?;
    let before = std::fs::read(temp_dir.path().join("questions_process.json"))?;

    let output = qbank(temp_dir.path(), &["--dry-run", input.as_str()])?;

    assert!(output.status.success());
    assert!(String::from_utf8(output.stdout)?.contains("Dry run: no bank file was written."));
    assert_eq!(std::fs::read(temp_dir.path().join("questions_process.json"))?, before);
    Ok(())
}

#[test]
fn test_validation_errors_exit_non_zero() -> Result<()> {
    let (temp_dir, _) = setup()?;
    let input = temp_dir.path().join("bad.json");
    write_json(
        &input,
        &json!([{"questions": [
            {"id": "one", "domain": "People", "questionText": "Q"},
            {"id": 2, "domain": "Finance", "questionText": "Q2"}
        ]}]),
    )?;

    let output = qbank(temp_dir.path(), &[input.to_str().unwrap_or_default()])?;

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8(output.stderr)?;
    assert!(stderr.contains("Validation errors:"));
    assert!(stderr.contains("- Group 0, question 0: Question id must be a number"));
    assert!(stderr.contains("- Group 0, question 1: Unknown domain 'Finance'"));
    assert!(output.stdout.is_empty());
    Ok(())
}

#[test]
fn test_corrupt_bank_exit_code() -> Result<()> {
    let (temp_dir, input) = setup()?;
    std::fs::write(temp_dir.path().join("questions_business.json"), "{}")?;

    let output = qbank(temp_dir.path(), &[input.as_str()])?;

    assert_eq!(output.status.code(), Some(3));
    let stderr = String::from_utf8(output.stderr)?;
    assert!(stderr.contains("questions_business.json does not contain an array"));
    Ok(())
}
