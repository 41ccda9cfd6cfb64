use crate::output::{print_json, print_table};
use anyhow::Context;
use citywise_core::{
    config::Config,
    io,
    property::{PropertyField, PropertyReport, PropertySnapshot},
};
use serde_json::Value;
use std::path::Path;

pub fn run(
    root: &Path,
    assessor: &Path,
    regrid: &Path,
    fail_on_conflict: bool,
    json: bool,
) -> anyhow::Result<()> {
    let config = Config::load(root).context("failed to load config")?;
    let assessor: PropertySnapshot = io::read_document(assessor)
        .with_context(|| format!("failed to read assessor record {}", assessor.display()))?;
    let regrid: PropertySnapshot = io::read_document(regrid)
        .with_context(|| format!("failed to read parcel record {}", regrid.display()))?;

    let report = PropertyReport::build_now(&assessor, &regrid, &config.reconcile_policy());
    let conflicts = report.conflicts();

    if json {
        print_json(&report)?;
    } else {
        let value = serde_json::to_value(&report).context("failed to serialize report")?;
        let rows = PropertyField::all()
            .iter()
            .map(|field| {
                let entry = &value[field.as_str()];
                vec![
                    field.to_string(),
                    cell(&entry["value"]),
                    cell(&entry["source"]),
                    cell(&entry["assessorValue"]),
                    cell(&entry["regridValue"]),
                    if entry["hasConflict"].as_bool() == Some(true) {
                        "CONFLICT".to_string()
                    } else {
                        String::new()
                    },
                ]
            })
            .collect();
        print_table(
            &["FIELD", "VALUE", "SOURCE", "ASSESSOR", "REGRID", "REVIEW"],
            rows,
        );
        println!("\n{} field(s) need review.", conflicts.len());
    }

    if fail_on_conflict && !conflicts.is_empty() {
        let names: Vec<&str> = conflicts.iter().map(|f| f.as_str()).collect();
        anyhow::bail!("conflicting fields: {}", names.join(", "));
    }
    Ok(())
}

fn cell(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
