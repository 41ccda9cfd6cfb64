use crate::output::{num, print_json, print_table, yes_no};
use anyhow::Context;
use citywise_core::{
    attributes::ProjectAttributes,
    config::Config,
    extract::{AttributeExtractor, KeywordExtractor, RawIntake},
    io,
};
use std::path::Path;

/// Load the intake document and run the keyword extractor over it, with the
/// configured jurisdiction as the fallback.
pub fn load_attributes(root: &Path, intake: &Path) -> anyhow::Result<ProjectAttributes> {
    let config = Config::load(root).context("failed to load config")?;
    let raw: RawIntake = io::read_document(intake)
        .with_context(|| format!("failed to read intake {}", intake.display()))?;
    Ok(KeywordExtractor::new(config.jurisdiction).extract(&raw))
}

pub fn run(root: &Path, intake: &Path, json: bool) -> anyhow::Result<()> {
    let attrs = load_attributes(root, intake)?;

    if json {
        return print_json(&attrs);
    }
    print_attributes(&attrs);
    Ok(())
}

pub fn print_attributes(attrs: &ProjectAttributes) {
    let unknown = || "unknown".to_string();
    let rows = vec![
        vec!["projectType".to_string(), attrs.project_type.to_string()],
        vec!["jurisdiction".to_string(), attrs.jurisdiction.clone()],
        vec![
            "squareFootage".to_string(),
            attrs.square_footage.map(num).unwrap_or_else(unknown),
        ],
        vec![
            "structuralChanges".to_string(),
            yes_no(attrs.structural_changes),
        ],
        vec!["plumbingWork".to_string(), yes_no(attrs.plumbing_work)],
        vec!["electricalWork".to_string(), yes_no(attrs.electrical_work)],
        vec![
            "electricalServiceAmps".to_string(),
            attrs.electrical_service_amps.map(num).unwrap_or_else(unknown),
        ],
        vec![
            "lotSize".to_string(),
            attrs.lot_size.map(num).unwrap_or_else(unknown),
        ],
    ];
    print_table(&["FIELD", "VALUE"], rows);
}
