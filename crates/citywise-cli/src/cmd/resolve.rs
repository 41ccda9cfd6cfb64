use crate::cmd::extract::load_attributes;
use crate::output::{print_json, print_table, yes_no};
use anyhow::Context;
use citywise_core::{
    attributes::ProjectAttributes,
    config::Config,
    io,
    permit::{assess_permit, PermitAssessment},
    requirement::{Requirement, RequirementOrigin},
    resolver::Resolver,
    source::ZoningSource,
};
use serde::Serialize;
use std::path::Path;

#[derive(Serialize)]
struct ResolveOutput<'a> {
    attributes: &'a ProjectAttributes,
    requirements: &'a [Requirement],
    permit: &'a PermitAssessment,
}

pub fn run(
    root: &Path,
    intake: &Path,
    existing: Option<&Path>,
    district: Option<&str>,
    json: bool,
) -> anyhow::Result<()> {
    let config = Config::load(root).context("failed to load config")?;
    let attrs = load_attributes(root, intake)?;

    let existing: Vec<Requirement> = match existing {
        Some(path) => io::read_document(path)
            .with_context(|| format!("failed to read existing requirements {}", path.display()))?,
        None => Vec::new(),
    };

    let municipality = match district {
        Some(_) => {
            let jurisdiction = if attrs.has_jurisdiction() {
                attrs.jurisdiction.as_str()
            } else {
                config.jurisdiction.as_str()
            };
            let m = config
                .zoning_source(root)
                .load_zoning(jurisdiction)
                .context("failed to load zoning table")?;
            Some(m)
        }
        None => None,
    };
    let zoning_district = match (&municipality, district) {
        (Some(m), Some(code)) => Some(m.district(code)?),
        _ => None,
    };

    let resolver = Resolver::new(config.rule_source(root));
    let requirements = resolver
        .resolve(&attrs, &existing, zoning_district)
        .context("failed to resolve requirements")?;
    let permit = assess_permit(&attrs, &config.permits);

    if json {
        return print_json(&ResolveOutput {
            attributes: &attrs,
            requirements: &requirements,
            permit: &permit,
        });
    }

    if requirements.is_empty() {
        println!("No new requirements.");
    } else {
        let rows = requirements
            .iter()
            .map(|r| {
                vec![
                    r.name.clone(),
                    r.discipline.to_string(),
                    yes_no(r.required),
                    origin_label(&r.origin),
                ]
            })
            .collect();
        print_table(&["REQUIREMENT", "DISCIPLINE", "REQUIRED", "SOURCE"], rows);
    }

    println!("\nPermit path: {}", permit.path);
    for reason in &permit.reasons {
        println!("  - {reason}");
    }
    Ok(())
}

fn origin_label(origin: &RequirementOrigin) -> String {
    match origin {
        RequirementOrigin::Baseline => "baseline".to_string(),
        RequirementOrigin::Rule { rule_id } => format!("rule:{rule_id}"),
        RequirementOrigin::Zoning { district, .. } => format!("zoning:{district}"),
        RequirementOrigin::Custom => "custom".to_string(),
    }
}
