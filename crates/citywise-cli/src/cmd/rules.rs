use crate::output::{print_json, print_table, yes_no};
use anyhow::Context;
use citywise_core::{config::Config, io, rules::RuleSet, source::RuleSource};
use clap::Subcommand;
use std::path::{Path, PathBuf};

#[derive(Subcommand)]
pub enum RulesSubcommand {
    /// List the rules for a jurisdiction in evaluation order
    Show {
        /// Jurisdiction (default: from config)
        #[arg(long)]
        jurisdiction: Option<String>,
    },

    /// Write the rule table as YAML
    Export {
        /// Jurisdiction (default: from config)
        #[arg(long)]
        jurisdiction: Option<String>,
        /// Output file (default: stdout)
        #[arg(long, short = 'o')]
        out: Option<PathBuf>,
    },
}

pub fn run(root: &Path, subcmd: RulesSubcommand, json: bool) -> anyhow::Result<()> {
    let config = Config::load(root).context("failed to load config")?;
    match subcmd {
        RulesSubcommand::Show { jurisdiction } => {
            let set = load(root, &config, jurisdiction.as_deref())?;
            show(&set, json)
        }
        RulesSubcommand::Export { jurisdiction, out } => {
            let set = load(root, &config, jurisdiction.as_deref())?;
            export(&set, out.as_deref())
        }
    }
}

fn load(root: &Path, config: &Config, jurisdiction: Option<&str>) -> anyhow::Result<RuleSet> {
    let jurisdiction = jurisdiction.unwrap_or(config.jurisdiction.as_str());
    config
        .rule_source(root)
        .load_rules(jurisdiction)
        .context("failed to load rule table")
}

fn show(set: &RuleSet, json: bool) -> anyhow::Result<()> {
    if json {
        return print_json(set);
    }

    let rows = set
        .rules
        .iter()
        .map(|rule| {
            let types = if rule.project_types.is_empty() {
                "*".to_string()
            } else {
                rule.project_types
                    .iter()
                    .map(|t| t.as_str())
                    .collect::<Vec<_>>()
                    .join(",")
            };
            let triggers = if rule.triggers.is_empty() {
                "-".to_string()
            } else {
                rule.triggers
                    .iter()
                    .map(|t| t.to_string())
                    .collect::<Vec<_>>()
                    .join(" AND ")
            };
            vec![
                rule.id.clone(),
                types,
                triggers,
                rule.requirement.name.clone(),
                rule.requirement.discipline.to_string(),
                yes_no(rule.requirement.required),
            ]
        })
        .collect();
    println!("Rule table: {} ({} rules)\n", set.jurisdiction, set.rules.len());
    print_table(
        &["ID", "TYPES", "TRIGGERS", "REQUIREMENT", "DISCIPLINE", "REQUIRED"],
        rows,
    );
    Ok(())
}

fn export(set: &RuleSet, out: Option<&Path>) -> anyhow::Result<()> {
    match out {
        Some(path) => {
            io::write_yaml(path, set)
                .with_context(|| format!("failed to write {}", path.display()))?;
            println!("Wrote {} rules to {}", set.rules.len(), path.display());
        }
        None => print!("{}", serde_yaml::to_string(set)?),
    }
    Ok(())
}
