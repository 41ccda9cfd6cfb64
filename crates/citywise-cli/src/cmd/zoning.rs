use crate::output::{print_json, print_table};
use anyhow::Context;
use citywise_core::{config::Config, source::ZoningSource, zoning::Municipality};
use clap::Subcommand;
use std::path::Path;

#[derive(Subcommand)]
pub enum ZoningSubcommand {
    /// List the zoning districts of a jurisdiction
    List {
        /// Jurisdiction (default: from config)
        #[arg(long)]
        jurisdiction: Option<String>,
    },

    /// Show the rules stored against one district
    Show {
        /// District code, e.g. R1-6
        code: String,
        /// Jurisdiction (default: from config)
        #[arg(long)]
        jurisdiction: Option<String>,
    },
}

pub fn run(root: &Path, subcmd: ZoningSubcommand, json: bool) -> anyhow::Result<()> {
    let config = Config::load(root).context("failed to load config")?;
    let load = |jurisdiction: Option<&str>| -> anyhow::Result<Municipality> {
        config
            .zoning_source(root)
            .load_zoning(jurisdiction.unwrap_or(config.jurisdiction.as_str()))
            .context("failed to load zoning table")
    };

    match subcmd {
        ZoningSubcommand::List { jurisdiction } => {
            let m = load(jurisdiction.as_deref())?;
            if json {
                return print_json(&m.districts);
            }
            let rows = m
                .districts
                .iter()
                .map(|d| vec![d.code.clone(), d.name.clone(), d.rules.len().to_string()])
                .collect();
            println!("{}, {}\n", m.name, m.state);
            print_table(&["CODE", "NAME", "RULES"], rows);
            Ok(())
        }
        ZoningSubcommand::Show { code, jurisdiction } => {
            let m = load(jurisdiction.as_deref())?;
            let district = m.district(&code)?;
            if json {
                return print_json(district);
            }
            let rows = district
                .rules
                .iter()
                .map(|r| {
                    let types = if r.project_types.is_empty() {
                        "*".to_string()
                    } else {
                        r.project_types
                            .iter()
                            .map(|t| t.as_str())
                            .collect::<Vec<_>>()
                            .join(",")
                    };
                    vec![r.category.clone(), r.name.clone(), r.display_value(), types]
                })
                .collect();
            println!("{} {}\n", district.code, district.name);
            print_table(&["CATEGORY", "NAME", "VALUE", "TYPES"], rows);
            Ok(())
        }
    }
}
