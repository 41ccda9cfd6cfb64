use anyhow::Context;
use citywise_core::{
    config::Config,
    io, paths,
    rules::phoenix_rules,
    zoning::phoenix_zoning,
};
use std::path::Path;

pub fn run(root: &Path, jurisdiction: &str) -> anyhow::Result<()> {
    println!("Initializing CityWise in: {}", root.display());

    // 1. config.yaml pointing at the editable tables
    let config_path = paths::config_path(root);
    if !config_path.exists() {
        let cfg = Config::for_project(jurisdiction.trim());
        cfg.save(root).context("failed to write config.yaml")?;
        println!("  created: {}", paths::CONFIG_FILE);
    } else {
        println!("  exists:  {}", paths::CONFIG_FILE);
    }

    // 2. Seed tables; never overwrite local edits
    let rules = phoenix_rules();
    let rules_file = paths::table_file(&paths::rules_dir(root), &rules.jurisdiction);
    let data = serde_yaml::to_string(&rules).context("failed to serialize rule table")?;
    report(
        root,
        &rules_file,
        io::write_if_missing(&rules_file, data.as_bytes())
            .with_context(|| format!("failed to write {}", rules_file.display()))?,
    );

    let zoning = phoenix_zoning();
    let zoning_file = paths::table_file(&paths::zoning_dir(root), &zoning.name);
    let data = serde_yaml::to_string(&zoning).context("failed to serialize zoning table")?;
    report(
        root,
        &zoning_file,
        io::write_if_missing(&zoning_file, data.as_bytes())
            .with_context(|| format!("failed to write {}", zoning_file.display()))?,
    );

    if !rules.covers(jurisdiction) {
        println!(
            "\nNo seed tables exist for '{jurisdiction}'. Add {} and {} before resolving.",
            paths::table_file(Path::new(paths::RULES_DIR), jurisdiction).display(),
            paths::table_file(Path::new(paths::ZONING_DIR), jurisdiction).display(),
        );
    }

    Ok(())
}

fn report(root: &Path, path: &Path, written: bool) {
    let shown = path.strip_prefix(root).unwrap_or(path);
    if written {
        println!("  created: {}", shown.display());
    } else {
        println!("  exists:  {}", shown.display());
    }
}
