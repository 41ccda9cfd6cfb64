use crate::output::{num, print_json, print_table};
use anyhow::Context;
use citywise_core::{
    config::Config,
    geometry::{estimate_buildable_area, label_edges, BuildableArea, Parcel, ParcelEdge},
    io,
    source::ZoningSource,
    types::ProjectType,
    zoning::Setbacks,
};
use serde::Serialize;
use std::path::Path;

#[derive(Serialize)]
struct EdgesOutput {
    edges: Vec<ParcelEdge>,
    #[serde(skip_serializing_if = "Option::is_none")]
    setbacks: Option<Setbacks>,
    #[serde(skip_serializing_if = "Option::is_none")]
    buildable: Option<BuildableArea>,
}

pub fn run(
    root: &Path,
    parcel: &Path,
    district: Option<&str>,
    project_type: &str,
    json: bool,
) -> anyhow::Result<()> {
    let parcel: Parcel = io::read_document(parcel)
        .with_context(|| format!("failed to read parcel {}", parcel.display()))?;
    let project_type: ProjectType = project_type.parse()?;
    let polygon = parcel.polygon();
    let centroid = parcel.centroid_point();

    let setbacks = match district {
        Some(code) => {
            let config = Config::load(root).context("failed to load config")?;
            let municipality = config
                .zoning_source(root)
                .load_zoning(&config.jurisdiction)
                .context("failed to load zoning table")?;
            let district = municipality.district(code)?;
            Some(Setbacks::from_rules(&district.rules, project_type))
        }
        None => None,
    };

    let out = EdgesOutput {
        edges: label_edges(&polygon, centroid),
        setbacks,
        buildable: setbacks.map(|s| estimate_buildable_area(&polygon, centroid, &s)),
    };

    if json {
        return print_json(&out);
    }

    if out.edges.is_empty() {
        println!("Parcel boundary has no usable edges.");
        return Ok(());
    }
    let rows = out
        .edges
        .iter()
        .map(|e| {
            vec![
                e.index.to_string(),
                e.side.to_string(),
                format!("{:.1}", e.bearing_deg),
                num(e.length_ft.round()),
            ]
        })
        .collect();
    print_table(&["EDGE", "SIDE", "BEARING", "LENGTH_FT"], rows);

    if let (Some(s), Some(b)) = (&out.setbacks, &out.buildable) {
        println!(
            "\nSetbacks (ft): front {}, rear {}, left {}, right {}",
            num(s.front),
            num(s.rear),
            num(s.left),
            num(s.right)
        );
        println!(
            "Lot: {} x {} ft, {} sq ft gross",
            num(b.lot_width_ft.round()),
            num(b.lot_depth_ft.round()),
            num(b.gross_sq_ft.round())
        );
        println!(
            "Buildable: {} x {} ft, {} sq ft",
            num(b.buildable_width_ft.round()),
            num(b.buildable_depth_ft.round()),
            num(b.buildable_sq_ft.round())
        );
    }
    Ok(())
}
