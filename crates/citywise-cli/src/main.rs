mod cmd;
mod output;
mod root;

use clap::{Parser, Subcommand};
use cmd::{config::ConfigSubcommand, rules::RulesSubcommand, zoning::ZoningSubcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "citywise",
    about = "Zoning and engineering-requirement checklists for residential projects",
    version,
    propagate_version = true
)]
struct Cli {
    /// Project root (default: auto-detect from .citywise/)
    #[arg(long, global = true, env = "CITYWISE_ROOT")]
    root: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize .citywise/ with config and editable seed tables
    Init {
        /// Default jurisdiction for intakes that do not name one
        #[arg(long, default_value = "Phoenix")]
        jurisdiction: String,
    },

    /// Extract project attributes from an intake file (form or transcript)
    Extract {
        /// Intake document (.json or .yaml)
        intake: PathBuf,
    },

    /// Resolve the requirements a project still needs
    Resolve {
        /// Intake document (.json or .yaml)
        intake: PathBuf,
        /// Requirements the project already has (list, .json or .yaml)
        #[arg(long)]
        existing: Option<PathBuf>,
        /// Zoning district code of the parcel (e.g. R1-6)
        #[arg(long)]
        district: Option<String>,
    },

    /// Merge assessor and parcel-provider records into one property report
    Reconcile {
        /// Assessor snapshot (.json or .yaml)
        #[arg(long)]
        assessor: PathBuf,
        /// Parcel-provider snapshot (.json or .yaml)
        #[arg(long)]
        regrid: PathBuf,
        /// Exit non-zero when any field conflicts
        #[arg(long)]
        fail_on_conflict: bool,
    },

    /// Label parcel edges and estimate the buildable area
    Edges {
        /// Parcel boundary document (.json or .yaml)
        parcel: PathBuf,
        /// Zoning district whose setbacks apply
        #[arg(long)]
        district: Option<String>,
        /// Project type used to pick project-specific setbacks
        #[arg(long = "type", value_name = "TYPE", default_value = "REMODEL")]
        project_type: String,
    },

    /// Inspect the requirement-rule table
    Rules {
        #[command(subcommand)]
        subcommand: RulesSubcommand,
    },

    /// Inspect the zoning catalogue
    Zoning {
        #[command(subcommand)]
        subcommand: ZoningSubcommand,
    },

    /// Show and validate configuration
    Config {
        #[command(subcommand)]
        subcommand: ConfigSubcommand,
    },
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let root = root::resolve_root(cli.root.as_deref());

    let result = match cli.command {
        Commands::Init { jurisdiction } => cmd::init::run(&root, &jurisdiction),
        Commands::Extract { intake } => cmd::extract::run(&root, &intake, cli.json),
        Commands::Resolve {
            intake,
            existing,
            district,
        } => cmd::resolve::run(
            &root,
            &intake,
            existing.as_deref(),
            district.as_deref(),
            cli.json,
        ),
        Commands::Reconcile {
            assessor,
            regrid,
            fail_on_conflict,
        } => cmd::reconcile::run(&root, &assessor, &regrid, fail_on_conflict, cli.json),
        Commands::Edges {
            parcel,
            district,
            project_type,
        } => cmd::edges::run(&root, &parcel, district.as_deref(), &project_type, cli.json),
        Commands::Rules { subcommand } => cmd::rules::run(&root, subcommand, cli.json),
        Commands::Zoning { subcommand } => cmd::zoning::run(&root, subcommand, cli.json),
        Commands::Config { subcommand } => cmd::config::run(&root, subcommand, cli.json),
    };

    if let Err(e) = result {
        // Print the full error chain (anyhow's alternate Display)
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
