//! KG-Oversight CLI
//!
//! - `kgo transform`: nodes/relations/KQI extracts → per-type Kuzu CSVs + `import.cypher`
//! - `kgo script`: (re)write `import.cypher` only
//! - `kgo classify-relation`: show which relation table a declared type lands in

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;

use kgo_transform::import_script::write_import_script;
use kgo_transform::{
    process_indicators, process_nodes, process_relations, resolve_category, TransformConfig,
    WrittenFile,
};

#[derive(Parser)]
#[command(name = "kgo")]
#[command(
    author,
    version,
    about = "KG-Oversight: reshape oversight extracts into a Kuzu import layout"
)]
struct Cli {
    /// Log debug details (malformed payloads, row counts) to stderr.
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Transform the three extracts into `nodes/`, `relations/` and `import.cypher`.
    Transform(TransformArgs),

    /// Write only the Kuzu import script.
    Script {
        /// Output directory
        #[arg(short, long, default_value = "kuzu_data")]
        out: PathBuf,
    },

    /// Print the relation category for a declared type and its endpoint types.
    ClassifyRelation {
        /// Declared relation type (`Type_Relation`)
        declared: String,
        /// Source node type (`Type_Noeud_Source`)
        source_type: String,
        /// Target node type (`Type_Noeud_Cible`)
        target_type: String,
    },
}

#[derive(Args)]
struct TransformArgs {
    /// Node extract
    #[arg(long, default_value = "data/nodes.csv")]
    nodes: PathBuf,
    /// Relation extract
    #[arg(long, default_value = "data/relations.csv")]
    relations: PathBuf,
    /// KQI extract
    #[arg(long, default_value = "data/kqi.csv")]
    kqi: PathBuf,
    /// Output directory
    #[arg(short, long, default_value = "kuzu_data")]
    out: PathBuf,
}

impl From<TransformArgs> for TransformConfig {
    fn from(args: TransformArgs) -> Self {
        TransformConfig {
            nodes_csv: args.nodes,
            relations_csv: args.relations,
            kqi_csv: args.kqi,
            out_dir: args.out,
        }
    }
}

fn init_tracing(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Transform(args) => cmd_transform(&args.into()),
        Commands::Script { out } => cmd_script(&out),
        Commands::ClassifyRelation {
            declared,
            source_type,
            target_type,
        } => {
            println!("{}", resolve_category(&declared, &source_type, &target_type));
            Ok(())
        }
    }
}

fn print_written(files: &[WrittenFile]) {
    for file in files {
        println!(
            "  {} {} ({} enregistrements)",
            "✓".green(),
            file.path.display(),
            file.records
        );
    }
}

fn rule() -> String {
    "=".repeat(60)
}

fn cmd_transform(config: &TransformConfig) -> Result<()> {
    println!("{}", rule());
    println!("{} → Kuzu import layout", "KG-Oversight".bold());
    println!("{}", rule());

    println!(
        "\n{} nodes {}",
        "Processing".green().bold(),
        config.nodes_csv.display()
    );
    let nodes = process_nodes(config)
        .with_context(|| format!("processing nodes from {}", config.nodes_csv.display()))?;
    for skipped in &nodes.skipped {
        println!(
            "  {} unknown node type {:?} (row {}) skipped",
            "!".yellow(),
            skipped.node_type,
            skipped.id
        );
    }
    print_written(&nodes.files);

    println!(
        "\n{} relations {}",
        "Processing".green().bold(),
        config.relations_csv.display()
    );
    let relations = process_relations(config).with_context(|| {
        format!(
            "processing relations from {}",
            config.relations_csv.display()
        )
    })?;
    print_written(&relations);

    println!(
        "\n{} KQI {}",
        "Processing".green().bold(),
        config.kqi_csv.display()
    );
    let indicators = process_indicators(config)
        .with_context(|| format!("processing KQI from {}", config.kqi_csv.display()))?;
    print_written(&indicators);

    println!("\n{} import script", "Writing".green().bold());
    let script = write_import_script(&config.out_dir)?;
    println!("  {} {}", "✓".green(), script.display());

    println!("\n{}", rule());
    println!(
        "{} {} files in {}",
        "Done:".green().bold(),
        nodes.files.len() + relations.len() + indicators.len() + 1,
        config.out_dir.display()
    );
    if !nodes.skipped.is_empty() {
        println!(
            "  {} {} node rows with an unknown type were skipped",
            "!".yellow(),
            nodes.skipped.len()
        );
    }
    println!("{}", rule());
    Ok(())
}

fn cmd_script(out: &PathBuf) -> Result<()> {
    std::fs::create_dir_all(out)
        .with_context(|| format!("creating output directory {}", out.display()))?;
    let path = write_import_script(out)?;
    println!("  {} {}", "→".cyan(), path.display());
    Ok(())
}
