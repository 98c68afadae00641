use clap::Parser;
use std::path::PathBuf;

use crate::cli::config::OutputFormat;

/// CLI arguments for the yangbind binary.
#[derive(Parser, Debug)]
#[command(
    name = "yangbind",
    version,
    about = "Link YANG schemas into a conflict-free binding type graph"
)]
pub struct CliArgs {
    /// Path to a yangbind.json file. Defaults to ./yangbind.json when present.
    #[arg(short = 'c', long)]
    pub config: Option<PathBuf>,

    /// Schema document to load. Overrides `schema` from the config file.
    #[arg(short = 's', long)]
    pub schema: Option<PathBuf>,

    /// Build runtime types: same names and shapes, no documentation.
    #[arg(long)]
    pub runtime: bool,

    /// Print assigned type names or the full generated types.
    #[arg(short = 'f', long, value_enum, ignore_case = true)]
    pub format: Option<OutputFormat>,

    /// Upper bound for every fixpoint loop of the reactor.
    #[arg(long = "max-passes", alias = "maxFixpointPasses")]
    pub max_passes: Option<usize>,
}
