use anyhow::{Context, Result};
use clap::Parser;

use yangbind::cli::args::CliArgs;
use yangbind::cli::driver;

fn main() -> Result<()> {
    yangbind::tracing_config::init_tracing();

    let args = CliArgs::parse();
    let cwd = std::env::current_dir().context("failed to resolve current directory")?;
    let report = driver::run(&args, &cwd)?;
    let rendered = serde_json::to_string_pretty(&report).context("failed to render report")?;
    println!("{rendered}");
    Ok(())
}
