//! vibefilter - filter JSON records with structured boolean expressions

use anyhow::{bail, Context, Result};
use clap::Parser as ClapParser;
use std::path::PathBuf;
use vibefilter::config::{load_aliases, load_config, load_expression, load_records};
use vibefilter::{EngineConfig, FilterEngine};

/// vibefilter - filter JSON records with structured boolean expressions
#[derive(ClapParser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Records file: a JSON array or newline-delimited JSON
    #[arg(short, long)]
    records: Option<PathBuf>,

    /// Expression file (criterion, filter or filter group)
    #[arg(short, long)]
    expression: Option<PathBuf>,

    /// JSON array of criteria to save under their alias
    #[arg(short, long)]
    aliases: Option<PathBuf>,

    /// Engine configuration file
    #[arg(short = 'C', long)]
    config: Option<PathBuf>,

    /// Maximum records evaluated at once (0 = unbounded)
    #[arg(short = 'c', long)]
    concurrency: Option<usize>,

    /// Print the result tree of the first record instead of filtering
    #[arg(long)]
    explain: bool,

    /// Print the operator vocabulary and saved aliases
    #[arg(long)]
    inspect: bool,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Set up logging
    let log_level = if args.debug { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let config = match &args.config {
        Some(path) => load_config(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => EngineConfig::default(),
    };
    let engine = FilterEngine::with_config(config);

    if let Some(path) = &args.aliases {
        let criteria = load_aliases(path)
            .with_context(|| format!("Failed to load aliases from {}", path.display()))?;
        let count = criteria.len();
        engine.save_criteria(criteria)?;
        log::info!("Saved {} aliases from {}", count, path.display());
    }

    if args.inspect {
        println!("{}", engine.inspect());
        return Ok(());
    }

    let (Some(records_path), Some(expression_path)) = (&args.records, &args.expression) else {
        bail!("--records and --expression are required unless --inspect is given");
    };

    let records = load_records(records_path)
        .with_context(|| format!("Failed to load records from {}", records_path.display()))?;
    let expression = load_expression(expression_path).with_context(|| {
        format!(
            "Failed to load expression from {}",
            expression_path.display()
        )
    })?;
    engine
        .validate(&expression)
        .context("Invalid expression")?;

    if args.explain {
        let Some(first) = records.first() else {
            bail!("No records to explain");
        };
        let result = engine.evaluate(first, &expression).await?;
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    let kept = engine
        .filter_collection(&records, &expression, args.concurrency)
        .await?;
    for record in &kept {
        println!("{}", serde_json::to_string(record)?);
    }
    eprintln!("✅ {} of {} records matched", kept.len(), records.len());

    Ok(())
}
