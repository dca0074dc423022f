use anyhow::Result;
use clap::Parser;
use factorec::services::pipeline;
use factorec::{init_tracing, Config};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, default_value = "config/default.toml")]
    config: String,

    /// Training ratings, overrides the config file
    #[arg(long)]
    train: Option<PathBuf>,

    /// Held-out ratings, overrides the config file
    #[arg(long)]
    test: Option<PathBuf>,

    #[arg(long)]
    factors: Option<usize>,

    #[arg(long)]
    min_tries: Option<usize>,

    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Print the full report as JSON
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(&args.log_level);

    let mut config = if std::path::Path::new(&args.config).exists() {
        Config::from_file(&args.config)?
    } else {
        info!("Config file not found, using default configuration");
        Config::default()
    };

    if let Some(path) = args.train {
        config.data.training_path = path;
    }
    if let Some(path) = args.test {
        config.data.test_path = path;
    }
    if let Some(factors) = args.factors {
        config.model.max_factors = factors;
    }
    if let Some(min_tries) = args.min_tries {
        config.training.min_tries = min_tries;
    }

    info!("Model configuration: {:?}", config.model);
    info!("Training configuration: {:?}", config.training);

    let report = pipeline::run(&config)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("The resulting RMSE is : {}", report.rmse());
    }

    Ok(())
}
