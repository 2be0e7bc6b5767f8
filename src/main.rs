use anyhow::{bail, Context, Result};
use clap::Parser;
use std::io::BufRead;
use std::path::PathBuf;
use symreg::config::ConfigManager;

const DEFAULT_CONFIG: &str = "symreg.toml";

#[derive(Debug, Parser)]
#[command(
    name = "symreg",
    version,
    about = "Renders prefix-encoded GP expression trees as infix text",
    after_help = "Without EXPRESSIONS, one expression is read per stdin line.\n\
        Environment overrides: SYMREG_EVOLUTION__SEED=64, SYMREG_PARSER__MAX_DEPTH=64, ..."
)]
struct Cli {
    /// Settings file (TOML or JSON); defaults to ./symreg.toml when present
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Print the run settings, their hash, the stopping mode and the config manifest
    #[arg(long)]
    describe: bool,

    /// Expressions such as `add(x,neg(y))`
    #[arg(value_name = "EXPRESSIONS")]
    expressions: Vec<String>,
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let describe = cli.describe;
    let mut expressions = cli.expressions;

    let manager = ConfigManager::new();
    let default_path = PathBuf::from(DEFAULT_CONFIG);
    let path = cli
        .config
        .or_else(|| default_path.exists().then_some(default_path));
    if let Some(path) = path {
        manager
            .load_from_file(&path)
            .with_context(|| format!("Failed to load {}", path.display()))?;
    }
    let config = manager.get();

    if describe {
        config.evolution.log_summary();
        println!("{}", config.evolution);
        println!("hash: {}", config.evolution.content_hash());
        print!("{}", config.evolution.stopping_rule().mode_message());
        for manifest in config.manifests() {
            println!("{}", manifest.to_json()?);
        }
        if expressions.is_empty() {
            return Ok(());
        }
    }

    if expressions.is_empty() {
        for line in std::io::stdin().lock().lines() {
            let line = line?;
            if !line.trim().is_empty() {
                expressions.push(line);
            }
        }
    }

    let renderer = config.build_renderer()?;
    let results = renderer.render_batch(&expressions);

    let mut failed = 0;
    for (expression, result) in expressions.iter().zip(results) {
        match result {
            Ok(infix) => println!("{}", infix),
            Err(e) => {
                log::error!("`{}`: {}", expression, e);
                failed += 1;
            }
        }
    }

    if failed > 0 {
        bail!("{} of {} expressions failed to render", failed, expressions.len());
    }
    Ok(())
}
