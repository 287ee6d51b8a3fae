use anyhow::Result;
use clap::{Parser, Subcommand};
use cli::overrides::RankArgs;
use cli::report;
use screener_core::config;
use screener_core::error::ScreenError;
use screener_core::pipeline;
use std::process::ExitCode;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "resume-screener", version, about = "Rank resumes against a job description")]
struct Cli {
    /// Path to config TOML
    #[arg(short, long)]
    config: Option<String>,

    /// Debug logging (overrides RUST_LOG)
    #[arg(short, long, default_value_t = false)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Rank resumes and look up coding profile stats
    Rank(RankArgs),
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            let code = err
                .downcast_ref::<ScreenError>()
                .map(ScreenError::exit_code)
                .unwrap_or(1);
            ExitCode::from(u8::try_from(code).unwrap_or(1))
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let mut cfg = config::load(cli.config.as_deref())?;
    match cli.command {
        Commands::Rank(args) => {
            args.apply(&mut cfg);
            let registry = pipeline::build_registry(&cfg.stats)?;
            let report = pipeline::run(&cfg, &registry).await?;
            info!(
                reference = %report.reference,
                candidates = report.candidates,
                reported = report.results.len(),
                "screening complete"
            );
            if args.json {
                println!("{}", report::render_json(&report)?);
            } else {
                print!("{}", report::render_text(&report));
            }
        }
    }
    Ok(())
}
