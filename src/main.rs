use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

use aso_combos::config::{AnalyzeOptions, EngineConfig};
use aso_combos::select::ComboFilter;
use aso_combos::signals::SignalSet;
use aso_combos::{format_float, format_percent, AnalysisReport, Engine, Metadata, StrengthTier};

#[derive(Parser)]
#[command(name = "aso-combos", about = "Keyword combination analyzer for app store metadata")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    Analyze(AnalyzeArgs),
    InitConfig(InitConfigArgs),
}

#[derive(Args, Debug, Clone)]
struct AnalyzeArgs {
    /// JSON file with title, subtitle, keywordsField, promoText, brandName.
    #[arg(long)]
    metadata: Option<PathBuf>,
    #[arg(long)]
    title: Option<String>,
    #[arg(long)]
    subtitle: Option<String>,
    #[arg(long)]
    keywords: Option<String>,
    #[arg(long)]
    promo: Option<String>,
    #[arg(long)]
    brand: Option<String>,
    #[arg(long = "candidate")]
    candidates: Vec<String>,
    /// JSON file with `rankings` and `popularity` maps.
    #[arg(long)]
    signals: Option<PathBuf>,
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    top_n: Option<usize>,
    #[arg(long)]
    max_combos_per_source: Option<usize>,
    #[arg(long = "tier")]
    tiers: Vec<String>,
    #[arg(long, conflicts_with = "existing")]
    missing: bool,
    #[arg(long, conflicts_with = "missing")]
    existing: bool,
    #[arg(long)]
    min_total: Option<u8>,
    #[arg(long, default_value_t = 25)]
    rows: usize,
    #[arg(long)]
    json: bool,
    #[arg(long)]
    details: bool,
}

#[derive(Args, Debug, Clone)]
struct InitConfigArgs {
    #[arg(long, default_value = "config/engine.toml")]
    path: PathBuf,
    #[arg(long)]
    force: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    load_dotenv();
    init_tracing();
    if let Err(err) = run().await {
        eprintln!("Error: {:#}", err);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Command::Analyze(args) => run_analyze(args).await,
        Command::InitConfig(args) => run_init_config(args),
    }
}

async fn run_analyze(args: AnalyzeArgs) -> Result<()> {
    let (config, _) = EngineConfig::load(args.config.clone())?;
    let options = AnalyzeOptions {
        max_combos_per_source: args.max_combos_per_source,
        top_n: args.top_n,
        weights: None,
    };
    let engine = Engine::new(options.apply(&config));

    let metadata = read_metadata(&args)?;
    let signals = match args.signals.as_deref() {
        Some(path) => SignalSet::load(path)
            .with_context(|| format!("loading signals from {}", path.display()))?,
        None => SignalSet::default(),
    };

    let report = engine.analyze_cooperative(&metadata, &signals).await?;
    let filter = build_filter(&args)?;

    if args.json {
        let mut report = report;
        report.combos.retain(|combo| filter.matches(combo));
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    print_report(&report, &filter, &args);
    Ok(())
}

fn run_init_config(args: InitConfigArgs) -> Result<()> {
    if args.path.exists() && !args.force {
        bail!("{} already exists (pass --force to overwrite)", args.path.display());
    }
    EngineConfig::default().write(&args.path)?;
    println!("Wrote default config to {}", args.path.display());
    Ok(())
}

fn read_metadata(args: &AnalyzeArgs) -> Result<Metadata> {
    let mut metadata = match args.metadata.as_deref() {
        Some(path) => {
            let contents = std::fs::read_to_string(path)
                .with_context(|| format!("reading metadata from {}", path.display()))?;
            serde_json::from_str::<Metadata>(&contents)
                .with_context(|| format!("parsing metadata from {}", path.display()))?
        }
        None => Metadata::default(),
    };

    if let Some(title) = args.title.clone() {
        metadata.title = title;
    }
    if let Some(subtitle) = args.subtitle.clone() {
        metadata.subtitle = Some(subtitle);
    }
    if let Some(keywords) = args.keywords.clone() {
        metadata.keywords_field = Some(keywords);
    }
    if let Some(promo) = args.promo.clone() {
        metadata.promo_text = Some(promo);
    }
    if let Some(brand) = args.brand.clone() {
        metadata.brand_name = Some(brand);
    }
    metadata.candidate_combos.extend(args.candidates.iter().cloned());

    Ok(metadata)
}

fn build_filter(args: &AnalyzeArgs) -> Result<ComboFilter> {
    let tiers = if args.tiers.is_empty() {
        None
    } else {
        let mut parsed = Vec::with_capacity(args.tiers.len());
        for label in &args.tiers {
            match StrengthTier::from_label(label) {
                Some(tier) => parsed.push(tier),
                None => bail!("invalid tier: {}", label),
            }
        }
        Some(parsed)
    };

    let existence = match (args.missing, args.existing) {
        (true, _) => Some(false),
        (_, true) => Some(true),
        _ => None,
    };

    Ok(ComboFilter {
        tiers,
        existence,
        min_total: args.min_total,
    })
}

fn print_report(report: &AnalysisReport, filter: &ComboFilter, args: &AnalyzeArgs) {
    let stats = &report.stats;
    println!(
        "Combos: {} generated | {} returned | coverage {} ({} existing, {} missing)",
        report.total_generated,
        report.combos.len(),
        format_percent(stats.coverage_percent),
        stats.existing,
        stats.missing
    );
    if report.limit_reached {
        println!(
            "Limit reached: showing top {} of {}{}",
            report.combos.len(),
            report.total_generated,
            if stats.generation_capped {
                " (generation capped)"
            } else {
                ""
            }
        );
    }

    let rows = filter.apply(&report.combos);
    println!("\n{:>4}  {:>5}  {:<26}  combo", "#", "total", "tier");
    for (idx, combo) in rows.iter().take(args.rows).enumerate() {
        println!(
            "{:>4}  {:>5}  {:<26}  {}",
            idx + 1,
            combo.priority.total,
            combo.combo.tier.label(),
            combo.text()
        );
        if args.details {
            let components = &combo.priority.components;
            println!(
                "        strength {} | popularity {} | opportunity {} | trend {} | intent {} | {:?}",
                format_float(components.strength, 0),
                format_float(components.popularity, 1),
                format_float(components.opportunity, 0),
                format_float(components.trend, 0),
                format_float(components.intent, 1),
                combo.priority.data_quality
            );
        }
    }

    if args.details {
        println!("\nTier counts:");
        for (tier, count) in &stats.per_tier {
            println!("  {}: {}", tier.label(), count);
        }
    }

    if !report.suggestions.is_empty() {
        println!("\nSuggestions:");
        for suggestion in &report.suggestions {
            println!("- {}", suggestion);
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn load_dotenv() {
    let _ = dotenvy::dotenv();
    let manifest_dir = env!("CARGO_MANIFEST_DIR");
    let manifest_path = Path::new(manifest_dir).join(".env");
    let _ = dotenvy::from_path(manifest_path);
}
