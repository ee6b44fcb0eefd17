use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use skill_score::activity::load_activity;
use skill_score::diagnostics::{BufferedSink, TracingSink};
use skill_score::evaluation::{
    calculate_raw_scores, evaluate_async, AsyncRankLookups, EvaluationContext,
};
use skill_score::normalize::{normalize_with_rank, RankInfo};
use skill_score::population::ReferencePopulations;
use skill_score::config::Config;
use skill_score::scoring::{calculate_raw_detail, overall_breakdown, validate_scoring, ScoringConfig};

const EXIT_SUCCESS: i32 = 0;
const EXIT_INPUT: i32 = 1;
const EXIT_CONFIG: i32 = 4;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Format {
    Table,
    Tsv,
    Json,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Compute raw category scores and the overall raw score
    Raw {
        /// Activity record (YAML or JSON)
        activity: PathBuf,
    },
    /// Normalize one raw score from rank counts
    Normalize {
        raw_score: f64,
        /// Reference members ranked strictly below
        #[arg(long)]
        lower: u64,
        /// Reference members ranked strictly above
        #[arg(long)]
        higher: u64,
        /// Reference members tied with the raw score
        #[arg(long, default_value_t = 0)]
        same: u64,
        /// The subject is part of the reference population
        #[arg(long)]
        reference_person: bool,
    },
    /// Score a person against reference populations
    Evaluate {
        /// Activity record (YAML or JSON)
        activity: PathBuf,
        /// Reference population file (YAML or JSON)
        #[arg(short, long)]
        population: PathBuf,
        /// The subject is part of the reference population
        #[arg(long)]
        reference_person: bool,
        #[arg(short, long, value_enum, default_value_t = Format::Table)]
        format: Format,
        /// Also write the JSON report to this path
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
    /// Print the default scoring config as YAML
    Defaults,
}

#[derive(Parser, Debug)]
#[command(name = "skill-score")]
#[command(about = "Bounded technical skill scores from raw activity signals", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to config file (defaults to ~/.config/skill-score/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "skill_score=debug,info" } else { "warn" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .init();
}

fn load_scoring(config_path: Option<String>) -> ScoringConfig {
    let config = match skill_score::config::load_config(config_path.map(PathBuf::from)) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };

    // Validate scoring config at startup
    let scoring = config.effective_scoring();
    if let Err(errors) = validate_scoring(&scoring) {
        eprintln!("Scoring config errors:");
        for error in errors {
            eprintln!("  - {}", error);
        }
        std::process::exit(EXIT_CONFIG);
    }
    scoring
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Defaults => {
            let config = Config {
                scoring: Some(ScoringConfig::default()),
            };
            match serde_saphyr::to_string(&config) {
                Ok(yaml) => print!("{}", yaml),
                Err(e) => {
                    eprintln!("Failed to render default config: {}", e);
                    std::process::exit(EXIT_CONFIG);
                }
            }
        }
        Commands::Normalize {
            raw_score,
            lower,
            higher,
            same,
            reference_person,
        } => {
            let rank = RankInfo::new(lower, higher, same);
            let result = normalize_with_rank(raw_score, reference_person, rank);
            println!(
                "score: {}  percentile: {}",
                skill_score::output::format_score(result),
                skill_score::output::format_percentile(result)
            );
        }
        Commands::Raw { activity } => {
            let scoring = load_scoring(cli.config);
            let record = match load_activity(&activity).await {
                Ok(r) => r,
                Err(e) => {
                    eprintln!("Input error: {:#}", e);
                    std::process::exit(EXIT_INPUT);
                }
            };

            let breakdown = calculate_raw_detail(&record, &TracingSink)
                .and_then(|detail| overall_breakdown(&detail, &scoring));
            match breakdown {
                Ok(breakdown) => {
                    let use_colors = skill_score::output::should_use_colors();
                    println!(
                        "{}",
                        skill_score::output::format_raw_breakdown(&breakdown, use_colors)
                    );
                }
                Err(e) => {
                    eprintln!("Scoring error: {}", e);
                    std::process::exit(if e.is_configuration() { EXIT_CONFIG } else { EXIT_INPUT });
                }
            }
        }
        Commands::Evaluate {
            activity,
            population,
            reference_person,
            format,
            out,
        } => {
            let scoring = load_scoring(cli.config);

            // Read both inputs concurrently
            let (record, populations) = tokio::join!(
                load_activity(&activity),
                ReferencePopulations::load(&population)
            );
            let (record, populations) = match (record, populations) {
                (Ok(r), Ok(p)) => (r, p),
                (Err(e), _) | (_, Err(e)) => {
                    eprintln!("Input error: {:#}", e);
                    std::process::exit(EXIT_INPUT);
                }
            };

            if cli.verbose {
                eprintln!(
                    "Reference sizes: overall {}, github {}, articles {}, events {}, tags {}",
                    populations.overall.len(),
                    populations.github.len(),
                    populations.articles.len(),
                    populations.events.len(),
                    populations.tags.len()
                );
            }

            let sink = BufferedSink::forwarding();
            let raw = match calculate_raw_scores(&record, &scoring, &sink) {
                Ok(raw) => raw,
                Err(e) => {
                    eprintln!("Scoring error: {}", e);
                    std::process::exit(if e.is_configuration() { EXIT_CONFIG } else { EXIT_INPUT });
                }
            };

            let lookups = AsyncRankLookups {
                overall: &populations.overall,
                github: &populations.github,
                articles: &populations.articles,
                events: &populations.events,
                tags: &populations.tags,
            };
            let ctx = EvaluationContext {
                is_reference_person: reference_person,
            };
            let report = evaluate_async(&raw, &lookups, ctx).await;

            let document = skill_score::output::ReportDocument::new(
                &record.github_identifier,
                reference_person,
                raw,
                report,
                sink.drain(),
            );

            match format {
                Format::Table => {
                    let use_colors = skill_score::output::should_use_colors();
                    println!(
                        "{}",
                        skill_score::output::format_report_table(&raw, &report, use_colors)
                    );
                }
                Format::Tsv => {
                    println!("{}", skill_score::output::format_report_tsv(&raw, &report));
                }
                Format::Json => match document.to_json() {
                    Ok(json) => println!("{}", json),
                    Err(e) => {
                        eprintln!("{:#}", e);
                        std::process::exit(EXIT_INPUT);
                    }
                },
            }

            if let Some(path) = out {
                if let Err(e) = skill_score::output::save_report(&path, &document) {
                    eprintln!("{:#}", e);
                    std::process::exit(EXIT_INPUT);
                }
                if cli.verbose {
                    eprintln!("Report written to {}", path.display());
                }
            }
        }
    }

    std::process::exit(EXIT_SUCCESS);
}
