//! AO Fever CLI
//!
//! Scrapes Australian Open tables into CSV and predicts head-to-head
//! matchups with a random forest.

use aofever::features::{MatchContext, PlayerEstimate};
use aofever::{Config, Result};
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "aofever")]
#[command(about = "Australian Open table scraping and match prediction", long_about = None)]
struct Cli {
    /// Config file path
    #[arg(short, long, default_value = "config.toml")]
    config: String,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a new project with default config
    Init,
    /// List the known table sources
    Sources,
    /// Fetch pages and write one CSV per source
    Scrape {
        /// Only scrape this source
        #[arg(long)]
        source: Option<String>,
        /// Cache directory for HTML files
        #[arg(long)]
        cache: Option<String>,
        /// Use only cached files (no network requests)
        #[arg(long)]
        offline: bool,
        /// Output directory (defaults to scrape.output_dir)
        #[arg(long)]
        out: Option<String>,
    },
    /// Extract a source's table from saved HTML files
    Parse {
        /// Source name (see `aofever sources`)
        source: String,
        /// Saved HTML pages
        #[arg(required = true)]
        files: Vec<String>,
        /// Output CSV path (defaults to the source's file in scrape.output_dir)
        #[arg(long)]
        out: Option<String>,
    },
    /// Train and evaluate the match predictor
    Train {
        /// ATP match CSV (defaults to data.atp_path)
        #[arg(long)]
        data: Option<String>,
        /// Override number of trees
        #[arg(long)]
        trees: Option<usize>,
    },
    /// Predict a head-to-head matchup
    Predict {
        #[arg(long, default_value = "Novak Djokovic")]
        player_a: String,
        #[arg(long, default_value = "1")]
        rank_a: f64,
        #[arg(long, default_value = "12000")]
        points_a: f64,
        #[arg(long, default_value = "1.5")]
        odd_a: f64,
        #[arg(long, default_value = "Carlos Alcaraz")]
        player_b: String,
        #[arg(long, default_value = "2")]
        rank_b: f64,
        #[arg(long, default_value = "10500")]
        points_b: f64,
        #[arg(long, default_value = "2.2")]
        odd_b: f64,
        #[arg(long, default_value = "Hard")]
        surface: String,
        #[arg(long, default_value = "The Final")]
        round: String,
        #[arg(long, default_value = "5")]
        best_of: f64,
        /// Output format
        #[arg(long, default_value = "table")]
        format: OutputFormat,
    },
}

#[derive(Clone, Debug)]
enum OutputFormat {
    Table,
    Json,
    Csv,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "table" => Ok(OutputFormat::Table),
            "json" => Ok(OutputFormat::Json),
            "csv" => Ok(OutputFormat::Csv),
            _ => Err(format!("Unknown format: {}. Use table, json, or csv.", s)),
        }
    }
}

fn main() {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level))
        .format_timestamp(None)
        .init();

    // Load or create config
    let config = if std::path::Path::new(&cli.config).exists() {
        match Config::load(&cli.config) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Error loading config: {}", e);
                std::process::exit(1);
            }
        }
    } else {
        Config::default()
    };

    let result = match cli.command {
        Commands::Init => commands::init(&cli.config),
        Commands::Sources => commands::sources(),
        Commands::Scrape {
            source,
            cache,
            offline,
            out,
        } => commands::scrape(&config, source, cache, offline, out),
        Commands::Parse { source, files, out } => commands::parse(&config, &source, &files, out),
        Commands::Train { data, trees } => commands::train(&config, data, trees),
        Commands::Predict {
            player_a,
            rank_a,
            points_a,
            odd_a,
            player_b,
            rank_b,
            points_b,
            odd_b,
            surface,
            round,
            best_of,
            format,
        } => {
            let a = PlayerEstimate::new(player_a, rank_a, points_a, odd_a);
            let b = PlayerEstimate::new(player_b, rank_b, points_b, odd_b);
            let ctx = MatchContext {
                surface,
                round,
                best_of,
            };
            commands::predict(&config, &a, &b, &ctx, format)
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

mod commands {
    use super::*;
    use aofever::data::dataset::load_matches;
    use aofever::data::export::write_csv;
    use aofever::data::scrapers::{all_sources, find_source, TableSource};
    use aofever::data::PageFetcher;
    use aofever::predict::{format_prediction, write_predictions_csv, Predictor};
    use aofever::training::Trainer;
    use std::path::{Path, PathBuf};

    pub fn init(config_path: &str) -> Result<()> {
        let config = Config::default();
        config.save(config_path)?;
        println!("Created default config at {}", config_path);

        std::fs::create_dir_all(&config.scrape.output_dir)?;
        if let Some(model_dir) = Path::new(&config.data.model_path).parent() {
            std::fs::create_dir_all(model_dir)?;
        }
        println!("Created output and model directories");

        println!("\nNext steps:");
        println!("  1. Edit {} to customize settings", config_path);
        println!("  2. Run 'aofever scrape' to fetch the tournament tables");
        println!("  3. Run 'aofever train --data atp.csv' to train the predictor");
        println!("  4. Run 'aofever predict' to score a matchup");

        Ok(())
    }

    pub fn sources() -> Result<()> {
        println!("{:<20} {:<16} {}", "NAME", "SITE", "DESCRIPTION");
        for source in all_sources()? {
            println!(
                "{:<20} {:<16} {}",
                source.name,
                source.data_source.to_string(),
                source.description
            );
        }
        Ok(())
    }

    fn output_path(config: &Config, dir: Option<&str>, source: &TableSource) -> PathBuf {
        Path::new(dir.unwrap_or(&config.scrape.output_dir)).join(source.output_file)
    }

    pub fn scrape(
        config: &Config,
        source: Option<String>,
        cache: Option<String>,
        offline: bool,
        out: Option<String>,
    ) -> Result<()> {
        let selected = match source {
            Some(name) => vec![find_source(&name)?],
            None => all_sources()?,
        };

        let mut fetcher = PageFetcher::new(&config.scrape)?;
        if let Some(cache_dir) = cache {
            println!("Using cache directory: {}", cache_dir);
            fetcher = fetcher.with_cache(&cache_dir);
        }
        if offline {
            println!("Offline mode: using cached files only");
            fetcher = fetcher.offline_only(true);
        }

        for source in &selected {
            println!("Scraping {} ({})...", source.name, source.data_source);
            let batch = source.scrape(&fetcher);

            if batch.is_empty() {
                println!("  No records found. Check the source page or cache directory.");
                continue;
            }

            let path = output_path(config, out.as_deref(), source);
            write_csv(&path, &source.headers(), &batch)?;
            println!(
                "  {} record(s), {} row(s) skipped -> {}",
                batch.len(),
                batch.skipped,
                path.display()
            );
        }

        Ok(())
    }

    pub fn parse(config: &Config, source: &str, files: &[String], out: Option<String>) -> Result<()> {
        let source = find_source(source)?;
        println!("Parsing {} file(s) as {}...", files.len(), source.name);

        let batch = source.parse_files(files);
        if batch.is_empty() {
            println!("No records found. Check the HTML files.");
            return Ok(());
        }

        let path = match out {
            Some(p) => PathBuf::from(p),
            None => output_path(config, None, &source),
        };
        write_csv(&path, &source.headers(), &batch)?;
        println!(
            "Wrote {} record(s) to {} ({} row(s) skipped)",
            batch.len(),
            path.display(),
            batch.skipped
        );
        Ok(())
    }

    pub fn train(config: &Config, data: Option<String>, trees: Option<usize>) -> Result<()> {
        let data_path = data.unwrap_or_else(|| config.data.atp_path.clone());
        let mut predictor_config = config.predictor.clone();
        if let Some(n) = trees {
            predictor_config.n_trees = n;
        }

        println!("Loading matches from {}...", data_path);
        let matches = load_matches(&data_path)?;
        println!("  {} matches after cleaning", matches.len());

        println!("\nTraining random forest ({} trees)...", predictor_config.n_trees);
        let outcome = Trainer::new(predictor_config).train(&matches)?;

        match &outcome.evaluation {
            Some(eval) => println!("\n{}", eval),
            None => println!("\nNo test samples; skipping evaluation"),
        }

        println!("\nSaving model to {}...", config.data.model_path);
        outcome.bundle.save(&config.data.model_path)?;

        let summary = &outcome.bundle.summary;
        println!("\nTraining complete!");
        println!("  Train samples:  {}", summary.train_samples);
        println!("  Test samples:   {}", summary.test_samples);
        if let Some(acc) = summary.test_accuracy {
            println!("  Test accuracy:  {:.1}%", acc * 100.0);
        }

        Ok(())
    }

    pub fn predict(
        config: &Config,
        a: &PlayerEstimate,
        b: &PlayerEstimate,
        ctx: &MatchContext,
        format: OutputFormat,
    ) -> Result<()> {
        let predictor = Predictor::load(&config.data.model_path)?;
        let prediction = predictor.predict(a, b, ctx)?;

        match format {
            OutputFormat::Table => {
                print!("{}", format_prediction(&prediction));
            }
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(&prediction)?);
            }
            OutputFormat::Csv => {
                write_predictions_csv(std::io::stdout(), &[prediction])?;
            }
        }

        Ok(())
    }
}
