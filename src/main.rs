//! GeoVis - brand visibility collector for AI chatbot answers
//!
//! A CLI tool that triggers chatbot answer datasets (ChatGPT, Perplexity,
//! Gemini), waits for them to finish, and scores every answer for
//! citations of your site, brand mentions and competitor mentions.
//!
//! Exit codes:
//!   0 - Success
//!   1 - Error (configuration, API, or file output)

mod analysis;
mod cli;
mod config;
mod dataset;
mod models;
mod output;
mod prompts;
mod runner;

use anyhow::{bail, Context, Result};
use chrono::Utc;
use cli::Args;
use config::{Config, CONFIG_FILE_NAME};
use dataset::{DatasetClient, PollSettings};
use models::RunSummary;
use output::{write_json, RunLayout};
use runner::{Collector, RunConfig};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        return handle_init_config();
    }

    // Initialize logging
    init_logging(&args);

    info!("GeoVis v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);

    if let Err(e) = run_collection(args).await {
        error!("Run failed: {:#}", e);
        eprintln!("\n❌ Error: {:#}", e);
        std::process::exit(1);
    }

    Ok(())
}

/// Handle --init-config: generate a default .geovis.toml.
fn handle_init_config() -> Result<()> {
    let path = Path::new(CONFIG_FILE_NAME);

    if path.exists() {
        eprintln!("⚠️  {} already exists. Remove it first or edit it manually.", CONFIG_FILE_NAME);
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content)
        .with_context(|| format!("Failed to write {}", CONFIG_FILE_NAME))?;

    println!("✅ Created {} with default settings.", CONFIG_FILE_NAME);
    println!("   Edit it to set target domains, brand terms, and competitors.");
    Ok(())
}

/// Initialize logging based on verbosity settings.
fn init_logging(args: &Args) {
    let level = args.log_level();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
    }
}

/// Run the complete collection workflow.
async fn run_collection(args: Args) -> Result<()> {
    let start_time = Instant::now();

    // Load configuration
    let mut config = load_config(&args)?;
    config.merge_with_args(&args);

    let prompts_file = args
        .prompts_file
        .clone()
        .context("--prompts-file is required")?;
    let prompts = prompts::load_prompts(&prompts_file)?;
    if prompts.is_empty() {
        bail!("No prompts found in {}", prompts_file.display());
    }

    let jobs = args.jobs();
    let profile = config.brand_profile();
    let providers = config.provider_table();

    let now = Utc::now();
    let run_at = now.format("%Y-%m-%dT%H:%M:%SZ").to_string();
    let layout = RunLayout::new(
        &PathBuf::from(config.output.out_dir.trim()),
        &now.format("%Y-%m-%d").to_string(),
    );

    if profile.target_domains.is_empty() {
        warn!("No target domains configured; no answer will count as cited");
    }

    if args.dry_run {
        return handle_dry_run(&args, &config, &prompts, &providers);
    }

    std::fs::create_dir_all(layout.dir())
        .with_context(|| format!("Failed to create {}", layout.dir().display()))?;

    println!("🔎 Checking {} with {} prompts", args.check_url(), prompts.len());
    println!("   API: {}", config.api.base_url);
    println!(
        "   Poll: every {}s, up to {} attempts",
        config.poll.delay_seconds, config.poll.max_attempts
    );

    let client = DatasetClient::new(&config.api.base_url, args.api_key.trim())?;
    let run_config = RunConfig {
        check_url: args.check_url().to_string(),
        country: config.collection.country.clone(),
        prompts,
        poll: PollSettings {
            interval: Duration::from_secs(config.poll.delay_seconds),
            max_attempts: config.poll.max_attempts,
        },
        show_progress: !args.quiet,
    };
    let collector = Collector::new(client, providers, run_config, layout.clone());

    let snapshots = collector.run_jobs(&jobs).await?;

    if args.skip_download {
        let summary = serde_json::json!({ "run_at": run_at, "snapshots": snapshots });
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    let results = collector.collect_results(&snapshots, &profile).await?;

    let summary = RunSummary {
        run_at,
        check_url: args.check_url().to_string(),
        target_domains: profile.target_domains.clone(),
        brand_terms: profile.brand_terms.clone(),
        snapshots,
        results,
    };

    let results_path = layout.results_path();
    write_json(&results_path, &summary)?;

    // Print summary
    println!("\n📊 Visibility Summary:");
    for line in analysis::generate_summary_text(&summary.results).lines() {
        println!("   {}", line);
    }
    println!("   Duration: {:.1}s", start_time.elapsed().as_secs_f64());
    println!("\n✅ Wrote results to {}", results_path.display());

    Ok(())
}

/// Handle --dry-run: show what would be sent, make no API calls.
fn handle_dry_run(
    args: &Args,
    config: &Config,
    prompts: &[String],
    providers: &dataset::ProviderTable,
) -> Result<()> {
    println!("\n🔍 Dry run: no API calls will be made\n");
    println!("   Check URL: {}", args.check_url());
    println!("   Country: {}", config.collection.country);
    println!("   Prompts: {}", prompts.len());

    for (chatbot, dataset_id) in args.jobs() {
        let inputs = providers.build_inputs(chatbot, prompts, args.check_url(), &config.collection.country);
        println!("\n   🤖 {} (dataset {})", chatbot, dataset_id);
        println!("      Fields: {}", providers.output_fields(chatbot));
        println!("      Input rows: {}", serde_json::to_string_pretty(&inputs)?);
    }

    println!("\n✅ Dry run complete.");
    Ok(())
}

/// Load configuration from file or use defaults.
fn load_config(args: &Args) -> Result<Config> {
    // Try explicit config path
    if let Some(ref config_path) = args.config {
        info!("Loading config from: {}", config_path.display());
        return Config::load(config_path);
    }

    // Try default location
    match Config::load_default() {
        Ok(Some(config)) => {
            info!("Loaded default config from {}", CONFIG_FILE_NAME);
            Ok(config)
        }
        Ok(None) => {
            debug!("No config file found, using defaults");
            Ok(Config::default())
        }
        Err(e) => {
            warn!("Failed to load config: {}", e);
            Ok(Config::default())
        }
    }
}
