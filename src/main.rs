mod cli;

use clap::Parser;
use cli::{Cli, Commands};
use colored::*;
use listing_watch::{
    config::Config,
    error,
    listing::{self, IdentityKey},
    storage::IdentityStore,
    utils::{self, OutputFormat},
    Pipeline, RunContext,
};
use tracing::{error, info};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "listing_watch=debug,info".into()),
        )
        .init();

    let cli = Cli::parse();

    // Needs no configuration
    if let Commands::Parse { text, weight } = &cli.command {
        show_parse(text, *weight);
        return;
    }

    let config = match Config::load(&cli.config) {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    let result = match cli.command {
        Commands::Run { dry_run } => {
            info!("Starting harvest run (dry run: {})", dry_run);
            run_once(&config, dry_run).await
        }

        Commands::Notified { format } => list_notified(&config, &format),

        Commands::Init => {
            info!("Initializing...");
            initialize(&config)
        }

        Commands::Reset { yes } => reset_store(&config, yes),

        Commands::Parse { .. } => Ok(()),
    };

    if let Err(e) = result {
        error!("{}", format!("Error: {}", e).red());
        std::process::exit(1);
    }
}

async fn run_once(config: &Config, dry_run: bool) -> error::Result<()> {
    let ctx = RunContext::from_config(config, dry_run)?;
    let report = Pipeline::new(ctx).run().await?;

    report.print_summary();
    Ok(())
}

fn list_notified(config: &Config, format: &str) -> error::Result<()> {
    let format: OutputFormat = format.parse()?;
    let store = IdentityStore::new(&config.store.path);
    let records = store.load();

    if format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(&records)?);
        return Ok(());
    }

    let stats = store.stats();
    println!("{}", "=== Notified Listings ===".cyan().bold());
    println!("Total: {}  (dogs: {}, jobs: {})", stats.total, stats.adoptions, stats.jobs);

    if records.is_empty() {
        return Ok(());
    }

    let widths = [8, 30, 24, 30];
    utils::print_table_border(100);
    utils::print_table_row(&["Kind", "Origin", "Name / Req ID", "Detail"], &widths);
    utils::print_table_border(100);

    for record in &records {
        match record {
            IdentityKey::Adoption(dog) => {
                let detail = format!("{}, {}, {}", dog.breed, dog.sex, dog.age);
                utils::print_table_row(&["dog", &dog.source, &dog.name, &detail], &widths);
            }
            IdentityKey::Job(job) => {
                utils::print_table_row(&["job", &job.employer, &job.req_id, ""], &widths);
            }
        }
    }
    utils::print_table_border(100);

    Ok(())
}

fn show_parse(text: &str, weight: bool) {
    let (parsed, number, unit) = if weight {
        (listing::parse_weight(text), listing::weight_pounds(text), "lbs")
    } else {
        (listing::parse_age(text), listing::age_years(text), "years")
    };

    println!("Input:  {:?}", text);
    println!("Parsed: {:?}", parsed);
    match number {
        Some(value) => println!("Value:  {} {}", value.to_string().green(), unit),
        None => println!("Value:  {}", "unparseable (excluded by numeric filters)".yellow()),
    }
}

fn initialize(config: &Config) -> error::Result<()> {
    println!("{}", "Initializing listing-watch...".green());
    let store = IdentityStore::new(&config.store.path);
    if store.ensure_exists()? {
        println!("{}", "✓ Identity store created".green());
    } else {
        println!("{}", "✓ Identity store already exists".green());
    }
    println!("{}", "✓ Configuration loaded".green());

    println!("\n{}", "Configuration:".cyan());
    println!("  Store:          {}", store.path().display());
    println!("  Channel:        {:?}", config.notify.channel);
    println!(
        "  Adoption:       {} / <= {} lbs / <= {} years",
        config.adoption.sex, config.adoption.max_weight, config.adoption.max_age
    );
    println!("  Breeds:         {}", config.adoption.allowed_breeds.join(", "));
    println!("  Job blocklist:  {}", config.jobs.blocklist.join(", "));
    println!("  Sources:");
    for source in &config.sources {
        println!("    {:?}: {} ({})", source.kind, source.name, source.url);
    }

    println!("\n{}", "Ready to use! Try running:".cyan());
    println!("  {} to preview without sending", "listing-watch run --dry-run".yellow());
    println!("  {} to run one cycle", "listing-watch run".yellow());
    Ok(())
}

fn reset_store(config: &Config, yes: bool) -> error::Result<()> {
    let store = IdentityStore::new(&config.store.path);
    let total = store.stats().total;

    if !yes && !utils::confirm_action(&format!("Forget {} notified listings?", total)) {
        println!("Cancelled");
        return Ok(());
    }

    store.clear()?;
    println!("{}", format!("✓ Cleared {} records", total).green());
    Ok(())
}
