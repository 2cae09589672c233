mod cli;

use kinsearch::config::{self, Config};
use kinsearch::search::{enrich_all, Candidate, RefineParams};

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};
use serde::Serialize;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Respect RUST_LOG env var if set, otherwise use defaults based on verbose flag
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            "kinsearch=debug".to_string()
        } else {
            "kinsearch=info".to_string()
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(&env_filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Providers => list_providers(cli.config.as_deref()),
        Commands::Search {
            query,
            provider,
            json,
        } => {
            let config = config::load_config_or_default(cli.config.as_deref())?;
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(search(&config, &query, provider.as_deref(), json))
        }
        Commands::Refine {
            name,
            born,
            died,
            place,
            provider,
            json,
        } => {
            let config = config::load_config_or_default(cli.config.as_deref())?;
            let params = RefineParams {
                name,
                birth_year: born,
                death_year: died,
                place,
            };
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(refine(&config, &params, provider.as_deref(), json))
        }
        Commands::Enrich { query, provider } => {
            let config = config::load_config_or_default(cli.config.as_deref())?;
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(enrich(&config, &query, provider.as_deref()))
        }
        Commands::Validate {
            config: config_path,
        } => {
            let path = config_path.or(cli.config);
            validate_config(path.as_deref())
        }
        Commands::Version => {
            println!("kinsearch {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

fn list_providers(config_path: Option<&std::path::Path>) -> Result<()> {
    let config = config::load_config_or_default(config_path)?;
    let registry = config::build_registry(&config, config.fetcher())?;
    for info in registry.list() {
        println!("{}\t{}", info.id, info.label);
    }
    Ok(())
}

async fn search(config: &Config, query: &str, provider: Option<&str>, json: bool) -> Result<()> {
    let registry = config::build_registry(config, config.fetcher())?;
    let provider = registry.pick(provider.unwrap_or(config.search.default_provider.as_str()));
    tracing::info!(provider = provider.id(), "Searching");

    let candidates = provider.search(query).await?;
    print_candidates(&candidates, json)
}

async fn refine(
    config: &Config,
    params: &RefineParams,
    provider: Option<&str>,
    json: bool,
) -> Result<()> {
    let registry = config::build_registry(config, config.fetcher())?;
    let provider = registry.pick(provider.unwrap_or(config.search.default_provider.as_str()));
    tracing::info!(provider = provider.id(), "Refined search");

    let candidates = provider.refine(params).await?;
    print_candidates(&candidates, json)
}

#[derive(Serialize)]
struct EnrichedCandidate<'a> {
    candidate: &'a Candidate,
    enrichment: Vec<kinsearch::EnrichmentBit>,
}

async fn enrich(config: &Config, query: &str, provider: Option<&str>) -> Result<()> {
    let fetcher = config.fetcher();
    let registry = config::build_registry(config, fetcher.clone())?;
    let enrichers = config::build_enrichers(config, fetcher)?;
    let provider = registry.pick(provider.unwrap_or(config.search.default_provider.as_str()));

    let candidates = provider.search(query).await?;
    let bits = enrich_all(&enrichers, &candidates).await;
    tracing::info!(
        candidates = candidates.len(),
        enrichers = enrichers.len(),
        bits = bits.iter().map(Vec::len).sum::<usize>(),
        "Enrichment complete"
    );

    let output: Vec<EnrichedCandidate<'_>> = candidates
        .iter()
        .zip(bits)
        .map(|(candidate, enrichment)| EnrichedCandidate {
            candidate,
            enrichment,
        })
        .collect();
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn print_candidates(candidates: &[Candidate], json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(candidates)?);
        return Ok(());
    }

    if candidates.is_empty() {
        println!("No matches.");
        return Ok(());
    }

    for c in candidates {
        println!(
            "{}\t{}\t{}\t{}\t{}\t{}",
            c.id(),
            c.name(),
            c.lifespan(),
            c.place(),
            c.source(),
            c.url()
        );
        for why in c.why() {
            println!("    - {}", why);
        }
    }
    println!("\n{} match(es)", candidates.len());
    Ok(())
}

fn validate_config(config_path: Option<&std::path::Path>) -> Result<()> {
    let config = config::load_config_or_default(config_path)?;
    let registry = config::build_registry(&config, config.fetcher())?;

    println!("Configuration is valid!");
    println!("  Providers: {}", registry.len());
    println!("  Default provider: {}", config.search.default_provider);
    println!("  Max results: {}", config.search.max_results);
    println!("  Timeout: {}s", config.search.timeout_secs);

    Ok(())
}
