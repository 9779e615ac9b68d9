use std::env;
use std::fs;
use std::path::Path;
use trade_lens::aggregator::{Aggregator, ValueAggregator};
use trade_lens::config::{AppConfig, load_config};
use trade_lens::fetcher::GoogleDocsFetcher;
use trade_lens::model::Catalog;
use trade_lens::report::{format_thousands, render_offer, render_trade};
use trade_lens::resolver::find_by_fragment;
use trade_lens::storage::CatalogCache;
use trade_lens::value_list::{RefreshOutcome, ValueList};
use trade_lens::{EntityResolver, Normalizer, Resolver};
use tracing::{error, info, warn};

const CONFIG_PATH: &str = "config.json";

const USAGE: &str = "usage:
  trade-lens refresh [--force]              fetch the value list into the cache
  trade-lens analyze <your.txt> <their.txt> value two OCR text dumps against each other
  trade-lens lookup <item name>             find one item by name";

#[tokio::main]
async fn main() {
    // Initialize logging
    tracing_subscriber::fmt::init();

    std::panic::set_hook(Box::new(|panic_info| {
        eprintln!("😱 Panic occurred: {:?}", panic_info);
    }));

    let config = if Path::new(CONFIG_PATH).exists() {
        match load_config(CONFIG_PATH) {
            Ok(cfg) => cfg,
            Err(e) => {
                error!("Config load error: {}", e);
                return;
            }
        }
    } else {
        info!("No {} found, using defaults", CONFIG_PATH);
        AppConfig::default()
    };

    let args: Vec<String> = env::args().skip(1).collect();
    match args.first().map(String::as_str) {
        Some("refresh") => {
            let force = args.iter().any(|a| a == "--force");
            refresh(&config, force).await;
        }
        Some("analyze") if args.len() == 3 => analyze(&config, &args[1], &args[2]).await,
        Some("lookup") if args.len() > 1 => lookup(&config, &args[1..].join(" ")).await,
        _ => println!("{}", USAGE),
    }
}

fn open_value_list(config: &AppConfig) -> Option<ValueList<GoogleDocsFetcher>> {
    let fetcher = match GoogleDocsFetcher::new(config.google_docs_id.clone()) {
        Ok(fetcher) => fetcher,
        Err(e) => {
            error!("Failed to create HTTP client: {}", e);
            return None;
        }
    };
    let interval = match config.refresh_interval() {
        Ok(interval) => interval,
        Err(e) => {
            error!("Config error: {}", e);
            return None;
        }
    };
    Some(ValueList::open(
        fetcher,
        CatalogCache::new(&config.cache_file),
        interval,
    ))
}

async fn refresh(config: &AppConfig, force: bool) {
    let Some(mut list) = open_value_list(config) else {
        return;
    };
    match list.refresh(force).await {
        Ok(RefreshOutcome::Fresh) => info!("Cache is up to date ({} items)", list.catalog().len()),
        Ok(RefreshOutcome::Updated { items }) => info!("Value list refreshed: {} items", items),
        Err(e) => error!("Value list refresh failed: {}", e),
    }
}

/// Cached catalog, refreshed first when stale. A failed refresh falls back to the cache.
async fn load_catalog(config: &AppConfig) -> Option<Catalog> {
    let mut list = open_value_list(config)?;
    if let Err(e) = list.refresh(false).await {
        warn!("Refresh failed, using cached values: {}", e);
    }
    if let Some(age) = list.cache_age() {
        info!("Value list age: {} min", age.num_minutes());
    }

    let catalog = list.catalog();
    if catalog.is_empty() {
        error!("No items available, run `trade-lens refresh` first");
        return None;
    }
    info!("Loaded {} items", catalog.len());
    Some(catalog)
}

async fn analyze(config: &AppConfig, your_path: &str, their_path: &str) {
    let (your_text, their_text) = match (fs::read_to_string(your_path), fs::read_to_string(their_path)) {
        (Ok(yours), Ok(theirs)) => (yours, theirs),
        (Err(e), _) | (_, Err(e)) => {
            error!("Failed to read OCR text: {}", e);
            return;
        }
    };

    let Some(catalog) = load_catalog(config).await else {
        return;
    };
    let normalizer = Normalizer::new(config.normalizer.clone());
    let resolver = EntityResolver::new(config.resolver.clone());

    // each side gets its own resolution state; only the catalog is shared
    let (yours, theirs) = std::thread::scope(|scope| {
        let yours = scope.spawn(|| resolver.resolve_text(&normalizer, &catalog, &your_text));
        let theirs = resolver.resolve_text(&normalizer, &catalog, &their_text);
        (yours.join(), theirs)
    });
    let yours = match yours {
        Ok(result) => result,
        Err(_) => {
            error!("Resolving your offer panicked");
            return;
        }
    };
    info!("Found {} items in your offer, {} in theirs", yours.len(), theirs.len());

    if yours.is_empty() && theirs.is_empty() {
        warn!("No items detected");
        return;
    }

    let aggregator = ValueAggregator::new();
    let analysis = aggregator.compare(&yours.records(), &theirs.records());

    println!("{}", render_offer("YOUR OFFER", &yours, &analysis.yours));
    println!("{}", render_offer("THEIR OFFER", &theirs, &analysis.theirs));
    println!("{}", render_trade(&analysis));
}

async fn lookup(config: &AppConfig, name: &str) {
    let Some(catalog) = load_catalog(config).await else {
        return;
    };
    let resolver = EntityResolver::new(config.resolver.clone());

    let found = resolver
        .find_best(&catalog, name)
        .or_else(|| find_by_fragment(&catalog, name).map(|record| (record, 0.0)));

    match found {
        Some((record, score)) => {
            println!(
                "{} | value {} | demand {}/10 | {} | {}",
                record.canonical_name,
                format_thousands(record.primary_value),
                record.demand,
                record.category,
                record.status_text
            );
            if score > 0.0 {
                info!("Similarity {:.2}", score);
            }
        }
        None => println!("'{}' not found in value list", name),
    }
}
