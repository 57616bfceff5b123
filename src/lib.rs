pub mod cache;
pub mod cli;
pub mod config;
pub mod core;
pub mod history;
pub mod providers;
pub mod resolver;
pub mod service;
pub mod stats;
pub mod store;

use crate::config::AppConfig;
use crate::core::cache::Cache;
use crate::core::quote::UfQuote;
use crate::core::source::UfSource;
use crate::core::CurrencyUnit;
use crate::providers::{BancoCentralSource, MindicadorSource, SbifSource};
use crate::service::UfService;
use crate::store::{FjallCache, MemoryCache};
use anyhow::Result;
use chrono::NaiveDate;
use std::sync::Arc;
use tracing::{debug, warn};

pub enum AppCommand {
    Rate {
        date: Option<NaiveDate>,
    },
    Convert {
        amount: f64,
        unit: CurrencyUnit,
        date: Option<NaiveDate>,
    },
    History {
        start: NaiveDate,
        end: NaiveDate,
    },
    Stats,
    CacheClear {
        date: Option<NaiveDate>,
    },
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    let service = build_service(&config);

    match command {
        AppCommand::Rate { date } => cli::rate::run(&service, date).await,
        AppCommand::Convert { amount, unit, date } => {
            cli::convert::run(&service, amount, unit, date).await
        }
        AppCommand::History { start, end } => cli::history::run(&service, start, end).await,
        AppCommand::Stats => cli::stats::run(&service).await,
        AppCommand::CacheClear { date } => {
            let cleared = service.invalidate_cache(date).await;
            match date {
                Some(date) if cleared => println!("Cleared cached UF value for {date}"),
                Some(date) => println!("No cached UF value for {date}"),
                None => println!("Cleared all cached UF values"),
            }
            Ok(())
        }
    }
}

pub fn build_service(config: &AppConfig) -> UfService {
    UfService::new(build_store(config), build_sources(config))
}

fn build_store(config: &AppConfig) -> Arc<dyn Cache<NaiveDate, UfQuote>> {
    if config.cache.persist {
        let store = AppConfig::default_data_path()
            .and_then(|path| FjallCache::new(&path.join("cache"), "uf_quotes"));
        match store {
            Ok(store) => return Arc::new(store),
            Err(e) => warn!("Persistent cache unavailable, using in-memory cache: {e}"),
        }
    }
    Arc::new(MemoryCache::new())
}

/// Sources in resolution priority order.
pub fn build_sources(config: &AppConfig) -> Vec<Arc<dyn UfSource>> {
    let mut sources: Vec<Arc<dyn UfSource>> = Vec::new();
    if let Some(mindicador) = &config.providers.mindicador {
        sources.push(Arc::new(MindicadorSource::new(&mindicador.base_url)));
    }
    if let Some(sbif) = &config.providers.sbif {
        sources.push(Arc::new(SbifSource::new(
            &sbif.base_url,
            config.sbif_api_key(),
        )));
    }
    if let Some(banco_central) = &config.providers.banco_central {
        let (user, password) = config.banco_central_credentials();
        sources.push(Arc::new(BancoCentralSource::new(
            &banco_central.base_url,
            user,
            password,
        )));
    }
    sources
}
