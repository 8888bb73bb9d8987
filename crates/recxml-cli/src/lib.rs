//! Helios Record XML command line tool.
//!
//! Loads a JSON record store and prints one record, or every record of a type,
//! as XML.

pub mod config;

use std::fs::File;
use std::io::BufReader;

use anyhow::{Context, anyhow};
use helios_recxml::memory::MemoryStore;
use helios_recxml::{Serializable, serialize_many};
use tracing::{debug, info};

pub use config::RenderConfig;

/// Initializes the tracing subscriber. `RUST_LOG` takes precedence over `level`.
pub fn init_logging(level: &str) {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("helios_recxml={level},helios_recxml_cli={level}"))
    });

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

/// Loads the store named by `config` and renders the requested records.
pub fn render(config: &RenderConfig) -> anyhow::Result<String> {
    let file = File::open(&config.data)
        .with_context(|| format!("Failed to open data file {}", config.data.display()))?;
    let store = MemoryStore::from_reader(BufReader::new(file))
        .with_context(|| format!("Failed to load store from {}", config.data.display()))?;
    info!(types = store.types().len(), data = %config.data.display(), "Loaded record store");

    let type_def = store
        .type_def(&config.type_name)
        .ok_or_else(|| anyhow!("Unknown record type: {}", config.type_name))?;
    let options = config.to_options();
    debug!(?options, "Serialization options");

    let xml = match config.id {
        Some(id) => {
            let record = store
                .find(&config.type_name, id)
                .ok_or_else(|| anyhow!("No {} record with id {}", config.type_name, id))?;
            record.to_xml(&options)?
        }
        None => {
            let records = store.all(&config.type_name)?;
            serialize_many(&records, type_def, &options)?
        }
    };
    Ok(xml)
}
