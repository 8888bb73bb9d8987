//! Helios Record XML (recxml)
//!
//! Prints stored records and their associations as XML.

use clap::Parser;
use helios_recxml_cli::{RenderConfig, init_logging, render};
use tracing::info;

fn main() -> anyhow::Result<()> {
    let config = RenderConfig::parse();
    init_logging(&config.log_level);

    if let Err(errors) = config.validate() {
        for error in &errors {
            eprintln!("Configuration error: {}", error);
        }
        std::process::exit(1);
    }

    info!(
        type_name = %config.type_name,
        id = ?config.id,
        includes = config.include.len(),
        "Rendering records"
    );

    let xml = render(&config)?;
    println!("{}", xml);
    Ok(())
}
