//! Config command - prints the configuration the proxy would start with

use crate::config::AppConfig;

pub fn run() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load()?;
    println!("{}", serde_json::to_string_pretty(&config.redacted())?);

    Ok(())
}
