//! Command implementations for the squirrel binary.

use std::io::Write;

use anyhow::{Context, Result};

use squirrel_client::{ClientConfig, HttpClient};
use squirrel_core::{ActivateReport, AppConfig, CacheAgent, CacheDb, FetchDecision, Request, Store};

async fn agent_from_config() -> Result<CacheAgent<CacheDb, HttpClient>> {
    let config = AppConfig::load().context("loading configuration")?;
    let store = CacheDb::open(&config.db_path)
        .await
        .with_context(|| format!("opening cache database at {}", config.db_path.display()))?;
    let client = HttpClient::new(ClientConfig {
        user_agent: config.user_agent.clone(),
        max_bytes: config.max_bytes,
        timeout: config.timeout(),
        ..ClientConfig::default()
    })?;
    let origin = config.origin_url().context("invalid origin")?;

    Ok(CacheAgent::new(store, client, config.generation(), origin, config.manifest.clone()))
}

pub async fn install() -> Result<()> {
    let agent = agent_from_config().await?;

    let report = agent.on_install().await?;
    println!(
        "installed {}: {} cached, {} failed",
        report.generation,
        report.cached.len(),
        report.failed.len()
    );
    for (entry, err) in &report.failed {
        println!("  failed {entry}: {err}");
    }

    // Skip waiting: a freshly installed version activates immediately.
    let pruned = agent.on_activate().await?;
    print_activate(&pruned);

    Ok(())
}

pub async fn activate() -> Result<()> {
    let agent = agent_from_config().await?;
    let report = agent.on_activate().await?;
    print_activate(&report);
    Ok(())
}

fn print_activate(report: &ActivateReport) {
    println!("active generation: {}", report.kept);
    for name in &report.deleted {
        println!("  deleted {name}");
    }
    for (name, err) in &report.failed {
        println!("  left behind {name}: {err}");
    }
}

pub async fn get(url: &str) -> Result<()> {
    let agent = agent_from_config().await?;

    match agent.on_fetch(&Request::get(url)).await {
        FetchDecision::Respond(response) => {
            eprintln!("{} {}", response.status, response.status_text);
            std::io::stdout().write_all(&response.body)?;
        }
        FetchDecision::Passthrough => {
            eprintln!("request not intercepted");
        }
    }

    agent.drain_writes().await;
    Ok(())
}

pub async fn generations() -> Result<()> {
    let config = AppConfig::load().context("loading configuration")?;
    let store = CacheDb::open(&config.db_path)
        .await
        .with_context(|| format!("opening cache database at {}", config.db_path.display()))?;

    for name in store.generations().await? {
        let count = store.entry_count(&name).await?;
        let marker = if name == config.generation() { " (current)" } else { "" };
        println!("{name}\t{count} entries{marker}");
    }

    Ok(())
}
