//! Server command implementation

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use tandem_core::{JsonFileGoalSource, PortfolioService};

use super::load_engine;

pub async fn cmd_serve(
    config_path: Option<&Path>,
    goals_path: &Path,
    host: &str,
    port: u16,
    allowed_origins: Vec<String>,
) -> Result<()> {
    let engine = load_engine(config_path, None)?;

    println!("🚀 Starting Tandem web server...");
    println!("   Goals: {}", goals_path.display());
    println!("   Listening: http://{}:{}", host, port);
    println!(
        "   Funding model: {}",
        engine.config().conflicts.funding_model
    );
    if allowed_origins.is_empty() {
        println!("   CORS: same-origin only");
    } else {
        println!("   CORS: {}", allowed_origins.join(", "));
    }
    println!();
    println!("   ⚠️  No authentication - bind to a trusted interface only");
    println!("   Press Ctrl+C to stop");

    let source = Arc::new(JsonFileGoalSource::new(goals_path));
    let service = PortfolioService::new(source, engine);

    // Fail fast on an unreadable goals document
    service
        .refresh()
        .await
        .with_context(|| format!("Failed to load goals from {}", goals_path.display()))?;

    let config = tandem_server::ServerConfig { allowed_origins };
    tandem_server::serve(service, host, port, config).await?;

    Ok(())
}
