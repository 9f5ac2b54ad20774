//! Health command - checks every configured source

use std::collections::BTreeMap;
use std::sync::Arc;

use clap::Args;
use tracing::warn;

use crate::domain::retrieval::RetrievalRoute;
use crate::infrastructure::services::Retriever;

/// Arguments for the health command
#[derive(Args, Clone, Debug)]
pub struct HealthArgs {
    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,
}

/// Run the health check; fails when any source is unhealthy
pub async fn run(args: HealthArgs) -> anyhow::Result<()> {
    let config = super::bootstrap()?;

    let registry = Arc::new(crate::build_registry(&config.sources).await?);
    let retriever = Retriever::new(registry, config.retriever.clone());
    let health = retriever.health_check().await;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&health)?);
    } else {
        print!("{}", render(&health));
    }

    let unhealthy = health.values().filter(|healthy| !**healthy).count();
    if unhealthy > 0 {
        warn!(unhealthy = unhealthy, "Some sources are unhealthy");
        anyhow::bail!("{} of {} sources unhealthy", unhealthy, health.len());
    }

    Ok(())
}

fn render(health: &BTreeMap<RetrievalRoute, bool>) -> String {
    if health.is_empty() {
        return "No sources configured\n".to_string();
    }

    health
        .iter()
        .map(|(route, healthy)| {
            let status = if *healthy { "healthy" } else { "unhealthy" };
            format!("{:<22}{}\n", route.as_str(), status)
        })
        .collect()
}
