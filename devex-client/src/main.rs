//! devex-dashboard - DevEx metrics overview and initiative creation

use clap::Parser;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use devex_client::{
    cli::{friction_rows, Args, Command},
    DashboardService, HttpTransport,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file if present
    let _ = dotenvy::dotenv();

    let args = Args::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!(
                    "devex_client={level},devex_core={level},info",
                    level = args.log_level
                )
                .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = args.client_config()?;
    info!(backend = %config.base_url, "Using DevEx backend");

    let transport = HttpTransport::new(config.clone())?;
    let service = DashboardService::new(Arc::new(transport)).with_config(config);

    match &args.command {
        Command::Summary => {
            let snapshot = service.load_dashboard().await;
            for issue in &snapshot.issues {
                warn!("{}", issue.message());
            }
            println!("{}", serde_json::to_string_pretty(&snapshot)?);
        }
        Command::Frictions => {
            let catalog = service.load_frictions().await?;
            println!("{}", serde_json::to_string_pretty(&friction_rows(&catalog))?);
        }
        Command::CreateInitiative(create) => {
            let friction = match &create.friction_id {
                Some(id) => {
                    let catalog = service.load_frictions().await?;
                    let selected = catalog.select(id).cloned();
                    if selected.is_none() {
                        warn!(friction_id = %id, "Friction not found, creating unlinked initiative");
                    }
                    selected
                }
                None => None,
            };

            let draft = create.to_draft(friction);
            let receipt = service.create_initiative(&draft).await?;
            println!("{}", serde_json::to_string_pretty(&receipt)?);
        }
    }

    Ok(())
}
