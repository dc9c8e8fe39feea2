mod cli;

use clap::Parser;
use cli::{Cli, Commands};
use serde::Serialize;
use std::sync::Arc;
use tracing_subscriber::{EnvFilter, Registry, fmt, prelude::*, reload};

use swan_client::config::{Config, TelemetryConfig};
use swan_client::model::{DealStatusUpdate, NewTask, files};
use swan_client::observability::TracingObserver;
use swan_client::transport::HttpTransport;
use swan_client::{Credentials, SwanClient, fs};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    let log_filter = init_tracing();
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load_from_path(path.clone())?,
        None => Config::load()?,
    };
    log_filter.reload(filter_for(&config.telemetry))?;

    match cli.command {
        Commands::Config => print!("{}", toml::to_string_pretty(&config)?),
        Commands::Token => {
            let credentials = Credentials::new(
                config.swan.api_key.clone().unwrap_or_default(),
                config.swan.access_token.clone().unwrap_or_default(),
            );
            let client = unauthenticated(&config)?.authenticate(&credentials).await?;
            println!("{}", client.token().unwrap_or_default());
        }
        Commands::Tasks { limit } => {
            let client = SwanClient::from_config(&config).await?;
            print_json(&client.get_tasks(limit).await?.task)?;
        }
        Commands::AssignedTasks { limit } => {
            let client = SwanClient::from_config(&config).await?;
            let tasks = match limit {
                Some(limit) => client.get_assigned_tasks_by_limit(Some(limit)).await?.task,
                None => client.get_assigned_tasks().await?,
            };
            print_json(&tasks)?;
        }
        Commands::Task { uuid } => {
            let client = SwanClient::from_config(&config).await?;
            print_json(&client.get_task_by_uuid(&uuid).await?.task)?;
        }
        Commands::TaskDeals { uuid } => {
            let client = SwanClient::from_config(&config).await?;
            print_json(&client.get_offline_deals_by_task_uuid(&uuid).await?)?;
        }
        Commands::Deals {
            miner_fid,
            status,
            limit,
        } => {
            let client = SwanClient::from_config(&config).await?;
            print_json(&client.get_offline_deals(&miner_fid, &status, limit).await?)?;
        }
        Commands::UpdateDeal(args) => {
            // Report the size of a local file when none was given
            let file_size = match (&args.file_path, args.file_size) {
                (Some(path), None) => fs::file_size(path).await,
                (_, size) => size,
            };
            let update = DealStatusUpdate {
                note: args.note,
                file_path: args.file_path,
                file_size,
            };

            let client = SwanClient::from_config(&config).await?;
            let result = client
                .update_offline_deal_status(args.deal_id, &args.status, &update)
                .await?;
            print_json(&result)?;
        }
        Commands::CreateTask(args) => {
            let task = NewTask::builder()
                .task_name(args.task_name.clone())
                .curated_dataset(args.curated_dataset.clone())
                .description(args.description.clone())
                .is_public(!args.private)
                .task_type(args.task_type())
                .maybe_miner_fid(args.miner_fid.clone())
                .fast_retrieval(args.fast_retrieval)
                .bid_mode(args.bid_mode())
                .max_price(args.max_price)
                .expire_days(args.expire_days)
                .build();
            let csv = args
                .csv
                .unwrap_or_else(|| files::task_csv_name(&args.task_name).into());

            let client = SwanClient::from_config(&config).await?;
            print_json(&client.create_task(&task, &csv).await?)?;
        }
        Commands::UpdateTask {
            uuid,
            miner_fid,
            csv,
        } => {
            let client = SwanClient::from_config(&config).await?;
            print_json(&client.update_task_by_uuid(&uuid, &miner_fid, &csv).await?)?;
        }
        Commands::UpdateAssignedTask {
            uuid,
            status,
            task_name,
            csv,
        } => {
            let csv = match (csv, task_name) {
                (Some(csv), _) => csv,
                (None, Some(name)) => files::deal_csv_name(&name).into(),
                (None, None) => return Err("either --csv or --task-name is required".into()),
            };

            let client = SwanClient::from_config(&config).await?;
            print_json(&client.update_assigned_task(&uuid, &status, &csv).await?)?;
        }
    }

    Ok(())
}

/// Install the subscriber before configuration loads; the returned handle
/// swaps in `telemetry.log_filter` once it is known
fn init_tracing() -> reload::Handle<EnvFilter, Registry> {
    let (filter, handle) = reload::Layer::new(filter_for(&TelemetryConfig::default()));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .init();

    handle
}

fn filter_for(telemetry: &TelemetryConfig) -> EnvFilter {
    EnvFilter::new(filter_directives(
        std::env::var("RUST_LOG").ok(),
        &telemetry.log_filter,
    ))
}

/// `RUST_LOG` wins over `telemetry.log_filter`
fn filter_directives(rust_log: Option<String>, configured: &str) -> String {
    rust_log
        .filter(|directives| !directives.trim().is_empty())
        .unwrap_or_else(|| configured.to_string())
}

fn unauthenticated(config: &Config) -> Result<SwanClient, BoxError> {
    let transport = HttpTransport::with_observer(&config.http, Arc::new(TracingObserver))?;
    Ok(SwanClient::with_transport(&config.swan.api_url, Arc::new(transport))?
        .with_deal_limit(config.deals.default_limit))
}

fn print_json<T: Serialize>(value: &T) -> Result<(), BoxError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
