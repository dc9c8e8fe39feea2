use clap::{Parser, Subcommand};
use std::path::PathBuf;

use swan_client::model::{BidMode, Price, TaskType};

#[derive(Parser, Debug)]
#[command(name = "swan")]
#[command(about = "Swan platform client", long_about = None)]
pub struct Cli {
    /// Configuration file (defaults to $SWAN_CONFIG or config/swan.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Exchange the configured credentials for a JWT and print it
    Token,

    /// List tasks
    Tasks {
        #[arg(long)]
        limit: Option<usize>,
    },

    /// List assigned tasks that already have a miner
    AssignedTasks {
        /// Fetch a single page of this size instead of every assigned task
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Show one task
    Task { uuid: String },

    /// Show deals, bids and miner of one task
    TaskDeals { uuid: String },

    /// List a miner's offline deals in a given status
    Deals {
        miner_fid: String,
        #[arg(long)]
        status: String,
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Change the status of an offline deal
    UpdateDeal(UpdateDealArgs),

    /// Create a task from a CSV manifest
    CreateTask(CreateTaskArgs),

    /// Assign a miner to a task
    UpdateTask {
        uuid: String,
        #[arg(long)]
        miner_fid: String,
        #[arg(long)]
        csv: PathBuf,
    },

    /// Change the status of an assigned task
    UpdateAssignedTask {
        uuid: String,
        #[arg(long)]
        status: String,
        /// Task name used to derive the default `<name>-deals.csv` manifest
        #[arg(long, required_unless_present = "csv")]
        task_name: Option<String>,
        #[arg(long)]
        csv: Option<PathBuf>,
    },

    /// Print the effective configuration as TOML (credentials omitted)
    Config,
}

#[derive(clap::Args, Debug)]
pub struct UpdateDealArgs {
    pub deal_id: i64,
    #[arg(long)]
    pub status: String,
    #[arg(long)]
    pub note: Option<String>,
    #[arg(long)]
    pub file_path: Option<String>,
    #[arg(long)]
    pub file_size: Option<u64>,
}

#[derive(clap::Args, Debug)]
pub struct CreateTaskArgs {
    pub task_name: String,
    /// Manifest to upload (defaults to `<task_name>-metadata.csv`)
    #[arg(long)]
    pub csv: Option<PathBuf>,
    #[arg(long, default_value = "")]
    pub curated_dataset: String,
    #[arg(long, default_value = "")]
    pub description: String,
    #[arg(long)]
    pub private: bool,
    #[arg(long)]
    pub verified: bool,
    #[arg(long)]
    pub miner_fid: Option<String>,
    #[arg(long)]
    pub fast_retrieval: bool,
    #[arg(long)]
    pub auto_bid: bool,
    #[arg(long)]
    pub max_price: Price,
    #[arg(long, default_value_t = 4)]
    pub expire_days: u32,
}

impl CreateTaskArgs {
    pub fn task_type(&self) -> TaskType {
        if self.verified {
            TaskType::Verified
        } else {
            TaskType::Regular
        }
    }

    pub fn bid_mode(&self) -> BidMode {
        if self.auto_bid {
            BidMode::Auto
        } else {
            BidMode::Manual
        }
    }
}
