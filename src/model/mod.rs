//! Platform data model: tasks, offline deals and the values exchanged with them.

use serde::{Deserialize, Deserializer};

mod deal;
mod price;
mod task;

pub use deal::{DealStatusUpdate, DealUpdate, Miner, OfflineDeal, OfflineDealPage, TaskDeals};
pub use price::{Price, PriceError};
pub use task::{
    BidMode, NewTask, Task, TaskDetail, TaskPage, TaskType, TaskUpload, TASK_STATUS_ASSIGNED,
    TASK_STATUS_DEAL_SENT, TASK_STATUS_PROGRESS_WITH_FAILURE,
};

/// Flag value for `is_public` on public tasks
pub const TASK_IS_PUBLIC: i32 = 1;

/// Rows sometimes carry `null` where a value is expected; read those as the default
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Names of the metadata files generated for the platform
pub mod files {
    pub const CSV_BY_TASK: &str = "-metadata.csv";
    pub const CSV_BY_DEAL: &str = "-deals.csv";

    /// `<task_name>-metadata.csv`
    pub fn task_csv_name(task_name: &str) -> String {
        format!("{}{}", task_name, CSV_BY_TASK)
    }

    /// `<task_name>-deals.csv`
    pub fn deal_csv_name(task_name: &str) -> String {
        format!("{}{}", task_name, CSV_BY_DEAL)
    }
}
