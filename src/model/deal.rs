use bon::Builder;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use super::null_as_default;
use super::task::Task;

/// A storage deal tracked against a task and a miner
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OfflineDeal {
    #[serde(deserialize_with = "null_as_default")]
    pub id: i64,
    pub task_id: Option<i64>,
    pub user_id: Option<i64>,
    pub miner_id: Option<String>,
    pub deal_cid: Option<String>,
    pub payload_cid: Option<String>,
    pub piece_cid: Option<String>,
    pub file_name: Option<String>,
    pub file_path: Option<String>,
    #[serde(deserialize_with = "string_or_number")]
    pub file_size: Option<String>,
    pub file_source_url: Option<String>,
    pub md5_origin: Option<String>,
    pub start_epoch: Option<i64>,
    pub note: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub status: String,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

/// Sizes arrive as either JSON strings or numbers
fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => None,
        Some(Value::String(value)) => Some(value),
        Some(other) => Some(other.to_string()),
    })
}

/// Storage provider record attached to task lookups
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Miner {
    pub id: Option<i64>,
    #[serde(deserialize_with = "null_as_default")]
    pub miner_id: String,
    pub status: Option<String>,
    pub price: Option<String>,
    pub verified_price: Option<String>,
    pub min_piece_size: Option<String>,
    pub max_piece_size: Option<String>,
}

/// Optional details reported with a deal status change.
///
/// Each field is sent only when present; the form keeps the order
/// `status`, `note`, `file_path`, `file_size`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Builder)]
pub struct DealStatusUpdate {
    #[builder(into)]
    pub note: Option<String>,
    #[builder(into)]
    pub file_path: Option<String>,
    pub file_size: Option<u64>,
}

/// `data` of an offline deal listing
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct OfflineDealPage {
    #[serde(deserialize_with = "null_as_default")]
    pub deal: Vec<OfflineDeal>,
}

/// `data` returned after a deal status update
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct DealUpdate {
    pub deal: Option<OfflineDeal>,
    pub message: Option<String>,
}

/// `data` of `GET /tasks/{uuid}` viewed as a deal summary
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct TaskDeals {
    pub average_bid: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub bid_count: i64,
    pub deal_complete_rate: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub deal: Vec<OfflineDeal>,
    pub miner: Option<Miner>,
    #[serde(deserialize_with = "null_as_default")]
    pub task: Task,
}
