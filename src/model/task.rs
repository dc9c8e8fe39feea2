use bon::Builder;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::price::Price;
use super::{TASK_IS_PUBLIC, null_as_default};

pub const TASK_STATUS_ASSIGNED: &str = "Assigned";
pub const TASK_STATUS_DEAL_SENT: &str = "DealSent";
pub const TASK_STATUS_PROGRESS_WITH_FAILURE: &str = "ProgressWithFailure";

/// Verified tasks are eligible for datacap; regular ones are not
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskType {
    Verified,
    Regular,
}

impl TaskType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskType::Verified => "verified",
            TaskType::Regular => "regular",
        }
    }
}

/// How miners are matched to a task
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BidMode {
    Manual,
    Auto,
}

impl BidMode {
    pub fn code(&self) -> u8 {
        match self {
            BidMode::Manual => 0,
            BidMode::Auto => 1,
        }
    }
}

/// A task as reported by the platform
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Task {
    pub id: Option<i64>,
    #[serde(deserialize_with = "null_as_default")]
    pub uuid: String,
    #[serde(deserialize_with = "null_as_default")]
    pub task_name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub curated_dataset: String,
    #[serde(deserialize_with = "null_as_default")]
    pub description: String,
    pub is_public: Option<i32>,
    pub tags: Option<String>,
    #[serde(rename = "type")]
    pub task_type: Option<String>,
    #[serde(rename = "miner_id")]
    pub miner_fid: Option<String>,
    pub fast_retrieval: Option<i32>,
    pub bid_mode: Option<i32>,
    pub min_price: Option<Price>,
    pub max_price: Option<Price>,
    pub expire_days: Option<i32>,
    pub source_id: Option<i32>,
    pub duration: Option<i64>,
    pub created_on: Option<String>,
    pub updated_on: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub status: String,
}

impl Task {
    /// Assigned to a miner and waiting for deals to be sent
    pub fn is_assigned(&self) -> bool {
        self.status == TASK_STATUS_ASSIGNED && self.miner_fid.is_some()
    }
}

/// Scalar fields sent alongside the manifest when creating a task
#[derive(Debug, Clone, Builder)]
pub struct NewTask {
    #[builder(into)]
    pub task_name: String,
    #[builder(into, default)]
    pub curated_dataset: String,
    #[builder(into, default)]
    pub description: String,
    #[builder(default = true)]
    pub is_public: bool,
    pub task_type: TaskType,
    #[builder(into)]
    pub miner_fid: Option<String>,
    #[builder(default)]
    pub fast_retrieval: bool,
    pub bid_mode: BidMode,
    pub max_price: Price,
    pub expire_days: u32,
}

impl NewTask {
    /// Multipart form fields for `POST /tasks`
    pub fn to_fields(&self) -> BTreeMap<String, String> {
        let mut fields = BTreeMap::new();
        fields.insert("task_name".to_string(), self.task_name.clone());
        fields.insert("curated_dataset".to_string(), self.curated_dataset.clone());
        fields.insert("description".to_string(), self.description.clone());
        fields.insert(
            "is_public".to_string(),
            if self.is_public { TASK_IS_PUBLIC } else { 0 }.to_string(),
        );
        fields.insert("type".to_string(), self.task_type.as_str().to_string());
        if let Some(miner_fid) = &self.miner_fid {
            fields.insert("miner_id".to_string(), miner_fid.clone());
        }
        fields.insert("fast_retrieval".to_string(), self.fast_retrieval.to_string());
        fields.insert("bid_mode".to_string(), self.bid_mode.code().to_string());
        fields.insert("max_price".to_string(), self.max_price.to_string());
        fields.insert("expire_days".to_string(), self.expire_days.to_string());
        fields
    }
}

/// `data` of a task listing
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TaskPage {
    #[serde(deserialize_with = "null_as_default")]
    pub task: Vec<Task>,
    #[serde(deserialize_with = "null_as_default")]
    pub total_items: usize,
    #[serde(deserialize_with = "null_as_default")]
    pub total_task_count: usize,
}

/// `data` of a single-task lookup
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TaskDetail {
    #[serde(deserialize_with = "null_as_default")]
    pub task: Task,
    #[serde(deserialize_with = "null_as_default")]
    pub total_items: usize,
    #[serde(deserialize_with = "null_as_default")]
    pub total_task_count: usize,
}

/// `data` returned after a manifest upload is accepted
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct TaskUpload {
    #[serde(deserialize_with = "null_as_default")]
    pub filename: String,
    #[serde(deserialize_with = "null_as_default")]
    pub uuid: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_new_task() -> NewTask {
        NewTask::builder()
            .task_name("dataset-01")
            .curated_dataset("climate")
            .description("daily snapshots")
            .task_type(TaskType::Verified)
            .bid_mode(BidMode::Auto)
            .max_price("0.00005".parse().unwrap())
            .expire_days(4)
            .build()
    }

    #[test]
    fn test_new_task_fields() {
        let fields = sample_new_task().to_fields();

        assert_eq!(fields["task_name"], "dataset-01");
        assert_eq!(fields["is_public"], "1");
        assert_eq!(fields["type"], "verified");
        assert_eq!(fields["fast_retrieval"], "false");
        assert_eq!(fields["bid_mode"], "1");
        assert_eq!(fields["max_price"], "0.00005");
        assert_eq!(fields["expire_days"], "4");
        assert!(!fields.contains_key("miner_id"));
        assert_eq!(fields.len(), 9);
    }

    #[test]
    fn test_new_task_with_miner() {
        let task = NewTask::builder()
            .task_name("dataset-02")
            .task_type(TaskType::Regular)
            .miner_fid("f01234")
            .fast_retrieval(true)
            .is_public(false)
            .bid_mode(BidMode::Manual)
            .max_price(Price::ZERO)
            .expire_days(1)
            .build();

        let fields = task.to_fields();
        assert_eq!(fields["miner_id"], "f01234");
        assert_eq!(fields["is_public"], "0");
        assert_eq!(fields["bid_mode"], "0");
        assert_eq!(fields["fast_retrieval"], "true");
        assert_eq!(fields["max_price"], "0");
    }

    #[test]
    fn test_task_deserializes_platform_payload() {
        let json = r#"{
            "id": 12,
            "uuid": "5f0e6d1c-8d6b-4a51-9b89-3f4d2f0c6c11",
            "task_name": "dataset-01",
            "type": "verified",
            "miner_id": "f01234",
            "max_price": "0.0005",
            "status": "Assigned",
            "unknown_field": true
        }"#;

        let task: Task = serde_json::from_str(json).unwrap();
        assert_eq!(task.id, Some(12));
        assert_eq!(task.miner_fid.as_deref(), Some("f01234"));
        assert_eq!(task.max_price.unwrap().to_string(), "0.0005");
        assert!(task.is_assigned());
    }

    #[test]
    fn test_task_null_strings_read_as_empty() {
        let json = r#"{
            "uuid": "a",
            "task_name": null,
            "curated_dataset": null,
            "description": null,
            "status": "Created"
        }"#;

        let task: Task = serde_json::from_str(json).unwrap();
        assert_eq!(task.uuid, "a");
        assert_eq!(task.description, "");
        assert_eq!(task.curated_dataset, "");

        let page: TaskPage =
            serde_json::from_str(r#"{"task": null, "total_task_count": null}"#).unwrap();
        assert!(page.task.is_empty());
        assert_eq!(page.total_task_count, 0);
    }

    #[test]
    fn test_assigned_requires_miner() {
        let task = Task {
            status: TASK_STATUS_ASSIGNED.to_string(),
            ..Task::default()
        };
        assert!(!task.is_assigned());
    }
}
