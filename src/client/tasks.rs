use std::collections::BTreeMap;
use std::path::Path;

use super::{SwanClient, require};
use crate::error::{Result, SwanError};
use crate::model::{NewTask, TASK_STATUS_ASSIGNED, Task, TaskDetail, TaskPage, TaskUpload};
use crate::observability::ClientEvent;
use crate::transport::{MultipartUpload, RequestBody, TransportRequest};

impl SwanClient {
    /// Register a task and upload its CSV manifest
    pub async fn create_task(&self, task: &NewTask, csv_path: &Path) -> Result<TaskUpload> {
        self.observed("create_task", async {
            require(&task.task_name, "task name")?;

            let url = self.endpoint("/tasks");
            let upload = self
                .upload(TransportRequest::post(url), csv_path, task.to_fields())
                .await?;

            if upload.uuid.trim().is_empty() {
                return Err(SwanError::MissingField("data.uuid".to_string()));
            }
            Ok(upload)
        })
        .await
    }

    pub async fn get_task_by_uuid(&self, task_uuid: &str) -> Result<TaskDetail> {
        self.observed("get_task_by_uuid", async {
            require(task_uuid, "task uuid")?;

            let url = self.endpoint(&format!("/tasks/{}", urlencoding::encode(task_uuid)));
            self.list(url).await
        })
        .await
    }

    pub async fn get_tasks(&self, limit: Option<usize>) -> Result<TaskPage> {
        self.observed("get_tasks", async {
            let url = match limit {
                Some(limit) => self.endpoint(&format!("/tasks?limit={}", limit)),
                None => self.endpoint("/tasks"),
            };
            self.list(url).await
        })
        .await
    }

    /// One page of tasks in status `Assigned`
    pub async fn get_assigned_tasks_by_limit(&self, limit: Option<usize>) -> Result<TaskPage> {
        self.observed("get_assigned_tasks_by_limit", async {
            let mut path = format!("/tasks?status={}", TASK_STATUS_ASSIGNED);
            if let Some(limit) = limit {
                path.push_str(&format!("&limit={}", limit));
            }
            self.list(self.endpoint(&path)).await
        })
        .await
    }

    /// Every assigned task that already has a miner, in platform order.
    ///
    /// The first call only discovers `total_task_count`; the second fetches
    /// that many. Tasks created between the two calls may be missed.
    pub async fn get_assigned_tasks(&self) -> Result<Vec<Task>> {
        let first = self.get_assigned_tasks_by_limit(None).await?;
        if first.task.is_empty() {
            return Ok(Vec::new());
        }

        let page = self
            .get_assigned_tasks_by_limit(Some(first.total_task_count))
            .await?;

        Ok(page.task.into_iter().filter(Task::is_assigned).collect())
    }

    /// Assign a miner to a task, re-uploading its manifest
    pub async fn update_task_by_uuid(
        &self,
        task_uuid: &str,
        miner_fid: &str,
        csv_path: &Path,
    ) -> Result<TaskUpload> {
        self.observed("update_task_by_uuid", async {
            require(task_uuid, "task uuid")?;
            require(miner_fid, "miner fid")?;

            let url = self.endpoint(&format!("/uuid_tasks/{}", urlencoding::encode(task_uuid)));
            let fields = BTreeMap::from([("miner_fid".to_string(), miner_fid.to_string())]);
            self.upload(TransportRequest::put(url), csv_path, fields)
                .await
        })
        .await
    }

    /// Move an assigned task to `status`, re-uploading its manifest
    pub async fn update_assigned_task(
        &self,
        task_uuid: &str,
        status: &str,
        csv_path: &Path,
    ) -> Result<TaskUpload> {
        self.observed("update_assigned_task", async {
            require(task_uuid, "task uuid")?;
            require(status, "task status")?;

            let url = self.endpoint(&format!("/tasks/{}", urlencoding::encode(task_uuid)));
            let fields = BTreeMap::from([("status".to_string(), status.to_string())]);
            self.upload(TransportRequest::put(url), csv_path, fields)
                .await
        })
        .await
    }

    /// GET a task listing; no body at all reads as "no tasks", not zero tasks
    async fn list<T: serde::de::DeserializeOwned>(&self, url: String) -> Result<T> {
        let request = self.authorized(TransportRequest::get(url));
        match self.call(request).await {
            Err(SwanError::EmptyResponse { url }) => Err(SwanError::NoTasks { url }),
            other => other,
        }
    }

    async fn upload(
        &self,
        request: TransportRequest,
        csv_path: &Path,
        fields: BTreeMap<String, String>,
    ) -> Result<TaskUpload> {
        let url = request.url.clone();
        let body = RequestBody::Multipart(MultipartUpload::new(csv_path, fields));

        let upload: TaskUpload = self.call(self.authorized(request.with_body(body))).await?;
        self.observer().record(&ClientEvent::FileUploaded {
            url: &url,
            filename: &upload.filename,
        });

        Ok(upload)
    }
}
