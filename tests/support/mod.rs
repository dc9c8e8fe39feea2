#![allow(dead_code)]

use axum::{
    Router,
    extract::{FromRequest, Multipart, Request, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use serde_json::{Value, json};
use std::collections::{BTreeMap, HashMap, VecDeque};
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use swan_client::SwanClient;
use swan_client::config::HttpConfig;
use swan_client::observability::{ClientEvent, Observer};
use swan_client::transport::HttpTransport;

pub const MOCK_JWT: &str = "mock-jwt-token";

/// Page size the mock applies when a listing has no `limit`
pub const DEFAULT_PAGE_SIZE: usize = 2;

#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub field: String,
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// Everything the mock saw of one request
#[derive(Debug, Clone, Default)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub query: Option<String>,
    pub content_type: Option<String>,
    pub authorization: Option<String>,
    pub form: Vec<(String, String)>,
    pub json: Option<Value>,
    pub files: Vec<UploadedFile>,
    pub fields: BTreeMap<String, String>,
}

impl RecordedRequest {
    pub fn form_keys(&self) -> Vec<&str> {
        self.form.iter().map(|(key, _)| key.as_str()).collect()
    }

    pub fn query_param(&self, name: &str) -> Option<String> {
        query_param(self.query.as_deref(), name)
    }
}

#[derive(Default)]
pub struct MockState {
    requests: Mutex<Vec<RecordedRequest>>,
    tasks: Mutex<Vec<Value>>,
    deals: Mutex<Vec<Value>>,
    token_replies: Mutex<VecDeque<(StatusCode, String)>>,
    overrides: Mutex<HashMap<String, (StatusCode, String)>>,
}

/// In-process stand-in for the Swan platform
pub struct MockSwan {
    pub url: String,
    pub state: Arc<MockState>,
}

impl MockSwan {
    pub async fn start() -> Self {
        let state = Arc::new(MockState::default());
        let app = Router::new().fallback(handle).with_state(state.clone());

        // Bind to random available port
        let addr = SocketAddr::from(([127, 0, 0, 1], 0));
        let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
        let bound_addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            url: format!("http://{}", bound_addr),
            state,
        }
    }

    /// Session holding the mock's token
    pub fn client(&self) -> SwanClient {
        self.unauthenticated().with_token(MOCK_JWT)
    }

    pub fn client_with(&self, observer: Arc<dyn Observer>) -> SwanClient {
        let transport = HttpTransport::with_observer(&HttpConfig::default(), observer.clone()).unwrap();
        SwanClient::with_transport(&self.url, Arc::new(transport))
            .unwrap()
            .with_observer(observer)
            .with_token(MOCK_JWT)
    }

    pub fn unauthenticated(&self) -> SwanClient {
        let transport = HttpTransport::new(&HttpConfig::default()).unwrap();
        SwanClient::with_transport(&self.url, Arc::new(transport)).unwrap()
    }

    pub fn seed_task(&self, task: Value) {
        self.state.tasks.lock().unwrap().push(task);
    }

    pub fn seed_deal(&self, deal: Value) {
        self.state.deals.lock().unwrap().push(deal);
    }

    /// Queue replies for the token endpoint, used before the default success
    pub fn script_token_replies(&self, replies: Vec<(StatusCode, String)>) {
        self.state.token_replies.lock().unwrap().extend(replies);
    }

    /// Answer every request to `path` with a fixed reply
    pub fn override_path(&self, path: &str, status: StatusCode, body: &str) {
        self.state
            .overrides
            .lock()
            .unwrap()
            .insert(path.to_string(), (status, body.to_string()));
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.requests.lock().unwrap().clone()
    }

    pub fn last_request(&self) -> RecordedRequest {
        self.requests().pop().expect("no request recorded")
    }

    pub fn task(&self, uuid: &str) -> Option<Value> {
        self.state
            .tasks
            .lock()
            .unwrap()
            .iter()
            .find(|task| task["uuid"] == uuid)
            .cloned()
    }
}

pub fn success(data: Value) -> String {
    json!({ "status": "success", "data": data }).to_string()
}

pub fn failure(message: &str) -> String {
    json!({ "status": "fail", "message": message }).to_string()
}

fn query_param(query: Option<&str>, name: &str) -> Option<String> {
    query?.split('&').find_map(|pair| {
        let (key, value) = pair.split_once('=')?;
        (key == name).then(|| urlencoding::decode(value).unwrap().into_owned())
    })
}

fn parse_form(body: &[u8]) -> Vec<(String, String)> {
    let body = String::from_utf8_lossy(body);
    body.split('&')
        .filter(|pair| !pair.is_empty())
        .filter_map(|pair| {
            let (key, value) = pair.split_once('=')?;
            Some((
                urlencoding::decode(key).unwrap().into_owned(),
                urlencoding::decode(value).unwrap().into_owned(),
            ))
        })
        .collect()
}

async fn handle(State(state): State<Arc<MockState>>, request: Request) -> Response {
    let mut recorded = {
        let header_value = |name: header::HeaderName| {
            request
                .headers()
                .get(name)
                .and_then(|value| value.to_str().ok())
                .map(str::to_string)
        };

        RecordedRequest {
            method: request.method().to_string(),
            path: request.uri().path().to_string(),
            query: request.uri().query().map(str::to_string),
            content_type: header_value(header::CONTENT_TYPE),
            authorization: header_value(header::AUTHORIZATION),
            ..Default::default()
        }
    };

    let content_type = recorded.content_type.clone().unwrap_or_default();
    if content_type.starts_with("multipart/form-data") {
        let mut multipart = Multipart::from_request(request, &state).await.unwrap();
        while let Some(field) = multipart.next_field().await.unwrap() {
            let name = field.name().unwrap_or_default().to_string();
            let filename = field.file_name().map(str::to_string);
            match filename {
                Some(filename) => {
                    let bytes = field.bytes().await.unwrap().to_vec();
                    recorded.files.push(UploadedFile {
                        field: name,
                        filename,
                        bytes,
                    });
                }
                None => {
                    let text = field.text().await.unwrap();
                    recorded.fields.insert(name, text);
                }
            }
        }
    } else {
        let body = axum::body::to_bytes(request.into_body(), usize::MAX)
            .await
            .unwrap();
        if content_type.starts_with("application/x-www-form-urlencoded") {
            recorded.form = parse_form(&body);
        } else if !body.is_empty() {
            recorded.json = serde_json::from_slice(&body).ok();
        }
    }

    state.requests.lock().unwrap().push(recorded.clone());
    let (status, body) = state.respond(&recorded);
    (status, body).into_response()
}

impl MockState {
    fn respond(&self, request: &RecordedRequest) -> (StatusCode, String) {
        if let Some(reply) = self.overrides.lock().unwrap().get(&request.path).cloned() {
            return reply;
        }

        let segments: Vec<&str> = request.path.trim_start_matches('/').split('/').collect();
        match (request.method.as_str(), segments.as_slice()) {
            ("POST", ["user", "api_keys", "jwt"]) => self
                .token_replies
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| (StatusCode::OK, success(json!({ "jwt": MOCK_JWT })))),
            ("GET", ["tasks"]) => self.list_tasks(request),
            ("POST", ["tasks"]) => self.create_task(request),
            ("GET", ["tasks", uuid]) => self.task_detail(uuid),
            ("PUT", ["tasks", uuid]) => self.update_task(uuid, "status", "status", request),
            ("PUT", ["uuid_tasks", uuid]) => {
                self.update_task(uuid, "miner_fid", "miner_id", request)
            }
            ("GET", ["offline_deals", miner]) => self.list_deals(miner, request),
            ("PUT", ["my_miner", "deals", id]) => self.update_deal(id, request),
            _ => (StatusCode::NOT_FOUND, "404 page not found".to_string()),
        }
    }

    fn list_tasks(&self, request: &RecordedRequest) -> (StatusCode, String) {
        let status = request.query_param("status");
        let limit = request
            .query_param("limit")
            .and_then(|limit| limit.parse::<usize>().ok())
            .unwrap_or(DEFAULT_PAGE_SIZE);

        let tasks = self.tasks.lock().unwrap();
        let matching: Vec<&Value> = tasks
            .iter()
            .filter(|task| status.as_deref().is_none_or(|status| task["status"] == status))
            .collect();
        let page: Vec<&Value> = matching.iter().take(limit).copied().collect();

        let data = json!({
            "task": page,
            "total_items": page.len(),
            "total_task_count": matching.len(),
        });
        (StatusCode::OK, success(data))
    }

    fn create_task(&self, request: &RecordedRequest) -> (StatusCode, String) {
        let Some(file) = request.files.first() else {
            return (StatusCode::OK, failure("file is required"));
        };

        let field = |name: &str| request.fields.get(name).cloned().unwrap_or_default();
        let number = |name: &str| field(name).parse::<i64>().unwrap_or_default();
        let uuid = uuid::Uuid::new_v4().to_string();

        let mut task = json!({
            "id": self.tasks.lock().unwrap().len() + 1,
            "uuid": uuid,
            "task_name": field("task_name"),
            "curated_dataset": field("curated_dataset"),
            "description": field("description"),
            "is_public": number("is_public"),
            "type": field("type"),
            "fast_retrieval": if field("fast_retrieval") == "true" { 1 } else { 0 },
            "bid_mode": number("bid_mode"),
            "max_price": field("max_price"),
            "expire_days": number("expire_days"),
            "status": "Created",
        });
        if let Some(miner) = request.fields.get("miner_id") {
            task["miner_id"] = json!(miner);
        }
        self.tasks.lock().unwrap().push(task);

        let data = json!({ "filename": file.filename, "uuid": uuid });
        (StatusCode::OK, success(data))
    }

    fn task_detail(&self, uuid: &str) -> (StatusCode, String) {
        let tasks = self.tasks.lock().unwrap();
        let Some(task) = tasks.iter().find(|task| task["uuid"] == uuid) else {
            return (StatusCode::OK, failure("task not found"));
        };

        let deals: Vec<Value> = self
            .deals
            .lock()
            .unwrap()
            .iter()
            .filter(|deal| deal["task_id"] == task["id"])
            .cloned()
            .collect();

        let data = json!({
            "task": task,
            "total_items": 1,
            "total_task_count": 1,
            "average_bid": "0",
            "bid_count": 0,
            "deal_complete_rate": "0",
            "deal": deals,
        });
        (StatusCode::OK, success(data))
    }

    fn update_task(
        &self,
        uuid: &str,
        field: &str,
        column: &str,
        request: &RecordedRequest,
    ) -> (StatusCode, String) {
        let Some(file) = request.files.first() else {
            return (StatusCode::OK, failure("file is required"));
        };
        let Some(value) = request.fields.get(field) else {
            return (StatusCode::OK, failure("missing field"));
        };

        let mut tasks = self.tasks.lock().unwrap();
        let Some(task) = tasks.iter_mut().find(|task| task["uuid"] == uuid) else {
            return (StatusCode::OK, failure("task not found"));
        };
        task[column] = json!(value);

        let data = json!({ "filename": file.filename, "uuid": uuid });
        (StatusCode::OK, success(data))
    }

    fn list_deals(&self, miner: &str, request: &RecordedRequest) -> (StatusCode, String) {
        let status = request.query_param("deal_status");
        let limit = request
            .query_param("limit")
            .and_then(|limit| limit.parse::<usize>().ok())
            .unwrap_or(DEFAULT_PAGE_SIZE);

        let deals: Vec<Value> = self
            .deals
            .lock()
            .unwrap()
            .iter()
            .filter(|deal| deal["miner_id"] == miner)
            .filter(|deal| status.as_deref().is_none_or(|status| deal["status"] == status))
            .take(limit)
            .cloned()
            .collect();

        (StatusCode::OK, success(json!({ "deal": deals })))
    }

    fn update_deal(&self, id: &str, request: &RecordedRequest) -> (StatusCode, String) {
        let Ok(id) = id.parse::<i64>() else {
            return (StatusCode::OK, failure("invalid deal id"));
        };
        let status = request
            .form
            .iter()
            .find(|(key, _)| key == "status")
            .map(|(_, value)| value.clone())
            .unwrap_or_default();

        let data = json!({
            "deal": { "id": id, "status": status },
            "message": "deal updated",
        });
        (StatusCode::OK, success(data))
    }
}

/// Keeps a readable trace of every event for assertions
#[derive(Default)]
pub struct RecordingObserver {
    events: Mutex<Vec<String>>,
}

impl RecordingObserver {
    pub fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }

    pub fn failed_operations(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|event| event.strip_prefix("failed:").map(str::to_string))
            .collect()
    }
}

impl Observer for RecordingObserver {
    fn record(&self, event: &ClientEvent<'_>) {
        let line = match event {
            ClientEvent::RequestSent { method, .. } => format!("sent:{}", method),
            ClientEvent::RequestRejected { status, .. } => format!("rejected:{}", status),
            ClientEvent::OperationFailed { operation, .. } => format!("failed:{}", operation),
            ClientEvent::AuthAttemptFailed { attempt, .. } => format!("auth_failed:{}", attempt),
            ClientEvent::TokenAcquired { attempts } => format!("token:{}", attempts),
            ClientEvent::ConfigHint { hint } => format!("hint:{}", hint),
            ClientEvent::FileUploaded { filename, .. } => format!("uploaded:{}", filename),
        };
        self.events.lock().unwrap().push(line);
    }
}
