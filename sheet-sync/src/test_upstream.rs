//! In-process stand-in for the identity provider, Graph and Webflow
//!
//! Bound to an ephemeral localhost port; [`FakeUpstream::config`] points every
//! base URL at it and records each request for assertions.

use std::collections::{HashMap, HashSet};
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::extract::{Form, Path, State};
use axum::http::{HeaderMap, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use serde_json::{Value, json};

use crate::config::{AzureConfig, Config, WebflowConfig, WorkbookConfig};
use crate::transform::Grid;

pub const WORKSHEET: &str = "Sheet1";

#[derive(Debug, Clone, Copy)]
pub enum TokenBehavior {
    Issue,
    Reject,
}

#[derive(Debug, Clone)]
pub struct TokenRequest {
    pub tenant: String,
    pub form: HashMap<String, String>,
}

#[derive(Debug, Clone)]
pub struct ItemPost {
    pub collection: String,
    pub authorization: Option<String>,
    pub accept_version: Option<String>,
    pub body: Value,
}

#[derive(Default)]
struct Recorded {
    token_requests: Vec<TokenRequest>,
    range_auth_headers: Vec<String>,
    item_posts: Vec<ItemPost>,
    created_slugs: Vec<String>,
}

struct UpstreamState {
    token: TokenBehavior,
    grid: Grid,
    /// 1-based create-item calls that get a 400
    failing_posts: HashSet<usize>,
    recorded: Mutex<Recorded>,
}

pub struct FakeUpstream {
    addr: SocketAddr,
    state: Arc<UpstreamState>,
}

/// `[["name","field1","field2"],["Foo","a","b"],["Bar","c","d"]]`
pub fn sample_grid() -> Grid {
    serde_json::from_value(json!([
        ["name", "field1", "field2"],
        ["Foo", "a", "b"],
        ["Bar", "c", "d"]
    ]))
    .unwrap()
}

impl FakeUpstream {
    pub async fn start(token: TokenBehavior, grid: Grid, failing_posts: Vec<usize>) -> Self {
        let state = Arc::new(UpstreamState {
            token,
            grid,
            failing_posts: failing_posts.into_iter().collect(),
            recorded: Mutex::new(Recorded::default()),
        });

        let app = Router::new()
            .route("/{tenant}/oauth2/v2.0/token", post(issue_token))
            .route("/collections/{collection}/items", post(create_item))
            .fallback(used_range)
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { addr, state }
    }

    pub fn config(&self) -> Config {
        let base = format!("http://{}", self.addr);
        let mut config = Self::offline_config();
        config.azure.authority_host = base.clone();
        config.workbook.graph_base_url = format!("{}/v1.0", base);
        config.webflow.base_url = base;
        config
    }

    /// Valid configuration whose endpoints are never contacted
    pub fn offline_config() -> Config {
        Config {
            azure: AzureConfig {
                tenant_id: "tenant-1".to_string(),
                client_id: "client-1".to_string(),
                client_secret: "secret-1".to_string(),
                authority_host: "http://127.0.0.1:1".to_string(),
            },
            workbook: WorkbookConfig {
                file_path: "/Data/items.xlsx".to_string(),
                worksheet_name: WORKSHEET.to_string(),
                drive_owner: None,
                graph_base_url: "http://127.0.0.1:1/v1.0".to_string(),
            },
            webflow: WebflowConfig {
                collection_id: "coll-1".to_string(),
                api_key: "webflow-key".to_string(),
                base_url: "http://127.0.0.1:1".to_string(),
            },
            port: 0,
        }
    }

    pub fn token_requests(&self) -> Vec<TokenRequest> {
        self.state.recorded.lock().unwrap().token_requests.clone()
    }

    pub fn range_auth_headers(&self) -> Vec<String> {
        self.state.recorded.lock().unwrap().range_auth_headers.clone()
    }

    pub fn item_posts(&self) -> Vec<ItemPost> {
        self.state.recorded.lock().unwrap().item_posts.clone()
    }

    /// Slugs of items that were accepted
    pub fn created_slugs(&self) -> Vec<String> {
        self.state.recorded.lock().unwrap().created_slugs.clone()
    }
}

fn header(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

async fn issue_token(
    State(state): State<Arc<UpstreamState>>,
    Path(tenant): Path<String>,
    Form(form): Form<HashMap<String, String>>,
) -> Response {
    state
        .recorded
        .lock()
        .unwrap()
        .token_requests
        .push(TokenRequest { tenant, form });

    match state.token {
        TokenBehavior::Issue => Json(json!({
            "token_type": "Bearer",
            "expires_in": 3599,
            "access_token": "graph-token"
        }))
        .into_response(),
        TokenBehavior::Reject => (
            StatusCode::UNAUTHORIZED,
            Json(json!({
                "error": "invalid_client",
                "error_description": "AADSTS7000215: Invalid client secret provided."
            })),
        )
            .into_response(),
    }
}

async fn used_range(
    State(state): State<Arc<UpstreamState>>,
    headers: HeaderMap,
    uri: Uri,
) -> Response {
    if let Some(auth) = header(&headers, "authorization") {
        state.recorded.lock().unwrap().range_auth_headers.push(auth);
    }

    let expected = format!(
        "/v1.0/me/drive/root:/Data/items.xlsx:/workbook/worksheets/{}/usedRange",
        WORKSHEET
    );
    if uri.path() != expected {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({"error": {"code": "ItemNotFound", "message": "The requested resource doesn't exist."}})),
        )
            .into_response();
    }

    // an empty grid stands for a response that carries no values at all
    if state.grid.is_empty() {
        return Json(json!({"address": format!("{}!A1", WORKSHEET)})).into_response();
    }

    Json(json!({
        "address": format!("{}!A1:C{}", WORKSHEET, state.grid.len()),
        "values": state.grid
    }))
    .into_response()
}

async fn create_item(
    State(state): State<Arc<UpstreamState>>,
    Path(collection): Path<String>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let mut recorded = state.recorded.lock().unwrap();
    recorded.item_posts.push(ItemPost {
        collection,
        authorization: header(&headers, "authorization"),
        accept_version: header(&headers, "accept-version"),
        body: body.clone(),
    });
    let call = recorded.item_posts.len();

    if state.failing_posts.contains(&call) {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"msg": "ValidationError", "code": 400, "problems": ["Field 'field1': invalid"]})),
        )
            .into_response();
    }

    let slug = body["fields"]["slug"].as_str().unwrap_or_default().to_string();
    recorded.created_slugs.push(slug.clone());
    let id = format!("item-{}", recorded.created_slugs.len());
    drop(recorded);

    let mut item = body["fields"].clone();
    item["_id"] = json!(id);
    item["slug"] = json!(slug);
    Json(item).into_response()
}
