//! In-process stand-in for the PagerDuty v2 REST API listings used by
//! `pd-oncall`: escalation policies, on-calls and users.

use std::net::{Ipv4Addr, SocketAddr};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::{header, HeaderMap};
use axum::routing::{get, IntoMakeService};
use axum::{Json, Router};
use hyper::server::conn::AddrIncoming;
use serde::Deserialize;
use serde_json::{json, Map, Value};
use tokio::sync::Mutex;

pub use axum::http::StatusCode;

const DEFAULT_LIMIT: usize = 25;

#[derive(Debug, Default)]
struct Account {
    escalation_policies: Vec<Value>,
    oncalls: Vec<Value>,
    users: Vec<Value>,
}

pub struct FakePagerDuty {
    token: String,
    account: Mutex<Account>,
    failure: Mutex<Option<StatusCode>>,
    max_limit: Mutex<Option<usize>>,
    always_more: AtomicBool,
    requests: AtomicUsize,
}

impl FakePagerDuty {
    pub async fn add_user(&self, id: &str, name: &str, email: &str) {
        self.account.lock().await.users.push(json!({
            "id": id,
            "type": "user",
            "summary": name,
            "name": name,
            "email": email,
            "time_zone": "Etc/UTC",
        }));
    }

    pub async fn add_escalation_policy(&self, id: &str, name: &str) {
        self.account.lock().await.escalation_policies.push(json!({
            "id": id,
            "type": "escalation_policy",
            "summary": name,
            "name": name,
            "escalation_rules": [],
        }));
    }

    pub async fn add_oncall(&self, policy_id: &str, level: u32, user_id: &str) {
        self.account.lock().await.oncalls.push(json!({
            "escalation_policy": {
                "id": policy_id,
                "type": "escalation_policy_reference",
            },
            "escalation_level": level,
            "user": {
                "id": user_id,
                "type": "user_reference",
            },
            "schedule": null,
            "start": null,
            "end": null,
        }));
    }

    /// Makes every following request fail with `status`, `None` restores
    /// normal answers.
    pub async fn fail_with(&self, status: Option<StatusCode>) {
        *self.failure.lock().await = status;
    }

    /// Serves at most `limit` records per page whatever the client asks
    /// for, the way PagerDuty caps `limit` at 100.
    pub async fn cap_limit(&self, limit: Option<usize>) {
        *self.max_limit.lock().await = limit;
    }

    /// Reports `more: true` on every page, even past the last record.
    pub fn always_more(&self, enabled: bool) {
        self.always_more.store(enabled, Ordering::SeqCst);
    }

    /// Number of listing requests served so far, rejected ones included.
    pub fn requests(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }

    async fn list(
        &self,
        key: &'static str,
        headers: &HeaderMap,
        query: PageQuery,
    ) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
        self.requests.fetch_add(1, Ordering::SeqCst);

        let expected = format!("Token token={}", self.token);
        let authorized = headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .is_some_and(|value| value == expected);

        if !authorized {
            return Err(error_response(StatusCode::UNAUTHORIZED, 2006));
        }

        if let Some(status) = *self.failure.lock().await {
            return Err(error_response(status, 2001));
        }

        let account = self.account.lock().await;
        let items = match key {
            "escalation_policies" => &account.escalation_policies,
            "oncalls" => &account.oncalls,
            _ => &account.users,
        };

        let mut limit = query.limit.unwrap_or(DEFAULT_LIMIT).max(1);
        if let Some(max_limit) = *self.max_limit.lock().await {
            limit = limit.min(max_limit.max(1));
        }
        let offset = query.offset.unwrap_or(0);
        let page: Vec<Value> =
            items.iter().skip(offset).take(limit).cloned().collect();
        let more = self.always_more.load(Ordering::SeqCst)
            || offset + page.len() < items.len();

        tracing::info!(key, offset, limit, more, "listing");

        let mut body = Map::new();
        body.insert(key.to_string(), Value::Array(page));
        body.insert("limit".to_string(), json!(limit));
        body.insert("offset".to_string(), json!(offset));
        body.insert("more".to_string(), json!(more));
        body.insert("total".to_string(), Value::Null);

        Ok(Json(Value::Object(body)))
    }
}

#[derive(Clone, Debug, Deserialize)]
struct PageQuery {
    limit: Option<usize>,
    offset: Option<usize>,
}

fn error_response(status: StatusCode, code: u32) -> (StatusCode, Json<Value>) {
    let message = status.canonical_reason().unwrap_or("Error");

    (
        status,
        Json(json!({ "error": { "message": message, "code": code } })),
    )
}

async fn escalation_policies(
    State(fake): State<Arc<FakePagerDuty>>,
    headers: HeaderMap,
    Query(query): Query<PageQuery>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    fake.list("escalation_policies", &headers, query).await
}

async fn oncalls(
    State(fake): State<Arc<FakePagerDuty>>,
    headers: HeaderMap,
    Query(query): Query<PageQuery>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    fake.list("oncalls", &headers, query).await
}

async fn users(
    State(fake): State<Arc<FakePagerDuty>>,
    headers: HeaderMap,
    Query(query): Query<PageQuery>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    fake.list("users", &headers, query).await
}

pub async fn serve(
    port: u16,
    token: impl ToString,
) -> (
    Arc<FakePagerDuty>,
    axum::Server<AddrIncoming, IntoMakeService<Router>>,
) {
    let state = Arc::new(FakePagerDuty {
        token: token.to_string(),
        account: Mutex::new(Account::default()),
        failure: Mutex::new(None),
        max_limit: Mutex::new(None),
        always_more: AtomicBool::new(false),
        requests: AtomicUsize::new(0),
    });

    let router = Router::new()
        .route("/escalation_policies", get(escalation_policies))
        .route("/oncalls", get(oncalls))
        .route("/users", get(users))
        .with_state(state.clone())
        .layer(tower_http::trace::TraceLayer::new_for_http());

    let host = Ipv4Addr::new(127, 0, 0, 1);
    let socket_addr = SocketAddr::new(host.into(), port);

    let server =
        axum::Server::bind(&socket_addr).serve(router.into_make_service());

    (state, server)
}
