#![allow(dead_code)]

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::Value;
use tower::ServiceExt;

use models::users::UserType;
use server::routes;
use server::ServerState;
use service::auth::AuthConfig;
use service::repo::memory::MemoryStore;
use service::users::domain::User;

pub const SECRET: &str = "router-test-secret-0123";

pub struct TestApp {
    pub app: Router,
    pub store: Arc<MemoryStore>,
    pub state: ServerState,
}

fn cors() -> tower_http::cors::CorsLayer { tower_http::cors::CorsLayer::very_permissive() }

pub fn test_app() -> TestApp {
    let store = Arc::new(MemoryStore::default());
    let state = ServerState::in_memory(store.clone(), AuthConfig::new(SECRET, 1));
    let app = routes::build_router(cors(), state.clone());
    TestApp { app, store, state }
}

impl TestApp {
    /// Seed a user directly in the store and sign a token for it.
    pub fn user(&self, login_id: &str, user_type: UserType) -> (User, String) {
        let user = self.store.seed_user(login_id, user_type);
        let token = self.state.auth.issue_token(&user).expect("issue token");
        (user, token)
    }

    pub async fn call(&self, method: &str, uri: &str, token: Option<&str>, body: Option<Value>) -> anyhow::Result<(StatusCode, Value)> {
        let mut req = Request::builder().method(method).uri(uri);
        if let Some(t) = token {
            req = req.header("authorization", format!("Bearer {t}"));
        }
        let req = match body {
            Some(json) => req.header("content-type", "application/json").body(Body::from(serde_json::to_vec(&json)?))?,
            None => req.body(Body::empty())?,
        };
        let resp = self.app.clone().oneshot(req).await?;
        let status = resp.status();
        let bytes = to_bytes(resp.into_body(), usize::MAX).await?;
        let json = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes).unwrap_or(Value::Null) };
        Ok((status, json))
    }
}
