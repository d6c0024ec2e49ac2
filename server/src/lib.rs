//! HTTP surface of the task list.
//!
//! # Routes
//! - `GET  /api/auth/google-login`: redirect to Google consent
//! - `GET  /api/auth/google-callback`: finish login, return a bearer token
//! - `GET|POST /api/tasks`: filtered listing / create
//! - `GET|PUT|DELETE /api/tasks/{id}`: single task, owner only
//!
//! Task routes need `Authorization: Bearer <token>`.

pub mod auth;
pub mod config;
pub mod error;
pub mod login;
pub mod oauth;
pub mod tasks;

use std::future::Future;
use std::sync::Arc;

use axum::{routing::get, Router};
use tasklist_core::{InMemoryTaskStore, JwtSettings, TaskService, TokenIssuer};
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::auth::TokenVerifier;
use crate::config::{Config, GoogleSettings};
use crate::oauth::GoogleOAuth;

/// Shared handler state. Cloning is cheap; clones see the same tasks.
#[derive(Clone)]
pub struct AppState {
    pub tasks: TaskService<InMemoryTaskStore>,
    pub issuer: Arc<TokenIssuer>,
    pub verifier: Arc<TokenVerifier>,
    pub google: Option<Arc<GoogleOAuth>>,
}

impl AppState {
    pub fn new(jwt: &JwtSettings, google: Option<GoogleSettings>) -> Self {
        Self {
            tasks: TaskService::new(InMemoryTaskStore::new()),
            issuer: Arc::new(TokenIssuer::new(jwt)),
            verifier: Arc::new(TokenVerifier::new(jwt)),
            google: google.map(|settings| Arc::new(GoogleOAuth::new(settings))),
        }
    }

    pub fn from_config(config: Config) -> Self {
        Self::new(&config.jwt, config.google)
    }
}

pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/auth/google-login", get(login::google_login))
        .route("/api/auth/google-callback", get(login::google_callback))
        .route("/api/tasks", get(tasks::list_tasks).post(tasks::create_task))
        .route(
            "/api/tasks/{id}",
            get(tasks::get_task).put(tasks::update_task).delete(tasks::delete_task),
        )
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Serve `app(state)` on `listener` until `shutdown` resolves.
pub async fn run<F>(listener: TcpListener, state: AppState, shutdown: F) -> Result<(), std::io::Error>
where
    F: Future<Output = ()> + Send + 'static,
{
    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown)
        .await
}
