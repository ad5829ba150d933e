use std::sync::{Arc, Mutex, MutexGuard};

use axum::routing::get;
use axum::{Json, Router};
use rusqlite::Connection;
use serde_json::{json, Value};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::api::auth::JwtKeys;
use crate::api::{response, tasks};
use crate::error::TaskError;

#[derive(Clone)]
pub struct AppState {
    db: Arc<Mutex<Connection>>,
    pub jwt: Arc<JwtKeys>,
}

impl AppState {
    pub fn new(conn: Connection, jwt_secret: &[u8]) -> Self {
        Self {
            db: Arc::new(Mutex::new(conn)),
            jwt: Arc::new(JwtKeys::new(jwt_secret)),
        }
    }

    /// Handlers hold the guard only for the duration of their synchronous
    /// store calls, never across an await point.
    pub(crate) fn conn(&self) -> Result<MutexGuard<'_, Connection>, TaskError> {
        self.db
            .lock()
            .map_err(|_| TaskError::database("task store lock poisoned"))
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route(
            "/tasks",
            get(tasks::list_tasks).post(tasks::create_task),
        )
        .route(
            "/tasks/:id",
            get(tasks::get_task)
                .put(tasks::update_task)
                .delete(tasks::delete_task),
        )
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn health() -> Json<Value> {
    Json(response::success(json!({ "status": "ok" })))
}
