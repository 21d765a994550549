mod api;
mod dashboard;
mod views;

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use anyhow::{Context, Result};
use axum::routing::{delete, get, post, put};
use axum::Router;
use tokio::net::TcpListener;
use tracing::info;

use crate::models::Config;
use crate::session::Session;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) session: Arc<Mutex<Session>>,
    pub(crate) days: u8,
}

impl AppState {
    pub(crate) fn new(config: Config) -> Self {
        let days = config.days;
        Self {
            session: Arc::new(Mutex::new(Session::from_config(config))),
            days,
        }
    }

    /// Every request runs one whole session operation under this lock.
    pub(crate) fn session(&self) -> MutexGuard<'_, Session> {
        self.session.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

pub(crate) fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(dashboard::dashboard_handler))
        .route("/api/slots", get(api::list_slots).post(api::create_slot))
        .route("/api/slots/undo", post(api::undo_remove))
        .route("/api/slots/{id}", delete(api::remove_slot))
        .route("/api/slots/{id}/time", put(api::move_slot))
        .route("/api/slots/{id}/relocate", post(api::relocate_slot))
        .route("/api/slots/{id}/participants", put(api::set_participant))
        .route("/api/slots/{id}/type", put(api::set_match_type))
        .route("/api/conflicts", get(api::list_conflicts))
        .with_state(state)
}

pub async fn serve(config: Config, addr: &str) -> Result<()> {
    let state = AppState::new(config);
    let app = router(state);

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!("Planner listening on http://{}", addr);
    axum::serve(listener, app).await?;
    Ok(())
}
