use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use serde_json::json;
use tracing::warn;

use super::AppState;
use crate::clock::SlotTime;
use crate::conflicts::Conflict;
use crate::error::ScheduleError;
use crate::models::{Day, GameSlot, MatchType, PlayerId, Side, SlotId, Sport};

pub(crate) enum ApiError {
    Schedule(ScheduleError),
    BadRequest(String),
}

impl From<ScheduleError> for ApiError {
    fn from(e: ScheduleError) -> Self {
        ApiError::Schedule(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Schedule(e) => {
                let status = match &e {
                    ScheduleError::UnknownSlot(_) => StatusCode::NOT_FOUND,
                    e if e.is_invalid_input() => StatusCode::BAD_REQUEST,
                    _ => StatusCode::CONFLICT,
                };
                (status, e.to_string())
            }
        };
        warn!("API request failed ({}): {}", status, message);
        (status, Json(json!({"success": false, "error": message}))).into_response()
    }
}

type ApiResult<T> = Result<Json<T>, ApiError>;

#[derive(Debug, Deserialize)]
pub(crate) struct CreateSlot {
    day: u8,
    ground: u32,
    sport: Sport,
    /// Place right after the last slot instead of the first free gap
    #[serde(default)]
    append: bool,
}

#[derive(Debug, Deserialize)]
pub(crate) struct MoveSlot {
    start: SlotTime,
    end: SlotTime,
    ground: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RelocateSlot {
    start: SlotTime,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SetParticipant {
    side: Side,
    index: Option<usize>,
    value: Option<PlayerId>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SetMatchType {
    #[serde(rename = "type")]
    match_type: MatchType,
}

pub(crate) async fn list_slots(State(state): State<AppState>) -> Json<Vec<GameSlot>> {
    Json(state.session().snapshot().to_vec())
}

pub(crate) async fn list_conflicts(State(state): State<AppState>) -> Json<Vec<Conflict>> {
    Json(state.session().conflicts())
}

pub(crate) async fn create_slot(
    State(state): State<AppState>,
    Json(req): Json<CreateSlot>,
) -> ApiResult<GameSlot> {
    if req.day == 0 || req.day > state.days {
        return Err(ApiError::BadRequest(format!(
            "Day {} is outside 1..={}",
            req.day, state.days
        )));
    }
    if req.ground == 0 {
        return Err(ApiError::BadRequest("Grounds are counted from 1".into()));
    }

    let mut session = state.session();
    let id = if req.append {
        session.append_slot(Day(req.day), req.ground, req.sport)?
    } else {
        session.add_slot(Day(req.day), req.ground, req.sport)?
    };
    Ok(Json(session.slot(id)?.clone()))
}

pub(crate) async fn remove_slot(
    State(state): State<AppState>,
    Path(id): Path<SlotId>,
) -> ApiResult<GameSlot> {
    let removed = state.session().remove_slot(id)?;
    Ok(Json(removed))
}

pub(crate) async fn undo_remove(State(state): State<AppState>) -> ApiResult<GameSlot> {
    let mut session = state.session();
    let id = session.undo_remove()?;
    Ok(Json(session.slot(id)?.clone()))
}

pub(crate) async fn move_slot(
    State(state): State<AppState>,
    Path(id): Path<SlotId>,
    Json(req): Json<MoveSlot>,
) -> ApiResult<GameSlot> {
    if req.ground == Some(0) {
        return Err(ApiError::BadRequest("Grounds are counted from 1".into()));
    }
    let mut session = state.session();
    match req.ground {
        Some(ground) => session.move_slot(id, req.start, req.end, Some(ground))?,
        None => session.resize_slot(id, req.start, req.end)?,
    }
    Ok(Json(session.slot(id)?.clone()))
}

pub(crate) async fn relocate_slot(
    State(state): State<AppState>,
    Path(id): Path<SlotId>,
    Json(req): Json<RelocateSlot>,
) -> ApiResult<GameSlot> {
    let mut session = state.session();
    session.relocate_slot(id, req.start)?;
    Ok(Json(session.slot(id)?.clone()))
}

pub(crate) async fn set_participant(
    State(state): State<AppState>,
    Path(id): Path<SlotId>,
    Json(req): Json<SetParticipant>,
) -> ApiResult<GameSlot> {
    let mut session = state.session();
    session.set_participant(id, req.side, req.index, req.value)?;
    Ok(Json(session.slot(id)?.clone()))
}

pub(crate) async fn set_match_type(
    State(state): State<AppState>,
    Path(id): Path<SlotId>,
    Json(req): Json<SetMatchType>,
) -> ApiResult<GameSlot> {
    let mut session = state.session();
    session.set_match_type(id, req.match_type)?;
    Ok(Json(session.slot(id)?.clone()))
}
