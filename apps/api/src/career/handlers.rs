use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{error, info};

use crate::career::heatmap::SkillDemandTask;
use crate::career::interview::InterviewTask;
use crate::career::job_match::JobMatchTask;
use crate::career::roadmap::RoadmapTask;
use crate::career::simulation::SimulationTask;
use crate::career::trajectory::TrajectoryTask;
use crate::career::twin::CareerTwinTask;
use crate::errors::AppError;
use crate::models::profile::{InterviewPayload, ProfileInput, RoadmapPayload, SimulationPayload};
use crate::models::result::StoredResult;
use crate::orchestrator::{CareerTask, TaskKind};
use crate::state::AppState;
use crate::store::NewResult;

/// A task request body: an optional `userId` next to the task's own fields.
/// With a `userId` the result is persisted and last-request-wins applies.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskRequest<P> {
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(flatten)]
    pub payload: P,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ProfileBody {
    pub profile: ProfileInput,
}

#[derive(Debug, Serialize)]
pub struct TaskResponse {
    pub data: Value,
    /// "model" or "fallback".
    pub source: &'static str,
    pub model: Option<String>,
    /// Stored version, when the result was persisted.
    pub version: Option<i32>,
}

/// Runs `T`, then applies last-request-wins and persistence for identified callers.
async fn respond<T>(
    state: &AppState,
    user_id: Option<String>,
    payload: &T::Payload,
) -> Result<Json<TaskResponse>, AppError>
where
    T: CareerTask,
    T::Payload: Serialize,
{
    let user_id = user_id
        .map(|u| u.trim().to_string())
        .filter(|u| !u.is_empty());
    let ticket = user_id.as_deref().map(|u| state.tracker.begin(u, T::KIND));

    let outcome = state.services.run::<T>(payload).await;
    let data = outcome.data_json();

    let mut version = None;
    if let Some(ticket) = ticket {
        let user_id = ticket.user_id().to_string();
        if !ticket.is_current() {
            info!(user_id = %user_id, task = %T::KIND, "discarding superseded result");
            return Err(AppError::Superseded);
        }

        let payload_json = serde_json::to_value(payload).unwrap_or(Value::Null);
        let saved = state
            .store
            .save(NewResult {
                user_id: &user_id,
                kind: T::KIND,
                payload: &payload_json,
                result: &data,
                source: &outcome.source,
            })
            .await;
        match saved {
            Ok(row) => version = Some(row.version),
            // the caller still gets the result; only the history misses it
            Err(e) => error!(user_id = %user_id, task = %T::KIND, "failed to persist result: {e:#}"),
        }
        // the key stays registered until the row is written
        drop(ticket);
    }

    Ok(Json(TaskResponse {
        data,
        source: outcome.source.label(),
        model: outcome.source.model().map(String::from),
        version,
    }))
}

/// POST /api/v1/career-twin
pub async fn handle_career_twin(
    State(state): State<AppState>,
    Json(req): Json<TaskRequest<ProfileBody>>,
) -> Result<Json<TaskResponse>, AppError> {
    respond::<CareerTwinTask>(&state, req.user_id, &req.payload.profile).await
}

/// POST /api/v1/trajectory
pub async fn handle_trajectory(
    State(state): State<AppState>,
    Json(req): Json<TaskRequest<ProfileBody>>,
) -> Result<Json<TaskResponse>, AppError> {
    respond::<TrajectoryTask>(&state, req.user_id, &req.payload.profile).await
}

/// POST /api/v1/interview/evaluate
pub async fn handle_evaluate_interview(
    State(state): State<AppState>,
    Json(req): Json<TaskRequest<InterviewPayload>>,
) -> Result<Json<TaskResponse>, AppError> {
    if req.payload.answer.trim().is_empty() {
        return Err(AppError::Validation("answer must not be empty".to_string()));
    }
    respond::<InterviewTask>(&state, req.user_id, &req.payload).await
}

/// POST /api/v1/jobs/match
pub async fn handle_match_jobs(
    State(state): State<AppState>,
    Json(req): Json<TaskRequest<ProfileBody>>,
) -> Result<Json<TaskResponse>, AppError> {
    respond::<JobMatchTask>(&state, req.user_id, &req.payload.profile).await
}

/// POST /api/v1/skills/demand
pub async fn handle_skill_demand(
    State(state): State<AppState>,
    Json(req): Json<TaskRequest<ProfileBody>>,
) -> Result<Json<TaskResponse>, AppError> {
    respond::<SkillDemandTask>(&state, req.user_id, &req.payload.profile).await
}

/// POST /api/v1/roadmap
pub async fn handle_roadmap(
    State(state): State<AppState>,
    Json(req): Json<TaskRequest<RoadmapPayload>>,
) -> Result<Json<TaskResponse>, AppError> {
    respond::<RoadmapTask>(&state, req.user_id, &req.payload).await
}

/// POST /api/v1/simulation
pub async fn handle_simulation(
    State(state): State<AppState>,
    Json(req): Json<TaskRequest<SimulationPayload>>,
) -> Result<Json<TaskResponse>, AppError> {
    if req.payload.scenario.trim().is_empty() {
        return Err(AppError::Validation("scenario must not be empty".to_string()));
    }
    respond::<SimulationTask>(&state, req.user_id, &req.payload).await
}

fn parse_kind(kind: &str) -> Result<TaskKind, AppError> {
    kind.parse::<TaskKind>()
        .map_err(|e| AppError::Validation(e.to_string()))
}

/// GET /api/v1/results/:user_id/:kind
pub async fn handle_latest_result(
    State(state): State<AppState>,
    Path((user_id, kind)): Path<(String, String)>,
) -> Result<Json<StoredResult>, AppError> {
    let kind = parse_kind(&kind)?;
    let latest = state.store.latest(&user_id, kind).await?;
    let latest =
        latest.ok_or_else(|| AppError::NotFound(format!("No {kind} result for user {user_id}")))?;
    Ok(Json(latest))
}

/// GET /api/v1/results/:user_id/:kind/history
pub async fn handle_result_history(
    State(state): State<AppState>,
    Path((user_id, kind)): Path<(String, String)>,
) -> Result<Json<Vec<StoredResult>>, AppError> {
    let kind = parse_kind(&kind)?;
    let history = state.store.history(&user_id, kind).await?;
    Ok(Json(history))
}
