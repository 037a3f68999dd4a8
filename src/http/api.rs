//! API routes and handlers
//!
//! JSON CRUD over the store, match recording through the recorder, and
//! standings queries. Domain errors map onto HTTP status codes here.

use crate::error::LadderError;
use crate::http::health;
use crate::ladder::recorder::NewMatch;
use crate::ladder::standings::{standings, StandingsRow};
use crate::service::AppState;
use crate::types::{
    Enrolment, EnrolmentId, EntityKind, Ladder, LadderId, Match, MatchId, MatchOutcome, Player,
    PlayerId, Team, TeamId,
};
use axum::extract::{MatchedPath, Path, Request, State};
use axum::http::StatusCode;
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, error};

/// Build the full API router
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(health::root_handler))
        .route("/health", get(health::health_handler))
        .route("/alive", get(health::alive_handler))
        .route("/metrics", get(health::metrics_handler))
        .route("/players", post(create_player).get(list_players))
        .route(
            "/players/{id}",
            get(get_player).put(update_player).delete(delete_player),
        )
        .route("/teams", post(create_team).get(list_teams))
        .route(
            "/teams/{id}",
            get(get_team).put(update_team).delete(delete_team),
        )
        .route("/ladders", post(create_ladder).get(list_ladders))
        .route("/ladders/{id}", get(get_ladder).delete(delete_ladder))
        .route(
            "/ladders/{id}/enrolments",
            post(enrol_team).get(list_enrolments),
        )
        .route("/ladders/{id}/matches", get(list_matches))
        .route("/ladders/{id}/standings", get(get_standings))
        .route("/enrolments/{id}", delete(withdraw_team))
        .route("/matches", post(record_match))
        .route("/matches/{id}", get(get_match))
        .route("/admin/purge/{kind}", delete(purge_entities))
        .layer(middleware::from_fn_with_state(state.clone(), track_requests))
        .with_state(state)
}

/// Record one counter tick per served request, labelled by matched route
async fn track_requests(State(state): State<Arc<AppState>>, req: Request, next: Next) -> Response {
    let route = req
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_owned())
        .unwrap_or_else(|| "unmatched".to_string());

    let response = next.run(req).await;
    state
        .metrics()
        .record_http_request(&route, response.status().as_u16());
    response
}

/// API-level error with its HTTP status
pub struct ApiError {
    status: StatusCode,
    inner: anyhow::Error,
}

impl ApiError {
    fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            inner: anyhow::anyhow!(message.into()),
        }
    }
}

fn status_for(error: &anyhow::Error) -> StatusCode {
    match error.downcast_ref::<LadderError>() {
        Some(
            LadderError::PlayerNotFound { .. }
            | LadderError::TeamNotFound { .. }
            | LadderError::LadderNotFound { .. }
            | LadderError::EnrolmentNotFound { .. }
            | LadderError::MatchNotFound { .. },
        ) => StatusCode::NOT_FOUND,
        Some(LadderError::DuplicateEnrolment { .. } | LadderError::MatchBetweenSameTeam { .. }) => {
            StatusCode::CONFLICT
        }
        Some(LadderError::TeamNotEnrolled { .. } | LadderError::InvalidTeamSize { .. }) => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl<E> From<E> for ApiError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        let inner: anyhow::Error = err.into();
        let status = status_for(&inner);
        Self { status, inner }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            error!("Request failed: {:#}", self.inner);
        } else {
            debug!("Request rejected ({}): {}", self.status, self.inner);
        }

        (self.status, Json(json!({ "error": self.inner.to_string() }))).into_response()
    }
}

type ApiResult<T> = std::result::Result<T, ApiError>;

// Request payloads

#[derive(Debug, Deserialize)]
pub struct CreatePlayerRequest {
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdatePlayerRequest {
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateTeamRequest {
    pub name: String,
    pub player_ids: Vec<PlayerId>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateTeamRequest {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateLadderRequest {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct EnrolTeamRequest {
    pub team_id: TeamId,
}

#[derive(Debug, Deserialize)]
pub struct RecordMatchRequest {
    pub ladder_id: LadderId,
    pub team1_id: TeamId,
    pub team2_id: TeamId,
    pub outcome: MatchOutcome,
    #[serde(default)]
    pub played_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize)]
pub struct PurgeResponse {
    pub kind: EntityKind,
    pub removed: usize,
}

// Players

async fn create_player(
    State(state): State<Arc<AppState>>,
    Json(request): Json<CreatePlayerRequest>,
) -> ApiResult<(StatusCode, Json<Player>)> {
    let player = state
        .store()
        .create_player(Player::new(request.name, request.email))
        .await?;
    state.metrics().record_entity_created(EntityKind::Player);
    Ok((StatusCode::CREATED, Json(player)))
}

async fn list_players(State(state): State<Arc<AppState>>) -> ApiResult<Json<Vec<Player>>> {
    Ok(Json(state.store().list_players().await?))
}

async fn get_player(
    State(state): State<Arc<AppState>>,
    Path(id): Path<PlayerId>,
) -> ApiResult<Json<Player>> {
    let player = state
        .store()
        .get_player(id)
        .await?
        .ok_or_else(|| LadderError::PlayerNotFound {
            player_id: id.to_string(),
        })?;
    Ok(Json(player))
}

async fn update_player(
    State(state): State<Arc<AppState>>,
    Path(id): Path<PlayerId>,
    Json(request): Json<UpdatePlayerRequest>,
) -> ApiResult<Json<Player>> {
    let mut player = state
        .store()
        .get_player(id)
        .await?
        .ok_or_else(|| LadderError::PlayerNotFound {
            player_id: id.to_string(),
        })?;

    player.name = request.name;
    player.email = request.email;

    Ok(Json(state.store().update_player(player).await?))
}

async fn delete_player(
    State(state): State<Arc<AppState>>,
    Path(id): Path<PlayerId>,
) -> ApiResult<StatusCode> {
    state.store().delete_player(id).await?;
    state.metrics().record_entity_deleted(EntityKind::Player, 1);
    Ok(StatusCode::NO_CONTENT)
}

// Teams

async fn create_team(
    State(state): State<Arc<AppState>>,
    Json(request): Json<CreateTeamRequest>,
) -> ApiResult<(StatusCode, Json<Team>)> {
    if request.player_ids.is_empty() || request.player_ids.len() > 2 {
        return Err(LadderError::InvalidTeamSize {
            size: request.player_ids.len(),
        }
        .into());
    }

    for player_id in &request.player_ids {
        if state.store().get_player(*player_id).await?.is_none() {
            return Err(LadderError::PlayerNotFound {
                player_id: player_id.to_string(),
            }
            .into());
        }
    }

    let initial_rating = state.recorder().calculator().initial_rating();
    let team = state
        .store()
        .create_team(Team::new(request.name, request.player_ids, initial_rating))
        .await?;
    state.metrics().record_entity_created(EntityKind::Team);
    Ok((StatusCode::CREATED, Json(team)))
}

async fn list_teams(State(state): State<Arc<AppState>>) -> ApiResult<Json<Vec<Team>>> {
    Ok(Json(state.store().list_teams().await?))
}

async fn get_team(
    State(state): State<Arc<AppState>>,
    Path(id): Path<TeamId>,
) -> ApiResult<Json<Team>> {
    let team = state
        .store()
        .get_team(id)
        .await?
        .ok_or_else(|| LadderError::TeamNotFound {
            team_id: id.to_string(),
        })?;
    Ok(Json(team))
}

async fn update_team(
    State(state): State<Arc<AppState>>,
    Path(id): Path<TeamId>,
    Json(request): Json<UpdateTeamRequest>,
) -> ApiResult<Json<Team>> {
    let mut team = state
        .store()
        .get_team(id)
        .await?
        .ok_or_else(|| LadderError::TeamNotFound {
            team_id: id.to_string(),
        })?;

    team.name = request.name;

    Ok(Json(state.store().update_team(team).await?))
}

async fn delete_team(
    State(state): State<Arc<AppState>>,
    Path(id): Path<TeamId>,
) -> ApiResult<StatusCode> {
    state.store().delete_team(id).await?;
    state.metrics().record_entity_deleted(EntityKind::Team, 1);
    Ok(StatusCode::NO_CONTENT)
}

// Ladders

async fn create_ladder(
    State(state): State<Arc<AppState>>,
    Json(request): Json<CreateLadderRequest>,
) -> ApiResult<(StatusCode, Json<Ladder>)> {
    let ladder = state
        .store()
        .create_ladder(Ladder::new(request.name, request.description))
        .await?;
    state.metrics().record_entity_created(EntityKind::Ladder);
    Ok((StatusCode::CREATED, Json(ladder)))
}

async fn list_ladders(State(state): State<Arc<AppState>>) -> ApiResult<Json<Vec<Ladder>>> {
    Ok(Json(state.store().list_ladders().await?))
}

async fn get_ladder(
    State(state): State<Arc<AppState>>,
    Path(id): Path<LadderId>,
) -> ApiResult<Json<Ladder>> {
    let ladder = state
        .store()
        .get_ladder(id)
        .await?
        .ok_or_else(|| LadderError::LadderNotFound {
            ladder_id: id.to_string(),
        })?;
    Ok(Json(ladder))
}

async fn delete_ladder(
    State(state): State<Arc<AppState>>,
    Path(id): Path<LadderId>,
) -> ApiResult<StatusCode> {
    state.store().delete_ladder(id).await?;
    state.metrics().record_entity_deleted(EntityKind::Ladder, 1);
    Ok(StatusCode::NO_CONTENT)
}

// Enrolments

async fn enrol_team(
    State(state): State<Arc<AppState>>,
    Path(ladder_id): Path<LadderId>,
    Json(request): Json<EnrolTeamRequest>,
) -> ApiResult<(StatusCode, Json<Enrolment>)> {
    if state.store().get_ladder(ladder_id).await?.is_none() {
        return Err(LadderError::LadderNotFound {
            ladder_id: ladder_id.to_string(),
        }
        .into());
    }
    if state.store().get_team(request.team_id).await?.is_none() {
        return Err(LadderError::TeamNotFound {
            team_id: request.team_id.to_string(),
        }
        .into());
    }

    let enrolment = state
        .store()
        .create_enrolment(Enrolment::new(ladder_id, request.team_id))
        .await?;
    state.metrics().record_entity_created(EntityKind::Enrolment);
    Ok((StatusCode::CREATED, Json(enrolment)))
}

async fn list_enrolments(
    State(state): State<Arc<AppState>>,
    Path(ladder_id): Path<LadderId>,
) -> ApiResult<Json<Vec<Enrolment>>> {
    Ok(Json(state.store().list_enrolments(ladder_id).await?))
}

async fn withdraw_team(
    State(state): State<Arc<AppState>>,
    Path(id): Path<EnrolmentId>,
) -> ApiResult<StatusCode> {
    state.store().delete_enrolment(id).await?;
    state
        .metrics()
        .record_entity_deleted(EntityKind::Enrolment, 1);
    Ok(StatusCode::NO_CONTENT)
}

// Matches

async fn record_match(
    State(state): State<Arc<AppState>>,
    Json(request): Json<RecordMatchRequest>,
) -> ApiResult<(StatusCode, Json<crate::ladder::RecordedMatch>)> {
    let recorded = state
        .recorder()
        .record_match(NewMatch {
            ladder_id: request.ladder_id,
            team1_id: request.team1_id,
            team2_id: request.team2_id,
            outcome: request.outcome,
            played_at: request.played_at,
        })
        .await?;
    state.metrics().record_entity_created(EntityKind::Match);
    Ok((StatusCode::CREATED, Json(recorded)))
}

async fn get_match(
    State(state): State<Arc<AppState>>,
    Path(id): Path<MatchId>,
) -> ApiResult<Json<Match>> {
    let record = state
        .store()
        .get_match(id)
        .await?
        .ok_or_else(|| LadderError::MatchNotFound {
            match_id: id.to_string(),
        })?;
    Ok(Json(record))
}

async fn list_matches(
    State(state): State<Arc<AppState>>,
    Path(ladder_id): Path<LadderId>,
) -> ApiResult<Json<Vec<Match>>> {
    Ok(Json(state.store().list_matches(ladder_id).await?))
}

// Standings

async fn get_standings(
    State(state): State<Arc<AppState>>,
    Path(ladder_id): Path<LadderId>,
) -> ApiResult<Json<Vec<StandingsRow>>> {
    Ok(Json(standings(state.store().as_ref(), ladder_id).await?))
}

// Admin

async fn purge_entities(
    State(state): State<Arc<AppState>>,
    Path(kind): Path<String>,
) -> ApiResult<Json<PurgeResponse>> {
    let kind: EntityKind = kind.parse().map_err(ApiError::bad_request)?;

    let removed = state.store().purge(kind).await?;
    state
        .metrics()
        .record_entity_deleted(kind, removed as u64);
    Ok(Json(PurgeResponse { kind, removed }))
}
