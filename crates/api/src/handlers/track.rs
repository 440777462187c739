//! Handlers for the `/tracks` resource.
//!
//! Reads are public. Writes require the admin role and a payload that passes
//! validation before the repository is touched.

use axum::extract::rejection::{PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use catalog_core::error::CoreError;
use catalog_core::filters::{NormalizedTrackQuery, TrackListParams};
use catalog_core::retrieval::RetrievalPlan;
use catalog_core::types::DbId;
use catalog_db::models::track::{CreateTrack, Projection, TrackSummary, UpdateTrack};
use catalog_db::repositories::TrackRepo;

use crate::error::{AppError, AppResult};
use crate::extract::ValidatedJson;
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound { entity: "Track", id })
}

// ---------------------------------------------------------------------------
// Reads
// ---------------------------------------------------------------------------

/// GET /api/v1/tracks?search=&energy_min=&...&page=&limit=
///
/// Paginated listing. With a search term, results are relevance-ranked;
/// without one, they are ordered by popularity. Malformed parameters fall
/// back to their defaults instead of failing the request.
pub async fn list(
    State(state): State<AppState>,
    params: Result<Query<TrackListParams>, QueryRejection>,
) -> AppResult<impl IntoResponse> {
    let params = params.map(|Query(p)| p).unwrap_or_default();
    let query = NormalizedTrackQuery::from_params(&params, state.config.bulk_listing_cap);
    let plan = RetrievalPlan::from_query(&query);

    let page =
        TrackRepo::search_page::<TrackSummary>(&state.pool, &plan, Projection::Summary).await?;

    tracing::debug!(
        text_search = query.search.is_some(),
        range_filtered = query.active.any(),
        total = page.pagination.total,
        page = page.pagination.page,
        "Listed tracks"
    );
    Ok(Json(DataResponse { data: page }))
}

/// GET /api/v1/tracks/all
///
/// Bulk listing, popularity descending, capped at the configured ceiling.
pub async fn list_all(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let query = NormalizedTrackQuery::browse_all(state.config.bulk_listing_cap);
    let plan = RetrievalPlan::from_query(&query);

    let page =
        TrackRepo::search_page::<TrackSummary>(&state.pool, &plan, Projection::Summary).await?;
    Ok(Json(DataResponse { data: page }))
}

/// GET /api/v1/tracks/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    id: Result<Path<DbId>, PathRejection>,
) -> AppResult<impl IntoResponse> {
    let Path(id) = id?;
    let track = TrackRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(DataResponse { data: track }))
}

// ---------------------------------------------------------------------------
// Writes
// ---------------------------------------------------------------------------

/// POST /api/v1/tracks
pub async fn create(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<CreateTrack>,
) -> AppResult<impl IntoResponse> {
    let track = TrackRepo::create(&state.pool, &input).await?;

    tracing::info!(
        track_id = track.id,
        artists = input.artist_name.credit_count(),
        user_id = admin.user_id,
        "Track created"
    );
    Ok((StatusCode::CREATED, Json(DataResponse { data: track })))
}

/// PUT /api/v1/tracks/{id}
///
/// Partial update: only the fields present in the body change.
pub async fn update(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    id: Result<Path<DbId>, PathRejection>,
    ValidatedJson(input): ValidatedJson<UpdateTrack>,
) -> AppResult<impl IntoResponse> {
    let Path(id) = id?;
    let track = TrackRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| not_found(id))?;

    tracing::info!(track_id = id, user_id = admin.user_id, "Track updated");
    Ok(Json(DataResponse { data: track }))
}

/// DELETE /api/v1/tracks/{id}
pub async fn delete(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    id: Result<Path<DbId>, PathRejection>,
) -> AppResult<impl IntoResponse> {
    let Path(id) = id?;
    if !TrackRepo::delete(&state.pool, id).await? {
        return Err(not_found(id));
    }

    tracing::info!(track_id = id, user_id = admin.user_id, "Track deleted");
    Ok(StatusCode::NO_CONTENT)
}
