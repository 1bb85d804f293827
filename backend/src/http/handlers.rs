//! HTTP handlers for the REST API.
//!
//! Each handler corresponds to an API endpoint and delegates to the service
//! layer. Playground handlers run every mutation inside one short
//! `SessionStore::write` call; explainer round trips are split into
//! begin/finish so no session lock is held while waiting on the model, and a
//! ticket guard frees the session if the request is dropped mid-call.

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use log::warn;
use uuid::Uuid;

use super::dto::{
    ActivateRequest, AddBlockRequest, BlendRequest, BlendResponse, BlockTypeStats, BranchRequest,
    ChartData, CompareQuery, CreateSessionResponse, CustomTemplateRequest, DetailQuery,
    EditBlockRequest, ExplainRequest, ExplainResponse, ForestTree, GenerateOutcome,
    GenerateRequest, HealthResponse, HighlightRequest, HistoryComparison, HistoryEntry,
    LegendResponse, MutationResponse, OverviewQuery, OverviewResponse, PlaygroundSnapshot,
    ReorderRequest, SampleQuery, SampleResponse, SiteComparisonQuery, SiteStatsResponse,
    SitesResponse,
};
use super::error::AppError;
use super::state::AppState;
use crate::models::{BlockId, BlockTemplate, Scope};
use crate::services::explorer::{ExplorerState, DEFAULT_TOP_N};
use crate::services::export::{export_file_name, ExportDocument};
use crate::services::playground::{Playground, PlaygroundError};
use crate::services::samples::{filter_samples, random_sample, SampleView};
use crate::services::{block_stats, charts};

/// Result type for handlers.
pub type HandlerResult<T> = Result<Json<T>, AppError>;

fn read_session<R>(
    state: &AppState,
    id: Uuid,
    f: impl FnOnce(&Playground) -> R,
) -> Result<R, AppError> {
    state
        .sessions
        .read(&id, f)
        .ok_or_else(|| AppError::session_not_found(id))
}

fn write_session<R>(
    state: &AppState,
    id: Uuid,
    f: impl FnOnce(&mut Playground) -> R,
) -> Result<R, AppError> {
    state
        .sessions
        .write(&id, f)
        .ok_or_else(|| AppError::session_not_found(id))
}

fn changed(pg: &Playground, changed: bool, block_id: Option<BlockId>) -> MutationResponse {
    MutationResponse {
        changed,
        block_id,
        snapshot: pg.snapshot(),
    }
}

// =============================================================================
// Health Check
// =============================================================================

/// GET /health
///
/// Service status plus the load status of each dataset.
pub async fn health_check(State(state): State<AppState>) -> HandlerResult<HealthResponse> {
    let repository = match state.repository.health_check().await {
        Ok(true) => "ok".to_string(),
        Ok(false) => "unavailable".to_string(),
        Err(e) => format!("error: {}", e),
    };
    let datasets = state.repository.dataset_status().await.unwrap_or_default();

    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        version: "v1".to_string(),
        repository,
        datasets,
        sessions: state.sessions.len(),
    }))
}

// =============================================================================
// Aggregation Views
// =============================================================================

/// GET /v1/sites
pub async fn list_sites(State(state): State<AppState>) -> HandlerResult<SitesResponse> {
    let summaries = state.repository.block_summaries().await?;
    let sites = charts::unique_sites(&summaries);
    let total = sites.len();
    Ok(Json(SitesResponse { sites, total }))
}

/// GET /v1/block-types
///
/// Sorted block types with their palette colors.
pub async fn list_block_types(State(state): State<AppState>) -> HandlerResult<LegendResponse> {
    let summaries = state.repository.block_summaries().await?;
    Ok(Json(LegendResponse {
        block_types: charts::legend(&summaries),
    }))
}

/// GET /v1/block-types/{block_type}/stats
pub async fn get_block_type_stats(
    State(state): State<AppState>,
    Path(block_type): Path<String>,
) -> HandlerResult<BlockTypeStats> {
    let summaries = state.repository.block_summaries().await?;
    block_stats::block_type_stats(&summaries, &block_type)
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Block type not found: {}", block_type)))
}

/// GET /v1/block-types/{block_type}/detail
///
/// Cross-site view of one block type.
pub async fn get_block_type_detail(
    State(state): State<AppState>,
    Path(block_type): Path<String>,
    Query(query): Query<DetailQuery>,
) -> HandlerResult<ChartData> {
    let summaries = state.repository.block_summaries().await?;
    if !summaries.iter().any(|s| s.block_type == block_type) {
        return Err(AppError::NotFound(format!(
            "Block type not found: {}",
            block_type
        )));
    }
    Ok(Json(charts::detail_chart(
        &summaries,
        &block_type,
        query.metric.unwrap_or_default(),
        query.chart.unwrap_or_default(),
    )))
}

/// GET /v1/overview
///
/// Ranked top-N rows and their chart for a site (or all sites).
pub async fn get_overview(
    State(state): State<AppState>,
    Query(query): Query<OverviewQuery>,
) -> HandlerResult<OverviewResponse> {
    let top_n = query.top_n.unwrap_or(DEFAULT_TOP_N);
    if top_n == 0 {
        return Err(AppError::BadRequest("top_n must be at least 1".to_string()));
    }

    let mut view = ExplorerState {
        scope: Scope::from(query.site),
        metric: query.metric.unwrap_or_default(),
        chart: query.chart.unwrap_or_default(),
        top_n,
        ..ExplorerState::default()
    };
    view.set_selected(query.selected);

    let summaries = state.repository.block_summaries().await?;
    let rows = view.rows(&summaries);
    let chart = view.chart(&summaries);

    Ok(Json(OverviewResponse { view, rows, chart }))
}

/// GET /v1/site-comparison
///
/// Every site's own top-N block types side by side.
pub async fn get_site_comparison(
    State(state): State<AppState>,
    Query(query): Query<SiteComparisonQuery>,
) -> HandlerResult<ChartData> {
    let top_n = query.top_n.unwrap_or(DEFAULT_TOP_N);
    if top_n == 0 {
        return Err(AppError::BadRequest("top_n must be at least 1".to_string()));
    }
    let summaries = state.repository.block_summaries().await?;
    Ok(Json(charts::site_comparison_chart(
        &summaries,
        &Scope::from(query.site),
        query.metric.unwrap_or_default(),
        top_n,
        query.chart.unwrap_or_default(),
    )))
}

/// GET /v1/site-stats
pub async fn get_site_stats(State(state): State<AppState>) -> HandlerResult<SiteStatsResponse> {
    let summaries = state.repository.block_summaries().await?;
    Ok(Json(SiteStatsResponse {
        sites: block_stats::site_stats(&summaries),
    }))
}

/// GET /v1/samples/random
pub async fn get_random_sample(
    State(state): State<AppState>,
    Query(query): Query<SampleQuery>,
) -> HandlerResult<SampleResponse> {
    let samples = state.repository.samples().await?;
    let scope = Scope::from(query.site);
    let search = query.search.as_deref();

    let matches = filter_samples(&samples, &scope, search).len();
    let sample = random_sample(&samples, &scope, search, &mut rand::thread_rng())
        .cloned()
        .ok_or_else(|| AppError::NotFound("No sample matches the filters".to_string()))?;

    let view = SampleView::new(sample);
    Ok(Json(SampleResponse {
        block_types: view.sample.block_types(),
        blocks: view.blocks(),
        sample: view.sample,
        matches,
    }))
}

// =============================================================================
// Explainer Proxy
// =============================================================================

/// POST /v1/explain (also served at /api/explain)
pub async fn explain(
    State(state): State<AppState>,
    Json(request): Json<ExplainRequest>,
) -> HandlerResult<ExplainResponse> {
    if request.prompt.trim().is_empty() {
        return Err(AppError::BadRequest("Prompt must not be empty".to_string()));
    }
    let output = state
        .generator
        .explain(&request.prompt, request.structure.as_deref())
        .await
        .map_err(|e| {
            warn!("explain request failed: {}", e);
            AppError::from(e)
        })?;
    Ok(Json(ExplainResponse { output }))
}

// =============================================================================
// Playground Sessions
// =============================================================================

/// POST /v1/playground
pub async fn create_session(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<CreateSessionResponse>), AppError> {
    let session_id = state.sessions.create();
    let snapshot = read_session(&state, session_id, Playground::snapshot)?;
    Ok((
        StatusCode::CREATED,
        Json(CreateSessionResponse {
            session_id,
            snapshot,
        }),
    ))
}

/// GET /v1/playground/{id}
pub async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> HandlerResult<PlaygroundSnapshot> {
    read_session(&state, id, Playground::snapshot).map(Json)
}

/// DELETE /v1/playground/{id}
pub async fn delete_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    if state.sessions.remove(&id) {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::session_not_found(id))
    }
}

/// GET /v1/playground/{id}/tree
pub async fn get_tree(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> HandlerResult<ForestTree> {
    read_session(&state, id, Playground::tree).map(Json)
}

/// GET /v1/playground/{id}/templates
///
/// Built-in templates followed by the session's custom ones.
pub async fn list_templates(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> HandlerResult<Vec<BlockTemplate>> {
    read_session(&state, id, Playground::templates).map(Json)
}

// =============================================================================
// Playground Editing
// =============================================================================

/// POST /v1/playground/{id}/blocks
pub async fn add_block(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<AddBlockRequest>,
) -> HandlerResult<MutationResponse> {
    let response = write_session(&state, id, |pg| -> Result<_, PlaygroundError> {
        let chain = request
            .chain
            .unwrap_or_else(|| pg.active_chain_id().clone());
        let block_id = pg.add_template_block(&chain, &request.block_type)?;
        Ok(changed(pg, true, Some(block_id)))
    })??;
    Ok(Json(response))
}

/// PATCH /v1/playground/{id}/blocks/{block_id}
///
/// A blank description leaves the block unchanged (`changed: false`).
pub async fn edit_block(
    State(state): State<AppState>,
    Path((id, block_id)): Path<(Uuid, BlockId)>,
    Json(request): Json<EditBlockRequest>,
) -> HandlerResult<MutationResponse> {
    let response = write_session(&state, id, |pg| -> Result<_, PlaygroundError> {
        let edited = pg.edit_description(&block_id, &request.description)?;
        Ok(changed(pg, edited, Some(block_id)))
    })??;
    Ok(Json(response))
}

/// POST /v1/playground/{id}/templates
pub async fn add_custom_template(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<CustomTemplateRequest>,
) -> HandlerResult<MutationResponse> {
    let response = write_session(&state, id, |pg| -> Result<_, PlaygroundError> {
        let block_id = pg.add_custom_template(&request.name, &request.description)?;
        Ok(changed(pg, true, Some(block_id)))
    })??;
    Ok(Json(response))
}

/// POST /v1/playground/{id}/reorder
///
/// Moving a block onto a block of another chain is a no-op.
pub async fn reorder(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<ReorderRequest>,
) -> HandlerResult<MutationResponse> {
    let response = write_session(&state, id, |pg| {
        let moved = pg.reorder(&request.chain, &request.from, &request.to);
        changed(pg, moved, None)
    })?;
    Ok(Json(response))
}

/// POST /v1/playground/{id}/branches
pub async fn branch(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<BranchRequest>,
) -> HandlerResult<MutationResponse> {
    let response = write_session(&state, id, |pg| -> Result<_, PlaygroundError> {
        let block_id = pg.branch_from(&request.block_id)?;
        Ok(changed(pg, true, Some(block_id)))
    })??;
    Ok(Json(response))
}

/// POST /v1/playground/{id}/activate
pub async fn activate(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<ActivateRequest>,
) -> HandlerResult<MutationResponse> {
    let response = write_session(&state, id, |pg| -> Result<_, PlaygroundError> {
        pg.activate(request.chain)?;
        Ok(changed(pg, true, None))
    })??;
    Ok(Json(response))
}

/// POST /v1/playground/{id}/highlight
///
/// Text of three characters or fewer is ignored (`changed: false`).
pub async fn highlight(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<HighlightRequest>,
) -> HandlerResult<MutationResponse> {
    let response = write_session(&state, id, |pg| {
        let block_id = pg.highlight(&request.text);
        changed(pg, block_id.is_some(), block_id)
    })?;
    Ok(Json(response))
}

/// DELETE /v1/playground/{id}/main/{block_id}
pub async fn remove_from_main(
    State(state): State<AppState>,
    Path((id, block_id)): Path<(Uuid, BlockId)>,
) -> HandlerResult<MutationResponse> {
    let response = write_session(&state, id, |pg| {
        if pg.remove_from_main(&block_id) {
            Ok(changed(pg, true, Some(block_id)))
        } else {
            Err(PlaygroundError::BlockNotFound(block_id))
        }
    })??;
    Ok(Json(response))
}

/// DELETE /v1/playground/{id}/branches/{parent_id}/{block_id}
pub async fn remove_from_branch(
    State(state): State<AppState>,
    Path((id, parent_id, block_id)): Path<(Uuid, BlockId, BlockId)>,
) -> HandlerResult<MutationResponse> {
    let response = write_session(&state, id, |pg| {
        if pg.remove_from_branch(&parent_id, &block_id) {
            Ok(changed(pg, true, Some(block_id)))
        } else {
            Err(PlaygroundError::BlockNotFound(block_id))
        }
    })??;
    Ok(Json(response))
}

// =============================================================================
// Playground Explainer Round Trips
// =============================================================================

/// POST /v1/playground/{id}/generate
///
/// A failed model call still answers 200: the chain output becomes a
/// placeholder and `error` carries the cause.
pub async fn generate(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<GenerateRequest>,
) -> HandlerResult<GenerateOutcome> {
    let ticket = write_session(&state, id, |pg| {
        let chain = request
            .chain
            .unwrap_or_else(|| pg.active_chain_id().clone());
        pg.begin_generate(chain, &request.prompt)
    })??;

    let guard = state.sessions.hold_ticket(id, ticket.ticket);
    let result = state
        .generator
        .explain(&ticket.prompt, Some(&ticket.structure))
        .await;
    guard.disarm();

    let outcome = write_session(&state, id, |pg| pg.finish_generate(ticket, result))??;
    Ok(Json(outcome))
}

/// POST /v1/playground/{id}/blend
///
/// On a failed model call the selected blocks stay where they were and the
/// response is 502.
pub async fn blend(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<BlendRequest>,
) -> HandlerResult<BlendResponse> {
    let ticket = write_session(&state, id, |pg| pg.begin_blend(&request.block_ids))??;

    let guard = state.sessions.hold_ticket(id, ticket.ticket);
    let result = state.generator.explain(&ticket.prompt, None).await;
    guard.disarm();

    let response = write_session(&state, id, |pg| {
        pg.finish_blend(ticket, result).map(|block| BlendResponse {
            block,
            snapshot: pg.snapshot(),
        })
    })??;
    Ok(Json(response))
}

// =============================================================================
// Playground History & Export
// =============================================================================

/// GET /v1/playground/{id}/history
pub async fn get_history(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> HandlerResult<Vec<HistoryEntry>> {
    read_session(&state, id, |pg| pg.history().to_vec()).map(Json)
}

/// GET /v1/playground/{id}/history/compare?left=..&right=..
pub async fn compare_history(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<CompareQuery>,
) -> HandlerResult<HistoryComparison> {
    read_session(&state, id, |pg| pg.compare(&query.left, &query.right))?
        .map(Json)
        .ok_or_else(|| AppError::NotFound("History entry not found".to_string()))
}

/// GET /v1/playground/{id}/export?format=json|markdown
///
/// Served as a file download named `explanation-<unix millis>.<ext>`.
pub async fn export(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<super::dto::ExportQuery>,
) -> Result<Response, AppError> {
    let format = query.format.unwrap_or_default();
    let document = read_session(&state, id, ExportDocument::from_playground)?;
    let body = document
        .render(format)
        .map_err(|e| AppError::Internal(format!("Failed to render export: {}", e)))?;
    let file_name = export_file_name(format, Utc::now().timestamp_millis());

    Ok((
        [
            (header::CONTENT_TYPE, format.content_type().to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", file_name),
            ),
        ],
        body,
    )
        .into_response())
}
