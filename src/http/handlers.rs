//! Route handlers.

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    Json,
};

use crate::address::SolanaAddress;
use crate::assessment::{AssessmentRequest, RiskAssessment};
use crate::http::request::{import_row, CheckRequest, ImportRequest, PageQuery, UpsertRequest};
use crate::http::response::{Ack, ApiError, ApiOk, Imported, Listing, Removed};
use crate::http::server::AppState;
use crate::storage::{BlacklistEntry, HistoryRecord, NewBlacklistEntry};

const BLACKLIST_DEFAULT_LIMIT: u32 = 500;
const BLACKLIST_MAX_LIMIT: u32 = 2000;
const HISTORY_DEFAULT_LIMIT: u32 = 100;
const HISTORY_MAX_LIMIT: u32 = 500;

type ApiResult<T> = Result<Json<ApiOk<T>>, ApiError>;

fn invalid_address() -> ApiError {
    ApiError::BadRequest("Invalid address".to_string())
}

pub async fn health() -> Json<ApiOk<Ack>> {
    ApiOk::json(Ack {})
}

/// `POST /api/check`
pub async fn check(
    State(state): State<AppState>,
    body: Result<Json<CheckRequest>, JsonRejection>,
) -> ApiResult<RiskAssessment> {
    let Json(body) = body?;
    let assessment = state
        .assessor
        .assess(AssessmentRequest {
            address: body.address,
            use_goplus: body.use_goplus,
        })
        .await?;
    Ok(ApiOk::json(assessment))
}

/// `GET /api/blacklist`
pub async fn list_blacklist(
    State(state): State<AppState>,
    query: Result<Query<PageQuery>, QueryRejection>,
) -> ApiResult<Listing<BlacklistEntry>> {
    let Query(query) = query?;
    let page = query.page(BLACKLIST_DEFAULT_LIMIT, BLACKLIST_MAX_LIMIT);
    let items = state.blacklist.list(page).await?;
    Ok(ApiOk::json(Listing {
        items,
        limit: page.limit,
        offset: page.offset,
    }))
}

/// `POST /api/blacklist`
pub async fn upsert_blacklist(
    State(state): State<AppState>,
    body: Result<Json<UpsertRequest>, JsonRejection>,
) -> ApiResult<Ack> {
    let Json(body) = body?;
    let address = SolanaAddress::parse(&body.address).map_err(|_| invalid_address())?;
    state
        .blacklist
        .upsert(NewBlacklistEntry {
            address,
            reason: body.reason.unwrap_or_default(),
            source: body.source.unwrap_or_else(|| "manual".to_string()),
        })
        .await?;
    Ok(ApiOk::json(Ack {}))
}

/// `POST /api/blacklist/import`
pub async fn import_blacklist(
    State(state): State<AppState>,
    body: Result<Json<ImportRequest>, JsonRejection>,
) -> ApiResult<Imported> {
    let Json(body) = body?;
    let rows = body
        .addresses
        .as_array()
        .ok_or_else(|| ApiError::BadRequest("addresses[] required".to_string()))?;

    let entries: Vec<_> = rows.iter().filter_map(import_row).collect();
    let dropped = rows.len() - entries.len();
    if dropped > 0 {
        tracing::debug!(dropped, "Malformed import rows skipped");
    }
    let imported = state.blacklist.import(entries).await?;
    Ok(ApiOk::json(Imported { imported }))
}

/// `DELETE /api/blacklist/{address}`
pub async fn remove_blacklist(
    State(state): State<AppState>,
    Path(address): Path<String>,
) -> ApiResult<Removed> {
    let address = SolanaAddress::parse(address.trim()).map_err(|_| invalid_address())?;
    let removed = state.blacklist.remove(&address).await?;
    Ok(ApiOk::json(Removed { removed }))
}

/// `GET /api/history`
pub async fn list_history(
    State(state): State<AppState>,
    query: Result<Query<PageQuery>, QueryRejection>,
) -> ApiResult<Listing<HistoryRecord>> {
    let Query(query) = query?;
    let page = query.page(HISTORY_DEFAULT_LIMIT, HISTORY_MAX_LIMIT);
    let items = state.history.list(page).await?;
    Ok(ApiOk::json(Listing {
        items,
        limit: page.limit,
        offset: page.offset,
    }))
}
