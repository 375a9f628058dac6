//! HTTP handler functions for the case lookup API.

use actix_web::{HttpRequest, HttpResponse, web};
use case_lookup_case_models::{CaseQuery, case_types};
use case_lookup_history::DEFAULT_RECENT_LIMIT;
use case_lookup_scraper::{
    Url,
    download::{DownloadError, download_document},
};
use case_lookup_server_models::{
    ApiCaseType, ApiHealth, ApiHistoryEntry, ClearHistoryResponse, DownloadQuery, HistoryQuery,
    SearchRequest,
};

use crate::AppState;

/// Upper bound on `GET /api/history?limit=`.
const MAX_HISTORY_LIMIT: u32 = 500;

/// `GET /api/health`
pub async fn health(state: web::Data<AppState>) -> HttpResponse {
    let database = state.history.is_healthy().await;
    HttpResponse::Ok().json(ApiHealth {
        healthy: database,
        version: env!("CARGO_PKG_VERSION").to_string(),
        database,
    })
}

/// `GET /api/case-types`
///
/// Returns every case type in the portal's dropdown order.
pub async fn list_case_types() -> HttpResponse {
    let types: Vec<ApiCaseType> = case_types::all().iter().map(ApiCaseType::from).collect();
    HttpResponse::Ok().json(types)
}

/// `POST /api/search`
///
/// Accepts a case type as either display name or portal code. Invalid
/// input is still recorded in the history, then answered with `400`.
pub async fn search(
    req: HttpRequest,
    state: web::Data<AppState>,
    body: web::Json<SearchRequest>,
) -> HttpResponse {
    let case_type = case_types::resolve(&body.case_type)
        .map_or_else(|| body.case_type.trim().to_uppercase(), ToString::to_string);
    let valid = CaseQuery::new(&case_type, &body.case_number, &body.year).is_ok();

    let origin = req
        .connection_info()
        .realip_remote_addr()
        .map(ToString::to_string);

    let response = state
        .service
        .search(&case_type, &body.case_number, &body.year, origin.as_deref())
        .await;

    if valid {
        HttpResponse::Ok().json(response)
    } else {
        HttpResponse::BadRequest().json(response)
    }
}

/// `GET /api/history`
///
/// Lists recent searches, newest first.
pub async fn history(state: web::Data<AppState>, params: web::Query<HistoryQuery>) -> HttpResponse {
    let limit = params
        .limit
        .unwrap_or(DEFAULT_RECENT_LIMIT)
        .min(MAX_HISTORY_LIMIT);

    match state.history.recent(limit).await {
        Ok(entries) => {
            let entries: Vec<ApiHistoryEntry> =
                entries.into_iter().map(ApiHistoryEntry::from).collect();
            HttpResponse::Ok().json(entries)
        }
        Err(e) => {
            log::error!("Failed to query search history: {e}");
            HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "Failed to query search history"
            }))
        }
    }
}

/// `DELETE /api/history`
pub async fn clear_history(state: web::Data<AppState>) -> HttpResponse {
    match state.history.clear().await {
        Ok(deleted) => HttpResponse::Ok().json(ClearHistoryResponse { deleted }),
        Err(e) => {
            log::error!("Failed to clear search history: {e}");
            HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "Failed to clear search history"
            }))
        }
    }
}

/// `GET /api/download`
///
/// Fetches a document linked from a search result and returns it as an
/// attachment. Only URLs on the portal's own host are accepted.
pub async fn download(state: web::Data<AppState>, params: web::Query<DownloadQuery>) -> HttpResponse {
    if !is_portal_url(&state, &params.url) {
        return HttpResponse::BadRequest().json(serde_json::json!({
            "error": "Document URL must point to the court portal"
        }));
    }

    let case_id = params.case_id.as_deref().unwrap_or("document");

    let path = match download_document(&state.portal, &params.url, &state.downloads_dir, case_id).await {
        Ok(path) => path,
        Err(DownloadError::InvalidUrl(url)) => {
            return HttpResponse::BadRequest().json(serde_json::json!({
                "error": format!("Invalid document URL: {url}")
            }));
        }
        Err(e) => {
            log::error!("Failed to download {}: {e}", params.url);
            return HttpResponse::BadGateway().json(serde_json::json!({
                "error": format!("Failed to download document: {e}")
            }));
        }
    };

    match tokio::fs::read(&path).await {
        Ok(bytes) => {
            let file_name = path
                .file_name()
                .map_or_else(|| "document.pdf".to_string(), |n| n.to_string_lossy().into_owned());
            HttpResponse::Ok()
                .content_type("application/pdf")
                .insert_header((
                    "Content-Disposition",
                    format!("attachment; filename=\"{file_name}\""),
                ))
                .body(bytes)
        }
        Err(e) => {
            log::error!("Failed to read {}: {e}", path.display());
            HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "Failed to read downloaded document"
            }))
        }
    }
}

/// Whether `url` is on the same host as the configured portal.
fn is_portal_url(state: &AppState, url: &str) -> bool {
    let (Ok(origin), Ok(url)) = (state.portal.origin(), Url::parse(url.trim())) else {
        return false;
    };
    url.host_str().is_some() && url.host_str() == origin.host_str()
}
