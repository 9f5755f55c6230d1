//! HTTP handler functions for the urban alerts API.

use actix_web::{HttpMessage as _, HttpRequest, HttpResponse, web};
use serde::de::DeserializeOwned;
use urban_alerts_analytics::stats::compute_stats;
use urban_alerts_database::queries;
use urban_alerts_server_models::{
    AlertListParams, ApiAlert, ApiHealth, ApiResponse, CreateAlertBody, StatusBody,
    UpdateAlertBody,
};

use crate::{ApiError, AppState};

/// Parses the `{id}` path segment. Anything that is not an integer cannot
/// name an alert, so it is reported as not found.
fn parse_id(raw: &str) -> Result<i64, ApiError> {
    raw.parse().map_err(|_| ApiError::NotFound(raw.to_string()))
}

fn is_json(req: &HttpRequest) -> bool {
    let content_type = req.content_type();
    content_type == "application/json" || content_type.ends_with("+json")
}

/// Decodes a request body.
///
/// A payload that is empty or not sent as JSON is read as an empty object,
/// so missing fields are reported by validation. Only a JSON payload that
/// fails to parse is rejected as malformed.
fn json_body<T: DeserializeOwned + Default>(
    req: &HttpRequest,
    payload: &web::Bytes,
) -> Result<T, ApiError> {
    if !is_json(req) || payload.trim_ascii().is_empty() {
        return Ok(T::default());
    }

    serde_json::from_slice(payload).map_err(|e| ApiError::MalformedBody(e.to_string()))
}

/// `GET /health`
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(ApiHealth {
        status: "ok".to_string(),
        timestamp: chrono::Utc::now(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// `GET /alertas?type=&status=`
///
/// Lists alerts newest first. Unknown filter values are ignored.
pub async fn list(
    state: web::Data<AppState>,
    query: web::Query<Vec<(String, String)>>,
) -> Result<HttpResponse, ApiError> {
    let filter = AlertListParams::from_pairs(&query).to_filter();
    let rows = queries::list_alerts(state.db.as_ref(), &filter).await?;
    let alerts: Vec<ApiAlert> = rows.into_iter().map(ApiAlert::from).collect();

    Ok(HttpResponse::Ok().json(ApiResponse::ok(alerts)))
}

/// `GET /alertas/estatisticas`
pub async fn stats(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let stats = compute_stats(state.db.as_ref(), chrono::Utc::now()).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(stats)))
}

/// `GET /alertas/{id}`
pub async fn show(
    state: web::Data<AppState>,
    id: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let id = parse_id(&id)?;
    let row = queries::get_alert(state.db.as_ref(), id).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(ApiAlert::from(row))))
}

/// `POST /alertas`
pub async fn create(
    state: web::Data<AppState>,
    req: HttpRequest,
    payload: web::Bytes,
) -> Result<HttpResponse, ApiError> {
    let body: CreateAlertBody = json_body(&req, &payload)?;
    let alert = body.validate().map_err(ApiError::Validation)?;
    let row = queries::create_alert(state.db.as_ref(), &alert, chrono::Utc::now()).await?;

    log::info!("Alert {} created ({})", row.id, row.alert_type);

    Ok(HttpResponse::Created()
        .json(ApiResponse::ok(ApiAlert::from(row)).with_message("Alerta criado com sucesso.")))
}

/// `PUT /alertas/{id}`
///
/// Replaces every mutable field, including status.
pub async fn update(
    state: web::Data<AppState>,
    id: web::Path<String>,
    req: HttpRequest,
    payload: web::Bytes,
) -> Result<HttpResponse, ApiError> {
    let body: UpdateAlertBody = json_body(&req, &payload)?;
    let update = body.validate().map_err(ApiError::Validation)?;
    let id = parse_id(&id)?;
    let row = queries::update_alert(state.db.as_ref(), id, &update, chrono::Utc::now()).await?;

    Ok(HttpResponse::Ok()
        .json(ApiResponse::ok(ApiAlert::from(row)).with_message("Alerta atualizado com sucesso.")))
}

/// `PATCH /alertas/{id}`
///
/// Resolves an alert. `resolvido` is the only accepted status.
pub async fn update_status(
    state: web::Data<AppState>,
    id: web::Path<String>,
    req: HttpRequest,
    payload: web::Bytes,
) -> Result<HttpResponse, ApiError> {
    let body: StatusBody = json_body(&req, &payload)?;
    let status = body.validate().map_err(ApiError::Validation)?;
    let id = parse_id(&id)?;
    let row =
        queries::update_alert_status(state.db.as_ref(), id, status, chrono::Utc::now()).await?;

    log::info!("Alert {} is now {}", row.id, row.status);

    Ok(HttpResponse::Ok()
        .json(ApiResponse::ok(ApiAlert::from(row)).with_message("Status atualizado com sucesso.")))
}

/// `DELETE /alertas/{id}`
pub async fn destroy(
    state: web::Data<AppState>,
    id: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let id = parse_id(&id)?;
    queries::delete_alert(state.db.as_ref(), id).await?;

    log::info!("Alert {id} deleted");

    Ok(HttpResponse::Ok()
        .json(ApiResponse::ok(serde_json::Value::Null).with_message("Alerta removido com sucesso.")))
}

/// Fallback for unmatched routes.
pub async fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(ApiResponse::failure("Rota não encontrada."))
}
