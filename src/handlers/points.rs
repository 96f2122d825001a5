use actix_web::{web, HttpRequest, HttpResponse, Result, ResponseError};
use serde_json::json;
use uuid::Uuid;
use crate::entities::points_entry_entity as points_entries;
use crate::handlers::{current_user, require_admin};
use crate::models::*;
use crate::services::PointsService;

fn to_responses(entries: Vec<points_entries::Model>) -> Vec<PointsEntryResponse> {
    entries.into_iter().map(PointsEntryResponse::from).collect()
}

#[utoipa::path(
    post,
    path = "/points",
    tag = "points",
    request_body = NewPointsEntry,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Ledger entry recorded; returns its id"),
        (status = 400, description = "Invalid input", body = ApiErrorResponse),
        (status = 403, description = "Admin only")
    )
)]
pub async fn add_points(
    points_service: web::Data<PointsService>,
    req: HttpRequest,
    request: web::Json<NewPointsEntry>,
) -> Result<HttpResponse> {
    let admin = require_admin(&req)?;
    let mut entry = request.into_inner();
    entry.added_by = admin.id;

    match points_service.add_entry(entry).await {
        Ok(id) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": { "id": id }
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/points",
    tag = "points",
    params(
        ("month" = i32, Query, description = "Month, 0 = January"),
        ("year" = i32, Query, description = "Four-digit year")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Ledger entries dated within the month, newest first", body = [PointsEntryResponse]),
        (status = 400, description = "Month out of range", body = ApiErrorResponse)
    )
)]
pub async fn get_points(
    points_service: web::Data<PointsService>,
    query: web::Query<PeriodQuery>,
) -> Result<HttpResponse> {
    match points_service.get_for_period(query.month, query.year).await {
        Ok(entries) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": to_responses(entries)
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/points/me",
    tag = "points",
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Caller's ledger entries, newest first", body = [PointsEntryResponse]),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn my_points(
    points_service: web::Data<PointsService>,
    req: HttpRequest,
) -> Result<HttpResponse> {
    let user = current_user(&req)?;

    match points_service.get_for_user(user.id).await {
        Ok(entries) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": to_responses(entries)
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    delete,
    path = "/points/{id}",
    tag = "points",
    params(
        ("id" = Uuid, Path, description = "Ledger entry id")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Ledger entry deleted"),
        (status = 403, description = "Admin only"),
        (status = 404, description = "Entry not found", body = ApiErrorResponse)
    )
)]
pub async fn delete_points(
    points_service: web::Data<PointsService>,
    req: HttpRequest,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    require_admin(&req)?;

    match points_service.delete_entry(path.into_inner()).await {
        Ok(()) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "message": "Points entry deleted"
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn points_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/points")
            .route("", web::post().to(add_points))
            .route("", web::get().to(get_points))
            .route("/me", web::get().to(my_points))
            .route("/{id}", web::delete().to(delete_points))
    );
}
