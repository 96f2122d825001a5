use actix_web::{web, HttpRequest, HttpResponse, Result, ResponseError};
use serde_json::json;
use crate::entities::monthly_points_entity as monthly_points;
use crate::handlers::{current_user, require_admin};
use crate::models::*;
use crate::services::MonthlyPointsService;

fn to_responses(rows: Vec<monthly_points::Model>) -> Vec<MonthlyPointsResponse> {
    rows.into_iter().map(MonthlyPointsResponse::from).collect()
}

#[utoipa::path(
    get,
    path = "/monthly-points",
    tag = "monthly-points",
    params(
        ("month" = i32, Query, description = "Month, 0 = January"),
        ("year" = i32, Query, description = "Four-digit year")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Leaderboard for the period, highest total first", body = [MonthlyPointsResponse]),
        (status = 400, description = "Month out of range", body = ApiErrorResponse)
    )
)]
pub async fn get_monthly_points(
    monthly_points_service: web::Data<MonthlyPointsService>,
    query: web::Query<PeriodQuery>,
) -> Result<HttpResponse> {
    match monthly_points_service
        .get_monthly_points_for_period(query.month, query.year)
        .await
    {
        Ok(rows) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": to_responses(rows)
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/monthly-points/me",
    tag = "monthly-points",
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Caller's monthly rows", body = [MonthlyPointsResponse]),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn my_monthly_points(
    monthly_points_service: web::Data<MonthlyPointsService>,
    req: HttpRequest,
) -> Result<HttpResponse> {
    let user = current_user(&req)?;

    match monthly_points_service.get_monthly_points_for_user(user.id).await {
        Ok(rows) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": to_responses(rows)
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/monthly-points/batch",
    tag = "monthly-points",
    request_body = SaveMonthlyPointsRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Rows upserted atomically", body = [MonthlyPointsResponse]),
        (status = 400, description = "Invalid row; nothing was written", body = ApiErrorResponse),
        (status = 403, description = "Admin only")
    )
)]
pub async fn save_batch(
    monthly_points_service: web::Data<MonthlyPointsService>,
    req: HttpRequest,
    request: web::Json<SaveMonthlyPointsRequest>,
) -> Result<HttpResponse> {
    require_admin(&req)?;

    match monthly_points_service
        .save_monthly_points_batch(request.into_inner().rows)
        .await
    {
        Ok(rows) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": to_responses(rows)
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/monthly-points/aggregate",
    tag = "monthly-points",
    request_body = PeriodQuery,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Period rebuilt from the points ledger", body = [MonthlyPointsResponse]),
        (status = 400, description = "Month out of range", body = ApiErrorResponse),
        (status = 403, description = "Admin only")
    )
)]
pub async fn aggregate(
    monthly_points_service: web::Data<MonthlyPointsService>,
    req: HttpRequest,
    request: web::Json<PeriodQuery>,
) -> Result<HttpResponse> {
    require_admin(&req)?;

    match monthly_points_service
        .aggregate_from_ledger(request.month, request.year)
        .await
    {
        Ok(rows) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": to_responses(rows)
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn monthly_points_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/monthly-points")
            .route("", web::get().to(get_monthly_points))
            .route("/me", web::get().to(my_monthly_points))
            .route("/batch", web::post().to(save_batch))
            .route("/aggregate", web::post().to(aggregate))
    );
}
