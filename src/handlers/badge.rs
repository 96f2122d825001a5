use actix_web::{web, HttpRequest, HttpResponse, Result, ResponseError};
use serde_json::json;
use crate::handlers::current_user;
use crate::models::*;
use crate::services::BadgeService;

async fn badges_response(
    badge_service: &BadgeService,
    user_id: i64,
    period: PeriodQuery,
) -> Result<HttpResponse> {
    match badge_service
        .badges_for_user(user_id, period.month, period.year)
        .await
    {
        Ok(badges) => {
            let response = UserBadgesResponse {
                user_id,
                month: period.month,
                year: period.year,
                badges,
            };
            Ok(HttpResponse::Ok().json(json!({
                "success": true,
                "data": response
            })))
        }
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/badges/me",
    tag = "badges",
    params(
        ("month" = i32, Query, description = "Month, 0 = January"),
        ("year" = i32, Query, description = "Four-digit year")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Badges the caller earned in the period", body = UserBadgesResponse),
        (status = 400, description = "Month out of range", body = ApiErrorResponse)
    )
)]
pub async fn my_badges(
    badge_service: web::Data<BadgeService>,
    req: HttpRequest,
    query: web::Query<PeriodQuery>,
) -> Result<HttpResponse> {
    let user = current_user(&req)?;
    badges_response(&badge_service, user.id, query.into_inner()).await
}

#[utoipa::path(
    get,
    path = "/badges/users/{id}",
    tag = "badges",
    params(
        ("id" = i64, Path, description = "User id"),
        ("month" = i32, Query, description = "Month, 0 = January"),
        ("year" = i32, Query, description = "Four-digit year")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Badges the member earned in the period", body = UserBadgesResponse),
        (status = 404, description = "User not found", body = ApiErrorResponse)
    )
)]
pub async fn user_badges(
    badge_service: web::Data<BadgeService>,
    path: web::Path<i64>,
    query: web::Query<PeriodQuery>,
) -> Result<HttpResponse> {
    badges_response(&badge_service, path.into_inner(), query.into_inner()).await
}

pub fn badge_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/badges")
            .route("/me", web::get().to(my_badges))
            .route("/users/{id}", web::get().to(user_badges))
    );
}
