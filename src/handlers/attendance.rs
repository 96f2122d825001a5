use actix_web::{web, HttpRequest, HttpResponse, Result, ResponseError};
use serde_json::json;
use crate::handlers::current_user;
use crate::models::*;
use crate::services::AttendanceService;

#[utoipa::path(
    get,
    path = "/attendance/me",
    tag = "attendance",
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Caller's attendance records, newest first", body = [AttendanceRecordResponse]),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn my_attendance(
    attendance_service: web::Data<AttendanceService>,
    req: HttpRequest,
) -> Result<HttpResponse> {
    let user = current_user(&req)?;

    match attendance_service.attendance_for_user(user.id).await {
        Ok(records) => {
            let records: Vec<AttendanceRecordResponse> =
                records.into_iter().map(Into::into).collect();
            Ok(HttpResponse::Ok().json(json!({
                "success": true,
                "data": records
            })))
        }
        Err(e) => Ok(e.error_response()),
    }
}

pub fn attendance_config(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/attendance").route("/me", web::get().to(my_attendance)));
}
