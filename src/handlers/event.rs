use actix_web::{web, HttpRequest, HttpResponse, Result, ResponseError};
use serde_json::json;
use crate::handlers::{current_user, require_admin};
use crate::models::*;
use crate::services::{AttendanceService, EventService};
use crate::utils::ATTENDANCE_RADIUS_METERS;

#[utoipa::path(
    get,
    path = "/events",
    tag = "events",
    params(
        ("page" = Option<u64>, Query, description = "Page number, from 1"),
        ("page_size" = Option<u64>, Query, description = "Items per page, at most 100")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Events, newest start first"),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn list_events(
    event_service: web::Data<EventService>,
    query: web::Query<PaginationParams>,
) -> Result<HttpResponse> {
    match event_service.list_events(&query.into_inner()).await {
        Ok(page) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": page
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/events",
    tag = "events",
    request_body = CreateEventRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Event created", body = EventResponse),
        (status = 400, description = "Invalid input", body = ApiErrorResponse),
        (status = 403, description = "Admin only")
    )
)]
pub async fn create_event(
    event_service: web::Data<EventService>,
    req: HttpRequest,
    request: web::Json<CreateEventRequest>,
) -> Result<HttpResponse> {
    let admin = require_admin(&req)?;

    match event_service.create_event(admin.id, request.into_inner()).await {
        Ok(event) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": event
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/events/{id}",
    tag = "events",
    params(
        ("id" = i64, Path, description = "Event id")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Event", body = EventResponse),
        (status = 404, description = "Event not found", body = ApiErrorResponse)
    )
)]
pub async fn get_event(
    event_service: web::Data<EventService>,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    match event_service.get_event(path.into_inner()).await {
        Ok(event) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": event
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    delete,
    path = "/events/{id}",
    tag = "events",
    params(
        ("id" = i64, Path, description = "Event id")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Event deleted"),
        (status = 403, description = "Admin only"),
        (status = 404, description = "Event not found", body = ApiErrorResponse)
    )
)]
pub async fn delete_event(
    event_service: web::Data<EventService>,
    req: HttpRequest,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    require_admin(&req)?;

    match event_service.delete_event(path.into_inner()).await {
        Ok(()) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "message": "Event deleted"
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/events/{id}/check-in",
    tag = "events",
    params(
        ("id" = i64, Path, description = "Event id")
    ),
    request_body = CheckInRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Attendance recorded as present or absent", body = CheckInResponse),
        (status = 400, description = "Already checked in, or event has no venue location", body = ApiErrorResponse),
        (status = 404, description = "Event not found", body = ApiErrorResponse),
        (status = 422, description = "Position could not be acquired", body = ApiErrorResponse)
    )
)]
pub async fn check_in(
    attendance_service: web::Data<AttendanceService>,
    req: HttpRequest,
    path: web::Path<i64>,
    request: web::Json<CheckInRequest>,
) -> Result<HttpResponse> {
    let user = current_user(&req)?;
    let position = request.into_inner().position;

    match attendance_service
        .check_in(path.into_inner(), user.id, &position)
        .await
    {
        Ok(record) => {
            let response = CheckInResponse {
                record: record.into(),
                radius_meters: ATTENDANCE_RADIUS_METERS,
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
    path = "/events/{id}/attendance",
    tag = "events",
    params(
        ("id" = i64, Path, description = "Event id")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Attendance records for the event", body = [AttendanceRecordResponse]),
        (status = 403, description = "Admin only")
    )
)]
pub async fn event_attendance(
    attendance_service: web::Data<AttendanceService>,
    req: HttpRequest,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    require_admin(&req)?;

    match attendance_service.attendance_for_event(path.into_inner()).await {
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

pub fn event_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/events")
            .route("", web::get().to(list_events))
            .route("", web::post().to(create_event))
            .route("/{id}", web::get().to(get_event))
            .route("/{id}", web::delete().to(delete_event))
            .route("/{id}/check-in", web::post().to(check_in))
            .route("/{id}/attendance", web::get().to(event_attendance))
    );
}
