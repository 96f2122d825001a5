use actix_web::web;
use utoipa::OpenApi;
use utoipa::{
    Modify,
    openapi::security::{Http, HttpAuthScheme, SecurityScheme},
};
use utoipa_swagger_ui::SwaggerUi;

use crate::entities::{AttendanceStatus, PointsCategory, UserRole};
use crate::handlers;
use crate::models::*;
use crate::utils::ReportedPosition;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
            )
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::auth::register,
        handlers::auth::login,
        handlers::auth::refresh,
        handlers::auth::logout,
        handlers::user::get_profile,
        handlers::user::update_profile,
        handlers::user::list_users,
        handlers::user::update_role,
        handlers::event::list_events,
        handlers::event::create_event,
        handlers::event::get_event,
        handlers::event::delete_event,
        handlers::event::check_in,
        handlers::event::event_attendance,
        handlers::attendance::my_attendance,
        handlers::points::add_points,
        handlers::points::get_points,
        handlers::points::my_points,
        handlers::points::delete_points,
        handlers::monthly_points::get_monthly_points,
        handlers::monthly_points::my_monthly_points,
        handlers::monthly_points::save_batch,
        handlers::monthly_points::aggregate,
        handlers::badge::my_badges,
        handlers::badge::user_badges,
    ),
    components(
        schemas(
            UserRole,
            UserResponse,
            RegisterRequest,
            LoginRequest,
            RefreshTokenRequest,
            UpdateProfileRequest,
            UpdateRoleRequest,
            AuthResponse,
            CreateEventRequest,
            EventResponse,
            PaginationParams,
            CheckInRequest,
            ReportedPosition,
            CheckInResponse,
            AttendanceStatus,
            AttendanceRecordResponse,
            PointsCategory,
            NewPointsEntry,
            PointsEntryResponse,
            PeriodQuery,
            CategoryTotals,
            MonthlyPointsInput,
            SaveMonthlyPointsRequest,
            MonthlyPointsResponse,
            BadgeId,
            Badge,
            UserBadgesResponse,
            ApiError,
            ApiErrorResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "auth", description = "Registration and tokens"),
        (name = "users", description = "Member profiles and roles"),
        (name = "events", description = "Events and geofenced check-in"),
        (name = "attendance", description = "Attendance history"),
        (name = "points", description = "Points ledger"),
        (name = "monthly-points", description = "Monthly leaderboard"),
        (name = "badges", description = "Achievement badges"),
    ),
    info(
        title = "LeoPortal API",
        version = "1.0.0",
        description = "Leo club member portal REST API"
    ),
    servers(
        (url = "/api/v1", description = "Local server")
    )
)]
pub struct ApiDoc;

pub fn swagger_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()),
    )
    .route(
        "/swagger-ui",
        web::get().to(|| async {
            actix_web::HttpResponse::Found()
                .append_header(("Location", "/swagger-ui/"))
                .finish()
        }),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_lists_portal_routes() {
        let doc = ApiDoc::openapi();
        let paths = &doc.paths.paths;
        assert!(paths.contains_key("/events/{id}/check-in"));
        assert!(paths.contains_key("/monthly-points/batch"));
        assert!(paths.contains_key("/badges/users/{id}"));
    }
}
