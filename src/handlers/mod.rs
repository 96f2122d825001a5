pub mod attendance;
pub mod auth;
pub mod badge;
pub mod event;
pub mod monthly_points;
pub mod points;
pub mod user;

pub use attendance::attendance_config;
pub use auth::auth_config;
pub use badge::badge_config;
pub use event::event_config;
pub use monthly_points::monthly_points_config;
pub use points::points_config;
pub use user::user_config;

use actix_web::{HttpMessage, HttpRequest};

use crate::error::{AppError, AppResult};
use crate::middlewares::AuthUser;

/// Caller identity placed in the request by `AuthMiddleware`.
pub(crate) fn current_user(req: &HttpRequest) -> AppResult<AuthUser> {
    req.extensions()
        .get::<AuthUser>()
        .copied()
        .ok_or_else(|| AppError::AuthError("Missing access token".to_string()))
}

pub(crate) fn require_admin(req: &HttpRequest) -> AppResult<AuthUser> {
    let user = current_user(req)?;
    if !user.is_admin() {
        return Err(AppError::Forbidden);
    }
    Ok(user)
}

/// Mounts every `/api/v1` route group.
pub fn api_config(cfg: &mut actix_web::web::ServiceConfig) {
    cfg.configure(auth_config)
        .configure(user_config)
        .configure(event_config)
        .configure(attendance_config)
        .configure(points_config)
        .configure(monthly_points_config)
        .configure(badge_config);
}
