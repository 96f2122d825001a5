pub mod attendance_service;
pub mod auth_service;
pub mod badge_service;
pub mod event_service;
pub mod monthly_points_service;
pub mod points_service;
pub mod user_service;

pub use attendance_service::*;
pub use auth_service::*;
pub use badge_service::*;
pub use event_service::*;
pub use monthly_points_service::*;
pub use points_service::*;
pub use user_service::*;
