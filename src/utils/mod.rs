pub mod badges;
pub mod email;
pub mod geo;
pub mod jwt;
pub mod password;
pub mod period;

pub use badges::calculate_badge_ids;
pub use email::*;
pub use geo::*;
pub use jwt::*;
pub use password::*;
pub use period::*;
