pub mod badge;
pub mod common;
pub mod event;
pub mod monthly_points;
pub mod pagination;
pub mod points;
pub mod user;

pub use badge::*;
pub use common::*;
pub use event::*;
pub use monthly_points::*;
pub use pagination::*;
pub use points::*;
pub use user::*;
