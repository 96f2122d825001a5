pub mod attendance_records;
pub mod events;
pub mod monthly_points;
pub mod points_entries;
pub mod users;

pub use attendance_records as attendance_record_entity;
pub use events as event_entity;
pub use monthly_points as monthly_points_entity;
pub use points_entries as points_entry_entity;
pub use users as user_entity;

pub use attendance_records::AttendanceStatus;
pub use points_entries::PointsCategory;
pub use users::UserRole;
