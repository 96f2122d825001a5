//! Persistence seam.
//!
//! Services hold `Arc<dyn …Store>` handles instead of a database connection,
//! so the same service code runs against PostgreSQL ([`SeaStore`]) or an
//! in-memory map ([`MemoryStore`]).

pub mod memory;
pub mod sea;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::entities::{
    attendance_record_entity as attendance, event_entity as events,
    monthly_points_entity as monthly_points, points_entry_entity as points_entries,
    user_entity as users,
};
use crate::error::AppResult;
use crate::models::{NewAttendanceRecord, NewEvent, NewPointsEntry, NewUser, ProfileChanges};

pub use memory::MemoryStore;
pub use sea::SeaStore;

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_user(&self, id: i64) -> AppResult<Option<users::Model>>;

    async fn find_user_by_email(&self, email: &str) -> AppResult<Option<users::Model>>;

    async fn insert_user(&self, user: NewUser) -> AppResult<users::Model>;

    /// Applies `changes` and bumps `updated_at`; `NotFound` if the user is gone.
    async fn update_user(&self, id: i64, changes: ProfileChanges) -> AppResult<users::Model>;

    /// All users ordered by name.
    async fn list_users(&self) -> AppResult<Vec<users::Model>>;
}

#[async_trait]
pub trait EventStore: Send + Sync {
    async fn insert_event(&self, event: NewEvent) -> AppResult<events::Model>;

    async fn find_event(&self, id: i64) -> AppResult<Option<events::Model>>;

    /// A page of events, latest start first, with the total count.
    async fn list_events(&self, offset: u64, limit: u64) -> AppResult<(Vec<events::Model>, u64)>;

    /// Returns whether a row was removed.
    async fn delete_event(&self, id: i64) -> AppResult<bool>;
}

#[async_trait]
pub trait AttendanceStore: Send + Sync {
    /// The store stamps the check-in timestamp.
    async fn insert_attendance(&self, record: NewAttendanceRecord) -> AppResult<attendance::Model>;

    async fn attendance_for_event(&self, event_id: i64) -> AppResult<Vec<attendance::Model>>;

    async fn attendance_for_user(&self, user_id: i64) -> AppResult<Vec<attendance::Model>>;

    /// Records with `from <= timestamp <= to`.
    async fn attendance_between(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> AppResult<Vec<attendance::Model>>;
}

#[async_trait]
pub trait PointsStore: Send + Sync {
    /// The store assigns `id` and `created_at`.
    async fn insert_points_entry(&self, entry: NewPointsEntry) -> AppResult<points_entries::Model>;

    /// Entries with `from <= date <= to`, newest first.
    async fn points_entries_between(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> AppResult<Vec<points_entries::Model>>;

    /// Newest first.
    async fn points_entries_for_user(&self, user_id: i64) -> AppResult<Vec<points_entries::Model>>;

    /// `NotFound` when no entry has this id.
    async fn delete_points_entry(&self, id: Uuid) -> AppResult<()>;
}

#[async_trait]
pub trait MonthlyPointsStore: Send + Sync {
    /// Upserts every row by `id` in one transaction: all rows persist or none.
    async fn upsert_monthly_points(&self, rows: Vec<monthly_points::Model>) -> AppResult<()>;

    async fn monthly_points_for_period(
        &self,
        month: i32,
        year: i32,
    ) -> AppResult<Vec<monthly_points::Model>>;

    /// Most recent period first.
    async fn monthly_points_for_user(&self, user_id: i64) -> AppResult<Vec<monthly_points::Model>>;
}
