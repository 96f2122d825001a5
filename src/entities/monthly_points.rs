use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;

/// One rollup row per `(year, month, user_id)`; `id` is derived from those
/// three values, never generated.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "monthly_points")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub user_id: i64,
    pub user_name: String,
    pub photo_url: String,
    /// Zero-indexed, 0 = January.
    pub month: i32,
    pub year: i32,
    pub chair_sec_tre_points: i64,
    pub oc_points: i64,
    pub meeting_points: i64,
    pub club_project_points: i64,
    pub district_project_points: i64,
    pub multiple_project_points: i64,
    pub total_points: i64,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
