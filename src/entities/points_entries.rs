use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{DeriveActiveEnum, EnumIter};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(
    Debug,
    Clone,
    Copy,
    Serialize,
    Deserialize,
    PartialEq,
    Eq,
    Hash,
    ToSchema,
    DeriveActiveEnum,
    EnumIter,
)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "points_category")]
#[serde(rename_all = "snake_case")]
pub enum PointsCategory {
    /// Chairperson, secretary and treasurer duties.
    #[sea_orm(string_value = "chair_sec_tre")]
    ChairSecTre,
    /// Organising committee work.
    #[sea_orm(string_value = "oc")]
    Oc,
    #[sea_orm(string_value = "meeting")]
    Meeting,
    #[sea_orm(string_value = "club_project")]
    ClubProject,
    #[sea_orm(string_value = "district_project")]
    DistrictProject,
    #[sea_orm(string_value = "multiple_project")]
    MultipleProject,
}

impl std::fmt::Display for PointsCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PointsCategory::ChairSecTre => write!(f, "chair_sec_tre"),
            PointsCategory::Oc => write!(f, "oc"),
            PointsCategory::Meeting => write!(f, "meeting"),
            PointsCategory::ClubProject => write!(f, "club_project"),
            PointsCategory::DistrictProject => write!(f, "district_project"),
            PointsCategory::MultipleProject => write!(f, "multiple_project"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "points_entries")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: i64,
    pub user_name: String,
    pub date: DateTime<Utc>,
    pub description: String,
    pub points: i64,
    pub category: PointsCategory,
    pub project_name: Option<String>,
    pub event_id: Option<i64>,
    pub added_by: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
