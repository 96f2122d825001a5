use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::entities::{PointsCategory, points_entry_entity as points_entries};

/// A ledger entry before the store assigns `id` and `created_at`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct NewPointsEntry {
    pub user_id: i64,
    #[schema(example = "Nimal Perera")]
    pub user_name: String,
    pub date: DateTime<Utc>,
    #[schema(example = "Organised the beach cleanup")]
    pub description: String,
    #[schema(example = 10)]
    pub points: i64,
    pub category: PointsCategory,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_id: Option<i64>,
    /// Filled from the authenticated admin, request values are ignored.
    #[serde(default)]
    pub added_by: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PointsEntryResponse {
    pub id: Uuid,
    pub user_id: i64,
    pub user_name: String,
    pub date: DateTime<Utc>,
    pub description: String,
    pub points: i64,
    pub category: PointsCategory,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_id: Option<i64>,
    pub added_by: i64,
    pub created_at: DateTime<Utc>,
}

impl From<points_entries::Model> for PointsEntryResponse {
    fn from(entry: points_entries::Model) -> Self {
        Self {
            id: entry.id,
            user_id: entry.user_id,
            user_name: entry.user_name,
            date: entry.date,
            description: entry.description,
            points: entry.points,
            category: entry.category,
            project_name: entry.project_name,
            event_id: entry.event_id,
            added_by: entry.added_by,
            created_at: entry.created_at,
        }
    }
}

/// `month` is zero-indexed (0 = January).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ToSchema)]
pub struct PeriodQuery {
    #[schema(example = 5)]
    pub month: i32,
    #[schema(example = 2024)]
    pub year: i32,
}
