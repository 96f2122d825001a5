use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::entities::{PointsCategory, monthly_points_entity as monthly_points};
use crate::error::{AppError, AppResult};

/// Per-category point sums for one member and one month.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CategoryTotals {
    pub chair_sec_tre_points: i64,
    pub oc_points: i64,
    pub meeting_points: i64,
    pub club_project_points: i64,
    pub district_project_points: i64,
    pub multiple_project_points: i64,
}

impl CategoryTotals {
    /// Adds `points` to the category's slot; overflow is a validation error.
    pub fn add(&mut self, category: PointsCategory, points: i64) -> AppResult<()> {
        let slot = match category {
            PointsCategory::ChairSecTre => &mut self.chair_sec_tre_points,
            PointsCategory::Oc => &mut self.oc_points,
            PointsCategory::Meeting => &mut self.meeting_points,
            PointsCategory::ClubProject => &mut self.club_project_points,
            PointsCategory::DistrictProject => &mut self.district_project_points,
            PointsCategory::MultipleProject => &mut self.multiple_project_points,
        };
        *slot = slot.checked_add(points).ok_or_else(|| {
            AppError::ValidationError(format!("{category} points overflow"))
        })?;
        Ok(())
    }

    pub fn sum(&self) -> AppResult<i64> {
        [
            self.chair_sec_tre_points,
            self.oc_points,
            self.meeting_points,
            self.club_project_points,
            self.district_project_points,
            self.multiple_project_points,
        ]
        .into_iter()
        .try_fold(0i64, |acc, points| acc.checked_add(points))
        .ok_or_else(|| AppError::ValidationError("Category points overflow".to_string()))
    }
}

/// A rollup row as submitted for saving. Any `id` the caller sends is
/// discarded; the stored id is always derived from year, month and user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct MonthlyPointsInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub user_id: i64,
    pub user_name: String,
    #[serde(default)]
    pub photo_url: String,
    #[schema(example = 5)]
    pub month: i32,
    #[schema(example = 2024)]
    pub year: i32,
    #[serde(flatten)]
    pub totals: CategoryTotals,
    pub total_points: i64,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SaveMonthlyPointsRequest {
    pub rows: Vec<MonthlyPointsInput>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MonthlyPointsResponse {
    pub id: String,
    pub user_id: i64,
    pub user_name: String,
    pub photo_url: String,
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

impl From<monthly_points::Model> for MonthlyPointsResponse {
    fn from(row: monthly_points::Model) -> Self {
        Self {
            id: row.id,
            user_id: row.user_id,
            user_name: row.user_name,
            photo_url: row.photo_url,
            month: row.month,
            year: row.year,
            chair_sec_tre_points: row.chair_sec_tre_points,
            oc_points: row.oc_points,
            meeting_points: row.meeting_points,
            club_project_points: row.club_project_points,
            district_project_points: row.district_project_points,
            multiple_project_points: row.multiple_project_points,
            total_points: row.total_points,
            updated_at: row.updated_at,
        }
    }
}
