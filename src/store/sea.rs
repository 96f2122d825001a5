use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, SqlErr, TransactionTrait,
};
use uuid::Uuid;

use super::{AttendanceStore, EventStore, MonthlyPointsStore, PointsStore, UserStore};
use crate::entities::{
    attendance_record_entity as attendance, event_entity as events,
    monthly_points_entity as monthly_points, points_entry_entity as points_entries,
    user_entity as users,
};
use crate::error::{AppError, AppResult};
use crate::models::{NewAttendanceRecord, NewEvent, NewPointsEntry, NewUser, ProfileChanges};

/// PostgreSQL-backed store.
#[derive(Clone)]
pub struct SeaStore {
    pool: DatabaseConnection,
}

impl SeaStore {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for SeaStore {
    async fn find_user(&self, id: i64) -> AppResult<Option<users::Model>> {
        Ok(users::Entity::find_by_id(id).one(&self.pool).await?)
    }

    async fn find_user_by_email(&self, email: &str) -> AppResult<Option<users::Model>> {
        Ok(users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .one(&self.pool)
            .await?)
    }

    async fn insert_user(&self, user: NewUser) -> AppResult<users::Model> {
        let now = Utc::now();
        let model = users::ActiveModel {
            email: Set(user.email),
            name: Set(user.name),
            password_hash: Set(user.password_hash),
            role: Set(user.role),
            designation: Set(user.designation),
            photo_url: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&self.pool)
        .await?;
        Ok(model)
    }

    async fn update_user(&self, id: i64, changes: ProfileChanges) -> AppResult<users::Model> {
        let mut model = users::Entity::find_by_id(id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?
            .into_active_model();
        if let Some(name) = changes.name {
            model.name = Set(name);
        }
        if let Some(designation) = changes.designation {
            model.designation = Set(Some(designation));
        }
        if let Some(photo_url) = changes.photo_url {
            model.photo_url = Set(Some(photo_url));
        }
        if let Some(role) = changes.role {
            model.role = Set(role);
        }
        model.updated_at = Set(Utc::now());
        Ok(model.update(&self.pool).await?)
    }

    async fn list_users(&self) -> AppResult<Vec<users::Model>> {
        Ok(users::Entity::find()
            .order_by_asc(users::Column::Name)
            .all(&self.pool)
            .await?)
    }
}

#[async_trait]
impl EventStore for SeaStore {
    async fn insert_event(&self, event: NewEvent) -> AppResult<events::Model> {
        let model = events::ActiveModel {
            title: Set(event.title),
            description: Set(event.description),
            venue: Set(event.venue),
            latitude: Set(event.latitude),
            longitude: Set(event.longitude),
            starts_at: Set(event.starts_at),
            created_by: Set(event.created_by),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&self.pool)
        .await?;
        Ok(model)
    }

    async fn find_event(&self, id: i64) -> AppResult<Option<events::Model>> {
        Ok(events::Entity::find_by_id(id).one(&self.pool).await?)
    }

    async fn list_events(&self, offset: u64, limit: u64) -> AppResult<(Vec<events::Model>, u64)> {
        let total = events::Entity::find().count(&self.pool).await?;
        let items = events::Entity::find()
            .order_by_desc(events::Column::StartsAt)
            .offset(offset)
            .limit(limit)
            .all(&self.pool)
            .await?;
        Ok((items, total))
    }

    async fn delete_event(&self, id: i64) -> AppResult<bool> {
        let res = events::Entity::delete_by_id(id).exec(&self.pool).await?;
        Ok(res.rows_affected > 0)
    }
}

#[async_trait]
impl AttendanceStore for SeaStore {
    async fn insert_attendance(&self, record: NewAttendanceRecord) -> AppResult<attendance::Model> {
        let model = attendance::ActiveModel {
            event_id: Set(record.event_id),
            user_id: Set(record.user_id),
            timestamp: Set(Utc::now()),
            status: Set(record.status),
            distance_meters: Set(record.distance_meters),
            ..Default::default()
        }
        .insert(&self.pool)
        .await
        .map_err(|e| match e.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => AppError::ValidationError(
                "Attendance already marked for this event".to_string(),
            ),
            _ => e.into(),
        })?;
        Ok(model)
    }

    async fn attendance_for_event(&self, event_id: i64) -> AppResult<Vec<attendance::Model>> {
        Ok(attendance::Entity::find()
            .filter(attendance::Column::EventId.eq(event_id))
            .order_by_asc(attendance::Column::Timestamp)
            .all(&self.pool)
            .await?)
    }

    async fn attendance_for_user(&self, user_id: i64) -> AppResult<Vec<attendance::Model>> {
        Ok(attendance::Entity::find()
            .filter(attendance::Column::UserId.eq(user_id))
            .order_by_desc(attendance::Column::Timestamp)
            .all(&self.pool)
            .await?)
    }

    async fn attendance_between(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> AppResult<Vec<attendance::Model>> {
        Ok(attendance::Entity::find()
            .filter(attendance::Column::Timestamp.between(from, to))
            .order_by_asc(attendance::Column::Timestamp)
            .all(&self.pool)
            .await?)
    }
}

#[async_trait]
impl PointsStore for SeaStore {
    async fn insert_points_entry(&self, entry: NewPointsEntry) -> AppResult<points_entries::Model> {
        let model = points_entries::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(entry.user_id),
            user_name: Set(entry.user_name),
            date: Set(entry.date),
            description: Set(entry.description),
            points: Set(entry.points),
            category: Set(entry.category),
            project_name: Set(entry.project_name),
            event_id: Set(entry.event_id),
            added_by: Set(entry.added_by),
            created_at: Set(Utc::now()),
        }
        .insert(&self.pool)
        .await?;
        Ok(model)
    }

    async fn points_entries_between(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> AppResult<Vec<points_entries::Model>> {
        Ok(points_entries::Entity::find()
            .filter(points_entries::Column::Date.between(from, to))
            .order_by_desc(points_entries::Column::Date)
            .all(&self.pool)
            .await?)
    }

    async fn points_entries_for_user(&self, user_id: i64) -> AppResult<Vec<points_entries::Model>> {
        Ok(points_entries::Entity::find()
            .filter(points_entries::Column::UserId.eq(user_id))
            .order_by_desc(points_entries::Column::Date)
            .all(&self.pool)
            .await?)
    }

    async fn delete_points_entry(&self, id: Uuid) -> AppResult<()> {
        let res = points_entries::Entity::delete_by_id(id)
            .exec(&self.pool)
            .await?;
        if res.rows_affected == 0 {
            return Err(AppError::NotFound(format!("Points entry {id} not found")));
        }
        Ok(())
    }
}

fn monthly_points_active(row: monthly_points::Model) -> monthly_points::ActiveModel {
    monthly_points::ActiveModel {
        id: Set(row.id),
        user_id: Set(row.user_id),
        user_name: Set(row.user_name),
        photo_url: Set(row.photo_url),
        month: Set(row.month),
        year: Set(row.year),
        chair_sec_tre_points: Set(row.chair_sec_tre_points),
        oc_points: Set(row.oc_points),
        meeting_points: Set(row.meeting_points),
        club_project_points: Set(row.club_project_points),
        district_project_points: Set(row.district_project_points),
        multiple_project_points: Set(row.multiple_project_points),
        total_points: Set(row.total_points),
        updated_at: Set(row.updated_at),
    }
}

#[async_trait]
impl MonthlyPointsStore for SeaStore {
    async fn upsert_monthly_points(&self, rows: Vec<monthly_points::Model>) -> AppResult<()> {
        if rows.is_empty() {
            return Ok(());
        }

        let txn = self.pool.begin().await?;
        monthly_points::Entity::insert_many(rows.into_iter().map(monthly_points_active))
            .on_conflict(
                OnConflict::column(monthly_points::Column::Id)
                    .update_columns([
                        monthly_points::Column::UserId,
                        monthly_points::Column::UserName,
                        monthly_points::Column::PhotoUrl,
                        monthly_points::Column::Month,
                        monthly_points::Column::Year,
                        monthly_points::Column::ChairSecTrePoints,
                        monthly_points::Column::OcPoints,
                        monthly_points::Column::MeetingPoints,
                        monthly_points::Column::ClubProjectPoints,
                        monthly_points::Column::DistrictProjectPoints,
                        monthly_points::Column::MultipleProjectPoints,
                        monthly_points::Column::TotalPoints,
                        monthly_points::Column::UpdatedAt,
                    ])
                    .to_owned(),
            )
            .exec(&txn)
            .await?;
        txn.commit().await?;
        Ok(())
    }

    async fn monthly_points_for_period(
        &self,
        month: i32,
        year: i32,
    ) -> AppResult<Vec<monthly_points::Model>> {
        Ok(monthly_points::Entity::find()
            .filter(monthly_points::Column::Month.eq(month))
            .filter(monthly_points::Column::Year.eq(year))
            .order_by_desc(monthly_points::Column::TotalPoints)
            .order_by_asc(monthly_points::Column::UserId)
            .all(&self.pool)
            .await?)
    }

    async fn monthly_points_for_user(&self, user_id: i64) -> AppResult<Vec<monthly_points::Model>> {
        Ok(monthly_points::Entity::find()
            .filter(monthly_points::Column::UserId.eq(user_id))
            .order_by_desc(monthly_points::Column::Year)
            .order_by_desc(monthly_points::Column::Month)
            .all(&self.pool)
            .await?)
    }
}
