//! In-memory store used by tests and local experiments.

use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::DbErr;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{AttendanceStore, EventStore, MonthlyPointsStore, PointsStore, UserStore};
use crate::entities::{
    AttendanceStatus, attendance_record_entity as attendance, event_entity as events,
    monthly_points_entity as monthly_points, points_entry_entity as points_entries,
    user_entity as users,
};
use crate::error::{AppError, AppResult};
use crate::models::{NewAttendanceRecord, NewEvent, NewPointsEntry, NewUser, ProfileChanges};
use crate::utils::monthly_points_key;

#[derive(Default)]
pub struct MemoryStore {
    next_id: AtomicI64,
    users: RwLock<HashMap<i64, users::Model>>,
    events: RwLock<HashMap<i64, events::Model>>,
    attendance: RwLock<Vec<attendance::Model>>,
    points_entries: RwLock<HashMap<Uuid, points_entries::Model>>,
    monthly_points: RwLock<HashMap<String, monthly_points::Model>>,
    monthly_batches: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn allocate_id(&self) -> i64 {
        self.next_id.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Number of monthly batches that reached the store.
    pub fn monthly_batch_count(&self) -> usize {
        self.monthly_batches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn find_user(&self, id: i64) -> AppResult<Option<users::Model>> {
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> AppResult<Option<users::Model>> {
        Ok(self
            .users
            .read()
            .await
            .values()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn insert_user(&self, user: NewUser) -> AppResult<users::Model> {
        let mut map = self.users.write().await;
        if map.values().any(|u| u.email == user.email) {
            return Err(DbErr::Custom(format!("duplicate email {}", user.email)).into());
        }
        let now = Utc::now();
        let model = users::Model {
            id: self.allocate_id(),
            email: user.email,
            name: user.name,
            password_hash: user.password_hash,
            role: user.role,
            designation: user.designation,
            photo_url: None,
            created_at: now,
            updated_at: now,
        };
        map.insert(model.id, model.clone());
        Ok(model)
    }

    async fn update_user(&self, id: i64, changes: ProfileChanges) -> AppResult<users::Model> {
        let mut map = self.users.write().await;
        let user = map
            .get_mut(&id)
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;
        if let Some(name) = changes.name {
            user.name = name;
        }
        if let Some(designation) = changes.designation {
            user.designation = Some(designation);
        }
        if let Some(photo_url) = changes.photo_url {
            user.photo_url = Some(photo_url);
        }
        if let Some(role) = changes.role {
            user.role = role;
        }
        user.updated_at = Utc::now();
        Ok(user.clone())
    }

    async fn list_users(&self) -> AppResult<Vec<users::Model>> {
        let mut all: Vec<_> = self.users.read().await.values().cloned().collect();
        all.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(all)
    }
}

#[async_trait]
impl EventStore for MemoryStore {
    async fn insert_event(&self, event: NewEvent) -> AppResult<events::Model> {
        let model = events::Model {
            id: self.allocate_id(),
            title: event.title,
            description: event.description,
            venue: event.venue,
            latitude: event.latitude,
            longitude: event.longitude,
            starts_at: event.starts_at,
            created_by: event.created_by,
            created_at: Utc::now(),
        };
        self.events.write().await.insert(model.id, model.clone());
        Ok(model)
    }

    async fn find_event(&self, id: i64) -> AppResult<Option<events::Model>> {
        Ok(self.events.read().await.get(&id).cloned())
    }

    async fn list_events(&self, offset: u64, limit: u64) -> AppResult<(Vec<events::Model>, u64)> {
        let mut all: Vec<_> = self.events.read().await.values().cloned().collect();
        all.sort_by(|a, b| b.starts_at.cmp(&a.starts_at));
        let total = all.len() as u64;
        let page = all
            .into_iter()
            .skip(offset as usize)
            .take(limit as usize)
            .collect();
        Ok((page, total))
    }

    async fn delete_event(&self, id: i64) -> AppResult<bool> {
        Ok(self.events.write().await.remove(&id).is_some())
    }
}

#[async_trait]
impl AttendanceStore for MemoryStore {
    async fn insert_attendance(&self, record: NewAttendanceRecord) -> AppResult<attendance::Model> {
        let mut records = self.attendance.write().await;
        if record.status == AttendanceStatus::Present
            && records.iter().any(|r| {
                r.event_id == record.event_id
                    && r.user_id == record.user_id
                    && r.status == AttendanceStatus::Present
            })
        {
            return Err(AppError::ValidationError(
                "Attendance already marked for this event".to_string(),
            ));
        }
        let model = attendance::Model {
            id: self.allocate_id(),
            event_id: record.event_id,
            user_id: record.user_id,
            timestamp: Utc::now(),
            status: record.status,
            distance_meters: record.distance_meters,
        };
        records.push(model.clone());
        Ok(model)
    }

    async fn attendance_for_event(&self, event_id: i64) -> AppResult<Vec<attendance::Model>> {
        Ok(self
            .attendance
            .read()
            .await
            .iter()
            .filter(|r| r.event_id == event_id)
            .cloned()
            .collect())
    }

    async fn attendance_for_user(&self, user_id: i64) -> AppResult<Vec<attendance::Model>> {
        let mut records: Vec<_> = self
            .attendance
            .read()
            .await
            .iter()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect();
        records.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        Ok(records)
    }

    async fn attendance_between(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> AppResult<Vec<attendance::Model>> {
        Ok(self
            .attendance
            .read()
            .await
            .iter()
            .filter(|r| r.timestamp >= from && r.timestamp <= to)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl PointsStore for MemoryStore {
    async fn insert_points_entry(&self, entry: NewPointsEntry) -> AppResult<points_entries::Model> {
        let model = points_entries::Model {
            id: Uuid::new_v4(),
            user_id: entry.user_id,
            user_name: entry.user_name,
            date: entry.date,
            description: entry.description,
            points: entry.points,
            category: entry.category,
            project_name: entry.project_name,
            event_id: entry.event_id,
            added_by: entry.added_by,
            created_at: Utc::now(),
        };
        self.points_entries
            .write()
            .await
            .insert(model.id, model.clone());
        Ok(model)
    }

    async fn points_entries_between(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> AppResult<Vec<points_entries::Model>> {
        let mut entries: Vec<_> = self
            .points_entries
            .read()
            .await
            .values()
            .filter(|e| e.date >= from && e.date <= to)
            .cloned()
            .collect();
        entries.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(entries)
    }

    async fn points_entries_for_user(&self, user_id: i64) -> AppResult<Vec<points_entries::Model>> {
        let mut entries: Vec<_> = self
            .points_entries
            .read()
            .await
            .values()
            .filter(|e| e.user_id == user_id)
            .cloned()
            .collect();
        entries.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(entries)
    }

    async fn delete_points_entry(&self, id: Uuid) -> AppResult<()> {
        match self.points_entries.write().await.remove(&id) {
            Some(_) => Ok(()),
            None => Err(AppError::NotFound(format!("Points entry {id} not found"))),
        }
    }
}

#[async_trait]
impl MonthlyPointsStore for MemoryStore {
    async fn upsert_monthly_points(&self, rows: Vec<monthly_points::Model>) -> AppResult<()> {
        self.monthly_batches.fetch_add(1, Ordering::SeqCst);

        // Same constraints the table enforces; one bad row rejects the batch.
        if let Some(bad) = rows.iter().find(|r| {
            !(0..=11).contains(&r.month) || r.id != monthly_points_key(r.year, r.month, r.user_id)
        }) {
            return Err(DbErr::Custom(format!("monthly_points row {} rejected", bad.id)).into());
        }

        let mut map = self.monthly_points.write().await;
        for row in rows {
            map.insert(row.id.clone(), row);
        }
        Ok(())
    }

    async fn monthly_points_for_period(
        &self,
        month: i32,
        year: i32,
    ) -> AppResult<Vec<monthly_points::Model>> {
        let mut rows: Vec<_> = self
            .monthly_points
            .read()
            .await
            .values()
            .filter(|r| r.month == month && r.year == year)
            .cloned()
            .collect();
        rows.sort_by(|a, b| {
            b.total_points
                .cmp(&a.total_points)
                .then(a.user_id.cmp(&b.user_id))
        });
        Ok(rows)
    }

    async fn monthly_points_for_user(&self, user_id: i64) -> AppResult<Vec<monthly_points::Model>> {
        let mut rows: Vec<_> = self
            .monthly_points
            .read()
            .await
            .values()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| (b.year, b.month).cmp(&(a.year, a.month)));
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(user_id: i64, month: i32, total: i64) -> monthly_points::Model {
        monthly_points::Model {
            id: monthly_points_key(2024, month, user_id),
            user_id,
            user_name: format!("user {user_id}"),
            photo_url: String::new(),
            month,
            year: 2024,
            chair_sec_tre_points: 0,
            oc_points: 0,
            meeting_points: total,
            club_project_points: 0,
            district_project_points: 0,
            multiple_project_points: 0,
            total_points: total,
            updated_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_rejected_batch_writes_nothing() {
        let store = MemoryStore::new();
        let mut bad = row(3, 5, 1);
        bad.id = "not-a-key".to_string();

        let res = store
            .upsert_monthly_points(vec![row(1, 5, 10), row(2, 5, 20), bad])
            .await;
        assert!(matches!(res, Err(AppError::DatabaseError(_))));
        assert!(store.monthly_points_for_period(5, 2024).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_upsert_overwrites_by_id() {
        let store = MemoryStore::new();
        store.upsert_monthly_points(vec![row(1, 5, 10)]).await.unwrap();
        store.upsert_monthly_points(vec![row(1, 5, 4)]).await.unwrap();

        let rows = store.monthly_points_for_period(5, 2024).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].total_points, 4);
        assert_eq!(store.monthly_batch_count(), 2);
    }

    #[tokio::test]
    async fn test_concurrent_present_check_ins_keep_one() {
        let store = std::sync::Arc::new(MemoryStore::new());
        let record = |status| NewAttendanceRecord {
            event_id: 1,
            user_id: 7,
            status,
            distance_meters: 12.0,
        };

        let (a, b) = tokio::join!(
            store.insert_attendance(record(AttendanceStatus::Present)),
            store.insert_attendance(record(AttendanceStatus::Present)),
        );
        assert_eq!([&a, &b].iter().filter(|r| r.is_ok()).count(), 1);
        assert!(matches!(
            a.and(b),
            Err(AppError::ValidationError(_))
        ));

        // absent attempts are kept as history
        store
            .insert_attendance(record(AttendanceStatus::Absent))
            .await
            .unwrap();
        let present = store
            .attendance_for_event(1)
            .await
            .unwrap()
            .iter()
            .filter(|r| r.status == AttendanceStatus::Present)
            .count();
        assert_eq!(present, 1);
    }

    #[tokio::test]
    async fn test_delete_missing_points_entry_is_not_found() {
        let store = MemoryStore::new();
        let res = store.delete_points_entry(Uuid::new_v4()).await;
        assert!(matches!(res, Err(AppError::NotFound(_))));
    }
}
