use std::sync::Arc;

use uuid::Uuid;

use crate::entities::points_entry_entity as points_entries;
use crate::error::{AppError, AppResult};
use crate::models::NewPointsEntry;
use crate::store::PointsStore;
use crate::utils::month_bounds;

/// Points ledger: one entry per award or correction.
#[derive(Clone)]
pub struct PointsService {
    store: Arc<dyn PointsStore>,
}

impl PointsService {
    pub fn new(store: Arc<dyn PointsStore>) -> Self {
        Self { store }
    }

    /// Records a ledger entry and returns its id. Blank optional fields are
    /// dropped rather than stored empty.
    pub async fn add_entry(&self, mut entry: NewPointsEntry) -> AppResult<Uuid> {
        if entry.description.trim().is_empty() {
            return Err(AppError::ValidationError(
                "Description is required".to_string(),
            ));
        }
        entry.project_name = entry
            .project_name
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty());

        let saved = self.store.insert_points_entry(entry).await?;
        log::info!(
            "Points entry {} added: user={} category={} points={}",
            saved.id,
            saved.user_id,
            saved.category,
            saved.points
        );
        Ok(saved.id)
    }

    /// Entries dated inside the zero-indexed month, newest first.
    pub async fn get_for_period(
        &self,
        month: i32,
        year: i32,
    ) -> AppResult<Vec<points_entries::Model>> {
        let (from, to) = month_bounds(month, year)?;
        self.store.points_entries_between(from, to).await
    }

    pub async fn get_for_user(&self, user_id: i64) -> AppResult<Vec<points_entries::Model>> {
        self.store.points_entries_for_user(user_id).await
    }

    pub async fn delete_entry(&self, id: Uuid) -> AppResult<()> {
        self.store.delete_points_entry(id).await?;
        log::info!("Points entry {id} deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::PointsCategory;
    use crate::store::MemoryStore;
    use chrono::{DateTime, TimeZone, Utc};

    fn entry(date: DateTime<Utc>, points: i64) -> NewPointsEntry {
        NewPointsEntry {
            user_id: 7,
            user_name: "Kasun".to_string(),
            date,
            description: "Beach cleanup".to_string(),
            points,
            category: PointsCategory::ClubProject,
            project_name: None,
            event_id: None,
            added_by: 1,
        }
    }

    #[tokio::test]
    async fn test_add_entry_drops_blank_project_name() {
        let store = Arc::new(MemoryStore::new());
        let service = PointsService::new(store.clone());

        let mut e = entry(Utc::now(), 5);
        e.project_name = Some("   ".to_string());
        service.add_entry(e).await.unwrap();

        let saved = service.get_for_user(7).await.unwrap();
        assert_eq!(saved.len(), 1);
        assert_eq!(saved[0].project_name, None);
        assert_eq!(saved[0].event_id, None);
    }

    #[tokio::test]
    async fn test_add_entry_keeps_present_optionals_and_negative_points() {
        let service = PointsService::new(Arc::new(MemoryStore::new()));
        let mut e = entry(Utc::now(), -3);
        e.project_name = Some(" Blood drive ".to_string());
        e.event_id = Some(12);
        let id = service.add_entry(e).await.unwrap();

        let saved = service.get_for_user(7).await.unwrap();
        assert_eq!(saved[0].id, id);
        assert_eq!(saved[0].points, -3);
        assert_eq!(saved[0].project_name.as_deref(), Some("Blood drive"));
        assert_eq!(saved[0].event_id, Some(12));
    }

    #[tokio::test]
    async fn test_get_for_period_bounds_and_order() {
        let service = PointsService::new(Arc::new(MemoryStore::new()));
        let before = Utc.with_ymd_and_hms(2024, 5, 31, 23, 59, 59).unwrap();
        let first = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
        let mid = Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap();
        let last = Utc.with_ymd_and_hms(2024, 6, 30, 23, 59, 59).unwrap();
        let after = Utc.with_ymd_and_hms(2024, 7, 1, 0, 0, 0).unwrap();
        for d in [before, mid, last, first, after] {
            service.add_entry(entry(d, 1)).await.unwrap();
        }

        let june = service.get_for_period(5, 2024).await.unwrap();
        let dates: Vec<_> = june.iter().map(|e| e.date).collect();
        assert_eq!(dates, vec![last, mid, first]);
    }

    #[tokio::test]
    async fn test_get_for_period_rejects_bad_month() {
        let service = PointsService::new(Arc::new(MemoryStore::new()));
        assert!(matches!(
            service.get_for_period(12, 2024).await,
            Err(AppError::ValidationError(_))
        ));
    }

    #[tokio::test]
    async fn test_delete_entry() {
        let service = PointsService::new(Arc::new(MemoryStore::new()));
        let id = service.add_entry(entry(Utc::now(), 2)).await.unwrap();

        service.delete_entry(id).await.unwrap();
        assert!(service.get_for_user(7).await.unwrap().is_empty());
        assert!(matches!(
            service.delete_entry(id).await,
            Err(AppError::NotFound(_))
        ));
    }
}
