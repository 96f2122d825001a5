use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

use chrono::Utc;

use crate::entities::monthly_points_entity as monthly_points;
use crate::error::{AppError, AppResult};
use crate::models::{CategoryTotals, MonthlyPointsInput};
use crate::store::{MonthlyPointsStore, PointsStore, UserStore};
use crate::utils::{month_bounds, monthly_points_key, validate_month};

/// Monthly points rollups.
///
/// Rows are keyed by `"{year}-{month}-{user_id}"`, so saving the same period
/// again overwrites the previous figures instead of adding to them.
#[derive(Clone)]
pub struct MonthlyPointsService {
    store: Arc<dyn MonthlyPointsStore>,
    ledger: Arc<dyn PointsStore>,
    users: Arc<dyn UserStore>,
}

impl MonthlyPointsService {
    pub fn new(
        store: Arc<dyn MonthlyPointsStore>,
        ledger: Arc<dyn PointsStore>,
        users: Arc<dyn UserStore>,
    ) -> Self {
        Self {
            store,
            ledger,
            users,
        }
    }

    /// Upserts all rows atomically, every row stamped with the same
    /// `updated_at`. Any invalid row rejects the whole batch.
    pub async fn save_monthly_points_batch(
        &self,
        rows: Vec<MonthlyPointsInput>,
    ) -> AppResult<Vec<monthly_points::Model>> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let mut seen = HashSet::with_capacity(rows.len());
        for row in &rows {
            validate_month(row.month)?;
            let sum = row.totals.sum()?;
            if row.total_points != sum {
                return Err(AppError::ValidationError(format!(
                    "total_points {} for user {} does not match category sum {sum}",
                    row.total_points, row.user_id
                )));
            }
            if !seen.insert(monthly_points_key(row.year, row.month, row.user_id)) {
                return Err(AppError::ValidationError(format!(
                    "Duplicate row for user {} in {}-{}",
                    row.user_id, row.year, row.month
                )));
            }
        }

        let updated_at = Utc::now();
        let models: Vec<monthly_points::Model> = rows
            .into_iter()
            .map(|row| monthly_points::Model {
                id: monthly_points_key(row.year, row.month, row.user_id),
                user_id: row.user_id,
                user_name: row.user_name,
                photo_url: row.photo_url,
                month: row.month,
                year: row.year,
                chair_sec_tre_points: row.totals.chair_sec_tre_points,
                oc_points: row.totals.oc_points,
                meeting_points: row.totals.meeting_points,
                club_project_points: row.totals.club_project_points,
                district_project_points: row.totals.district_project_points,
                multiple_project_points: row.totals.multiple_project_points,
                total_points: row.total_points,
                updated_at,
            })
            .collect();

        self.store.upsert_monthly_points(models.clone()).await?;
        log::info!("Saved {} monthly points rows", models.len());
        Ok(models)
    }

    pub async fn get_monthly_points_for_period(
        &self,
        month: i32,
        year: i32,
    ) -> AppResult<Vec<monthly_points::Model>> {
        validate_month(month)?;
        self.store.monthly_points_for_period(month, year).await
    }

    pub async fn get_monthly_points_for_user(
        &self,
        user_id: i64,
    ) -> AppResult<Vec<monthly_points::Model>> {
        self.store.monthly_points_for_user(user_id).await
    }

    /// Recomputes the period's rollup from the points ledger and saves it.
    pub async fn aggregate_from_ledger(
        &self,
        month: i32,
        year: i32,
    ) -> AppResult<Vec<monthly_points::Model>> {
        let (from, to) = month_bounds(month, year)?;
        let entries = self.ledger.points_entries_between(from, to).await?;

        let mut per_user: BTreeMap<i64, (String, CategoryTotals)> = BTreeMap::new();
        for entry in entries {
            let slot = per_user
                .entry(entry.user_id)
                .or_insert_with(|| (entry.user_name.clone(), CategoryTotals::default()));
            slot.1.add(entry.category, entry.points)?;
        }

        let mut rows = Vec::with_capacity(per_user.len());
        for (user_id, (ledger_name, totals)) in per_user {
            let profile = self.users.find_user(user_id).await?;
            let (user_name, photo_url) = match profile {
                Some(u) => (u.name, u.photo_url.unwrap_or_default()),
                None => (ledger_name, String::new()),
            };
            rows.push(MonthlyPointsInput {
                id: None,
                user_id,
                user_name,
                photo_url,
                month,
                year,
                totals,
                total_points: totals.sum()?,
            });
        }

        log::info!(
            "Aggregated ledger for {year}-{month}: {} members",
            rows.len()
        );
        self.save_monthly_points_batch(rows).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{PointsCategory, UserRole};
    use crate::models::{NewPointsEntry, NewUser};
    use crate::store::MemoryStore;
    use chrono::TimeZone;

    fn service(store: &Arc<MemoryStore>) -> MonthlyPointsService {
        MonthlyPointsService::new(store.clone(), store.clone(), store.clone())
    }

    fn input(user_id: i64, meeting: i64, club_project: i64) -> MonthlyPointsInput {
        let totals = CategoryTotals {
            meeting_points: meeting,
            club_project_points: club_project,
            ..Default::default()
        };
        MonthlyPointsInput {
            id: Some("client-supplied".to_string()),
            user_id,
            user_name: format!("Member {user_id}"),
            photo_url: String::new(),
            month: 5,
            year: 2024,
            totals,
            total_points: totals.sum().unwrap(),
        }
    }

    #[tokio::test]
    async fn test_save_is_idempotent() {
        let store = Arc::new(MemoryStore::new());
        let svc = service(&store);
        let batch = vec![input(1, 10, 5), input(2, 3, 0)];

        svc.save_monthly_points_batch(batch.clone()).await.unwrap();
        svc.save_monthly_points_batch(batch).await.unwrap();

        let mut rows = svc.get_monthly_points_for_period(5, 2024).await.unwrap();
        rows.sort_by_key(|r| r.user_id);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].id, "2024-5-1");
        assert_eq!(rows[0].meeting_points, 10);
        assert_eq!(rows[0].club_project_points, 5);
        assert_eq!(rows[0].total_points, 15);
        assert_eq!(rows[1].id, "2024-5-2");
        assert_eq!(rows[1].total_points, 3);
    }

    #[tokio::test]
    async fn test_resave_overwrites_not_adds() {
        let store = Arc::new(MemoryStore::new());
        let svc = service(&store);

        svc.save_monthly_points_batch(vec![input(1, 10, 5)]).await.unwrap();
        svc.save_monthly_points_batch(vec![input(1, 2, 0)]).await.unwrap();

        let rows = svc.get_monthly_points_for_period(5, 2024).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].meeting_points, 2);
        assert_eq!(rows[0].club_project_points, 0);
        assert_eq!(rows[0].total_points, 2);
    }

    #[tokio::test]
    async fn test_batch_shares_updated_at() {
        let store = Arc::new(MemoryStore::new());
        let saved = service(&store)
            .save_monthly_points_batch(vec![input(1, 1, 0), input(2, 2, 0), input(3, 3, 0)])
            .await
            .unwrap();
        assert!(saved.iter().all(|r| r.updated_at == saved[0].updated_at));
    }

    #[tokio::test]
    async fn test_inconsistent_total_rejects_whole_batch() {
        let store = Arc::new(MemoryStore::new());
        let svc = service(&store);
        let mut bad = input(3, 1, 1);
        bad.total_points = 99;

        let res = svc
            .save_monthly_points_batch(vec![input(1, 10, 5), input(2, 3, 0), bad])
            .await;
        assert!(matches!(res, Err(AppError::ValidationError(_))));
        assert!(svc.get_monthly_points_for_period(5, 2024).await.unwrap().is_empty());
        assert_eq!(store.monthly_batch_count(), 0);
    }

    #[tokio::test]
    async fn test_category_overflow_rejects_batch() {
        let store = Arc::new(MemoryStore::new());
        let svc = service(&store);
        let mut overflowing = input(2, 1, 0);
        overflowing.totals.oc_points = i64::MAX;
        overflowing.total_points = i64::MIN;

        let res = svc
            .save_monthly_points_batch(vec![input(1, 10, 5), overflowing])
            .await;
        assert!(matches!(res, Err(AppError::ValidationError(_))));
        assert!(svc.get_monthly_points_for_period(5, 2024).await.unwrap().is_empty());
        assert_eq!(store.monthly_batch_count(), 0);
    }

    #[tokio::test]
    async fn test_aggregate_overflow_writes_nothing() {
        let store = Arc::new(MemoryStore::new());
        let svc = service(&store);
        let june = Utc.with_ymd_and_hms(2024, 6, 10, 9, 0, 0).unwrap();
        for (category, points) in [(PointsCategory::Oc, i64::MAX), (PointsCategory::Meeting, 1)] {
            store
                .insert_points_entry(NewPointsEntry {
                    user_id: 7,
                    user_name: "Ruwan".to_string(),
                    date: june,
                    description: "entry".to_string(),
                    points,
                    category,
                    project_name: None,
                    event_id: None,
                    added_by: 1,
                })
                .await
                .unwrap();
        }

        let res = svc.aggregate_from_ledger(5, 2024).await;
        assert!(matches!(res, Err(AppError::ValidationError(_))));
        assert_eq!(store.monthly_batch_count(), 0);
    }

    #[test]
    fn test_category_add_overflow() {
        let mut totals = CategoryTotals::default();
        totals.add(PointsCategory::Meeting, i64::MAX).unwrap();
        assert!(totals.add(PointsCategory::Meeting, 1).is_err());
        assert_eq!(totals.meeting_points, i64::MAX);
    }

    #[tokio::test]
    async fn test_duplicate_keys_reject_batch() {
        let store = Arc::new(MemoryStore::new());
        let res = service(&store)
            .save_monthly_points_batch(vec![input(1, 1, 0), input(1, 2, 0)])
            .await;
        assert!(matches!(res, Err(AppError::ValidationError(_))));
    }

    #[tokio::test]
    async fn test_empty_batch_is_noop() {
        let store = Arc::new(MemoryStore::new());
        let saved = service(&store)
            .save_monthly_points_batch(Vec::new())
            .await
            .unwrap();
        assert!(saved.is_empty());
        assert_eq!(store.monthly_batch_count(), 0);
    }

    #[tokio::test]
    async fn test_aggregate_from_ledger() {
        let store = Arc::new(MemoryStore::new());
        let svc = service(&store);
        let profile = store
            .insert_user(NewUser {
                email: "amaya@leoclub.lk".to_string(),
                name: "Amaya".to_string(),
                password_hash: String::new(),
                role: UserRole::Member,
                designation: None,
            })
            .await
            .unwrap();

        let june = Utc.with_ymd_and_hms(2024, 6, 10, 9, 0, 0).unwrap();
        let may = Utc.with_ymd_and_hms(2024, 5, 10, 9, 0, 0).unwrap();
        let ledger = [
            (profile.id, june, PointsCategory::Meeting, 5),
            (profile.id, june, PointsCategory::Meeting, 5),
            (profile.id, june, PointsCategory::Oc, 7),
            (profile.id, may, PointsCategory::Oc, 100),
            (999, june, PointsCategory::DistrictProject, 4),
            (999, june, PointsCategory::ChairSecTre, -1),
        ];
        for (user_id, date, category, points) in ledger {
            store
                .insert_points_entry(NewPointsEntry {
                    user_id,
                    user_name: "From ledger".to_string(),
                    date,
                    description: "entry".to_string(),
                    points,
                    category,
                    project_name: None,
                    event_id: None,
                    added_by: 1,
                })
                .await
                .unwrap();
        }

        svc.aggregate_from_ledger(5, 2024).await.unwrap();
        // running it again leaves the same figures
        let rows = svc.aggregate_from_ledger(5, 2024).await.unwrap();
        assert_eq!(rows.len(), 2);

        let stored = svc.get_monthly_points_for_period(5, 2024).await.unwrap();
        assert_eq!(stored.len(), 2);

        let amaya = stored.iter().find(|r| r.user_id == profile.id).unwrap();
        assert_eq!(amaya.user_name, "Amaya");
        assert_eq!(amaya.meeting_points, 10);
        assert_eq!(amaya.oc_points, 7);
        assert_eq!(amaya.total_points, 17);

        let unknown = stored.iter().find(|r| r.user_id == 999).unwrap();
        assert_eq!(unknown.user_name, "From ledger");
        assert_eq!(unknown.district_project_points, 4);
        assert_eq!(unknown.chair_sec_tre_points, -1);
        assert_eq!(unknown.total_points, 3);
    }
}
