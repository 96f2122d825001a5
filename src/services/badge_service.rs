use std::collections::HashMap;
use std::sync::Arc;

use crate::entities::{AttendanceStatus, attendance_record_entity as attendance};
use crate::error::{AppError, AppResult};
use crate::models::Badge;
use crate::store::{AttendanceStore, UserStore};
use crate::utils::{calculate_badge_ids, month_bounds};

#[derive(Clone)]
pub struct BadgeService {
    users: Arc<dyn UserStore>,
    attendance: Arc<dyn AttendanceStore>,
}

impl BadgeService {
    pub fn new(users: Arc<dyn UserStore>, attendance: Arc<dyn AttendanceStore>) -> Self {
        Self { users, attendance }
    }

    async fn present_in_period(&self, month: i32, year: i32) -> AppResult<Vec<attendance::Model>> {
        let (from, to) = month_bounds(month, year)?;
        Ok(self
            .attendance
            .attendance_between(from, to)
            .await?
            .into_iter()
            .filter(|r| r.status == AttendanceStatus::Present)
            .collect())
    }

    /// Members with the highest present count in the period; ties all win.
    /// Empty when nobody attended anything.
    pub async fn top_volunteer_ids(&self, month: i32, year: i32) -> AppResult<Vec<i64>> {
        let records = self.present_in_period(month, year).await?;
        Ok(top_by_count(&records))
    }

    /// Badges for one member, using that member's present check-ins in the
    /// period for the attendance rule.
    pub async fn badges_for_user(&self, user_id: i64, month: i32, year: i32) -> AppResult<Vec<Badge>> {
        let user = self
            .users
            .find_user(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        let period = self.present_in_period(month, year).await?;
        let is_top_volunteer = top_by_count(&period).contains(&user_id);
        let own: Vec<attendance::Model> = period.into_iter().filter(|r| r.user_id == user_id).collect();

        Ok(calculate_badge_ids(&user, &own, is_top_volunteer)
            .into_iter()
            .map(|id| id.badge())
            .collect())
    }
}

fn top_by_count(records: &[attendance::Model]) -> Vec<i64> {
    let mut counts: HashMap<i64, usize> = HashMap::new();
    for r in records {
        *counts.entry(r.user_id).or_default() += 1;
    }
    let Some(max) = counts.values().copied().max() else {
        return Vec::new();
    };
    let mut top: Vec<i64> = counts
        .into_iter()
        .filter(|(_, c)| *c == max)
        .map(|(id, _)| id)
        .collect();
    top.sort_unstable();
    top
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::UserRole;
    use crate::models::{BadgeId, NewAttendanceRecord, NewUser};
    use crate::store::MemoryStore;
    use crate::utils::period_of;
    use chrono::Utc;

    async fn member(store: &MemoryStore, email: &str, designation: Option<&str>) -> i64 {
        store
            .insert_user(NewUser {
                email: email.to_string(),
                name: email.to_string(),
                password_hash: String::new(),
                role: UserRole::Member,
                designation: designation.map(str::to_string),
            })
            .await
            .unwrap()
            .id
    }

    async fn attend(store: &MemoryStore, user_id: i64, times: usize, status: AttendanceStatus) {
        for event_id in 0..times {
            store
                .insert_attendance(NewAttendanceRecord {
                    event_id: event_id as i64,
                    user_id,
                    status,
                    distance_meters: 5.0,
                })
                .await
                .unwrap();
        }
    }

    fn this_month() -> (i32, i32) {
        period_of(Utc::now())
    }

    #[tokio::test]
    async fn test_top_volunteers_include_ties() {
        let store = Arc::new(MemoryStore::new());
        let a = member(&store, "a@leo.lk", None).await;
        let b = member(&store, "b@leo.lk", None).await;
        let c = member(&store, "c@leo.lk", None).await;
        attend(&store, a, 3, AttendanceStatus::Present).await;
        attend(&store, b, 3, AttendanceStatus::Present).await;
        attend(&store, c, 2, AttendanceStatus::Present).await;
        attend(&store, c, 4, AttendanceStatus::Absent).await;

        let service = BadgeService::new(store.clone(), store.clone());
        let (month, year) = this_month();
        let mut expected = vec![a, b];
        expected.sort_unstable();
        assert_eq!(service.top_volunteer_ids(month, year).await.unwrap(), expected);
    }

    #[tokio::test]
    async fn test_no_attendance_means_no_top_volunteer() {
        let store = Arc::new(MemoryStore::new());
        let service = BadgeService::new(store.clone(), store.clone());
        let (month, year) = this_month();
        assert!(service.top_volunteer_ids(month, year).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_badges_for_user() {
        let store = Arc::new(MemoryStore::new());
        let leader = member(&store, "p@leo.lk", Some("Club President")).await;
        let other = member(&store, "o@leo.lk", None).await;
        attend(&store, leader, 3, AttendanceStatus::Present).await;
        attend(&store, other, 1, AttendanceStatus::Present).await;

        let service = BadgeService::new(store.clone(), store.clone());
        let (month, year) = this_month();

        let badges: Vec<BadgeId> = service
            .badges_for_user(leader, month, year)
            .await
            .unwrap()
            .into_iter()
            .map(|b| b.id)
            .collect();
        assert_eq!(badges.len(), 3);
        assert!(badges.contains(&BadgeId::ClubLeader));
        assert!(badges.contains(&BadgeId::TopVolunteer));
        assert!(badges.contains(&BadgeId::ActiveLeo));

        assert!(service.badges_for_user(other, month, year).await.unwrap().is_empty());
        assert!(matches!(
            service.badges_for_user(4242, month, year).await,
            Err(AppError::NotFound(_))
        ));
    }
}
