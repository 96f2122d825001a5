use std::sync::Arc;

use crate::entities::{AttendanceStatus, attendance_record_entity as attendance};
use crate::error::{AppError, AppResult};
use crate::models::NewAttendanceRecord;
use crate::store::{AttendanceStore, EventStore};
use crate::utils::{GeolocationProvider, PositionOptions, distance_meters, is_within_attendance_range};

/// Geofenced event check-ins.
#[derive(Clone)]
pub struct AttendanceService {
    events: Arc<dyn EventStore>,
    attendance: Arc<dyn AttendanceStore>,
    position_options: PositionOptions,
}

impl AttendanceService {
    pub fn new(events: Arc<dyn EventStore>, attendance: Arc<dyn AttendanceStore>) -> Self {
        Self {
            events,
            attendance,
            position_options: PositionOptions::default(),
        }
    }

    /// Acquires the member's position once and records present or absent
    /// depending on the distance to the venue. A failed position request
    /// writes nothing.
    pub async fn check_in(
        &self,
        event_id: i64,
        user_id: i64,
        provider: &dyn GeolocationProvider,
    ) -> AppResult<attendance::Model> {
        let event = self
            .events
            .find_event(event_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Event not found".to_string()))?;
        let (venue_lat, venue_lon) = event.venue_location().ok_or_else(|| {
            AppError::ValidationError("Event has no venue location".to_string())
        })?;

        let already_present = self
            .attendance
            .attendance_for_event(event_id)
            .await?
            .iter()
            .any(|r| r.user_id == user_id && r.status == AttendanceStatus::Present);
        if already_present {
            return Err(AppError::ValidationError(
                "Attendance already marked for this event".to_string(),
            ));
        }

        let position = provider
            .get_current_position(&self.position_options)
            .await?;
        let distance = distance_meters(
            position.latitude,
            position.longitude,
            venue_lat,
            venue_lon,
        );
        let status = if is_within_attendance_range(distance) {
            AttendanceStatus::Present
        } else {
            AttendanceStatus::Absent
        };

        let record = self
            .attendance
            .insert_attendance(NewAttendanceRecord {
                event_id,
                user_id,
                status,
                distance_meters: distance,
            })
            .await?;
        log::info!(
            "Check-in user={user_id} event={event_id} status={status} distance={distance:.1}m accuracy={:.1}m",
            position.accuracy
        );
        Ok(record)
    }

    pub async fn attendance_for_event(&self, event_id: i64) -> AppResult<Vec<attendance::Model>> {
        self.attendance.attendance_for_event(event_id).await
    }

    pub async fn attendance_for_user(&self, user_id: i64) -> AppResult<Vec<attendance::Model>> {
        self.attendance.attendance_for_user(user_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NewEvent;
    use crate::store::MemoryStore;
    use crate::utils::{GeolocationError, ReportedPosition};
    use chrono::Utc;

    const VENUE: (f64, f64) = (6.9271, 79.8612);

    async fn setup(with_venue: bool) -> (Arc<MemoryStore>, AttendanceService, i64) {
        let store = Arc::new(MemoryStore::new());
        let event = store
            .insert_event(NewEvent {
                title: "General meeting".to_string(),
                description: None,
                venue: Some("Town hall".to_string()),
                latitude: with_venue.then_some(VENUE.0),
                longitude: with_venue.then_some(VENUE.1),
                starts_at: Utc::now(),
                created_by: 1,
            })
            .await
            .unwrap();
        let service = AttendanceService::new(store.clone(), store.clone());
        (store, service, event.id)
    }

    fn fix(latitude: f64, longitude: f64) -> ReportedPosition {
        ReportedPosition::Fix {
            latitude,
            longitude,
            accuracy: 10.0,
            captured_at: None,
        }
    }

    #[tokio::test]
    async fn test_check_in_near_venue_is_present() {
        let (_, service, event_id) = setup(true).await;
        // ~100 m north of the venue
        let record = service
            .check_in(event_id, 5, &fix(VENUE.0 + 0.0009, VENUE.1))
            .await
            .unwrap();
        assert_eq!(record.status, AttendanceStatus::Present);
        assert!(record.distance_meters > 90.0 && record.distance_meters < 110.0);
    }

    #[tokio::test]
    async fn test_check_in_far_from_venue_is_absent() {
        let (_, service, event_id) = setup(true).await;
        // ~2 km north of the venue
        let record = service
            .check_in(event_id, 5, &fix(VENUE.0 + 0.018, VENUE.1))
            .await
            .unwrap();
        assert_eq!(record.status, AttendanceStatus::Absent);

        // an absent attempt can be retried
        let retry = service.check_in(event_id, 5, &fix(VENUE.0, VENUE.1)).await.unwrap();
        assert_eq!(retry.status, AttendanceStatus::Present);
        assert_eq!(service.attendance_for_user(5).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_geolocation_failure_writes_nothing() {
        let (_, service, event_id) = setup(true).await;
        let res = service
            .check_in(event_id, 5, &ReportedPosition::Error { code: 1 })
            .await;
        assert!(matches!(
            res,
            Err(AppError::Geolocation(GeolocationError::PermissionDenied))
        ));
        assert!(service.attendance_for_event(event_id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_second_present_check_in_is_rejected() {
        let (_, service, event_id) = setup(true).await;
        service.check_in(event_id, 5, &fix(VENUE.0, VENUE.1)).await.unwrap();
        let res = service.check_in(event_id, 5, &fix(VENUE.0, VENUE.1)).await;
        assert!(matches!(res, Err(AppError::ValidationError(_))));
        assert_eq!(service.attendance_for_event(event_id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_event_without_venue_or_missing_event() {
        let (_, service, event_id) = setup(false).await;
        assert!(matches!(
            service.check_in(event_id, 5, &fix(VENUE.0, VENUE.1)).await,
            Err(AppError::ValidationError(_))
        ));
        assert!(matches!(
            service.check_in(event_id + 100, 5, &fix(VENUE.0, VENUE.1)).await,
            Err(AppError::NotFound(_))
        ));
    }
}
