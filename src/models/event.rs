use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::entities::{AttendanceStatus, attendance_record_entity as attendance, event_entity as events};
use crate::utils::ReportedPosition;

#[derive(Debug, Clone)]
pub struct NewEvent {
    pub title: String,
    pub description: Option<String>,
    pub venue: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub starts_at: DateTime<Utc>,
    pub created_by: i64,
}

#[derive(Debug, Clone)]
pub struct NewAttendanceRecord {
    pub event_id: i64,
    pub user_id: i64,
    pub status: AttendanceStatus,
    pub distance_meters: f64,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreateEventRequest {
    #[schema(example = "Monthly general meeting")]
    pub title: String,
    pub description: Option<String>,
    #[schema(example = "Town hall")]
    pub venue: Option<String>,
    #[schema(example = 6.9271)]
    pub latitude: Option<f64>,
    #[schema(example = 79.8612)]
    pub longitude: Option<f64>,
    pub starts_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct EventResponse {
    pub id: i64,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub venue: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
    pub starts_at: DateTime<Utc>,
    pub created_by: i64,
    pub created_at: DateTime<Utc>,
}

impl From<events::Model> for EventResponse {
    fn from(event: events::Model) -> Self {
        Self {
            id: event.id,
            title: event.title,
            description: event.description,
            venue: event.venue,
            latitude: event.latitude,
            longitude: event.longitude,
            starts_at: event.starts_at,
            created_by: event.created_by,
            created_at: event.created_at,
        }
    }
}

/// Check-in body: the outcome of the member device's position request.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CheckInRequest {
    pub position: ReportedPosition,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AttendanceRecordResponse {
    pub id: i64,
    pub event_id: i64,
    pub user_id: i64,
    pub timestamp: DateTime<Utc>,
    pub status: AttendanceStatus,
    pub distance_meters: f64,
}

impl From<attendance::Model> for AttendanceRecordResponse {
    fn from(record: attendance::Model) -> Self {
        Self {
            id: record.id,
            event_id: record.event_id,
            user_id: record.user_id,
            timestamp: record.timestamp,
            status: record.status,
            distance_meters: record.distance_meters,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CheckInResponse {
    pub record: AttendanceRecordResponse,
    pub radius_meters: f64,
}
