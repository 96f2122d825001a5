//! Attendance geofencing.
//!
//! Distances are great-circle distances on a spherical Earth. A member counts
//! as present when their reported position is within
//! [`ATTENDANCE_RADIUS_METERS`] of the event venue, boundary included.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use utoipa::ToSchema;

/// Mean Earth radius in meters.
pub const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

/// Present/absent cutoff for event check-ins.
pub const ATTENDANCE_RADIUS_METERS: f64 = 500.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct GeoCoordinates {
    pub latitude: f64,
    pub longitude: f64,
    /// Accuracy radius reported by the device, in meters.
    pub accuracy: f64,
}

/// Haversine distance in meters between two points given in degrees.
pub fn distance_meters(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let phi1 = lat1.to_radians();
    let phi2 = lat2.to_radians();
    let d_phi = (lat2 - lat1).to_radians();
    let d_lambda = (lon2 - lon1).to_radians();

    let a = (d_phi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (d_lambda / 2.0).sin().powi(2);
    // rounding can leave `a` just outside [0, 1] near antipodes
    let a = a.clamp(0.0, 1.0);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_METERS * c
}

pub fn is_within_range(distance: f64, threshold: f64) -> bool {
    distance <= threshold
}

/// [`is_within_range`] against the attendance radius.
pub fn is_within_attendance_range(distance: f64) -> bool {
    is_within_range(distance, ATTENDANCE_RADIUS_METERS)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GeolocationError {
    #[error("Location permission denied. Please enable location access to mark attendance.")]
    PermissionDenied,
    #[error("Location information is unavailable. Please check your device's location settings.")]
    PositionUnavailable,
    #[error("The request to get your location timed out. Please try again.")]
    Timeout,
    #[error("An unknown error occurred while getting your location.")]
    Unknown,
}

impl GeolocationError {
    /// Maps the numeric codes browsers report for a failed position request.
    pub fn from_platform_code(code: u16) -> Self {
        match code {
            1 => GeolocationError::PermissionDenied,
            2 => GeolocationError::PositionUnavailable,
            3 => GeolocationError::Timeout,
            _ => GeolocationError::Unknown,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            GeolocationError::PermissionDenied => "GEOLOCATION_PERMISSION_DENIED",
            GeolocationError::PositionUnavailable => "GEOLOCATION_POSITION_UNAVAILABLE",
            GeolocationError::Timeout => "GEOLOCATION_TIMEOUT",
            GeolocationError::Unknown => "GEOLOCATION_UNKNOWN",
        }
    }
}

/// Options for a single position request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PositionOptions {
    pub high_accuracy: bool,
    pub timeout: Duration,
    /// Oldest cached fix the caller will accept.
    pub maximum_age: Duration,
}

impl Default for PositionOptions {
    fn default() -> Self {
        Self {
            high_accuracy: true,
            timeout: Duration::from_secs(15),
            maximum_age: Duration::from_secs(60),
        }
    }
}

#[async_trait]
pub trait GeolocationProvider: Send + Sync {
    async fn get_current_position(
        &self,
        options: &PositionOptions,
    ) -> Result<GeoCoordinates, GeolocationError>;
}

/// What the member's device reported for its one position request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ReportedPosition {
    Fix {
        latitude: f64,
        longitude: f64,
        accuracy: f64,
        /// When the device obtained the fix; checked against `maximum_age`.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        captured_at: Option<DateTime<Utc>>,
    },
    Error {
        code: u16,
    },
}

#[async_trait]
impl GeolocationProvider for ReportedPosition {
    async fn get_current_position(
        &self,
        options: &PositionOptions,
    ) -> Result<GeoCoordinates, GeolocationError> {
        match self {
            ReportedPosition::Error { code } => Err(GeolocationError::from_platform_code(*code)),
            ReportedPosition::Fix {
                latitude,
                longitude,
                accuracy,
                captured_at,
            } => {
                let valid = latitude.is_finite()
                    && longitude.is_finite()
                    && (-90.0..=90.0).contains(latitude)
                    && (-180.0..=180.0).contains(longitude);
                if !valid {
                    return Err(GeolocationError::PositionUnavailable);
                }
                if let Some(captured_at) = captured_at
                    && let Ok(age) = Utc::now().signed_duration_since(*captured_at).to_std()
                    && age > options.maximum_age
                {
                    return Err(GeolocationError::PositionUnavailable);
                }
                Ok(GeoCoordinates {
                    latitude: *latitude,
                    longitude: *longitude,
                    accuracy: accuracy.max(0.0),
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance_identical_points_is_zero() {
        assert_eq!(distance_meters(0.0, 0.0, 0.0, 0.0), 0.0);
        assert_eq!(distance_meters(6.9271, 79.8612, 6.9271, 79.8612), 0.0);
        assert_eq!(distance_meters(-33.8688, 151.2093, -33.8688, 151.2093), 0.0);
    }

    #[test]
    fn test_distance_is_symmetric() {
        let a = (6.9271, 79.8612);
        let b = (7.2906, 80.6337);
        let ab = distance_meters(a.0, a.1, b.0, b.1);
        let ba = distance_meters(b.0, b.1, a.0, a.1);
        assert!((ab - ba).abs() < 1e-6);
        assert!(ab > 0.0);
    }

    #[test]
    fn test_one_degree_longitude_at_equator() {
        let d = distance_meters(0.0, 0.0, 0.0, 1.0);
        assert!((d - 111_195.0).abs() <= 50.0, "got {d}");
    }

    #[test]
    fn test_distance_finite_near_antipodes() {
        let half_circumference = std::f64::consts::PI * EARTH_RADIUS_METERS;
        let mut lat = -45.0;
        while lat <= 45.0 {
            for (lon1, lon2) in [(0.0, 180.0), (10.3, -169.7)] {
                let d = distance_meters(lat, lon1, -lat, lon2);
                assert!(d.is_finite(), "lat {lat}: got {d}");
                assert!(d >= 0.0 && d <= half_circumference + 1e-6, "lat {lat}: got {d}");
            }
            lat += 0.5;
        }
        let poles = distance_meters(90.0, 0.0, -90.0, 0.0);
        assert!((poles - half_circumference).abs() < 1.0, "got {poles}");
    }

    #[test]
    fn test_range_boundary_is_inclusive() {
        assert!(is_within_range(499.0, 500.0));
        assert!(is_within_range(500.0, 500.0));
        assert!(!is_within_range(501.0, 500.0));
        assert!(is_within_attendance_range(ATTENDANCE_RADIUS_METERS));
    }

    #[test]
    fn test_platform_codes() {
        assert_eq!(
            GeolocationError::from_platform_code(1),
            GeolocationError::PermissionDenied
        );
        assert_eq!(
            GeolocationError::from_platform_code(2),
            GeolocationError::PositionUnavailable
        );
        assert_eq!(
            GeolocationError::from_platform_code(3),
            GeolocationError::Timeout
        );
        assert_eq!(
            GeolocationError::from_platform_code(42),
            GeolocationError::Unknown
        );
    }

    #[test]
    fn test_error_messages_are_distinct() {
        let all = [
            GeolocationError::PermissionDenied,
            GeolocationError::PositionUnavailable,
            GeolocationError::Timeout,
            GeolocationError::Unknown,
        ];
        for (i, a) in all.iter().enumerate() {
            for b in &all[i + 1..] {
                assert_ne!(a.to_string(), b.to_string());
                assert_ne!(a.code(), b.code());
            }
        }
    }

    #[test]
    fn test_default_position_options() {
        let options = PositionOptions::default();
        assert_eq!(options.timeout, Duration::from_secs(15));
        assert_eq!(options.maximum_age, Duration::from_secs(60));
    }

    #[tokio::test]
    async fn test_reported_fix() {
        let reported = ReportedPosition::Fix {
            latitude: 6.9,
            longitude: 79.8,
            accuracy: 12.0,
            captured_at: Some(Utc::now()),
        };
        let got = reported
            .get_current_position(&PositionOptions::default())
            .await
            .unwrap();
        assert_eq!(
            got,
            GeoCoordinates {
                latitude: 6.9,
                longitude: 79.8,
                accuracy: 12.0,
            }
        );
    }

    #[tokio::test]
    async fn test_reported_fix_rejects_stale_or_invalid() {
        let options = PositionOptions::default();
        let stale = ReportedPosition::Fix {
            latitude: 6.9,
            longitude: 79.8,
            accuracy: 12.0,
            captured_at: Some(Utc::now() - chrono::Duration::minutes(5)),
        };
        assert_eq!(
            stale.get_current_position(&options).await,
            Err(GeolocationError::PositionUnavailable)
        );

        let invalid = ReportedPosition::Fix {
            latitude: 91.0,
            longitude: 0.0,
            accuracy: 5.0,
            captured_at: None,
        };
        assert_eq!(
            invalid.get_current_position(&options).await,
            Err(GeolocationError::PositionUnavailable)
        );
    }

    #[tokio::test]
    async fn test_reported_error() {
        let reported = ReportedPosition::Error { code: 1 };
        assert_eq!(
            reported
                .get_current_position(&PositionOptions::default())
                .await,
            Err(GeolocationError::PermissionDenied)
        );
    }

    #[test]
    fn test_reported_position_json() {
        let fix: ReportedPosition = serde_json::from_str(
            r#"{"kind":"fix","latitude":1.5,"longitude":2.5,"accuracy":10.0}"#,
        )
        .unwrap();
        assert!(matches!(fix, ReportedPosition::Fix { captured_at: None, .. }));

        let err: ReportedPosition = serde_json::from_str(r#"{"kind":"error","code":3}"#).unwrap();
        assert_eq!(err, ReportedPosition::Error { code: 3 });
    }
}
