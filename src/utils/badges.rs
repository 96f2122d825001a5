use crate::entities::{UserRole, attendance_record_entity as attendance, user_entity as users};
use crate::models::BadgeId;

const LEADER_TITLES: [&str; 4] = ["president", "secretary", "treasurer", "director"];

/// Minimum number of attendance records for the Active Leo badge.
pub const ACTIVE_LEO_MIN_ATTENDANCE: usize = 3;

/// Badges earned by `user`.
///
/// `attendance_records` is not scoped here; callers filter it to the window
/// they care about. Who counts as top volunteer is decided by the caller.
/// The order of the returned ids carries no meaning.
pub fn calculate_badge_ids(
    user: &users::Model,
    attendance_records: &[attendance::Model],
    is_top_volunteer: bool,
) -> Vec<BadgeId> {
    let mut badges = Vec::new();

    let designation = user
        .designation
        .as_deref()
        .unwrap_or_default()
        .to_lowercase();
    if user.role == UserRole::Admin || LEADER_TITLES.iter().any(|t| designation.contains(t)) {
        badges.push(BadgeId::ClubLeader);
    }

    if is_top_volunteer {
        badges.push(BadgeId::TopVolunteer);
    }

    if attendance_records.len() >= ACTIVE_LEO_MIN_ATTENDANCE {
        badges.push(BadgeId::ActiveLeo);
    }

    badges
}
