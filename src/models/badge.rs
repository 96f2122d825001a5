use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum BadgeId {
    ClubLeader,
    TopVolunteer,
    ActiveLeo,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
pub struct Badge {
    pub id: BadgeId,
    pub name: String,
    pub description: String,
    pub icon: String,
}

impl BadgeId {
    pub fn badge(self) -> Badge {
        let (name, description, icon) = match self {
            BadgeId::ClubLeader => (
                "Club Leader",
                "Holds an executive or director position in the club",
                "crown",
            ),
            BadgeId::TopVolunteer => (
                "Top Volunteer",
                "Attended the most events this month",
                "star",
            ),
            BadgeId::ActiveLeo => ("Active Leo", "Attended at least three events", "flame"),
        };
        Badge {
            id: self,
            name: name.to_string(),
            description: description.to_string(),
            icon: icon.to_string(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UserBadgesResponse {
    pub user_id: i64,
    pub month: i32,
    pub year: i32,
    pub badges: Vec<Badge>,
}
