use std::sync::Arc;

use crate::entities::UserRole;
use crate::error::{AppError, AppResult};
use crate::models::*;
use crate::store::UserStore;

#[derive(Clone)]
pub struct UserService {
    users: Arc<dyn UserStore>,
}

impl UserService {
    pub fn new(users: Arc<dyn UserStore>) -> Self {
        Self { users }
    }

    pub async fn get_user_profile(&self, user_id: i64) -> AppResult<UserResponse> {
        self.users
            .find_user(user_id)
            .await?
            .map(UserResponse::from)
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))
    }

    pub async fn update_user_profile(
        &self,
        user_id: i64,
        request: UpdateProfileRequest,
    ) -> AppResult<UserResponse> {
        if request.name.is_none() && request.designation.is_none() && request.photo_url.is_none() {
            return Err(AppError::ValidationError("No fields to update".to_string()));
        }
        if let Some(name) = &request.name {
            let len = name.trim().chars().count();
            if !(2..=100).contains(&len) {
                return Err(AppError::ValidationError(
                    "Name must be between 2 and 100 characters".to_string(),
                ));
            }
        }

        let updated = self
            .users
            .update_user(
                user_id,
                ProfileChanges {
                    name: request.name.map(|n| n.trim().to_string()),
                    designation: request.designation.map(|d| d.trim().to_string()),
                    photo_url: request.photo_url,
                    role: None,
                },
            )
            .await?;
        Ok(UserResponse::from(updated))
    }

    pub async fn list_users(&self) -> AppResult<Vec<UserResponse>> {
        Ok(self
            .users
            .list_users()
            .await?
            .into_iter()
            .map(UserResponse::from)
            .collect())
    }

    pub async fn set_role(&self, user_id: i64, role: UserRole) -> AppResult<UserResponse> {
        let updated = self
            .users
            .update_user(
                user_id,
                ProfileChanges {
                    role: Some(role),
                    ..Default::default()
                },
            )
            .await?;
        log::info!("User {user_id} role set to {role}");
        Ok(UserResponse::from(updated))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    async fn setup() -> (UserService, i64) {
        let store = Arc::new(MemoryStore::new());
        let user = store
            .insert_user(NewUser {
                email: "dilani@leo.lk".to_string(),
                name: "Dilani".to_string(),
                password_hash: String::new(),
                role: UserRole::Member,
                designation: None,
            })
            .await
            .unwrap();
        (UserService::new(store), user.id)
    }

    #[tokio::test]
    async fn test_update_profile() {
        let (service, id) = setup().await;
        let updated = service
            .update_user_profile(
                id,
                UpdateProfileRequest {
                    name: None,
                    designation: Some(" Treasurer ".to_string()),
                    photo_url: Some("https://cdn.example/p.png".to_string()),
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.name, "Dilani");
        assert_eq!(updated.designation.as_deref(), Some("Treasurer"));
        assert_eq!(updated.photo_url.as_deref(), Some("https://cdn.example/p.png"));
    }

    #[tokio::test]
    async fn test_update_profile_requires_fields() {
        let (service, id) = setup().await;
        let res = service
            .update_user_profile(
                id,
                UpdateProfileRequest {
                    name: None,
                    designation: None,
                    photo_url: None,
                },
            )
            .await;
        assert!(matches!(res, Err(AppError::ValidationError(_))));
    }

    #[tokio::test]
    async fn test_set_role() {
        let (service, id) = setup().await;
        let updated = service.set_role(id, UserRole::Admin).await.unwrap();
        assert_eq!(updated.role, UserRole::Admin);
        assert!(matches!(
            service.set_role(id + 1, UserRole::Admin).await,
            Err(AppError::NotFound(_))
        ));
    }
}
