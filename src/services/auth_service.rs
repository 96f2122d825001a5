use std::sync::Arc;

use crate::entities::{UserRole, user_entity as users};
use crate::error::{AppError, AppResult};
use crate::models::*;
use crate::store::UserStore;
use crate::utils::*;

#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserStore>,
    jwt_service: JwtService,
    bootstrap_admin_email: Option<String>,
}

impl AuthService {
    pub fn new(
        users: Arc<dyn UserStore>,
        jwt_service: JwtService,
        bootstrap_admin_email: Option<String>,
    ) -> Self {
        Self {
            users,
            jwt_service,
            bootstrap_admin_email: bootstrap_admin_email.map(|e| normalize_email(&e)),
        }
    }

    pub async fn register(&self, request: RegisterRequest) -> AppResult<AuthResponse> {
        let email = normalize_email(&request.email);
        validate_email(&email)?;
        validate_password(&request.password)?;
        let name = request.name.trim().to_string();
        if name.chars().count() < 2 {
            return Err(AppError::ValidationError(
                "Name must be at least 2 characters".to_string(),
            ));
        }

        if self.users.find_user_by_email(&email).await?.is_some() {
            return Err(AppError::ValidationError(
                "Email is already registered".to_string(),
            ));
        }

        let role = if self.bootstrap_admin_email.as_deref() == Some(email.as_str()) {
            UserRole::Admin
        } else {
            UserRole::Member
        };
        let user = self
            .users
            .insert_user(NewUser {
                email,
                name,
                password_hash: hash_password(&request.password)?,
                role,
                designation: request
                    .designation
                    .map(|d| d.trim().to_string())
                    .filter(|d| !d.is_empty()),
            })
            .await?;
        log::info!("User {} registered as {}", user.id, user.role);

        self.issue_tokens(user)
    }

    pub async fn login(&self, request: LoginRequest) -> AppResult<AuthResponse> {
        let email = normalize_email(&request.email);
        let user = self
            .users
            .find_user_by_email(&email)
            .await?
            .ok_or_else(|| AppError::AuthError("Invalid email or password".to_string()))?;

        if !verify_password(&request.password, &user.password_hash)? {
            return Err(AppError::AuthError("Invalid email or password".to_string()));
        }

        self.issue_tokens(user)
    }

    pub async fn refresh_token(&self, refresh_token: &str) -> AppResult<AuthResponse> {
        let claims = self.jwt_service.verify_refresh_token(refresh_token)?;
        let user = self
            .users
            .find_user(claims.user_id()?)
            .await?
            .ok_or_else(|| AppError::AuthError("User no longer exists".to_string()))?;

        // the role may have changed since the refresh token was issued
        let access_token = self.jwt_service.generate_access_token(user.id, user.role)?;
        Ok(AuthResponse {
            user: UserResponse::from(user),
            access_token,
            refresh_token: refresh_token.to_string(),
            expires_in: self.jwt_service.get_access_token_expires_in(),
        })
    }

    fn issue_tokens(&self, user: users::Model) -> AppResult<AuthResponse> {
        let access_token = self.jwt_service.generate_access_token(user.id, user.role)?;
        let refresh_token = self.jwt_service.generate_refresh_token(user.id, user.role)?;
        Ok(AuthResponse {
            user: UserResponse::from(user),
            access_token,
            refresh_token,
            expires_in: self.jwt_service.get_access_token_expires_in(),
        })
    }
}
