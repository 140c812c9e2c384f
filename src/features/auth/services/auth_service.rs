use crate::core::error::Result;
use crate::features::auth::dtos::{
    AuthResponseDto, AuthUserDto, LoginRequestDto, MeResponseDto, RegisterRequestDto,
    RegisterResponseDto,
};
use crate::features::auth::model::AuthenticatedUser;
use crate::features::auth::services::token_service::TokenService;
use crate::features::users::models::{Credentials, NewUser};
use crate::features::users::UserService;
use std::sync::Arc;

/// Sign-up and sign-in on top of [`UserService`]
pub struct AuthService {
    user_service: Arc<UserService>,
    token_service: Arc<TokenService>,
}

impl AuthService {
    pub fn new(user_service: Arc<UserService>, token_service: Arc<TokenService>) -> Self {
        Self {
            user_service,
            token_service,
        }
    }

    /// Register a new user. No token is issued; the user signs in afterwards.
    pub async fn register(&self, dto: RegisterRequestDto) -> Result<RegisterResponseDto> {
        let id = self
            .user_service
            .register(NewUser {
                name: dto.name,
                number: dto.number,
                email: dto.email,
                password: dto.password,
            })
            .await?;

        Ok(RegisterResponseDto { id })
    }

    /// Login with email and password
    pub async fn login(&self, dto: LoginRequestDto) -> Result<AuthResponseDto> {
        let user = self
            .user_service
            .authenticate(&Credentials {
                email: dto.email,
                password: dto.password,
            })
            .await?;

        let token = self.token_service.issue(&user)?;
        tracing::info!("User {} signed in", user.id);

        Ok(AuthResponseDto {
            access_token: token.access_token,
            token_type: "Bearer".to_string(),
            expires_in: token.expires_in,
            user: AuthUserDto::from(user),
        })
    }

    pub fn get_current_user(&self, user: AuthenticatedUser) -> MeResponseDto {
        MeResponseDto {
            id: user.user_id,
            name: user.name,
            email: user.email,
            roles: user.roles,
        }
    }
}
