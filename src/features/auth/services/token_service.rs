use crate::core::config::AuthConfig;
use crate::core::error::{AppError, Result};
use crate::features::auth::model::Claims;
use crate::features::users::models::UserRecord;
use crate::shared::constants::{ROLE_ADMIN, ROLE_CITIZEN};
use chrono::Utc;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};

/// A freshly signed access token
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub access_token: String,
    pub expires_in: i64,
}

/// Signs HS256 access tokens for authenticated users
pub struct TokenService {
    encoding_key: EncodingKey,
    issuer: String,
    ttl_secs: i64,
}

impl TokenService {
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(config.jwt_secret.as_bytes()),
            issuer: config.issuer.clone(),
            ttl_secs: config.token_ttl.as_secs() as i64,
        }
    }

    pub fn issue(&self, user: &UserRecord) -> Result<IssuedToken> {
        let now = Utc::now().timestamp();

        let mut roles = vec![ROLE_CITIZEN.to_string()];
        if user.is_admin {
            roles.push(ROLE_ADMIN.to_string());
        }

        let claims = Claims {
            sub: user.id.to_string(),
            iss: self.issuer.clone(),
            iat: now,
            exp: now + self.ttl_secs,
            name: user.name.clone(),
            email: user.email.clone(),
            roles,
        };

        let access_token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| {
                tracing::error!("Failed to sign access token: {}", e);
                AppError::Internal(format!("Failed to sign access token: {}", e))
            })?;

        tracing::debug!("Issued access token for user {}", user.id);

        Ok(IssuedToken {
            access_token,
            expires_in: self.ttl_secs,
        })
    }
}
