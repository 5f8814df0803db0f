// src/services/auth.rs

use bcrypt::{hash, verify};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use sqlx::PgPool;

use crate::{
    common::error::AppError,
    db::{user_repo::NewUser, CompanyRepository, UserRepository},
    models::auth::{Claims, RegisterUserPayload, Role, User},
};

const TOKEN_TTL_DAYS: i64 = 7;

pub fn encode_token(secret: &str, user: &User, now: DateTime<Utc>) -> Result<String, AppError> {
    let claims = Claims {
        sub: user.id,
        company_id: user.company_id,
        role: user.role,
        exp: (now + Duration::days(TOKEN_TTL_DAYS)).timestamp() as usize,
        iat: now.timestamp() as usize,
    };

    Ok(encode(&Header::default(), &claims, &EncodingKey::from_secret(secret.as_ref()))?)
}

pub fn decode_claims(secret: &str, token: &str) -> Result<Claims, AppError> {
    decode::<Claims>(token, &DecodingKey::from_secret(secret.as_ref()), &Validation::default())
        .map(|data| data.claims)
        .map_err(|_| AppError::InvalidToken)
}

pub async fn hash_password(password: &str) -> Result<String, AppError> {
    let password = password.to_owned();
    let hashed = tokio::task::spawn_blocking(move || hash(&password, bcrypt::DEFAULT_COST))
        .await
        .map_err(|e| anyhow::anyhow!("Falha na task de hashing: {}", e))??;
    Ok(hashed)
}

#[derive(Clone)]
pub struct AuthService {
    user_repo: UserRepository,
    company_repo: CompanyRepository,
    jwt_secret: String,
    trial_days: i64,
    pool: PgPool,
}

impl AuthService {
    pub fn new(
        user_repo: UserRepository,
        company_repo: CompanyRepository,
        jwt_secret: String,
        trial_days: i64,
        pool: PgPool,
    ) -> Self {
        Self { user_repo, company_repo, jwt_secret, trial_days, pool }
    }

    /// Cria a empresa (em trial) e o gestor numa única transação.
    pub async fn register(&self, payload: &RegisterUserPayload) -> Result<String, AppError> {
        let hashed_password = hash_password(&payload.password).await?;
        let trial_end = Utc::now() + Duration::days(self.trial_days);

        let mut tx = self.pool.begin().await?;

        let company = self
            .company_repo
            .create(
                &mut *tx,
                &payload.company_name,
                &payload.email,
                payload.phone.as_deref(),
                trial_end,
            )
            .await?;

        let user = self
            .user_repo
            .create_user(
                &mut *tx,
                NewUser {
                    company_id: company.id,
                    email: &payload.email,
                    password_hash: &hashed_password,
                    full_name: &payload.full_name,
                    phone: payload.phone.as_deref(),
                    role: Role::Manager,
                    sites: &[],
                    plants: &[],
                },
            )
            .await?;

        tx.commit().await?;

        tracing::info!("🏢 Empresa '{}' registrada (trial até {})", company.name, trial_end.date_naive());
        encode_token(&self.jwt_secret, &user, Utc::now())
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<String, AppError> {
        let user = self
            .user_repo
            .find_by_email(email)
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        let password_clone = password.to_owned();
        let password_hash_clone = user.password_hash.clone();
        let is_password_valid = tokio::task::spawn_blocking(move || verify(&password_clone, &password_hash_clone))
            .await
            .map_err(|e| anyhow::anyhow!("Falha na task de verificação de senha: {}", e))??;

        if !is_password_valid {
            return Err(AppError::InvalidCredentials);
        }
        if !user.is_active {
            return Err(AppError::UserInactive);
        }

        encode_token(&self.jwt_secret, &user, Utc::now())
    }

    /// Valida o token e recarrega o usuário (papel e atribuições atuais).
    pub async fn validate_token(&self, token: &str) -> Result<User, AppError> {
        let claims = decode_claims(&self.jwt_secret, token)?;

        let user = self
            .user_repo
            .find_by_id(claims.sub)
            .await?
            .ok_or(AppError::UserNotFound)?;

        if !user.is_active {
            return Err(AppError::UserInactive);
        }
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn user(role: Role) -> User {
        User {
            id: Uuid::new_v4(),
            company_id: Uuid::new_v4(),
            email: "ali@example.com".into(),
            password_hash: String::new(),
            full_name: "Ali".into(),
            phone: None,
            role,
            sites: vec![],
            plants: vec![],
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn token_carries_company_and_role() {
        let user = user(Role::Engineer);
        let token = encode_token("secret", &user, Utc::now()).unwrap();
        let claims = decode_claims("secret", &token).unwrap();

        assert_eq!(claims.sub, user.id);
        assert_eq!(claims.company_id, user.company_id);
        assert_eq!(claims.role, Role::Engineer);
        assert_eq!(claims.exp - claims.iat, 7 * 24 * 3600);
    }

    #[test]
    fn token_signed_with_other_secret_is_rejected() {
        let token = encode_token("secret", &user(Role::Manager), Utc::now()).unwrap();
        assert!(matches!(decode_claims("other", &token), Err(AppError::InvalidToken)));
    }

    #[test]
    fn expired_token_is_rejected() {
        let issued = Utc::now() - Duration::days(30);
        let token = encode_token("secret", &user(Role::Manager), issued).unwrap();
        assert!(matches!(decode_claims("secret", &token), Err(AppError::InvalidToken)));
    }

    #[tokio::test]
    async fn hashed_password_verifies() {
        let hashed = hash_password("gunes123").await.unwrap();
        assert!(verify("gunes123", &hashed).unwrap());
        assert!(!verify("wrong", &hashed).unwrap());
    }
}
