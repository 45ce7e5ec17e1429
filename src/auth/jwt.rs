use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use thiserror::Error;
use time::{Duration, OffsetDateTime};
use tracing::debug;

use crate::{
    auth::claims::{Claims, Subject},
    config::{validate_ttl, ConfigError, JwtConfig},
};

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("token expired")]
    Expired,
    #[error("invalid token: {0}")]
    Invalid(String),
    #[error("could not sign token: {0}")]
    Signing(String),
}

/// HS256 signing and verification keys plus the configured token lifetime.
#[derive(Clone)]
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl TokenService {
    pub fn new(secret: &str, ttl: Duration) -> Result<Self, ConfigError> {
        if secret.is_empty() {
            return Err(ConfigError::Missing("JWT_SECRET"));
        }
        Ok(Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl,
        })
    }

    pub fn from_config(cfg: &JwtConfig) -> Result<Self, ConfigError> {
        let ttl_minutes = validate_ttl(cfg.ttl_minutes)?;
        Self::new(&cfg.secret, Duration::minutes(ttl_minutes))
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn issue(&self, subject: &Subject, ttl: Duration) -> Result<String, TokenError> {
        self.issue_at(subject, OffsetDateTime::now_utc(), ttl)
    }

    pub fn issue_at(
        &self,
        subject: &Subject,
        issued_at: OffsetDateTime,
        ttl: Duration,
    ) -> Result<String, TokenError> {
        let exp = issued_at
            .checked_add(ttl)
            .ok_or_else(|| TokenError::Signing("token expiry out of range".into()))?;
        let claims = Claims {
            email: subject.email.clone(),
            user_id: subject.user_id,
            exp: exp.unix_timestamp(),
        };
        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| TokenError::Signing(e.to_string()))?;
        debug!(user_id = subject.user_id, "jwt signed");
        Ok(token)
    }

    pub fn verify(&self, token: &str) -> Result<Subject, TokenError> {
        // Only HS256 is listed, so any other header alg fails before the signature check.
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp"]);

        let data = decode::<Claims>(token, &self.decoding, &validation).map_err(|e| {
            match e.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Invalid(e.to_string()),
            }
        })?;

        // jsonwebtoken accepts exp == now; the token is already dead at that instant.
        if data.claims.exp <= OffsetDateTime::now_utc().unix_timestamp() {
            return Err(TokenError::Expired);
        }

        debug!(user_id = data.claims.user_id, "jwt verified");
        Ok(Subject {
            user_id: data.claims.user_id,
            email: data.claims.email,
        })
    }
}
