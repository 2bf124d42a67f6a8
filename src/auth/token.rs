/// 인증 토큰 발급 및 검증
// region:    --- Imports
use crate::auth::model::User;
use crate::error::AppError;
use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

// endregion: --- Imports

// region:    --- Claims
/// 토큰에 담기는 사용자 식별 정보
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub admin: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,
}

impl Claims {
    pub fn for_user(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
            admin: user.admin,
            exp: None,
        }
    }
}

// endregion: --- Claims

// region:    --- Token Service
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl_secs: Option<i64>,
}

impl TokenService {
    pub fn new(secret: &str, ttl_secs: Option<i64>) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // exp 는 설정된 경우에만 포함된다
        validation.required_spec_claims.clear();
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            ttl_secs,
        }
    }

    /// 토큰 발급
    pub fn sign(&self, claims: &Claims) -> Result<String, AppError> {
        let mut claims = claims.clone();
        claims.exp = match self.ttl_secs {
            Some(ttl) => Some(
                Utc::now()
                    .timestamp()
                    .checked_add(ttl)
                    .ok_or_else(|| AppError::Internal("token expiry overflows".to_string()))?,
            ),
            None => None,
        };

        debug!(
            "{:<12} --> 토큰 발급 user: {} ({})",
            "Auth", claims.username, claims.id
        );
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AppError::Internal(format!("failed to sign token: {}", e)))
    }

    /// 토큰 검증
    pub fn verify(&self, token: &str) -> Result<Claims, AppError> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| {
                warn!("{:<12} --> 토큰 검증 실패: {}", "Auth", e);
                AppError::Unauthorized
            })
    }
}

// endregion: --- Token Service

#[cfg(test)]
mod tests {
    use super::*;

    fn claims(admin: bool) -> Claims {
        Claims {
            id: 7,
            username: "alice".to_string(),
            email: "alice@x.com".to_string(),
            admin,
            exp: None,
        }
    }

    #[test]
    fn sign_then_verify_returns_same_claims() {
        let service = TokenService::new("test-secret", None);
        let token = service.sign(&claims(true)).unwrap();
        assert_eq!(service.verify(&token).unwrap(), claims(true));
    }

    #[test]
    fn signing_without_ttl_is_deterministic() {
        let service = TokenService::new("test-secret", None);
        assert_eq!(
            service.sign(&claims(false)).unwrap(),
            service.sign(&claims(false)).unwrap()
        );
    }

    #[test]
    fn ttl_adds_future_expiry() {
        let service = TokenService::new("test-secret", Some(600));
        let token = service.sign(&claims(false)).unwrap();
        let exp = service.verify(&token).unwrap().exp.unwrap();
        assert!(exp > Utc::now().timestamp());
    }

    #[test]
    fn oversized_ttl_fails_without_panicking() {
        let service = TokenService::new("test-secret", Some(i64::MAX));
        assert!(matches!(
            service.sign(&claims(false)),
            Err(AppError::Internal(_))
        ));
    }

    #[test]
    fn expired_token_is_rejected() {
        let service = TokenService::new("test-secret", None);
        let mut expired = claims(false);
        expired.exp = Some(Utc::now().timestamp() - 3600);
        let token = encode(
            &Header::new(Algorithm::HS256),
            &expired,
            &EncodingKey::from_secret(b"test-secret"),
        )
        .unwrap();
        assert!(matches!(service.verify(&token), Err(AppError::Unauthorized)));
    }

    #[test]
    fn other_secret_is_rejected() {
        let issuer = TokenService::new("secret-one", None);
        let verifier = TokenService::new("secret-two", None);
        let token = issuer.sign(&claims(false)).unwrap();
        assert!(matches!(verifier.verify(&token), Err(AppError::Unauthorized)));
    }

    #[test]
    fn malformed_token_is_rejected() {
        let service = TokenService::new("test-secret", None);
        assert!(matches!(
            service.verify("not.a.token"),
            Err(AppError::Unauthorized)
        ));
        assert!(matches!(service.verify(""), Err(AppError::Unauthorized)));
    }
}
