/// 보호된 라우트의 인증 처리
/// Authorization: Bearer <token> 헤더를 검증하고 Claims 를 핸들러에 전달한다.
// region:    --- Imports
use crate::auth::token::Claims;
use crate::error::AppError;
use crate::state::AppState;
use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use tracing::warn;

// endregion: --- Imports

/// 인증된 호출자
#[derive(Debug, Clone)]
pub struct AuthUser(pub Claims);

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        // 헤더 누락과 잘못된 토큰은 구분하지 않는다
        let token = bearer_token(parts).ok_or_else(|| {
            warn!(
                "{:<12} --> 인증 헤더 없음: {} {}",
                "Auth", parts.method, parts.uri
            );
            AppError::Unauthorized
        })?;

        let claims = state.tokens.verify(token)?;
        Ok(AuthUser(claims))
    }
}

fn bearer_token(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}
