/// 회원 가입 및 로그인 처리
/// 1. 회원 가입
/// 2. 로그인
// region:    --- Imports
use crate::auth::model::{is_admin_email, LoginRequest, NewUser, RegisterRequest};
use crate::auth::password::{hash_password_blocking, verify_password_blocking};
use crate::auth::token::{Claims, TokenService};
use crate::error::AppError;
use crate::store::{MarketStore, EMAIL_TAKEN};
use tracing::{info, warn};

// endregion: --- Imports

// region:    --- Commands
/// 1. 회원 가입
/// 이메일 중복은 다른 필드 검증보다 먼저 응답한다.
/// 이후 사용자명 중복은 저장소가 생성 시 검사한다.
pub async fn register(
    store: &dyn MarketStore,
    tokens: &TokenService,
    req: RegisterRequest,
) -> Result<String, AppError> {
    let email = req.email.as_deref().map(str::trim).unwrap_or_default();
    if !email.is_empty() && store.email_taken(email).await? {
        warn!("{:<12} --> 회원 가입 거부 (이메일 중복): {}", "Command", email);
        return Err(AppError::Conflict(EMAIL_TAKEN.to_string()));
    }

    let (username, email, password) = validate_registration(req)?;
    info!("{:<12} --> 회원 가입 요청: {}", "Command", email);

    let password_hash = hash_password_blocking(password).await?;
    let new_user = NewUser {
        admin: is_admin_email(&email),
        username,
        email,
        password_hash,
    };

    let user = store.create_user(new_user).await?;
    info!(
        "{:<12} --> 회원 가입 완료 id: {}, admin: {}",
        "Command", user.id, user.admin
    );

    tokens.sign(&Claims::for_user(&user))
}

/// 2. 로그인
/// 존재하지 않는 이메일과 틀린 비밀번호는 같은 오류로 응답한다.
pub async fn login(
    store: &dyn MarketStore,
    tokens: &TokenService,
    req: LoginRequest,
) -> Result<String, AppError> {
    let (Some(email), Some(password)) = (req.email, req.password) else {
        return Err(AppError::Unauthorized);
    };

    let Some(user) = store.find_user_by_email(&email).await? else {
        warn!("{:<12} --> 로그인 실패 (미등록 이메일)", "Command");
        return Err(AppError::Unauthorized);
    };

    let matches = match verify_password_blocking(password, user.password_hash.clone()).await {
        Ok(matches) => matches,
        Err(e) => {
            warn!(
                "{:<12} --> 저장된 비밀번호 해시 검증 불가 id: {}: {}",
                "Command", user.id, e
            );
            false
        }
    };
    if !matches {
        warn!("{:<12} --> 로그인 실패 id: {}", "Command", user.id);
        return Err(AppError::Unauthorized);
    }

    info!("{:<12} --> 로그인 성공 id: {}", "Command", user.id);
    tokens.sign(&Claims::for_user(&user))
}

// endregion: --- Commands

fn validate_registration(req: RegisterRequest) -> Result<(String, String, String), AppError> {
    let mut details = Vec::new();

    let username = req.username.map(|s| s.trim().to_string()).unwrap_or_default();
    if username.is_empty() {
        details.push("username is required".to_string());
    }

    let email = req.email.map(|s| s.trim().to_string()).unwrap_or_default();
    if email.is_empty() {
        details.push("email is required".to_string());
    } else if !email.contains('@') {
        details.push("email must be a valid e-mail address".to_string());
    }

    let password = req.password.unwrap_or_default();
    if password.is_empty() {
        details.push("password is required".to_string());
    }

    if details.is_empty() {
        Ok((username, email, password))
    } else {
        Err(AppError::Validation(details))
    }
}
