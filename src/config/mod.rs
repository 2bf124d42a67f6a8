/// 서비스 설정
/// 프로세스 시작 시 한 번 읽고, 이후에는 변경되지 않는다.
// region:    --- Imports
use thiserror::Error;

// endregion: --- Imports

// region:    --- Config
const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
const DEFAULT_MAX_CONNECTIONS: u32 = 5;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{key} has an invalid value: {value}")]
    Invalid { key: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: String,
    /// 없으면 메모리 저장소로 동작
    pub database_url: Option<String>,
    pub max_connections: u32,
    pub jwt_secret: String,
    /// 없으면 토큰 만료 없음
    pub jwt_ttl_secs: Option<i64>,
}

impl Config {
    /// 환경 변수에서 설정 로드
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let jwt_secret = non_empty("JWT_SECRET").ok_or(ConfigError::Missing("JWT_SECRET"))?;

        let max_connections = match non_empty("DATABASE_MAX_CONNECTIONS") {
            Some(raw) => match raw.trim().parse::<u32>() {
                Ok(n) if n > 0 => n,
                _ => {
                    return Err(ConfigError::Invalid {
                        key: "DATABASE_MAX_CONNECTIONS",
                        value: raw,
                    })
                }
            },
            None => DEFAULT_MAX_CONNECTIONS,
        };

        let jwt_ttl_secs = match non_empty("JWT_TTL_SECS") {
            Some(raw) => match raw.trim().parse::<i64>() {
                Ok(n) if n > 0 => Some(n),
                _ => {
                    return Err(ConfigError::Invalid {
                        key: "JWT_TTL_SECS",
                        value: raw,
                    })
                }
            },
            None => None,
        };

        Ok(Self {
            bind_addr: non_empty("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string()),
            database_url: non_empty("DATABASE_URL"),
            max_connections,
            jwt_secret,
            jwt_ttl_secs,
        })
    }
}

// endregion: --- Config
