// region:    --- Imports
use marketplace_service::auth::TokenService;
use marketplace_service::config::Config;
use marketplace_service::database::store::PostgresMarketStore;
use marketplace_service::database::DatabaseManager;
use marketplace_service::routes::build_router;
use marketplace_service::state::AppState;
use marketplace_service::store::memory::MemoryStore;
use marketplace_service::store::MarketStore;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info, warn};
// endregion: --- Imports

// region:    --- Main
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // .env 파일이 있으면 로드
    dotenvy::dotenv().ok();

    // logging 초기화
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .without_time()
        .with_target(false)
        .init();

    // 설정 로드
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("{:<12} --> 설정 로드 실패: {}", "Main", e);
            return Err(e.into());
        }
    };

    // 저장소 생성
    let store: Arc<dyn MarketStore> = match config.database_url.as_deref() {
        Some(database_url) => {
            let db_manager = Arc::new(DatabaseManager::new(database_url, &config).await?);

            // 데이터베이스 초기화
            if let Err(e) = db_manager.initialize_database().await {
                error!("{:<12} --> 데이터베이스 초기화 실패: {:?}", "Main", e);
                return Err(e.into());
            }
            info!("{:<12} --> 데이터베이스 초기화 성공", "Main");
            Arc::new(PostgresMarketStore::new(db_manager))
        }
        None => {
            warn!(
                "{:<12} --> DATABASE_URL 미설정: 메모리 저장소 사용 (재시작 시 데이터 소실)",
                "Main"
            );
            Arc::new(MemoryStore::new())
        }
    };

    let tokens = Arc::new(TokenService::new(&config.jwt_secret, config.jwt_ttl_secs));
    let routes_all = build_router(AppState::new(store, tokens));

    // 리스너 생성
    let listener = TcpListener::bind(&config.bind_addr).await?;
    info!(
        "{:<12} --> Web Server: Listening on {}",
        "Main",
        listener.local_addr()?
    );

    // 서버 실행
    if let Err(err) = axum::serve(listener, routes_all.into_make_service()).await {
        error!("{:<12} --> Server error: {}", "Main", err);
    }
    Ok(())
}
// endregion: --- Main
