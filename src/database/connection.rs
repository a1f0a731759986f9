use crate::config::DatabaseConfig;
use crate::error::{AppError, AppResult};
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};

pub type DbPool = DatabaseConnection;

/// 数据库句柄
///
/// 未配置或启动时连接失败则为空，所有依赖数据库的操作直接返回 503。
#[derive(Clone, Debug)]
pub struct Store {
    pool: Option<DbPool>,
}

impl Store {
    pub fn new(pool: DbPool) -> Self {
        Self { pool: Some(pool) }
    }

    pub fn unconfigured() -> Self {
        Self { pool: None }
    }

    pub fn is_configured(&self) -> bool {
        self.pool.is_some()
    }

    pub fn conn(&self) -> AppResult<&DbPool> {
        self.pool
            .as_ref()
            .ok_or_else(|| AppError::ServiceUnavailable("Database not configured".to_string()))
    }
}

pub async fn create_pool(config: &DatabaseConfig) -> AppResult<DbPool> {
    let mut opt = ConnectOptions::new(config.url.clone());
    opt.max_connections(config.max_connections)
        .sqlx_logging(false);

    let pool = Database::connect(opt).await?;
    Ok(pool)
}

pub async fn run_migrations(pool: &DbPool) -> AppResult<()> {
    Migrator::up(pool, None).await?;
    Ok(())
}

/// 按配置建立连接并迁移；任何一步失败都降级为未配置状态而不是退出进程
pub async fn connect_store(config: &DatabaseConfig) -> Store {
    if !config.is_configured() {
        log::warn!("DATABASE_URL not set, running without database");
        return Store::unconfigured();
    }

    let pool = match create_pool(config).await {
        Ok(pool) => pool,
        Err(e) => {
            log::error!("Failed to connect to database: {e}");
            return Store::unconfigured();
        }
    };

    if let Err(e) = run_migrations(&pool).await {
        log::error!("Failed to run database migrations: {e}");
        return Store::unconfigured();
    }

    Store::new(pool)
}
