// ==========================================
// 员工表格入库 - SQLite 连接池
// ==========================================
// 显式构造的连接池对象，按引用传给需要连接的组件
// - max_size:           池内最大连接数
// - min_idle:           构造时预热、回收时保留的空闲连接数
// - idle_timeout:       空闲超过该时长的连接可被 reap_idle 回收
// - connection_timeout: 获取连接的最长等待时间
// 连接对象 drop 时自动归还连接池
// ==========================================

use crate::config::PoolConfig;
use crate::db::open_sqlite_connection;
use crate::repository::error::{RepositoryError, RepositoryResult};
use deadpool::managed::{self, Metrics, RecycleError, RecycleResult};
use deadpool::Runtime;
use rusqlite::Connection;
use std::cell::Cell;
use std::ops::{Deref, DerefMut};
use tracing::{debug, info};

/// 连接池错误类型
pub type SqlitePoolError = managed::PoolError<rusqlite::Error>;

// ==========================================
// SqliteManager - 连接的创建与回收检查
// ==========================================
#[derive(Debug)]
pub struct SqliteManager {
    db_path: String,
}

impl SqliteManager {
    pub fn new(db_path: impl Into<String>) -> Self {
        Self {
            db_path: db_path.into(),
        }
    }
}

impl managed::Manager for SqliteManager {
    type Type = Connection;
    type Error = rusqlite::Error;

    async fn create(&self) -> Result<Connection, rusqlite::Error> {
        debug!(db_path = %self.db_path, "创建数据库连接");
        open_sqlite_connection(&self.db_path)
    }

    async fn recycle(
        &self,
        conn: &mut Connection,
        _metrics: &Metrics,
    ) -> RecycleResult<rusqlite::Error> {
        conn.execute_batch("SELECT 1").map_err(RecycleError::Backend)
    }
}

// ==========================================
// PoolStatus - 连接池快照
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolStatus {
    pub max_size: usize,
    /// 当前持有的连接总数（空闲 + 借出）
    pub size: usize,
    /// 空闲连接数
    pub available: usize,
}

// ==========================================
// ConnectionPool
// ==========================================
#[derive(Debug)]
pub struct ConnectionPool {
    inner: managed::Pool<SqliteManager>,
    config: PoolConfig,
    db_path: String,
}

impl ConnectionPool {
    /// 创建连接池并预热 min_idle 个连接
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    /// - config: 连接池参数
    pub async fn new(db_path: &str, config: &PoolConfig) -> RepositoryResult<Self> {
        config
            .validate()
            .map_err(|e| RepositoryError::DatabaseConnectionError(e.to_string()))?;

        let inner = managed::Pool::builder(SqliteManager::new(db_path))
            .max_size(config.max_size)
            .wait_timeout(Some(config.connection_timeout()))
            .create_timeout(Some(config.connection_timeout()))
            .runtime(Runtime::Tokio1)
            .build()
            .map_err(|e| RepositoryError::DatabaseConnectionError(e.to_string()))?;

        let pool = Self {
            inner,
            config: config.clone(),
            db_path: db_path.to_string(),
        };
        pool.fill_min_idle().await?;

        info!(
            db_path = %pool.db_path,
            max_size = config.max_size,
            min_idle = config.min_idle,
            "连接池已创建"
        );
        Ok(pool)
    }

    /// 同时借出 min_idle 个连接再全部归还，使池内至少有 min_idle 个空闲连接
    async fn fill_min_idle(&self) -> RepositoryResult<()> {
        if self.config.min_idle == 0 {
            return Ok(());
        }

        let warm = futures::future::try_join_all(
            (0..self.config.min_idle).map(|_| self.inner.get()),
        )
        .await?;
        drop(warm);
        Ok(())
    }

    /// 获取一个连接（等待超过 connection_timeout 则失败）
    pub async fn get(&self) -> RepositoryResult<PooledConnection> {
        let inner = self.inner.get().await?;
        Ok(PooledConnection { inner })
    }

    /// 回收空闲超时的连接，至少保留 min_idle 个空闲连接
    ///
    /// # 返回
    /// - 被回收的连接数
    pub fn reap_idle(&self) -> usize {
        let idle_timeout = self.config.idle_timeout();
        let removable = Cell::new(self.status().available.saturating_sub(self.config.min_idle));
        let removed = Cell::new(0usize);

        self.inner.retain(|_, metrics| {
            if metrics.last_used() < idle_timeout || removable.get() == 0 {
                return true;
            }
            removable.set(removable.get() - 1);
            removed.set(removed.get() + 1);
            false
        });

        let removed = removed.get();
        if removed > 0 {
            debug!(removed, "回收空闲连接");
        }
        removed
    }

    pub fn status(&self) -> PoolStatus {
        let status = self.inner.status();
        PoolStatus {
            max_size: status.max_size,
            size: status.size,
            available: status.available,
        }
    }

    pub fn config(&self) -> &PoolConfig {
        &self.config
    }

    pub fn db_path(&self) -> &str {
        &self.db_path
    }

    /// 关闭连接池：空闲连接立即释放，之后的 get 返回 PoolClosed
    pub fn close(&self) {
        self.inner.close();
        info!(db_path = %self.db_path, "连接池已关闭");
    }

    pub fn is_closed(&self) -> bool {
        self.inner.is_closed()
    }
}

// ==========================================
// PooledConnection - 借出的连接
// ==========================================
// drop 时归还连接池
pub struct PooledConnection {
    inner: managed::Object<SqliteManager>,
}

impl Deref for PooledConnection {
    type Target = Connection;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl DerefMut for PooledConnection {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.inner
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    fn small_config() -> PoolConfig {
        PoolConfig {
            max_size: 2,
            min_idle: 1,
            idle_timeout_ms: 60_000,
            connection_timeout_ms: 200,
        }
    }

    #[tokio::test]
    async fn test_new_pool_prefills_min_idle() {
        let temp = NamedTempFile::new().unwrap();
        let pool = ConnectionPool::new(temp.path().to_str().unwrap(), &small_config())
            .await
            .unwrap();

        let status = pool.status();
        assert_eq!(status.max_size, 2);
        assert_eq!(status.size, 1);
        assert_eq!(status.available, 1);
    }

    #[tokio::test]
    async fn test_connection_returns_to_pool_on_drop() {
        let temp = NamedTempFile::new().unwrap();
        let pool = ConnectionPool::new(temp.path().to_str().unwrap(), &small_config())
            .await
            .unwrap();

        {
            let conn = pool.get().await.unwrap();
            let one: i64 = conn.query_row("SELECT 1", [], |row| row.get(0)).unwrap();
            assert_eq!(one, 1);
            assert_eq!(pool.status().available, 0);
        }

        assert_eq!(pool.status().available, 1);
    }

    #[tokio::test]
    async fn test_invalid_config_is_rejected() {
        let temp = NamedTempFile::new().unwrap();
        let config = PoolConfig {
            max_size: 1,
            min_idle: 3,
            ..small_config()
        };

        let result = ConnectionPool::new(temp.path().to_str().unwrap(), &config).await;
        assert!(matches!(result, Err(RepositoryError::DatabaseConnectionError(_))));
    }
}
