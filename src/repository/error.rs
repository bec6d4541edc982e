// ==========================================
// 员工表格入库 - 仓储层错误类型
// ==========================================
// 工具: thiserror 派生宏
// ==========================================

use crate::db::pool::SqlitePoolError;
use thiserror::Error;

/// 仓储层错误类型
#[derive(Error, Debug)]
pub enum RepositoryError {
    // ===== 连接池错误 =====
    #[error("获取数据库连接超时: {0}")]
    PoolTimeout(String),

    #[error("连接池已关闭")]
    PoolClosed,

    #[error("数据库连接失败: {0}")]
    DatabaseConnectionError(String),

    // ===== 数据库错误 =====
    #[error("记录未找到: {entity} with id={id}")]
    NotFound { entity: String, id: String },

    #[error("数据库事务失败: {0}")]
    DatabaseTransactionError(String),

    #[error("数据库查询失败: {0}")]
    DatabaseQueryError(String),

    #[error("唯一约束违反: {0}")]
    UniqueConstraintViolation(String),

    // ===== 数据质量错误 =====
    #[error("字段值错误 (field={field}): {message}")]
    FieldValueError { field: String, message: String },
}

// 实现 From<rusqlite::Error>
impl From<rusqlite::Error> for RepositoryError {
    fn from(err: rusqlite::Error) -> Self {
        match err {
            rusqlite::Error::SqliteFailure(_, Some(msg)) => {
                if msg.contains("UNIQUE") {
                    RepositoryError::UniqueConstraintViolation(msg)
                } else {
                    RepositoryError::DatabaseQueryError(msg)
                }
            }
            rusqlite::Error::QueryReturnedNoRows => RepositoryError::NotFound {
                entity: "Unknown".to_string(),
                id: "Unknown".to_string(),
            },
            _ => RepositoryError::DatabaseQueryError(err.to_string()),
        }
    }
}

// 实现 From<deadpool::managed::PoolError>
impl From<SqlitePoolError> for RepositoryError {
    fn from(err: SqlitePoolError) -> Self {
        use deadpool::managed::PoolError;

        match err {
            PoolError::Timeout(kind) => RepositoryError::PoolTimeout(format!("{:?}", kind)),
            PoolError::Closed => RepositoryError::PoolClosed,
            PoolError::Backend(e) => RepositoryError::DatabaseConnectionError(e.to_string()),
            other => RepositoryError::DatabaseConnectionError(other.to_string()),
        }
    }
}

/// Result 类型别名
pub type RepositoryResult<T> = Result<T, RepositoryError>;
