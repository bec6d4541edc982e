// ==========================================
// 员工表格入库 - 加载器配置
// ==========================================
// 来源: JSON 配置文件（所有字段均有默认值）
// 示例:
// {
//   "database_path": "employee.db",
//   "pool": { "max_size": 10, "min_idle": 5,
//             "idle_timeout_ms": 60000, "connection_timeout_ms": 600000 }
// }
// ==========================================

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// 配置错误类型
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("配置文件读取失败 ({path}): {message}")]
    ReadError { path: String, message: String },

    #[error("配置文件格式错误 ({path}): {message}")]
    ParseError { path: String, message: String },

    #[error("配置值错误 (key: {key}): {message}")]
    ValueError { key: String, message: String },

    #[error("数据库目录创建失败 ({path}): {message}")]
    DirectoryError { path: String, message: String },
}

// ==========================================
// PoolConfig - 连接池配置
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PoolConfig {
    /// 池内最大连接数
    pub max_size: usize,
    /// 最小空闲连接数
    pub min_idle: usize,
    /// 空闲超时（毫秒），超过后可被回收（保留 min_idle 个）
    pub idle_timeout_ms: u64,
    /// 获取连接的等待超时（毫秒）
    pub connection_timeout_ms: u64,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            max_size: 10,
            min_idle: 5,
            idle_timeout_ms: 60_000,
            connection_timeout_ms: 10 * 60_000,
        }
    }
}

impl PoolConfig {
    pub fn idle_timeout(&self) -> Duration {
        Duration::from_millis(self.idle_timeout_ms)
    }

    pub fn connection_timeout(&self) -> Duration {
        Duration::from_millis(self.connection_timeout_ms)
    }

    /// 校验取值
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_size == 0 {
            return Err(ConfigError::ValueError {
                key: "pool.max_size".to_string(),
                message: "必须大于 0".to_string(),
            });
        }
        if self.min_idle > self.max_size {
            return Err(ConfigError::ValueError {
                key: "pool.min_idle".to_string(),
                message: format!("不能大于 max_size ({})", self.max_size),
            });
        }
        Ok(())
    }
}

// ==========================================
// LoaderConfig - 顶层配置
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoaderConfig {
    /// SQLite 数据库文件路径（缺省时才解析默认路径）
    #[serde(default = "default_database_path")]
    pub database_path: String,
    #[serde(default)]
    pub pool: PoolConfig,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            pool: PoolConfig::default(),
        }
    }
}

impl LoaderConfig {
    /// 从 JSON 文件加载配置
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

        let config: LoaderConfig =
            serde_json::from_str(&raw).map_err(|e| ConfigError::ParseError {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;

        config.pool.validate()?;
        Ok(config)
    }
}

/// 默认数据库路径（只解析，不创建目录）
///
/// 优先级: EMPLOYEE_LOADER_DB_PATH > 用户数据目录 > ./employee_loader.db
pub fn default_database_path() -> String {
    if let Ok(path) = std::env::var("EMPLOYEE_LOADER_DB_PATH") {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }

    let path = match dirs::data_dir() {
        Some(data_dir) => data_dir.join("employee-loader").join("employee_loader.db"),
        None => PathBuf::from("./employee_loader.db"),
    };
    path.to_string_lossy().to_string()
}

/// 确保数据库文件所在目录存在（打开连接池前调用）
pub fn ensure_database_dir(database_path: &str) -> Result<(), ConfigError> {
    let parent = match Path::new(database_path).parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => return Ok(()),
    };

    std::fs::create_dir_all(parent).map_err(|e| ConfigError::DirectoryError {
        path: parent.display().to_string(),
        message: e.to_string(),
    })
}
