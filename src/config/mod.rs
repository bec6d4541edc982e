// ==========================================
// 员工表格入库 - 配置层
// ==========================================
// 职责: 数据库路径 + 连接池参数
// 存储: JSON 配置文件（缺省字段取默认值）
// ==========================================

pub mod loader_config;

// 重导出核心配置
pub use loader_config::{
    default_database_path, ensure_database_dir, ConfigError, LoaderConfig, PoolConfig,
};
