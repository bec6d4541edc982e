// ==========================================
// 员工表格入库 - 核心库
// ==========================================
// 流程: Excel 工作表 → 员工记录 → SQLite 批量写入
// 技术栈: calamine + rusqlite + deadpool
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 数据仓储层 - 数据访问
pub mod repository;

// 导入层 - 外部表格
pub mod importer;

// 配置层 - 数据库路径与连接池参数
pub mod config;

// 数据库基础设施（连接初始化/连接池）
pub mod db;

// 日志系统
pub mod logging;

// SQL 性能统计
pub mod perf;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{ExcelType, Gender};

// 领域实体
pub use domain::{Customer, Employee, EmployeeDraft, User};

// 导入
pub use importer::{EmployeeImporter, ImportError, ImportResult};

// 仓储
pub use repository::{
    CustomerRepository, EmployeeRepository, EmployeeStore, LoadReport, RepositoryError,
    RepositoryResult, UserRepository,
};

// 基础设施
pub use config::{LoaderConfig, PoolConfig};
pub use db::{ConnectionPool, PoolStatus};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "employee-loader";
