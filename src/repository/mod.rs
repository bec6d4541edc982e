// ==========================================
// 员工表格入库 - 数据仓储层
// ==========================================
// 职责: 提供数据访问接口,屏蔽数据库细节
// 约束: 带用户输入的查询一律参数化
//       （user_repo::login_raw 为注入对照，除外）
// ==========================================

pub mod customer_repo;
pub mod employee_repo;
pub mod error;
pub mod user_repo;

// 重导出核心仓储
pub use customer_repo::CustomerRepository;
pub use employee_repo::{EmployeeRepository, EmployeeStore, LoadReport, BATCH_FLUSH_INTERVAL};
pub use error::{RepositoryError, RepositoryResult};
pub use user_repo::UserRepository;
