// ==========================================
// 员工表格入库 - 领域模型层
// ==========================================
// 职责: 定义领域实体与类型
// 红线: 不含数据访问逻辑
// ==========================================

pub mod customer;
pub mod employee;
pub mod types;

// 重导出核心类型
pub use customer::{Customer, User};
pub use employee::{Employee, EmployeeDraft, EMPLOYEE_COLUMN_COUNT};
pub use types::{ExcelType, Gender, UnknownExcelType};
