// ==========================================
// 员工表格入库 - 导入层
// ==========================================
// 职责: 外部表格 → 员工记录 → 数据库
// 支持: Excel (.xlsx / .xls)
// ==========================================

// 模块声明
pub mod employee_importer;
pub mod error;
pub mod field_mapper;
pub mod file_parser;

// 重导出核心类型
pub use employee_importer::{
    read_employees, read_employees_from, read_employees_from_path, EmployeeImporter,
};
pub use error::{ImportError, ImportResult};
pub use field_mapper::{map_row, read_single_sheet, SheetRecord};
pub use file_parser::{
    open_workbook, open_workbook_path, CellValue, SheetGrid, SheetRow, TabularWorkbook,
    XlsWorkbook, XlsxWorkbook,
};
