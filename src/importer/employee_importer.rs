// ==========================================
// 员工表格入库 - 员工导入器
// ==========================================
// 流程: 打开工作簿 → 整表载入 → 行映射 → 员工序列 → 批量写入
// 约束: 读取全部完成后才开始写库（读写不重叠）
// ==========================================

use crate::domain::{Employee, ExcelType};
use crate::importer::error::ImportResult;
use crate::importer::field_mapper::read_single_sheet;
use crate::importer::file_parser::{open_workbook, open_workbook_path, TabularWorkbook};
use crate::repository::{EmployeeStore, LoadReport};
use std::io::{Read, Seek};
use std::path::Path;
use tracing::{debug, info, instrument};

/// 读取工作簿第一个工作表中的全部有效员工
pub fn read_employees(workbook: &mut dyn TabularWorkbook) -> ImportResult<Vec<Employee>> {
    let grid = workbook.first_sheet()?;
    debug!(
        format = %workbook.format(),
        first_row = grid.first_row_num(),
        last_row = grid.last_row_num(),
        "工作表已载入"
    );
    read_single_sheet::<Employee>(&grid)
}

/// 从字节流读取员工（格式由调用方声明）
pub fn read_employees_from<RS>(kind: ExcelType, reader: RS) -> ImportResult<Vec<Employee>>
where
    RS: Read + Seek + 'static,
{
    let mut workbook = open_workbook(kind, reader)?;
    read_employees(workbook.as_mut())
}

/// 从文件读取员工（格式由扩展名决定）
pub fn read_employees_from_path<P: AsRef<Path>>(file_path: P) -> ImportResult<Vec<Employee>> {
    let mut workbook = open_workbook_path(file_path)?;
    read_employees(workbook.as_mut())
}

// ==========================================
// EmployeeImporter
// ==========================================
pub struct EmployeeImporter<S: EmployeeStore> {
    store: S,
}

impl<S: EmployeeStore> EmployeeImporter<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// 从 Excel 文件导入员工数据
    ///
    /// # 参数
    /// - file_path: Excel 文件路径（.xlsx, .xls）
    ///
    /// # 返回
    /// - Ok(LoadReport): 批次统计
    /// - Err: 文件/解析/类型转换/数据库错误，均终止本次导入
    #[instrument(skip(self, file_path), fields(file = %file_path.as_ref().display()))]
    pub async fn import_file<P: AsRef<Path> + Send>(&self, file_path: P) -> ImportResult<LoadReport> {
        // === 步骤 1: 读取并映射 ===
        let employees = read_employees_from_path(file_path.as_ref())?;
        info!(records = employees.len(), "表格读取完成");

        // === 步骤 2: 批量写入 ===
        self.import_records(&employees).await
    }

    /// 写入已读取的员工序列
    pub async fn import_records(&self, employees: &[Employee]) -> ImportResult<LoadReport> {
        let report = self.store.bulk_insert(employees).await?;
        info!(
            load_id = %report.load_id,
            rows = report.rows_written(),
            flushes = report.flush_count(),
            "员工数据导入完成"
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::importer::error::ImportError;
    use crate::repository::{RepositoryError, RepositoryResult};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct RecordingStore {
        calls: AtomicUsize,
        fail: bool,
    }

    #[async_trait]
    impl EmployeeStore for RecordingStore {
        async fn bulk_insert(&self, employees: &[Employee]) -> RepositoryResult<LoadReport> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(RepositoryError::DatabaseQueryError("disk full".to_string()));
            }
            Ok(LoadReport {
                load_id: "test".to_string(),
                total_records: employees.len(),
                flushes: vec![employees.len()],
                elapsed_ms: 0,
            })
        }
    }

    #[tokio::test]
    async fn test_missing_file_never_reaches_store() {
        let importer = EmployeeImporter::new(RecordingStore::default());
        let result = importer.import_file("missing/employees.xlsx").await;

        assert!(matches!(result, Err(ImportError::FileNotFound(_))));
        assert_eq!(importer.store.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_store_error_is_propagated() {
        let importer = EmployeeImporter::new(RecordingStore {
            fail: true,
            ..Default::default()
        });
        let result = importer.import_records(&[]).await;

        assert!(matches!(
            result,
            Err(ImportError::Repository(RepositoryError::DatabaseQueryError(_)))
        ));
    }
}
