// ==========================================
// 员工表格入库 - 字段映射器实现
// ==========================================
// 职责: 物理列序号 → 记录字段 + 类型转换
// 约束: 仅按列位置映射，不存在按表头名称查找的兜底
// ==========================================
// 员工表列布局:
//  0 员工号      1 姓名        2 职位        3 部门
//  4 业务单元    5 性别        6 族裔        7 年龄
//  8 入职日期    9 年薪       10 奖金       11 国家
// 12 城市       13 离职日期
// ==========================================

use crate::domain::{Employee, EmployeeDraft, Gender};
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::file_parser::{SheetGrid, SheetRow};
use tracing::debug;

// ==========================================
// SheetRecord - 固定列布局的表格记录
// ==========================================
pub trait SheetRecord: Sized {
    /// 映射过程中的可变草稿
    type Draft: Default;

    /// 把一个单元格的文本值写入草稿
    ///
    /// # 参数
    /// - column: 物理列序号（从 0 开始）
    /// - value: 单元格文本
    /// - row_number: 表格行号（从 1 开始，用于错误定位）
    fn assign(
        draft: &mut Self::Draft,
        column: usize,
        value: String,
        row_number: usize,
    ) -> ImportResult<()>;

    /// 定稿；返回 None 表示该行被丢弃
    fn finish(draft: Self::Draft) -> Option<Self>;
}

/// 把一个物理行映射到草稿
///
/// 遍历行内第一个到最后一个已占用列；空白单元格跳过。
pub fn map_row<T: SheetRecord>(row: &SheetRow, draft: &mut T::Draft) -> ImportResult<()> {
    let row_number = row.index() + 1;
    for column in row.first_cell_num()..row.last_cell_num() {
        if let Some(value) = row.cell(column).as_text() {
            T::assign(draft, column, value, row_number)?;
        }
    }
    Ok(())
}

/// 读取单个工作表的全部有效记录
pub fn read_single_sheet<T: SheetRecord>(grid: &SheetGrid) -> ImportResult<Vec<T>> {
    let mut records = Vec::new();
    let mut skipped = 0usize;

    for row in grid.data_rows() {
        let mut draft = T::Draft::default();
        map_row::<T>(row, &mut draft)?;

        match T::finish(draft) {
            Some(record) => records.push(record),
            None => skipped += 1,
        }
    }

    debug!(records = records.len(), skipped, "工作表映射完成");
    Ok(records)
}

/// 数值字符串 → 整数（截断，不四舍五入）
pub fn truncate_to_i32(value: &str, field: &str, row_number: usize) -> ImportResult<i32> {
    value
        .trim()
        .parse::<f64>()
        .map(|v| v as i32)
        .map_err(|_| ImportError::TypeConversionError {
            row: row_number,
            field: field.to_string(),
            message: format!("无法解析为数值: {}", value),
        })
}

// ==========================================
// Employee 的列映射规则
// ==========================================
impl SheetRecord for Employee {
    type Draft = EmployeeDraft;

    fn assign(
        draft: &mut EmployeeDraft,
        column: usize,
        value: String,
        row_number: usize,
    ) -> ImportResult<()> {
        match column {
            0 => draft.id = Some(value),
            1 => draft.full_name = Some(value),
            2 => draft.job_title = Some(value),
            3 => draft.department = Some(value),
            4 => draft.business_unit = Some(value),
            5 => draft.gender = Some(Gender::decode(&value)),
            6 => draft.ethnicity = Some(value),
            7 => draft.age = Some(truncate_to_i32(&value, "age", row_number)?),
            8 => draft.hire_date = Some(value),
            9 => draft.annual_salary = Some(truncate_to_i32(&value, "annual_salary", row_number)?),
            10 => draft.bonus = Some(value),
            11 => draft.country = Some(value),
            12 => draft.city = Some(value),
            13 => draft.exit_date = Some(value),
            _ => {}
        }
        Ok(())
    }

    fn finish(draft: EmployeeDraft) -> Option<Self> {
        draft.finish()
    }
}
