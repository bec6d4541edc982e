// ==========================================
// 员工表格入库 - 表格读取器实现
// ==========================================
// 支持: Excel (.xlsx / .xls)，仅读取第一个工作表
// 输出: SheetGrid（整表驻留内存）
// ==========================================
// 单元格解析策略:
// - 公式单元格取最后一次缓存的计算结果
// - 日期格式的数值 → YYYY-MM-DD
// - 普通数值 → 十进制字符串（至少一位小数，如 55000.0）
// - 行内已占用列范围中的空白格 → Empty（保持列位置稳定）
// ==========================================

use crate::domain::ExcelType;
use crate::importer::error::{ImportError, ImportResult};
use calamine::{Data, DataType, Range, Reader, Xls, Xlsx};
use chrono::NaiveDate;
use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;
use tracing::debug;

/// 规范日期格式
pub const CANONICAL_DATE_FORMAT: &str = "%Y-%m-%d";

// ==========================================
// CellValue - 单元格值（闭合标签联合）
// ==========================================
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Empty,
    Text(String),
    Number(f64),
    Date(NaiveDate),
}

impl CellValue {
    /// 从 calamine 单元格转换（每个单元格只转换一次）
    pub fn from_data(cell: &Data) -> Self {
        match cell {
            Data::Empty => CellValue::Empty,
            Data::String(s) => CellValue::Text(s.clone()),
            Data::Float(f) => CellValue::Number(*f),
            Data::Int(i) => CellValue::Number(*i as f64),
            Data::DateTime(dt) => {
                if dt.is_duration() {
                    return CellValue::Number(dt.as_f64());
                }
                match cell.as_date() {
                    Some(date) => CellValue::Date(date),
                    None => CellValue::Number(dt.as_f64()),
                }
            }
            Data::DateTimeIso(s) => match cell.as_date() {
                Some(date) => CellValue::Date(date),
                None => CellValue::Text(s.clone()),
            },
            // 布尔 / 错误值 / ISO 时长: 既非文本也非数值，映射阶段忽略
            Data::Bool(_) | Data::Error(_) | Data::DurationIso(_) => CellValue::Empty,
        }
    }

    /// 映射阶段使用的文本表示；Empty 返回 None
    pub fn as_text(&self) -> Option<String> {
        match self {
            CellValue::Empty => None,
            CellValue::Text(s) => Some(s.clone()),
            CellValue::Number(n) => Some(format_number(*n)),
            CellValue::Date(d) => Some(d.format(CANONICAL_DATE_FORMAT).to_string()),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }
}

/// 数值转十进制字符串，整数值保留 ".0"
fn format_number(value: f64) -> String {
    format!("{:?}", value)
}

// ==========================================
// SheetRow - 一个物理行
// ==========================================
#[derive(Debug, Clone, PartialEq)]
pub struct SheetRow {
    index: usize,
    first_cell: usize,
    cells: Vec<CellValue>,
}

impl SheetRow {
    pub fn new(index: usize, first_cell: usize, cells: Vec<CellValue>) -> Self {
        Self {
            index,
            first_cell,
            cells,
        }
    }

    /// 物理行号（从 0 开始）
    pub fn index(&self) -> usize {
        self.index
    }

    /// 第一个已占用列
    pub fn first_cell_num(&self) -> usize {
        self.first_cell
    }

    /// 最后一个已占用列 + 1
    pub fn last_cell_num(&self) -> usize {
        self.first_cell + self.cells.len()
    }

    /// 取单元格；缺失的单元格按空白处理
    pub fn cell(&self, column: usize) -> &CellValue {
        column
            .checked_sub(self.first_cell)
            .and_then(|offset| self.cells.get(offset))
            .unwrap_or(&CellValue::Empty)
    }
}

// ==========================================
// SheetGrid - 整个工作表
// ==========================================
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SheetGrid {
    first_row: usize,
    last_row: usize,
    rows: Vec<Option<SheetRow>>,
}

impl SheetGrid {
    /// 从 calamine Range 构造（坐标均为绝对坐标）
    pub fn from_range(range: &Range<Data>) -> Self {
        let (start, end) = match (range.start(), range.end()) {
            (Some(start), Some(end)) => (start, end),
            _ => return Self::default(),
        };

        let (first_row, first_col) = (start.0 as usize, start.1 as usize);
        let (last_row, last_col) = (end.0 as usize, end.1 as usize);

        let mut rows = Vec::with_capacity(last_row - first_row + 1);
        for row_idx in first_row..=last_row {
            let values: Vec<CellValue> = (first_col..=last_col)
                .map(|col_idx| {
                    range
                        .get_value((row_idx as u32, col_idx as u32))
                        .map(CellValue::from_data)
                        .unwrap_or(CellValue::Empty)
                })
                .collect();
            rows.push(Self::trim_row(row_idx, first_col, values));
        }

        Self {
            first_row,
            last_row,
            rows,
        }
    }

    /// 按已占用单元格收缩行；整行空白视为不存在
    fn trim_row(index: usize, first_col: usize, values: Vec<CellValue>) -> Option<SheetRow> {
        let first = values.iter().position(|v| !v.is_empty())?;
        let last = values.iter().rposition(|v| !v.is_empty())?;
        let cells = values[first..=last].to_vec();
        Some(SheetRow::new(index, first_col + first, cells))
    }

    pub fn first_row_num(&self) -> usize {
        self.first_row
    }

    pub fn last_row_num(&self) -> usize {
        self.last_row
    }

    pub fn row(&self, index: usize) -> Option<&SheetRow> {
        index
            .checked_sub(self.first_row)
            .and_then(|offset| self.rows.get(offset))
            .and_then(|row| row.as_ref())
    }

    /// 数据行: 跳过表头，到最后一个物理行之前为止（不含最后一行）
    pub fn data_rows(&self) -> impl Iterator<Item = &SheetRow> + '_ {
        ((self.first_row + 1)..self.last_row).filter_map(move |idx| self.row(idx))
    }
}

// ==========================================
// TabularWorkbook - 工作簿能力接口
// ==========================================
pub trait TabularWorkbook {
    /// 工作簿格式
    fn format(&self) -> ExcelType;

    /// 读取第一个工作表（整表载入内存）
    fn first_sheet(&mut self) -> ImportResult<SheetGrid>;
}

/// 读取任意 calamine Reader 的第一个工作表
fn first_sheet_range<RS, R>(workbook: &mut R) -> ImportResult<Range<Data>>
where
    RS: Read + Seek,
    R: Reader<RS>,
    R::Error: std::fmt::Display,
{
    let sheet_names = workbook.sheet_names();
    let sheet_name = sheet_names
        .first()
        .cloned()
        .ok_or_else(|| ImportError::ExcelParseError("Excel 文件无工作表".to_string()))?;

    debug!(sheet = %sheet_name, "读取第一个工作表");

    workbook
        .worksheet_range(&sheet_name)
        .map_err(|e| ImportError::ExcelParseError(e.to_string()))
}

// ==========================================
// XlsxWorkbook - zip 打包 XML 格式
// ==========================================
pub struct XlsxWorkbook<RS: Read + Seek> {
    inner: Xlsx<RS>,
}

impl<RS: Read + Seek> XlsxWorkbook<RS> {
    pub fn new(reader: RS) -> ImportResult<Self> {
        let inner = Xlsx::new(reader)?;
        Ok(Self { inner })
    }
}

impl<RS: Read + Seek> TabularWorkbook for XlsxWorkbook<RS> {
    fn format(&self) -> ExcelType {
        ExcelType::Xlsx
    }

    fn first_sheet(&mut self) -> ImportResult<SheetGrid> {
        let range = first_sheet_range(&mut self.inner)?;
        Ok(SheetGrid::from_range(&range))
    }
}

// ==========================================
// XlsWorkbook - 旧版二进制格式
// ==========================================
pub struct XlsWorkbook<RS: Read + Seek> {
    inner: Xls<RS>,
}

impl<RS: Read + Seek> XlsWorkbook<RS> {
    pub fn new(reader: RS) -> ImportResult<Self> {
        let inner = Xls::new(reader)?;
        Ok(Self { inner })
    }
}

impl<RS: Read + Seek> TabularWorkbook for XlsWorkbook<RS> {
    fn format(&self) -> ExcelType {
        ExcelType::Xls
    }

    fn first_sheet(&mut self) -> ImportResult<SheetGrid> {
        let range = first_sheet_range(&mut self.inner)?;
        Ok(SheetGrid::from_range(&range))
    }
}

// ==========================================
// 工作簿工厂（按格式标记选择实现）
// ==========================================

/// 从字节流打开工作簿
pub fn open_workbook<RS>(kind: ExcelType, reader: RS) -> ImportResult<Box<dyn TabularWorkbook>>
where
    RS: Read + Seek + 'static,
{
    let workbook: Box<dyn TabularWorkbook> = match kind {
        ExcelType::Xlsx => Box::new(XlsxWorkbook::new(reader)?),
        ExcelType::Xls => Box::new(XlsWorkbook::new(reader)?),
    };
    Ok(workbook)
}

/// 从文件路径打开工作簿（格式由扩展名决定）
pub fn open_workbook_path<P: AsRef<Path>>(file_path: P) -> ImportResult<Box<dyn TabularWorkbook>> {
    let path = file_path.as_ref();

    // 检查文件存在
    if !path.exists() {
        return Err(ImportError::FileNotFound(path.display().to_string()));
    }

    // 检查扩展名
    let kind = ExcelType::from_path(path)?;

    let file = File::open(path)?;
    open_workbook(kind, BufReader::new(file))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn text(s: &str) -> CellValue {
        CellValue::Text(s.to_string())
    }

    #[test]
    fn test_number_keeps_fraction_digit() {
        assert_eq!(CellValue::Number(55000.0).as_text().as_deref(), Some("55000.0"));
        assert_eq!(CellValue::Number(0.15).as_text().as_deref(), Some("0.15"));
        assert_eq!(CellValue::Number(55000.9).as_text().as_deref(), Some("55000.9"));
    }

    #[test]
    fn test_date_is_canonical() {
        let date = NaiveDate::from_ymd_opt(2023, 3, 5).unwrap();
        assert_eq!(CellValue::Date(date).as_text().as_deref(), Some("2023-03-05"));
        assert_eq!(CellValue::Empty.as_text(), None);
    }

    #[test]
    fn test_from_data_basic_variants() {
        assert_eq!(CellValue::from_data(&Data::Empty), CellValue::Empty);
        assert_eq!(CellValue::from_data(&Data::String("E1".into())), text("E1"));
        assert_eq!(CellValue::from_data(&Data::Int(35)), CellValue::Number(35.0));
        assert_eq!(CellValue::from_data(&Data::Bool(true)), CellValue::Empty);
    }

    #[test]
    fn test_row_missing_cell_is_blank() {
        let row = SheetRow::new(3, 2, vec![text("a"), CellValue::Empty, text("c")]);

        assert_eq!(row.first_cell_num(), 2);
        assert_eq!(row.last_cell_num(), 5);
        assert_eq!(row.cell(0), &CellValue::Empty);
        assert_eq!(row.cell(2), &text("a"));
        assert_eq!(row.cell(3), &CellValue::Empty);
        assert_eq!(row.cell(9), &CellValue::Empty);
    }

    #[test]
    fn test_grid_skips_header_and_last_row() {
        let mut range: Range<Data> = Range::new((0, 0), (4, 1));
        for r in 0..=4u32 {
            range.set_value((r, 0), Data::String(format!("R{}", r)));
        }
        // 第 2 行整行空白
        range.set_value((2, 0), Data::Empty);

        let grid = SheetGrid::from_range(&range);
        let indexes: Vec<usize> = grid.data_rows().map(|r| r.index()).collect();

        assert_eq!(grid.first_row_num(), 0);
        assert_eq!(grid.last_row_num(), 4);
        assert_eq!(indexes, vec![1, 3]);
    }

    #[test]
    fn test_grid_from_empty_range() {
        let range: Range<Data> = Range::empty();
        let grid = SheetGrid::from_range(&range);
        assert_eq!(grid.data_rows().count(), 0);
    }

    #[test]
    fn test_open_workbook_rejects_garbage() {
        let bytes = Cursor::new(b"definitely not a spreadsheet".to_vec());
        assert!(matches!(
            open_workbook(ExcelType::Xlsx, bytes),
            Err(ImportError::ExcelParseError(_))
        ));

        let bytes = Cursor::new(b"definitely not a spreadsheet".to_vec());
        assert!(matches!(
            open_workbook(ExcelType::Xls, bytes),
            Err(ImportError::ExcelParseError(_))
        ));
    }

    #[test]
    fn test_open_workbook_path_errors() {
        assert!(matches!(
            open_workbook_path("does/not/exist.xlsx"),
            Err(ImportError::FileNotFound(_))
        ));

        let temp = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        assert!(matches!(
            open_workbook_path(temp.path()),
            Err(ImportError::UnsupportedFormat(_))
        ));
    }
}
