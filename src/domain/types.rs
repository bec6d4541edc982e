// ==========================================
// 员工表格入库 - 领域类型定义
// ==========================================
// 职责: 性别枚举 / 表格格式枚举
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

// ==========================================
// 性别 (Gender)
// ==========================================
// 解码不对称: 只有精确的 "Male" 识别为 Male，其余一律 Female
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    /// 表格/数据库中使用的文本值
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
        }
    }

    /// 从单元格文本解码（不会失败）
    pub fn decode(value: &str) -> Self {
        if value == Gender::Male.as_str() {
            Gender::Male
        } else {
            Gender::Female
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ==========================================
// 表格格式 (Excel Type)
// ==========================================
// Xls: 旧版二进制 (BIFF)
// Xlsx: zip 打包的 XML
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExcelType {
    Xls,
    Xlsx,
}

impl ExcelType {
    /// 按文件扩展名识别格式
    pub fn from_path(path: &std::path::Path) -> Result<Self, UnknownExcelType> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("");
        ext.parse()
    }
}

impl fmt::Display for ExcelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExcelType::Xls => write!(f, "xls"),
            ExcelType::Xlsx => write!(f, "xlsx"),
        }
    }
}

/// 无法识别的格式标记
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct UnknownExcelType(pub String);

impl FromStr for ExcelType {
    type Err = UnknownExcelType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "xls" => Ok(ExcelType::Xls),
            "xlsx" => Ok(ExcelType::Xlsx),
            other => Err(UnknownExcelType(other.to_string())),
        }
    }
}
