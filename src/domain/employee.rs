// ==========================================
// 员工表格入库 - 员工领域模型
// ==========================================
// 生命周期:
// EmployeeDraft（空）→ 行映射逐列填充 → finish()
//   → Some(Employee)  主键非空，进入输出序列
//   → None            主键缺失，静默丢弃
// ==========================================

use crate::domain::types::Gender;
use serde::{Deserialize, Serialize};

/// employee 表的列数（与映射顺序一致）
pub const EMPLOYEE_COLUMN_COUNT: usize = 14;

// ==========================================
// Employee - 员工记录（构造后只读）
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    // ===== 主键 =====
    id: String,

    // ===== 基础信息 =====
    full_name: Option<String>,
    job_title: Option<String>,
    department: Option<String>,
    business_unit: Option<String>,
    gender: Option<Gender>,
    ethnicity: Option<String>,
    age: Option<i32>,

    // ===== 雇佣信息 =====
    hire_date: Option<String>,     // YYYY-MM-DD
    annual_salary: Option<i32>,
    bonus: Option<String>,
    country: Option<String>,
    city: Option<String>,
    exit_date: Option<String>,     // 在职时为空
}

impl Employee {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn full_name(&self) -> Option<&str> {
        self.full_name.as_deref()
    }

    pub fn job_title(&self) -> Option<&str> {
        self.job_title.as_deref()
    }

    pub fn department(&self) -> Option<&str> {
        self.department.as_deref()
    }

    pub fn business_unit(&self) -> Option<&str> {
        self.business_unit.as_deref()
    }

    pub fn gender(&self) -> Option<Gender> {
        self.gender
    }

    pub fn ethnicity(&self) -> Option<&str> {
        self.ethnicity.as_deref()
    }

    pub fn age(&self) -> Option<i32> {
        self.age
    }

    pub fn hire_date(&self) -> Option<&str> {
        self.hire_date.as_deref()
    }

    pub fn annual_salary(&self) -> Option<i32> {
        self.annual_salary
    }

    pub fn bonus(&self) -> Option<&str> {
        self.bonus.as_deref()
    }

    pub fn country(&self) -> Option<&str> {
        self.country.as_deref()
    }

    pub fn city(&self) -> Option<&str> {
        self.city.as_deref()
    }

    pub fn exit_date(&self) -> Option<&str> {
        self.exit_date.as_deref()
    }

    /// 按列顺序输出绑定参数（数值字段转为文本）
    pub fn to_bind_params(&self) -> [Option<String>; EMPLOYEE_COLUMN_COUNT] {
        [
            Some(self.id.clone()),
            self.full_name.clone(),
            self.job_title.clone(),
            self.department.clone(),
            self.business_unit.clone(),
            self.gender.map(|g| g.as_str().to_string()),
            self.ethnicity.clone(),
            self.age.map(|v| v.to_string()),
            self.hire_date.clone(),
            self.annual_salary.map(|v| v.to_string()),
            self.bonus.clone(),
            self.country.clone(),
            self.city.clone(),
            self.exit_date.clone(),
        ]
    }
}

// ==========================================
// EmployeeDraft - 映射过程中的可变草稿
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmployeeDraft {
    pub id: Option<String>,
    pub full_name: Option<String>,
    pub job_title: Option<String>,
    pub department: Option<String>,
    pub business_unit: Option<String>,
    pub gender: Option<Gender>,
    pub ethnicity: Option<String>,
    pub age: Option<i32>,
    pub hire_date: Option<String>,
    pub annual_salary: Option<i32>,
    pub bonus: Option<String>,
    pub country: Option<String>,
    pub city: Option<String>,
    pub exit_date: Option<String>,
}

impl EmployeeDraft {
    pub fn new() -> Self {
        Self::default()
    }

    /// 定稿：主键为空或缺失时返回 None
    pub fn finish(self) -> Option<Employee> {
        let id = self.id.filter(|id| !id.is_empty())?;

        Some(Employee {
            id,
            full_name: self.full_name,
            job_title: self.job_title,
            department: self.department,
            business_unit: self.business_unit,
            gender: self.gender,
            ethnicity: self.ethnicity,
            age: self.age,
            hire_date: self.hire_date,
            annual_salary: self.annual_salary,
            bonus: self.bonus,
            country: self.country,
            city: self.city,
            exit_date: self.exit_date,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_finish_without_id_is_dropped() {
        assert!(EmployeeDraft::new().finish().is_none());

        let draft = EmployeeDraft {
            id: Some(String::new()),
            full_name: Some("Emily Davis".to_string()),
            ..Default::default()
        };
        assert!(draft.finish().is_none());
    }

    #[test]
    fn test_bind_params_follow_column_order() {
        let draft = EmployeeDraft {
            id: Some("E02387".to_string()),
            full_name: Some("Emily Davis".to_string()),
            gender: Some(Gender::Female),
            age: Some(55),
            annual_salary: Some(141604),
            city: Some("Seattle".to_string()),
            ..Default::default()
        };
        let employee = draft.finish().unwrap();
        let params = employee.to_bind_params();

        assert_eq!(params[0].as_deref(), Some("E02387"));
        assert_eq!(params[1].as_deref(), Some("Emily Davis"));
        assert_eq!(params[5].as_deref(), Some("Female"));
        assert_eq!(params[7].as_deref(), Some("55"));
        assert_eq!(params[9].as_deref(), Some("141604"));
        assert_eq!(params[12].as_deref(), Some("Seattle"));
        assert_eq!(params[13], None);
    }
}
