// ==========================================
// 员工表格入库 - 员工仓储（批量加载器）
// ==========================================
// 批量规则:
// - 每条记录按列顺序绑定 14 个参数，加入待执行批次
// - 位置 i 满足 i % 100 == 0 且 i != 0 时执行一次批次
// - 循环结束后无论剩余多少都再执行一次
// - 空输入不执行任何批次
// 失败语义:
// - 每个批次在一个事务中提交；失败只回滚当前批次
// - 之前已提交的批次保留，无重试
// ==========================================

use crate::db::ConnectionPool;
use crate::domain::{Employee, EmployeeDraft, Gender, EMPLOYEE_COLUMN_COUNT};
use crate::perf::PerfGuard;
use crate::repository::error::{RepositoryError, RepositoryResult};
use async_trait::async_trait;
use rusqlite::{params_from_iter, Connection, Row, Statement};
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{debug, info};
use uuid::Uuid;

/// 批次执行间隔
pub const BATCH_FLUSH_INTERVAL: usize = 100;

/// employee 表结构（仅演示用，不做迁移管理）
pub const CREATE_EMPLOYEE_TABLE_SQL: &str = r#"
    CREATE TABLE IF NOT EXISTS employee (
        id            TEXT PRIMARY KEY NOT NULL,
        full_name     TEXT,
        job_title     TEXT,
        department    TEXT,
        business_unit TEXT,
        gender        TEXT,
        ethnicity     TEXT,
        age           INTEGER,
        hire_date     TEXT,
        annual_salary INTEGER,
        bonus         TEXT,
        country       TEXT,
        city          TEXT,
        exit_date     TEXT
    )
"#;

/// 插入语句（列顺序与映射顺序一致）
pub const INSERT_EMPLOYEE_SQL: &str =
    "INSERT INTO employee VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)";

const SELECT_EMPLOYEE_SQL: &str = r#"
    SELECT id, full_name, job_title, department, business_unit, gender, ethnicity,
           age, hire_date, annual_salary, bonus, country, city, exit_date
    FROM employee
    ORDER BY id
"#;

/// 位置 i 处是否执行批次（不含循环结束后的最后一次）
pub fn should_flush(position: usize) -> bool {
    position % BATCH_FLUSH_INTERVAL == 0 && position != 0
}

// ==========================================
// LoadReport - 一次批量加载的结果
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadReport {
    pub load_id: String,
    pub total_records: usize,
    /// 第 k 次批次执行的语句数
    pub flushes: Vec<usize>,
    pub elapsed_ms: u128,
}

impl LoadReport {
    pub fn flush_count(&self) -> usize {
        self.flushes.len()
    }

    pub fn rows_written(&self) -> usize {
        self.flushes.iter().sum()
    }
}

// ==========================================
// EmployeeStore - 员工写入接口
// ==========================================
// 实现者: EmployeeRepository（rusqlite + 连接池）
#[async_trait]
pub trait EmployeeStore: Send + Sync {
    /// 批量写入全部员工记录
    ///
    /// # 返回
    /// - Ok(LoadReport): 批次统计
    /// - Err: 任一批次失败即终止（已提交批次保留）
    async fn bulk_insert(&self, employees: &[Employee]) -> RepositoryResult<LoadReport>;
}

// ==========================================
// StatementBatch - 待执行的参数集
// ==========================================
#[derive(Debug, Default)]
struct StatementBatch {
    pending: Vec<[Option<String>; EMPLOYEE_COLUMN_COUNT]>,
}

impl StatementBatch {
    fn add(&mut self, params: [Option<String>; EMPLOYEE_COLUMN_COUNT]) {
        self.pending.push(params);
    }

    /// 在一个事务中执行全部待执行语句并提交
    fn flush(&mut self, conn: &Connection, stmt: &mut Statement<'_>) -> RepositoryResult<usize> {
        let count = self.pending.len();
        let tx = conn
            .unchecked_transaction()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;

        for params in self.pending.drain(..) {
            stmt.execute(params_from_iter(params.iter()))?;
        }

        tx.commit()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;
        debug!(statements = count, "批次已执行");
        Ok(count)
    }
}

/// 在给定连接上执行批量插入，返回每次批次的语句数
fn bulk_insert_on(conn: &Connection, employees: &[Employee]) -> RepositoryResult<Vec<usize>> {
    let mut flushes = Vec::new();
    if employees.is_empty() {
        return Ok(flushes);
    }

    let _perf = PerfGuard::new("employee.bulk_insert");
    let mut stmt = conn.prepare(INSERT_EMPLOYEE_SQL)?;
    let mut batch = StatementBatch::default();

    for (position, employee) in employees.iter().enumerate() {
        batch.add(employee.to_bind_params());

        if should_flush(position) {
            flushes.push(batch.flush(conn, &mut stmt)?);
        }
    }

    // 剩余记录
    flushes.push(batch.flush(conn, &mut stmt)?);

    Ok(flushes)
}

fn row_to_employee(row: &Row<'_>) -> RepositoryResult<Employee> {
    let id: String = row.get(0)?;

    let draft = EmployeeDraft {
        id: Some(id.clone()),
        full_name: row.get(1)?,
        job_title: row.get(2)?,
        department: row.get(3)?,
        business_unit: row.get(4)?,
        gender: row.get::<_, Option<String>>(5)?.map(|g| Gender::decode(&g)),
        ethnicity: row.get(6)?,
        age: int_column(row.get(7)?, "age")?,
        hire_date: row.get(8)?,
        annual_salary: int_column(row.get(9)?, "annual_salary")?,
        bonus: row.get(10)?,
        country: row.get(11)?,
        city: row.get(12)?,
        exit_date: row.get(13)?,
    };

    draft.finish().ok_or_else(|| RepositoryError::FieldValueError {
        field: "id".to_string(),
        message: format!("主键为空: '{}'", id),
    })
}

fn int_column(value: Option<i64>, field: &str) -> RepositoryResult<Option<i32>> {
    value
        .map(|v| {
            i32::try_from(v).map_err(|_| RepositoryError::FieldValueError {
                field: field.to_string(),
                message: format!("超出 i32 范围: {}", v),
            })
        })
        .transpose()
}

// ==========================================
// EmployeeRepository
// ==========================================
pub struct EmployeeRepository<'a> {
    pool: &'a ConnectionPool,
}

impl<'a> EmployeeRepository<'a> {
    pub fn new(pool: &'a ConnectionPool) -> Self {
        Self { pool }
    }

    /// 创建 employee 表（已存在则跳过）
    pub async fn ensure_table(&self) -> RepositoryResult<()> {
        let conn = self.pool.get().await?;
        conn.execute_batch(CREATE_EMPLOYEE_TABLE_SQL)?;
        Ok(())
    }

    /// 按主键顺序读回全部员工
    pub async fn list_all(&self) -> RepositoryResult<Vec<Employee>> {
        let conn = self.pool.get().await?;
        let mut stmt = conn.prepare(SELECT_EMPLOYEE_SQL)?;
        let mut rows = stmt.query([])?;

        let mut employees = Vec::new();
        while let Some(row) = rows.next()? {
            employees.push(row_to_employee(row)?);
        }
        Ok(employees)
    }

    pub async fn count(&self) -> RepositoryResult<usize> {
        let conn = self.pool.get().await?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM employee", [], |row| row.get(0))?;
        Ok(count as usize)
    }
}

#[async_trait]
impl<'a> EmployeeStore for EmployeeRepository<'a> {
    async fn bulk_insert(&self, employees: &[Employee]) -> RepositoryResult<LoadReport> {
        let load_id = Uuid::new_v4().to_string();
        let start = Instant::now();

        let conn = self.pool.get().await?;
        let flushes = bulk_insert_on(&conn, employees)?;
        drop(conn);

        let report = LoadReport {
            load_id,
            total_records: employees.len(),
            flushes,
            elapsed_ms: start.elapsed().as_millis(),
        };

        info!(
            load_id = %report.load_id,
            total = report.total_records,
            flushes = report.flush_count(),
            elapsed_ms = report.elapsed_ms,
            "员工批量写入完成"
        );
        Ok(report)
    }
}
