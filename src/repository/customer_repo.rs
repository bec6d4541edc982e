// ==========================================
// 员工表格入库 - 客户仓储（语句演示）
// ==========================================
// 原始语句: 无参数的查询，或调用方自行拼好的语句
// 参数化语句: 所有带用户输入的查询
// ==========================================

use crate::db::ConnectionPool;
use crate::domain::Customer;
use crate::repository::error::RepositoryResult;
use rusqlite::{params, OptionalExtension, Row};

pub const CREATE_CUSTOMER_TABLE_SQL: &str = r#"
    CREATE TABLE IF NOT EXISTS customer (
        id    TEXT PRIMARY KEY NOT NULL,
        name  TEXT NOT NULL,
        email TEXT NOT NULL
    )
"#;

fn row_to_customer(row: &Row<'_>) -> rusqlite::Result<Customer> {
    Ok(Customer {
        id: row.get(0)?,
        name: row.get(1)?,
        email: row.get(2)?,
    })
}

pub struct CustomerRepository<'a> {
    pool: &'a ConnectionPool,
}

impl<'a> CustomerRepository<'a> {
    pub fn new(pool: &'a ConnectionPool) -> Self {
        Self { pool }
    }

    pub async fn ensure_table(&self) -> RepositoryResult<()> {
        let conn = self.pool.get().await?;
        conn.execute_batch(CREATE_CUSTOMER_TABLE_SQL)?;
        Ok(())
    }

    /// 执行一条原始语句（不绑定参数），返回受影响行数
    ///
    /// 只用于不含用户输入的固定语句。
    pub async fn execute_raw(&self, sql: &str) -> RepositoryResult<usize> {
        let conn = self.pool.get().await?;
        Ok(conn.execute(sql, [])?)
    }

    /// 参数化插入
    pub async fn insert(&self, customer: &Customer) -> RepositoryResult<usize> {
        let conn = self.pool.get().await?;
        let affected = conn.execute(
            "INSERT INTO customer (id, name, email) VALUES (?1, ?2, ?3)",
            params![customer.id, customer.name, customer.email],
        )?;
        Ok(affected)
    }

    pub async fn update_name(&self, id: &str, name: &str) -> RepositoryResult<usize> {
        let conn = self.pool.get().await?;
        let affected = conn.execute(
            "UPDATE customer SET name = ?1 WHERE id = ?2",
            params![name, id],
        )?;
        Ok(affected)
    }

    pub async fn delete(&self, id: &str) -> RepositoryResult<usize> {
        let conn = self.pool.get().await?;
        let affected = conn.execute("DELETE FROM customer WHERE id = ?1", params![id])?;
        Ok(affected)
    }

    /// 全表查询（无参数，原始语句即可）
    pub async fn list_all(&self) -> RepositoryResult<Vec<Customer>> {
        let conn = self.pool.get().await?;
        let mut stmt = conn.prepare("SELECT id, name, email FROM customer ORDER BY id")?;
        let customers = stmt
            .query_map([], row_to_customer)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(customers)
    }

    pub async fn find_by_id(&self, id: &str) -> RepositoryResult<Option<Customer>> {
        let conn = self.pool.get().await?;
        let customer = conn
            .query_row(
                "SELECT id, name, email FROM customer WHERE id = ?1",
                params![id],
                row_to_customer,
            )
            .optional()?;
        Ok(customer)
    }
}
