// ==========================================
// 员工表格入库 - 用户仓储（SQL 注入演示）
// ==========================================
// login_raw: 字符串拼接 SQL，可被注入
//   username = "admin' --" 时实际执行:
//   SELECT ... WHERE username = 'admin' --' AND password = '...'
//   密码条件被注释掉
// login:     参数绑定，输入始终按字面值比较
// ==========================================

use crate::db::ConnectionPool;
use crate::domain::User;
use crate::repository::error::RepositoryResult;
use rusqlite::{params, OptionalExtension, Row};
use tracing::{debug, warn};

pub const CREATE_USER_TABLE_SQL: &str = r#"
    CREATE TABLE IF NOT EXISTS user (
        username TEXT PRIMARY KEY NOT NULL,
        password TEXT NOT NULL
    )
"#;

fn row_to_user(row: &Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        username: row.get(0)?,
        password: row.get(1)?,
    })
}

pub struct UserRepository<'a> {
    pool: &'a ConnectionPool,
}

impl<'a> UserRepository<'a> {
    pub fn new(pool: &'a ConnectionPool) -> Self {
        Self { pool }
    }

    pub async fn ensure_table(&self) -> RepositoryResult<()> {
        let conn = self.pool.get().await?;
        conn.execute_batch(CREATE_USER_TABLE_SQL)?;
        Ok(())
    }

    pub async fn insert(&self, user: &User) -> RepositoryResult<usize> {
        let conn = self.pool.get().await?;
        let affected = conn.execute(
            "INSERT INTO user (username, password) VALUES (?1, ?2)",
            params![user.username, user.password],
        )?;
        Ok(affected)
    }

    /// 拼接 SQL 的登录校验（存在注入漏洞，仅作对照）
    pub async fn login_raw(&self, username: &str, password: &str) -> RepositoryResult<Option<User>> {
        let sql = format!(
            "SELECT username, password FROM user WHERE username = '{}' AND password = '{}'",
            username, password
        );
        warn!(sql = %sql, "执行拼接 SQL");

        let conn = self.pool.get().await?;
        let user = conn.query_row(&sql, [], row_to_user).optional()?;
        Ok(user)
    }

    /// 参数化登录校验
    pub async fn login(&self, username: &str, password: &str) -> RepositoryResult<Option<User>> {
        let conn = self.pool.get().await?;
        let user = conn
            .query_row(
                "SELECT username, password FROM user WHERE username = ?1 AND password = ?2",
                params![username, password],
                row_to_user,
            )
            .optional()?;

        debug!(username, found = user.is_some(), "参数化登录校验");
        Ok(user)
    }
}
