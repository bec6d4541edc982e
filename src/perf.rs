// ==========================================
// 员工表格入库 - SQL 性能统计
// ==========================================
// 基于 rusqlite profile 回调（每条语句完成时触发一次）:
// - 统计 PerfGuard 作用域内执行的 SQL 语句数
// - 超过阈值的语句记为慢 SQL 并输出 warn 日志
// ==========================================

use rusqlite::Connection;
use std::cell::Cell;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

static SLOW_SQL_THRESHOLD_MS: AtomicU64 = AtomicU64::new(0);

thread_local! {
    static PERF_DEPTH: Cell<u32> = const { Cell::new(0) };
    static SQL_COUNT: Cell<u64> = const { Cell::new(0) };
    static SLOW_SQL_COUNT: Cell<u64> = const { Cell::new(0) };
}

fn is_true(v: &str) -> bool {
    matches!(
        v.trim().to_lowercase().as_str(),
        "1" | "true" | "yes" | "y" | "on"
    )
}

fn truncate_sql(sql: &str, max_len: usize) -> String {
    let s = sql.trim().replace('\n', " ");
    if s.chars().count() <= max_len {
        return s;
    }
    let head: String = s.chars().take(max_len).collect();
    format!("{}…", head)
}

// ==========================================
// PerfSettings - 统计开关与慢 SQL 阈值
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PerfSettings {
    pub enabled: bool,
    pub slow_sql_ms: u64,
}

impl PerfSettings {
    /// 从环境变量读取
    ///
    /// - `EMPLOYEE_LOADER_PERF_SQL=1` 强制开启（Debug 默认开启，Release 默认关闭）
    /// - `EMPLOYEE_LOADER_SLOW_SQL_MS=50` 慢 SQL 阈值（毫秒）
    pub fn from_env() -> Self {
        let enabled = match std::env::var("EMPLOYEE_LOADER_PERF_SQL") {
            Ok(v) => is_true(&v),
            Err(_) => cfg!(debug_assertions),
        };
        let slow_sql_ms = std::env::var("EMPLOYEE_LOADER_SLOW_SQL_MS")
            .ok()
            .and_then(|v| v.trim().parse::<u64>().ok())
            .unwrap_or(if cfg!(debug_assertions) { 50 } else { 200 });

        Self {
            enabled,
            slow_sql_ms,
        }
    }
}

/// 按环境变量安装 SQLite 语句 profile
pub fn install_sqlite_tracing(conn: &mut Connection) {
    install_sqlite_tracing_with(conn, PerfSettings::from_env());
}

/// 安装 SQLite 语句 profile（用于 SQL 计数 + 慢查询日志）
pub fn install_sqlite_tracing_with(conn: &mut Connection, settings: PerfSettings) {
    if !settings.enabled {
        conn.profile(None);
        return;
    }

    SLOW_SQL_THRESHOLD_MS.store(settings.slow_sql_ms, Ordering::Relaxed);
    // sqlite3_profile 与 sqlite3_trace 互斥，计数与慢 SQL 都挂在 profile 上
    conn.profile(Some(sql_profile_callback));
}

/// 每条语句执行完成时回调一次
fn sql_profile_callback(sql: &str, duration: Duration) {
    let active = PERF_DEPTH.with(|d| d.get() > 0);
    if active {
        SQL_COUNT.with(|c| c.set(c.get().saturating_add(1)));
    }

    let ms = duration.as_millis() as u64;
    let threshold = SLOW_SQL_THRESHOLD_MS.load(Ordering::Relaxed);
    if threshold > 0 && ms >= threshold {
        tracing::warn!(
            target: "slow_sql",
            duration_ms = ms,
            sql = %truncate_sql(sql, 420),
            "slow sql"
        );
        if active {
            SLOW_SQL_COUNT.with(|c| c.set(c.get().saturating_add(1)));
        }
    }
}

/// 性能统计 Guard：记录 elapsed_ms + SQL 语句数 + 慢 SQL 数
///
/// 只能包住同步代码段（计数器是线程局部的）。
///
/// ```ignore
/// let _perf = employee_loader::perf::PerfGuard::new("employee.bulk_insert");
/// // do work...
/// ```
pub struct PerfGuard {
    op: &'static str,
    start: Instant,
    sql_start: u64,
    slow_sql_start: u64,
}

impl PerfGuard {
    pub fn new(op: &'static str) -> Self {
        PERF_DEPTH.with(|d| d.set(d.get().saturating_add(1)));
        Self {
            op,
            start: Instant::now(),
            sql_start: SQL_COUNT.with(|c| c.get()),
            slow_sql_start: SLOW_SQL_COUNT.with(|c| c.get()),
        }
    }

    /// 当前作用域内已执行的 SQL 语句数
    pub fn sql_count(&self) -> u64 {
        SQL_COUNT.with(|c| c.get()).saturating_sub(self.sql_start)
    }
}

impl Drop for PerfGuard {
    fn drop(&mut self) {
        let elapsed_ms = self.start.elapsed().as_millis() as u64;
        let sql_count = self.sql_count();
        let slow_sql_count = SLOW_SQL_COUNT
            .with(|c| c.get())
            .saturating_sub(self.slow_sql_start);

        tracing::info!(
            target: "perf",
            op = self.op,
            elapsed_ms,
            sql_count,
            slow_sql_count,
            "done"
        );

        PERF_DEPTH.with(|d| d.set(d.get().saturating_sub(1)));
    }
}
