// ==========================================
// 员工表格入库 - 命令行入口
// ==========================================
// Usage:
//   employee-loader <file.xlsx|file.xls> [db_path] [config.json]
//
// db_path 优先于配置文件中的 database_path
// ==========================================

use employee_loader::config::{default_database_path, ensure_database_dir, LoaderConfig};
use employee_loader::db::ConnectionPool;
use employee_loader::importer::EmployeeImporter;
use employee_loader::logging;
use employee_loader::repository::EmployeeRepository;
use std::error::Error;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    logging::init();

    let mut args = std::env::args().skip(1);
    let file_path = args
        .next()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .ok_or("Usage: employee-loader <file.xlsx|file.xls> [db_path] [config.json]")?;
    let db_path = args.next().map(|s| s.trim().to_string()).filter(|s| !s.is_empty());
    let config_path = args.next();

    let mut config = match config_path {
        Some(path) => LoaderConfig::from_json_file(&path)?,
        None => LoaderConfig::default(),
    };
    if let Some(path) = db_path {
        config.database_path = path;
    }
    if config.database_path.trim().is_empty() {
        config.database_path = default_database_path();
    }

    tracing::info!("==================================================");
    tracing::info!("{} v{}", employee_loader::APP_NAME, employee_loader::VERSION);
    tracing::info!("使用数据库: {}", config.database_path);
    tracing::info!("==================================================");

    ensure_database_dir(&config.database_path)?;
    let pool = ConnectionPool::new(&config.database_path, &config.pool).await?;
    let repo = EmployeeRepository::new(&pool);
    repo.ensure_table().await?;

    let importer = EmployeeImporter::new(repo);
    let result = importer.import_file(&file_path).await;
    pool.close();

    let report = result?;
    println!(
        "imported {} employees from {} in {} flushes ({} ms)",
        report.rows_written(),
        file_path,
        report.flush_count(),
        report.elapsed_ms
    );

    Ok(())
}
