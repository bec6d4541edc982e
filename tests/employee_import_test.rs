// ==========================================
// 员工导入集成测试
// ==========================================
// 测试目标: Excel 文件 → 员工记录 → SQLite 的完整流程
// ==========================================


use chrono::NaiveDate;
use employee_loader::domain::{ExcelType, Gender};
use employee_loader::importer::{
    read_employees_from, read_employees_from_path, EmployeeImporter, ImportError,
};
use employee_loader::logging;
use employee_loader::repository::EmployeeRepository;
use rust_xlsxwriter::{Format, Formula, Workbook};
use std::io::Cursor;
use test_helpers::{create_employee_workbook, sample_row, sample_rows};

#[tokio::test]
async fn test_complete_import_flow() {
    logging::init_test();

    println!("\n=== 测试：完整导入流程 ===");

    // 步骤 1: 准备数据库和样例文件（5 行数据，最后一行不读取）
    let (_temp_db, db_path) = test_helpers::create_test_db().expect("Failed to create test db");
    let pool = test_helpers::create_test_pool(&db_path).await;
    let (_dir, file_path) = create_employee_workbook(&sample_rows(5)).expect("Failed to write xlsx");
    println!("✓ 步骤 1: 样例文件已生成");

    // 步骤 2: 导入
    let repo = EmployeeRepository::new(&pool);
    repo.ensure_table().await.unwrap();
    let importer = EmployeeImporter::new(EmployeeRepository::new(&pool));
    let report = importer.import_file(&file_path).await.expect("Import failed");

    assert_eq!(report.total_records, 4);
    assert_eq!(report.flushes, vec![4]);
    println!("✓ 步骤 2: 导入 {} 条", report.rows_written());

    // 步骤 3: 读回并与读取结果比对
    let expected = read_employees_from_path(&file_path).unwrap();
    let stored = repo.list_all().await.unwrap();
    assert_eq!(stored, expected);
    assert_eq!(repo.count().await.unwrap(), 4);
    assert!(stored.iter().all(|e| e.id() != "E00004"));
    println!("✓ 步骤 3: 读回数据一致");

    pool.close();
}

#[tokio::test]
async fn test_cell_values_are_normalized() {
    logging::init_test();

    let mut row = sample_row(1);
    row.id = Some("E02387".to_string());
    row.gender = "male".to_string();
    row.age = 41.0;
    row.hire_date = NaiveDate::from_ymd_opt(2023, 3, 5).unwrap();
    row.annual_salary = 55_000.7;
    row.bonus = 0.15;
    row.exit_date = Some(NaiveDate::from_ymd_opt(2024, 12, 31).unwrap());

    // 末尾补一行，保证 row 不是最后一个物理行
    let (_dir, file_path) =
        create_employee_workbook(&[row, sample_row(2)]).expect("Failed to write xlsx");
    let employees = read_employees_from_path(&file_path).unwrap();

    assert_eq!(employees.len(), 1);
    let employee = &employees[0];
    assert_eq!(employee.id(), "E02387");
    // 仅 "Male" 解码为男性
    assert_eq!(employee.gender(), Some(Gender::Female));
    assert_eq!(employee.age(), Some(41));
    assert_eq!(employee.hire_date(), Some("2023-03-05"));
    assert_eq!(employee.annual_salary(), Some(55_000));
    assert_eq!(employee.bonus(), Some("0.15"));
    assert_eq!(employee.exit_date(), Some("2024-12-31"));
}

#[tokio::test]
async fn test_rows_without_id_are_skipped() {
    logging::init_test();

    let mut rows = sample_rows(4);
    rows[1].id = None;
    let (_dir, file_path) = create_employee_workbook(&rows).expect("Failed to write xlsx");

    let employees = read_employees_from_path(&file_path).unwrap();
    let ids: Vec<&str> = employees.iter().map(|e| e.id()).collect();

    // E00001 无主键，E00003 为最后一行
    assert_eq!(ids, vec!["E00000", "E00002"]);
    assert_eq!(employees[0].exit_date(), None);
}

#[tokio::test]
async fn test_thousand_row_sheet_flushes_in_batches() {
    logging::init_test();

    println!("\n=== 测试：批量写入 ===");

    let (_temp_db, db_path) = test_helpers::create_test_db().expect("Failed to create test db");
    let pool = test_helpers::create_test_pool(&db_path).await;
    let (_dir, file_path) =
        create_employee_workbook(&sample_rows(1000)).expect("Failed to write xlsx");

    let repo = EmployeeRepository::new(&pool);
    repo.ensure_table().await.unwrap();
    let importer = EmployeeImporter::new(EmployeeRepository::new(&pool));
    let report = importer.import_file(&file_path).await.unwrap();

    assert_eq!(report.total_records, 999);
    assert_eq!(report.flush_count(), 10);
    assert_eq!(report.flushes[0], 101);
    assert!(report.flushes[1..9].iter().all(|&n| n == 100));
    assert_eq!(report.flushes[9], 98);
    assert_eq!(repo.count().await.unwrap(), 999);
    println!("✓ 批次: {:?}", report.flushes);
}

#[tokio::test]
async fn test_invalid_age_aborts_import() {
    logging::init_test();

    let (_temp_db, db_path) = test_helpers::create_test_db().expect("Failed to create test db");
    let pool = test_helpers::create_test_pool(&db_path).await;
    let repo = EmployeeRepository::new(&pool);
    repo.ensure_table().await.unwrap();

    // 表头 + 2 行数据 + 末行；第 2 行年龄为文本
    let dir = tempfile::tempdir().unwrap();
    let file_path = dir.path().join("bad_age.xlsx");
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.write_string(0, 0, "EEID").unwrap();
    worksheet.write_string(0, 7, "Age").unwrap();
    worksheet.write_string(1, 0, "E00001").unwrap();
    worksheet.write_number(1, 7, 30.0).unwrap();
    worksheet.write_string(2, 0, "E00002").unwrap();
    worksheet.write_string(2, 7, "forty").unwrap();
    worksheet.write_string(3, 0, "E00003").unwrap();
    workbook.save(&file_path).unwrap();

    let importer = EmployeeImporter::new(EmployeeRepository::new(&pool));
    let result = importer.import_file(&file_path).await;

    match result {
        Err(ImportError::TypeConversionError { row, field, .. }) => {
            assert_eq!(row, 3);
            assert_eq!(field, "age");
        }
        other => panic!("unexpected result: {other:?}"),
    }
    // 读取阶段失败，不写库
    assert_eq!(repo.count().await.unwrap(), 0);
}

#[test]
fn test_formula_cells_use_cached_results() {
    logging::init_test();

    let dir = tempfile::tempdir().unwrap();
    let file_path = dir.path().join("formulas.xlsx");
    let hire_date = NaiveDate::from_ymd_opt(2023, 3, 5).unwrap();
    let date_format = Format::new().set_num_format("dd/mm/yyyy");

    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.write_string(0, 0, "EEID").unwrap();
    worksheet.write_string(0, 7, "Age").unwrap();
    worksheet.write_string(0, 8, "Hire Date").unwrap();

    // 第 1 行: 三个公式单元格，均带缓存结果
    worksheet
        .write_formula(1, 0, Formula::new(r#"="E"&"1""#).set_result("E1"))
        .unwrap();
    worksheet
        .write_formula(1, 7, Formula::new("=20+21").set_result("41"))
        .unwrap();
    let serial = test_helpers::excel_serial(hire_date).to_string();
    worksheet
        .write_formula_with_format(
            1,
            8,
            Formula::new("=DATE(2023,3,5)").set_result(serial),
            &date_format,
        )
        .unwrap();

    // 末行不读取
    worksheet.write_string(2, 0, "E2").unwrap();
    workbook.save(&file_path).unwrap();

    let employees = read_employees_from_path(&file_path).unwrap();
    assert_eq!(employees.len(), 1);
    assert_eq!(employees[0].id(), "E1");
    assert_eq!(employees[0].age(), Some(41));
    assert_eq!(employees[0].hire_date(), Some("2023-03-05"));
}

#[test]
fn test_garbage_bytes_as_xls_fail_to_parse() {
    let bytes = b"this is not a spreadsheet".to_vec();
    let result = read_employees_from(ExcelType::Xls, Cursor::new(bytes));
    assert!(matches!(result, Err(ImportError::ExcelParseError(_))));
}

#[test]
fn test_missing_and_unsupported_files() {
    let result = read_employees_from_path("does/not/exist.xlsx");
    assert!(matches!(result, Err(ImportError::FileNotFound(_))));

    let temp = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
    let result = read_employees_from_path(temp.path());
    assert!(matches!(result, Err(ImportError::UnsupportedFormat(_))));
}
