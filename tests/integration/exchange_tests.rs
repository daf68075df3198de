//! Export / import through real xlsx bytes

use std::io::Cursor;
use std::sync::Mutex;

use async_trait::async_trait;
use calamine::{open_workbook_auto_from_rs, Data, Reader};
use chrono::NaiveDate;
use serde_json::json;
use tokio_util::sync::CancellationToken;

use bibliodesk::{
    exchange::{
        bulk_create, export_records, import_records, import_template, presets, validators,
        ExportSpec, RecordSink, SinkError, Validators,
    },
    models::{CellValue, HeaderMap, Record, RowError},
    AppConfig, AppError, AppState,
};

/// Sheet name and cell text of the first sheet, empty cells as ""
fn read_sheet(bytes: &[u8]) -> (String, Vec<Vec<String>>) {
    let mut workbook =
        open_workbook_auto_from_rs(Cursor::new(bytes.to_vec())).expect("Failed to open workbook");
    let name = workbook.sheet_names()[0].clone();
    let range = workbook.worksheet_range(&name).expect("Failed to read sheet");
    let rows = range
        .rows()
        .map(|cells| {
            cells
                .iter()
                .map(|c| match c {
                    Data::Empty => String::new(),
                    other => other.to_string(),
                })
                .collect()
        })
        .collect();
    (name, rows)
}

#[derive(Default)]
struct CollectingSink {
    created: Mutex<Vec<Record>>,
}

#[async_trait]
impl RecordSink for CollectingSink {
    async fn create(&self, record: Record) -> Result<(), SinkError> {
        if record.get("barcode") == Some(&CellValue::from("DUP")) {
            return Err(SinkError::new("Штрих-код уже существует"));
        }
        self.created.lock().unwrap().push(record);
        Ok(())
    }
}

fn config() -> bibliodesk::config::ExchangeConfig {
    AppConfig::default().exchange
}

#[test]
fn test_export_column_order_and_formatting() {
    let headers = HeaderMap::new()
        .with("code", "Код")
        .with("is_available", "Доступна");
    let rows = vec![Record::new().with("code", "B1").with("is_available", true)];
    let spec = ExportSpec::new("books.xlsx", headers, rows).sheet("Книги");

    let bytes = export_records(&spec, &config()).unwrap();
    let (sheet, cells) = read_sheet(&bytes);

    assert_eq!(sheet, "Книги");
    assert_eq!(cells[0], vec!["Код", "Доступна"]);
    assert_eq!(cells[1], vec!["B1", "Да"]);
}

#[test]
fn test_export_missing_relation_is_blank() {
    let headers = HeaderMap::new()
        .with("title", "Наименование")
        .with("author.short_name", "Автор")
        .with("publisher.name", "Издательство");
    let rows = vec![
        Record::from_json(json!({ "title": "X", "author": null })),
        Record::from_json(json!({
            "title": "Y",
            "author": { "short_name": "Толстой Л.Н." },
            "publisher": { "name": "Просвещение" }
        })),
    ];
    let bytes = export_records(&ExportSpec::new("b.xlsx", headers, rows), &config()).unwrap();
    let (sheet, cells) = read_sheet(&bytes);

    assert_eq!(sheet, "Sheet1");
    assert_eq!(cells.len(), 3);
    assert_eq!(cells[1][0], "X");
    assert!(cells[1].get(1).map_or(true, String::is_empty));
    assert_eq!(cells[2], vec!["Y", "Толстой Л.Н.", "Просвещение"]);
}

#[test]
fn test_export_selected_fields_only() {
    let spec = presets::disks_export(
        vec![Record::new().with("code", "D1").with("title", "Химия 8").with("barcode", "300001")],
        NaiveDate::from_ymd_opt(2024, 9, 1).unwrap(),
    )
    .select_fields(&["barcode", "code"])
    .unwrap();

    let (sheet, cells) = read_sheet(&export_records(&spec, &config()).unwrap());
    assert_eq!(sheet, "Диски");
    assert_eq!(cells[0], vec!["Код", "Штрих-код"]);
    assert_eq!(cells[1], vec!["D1", "300001"]);
}

#[test]
fn test_round_trip() {
    let headers = presets::books();
    let records = vec![
        Record::from_json(json!({
            "code": "B-17",
            "title": "Война и мир",
            "author": { "short_name": "Толстой Л.Н." },
            "publisher": null,
            "publication_year": 2019,
            "barcode": "4600000000017",
            "is_available": false
        })),
        Record::new()
            .with("code", "B-18")
            .with("title", "Азбука")
            .with("location", "Стеллаж 3")
            .with("is_available", true),
    ];
    let bytes = export_records(&ExportSpec::new("b.xlsx", headers.clone(), records.clone()), &config())
        .unwrap();
    let parsed = import_records(&bytes, &headers, &Validators::new()).unwrap();

    assert!(parsed.errors.is_empty());
    assert!(parsed.skipped_columns.is_empty());
    assert_eq!(parsed.rows.len(), 2);
    assert_eq!(parsed.rows[0].row, 2);
    assert_eq!(parsed.rows[1].row, 3);

    for (original, imported) in records.iter().zip(parsed.records()) {
        for key in headers.keys() {
            let expected = match original.resolve(key) {
                None | Some(CellValue::Empty) => None,
                Some(CellValue::Bool(true)) => Some(CellValue::from("Да")),
                Some(CellValue::Bool(false)) => Some(CellValue::from("Нет")),
                Some(other) => Some(other.clone()),
            };
            assert_eq!(imported.get(key).cloned(), expected, "field {}", key);
        }
    }
}

#[test]
fn test_dates_come_back_as_rendered_text() {
    let headers = presets::loans();
    let loan = Record::new()
        .with("book", Record::new().with("title", "Азбука"))
        .with("issue_date", NaiveDate::from_ymd_opt(2024, 9, 2).unwrap());
    let bytes = export_records(&ExportSpec::new("l.xlsx", headers.clone(), vec![loan]), &config())
        .unwrap();
    let parsed = import_records(&bytes, &headers, &Validators::new()).unwrap();

    let record = &parsed.rows[0].record;
    assert_eq!(record.get("book.title"), Some(&CellValue::from("Азбука")));
    assert_eq!(record.get("issue_date"), Some(&CellValue::from("02.09.2024")));
}

#[test]
fn test_template_has_headers_only() {
    let headers = presets::disk_import();
    let bytes = import_template(&headers, &config()).unwrap();
    let (sheet, cells) = read_sheet(&bytes);

    assert_eq!(sheet, "Template");
    assert_eq!(cells.len(), 1);
    assert_eq!(cells[0], headers.labels().collect::<Vec<_>>());

    let parsed = import_records(&bytes, &headers, &Validators::new()).unwrap();
    assert_eq!(parsed.total_rows(), 0);
}

#[test]
fn test_extra_columns_are_ignored() {
    let wide = presets::readers();
    let rows = vec![Record::new()
        .with("last_name", "Иванова")
        .with("active_loans_count", 3)];
    let bytes = export_records(&ExportSpec::new("r.xlsx", wide, rows), &config()).unwrap();

    let parsed = import_records(&bytes, &presets::reader_import(), &Validators::new()).unwrap();
    assert_eq!(parsed.skipped_columns, vec!["Книг на руках".to_string()]);
    let record = &parsed.rows[0].record;
    assert_eq!(record.get("last_name"), Some(&CellValue::from("Иванова")));
    assert_eq!(record.get("active_loans_count"), None);
}

#[test]
fn test_corrupt_file_rejected() {
    let result = import_records(&[0x50, 0x4b, 0x03, 0x04, 0x00], &presets::books(), &Validators::new());
    assert!(matches!(result, Err(AppError::Parse(_))));
}

#[tokio::test]
async fn test_import_row_isolation() {
    let headers = HeaderMap::new().with("code", "Код").with("barcode", "Штрих-код");
    let rows = vec![
        Record::new().with("code", "D1").with("barcode", "bad code"),
        Record::new().with("code", "D2").with("barcode", "300002"),
        Record::new().with("code", "D3").with("barcode", "300003"),
    ];
    let bytes = export_records(&ExportSpec::new("d.xlsx", headers.clone(), rows), &config()).unwrap();

    let validators = Validators::new().with("barcode", validators::barcode);
    let parsed = import_records(&bytes, &headers, &validators).unwrap();
    let sink = CollectingSink::default();
    let outcome = bulk_create(parsed, &sink, &CancellationToken::new(), &config().unknown_error_label).await;

    assert_eq!(outcome.success_count, 2);
    assert_eq!(outcome.fail_count, 1);
    assert_eq!(outcome.errors, vec![RowError::validation(2)]);
    assert_eq!(sink.created.lock().unwrap().len(), 2);
}

#[tokio::test]
async fn test_service_import_reports_backend_errors() {
    let state = AppState::new(AppConfig::default());
    let exchange = &state.services.exchange;

    let mut rows: Vec<Record> = (0..12)
        .map(|i| Record::new().with("code", format!("D{}", i)).with("barcode", "DUP"))
        .collect();
    rows.push(Record::new().with("code", "OK").with("barcode", "500001"));
    let headers = presets::disk_import();
    let bytes = exchange
        .export(&ExportSpec::new("d.xlsx", headers.clone(), rows))
        .unwrap();

    let sink = CollectingSink::default();
    let outcome = exchange
        .import(
            "Диски.xlsx",
            &bytes,
            &headers,
            &presets::disk_validators(),
            &sink,
            &CancellationToken::new(),
        )
        .await
        .unwrap();

    assert_eq!(outcome.success_count, 1);
    assert_eq!(outcome.fail_count, 12);
    assert_eq!(outcome.errors[0], RowError::new(2, "Штрих-код уже существует"));

    let preview = exchange.preview(&outcome);
    assert_eq!(preview.shown.len(), 10);
    assert_eq!(preview.remaining, 2);
}

#[tokio::test]
async fn test_service_rejects_non_excel_name() {
    let state = AppState::new(AppConfig::default());
    let sink = CollectingSink::default();
    let result = state
        .services
        .exchange
        .import(
            "readers.csv",
            b"code;barcode",
            &presets::reader_import(),
            &Validators::new(),
            &sink,
            &CancellationToken::new(),
        )
        .await;
    assert!(matches!(result, Err(AppError::Validation(_))));
}

#[test]
fn test_export_to_dir() {
    let state = AppState::new(AppConfig::default());
    let dir = std::env::temp_dir().join(format!("bibliodesk-export-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();

    let spec = presets::books_export(vec![], NaiveDate::from_ymd_opt(2024, 9, 1).unwrap());
    let path = state.services.exchange.export_to_dir(&spec, &dir).unwrap();

    assert!(path.ends_with("Книги_2024-09-01.xlsx"));
    let (sheet, cells) = read_sheet(&std::fs::read(&path).unwrap());
    assert_eq!(sheet, "Книги");
    assert_eq!(cells[0].len(), presets::books().len());

    std::fs::remove_dir_all(&dir).ok();
}
