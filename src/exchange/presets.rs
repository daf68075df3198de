//! Header maps used by the catalog screens

use chrono::NaiveDate;

use super::{export::ExportSpec, import::Validators, validators};
use crate::models::{HeaderMap, Record};

pub const BOOKS_SHEET: &str = "Книги";
pub const READERS_SHEET: &str = "Читатели";
pub const LOANS_SHEET: &str = "История выдач";
pub const DISKS_SHEET: &str = "Диски";

/// `Книги_2024-09-01.xlsx`
pub fn export_file_name(prefix: &str, date: NaiveDate) -> String {
    format!("{}_{}.xlsx", prefix, date.format("%Y-%m-%d"))
}

pub fn books() -> HeaderMap {
    [
        ("code", "Код"),
        ("title", "Наименование"),
        ("author.short_name", "Автор"),
        ("publisher.name", "Издательство"),
        ("publication_year", "Год издания"),
        ("barcode", "Штрих-код"),
        ("isbn", "ISBN"),
        ("bbk", "ББК"),
        ("udk", "УДК"),
        ("class_range", "Класс"),
        ("location", "Место размещения"),
        ("is_available", "Доступна"),
    ]
    .into_iter()
    .collect()
}

/// Reader columns shared by export and import
fn reader_fields() -> HeaderMap {
    [
        ("code", "Код"),
        ("barcode", "Штрих-код"),
        ("last_name", "Фамилия"),
        ("first_name", "Имя"),
        ("middle_name", "Отчество"),
        ("user_type", "Тип"),
        ("grade", "Класс"),
        ("gender", "Пол"),
        ("birth_date", "Дата рождения"),
        ("address", "Адрес"),
        ("phone", "Телефон"),
        ("email", "Email"),
        ("parent_mother_name", "ФИО матери"),
        ("parent_mother_phone", "Телефон матери"),
        ("parent_father_name", "ФИО отца"),
        ("parent_father_phone", "Телефон отца"),
    ]
    .into_iter()
    .collect()
}

pub fn readers() -> HeaderMap {
    reader_fields().with("active_loans_count", "Книг на руках")
}

pub fn reader_import() -> HeaderMap {
    reader_fields()
}

pub fn reader_validators() -> Validators {
    Validators::new()
        .with("barcode", validators::barcode)
        .with("email", validators::email)
}

pub fn loans() -> HeaderMap {
    [
        ("book.title", "Книга"),
        ("book.barcode", "Штрих-код книги"),
        ("reader.last_name", "Фамилия читателя"),
        ("reader.first_name", "Имя читателя"),
        ("reader.grade", "Класс"),
        ("issue_date", "Дата выдачи"),
        ("return_date", "Дата возврата"),
        ("days_on_loan", "Дней на руках"),
        ("status", "Статус"),
    ]
    .into_iter()
    .collect()
}

pub fn disks() -> HeaderMap {
    [
        ("code", "Код"),
        ("title", "Наименование"),
        ("subject", "Предмет"),
        ("resource_type", "Тип ЭОР"),
        ("barcode", "Штрих-код"),
        ("publisher.name", "Издательство"),
        ("is_available", "Доступен"),
        ("comments", "Комментарии"),
    ]
    .into_iter()
    .collect()
}

pub fn disk_import() -> HeaderMap {
    [
        ("code", "Код"),
        ("title", "Наименование"),
        ("short_title", "Краткое наименование"),
        ("subject", "Предмет"),
        ("resource_type", "Тип ЭОР"),
        ("barcode", "Штрих-код"),
        ("comments", "Комментарии"),
    ]
    .into_iter()
    .collect()
}

pub fn disk_validators() -> Validators {
    Validators::new().with("barcode", validators::barcode)
}

pub fn books_export(rows: Vec<Record>, today: NaiveDate) -> ExportSpec {
    ExportSpec::new(export_file_name("Книги", today), books(), rows).sheet(BOOKS_SHEET)
}

pub fn readers_export(rows: Vec<Record>, today: NaiveDate) -> ExportSpec {
    ExportSpec::new(export_file_name("Читатели", today), readers(), rows).sheet(READERS_SHEET)
}

pub fn loans_export(rows: Vec<Record>, today: NaiveDate) -> ExportSpec {
    ExportSpec::new(export_file_name("История_выдач", today), loans(), rows).sheet(LOANS_SHEET)
}

pub fn disks_export(rows: Vec<Record>, today: NaiveDate) -> ExportSpec {
    ExportSpec::new(export_file_name("Диски", today), disks(), rows).sheet(DISKS_SHEET)
}
